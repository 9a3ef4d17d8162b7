//! Similarity ranking of non-critical conditions.
//!
//! # Ranking
//!
//! 1. Vectorize the input once.
//! 2. Score every non-critical record by cosine similarity against the
//!    vector of its space-joined keywords (precomputed at construction).
//! 3. Keep records scoring strictly above the inclusion threshold.
//! 4. Stable sort by score (desc); equal scores keep catalog order.
//! 5. Truncate to the match limit.

use crate::catalog::Catalog;
use crate::error::EngineError;
use crate::models::ConditionRecord;
use crate::vectorizer::{cosine_similarity, SparseVector, TfidfVectorizer};

/// A ranked non-critical condition.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCondition<'a> {
    pub condition: &'a ConditionRecord,
    /// Cosine similarity in `[0.0, 1.0]`.
    pub score: f64,
}

pub struct SimilarityMatcher {
    vectorizer: TfidfVectorizer,
    /// `(record index, keyword vector)` for each non-critical record.
    documents: Vec<(usize, SparseVector)>,
}

impl SimilarityMatcher {
    /// Fit the vectorizer on the non-critical keyword phrases of `catalog`
    /// (one fitting document per phrase) and precompute condition vectors.
    pub fn new(catalog: &Catalog, max_features: usize) -> Result<Self, EngineError> {
        let phrases = catalog
            .non_critical()
            .flat_map(|r| r.keywords.iter().map(String::as_str));
        let vectorizer = TfidfVectorizer::fit(phrases, max_features)?;

        let documents = catalog
            .records()
            .iter()
            .enumerate()
            .filter(|(_, r)| !r.is_critical)
            .map(|(i, r)| (i, vectorizer.transform(&r.keyword_text())))
            .collect();

        Ok(Self {
            vectorizer,
            documents,
        })
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    /// Rank non-critical conditions against `text`.
    ///
    /// An empty result means the symptoms were not recognized.
    pub fn rank<'a>(
        &self,
        catalog: &'a Catalog,
        text: &str,
        inclusion_threshold: f64,
        max_matches: usize,
    ) -> Vec<ScoredCondition<'a>> {
        let query = self.vectorizer.transform(text);
        if query.is_empty() {
            return Vec::new();
        }

        let records = catalog.records();
        let mut scored: Vec<ScoredCondition<'a>> = self
            .documents
            .iter()
            .map(|(index, doc)| ScoredCondition {
                condition: &records[*index],
                score: cosine_similarity(&query, doc).max(0.0),
            })
            .filter(|s| s.score > inclusion_threshold)
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(max_matches);
        scored
    }
}
