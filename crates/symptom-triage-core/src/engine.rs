//! The two-phase matching pipeline.
//!
//! ```text
//! text ──▶ critical stage ──(hit)──▶ critical MatchResult
//!              │
//!            (miss)
//!              ▼
//!        similarity stage ──▶ assemble + refine ──▶ MatchResult
//! ```
//!
//! The critical stage always runs first and, when it fires, the
//! similarity stage is never invoked.

use serde::{Deserialize, Serialize};

use crate::assemble;
use crate::catalog::Catalog;
use crate::critical::CriticalMatcher;
use crate::error::EngineError;
use crate::models::{MatchResult, UserContext};
use crate::similarity::SimilarityMatcher;
use crate::vectorizer::DEFAULT_MAX_FEATURES;

pub const DEFAULT_INCLUSION_THRESHOLD: f64 = 0.1;
pub const DEFAULT_MEDICINE_THRESHOLD: f64 = 0.2;
pub const DEFAULT_MAX_MATCHES: usize = 3;
pub const DEFAULT_PRIORITY_SEVERITY: u8 = 7;
pub const DEFAULT_ALLERGY_LABEL: &str = "Allergies";

/// Matching and refinement tuning, decoupled from application config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchParams {
    /// A condition matches only when its score exceeds this.
    pub inclusion_threshold: f64,
    /// A match contributes medicines only when its score exceeds this.
    pub medicine_threshold: f64,
    pub max_matches: usize,
    /// Vocabulary size cap for the vectorizer.
    pub max_features: usize,
    /// Severity strictly above this prioritises ibuprofen.
    pub priority_severity: u8,
    /// Exact pre-existing-condition label that removes aspirin.
    pub allergy_label: String,
}

impl Default for MatchParams {
    fn default() -> Self {
        Self {
            inclusion_threshold: DEFAULT_INCLUSION_THRESHOLD,
            medicine_threshold: DEFAULT_MEDICINE_THRESHOLD,
            max_matches: DEFAULT_MAX_MATCHES,
            max_features: DEFAULT_MAX_FEATURES,
            priority_severity: DEFAULT_PRIORITY_SEVERITY,
            allergy_label: DEFAULT_ALLERGY_LABEL.to_string(),
        }
    }
}

/// Which stage produced the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Critical,
    Similarity,
    Unrecognized,
}

/// The critical record that fired and the keyword that matched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriticalTrace {
    pub id: u32,
    pub condition: String,
    pub keyword: String,
}

/// One ranked similarity match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchTrace {
    pub id: u32,
    pub condition: String,
    pub score: f64,
}

/// A [`MatchResult`] together with how it was reached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub result: MatchResult,
    pub stage: Stage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critical: Option<CriticalTrace>,
    pub matches: Vec<MatchTrace>,
}

/// The matching engine. Built once, then shared read-only.
pub struct Engine {
    catalog: Catalog,
    critical: CriticalMatcher,
    similarity: SimilarityMatcher,
    params: MatchParams,
}

impl Engine {
    /// Compile critical patterns and fit the vectorizer over `catalog`.
    pub fn new(catalog: Catalog, params: MatchParams) -> Result<Self, EngineError> {
        if catalog.is_empty() {
            return Err(EngineError::EmptyCatalog);
        }
        let critical = CriticalMatcher::new(&catalog)?;
        let similarity = SimilarityMatcher::new(&catalog, params.max_features)?;

        tracing::info!(
            conditions = catalog.len(),
            critical = critical.len(),
            vocabulary = similarity.vectorizer().vocabulary_len(),
            "matching engine ready"
        );

        Ok(Self {
            catalog,
            critical,
            similarity,
            params,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn params(&self) -> &MatchParams {
        &self.params
    }

    /// Match `symptoms` and return the final result.
    pub fn recommend(&self, symptoms: &str, context: Option<&UserContext>) -> MatchResult {
        self.analyze(symptoms, context).result
    }

    /// Match `symptoms`, returning the result and the pipeline trace.
    pub fn analyze(&self, symptoms: &str, context: Option<&UserContext>) -> Analysis {
        if let Some(analysis) = self.critical_stage(symptoms) {
            return analysis;
        }
        self.similarity_stage(symptoms, context)
    }

    /// Scan for critical keywords. `Some` ends the pipeline.
    pub fn critical_stage(&self, symptoms: &str) -> Option<Analysis> {
        let hit = self.critical.scan(&self.catalog, symptoms)?;
        tracing::debug!(
            condition = %hit.condition.condition,
            keyword = hit.keyword,
            "critical keyword matched"
        );
        Some(Analysis {
            result: MatchResult {
                recommendation: hit.condition.recommendation.clone(),
                is_critical: true,
                medicines: Vec::new(),
            },
            stage: Stage::Critical,
            critical: Some(CriticalTrace {
                id: hit.condition.id,
                condition: hit.condition.condition.clone(),
                keyword: hit.keyword.to_string(),
            }),
            matches: Vec::new(),
        })
    }

    /// Rank non-critical conditions, assemble medicines, and refine.
    pub fn similarity_stage(&self, symptoms: &str, context: Option<&UserContext>) -> Analysis {
        let ranked = self.similarity.rank(
            &self.catalog,
            symptoms,
            self.params.inclusion_threshold,
            self.params.max_matches,
        );
        tracing::debug!(matches = ranked.len(), "similarity stage complete");

        let stage = if ranked.is_empty() {
            Stage::Unrecognized
        } else {
            Stage::Similarity
        };
        let matches = ranked
            .iter()
            .map(|s| MatchTrace {
                id: s.condition.id,
                condition: s.condition.condition.clone(),
                score: s.score,
            })
            .collect();

        Analysis {
            result: assemble::assemble(&ranked, context, &self.params),
            stage,
            critical: None,
            matches,
        }
    }
}
