//! TF-IDF text vectorizer and sparse vector utilities.
//!
//! # Analysis
//!
//! 1. Lowercase the text.
//! 2. Extract tokens: maximal runs of word characters, at least two long.
//! 3. Drop English stop words.
//! 4. Append every adjacent pair of remaining tokens as a bigram
//!    (`"shortness breath"`, `"head ache"`).
//!
//! # Weighting
//!
//! `weight(t) = count(t in text) × idf(t)` with the smoothed inverse
//! document frequency `idf(t) = ln((1 + n) / (1 + df(t))) + 1`, where `n`
//! is the number of fitting documents. Vectors are L2-normalized.
//!
//! The vocabulary and idf table are frozen by [`TfidfVectorizer::fit`];
//! [`TfidfVectorizer::transform`] takes `&self` and ignores unknown terms.

use regex::Regex;
use std::collections::{HashMap, HashSet};

use crate::error::EngineError;
use crate::stop_words;

/// Two or more word characters between word boundaries.
const TOKEN_PATTERN: &str = r"\b\w\w+\b";

/// Default upper bound on vocabulary size.
pub const DEFAULT_MAX_FEATURES: usize = 5000;

/// A sparse vector over a vectorizer's vocabulary, sorted by term index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    /// Build from `(index, weight)` pairs. Duplicate indices are summed.
    pub fn from_pairs(mut pairs: Vec<(usize, f64)>) -> Self {
        pairs.sort_by_key(|(i, _)| *i);
        let mut entries: Vec<(usize, f64)> = Vec::with_capacity(pairs.len());
        for (i, w) in pairs {
            match entries.last_mut() {
                Some((last, acc)) if *last == i => *acc += w,
                _ => entries.push((i, w)),
            }
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    /// Number of non-zero components.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (ai, aw) = self.entries[i];
            let (bi, bw) = other.entries[j];
            match ai.cmp(&bi) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += aw * bw;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    fn normalized(self) -> Self {
        let norm = self.norm();
        if norm < f64::EPSILON {
            return self;
        }
        Self {
            entries: self
                .entries
                .into_iter()
                .map(|(i, w)| (i, w / norm))
                .collect(),
        }
    }
}

/// Cosine similarity between two sparse vectors.
///
/// Returns `0.0` when either vector has zero magnitude. For the
/// non-negative vectors produced by [`TfidfVectorizer`] the result lies
/// in `[0.0, 1.0]`.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    let denom = a.norm() * b.norm();
    if denom < f64::EPSILON {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(-1.0, 1.0)
}

/// A fitted TF-IDF vectorizer with a frozen vocabulary.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    token_pattern: Regex,
    stop_words: HashSet<&'static str>,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Fit the vocabulary and idf table on `documents`.
    ///
    /// When more than `max_features` distinct terms exist, the terms with
    /// the lowest total count across the corpus are dropped; ties keep the
    /// term seen first.
    pub fn fit<I, S>(documents: I, max_features: usize) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let token_pattern = Regex::new(TOKEN_PATTERN).map_err(EngineError::TokenPattern)?;
        let stop_words = stop_words::english();

        let mut n_docs = 0usize;
        // term -> (first-seen position, total count, document frequency)
        let mut stats: HashMap<String, (usize, usize, usize)> = HashMap::new();

        for doc in documents {
            n_docs += 1;
            let terms = analyze(&token_pattern, &stop_words, doc.as_ref());
            let mut in_doc: HashSet<&str> = HashSet::new();
            for term in &terms {
                let next = stats.len();
                let entry = stats.entry(term.clone()).or_insert((next, 0, 0));
                entry.1 += 1;
                if in_doc.insert(term.as_str()) {
                    entry.2 += 1;
                }
            }
        }

        if n_docs == 0 || stats.is_empty() {
            return Err(EngineError::EmptyCorpus);
        }

        let mut terms: Vec<(String, (usize, usize, usize))> = stats.into_iter().collect();
        terms.sort_by_key(|(_, (first, _, _))| *first);

        if terms.len() > max_features {
            // Stable: equal counts stay in first-seen order.
            terms.sort_by(|a, b| b.1 .1.cmp(&a.1 .1));
            terms.truncate(max_features);
            terms.sort_by_key(|(_, (first, _, _))| *first);
        }

        let n = n_docs as f64;
        let mut vocabulary = HashMap::with_capacity(terms.len());
        let mut idf = Vec::with_capacity(terms.len());
        for (index, (term, (_, _, df))) in terms.into_iter().enumerate() {
            vocabulary.insert(term, index);
            idf.push(((1.0 + n) / (1.0 + df as f64)).ln() + 1.0);
        }

        tracing::debug!(
            documents = n_docs,
            vocabulary = vocabulary.len(),
            "fitted tf-idf vectorizer"
        );

        Ok(Self {
            token_pattern,
            stop_words,
            vocabulary,
            idf,
        })
    }

    /// Tokens and bigrams of `text`, in order, stop words removed.
    pub fn analyze(&self, text: &str) -> Vec<String> {
        analyze(&self.token_pattern, &self.stop_words, text)
    }

    /// Vectorize `text` against the frozen vocabulary.
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: HashMap<usize, usize> = HashMap::new();
        for term in self.analyze(text) {
            if let Some(&index) = self.vocabulary.get(&term) {
                *counts.entry(index).or_insert(0) += 1;
            }
        }
        let pairs = counts
            .into_iter()
            .map(|(index, count)| (index, count as f64 * self.idf[index]))
            .collect();
        SparseVector::from_pairs(pairs).normalized()
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn contains_term(&self, term: &str) -> bool {
        self.vocabulary.contains_key(term)
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.vocabulary.get(term).map(|&i| self.idf[i])
    }
}

fn analyze(pattern: &Regex, stop_words: &HashSet<&'static str>, text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let tokens: Vec<&str> = pattern
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|t| !stop_words.contains(t))
        .collect();

    let mut terms: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
    terms.extend(tokens.windows(2).map(|pair| format!("{} {}", pair[0], pair[1])));
    terms
}
