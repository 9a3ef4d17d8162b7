use thiserror::Error;

/// Errors raised while building a [`Catalog`](crate::Catalog) or an
/// [`Engine`](crate::Engine). Matching itself never fails.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("catalog contains no conditions")]
    EmptyCatalog,
    #[error("vectorizer fitting corpus is empty (no non-critical keywords)")]
    EmptyCorpus,
    #[error("duplicate condition id: {0}")]
    DuplicateId(u32),
    #[error("condition {id} ({condition}) has no keywords")]
    NoKeywords { id: u32, condition: String },
    #[error("condition {id} has a blank keyword")]
    BlankKeyword { id: u32 },
    #[error("invalid catalog document: {0}")]
    InvalidCatalog(#[from] serde_json::Error),
    #[error("invalid keyword pattern for condition {id}: {source}")]
    Pattern {
        id: u32,
        #[source]
        source: regex::Error,
    },
    #[error("invalid token pattern: {0}")]
    TokenPattern(#[source] regex::Error),
    #[error("unknown symptom duration: '{0}'")]
    InvalidDuration(String),
}
