//! # Symptom Triage Core
//!
//! The symptom-matching engine: a two-phase pipeline that first scans
//! free text for critical-condition keywords, then ranks non-critical
//! conditions by TF-IDF cosine similarity and assembles medicine
//! suggestions from the best matches.
//!
//! This crate performs no file or network I/O and has no async runtime.
//! Catalogs are parsed from in-memory documents; the application crate
//! decides where they come from.
//!
//! ```rust
//! use symptom_triage_core::{Catalog, Engine, MatchParams};
//!
//! let engine = Engine::new(Catalog::builtin().unwrap(), MatchParams::default()).unwrap();
//! let result = engine.recommend("I have a headache", None);
//! assert!(!result.is_critical);
//! assert!(result.medicines.iter().any(|m| m.name == "Ibuprofen"));
//! ```

pub mod assemble;
pub mod catalog;
pub mod critical;
pub mod engine;
pub mod error;
pub mod models;
pub mod similarity;
pub mod stop_words;
pub mod vectorizer;

pub use catalog::Catalog;
pub use engine::{Analysis, Engine, MatchParams, Stage};
pub use error::EngineError;
pub use models::{ConditionRecord, MatchResult, MedicineRecord, SymptomDuration, UserContext};
