//! The condition catalog.
//!
//! A [`Catalog`] is validated once at construction and is read-only
//! afterwards. Updating it means building a new catalog (and a new
//! [`Engine`](crate::Engine) on top of it).

use serde::Deserialize;
use std::collections::HashSet;

use crate::error::EngineError;
use crate::models::ConditionRecord;

const BUILTIN_CATALOG: &str = include_str!("../data/conditions.json");

/// Serialized catalog document: `{ "conditions": [ ... ] }`.
#[derive(Debug, Deserialize)]
pub struct CatalogDocument {
    pub conditions: Vec<ConditionRecord>,
}

/// An immutable, validated list of condition records in catalog order.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<ConditionRecord>,
}

impl Catalog {
    /// Validate and normalize `records` into a catalog.
    ///
    /// Keywords are trimmed and lowercased. Fails on an empty list,
    /// duplicate ids, a record without keywords, or a blank keyword.
    pub fn new(records: Vec<ConditionRecord>) -> Result<Self, EngineError> {
        if records.is_empty() {
            return Err(EngineError::EmptyCatalog);
        }

        let mut seen = HashSet::new();
        let mut normalized = Vec::with_capacity(records.len());

        for mut record in records {
            if !seen.insert(record.id) {
                return Err(EngineError::DuplicateId(record.id));
            }
            if record.keywords.is_empty() {
                return Err(EngineError::NoKeywords {
                    id: record.id,
                    condition: record.condition,
                });
            }
            for kw in record.keywords.iter_mut() {
                let lowered = kw.trim().to_lowercase();
                if lowered.is_empty() {
                    return Err(EngineError::BlankKeyword { id: record.id });
                }
                *kw = lowered;
            }
            if record.is_critical && !record.medicines.is_empty() {
                tracing::warn!(
                    id = record.id,
                    condition = %record.condition,
                    "critical condition lists medicines; they will never be suggested"
                );
            }
            normalized.push(record);
        }

        Ok(Self {
            records: normalized,
        })
    }

    /// Parse a JSON catalog document.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let doc: CatalogDocument = serde_json::from_str(json)?;
        Self::new(doc.conditions)
    }

    /// The catalog bundled with the crate: six common conditions and
    /// four critical ones.
    pub fn builtin() -> Result<Self, EngineError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &ConditionRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[ConditionRecord] {
        &self.records
    }

    pub fn get(&self, id: u32) -> Option<&ConditionRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Critical records, in catalog order.
    pub fn critical(&self) -> impl Iterator<Item = &ConditionRecord> {
        self.records.iter().filter(|r| r.is_critical)
    }

    /// Non-critical records, in catalog order.
    pub fn non_critical(&self) -> impl Iterator<Item = &ConditionRecord> {
        self.records.iter().filter(|r| !r.is_critical)
    }
}
