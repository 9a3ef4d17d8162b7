//! Critical-condition detection.
//!
//! Every keyword of every critical record is compiled into a
//! `\b<keyword>\b` pattern. Input is lowercased and scanned in catalog
//! order; the first critical record with any whole-word match wins.

use regex::Regex;

use crate::catalog::Catalog;
use crate::error::EngineError;
use crate::models::ConditionRecord;

/// A positive critical scan: the record that fired and the keyword that
/// matched.
#[derive(Debug, Clone, PartialEq)]
pub struct CriticalHit<'a> {
    pub condition: &'a ConditionRecord,
    pub keyword: &'a str,
}

struct CriticalRule {
    /// Index into the catalog's records.
    record: usize,
    patterns: Vec<(usize, Regex)>,
}

/// Whole-word scanner over the catalog's critical records.
pub struct CriticalMatcher {
    rules: Vec<CriticalRule>,
}

impl CriticalMatcher {
    pub fn new(catalog: &Catalog) -> Result<Self, EngineError> {
        let mut rules = Vec::new();
        for (index, record) in catalog.records().iter().enumerate() {
            if !record.is_critical {
                continue;
            }
            let patterns = record
                .keywords
                .iter()
                .enumerate()
                .map(|(k, keyword)| {
                    Regex::new(&format!(r"\b{}\b", regex::escape(keyword)))
                        .map(|re| (k, re))
                        .map_err(|source| EngineError::Pattern {
                            id: record.id,
                            source,
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rules.push(CriticalRule {
                record: index,
                patterns,
            });
        }
        Ok(Self { rules })
    }

    /// Scan `text` for a critical keyword. Returns the first hit in
    /// catalog order, or `None`.
    pub fn scan<'a>(&self, catalog: &'a Catalog, text: &str) -> Option<CriticalHit<'a>> {
        let lowered = text.to_lowercase();
        let records = catalog.records();
        for rule in &self.rules {
            let record = &records[rule.record];
            for (k, pattern) in &rule.patterns {
                if pattern.is_match(&lowered) {
                    return Some(CriticalHit {
                        condition: record,
                        keyword: &record.keywords[*k],
                    });
                }
            }
        }
        None
    }

    /// Number of critical records being watched.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
