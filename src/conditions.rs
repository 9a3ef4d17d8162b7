use anyhow::Result;
use serde::Serialize;
use symptom_triage_core::{Catalog, ConditionRecord};

use crate::config::Config;

/// Which part of the catalog to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionFilter {
    All,
    Critical,
    NonCritical,
}

/// Catalog entry summary for listings.
#[derive(Debug, Clone, Serialize)]
pub struct ConditionSummary {
    pub id: u32,
    pub condition: String,
    pub is_critical: bool,
    pub keywords: usize,
    pub medicines: Vec<String>,
}

impl From<&ConditionRecord> for ConditionSummary {
    fn from(r: &ConditionRecord) -> Self {
        Self {
            id: r.id,
            condition: r.condition.clone(),
            is_critical: r.is_critical,
            keywords: r.keywords.len(),
            medicines: r.medicines.iter().map(|m| m.name.clone()).collect(),
        }
    }
}

pub fn summarize(catalog: &Catalog, filter: ConditionFilter) -> Vec<ConditionSummary> {
    catalog
        .iter()
        .filter(|r| match filter {
            ConditionFilter::All => true,
            ConditionFilter::Critical => r.is_critical,
            ConditionFilter::NonCritical => !r.is_critical,
        })
        .map(ConditionSummary::from)
        .collect()
}

pub fn list_conditions(config: &Config, filter: ConditionFilter) -> Result<()> {
    let catalog = crate::catalog::load_catalog(config)?;

    println!(
        "{:<4} {:<24} {:<9} {:<9} MEDICINES",
        "ID", "CONDITION", "CRITICAL", "KEYWORDS"
    );
    for s in summarize(&catalog, filter) {
        println!(
            "{:<4} {:<24} {:<9} {:<9} {}",
            s.id,
            s.condition,
            s.is_critical,
            s.keywords,
            s.medicines.len()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(summarize(&catalog, ConditionFilter::All).len(), 10);
        let critical = summarize(&catalog, ConditionFilter::Critical);
        assert_eq!(critical.len(), 4);
        assert!(critical.iter().all(|s| s.medicines.is_empty()));
        assert_eq!(summarize(&catalog, ConditionFilter::NonCritical)[0].condition, "Headache");
    }
}
