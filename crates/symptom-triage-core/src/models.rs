//! Data types shared by the catalog, the matching pipeline, and callers.
//!
//! Catalog records ([`ConditionRecord`], [`MedicineRecord`]) are loaded
//! once and never mutated. [`UserContext`] and [`MatchResult`] are
//! per-request values.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

/// An over-the-counter medicine suggested for a condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicineRecord {
    /// Display name; also the dedup key within a single result.
    pub name: String,
    pub dosage: String,
    pub description: String,
    /// Reference link (opaque).
    pub url: String,
}

/// A catalog entry describing one condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionRecord {
    pub id: u32,
    /// Human-readable label, e.g. `"Headache"`.
    pub condition: String,
    /// Keyword phrases, lowercased at load time. Never empty.
    pub keywords: Vec<String>,
    #[serde(default)]
    pub medicines: Vec<MedicineRecord>,
    /// Advice text shown when this condition matches.
    pub recommendation: String,
    #[serde(default)]
    pub is_critical: bool,
}

impl ConditionRecord {
    /// The condition's keywords joined into one similarity document.
    pub fn keyword_text(&self) -> String {
        self.keywords.join(" ")
    }
}

/// How long the user has had their symptoms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SymptomDuration {
    #[serde(rename = "Less than 24 hours", alias = "lt-24h")]
    LessThanDay,
    #[serde(rename = "1-3 days", alias = "1-3d")]
    OneToThreeDays,
    #[serde(rename = "4-7 days", alias = "4-7d")]
    FourToSevenDays,
    #[serde(rename = "More than a week", alias = "gt-1w")]
    MoreThanWeek,
}

impl SymptomDuration {
    pub const ALL: [SymptomDuration; 4] = [
        SymptomDuration::LessThanDay,
        SymptomDuration::OneToThreeDays,
        SymptomDuration::FourToSevenDays,
        SymptomDuration::MoreThanWeek,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SymptomDuration::LessThanDay => "Less than 24 hours",
            SymptomDuration::OneToThreeDays => "1-3 days",
            SymptomDuration::FourToSevenDays => "4-7 days",
            SymptomDuration::MoreThanWeek => "More than a week",
        }
    }

    fn short(&self) -> &'static str {
        match self {
            SymptomDuration::LessThanDay => "lt-24h",
            SymptomDuration::OneToThreeDays => "1-3d",
            SymptomDuration::FourToSevenDays => "4-7d",
            SymptomDuration::MoreThanWeek => "gt-1w",
        }
    }
}

impl fmt::Display for SymptomDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SymptomDuration {
    type Err = EngineError;

    /// Accepts either the full label (case-insensitive) or the short form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        SymptomDuration::ALL
            .into_iter()
            .find(|d| d.label().eq_ignore_ascii_case(wanted) || d.short() == wanted)
            .ok_or_else(|| EngineError::InvalidDuration(s.to_string()))
    }
}

/// Pre-existing condition labels offered to users by the front ends.
pub const KNOWN_PRE_EXISTING_CONDITIONS: &[&str] = &[
    "None",
    "Diabetes",
    "High Blood Pressure",
    "Heart Disease",
    "Asthma",
    "Allergies",
    "Other",
];

/// Auxiliary information supplied alongside the symptom text.
///
/// Only `severity` and `conditions` influence the result today.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserContext {
    pub duration: Option<SymptomDuration>,
    /// Conventionally 1-10. Absent behaves as 0.
    pub severity: Option<u8>,
    /// Pre-existing condition labels, e.g. `"Allergies"`.
    pub conditions: BTreeSet<String>,
    pub medications: Option<String>,
}

impl UserContext {
    pub fn severity_or_zero(&self) -> u8 {
        self.severity.unwrap_or(0)
    }

    pub fn has_condition(&self, label: &str) -> bool {
        self.conditions.contains(label)
    }
}

/// The engine's answer for one piece of symptom text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub recommendation: String,
    pub is_critical: bool,
    pub medicines: Vec<MedicineRecord>,
}
