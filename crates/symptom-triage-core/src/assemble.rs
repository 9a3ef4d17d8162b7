//! Turns ranked matches and user context into a [`MatchResult`].
//!
//! Refinement is a pure function over a freshly built medicine list;
//! catalog records are cloned, never edited in place.

use crate::engine::MatchParams;
use crate::models::{MatchResult, MedicineRecord, UserContext};
use crate::similarity::ScoredCondition;

/// Advice returned when no condition clears the inclusion threshold.
pub const UNRECOGNIZED_MESSAGE: &str = "I couldn't identify your symptoms clearly. Please provide more details or consult a healthcare professional for proper diagnosis.";

/// Marker prepended to prioritised medicine descriptions.
pub const PRIORITY_PREFIX: &str = "PRIORITY: ";

/// Medicine-name fragment removed for users reporting allergies.
pub const ALLERGY_EXCLUDED_FRAGMENT: &str = "aspirin";

/// Medicine-name fragment prioritised for severe symptoms.
pub const SEVERE_PRIORITY_FRAGMENT: &str = "ibuprofen";

/// The fixed result for unrecognized symptoms.
pub fn unrecognized() -> MatchResult {
    MatchResult {
        recommendation: UNRECOGNIZED_MESSAGE.to_string(),
        is_critical: false,
        medicines: Vec::new(),
    }
}

/// Merge advice and medicines from `matches` (already ranked), then apply
/// context refinement when `context` is present.
pub fn assemble(
    matches: &[ScoredCondition<'_>],
    context: Option<&UserContext>,
    params: &MatchParams,
) -> MatchResult {
    if matches.is_empty() {
        return unrecognized();
    }

    let recommendation = matches
        .iter()
        .map(|m| m.condition.recommendation.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let medicines = aggregate_medicines(matches, params.medicine_threshold);
    let medicines = match context {
        Some(ctx) => refine(medicines, ctx, params),
        None => medicines,
    };

    MatchResult {
        recommendation,
        is_critical: false,
        medicines,
    }
}

/// Collect medicines from matches scoring above `threshold`, in ranked
/// order. The first medicine with a given name wins.
pub fn aggregate_medicines(
    matches: &[ScoredCondition<'_>],
    threshold: f64,
) -> Vec<MedicineRecord> {
    let mut out: Vec<MedicineRecord> = Vec::new();
    for m in matches.iter().filter(|m| m.score > threshold) {
        for medicine in &m.condition.medicines {
            if !out.iter().any(|existing| existing.name == medicine.name) {
                out.push(medicine.clone());
            }
        }
    }
    out
}

/// Apply the context rules to `medicines`, returning a new list:
///
/// - a pre-existing condition equal to `params.allergy_label` drops every
///   medicine whose name contains "aspirin" (case-insensitive);
/// - severity above `params.priority_severity` prefixes the description of
///   every medicine whose name contains "ibuprofen" with `PRIORITY: `.
///
/// `duration` and `medications` are accepted but have no effect.
pub fn refine(
    medicines: Vec<MedicineRecord>,
    context: &UserContext,
    params: &MatchParams,
) -> Vec<MedicineRecord> {
    let drop_aspirin = context.has_condition(&params.allergy_label);
    let prioritise = context.severity_or_zero() > params.priority_severity;

    medicines
        .into_iter()
        .filter(|m| !(drop_aspirin && name_contains(m, ALLERGY_EXCLUDED_FRAGMENT)))
        .map(|m| {
            if prioritise && name_contains(&m, SEVERE_PRIORITY_FRAGMENT) {
                MedicineRecord {
                    description: format!("{}{}", PRIORITY_PREFIX, m.description),
                    ..m
                }
            } else {
                m
            }
        })
        .collect()
}

fn name_contains(medicine: &MedicineRecord, fragment: &str) -> bool {
    medicine.name.to_lowercase().contains(fragment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConditionRecord;

    fn med(name: &str, description: &str) -> MedicineRecord {
        MedicineRecord {
            name: name.into(),
            dosage: "1 tablet".into(),
            description: description.into(),
            url: "https://example.org".into(),
        }
    }

    fn condition(id: u32, advice: &str, medicines: Vec<MedicineRecord>) -> ConditionRecord {
        ConditionRecord {
            id,
            condition: format!("C{}", id),
            keywords: vec!["x".into()],
            medicines,
            recommendation: advice.into(),
            is_critical: false,
        }
    }

    #[test]
    fn test_empty_matches_unrecognized() {
        let result = assemble(&[], None, &MatchParams::default());
        assert_eq!(result, unrecognized());
        assert!(!result.is_critical);
        assert!(result.medicines.is_empty());
    }

    #[test]
    fn test_advice_joined_in_rank_order() {
        let a = condition(1, "Rest.", vec![]);
        let b = condition(2, "Drink water.", vec![]);
        let matches = [
            ScoredCondition { condition: &b, score: 0.5 },
            ScoredCondition { condition: &a, score: 0.3 },
        ];
        let result = assemble(&matches, None, &MatchParams::default());
        assert_eq!(result.recommendation, "Drink water. Rest.");
    }

    #[test]
    fn test_medicines_deduplicated_first_wins() {
        let a = condition(1, "", vec![med("Ibuprofen", "first"), med("Naproxen", "")]);
        let b = condition(2, "", vec![med("Ibuprofen", "second"), med("Aspirin", "")]);
        let matches = [
            ScoredCondition { condition: &a, score: 0.6 },
            ScoredCondition { condition: &b, score: 0.4 },
        ];
        let meds = aggregate_medicines(&matches, 0.2);
        let names: Vec<&str> = meds.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Ibuprofen", "Naproxen", "Aspirin"]);
        assert_eq!(meds[0].description, "first");
    }

    #[test]
    fn test_borderline_match_contributes_advice_only() {
        let a = condition(1, "Strong.", vec![med("Cetirizine", "")]);
        let b = condition(2, "Weak.", vec![med("Pseudoephedrine", "")]);
        let matches = [
            ScoredCondition { condition: &a, score: 0.21 },
            ScoredCondition { condition: &b, score: 0.18 },
        ];
        let result = assemble(&matches, None, &MatchParams::default());
        assert_eq!(result.recommendation, "Strong. Weak.");
        assert_eq!(result.medicines.len(), 1);
        assert_eq!(result.medicines[0].name, "Cetirizine");
    }

    #[test]
    fn test_allergy_label_removes_aspirin() {
        let meds = vec![med("Aspirin", ""), med("Low-dose ASPIRIN", ""), med("Ibuprofen", "")];
        let mut ctx = UserContext::default();
        ctx.conditions.insert("Allergies".into());
        let refined = refine(meds, &ctx, &MatchParams::default());
        assert_eq!(refined.len(), 1);
        assert_eq!(refined[0].name, "Ibuprofen");
    }

    #[test]
    fn test_allergy_match_is_exact_label() {
        let meds = vec![med("Aspirin", "")];
        let mut ctx = UserContext::default();
        ctx.conditions.insert("allergies".into());
        ctx.conditions.insert("Seasonal Allergies".into());
        assert_eq!(refine(meds, &ctx, &MatchParams::default()).len(), 1);
    }

    #[test]
    fn test_high_severity_prefixes_ibuprofen() {
        let meds = vec![med("Ibuprofen", "Reduces pain."), med("Naproxen", "NSAID.")];
        let ctx = UserContext {
            severity: Some(8),
            ..Default::default()
        };
        let refined = refine(meds.clone(), &ctx, &MatchParams::default());
        assert_eq!(refined[0].description, "PRIORITY: Reduces pain.");
        assert_eq!(refined[1].description, "NSAID.");
        // Input records are untouched.
        assert_eq!(meds[0].description, "Reduces pain.");
    }

    #[test]
    fn test_severity_at_threshold_not_prioritised() {
        let meds = vec![med("Ibuprofen", "Reduces pain.")];
        let ctx = UserContext {
            severity: Some(7),
            ..Default::default()
        };
        let refined = refine(meds, &ctx, &MatchParams::default());
        assert_eq!(refined[0].description, "Reduces pain.");
    }
}
