use symptom_triage_core::assemble::UNRECOGNIZED_MESSAGE;
use symptom_triage_core::{Catalog, Engine, MatchParams, Stage, UserContext};

fn engine() -> Engine {
    Engine::new(Catalog::builtin().unwrap(), MatchParams::default()).unwrap()
}

fn names(result: &symptom_triage_core::MatchResult) -> Vec<&str> {
    result.medicines.iter().map(|m| m.name.as_str()).collect()
}

#[test]
fn test_critical_keyword_wins_over_common_symptoms() {
    let engine = engine();
    for text in [
        "chest pain",
        "I have chest pain and a headache",
        "Runny nose, cough and SHORTNESS OF BREATH",
        "this is the worst headache of my life",
        "my father fainted this morning",
    ] {
        let result = engine.recommend(text, None);
        assert!(result.is_critical, "expected critical for {:?}", text);
        assert!(result.medicines.is_empty());
    }
}

#[test]
fn test_critical_recommendation_comes_from_first_matching_condition() {
    let engine = engine();
    let analysis = engine.analyze("chest pain and a seizure", None);
    let critical = analysis.critical.unwrap();
    assert_eq!(critical.condition, "Chest Pain");
    assert_eq!(critical.keyword, "chest pain");
    assert_eq!(
        analysis.result.recommendation,
        engine.catalog().get(7).unwrap().recommendation
    );
}

#[test]
fn test_critical_keyword_inside_longer_word_does_not_fire() {
    let engine = engine();

    let result = engine.recommend("I ate a chestnut", None);
    assert!(!result.is_critical);

    // "heart" is critical, "heartburn" is a stomach keyword.
    let analysis = engine.analyze("I have heartburn", None);
    assert!(!analysis.result.is_critical);
    assert_eq!(analysis.stage, Stage::Similarity);
    assert_eq!(analysis.matches[0].condition, "Stomach Pain");
}

#[test]
fn test_headache_and_fever_match_with_deduplicated_medicines() {
    let engine = engine();
    let analysis = engine.analyze("I have a headache and slight fever", None);

    let matched: Vec<&str> = analysis.matches.iter().map(|m| m.condition.as_str()).collect();
    assert!(matched.contains(&"Headache"));
    assert!(matched.contains(&"Fever"));
    assert_eq!(matched[0], "Headache");
    assert!(analysis
        .matches
        .windows(2)
        .all(|w| w[0].score >= w[1].score));

    let meds = names(&analysis.result);
    assert_eq!(
        meds.iter().filter(|n| **n == "Paracetamol (Acetaminophen)").count(),
        1
    );
    assert_eq!(meds.iter().filter(|n| **n == "Ibuprofen").count(), 1);
}

#[test]
fn test_allergies_context_removes_aspirin() {
    let engine = engine();
    assert!(names(&engine.recommend("I have a headache", None)).contains(&"Aspirin"));

    let mut ctx = UserContext {
        severity: Some(5),
        ..Default::default()
    };
    ctx.conditions.insert("Allergies".to_string());
    let result = engine.recommend("I have a headache", Some(&ctx));
    let meds = names(&result);
    assert!(!meds.contains(&"Aspirin"));
    assert!(meds.contains(&"Ibuprofen"));
    assert!(meds.contains(&"Paracetamol (Acetaminophen)"));
}

#[test]
fn test_high_severity_prioritises_ibuprofen() {
    let engine = engine();
    let ctx = UserContext {
        severity: Some(9),
        ..Default::default()
    };
    let result = engine.recommend("I have a headache", Some(&ctx));
    let ibuprofen = result
        .medicines
        .iter()
        .find(|m| m.name == "Ibuprofen")
        .unwrap();
    assert!(ibuprofen.description.starts_with("PRIORITY: "));
    assert!(!ibuprofen.description.starts_with("PRIORITY: PRIORITY: "));

    let paracetamol = &result.medicines[0];
    assert!(!paracetamol.description.starts_with("PRIORITY: "));
}

#[test]
fn test_repeated_refinement_never_double_prefixes() {
    let engine = engine();
    let ctx = UserContext {
        severity: Some(10),
        ..Default::default()
    };
    let first = engine.recommend("I have a headache", Some(&ctx));
    let second = engine.recommend("I have a headache", Some(&ctx));
    assert_eq!(first, second);
    // The catalog itself is never edited.
    let stored = &engine.catalog().get(1).unwrap().medicines[1];
    assert!(!stored.description.starts_with("PRIORITY"));
}

#[test]
fn test_unrecognized_symptoms() {
    let engine = engine();
    let result = engine.recommend("xyzzy plugh", None);
    assert_eq!(result.recommendation, UNRECOGNIZED_MESSAGE);
    assert!(!result.is_critical);
    assert!(result.medicines.is_empty());

    let result = engine.recommend("", None);
    assert_eq!(result.recommendation, UNRECOGNIZED_MESSAGE);
}

#[test]
fn test_recommend_is_idempotent() {
    let engine = engine();
    for text in ["I have a headache and slight fever", "back pain", "chest pain"] {
        assert_eq!(engine.recommend(text, None), engine.recommend(text, None));
    }
}

#[test]
fn test_three_matches_with_shared_medicines() {
    let engine = engine();
    let analysis = engine.analyze("back pain", None);
    let matched: Vec<&str> = analysis.matches.iter().map(|m| m.condition.as_str()).collect();
    assert_eq!(
        matched,
        vec!["Joint and Muscle Pain", "Stomach Pain", "Headache"]
    );
    assert_eq!(
        names(&analysis.result),
        vec![
            "Ibuprofen",
            "Diclofenac Gel",
            "Naproxen",
            "Omeprazole",
            "Antacid (Calcium Carbonate)",
            "Simethicone",
            "Paracetamol (Acetaminophen)",
            "Aspirin",
        ]
    );
}

#[test]
fn test_first_ranked_condition_supplies_shared_medicine() {
    let engine = engine();
    let result = engine.recommend("I have joint pain and a headache", None);
    let ibuprofen = result
        .medicines
        .iter()
        .find(|m| m.name == "Ibuprofen")
        .unwrap();
    assert_eq!(
        ibuprofen.description,
        "Reduces inflammation and pain in joints and muscles."
    );
}

#[test]
fn test_weak_match_contributes_advice_but_no_medicines() {
    let engine = engine();
    let analysis = engine.analyze("sneezing", None);
    assert_eq!(analysis.matches[0].condition, "Allergies");
    assert_eq!(analysis.matches[1].condition, "Common Cold");

    let cold = engine.catalog().get(3).unwrap();
    assert!(analysis.result.recommendation.ends_with(&cold.recommendation));
    let meds = names(&analysis.result);
    assert_eq!(meds, vec!["Cetirizine", "Loratadine", "Hydrocortisone Cream"]);
}

#[test]
fn test_scores_bounded_and_matches_never_critical() {
    let engine = engine();
    for text in [
        "I have a headache and slight fever",
        "runny nose and sneezing",
        "back pain",
        "stomach ache with bloating",
        "itchy skin rash",
        "hay fever",
        "my knee hurts",
    ] {
        let analysis = engine.analyze(text, None);
        assert!(analysis.matches.len() <= 3);
        for m in &analysis.matches {
            assert!((0.0..=1.0).contains(&m.score), "score {} out of range", m.score);
            assert!(!engine.catalog().get(m.id).unwrap().is_critical);
        }
    }
}

#[test]
fn test_context_without_rules_changes_nothing() {
    let engine = engine();
    let ctx = UserContext {
        duration: Some("More than a week".parse().unwrap()),
        severity: Some(3),
        medications: Some("metformin".into()),
        ..Default::default()
    };
    assert_eq!(
        engine.recommend("I have a headache", Some(&ctx)),
        engine.recommend("I have a headache", None)
    );
}

#[test]
fn test_catalog_without_common_conditions_cannot_build() {
    let json = r#"{"conditions": [{
        "id": 1, "condition": "Stroke", "keywords": ["face drooping"],
        "recommendation": "Call emergency services.", "is_critical": true
    }]}"#;
    let catalog = Catalog::from_json(json).unwrap();
    assert!(Engine::new(catalog, MatchParams::default()).is_err());
}
