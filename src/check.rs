//! Symptom checking.
//!
//! Validates a request, runs it through the engine, and formats the
//! answer. Used by both the `triage check` CLI command and the
//! `POST /recommend` HTTP endpoint.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use symptom_triage_core::{Analysis, Engine, MatchResult, UserContext};

use crate::config::Config;

/// Shown before every human-readable answer.
pub const DISCLAIMER: &str = "Medical disclaimer: this tool is for informational purposes only and is not a substitute for professional medical advice, diagnosis, or treatment. Always seek the advice of a qualified health provider.";

/// Input for one symptom check.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckRequest {
    pub symptoms: String,
    #[serde(default)]
    pub context: Option<UserContext>,
    #[serde(default)]
    pub explain: bool,
}

/// Output of one symptom check. `analysis` is present when requested.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResponse {
    #[serde(flatten)]
    pub result: MatchResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Analysis>,
}

/// Reject blank symptom text and severities outside 1..=10.
pub fn validate_request(req: &CheckRequest) -> Result<()> {
    if req.symptoms.trim().is_empty() {
        bail!("symptoms must not be empty. Please describe your symptoms.");
    }
    if let Some(severity) = req.context.as_ref().and_then(|c| c.severity) {
        if !(1..=10).contains(&severity) {
            bail!("severity must be between 1 and 10, got {}", severity);
        }
    }
    Ok(())
}

/// Core check function returning structured data (used by CLI and server).
pub fn check_symptoms(engine: &Engine, req: &CheckRequest) -> Result<CheckResponse> {
    validate_request(req)?;

    let analysis = engine.analyze(&req.symptoms, req.context.as_ref());
    tracing::debug!(stage = ?analysis.stage, matches = analysis.matches.len(), "check complete");

    Ok(CheckResponse {
        result: analysis.result.clone(),
        analysis: req.explain.then_some(analysis),
    })
}

/// CLI entry point for `triage check`.
pub fn run_check(config: &Config, req: &CheckRequest, json: bool) -> Result<()> {
    validate_request(req)?;
    let engine = crate::catalog::build_engine(config)?;
    let response = check_symptoms(&engine, req)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print!("{}", render_text(&response));
    }
    Ok(())
}

/// Human-readable rendering of a check response.
pub fn render_text(response: &CheckResponse) -> String {
    let mut out = String::new();
    out.push_str(DISCLAIMER);
    out.push_str("\n\n");

    let result = &response.result;
    if result.is_critical {
        out.push_str("!! MEDICAL ATTENTION RECOMMENDED !!\n");
        out.push_str(&result.recommendation);
        out.push('\n');
    } else {
        out.push_str(&format!("Analysis: {}\n", result.recommendation));
        if !result.medicines.is_empty() {
            out.push_str("\nRecommended medicines:\n");
            for m in &result.medicines {
                out.push_str(&format!("\n  {}\n", m.name));
                out.push_str(&format!("    Dosage: {}\n", m.dosage));
                out.push_str(&format!("    {}\n", m.description));
                out.push_str(&format!("    More info: {}\n", m.url));
            }
        }
    }

    if let Some(analysis) = &response.analysis {
        out.push_str(&format!("\nstage: {:?}\n", analysis.stage));
        if let Some(c) = &analysis.critical {
            out.push_str(&format!(
                "critical: {} (keyword \"{}\")\n",
                c.condition, c.keyword
            ));
        }
        for m in &analysis.matches {
            out.push_str(&format!("match: {:<24} score={:.4}\n", m.condition, m.score));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use symptom_triage_core::{Catalog, MatchParams};

    fn engine() -> Engine {
        Engine::new(Catalog::builtin().unwrap(), MatchParams::default()).unwrap()
    }

    fn request(symptoms: &str) -> CheckRequest {
        CheckRequest {
            symptoms: symptoms.to_string(),
            context: None,
            explain: false,
        }
    }

    #[test]
    fn test_blank_symptoms_rejected() {
        let err = check_symptoms(&engine(), &request("   ")).unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn test_severity_out_of_range_rejected() {
        let mut req = request("headache");
        req.context = Some(UserContext {
            severity: Some(11),
            ..Default::default()
        });
        assert!(check_symptoms(&engine(), &req).is_err());
    }

    #[test]
    fn test_explain_attaches_analysis() {
        let mut req = request("I have a headache");
        assert!(check_symptoms(&engine(), &req).unwrap().analysis.is_none());

        req.explain = true;
        let response = check_symptoms(&engine(), &req).unwrap();
        let analysis = response.analysis.unwrap();
        assert_eq!(analysis.matches[0].condition, "Headache");
    }

    #[test]
    fn test_render_critical_and_medicines() {
        let engine = engine();
        let critical = check_symptoms(&engine, &request("chest pain")).unwrap();
        let text = render_text(&critical);
        assert!(text.starts_with(DISCLAIMER));
        assert!(text.contains("MEDICAL ATTENTION RECOMMENDED"));
        assert!(!text.contains("Recommended medicines"));

        let common = check_symptoms(&engine, &request("I have a headache")).unwrap();
        let text = render_text(&common);
        assert!(text.contains("Recommended medicines"));
        assert!(text.contains("Dosage: 200-400mg every 4-6 hours as needed"));
    }

    #[test]
    fn test_response_serializes_flat() {
        let response = check_symptoms(&engine(), &request("xyzzy plugh")).unwrap();
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["is_critical"], false);
        assert!(value["medicines"].as_array().unwrap().is_empty());
        assert!(value.get("analysis").is_none());
    }
}
