//! # Symptom Triage CLI (`triage`)
//!
//! ## Usage
//!
//! ```bash
//! triage --config ./config/triage.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `triage check "<text>"` | Match symptoms and print advice and medicines |
//! | `triage conditions` | List the loaded condition catalog |
//! | `triage serve` | Start the HTTP JSON server |
//! | `triage completions <shell>` | Print shell completions |
//!
//! ## Examples
//!
//! ```bash
//! # Plain check
//! triage check "runny nose and sneezing"
//!
//! # With context: allergies drop aspirin, severity > 7 prioritises ibuprofen
//! triage check "I have a headache" --condition Allergies --severity 9
//!
//! # Machine-readable output with the scoring trace
//! triage check "back pain" --json --explain
//! ```

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::collections::BTreeSet;
use std::path::PathBuf;

use symptom_triage::check::{self, CheckRequest};
use symptom_triage::conditions::{self, ConditionFilter};
use symptom_triage::config::{self, DEFAULT_CONFIG_PATH};
use symptom_triage::{logging, server};
use symptom_triage_core::{SymptomDuration, UserContext};

/// Symptom Triage: critical-condition detection and OTC medicine
/// suggestions from a free-text symptom description.
///
/// Not a diagnostic tool. Always consult a healthcare professional.
#[derive(Parser)]
#[command(name = "triage", version, about)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Built-in defaults apply when the default path does not exist.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Enable debug logging on stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a symptom description.
    ///
    /// Critical keywords (e.g. "chest pain") short-circuit into an
    /// urgent-care message. Otherwise the best-matching common conditions
    /// are combined into advice and a deduplicated medicine list.
    Check {
        /// Free-text description of the symptoms.
        symptoms: String,

        /// How long the symptoms have lasted: "Less than 24 hours",
        /// "1-3 days", "4-7 days", "More than a week" (or lt-24h, 1-3d, 4-7d, gt-1w).
        #[arg(long)]
        duration: Option<SymptomDuration>,

        /// Severity on a scale of 1 to 10.
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
        severity: Option<u8>,

        /// Pre-existing condition (repeatable), e.g. `--condition Allergies`.
        #[arg(long = "condition")]
        conditions: Vec<String>,

        /// Medications currently taken.
        #[arg(long)]
        medications: Option<String>,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,

        /// Include the matching trace (stage, keyword, scores).
        #[arg(long)]
        explain: bool,
    },

    /// List the condition catalog.
    Conditions {
        /// Only critical conditions.
        #[arg(long, conflicts_with = "non_critical")]
        critical: bool,

        /// Only non-critical conditions.
        #[arg(long)]
        non_critical: bool,
    },

    /// Start the HTTP JSON server on `[server].bind`.
    Serve,

    /// Print shell completions to stdout.
    Completions {
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    if let Commands::Completions { shell } = &cli.command {
        clap_complete::generate(*shell, &mut Cli::command(), "triage", &mut std::io::stdout());
        return Ok(());
    }

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Check {
            symptoms,
            duration,
            severity,
            conditions,
            medications,
            json,
            explain,
        } => {
            let has_context = duration.is_some()
                || severity.is_some()
                || !conditions.is_empty()
                || medications.is_some();
            let context = has_context.then(|| UserContext {
                duration,
                severity,
                conditions: conditions.into_iter().collect::<BTreeSet<_>>(),
                medications,
            });
            let req = CheckRequest {
                symptoms,
                context,
                explain,
            };
            check::run_check(&cfg, &req, json)?;
        }
        Commands::Conditions {
            critical,
            non_critical,
        } => {
            let filter = if critical {
                ConditionFilter::Critical
            } else if non_critical {
                ConditionFilter::NonCritical
            } else {
                ConditionFilter::All
            };
            conditions::list_conditions(&cfg, filter)?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Completions { .. } => {
            // Handled above (before config loading)
            unreachable!()
        }
    }

    Ok(())
}
