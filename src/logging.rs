//! Tracing subscriber setup for the `triage` binary.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a stderr fmt subscriber. `RUST_LOG` overrides the default
/// `symptom_triage=info` directive; `verbose` raises both crates to debug.
pub fn init(verbose: bool) -> anyhow::Result<()> {
    let default = if verbose {
        "symptom_triage=debug,symptom_triage_core=debug"
    } else {
        "symptom_triage=info,symptom_triage_core=warn"
    };
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default)?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;
    Ok(())
}
