//! Catalog loading and engine construction.
//!
//! The core only understands an in-memory catalog. This module decides
//! where it comes from: the file named by `[catalog].path` (JSON or TOML,
//! chosen by extension) or the catalog bundled with the core crate.

use anyhow::{bail, Context, Result};
use std::path::Path;
use symptom_triage_core::catalog::CatalogDocument;
use symptom_triage_core::{Catalog, Engine};

use crate::config::Config;

/// Load the configured catalog, falling back to the built-in one.
pub fn load_catalog(config: &Config) -> Result<Catalog> {
    match &config.catalog.path {
        Some(path) => load_catalog_file(path),
        None => {
            tracing::info!("using built-in condition catalog");
            Catalog::builtin().context("Built-in catalog is invalid")
        }
    }
}

/// Parse a catalog document from disk.
pub fn load_catalog_file(path: &Path) -> Result<Catalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;

    let catalog = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Catalog::from_json(&content)
            .with_context(|| format!("Invalid catalog: {}", path.display()))?,
        Some("toml") => {
            let doc: CatalogDocument = toml::from_str(&content)
                .with_context(|| format!("Failed to parse catalog: {}", path.display()))?;
            Catalog::new(doc.conditions)
                .with_context(|| format!("Invalid catalog: {}", path.display()))?
        }
        _ => bail!(
            "Unsupported catalog format: {}. Use a .json or .toml file.",
            path.display()
        ),
    };

    tracing::info!(
        path = %path.display(),
        conditions = catalog.len(),
        "loaded condition catalog"
    );
    Ok(catalog)
}

/// Load the catalog and build the matching engine. Any failure here
/// keeps the application from serving requests.
pub fn build_engine(config: &Config) -> Result<Engine> {
    let catalog = load_catalog(config)?;
    Engine::new(catalog, config.matching.clone()).context("Failed to build matching engine")
}
