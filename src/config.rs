use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use symptom_triage_core::MatchParams;

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "./config/triage.toml";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub matching: MatchParams,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CatalogConfig {
    /// Catalog document (`.json` or `.toml`). Built-in catalog when absent.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8484".to_string()
}

/// Load and validate the config at `path`.
///
/// A missing file at [`DEFAULT_CONFIG_PATH`] yields the defaults; any other
/// missing path is an error. Relative catalog paths resolve against the
/// config file's directory.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() && path == Path::new(DEFAULT_CONFIG_PATH) {
        tracing::debug!("no config at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let mut config: Config =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if let Some(catalog_path) = &config.catalog.path {
        if catalog_path.is_relative() {
            if let Some(dir) = path.parent() {
                config.catalog.path = Some(dir.join(catalog_path));
            }
        }
    }

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    let m = &config.matching;

    if !(0.0..=1.0).contains(&m.inclusion_threshold) {
        anyhow::bail!("matching.inclusion_threshold must be in [0.0, 1.0]");
    }
    if !(0.0..=1.0).contains(&m.medicine_threshold) {
        anyhow::bail!("matching.medicine_threshold must be in [0.0, 1.0]");
    }
    if m.max_matches < 1 {
        anyhow::bail!("matching.max_matches must be >= 1");
    }
    if m.max_features < 1 {
        anyhow::bail!("matching.max_features must be >= 1");
    }
    if m.allergy_label.trim().is_empty() {
        anyhow::bail!("matching.allergy_label must not be empty");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("triage.toml");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = load_config(&write_config(&dir, "")).unwrap();
        assert_eq!(cfg.matching, MatchParams::default());
        assert_eq!(cfg.server.bind, "127.0.0.1:8484");
        assert!(cfg.catalog.path.is_none());
    }

    #[test]
    fn test_overrides_and_relative_catalog_path() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
[catalog]
path = "conditions.json"

[matching]
max_matches = 2
allergy_label = "Drug allergy"

[server]
bind = "0.0.0.0:9000"
"#,
        );
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.matching.max_matches, 2);
        assert_eq!(cfg.matching.allergy_label, "Drug allergy");
        assert_eq!(cfg.matching.medicine_threshold, 0.2);
        assert_eq!(cfg.server.bind, "0.0.0.0:9000");
        assert_eq!(cfg.catalog.path, Some(dir.path().join("conditions.json")));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = TempDir::new().unwrap();
        for body in [
            "[matching]\ninclusion_threshold = 1.5",
            "[matching]\nmax_matches = 0",
            "[matching]\nallergy_label = \"  \"",
        ] {
            assert!(load_config(&write_config(&dir, body)).is_err(), "{}", body);
        }
    }

    #[test]
    fn test_missing_explicit_path_is_error() {
        let dir = TempDir::new().unwrap();
        assert!(load_config(&dir.path().join("nope.toml")).is_err());
    }
}
