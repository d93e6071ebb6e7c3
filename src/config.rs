//! Run configuration.
//!
//! Loaded from an optional TOML file (`coverage-docs.toml` in the working
//! directory, or the path given with `--config`). Every key is optional; a
//! missing file means stock defaults.
//!
//! ```toml
//! source = "src"          # Source tree of coverage descriptors
//! content = "content"     # Content root receiving counties/ and states/
//!
//! [scan]
//! extension = "json"      # Record file extension
//! exclude = []            # Extra directory or file names to skip
//!
//! [processing]
//! workers = 10            # Fixed worker pool size
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "coverage-docs.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Root of the source tree to scan.
    pub source: PathBuf,
    /// Content root; outputs land in `counties/` and `states/` below it.
    pub content: PathBuf,
    pub scan: ScanConfig,
    pub processing: ProcessingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: PathBuf::from("src"),
            content: PathBuf::from("content"),
            scan: ScanConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.processing.workers == 0 {
            return Err(ConfigError::Validation(
                "processing.workers must be at least 1".into(),
            ));
        }
        if self.scan.extension.trim_start_matches('.').is_empty() {
            return Err(ConfigError::Validation(
                "scan.extension must not be empty".into(),
            ));
        }
        if self.scan.exclude.iter().any(|e| e.is_empty()) {
            return Err(ConfigError::Validation(
                "scan.exclude entries must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Source discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Extension of record files, with or without the leading dot.
    pub extension: String,
    /// Directory or file names skipped on top of the built-in exclusions.
    pub exclude: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extension: "json".to_string(),
            exclude: Vec::new(),
        }
    }
}

/// Worker pool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Number of concurrent file workers. The work is I/O bound, so this is
    /// not capped at the core count.
    pub workers: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self { workers: 10 }
    }
}

/// Parse and validate config text.
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, or from [`DEFAULT_CONFIG_FILE`] in the working
/// directory when `path` is `None`.
///
/// An explicitly named file must exist; the default file is optional.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let (path, required) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };
    if !required && !path.exists() {
        return Ok(Config::default());
    }
    let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    parse_config(&content)
}

/// A documented config file with every option at its default.
pub fn stock_config_toml() -> &'static str {
    r#"# coverage-docs configuration
# All options are optional; defaults are shown.

# Source tree of per-state / per-county coverage descriptors.
source = "src"

# Content root. Generated files land in:
#   counties/<state>/<county>.md
#   states/<state>/data.json
#   states/<state>/README.md
content = "content"

[scan]
# Extension of record files.
extension = "json"
# Additional directory or file names to skip. Always skipped: services/,
# scripts/, _includes/, hidden entries, README.md, LICENSE*, CHANGELOG.md,
# 404.md, _data.yml, plugins.ts, _config.ts, deno.json, package.json,
# tsconfig.json.
exclude = []

[processing]
# Number of files processed concurrently.
workers = 10
"#
}
