//! Application configuration.
//!
//! Resolution order, lowest to highest priority:
//!
//! 1. Built-in defaults.
//! 2. The TOML config file: `--config`, else `$FLOWSCRIBE_CONFIG`, else
//!    `config/flowscribe.toml` (silently skipped when absent).
//! 3. Environment overrides: `FLOWSCRIBE_RULES`, `FLOWSCRIBE_FORMAT`,
//!    `FLOWSCRIBE_LOG`.
//! 4. Command-line flags, applied by each subcommand.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use flowscribe_docs::ExportFormat;

/// Default config file location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/flowscribe.toml";

/// Settings loaded from the config file and environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Extra rule table merged with (or replacing) the built-in one.
    pub rules_path: Option<PathBuf>,
    /// Merge `rules_path` into the built-in table instead of replacing it.
    pub extend_builtin: bool,
    /// Export format used when neither `--format` nor an output extension
    /// decides.
    pub default_format: ExportFormat,
    /// Report title.
    pub title: String,
    /// Truncate input descriptions to this many characters.
    pub max_input_chars: Option<usize>,
    /// Maximum diagram node label width.
    pub diagram_label_width: usize,
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rules_path: None,
            extend_builtin: true,
            default_format: ExportFormat::Text,
            title: "Generated Workflow".into(),
            max_input_chars: None,
            diagram_label_width: flowscribe_docs::diagram::DEFAULT_LABEL_WIDTH,
            log_level: "warn".into(),
        }
    }
}

impl AppConfig {
    /// Load the config file and apply environment overrides.
    ///
    /// An explicitly requested file must exist; the default location may be
    /// missing.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let from_env = std::env::var_os("FLOWSCRIBE_CONFIG").map(PathBuf::from);
        let (path, required) = match (explicit, from_env) {
            (Some(path), _) => (path.to_path_buf(), true),
            (None, Some(path)) => (path, true),
            (None, None) => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
        };

        let mut config = if path.exists() || required {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `FLOWSCRIBE_*` overrides read through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(rules) = lookup("FLOWSCRIBE_RULES").filter(|v| !v.trim().is_empty()) {
            self.rules_path = Some(PathBuf::from(rules));
        }
        if let Some(format) = lookup("FLOWSCRIBE_FORMAT").filter(|v| !v.trim().is_empty()) {
            self.default_format = format
                .parse::<ExportFormat>()
                .context("invalid FLOWSCRIBE_FORMAT")?;
        }
        if let Some(level) = lookup("FLOWSCRIBE_LOG").filter(|v| !v.trim().is_empty()) {
            self.log_level = level;
        }
        Ok(())
    }
}
