//! Index configuration.
//!
//! Loads and validates `article-index.toml` from the project root. Every key
//! is optional and falls back to its default through `#[serde(default)]`.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! root_marker = "articles"   # Top-level directory holding the article tree
//! extension = "md"           # Article file extension (without the dot)
//! default_lang = "ru"        # Language shown when a title is missing
//!
//! [output]
//! data_file = "_data/articles.json"
//! script_file = "assets/js/articles-data.js"
//! global_name = "ARTICLES"   # Constant declared in the script file
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the project root.
pub const CONFIG_FILENAME: &str = "article-index.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Index configuration loaded from `article-index.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfig {
    /// First path segment of every article path.
    pub root_marker: String,
    /// Article file extension, without the leading dot.
    pub extension: String,
    /// Language used for title fallback and as the session's initial language.
    pub default_lang: String,
    /// Where the emitted catalog files go.
    pub output: OutputConfig,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            root_marker: "articles".to_string(),
            extension: "md".to_string(),
            default_lang: "ru".to_string(),
            output: OutputConfig::default(),
        }
    }
}

/// Emission targets, relative to the project root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Pretty-printed JSON catalog for the templating layer.
    pub data_file: String,
    /// Script file declaring the catalog as a global constant.
    pub script_file: String,
    /// Name of the constant declared in `script_file`.
    pub global_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_file: "_data/articles.json".to_string(),
            script_file: "assets/js/articles-data.js".to_string(),
            global_name: "ARTICLES".to_string(),
        }
    }
}

impl IndexConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("root_marker", &self.root_marker),
            ("extension", &self.extension),
            ("default_lang", &self.default_lang),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        if self.root_marker.contains('/') {
            return Err(ConfigError::Validation(
                "root_marker must be a single path segment".into(),
            ));
        }
        if self.extension.starts_with('.') {
            return Err(ConfigError::Validation(
                "extension must not start with a dot".into(),
            ));
        }
        for (key, value) in [
            ("output.data_file", &self.output.data_file),
            ("output.script_file", &self.output.script_file),
        ] {
            if value.is_empty() || Path::new(value).is_absolute() {
                return Err(ConfigError::Validation(format!(
                    "{key} must be a relative path"
                )));
            }
        }
        if !is_js_identifier(&self.output.global_name) {
            return Err(ConfigError::Validation(
                "output.global_name must be a valid JavaScript identifier".into(),
            ));
        }
        Ok(())
    }
}

fn is_js_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Parse a sparse config file. Missing keys and tables take their defaults.
pub fn parse_config(content: &str) -> Result<IndexConfig, ConfigError> {
    let config: IndexConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load `article-index.toml` from the project root. No file means defaults.
pub fn load_config(root: &Path) -> Result<IndexConfig, ConfigError> {
    match fs::read_to_string(root.join(CONFIG_FILENAME)) {
        Ok(content) => parse_config(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(IndexConfig::default()),
        Err(e) => Err(e.into()),
    }
}

/// Returns a fully-commented stock `article-index.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# article-index configuration
# ===========================
# All settings are optional. Values shown below are the defaults.
# Place this file in the project root as article-index.toml.
# Unknown keys will cause an error.

# Top-level directory of the article tree. Articles live at
#   <root_marker>/<area>/<topic>/<lang>/<topic>.<extension>
root_marker = "articles"

# Article file extension, without the dot.
extension = "md"

# Language used when an article has no title in the requested language,
# and the language a reader session starts in.
default_lang = "ru"

# ---------------------------------------------------------------------------
# Emitted catalog files (relative to the project root)
# ---------------------------------------------------------------------------
[output]
# Pretty-printed JSON array for the templating layer.
data_file = "_data/articles.json"

# Script file for direct inclusion in pages.
script_file = "assets/js/articles-data.js"

# Name of the global constant declared in script_file.
global_name = "ARTICLES"
"##
}
