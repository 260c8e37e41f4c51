//! Catalog emission.
//!
//! One catalog, three sinks:
//!
//! | Sink | Consumer | Shape |
//! |------|----------|-------|
//! | [`SiteData`] under `"articles"` | templating layer, in process | catalog as JSON value |
//! | `_data/articles.json` | templating layer, on disk | pretty-printed array |
//! | `assets/js/articles-data.js` | browser reader session | banner + `const ARTICLES = [...]` |
//!
//! Both files are overwritten unconditionally and their directories are
//! created when missing. Writes are not atomic.
//!
//! The JSON payload is identical in both files. Its SHA-256 is reported so two
//! builds can be compared at a glance.

use crate::config::IndexConfig;
use crate::types::Catalog;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Key the catalog is published under in [`SiteData`].
pub const SITE_DATA_KEY: &str = "articles";

#[derive(Error, Debug)]
pub enum EmitError {
    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// In-memory data handed to the page-rendering collaborator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteData {
    entries: BTreeMap<String, serde_json::Value>,
}

impl SiteData {
    pub fn insert(&mut self, key: &str, value: serde_json::Value) {
        self.entries.insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.entries.get(key)
    }
}

/// Where and how the catalog files are written.
#[derive(Debug, Clone, PartialEq)]
pub struct EmitTargets {
    pub data_file: PathBuf,
    pub script_file: PathBuf,
    pub global_name: String,
    /// Path convention reminder printed in the script banner.
    pub layout: String,
}

impl EmitTargets {
    pub fn from_config(root: &Path, config: &IndexConfig) -> Self {
        Self {
            data_file: root.join(&config.output.data_file),
            script_file: root.join(&config.output.script_file),
            global_name: config.output.global_name.clone(),
            layout: format!(
                "{}/<area>/<topic>/<lang>/<topic>.{}",
                config.root_marker, config.extension
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub bytes: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmitSummary {
    pub articles: usize,
    pub files: Vec<WrittenFile>,
    /// Hex SHA-256 of the JSON payload.
    pub digest: String,
}

/// Publish the catalog to the site data and write both files.
pub fn emit(
    catalog: &Catalog,
    targets: &EmitTargets,
    site_data: &mut SiteData,
) -> Result<EmitSummary, EmitError> {
    site_data.insert(SITE_DATA_KEY, serde_json::to_value(catalog)?);

    let json = render_json(catalog)?;
    let script = render_script(catalog, &targets.global_name, &targets.layout)?;

    let files = vec![
        write_file(&targets.data_file, &json)?,
        write_file(&targets.script_file, &script)?,
    ];

    Ok(EmitSummary {
        articles: catalog.len(),
        files,
        digest: catalog_digest(&json),
    })
}

/// The pretty-printed JSON array, newline-terminated.
pub fn render_json(catalog: &Catalog) -> Result<String, serde_json::Error> {
    let mut json = serde_json::to_string_pretty(catalog)?;
    json.push('\n');
    Ok(json)
}

/// The script file: banner comment, then the catalog bound to a constant.
pub fn render_script(
    catalog: &Catalog,
    global_name: &str,
    layout: &str,
) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string_pretty(catalog)?;
    Ok(format!(
        "// Generated by article-index. Do not edit by hand.\n\
         // Articles: {count}\n\
         // Layout: {layout}\n\
         const {global_name} = {json};\n",
        count = catalog.len(),
    ))
}

pub fn catalog_digest(json: &str) -> String {
    format!("{:x}", Sha256::digest(json.as_bytes()))
}

fn write_file(path: &Path, content: &str) -> Result<WrittenFile, EmitError> {
    let io_err = |source| EmitError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, content).map_err(io_err)?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "wrote catalog file");
    Ok(WrittenFile {
        path: path.to_path_buf(),
        bytes: content.len(),
    })
}
