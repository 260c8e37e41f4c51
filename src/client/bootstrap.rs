//! Recovering the catalog from the emitted script.
//!
//! A browser gets the catalog by evaluating `articles-data.js`. Outside a
//! browser we locate `const <NAME> =` and deserialize the JSON value that
//! follows it; the trailing `;` and anything after it are ignored.

use crate::types::Catalog;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("catalog global `{0}` is not defined; is the data script loaded?")]
    BootstrapMissing(String),
    #[error("catalog script is malformed: {0}")]
    MalformedCatalog(#[from] serde_json::Error),
    #[error("cannot read catalog script: {0}")]
    Io(#[from] std::io::Error),
}

/// Extract the catalog bound to `const <global_name>` in `script`.
pub fn parse_script_catalog(script: &str, global_name: &str) -> Result<Catalog, ClientError> {
    let value_start = find_binding(script, global_name)
        .ok_or_else(|| ClientError::BootstrapMissing(global_name.to_string()))?;
    let mut de = serde_json::Deserializer::from_str(&script[value_start..]);
    Ok(Catalog::deserialize(&mut de)?)
}

/// Read and parse a script file. A missing file yields `Ok(None)`.
pub fn load_script_catalog(path: &Path, global_name: &str) -> Result<Option<Catalog>, ClientError> {
    let script = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    match parse_script_catalog(&script, global_name) {
        Ok(catalog) => Ok(Some(catalog)),
        Err(ClientError::BootstrapMissing(_)) => Ok(None),
        Err(err) => Err(err),
    }
}

/// Byte offset just past `const NAME =`, whitespace skipped.
fn find_binding(script: &str, name: &str) -> Option<usize> {
    let needle = format!("const {name}");
    let is_ident = |c: char| c.is_alphanumeric() || c == '_' || c == '$';

    for (pos, _) in script.match_indices(&needle) {
        let before_ok = script[..pos].chars().next_back().is_none_or(|c| !is_ident(c));
        let after = &script[pos + needle.len()..];
        let rest = after.trim_start();
        if before_ok
            && !after.starts_with(is_ident)
            && let Some(value) = rest.strip_prefix('=')
        {
            let value_offset = script.len() - value.len();
            let skipped = value.len() - value.trim_start().len();
            return Some(value_offset + skipped);
        }
    }
    None
}
