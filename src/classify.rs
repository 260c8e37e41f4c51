//! Article path classification.
//!
//! Every article lives at a fixed depth below the root marker:
//!
//! ```text
//! articles/<area>/<topic>/<lang>/<topic>.md
//! articles/digital-circuits/triggers/ru/triggers.md
//! ```
//!
//! The directory holding the language folders and the file's base name must
//! agree. A mismatch (`articles/x/triggers/ru/flipflops.md`) is a misfiled
//! article and is rejected so it never reaches the catalog.
//!
//! Paths that are not article candidates at all (wrong root, too shallow,
//! other extensions) are [`Classification::Ignored`] rather than rejected:
//! they may be unrelated project content and are not worth a warning.

use crate::config::IndexConfig;
use std::path::{Component, Path};
use thiserror::Error;

/// Number of path segments in a well-formed article path.
pub const ARTICLE_DEPTH: usize = 5;

/// The parts of the convention that are configurable.
#[derive(Debug, Clone, PartialEq)]
pub struct PathRules {
    pub root_marker: String,
    pub extension: String,
}

impl Default for PathRules {
    fn default() -> Self {
        Self::from_config(&IndexConfig::default())
    }
}

impl PathRules {
    pub fn from_config(config: &IndexConfig) -> Self {
        Self {
            root_marker: config.root_marker.clone(),
            extension: config.extension.clone(),
        }
    }
}

/// A path that follows the article convention.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticlePath {
    pub area: String,
    pub topic_dir: String,
    pub lang: String,
    pub filename: String,
    /// File name with the extension stripped; equals `topic_dir`.
    pub topic_name: String,
    /// The classified path joined with `/`, regardless of platform.
    pub rel_path: String,
}

/// Why an article candidate was turned away.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Rejection {
    #[error("directory '{topic_dir}' does not match file '{topic_name}'")]
    StructureMismatch {
        topic_dir: String,
        topic_name: String,
    },
    #[error("expected {expected} path segments, found {found}")]
    UnexpectedDepth { expected: usize, found: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Accepted(ArticlePath),
    Ignored,
    Rejected(Rejection),
}

/// Classify a path relative to the project root.
pub fn classify(rel_path: &Path, rules: &PathRules) -> Classification {
    let segments: Vec<String> = rel_path
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if segments.len() < ARTICLE_DEPTH || segments[0] != rules.root_marker {
        return Classification::Ignored;
    }

    let filename = &segments[segments.len() - 1];
    let Some(topic_name) = strip_extension(filename, &rules.extension) else {
        return Classification::Ignored;
    };

    if segments.len() > ARTICLE_DEPTH {
        return Classification::Rejected(Rejection::UnexpectedDepth {
            expected: ARTICLE_DEPTH,
            found: segments.len(),
        });
    }

    let topic_dir = &segments[2];
    if topic_dir != topic_name {
        return Classification::Rejected(Rejection::StructureMismatch {
            topic_dir: topic_dir.clone(),
            topic_name: topic_name.to_string(),
        });
    }

    Classification::Accepted(ArticlePath {
        area: segments[1].clone(),
        topic_dir: topic_dir.clone(),
        lang: segments[3].clone(),
        filename: filename.clone(),
        topic_name: topic_name.to_string(),
        rel_path: segments.join("/"),
    })
}

/// `"triggers.md"` with extension `"md"` → `Some("triggers")`.
fn strip_extension<'a>(filename: &'a str, extension: &str) -> Option<&'a str> {
    filename
        .strip_suffix(extension)
        .and_then(|rest| rest.strip_suffix('.'))
}
