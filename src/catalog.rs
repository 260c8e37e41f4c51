//! Catalog building.
//!
//! Walks `<root>/articles/`, classifies every file, resolves a title per
//! language variant, and merges variants of the same topic into one
//! [`ArticleRecord`]. The result is sorted by id, so the same input tree
//! always produces the same catalog.
//!
//! ## Failure model
//!
//! Problems with individual files never stop a build. Each file ends up as a
//! [`FileOutcome`]: either accepted into the catalog or skipped with a
//! [`SkipReason`]. Outcomes are collected into a [`BuildReport`] and skipped
//! files are logged as warnings.
//!
//! The only fatal error is a root directory that cannot be read at all. A root
//! without an `articles/` directory simply yields an empty catalog.
//!
//! ## Area conflicts
//!
//! A topic id must live under one area. When the same id shows up under a
//! second area, the first area seen wins and the conflicting file is skipped.
//! The walk is sorted by file name, so "first" is stable across runs.

use crate::classify::{Classification, PathRules, Rejection, classify};
use crate::config::IndexConfig;
use crate::title::{ResolvedTitle, resolve_title};
use crate::types::{ArticleRecord, Catalog};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("cannot read root directory {path}: {source}")]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a file was left out of the catalog.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkipReason {
    #[error("structure mismatch: {0}")]
    Rejected(#[from] Rejection),
    #[error("'{id}' already belongs to area '{kept_area}', found under '{found_area}'")]
    AreaConflict {
        id: String,
        kept_area: String,
        found_area: String,
    },
    #[error("could not process file: {0}")]
    FileProcessing(String),
}

/// A file that made it into the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedFile {
    pub rel_path: String,
    pub id: String,
    pub area: String,
    pub lang: String,
    pub title: ResolvedTitle,
}

/// A file that was left out, with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedFile {
    pub rel_path: String,
    pub reason: SkipReason,
}

/// Result of processing a single article candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    Accepted(AcceptedFile),
    Skipped(SkippedFile),
}

/// Per-file outcomes of one build, in walk order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    pub accepted: Vec<AcceptedFile>,
    pub skipped: Vec<SkippedFile>,
    /// Files under the root marker that are not article candidates.
    pub ignored: usize,
}

impl BuildReport {
    fn record(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Accepted(file) => self.accepted.push(file),
            FileOutcome::Skipped(file) => {
                tracing::warn!(path = %file.rel_path, reason = %file.reason, "skipping file");
                self.skipped.push(file);
            }
        }
    }

    pub fn has_warnings(&self) -> bool {
        !self.skipped.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildOutput {
    pub catalog: Catalog,
    pub report: BuildReport,
}

/// Build the catalog for the project at `root`.
pub fn build(root: &Path, config: &IndexConfig) -> Result<BuildOutput, BuildError> {
    fs::read_dir(root).map_err(|source| BuildError::RootUnreadable {
        path: root.to_path_buf(),
        source,
    })?;

    let articles_dir = root.join(&config.root_marker);
    if !articles_dir.is_dir() {
        tracing::info!(dir = %articles_dir.display(), "no article directory, catalog is empty");
        return Ok(BuildOutput::default());
    }

    let rules = PathRules::from_config(config);
    let mut records: BTreeMap<String, ArticleRecord> = BTreeMap::new();
    let mut report = BuildReport::default();

    let walker = WalkDir::new(&articles_dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let rel_path = err
                    .path()
                    .map(|p| relative_display(root, p))
                    .unwrap_or_else(|| config.root_marker.clone());
                report.record(FileOutcome::Skipped(SkippedFile {
                    rel_path,
                    reason: SkipReason::FileProcessing(err.to_string()),
                }));
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        match process_file(root, entry.path(), &rules, &mut records) {
            Some(outcome) => report.record(outcome),
            None => report.ignored += 1,
        }
    }

    let catalog = Catalog::from_records(records.into_values().collect());
    tracing::debug!(
        articles = catalog.len(),
        accepted = report.accepted.len(),
        skipped = report.skipped.len(),
        "catalog built"
    );
    Ok(BuildOutput { catalog, report })
}

/// Classify one file and fold it into `records`. `None` means the file is not
/// an article candidate.
fn process_file(
    root: &Path,
    path: &Path,
    rules: &PathRules,
    records: &mut BTreeMap<String, ArticleRecord>,
) -> Option<FileOutcome> {
    let rel = path.strip_prefix(root).unwrap_or(path);

    let article = match classify(rel, rules) {
        Classification::Ignored => return None,
        Classification::Rejected(rejection) => {
            return Some(FileOutcome::Skipped(SkippedFile {
                rel_path: relative_display(root, path),
                reason: rejection.into(),
            }));
        }
        Classification::Accepted(article) => article,
    };

    if let Some(existing) = records.get(&article.topic_name)
        && existing.area != article.area
    {
        return Some(FileOutcome::Skipped(SkippedFile {
            rel_path: article.rel_path,
            reason: SkipReason::AreaConflict {
                id: article.topic_name,
                kept_area: existing.area.clone(),
                found_area: article.area,
            },
        }));
    }

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            return Some(FileOutcome::Skipped(SkippedFile {
                rel_path: article.rel_path,
                reason: SkipReason::FileProcessing(err.to_string()),
            }));
        }
    };

    let title = resolve_title(&content, Some(&article.topic_name), path);

    let record = records
        .entry(article.topic_name.clone())
        .or_insert_with(|| ArticleRecord::new(&article.topic_name, &article.area));
    record
        .title
        .insert(article.lang.clone(), title.text.clone());
    record
        .file
        .insert(article.lang.clone(), format!("/{}", article.rel_path));

    Some(FileOutcome::Accepted(AcceptedFile {
        rel_path: article.rel_path,
        id: article.topic_name,
        area: article.area,
        lang: article.lang,
        title,
    }))
}

fn relative_display(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
