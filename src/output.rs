//! CLI output formatting.
//!
//! Output is information-first: each article leads with its position and id,
//! each language variant with its title and where that title came from, and
//! source paths follow as indented context lines.
//!
//! ## Build / check
//!
//! ```text
//! Articles
//! 001 Arithmetic
//!     001 adders
//!         ru: Сумматоры (heading)
//!             Source: articles/arithmetic/adders/ru/adders.md
//! 002 Digital Circuits
//!     001 triggers
//!         en: Triggers (front matter)
//!             Source: articles/digital-circuits/triggers/en/triggers.md
//!
//! Skipped
//!     articles/digital-circuits/triggers/de/flipflops.md
//!         structure mismatch: directory 'triggers' does not match file 'flipflops'
//!
//! 2 articles from 2 files, 1 skipped
//! ```
//!
//! ## Emit
//!
//! ```text
//! Wrote
//!     _data/articles.json (412 bytes)
//!     assets/js/articles-data.js (530 bytes)
//! sha256 9f86d081884c7d65…
//! ```
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::catalog::{AcceptedFile, BuildOutput};
use crate::client::page::{MemoryPage, ids};
use crate::client::session::SessionState;
use crate::client::view::{format_area_name, group_by_area};
use crate::emit::EmitSummary;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

// ============================================================================
// Build / check
// ============================================================================

pub fn format_build_output(output: &BuildOutput) -> Vec<String> {
    let mut lines = Vec::new();
    let report = &output.report;

    if !output.catalog.is_empty() {
        lines.push("Articles".to_string());
        for (area_pos, group) in group_by_area(&output.catalog).iter().enumerate() {
            lines.push(format!(
                "{} {}",
                format_index(area_pos + 1),
                format_area_name(group.area)
            ));
            for (pos, article) in group.articles.iter().enumerate() {
                lines.push(format!("{}{} {}", indent(1), format_index(pos + 1), article.id));
                for lang in article.languages() {
                    let Some(file) = find_accepted(&report.accepted, &article.id, lang) else {
                        continue;
                    };
                    lines.push(format!(
                        "{}{}: {} ({})",
                        indent(2),
                        lang,
                        file.title.text,
                        file.title.source
                    ));
                    lines.push(format!("{}Source: {}", indent(3), file.rel_path));
                }
            }
        }
    }

    if !report.skipped.is_empty() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push("Skipped".to_string());
        for skipped in &report.skipped {
            lines.push(format!("{}{}", indent(1), skipped.rel_path));
            lines.push(format!("{}{}", indent(2), skipped.reason));
        }
    }

    if !lines.is_empty() {
        lines.push(String::new());
    }
    let mut summary = format!(
        "{} from {}",
        plural(output.catalog.len(), "article", "articles"),
        plural(report.accepted.len(), "file", "files")
    );
    if !report.skipped.is_empty() {
        summary.push_str(&format!(", {} skipped", report.skipped.len()));
    }
    lines.push(summary);
    lines
}

fn find_accepted<'a>(accepted: &'a [AcceptedFile], id: &str, lang: &str) -> Option<&'a AcceptedFile> {
    accepted.iter().find(|f| f.id == id && f.lang == lang)
}

pub fn print_build_output(output: &BuildOutput) {
    for line in format_build_output(output) {
        println!("{}", line);
    }
}

// ============================================================================
// Emit
// ============================================================================

/// Paths are shown relative to `root` when possible.
pub fn format_emit_output(summary: &EmitSummary, root: &Path) -> Vec<String> {
    let mut lines = vec!["Wrote".to_string()];
    for file in &summary.files {
        let shown = file.path.strip_prefix(root).unwrap_or(&file.path);
        lines.push(format!(
            "{}{} ({} bytes)",
            indent(1),
            shown.display(),
            file.bytes
        ));
    }
    lines.push(format!("sha256 {}", summary.digest));
    lines
}

pub fn print_emit_output(summary: &EmitSummary, root: &Path) {
    for line in format_emit_output(summary, root) {
        println!("{}", line);
    }
}

// ============================================================================
// Preview
// ============================================================================

/// What a reader would see after the session settled.
///
/// ```text
/// Title: Триггеры
/// Area: Digital Circuits
/// URL: ?article=triggers&lang=ru
/// State: loaded
///
/// <h1>Триггеры</h1>
/// ```
pub fn format_preview(state: &SessionState, page: &MemoryPage, query: &str) -> Vec<String> {
    let text = |id| page.html(id).unwrap_or_default();
    let state_line = match state {
        SessionState::Idle => "idle".to_string(),
        SessionState::Loading { id } => format!("loading {id}"),
        SessionState::Loaded { .. } => "loaded".to_string(),
        SessionState::Error { reason, .. } => format!("error: {reason}"),
    };

    let mut lines = vec![
        format!("Title: {}", text(ids::ARTICLE_TITLE)),
        text(ids::ARTICLE_AREA).to_string(),
        format!("URL: {}", if query.is_empty() { "(unchanged)" } else { query }),
        format!("State: {state_line}"),
        String::new(),
    ];
    lines.extend(text(ids::ARTICLE_CONTENT).lines().map(str::to_string));
    lines
}

pub fn print_preview(state: &SessionState, page: &MemoryPage, query: &str) {
    for line in format_preview(state, page, query) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
