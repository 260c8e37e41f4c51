//! Article title resolution.
//!
//! Each article file yields exactly one title, taken from the first source
//! that produces a non-empty value:
//!
//! 1. **Heading**: the first `# Title` line of the body.
//! 2. **Front matter**: a `title` key in a leading YAML block.
//! 3. **Fallback label**: the topic name, formatted for display.
//! 4. **File name**: the file's base name, formatted the same way.
//!
//! ```text
//! "# Hello World\n"                 → "Hello World"   (Heading)
//! "---\ntitle: Foo\n---\nbody"      → "Foo"           (FrontMatter)
//! "no heading", fallback "flip-flop" → "Flip Flop"     (Fallback)
//! ```
//!
//! Resolution never fails. Malformed front matter is logged at debug level
//! and the chain moves on.

use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Which step of the chain produced a title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleSource {
    Heading,
    FrontMatter,
    Fallback,
    FileName,
}

impl fmt::Display for TitleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TitleSource::Heading => "heading",
            TitleSource::FrontMatter => "front matter",
            TitleSource::Fallback => "topic name",
            TitleSource::FileName => "file name",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTitle {
    pub text: String,
    pub source: TitleSource,
}

/// Resolve the display title for one article file.
///
/// `fallback` is normally the topic name; `path` supplies the base name for
/// the last resort.
pub fn resolve_title(content: &str, fallback: Option<&str>, path: &Path) -> ResolvedTitle {
    let (front_matter, body) = split_front_matter(content);

    if let Some(text) = first_heading(body) {
        return ResolvedTitle {
            text,
            source: TitleSource::Heading,
        };
    }

    if let Some(text) = front_matter.and_then(front_matter_title) {
        return ResolvedTitle {
            text,
            source: TitleSource::FrontMatter,
        };
    }

    if let Some(label) = fallback.filter(|l| !l.trim().is_empty()) {
        return ResolvedTitle {
            text: format_title(label),
            source: TitleSource::Fallback,
        };
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    ResolvedTitle {
        text: format_title(&stem),
        source: TitleSource::FileName,
    }
}

/// Turn a slug-like label into a display title.
///
/// `-` and `_` become spaces; every word gets an upper-case first letter and
/// lower-case rest. `"flip-flop"` → `"Flip Flop"`, `"триггеры"` → `"Триггеры"`.
pub fn format_title(label: &str) -> String {
    label
        .replace(['-', '_'], " ")
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Split a leading `---` delimited block off the content.
///
/// Returns `(Some(yaml), body)` when the content opens with a marker line and
/// a closing marker line follows; otherwise `(None, content)`.
pub(crate) fn split_front_matter(content: &str) -> (Option<&str>, &str) {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let Some((first, rest)) = content.split_once('\n') else {
        return (None, content);
    };
    if first.trim_end() != "---" {
        return (None, content);
    }

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let yaml = rest[..offset].trim_end_matches(['\r', '\n']);
            let body = &rest[offset + line.len()..];
            return (Some(yaml), body);
        }
        offset += line.len();
    }
    (None, content)
}

/// First `# Title` line with non-empty text. `## Sub` and `#tag` do not count.
fn first_heading(body: &str) -> Option<String> {
    body.lines().find_map(|line| {
        let rest = line.strip_prefix('#')?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let text = rest.trim();
        (!text.is_empty()).then(|| text.to_string())
    })
}

fn front_matter_title(yaml: &str) -> Option<String> {
    let value: serde_yaml::Value = match serde_yaml::from_str(yaml) {
        Ok(v) => v,
        Err(err) => {
            tracing::debug!(%err, "front matter is not valid YAML, ignoring");
            return None;
        }
    };
    let title = match value.get("title")? {
        serde_yaml::Value::String(s) => s.trim().to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!title.is_empty()).then_some(title)
}
