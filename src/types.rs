//! Catalog types shared by the builder, the emitter and the reader session.
//!
//! The serialized shape is consumed outside this crate (templates, the browser
//! script), so field order and names are part of the external contract:
//! `id, title, file, area, topic`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Language code to value. Ordered so serialization is deterministic.
pub type LangMap = BTreeMap<String, String>;

/// One article, merged across all of its language variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// Topic name; unique across the catalog.
    pub id: String,
    /// Resolved title per language.
    pub title: LangMap,
    /// Root-relative source path per language, always `/`-prefixed.
    pub file: LangMap,
    /// Top-level subject grouping (first path segment below the root marker).
    pub area: String,
    /// Same as `id`.
    pub topic: String,
}

impl ArticleRecord {
    pub fn new(id: &str, area: &str) -> Self {
        Self {
            id: id.to_string(),
            title: LangMap::new(),
            file: LangMap::new(),
            area: area.to_string(),
            topic: id.to_string(),
        }
    }

    /// Title to show for `lang`: that language, then the default language,
    /// then the id.
    pub fn display_title<'a>(&'a self, lang: &str, default_lang: &str) -> &'a str {
        self.title
            .get(lang)
            .or_else(|| self.title.get(default_lang))
            .map(String::as_str)
            .unwrap_or(&self.id)
    }

    /// Languages this article has a source file for.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.file.keys().map(String::as_str)
    }
}

/// The full catalog, sorted by `id`.
///
/// Serializes transparently as a JSON array of records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    pub articles: Vec<ArticleRecord>,
}

impl Catalog {
    /// Build a catalog from records in any order; the result is sorted by id.
    pub fn from_records(mut articles: Vec<ArticleRecord>) -> Self {
        articles.sort_by(|a, b| a.id.cmp(&b.id));
        Self { articles }
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ArticleRecord> {
        self.articles.iter().find(|a| a.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ArticleRecord> {
        self.articles.iter()
    }
}
