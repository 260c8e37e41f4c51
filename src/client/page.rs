//! The document seam.
//!
//! The reader session never touches a real DOM. It talks to a [`Page`], which
//! a browser host backs with `getElementById` and `history.pushState`, and
//! which [`MemoryPage`] backs with plain maps for previews and tests.

use super::location::HistoryState;
use std::collections::BTreeMap;

/// Element ids of the reader markup.
pub mod ids {
    pub const ARTICLES_LIST: &str = "articles-list";
    pub const ARTICLE_TITLE: &str = "article-title";
    pub const ARTICLE_AREA: &str = "article-area";
    pub const ARTICLE_CONTENT: &str = "article-content";
    /// Optional language `<select>`.
    pub const LANGUAGE_SELECT: &str = "language";
}

/// Writes the reader performs against the host document.
///
/// Element setters return `false` when no element has the given id.
pub trait Page {
    /// Replace an element's inner HTML.
    fn set_html(&mut self, id: &str, html: &str) -> bool;
    /// Replace an element's text content.
    fn set_text(&mut self, id: &str, text: &str) -> bool;
    /// Set a form control's value.
    fn set_value(&mut self, id: &str, value: &str) -> bool;
    /// Highlight the card of `article_id` and clear every other card.
    fn mark_selected(&mut self, article_id: &str);
    /// Append a history entry without reloading. `query` includes the `?`.
    fn push_history(&mut self, state: &HistoryState, query: &str);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub content: String,
    /// How many times the element was written to.
    pub writes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub state: HistoryState,
    pub query: String,
}

/// In-memory page holding element contents and the history stack.
#[derive(Debug, Clone, Default)]
pub struct MemoryPage {
    elements: BTreeMap<String, Element>,
    pub history: Vec<HistoryEntry>,
    pub selected: Option<String>,
}

impl MemoryPage {
    /// A page with every element the reader markup defines.
    pub fn standard() -> Self {
        Self::with_elements(&[
            ids::ARTICLES_LIST,
            ids::ARTICLE_TITLE,
            ids::ARTICLE_AREA,
            ids::ARTICLE_CONTENT,
            ids::LANGUAGE_SELECT,
        ])
    }

    pub fn with_elements(element_ids: &[&str]) -> Self {
        Self {
            elements: element_ids
                .iter()
                .map(|id| (id.to_string(), Element::default()))
                .collect(),
            ..Self::default()
        }
    }

    /// Current content of an element, `None` if the page lacks it.
    pub fn html(&self, id: &str) -> Option<&str> {
        self.elements.get(id).map(|e| e.content.as_str())
    }

    pub fn writes(&self, id: &str) -> usize {
        self.elements.get(id).map_or(0, |e| e.writes)
    }

    fn write(&mut self, id: &str, content: &str) -> bool {
        match self.elements.get_mut(id) {
            Some(element) => {
                element.content = content.to_string();
                element.writes += 1;
                true
            }
            None => false,
        }
    }
}

impl Page for MemoryPage {
    fn set_html(&mut self, id: &str, html: &str) -> bool {
        self.write(id, html)
    }

    fn set_text(&mut self, id: &str, text: &str) -> bool {
        self.write(id, text)
    }

    fn set_value(&mut self, id: &str, value: &str) -> bool {
        self.write(id, value)
    }

    fn mark_selected(&mut self, article_id: &str) {
        self.selected = Some(article_id.to_string());
    }

    fn push_history(&mut self, state: &HistoryState, query: &str) {
        self.history.push(HistoryEntry {
            state: state.clone(),
            query: query.to_string(),
        });
    }
}
