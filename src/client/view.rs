//! Article list markup.
//!
//! Rendering is a pure function of `(catalog, lang, selected)`: the whole
//! `articles-list` container is replaced on every call, so rendering twice
//! with the same inputs leaves the page unchanged.
//!
//! ```text
//! div.area-section
//! ├── h3.area-title          "Digital Circuits"
//! └── div.articles-grid
//!     └── div.article-card[data-id]
//!         ├── h4             title in lang → default lang → id
//!         ├── button.read-btn[data-action=read][data-article]
//!         └── div.lang-badges
//!             └── span.lang-badge.<lang>   "EN"
//! ```

use super::page::{Page, ids};
use crate::types::{ArticleRecord, Catalog};
use maud::{Markup, html};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error("element #{0} not found")]
    MissingContainer(&'static str),
}

/// Articles sharing one area, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaGroup<'a> {
    pub area: &'a str,
    pub articles: Vec<&'a ArticleRecord>,
}

/// Group records by area. Groups appear in the order their area is first seen.
pub fn group_by_area(catalog: &Catalog) -> Vec<AreaGroup<'_>> {
    let mut groups: Vec<AreaGroup<'_>> = Vec::new();
    for article in catalog.iter() {
        match groups.iter_mut().find(|g| g.area == article.area) {
            Some(group) => group.articles.push(article),
            None => groups.push(AreaGroup {
                area: &article.area,
                articles: vec![article],
            }),
        }
    }
    groups
}

/// `"digital-circuits"` → `"Digital Circuits"`. Only first letters change.
pub fn format_area_name(area: &str) -> String {
    area.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone)]
pub struct CatalogView {
    default_lang: String,
}

impl CatalogView {
    pub fn new(default_lang: &str) -> Self {
        Self {
            default_lang: default_lang.to_string(),
        }
    }

    pub fn render_markup(&self, catalog: &Catalog, lang: &str, selected: Option<&str>) -> Markup {
        html! {
            @for group in group_by_area(catalog) {
                div.area-section {
                    h3.area-title { (format_area_name(group.area)) }
                    div.articles-grid {
                        @for article in &group.articles {
                            (self.render_card(article, lang, selected == Some(article.id.as_str())))
                        }
                    }
                }
            }
        }
    }

    fn render_card(&self, article: &ArticleRecord, lang: &str, is_selected: bool) -> Markup {
        html! {
            div.article-card.selected[is_selected] data-id=(article.id) {
                h4 { (article.display_title(lang, &self.default_lang)) }
                button.read-btn type="button" data-action="read" data-article=(article.id) {
                    "Read"
                }
                div.lang-badges {
                    @for code in article.languages() {
                        span class={ "lang-badge " (code) } { (code.to_uppercase()) }
                    }
                }
            }
        }
    }

    /// Replace the list container with the rendered catalog.
    pub fn render(
        &self,
        page: &mut dyn Page,
        catalog: &Catalog,
        lang: &str,
        selected: Option<&str>,
    ) -> Result<(), ViewError> {
        let markup = self.render_markup(catalog, lang, selected);
        if page.set_html(ids::ARTICLES_LIST, &markup.into_string()) {
            Ok(())
        } else {
            tracing::error!(container = ids::ARTICLES_LIST, "article list container not found");
            Err(ViewError::MissingContainer(ids::ARTICLES_LIST))
        }
    }
}

/// Content panel while an article is being fetched.
pub fn render_loading() -> Markup {
    html! {
        div.loading { "Loading article…" }
    }
}

/// Content panel after a failed fetch. The retry control re-requests `id`.
pub fn render_error(reason: &str, id: &str) -> Markup {
    html! {
        div.error {
            h3 { "Failed to load" }
            p { (reason) }
            button.retry-btn type="button" data-action="retry" data-article=(id) { "Retry" }
        }
    }
}
