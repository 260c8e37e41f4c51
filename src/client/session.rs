//! The reader session state machine.
//!
//! ```text
//!            select / retry / switch_language
//!   Idle ───────────────────────────────► Loading ──ok──► Loaded
//!     ▲                                     │  ▲             │
//!     │                                     │  └─── select ──┘
//!     │                                   error
//!     │                                     ▼
//!     └──────────── (never returns) ────── Error ──retry──► Loading
//! ```
//!
//! The session is sans-IO. Every transition into `Loading` returns a
//! [`FetchRequest`]; the host performs the fetch and feeds the outcome back
//! through [`ArticleSession::complete_fetch`]. Each request carries a
//! generation number and only the latest one is applied, so a slow response
//! for an article the reader already navigated away from is dropped.

use super::bootstrap::ClientError;
use super::fetch::{FetchError, FetchResponse, Fetcher};
use super::location::{HistoryState, UrlParams};
use super::markdown::{CommonMarkRenderer, MarkdownRenderer};
use super::page::{Page, ids};
use super::view::{CatalogView, format_area_name, render_error, render_loading};
use crate::config::IndexConfig;
use crate::types::Catalog;
use std::time::Duration;

/// Delay the host waits before running the selection requested by the URL.
pub const DEFERRED_SELECT_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Loading { id: String },
    Loaded { id: String },
    Error { id: String, reason: String },
}

/// Whether a completed load adds a browser history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    Push,
    /// Loads driven by history navigation must not push again.
    Keep,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub id: String,
    pub lang: String,
    pub url: String,
    pub generation: u64,
    pub history: HistoryMode,
}

/// A selection the host should perform after `delay`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredSelect {
    pub id: String,
    pub delay: Duration,
}

pub struct ArticleSession {
    catalog: Catalog,
    view: CatalogView,
    renderer: Option<Box<dyn MarkdownRenderer>>,
    default_lang: String,
    current_lang: String,
    current_article: Option<String>,
    state: SessionState,
    generation: u64,
    /// History mode of the latest load, reused when it is retried.
    last_history: HistoryMode,
    location: UrlParams,
}

impl ArticleSession {
    /// Create a session over the bootstrapped catalog.
    ///
    /// `None` means the data script never defined `global_name`; that is
    /// fatal and nothing gets rendered.
    pub fn bootstrap(catalog: Option<Catalog>, global_name: &str) -> Result<Self, ClientError> {
        let default_lang = IndexConfig::default().default_lang;
        let Some(catalog) = catalog else {
            tracing::error!(global = %global_name, "article catalog is not defined, check the data script");
            return Err(ClientError::BootstrapMissing(global_name.to_string()));
        };
        tracing::info!(articles = catalog.len(), "article catalog loaded");
        Ok(Self {
            catalog,
            view: CatalogView::new(&default_lang),
            renderer: Some(Box::new(CommonMarkRenderer)),
            current_lang: default_lang.clone(),
            default_lang,
            current_article: None,
            state: SessionState::Idle,
            generation: 0,
            last_history: HistoryMode::Push,
            location: UrlParams::default(),
        })
    }

    /// Replace the Markdown renderer. `None` shows article source as-is.
    pub fn with_renderer(mut self, renderer: Option<Box<dyn MarkdownRenderer>>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_default_lang(mut self, lang: &str) -> Self {
        self.default_lang = lang.to_string();
        self.current_lang = lang.to_string();
        self.view = CatalogView::new(lang);
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn current_lang(&self) -> &str {
        &self.current_lang
    }

    pub fn current_article(&self) -> Option<&str> {
        self.current_article.as_deref()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Query string of the last pushed history entry (or of the page URL).
    pub fn current_query(&self) -> String {
        self.location.to_query()
    }

    /// Page-load entry point. `query` is the page URL's query string.
    ///
    /// A `lang` parameter is applied before the list is first rendered. An
    /// `article` parameter comes back as a deferred selection.
    pub fn start(&mut self, page: &mut dyn Page, query: &str) -> Option<DeferredSelect> {
        self.location = UrlParams::parse(query);
        if let Some(lang) = self.location.lang.clone() {
            self.apply_lang(page, &lang);
        }
        self.render_list(page);

        self.location.article.clone().map(|id| DeferredSelect {
            id,
            delay: DEFERRED_SELECT_DELAY,
        })
    }

    /// The reader clicked "Read" on a card.
    pub fn select_article(&mut self, page: &mut dyn Page, id: &str) -> Option<FetchRequest> {
        self.load(page, id, HistoryMode::Push)
    }

    /// Re-issue the fetch that failed. Only meaningful in `Error`.
    ///
    /// A retried history-driven load still does not push.
    pub fn retry(&mut self, page: &mut dyn Page) -> Option<FetchRequest> {
        match &self.state {
            SessionState::Error { id, .. } => {
                let id = id.clone();
                self.load(page, &id, self.last_history)
            }
            _ => None,
        }
    }

    /// The language selector changed.
    pub fn switch_language(&mut self, page: &mut dyn Page, lang: &str) -> Option<FetchRequest> {
        self.apply_lang(page, lang);
        self.render_list(page);
        let id = self.current_article.clone()?;
        self.load(page, &id, HistoryMode::Push)
    }

    /// Browser back/forward. `state` is the snapshot of the entry navigated to.
    pub fn pop_state(
        &mut self,
        page: &mut dyn Page,
        state: Option<&HistoryState>,
    ) -> Option<FetchRequest> {
        let state = state?;
        let lang = state.lang.clone().unwrap_or_else(|| self.default_lang.clone());
        self.apply_lang(page, &lang);
        self.location.lang = Some(lang);
        self.location.article = state.article_id.clone();
        self.render_list(page);

        let id = state.article_id.as_deref()?;
        self.load(page, id, HistoryMode::Keep)
    }

    /// Apply the outcome of `request`. Returns `false` if it was stale.
    pub fn complete_fetch(
        &mut self,
        page: &mut dyn Page,
        request: &FetchRequest,
        result: Result<FetchResponse, FetchError>,
    ) -> bool {
        if request.generation != self.generation {
            tracing::debug!(
                id = %request.id,
                generation = request.generation,
                latest = self.generation,
                "discarding stale article response"
            );
            return false;
        }

        let outcome = result.and_then(|response| {
            if response.is_success() {
                Ok(response.body)
            } else {
                Err(FetchError::Status(response.status))
            }
        });

        match outcome {
            Ok(markdown) => {
                let html = match &self.renderer {
                    Some(renderer) => renderer.render(&markdown),
                    None => markdown,
                };
                page.set_html(ids::ARTICLE_CONTENT, &html);
                self.show_labels(page, &request.id);

                if request.history == HistoryMode::Push {
                    self.location.article = Some(request.id.clone());
                    self.location.lang = Some(request.lang.clone());
                    let snapshot = HistoryState {
                        article_id: Some(request.id.clone()),
                        lang: Some(request.lang.clone()),
                    };
                    page.push_history(&snapshot, &self.location.to_query());
                }
                page.mark_selected(&request.id);
                tracing::info!(id = %request.id, lang = %request.lang, "article loaded");
                self.state = SessionState::Loaded {
                    id: request.id.clone(),
                };
            }
            Err(err) => {
                tracing::error!(id = %request.id, url = %request.url, %err, "article failed to load");
                self.fail(page, &request.id, err.to_string());
            }
        }
        true
    }

    /// Perform `request` with `fetcher` and apply the outcome.
    pub fn fetch_with(
        &mut self,
        page: &mut dyn Page,
        fetcher: &dyn Fetcher,
        request: &FetchRequest,
    ) -> bool {
        let result = fetcher.fetch(&request.url);
        self.complete_fetch(page, request, result)
    }

    fn load(&mut self, page: &mut dyn Page, id: &str, history: HistoryMode) -> Option<FetchRequest> {
        let Some(article) = self.catalog.get(id) else {
            tracing::error!(%id, "article not found in catalog");
            return None;
        };
        let url = article.file.get(&self.current_lang).cloned();

        self.current_article = Some(id.to_string());
        self.generation += 1;
        self.last_history = history;
        self.show_labels(page, id);

        let Some(url) = url else {
            let reason = format!("not available in {}", self.current_lang);
            tracing::error!(%id, lang = %self.current_lang, "article has no file for language");
            self.fail(page, id, reason);
            return None;
        };

        page.set_html(ids::ARTICLE_CONTENT, &render_loading().into_string());
        self.state = SessionState::Loading { id: id.to_string() };
        Some(FetchRequest {
            id: id.to_string(),
            lang: self.current_lang.clone(),
            url,
            generation: self.generation,
            history,
        })
    }

    fn fail(&mut self, page: &mut dyn Page, id: &str, reason: String) {
        page.set_html(ids::ARTICLE_CONTENT, &render_error(&reason, id).into_string());
        self.state = SessionState::Error {
            id: id.to_string(),
            reason,
        };
    }

    fn show_labels(&self, page: &mut dyn Page, id: &str) {
        if let Some(article) = self.catalog.get(id) {
            page.set_text(
                ids::ARTICLE_TITLE,
                article.display_title(&self.current_lang, &self.default_lang),
            );
            page.set_text(
                ids::ARTICLE_AREA,
                &format!("Area: {}", format_area_name(&article.area)),
            );
        }
    }

    fn apply_lang(&mut self, page: &mut dyn Page, lang: &str) {
        self.current_lang = lang.to_string();
        // The selector is optional markup
        page.set_value(ids::LANGUAGE_SELECT, lang);
    }

    fn render_list(&self, page: &mut dyn Page) {
        // Failure is already logged by the view; the session keeps going.
        let _ = self.view.render(
            page,
            &self.catalog,
            &self.current_lang,
            self.current_article.as_deref(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::page::MemoryPage;
    use crate::test_helpers::*;

    fn session() -> ArticleSession {
        ArticleSession::bootstrap(Some(sample_catalog()), "ARTICLES").unwrap()
    }

    fn ok(body: &str) -> Result<FetchResponse, FetchError> {
        Ok(FetchResponse::ok(body))
    }

    #[test]
    fn bootstrap_without_catalog_fails() {
        assert!(matches!(
            ArticleSession::bootstrap(None, "CATALOG"),
            Err(ClientError::BootstrapMissing(name)) if name == "CATALOG"
        ));
    }

    #[test]
    fn starts_idle_in_default_language() {
        let s = session();
        assert_eq!(s.state(), &SessionState::Idle);
        assert_eq!(s.current_lang(), "ru");
        assert_eq!(s.current_article(), None);
    }

    // =========================================================================
    // Selection and fetch completion
    // =========================================================================

    #[test]
    fn select_enters_loading_and_requests_language_file() {
        let mut s = session();
        let mut page = MemoryPage::standard();

        let req = s.select_article(&mut page, "triggers").unwrap();

        assert_eq!(req.url, "/articles/digital-circuits/triggers/ru/triggers.md");
        assert_eq!(req.lang, "ru");
        assert_eq!(req.history, HistoryMode::Push);
        assert_eq!(s.state(), &SessionState::Loading { id: "triggers".into() });
        assert!(page.html(ids::ARTICLE_CONTENT).unwrap().contains("loading"));
        assert_eq!(page.html(ids::ARTICLE_TITLE), Some("Триггеры"));
        assert_eq!(page.html(ids::ARTICLE_AREA), Some("Area: Digital Circuits"));
    }

    #[test]
    fn successful_fetch_renders_and_pushes_history() {
        let mut s = session();
        let mut page = MemoryPage::standard();
        let req = s.select_article(&mut page, "triggers").unwrap();

        assert!(s.complete_fetch(&mut page, &req, ok("# Триггеры\n\nТекст.")));

        assert_eq!(s.state(), &SessionState::Loaded { id: "triggers".into() });
        let content = page.html(ids::ARTICLE_CONTENT).unwrap();
        assert!(content.contains("<h1>Триггеры</h1>"));
        assert_eq!(page.selected.as_deref(), Some("triggers"));
        assert_eq!(page.history.len(), 1);
        assert_eq!(page.history[0].query, "?article=triggers&lang=ru");
        assert_eq!(page.history[0].state.article_id.as_deref(), Some("triggers"));
        assert_eq!(s.current_query(), "?article=triggers&lang=ru");
    }

    #[test]
    fn without_renderer_raw_markdown_is_shown() {
        let mut s = session().with_renderer(None);
        let mut page = MemoryPage::standard();
        let req = s.select_article(&mut page, "adders").unwrap();
        s.complete_fetch(&mut page, &req, ok("# Raw"));
        assert_eq!(page.html(ids::ARTICLE_CONTENT), Some("# Raw"));
    }

    #[test]
    fn custom_renderer_is_used() {
        let renderer = |md: &str| format!("<pre>{md}</pre>");
        let mut s = session().with_renderer(Some(Box::new(renderer)));
        let mut page = MemoryPage::standard();
        let req = s.select_article(&mut page, "adders").unwrap();
        s.complete_fetch(&mut page, &req, ok("x"));
        assert_eq!(page.html(ids::ARTICLE_CONTENT), Some("<pre>x</pre>"));
    }

    #[test]
    fn unknown_id_changes_nothing() {
        let mut s = session();
        let mut page = MemoryPage::standard();
        let req = s.select_article(&mut page, "adders").unwrap();
        s.complete_fetch(&mut page, &req, ok("body"));
        let writes = page.writes(ids::ARTICLE_CONTENT);

        assert!(s.select_article(&mut page, "no-such-article").is_none());

        assert_eq!(s.current_article(), Some("adders"));
        assert_eq!(s.state(), &SessionState::Loaded { id: "adders".into() });
        assert_eq!(page.writes(ids::ARTICLE_CONTENT), writes);
    }

    #[test]
    fn missing_language_is_immediate_error() {
        let mut s = session().with_default_lang("en");
        let mut page = MemoryPage::standard();

        // adders only has a Russian file
        assert!(s.select_article(&mut page, "adders").is_none());

        assert_eq!(
            s.state(),
            &SessionState::Error {
                id: "adders".into(),
                reason: "not available in en".into()
            }
        );
        assert!(page.html(ids::ARTICLE_CONTENT).unwrap().contains("not available in en"));
    }

    // =========================================================================
    // Failure and retry
    // =========================================================================

    #[test]
    fn http_error_shows_retry_panel() {
        let mut s = session();
        let mut page = MemoryPage::standard();
        let req = s.select_article(&mut page, "triggers").unwrap();

        s.complete_fetch(&mut page, &req, Ok(FetchResponse { status: 404, body: String::new() }));

        assert_eq!(
            s.state(),
            &SessionState::Error {
                id: "triggers".into(),
                reason: "HTTP 404".into()
            }
        );
        let content = page.html(ids::ARTICLE_CONTENT).unwrap();
        assert!(content.contains("HTTP 404"));
        assert!(content.contains(r#"data-action="retry" data-article="triggers""#));
        assert!(page.history.is_empty());
    }

    #[test]
    fn retry_reissues_the_same_fetch() {
        let mut s = session();
        let mut page = MemoryPage::standard();
        let first = s.select_article(&mut page, "triggers").unwrap();
        s.complete_fetch(&mut page, &first, Err(FetchError::Network("offline".into())));

        let again = s.retry(&mut page).unwrap();

        assert_eq!(again.id, first.id);
        assert_eq!(again.url, first.url);
        assert!(again.generation > first.generation);
        assert_eq!(s.state(), &SessionState::Loading { id: "triggers".into() });

        s.complete_fetch(&mut page, &again, ok("# ok"));
        assert_eq!(s.state(), &SessionState::Loaded { id: "triggers".into() });
    }

    #[test]
    fn retry_outside_error_is_noop() {
        let mut s = session();
        let mut page = MemoryPage::standard();
        assert!(s.retry(&mut page).is_none());
        assert_eq!(s.state(), &SessionState::Idle);
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut s = session();
        let mut page = MemoryPage::standard();
        let slow = s.select_article(&mut page, "adders").unwrap();
        let fast = s.select_article(&mut page, "triggers").unwrap();

        assert!(s.complete_fetch(&mut page, &fast, ok("# Triggers")));
        assert!(!s.complete_fetch(&mut page, &slow, ok("# Adders")));

        assert_eq!(s.state(), &SessionState::Loaded { id: "triggers".into() });
        assert!(page.html(ids::ARTICLE_CONTENT).unwrap().contains("Triggers"));
        assert_eq!(page.history.len(), 1);
    }

    // =========================================================================
    // Language, start-up and history
    // =========================================================================

    #[test]
    fn switch_language_rerenders_and_reloads() {
        let mut s = session();
        let mut page = MemoryPage::standard();
        let req = s.select_article(&mut page, "triggers").unwrap();
        s.complete_fetch(&mut page, &req, ok("# Триггеры"));
        let list_writes = page.writes(ids::ARTICLES_LIST);

        let req = s.switch_language(&mut page, "en").unwrap();

        assert_eq!(s.current_lang(), "en");
        assert_eq!(page.html(ids::LANGUAGE_SELECT), Some("en"));
        assert_eq!(page.writes(ids::ARTICLES_LIST), list_writes + 1);
        assert!(page.html(ids::ARTICLES_LIST).unwrap().contains("<h4>Triggers</h4>"));
        assert_eq!(req.url, "/articles/digital-circuits/triggers/en/triggers.md");
        assert_eq!(s.state(), &SessionState::Loading { id: "triggers".into() });
    }

    #[test]
    fn switch_to_language_the_article_lacks_is_error() {
        let mut s = session();
        let mut page = MemoryPage::standard();
        let req = s.select_article(&mut page, "adders").unwrap();
        s.complete_fetch(&mut page, &req, ok("# Сумматоры"));

        // adders only has a Russian file
        assert!(s.switch_language(&mut page, "en").is_none());

        assert_eq!(s.current_lang(), "en");
        assert_eq!(s.current_article(), Some("adders"));
        assert_eq!(
            s.state(),
            &SessionState::Error {
                id: "adders".into(),
                reason: "not available in en".into()
            }
        );
        let content = page.html(ids::ARTICLE_CONTENT).unwrap();
        assert!(content.contains("not available in en"));
        assert!(content.contains(r#"data-action="retry" data-article="adders""#));
        assert_eq!(page.history.len(), 1);
    }

    #[test]
    fn switch_language_without_article_only_rerenders() {
        let mut s = session();
        let mut page = MemoryPage::standard();
        assert!(s.switch_language(&mut page, "en").is_none());
        assert_eq!(page.writes(ids::ARTICLES_LIST), 1);
        assert_eq!(s.state(), &SessionState::Idle);
    }

    #[test]
    fn start_applies_lang_before_rendering_and_defers_article() {
        let mut s = session();
        let mut page = MemoryPage::standard();

        let deferred = s.start(&mut page, "?article=triggers&lang=en").unwrap();

        assert_eq!(deferred.id, "triggers");
        assert_eq!(deferred.delay, Duration::from_millis(100));
        assert_eq!(s.current_lang(), "en");
        assert_eq!(page.html(ids::LANGUAGE_SELECT), Some("en"));
        assert!(page.html(ids::ARTICLES_LIST).unwrap().contains("<h4>Triggers</h4>"));
        assert_eq!(page.writes(ids::ARTICLES_LIST), 1);
        assert_eq!(s.state(), &SessionState::Idle);
    }

    #[test]
    fn start_without_params_just_renders() {
        let mut s = session();
        let mut page = MemoryPage::standard();
        assert!(s.start(&mut page, "").is_none());
        assert_eq!(s.current_lang(), "ru");
        assert_eq!(page.writes(ids::LANGUAGE_SELECT), 0);
    }

    #[test]
    fn history_push_keeps_unrelated_params() {
        let mut s = session();
        let mut page = MemoryPage::standard();
        s.start(&mut page, "?theme=dark");
        let req = s.select_article(&mut page, "adders").unwrap();
        s.complete_fetch(&mut page, &req, ok("x"));
        assert_eq!(page.history[0].query, "?theme=dark&article=adders&lang=ru");
    }

    #[test]
    fn pop_state_loads_without_pushing() {
        let mut s = session();
        let mut page = MemoryPage::standard();
        let snapshot = HistoryState {
            article_id: Some("triggers".into()),
            lang: Some("en".into()),
        };

        let req = s.pop_state(&mut page, Some(&snapshot)).unwrap();
        assert_eq!(req.history, HistoryMode::Keep);
        assert_eq!(s.current_lang(), "en");

        s.complete_fetch(&mut page, &req, ok("# Triggers"));
        assert_eq!(s.state(), &SessionState::Loaded { id: "triggers".into() });
        assert!(page.history.is_empty());
    }

    #[test]
    fn retry_after_pop_state_does_not_push() {
        let mut s = session();
        let mut page = MemoryPage::standard();
        let snapshot = HistoryState {
            article_id: Some("triggers".into()),
            lang: Some("ru".into()),
        };
        let req = s.pop_state(&mut page, Some(&snapshot)).unwrap();
        s.complete_fetch(&mut page, &req, Err(FetchError::Network("offline".into())));

        let again = s.retry(&mut page).unwrap();
        assert_eq!(again.history, HistoryMode::Keep);
        s.complete_fetch(&mut page, &again, ok("# Триггеры"));

        assert_eq!(s.state(), &SessionState::Loaded { id: "triggers".into() });
        assert!(page.history.is_empty());
    }

    #[test]
    fn retry_after_selection_pushes() {
        let mut s = session();
        let mut page = MemoryPage::standard();
        let req = s.select_article(&mut page, "adders").unwrap();
        s.complete_fetch(&mut page, &req, Ok(FetchResponse { status: 500, body: String::new() }));

        let again = s.retry(&mut page).unwrap();
        assert_eq!(again.history, HistoryMode::Push);
        s.complete_fetch(&mut page, &again, ok("# Сумматоры"));
        assert_eq!(page.history.len(), 1);
    }

    #[test]
    fn pop_state_defaults_language() {
        let mut s = session();
        let mut page = MemoryPage::standard();
        s.switch_language(&mut page, "en");
        let snapshot = HistoryState {
            article_id: Some("adders".into()),
            lang: None,
        };
        let req = s.pop_state(&mut page, Some(&snapshot)).unwrap();
        assert_eq!(req.lang, "ru");
    }

    #[test]
    fn pop_state_without_snapshot_is_ignored() {
        let mut s = session();
        let mut page = MemoryPage::standard();
        assert!(s.pop_state(&mut page, None).is_none());
        assert_eq!(page.writes(ids::ARTICLES_LIST), 0);
    }

    #[test]
    fn missing_list_container_does_not_stop_session() {
        let mut s = session();
        let mut page = MemoryPage::with_elements(&[ids::ARTICLE_CONTENT]);
        let deferred = s.start(&mut page, "?article=adders").unwrap();
        let req = s.select_article(&mut page, &deferred.id).unwrap();
        s.complete_fetch(&mut page, &req, ok("# Adders"));
        assert_eq!(s.state(), &SessionState::Loaded { id: "adders".into() });
    }

    #[test]
    fn fetch_with_filesystem_fetcher() {
        use crate::client::fetch::FsFetcher;

        let tmp = setup_fixtures();
        let mut s = session();
        let mut page = MemoryPage::standard();
        let req = s.select_article(&mut page, "adders").unwrap();

        assert!(s.fetch_with(&mut page, &FsFetcher::new(tmp.path()), &req));
        assert_eq!(s.state(), &SessionState::Loaded { id: "adders".into() });
        assert!(page.html(ids::ARTICLE_CONTENT).unwrap().contains("<h1>Сумматоры</h1>"));
    }
}
