//! # Article Index
//!
//! Builds a catalog of multilingual Markdown articles for a static site and
//! drives the in-page reader that browses it. The filesystem is the data
//! source: every article lives at
//!
//! ```text
//! articles/<area>/<topic>/<lang>/<topic>.md
//! ```
//!
//! and all language variants of one topic merge into a single catalog record.
//!
//! # Architecture: Build Side and Read Side
//!
//! ```text
//! build   articles/  →  Catalog  →  _data/articles.json         (templates)
//!                                →  assets/js/articles-data.js  (reader)
//! read    articles-data.js  →  ArticleSession  →  page + fetched article
//! ```
//!
//! The build side is a batch walk that never fails on a single bad file: each
//! one is accepted or skipped with a reason, and the run reports both. The
//! read side is a small state machine that never performs I/O itself; it asks
//! its host to fetch and to touch the document.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`classify`] | Decides whether a relative path is an article, unrelated, or misplaced |
//! | [`title`] | Title resolution chain: heading, front matter, topic name, file name |
//! | [`catalog`] | Walks the tree, merges language variants, collects the build report |
//! | [`emit`] | Publishes the catalog to site data and writes the JSON and script files |
//! | [`client`] | Reader runtime: list view, article session, URL state, Markdown |
//! | [`types`] | `ArticleRecord` and `Catalog`, the shape shared by both sides |
//! | [`config`] | `article-index.toml` loading, merging, and validation |
//! | [`logging`] | `tracing` subscriber setup for the CLI |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Topic Name Is the Identity
//!
//! The `<topic>` directory and the file name must agree. A file that breaks
//! the rule is reported and never touches the catalog, so a misplaced
//! translation cannot silently overwrite another article. Ids are unique
//! across areas; when one shows up under two areas, the first area in walk
//! order keeps it.
//!
//! ## Deterministic Output
//!
//! Records are sorted by id and per-language maps are ordered by language
//! code. Building the same tree twice produces byte-identical files, and the
//! CLI prints a SHA-256 of the payload so that is easy to confirm.
//!
//! ## Sans-IO Reader
//!
//! [`client::session::ArticleSession`] returns a fetch request instead of
//! fetching, and writes through a [`client::page::Page`] instead of a DOM.
//! Each request carries a generation number so a slow response for an
//! article the reader already left is dropped rather than shown.

pub mod catalog;
pub mod classify;
pub mod client;
pub mod config;
pub mod emit;
pub mod logging;
pub mod output;
pub mod title;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
