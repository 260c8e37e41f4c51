//! Markdown rendering for article bodies.
//!
//! The session treats Markdown conversion as a pluggable collaborator. With no
//! renderer configured, the raw text is shown as-is.

use crate::title::split_front_matter;
use pulldown_cmark::{Options, Parser, html as md_html};

pub trait MarkdownRenderer {
    /// Convert Markdown source to HTML.
    fn render(&self, markdown: &str) -> String;
}

/// CommonMark with tables, strikethrough and footnotes.
///
/// A leading front-matter block is metadata, not content, and is dropped
/// before rendering.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommonMarkRenderer;

impl MarkdownRenderer for CommonMarkRenderer {
    fn render(&self, markdown: &str) -> String {
        let (_, body) = split_front_matter(markdown);
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_FOOTNOTES;
        let parser = Parser::new_ext(body, options);
        let mut html = String::with_capacity(body.len() * 3 / 2);
        md_html::push_html(&mut html, parser);
        html
    }
}

impl<F> MarkdownRenderer for F
where
    F: Fn(&str) -> String,
{
    fn render(&self, markdown: &str) -> String {
        self(markdown)
    }
}
