//! Markdown to HTML conversion.

use pulldown_cmark::{Options, Parser, html as md_html};

use super::ViewError;

/// Converts markdown source into an HTML fragment.
///
/// The dispatcher treats this as a black box; swap in another
/// implementation to change flavours or add sanitizing.
pub trait MarkdownRenderer: Send + Sync {
    fn render(&self, source: &[u8]) -> Result<String, ViewError>;
}

/// CommonMark with the GitHub-ish extensions people expect from notes:
/// tables, strikethrough, task lists and footnotes.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommonMarkRenderer;

impl CommonMarkRenderer {
    fn options() -> Options {
        Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_FOOTNOTES
    }
}

impl MarkdownRenderer for CommonMarkRenderer {
    fn render(&self, source: &[u8]) -> Result<String, ViewError> {
        let text = String::from_utf8_lossy(source);
        let parser = Parser::new_ext(&text, Self::options());

        let mut body = String::with_capacity(text.len() * 3 / 2);
        md_html::push_html(&mut body, parser);
        Ok(body)
    }
}
