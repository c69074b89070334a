// file: src/parser/markdown.rs
// description: markdown to html rendering with pulldown-cmark
// reference: https://docs.rs/pulldown-cmark

use crate::error::Result;
use pulldown_cmark::{Event, Options, Parser, html};

/// Turns a markdown body into the HTML sent as post content.
pub trait MarkdownRenderer: Send + Sync {
    fn render(&self, markdown: &str) -> Result<String>;
}

/// CommonMark renderer with tables, fenced code and single newlines kept as `<br />`.
pub struct CmarkRenderer {
    options: Options,
    hard_breaks: bool,
}

impl CmarkRenderer {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);

        Self {
            options,
            hard_breaks: true,
        }
    }

    pub fn with_hard_breaks(mut self, hard_breaks: bool) -> Self {
        self.hard_breaks = hard_breaks;
        self
    }
}

impl MarkdownRenderer for CmarkRenderer {
    fn render(&self, markdown: &str) -> Result<String> {
        let hard_breaks = self.hard_breaks;
        let parser = Parser::new_ext(markdown, self.options).map(|event| match event {
            Event::SoftBreak if hard_breaks => Event::HardBreak,
            other => other,
        });

        let mut output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut output, parser);
        Ok(output)
    }
}

impl Default for CmarkRenderer {
    fn default() -> Self {
        Self::new()
    }
}
