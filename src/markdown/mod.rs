//! Markdown parsing engine
//!
//! Pipeline: source normalization, local-image pre-pass, block parsing,
//! inline parsing of every `Inline` token, task-list annotation, HTML
//! rendering. Math blocks and inline math are part of the block and inline
//! grammars rather than separate passes.

pub(crate) mod block;
pub(crate) mod inline;
pub(crate) mod local_images;
pub(crate) mod math;
pub(crate) mod render;
pub(crate) mod task_list;
pub mod token;

use std::borrow::Cow;

use crate::config::ConverterConfig;
use crate::utils::DEFAULT_MAX_NESTING_DEPTH;
use block::{BlockParser, Line};
use inline::InlineParser;
use render::HtmlRenderer;
use token::{BlockTag, Token, TokenKind};

/// Options fixed for the lifetime of a [`MarkdownEngine`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Wrap task-list checkboxes and their text in a `label`
    pub task_list_label: bool,
    /// Render soft line breaks as `<br>`
    pub hard_breaks: bool,
    /// Container and link-label nesting ceiling
    pub max_nesting_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            task_list_label: false,
            hard_breaks: false,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

impl From<&ConverterConfig> for ParseOptions {
    fn from(config: &ConverterConfig) -> Self {
        Self {
            task_list_label: config.task_list_label(),
            hard_breaks: config.hard_breaks(),
            max_nesting_depth: config.max_nesting_depth(),
        }
    }
}

/// Markdown to token stream to HTML
#[derive(Debug, Clone, Default)]
pub struct MarkdownEngine {
    options: ParseOptions,
}

impl MarkdownEngine {
    #[must_use]
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse `src` into a flat token stream with inline children resolved
    /// and task lists annotated.
    #[must_use]
    pub fn parse(&self, src: &str) -> Vec<Token> {
        let normalized = normalize_source(src);
        let prepared = local_images::rewrite_local_images(&normalized);
        let lines = split_lines(&prepared);

        let mut tokens = BlockParser::new(&self.options).parse(&lines);

        let inline = InlineParser::new(&self.options);
        let mut in_cell = false;
        for token in &mut tokens {
            match token.kind {
                TokenKind::BlockOpen(BlockTag::TableHeaderCell | BlockTag::TableDataCell) => in_cell = true,
                TokenKind::BlockClose(_) => in_cell = false,
                TokenKind::Inline if in_cell => token.children = inline.parse_cell(&token.content),
                TokenKind::Inline => token.children = inline.parse(&token.content),
                _ => {}
            }
        }

        task_list::annotate_task_lists(&mut tokens, self.options.task_list_label);
        tokens
    }

    /// Render `src` to HTML.
    #[must_use]
    pub fn render(&self, src: &str) -> String {
        let tokens = self.parse(src);
        HtmlRenderer::new(self.options.hard_breaks).render(&tokens)
    }
}

/// Unify line endings, replace NUL and expand leading tabs to 4-column
/// stops.
fn normalize_source(src: &str) -> Cow<'_, str> {
    if !src.contains(['\r', '\0', '\t']) {
        return Cow::Borrowed(src);
    }

    let unified = src.replace("\r\n", "\n").replace('\r', "\n").replace('\0', "\u{FFFD}");
    let mut out = String::with_capacity(unified.len());
    for (idx, line) in unified.split('\n').enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        let mut column = 0usize;
        let mut rest = line;
        while let Some(c) = rest.chars().next() {
            match c {
                ' ' => {
                    out.push(' ');
                    column += 1;
                }
                '\t' => {
                    let width = 4 - column % 4;
                    out.extend(std::iter::repeat_n(' ', width));
                    column += width;
                }
                _ => break,
            }
            rest = &rest[1..];
        }
        out.push_str(rest);
    }
    Cow::Owned(out)
}

pub(crate) fn split_lines(src: &str) -> Vec<Line<'_>> {
    src.split('\n')
        .enumerate()
        .map(|(number, text)| Line { text, number })
        .collect()
}
