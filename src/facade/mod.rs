//! Conversion facade
//!
//! [`MarkdownConverter`] holds a fixed [`ConverterConfig`] and exposes both
//! directions in two flavours: `try_*` methods returning
//! [`ConversionResult`], and infallible methods that log failures (panics
//! included) and return an empty string. The free functions use a
//! process-wide converter with the default configuration.
//!
//! ```rust
//! use kodegen_markdown_bridge::{html_to_markdown, markdown_to_html};
//!
//! let html = markdown_to_html("$$a+b+c$$");
//! assert!(html.contains(r#"data-type="block-math""#));
//! assert_eq!(html_to_markdown(html.as_str()), "$$a+b+c$$");
//! assert_eq!(markdown_to_html(None::<&str>), "");
//! ```

mod sanitize;
mod sniff;
mod text;

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::LazyLock;

use crate::config::ConverterConfig;
use crate::error::{ConversionError, ConversionResult};
use crate::html_to_markdown::HtmlSerializer;
use crate::markdown::{MarkdownEngine, ParseOptions};

pub use sanitize::HtmlSanitizer;
pub use sniff::is_markdown;
pub use text::{html_to_text, preview_text};

static DEFAULT_CONVERTER: LazyLock<MarkdownConverter> = LazyLock::new(MarkdownConverter::default);

/// Both conversion directions under one configuration
#[derive(Debug, Clone)]
pub struct MarkdownConverter {
    config: ConverterConfig,
    engine: MarkdownEngine,
    serializer: HtmlSerializer,
}

impl Default for MarkdownConverter {
    fn default() -> Self {
        Self::new(ConverterConfig::default())
    }
}

impl MarkdownConverter {
    #[must_use]
    pub fn new(config: ConverterConfig) -> Self {
        let engine = MarkdownEngine::new(ParseOptions::from(&config));
        let serializer = HtmlSerializer::new(config.max_nesting_depth());
        Self {
            config,
            engine,
            serializer,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Render markdown to HTML.
    ///
    /// # Errors
    ///
    /// Returns `ConversionError::InputTooLarge` when the input exceeds the
    /// configured ceiling.
    pub fn try_markdown_to_html(&self, markdown: &str) -> ConversionResult<String> {
        self.check_size(markdown)?;
        Ok(self.engine.render(markdown))
    }

    /// Serialize HTML to markdown.
    ///
    /// # Errors
    ///
    /// Returns `ConversionError::InputTooLarge` when the input exceeds the
    /// configured ceiling, or the serializer's error if the tag guard or DOM
    /// parser fails.
    pub fn try_html_to_markdown(&self, html: &str) -> ConversionResult<String> {
        self.check_size(html)?;
        self.serializer.serialize(html)
    }

    /// Render markdown to HTML; empty on blank input or any failure.
    #[must_use]
    pub fn markdown_to_html(&self, markdown: &str) -> String {
        guarded("markdown_to_html", markdown, |input| self.try_markdown_to_html(input))
    }

    /// Serialize HTML to markdown; empty on blank input or any failure.
    #[must_use]
    pub fn html_to_markdown(&self, html: &str) -> String {
        guarded("html_to_markdown", html, |input| self.try_html_to_markdown(input))
    }

    /// Render markdown and pass the HTML through `sanitizer`.
    #[must_use]
    pub fn markdown_to_safe_html<S: HtmlSanitizer + ?Sized>(&self, markdown: &str, sanitizer: &S) -> String {
        let html = self.markdown_to_html(markdown);
        if html.is_empty() {
            return html;
        }
        sanitizer.sanitize(&html)
    }

    /// Plain-text preview of markdown, at most `max_len` characters plus an
    /// ellipsis.
    #[must_use]
    pub fn markdown_to_preview_text(&self, markdown: &str, max_len: usize) -> String {
        preview_text(&self.markdown_to_html(markdown), max_len)
    }

    /// Preview using the configured default length.
    #[must_use]
    pub fn preview(&self, markdown: &str) -> String {
        self.markdown_to_preview_text(markdown, self.config.preview_length())
    }

    fn check_size(&self, input: &str) -> ConversionResult<()> {
        match self.config.max_input_bytes() {
            Some(limit) if input.len() > limit => Err(ConversionError::InputTooLarge {
                len: input.len(),
                limit,
            }),
            _ => Ok(()),
        }
    }
}

/// Run a conversion with the empty-input and never-fail contract.
fn guarded(operation: &str, input: &str, convert: impl FnOnce(&str) -> ConversionResult<String>) -> String {
    if input.trim().is_empty() {
        return String::new();
    }
    match catch_unwind(AssertUnwindSafe(|| convert(input))) {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            tracing::warn!("{operation} failed for {} byte input: {e}", input.len());
            String::new()
        }
        Err(payload) => {
            let e = ConversionError::from_panic(payload.as_ref());
            tracing::error!("{operation} aborted for {} byte input: {e}", input.len());
            String::new()
        }
    }
}

/// Render markdown to HTML with the default configuration.
///
/// `None`, empty and whitespace-only input yield an empty string, as does
/// any internal failure.
#[must_use]
pub fn markdown_to_html<'a>(markdown: impl Into<Option<&'a str>>) -> String {
    markdown
        .into()
        .map(|md| DEFAULT_CONVERTER.markdown_to_html(md))
        .unwrap_or_default()
}

/// Serialize HTML to markdown with the default configuration.
///
/// `None`, empty and whitespace-only input yield an empty string, as does
/// any internal failure.
#[must_use]
pub fn html_to_markdown<'a>(html: impl Into<Option<&'a str>>) -> String {
    html.into()
        .map(|html| DEFAULT_CONVERTER.html_to_markdown(html))
        .unwrap_or_default()
}

/// Plain-text preview of markdown with the default configuration.
#[must_use]
pub fn markdown_to_preview_text(markdown: &str, max_len: usize) -> String {
    DEFAULT_CONVERTER.markdown_to_preview_text(markdown, max_len)
}
