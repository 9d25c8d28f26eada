//! Bidirectional Markdown ⇄ HTML conversion
//!
//! - [`markdown`]: block/inline parser with block and inline math, GFM
//!   tables, strikethrough and task lists, rendering to HTML
//! - [`html_to_markdown`]: DOM walker with rules for math containers,
//!   literal `<br>`, tables with colspan and task lists
//! - [`tag_guard`]: escapes non-standard tags before serialization
//! - [`entities`]: entity encoding and decoding
//! - [`facade`]: the string-in/string-out entry points

pub mod config;
pub mod entities;
pub mod error;
pub mod facade;
pub mod html_to_markdown;
pub mod markdown;
pub mod tag_guard;
pub mod utils;

pub use config::{ConverterConfig, ConverterConfigBuilder};
pub use error::{ConversionError, ConversionResult};
pub use facade::{
    HtmlSanitizer, MarkdownConverter, html_to_markdown, html_to_text, is_markdown, markdown_to_html,
    markdown_to_preview_text,
};
pub use html_to_markdown::HtmlSerializer;
pub use markdown::{MarkdownEngine, ParseOptions};
pub use tag_guard::escape_custom_tags;
