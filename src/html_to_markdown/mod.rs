//! HTML to Markdown serializer
//!
//! Pipeline:
//! 1. Escape non-standard tags so they survive as text ([`crate::tag_guard`])
//! 2. Parse into a DOM with html5ever
//! 3. Walk the tree depth-first, dispatching each element to its rule
//! 4. Decode entity references outside code
//!
//! # Usage
//! ```rust
//! # use kodegen_markdown_bridge::html_to_markdown::HtmlSerializer;
//! let serializer = HtmlSerializer::default();
//! let markdown = serializer.serialize("<h1>Title</h1><p>Some <em>text</em></p>")?;
//! assert_eq!(markdown, "# Title\n\nSome *text*");
//! # Ok::<(), kodegen_markdown_bridge::error::ConversionError>(())
//! ```

mod dom_walker;
pub(crate) mod node_util;
mod postprocess;
mod rules;
mod text_util;

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use markup5ever_rcdom::RcDom;

use crate::error::ConversionResult;
use crate::tag_guard;
use crate::utils::DEFAULT_MAX_NESTING_DEPTH;
use dom_walker::{Context, Walker};

/// Serializes HTML fragments or documents to markdown
#[derive(Debug, Clone)]
pub struct HtmlSerializer {
    max_nesting_depth: usize,
}

impl Default for HtmlSerializer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_NESTING_DEPTH)
    }
}

impl HtmlSerializer {
    /// Elements nested deeper than `max_nesting_depth` are flattened to
    /// their text.
    #[must_use]
    pub fn new(max_nesting_depth: usize) -> Self {
        Self { max_nesting_depth }
    }

    /// Convert `html` to markdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag guard's rewriter fails or the DOM parser
    /// cannot read its input.
    pub fn serialize(&self, html: &str) -> ConversionResult<String> {
        let guarded = tag_guard::escape_custom_tags(html)?;
        let dom = parse_html(&guarded)?;

        let walker = Walker::new(self.max_nesting_depth);
        let markdown = walker.walk_children(&dom.document, Context::default());
        tracing::debug!(
            "Serialized {} bytes of HTML to {} bytes of markdown",
            html.len(),
            markdown.len()
        );

        Ok(postprocess::decode_outside_code(&markdown))
    }
}

/// Parse `html` as a document, dropping any doctype.
pub(crate) fn parse_html(html: &str) -> ConversionResult<RcDom> {
    let parse_options = ParseOpts {
        tree_builder: TreeBuilderOpts {
            drop_doctype: true,
            ..Default::default()
        },
        ..Default::default()
    };

    let mut input = html.as_bytes();
    let dom = parse_document(RcDom::default(), parse_options)
        .from_utf8()
        .read_from(&mut input)?;
    Ok(dom)
}
