//! Depth-first DOM walk
//!
//! Text nodes are whitespace-compressed and escaped here; elements are
//! dispatched to their [`Rule`]. Rendered pieces are joined with at most
//! one blank line between them.

use std::rc::Rc;
use std::sync::LazyLock;

use ahash::AHashSet;
use log::warn;
use markup5ever_rcdom::{Node, NodeData};

use super::node_util::{get_node_tag_name, is_blank, text_content};
use super::rules::Rule;
use super::text_util::{compress_whitespace, escape_text};

/// Per-node walk state, passed by value down the tree
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Context {
    pub depth: usize,
    /// Inside `<pre>`: text is copied verbatim
    pub in_pre: bool,
    /// Inside a table cell: block separators collapse later
    pub in_table_cell: bool,
}

impl Context {
    pub(crate) fn deeper(self) -> Self {
        Self {
            depth: self.depth + 1,
            ..self
        }
    }
}

pub(crate) struct Walker {
    max_depth: usize,
}

impl Walker {
    pub(crate) fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Render all children of `node`.
    pub(crate) fn walk_children(&self, node: &Rc<Node>, ctx: Context) -> String {
        let is_parent_block = get_node_tag_name(node).is_some_and(is_block_element);
        let children = node.children.borrow();
        self.walk_nodes(&children, ctx, is_parent_block)
    }

    /// Render a run of sibling nodes.
    pub(crate) fn walk_nodes(&self, nodes: &[Rc<Node>], ctx: Context, is_parent_block: bool) -> String {
        let mut buffer = String::new();
        let mut trim_leading_spaces = !ctx.in_pre && is_parent_block;

        for child in nodes {
            let is_block = get_node_tag_name(child).is_some_and(is_block_element);
            if is_block {
                trim_buffer_end_spaces(&mut buffer);
            }

            let buffer_len = buffer.len();
            self.walk_node(child, &mut buffer, ctx, trim_leading_spaces);
            if buffer.len() > buffer_len {
                trim_leading_spaces = is_block;
            }
        }
        buffer
    }

    fn walk_node(&self, node: &Rc<Node>, buffer: &mut String, ctx: Context, trim_leading_spaces: bool) {
        match &node.data {
            NodeData::Document => {
                let content = self.walk_children(node, ctx);
                buffer.push_str(&content);
                trim_buffer_end(buffer);
            }

            NodeData::Text { contents } => {
                let borrowed = contents.borrow();
                let text: &str = &borrowed;

                if ctx.in_pre {
                    buffer.push_str(text);
                    return;
                }
                let text = compress_whitespace(text);
                let text = escape_text(&text);
                if trim_leading_spaces || (text.starts_with(' ') && buffer.ends_with([' ', '\n'])) {
                    let trimmed = text.trim_start_matches(' ');
                    if !trimmed.is_empty() {
                        buffer.push_str(trimmed);
                    }
                } else if !text.is_empty() {
                    buffer.push_str(&text);
                }
            }

            NodeData::Element { name, .. } => {
                let tag = &*name.local;
                let content = if ctx.depth >= self.max_depth {
                    warn!("DOM walker: nesting limit {} reached at <{tag}>, flattening to text", self.max_depth);
                    escape_text(&compress_whitespace(&text_content(node))).into_owned()
                } else if !ctx.in_pre && is_blank(node) {
                    if is_block_element(tag) { "\n\n".to_string() } else { String::new() }
                } else {
                    Rule::classify(node).render(self, node, ctx.deeper())
                };

                let content = normalize_content_for_buffer(buffer, content, ctx.in_pre);
                if !content.is_empty() {
                    buffer.push_str(&content);
                }
            }

            NodeData::Comment { .. } | NodeData::Doctype { .. } | NodeData::ProcessingInstruction { .. } => {}
        }
    }
}

/// Collapse newlines at the join between `buffer` and `content` to at most
/// two, and drop a doubled space between inline elements.
fn normalize_content_for_buffer(buffer: &str, mut content: String, is_pre: bool) -> String {
    if buffer.is_empty() {
        return content;
    }

    let last_newlines = buffer.as_bytes().iter().rev().take_while(|&&b| b == b'\n').count();
    let content_newlines = content.as_bytes().iter().take_while(|&&b| b == b'\n').count();

    let total_newlines = last_newlines + content_newlines;
    if total_newlines > 2 {
        let to_remove = std::cmp::min(total_newlines - 2, content_newlines);
        content.drain(..to_remove);
    }

    if !is_pre
        && last_newlines == 0
        && content_newlines == 0
        && buffer.as_bytes().last() == Some(&b' ')
        && content.as_bytes().first() == Some(&b' ')
    {
        content.remove(0);
    }

    content
}

pub(crate) fn trim_buffer_end(buffer: &mut String) {
    let end = buffer.trim_end_matches(['\n', '\t', ' ']).len();
    buffer.truncate(end);
}

fn trim_buffer_end_spaces(buffer: &mut String) {
    let end = buffer.trim_end_matches(' ').len();
    buffer.truncate(end);
}

// CommonMark block-level names plus `pre`, `script`, `style` and
// `textarea`.
static BLOCK_ELEMENTS: LazyLock<AHashSet<&'static str>> = LazyLock::new(|| {
    [
        "address", "article", "aside", "base", "basefont", "blockquote", "body", "caption", "center", "col",
        "colgroup", "dd", "details", "dialog", "dir", "div", "dl", "dt", "fieldset", "figcaption", "figure",
        "footer", "form", "frame", "frameset", "h1", "h2", "h3", "h4", "h5", "h6", "head", "header", "hr",
        "html", "iframe", "legend", "li", "link", "main", "menu", "menuitem", "nav", "noframes", "ol",
        "optgroup", "option", "p", "param", "pre", "script", "search", "section", "style", "summary",
        "table", "tbody", "td", "textarea", "tfoot", "th", "thead", "title", "tr", "track", "ul",
    ]
    .into_iter()
    .collect()
});

pub(crate) fn is_block_element(tag: &str) -> bool {
    BLOCK_ELEMENTS.contains(tag)
}
