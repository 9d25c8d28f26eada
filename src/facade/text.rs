//! Plain-text extraction and previews

use std::rc::Rc;

use markup5ever_rcdom::{Node, NodeData};

use crate::entities;
use crate::html_to_markdown::node_util::{get_attr, get_node_tag_name, math_kind};
use crate::html_to_markdown::parse_html;
use crate::utils::{ATTR_DATA_LATEX, ELLIPSIS, collapse_whitespace, safe_truncate_chars};

/// Visible text of an HTML string, whitespace collapsed.
///
/// `script`, `style` and `head` contents are skipped; math containers
/// contribute their LaTeX. Unparseable input yields an empty string.
#[must_use]
pub fn html_to_text(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }
    let dom = match parse_html(html) {
        Ok(dom) => dom,
        Err(e) => {
            tracing::warn!("html_to_text: {e}");
            return String::new();
        }
    };
    let mut text = String::with_capacity(html.len() / 2);
    collect_visible_text(&dom.document, &mut text);
    collapse_whitespace(&text)
}

enum Visit {
    Enter(Rc<Node>),
    /// Closing a block element; keeps adjacent blocks from running together.
    Separate,
}

fn collect_visible_text(root: &Rc<Node>, out: &mut String) {
    let mut stack = vec![Visit::Enter(Rc::clone(root))];
    while let Some(visit) = stack.pop() {
        let node = match visit {
            Visit::Enter(node) => node,
            Visit::Separate => {
                out.push(' ');
                continue;
            }
        };
        match &node.data {
            NodeData::Text { contents } => out.push_str(&contents.borrow()),
            NodeData::Element { .. } => {
                if math_kind(&node).is_some() {
                    if let Some(latex) = get_attr(&node, ATTR_DATA_LATEX) {
                        out.push(' ');
                        out.push_str(&entities::decode(&latex));
                        out.push(' ');
                    }
                    continue;
                }
                let tag = get_node_tag_name(&node);
                if matches!(tag, Some("script" | "style" | "head" | "template" | "noscript")) {
                    continue;
                }
                if matches!(tag, Some("br" | "p" | "div" | "li" | "td" | "th" | "tr"))
                    || tag.is_some_and(|t| t.len() == 2 && t.starts_with('h'))
                {
                    stack.push(Visit::Separate);
                }
                push_children(&node, &mut stack);
            }
            NodeData::Document => push_children(&node, &mut stack),
            _ => {}
        }
    }
}

fn push_children(node: &Rc<Node>, stack: &mut Vec<Visit>) {
    stack.extend(node.children.borrow().iter().rev().cloned().map(Visit::Enter));
}

/// Text of `html` cut to `max_len` characters, with an ellipsis when cut.
#[must_use]
pub fn preview_text(html: &str, max_len: usize) -> String {
    let text = html_to_text(html);
    if text.chars().count() <= max_len {
        return text;
    }
    let cut = safe_truncate_chars(&text, max_len).trim_end();
    format!("{cut}{ELLIPSIS}")
}
