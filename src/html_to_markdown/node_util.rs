//! Read-only helpers over `markup5ever_rcdom` nodes

use std::rc::Rc;

use markup5ever_rcdom::{Node, NodeData};

use crate::utils::{ATTR_DATA_TYPE, BLOCK_MATH_TYPE, INLINE_MATH_TYPE};

pub(crate) fn get_node_tag_name(node: &Rc<Node>) -> Option<&str> {
    match &node.data {
        NodeData::Document => Some("html"),
        NodeData::Element { name, .. } => Some(&name.local),
        _ => None,
    }
}

/// Value of attribute `name` on an element node.
pub(crate) fn get_attr(node: &Rc<Node>, name: &str) -> Option<String> {
    let NodeData::Element { attrs, .. } = &node.data else {
        return None;
    };
    attrs
        .borrow()
        .iter()
        .find(|a| &*a.name.local == name)
        .map(|a| a.value.to_string())
}

pub(crate) fn has_attr(node: &Rc<Node>, name: &str) -> bool {
    let NodeData::Element { attrs, .. } = &node.data else {
        return false;
    };
    attrs.borrow().iter().any(|a| &*a.name.local == name)
}

/// Element children, skipping text, comments and the like.
pub(crate) fn element_children(node: &Rc<Node>) -> Vec<Rc<Node>> {
    node.children
        .borrow()
        .iter()
        .filter(|c| matches!(c.data, NodeData::Element { .. }))
        .cloned()
        .collect()
}

/// Concatenated text of all descendant text nodes, in document order.
pub(crate) fn text_content(node: &Rc<Node>) -> String {
    let mut out = String::new();
    let mut stack = vec![Rc::clone(node)];
    while let Some(current) = stack.pop() {
        match &current.data {
            NodeData::Text { contents } => out.push_str(&contents.borrow()),
            NodeData::Element { .. } | NodeData::Document => {
                stack.extend(current.children.borrow().iter().rev().cloned());
            }
            _ => {}
        }
    }
    out
}

/// Which math container, if any, `node` is.
pub(crate) fn math_kind(node: &Rc<Node>) -> Option<MathKind> {
    match get_attr(node, ATTR_DATA_TYPE)?.as_str() {
        BLOCK_MATH_TYPE => Some(MathKind::Block),
        INLINE_MATH_TYPE => Some(MathKind::Inline),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MathKind {
    Block,
    Inline,
}

/// Whether any descendant of `node` satisfies `pred`.
///
/// Walks with an explicit stack; document depth is unbounded.
pub(crate) fn any_descendant(node: &Rc<Node>, pred: &dyn Fn(&Rc<Node>) -> bool) -> bool {
    let mut stack: Vec<Rc<Node>> = node.children.borrow().iter().cloned().collect();
    while let Some(current) = stack.pop() {
        if pred(&current) {
            return true;
        }
        stack.extend(current.children.borrow().iter().cloned());
    }
    false
}

pub(crate) fn is_checkbox(node: &Rc<Node>) -> bool {
    get_node_tag_name(node) == Some("input")
        && get_attr(node, "type").is_some_and(|t| t.eq_ignore_ascii_case("checkbox"))
}

/// Elements that carry meaning even with no text inside.
fn is_meaningful_when_blank(node: &Rc<Node>) -> bool {
    if math_kind(node).is_some() {
        return true;
    }
    matches!(
        get_node_tag_name(node),
        Some(
            "img" | "br" | "hr" | "input" | "table" | "thead" | "tbody" | "tfoot" | "tr" | "th" | "td"
                | "iframe" | "video" | "audio"
        )
    )
}

/// An element with no visible text and nothing meaningful inside.
pub(crate) fn is_blank(node: &Rc<Node>) -> bool {
    if is_meaningful_when_blank(node) {
        return false;
    }
    !any_descendant(node, &|c| match &c.data {
        NodeData::Text { contents } => !contents.borrow().trim().is_empty(),
        NodeData::Element { .. } => is_meaningful_when_blank(c),
        _ => false,
    })
}
