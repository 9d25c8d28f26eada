use std::rc::Rc;

use markup5ever_rcdom::Node;

use super::super::dom_walker::Context;
use super::super::node_util::get_attr;
use crate::entities;
use crate::utils::ATTR_DATA_LATEX;

/// The LaTeX payload of a math container, decoded through the entity codec.
/// Children are never consulted: the container is empty by construction.
pub(super) fn latex(node: &Rc<Node>) -> Option<String> {
    let raw = get_attr(node, ATTR_DATA_LATEX)?;
    let decoded = entities::decode(&raw).trim().to_string();
    (!decoded.is_empty()).then_some(decoded)
}

pub(super) fn block_math(node: &Rc<Node>, ctx: Context) -> String {
    let Some(latex) = latex(node) else {
        return String::new();
    };
    if ctx.in_table_cell {
        format!("$${latex}$$")
    } else {
        format!("\n\n$${latex}$$\n\n")
    }
}

pub(super) fn inline_math(node: &Rc<Node>) -> String {
    latex(node).map(|latex| format!("${latex}$")).unwrap_or_default()
}
