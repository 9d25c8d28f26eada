use std::rc::Rc;

use markup5ever_rcdom::{Node, NodeData};

use super::super::dom_walker::{Context, Walker};
use super::super::node_util::{element_children, get_attr, get_node_tag_name, math_kind, MathKind};
use super::super::text_util::{longest_run, quote_lines};
use super::math;

/// Surround block output with blank lines. Inside a table cell a single
/// newline is enough; the cell folds it into a space.
fn block(content: &str, ctx: Context) -> String {
    let content = content.trim();
    if content.is_empty() {
        String::new()
    } else if ctx.in_table_cell {
        format!("\n{content}\n")
    } else {
        format!("\n\n{content}\n\n")
    }
}

pub(super) fn heading(walker: &Walker, node: &Rc<Node>, ctx: Context, level: u8) -> String {
    let content = walker.walk_children(node, ctx).replace('\n', " ");
    let content = content.trim();
    if content.is_empty() {
        return String::new();
    }
    if ctx.in_table_cell {
        return block(content, ctx);
    }
    format!("\n\n{} {content}\n\n", "#".repeat(usize::from(level)))
}

pub(super) fn paragraph(walker: &Walker, node: &Rc<Node>, ctx: Context) -> String {
    if let Some(math) = sole_inline_math(node) {
        return block(&math::inline_math(&math), ctx);
    }
    block(&walker.walk_children(node, ctx), ctx)
}

/// The only child of a paragraph, when that child is an inline-math span.
fn sole_inline_math(node: &Rc<Node>) -> Option<Rc<Node>> {
    let children = node.children.borrow();
    let mut found = None;
    for child in children.iter() {
        match &child.data {
            NodeData::Text { contents } if contents.borrow().trim().is_empty() => {}
            NodeData::Element { .. } if found.is_none() && math_kind(child) == Some(MathKind::Inline) => {
                found = Some(Rc::clone(child));
            }
            NodeData::Comment { .. } => {}
            _ => return None,
        }
    }
    found
}

pub(super) fn blockquote(walker: &Walker, node: &Rc<Node>, ctx: Context) -> String {
    let content = walker.walk_children(node, ctx);
    let content = content.trim_matches(['\n', ' ']);
    if content.is_empty() {
        return String::new();
    }
    if ctx.in_table_cell {
        return block(content, ctx);
    }
    format!("\n\n{}\n\n", quote_lines(content))
}

pub(super) fn code_block(walker: &Walker, node: &Rc<Node>, ctx: Context) -> String {
    let language = code_language(node).unwrap_or_default();
    let pre_ctx = Context { in_pre: true, ..ctx };
    let content = walker.walk_children(node, pre_ctx);
    let content = content.strip_suffix('\n').unwrap_or(&content);

    if ctx.in_table_cell {
        return block(content, ctx);
    }

    let fence = "`".repeat(3.max(longest_run(content, '`') + 1));
    format!("\n\n{fence}{language}\n{content}\n{fence}\n\n")
}

/// Language from a `language-*` or `lang-*` class on the inner `<code>`,
/// falling back to the `<pre>` itself.
fn code_language(pre: &Rc<Node>) -> Option<String> {
    let inner = element_children(pre)
        .into_iter()
        .find(|c| get_node_tag_name(c) == Some("code"));
    inner
        .as_ref()
        .and_then(class_language)
        .or_else(|| class_language(pre))
}

fn class_language(node: &Rc<Node>) -> Option<String> {
    let class = get_attr(node, "class")?;
    class.split_whitespace().find_map(|c| {
        c.strip_prefix("language-")
            .or_else(|| c.strip_prefix("lang-"))
            .filter(|lang| !lang.is_empty() && !lang.contains('`'))
            .map(str::to_string)
    })
}

pub(super) fn generic(walker: &Walker, node: &Rc<Node>, ctx: Context) -> String {
    block(&walker.walk_children(node, ctx), ctx)
}
