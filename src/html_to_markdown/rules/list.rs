//! Bullet, ordered and task lists
//!
//! Items are rendered segment by segment: a run of inline children becomes
//! one segment and every block child its own. Tight lists join a text run
//! to a following nested list with a single newline so the list stays
//! tight on the way back; everything else is separated by a blank line.

use std::rc::Rc;

use markup5ever_rcdom::{Node, NodeData};

use super::super::dom_walker::{Context, Walker, is_block_element};
use super::super::node_util::{any_descendant, element_children, get_attr, get_node_tag_name, has_attr, is_checkbox};
use super::super::text_util::indent_text_except_first_line;
use crate::utils::{ATTR_DATA_CHECKED, ATTR_DATA_TYPE, TASK_ITEM_TYPE, TASK_LIST_TYPE};

const LOOSE_CHILDREN: &[&str] = &[
    "p", "pre", "blockquote", "table", "h1", "h2", "h3", "h4", "h5", "h6", "div",
];

pub(super) fn is_task_list(node: &Rc<Node>) -> bool {
    get_attr(node, ATTR_DATA_TYPE).as_deref() == Some(TASK_LIST_TYPE)
}

/// An `li` marked as a task item, or one whose leading element (directly or
/// inside a leading `p`/`label`) is a checkbox.
pub(super) fn is_task_item(node: &Rc<Node>) -> bool {
    if get_node_tag_name(node) != Some("li") {
        return false;
    }
    if get_attr(node, ATTR_DATA_TYPE).as_deref() == Some(TASK_ITEM_TYPE) {
        return true;
    }
    let Some(first) = element_children(node).into_iter().next() else {
        return false;
    };
    if is_checkbox(&first) {
        return true;
    }
    matches!(get_node_tag_name(&first), Some("p" | "label"))
        && element_children(&first).first().is_some_and(is_checkbox)
}

/// Checkbox state: a checkbox element decides when present, the
/// `data-checked` attribute otherwise.
fn is_checked(item: &Rc<Node>) -> bool {
    if any_descendant(item, &is_checkbox) {
        return any_descendant(item, &|n| is_checkbox(n) && has_attr(n, "checked"));
    }
    get_attr(item, ATTR_DATA_CHECKED).is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

pub(super) fn task_item(walker: &Walker, node: &Rc<Node>, ctx: Context) -> String {
    let marker = if is_checked(node) { "- [x] " } else { "- [ ] " };
    let content = render_item(walker, node, ctx, false);
    if content.is_empty() {
        return marker.trim_end().to_string();
    }
    format!("{marker}{}", indent_text_except_first_line(&content, 2))
}

pub(super) fn task_list(walker: &Walker, node: &Rc<Node>, ctx: Context) -> String {
    let items: Vec<String> = element_children(node)
        .iter()
        .filter(|c| get_node_tag_name(c) == Some("li"))
        .map(|li| {
            if is_task_item(li) {
                task_item(walker, li, ctx)
            } else {
                plain_item(walker, li, ctx, "- ", true)
            }
        })
        .collect();
    wrap_list(&items.join("\n\n"), ctx)
}

pub(super) fn list(walker: &Walker, node: &Rc<Node>, ctx: Context, ordered: bool) -> String {
    let start = if ordered {
        get_attr(node, "start")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(1)
    } else {
        1
    };
    let loose = element_children(node).iter().any(|li| {
        get_node_tag_name(li) == Some("li")
            && element_children(li)
                .iter()
                .any(|c| get_node_tag_name(c).is_some_and(|t| LOOSE_CHILDREN.contains(&t)))
    });

    let mut items: Vec<String> = Vec::new();
    let mut number = start;
    for child in element_children(node) {
        if get_node_tag_name(&child) != Some("li") {
            // A list nested directly in a list belongs to the previous item.
            let rendered = walker.walk_nodes(std::slice::from_ref(&child), ctx, true);
            let rendered = rendered.trim_matches('\n');
            if rendered.trim().is_empty() {
                continue;
            }
            match items.last_mut() {
                Some(last) => {
                    last.push_str(if loose { "\n\n" } else { "\n" });
                    last.push_str("  ");
                    last.push_str(&indent_text_except_first_line(rendered, 2));
                }
                None => items.push(rendered.to_string()),
            }
            continue;
        }

        let item = if is_task_item(&child) {
            task_item(walker, &child, ctx)
        } else {
            let marker = if ordered { format!("{number}. ") } else { "- ".to_string() };
            plain_item(walker, &child, ctx, &marker, loose)
        };
        number += 1;
        items.push(item);
    }

    wrap_list(&items.join(if loose { "\n\n" } else { "\n" }), ctx)
}

/// An `li` met outside any list.
pub(super) fn orphan_item(walker: &Walker, node: &Rc<Node>, ctx: Context) -> String {
    wrap_list(&plain_item(walker, node, ctx, "- ", false), ctx)
}

fn plain_item(walker: &Walker, node: &Rc<Node>, ctx: Context, marker: &str, loose: bool) -> String {
    let content = render_item(walker, node, ctx, loose);
    if content.is_empty() {
        return marker.trim_end().to_string();
    }
    format!("{marker}{}", indent_text_except_first_line(&content, marker.len()))
}

fn render_item(walker: &Walker, node: &Rc<Node>, ctx: Context, loose: bool) -> String {
    let children = node.children.borrow();
    let mut segments: Vec<(String, bool)> = Vec::new();
    let mut run_start: Option<usize> = None;

    let flush = |segments: &mut Vec<(String, bool)>, range: std::ops::Range<usize>| {
        let rendered = walker.walk_nodes(&children[range], ctx, true);
        let rendered = rendered.trim();
        if !rendered.is_empty() {
            segments.push((rendered.to_string(), false));
        }
    };

    for (idx, child) in children.iter().enumerate() {
        let block_tag = match &child.data {
            NodeData::Element { .. } => get_node_tag_name(child).filter(|t| is_block_element(t)),
            _ => None,
        };
        let Some(tag) = block_tag else {
            run_start.get_or_insert(idx);
            continue;
        };
        if let Some(start) = run_start.take() {
            flush(&mut segments, start..idx);
        }
        let rendered = walker.walk_nodes(std::slice::from_ref(child), ctx, true);
        let rendered = rendered.trim_matches('\n').trim_end();
        if !rendered.trim().is_empty() {
            segments.push((rendered.to_string(), matches!(tag, "ul" | "ol")));
        }
    }
    if let Some(start) = run_start {
        flush(&mut segments, start..children.len());
    }

    let mut out = String::new();
    for (idx, (segment, is_list)) in segments.iter().enumerate() {
        if idx > 0 {
            out.push_str(if *is_list && !loose { "\n" } else { "\n\n" });
        }
        out.push_str(segment);
    }
    out
}

fn wrap_list(content: &str, ctx: Context) -> String {
    if content.trim().is_empty() {
        String::new()
    } else if ctx.in_table_cell {
        format!("\n{content}\n")
    } else {
        format!("\n\n{content}\n\n")
    }
}
