//! Task-list annotation over a finished token stream
//!
//! The first pass classifies bullet-list items into a side table without
//! touching the stream. The second pass applies the table: it sets the list
//! and item attributes and rewrites the matching inline tokens.

use std::sync::LazyLock;

use ahash::{AHashMap, AHashSet};
use regex::Regex;

use super::token::{BlockTag, InlineTag, Token, TokenKind};
use crate::utils::{ATTR_DATA_CHECKED, ATTR_DATA_TYPE, TASK_ITEM_TYPE, TASK_LIST_TYPE};

static TASK_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ ?\[([ xX])\] +").expect("TASK_MARKER: hardcoded regex is valid")
});

/// Per-stream classification, keyed by token index
#[derive(Debug, Default)]
struct TaskPlan {
    /// Bullet-list open tokens with at least one task item
    lists: AHashSet<usize>,
    /// Item open token index -> checked
    items: AHashMap<usize, bool>,
    /// Inline token index -> byte length of the marker to strip
    inlines: AHashMap<usize, usize>,
}

/// Annotate task lists in `tokens`. With `label` set, each item's checkbox
/// and text are wrapped in a `label` container.
pub(crate) fn annotate_task_lists(tokens: &mut [Token], label: bool) {
    let plan = classify(tokens);
    if plan.lists.is_empty() {
        return;
    }
    tracing::debug!(
        lists = plan.lists.len(),
        items = plan.items.len(),
        "Annotating task lists"
    );
    apply(tokens, &plan, label);
}

fn classify(tokens: &[Token]) -> TaskPlan {
    let mut plan = TaskPlan::default();
    // Open list token indices, innermost last.
    let mut lists: Vec<(usize, BlockTag)> = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::BlockOpen(tag @ (BlockTag::BulletList | BlockTag::OrderedList)) => {
                lists.push((i, tag));
            }
            TokenKind::BlockClose(BlockTag::BulletList | BlockTag::OrderedList) => {
                lists.pop();
            }
            TokenKind::BlockOpen(BlockTag::ListItem) => {
                let Some(&(list_index, BlockTag::BulletList)) = lists.last() else {
                    continue;
                };
                let Some((checked, marker_len)) = task_marker(tokens, i) else {
                    continue;
                };
                plan.lists.insert(list_index);
                plan.items.insert(i, checked);
                plan.inlines.insert(i + 2, marker_len);
            }
            _ => {}
        }
    }
    plan
}

/// An item qualifies when its first block is a paragraph whose inline
/// content starts with the marker.
fn task_marker(tokens: &[Token], item: usize) -> Option<(bool, usize)> {
    let paragraph = tokens.get(item + 1)?;
    let inline = tokens.get(item + 2)?;
    if paragraph.kind != TokenKind::BlockOpen(BlockTag::Paragraph) || inline.kind != TokenKind::Inline {
        return None;
    }
    let first = inline.children.first()?;
    if first.kind != TokenKind::Text {
        return None;
    }
    let caps = TASK_MARKER.captures(&first.content)?;
    let whole = caps.get(0)?;
    let checked = caps.get(1).is_some_and(|m| m.as_str() != " ");
    Some((checked, whole.end()))
}

fn apply(tokens: &mut [Token], plan: &TaskPlan, label: bool) {
    for (i, token) in tokens.iter_mut().enumerate() {
        if plan.lists.contains(&i) {
            token.set_attr(ATTR_DATA_TYPE, TASK_LIST_TYPE);
        } else if let Some(&checked) = plan.items.get(&i) {
            token.set_attr(ATTR_DATA_TYPE, TASK_ITEM_TYPE);
            token.set_attr(ATTR_DATA_CHECKED, if checked { "true" } else { "false" });
        } else if let Some(&marker_len) = plan.inlines.get(&i) {
            let checked = plan.items.get(&(i - 2)).copied().unwrap_or(false);
            token.children = rewrite_children(std::mem::take(&mut token.children), marker_len, checked, label);
        }
    }
}

fn rewrite_children(mut children: Vec<Token>, marker_len: usize, checked: bool, label: bool) -> Vec<Token> {
    // The marker is replaced by the checkbox; one space separates it from
    // the remaining text.
    match children.first_mut() {
        Some(first) => first.content.replace_range(..marker_len, " "),
        None => children.push(Token::text(" ")),
    }

    let mut checkbox = Token::new(TokenKind::Checkbox);
    if checked {
        checkbox.set_attr("checked", "");
    }

    let mut out = Vec::with_capacity(children.len() + 3);
    if label {
        out.push(Token::new(TokenKind::InlineOpen(InlineTag::Label)));
    }
    out.push(checkbox);
    out.extend(children);
    if label {
        out.push(Token::new(TokenKind::InlineClose(InlineTag::Label)));
    }
    out
}
