//! GFM tables
//!
//! Rows are collected from `thead`, `tbody`, `tfoot` and bare `tr` children
//! in document order. A separator row follows the first header row; when the
//! table has none, one is synthesized after the first row. Column alignment
//! is not recovered.

use std::rc::Rc;

use markup5ever_rcdom::Node;

use super::super::dom_walker::{Context, Walker};
use super::super::node_util::{element_children, get_attr, get_node_tag_name};
use crate::utils::{MAX_COLSPAN, collapse_whitespace};

const MIN_CELL_WIDTH: usize = 3;

enum Line {
    Row(Vec<String>),
    Separator(usize),
}

impl Line {
    fn render(&self) -> String {
        match self {
            Line::Row(cells) => format!("| {} |", cells.join(" | ")),
            Line::Separator(columns) => format!("|{}", " --- |".repeat(*columns)),
        }
    }
}

pub(super) fn table(walker: &Walker, node: &Rc<Node>, ctx: Context) -> String {
    if ctx.in_table_cell {
        return collapse_whitespace(&walker.walk_children(node, ctx));
    }

    let mut caption = None;
    let mut lines: Vec<Line> = Vec::new();
    let mut header_done = false;

    for child in element_children(node) {
        match get_node_tag_name(&child) {
            Some("caption") => {
                let text = collapse_whitespace(&walker.walk_children(&child, ctx));
                caption = (!text.is_empty()).then_some(text);
            }
            Some(section @ ("thead" | "tbody" | "tfoot")) => {
                for row in element_children(&child)
                    .into_iter()
                    .filter(|r| get_node_tag_name(r) == Some("tr"))
                {
                    push_row(walker, &row, ctx, section == "thead", &mut header_done, &mut lines);
                }
            }
            Some("tr") => push_row(walker, &child, ctx, false, &mut header_done, &mut lines),
            _ => {}
        }
    }

    let Some(Line::Row(first)) = lines.first() else {
        return String::new();
    };
    if !matches!(lines.get(1), Some(Line::Separator(_))) {
        let columns = first.len();
        lines.insert(1, Line::Separator(columns));
    }

    let body = lines.iter().map(Line::render).collect::<Vec<_>>().join("\n");
    match caption {
        Some(caption) => format!("\n\n{caption}\n\n{body}\n\n"),
        None => format!("\n\n{body}\n\n"),
    }
}

fn push_row(
    walker: &Walker,
    row: &Rc<Node>,
    ctx: Context,
    in_head: bool,
    header_done: &mut bool,
    lines: &mut Vec<Line>,
) {
    let cells: Vec<Rc<Node>> = element_children(row)
        .into_iter()
        .filter(|c| matches!(get_node_tag_name(c), Some("th" | "td")))
        .collect();
    if cells.is_empty() {
        return;
    }

    let mut rendered = Vec::with_capacity(cells.len());
    for cell in &cells {
        rendered.push(cell_content(walker, cell, ctx));
        let span = get_attr(cell, "colspan")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(1)
            .clamp(1, MAX_COLSPAN);
        for _ in 1..span {
            rendered.push(" ".repeat(MIN_CELL_WIDTH));
        }
    }
    if rendered.iter().all(|c| c.trim().is_empty()) {
        return;
    }

    let all_th = cells.iter().all(|c| get_node_tag_name(c) == Some("th"));
    let is_header = !*header_done && (in_head || (lines.is_empty() && all_th));
    let columns = rendered.len();
    lines.push(Line::Row(rendered));
    if is_header {
        lines.push(Line::Separator(columns));
        *header_done = true;
    }
}

/// One line of cell text with pipes escaped, padded to the minimum width.
fn cell_content(walker: &Walker, cell: &Rc<Node>, ctx: Context) -> String {
    let cell_ctx = Context {
        in_table_cell: true,
        ..ctx
    };
    let content = walker.walk_children(cell, cell_ctx).replace('\n', " ");
    let content = collapse_whitespace(&content).replace('|', "\\|");
    format!("{content:<width$}", width = MIN_CELL_WIDTH)
}

/// Section wrappers, rows and cells met outside a table walk.
pub(super) fn part(walker: &Walker, node: &Rc<Node>, ctx: Context) -> String {
    let content = walker.walk_children(node, ctx);
    match get_node_tag_name(node) {
        Some("th" | "td") if ctx.in_table_cell => format!(" {} ", content.trim()),
        Some("th" | "td") => {
            let content = content.trim();
            if content.is_empty() { String::new() } else { format!("\n\n{content}\n\n") }
        }
        _ => content,
    }
}
