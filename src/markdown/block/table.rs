//! GFM pipe tables

use super::leaf::{
    Alignment, indent_of, is_blank, is_thematic_break, parse_atx_heading, parse_fence_start,
    parse_table_separator, split_table_row, html_block_start,
};
use super::{BlockParser, BlockSink, Line};
use crate::markdown::token::{Attrs, BlockTag};

/// Whether `lines[i]` is a header row followed by a matching separator row.
pub(super) fn is_table_start(lines: &[Line<'_>], i: usize) -> bool {
    header_alignments(lines, i).is_some()
}

fn header_alignments(lines: &[Line<'_>], i: usize) -> Option<Vec<Alignment>> {
    let header = lines.get(i)?.text;
    if indent_of(header) >= 4 || !header.contains('|') {
        return None;
    }
    let separator = lines.get(i + 1)?.text;
    if indent_of(separator) >= 4 {
        return None;
    }
    let alignments = parse_table_separator(separator)?;
    (split_table_row(header).len() == alignments.len()).then_some(alignments)
}

/// Body rows end at a blank line or at any line that starts another block.
fn ends_table(text: &str) -> bool {
    if is_blank(text) {
        return true;
    }
    let indent = indent_of(text);
    if indent >= 4 {
        return false;
    }
    let trimmed = &text[indent..];
    trimmed.starts_with('>')
        || parse_fence_start(trimmed).is_some()
        || parse_atx_heading(trimmed).is_some()
        || is_thematic_break(trimmed)
        || html_block_start(trimmed).is_some()
}

impl BlockParser<'_> {
    pub(super) fn table(&self, lines: &[Line<'_>], i: usize, sink: &mut BlockSink) -> Option<usize> {
        let alignments = header_alignments(lines, i)?;
        let start_line = lines[i].number;

        let table_index = sink.len();
        sink.open(BlockTag::Table, Attrs::new(), start_line, start_line + 2);
        sink.open(BlockTag::TableHead, Attrs::new(), start_line, start_line + 1);
        emit_row(
            sink,
            split_table_row(lines[i].text),
            &alignments,
            BlockTag::TableHeaderCell,
            start_line,
        );
        sink.close(BlockTag::TableHead);

        let mut j = i + 2;
        let mut body_open = false;
        while j < lines.len() && !ends_table(lines[j].text) {
            if !body_open {
                sink.open(BlockTag::TableBody, Attrs::new(), lines[j].number, lines[j].number + 1);
                body_open = true;
            }
            emit_row(
                sink,
                split_table_row(lines[j].text),
                &alignments,
                BlockTag::TableDataCell,
                lines[j].number,
            );
            j += 1;
        }
        if body_open {
            sink.close(BlockTag::TableBody);
        }
        sink.close(BlockTag::Table);
        sink.set_end_line(table_index, lines[j - 1].number + 1);
        Some(j)
    }
}

fn emit_row(
    sink: &mut BlockSink,
    mut cells: Vec<String>,
    alignments: &[Alignment],
    cell_tag: BlockTag,
    line: usize,
) {
    // Short rows are padded, long rows truncated to the header width.
    cells.resize(alignments.len(), String::new());

    sink.open(BlockTag::TableRow, Attrs::new(), line, line + 1);
    for (cell, alignment) in cells.iter().zip(alignments) {
        let mut attrs = Attrs::new();
        if let Some(style) = alignment.style() {
            attrs.push(("style".to_string(), style.to_string()));
        }
        sink.open(cell_tag, attrs, line, line + 1);
        sink.inline(cell, line, line + 1);
        sink.close(cell_tag);
    }
    sink.close(BlockTag::TableRow);
}

#[cfg(test)]
mod tests {
    use crate::markdown::block::BlockParser;
    use crate::markdown::token::{BlockTag, TokenKind};
    use crate::markdown::{ParseOptions, split_lines};

    #[test]
    fn header_and_body_rows() {
        let options = ParseOptions::default();
        let lines = split_lines("| a | b |\n| :- | -: |\n| 1 | 2 |\n\nafter");
        let tokens = BlockParser::new(&options).parse(&lines);
        assert_eq!(tokens[0].kind, TokenKind::BlockOpen(BlockTag::Table));
        let header_cell = tokens
            .iter()
            .find(|t| t.kind == TokenKind::BlockOpen(BlockTag::TableHeaderCell))
            .expect("header cell");
        assert_eq!(header_cell.attr("style"), Some("text-align:left"));
        let data_cells = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::BlockOpen(BlockTag::TableDataCell))
            .count();
        assert_eq!(data_cells, 2);
    }

    #[test]
    fn mismatched_column_count_is_not_a_table() {
        let options = ParseOptions::default();
        let lines = split_lines("| a | b |\n| --- |");
        let tokens = BlockParser::new(&options).parse(&lines);
        assert_eq!(tokens[0].kind, TokenKind::BlockOpen(BlockTag::Paragraph));
    }
}
