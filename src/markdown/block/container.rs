//! Blockquotes and lists
//!
//! Both collect the lines that belong to the container, strip the
//! container's prefix and recurse through `parse_blocks` one level deeper.

use super::leaf::{
    ListKind, ListMarker, indent_of, is_blank, is_thematic_break, parse_fence_start,
    parse_list_marker,
};
use super::{BlockParser, BlockSink, Line};
use crate::markdown::token::{Attrs, BlockTag};

impl BlockParser<'_> {
    pub(super) fn blockquote(
        &self,
        lines: &[Line<'_>],
        i: usize,
        sink: &mut BlockSink,
        depth: usize,
    ) -> usize {
        let mut inner: Vec<Line<'_>> = Vec::new();
        let mut lazy_allowed = false;
        let mut j = i;

        while j < lines.len() {
            let line = lines[j];
            let indent = indent_of(line.text);
            if indent < 4 && line.text[indent..].starts_with('>') {
                let rest = &line.text[indent + 1..];
                let rest = rest.strip_prefix(' ').unwrap_or(rest);
                // Only paragraph text can be continued lazily.
                lazy_allowed = !is_blank(rest)
                    && indent_of(rest) < 4
                    && parse_fence_start(rest.trim_start()).is_none();
                inner.push(Line {
                    text: rest,
                    number: line.number,
                });
                j += 1;
            } else if lazy_allowed && !is_blank(line.text) && !self.interrupts_paragraph(lines, j) {
                inner.push(line);
                j += 1;
            } else {
                break;
            }
        }

        let end_line = lines[j - 1].number + 1;
        sink.open(BlockTag::Blockquote, Attrs::new(), lines[i].number, end_line);
        self.parse_blocks(&inner, sink, depth + 1);
        sink.close(BlockTag::Blockquote);
        j
    }

    /// Parse a list starting at `lines[i]`. Returns `None` when the line is
    /// not a list item after all (a thematic break such as `* * *`).
    pub(super) fn list(
        &self,
        lines: &[Line<'_>],
        i: usize,
        sink: &mut BlockSink,
        depth: usize,
    ) -> Option<usize> {
        let first = item_marker(lines[i].text)?;

        let (tag, attrs) = match first.kind {
            ListKind::Bullet(_) => (BlockTag::BulletList, Attrs::new()),
            ListKind::Ordered(_) => {
                let mut attrs = Attrs::new();
                if first.start != 1 {
                    attrs.push(("start".to_string(), first.start.to_string()));
                }
                (BlockTag::OrderedList, attrs)
            }
        };

        let list_index = sink.len();
        sink.open(tag, attrs, lines[i].number, lines[i].number + 1);

        let mut tight = true;
        let mut j = i;
        loop {
            let (item_lines, end) = self.collect_item(lines, j);
            sink.open(
                BlockTag::ListItem,
                Attrs::new(),
                lines[j].number,
                lines[end - 1].number + 1,
            );
            if self.parse_blocks(&item_lines, sink, depth + 1) {
                tight = false;
            }
            sink.close(BlockTag::ListItem);

            let mut k = end;
            while k < lines.len() && is_blank(lines[k].text) {
                k += 1;
            }
            match lines.get(k).and_then(|l| item_marker(l.text)) {
                Some(marker) if marker.same_list(&first) => {
                    if k > end {
                        tight = false;
                    }
                    j = k;
                }
                _ => {
                    j = end;
                    break;
                }
            }
        }

        sink.close(tag);
        sink.set_end_line(list_index, lines[j - 1].number + 1);
        if tight {
            sink.mark_tight(list_index);
        }
        Some(j)
    }

    /// Gather the lines of one list item, with the item's content offset
    /// removed. Returns the lines and the index after the item's last
    /// non-blank line.
    fn collect_item<'a>(&self, lines: &[Line<'a>], i: usize) -> (Vec<Line<'a>>, usize) {
        let line = lines[i];
        let indent = indent_of(line.text);
        let Some(marker) = parse_list_marker(&line.text[indent..]) else {
            return (vec![line], i + 1);
        };

        let after = indent + marker.width;
        let rest = &line.text[after..];
        let spaces = indent_of(rest);
        let (offset, first_text) = if marker.empty {
            (after + 1, "")
        } else if spaces >= 5 {
            // Content is indented code; the item itself takes one space.
            (after + 1, &rest[1..])
        } else {
            (after + spaces, &rest[spaces..])
        };

        let mut item = vec![Line {
            text: first_text,
            number: line.number,
        }];
        let mut last = i;
        let mut j = i + 1;
        while j < lines.len() {
            let text = lines[j].text;
            let number = lines[j].number;
            if is_blank(text) {
                if marker.empty && last == i {
                    break;
                }
                item.push(Line { text: "", number });
                j += 1;
                continue;
            }

            let line_indent = indent_of(text);
            if line_indent >= offset {
                item.push(Line {
                    text: &text[offset..],
                    number,
                });
                last = j;
                j += 1;
                continue;
            }

            // Lazy paragraph continuation directly after a text line.
            let trimmed = &text[line_indent..];
            if last == j - 1
                && !(marker.empty && last == i)
                && parse_list_marker(trimmed).is_none()
                && !self.interrupts_paragraph(lines, j)
            {
                item.push(Line {
                    text: trimmed,
                    number,
                });
                last = j;
                j += 1;
                continue;
            }
            break;
        }

        item.truncate(last - i + 1);
        (item, last + 1)
    }
}

/// The list marker of `text` when it starts a list item rather than a
/// thematic break.
fn item_marker(text: &str) -> Option<ListMarker> {
    let indent = indent_of(text);
    if indent >= 4 {
        return None;
    }
    let trimmed = &text[indent..];
    if is_thematic_break(trimmed) {
        return None;
    }
    parse_list_marker(trimmed)
}

#[cfg(test)]
mod tests {
    use crate::markdown::block::BlockParser;
    use crate::markdown::token::{BlockTag, TokenKind};
    use crate::markdown::{ParseOptions, split_lines};

    fn parse(src: &str) -> Vec<crate::markdown::token::Token> {
        let options = ParseOptions::default();
        BlockParser::new(&options).parse(&split_lines(src))
    }

    #[test]
    fn tight_list_hides_paragraphs() {
        let tokens = parse("- a\n- b");
        let hidden: Vec<bool> = tokens
            .iter()
            .filter(|t| {
                matches!(
                    t.kind,
                    TokenKind::BlockOpen(BlockTag::Paragraph) | TokenKind::BlockClose(BlockTag::Paragraph)
                )
            })
            .map(|t| t.hidden)
            .collect();
        assert_eq!(hidden, vec![true; 4]);
    }

    #[test]
    fn blank_line_between_items_makes_list_loose() {
        let tokens = parse("- a\n\n- b");
        assert!(
            tokens
                .iter()
                .filter(|t| t.kind == TokenKind::BlockOpen(BlockTag::Paragraph))
                .all(|t| !t.hidden)
        );
        let items = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::BlockOpen(BlockTag::ListItem))
            .count();
        assert_eq!(items, 2, "one list with two items");
    }

    #[test]
    fn nested_list_stays_inside_item() {
        let tokens = parse("- a\n  - b\n- c");
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds[0], TokenKind::BlockOpen(BlockTag::BulletList));
        assert_eq!(
            kinds
                .iter()
                .filter(|k| **k == TokenKind::BlockOpen(BlockTag::BulletList))
                .count(),
            2
        );
        assert_eq!(*kinds.last().expect("tokens"), TokenKind::BlockClose(BlockTag::BulletList));
    }

    #[test]
    fn ordered_list_records_start() {
        let tokens = parse("3. x\n4. y");
        assert_eq!(tokens[0].attr("start"), Some("3"));
    }

    #[test]
    fn changing_bullet_starts_new_list() {
        let tokens = parse("- a\n* b");
        let lists = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::BlockOpen(BlockTag::BulletList))
            .count();
        assert_eq!(lists, 2);
    }

    #[test]
    fn blockquote_lazy_continuation() {
        let tokens = parse("> a\nb");
        assert_eq!(tokens[0].kind, TokenKind::BlockOpen(BlockTag::Blockquote));
        assert_eq!(tokens[2].content, "a\nb");
    }
}
