//! Block-level parsing
//!
//! Lines are consumed top to bottom by an ordered set of block rules.
//! Container rules (blockquote, list item) strip their prefixes and recurse
//! into the contained lines. Tokens go to a [`BlockSink`] that keeps the
//! currently open blocks on an explicit stack, so every open token gets a
//! matching close.

mod container;
pub(crate) mod leaf;
mod table;

use super::ParseOptions;
use super::math::scan_block_math;
use super::token::{Attrs, BlockTag, Token, TokenKind};
use leaf::{
    HtmlBlockEnd, html_block_start, indent_of, is_blank, is_closing_fence, is_thematic_break,
    parse_atx_heading, parse_fence_start, parse_list_marker, parse_setext_underline,
};

/// One source line with container prefixes already removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Line<'a> {
    pub text: &'a str,
    /// Zero-based line number in the original document
    pub number: usize,
}

/// Flat token output with an explicit open-block stack
#[derive(Debug, Default)]
pub(crate) struct BlockSink {
    tokens: Vec<Token>,
    open: Vec<BlockTag>,
}

impl BlockSink {
    fn len(&self) -> usize {
        self.tokens.len()
    }

    fn open(&mut self, tag: BlockTag, attrs: Attrs, start_line: usize, end_line: usize) {
        let mut token = Token::new(TokenKind::BlockOpen(tag)).with_span(start_line, end_line);
        token.attrs = attrs;
        self.tokens.push(token);
        self.open.push(tag);
    }

    fn close(&mut self, tag: BlockTag) {
        match self.open.pop() {
            Some(top) if top == tag => {}
            other => tracing::warn!(
                "Block stack mismatch: closing {tag:?} while {other:?} is innermost"
            ),
        }
        self.tokens.push(Token::new(TokenKind::BlockClose(tag)));
    }

    fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    fn inline(&mut self, content: &str, start_line: usize, end_line: usize) {
        self.tokens
            .push(Token::with_content(TokenKind::Inline, content).with_span(start_line, end_line));
    }

    /// Emit a paragraph (`open`, inline, `close`).
    fn paragraph(&mut self, content: &str, start_line: usize, end_line: usize) {
        self.open(BlockTag::Paragraph, Attrs::new(), start_line, end_line);
        self.inline(content, start_line, end_line);
        self.close(BlockTag::Paragraph);
    }

    fn set_end_line(&mut self, index: usize, end_line: usize) {
        if let Some(span) = self.tokens.get_mut(index).and_then(|t| t.span.as_mut()) {
            span.end_line = end_line;
        }
    }

    /// Hide the paragraphs that are direct children of items of the list
    /// opened at `list_index`.
    fn mark_tight(&mut self, list_index: usize) {
        let mut depth = 0usize;
        for token in &mut self.tokens[list_index..] {
            match token.kind {
                TokenKind::BlockOpen(tag) => {
                    if tag == BlockTag::Paragraph && depth == 2 {
                        token.hidden = true;
                    }
                    depth += 1;
                }
                TokenKind::BlockClose(tag) => {
                    depth = depth.saturating_sub(1);
                    if tag == BlockTag::Paragraph && depth == 2 {
                        token.hidden = true;
                    }
                }
                _ => {}
            }
        }
    }

    fn finish(mut self) -> Vec<Token> {
        while let Some(tag) = self.open.pop() {
            tracing::warn!("Closing unbalanced {tag:?} at end of document");
            self.tokens.push(Token::new(TokenKind::BlockClose(tag)));
        }
        self.tokens
    }
}

pub(crate) struct BlockParser<'o> {
    options: &'o ParseOptions,
}

impl<'o> BlockParser<'o> {
    pub(crate) fn new(options: &'o ParseOptions) -> Self {
        Self { options }
    }

    /// Parse a whole document into block tokens. Inline tokens carry their
    /// source text only; their children are filled in by the inline pass.
    pub(crate) fn parse(&self, lines: &[Line<'_>]) -> Vec<Token> {
        let mut sink = BlockSink::default();
        self.parse_blocks(lines, &mut sink, 0);
        sink.finish()
    }

    /// Parse a run of lines at one nesting level. Returns true when a blank
    /// line separates two blocks at this level (a loose list item).
    fn parse_blocks(&self, lines: &[Line<'_>], sink: &mut BlockSink, depth: usize) -> bool {
        let mut i = 0;
        let mut seen_block = false;
        let mut pending_blank = false;
        let mut loose = false;

        while i < lines.len() {
            if is_blank(lines[i].text) {
                pending_blank = seen_block;
                i += 1;
                continue;
            }
            if pending_blank {
                loose = true;
                pending_blank = false;
            }
            let next = self.parse_block(lines, i, sink, depth);
            // Every rule consumes at least one line.
            i = next.max(i + 1);
            seen_block = true;
        }
        loose
    }

    fn parse_block(&self, lines: &[Line<'_>], i: usize, sink: &mut BlockSink, depth: usize) -> usize {
        let line = lines[i];
        let indent = indent_of(line.text);
        if indent >= 4 {
            return self.indented_code(lines, i, sink);
        }
        let trimmed = &line.text[indent..];
        let nested_ok = depth < self.options.max_nesting_depth;

        if trimmed.starts_with("$$")
            && let Some(next) = self.math_block(lines, i, sink)
        {
            return next;
        }
        if let Some(next) = self.fenced_code(lines, i, indent, sink) {
            return next;
        }
        if let Some((level, content)) = parse_atx_heading(trimmed) {
            sink.open(BlockTag::Heading(level), Attrs::new(), line.number, line.number + 1);
            sink.inline(content, line.number, line.number + 1);
            sink.close(BlockTag::Heading(level));
            return i + 1;
        }
        if is_thematic_break(trimmed) {
            sink.push(Token::new(TokenKind::ThematicBreak).with_span(line.number, line.number + 1));
            return i + 1;
        }
        if nested_ok && trimmed.starts_with('>') {
            return self.blockquote(lines, i, sink, depth);
        }
        if nested_ok
            && parse_list_marker(trimmed).is_some()
            && let Some(next) = self.list(lines, i, sink, depth)
        {
            return next;
        }
        if let Some(end) = html_block_start(trimmed) {
            return self.html_block(lines, i, end, sink);
        }
        if let Some(next) = self.table(lines, i, sink) {
            return next;
        }
        self.paragraph(lines, i, sink)
    }

    /// Whether `lines[i]` starts a block that ends an open paragraph.
    fn interrupts_paragraph(&self, lines: &[Line<'_>], i: usize) -> bool {
        let text = lines[i].text;
        let indent = indent_of(text);
        if indent >= 4 {
            return false;
        }
        let trimmed = &text[indent..];
        parse_fence_start(trimmed).is_some()
            || parse_atx_heading(trimmed).is_some()
            || is_thematic_break(trimmed)
            || trimmed.starts_with('>')
            || parse_list_marker(trimmed).is_some_and(|m| m.can_interrupt_paragraph())
            || html_block_start(trimmed).is_some()
            || (trimmed.starts_with("$$") && scan_block_math(lines, i).is_some())
            || table::is_table_start(lines, i)
    }

    fn math_block(&self, lines: &[Line<'_>], i: usize, sink: &mut BlockSink) -> Option<usize> {
        let Some(math) = scan_block_math(lines, i) else {
            tracing::debug!(line = lines[i].number, "Unterminated $$ block read as text");
            return None;
        };
        let end_line = lines[math.next - 1].number + 1;
        sink.push(
            Token::with_content(TokenKind::MathBlock, math.content)
                .with_span(lines[i].number, end_line),
        );
        if let Some(trailing) = math.trailing {
            sink.paragraph(trailing, end_line - 1, end_line);
        }
        Some(math.next)
    }

    fn fenced_code(
        &self,
        lines: &[Line<'_>],
        i: usize,
        indent: usize,
        sink: &mut BlockSink,
    ) -> Option<usize> {
        let (fence_char, fence_len, info) = parse_fence_start(&lines[i].text[indent..])?;

        let mut body = String::new();
        let mut j = i + 1;
        let mut closed = false;
        while j < lines.len() {
            let text = lines[j].text;
            if is_closing_fence(text, fence_char, fence_len) {
                closed = true;
                break;
            }
            body.push_str(strip_indent(text, indent));
            body.push('\n');
            j += 1;
        }
        let next = if closed { j + 1 } else { j };

        let mut token = Token::with_content(TokenKind::Fence, body)
            .with_span(lines[i].number, lines[i].number + (next - i));
        token.info = info.to_string();
        sink.push(token);
        Some(next)
    }

    fn indented_code(&self, lines: &[Line<'_>], i: usize, sink: &mut BlockSink) -> usize {
        let mut last = i;
        let mut j = i + 1;
        while j < lines.len() {
            let text = lines[j].text;
            if is_blank(text) {
                j += 1;
                continue;
            }
            if indent_of(text) < 4 {
                break;
            }
            last = j;
            j += 1;
        }

        let mut body = String::new();
        for line in &lines[i..=last] {
            body.push_str(strip_indent(line.text, 4));
            body.push('\n');
        }
        sink.push(
            Token::with_content(TokenKind::Fence, body)
                .with_span(lines[i].number, lines[last].number + 1),
        );
        last + 1
    }

    fn html_block(
        &self,
        lines: &[Line<'_>],
        i: usize,
        end: HtmlBlockEnd,
        sink: &mut BlockSink,
    ) -> usize {
        let mut j = i;
        match end {
            HtmlBlockEnd::Terminator(terminator) => {
                while j < lines.len() {
                    let found = lines[j].text.contains(terminator);
                    j += 1;
                    if found {
                        break;
                    }
                }
            }
            HtmlBlockEnd::BlankLine => {
                while j < lines.len() && !is_blank(lines[j].text) {
                    j += 1;
                }
            }
        }

        let content = lines[i..j]
            .iter()
            .map(|l| l.text)
            .collect::<Vec<_>>()
            .join("\n");
        sink.push(
            Token::with_content(TokenKind::HtmlBlock, content)
                .with_span(lines[i].number, lines[j - 1].number + 1),
        );
        j
    }

    fn paragraph(&self, lines: &[Line<'_>], i: usize, sink: &mut BlockSink) -> usize {
        let mut j = i + 1;
        while j < lines.len() {
            let text = lines[j].text;
            if is_blank(text) {
                break;
            }
            let indent = indent_of(text);
            if indent < 4
                && let Some(level) = parse_setext_underline(&text[indent..])
            {
                let content = join_paragraph_lines(&lines[i..j]);
                let (start, end) = (lines[i].number, lines[j].number + 1);
                sink.open(BlockTag::Heading(level), Attrs::new(), start, end);
                sink.inline(content.trim(), start, end);
                sink.close(BlockTag::Heading(level));
                return j + 1;
            }
            if self.interrupts_paragraph(lines, j) {
                break;
            }
            j += 1;
        }

        let content = join_paragraph_lines(&lines[i..j]);
        sink.paragraph(&content, lines[i].number, lines[j - 1].number + 1);
        j
    }
}

/// Remove up to `n` leading spaces.
fn strip_indent(text: &str, n: usize) -> &str {
    let strip = indent_of(text).min(n);
    &text[strip..]
}

fn join_paragraph_lines(lines: &[Line<'_>]) -> String {
    let mut content = String::new();
    for (idx, line) in lines.iter().enumerate() {
        if idx > 0 {
            content.push('\n');
        }
        content.push_str(line.text.trim_start());
    }
    content.truncate(content.trim_end().len());
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::split_lines;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let options = ParseOptions::default();
        let lines = split_lines(src);
        BlockParser::new(&options)
            .parse(&lines)
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn paragraph_and_heading() {
        assert_eq!(
            kinds("# Title\n\nText"),
            vec![
                TokenKind::BlockOpen(BlockTag::Heading(1)),
                TokenKind::Inline,
                TokenKind::BlockClose(BlockTag::Heading(1)),
                TokenKind::BlockOpen(BlockTag::Paragraph),
                TokenKind::Inline,
                TokenKind::BlockClose(BlockTag::Paragraph),
            ]
        );
    }

    #[test]
    fn setext_heading() {
        let k = kinds("Title\n===");
        assert_eq!(k[0], TokenKind::BlockOpen(BlockTag::Heading(1)));
    }

    #[test]
    fn unterminated_math_falls_back_to_paragraph() {
        let k = kinds("$$\nx^2");
        assert_eq!(k[0], TokenKind::BlockOpen(BlockTag::Paragraph));
    }

    #[test]
    fn math_block_with_trailing_text() {
        let k = kinds("$$x$$ tail");
        assert_eq!(k[0], TokenKind::MathBlock);
        assert_eq!(k[1], TokenKind::BlockOpen(BlockTag::Paragraph));
    }

    #[test]
    fn unclosed_fence_runs_to_end() {
        let options = ParseOptions::default();
        let lines = split_lines("```rust\nfn main() {}\n");
        let tokens = BlockParser::new(&options).parse(&lines);
        assert_eq!(tokens[0].kind, TokenKind::Fence);
        assert_eq!(tokens[0].info, "rust");
        assert_eq!(tokens[0].content, "fn main() {}\n\n");
    }

    #[test]
    fn opens_and_closes_balance() {
        let options = ParseOptions::default();
        let lines = split_lines("> - a\n>   - b\n> c\n\n1. x\n2. y");
        let tokens = BlockParser::new(&options).parse(&lines);
        let mut depth = 0i32;
        for t in &tokens {
            match t.kind {
                TokenKind::BlockOpen(_) => depth += 1,
                TokenKind::BlockClose(_) => depth -= 1,
                _ => {}
            }
            assert!(depth >= 0);
        }
        assert_eq!(depth, 0);
    }

    #[test]
    fn nesting_limit_degrades_to_paragraph() {
        let options = ParseOptions {
            max_nesting_depth: 1,
            ..ParseOptions::default()
        };
        let lines = split_lines("> > deep");
        let tokens = BlockParser::new(&options).parse(&lines);
        assert_eq!(tokens[0].kind, TokenKind::BlockOpen(BlockTag::Blockquote));
        assert_eq!(tokens[1].kind, TokenKind::BlockOpen(BlockTag::Paragraph));
        assert_eq!(tokens[2].content, "> deep");
    }
}
