//! Inline parsing
//!
//! A single left-to-right scan turns inline source into tokens, leaving
//! `*`, `_` and `~~` runs as pending delimiters. Emphasis is resolved once
//! the scan is complete; link and image labels are parsed recursively.

mod emphasis;
mod links;

use emphasis::{Delim, process_emphasis};
use links::{
    find_backtick_run, find_label_end, is_safe_url, normalize_url, parse_link_tail, scan_autolink,
    scan_entity, scan_inline_html, unescape,
};

use super::ParseOptions;
use super::math::{scan_cell_block_math, scan_inline_math};
use super::token::{InlineTag, Token, TokenKind};
use crate::entities;

enum Piece {
    Token(Token),
    Delim(usize),
}

pub(crate) struct InlineParser<'o> {
    options: &'o ParseOptions,
}

impl<'o> InlineParser<'o> {
    pub(crate) fn new(options: &'o ParseOptions) -> Self {
        Self { options }
    }

    pub(crate) fn parse(&self, src: &str) -> Vec<Token> {
        self.parse_at_depth(src, 0, false, false)
    }

    /// Parse table-cell content, where a same-line `$$...$$` is block math.
    pub(crate) fn parse_cell(&self, src: &str) -> Vec<Token> {
        self.parse_at_depth(src, 0, false, true)
    }

    fn parse_at_depth(&self, src: &str, depth: usize, in_link: bool, in_cell: bool) -> Vec<Token> {
        let mut scan = Scan::new(src);
        let bytes = src.as_bytes();
        let brackets_allowed = depth < self.options.max_nesting_depth;

        while scan.pos < bytes.len() {
            let b = bytes[scan.pos];
            match b {
                b'\\' => scan.backslash(),
                b'`' => scan.code_span(),
                b'$' if in_cell => match scan_cell_block_math(src, scan.pos) {
                    Some((content, end)) => {
                        scan.push(Token::with_content(TokenKind::MathBlock, content));
                        scan.pos = end;
                    }
                    None => scan.math(),
                },
                b'$' => scan.math(),
                b'*' | b'_' => scan.delim_run(b),
                b'~' => scan.tilde_run(),
                b'\n' => scan.line_break(),
                b'<' => scan.angle(),
                b'&' => scan.entity(),
                b'!' if brackets_allowed && bytes.get(scan.pos + 1) == Some(&b'[') => {
                    if !self.link_or_image(&mut scan, depth, true) {
                        scan.literal(1);
                    }
                }
                b'[' if brackets_allowed && !in_link => {
                    if !self.link_or_image(&mut scan, depth, false) {
                        scan.literal(1);
                    }
                }
                _ => {
                    let run = bytes[scan.pos..]
                        .iter()
                        .take_while(|&&c| !is_special(c))
                        .count()
                        .max(1);
                    scan.literal_run(run);
                }
            }
        }
        scan.finish()
    }

    /// Try a `[label](dest)` link or `![alt](src)` image at the scan
    /// position. Returns false, consuming nothing, when the syntax does not
    /// complete or the destination is unsafe.
    fn link_or_image(&self, scan: &mut Scan<'_>, depth: usize, image: bool) -> bool {
        let src = scan.src;
        let open = if image { scan.pos + 1 } else { scan.pos };
        let Some(close) = find_label_end(src, open) else {
            return false;
        };
        let Some(tail) = parse_link_tail(src, close + 1) else {
            return false;
        };
        if !is_safe_url(&tail.destination) {
            tracing::debug!(destination = %tail.destination, "Refusing unsafe link destination");
            return false;
        }

        let label = &src[open + 1..close];
        let href = normalize_url(&tail.destination);
        if image {
            let children = self.parse_at_depth(label, depth + 1, true, false);
            let mut token = Token::with_content(TokenKind::Image, plain_text(&children))
                .with_attr("src", href);
            if let Some(title) = tail.title {
                token.set_attr("title", title);
            }
            token.children = children;
            scan.push(token);
        } else {
            let mut open_token = Token::new(TokenKind::InlineOpen(InlineTag::Link)).with_attr("href", href);
            if let Some(title) = tail.title {
                open_token.set_attr("title", title);
            }
            scan.push(open_token);
            for child in self.parse_at_depth(label, depth + 1, true, false) {
                scan.push(child);
            }
            scan.push(Token::new(TokenKind::InlineClose(InlineTag::Link)));
        }
        scan.pos = tail.end;
        true
    }
}

fn is_special(b: u8) -> bool {
    matches!(
        b,
        b'\\' | b'`' | b'$' | b'*' | b'_' | b'~' | b'\n' | b'<' | b'&' | b'!' | b'['
    )
}

/// Concatenated text of an inline token list, used for `alt` attributes.
pub(crate) fn plain_text(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        match token.kind {
            TokenKind::Text | TokenKind::CodeInline | TokenKind::MathInline | TokenKind::Image => {
                out.push_str(&token.content);
            }
            TokenKind::SoftBreak | TokenKind::HardBreak => out.push(' '),
            _ => {}
        }
    }
    out
}

/// Scanner state for one inline source string
struct Scan<'s> {
    src: &'s str,
    pos: usize,
    pending: String,
    pieces: Vec<Piece>,
    delims: Vec<Delim>,
}

impl<'s> Scan<'s> {
    fn new(src: &'s str) -> Self {
        Self {
            src,
            pos: 0,
            pending: String::new(),
            pieces: Vec::new(),
            delims: Vec::new(),
        }
    }

    fn flush(&mut self) {
        if !self.pending.is_empty() {
            let text = std::mem::take(&mut self.pending);
            self.pieces.push(Piece::Token(Token::text(text)));
        }
    }

    fn push(&mut self, token: Token) {
        self.flush();
        self.pieces.push(Piece::Token(token));
    }

    fn literal(&mut self, len: usize) {
        self.literal_run(len);
    }

    fn literal_run(&mut self, len: usize) {
        let mut end = (self.pos + len).min(self.src.len());
        while !self.src.is_char_boundary(end) {
            end += 1;
        }
        self.pending.push_str(&self.src[self.pos..end]);
        self.pos = end;
    }

    fn backslash(&mut self) {
        let next = self.src.as_bytes().get(self.pos + 1).copied();
        match next {
            Some(b'\n') => {
                self.push(Token::new(TokenKind::HardBreak));
                self.pos += 2;
                self.skip_leading_spaces();
            }
            Some(c) if c.is_ascii_punctuation() => {
                self.pending.push(c as char);
                self.pos += 2;
            }
            _ => self.literal(1),
        }
    }

    fn code_span(&mut self) {
        let bytes = self.src.as_bytes();
        let run = bytes[self.pos..].iter().take_while(|&&b| b == b'`').count();
        let Some(close) = find_backtick_run(bytes, self.pos + run, run) else {
            self.literal_run(run);
            return;
        };

        let mut content = self.src[self.pos + run..close].replace('\n', " ");
        if content.len() >= 2
            && content.starts_with(' ')
            && content.ends_with(' ')
            && !content.bytes().all(|b| b == b' ')
        {
            content = content[1..content.len() - 1].to_string();
        }
        self.push(Token::with_content(TokenKind::CodeInline, content));
        self.pos = close + run;
    }

    fn math(&mut self) {
        if self.src.as_bytes().get(self.pos + 1) == Some(&b'$') {
            self.literal_run(2);
            return;
        }
        match scan_inline_math(self.src, self.pos) {
            Some((content, end)) => {
                self.push(Token::with_content(TokenKind::MathInline, content));
                self.pos = end;
            }
            None => self.literal(1),
        }
    }

    fn delim_run(&mut self, ch: u8) {
        let count = self.src.as_bytes()[self.pos..]
            .iter()
            .take_while(|&&b| b == ch)
            .count();
        let before = self.src[..self.pos].chars().next_back();
        let after = self.src[self.pos + count..].chars().next();
        self.flush();
        self.pieces.push(Piece::Delim(self.delims.len()));
        self.delims.push(Delim::new(ch, count, before, after));
        self.pos += count;
    }

    fn tilde_run(&mut self) {
        let count = self.src.as_bytes()[self.pos..]
            .iter()
            .take_while(|&&b| b == b'~')
            .count();
        if count == 2 {
            self.delim_run(b'~');
        } else {
            self.literal_run(count);
        }
    }

    fn line_break(&mut self) {
        let trailing = self.pending.len() - self.pending.trim_end_matches(' ').len();
        self.pending.truncate(self.pending.len() - trailing);
        if trailing >= 2 {
            self.push(Token::new(TokenKind::HardBreak));
        } else {
            self.push(Token::new(TokenKind::SoftBreak));
        }
        self.pos += 1;
        self.skip_leading_spaces();
    }

    fn skip_leading_spaces(&mut self) {
        let bytes = self.src.as_bytes();
        while self.pos < bytes.len() && bytes[self.pos] == b' ' {
            self.pos += 1;
        }
    }

    fn angle(&mut self) {
        let rest = &self.src[self.pos..];
        if let Some((href, text, len)) = scan_autolink(rest) {
            if is_safe_url(&href) {
                self.push(
                    Token::new(TokenKind::InlineOpen(InlineTag::Link))
                        .with_attr("href", normalize_url(&href)),
                );
                self.push(Token::text(text));
                self.push(Token::new(TokenKind::InlineClose(InlineTag::Link)));
                self.pos += len;
                return;
            }
        } else if let Some(len) = scan_inline_html(rest) {
            self.push(Token::with_content(TokenKind::HtmlInline, &rest[..len]));
            self.pos += len;
            return;
        }
        self.literal(1);
    }

    fn entity(&mut self) {
        let rest = &self.src[self.pos..];
        match scan_entity(rest) {
            Some(len) => {
                self.pending.push_str(&entities::decode(&rest[..len]));
                self.pos += len;
            }
            None => self.literal(1),
        }
    }

    /// Resolve emphasis and flatten pieces into tokens, merging adjacent
    /// text.
    fn finish(mut self) -> Vec<Token> {
        self.flush();
        process_emphasis(&mut self.delims);

        let mut out: Vec<Token> = Vec::with_capacity(self.pieces.len());
        for piece in self.pieces {
            match piece {
                Piece::Token(token) => push_merged(&mut out, token),
                Piece::Delim(index) => {
                    let delim = &self.delims[index];
                    for tag in &delim.closes {
                        out.push(Token::new(TokenKind::InlineClose(*tag)));
                    }
                    if delim.count > 0 {
                        let literal = (delim.ch as char).to_string().repeat(delim.count);
                        push_merged(&mut out, Token::text(literal));
                    }
                    for tag in delim.opens.iter().rev() {
                        out.push(Token::new(TokenKind::InlineOpen(*tag)));
                    }
                }
            }
        }
        out
    }
}

fn push_merged(out: &mut Vec<Token>, token: Token) {
    if token.kind == TokenKind::Text
        && let Some(last) = out.last_mut()
        && last.kind == TokenKind::Text
    {
        last.content.push_str(&token.content);
        return;
    }
    out.push(token);
}

/// Source text with backslash escapes and entities resolved; used for
/// fence info strings.
pub(crate) fn unescape_info(info: &str) -> String {
    unescape(info).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> Vec<Token> {
        let options = ParseOptions::default();
        InlineParser::new(&options).parse(src)
    }

    fn kinds(src: &str) -> Vec<TokenKind> {
        parse(src).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn emphasis_and_strong() {
        assert_eq!(
            kinds("*a* **b**"),
            vec![
                TokenKind::InlineOpen(InlineTag::Emphasis),
                TokenKind::Text,
                TokenKind::InlineClose(InlineTag::Emphasis),
                TokenKind::Text,
                TokenKind::InlineOpen(InlineTag::Strong),
                TokenKind::Text,
                TokenKind::InlineClose(InlineTag::Strong),
            ]
        );
    }

    #[test]
    fn triple_star_nests_strong_inside_emphasis() {
        assert_eq!(
            kinds("***a***"),
            vec![
                TokenKind::InlineOpen(InlineTag::Emphasis),
                TokenKind::InlineOpen(InlineTag::Strong),
                TokenKind::Text,
                TokenKind::InlineClose(InlineTag::Strong),
                TokenKind::InlineClose(InlineTag::Emphasis),
            ]
        );
    }

    #[test]
    fn unmatched_delimiters_stay_text() {
        let tokens = parse("a * b");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].content, "a * b");
    }

    #[test]
    fn strikethrough_needs_two_tildes() {
        assert_eq!(kinds("~~x~~")[0], TokenKind::InlineOpen(InlineTag::Strikethrough));
        assert_eq!(kinds("~x~"), vec![TokenKind::Text]);
    }

    #[test]
    fn inline_math_and_currency() {
        let tokens = parse("cost $x^2$ and $5");
        assert_eq!(tokens[1].kind, TokenKind::MathInline);
        assert_eq!(tokens[1].content, "x^2");
        assert_eq!(tokens[2].content, " and $5");
    }

    #[test]
    fn newline_aborts_inline_math() {
        let tokens = parse("$a\nb$");
        assert!(tokens.iter().all(|t| t.kind != TokenKind::MathInline));
    }

    #[test]
    fn code_span_strips_one_space() {
        let tokens = parse("`` `x` ``");
        assert_eq!(tokens[0].kind, TokenKind::CodeInline);
        assert_eq!(tokens[0].content, "`x`");
    }

    #[test]
    fn link_with_title() {
        let tokens = parse(r#"[a *b*](http://x.y "T")"#);
        assert_eq!(tokens[0].attr("href"), Some("http://x.y"));
        assert_eq!(tokens[0].attr("title"), Some("T"));
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::InlineClose(InlineTag::Link)));
    }

    #[test]
    fn unsafe_link_stays_text() {
        let tokens = parse("[x](javascript:alert(1))");
        assert!(tokens.iter().all(|t| t.kind == TokenKind::Text));
    }

    #[test]
    fn image_alt_is_plain_text() {
        let tokens = parse("![a *b*](p.png)");
        assert_eq!(tokens[0].kind, TokenKind::Image);
        assert_eq!(tokens[0].content, "a b");
        assert_eq!(tokens[0].attr("src"), Some("p.png"));
    }

    #[test]
    fn escapes_and_entities() {
        let tokens = parse(r"\*x\* &amp; &copy;");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].content, "*x* & ©");
    }

    #[test]
    fn hard_and_soft_breaks() {
        assert_eq!(
            kinds("a  \nb\nc"),
            vec![
                TokenKind::Text,
                TokenKind::HardBreak,
                TokenKind::Text,
                TokenKind::SoftBreak,
                TokenKind::Text,
            ]
        );
    }

    #[test]
    fn raw_html_and_autolink() {
        let tokens = parse("<b>x</b> <https://a.b>");
        assert_eq!(tokens[0].kind, TokenKind::HtmlInline);
        assert_eq!(tokens[0].content, "<b>");
        assert_eq!(tokens[4].attr("href"), Some("https://a.b"));
    }
}
