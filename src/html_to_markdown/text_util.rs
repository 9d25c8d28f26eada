//! Text escaping and whitespace helpers for the serializer

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static ENTITY_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^&(?:#[xX][0-9a-fA-F]{1,6}|#[0-9]{1,7}|[A-Za-z][A-Za-z0-9]{1,31});")
        .expect("ENTITY_LIKE: hardcoded regex is valid")
});

/// Collapse every whitespace run (newlines included) to one space. Borrows
/// when nothing changes.
pub(crate) fn compress_whitespace(text: &str) -> Cow<'_, str> {
    let needs_work = text
        .as_bytes()
        .windows(2)
        .any(|w| w[0].is_ascii_whitespace() && w[1].is_ascii_whitespace())
        || text.bytes().any(|b| b.is_ascii_whitespace() && b != b' ');
    if !needs_work {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for ch in text.chars() {
        if ch.is_ascii_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    Cow::Owned(out)
}

/// Lookup table for body escape characters: \ * _ ` [ ] ~ $ |
///
/// `|` is escaped only inside table cells, by the cell rule.
const BODY_ESCAPE_LUT: [bool; 256] = {
    let mut lut = [false; 256];
    lut[b'\\' as usize] = true;
    lut[b'*' as usize] = true;
    lut[b'_' as usize] = true;
    lut[b'`' as usize] = true;
    lut[b'[' as usize] = true;
    lut[b']' as usize] = true;
    lut[b'~' as usize] = true;
    lut[b'$' as usize] = true;
    lut
};

/// Lookup table for line-start escape characters: = > - + # 0-9
const LINE_START_LUT: [bool; 256] = {
    let mut lut = [false; 256];
    lut[b'=' as usize] = true;
    lut[b'>' as usize] = true;
    lut[b'-' as usize] = true;
    lut[b'+' as usize] = true;
    lut[b'#' as usize] = true;
    let mut d = b'0';
    while d <= b'9' {
        lut[d as usize] = true;
        d += 1;
    }
    lut
};

/// Escape markdown-significant characters in a text node.
///
/// - Body escapes: `\` `*` `_` `` ` `` `[` `]` `~` `$` get a backslash
/// - `<` before a letter, `/`, `!` or `?` becomes `\<` so escaped tags stay
///   text
/// - `&` starting an entity reference becomes `\&amp;`, which the final
///   entity decode turns back into `\&`
/// - Line-start `=` `>`, `-`/`+` before a space, ATX `#` and `N.` are
///   escaped so the text cannot open a block
pub(crate) fn escape_text(text: &str) -> Cow<'_, str> {
    if text.is_empty() {
        return Cow::Borrowed(text);
    }
    let bytes = text.as_bytes();
    let needs_line_start_escape = LINE_START_LUT[bytes[0] as usize];
    let needs_body_escape = bytes
        .iter()
        .any(|&b| BODY_ESCAPE_LUT[b as usize] || b == b'<' || b == b'&');
    if !needs_body_escape && !needs_line_start_escape {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 16);
    let mut last = 0;
    for (idx, ch) in text.char_indices() {
        let replacement: Option<&str> = match ch {
            '\\' => Some("\\\\"),
            '*' => Some("\\*"),
            '_' => Some("\\_"),
            '`' => Some("\\`"),
            '[' => Some("\\["),
            ']' => Some("\\]"),
            '~' => Some("\\~"),
            '$' => Some("\\$"),
            '<' if bytes
                .get(idx + 1)
                .is_some_and(|&b| b.is_ascii_alphabetic() || matches!(b, b'/' | b'!' | b'?')) =>
            {
                Some("\\<")
            }
            '&' if ENTITY_LIKE.is_match(&text[idx..]) => Some("\\&amp;"),
            _ => None,
        };
        if let Some(r) = replacement {
            escaped.push_str(&text[last..idx]);
            escaped.push_str(r);
            last = idx + ch.len_utf8();
        }
    }
    escaped.push_str(&text[last..]);

    Cow::Owned(handle_line_start_escaping(escaped))
}

fn handle_line_start_escaping(mut escaped: String) -> String {
    let Some(&first) = escaped.as_bytes().first() else {
        return escaped;
    };
    match first {
        b'=' | b'>' => escaped.insert(0, '\\'),
        b'-' | b'+' => {
            if matches!(escaped.as_bytes().get(1), None | Some(b' ')) {
                escaped.insert(0, '\\');
            }
        }
        b'#' => {
            if is_markdown_atx_heading(&escaped) {
                escaped.insert(0, '\\');
            }
        }
        b'0'..=b'9' => {
            if let Some(dot) = index_of_markdown_ordered_item_dot(&escaped) {
                escaped.insert(dot, '\\');
            }
        }
        _ => {}
    }
    escaped
}

/// `#` to `######` followed by a space or the end of the text.
pub(crate) fn is_markdown_atx_heading(text: &str) -> bool {
    let hashes = text.bytes().take_while(|&b| b == b'#').count();
    (1..=6).contains(&hashes) && matches!(text.as_bytes().get(hashes), None | Some(b' '))
}

/// Byte index of the `.` or `)` in a leading `12.` / `12)` list marker.
pub(crate) fn index_of_markdown_ordered_item_dot(text: &str) -> Option<usize> {
    let digits = text.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 || digits > 9 {
        return None;
    }
    let delim = *text.as_bytes().get(digits)?;
    if delim != b'.' && delim != b')' {
        return None;
    }
    matches!(text.as_bytes().get(digits + 1), None | Some(b' ')).then_some(digits)
}

/// Indent every line but the first by `width` spaces. Blank lines stay
/// empty.
pub(crate) fn indent_text_except_first_line(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    let mut out = String::with_capacity(text.len() + width * 4);
    for (idx, line) in text.split('\n').enumerate() {
        if idx > 0 {
            out.push('\n');
            if !line.is_empty() {
                out.push_str(&pad);
            }
        }
        out.push_str(line);
    }
    out
}

/// Prefix every line with `> `, or `>` for blank lines.
pub(crate) fn quote_lines(text: &str) -> String {
    text.split('\n')
        .map(|line| if line.is_empty() { ">".to_string() } else { format!("> {line}") })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Longest run of `ch` in `text`.
pub(crate) fn longest_run(text: &str, ch: char) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in text.chars() {
        if c == ch {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compress_borrows_clean_text() {
        assert!(matches!(compress_whitespace("a b"), Cow::Borrowed(_)));
        assert_eq!(compress_whitespace("a \n\t b"), "a b");
    }

    #[test]
    fn body_characters_are_escaped() {
        assert_eq!(escape_text("a*b_c`d[e]f"), r"a\*b\_c\`d\[e\]f");
        assert_eq!(escape_text("$5 ~x~"), r"\$5 \~x\~");
    }

    #[test]
    fn tag_like_text_is_escaped() {
        assert_eq!(escape_text("<script>x</script>"), r"\<script>x\</script>");
        assert_eq!(escape_text("a < b"), "a < b");
    }

    #[test]
    fn entity_like_text_is_protected() {
        assert_eq!(escape_text("&amp; & AT&T"), r"\&amp;amp; & AT&T");
    }

    #[test]
    fn line_start_markers() {
        assert_eq!(escape_text("# not a heading"), r"\# not a heading");
        assert_eq!(escape_text("1. not a list"), r"1\. not a list");
        assert_eq!(escape_text("- not a list"), r"\- not a list");
        assert_eq!(escape_text("-1"), "-1");
        assert_eq!(escape_text("2024 was"), "2024 was");
    }

    #[test]
    fn indentation_skips_first_and_blank_lines() {
        assert_eq!(indent_text_except_first_line("a\n\nb", 2), "a\n\n  b");
    }

    #[test]
    fn quoting() {
        assert_eq!(quote_lines("a\n\nb"), "> a\n>\n> b");
    }
}
