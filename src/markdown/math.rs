//! Block (`$$...$$`) and inline (`$...$`) math recognition
//!
//! Both scanners are pure: they report what they found and leave token
//! emission to the block and inline parsers. A failed scan is not an error;
//! the caller reads the source with the base grammar instead.

use super::block::Line;

/// A recognised `$$` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BlockMath<'a> {
    /// Trimmed LaTeX between the delimiters, unescaped
    pub content: String,
    /// Index of the first line after the block
    pub next: usize,
    /// Text following the closing `$$` on its line
    pub trailing: Option<&'a str>,
}

/// Scan a `$$` block starting at `lines[start]`, whose text begins with `$$`
/// once indentation is removed.
///
/// The closing delimiter may sit on the opening line, at the end of (or
/// anywhere in) a later line, or open a later line. Returns `None` when no
/// closing delimiter exists before `lines` ends.
pub(crate) fn scan_block_math<'a>(lines: &[Line<'a>], start: usize) -> Option<BlockMath<'a>> {
    let first = lines.get(start)?.text.trim_start();
    let rest = first.strip_prefix("$$")?;

    if let Some(close) = rest.find("$$") {
        let content = rest[..close].trim();
        if content.is_empty() {
            return None;
        }
        return Some(BlockMath {
            content: content.to_string(),
            next: start + 1,
            trailing: non_empty(&rest[close + 2..]),
        });
    }

    for (offset, line) in lines[start + 1..].iter().enumerate() {
        let Some(close) = line.text.find("$$") else {
            continue;
        };
        let closing_index = start + 1 + offset;
        let opens_line = line.text[..close].trim().is_empty();

        let mut parts: Vec<&str> = Vec::with_capacity(offset + 2);
        parts.push(rest);
        parts.extend(lines[start + 1..closing_index].iter().map(|l| l.text));
        if !opens_line {
            parts.push(&line.text[..close]);
        }

        let content = parts.join("\n");
        let content = content.trim();
        if content.is_empty() {
            return None;
        }
        return Some(BlockMath {
            content: content.to_string(),
            next: closing_index + 1,
            trailing: non_empty(&line.text[close + 2..]),
        });
    }

    None
}

fn non_empty(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}

/// Scan inline math at `src[start] == '$'`.
///
/// Returns the trimmed content and the byte offset just past the closing
/// `$`. The opening `$` must not be followed by whitespace; a closing `$`
/// must not follow whitespace or precede a digit, so `$5 and $6` stays
/// text. A newline before a valid closer aborts the match.
pub(crate) fn scan_inline_math(src: &str, start: usize) -> Option<(String, usize)> {
    let bytes = src.as_bytes();
    let open_next = *bytes.get(start + 1)?;
    if open_next == b'$' || open_next.is_ascii_whitespace() {
        return None;
    }

    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => return None,
            b'\\' => {
                i += 2;
                continue;
            }
            b'$' => {
                let prev = bytes[i - 1];
                let next = bytes.get(i + 1).copied();
                let valid = !prev.is_ascii_whitespace() && !next.is_some_and(|b| b.is_ascii_digit());
                if valid {
                    let content = src[start + 1..i].trim();
                    if content.is_empty() {
                        return None;
                    }
                    return Some((content.to_string(), i + 1));
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Scan a same-line `$$...$$` span at `src[start..]`, as written inside a
/// table cell. Returns the trimmed content and the offset past the closer.
pub(crate) fn scan_cell_block_math(src: &str, start: usize) -> Option<(String, usize)> {
    let rest = src.get(start..)?.strip_prefix("$$")?;
    let line = &rest[..rest.find('\n').unwrap_or(rest.len())];
    let close = line.find("$$")?;
    let content = line[..close].trim();
    if content.is_empty() {
        return None;
    }
    Some((content.to_string(), start + 2 + close + 2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(src: &str) -> Vec<Line<'_>> {
        src.split('\n')
            .enumerate()
            .map(|(number, text)| Line { text, number })
            .collect()
    }

    #[test]
    fn same_line_block() {
        let l = lines("$$a+b+c$$");
        let m = scan_block_math(&l, 0).expect("closed on the same line");
        assert_eq!(m.content, "a+b+c");
        assert_eq!(m.next, 1);
        assert_eq!(m.trailing, None);
    }

    #[test]
    fn multi_line_block_with_closing_at_line_end() {
        let l = lines("$$\\begin{x}\na\n\\end{x}$$\nafter");
        let m = scan_block_math(&l, 0).expect("closed");
        assert_eq!(m.content, "\\begin{x}\na\n\\end{x}");
        assert_eq!(m.next, 3);
    }

    #[test]
    fn closing_line_starting_with_delimiter_is_excluded() {
        let l = lines("$$\nx^2\n$$ tail");
        let m = scan_block_math(&l, 0).expect("closed");
        assert_eq!(m.content, "x^2");
        assert_eq!(m.trailing, Some("tail"));
    }

    #[test]
    fn unterminated_block_is_rejected() {
        let l = lines("$$\nx^2\nmore");
        assert_eq!(scan_block_math(&l, 0), None);
    }

    #[test]
    fn cell_block_math_closes_on_the_same_line() {
        assert_eq!(
            scan_cell_block_math("a $$x+y$$ b", 2),
            Some(("x+y".to_string(), 9))
        );
        assert_eq!(scan_cell_block_math("$$x\ny$$", 0), None);
        assert_eq!(scan_cell_block_math("$$ $$", 0), None);
    }

    #[test]
    fn inline_math_basic() {
        assert_eq!(scan_inline_math("$x^2$ y", 0), Some(("x^2".to_string(), 5)));
    }

    #[test]
    fn inline_math_aborts_on_newline() {
        assert_eq!(scan_inline_math("$x\ny$", 0), None);
    }

    #[test]
    fn inline_math_rejects_currency() {
        assert_eq!(scan_inline_math("$5 and $6", 0), None);
    }

    #[test]
    fn inline_math_skips_escaped_dollar() {
        assert_eq!(
            scan_inline_math(r"$a\$b$", 0),
            Some((r"a\$b".to_string(), 6))
        );
    }
}
