//! Line classifiers for leaf blocks and container markers
//!
//! Every function here looks at a single line that has already had its
//! container prefixes and up to three spaces of indentation removed.

use regex::Regex;
use std::sync::LazyLock;

/// Column alignment from a table separator row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Alignment {
    None,
    Left,
    Center,
    Right,
}

impl Alignment {
    pub(crate) fn style(self) -> Option<&'static str> {
        match self {
            Alignment::None => None,
            Alignment::Left => Some("text-align:left"),
            Alignment::Center => Some("text-align:center"),
            Alignment::Right => Some("text-align:right"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListKind {
    Bullet(u8),
    Ordered(u8),
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct ListMarker {
    pub kind: ListKind,
    /// Bytes taken by the marker itself (`-` = 1, `12.` = 3)
    pub width: usize,
    pub start: u32,
    pub empty: bool,
}

impl ListMarker {
    /// Whether `other` continues the same list.
    pub(crate) fn same_list(&self, other: &ListMarker) -> bool {
        self.kind == other.kind
    }

    /// An empty item, or an ordered item not starting at 1, cannot
    /// interrupt a paragraph.
    pub(crate) fn can_interrupt_paragraph(&self) -> bool {
        if self.empty {
            return false;
        }
        match self.kind {
            ListKind::Bullet(_) => true,
            ListKind::Ordered(_) => self.start == 1,
        }
    }
}

/// How an HTML block ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HtmlBlockEnd {
    /// Ends on the line containing this terminator
    Terminator(&'static str),
    /// Ends before the next blank line
    BlankLine,
}

pub(crate) fn is_blank(line: &str) -> bool {
    line.bytes().all(|b| b == b' ' || b == b'\t')
}

pub(crate) fn indent_of(line: &str) -> usize {
    line.bytes().take_while(|&b| b == b' ').count()
}

pub(crate) fn is_thematic_break(line: &str) -> bool {
    let mut marker = 0u8;
    let mut count = 0u32;
    for b in line.bytes() {
        match b {
            b' ' | b'\t' => continue,
            b'*' | b'-' | b'_' => {
                if marker == 0 {
                    marker = b;
                } else if b != marker {
                    return false;
                }
                count += 1;
            }
            _ => return false,
        }
    }
    count >= 3
}

/// Parse `## Heading ##` into its level and content.
pub(crate) fn parse_atx_heading(line: &str) -> Option<(u8, &str)> {
    let level = line.bytes().take_while(|&b| b == b'#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &line[level..];
    if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
        return None;
    }
    Some((level as u8, strip_closing_hashes(rest.trim())))
}

fn strip_closing_hashes(s: &str) -> &str {
    let without = s.trim_end_matches('#');
    if without.len() == s.len() {
        return s;
    }
    if without.is_empty() {
        return "";
    }
    if without.ends_with([' ', '\t']) {
        without.trim_end()
    } else {
        s
    }
}

/// `===` gives level 1, `---` level 2.
pub(crate) fn parse_setext_underline(line: &str) -> Option<u8> {
    let trimmed = line.trim();
    let first = *trimmed.as_bytes().first()?;
    if first != b'=' && first != b'-' {
        return None;
    }
    if !trimmed.bytes().all(|b| b == first) {
        return None;
    }
    Some(if first == b'=' { 1 } else { 2 })
}

/// Returns the fence character, its run length and the info string.
pub(crate) fn parse_fence_start(line: &str) -> Option<(u8, usize, &str)> {
    let ch = *line.as_bytes().first()?;
    if ch != b'`' && ch != b'~' {
        return None;
    }
    let count = line.bytes().take_while(|&b| b == ch).count();
    if count < 3 {
        return None;
    }
    let info = line[count..].trim();
    if ch == b'`' && info.contains('`') {
        return None;
    }
    Some((ch, count, info))
}

/// `line` is the raw line including indentation.
pub(crate) fn is_closing_fence(line: &str, fence_char: u8, fence_len: usize) -> bool {
    let indent = indent_of(line);
    if indent > 3 {
        return false;
    }
    let rest = &line[indent..];
    let run = rest.bytes().take_while(|&b| b == fence_char).count();
    run >= fence_len && is_blank(&rest[run..])
}

/// Parse a GFM separator row such as `| --- | :-: | --: |`.
pub(crate) fn parse_table_separator(line: &str) -> Option<Vec<Alignment>> {
    let trimmed = line.trim();
    if !trimmed.contains('|') && !trimmed.contains('-') {
        return None;
    }
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    if inner.trim().is_empty() {
        return None;
    }

    let mut alignments = Vec::new();
    for cell in inner.split('|') {
        let c = cell.trim();
        let left = c.starts_with(':');
        let right = c.ends_with(':') && c.len() > 1;
        let dashes = c.trim_start_matches(':').trim_end_matches(':');
        if dashes.is_empty() || !dashes.bytes().all(|b| b == b'-') {
            return None;
        }
        alignments.push(match (left, right) {
            (true, true) => Alignment::Center,
            (true, false) => Alignment::Left,
            (false, true) => Alignment::Right,
            (false, false) => Alignment::None,
        });
    }

    // A bare `---` is a thematic break or setext underline, not a table.
    if !trimmed.contains('|') {
        return None;
    }
    Some(alignments)
}

/// Split a table row on unescaped pipes.
///
/// `\|` becomes a literal pipe in the cell text before inline parsing, so
/// pipes inside code spans and math survive.
pub(crate) fn split_table_row(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = if inner.ends_with('|') && !inner.ends_with("\\|") {
        &inner[..inner.len() - 1]
    } else {
        inner
    };

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                current.push('|');
                chars.next();
            }
            '|' => {
                cells.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    cells.push(current.trim().to_string());
    cells
}

pub(crate) fn parse_list_marker(line: &str) -> Option<ListMarker> {
    let bytes = line.as_bytes();
    let b0 = *bytes.first()?;

    let (kind, width, start) = if matches!(b0, b'-' | b'*' | b'+') {
        (ListKind::Bullet(b0), 1, 0)
    } else if b0.is_ascii_digit() {
        let digits = bytes.iter().take(9).take_while(|b| b.is_ascii_digit()).count();
        let delim = *bytes.get(digits)?;
        if delim != b'.' && delim != b')' {
            return None;
        }
        let start = line[..digits].parse::<u32>().ok()?;
        (ListKind::Ordered(delim), digits + 1, start)
    } else {
        return None;
    };

    match bytes.get(width) {
        None | Some(b' ') | Some(b'\t') => {}
        _ => return None,
    }
    Some(ListMarker {
        kind,
        width,
        start,
        empty: is_blank(&line[width..]),
    })
}

/// CommonMark block-level tag names that start an HTML block ending at a
/// blank line.
static HTML_BLOCK_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^</?(?:address|article|aside|base|basefont|blockquote|body|caption|center|col|colgroup|dd|details|dialog|dir|div|dl|dt|fieldset|figcaption|figure|footer|form|frame|frameset|h[1-6]|head|header|hr|html|iframe|legend|li|link|main|menu|menuitem|nav|noframes|ol|optgroup|option|p|param|search|section|summary|table|tbody|td|tfoot|th|thead|title|tr|track|ul)(?:[ \t>]|/>|$)",
    )
    .expect("HTML_BLOCK_TAG: hardcoded regex is valid")
});

static HTML_RAW_BLOCK_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^<(script|pre|style|textarea)(?:[ \t>]|$)")
        .expect("HTML_RAW_BLOCK_TAG: hardcoded regex is valid")
});

pub(crate) fn html_block_start(line: &str) -> Option<HtmlBlockEnd> {
    if !line.starts_with('<') {
        return None;
    }
    if line.starts_with("<!--") {
        return Some(HtmlBlockEnd::Terminator("-->"));
    }
    if let Some(caps) = HTML_RAW_BLOCK_TAG.captures(line) {
        let terminator = match caps[1].to_ascii_lowercase().as_str() {
            "script" => "</script>",
            "pre" => "</pre>",
            "style" => "</style>",
            _ => "</textarea>",
        };
        return Some(HtmlBlockEnd::Terminator(terminator));
    }
    if HTML_BLOCK_TAG.is_match(line) {
        return Some(HtmlBlockEnd::BlankLine);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atx_heading_strips_closing_sequence() {
        assert_eq!(parse_atx_heading("## Title ##"), Some((2, "Title")));
        assert_eq!(parse_atx_heading("#Title"), None);
        assert_eq!(parse_atx_heading("####### x"), None);
        assert_eq!(parse_atx_heading("# C#"), Some((1, "C#")));
    }

    #[test]
    fn thematic_break_accepts_spaced_markers() {
        assert!(is_thematic_break("- - -"));
        assert!(is_thematic_break("***"));
        assert!(!is_thematic_break("-*-"));
        assert!(!is_thematic_break("--"));
    }

    #[test]
    fn table_separator_reads_alignment() {
        assert_eq!(
            parse_table_separator("| :-- | :-: | --: | --- |"),
            Some(vec![
                Alignment::Left,
                Alignment::Center,
                Alignment::Right,
                Alignment::None
            ])
        );
        assert_eq!(parse_table_separator("---"), None);
        assert_eq!(parse_table_separator("| a |"), None);
    }

    #[test]
    fn table_row_unescapes_pipes() {
        assert_eq!(split_table_row(r"| a | $\|x\|$ |"), vec!["a", "$|x|$"]);
        assert_eq!(split_table_row("a|b"), vec!["a", "b"]);
    }

    #[test]
    fn list_marker_variants() {
        let m = parse_list_marker("- item").expect("bullet");
        assert_eq!(m.kind, ListKind::Bullet(b'-'));
        let m = parse_list_marker("12) item").expect("ordered");
        assert_eq!((m.kind, m.width, m.start), (ListKind::Ordered(b')'), 3, 12));
        assert!(parse_list_marker("-item").is_none());
        assert!(parse_list_marker("-").expect("empty item").empty);
    }

    #[test]
    fn html_block_kinds() {
        assert_eq!(html_block_start("<div data-type=\"block-math\">"), Some(HtmlBlockEnd::BlankLine));
        assert_eq!(html_block_start("<!-- note"), Some(HtmlBlockEnd::Terminator("-->")));
        assert_eq!(html_block_start("<span>x</span>"), None);
        assert_eq!(html_block_start("<img src=\"a\">"), None);
    }
}
