//! Markdown syntax sniffing

use std::sync::LazyLock;

use regex::Regex;

static MARKDOWN_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // ATX heading
        r"(?m)^ {0,3}#{1,6}\s+\S",
        // bullet and ordered list items
        r"(?m)^\s*[-*+]\s+\S",
        r"(?m)^\s*\d{1,9}[.)]\s+\S",
        // strong and emphasis
        r"\*\*[^*\n]+\*\*",
        r"__[^_\n]+__",
        r"(?:^|[^*\w])\*[^*\s][^*\n]*\*",
        // fenced code and code spans
        r"(?m)^ {0,3}(?:```|~~~)",
        r"`[^`\n]+`",
        // blockquote
        r"(?m)^ {0,3}>\s",
        // link and image
        r"!?\[[^\]\n]*\]\([^)\n]+\)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("MARKDOWN_PATTERNS: hardcoded regex is valid"))
    .collect()
});

/// Whether `text` contains recognisable markdown syntax.
///
/// Patterns are tried in order and the first match wins. Empty text is
/// never markdown.
#[must_use]
pub fn is_markdown(text: &str) -> bool {
    if text.trim().is_empty() {
        return false;
    }
    MARKDOWN_PATTERNS.iter().any(|pattern| pattern.is_match(text))
}
