//! UTF-8-safe string helpers shared by both conversion directions

/// Safely truncate a string to a maximum number of CHARACTERS (not bytes).
///
/// Respects UTF-8 character boundaries and never panics on multi-byte
/// characters.
///
/// # Examples
/// ```
/// # use kodegen_markdown_bridge::utils::string_utils::safe_truncate_chars;
/// assert_eq!(safe_truncate_chars("Hello, World!", 5), "Hello");
/// assert_eq!(safe_truncate_chars("日本語テキスト", 3), "日本語");
/// assert_eq!(safe_truncate_chars("Hi", 100), "Hi");
/// ```
#[inline]
pub fn safe_truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        None => s,
        Some((byte_idx, _)) => &s[..byte_idx],
    }
}

/// Collapse every run of whitespace (including newlines) into a single space
/// and trim both ends.
///
/// # Examples
/// ```
/// # use kodegen_markdown_bridge::utils::string_utils::collapse_whitespace;
/// assert_eq!(collapse_whitespace("  a \n\n b\tc "), "a b c");
/// ```
pub fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for word in s.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(safe_truncate_chars("🎉🎊🎈", 2), "🎉🎊");
        assert_eq!(safe_truncate_chars("", 4), "");
    }

    #[test]
    fn collapse_handles_only_whitespace() {
        assert_eq!(collapse_whitespace(" \n\t "), "");
    }
}
