//! Link and image syntax, autolinks, raw inline HTML and URL handling

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use crate::entities;

static AUTOLINK_URI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<([A-Za-z][A-Za-z0-9+.\-]{1,31}:[^<>\x00-\x20]*)>")
        .expect("AUTOLINK_URI: hardcoded regex is valid")
});

static AUTOLINK_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^<([a-zA-Z0-9.!#$%&'*+/=?^_`{|}~\-]+@[a-zA-Z0-9](?:[a-zA-Z0-9\-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9\-]{0,61}[a-zA-Z0-9])?)*)>",
    )
    .expect("AUTOLINK_EMAIL: hardcoded regex is valid")
});

static INLINE_HTML: LazyLock<Regex> = LazyLock::new(|| {
    const ATTRIBUTE: &str = r#"(?:\s+[A-Za-z_:][A-Za-z0-9_.:\-]*(?:\s*=\s*(?:[^"'=<>`\x00-\x20]+|'[^']*'|"[^"]*"))?)"#;
    let pattern = format!(
        r"^(?:<[A-Za-z][A-Za-z0-9\-]*{ATTRIBUTE}*\s*/?>|</[A-Za-z][A-Za-z0-9\-]*\s*>|<!---->|<!--[\s\S]*?-->|<\?[\s\S]*?\?>|<![A-Za-z][^>]*>|<!\[CDATA\[[\s\S]*?\]\]>)"
    );
    Regex::new(&pattern).expect("INLINE_HTML: hardcoded regex is valid")
});

static ENTITY_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^&(?:#[xX][0-9a-fA-F]{1,6}|#[0-9]{1,7}|[A-Za-z][A-Za-z0-9]{1,31});")
        .expect("ENTITY_REFERENCE: hardcoded regex is valid")
});

static SAFE_DATA_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^data:image/(?:gif|png|jpeg|webp);")
        .expect("SAFE_DATA_IMAGE: hardcoded regex is valid")
});

/// A parsed `(destination "title")` tail
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct LinkTail {
    pub destination: String,
    pub title: Option<String>,
    /// Byte offset just past the closing `)`
    pub end: usize,
}

/// Find the `]` matching the `[` at `start`, skipping escapes and code
/// spans.
pub(super) fn find_label_end(src: &str, start: usize) -> Option<usize> {
    let bytes = src.as_bytes();
    let mut depth = 0usize;
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                i += 2;
                continue;
            }
            b'`' => {
                let run = bytes[i..].iter().take_while(|&&b| b == b'`').count();
                i = find_backtick_run(bytes, i + run, run).map_or(i + run, |close| close + run);
                continue;
            }
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Position of the next backtick run of exactly `len` at or after `from`.
pub(super) fn find_backtick_run(bytes: &[u8], from: usize, len: usize) -> Option<usize> {
    let mut i = from;
    while i < bytes.len() {
        if bytes[i] == b'`' {
            let run = bytes[i..].iter().take_while(|&&b| b == b'`').count();
            if run == len {
                return Some(i);
            }
            i += run;
        } else {
            i += 1;
        }
    }
    None
}

/// Parse `(dest "title")` with `src[pos] == '('`.
pub(super) fn parse_link_tail(src: &str, pos: usize) -> Option<LinkTail> {
    let bytes = src.as_bytes();
    if bytes.get(pos) != Some(&b'(') {
        return None;
    }
    let mut i = skip_spaces(bytes, pos + 1);

    let destination = if bytes.get(i) == Some(&b'<') {
        let start = i + 1;
        let mut j = start;
        loop {
            match *bytes.get(j)? {
                b'>' => break,
                b'\n' | b'<' => return None,
                b'\\' => j += 2,
                _ => j += 1,
            }
        }
        i = j + 1;
        &src[start..j]
    } else {
        let start = i;
        let mut parens = 0usize;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' if i + 1 < bytes.len() => i += 2,
                b'(' => {
                    parens += 1;
                    i += 1;
                }
                b')' if parens == 0 => break,
                b')' => {
                    parens -= 1;
                    i += 1;
                }
                b if b <= b' ' => break,
                _ => i += 1,
            }
        }
        if parens > 0 {
            return None;
        }
        &src[start..i]
    };

    let after_dest = i;
    i = skip_spaces(bytes, i);
    let mut title = None;
    if i > after_dest
        && let Some(&open) = bytes.get(i)
        && matches!(open, b'"' | b'\'' | b'(')
    {
        let close = if open == b'(' { b')' } else { open };
        let start = i + 1;
        let mut j = start;
        loop {
            match *bytes.get(j)? {
                b'\\' => j += 2,
                b if b == close => break,
                b'(' if open == b'(' => return None,
                _ => j += 1,
            }
        }
        title = Some(unescape(&src[start..j]).into_owned());
        i = skip_spaces(bytes, j + 1);
    }

    if bytes.get(i) != Some(&b')') {
        return None;
    }
    Some(LinkTail {
        destination: unescape(destination).into_owned(),
        title,
        end: i + 1,
    })
}

fn skip_spaces(bytes: &[u8], mut i: usize) -> usize {
    let mut newlines = 0;
    while let Some(&b) = bytes.get(i) {
        match b {
            b' ' | b'\t' => {}
            b'\n' if newlines == 0 => newlines += 1,
            _ => break,
        }
        i += 1;
    }
    i
}

/// Resolve backslash escapes of ASCII punctuation, then entity references.
pub(super) fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains('\\') {
        return entities::decode(s);
    }
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\'
            && let Some(&next) = chars.peek()
            && next.is_ascii_punctuation()
        {
            out.push(next);
            chars.next();
            continue;
        }
        out.push(c);
    }
    Cow::Owned(entities::decode(&out).into_owned())
}

/// Destinations that must not become links or images.
pub(super) fn is_safe_url(url: &str) -> bool {
    let lower = url.trim().to_ascii_lowercase();
    if lower.starts_with("javascript:") || lower.starts_with("vbscript:") || lower.starts_with("file:") {
        return false;
    }
    if lower.starts_with("data:") {
        return SAFE_DATA_IMAGE.is_match(&lower);
    }
    true
}

const HEX_CHARS: &[u8; 16] = b"0123456789ABCDEF";

fn is_url_safe(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"-_.~!#$&'()*+,/:;=?@[]".contains(&b)
}

/// Percent-encode bytes that may not appear in a URL, keeping existing
/// `%XX` escapes.
pub(super) fn normalize_url(url: &str) -> String {
    let bytes = url.as_bytes();
    let mut out = String::with_capacity(url.len());
    let mut last = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if is_url_safe(b) {
            i += 1;
            continue;
        }
        if b == b'%'
            && i + 2 < bytes.len()
            && bytes[i + 1].is_ascii_hexdigit()
            && bytes[i + 2].is_ascii_hexdigit()
        {
            i += 3;
            continue;
        }
        if last < i {
            out.push_str(&url[last..i]);
        }
        out.push('%');
        out.push(HEX_CHARS[(b >> 4) as usize] as char);
        out.push(HEX_CHARS[(b & 0xF) as usize] as char);
        i += 1;
        last = i;
    }
    out.push_str(&url[last..]);
    out
}

/// An autolink at the start of `rest`: `(href, text, consumed)`.
pub(super) fn scan_autolink(rest: &str) -> Option<(String, String, usize)> {
    if let Some(caps) = AUTOLINK_URI.captures(rest) {
        let whole = caps.get(0)?;
        let uri = caps.get(1)?.as_str();
        return Some((uri.to_string(), uri.to_string(), whole.end()));
    }
    let caps = AUTOLINK_EMAIL.captures(rest)?;
    let whole = caps.get(0)?;
    let email = caps.get(1)?.as_str();
    Some((format!("mailto:{email}"), email.to_string(), whole.end()))
}

/// Length of a raw HTML tag, comment or declaration at the start of `rest`.
pub(super) fn scan_inline_html(rest: &str) -> Option<usize> {
    INLINE_HTML.find(rest).map(|m| m.end())
}

/// Length of an entity reference at the start of `rest`.
pub(super) fn scan_entity(rest: &str) -> Option<usize> {
    ENTITY_REFERENCE.find(rest).map(|m| m.end())
}
