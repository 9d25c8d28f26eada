//! HTML character entity codec
//!
//! `encode` keeps literal text safe inside generated markup; `decode`
//! recovers literal text from entity-bearing strings. Decoding is delegated
//! to `html-escape`, which accepts named and numeric forms and passes
//! malformed references through unchanged.

use std::borrow::Cow;

/// Options for [`encode_with`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Use `&lt;`-style references instead of `&#x3C;`-style ones
    pub named_references: bool,
    /// Also encode every non-ASCII code point as a numeric reference
    pub encode_non_ascii: bool,
}

/// Lookup table for the five markup-significant characters: < > & " '
const SPECIAL_LUT: [bool; 128] = {
    let mut lut = [false; 128];
    lut[b'<' as usize] = true;
    lut[b'>' as usize] = true;
    lut[b'&' as usize] = true;
    lut[b'"' as usize] = true;
    lut[b'\'' as usize] = true;
    lut
};

/// Encode `<`, `>`, `&`, `"` and `'` as entity references.
///
/// `named_references = false` yields numeric references (used for code
/// content); `true` yields named ones (used for math payloads in attributes).
///
/// # Examples
/// ```
/// # use kodegen_markdown_bridge::entities::encode;
/// assert_eq!(encode("a<b", true), "a&lt;b");
/// assert_eq!(encode("a<b", false), "a&#x3C;b");
/// ```
#[must_use]
pub fn encode(text: &str, named_references: bool) -> String {
    encode_with(
        text,
        EncodeOptions {
            named_references,
            encode_non_ascii: false,
        },
    )
}

/// Encode with explicit options.
#[must_use]
pub fn encode_with(text: &str, options: EncodeOptions) -> String {
    let needs_work = text.bytes().any(|b| {
        if b < 0x80 {
            SPECIAL_LUT[b as usize]
        } else {
            options.encode_non_ascii
        }
    });
    if !needs_work {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len() + text.len() / 4);
    for ch in text.chars() {
        let code = ch as u32;
        if code < 0x80 && SPECIAL_LUT[code as usize] {
            if options.named_references {
                out.push_str(named_reference(ch));
            } else {
                push_numeric(&mut out, code);
            }
        } else if code >= 0x80 && options.encode_non_ascii {
            push_numeric(&mut out, code);
        } else {
            out.push(ch);
        }
    }
    out
}

fn named_reference(ch: char) -> &'static str {
    match ch {
        '<' => "&lt;",
        '>' => "&gt;",
        '&' => "&amp;",
        '"' => "&quot;",
        _ => "&apos;",
    }
}

fn push_numeric(out: &mut String, code: u32) {
    use std::fmt::Write;
    // Writing into a String cannot fail
    let _ = write!(out, "&#x{code:X};");
}

/// Decode named and numeric entity references.
///
/// Unknown or malformed references are left as they are.
///
/// # Examples
/// ```
/// # use kodegen_markdown_bridge::entities::decode;
/// assert_eq!(decode("&lt;x&gt; &#x26; &#38; &bogus;"), "<x> & & &bogus;");
/// ```
#[must_use]
pub fn decode(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    html_escape::decode_html_entities(text)
}

/// Escape text for an HTML text or attribute context (`& < > "`).
///
/// This is the renderer's escaping for ordinary text, link targets and
/// titles; it is distinct from [`encode`], which is reserved for code and
/// math payloads.
pub(crate) fn escape_html_into(out: &mut String, input: &str) {
    let mut last = 0;
    for (i, b) in input.bytes().enumerate() {
        let replacement = match b {
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            b'"' => "&quot;",
            _ => continue,
        };
        out.push_str(&input[last..i]);
        out.push_str(replacement);
        last = i + 1;
    }
    out.push_str(&input[last..]);
}
