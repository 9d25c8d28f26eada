//! Custom-tag guard using lol_html for streaming HTML rewriting.
//!
//! Tags outside the standard vocabulary are turned into visible text:
//! `<foo bar="1">x</foo>` becomes `&lt;foo bar=&quot;1&quot;&gt;x&lt;/foo&gt;`.
//! Only the tag's own markup is escaped; its children pass through and are
//! themselves subject to the same check. Standard tags are left untouched.
//!
//! A tag whose closing `>` cannot be found is never seen as a tag by the
//! tokenizer and passes through as text. Unmatched close tags of custom
//! elements are left to the DOM parser, which drops them.

pub mod vocabulary;

use std::sync::atomic::{AtomicUsize, Ordering};

use lol_html::html_content::{ContentType, Element, EndTag};
use lol_html::{HtmlRewriter, Settings, element, text};

use crate::entities;
use crate::error::{ConversionError, ConversionResult};

pub use vocabulary::is_standard_tag;
use vocabulary::RAW_TEXT_FOREIGN_SELECTOR;

/// Escape every non-standard tag in `html` so it survives as literal text.
///
/// # Errors
///
/// Returns `ConversionError::HtmlRewrite` if the streaming rewriter fails and
/// `ConversionError::InvalidUtf8` if its output is not UTF-8.
pub fn escape_custom_tags(html: &str) -> ConversionResult<String> {
    let mut output = Vec::with_capacity(html.len() + html.len() / 8);
    let escaped_count = AtomicUsize::new(0);

    let mut rewriter = HtmlRewriter::new(
        Settings {
            element_content_handlers: vec![
                element!("*", |el| {
                    let tag = el.tag_name().to_ascii_lowercase();
                    if is_standard_tag(&tag) {
                        return Ok(());
                    }
                    neutralize_element(el, &tag);
                    escaped_count.fetch_add(1, Ordering::Relaxed);
                    Ok(())
                }),
                text!(RAW_TEXT_FOREIGN_SELECTOR, |t| {
                    if !t.as_str().is_empty() {
                        let encoded = entities::encode(t.as_str(), true);
                        t.replace(&encoded, ContentType::Html);
                    }
                    Ok(())
                }),
            ],
            strict: false,
            ..Settings::default()
        },
        |c: &[u8]| output.extend_from_slice(c),
    );

    rewriter
        .write(html.as_bytes())
        .map_err(|e| ConversionError::HtmlRewrite(e.to_string()))?;
    rewriter
        .end()
        .map_err(|e| ConversionError::HtmlRewrite(e.to_string()))?;

    let count = escaped_count.load(Ordering::Relaxed);
    if count > 0 {
        tracing::debug!("Escaped {count} custom tag(s)");
    }

    Ok(String::from_utf8(output)?)
}

/// Replace the element's start and end tags with their escaped source form,
/// keeping its content in place.
fn neutralize_element(el: &mut Element<'_, '_>, tag: &str) {
    let open = entities::encode(&start_tag_markup(el, tag), true);
    el.before(&open, ContentType::Html);

    if let Some(handlers) = el.end_tag_handlers() {
        let close = entities::encode(&format!("</{tag}>"), true);
        handlers.push(Box::new(move |end: &mut EndTag<'_>| {
            end.before(&close, ContentType::Html);
            Ok::<(), Box<dyn std::error::Error + Send + Sync>>(())
        }));
    }

    el.remove_and_keep_content();
}

fn start_tag_markup(el: &Element<'_, '_>, tag: &str) -> String {
    let mut markup = String::with_capacity(tag.len() + 2);
    markup.push('<');
    markup.push_str(tag);
    for attr in el.attributes() {
        markup.push(' ');
        markup.push_str(&attr.name());
        let value = attr.value();
        if !value.is_empty() {
            let quote = if value.contains('"') { '\'' } else { '"' };
            markup.push('=');
            markup.push(quote);
            markup.push_str(&value);
            markup.push(quote);
        }
    }
    if el.is_self_closing() {
        markup.push_str(" /");
    }
    markup.push('>');
    markup
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_markup_is_untouched() {
        let html = r#"<p class="x">Hello <b>world</b><br></p>"#;
        assert_eq!(escape_custom_tags(html).expect("rewrite"), html);
    }

    #[test]
    fn custom_tag_becomes_text() {
        let out = escape_custom_tags("<foo>bar</foo>").expect("rewrite");
        assert_eq!(out, "&lt;foo&gt;bar&lt;/foo&gt;");
    }

    #[test]
    fn custom_tag_attributes_are_escaped() {
        let out = escape_custom_tags(r#"<think level="2">hmm</think>"#).expect("rewrite");
        assert_eq!(out, "&lt;think level=&quot;2&quot;&gt;hmm&lt;/think&gt;");
    }

    #[test]
    fn children_of_custom_tags_are_kept_live() {
        let out = escape_custom_tags("<foo><b>x</b></foo>").expect("rewrite");
        assert_eq!(out, "&lt;foo&gt;<b>x</b>&lt;/foo&gt;");
    }

    #[test]
    fn script_content_is_escaped_too() {
        let out = escape_custom_tags("<script>alert('<b>')</script>").expect("rewrite");
        assert!(!out.contains("<script"), "live script tag in {out}");
        assert!(!out.contains("<b>"), "live markup inside script in {out}");
    }

    #[test]
    fn unterminated_tag_passes_through() {
        let out = escape_custom_tags("a <foo bar").expect("rewrite must not fail");
        assert!(out.starts_with("a "), "{out}");
    }
}
