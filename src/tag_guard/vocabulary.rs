//! The standard HTML tag vocabulary
//!
//! Closed list of tag names the guard lets through as live markup. Anything
//! else (custom elements, `script`, frames, plugin embeds) is rendered as
//! visible text. This table is data: extending it changes behavior for
//! every caller.

use ahash::AHashSet;
use std::sync::LazyLock;

const STANDARD_TAG_NAMES: &[&str] = &[
    "a", "abbr", "acronym", "address", "area", "article", "aside", "audio",
    "b", "bdi", "bdo", "big", "blockquote", "body", "br", "button",
    "canvas", "caption", "center", "cite", "code", "col", "colgroup",
    "data", "datalist", "dd", "del", "details", "dfn", "dialog", "div", "dl", "dt",
    "em",
    "fieldset", "figcaption", "figure", "font", "footer", "form",
    "h1", "h2", "h3", "h4", "h5", "h6", "head", "header", "hgroup", "hr", "html",
    "i", "img", "input", "ins",
    "kbd",
    "label", "legend", "li", "link",
    "main", "map", "mark", "menu", "meta", "meter",
    "nav", "noscript",
    "ol", "optgroup", "option", "output",
    "p", "param", "picture", "pre", "progress",
    "q",
    "rp", "rt", "ruby",
    "s", "samp", "search", "section", "select", "slot", "small", "source", "span",
    "strike", "strong", "style", "sub", "summary", "sup",
    "table", "tbody", "td", "template", "textarea", "tfoot", "th", "thead", "time",
    "title", "tr", "track", "tt",
    "u", "ul",
    "var", "video",
    "wbr",
];

static STANDARD_TAGS: LazyLock<AHashSet<&'static str>> =
    LazyLock::new(|| STANDARD_TAG_NAMES.iter().copied().collect());

/// Elements whose content the HTML tokenizer reads as raw text. When one of
/// these is not standard its text must be escaped too, or markup inside it
/// would come alive once the wrapping tag is neutralized.
pub(crate) const RAW_TEXT_FOREIGN_SELECTOR: &str = "script, iframe, xmp, noembed, noframes";

/// Whether `name` (any case) is in the standard vocabulary.
#[must_use]
pub fn is_standard_tag(name: &str) -> bool {
    if name.bytes().any(|b| b.is_ascii_uppercase()) {
        STANDARD_TAGS.contains(name.to_ascii_lowercase().as_str())
    } else {
        STANDARD_TAGS.contains(name)
    }
}
