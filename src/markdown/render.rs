//! HTML rendering of the token stream

use super::inline::unescape_info;
use super::token::{Attrs, BlockTag, Token, TokenKind};
use crate::entities::{self, escape_html_into};
use crate::utils::{ATTR_DATA_LATEX, ATTR_DATA_TYPE, BLOCK_MATH_TYPE, INLINE_MATH_TYPE};

pub(crate) struct HtmlRenderer {
    hard_breaks: bool,
}

impl HtmlRenderer {
    pub(crate) fn new(hard_breaks: bool) -> Self {
        Self { hard_breaks }
    }

    pub(crate) fn render(&self, tokens: &[Token]) -> String {
        let mut out = String::with_capacity(tokens.len() * 16);
        for (i, token) in tokens.iter().enumerate() {
            let next = tokens.get(i + 1);
            match token.kind {
                TokenKind::BlockOpen(tag) => {
                    if token.hidden {
                        continue;
                    }
                    open_tag(&mut out, tag.html_name(), &token.attrs);
                    let nested_block = tag == BlockTag::ListItem
                        && next.is_some_and(|n| matches!(n.kind, TokenKind::BlockOpen(_)) && !n.hidden);
                    if tag.breaks_after_open() || nested_block {
                        out.push('\n');
                    }
                }
                TokenKind::BlockClose(tag) => {
                    if token.hidden {
                        // A tight paragraph followed by a nested block.
                        if next.is_some_and(|n| matches!(n.kind, TokenKind::BlockOpen(_))) {
                            out.push('\n');
                        }
                        continue;
                    }
                    out.push_str("</");
                    out.push_str(tag.html_name());
                    out.push_str(">\n");
                }
                TokenKind::Inline => self.render_inline(&mut out, &token.children),
                TokenKind::Fence => render_fence(&mut out, token),
                TokenKind::MathBlock => {
                    render_math(&mut out, "div", BLOCK_MATH_TYPE, &token.content);
                    out.push('\n');
                }
                TokenKind::HtmlBlock => {
                    out.push_str(&token.content);
                    out.push('\n');
                }
                TokenKind::ThematicBreak => out.push_str("<hr>\n"),
                _ => self.render_inline(&mut out, std::slice::from_ref(token)),
            }
        }
        out
    }

    fn render_inline(&self, out: &mut String, tokens: &[Token]) {
        for token in tokens {
            match token.kind {
                TokenKind::Text => escape_html_into(out, &token.content),
                TokenKind::CodeInline => {
                    out.push_str("<code>");
                    escape_html_into(out, &token.content);
                    out.push_str("</code>");
                }
                TokenKind::MathInline => render_math(out, "span", INLINE_MATH_TYPE, &token.content),
                TokenKind::HtmlInline => out.push_str(&token.content),
                TokenKind::SoftBreak if self.hard_breaks => out.push_str("<br>\n"),
                TokenKind::SoftBreak => out.push('\n'),
                TokenKind::HardBreak => out.push_str("<br>\n"),
                TokenKind::InlineOpen(tag) => open_tag(out, tag.html_name(), &token.attrs),
                TokenKind::InlineClose(tag) => {
                    out.push_str("</");
                    out.push_str(tag.html_name());
                    out.push('>');
                }
                TokenKind::Image => {
                    out.push_str("<img src=\"");
                    escape_html_into(out, token.attr("src").unwrap_or_default());
                    out.push_str("\" alt=\"");
                    escape_html_into(out, &token.content);
                    out.push('"');
                    if let Some(title) = token.attr("title") {
                        out.push_str(" title=\"");
                        escape_html_into(out, title);
                        out.push('"');
                    }
                    out.push('>');
                }
                TokenKind::Checkbox => {
                    out.push_str("<input type=\"checkbox\" disabled");
                    if token.attr("checked").is_some() {
                        out.push_str(" checked");
                    }
                    out.push('>');
                }
                TokenKind::Inline => self.render_inline(out, &token.children),
                TokenKind::Fence => render_fence(out, token),
                TokenKind::MathBlock => render_math(out, "div", BLOCK_MATH_TYPE, &token.content),
                TokenKind::HtmlBlock => out.push_str(&token.content),
                TokenKind::ThematicBreak => out.push_str("<hr>"),
                TokenKind::BlockOpen(_) | TokenKind::BlockClose(_) => {}
            }
        }
    }
}

fn open_tag(out: &mut String, name: &str, attrs: &Attrs) {
    out.push('<');
    out.push_str(name);
    for (key, value) in attrs {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        escape_html_into(out, value);
        out.push('"');
    }
    out.push('>');
}

/// Code content is encoded with numeric references only.
fn render_fence(out: &mut String, token: &Token) {
    let info = unescape_info(&token.info);
    let lang = info.split_whitespace().next().unwrap_or_default();
    if lang.is_empty() {
        out.push_str("<pre><code>");
    } else {
        out.push_str("<pre><code class=\"language-");
        escape_html_into(out, lang);
        out.push_str("\">");
    }
    out.push_str(&entities::encode(&token.content, false));
    out.push_str("</code></pre>\n");
}

/// Math renders as an empty container with the LaTeX in a named-entity
/// encoded attribute.
fn render_math(out: &mut String, element: &str, kind: &str, latex: &str) {
    out.push('<');
    out.push_str(element);
    out.push(' ');
    out.push_str(ATTR_DATA_LATEX);
    out.push_str("=\"");
    out.push_str(&entities::encode(latex, true));
    out.push_str("\" ");
    out.push_str(ATTR_DATA_TYPE);
    out.push_str("=\"");
    out.push_str(kind);
    out.push_str("\"></");
    out.push_str(element);
    out.push('>');
}
