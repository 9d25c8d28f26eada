use std::rc::Rc;

use markup5ever_rcdom::Node;

use super::super::dom_walker::{Context, Walker};
use super::super::node_util::{get_attr, text_content};
use super::super::text_util::longest_run;

/// Wrap `content` in `open`/`close`, keeping surrounding whitespace outside
/// the markers so `<em> a </em>` does not become `* a *`.
pub(super) fn wrap(content: &str, open: &str, close: &str) -> String {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return content.to_string();
    }
    let leading = &content[..content.len() - content.trim_start().len()];
    let trailing = &content[content.trim_end().len()..];
    format!("{leading}{open}{trimmed}{close}{trailing}")
}

pub(super) fn code(walker: &Walker, node: &Rc<Node>, ctx: Context) -> String {
    if ctx.in_pre {
        return walker.walk_children(node, ctx);
    }
    let text = text_content(node).replace(['\n', '\r'], " ");
    if text.is_empty() {
        return String::new();
    }

    let fence = "`".repeat(longest_run(&text, '`') + 1);
    let needs_padding = text.starts_with('`')
        || text.ends_with('`')
        || (text.starts_with(' ') && text.ends_with(' ') && !text.trim().is_empty());
    if needs_padding {
        format!("{fence} {text} {fence}")
    } else {
        format!("{fence}{text}{fence}")
    }
}

pub(super) fn link(walker: &Walker, node: &Rc<Node>, ctx: Context) -> String {
    let content = walker.walk_children(node, ctx);
    let Some(href) = get_attr(node, "href").filter(|h| !h.trim().is_empty()) else {
        return content;
    };
    let title = get_attr(node, "title").filter(|t| !t.is_empty());

    if title.is_none() && is_autolink_target(&href) && text_content(node).trim() == href {
        return format!("<{href}>");
    }

    let label = if content.trim().is_empty() { href.clone() } else { content };
    let leading = &label[..label.len() - label.trim_start().len()];
    let trailing = &label[label.trim_end().len()..];
    format!(
        "{leading}[{}]({}{}){trailing}",
        label.trim(),
        destination(&href),
        title_suffix(title.as_deref())
    )
}

pub(super) fn image(node: &Rc<Node>) -> String {
    let Some(src) = get_attr(node, "src").filter(|s| !s.trim().is_empty()) else {
        return String::new();
    };
    let alt = get_attr(node, "alt")
        .unwrap_or_default()
        .replace('[', "\\[")
        .replace(']', "\\]");
    let title = get_attr(node, "title").filter(|t| !t.is_empty());

    // Local files keep their raw path; the markdown side rewrites them
    // before the link grammar sees the spaces.
    let target = if src.starts_with("file://") { src } else { destination(&src) };
    format!("![{alt}]({target}{})", title_suffix(title.as_deref()))
}

fn is_autolink_target(href: &str) -> bool {
    (href.starts_with("http://") || href.starts_with("https://"))
        && !href.contains(|c: char| c.is_whitespace() || c == '<' || c == '>')
}

/// A link destination, in angle brackets when the raw form would not parse.
fn destination(url: &str) -> String {
    let mut depth = 0i32;
    let mut balanced = true;
    for c in url.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    balanced = false;
                }
            }
            _ => {}
        }
    }
    let needs_angle = !balanced || depth != 0 || url.contains(|c: char| c.is_whitespace() || c.is_control());
    if needs_angle {
        format!("<{}>", url.replace('<', "%3C").replace('>', "%3E"))
    } else {
        url.to_string()
    }
}

fn title_suffix(title: Option<&str>) -> String {
    match title {
        Some(title) => format!(" \"{}\"", title.replace('\\', "\\\\").replace('"', "\\\"")),
        None => String::new(),
    }
}
