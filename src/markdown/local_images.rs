//! Local-file image pre-pass
//!
//! `![alt](file:///path with spaces.png "title")` is rewritten to a literal
//! `<img>` tag before parsing. The link grammar would otherwise reject the
//! `file:` scheme and stop the destination at the first space.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::block::leaf::{is_closing_fence, parse_fence_start, indent_of};
use crate::entities::escape_html_into;

static LOCAL_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"!\[([^\]]*)\]\((file://[^)"]+?)(?:\s+"([^"]*)")?\s*\)"#)
        .expect("LOCAL_IMAGE: hardcoded regex is valid")
});

/// Rewrite local-file image references outside fenced code.
pub(crate) fn rewrite_local_images(src: &str) -> Cow<'_, str> {
    if !src.contains("file://") {
        return Cow::Borrowed(src);
    }

    let mut out = String::with_capacity(src.len());
    let mut fence: Option<(u8, usize)> = None;
    let mut rewritten = 0usize;

    for (idx, line) in src.split('\n').enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        let indent = indent_of(line);

        if let Some((ch, len)) = fence {
            if is_closing_fence(line, ch, len) {
                fence = None;
            }
            out.push_str(line);
            continue;
        }
        if indent < 4
            && let Some((ch, len, _)) = parse_fence_start(&line[indent..])
        {
            fence = Some((ch, len));
            out.push_str(line);
            continue;
        }

        let replaced = LOCAL_IMAGE.replace_all(line, |caps: &Captures<'_>| {
            rewritten += 1;
            img_tag(caps)
        });
        out.push_str(&replaced);
    }

    if rewritten > 0 {
        tracing::debug!("Rewrote {rewritten} local image reference(s)");
    }
    Cow::Owned(out)
}

fn img_tag(caps: &Captures<'_>) -> String {
    let mut tag = String::from("<img src=\"");
    escape_html_into(&mut tag, &caps[2]);
    tag.push_str("\" alt=\"");
    escape_html_into(&mut tag, &caps[1]);
    tag.push('"');
    if let Some(title) = caps.get(3) {
        tag.push_str(" title=\"");
        escape_html_into(&mut tag, title.as_str());
        tag.push('"');
    }
    tag.push('>');
    tag
}
