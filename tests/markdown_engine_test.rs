use kodegen_markdown_bridge::markdown::token::{BlockTag, TokenKind};
use kodegen_markdown_bridge::{MarkdownEngine, ParseOptions};

fn render(src: &str) -> String {
    MarkdownEngine::default().render(src)
}

#[test]
fn test_headings() {
    assert_eq!(render("# One\n\nTwo\n---"), "<h1>One</h1>\n<h2>Two</h2>\n");
}

#[test]
fn test_inline_formatting() {
    assert_eq!(
        render("*a* **b** ~~c~~ `d`"),
        "<p><em>a</em> <strong>b</strong> <s>c</s> <code>d</code></p>\n"
    );
}

#[test]
fn test_links_images_and_autolinks() {
    assert_eq!(
        render("[x](https://a.b \"t\") ![i](p.png) <https://c.d>"),
        "<p><a href=\"https://a.b\" title=\"t\">x</a> <img src=\"p.png\" alt=\"i\"> <a href=\"https://c.d\">https://c.d</a></p>\n"
    );
}

#[test]
fn test_blockquote_and_rule() {
    assert_eq!(
        render("> quote\n\n***"),
        "<blockquote>\n<p>quote</p>\n</blockquote>\n<hr>\n"
    );
}

#[test]
fn test_ordered_list_start() {
    assert_eq!(render("3. a\n4. b"), "<ol start=\"3\">\n<li>a</li>\n<li>b</li>\n</ol>\n");
}

#[test]
fn test_text_is_escaped() {
    assert_eq!(render("a < b & \"c\""), "<p>a &lt; b &amp; &quot;c&quot;</p>\n");
}

#[test]
fn test_raw_html_passes_through() {
    assert_eq!(render("a <u>b</u>"), "<p>a <u>b</u></p>\n");
}

/// Every open block token has a matching close.
#[test]
fn test_token_stream_is_balanced() {
    let tokens = MarkdownEngine::default().parse("> - a\n>   - b\n>\n> c\n\n| x |\n| - |\n| y |");
    let mut stack: Vec<BlockTag> = Vec::new();
    for token in &tokens {
        match token.kind {
            TokenKind::BlockOpen(tag) => stack.push(tag),
            TokenKind::BlockClose(tag) => assert_eq!(stack.pop(), Some(tag)),
            _ => {}
        }
    }
    assert!(stack.is_empty(), "unclosed blocks: {stack:?}");
}

/// Containers past the nesting limit are read as text instead of recursing.
#[test]
fn test_nesting_limit() {
    let engine = MarkdownEngine::new(ParseOptions {
        max_nesting_depth: 2,
        ..ParseOptions::default()
    });
    let html = engine.render("> > > > deep");
    assert_eq!(html.matches("<blockquote>").count(), 2, "{html}");
    assert!(html.contains("deep"), "{html}");
}

#[test]
fn test_source_spans() {
    let tokens = MarkdownEngine::default().parse("para\n\n# head");
    let heading = tokens
        .iter()
        .find(|t| t.kind == TokenKind::BlockOpen(BlockTag::Heading(1)))
        .unwrap();
    assert_eq!(heading.span.map(|s| s.start_line), Some(2));
}
