use kodegen_markdown_bridge::{
    ConversionError, ConverterConfig, MarkdownConverter, html_to_markdown, html_to_text, is_markdown,
    markdown_to_html, markdown_to_preview_text,
};

/// Empty, absent and whitespace-only input yield an empty string.
#[test]
fn test_blank_inputs() {
    for input in ["", " ", "\n\t  \n"] {
        assert_eq!(markdown_to_html(input), "", "markdown input {input:?}");
        assert_eq!(html_to_markdown(input), "", "html input {input:?}");
    }
    assert_eq!(markdown_to_html(None::<&str>), "");
    assert_eq!(html_to_markdown(None::<&str>), "");
}

#[test]
fn test_block_math_contract() {
    let html = markdown_to_html("$$a+b+c$$");
    assert!(html.contains(r#"data-latex="a+b+c""#), "{html}");
    assert!(html.contains(r#"data-type="block-math""#), "{html}");
    assert_eq!(
        html_to_markdown(r#"<div data-latex="a+b+c" data-type="block-math"></div>"#),
        "$$a+b+c$$"
    );
}

/// Dangerous markup never comes back as live tags.
#[test]
fn test_script_is_neutralized() {
    let md = html_to_markdown("<p>x</p><script>alert(1)</script>");
    println!("Markdown: {md}");
    assert!(md.contains(r"\<script>"), "script not escaped: {md}");

    let html = markdown_to_html(md.as_str());
    assert!(!html.contains("<script"), "live script in {html}");
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"), "{html}");
}

#[test]
fn test_code_content_is_numerically_encoded() {
    let html = markdown_to_html("```\n<b>&\n```");
    assert_eq!(html, "<pre><code>&#x3C;b&#x3E;&#x26;\n</code></pre>\n");
    assert_eq!(html_to_markdown(html.as_str()), "```\n<b>&\n```");
}

#[test]
fn test_local_image_keeps_path() {
    let html = markdown_to_html("![shot](file:///home/me/my shot.png \"Screen\")");
    assert_eq!(
        html,
        "<p><img src=\"file:///home/me/my shot.png\" alt=\"shot\" title=\"Screen\"></p>\n"
    );
    let md = html_to_markdown(html.as_str());
    assert_eq!(md, "![shot](file:///home/me/my shot.png \"Screen\")");
}

#[test]
fn test_unsafe_links_stay_text() {
    let html = markdown_to_html("[x](javascript:alert(1))");
    assert!(!html.contains("href"), "{html}");
}

#[test]
fn test_preview_text() {
    let md = "# Title\n\nSome **bold** words and `code` in a long sentence.";
    assert_eq!(markdown_to_preview_text(md, 100), "Title Some bold words and code in a long sentence.");
    assert_eq!(markdown_to_preview_text(md, 10), "Title Some...");
}

#[test]
fn test_preview_uses_configured_length() {
    let config = ConverterConfig::builder().preview_length(5).build().unwrap();
    let converter = MarkdownConverter::new(config);
    assert_eq!(converter.preview("hello world"), "hello...");
}

#[test]
fn test_html_to_text() {
    assert_eq!(html_to_text("<p>a <i>b</i></p><p>c</p>"), "a b c");
    assert_eq!(html_to_text(""), "");
}

#[test]
fn test_markdown_sniffer() {
    assert!(is_markdown("## Heading"));
    assert!(is_markdown("see [docs](https://example.com)"));
    assert!(!is_markdown("plain words only"));
    assert!(!is_markdown(""));
}

#[test]
fn test_size_limit_is_enforced() {
    let config = ConverterConfig::builder().max_input_bytes(Some(8)).build().unwrap();
    let converter = MarkdownConverter::new(config);
    let err = converter.try_html_to_markdown("<p>too long</p>").unwrap_err();
    assert!(matches!(err, ConversionError::InputTooLarge { limit: 8, .. }));
    assert_eq!(converter.html_to_markdown("<p>too long</p>"), "");
}

#[test]
fn test_hard_breaks_option() {
    let config = ConverterConfig::builder().hard_breaks(true).build().unwrap();
    let converter = MarkdownConverter::new(config);
    assert_eq!(converter.markdown_to_html("a\nb"), "<p>a<br>\nb</p>\n");
}

/// Plain base-grammar documents reach a fixed point after one round trip.
#[test]
fn test_round_trip_is_idempotent() {
    let source = "# Notes\n\nSome *emphasis* and **strong** text.\n\n\
                  - one\n- two\n  - nested\n\n\
                  1. first\n2. second\n\n\
                  > quoted\n\n\
                  ```js\nlet a = 1;\n```\n\n\
                  [link](https://example.com \"t\") and `code`.";
    let once = html_to_markdown(markdown_to_html(source).as_str());
    let twice = html_to_markdown(markdown_to_html(once.as_str()).as_str());
    println!("Once:\n{once}");
    assert_eq!(once, twice);
}
