use kodegen_markdown_bridge::{html_to_markdown, markdown_to_html};

/// Single-line block math renders to an empty container with the LaTeX in
/// its attribute.
#[test]
fn test_block_math_single_line() {
    let html = markdown_to_html("$$a+b+c$$");
    assert_eq!(html, "<div data-latex=\"a+b+c\" data-type=\"block-math\"></div>\n");
}

#[test]
fn test_block_math_multi_line() {
    let html = markdown_to_html("$$\n\\frac{a}{b}\n$$");
    assert_eq!(
        html,
        "<div data-latex=\"\\frac{a}{b}\" data-type=\"block-math\"></div>\n"
    );
}

/// Attribute payloads use named references.
#[test]
fn test_block_math_payload_is_entity_encoded() {
    let html = markdown_to_html("$$a<b & c$$");
    assert!(
        html.contains(r#"data-latex="a&lt;b &amp; c""#),
        "payload not encoded: {html}"
    );
}

/// An unterminated block falls back to paragraph text.
#[test]
fn test_unterminated_block_math_is_paragraph() {
    let html = markdown_to_html("$$\na+b");
    assert_eq!(html, "<p>$$\na+b</p>\n");
}

#[test]
fn test_inline_math() {
    let html = markdown_to_html("area is $\\pi r^2$ here");
    assert_eq!(
        html,
        "<p>area is <span data-latex=\"\\pi r^2\" data-type=\"inline-math\"></span> here</p>\n"
    );
}

/// A newline inside `$...$` aborts the span; both dollars stay literal.
#[test]
fn test_inline_math_does_not_cross_lines() {
    let html = markdown_to_html("a $b\nc$ d");
    assert!(!html.contains("inline-math"), "unexpected math in {html}");
    assert!(html.contains("$b"), "dollar dropped in {html}");
}

#[test]
fn test_block_math_container_to_markdown() {
    let md = html_to_markdown(r#"<div data-latex="a+b+c" data-type="block-math"></div>"#);
    assert_eq!(md, "$$a+b+c$$");
}

#[test]
fn test_inline_math_container_to_markdown() {
    let md = html_to_markdown(
        r#"<p>so <span data-latex="x &lt; y" data-type="inline-math"></span> holds</p>"#,
    );
    assert_eq!(md, "so $x < y$ holds");
}

/// A paragraph holding only an inline-math span collapses to that span.
#[test]
fn test_sole_inline_math_paragraph() {
    let md = html_to_markdown(r#"<p><span data-latex="e^{i\pi}" data-type="inline-math"></span></p>"#);
    assert_eq!(md, "$e^{i\\pi}$");
}

#[test]
fn test_empty_math_container_is_dropped() {
    let md = html_to_markdown(r#"<p>a</p><div data-latex="" data-type="block-math"></div><p>b</p>"#);
    assert_eq!(md, "a\n\nb");
}

#[test]
fn test_math_round_trip_keeps_backslashes() {
    let source = "$$\\int_0^1 x\\,dx$$";
    let md = html_to_markdown(markdown_to_html(source).as_str());
    assert_eq!(md, source);
}
