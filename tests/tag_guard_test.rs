use kodegen_markdown_bridge::tag_guard::{escape_custom_tags, is_standard_tag};

#[test]
fn test_standard_document_is_byte_identical() {
    let html = r#"<div class="a"><h2 id="t">T</h2><table><tr><td colspan="2">x</td></tr></table><img src="a.png"></div>"#;
    assert_eq!(escape_custom_tags(html).unwrap(), html);
}

#[test]
fn test_nested_custom_tags() {
    let out = escape_custom_tags("<outer><inner>x</inner></outer>").unwrap();
    assert_eq!(out, "&lt;outer&gt;&lt;inner&gt;x&lt;/inner&gt;&lt;/outer&gt;");
}

#[test]
fn test_uppercase_standard_tags_pass() {
    assert!(is_standard_tag("P"));
    let out = escape_custom_tags("<P>x</P>").unwrap();
    assert!(!out.contains("&lt;"), "{out}");
}

/// Malformed markup never makes the guard fail.
#[test]
fn test_malformed_markup_is_tolerated() {
    for html in ["<foo", "</bar>", "<<p>>", "<p>unclosed", "<a href='x>y"] {
        assert!(escape_custom_tags(html).is_ok(), "guard failed on {html:?}");
    }
}

#[test]
fn test_iframe_is_neutralized() {
    let out = escape_custom_tags(r#"<iframe src="https://evil.example"></iframe>"#).unwrap();
    assert!(!out.contains("<iframe"), "{out}");
}
