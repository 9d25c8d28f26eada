use kodegen_markdown_bridge::entities::{EncodeOptions, decode, encode, encode_with};

#[test]
fn test_encode_named_and_numeric() {
    let text = r#"<a href="x">Tom & 'Jerry'</a>"#;
    assert_eq!(
        encode(text, true),
        "&lt;a href=&quot;x&quot;&gt;Tom &amp; &apos;Jerry&apos;&lt;/a&gt;"
    );
    assert_eq!(
        encode(text, false),
        "&#x3C;a href=&#x22;x&#x22;&#x3E;Tom &#x26; &#x27;Jerry&#x27;&#x3C;/a&#x3E;"
    );
}

#[test]
fn test_encode_leaves_plain_text_alone() {
    assert_eq!(encode("\\frac{a}{b} + ü", true), "\\frac{a}{b} + ü");
}

#[test]
fn test_encode_non_ascii_option() {
    let options = EncodeOptions {
        named_references: true,
        encode_non_ascii: true,
    };
    assert_eq!(encode_with("é<", options), "&#xE9;&lt;");
}

#[test]
fn test_decode_named_and_numeric() {
    assert_eq!(decode("&lt;p&gt; &amp; &#60; &#x3C; &quot;"), "<p> & < < \"");
}

/// Malformed references pass through unchanged.
#[test]
fn test_decode_tolerates_malformed_entities() {
    assert_eq!(decode("AT&T"), "AT&T");
    assert_eq!(decode("&zzzz;"), "&zzzz;");
    assert_eq!(decode("& alone"), "& alone");
}

#[test]
fn test_encode_decode_inverse() {
    for sample in ["a<b>c", "x & y", r#"say "hi""#, "it's", "∑ x_i"] {
        assert_eq!(decode(&encode(sample, true)), sample);
        assert_eq!(decode(&encode(sample, false)), sample);
    }
}
