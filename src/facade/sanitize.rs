//! Downstream sanitizer seam
//!
//! The engine does not strip dangerous markup from its own output; the
//! embedding application supplies a sanitizer that does.

/// HTML in, cleaned HTML out
pub trait HtmlSanitizer {
    fn sanitize(&self, html: &str) -> String;
}

impl<F> HtmlSanitizer for F
where
    F: Fn(&str) -> String,
{
    fn sanitize(&self, html: &str) -> String {
        self(html)
    }
}
