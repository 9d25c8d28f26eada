//! Error types for the conversion engine
//!
//! Grammar rejections (an unterminated `$$` fence, a newline inside `$...$`)
//! are not errors: the parser falls back to the base grammar. These variants
//! cover the failures that abort a whole conversion. The public entry points
//! log them and return an empty string.

use thiserror::Error;

/// Result type alias for conversion operations
pub type ConversionResult<T> = Result<T, ConversionError>;

/// Error types for conversion operations
#[derive(Debug, Error)]
pub enum ConversionError {
    /// Input exceeds the configured size ceiling
    #[error("Input of {len} bytes exceeds the {limit} byte limit")]
    InputTooLarge { len: usize, limit: usize },

    /// The streaming tag guard failed
    #[error("HTML rewrite error: {0}")]
    HtmlRewrite(String),

    /// The DOM parser failed to read its input
    #[error("HTML parse error: {0}")]
    HtmlParse(#[from] std::io::Error),

    /// Rewritten output was not valid UTF-8
    #[error("Invalid UTF-8 in rewritten HTML: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// A rule implementation panicked
    #[error("Conversion panicked: {0}")]
    Panicked(String),
}

impl ConversionError {
    /// Build a `Panicked` error from a `catch_unwind` payload.
    pub(crate) fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };
        ConversionError::Panicked(message)
    }
}
