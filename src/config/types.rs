//! Core configuration type for the conversion engine

use serde::{Deserialize, Serialize};

use crate::utils::{DEFAULT_MAX_INPUT_BYTES, DEFAULT_MAX_NESTING_DEPTH, DEFAULT_PREVIEW_LENGTH};

/// Construction-time settings shared by both conversion directions
///
/// Deserializable so an embedding application can load it alongside its
/// own settings; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Wrap task-list checkboxes and their text in a `<label>` (default: false)
    pub(crate) task_list_label: bool,

    /// Render soft line breaks inside paragraphs as `<br>` (default: false)
    pub(crate) hard_breaks: bool,

    /// Reject inputs larger than this many bytes (default: 4 MiB)
    ///
    /// `None` disables the check.
    pub(crate) max_input_bytes: Option<usize>,

    /// Maximum container nesting depth (default: 64)
    pub(crate) max_nesting_depth: usize,

    /// Default length of plain-text previews in characters (default: 50)
    pub(crate) preview_length: usize,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            task_list_label: false,
            hard_breaks: false,
            max_input_bytes: Some(DEFAULT_MAX_INPUT_BYTES),
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            preview_length: DEFAULT_PREVIEW_LENGTH,
        }
    }
}

impl ConverterConfig {
    #[must_use]
    pub fn task_list_label(&self) -> bool {
        self.task_list_label
    }

    #[must_use]
    pub fn hard_breaks(&self) -> bool {
        self.hard_breaks
    }

    #[must_use]
    pub fn max_input_bytes(&self) -> Option<usize> {
        self.max_input_bytes
    }

    #[must_use]
    pub fn max_nesting_depth(&self) -> usize {
        self.max_nesting_depth
    }

    #[must_use]
    pub fn preview_length(&self) -> usize {
        self.preview_length
    }
}
