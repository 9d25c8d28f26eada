//! Shared constants for the conversion engine
//!
//! Default limits, attribute names and markers used by both conversion
//! directions so the markdown renderer and the HTML serializer agree on
//! the markup they exchange.

/// Default ceiling on input size: 4 MiB
///
/// Inputs above this are rejected before parsing. Both directions are
/// linear-to-quadratic in input size depending on the rule, so an
/// embedding application rendering untrusted content should keep a cap.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 4 * 1024 * 1024;

/// Default maximum container nesting depth: 64 levels
///
/// Applies to blockquote/list nesting in markdown and element nesting in
/// HTML. Deeper markdown containers are read as paragraph text; deeper
/// HTML is flattened to its text content.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 64;

/// Largest `colspan` honoured when serializing tables
///
/// Larger values are clamped, as browsers do, so a short attribute cannot
/// demand an arbitrarily wide row.
pub const MAX_COLSPAN: usize = 1000;

/// Default plain-text preview length in characters
pub const DEFAULT_PREVIEW_LENGTH: usize = 50;

/// Marker appended to truncated previews
pub const ELLIPSIS: &str = "...";

/// Attribute carrying the node type marker on math and task-list markup
pub const ATTR_DATA_TYPE: &str = "data-type";

/// Attribute carrying entity-encoded LaTeX on math containers
pub const ATTR_DATA_LATEX: &str = "data-latex";

/// Attribute carrying `"true"`/`"false"` on task items
pub const ATTR_DATA_CHECKED: &str = "data-checked";

pub const BLOCK_MATH_TYPE: &str = "block-math";
pub const INLINE_MATH_TYPE: &str = "inline-math";
pub const TASK_LIST_TYPE: &str = "taskList";
pub const TASK_ITEM_TYPE: &str = "taskItem";
