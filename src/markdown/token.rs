//! Token stream produced by the markdown parser
//!
//! Block structure is flat: containers are open/close pairs and nesting is
//! implied by their order. Inline content lives in the `children` of
//! `TokenKind::Inline` tokens.

use smallvec::SmallVec;

/// Ordered attribute list; most tokens carry zero to two attributes.
pub type Attrs = SmallVec<[(String, String); 2]>;

/// Container and leaf-container block kinds that open and close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockTag {
    Paragraph,
    Heading(u8),
    Blockquote,
    BulletList,
    OrderedList,
    ListItem,
    Table,
    TableHead,
    TableBody,
    TableRow,
    TableHeaderCell,
    TableDataCell,
}

impl BlockTag {
    /// The HTML element this block renders to.
    #[must_use]
    pub fn html_name(self) -> &'static str {
        match self {
            BlockTag::Paragraph => "p",
            BlockTag::Heading(1) => "h1",
            BlockTag::Heading(2) => "h2",
            BlockTag::Heading(3) => "h3",
            BlockTag::Heading(4) => "h4",
            BlockTag::Heading(5) => "h5",
            BlockTag::Heading(_) => "h6",
            BlockTag::Blockquote => "blockquote",
            BlockTag::BulletList => "ul",
            BlockTag::OrderedList => "ol",
            BlockTag::ListItem => "li",
            BlockTag::Table => "table",
            BlockTag::TableHead => "thead",
            BlockTag::TableBody => "tbody",
            BlockTag::TableRow => "tr",
            BlockTag::TableHeaderCell => "th",
            BlockTag::TableDataCell => "td",
        }
    }

    /// Containers whose open tag is followed by a newline.
    #[must_use]
    pub fn breaks_after_open(self) -> bool {
        matches!(
            self,
            BlockTag::Blockquote
                | BlockTag::BulletList
                | BlockTag::OrderedList
                | BlockTag::Table
                | BlockTag::TableHead
                | BlockTag::TableBody
                | BlockTag::TableRow
        )
    }
}

/// Inline spans that open and close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InlineTag {
    Emphasis,
    Strong,
    Strikethrough,
    Link,
    Label,
}

impl InlineTag {
    #[must_use]
    pub fn html_name(self) -> &'static str {
        match self {
            InlineTag::Emphasis => "em",
            InlineTag::Strong => "strong",
            InlineTag::Strikethrough => "s",
            InlineTag::Link => "a",
            InlineTag::Label => "label",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    BlockOpen(BlockTag),
    BlockClose(BlockTag),
    /// Inline container; `content` is the raw source, `children` the parse.
    Inline,
    Text,
    /// Fenced or indented code; `info` holds the fence info string.
    Fence,
    MathBlock,
    MathInline,
    HtmlInline,
    HtmlBlock,
    ThematicBreak,
    InlineOpen(InlineTag),
    InlineClose(InlineTag),
    CodeInline,
    /// `content` is the plain alt text, `children` the parsed alt.
    Image,
    SoftBreak,
    HardBreak,
    /// Inert task-list checkbox; checked when it has a `checked` attribute.
    Checkbox,
}

/// Source line range, zero-based, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSpan {
    pub start_line: usize,
    pub end_line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub content: String,
    pub info: String,
    pub attrs: Attrs,
    pub children: Vec<Token>,
    pub span: Option<SourceSpan>,
    /// Set on paragraph open/close pairs inside tight list items.
    pub hidden: bool,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind) -> Self {
        Self {
            kind,
            content: String::new(),
            info: String::new(),
            attrs: Attrs::new(),
            children: Vec::new(),
            span: None,
            hidden: false,
        }
    }

    #[must_use]
    pub fn with_content(kind: TokenKind, content: impl Into<String>) -> Self {
        let mut token = Self::new(kind);
        token.content = content.into();
        token
    }

    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::with_content(TokenKind::Text, content)
    }

    #[must_use]
    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    #[must_use]
    pub fn with_span(mut self, start_line: usize, end_line: usize) -> Self {
        self.span = Some(SourceSpan {
            start_line,
            end_line,
        });
        self
    }

    /// Set an attribute, replacing an existing one of the same name in place.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some(slot) = self.attrs.iter_mut().find(|(k, _)| k == name) {
            slot.1 = value;
        } else {
            self.attrs.push((name.to_string(), value));
        }
    }

    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_attr_keeps_insertion_order() {
        let mut token = Token::new(TokenKind::BlockOpen(BlockTag::ListItem))
            .with_attr("data-type", "taskItem")
            .with_attr("data-checked", "false");
        token.set_attr("data-type", "x");
        let names: Vec<&str> = token.attrs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, ["data-type", "data-checked"]);
        assert_eq!(token.attr("data-type"), Some("x"));
    }
}
