//! Element rules
//!
//! The set of element kinds is closed, so dispatch is a single `match`
//! over [`Rule`]. `classify` checks the custom rules first (math, literal
//! break, strikethrough and underline, task lists, tables) and falls back
//! to the base rules and finally to generic block or inline handling.

mod block;
mod inline;
mod list;
mod math;
mod table;

use std::rc::Rc;

use markup5ever_rcdom::Node;

use super::dom_walker::{Context, Walker, is_block_element};
use super::node_util::{MathKind, get_node_tag_name, math_kind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rule {
    BlockMath,
    InlineMath,
    LineBreak,
    Strikethrough,
    Underline,
    TaskList,
    TaskItem,
    Table,
    /// `thead`, `tbody`, `tfoot`, `tr` or a cell met outside a table walk
    TablePart,
    Heading(u8),
    Paragraph,
    Blockquote,
    CodeBlock,
    InlineCode,
    Emphasis,
    Strong,
    Link,
    Image,
    HorizontalRule,
    List { ordered: bool },
    ListItem,
    Checkbox,
    Skipped,
    Block,
    Inline,
}

impl Rule {
    pub(crate) fn classify(node: &Rc<Node>) -> Rule {
        match math_kind(node) {
            Some(MathKind::Block) => return Rule::BlockMath,
            Some(MathKind::Inline) => return Rule::InlineMath,
            None => {}
        }
        let Some(tag) = get_node_tag_name(node) else {
            return Rule::Inline;
        };
        match tag {
            "br" => Rule::LineBreak,
            "del" | "s" | "strike" => Rule::Strikethrough,
            "u" | "ins" => Rule::Underline,
            "ul" | "ol" if list::is_task_list(node) => Rule::TaskList,
            "li" if list::is_task_item(node) => Rule::TaskItem,
            "table" => Rule::Table,
            "thead" | "tbody" | "tfoot" | "tr" | "th" | "td" => Rule::TablePart,
            "h1" => Rule::Heading(1),
            "h2" => Rule::Heading(2),
            "h3" => Rule::Heading(3),
            "h4" => Rule::Heading(4),
            "h5" => Rule::Heading(5),
            "h6" => Rule::Heading(6),
            "p" => Rule::Paragraph,
            "blockquote" => Rule::Blockquote,
            "pre" => Rule::CodeBlock,
            "code" | "kbd" | "samp" => Rule::InlineCode,
            "em" | "i" => Rule::Emphasis,
            "strong" | "b" => Rule::Strong,
            "a" => Rule::Link,
            "img" => Rule::Image,
            "hr" => Rule::HorizontalRule,
            "ul" => Rule::List { ordered: false },
            "ol" => Rule::List { ordered: true },
            "li" => Rule::ListItem,
            "input" => Rule::Checkbox,
            "script" | "style" | "head" | "title" | "template" | "noscript" => Rule::Skipped,
            _ if is_block_element(tag) => Rule::Block,
            _ => Rule::Inline,
        }
    }

    pub(crate) fn render(self, walker: &Walker, node: &Rc<Node>, ctx: Context) -> String {
        match self {
            Rule::BlockMath => math::block_math(node, ctx),
            Rule::InlineMath => math::inline_math(node),
            Rule::LineBreak => "<br>".to_string(),
            Rule::Strikethrough => inline::wrap(&walker.walk_children(node, ctx), "~~", "~~"),
            Rule::Underline => inline::wrap(&walker.walk_children(node, ctx), "<u>", "</u>"),
            Rule::TaskList => list::task_list(walker, node, ctx),
            Rule::TaskItem => list::task_item(walker, node, ctx),
            Rule::Table => table::table(walker, node, ctx),
            Rule::TablePart => table::part(walker, node, ctx),
            Rule::Heading(level) => block::heading(walker, node, ctx, level),
            Rule::Paragraph => block::paragraph(walker, node, ctx),
            Rule::Blockquote => block::blockquote(walker, node, ctx),
            Rule::CodeBlock => block::code_block(walker, node, ctx),
            Rule::InlineCode => inline::code(walker, node, ctx),
            Rule::Emphasis => inline::wrap(&walker.walk_children(node, ctx), "*", "*"),
            Rule::Strong => inline::wrap(&walker.walk_children(node, ctx), "**", "**"),
            Rule::Link => inline::link(walker, node, ctx),
            Rule::Image => inline::image(node),
            Rule::HorizontalRule => "\n\n---\n\n".to_string(),
            Rule::List { ordered } => list::list(walker, node, ctx, ordered),
            Rule::ListItem => list::orphan_item(walker, node, ctx),
            Rule::Checkbox | Rule::Skipped => String::new(),
            Rule::Block => block::generic(walker, node, ctx),
            Rule::Inline => walker.walk_children(node, ctx),
        }
    }
}
