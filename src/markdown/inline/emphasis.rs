//! Delimiter runs and emphasis matching
//!
//! `*` and `_` runs follow the CommonMark flanking rules, including the
//! rule of three. `~~` pairs produce strikethrough; a `~` run of any other
//! length stays literal and never reaches this module.

use smallvec::SmallVec;

use crate::markdown::token::InlineTag;

#[derive(Debug, Clone)]
pub(super) struct Delim {
    pub ch: u8,
    /// Characters of the run not yet matched
    pub count: usize,
    pub can_open: bool,
    pub can_close: bool,
    /// Tags opened here, innermost first
    pub opens: SmallVec<[InlineTag; 2]>,
    /// Tags closed here, innermost first
    pub closes: SmallVec<[InlineTag; 2]>,
}

impl Delim {
    /// Classify a run of `count` copies of `ch` between `before` and
    /// `after` (`None` at the start or end of the inline content).
    pub(super) fn new(ch: u8, count: usize, before: Option<char>, after: Option<char>) -> Self {
        let before_ws = before.is_none_or(char::is_whitespace);
        let after_ws = after.is_none_or(char::is_whitespace);
        let before_punct = before.is_some_and(is_punctuation);
        let after_punct = after.is_some_and(is_punctuation);

        let left_flanking = !after_ws && (!after_punct || before_ws || before_punct);
        let right_flanking = !before_ws && (!before_punct || after_ws || after_punct);

        let (can_open, can_close) = if ch == b'_' {
            (
                left_flanking && (!right_flanking || before_punct),
                right_flanking && (!left_flanking || after_punct),
            )
        } else {
            (left_flanking, right_flanking)
        };

        Self {
            ch,
            count,
            can_open,
            can_close,
            opens: SmallVec::new(),
            closes: SmallVec::new(),
        }
    }
}

fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation() || (!c.is_ascii() && !c.is_alphanumeric() && !c.is_whitespace())
}

/// Match openers to closers across `delims` in source order.
pub(super) fn process_emphasis(delims: &mut [Delim]) {
    let mut closer = 0;
    while closer < delims.len() {
        let c = &delims[closer];
        if !c.can_close || c.count == 0 {
            closer += 1;
            continue;
        }
        let (ch, c_count, c_can_open) = (c.ch, c.count, c.can_open);

        let mut found = None;
        let mut opener = closer;
        while opener > 0 {
            opener -= 1;
            let o = &delims[opener];
            if o.ch != ch || !o.can_open || o.count == 0 {
                continue;
            }
            if ch != b'~'
                && (o.can_close || c_can_open)
                && (o.count + c_count) % 3 == 0
                && (o.count % 3 != 0 || c_count % 3 != 0)
            {
                continue;
            }
            found = Some(opener);
            break;
        }

        let Some(opener) = found else {
            closer += 1;
            continue;
        };

        let (tag, used) = if ch == b'~' {
            (InlineTag::Strikethrough, 2)
        } else if delims[opener].count >= 2 && c_count >= 2 {
            (InlineTag::Strong, 2)
        } else {
            (InlineTag::Emphasis, 1)
        };

        delims[opener].count -= used;
        delims[opener].opens.push(tag);
        delims[closer].count -= used;
        delims[closer].closes.push(tag);

        // Runs between a matched pair can no longer pair with anything.
        for between in &mut delims[opener + 1..closer] {
            between.can_open = false;
            between.can_close = false;
        }

        if delims[closer].count == 0 {
            closer += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flanking_rules_for_underscore() {
        let d = Delim::new(b'_', 1, Some('a'), Some('b'));
        assert!(!d.can_open && !d.can_close, "intraword underscore is literal");
        let d = Delim::new(b'*', 1, Some('a'), Some('b'));
        assert!(d.can_open && d.can_close);
    }

    #[test]
    fn triple_run_becomes_strong_then_emphasis() {
        let mut delims = vec![
            Delim::new(b'*', 3, None, Some('a')),
            Delim::new(b'*', 3, Some('a'), None),
        ];
        process_emphasis(&mut delims);
        assert_eq!(delims[0].opens.as_slice(), [InlineTag::Strong, InlineTag::Emphasis]);
        assert_eq!(delims[1].closes.as_slice(), [InlineTag::Strong, InlineTag::Emphasis]);
        assert_eq!(delims[0].count, 0);
    }

    #[test]
    fn unmatched_opener_keeps_its_count() {
        let mut delims = vec![Delim::new(b'*', 2, None, Some('a'))];
        process_emphasis(&mut delims);
        assert_eq!(delims[0].count, 2);
        assert!(delims[0].opens.is_empty());
    }
}
