//! Entity-decode post-pass
//!
//! The serializer escapes entity-like text as `\&amp;...`, so decoding the
//! finished markdown once recovers literal text everywhere except inside
//! fenced code blocks and code spans, which are copied through untouched.

use crate::entities;
use crate::markdown::block::leaf::{is_closing_fence, parse_fence_start};

/// Decode entity references outside code and trim surrounding blank lines.
pub(crate) fn decode_outside_code(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len());
    let mut fence: Option<(u8, usize)> = None;

    for (idx, line) in markdown.split('\n').enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        let body = strip_container_prefix(line);

        if let Some((ch, len)) = fence {
            if is_closing_fence(body, ch, len) {
                fence = None;
            }
            out.push_str(line);
            continue;
        }
        if let Some((ch, len, _)) = parse_fence_start(body) {
            fence = Some((ch, len));
            out.push_str(line);
            continue;
        }

        decode_line(line, &mut out);
    }

    out.trim_matches('\n').to_string()
}

/// Drop indentation and blockquote markers so fences inside list items and
/// quotes are still recognised.
fn strip_container_prefix(line: &str) -> &str {
    let mut rest = line.trim_start_matches(' ');
    while let Some(after) = rest.strip_prefix('>') {
        rest = after.trim_start_matches(' ');
    }
    rest
}

/// Decode one line, leaving backtick code spans and backslash-escaped
/// backticks as they are.
fn decode_line(line: &str, out: &mut String) {
    if !line.contains('&') {
        out.push_str(line);
        return;
    }

    let bytes = line.as_bytes();
    let mut plain_start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'`' => {
                let run = bytes[i..].iter().take_while(|&&b| b == b'`').count();
                match find_closing_run(bytes, i + run, run) {
                    Some(close) => {
                        out.push_str(&entities::decode(&line[plain_start..i]));
                        out.push_str(&line[i..close + run]);
                        i = close + run;
                        plain_start = i;
                    }
                    None => i += run,
                }
            }
            _ => i += 1,
        }
    }
    if plain_start < line.len() {
        out.push_str(&entities::decode(&line[plain_start..]));
    }
}

fn find_closing_run(bytes: &[u8], from: usize, len: usize) -> Option<usize> {
    let mut i = from;
    while i < bytes.len() {
        if bytes[i] == b'`' {
            let run = bytes[i..].iter().take_while(|&&b| b == b'`').count();
            if run == len {
                return Some(i);
            }
            i += run;
        } else {
            i += 1;
        }
    }
    None
}
