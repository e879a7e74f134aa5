//! Character class body parsing: `[a-z0-9\x20]`, `[^,\n]`. Ranges and
//! escapes share `escapes::resolve_escape`; negation
//! complements the resulting set over the byte domain `0..=255`, matching
//! `CharSet`'s bitmap representation for the common ASCII/byte case.

use langpeg_core::{CharRange, CharSet, Span};

use super::escapes::resolve_escape;
use crate::error::ParseError;

/// Parse a class's inner content (brackets already stripped).
pub fn parse_charclass(content: &str, span: Span) -> Result<CharSet, ParseError> {
    let negate = content.starts_with('^');
    let body = if negate { &content[1..] } else { content };

    let mut ranges = Vec::new();
    let mut rest = body;
    while !rest.is_empty() {
        let (lo, consumed) = next_atom(rest, span)?;
        rest = &rest[consumed..];

        if rest.starts_with('-') && rest.len() > 1 {
            let after_dash = &rest[1..];
            let (hi, consumed2) = next_atom(after_dash, span)?;
            rest = &after_dash[consumed2..];
            if hi < lo {
                return Err(ParseError::MalformedCharClass {
                    span,
                    reason: format!("range {lo}-{hi} is backwards"),
                });
            }
            ranges.push(CharRange::new(lo, hi));
        } else {
            ranges.push(CharRange::single(lo));
        }
    }

    let set = CharSet::from_ranges(ranges);
    Ok(if negate { negate_byte_set(&set) } else { set })
}

/// One code point (possibly escaped), and how many source bytes it took.
fn next_atom(rest: &str, span: Span) -> Result<(u32, usize), ParseError> {
    if let Some(body) = rest.strip_prefix('\\') {
        let (byte, consumed_chars) = resolve_escape(body, span)?;
        let consumed_bytes = 1 + body.chars().take(consumed_chars).map(|c| c.len_utf8()).sum::<usize>();
        Ok((byte as u32, consumed_bytes))
    } else {
        let c = rest.chars().next().expect("checked non-empty by caller");
        Ok((c as u32, c.len_utf8()))
    }
}

/// Complement `set` over `0..=255` (the dialect's classes describe byte
/// values; `CharSet::Ranges` beyond 255 never arise from class syntax, so
/// negation only needs to cover the bitmap domain).
fn negate_byte_set(set: &CharSet) -> CharSet {
    let mut ranges = Vec::new();
    let mut start: Option<u32> = None;
    for c in 0u32..=255 {
        match (set.contains(c), start) {
            (false, None) => start = Some(c),
            (true, Some(s)) => {
                ranges.push(CharRange::new(s, c - 1));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        ranges.push(CharRange::new(s, 255));
    }
    CharSet::from_ranges(ranges)
}
