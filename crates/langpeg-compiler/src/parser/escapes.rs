//! Escape processing shared by string literals and character classes
//! (`\n \r \t \' \" \[ \] \\`, octal `\0..\377`, hex `\xFF`).

use crate::error::ParseError;
use langpeg_core::Span;

/// Resolve one backslash escape starting right after the `\`. Returns the
/// resolved byte value and how many source characters the escape body
/// consumed (not counting the leading backslash).
pub fn resolve_escape(rest: &str, span: Span) -> Result<(u8, usize), ParseError> {
    let mut chars = rest.chars();
    let first = chars.next().ok_or(ParseError::UnterminatedLiteral { span })?;
    match first {
        'n' => Ok((b'\n', 1)),
        'r' => Ok((b'\r', 1)),
        't' => Ok((b'\t', 1)),
        '\'' => Ok((b'\'', 1)),
        '"' => Ok((b'"', 1)),
        '[' => Ok((b'[', 1)),
        ']' => Ok((b']', 1)),
        '\\' => Ok((b'\\', 1)),
        '-' => Ok((b'-', 1)),
        'x' => {
            let hex: String = rest.chars().skip(1).take(2).collect();
            if hex.len() != 2 {
                return Err(ParseError::MalformedCharClass {
                    span,
                    reason: "incomplete \\xFF escape".to_owned(),
                });
            }
            let value = u8::from_str_radix(&hex, 16).map_err(|_| ParseError::MalformedCharClass {
                span,
                reason: format!("invalid hex escape \\x{hex}"),
            })?;
            Ok((value, 3))
        }
        '0'..='3' => {
            let octal: String = rest.chars().take_while(|c| ('0'..='7').contains(c)).take(3).collect();
            let value = u32::from_str_radix(&octal, 8).map_err(|_| ParseError::MalformedCharClass {
                span,
                reason: format!("invalid octal escape \\{octal}"),
            })?;
            if value > 0xFF {
                return Err(ParseError::MalformedCharClass {
                    span,
                    reason: format!("octal escape \\{octal} exceeds \\377"),
                });
            }
            Ok((value as u8, octal.len()))
        }
        other => Err(ParseError::MalformedCharClass {
            span,
            reason: format!("unknown escape \\{other}"),
        }),
    }
}

/// Decode a string literal's inner content (quotes already stripped) into
/// raw bytes, resolving escapes and passing non-ASCII UTF-8 through
/// byte-for-byte (UTF-8 is tolerated in classes and literals, not decoded).
pub fn decode_literal(content: &str, span: Span) -> Result<Vec<u8>, ParseError> {
    let mut out = Vec::new();
    let mut rest = content;
    while let Some(c) = rest.chars().next() {
        if c == '\\' {
            let (value, consumed) = resolve_escape(&rest[1..], span)?;
            out.push(value);
            rest = &rest[1 + byte_len_of_chars(&rest[1..], consumed)..];
        } else {
            let mut buf = [0u8; 4];
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            rest = &rest[c.len_utf8()..];
        }
    }
    Ok(out)
}

fn byte_len_of_chars(s: &str, n_chars: usize) -> usize {
    s.chars().take(n_chars).map(|c| c.len_utf8()).sum()
}
