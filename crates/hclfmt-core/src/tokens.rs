//! Token utilities — pure functions over token runs and quoted-literal text

use crate::parser::ast::{Token, TokenKind, Tokens};

/// Drop any run of newline tokens from the front and the back of `tokens`.
///
/// Interior newlines are kept. An empty or all-newline input yields an empty run.
pub fn trim_newlines(tokens: Tokens) -> Tokens {
    let is_content = |t: &Token| t.kind != TokenKind::Newline;

    let Some(start) = tokens.iter().position(is_content) else {
        return Tokens::new();
    };
    let end = tokens.iter().rposition(is_content).unwrap_or(start) + 1;

    tokens.into_iter().skip(start).take(end - start).collect()
}

/// Escape a label value for use as the literal part of a quoted string
pub fn escape_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '$' | '%' if chars.peek() == Some(&'{') => {
                // Would otherwise open a template sequence
                out.push(ch);
                out.push(ch);
            }
            c if c.is_control() => {
                let code = c as u32;
                if code > 0xFFFF {
                    out.push_str(&format!("\\U{:08x}", code));
                } else {
                    out.push_str(&format!("\\u{:04x}", code));
                }
            }
            c => out.push(c),
        }
    }

    out
}

/// Decode the literal part of a quoted string.
///
/// Returns `None` for an unknown or malformed escape sequence.
pub fn unescape_quoted(literal: &str) -> Option<String> {
    let mut out = String::with_capacity(literal.len());
    let mut chars = literal.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next()? {
                'n' => out.push('\n'),
                'r' => out.push('\r'),
                't' => out.push('\t'),
                '"' => out.push('"'),
                '\\' => out.push('\\'),
                'u' => out.push(read_code_point(&mut chars, 4)?),
                'U' => out.push(read_code_point(&mut chars, 8)?),
                _ => return None,
            },
            '$' | '%' => {
                // `$${` and `%%{` are the escaped forms of `${` and `%{`
                let mut lookahead = chars.clone();
                if lookahead.next() == Some(ch) && lookahead.next() == Some('{') {
                    chars.next();
                }
                out.push(ch);
            }
            c => out.push(c),
        }
    }

    Some(out)
}

fn read_code_point(chars: &mut impl Iterator<Item = char>, digits: usize) -> Option<char> {
    let hex: String = chars.take(digits).collect();
    if hex.len() != digits {
        return None;
    }
    u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32)
}
