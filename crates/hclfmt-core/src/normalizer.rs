//! Canonical normalizer — rewrites legacy HCL surface syntax in place
//!
//! Three rewrites, applied in a single walk over the document tree:
//!
//! 1. `"${expr}"` → `expr` when the quotes wrap exactly one interpolation
//! 2. `type = list` → `type = list(any)` (also `map`, `set`) directly inside
//!    a top-level `variable` block
//! 3. block labels re-emitted in quoted form, dropping interleaved comments
//!    and legacy unquoted labels
//!
//! # Guarantees
//!
//! - **Idempotent**: `format(format(x)) == format(x)`
//! - **Deterministic**: same input always produces same output
//! - **Conservative**: any expression shape that is not fully recognized is
//!   left exactly as written

use tracing::trace;

use crate::parser::ast::*;
use crate::tokens::trim_newlines;

/// Type keywords that mean "collection of any element type" when bare
const IMPLICIT_ANY_TYPES: [&str; 3] = ["list", "map", "set"];

// ── Walker ─────────────────────────────────────────────────

/// Normalize a whole document
pub fn format_file(file: &mut ConfigFile) {
    format_body(&mut file.body, &[]);
}

/// Normalize every attribute and block of `body`, recursing into blocks.
///
/// `in_blocks` holds the block types enclosing `body`, outermost first.
pub fn format_body(body: &mut Body, in_blocks: &[String]) {
    let in_variable = in_blocks.len() == 1 && in_blocks[0] == "variable";

    for attr in body.attributes_mut() {
        let tokens = attr.expr_tokens().to_vec();
        let formatted = if in_variable && attr.name() == "type" {
            format_type_expr(tokens)
        } else {
            format_value_expr(tokens)
        };

        if formatted.as_slice() != attr.expr_tokens() {
            trace!(
                attribute = attr.name(),
                path = %in_blocks.join("."),
                from = %render(attr.expr_tokens()).trim(),
                to = %render(&formatted).trim(),
                "rewrote expression"
            );
            attr.set_expr_tokens(formatted);
        }
    }

    for block in body.blocks_mut() {
        format_labels(block);

        let mut path = in_blocks.to_vec();
        path.push(block.block_type().to_string());
        format_body(block.body_mut(), &path);
    }
}

// ── Expressions ────────────────────────────────────────────

/// Unwrap a quoted template that holds nothing but one interpolation.
///
/// Returns `tokens` unchanged unless the whole expression is
/// `" ${ ... } "` with no literal text and no second sequence at the top
/// level. Quoted strings nested inside the interpolation (function
/// arguments and the like) may contain anything.
pub fn format_value_expr(tokens: Tokens) -> Tokens {
    if tokens.len() < 5 {
        return tokens;
    }

    let n = tokens.len();
    let wrapped = tokens[0].kind == TokenKind::OQuote
        && tokens[1].kind == TokenKind::TemplateInterp
        && tokens[n - 2].kind == TokenKind::TemplateSeqEnd
        && tokens[n - 1].kind == TokenKind::CQuote;
    // Closers synthesized for unterminated input are zero-width
    let closed = !tokens[n - 2].text.is_empty() && !tokens[n - 1].text.is_empty();
    if !wrapped || !closed {
        return tokens;
    }

    let interior = &tokens[2..n - 2];
    let mut quote_depth: i32 = 0;
    for token in interior {
        match token.kind {
            TokenKind::OQuote => quote_depth += 1,
            TokenKind::CQuote => quote_depth -= 1,
            _ if quote_depth > 0 => {}
            TokenKind::TemplateInterp | TokenKind::TemplateSeqEnd => return tokens,
            TokenKind::QuotedLit => return tokens,
            _ => {}
        }
    }

    trim_newlines(interior.to_vec())
}

/// Expand a bare `list`, `map` or `set` type keyword to its `(any)` form
pub fn format_type_expr(tokens: Tokens) -> Tokens {
    match tokens.as_slice() {
        [token]
            if token.kind == TokenKind::Ident
                && IMPLICIT_ANY_TYPES.contains(&token.text.as_str()) =>
        {
            vec![
                token.clone(),
                Token::new(TokenKind::OParen, "("),
                Token::new(TokenKind::Ident, "any"),
                Token::new(TokenKind::CParen, ")"),
            ]
        }
        _ => tokens,
    }
}

// ── Labels ─────────────────────────────────────────────────

/// Re-emit a block's labels in canonical quoted form.
///
/// Label values and their order are kept. Blocks whose labels cannot be
/// decoded are left as written.
pub fn format_labels(block: &mut Block) {
    let Some(labels) = block.labels() else {
        return;
    };

    let before = render(block.label_tokens());
    block.set_labels(&labels);
    if render(block.label_tokens()) != before {
        trace!(
            block = block.block_type(),
            labels = ?labels,
            "canonicalized labels"
        );
    }
}
