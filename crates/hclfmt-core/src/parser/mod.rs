//! HCL Parser — tokenizer, token tree types, and a best-effort tree builder
//!
//! Converts configuration text into a [`ConfigFile`]: a tree of bodies,
//! blocks and attributes in which every node keeps the exact tokens it was
//! built from. Parsing never aborts; whatever cannot be recognized is kept
//! verbatim as unstructured tokens and reported as a diagnostic.

pub mod ast;
pub mod tokenizer;

use std::collections::HashSet;

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use ast::{Attribute, Block, Body, ConfigFile, Structure, Token, TokenKind, Tokens};
use tokenizer::{Span, SpannedToken, Tokenizer};

/// Parse configuration text into a token tree
///
/// # Guarantees
/// - Deterministic: same input always produces same tree
/// - Lossless: `parse_config(src).0.render() == src`
/// - Complete: reports all problems found, not just the first
pub fn parse_config(src: &str) -> (ConfigFile, Diagnostics) {
    let (tokens, mut diagnostics) = Tokenizer::new(src).tokenize();
    let mut parser = Parser::new(tokens);
    let body = parser.parse_body(false);
    let eof = parser.finish();
    diagnostics.extend(parser.diagnostics);
    (ConfigFile { body, eof }, diagnostics)
}

/// Parse raw document bytes.
///
/// Invalid UTF-8 is reported as an encoding error. The tree is built from a
/// lossy decoding so the remaining diagnostics still point at real lines, and
/// must not be rendered back in place of the input.
pub fn parse_config_bytes(src: &[u8]) -> (ConfigFile, Diagnostics) {
    match std::str::from_utf8(src) {
        Ok(text) => parse_config(text),
        Err(e) => {
            let text = String::from_utf8_lossy(src);
            let (file, parsed) = parse_config(&text);
            let mut diagnostics = Diagnostics::new();
            diagnostics.add_error(
                DiagnosticKind::Encoding,
                format!("Invalid UTF-8 at byte {}", e.valid_up_to()),
                None,
            );
            diagnostics.extend(parsed);
            (file, diagnostics)
        }
    }
}

// ── Tree builder ───────────────────────────────────────────

struct Parser {
    tokens: Vec<SpannedToken>,
    position: usize,
    diagnostics: Diagnostics,
}

impl Parser {
    fn new(tokens: Vec<SpannedToken>) -> Self {
        Parser {
            tokens,
            position: 0,
            diagnostics: Diagnostics::new(),
        }
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek_kind_at(0)
    }

    fn peek_kind_at(&self, offset: usize) -> TokenKind {
        self.tokens
            .get(self.position + offset)
            .map_or(TokenKind::Eof, |st| st.token.kind)
    }

    fn span(&self) -> Span {
        self.tokens
            .get(self.position)
            .or_else(|| self.tokens.last())
            .map_or(Span { line: 1, column: 1, offset: 0 }, |st| st.span)
    }

    /// Consume the current token. Never moves past `Eof`.
    fn bump(&mut self) -> Token {
        let token = self.tokens[self.position.min(self.tokens.len() - 1)].token.clone();
        if token.kind != TokenKind::Eof {
            self.position += 1;
        }
        token
    }

    fn finish(&mut self) -> Token {
        match self.peek_kind() {
            TokenKind::Eof => self.bump(),
            _ => Token::new(TokenKind::Eof, ""),
        }
    }

    /// Parse body items until end of input, or until the closing brace of the
    /// enclosing block when `in_block` is set
    fn parse_body(&mut self, in_block: bool) -> Body {
        let mut body = Body::default();
        let mut seen = HashSet::new();

        loop {
            match self.peek_kind() {
                TokenKind::Eof => break,
                TokenKind::CBrace if in_block => break,
                TokenKind::Newline | TokenKind::Comment => {
                    let token = self.bump();
                    body.push_unstructured(vec![token]);
                }
                TokenKind::Ident if self.peek_kind_at(1) == TokenKind::Equal => {
                    let span = self.span();
                    let attr = self.parse_attribute(in_block);
                    if !seen.insert(attr.name().to_string()) {
                        self.diagnostics.add_error(
                            DiagnosticKind::Syntax,
                            format!("Attribute redefined: '{}' was already set in this body", attr.name()),
                            Some(span),
                        );
                    }
                    body.items.push(Structure::Attribute(attr));
                }
                TokenKind::Ident if self.is_block_header() => {
                    let block = self.parse_block();
                    body.items.push(Structure::Block(block));
                }
                _ => {
                    let span = self.span();
                    let message = match self.peek_kind() {
                        TokenKind::CBrace => "Unexpected closing brace".to_string(),
                        TokenKind::Ident => {
                            "Expected an attribute definition or a block header".to_string()
                        }
                        kind => format!("Unexpected {:?} token at the start of a body item", kind),
                    };
                    self.diagnostics.add_error(DiagnosticKind::Syntax, message, Some(span));
                    let skipped = self.skip_line(in_block);
                    body.push_unstructured(skipped);
                }
            }
        }

        body
    }

    fn parse_attribute(&mut self, in_block: bool) -> Attribute {
        let name = self.bump();
        let equals = self.bump();
        let span = self.span();
        let mut expr = self.scan_expression(in_block);

        // Comments trailing the expression on its line belong to the line ending
        let split = expr
            .iter()
            .rposition(|t| t.kind != TokenKind::Comment)
            .map_or(0, |i| i + 1);
        let mut line_end = expr.split_off(split);

        if expr.is_empty() {
            self.diagnostics.add_error(
                DiagnosticKind::Syntax,
                format!("Missing expression for attribute '{}'", name.text),
                Some(span),
            );
        }

        if self.peek_kind() == TokenKind::Newline {
            line_end.push(self.bump());
        }

        Attribute {
            name,
            equals,
            expr,
            line_end,
        }
    }

    /// Collect expression tokens up to the first newline outside any
    /// bracket, quote, template sequence or heredoc
    fn scan_expression(&mut self, in_block: bool) -> Tokens {
        let mut tokens = Tokens::new();
        let mut depth = 0usize;

        loop {
            let kind = self.peek_kind();
            match kind {
                TokenKind::Eof => break,
                TokenKind::Newline if depth == 0 => break,
                TokenKind::CBrace if depth == 0 && in_block => break,
                _ => {}
            }

            if kind.opens_group() {
                depth += 1;
            } else if kind.closes_group() {
                depth = depth.saturating_sub(1);
            }
            tokens.push(self.bump());
        }

        if depth > 0 {
            self.diagnostics.add_error(
                DiagnosticKind::Syntax,
                "Unclosed bracket at end of input".to_string(),
                Some(self.span()),
            );
        }

        tokens
    }

    /// Whether the tokens at the cursor form `ident label* {`
    fn is_block_header(&self) -> bool {
        let mut offset = 1;
        loop {
            match self.peek_kind_at(offset) {
                TokenKind::OBrace => return true,
                TokenKind::Ident | TokenKind::Comment => offset += 1,
                TokenKind::OQuote => {
                    offset += 1;
                    if self.peek_kind_at(offset) == TokenKind::QuotedLit {
                        offset += 1;
                    }
                    if self.peek_kind_at(offset) != TokenKind::CQuote {
                        return false;
                    }
                    offset += 1;
                }
                _ => return false,
            }
        }
    }

    fn parse_block(&mut self) -> Block {
        let span = self.span();
        let type_name = self.bump();

        let mut labels = Tokens::new();
        while self.peek_kind() != TokenKind::OBrace {
            labels.push(self.bump());
        }
        let open_brace = self.bump();

        let body = self.parse_body(true);

        let mut close = Tokens::new();
        if self.peek_kind() == TokenKind::CBrace {
            close.push(self.bump());
            while self.peek_kind() == TokenKind::Comment {
                close.push(self.bump());
            }
            if self.peek_kind() == TokenKind::Newline {
                close.push(self.bump());
            }
        } else {
            self.diagnostics.add_error(
                DiagnosticKind::Syntax,
                format!("Unclosed configuration block '{}'", type_name.text),
                Some(span),
            );
        }

        Block {
            type_name,
            labels,
            open_brace,
            body,
            close,
        }
    }

    /// Consume the rest of a line that could not be parsed, keeping bracketed
    /// regions together so a malformed block header swallows its whole body
    fn skip_line(&mut self, in_block: bool) -> Tokens {
        let mut tokens = Tokens::new();
        let mut depth = 0usize;

        loop {
            let kind = self.peek_kind();
            match kind {
                TokenKind::Eof => break,
                TokenKind::CBrace if depth == 0 && in_block && !tokens.is_empty() => break,
                TokenKind::Newline if depth == 0 => {
                    tokens.push(self.bump());
                    break;
                }
                _ => {}
            }

            if kind.opens_group() {
                depth += 1;
            } else if kind.closes_group() {
                depth = depth.saturating_sub(1);
            }
            tokens.push(self.bump());
        }

        tokens
    }
}
