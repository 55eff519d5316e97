//! HCL Tokenizer — converts configuration text into a lossless token stream
//!
//! Handles: identifiers, numbers, operators and punctuation, quoted templates
//! with `${ }` / `%{ }` sequences, heredocs, comments (`#`, `//`, `/* */`)
//! and newlines. Horizontal whitespace is attached to the token that follows
//! it, so concatenating every token reproduces the input exactly.
//!
//! Guarantees:
//! - Deterministic: same input always produces same token stream
//! - Total: never fails; problems become diagnostics with line:column

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::parser::ast::{Token, TokenKind};

/// Position in source text for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Span {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Token with source position
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

/// Lexical context; the tokenizer keeps a stack of these
#[derive(Debug, Clone, PartialEq)]
enum Frame {
    /// `{ ... }` in expression or body context
    Brace,
    /// `${ ... }` or `%{ ... }`
    Interp,
    /// `" ... "`
    Quote,
    /// `<<ID ... ID`
    Heredoc { delimiter: String, line_start: bool },
}

/// Tokenizer for HCL source text
pub struct Tokenizer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    frames: Vec<Frame>,
    tokens: Vec<SpannedToken>,
    trailing_spaces: String,
    diagnostics: Diagnostics,
}

impl Tokenizer {
    /// Create a new tokenizer for the given input text
    pub fn new(text: &str) -> Self {
        Tokenizer {
            input: text.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            frames: Vec::new(),
            tokens: Vec::new(),
            trailing_spaces: String::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Tokenize the entire input. The stream always ends with an `Eof` token.
    pub fn tokenize(mut self) -> (Vec<SpannedToken>, Diagnostics) {
        while !self.is_at_end() {
            match self.frames.last() {
                Some(Frame::Quote) => self.scan_quoted(),
                Some(Frame::Heredoc { .. }) => self.scan_heredoc(),
                _ => self.scan_normal(),
            }
        }

        self.close_open_templates();
        let span = self.current_span();
        let spaces = std::mem::take(&mut self.trailing_spaces);
        self.tokens.push(SpannedToken {
            token: Token::new(TokenKind::Eof, "").with_spaces(spaces),
            span,
        });

        (self.tokens, self.diagnostics)
    }

    // ── Character helpers ──────────────────────────────────

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_ahead(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn starts_with(&self, pattern: &str) -> bool {
        pattern
            .chars()
            .enumerate()
            .all(|(i, c)| self.peek_ahead(i) == Some(c))
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.input.get(self.position).copied();
        if let Some(c) = ch {
            self.position += 1;
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        ch
    }

    /// Consume `n` characters and return them as a string
    fn take(&mut self, n: usize) -> String {
        (0..n).filter_map(|_| self.advance()).collect()
    }

    fn current_span(&self) -> Span {
        Span {
            line: self.line,
            column: self.column,
            offset: self.position,
        }
    }

    fn push(&mut self, kind: TokenKind, text: String, spaces: String, span: Span) {
        self.tokens.push(SpannedToken {
            token: Token::new(kind, text).with_spaces(spaces),
            span,
        });
    }

    fn newline_len(&self) -> Option<usize> {
        match (self.peek(), self.peek_ahead(1)) {
            (Some('\n'), _) => Some(1),
            (Some('\r'), Some('\n')) => Some(2),
            _ => None,
        }
    }

    // ── Normal mode ────────────────────────────────────────

    fn scan_normal(&mut self) {
        let mut spaces = String::new();
        while let Some(ch) = self.peek() {
            if ch == ' ' || ch == '\t' || (ch == '\r' && self.peek_ahead(1) != Some('\n')) {
                spaces.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let span = self.current_span();
        let Some(ch) = self.peek() else {
            // Trailing whitespace at end of input rides on the Eof token
            self.trailing_spaces = spaces;
            return;
        };

        if let Some(len) = self.newline_len() {
            let text = self.take(len);
            self.push(TokenKind::Newline, text, spaces, span);
            return;
        }

        let (kind, text) = match ch {
            '#' => (TokenKind::Comment, self.read_line_comment()),
            '/' if self.peek_ahead(1) == Some('/') => (TokenKind::Comment, self.read_line_comment()),
            '/' if self.peek_ahead(1) == Some('*') => (TokenKind::Comment, self.read_block_comment(span)),
            '"' => {
                self.frames.push(Frame::Quote);
                (TokenKind::OQuote, self.take(1))
            }
            '{' => {
                self.frames.push(Frame::Brace);
                (TokenKind::OBrace, self.take(1))
            }
            '}' => self.read_close_brace(),
            '~' if self.peek_ahead(1) == Some('}') && self.frames.last() == Some(&Frame::Interp) => {
                self.frames.pop();
                (TokenKind::TemplateSeqEnd, self.take(2))
            }
            '<' if self.peek_ahead(1) == Some('<') => match self.heredoc_header() {
                Some((len, delimiter)) => {
                    let text = self.take(len);
                    self.frames.push(Frame::Heredoc {
                        delimiter,
                        line_start: true,
                    });
                    (TokenKind::OHeredoc, text)
                }
                None => (TokenKind::LessThan, self.take(1)),
            },
            c if c.is_ascii_digit() => (TokenKind::NumberLit, self.read_number()),
            c if c.is_alphabetic() || c == '_' => (TokenKind::Ident, self.read_identifier()),
            _ => match self.read_operator() {
                Some(pair) => pair,
                None => {
                    let text = self.take(1);
                    self.diagnostics.add_error(
                        DiagnosticKind::Lexical,
                        format!("Unexpected character '{}'", text),
                        Some(span),
                    );
                    (TokenKind::Invalid, text)
                }
            },
        };

        self.push(kind, text, spaces, span);
    }

    fn read_close_brace(&mut self) -> (TokenKind, String) {
        match self.frames.last() {
            Some(Frame::Interp) => {
                self.frames.pop();
                (TokenKind::TemplateSeqEnd, self.take(1))
            }
            Some(Frame::Brace) => {
                self.frames.pop();
                (TokenKind::CBrace, self.take(1))
            }
            // Unbalanced; the tree builder reports it
            _ => (TokenKind::CBrace, self.take(1)),
        }
    }

    fn read_operator(&mut self) -> Option<(TokenKind, String)> {
        const OPERATORS: &[(&str, TokenKind)] = &[
            ("...", TokenKind::Ellipsis),
            ("=>", TokenKind::FatArrow),
            ("==", TokenKind::EqualOp),
            ("!=", TokenKind::NotEqual),
            ("<=", TokenKind::LessThanEq),
            (">=", TokenKind::GreaterThanEq),
            ("&&", TokenKind::And),
            ("||", TokenKind::Or),
            ("=", TokenKind::Equal),
            ("<", TokenKind::LessThan),
            (">", TokenKind::GreaterThan),
            ("!", TokenKind::Bang),
            ("+", TokenKind::Plus),
            ("-", TokenKind::Minus),
            ("*", TokenKind::Star),
            ("/", TokenKind::Slash),
            ("%", TokenKind::Percent),
            ("(", TokenKind::OParen),
            (")", TokenKind::CParen),
            ("[", TokenKind::OBrack),
            ("]", TokenKind::CBrack),
            (",", TokenKind::Comma),
            (".", TokenKind::Dot),
            (":", TokenKind::Colon),
            ("?", TokenKind::Question),
        ];

        let (text, kind) = OPERATORS.iter().find(|(text, _)| self.starts_with(text))?;
        Some((*kind, self.take(text.chars().count())))
    }

    fn read_line_comment(&mut self) -> String {
        let mut text = String::new();
        while let Some(ch) = self.peek() {
            if self.newline_len().is_some() {
                break;
            }
            text.push(ch);
            self.advance();
        }
        text
    }

    fn read_block_comment(&mut self, span: Span) -> String {
        let mut text = self.take(2);
        loop {
            if self.starts_with("*/") {
                text.push_str(&self.take(2));
                return text;
            }
            match self.advance() {
                Some(ch) => text.push(ch),
                None => {
                    self.diagnostics.add_error(
                        DiagnosticKind::Lexical,
                        "Unterminated block comment".to_string(),
                        Some(span),
                    );
                    return text;
                }
            }
        }
    }

    fn read_number(&mut self) -> String {
        let mut text = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        // Fraction: only when a digit follows the dot, so `list.0.id` style
        // traversals keep their dots
        if self.peek() == Some('.') && self.peek_ahead(1).is_some_and(|c| c.is_ascii_digit()) {
            text.push_str(&self.take(1));
            while let Some(ch) = self.peek().filter(|c| c.is_ascii_digit()) {
                text.push(ch);
                self.advance();
            }
        }

        // Exponent
        if matches!(self.peek(), Some('e') | Some('E')) {
            let sign = usize::from(matches!(self.peek_ahead(1), Some('+') | Some('-')));
            if self.peek_ahead(1 + sign).is_some_and(|c| c.is_ascii_digit()) {
                text.push_str(&self.take(1 + sign));
                while let Some(ch) = self.peek().filter(|c| c.is_ascii_digit()) {
                    text.push(ch);
                    self.advance();
                }
            }
        }

        text
    }

    fn read_identifier(&mut self) -> String {
        let mut text = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' || ch == '-' {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        text
    }

    /// Recognize `<<ID` or `<<-ID` followed by a newline.
    /// Returns the header length (newline included) and the delimiter.
    fn heredoc_header(&self) -> Option<(usize, String)> {
        let mut len = 2;
        if self.peek_ahead(len) == Some('-') {
            len += 1;
        }

        let mut delimiter = String::new();
        while let Some(ch) = self.peek_ahead(len) {
            let valid = if delimiter.is_empty() {
                ch.is_alphabetic() || ch == '_'
            } else {
                ch.is_alphanumeric() || ch == '_' || ch == '-'
            };
            if !valid {
                break;
            }
            delimiter.push(ch);
            len += 1;
        }
        if delimiter.is_empty() {
            return None;
        }

        match (self.peek_ahead(len), self.peek_ahead(len + 1)) {
            (Some('\n'), _) => Some((len + 1, delimiter)),
            (Some('\r'), Some('\n')) => Some((len + 2, delimiter)),
            _ => None,
        }
    }

    // ── Template modes ─────────────────────────────────────

    /// Open a template sequence if one starts here, pushing the interp frame
    fn read_template_open(&mut self) -> Option<(TokenKind, String)> {
        let kind = if self.starts_with("${") {
            TokenKind::TemplateInterp
        } else if self.starts_with("%{") {
            TokenKind::TemplateControl
        } else {
            return None;
        };

        let len = if self.peek_ahead(2) == Some('~') { 3 } else { 2 };
        self.frames.push(Frame::Interp);
        Some((kind, self.take(len)))
    }

    fn scan_quoted(&mut self) {
        let span = self.current_span();

        if self.peek() == Some('"') {
            self.frames.pop();
            let text = self.take(1);
            self.push(TokenKind::CQuote, text, String::new(), span);
            return;
        }

        if let Some((kind, text)) = self.read_template_open() {
            self.push(kind, text, String::new(), span);
            return;
        }

        if self.newline_len().is_some() {
            self.unterminated_quote(span);
            return;
        }

        let mut text = String::new();
        while let Some(ch) = self.peek() {
            if ch == '"' || self.newline_len().is_some() {
                break;
            }
            if self.starts_with("$${") || self.starts_with("%%{") {
                text.push_str(&self.take(3));
                continue;
            }
            if self.starts_with("${") || self.starts_with("%{") {
                break;
            }
            if ch == '\\' && self.peek_ahead(1).is_some_and(|c| c != '\n' && c != '\r') {
                text.push_str(&self.take(2));
                continue;
            }
            text.push(ch);
            self.advance();
        }

        if crate::tokens::unescape_quoted(&text).is_none() {
            self.diagnostics.add_warning(
                DiagnosticKind::Lexical,
                "Invalid escape sequence in quoted string".to_string(),
                Some(span),
            );
        }
        self.push(TokenKind::QuotedLit, text, String::new(), span);

        if self.is_at_end() {
            self.unterminated_quote(span);
        }
    }

    /// A quoted string may not span lines; close it with a zero-width quote
    /// so the token structure stays balanced
    fn unterminated_quote(&mut self, span: Span) {
        self.frames.pop();
        self.diagnostics.add_error(
            DiagnosticKind::Lexical,
            "Unterminated template string".to_string(),
            Some(span),
        );
        self.push(TokenKind::CQuote, String::new(), String::new(), span);
    }

    fn scan_heredoc(&mut self) {
        let span = self.current_span();
        let Some(Frame::Heredoc {
            delimiter,
            line_start,
        }) = self.frames.last().cloned()
        else {
            return;
        };

        if line_start {
            if let Some(len) = self.closing_marker_len(&delimiter) {
                self.frames.pop();
                let text = self.take(len);
                self.push(TokenKind::CHeredoc, text, String::new(), span);
                return;
            }
        }

        if let Some((kind, text)) = self.read_template_open() {
            self.set_heredoc_line_start(false);
            self.push(kind, text, String::new(), span);
            return;
        }

        let mut text = String::new();
        let mut ended_line = false;
        while let Some(ch) = self.peek() {
            if self.starts_with("$${") || self.starts_with("%%{") {
                text.push_str(&self.take(3));
                continue;
            }
            if self.starts_with("${") || self.starts_with("%{") {
                break;
            }
            text.push(ch);
            self.advance();
            if ch == '\n' {
                ended_line = true;
                break;
            }
        }

        self.set_heredoc_line_start(ended_line);
        self.push(TokenKind::StringLit, text, String::new(), span);
    }

    /// Length of a closing heredoc marker line at the current position
    fn closing_marker_len(&self, delimiter: &str) -> Option<usize> {
        let mut len = 0;
        while matches!(self.peek_ahead(len), Some(' ') | Some('\t')) {
            len += 1;
        }
        for c in delimiter.chars() {
            if self.peek_ahead(len) != Some(c) {
                return None;
            }
            len += 1;
        }
        match (self.peek_ahead(len), self.peek_ahead(len + 1)) {
            (None, _) | (Some('\n'), _) | (Some('\r'), Some('\n')) => Some(len),
            _ => None,
        }
    }

    fn set_heredoc_line_start(&mut self, value: bool) {
        if let Some(Frame::Heredoc { line_start, .. }) = self.frames.last_mut() {
            *line_start = value;
        }
    }

    /// At end of input, close every open template construct with zero-width
    /// tokens. Unclosed braces are left for the tree builder to report.
    fn close_open_templates(&mut self) {
        let span = self.current_span();
        while let Some(frame) = self.frames.pop() {
            let (kind, what) = match frame {
                Frame::Brace => continue,
                Frame::Interp => (TokenKind::TemplateSeqEnd, "template sequence"),
                Frame::Quote => (TokenKind::CQuote, "template string"),
                Frame::Heredoc { .. } => (TokenKind::CHeredoc, "heredoc"),
            };
            self.diagnostics.add_error(
                DiagnosticKind::Lexical,
                format!("Unterminated {}", what),
                Some(span),
            );
            self.push(kind, String::new(), String::new(), span);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Tokenizer::new(input)
            .tokenize()
            .0
            .into_iter()
            .map(|st| st.token.kind)
            .collect()
    }

    fn texts(input: &str) -> Vec<String> {
        Tokenizer::new(input)
            .tokenize()
            .0
            .into_iter()
            .map(|st| st.token.text)
            .collect()
    }

    fn reassemble(input: &str) -> String {
        let mut out = String::new();
        for st in Tokenizer::new(input).tokenize().0 {
            st.token.render_into(&mut out);
        }
        out
    }

    fn diagnostics(input: &str) -> Diagnostics {
        Tokenizer::new(input).tokenize().1
    }

    use TokenKind::*;

    // ── Atoms ──────────────────────────────────────────

    #[test]
    fn test_tokenize_attribute() {
        assert_eq!(kinds("count = 3\n"), vec![Ident, Equal, NumberLit, Newline, Eof]);
    }

    #[test]
    fn test_tokenize_identifier_with_hyphens() {
        assert_eq!(texts("aws-region_1"), vec!["aws-region_1", ""]);
    }

    #[test]
    fn test_tokenize_numbers() {
        assert_eq!(texts("42 3.14 1e10 2E-3"), vec!["42", "3.14", "1e10", "2E-3", ""]);
    }

    #[test]
    fn test_tokenize_traversal_index_keeps_dots() {
        assert_eq!(
            kinds("a.0.b"),
            vec![Ident, Dot, NumberLit, Dot, Ident, Eof]
        );
    }

    #[test]
    fn test_tokenize_operators() {
        assert_eq!(
            kinds("a == b != c <= d >= e && f || !g ? h : i => j ..."),
            vec![
                Ident, EqualOp, Ident, NotEqual, Ident, LessThanEq, Ident, GreaterThanEq, Ident,
                And, Ident, Or, Bang, Ident, Question, Ident, Colon, Ident, FatArrow, Ident,
                Ellipsis, Eof,
            ]
        );
    }

    // ── Whitespace ─────────────────────────────────────

    #[test]
    fn test_spaces_attach_to_next_token() {
        let (tokens, _) = Tokenizer::new("a  =\t1").tokenize();
        assert_eq!(tokens[1].token.spaces_before, "  ");
        assert_eq!(tokens[2].token.spaces_before, "\t");
    }

    #[test]
    fn test_trailing_spaces_ride_on_eof() {
        let (tokens, _) = Tokenizer::new("a = 1   ").tokenize();
        let eof = tokens.last().unwrap();
        assert_eq!(eof.token.kind, Eof);
        assert_eq!(eof.token.spaces_before, "   ");
    }

    #[test]
    fn test_crlf_newline() {
        assert_eq!(texts("a\r\nb"), vec!["a", "\r\n", "b", ""]);
    }

    // ── Comments ───────────────────────────────────────

    #[test]
    fn test_comments() {
        assert_eq!(
            kinds("# hash\n// slash\n/* block\n comment */ a"),
            vec![Comment, Newline, Comment, Newline, Comment, Ident, Eof]
        );
    }

    #[test]
    fn test_unterminated_block_comment() {
        let diags = diagnostics("/* open");
        assert!(diags.has_errors());
        assert!(diags.to_string().contains("Unterminated block comment"));
    }

    // ── Quoted templates ───────────────────────────────

    #[test]
    fn test_quoted_literal() {
        assert_eq!(kinds(r#""hello""#), vec![OQuote, QuotedLit, CQuote, Eof]);
    }

    #[test]
    fn test_empty_quoted_string() {
        assert_eq!(kinds(r#""""#), vec![OQuote, CQuote, Eof]);
    }

    #[test]
    fn test_single_interpolation() {
        assert_eq!(
            kinds(r#""${foo}""#),
            vec![OQuote, TemplateInterp, Ident, TemplateSeqEnd, CQuote, Eof]
        );
    }

    #[test]
    fn test_interpolation_with_literals() {
        assert_eq!(
            kinds(r#""prefix${foo}suffix""#),
            vec![OQuote, QuotedLit, TemplateInterp, Ident, TemplateSeqEnd, QuotedLit, CQuote, Eof]
        );
    }

    #[test]
    fn test_nested_quotes_in_interpolation() {
        assert_eq!(
            kinds(r#""${foo("${bar}")}""#),
            vec![
                OQuote, TemplateInterp, Ident, OParen, OQuote, TemplateInterp, Ident,
                TemplateSeqEnd, CQuote, CParen, TemplateSeqEnd, CQuote, Eof,
            ]
        );
    }

    #[test]
    fn test_object_braces_inside_interpolation() {
        assert_eq!(
            kinds(r#""${ {a = 1} }""#),
            vec![
                OQuote, TemplateInterp, OBrace, Ident, Equal, NumberLit, CBrace,
                TemplateSeqEnd, CQuote, Eof,
            ]
        );
    }

    #[test]
    fn test_strip_markers() {
        assert_eq!(texts(r#""${~ x ~}""#), vec!["\"", "${~", "x", "~}", "\"", ""]);
    }

    #[test]
    fn test_template_control() {
        assert_eq!(
            kinds(r#""%{if x}y%{endif}""#),
            vec![
                OQuote, TemplateControl, Ident, Ident, TemplateSeqEnd, QuotedLit,
                TemplateControl, Ident, TemplateSeqEnd, CQuote, Eof,
            ]
        );
    }

    #[test]
    fn test_escaped_template_sequences_stay_literal() {
        assert_eq!(kinds(r#""$${x} %%{y}""#), vec![OQuote, QuotedLit, CQuote, Eof]);
    }

    #[test]
    fn test_escaped_quote_stays_literal() {
        assert_eq!(texts(r#""a\"b""#), vec!["\"", "a\\\"b", "\"", ""]);
    }

    #[test]
    fn test_invalid_escape_warns() {
        let diags = diagnostics(r#""bad\q""#);
        assert!(!diags.has_errors());
        assert_eq!(diags.warnings().len(), 1);
    }

    #[test]
    fn test_unterminated_string_at_newline() {
        let (tokens, diags) = Tokenizer::new("a = \"open\nb = 1\n").tokenize();
        assert!(diags.has_errors());
        let kinds: Vec<_> = tokens.iter().map(|st| st.token.kind).collect();
        assert_eq!(
            kinds,
            vec![Ident, Equal, OQuote, QuotedLit, CQuote, Newline, Ident, Equal, NumberLit, Newline, Eof]
        );
        // The synthesized quote is zero-width
        assert_eq!(tokens[4].token.text, "");
    }

    #[test]
    fn test_unterminated_interpolation_at_eof() {
        let (tokens, diags) = Tokenizer::new("\"${foo").tokenize();
        assert!(diags.has_errors());
        let kinds: Vec<_> = tokens.iter().map(|st| st.token.kind).collect();
        assert_eq!(kinds, vec![OQuote, TemplateInterp, Ident, TemplateSeqEnd, CQuote, Eof]);
    }

    // ── Heredocs ───────────────────────────────────────

    #[test]
    fn test_heredoc() {
        let input = "x = <<EOT\nhello\n${name}\nEOT\n";
        assert_eq!(
            kinds(input),
            vec![
                Ident, Equal, OHeredoc, StringLit, TemplateInterp, Ident, TemplateSeqEnd,
                StringLit, CHeredoc, Newline, Eof,
            ]
        );
        assert_eq!(reassemble(input), input);
    }

    #[test]
    fn test_indented_heredoc() {
        let input = "x = <<-EOT\n    indented\n    EOT\n";
        assert_eq!(
            kinds(input),
            vec![Ident, Equal, OHeredoc, StringLit, CHeredoc, Newline, Eof]
        );
        assert_eq!(reassemble(input), input);
    }

    #[test]
    fn test_heredoc_delimiter_must_be_whole_line() {
        let input = "x = <<EOT\nEOTX\nEOT\n";
        assert_eq!(
            kinds(input),
            vec![Ident, Equal, OHeredoc, StringLit, CHeredoc, Newline, Eof]
        );
    }

    #[test]
    fn test_unterminated_heredoc() {
        let (tokens, diags) = Tokenizer::new("x = <<EOT\nnever closed\n").tokenize();
        assert!(diags.has_errors());
        let last_two: Vec<_> = tokens.iter().rev().take(2).map(|st| st.token.kind).collect();
        assert_eq!(last_two, vec![Eof, CHeredoc]);
    }

    // ── Errors ─────────────────────────────────────────

    #[test]
    fn test_unexpected_character() {
        let (tokens, diags) = Tokenizer::new("a = @").tokenize();
        assert!(diags.to_string().contains("Unexpected character '@'"));
        assert_eq!(tokens[2].token.kind, Invalid);
    }

    // ── Span tracking ──────────────────────────────────

    #[test]
    fn test_span_tracking() {
        let (tokens, _) = Tokenizer::new("a {\n  b = 1\n}").tokenize();
        assert_eq!(tokens[0].span, Span { line: 1, column: 1, offset: 0 });
        assert_eq!(tokens[1].span, Span { line: 1, column: 3, offset: 2 });
        assert_eq!(tokens[3].span, Span { line: 2, column: 3, offset: 6 });
        assert_eq!(tokens[7].span, Span { line: 3, column: 1, offset: 12 });
        assert_eq!(tokens[7].token.kind, CBrace);
    }

    // ── Lossless round trip ────────────────────────────

    #[test]
    fn test_reassemble_is_lossless() {
        let input = "resource \"aws_instance\" \"web\" {\r\n  ami   = \"${var.ami}\" # pinned\n  tags = {\n    Name = \"web-${count.index}\"\n  }\n}\n  ";
        assert_eq!(reassemble(input), input);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(kinds(""), vec![Eof]);
    }

    // ── Determinism proof ──────────────────────────────

    #[test]
    fn test_tokenize_determinism_100_iterations() {
        let input = "variable \"x\" {\n  type = list\n  default = [\"${a}\", <<EOT\nb\nEOT\n  ]\n}\n";
        let first = Tokenizer::new(input).tokenize();

        for i in 0..100 {
            let result = Tokenizer::new(input).tokenize();
            assert_eq!(first, result, "Determinism failure at iteration {}", i);
        }
    }
}
