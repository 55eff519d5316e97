//! Token tree types — tokens and the body/block/attribute structure built over them
//!
//! Every node owns the exact tokens it was parsed from, including comments and
//! whitespace, so rendering an untouched tree reproduces the source
//! byte-for-byte. The normalizer only ever swaps out whole token runs
//! (an attribute's expression, a block's labels).

use crate::tokens::{escape_quoted, unescape_quoted};

// ── Tokens ─────────────────────────────────────────────────

/// Token kinds produced by the tokenizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum TokenKind {
    // Template delimiters
    OQuote,          // "
    CQuote,          // "
    QuotedLit,       // literal text inside "..."
    TemplateInterp,  // ${  ${~
    TemplateControl, // %{  %{~
    TemplateSeqEnd,  // }  ~}  closing a template sequence
    OHeredoc,        // <<EOT
    CHeredoc,        // EOT
    StringLit,       // literal text inside a heredoc

    // Atoms
    Ident,
    NumberLit,

    // Brackets
    OParen,
    CParen,
    OBrace,
    CBrace,
    OBrack,
    CBrack,

    // Punctuation
    Equal,
    Comma,
    Dot,
    Colon,
    Question,
    FatArrow,
    Ellipsis,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    And,
    Or,
    EqualOp,
    NotEqual,
    LessThan,
    LessThanEq,
    GreaterThan,
    GreaterThanEq,

    // Trivia
    Newline,
    Comment,

    // Other
    Invalid,
    Eof,
}

impl TokenKind {
    /// Opens a nesting level; a newline inside it does not end an expression
    pub fn opens_group(self) -> bool {
        matches!(
            self,
            TokenKind::OParen
                | TokenKind::OBrace
                | TokenKind::OBrack
                | TokenKind::OQuote
                | TokenKind::OHeredoc
                | TokenKind::TemplateInterp
                | TokenKind::TemplateControl
        )
    }

    /// Closes a nesting level opened by [`TokenKind::opens_group`]
    pub fn closes_group(self) -> bool {
        matches!(
            self,
            TokenKind::CParen
                | TokenKind::CBrace
                | TokenKind::CBrack
                | TokenKind::CQuote
                | TokenKind::CHeredoc
                | TokenKind::TemplateSeqEnd
        )
    }
}

/// A single token: its kind, its exact source text, and the horizontal
/// whitespace that preceded it on its line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub spaces_before: String,
}

impl Token {
    /// Create a token with no leading whitespace
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Token {
            kind,
            text: text.into(),
            spaces_before: String::new(),
        }
    }

    pub fn with_spaces(mut self, spaces: impl Into<String>) -> Self {
        self.spaces_before = spaces.into();
        self
    }

    pub fn render_into(&self, out: &mut String) {
        out.push_str(&self.spaces_before);
        out.push_str(&self.text);
    }
}

/// Ordered run of tokens capturing the exact surface syntax of an expression
/// or label list
pub type Tokens = Vec<Token>;

/// Render a token run back to source text
pub fn render(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        token.render_into(&mut out);
    }
    out
}

// ── Tree ───────────────────────────────────────────────────

/// A parsed configuration document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub body: Body,
    /// End-of-input marker; carries trailing whitespace with no newline after it
    pub eof: Token,
}

impl ConfigFile {
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.body.render_into(&mut out);
        self.eof.render_into(&mut out);
        out
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.render().into_bytes()
    }
}

impl std::fmt::Display for ConfigFile {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

/// One item of a body, in source order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Structure {
    Attribute(Attribute),
    Block(Block),
    /// Comments, blank lines and anything the parser could not make sense of
    Unstructured(Tokens),
}

/// A container of attributes and nested blocks
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Body {
    pub(crate) items: Vec<Structure>,
}

impl Body {
    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.items.iter().filter_map(|item| match item {
            Structure::Attribute(attr) => Some(attr),
            _ => None,
        })
    }

    pub fn attributes_mut(&mut self) -> impl Iterator<Item = &mut Attribute> {
        self.items.iter_mut().filter_map(|item| match item {
            Structure::Attribute(attr) => Some(attr),
            _ => None,
        })
    }

    /// Look up an attribute by name
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes().find(|attr| attr.name() == name)
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.items.iter().filter_map(|item| match item {
            Structure::Block(block) => Some(block),
            _ => None,
        })
    }

    pub fn blocks_mut(&mut self) -> impl Iterator<Item = &mut Block> {
        self.items.iter_mut().filter_map(|item| match item {
            Structure::Block(block) => Some(block),
            _ => None,
        })
    }

    pub(crate) fn push_unstructured(&mut self, mut tokens: Tokens) {
        if let Some(Structure::Unstructured(last)) = self.items.last_mut() {
            last.append(&mut tokens);
        } else {
            self.items.push(Structure::Unstructured(tokens));
        }
    }

    pub fn render_into(&self, out: &mut String) {
        for item in &self.items {
            match item {
                Structure::Attribute(attr) => attr.render_into(out),
                Structure::Block(block) => block.render_into(out),
                Structure::Unstructured(tokens) => {
                    for token in tokens {
                        token.render_into(out);
                    }
                }
            }
        }
    }
}

/// `name = expression`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub(crate) name: Token,
    pub(crate) equals: Token,
    pub(crate) expr: Tokens,
    /// Trailing comments and the terminating newline, if any
    pub(crate) line_end: Tokens,
}

impl Attribute {
    pub fn name(&self) -> &str {
        &self.name.text
    }

    /// The expression's current surface syntax
    pub fn expr_tokens(&self) -> &[Token] {
        &self.expr
    }

    /// Replace the expression wholesale.
    ///
    /// The replacement inherits the leading whitespace of the expression it
    /// replaces, so `x = "${y}"` becomes `x = y` rather than `x =y`.
    pub fn set_expr_tokens(&mut self, mut tokens: Tokens) {
        if let (Some(old), Some(new)) = (self.expr.first(), tokens.first_mut()) {
            new.spaces_before = old.spaces_before.clone();
        }
        self.expr = tokens;
    }

    pub fn render_into(&self, out: &mut String) {
        self.name.render_into(out);
        self.equals.render_into(out);
        for token in self.expr.iter().chain(&self.line_end) {
            token.render_into(out);
        }
    }
}

/// `type "label" ... { body }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub(crate) type_name: Token,
    /// Everything between the type name and the opening brace
    pub(crate) labels: Tokens,
    pub(crate) open_brace: Token,
    pub(crate) body: Body,
    /// Closing brace, trailing comments and newline; empty for an unclosed block
    pub(crate) close: Tokens,
}

impl Block {
    pub fn block_type(&self) -> &str {
        &self.type_name.text
    }

    /// Decoded label values in order.
    ///
    /// Returns `None` when a quoted label holds an escape sequence that
    /// cannot be decoded.
    pub fn labels(&self) -> Option<Vec<String>> {
        let mut labels = Vec::new();
        let mut iter = self.labels.iter().filter(|t| t.kind != TokenKind::Comment);

        while let Some(token) = iter.next() {
            match token.kind {
                TokenKind::Ident => labels.push(token.text.clone()),
                TokenKind::OQuote => {
                    let mut value = String::new();
                    for inner in iter.by_ref() {
                        match inner.kind {
                            TokenKind::QuotedLit => value.push_str(&unescape_quoted(&inner.text)?),
                            TokenKind::CQuote => break,
                            _ => return None,
                        }
                    }
                    labels.push(value);
                }
                _ => return None,
            }
        }

        Some(labels)
    }

    /// Replace the label tokens with canonical quoted labels, one space before each
    pub fn set_labels(&mut self, labels: &[String]) {
        let mut tokens = Tokens::new();
        for label in labels {
            tokens.push(Token::new(TokenKind::OQuote, "\"").with_spaces(" "));
            let literal = escape_quoted(label);
            if !literal.is_empty() {
                tokens.push(Token::new(TokenKind::QuotedLit, literal));
            }
            tokens.push(Token::new(TokenKind::CQuote, "\""));
        }
        self.labels = tokens;
    }

    /// Raw label tokens, comments included
    pub fn label_tokens(&self) -> &[Token] {
        &self.labels
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    pub fn render_into(&self, out: &mut String) {
        self.type_name.render_into(out);
        for token in &self.labels {
            token.render_into(out);
        }
        self.open_brace.render_into(out);
        self.body.render_into(out);
        for token in &self.close {
            token.render_into(out);
        }
    }
}
