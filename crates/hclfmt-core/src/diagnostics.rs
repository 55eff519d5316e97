//! Parse diagnostics — accumulated, never fatal
//!
//! The tokenizer and tree builder record every problem they find and keep
//! going, so the normalizer can still run over whatever tree came out.
//! Callers decide what to do with the diagnostics: log them, print them,
//! or refuse to format (strict mode).

use crate::parser::tokenizer::Span;

/// Accumulated diagnostics for one document
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct Diagnostics {
    pub diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Returns true if any error-level diagnostic was recorded
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    /// Returns only error-level diagnostics
    pub fn errors(&self) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .collect()
    }

    /// Returns only warning-level diagnostics
    pub fn warnings(&self) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.diagnostics.extend(other.diagnostics);
    }

    pub(crate) fn add_error(&mut self, kind: DiagnosticKind, message: String, span: Option<Span>) {
        self.diagnostics.push(Diagnostic {
            severity: Severity::Error,
            kind,
            message,
            span,
        });
    }

    pub(crate) fn add_warning(&mut self, kind: DiagnosticKind, message: String, span: Option<Span>) {
        self.diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            kind,
            message,
            span,
        });
    }
}

impl std::fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (i, diagnostic) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", diagnostic)?;
        }
        Ok(())
    }
}

/// A single parse diagnostic
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
    pub span: Option<Span>,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        if let Some(ref span) = self.span {
            write!(f, "{} [{}] at {}: {}", prefix, self.kind, span, self.message)
        } else {
            write!(f, "{} [{}]: {}", prefix, self.kind, self.message)
        }
    }
}

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Category of parse issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticKind {
    /// Input bytes are not valid UTF-8
    Encoding,
    /// Unterminated string, heredoc or comment; unexpected character
    Lexical,
    /// Structure the tree builder could not recognize
    Syntax,
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            DiagnosticKind::Encoding => write!(f, "encoding"),
            DiagnosticKind::Lexical => write!(f, "lexical"),
            DiagnosticKind::Syntax => write!(f, "syntax"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_and_warnings_split() {
        let mut diagnostics = Diagnostics::new();
        assert!(diagnostics.is_empty());
        assert!(!diagnostics.has_errors());

        diagnostics.add_warning(DiagnosticKind::Syntax, "odd".into(), None);
        assert!(!diagnostics.has_errors());

        diagnostics.add_error(
            DiagnosticKind::Lexical,
            "Unterminated string".into(),
            Some(Span { line: 2, column: 5, offset: 12 }),
        );
        assert!(diagnostics.has_errors());
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics.errors().len(), 1);
        assert_eq!(diagnostics.warnings().len(), 1);
    }

    #[test]
    fn test_display_with_span() {
        let diagnostic = Diagnostic {
            severity: Severity::Error,
            kind: DiagnosticKind::Syntax,
            message: "Unclosed configuration block".into(),
            span: Some(Span { line: 3, column: 7, offset: 20 }),
        };
        assert_eq!(
            diagnostic.to_string(),
            "error [syntax] at 3:7: Unclosed configuration block"
        );
    }

    #[test]
    fn test_display_without_span() {
        let diagnostic = Diagnostic {
            severity: Severity::Warning,
            kind: DiagnosticKind::Encoding,
            message: "Invalid UTF-8".into(),
            span: None,
        };
        assert_eq!(diagnostic.to_string(), "warning [encoding]: Invalid UTF-8");
    }

    #[test]
    fn test_serialize_lowercase_tags() {
        let diagnostic = Diagnostic {
            severity: Severity::Error,
            kind: DiagnosticKind::Lexical,
            message: "x".into(),
            span: None,
        };
        let json = serde_json::to_value(&diagnostic).unwrap();
        assert_eq!(json["severity"], "error");
        assert_eq!(json["kind"], "lexical");
    }
}
