//! Error types for hclfmt
//!
//! Formatting itself never fails; these cover strict mode and the I/O done
//! by callers.

/// hclfmt error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Input had syntax errors and the caller asked for strict handling
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Reading or writing a document failed
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },
}

impl Error {
    pub fn io(path: impl Into<String>, err: &std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

/// Result type alias for hclfmt operations
pub type Result<T> = std::result::Result<T, Error>;
