//! hclfmt Core - canonical formatting for HCL configuration documents
//!
//! Rewrites legacy surface syntax into its modern equivalent while leaving
//! everything else (comments, layout, unrecognized expressions) byte-for-byte
//! as written. All bindings and the CLI call into this crate.
//!
//! # Architecture
//!
//! ```text
//! bytes → Tokenizer → Tree builder → ConfigFile → Normalizer → ConfigFile → bytes
//!              ↓            ↓
//!              └── Diagnostics (non-fatal)
//! ```
//!
//! # Guarantees
//!
//! - **Deterministic**: Same input always produces identical output
//! - **Idempotent**: Formatting formatted output changes nothing
//! - **Best-effort**: Syntax errors never stop formatting; whatever parsed is
//!   still normalized
//! - **Conservative**: Unrecognized expression shapes are left untouched

pub mod diagnostics;
pub mod error;
pub mod normalizer;
pub mod parser;
pub mod tokens;

use tracing::{debug, error, warn};

pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use error::{Error, Result};
pub use parser::ast::*;
pub use parser::{parse_config, parse_config_bytes};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Formatted document together with what the parser reported about it
#[derive(Debug, Clone, PartialEq)]
pub struct Formatted {
    pub output: Vec<u8>,
    pub diagnostics: Diagnostics,
}

/// Parse, normalize and serialize a document, returning the diagnostics.
///
/// A document that is not valid UTF-8 is returned unchanged; only its
/// diagnostics are reported.
pub fn format_source(src: &[u8]) -> Formatted {
    let (mut file, diagnostics) = parse_config_bytes(src);
    if std::str::from_utf8(src).is_err() {
        return Formatted {
            output: src.to_vec(),
            diagnostics,
        };
    }
    normalizer::format_file(&mut file);
    Formatted {
        output: file.to_bytes(),
        diagnostics,
    }
}

/// Format a document, reporting parse diagnostics through `tracing`.
///
/// Never fails: a document with syntax errors is formatted as far as it
/// could be parsed.
pub fn format_hcl(src: &[u8]) -> Vec<u8> {
    let formatted = format_source(src);

    for diagnostic in formatted.diagnostics.iter() {
        match diagnostic.severity {
            Severity::Error => error!("{}", diagnostic),
            Severity::Warning => warn!("{}", diagnostic),
        }
    }
    debug!(
        input_bytes = src.len(),
        output_bytes = formatted.output.len(),
        diagnostics = formatted.diagnostics.len(),
        "formatted document"
    );

    formatted.output
}

/// Format a document, refusing input with syntax errors
///
/// # Errors
/// Returns `ParseError` listing every error-level diagnostic.
pub fn format_strict(src: &[u8]) -> Result<Vec<u8>> {
    let formatted = format_source(src);
    if formatted.diagnostics.has_errors() {
        let messages: Vec<String> = formatted
            .diagnostics
            .errors()
            .iter()
            .map(|d| d.to_string())
            .collect();
        return Err(Error::ParseError(messages.join("\n")));
    }
    Ok(formatted.output)
}
