//! Error and diagnostic types for the Scala parser.
//!
//! Grammar failures abort the current entry point: every error variant
//! carries the byte offset of the offending token, bubbles out through
//! `ParseResult`, and is mirrored to the diagnostic sink before propagating.
//! Warnings (deprecations) go to the sink only and never abort.

use scala_span::ByteSpan;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for parser operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Errors produced while parsing.
///
/// The taxonomy follows the failure modes of the grammar: unexpected tokens,
/// dialect-gated constructs, illegal modifier combinations, unresolvable
/// ambiguities, out-of-range numeric literals, and the recursion safety
/// limit. Each variant records the byte offset where parsing stopped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// `accept` failed: the grammar required one token kind and found another.
    #[error("{expected} expected but {found} found at offset {offset}")]
    UnexpectedToken {
        /// Description of the expected token
        expected: String,
        /// Description of the token actually present
        found: String,
        /// Byte offset of the found token
        offset: usize,
    },

    /// Unexpected end of input.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// A grammar rule failed outside of simple token mismatch.
    #[error("{message} at offset {offset}")]
    Syntax {
        /// Descriptive message, phrased for the user
        message: String,
        /// Byte offset of the offending token
        offset: usize,
    },

    /// A construct was used that the active dialect does not enable.
    #[error("{dialect} does not support {construct} (offset {offset})")]
    DialectForbidden {
        /// Name of the active dialect
        dialect: String,
        /// The construct that was rejected
        construct: String,
        /// Byte offset of the construct
        offset: usize,
    },

    /// Repeated, conflicting, or misplaced modifiers.
    #[error("{message} at offset {offset}")]
    IllegalModifiers {
        /// Which combination or placement was rejected
        message: String,
        /// Byte offset of the second modifier
        offset: usize,
    },

    /// The parser could not resolve an ambiguous form either way.
    #[error("{message} at offset {offset}")]
    Ambiguity {
        /// Which ambiguity failed to resolve
        message: String,
        /// Byte offset of the ambiguous region
        offset: usize,
    },

    /// A numeric literal does not fit its bit width.
    #[error("{kind} number out of range for {target}: {literal}")]
    NumericOutOfRange {
        /// "integer" or "floating-point"
        kind: &'static str,
        /// The literal as written
        literal: String,
        /// Target type name (`Int`, `Long`, `Float`, `Double`)
        target: &'static str,
        /// Byte offset of the literal
        offset: usize,
    },

    /// Lexical error from the scanner.
    #[error("{message} at offset {offset}")]
    Lexical {
        /// What the scanner could not tokenize
        message: String,
        /// Byte offset of the failure
        offset: usize,
    },

    /// Recursion depth limit exceeded on pathological nesting.
    #[error("nesting too deep: depth {depth} exceeds limit {max_depth}")]
    NestingTooDeep {
        /// Depth reached
        depth: usize,
        /// Configured limit
        max_depth: usize,
    },
}

impl ParseError {
    /// Shorthand for [`ParseError::UnexpectedToken`].
    pub fn unexpected(
        expected: impl Into<String>,
        found: impl Into<String>,
        offset: usize,
    ) -> Self {
        ParseError::UnexpectedToken {
            expected: expected.into(),
            found: found.into(),
            offset,
        }
    }

    /// Shorthand for [`ParseError::Syntax`].
    pub fn syntax(message: impl Into<String>, offset: usize) -> Self {
        ParseError::Syntax { message: message.into(), offset }
    }

    /// Shorthand for [`ParseError::DialectForbidden`].
    pub fn forbidden(
        dialect: impl Into<String>,
        construct: impl Into<String>,
        offset: usize,
    ) -> Self {
        ParseError::DialectForbidden {
            dialect: dialect.into(),
            construct: construct.into(),
            offset,
        }
    }

    /// The byte offset this error points at, if it has one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            ParseError::UnexpectedToken { offset, .. }
            | ParseError::Syntax { offset, .. }
            | ParseError::DialectForbidden { offset, .. }
            | ParseError::IllegalModifiers { offset, .. }
            | ParseError::Ambiguity { offset, .. }
            | ParseError::NumericOutOfRange { offset, .. }
            | ParseError::Lexical { offset, .. } => Some(*offset),
            ParseError::UnexpectedEof | ParseError::NestingTooDeep { .. } => None,
        }
    }
}

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Aborts the parse
    Error,
    /// Reported, parse continues
    Warning,
    /// Informational
    Info,
    /// Editor hint
    Hint,
}

/// A `(severity, span, message)` triple emitted to the sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// How severe the finding is
    pub severity: Severity,
    /// Byte span of the offending region
    pub span: ByteSpan,
    /// Human-readable message
    pub message: String,
}

impl Diagnostic {
    /// Build an error diagnostic.
    pub fn error(span: ByteSpan, message: impl Into<String>) -> Self {
        Diagnostic { severity: Severity::Error, span, message: message.into() }
    }

    /// Build a warning diagnostic.
    pub fn warning(span: ByteSpan, message: impl Into<String>) -> Self {
        Diagnostic { severity: Severity::Warning, span, message: message.into() }
    }
}

/// Consumer of diagnostics; injected into the parser.
pub trait DiagnosticSink {
    /// Receive one diagnostic.
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Default sink: collects diagnostics in order of emission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    /// An empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// All collected diagnostics, in emission order.
    pub fn items(&self) -> &[Diagnostic] {
        &self.items
    }

    /// True if any collected diagnostic is an error.
    pub fn has_errors(&self) -> bool {
        self.items.iter().any(|d| d.severity == Severity::Error)
    }

    /// Number of collected diagnostics.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if nothing was collected.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl DiagnosticSink for Diagnostics {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_render() {
        let e = ParseError::unexpected("`)`", "`;`", 12);
        assert_eq!(e.to_string(), "`)` expected but `;` found at offset 12");
        assert_eq!(e.offset(), Some(12));

        let e = ParseError::forbidden("scala213", "quoted expressions", 3);
        assert_eq!(
            e.to_string(),
            "scala213 does not support quoted expressions (offset 3)"
        );
    }

    #[test]
    fn sink_collects_in_order() {
        let mut sink = Diagnostics::new();
        sink.report(Diagnostic::warning(ByteSpan::new(0, 1), "first"));
        sink.report(Diagnostic::error(ByteSpan::new(2, 3), "second"));
        assert_eq!(sink.len(), 2);
        assert!(sink.has_errors());
        assert_eq!(sink.items()[0].message, "first");
    }
}
