//! Node origins: where a tree came from.

use scala_dialect::Dialect;
use scala_span::{ByteSpan, Input, Span};

/// Provenance attached to every AST node.
///
/// Records the input buffer the node was parsed from, the dialect in force,
/// the trimmed token-index span, and the corresponding byte range. Token
/// spans have trivia stripped from both ends; the byte range is derived from
/// the first and last covered tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct Origin {
    /// Shared handle over the parsed buffer
    pub input: Input,
    /// Dialect the node was parsed under
    pub dialect: Dialect,
    /// Trimmed `[start, end)` token-index span
    pub span: Span,
    /// Byte range covered by the trimmed token span
    pub bytes: ByteSpan,
}

impl Origin {
    /// Assemble an origin.
    pub fn new(input: Input, dialect: Dialect, span: Span, bytes: ByteSpan) -> Self {
        Origin { input, dialect, span, bytes }
    }

    /// The source text this node covers.
    pub fn text(&self) -> &str {
        self.bytes.slice(self.input.full_text())
    }
}
