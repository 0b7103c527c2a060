//! Source location primitives shared by the scanner, parser, and AST.
//!
//! Two span flavors coexist: [`ByteSpan`] addresses the character buffer and
//! is what diagnostics report, while [`Span`] addresses the materialized
//! token vector and is what AST origins carry (trivia trimming operates on
//! token indices, not bytes). [`LineStarts`] maps byte offsets to line and
//! column for error rendering and indentation measurement, and [`Input`]
//! is the shared handle over a character buffer, possibly a slice of a
//! larger one.

mod input;
mod line_starts;
mod span;

pub use input::Input;
pub use line_starts::LineStarts;
pub use span::{ByteSpan, Span};
