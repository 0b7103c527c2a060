//! Origin-annotated AST node families for parsed Scala syntax.
//!
//! The design follows a tagged-variant scheme: each syntactic family is a
//! struct pairing a kind enum with an [`Origin`] carrying the input buffer,
//! the dialect, and the trivia-trimmed span. Trees form no cycles; the only
//! back-reference is the origin's shared input handle.

mod ast;
mod origin;
mod sexp;

pub use ast::*;
pub use origin::Origin;
