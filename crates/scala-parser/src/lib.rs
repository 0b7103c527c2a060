//! Hand-written recursive descent parser for Scala syntax.
//!
//! The parser consumes the token stream produced by `scala-scanner` (or any
//! front end supplying the same token vocabulary) and emits the
//! origin-annotated trees of `scala-ast`. Grammar decisions are gated by a
//! `scala-dialect` flag set; the first error aborts the active entry point
//! and is mirrored to the diagnostic sink.
//!
//! # Usage
//!
//! ```rust,ignore
//! use scala_dialect::Dialect;
//! use scala_parser::Parser;
//!
//! let mut parser = Parser::new("val x = 1 :: Nil", Dialect::scala3())?;
//! let source = parser.parse_source()?;
//! println!("{}", source.to_sexp());
//! ```
//!
//! # Architecture
//!
//! - [`cursor::TokenCursor`] — mutable navigation over the materialized
//!   token vector with `fork`/`restore` snapshots and on-demand synthesis of
//!   virtual `Indent`/`Outdent` tokens under significant indentation.
//! - [`parser::Parser`] — the recursive descent engine: a shared
//!   precedence/associativity stack machine for term and pattern infix
//!   chains, the type/pattern/expression/definition/template productions,
//!   and one entry point per top-level tree family.

pub mod cursor;
pub mod parser;

pub use parser::{Location, Parser, TemplateOwner};
