//! The recursive descent parser.
//!
//! One mutable [`Parser`] drives every production: the type, pattern,
//! expression, definition, and template parsers all share the token cursor
//! and the infix engine, and recurse freely into each other. Speculative
//! decisions fork the cursor and either commit (by not restoring) or rewind
//! completely; no diagnostics are emitted along abandoned paths.
//!
//! Entry points accept the leading `BOF`, run their production, require
//! `EOF`, and hand back an origin-annotated tree. The first grammar error
//! aborts the entry point; there is no local recovery.

use crate::cursor::TokenCursor;
use scala_ast::*;
use scala_dialect::Dialect;
use scala_error::{Diagnostic, DiagnosticSink, Diagnostics, ParseError, ParseResult, Severity};
use scala_span::{ByteSpan, Input, Span};
use scala_token::{soft, Token, TokenKind};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Where an expression occurs; disambiguates lambdas, repeated arguments,
/// and ascription scoping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// Inside parentheses or other non-statement positions
    NoStat,
    /// A statement in a block
    BlockStat,
    /// A statement in a template body
    TemplateStat,
    /// Right-hand side of a postfix/infix operator
    PostfixStat,
}

/// Which construct owns a template; controls the legal grammar variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateOwner {
    /// `class`
    Class,
    /// `case class`
    CaseClass,
    /// `trait`
    Trait,
    /// `enum`
    Enum,
    /// `object` / `case object`
    Object,
}

impl TemplateOwner {
    fn allows_secondary_ctors(self) -> bool {
        matches!(self, TemplateOwner::Class | TemplateOwner::CaseClass | TemplateOwner::Enum)
    }
}

// Recursion limit chosen well below stack exhaustion for the deepest
// production chain (roughly 30 frames between checks).
const MAX_RECURSION_DEPTH: usize = 256;

/// Recursive descent parser over a materialized token stream.
pub struct Parser {
    input: Input,
    dialect: Dialect,
    cursor: TokenCursor,
    diagnostics: Diagnostics,
    recursion_depth: usize,
    /// Nesting depth of `'{ ... }` / `'[ ... ]` quotation contexts.
    quoted_expr_depth: u32,
    /// Nesting depth of quoted pattern contexts.
    quoted_pat_depth: u32,
}

impl Parser {
    /// Tokenize `input` under `dialect` and build a parser over the result.
    pub fn new(input: impl Into<Input>, dialect: Dialect) -> ParseResult<Self> {
        let input = input.into();
        let tokens = scala_scanner::tokenize(&input, &dialect)?;
        Ok(Self::from_tokens(input, dialect, tokens))
    }

    /// Build a parser over pre-materialized tokens.
    ///
    /// The vector must begin with `BOF` and end with `EOF`. This is the
    /// hook for richer front ends that produce token families the bundled
    /// scanner does not (XML literals).
    pub fn from_tokens(input: Input, dialect: Dialect, tokens: Vec<Token>) -> Self {
        let cursor = TokenCursor::new(input.clone(), tokens);
        Parser {
            input,
            dialect,
            cursor,
            diagnostics: Diagnostics::new(),
            recursion_depth: 0,
            quoted_expr_depth: 0,
            quoted_pat_depth: 0,
        }
    }

    /// The dialect this parser runs under.
    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Diagnostics collected so far (errors mirror the returned `Err`s;
    /// warnings accumulate without aborting).
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Consume the parser, returning its diagnostics.
    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    /// The materialized token vector, for tooling and invariant checks.
    pub fn tokens(&self) -> &[Token] {
        self.cursor.tokens()
    }

    // ===== Entry points =====

    /// Parse a full compilation unit.
    pub fn parse_source(&mut self) -> ParseResult<Source> {
        self.entry(|p| p.source())
    }

    /// Parse a single statement.
    pub fn parse_stat(&mut self) -> ParseResult<Stat> {
        self.entry(|p| {
            let stat = p.statement()?;
            p.skip_stat_seps();
            Ok(stat)
        })
    }

    /// Parse a term.
    pub fn parse_term(&mut self) -> ParseResult<Term> {
        self.entry(|p| p.expr(Location::NoStat, false))
    }

    /// Parse a type.
    pub fn parse_type(&mut self) -> ParseResult<Type> {
        self.entry(|p| p.typ())
    }

    /// Parse a pattern.
    pub fn parse_pat(&mut self) -> ParseResult<Pat> {
        self.entry(|p| p.pattern(PatMode::SeqOk))
    }

    /// Parse a case clause.
    pub fn parse_case(&mut self) -> ParseResult<Case> {
        self.entry(|p| {
            p.accept(TokenKind::KwCase)?;
            p.case_clause_rest(p.cursor.index())
        })
    }

    /// Parse a constructor (primary shape).
    pub fn parse_ctor(&mut self) -> ParseResult<Ctor> {
        self.entry(|p| p.primary_ctor(TemplateOwner::Class))
    }

    /// Parse a constructor invocation.
    pub fn parse_init(&mut self) -> ParseResult<Init> {
        self.entry(|p| p.init())
    }

    /// Parse a self-type annotation (including the trailing `=>`).
    pub fn parse_self(&mut self) -> ParseResult<SelfType> {
        self.entry(|p| {
            let selfty = p
                .self_type_opt()?
                .ok_or_else(|| p.error_here("self type expected"))?;
            Ok(selfty)
        })
    }

    /// Parse a template (parents plus body).
    pub fn parse_template(&mut self) -> ParseResult<Template> {
        self.entry(|p| p.template_after_extends(TemplateOwner::Class))
    }

    /// Parse a single modifier.
    pub fn parse_mod(&mut self) -> ParseResult<Mod> {
        self.entry(|p| {
            let mods = p.modifiers(false)?;
            match mods.len() {
                1 => Ok(mods.into_iter().next().ok_or(ParseError::UnexpectedEof)?),
                0 => Err(p.error_here("modifier expected")),
                _ => Err(p.error_here("exactly one modifier expected")),
            }
        })
    }

    /// Parse a for-comprehension enumerator.
    pub fn parse_enumerator(&mut self) -> ParseResult<Enumerator> {
        self.entry(|p| p.enumerator(true))
    }

    /// Parse one import clause.
    pub fn parse_importer(&mut self) -> ParseResult<Importer> {
        self.entry(|p| p.importer())
    }

    /// Parse one importee.
    pub fn parse_importee(&mut self) -> ParseResult<Importee> {
        self.entry(|p| p.importee())
    }

    /// Parse a term parameter.
    pub fn parse_term_param(&mut self) -> ParseResult<TermParam> {
        self.entry(|p| p.term_param(true, false))
    }

    /// Parse a type parameter.
    pub fn parse_type_param(&mut self) -> ParseResult<TypeParam> {
        self.entry(|p| p.type_param(true))
    }

    /// Parse a quasiquote term fragment (unquote dialects).
    pub fn parse_unquote_term(&mut self) -> ParseResult<Term> {
        self.entry(|p| {
            let start = p.cursor.index();
            let mut stats = p.stat_seq_until(|k| k == TokenKind::EOF)?;
            match stats.len() {
                0 => {
                    let origin = p.origin_from(start);
                    Ok(Term::new(TermKind::Lit(Lit::Unit), origin))
                }
                1 => match stats.pop() {
                    Some(Stat::Term(t)) => Ok(t),
                    Some(other) => {
                        let origin = other.origin().clone();
                        Ok(Term::new(TermKind::Block(vec![other]), origin))
                    }
                    None => Err(ParseError::UnexpectedEof),
                },
                _ => {
                    let origin = p.origin_from(start);
                    Ok(Term::new(TermKind::Block(stats), origin))
                }
            }
        })
    }

    /// Parse a quasiquote pattern fragment (unquote dialects).
    pub fn parse_unquote_pat(&mut self) -> ParseResult<Pat> {
        self.entry(|p| p.pattern(PatMode::SeqOk))
    }

    /// Parse REPL input: multiple sources delimited by line-leading `@`.
    pub fn parse_ammonite(&mut self) -> ParseResult<MultiSource> {
        self.accept(TokenKind::BOF)?;
        let mut sources = Vec::new();
        loop {
            let start = self.cursor.index();
            let stats = self.stat_seq_until(|k| matches!(k, TokenKind::EOF | TokenKind::At))?;
            sources.push(Source { stats, origin: self.origin_from(start) });
            if self.at(TokenKind::At) {
                self.advance();
                self.skip_stat_seps();
            } else {
                break;
            }
        }
        self.accept(TokenKind::EOF)?;
        debug!(sources = sources.len(), "parsed ammonite input");
        Ok(MultiSource { sources })
    }

    fn entry<T>(&mut self, body: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        self.accept(TokenKind::BOF)?;
        self.skip_stat_seps();
        let result = body(self)?;
        self.skip_stat_seps();
        while self.at(TokenKind::Outdent) || self.cursor.observe_outdented() {
            self.advance();
            self.skip_stat_seps();
        }
        self.accept(TokenKind::EOF)?;
        Ok(result)
    }

    fn source(&mut self) -> ParseResult<Source> {
        let start = self.cursor.index();
        let stats = self.stat_seq_until(|k| k == TokenKind::EOF)?;
        Ok(Source { stats, origin: self.origin_from(start) })
    }
}

include!("helpers.rs");
include!("infix.rs");
include!("types.rs");
include!("patterns.rs");
include!("exprs.rs");
include!("defs.rs");
include!("templates.rs");

#[cfg(test)]
mod expr_tests;
#[cfg(test)]
mod pattern_tests;
#[cfg(test)]
mod defn_tests;
#[cfg(test)]
mod template_tests;
