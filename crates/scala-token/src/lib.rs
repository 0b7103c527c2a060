//! Scala token definitions.
//!
//! This crate provides the shared token vocabulary produced by the scanner
//! and consumed by the parser: the [`Token`] struct, the [`TokenKind`]
//! classification, decoded literal payloads, and the classifier predicates
//! the parser's grammar decisions are phrased in.

pub mod classifiers;

pub use classifiers::soft;

use scala_dialect::Dialect;
use scala_span::ByteSpan;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Token produced by the scanner and consumed by the parser.
///
/// Stores the token kind, original source text, byte span, and (for
/// literals) the decoded payload. The text is kept in an `Arc<str>` so
/// buffering and lookahead can clone tokens cheaply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Token classification for parser decision making
    pub kind: TokenKind,
    /// Original source text for precise reconstruction
    pub text: Arc<str>,
    /// Byte span in the source buffer
    pub span: ByteSpan,
    /// Decoded literal payload, `Payload::None` for non-literals
    pub payload: Payload,
}

impl Token {
    /// Create a new token without a literal payload.
    pub fn new(kind: TokenKind, text: impl Into<Arc<str>>, span: ByteSpan) -> Self {
        Token { kind, text: text.into(), span, payload: Payload::None }
    }

    /// Create a new token carrying a decoded literal payload.
    pub fn with_payload(
        kind: TokenKind,
        text: impl Into<Arc<str>>,
        span: ByteSpan,
        payload: Payload,
    ) -> Self {
        Token { kind, text: text.into(), span, payload }
    }

    /// A zero-width virtual token (Indent, Outdent, BOF, EOF) at `pos`.
    pub fn virtual_at(kind: TokenKind, pos: usize) -> Self {
        Token::new(kind, "", ByteSpan::empty(pos))
    }

    /// The literal source text of this token.
    pub fn syntax(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?})@{}", self.kind, &*self.text, self.span)
    }
}

/// Decoded literal payload attached to literal tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Payload {
    /// No payload (non-literal tokens)
    None,
    /// Decoded `Int` literal value
    Int(i32),
    /// Decoded `Long` literal value
    Long(i64),
    /// Decoded `Float` literal value
    Float(f32),
    /// Decoded `Double` literal value
    Double(f64),
    /// Decoded character literal
    Char(char),
    /// Decoded (unescaped) string content
    Str(Arc<str>),
}

/// Token classification for Scala parsing.
///
/// The set covers reserved words, reserved operators, delimiters, literal
/// kinds, the interpolation and XML part families, and trivia including the
/// virtual `Indent`/`Outdent` tokens synthesized under significant
/// indentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // ===== Reserved words =====
    /// `abstract`
    KwAbstract,
    /// `case`
    KwCase,
    /// `catch`
    KwCatch,
    /// `class`
    KwClass,
    /// `def`
    KwDef,
    /// `do`
    KwDo,
    /// `else`
    KwElse,
    /// `enum` (reserved only when the dialect has enums)
    KwEnum,
    /// `export` (reserved only when the dialect has export clauses)
    KwExport,
    /// `extends`
    KwExtends,
    /// `false`
    KwFalse,
    /// `final`
    KwFinal,
    /// `finally`
    KwFinally,
    /// `for`
    KwFor,
    /// `forSome` (scala2 existentials)
    KwForsome,
    /// `given` (reserved only when the dialect has given/using)
    KwGiven,
    /// `if`
    KwIf,
    /// `implicit`
    KwImplicit,
    /// `import`
    KwImport,
    /// `lazy`
    KwLazy,
    /// `macro`
    KwMacro,
    /// `match`
    KwMatch,
    /// `new`
    KwNew,
    /// `null`
    KwNull,
    /// `object`
    KwObject,
    /// `override`
    KwOverride,
    /// `package`
    KwPackage,
    /// `private`
    KwPrivate,
    /// `protected`
    KwProtected,
    /// `return`
    KwReturn,
    /// `sealed`
    KwSealed,
    /// `super`
    KwSuper,
    /// `then` (reserved only under quiet syntax)
    KwThen,
    /// `this`
    KwThis,
    /// `throw`
    KwThrow,
    /// `trait`
    KwTrait,
    /// `true`
    KwTrue,
    /// `try`
    KwTry,
    /// `type`
    KwType,
    /// `val`
    KwVal,
    /// `var`
    KwVar,
    /// `while`
    KwWhile,
    /// `with`
    KwWith,
    /// `yield`
    KwYield,

    // ===== Reserved operators =====
    /// `=`
    Eq,
    /// `=>` (also `⇒`)
    RightArrow,
    /// `<-` (also `←`)
    LeftArrow,
    /// `<:`
    Subtype,
    /// `>:`
    Supertype,
    /// `<%`
    ViewBound,
    /// `?=>` (context function arrow; dialect-gated in the scanner)
    CtxArrow,
    /// `=>>` (type lambda arrow; dialect-gated in the scanner)
    TypeLambdaArrow,
    /// `#`
    Hash,
    /// `@`
    At,
    /// `:`
    Colon,
    /// `_`
    Underscore,
    /// `'` immediately followed by `{` or `[` (macro quote)
    MacroQuote,
    /// `$` immediately followed by `{` (macro splice)
    MacroSplice,
    /// `$` unquote escape (quasiquote dialects only)
    Unquote,
    /// `..` / `...` quasiquote rank markers
    Ellipsis,

    // ===== Delimiters =====
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `.`
    Dot,

    // ===== Literals =====
    /// `Int` literal: `42`, `0xFF`
    IntLit,
    /// `Long` literal: `42L`
    LongLit,
    /// `Float` literal: `1.5f`
    FloatLit,
    /// `Double` literal: `1.5`, `1e3`
    DoubleLit,
    /// Character literal: `'a'`
    CharLit,
    /// String literal (single or triple quoted)
    StringLit,
    /// Symbol literal: `'name` (scala2)
    SymbolLit,

    // ===== Interpolation =====
    /// Interpolator identifier directly preceding a quote: `s`, `f`, `raw`, ...
    InterpolationId,
    /// Opening quote of an interpolated string
    InterpolationStart,
    /// Raw text between splices
    InterpolationPart,
    /// `$` or `${` beginning a splice
    InterpolationSpliceStart,
    /// Zero-width end of a splice
    InterpolationSpliceEnd,
    /// Closing quote of an interpolated string
    InterpolationEnd,

    // ===== XML =====
    /// Start of an XML literal
    XmlStart,
    /// Raw XML text between splices
    XmlPart,
    /// `{` beginning an XML splice
    XmlSpliceStart,
    /// `}` ending an XML splice
    XmlSpliceEnd,
    /// End of an XML literal
    XmlEnd,

    // ===== Identifiers =====
    /// Alphanumeric, operator, or backquoted identifier
    Ident,

    // ===== Trivia =====
    /// Spaces and tabs
    Whitespace,
    /// A single line break
    LF,
    /// A blank-line break (two or more consecutive line breaks)
    LFLF,
    /// `// ...` comment
    LineComment,
    /// `/* ... */` comment (nesting)
    BlockComment,
    /// Virtual indentation-open token
    Indent,
    /// Virtual indentation-close token
    Outdent,
    /// Beginning of file marker
    BOF,
    /// End of file marker
    EOF,
}

impl TokenKind {
    /// Trivia tokens do not contribute to AST shape but affect span trimming.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace
                | TokenKind::LF
                | TokenKind::LFLF
                | TokenKind::LineComment
                | TokenKind::BlockComment
                | TokenKind::Indent
                | TokenKind::Outdent
                | TokenKind::BOF
                | TokenKind::EOF
        )
    }

    /// Line breaks (real or blank-line) but not other trivia.
    pub fn is_line_end(self) -> bool {
        matches!(self, TokenKind::LF | TokenKind::LFLF)
    }

    /// Whitespace or comments; excludes line ends and virtual tokens.
    pub fn is_horizontal_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::LineComment | TokenKind::BlockComment
        )
    }

    /// Statement separators: `;`, line ends, and virtual outdents.
    pub fn is_stat_sep(self) -> bool {
        matches!(
            self,
            TokenKind::Semicolon | TokenKind::LF | TokenKind::LFLF | TokenKind::Outdent
        )
    }

    /// Literal token kinds.
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::IntLit
                | TokenKind::LongLit
                | TokenKind::FloatLit
                | TokenKind::DoubleLit
                | TokenKind::CharLit
                | TokenKind::StringLit
                | TokenKind::SymbolLit
                | TokenKind::KwTrue
                | TokenKind::KwFalse
                | TokenKind::KwNull
        )
    }

    /// Local modifiers legal on block-level definitions.
    pub fn is_local_modifier(self) -> bool {
        matches!(
            self,
            TokenKind::KwAbstract
                | TokenKind::KwFinal
                | TokenKind::KwSealed
                | TokenKind::KwImplicit
                | TokenKind::KwLazy
        )
    }

    /// A human-oriented name for "expected X but found Y" messages.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Ident => "identifier",
            TokenKind::IntLit => "integer literal",
            TokenKind::LongLit => "long literal",
            TokenKind::FloatLit => "float literal",
            TokenKind::DoubleLit => "double literal",
            TokenKind::CharLit => "character literal",
            TokenKind::StringLit => "string literal",
            TokenKind::SymbolLit => "symbol literal",
            TokenKind::LeftParen => "`(`",
            TokenKind::RightParen => "`)`",
            TokenKind::LeftBracket => "`[`",
            TokenKind::RightBracket => "`]`",
            TokenKind::LeftBrace => "`{`",
            TokenKind::RightBrace => "`}`",
            TokenKind::Comma => "`,`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Dot => "`.`",
            TokenKind::Colon => "`:`",
            TokenKind::Eq => "`=`",
            TokenKind::RightArrow => "`=>`",
            TokenKind::LeftArrow => "`<-`",
            TokenKind::Subtype => "`<:`",
            TokenKind::Supertype => "`>:`",
            TokenKind::ViewBound => "`<%`",
            TokenKind::CtxArrow => "`?=>`",
            TokenKind::TypeLambdaArrow => "`=>>`",
            TokenKind::Hash => "`#`",
            TokenKind::At => "`@`",
            TokenKind::Underscore => "`_`",
            TokenKind::EOF => "end of file",
            TokenKind::BOF => "beginning of file",
            TokenKind::LF | TokenKind::LFLF => "line end",
            TokenKind::Indent => "indent",
            TokenKind::Outdent => "outdent",
            TokenKind::KwAbstract => "`abstract`",
            TokenKind::KwCase => "`case`",
            TokenKind::KwCatch => "`catch`",
            TokenKind::KwClass => "`class`",
            TokenKind::KwDef => "`def`",
            TokenKind::KwDo => "`do`",
            TokenKind::KwElse => "`else`",
            TokenKind::KwEnum => "`enum`",
            TokenKind::KwExport => "`export`",
            TokenKind::KwExtends => "`extends`",
            TokenKind::KwFalse => "`false`",
            TokenKind::KwFinal => "`final`",
            TokenKind::KwFinally => "`finally`",
            TokenKind::KwFor => "`for`",
            TokenKind::KwForsome => "`forSome`",
            TokenKind::KwGiven => "`given`",
            TokenKind::KwIf => "`if`",
            TokenKind::KwImplicit => "`implicit`",
            TokenKind::KwImport => "`import`",
            TokenKind::KwLazy => "`lazy`",
            TokenKind::KwMacro => "`macro`",
            TokenKind::KwMatch => "`match`",
            TokenKind::KwNew => "`new`",
            TokenKind::KwNull => "`null`",
            TokenKind::KwObject => "`object`",
            TokenKind::KwOverride => "`override`",
            TokenKind::KwPackage => "`package`",
            TokenKind::KwPrivate => "`private`",
            TokenKind::KwProtected => "`protected`",
            TokenKind::KwReturn => "`return`",
            TokenKind::KwSealed => "`sealed`",
            TokenKind::KwSuper => "`super`",
            TokenKind::KwThen => "`then`",
            TokenKind::KwThis => "`this`",
            TokenKind::KwThrow => "`throw`",
            TokenKind::KwTrait => "`trait`",
            TokenKind::KwTrue => "`true`",
            TokenKind::KwTry => "`try`",
            TokenKind::KwType => "`type`",
            TokenKind::KwVal => "`val`",
            TokenKind::KwVar => "`var`",
            TokenKind::KwWhile => "`while`",
            TokenKind::KwWith => "`with`",
            TokenKind::KwYield => "`yield`",
            TokenKind::MacroQuote => "macro quote",
            TokenKind::MacroSplice => "macro splice",
            TokenKind::Unquote => "unquote",
            TokenKind::Ellipsis => "ellipsis",
            TokenKind::InterpolationId => "interpolator",
            TokenKind::InterpolationStart => "interpolation start",
            TokenKind::InterpolationPart => "interpolation part",
            TokenKind::InterpolationSpliceStart => "interpolation splice",
            TokenKind::InterpolationSpliceEnd => "interpolation splice end",
            TokenKind::InterpolationEnd => "interpolation end",
            TokenKind::XmlStart => "XML literal",
            TokenKind::XmlPart => "XML part",
            TokenKind::XmlSpliceStart => "XML splice",
            TokenKind::XmlSpliceEnd => "XML splice end",
            TokenKind::XmlEnd => "XML end",
            TokenKind::Whitespace => "whitespace",
            TokenKind::LineComment | TokenKind::BlockComment => "comment",
        }
    }
}

impl Token {
    /// True if this token may begin an expression.
    pub fn is_expr_intro(&self, dialect: &Dialect) -> bool {
        match self.kind {
            TokenKind::Ident
            | TokenKind::KwThis
            | TokenKind::KwSuper
            | TokenKind::KwNew
            | TokenKind::KwIf
            | TokenKind::KwWhile
            | TokenKind::KwFor
            | TokenKind::KwTry
            | TokenKind::KwThrow
            | TokenKind::KwReturn
            | TokenKind::KwDo
            | TokenKind::KwImplicit
            | TokenKind::Underscore
            | TokenKind::LeftParen
            | TokenKind::LeftBrace
            | TokenKind::InterpolationId
            | TokenKind::InterpolationStart => true,
            k if k.is_literal() => true,
            TokenKind::XmlStart => dialect.allow_xml_literals,
            TokenKind::MacroQuote | TokenKind::MacroSplice => dialect.allow_quotes_and_splices,
            TokenKind::Unquote | TokenKind::Ellipsis => dialect.allow_unquotes,
            TokenKind::Indent => dialect.allow_significant_indentation,
            _ => false,
        }
    }

    /// True if this token may begin a definition or declaration.
    pub fn is_defn_intro(&self, dialect: &Dialect) -> bool {
        match self.kind {
            TokenKind::KwVal
            | TokenKind::KwVar
            | TokenKind::KwDef
            | TokenKind::KwType
            | TokenKind::KwClass
            | TokenKind::KwTrait
            | TokenKind::KwObject
            | TokenKind::KwCase
            | TokenKind::At => true,
            TokenKind::KwEnum => dialect.allow_enums,
            TokenKind::KwGiven => dialect.allow_given_using,
            k if k.is_modifier_kind() => true,
            TokenKind::Ident => {
                (dialect.allow_extension_methods && &*self.text == soft::EXTENSION)
                    || (dialect.allow_inline_mods && &*self.text == soft::INLINE)
                    || (dialect.allow_open_class && &*self.text == soft::OPEN)
                    || (dialect.allow_opaque_types && &*self.text == soft::OPAQUE)
                    || (dialect.allow_infix_mods && &*self.text == soft::INFIX)
                    || (dialect.allow_inline_mods && &*self.text == soft::TRANSPARENT)
            }
            _ => false,
        }
    }

    /// True if this token can start a template definition (class-likes).
    pub fn is_template_intro(&self, dialect: &Dialect) -> bool {
        match self.kind {
            TokenKind::KwClass | TokenKind::KwTrait | TokenKind::KwObject | TokenKind::KwCase => {
                true
            }
            TokenKind::KwEnum => dialect.allow_enums,
            _ => false,
        }
    }

    /// True for an identifier whose text is the given soft keyword.
    pub fn is_soft_kw(&self, word: &str) -> bool {
        self.kind == TokenKind::Ident && &*self.text == word
    }

    /// True if this is an identifier made of operator characters.
    pub fn is_operator_ident(&self) -> bool {
        self.kind == TokenKind::Ident && classifiers::is_operator_text(&self.text)
    }

    /// True if this token could continue the previous line as a leading
    /// infix operator (glossary: leading-infix operator).
    pub fn is_leading_infix_candidate(&self, dialect: &Dialect) -> bool {
        dialect.allow_infix_operator_after_nl && self.is_operator_ident()
    }

    /// True if this token closes a region: `)`, `]`, `}`, outdent, EOF.
    pub fn is_closing(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::RightParen
                | TokenKind::RightBracket
                | TokenKind::RightBrace
                | TokenKind::Outdent
                | TokenKind::EOF
        )
    }
}

impl TokenKind {
    /// Modifier keywords (`implicit`, `final`, `sealed`, ...).
    pub fn is_modifier_kind(self) -> bool {
        matches!(
            self,
            TokenKind::KwAbstract
                | TokenKind::KwFinal
                | TokenKind::KwSealed
                | TokenKind::KwImplicit
                | TokenKind::KwLazy
                | TokenKind::KwOverride
                | TokenKind::KwPrivate
                | TokenKind::KwProtected
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scala_span::ByteSpan;

    fn tok(kind: TokenKind, text: &str) -> Token {
        Token::new(kind, text, ByteSpan::new(0, text.len()))
    }

    #[test]
    fn trivia_classification() {
        assert!(TokenKind::Whitespace.is_trivia());
        assert!(TokenKind::LFLF.is_trivia());
        assert!(TokenKind::Indent.is_trivia());
        assert!(!TokenKind::Ident.is_trivia());
        assert!(TokenKind::LF.is_stat_sep());
        assert!(TokenKind::Semicolon.is_stat_sep());
    }

    #[test]
    fn expr_intro_respects_dialect() {
        let d2 = Dialect::scala213();
        let d3 = Dialect::scala3();
        let quote = tok(TokenKind::MacroQuote, "'");
        assert!(!quote.is_expr_intro(&d2));
        assert!(quote.is_expr_intro(&d3));
        assert!(tok(TokenKind::IntLit, "1").is_expr_intro(&d2));
    }

    #[test]
    fn soft_keywords_are_plain_idents() {
        let t = tok(TokenKind::Ident, "using");
        assert!(t.is_soft_kw(soft::USING));
        assert!(!t.is_soft_kw(soft::GIVEN_ALIAS_AS));
    }

    #[test]
    fn operator_ident_shape() {
        assert!(tok(TokenKind::Ident, "+").is_operator_ident());
        assert!(tok(TokenKind::Ident, "::").is_operator_ident());
        assert!(!tok(TokenKind::Ident, "map_+").is_operator_ident());
        assert!(!tok(TokenKind::Ident, "map").is_operator_ident());
        assert!(!tok(TokenKind::Ident, "`+`").is_operator_ident());
    }
}
