//! Context-aware Scala tokenizer.
//!
//! Produces the full token sequence the parser consumes, trivia included:
//! `BOF`, whitespace, `LF`/`LFLF` line breaks, comments, identifiers,
//! reserved words and operators, decoded literals, the interpolation token
//! family, quote/splice markers, and `EOF`. Virtual `Indent`/`Outdent`
//! tokens are *not* produced here; the parser's cursor synthesizes them on
//! demand under significant indentation.
//!
//! # Architecture
//!
//! The scanner is mode-driven: a stack of [`ScanMode`] values tracks whether
//! we are in ordinary code or inside an interpolated string, and how many
//! braces a splice has opened. Entering `${` pushes a generic-code mode;
//! the matching `}` pops back into the string. This is what makes nested
//! interpolations (`s"a${s"b"}c"`) tokenize correctly without lookahead.
//!
//! Interpolation part payloads are the *raw* text: escape processing belongs
//! to the interpolator, not the tokenizer. Plain string and character
//! literals are decoded here, including numeric range checks.

mod keywords;

pub use keywords::keyword_kind;

use scala_dialect::Dialect;
use scala_error::{ParseError, ParseResult};
use scala_span::{ByteSpan, Input};
use scala_token::classifiers::{is_ident_part, is_ident_start, is_operator_char};
use scala_token::{Payload, Token, TokenKind};
use std::sync::Arc;
use tracing::debug;

/// Tokenize `input` under `dialect`.
///
/// On success the result starts with `BOF` and ends with `EOF`; every byte of
/// the input is covered by exactly one token. Lexical failures abort with the
/// first error.
pub fn tokenize(input: &Input, dialect: &Dialect) -> ParseResult<Vec<Token>> {
    Scanner::new(input.text(), dialect).scan()
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ScanMode {
    /// Ordinary code; counts braces opened inside a splice.
    Generic { brace_depth: usize },
    /// Inside an interpolated string body.
    Interp { triple: bool },
}

/// The tokenizer state machine.
pub struct Scanner<'a> {
    src: &'a str,
    dialect: &'a Dialect,
    pos: usize,
    modes: Vec<ScanMode>,
    tokens: Vec<Token>,
}

impl<'a> Scanner<'a> {
    /// Create a scanner over `src`.
    pub fn new(src: &'a str, dialect: &'a Dialect) -> Self {
        Scanner {
            src,
            dialect,
            pos: 0,
            modes: vec![ScanMode::Generic { brace_depth: 0 }],
            tokens: Vec::new(),
        }
    }

    /// Run the scanner to completion.
    pub fn scan(mut self) -> ParseResult<Vec<Token>> {
        self.tokens.push(Token::virtual_at(TokenKind::BOF, 0));
        while self.pos < self.src.len() {
            match self.current_mode() {
                ScanMode::Interp { triple } => self.scan_interp_part(triple)?,
                ScanMode::Generic { .. } => self.scan_generic()?,
            }
        }
        if self.modes.len() > 1 {
            return Err(ParseError::syntax("unclosed string interpolation", self.pos));
        }
        self.tokens.push(Token::virtual_at(TokenKind::EOF, self.src.len()));
        debug!(tokens = self.tokens.len(), "scan complete");
        Ok(self.tokens)
    }

    fn current_mode(&self) -> ScanMode {
        self.modes.last().cloned().unwrap_or(ScanMode::Generic { brace_depth: 0 })
    }

    fn peek_char(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn char_at(&self, pos: usize) -> Option<char> {
        if pos >= self.src.len() {
            None
        } else {
            self.src[pos..].chars().next()
        }
    }

    fn starts_with(&self, s: &str) -> bool {
        self.src[self.pos..].starts_with(s)
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        self.push_payload(kind, start, Payload::None);
    }

    fn push_payload(&mut self, kind: TokenKind, start: usize, payload: Payload) {
        let text = &self.src[start..self.pos];
        self.tokens.push(Token::with_payload(
            kind,
            text,
            ByteSpan::new(start, self.pos),
            payload,
        ));
    }

    // ===== Generic code =====

    fn scan_generic(&mut self) -> ParseResult<()> {
        let start = self.pos;
        let c = match self.peek_char() {
            Some(c) => c,
            None => return Ok(()),
        };
        match c {
            ' ' | '\t' => {
                while matches!(self.peek_char(), Some(' ') | Some('\t')) {
                    self.pos += 1;
                }
                self.push(TokenKind::Whitespace, start);
            }
            '\r' | '\n' => self.scan_newlines(start),
            '/' if self.starts_with("//") => {
                while let Some(c) = self.peek_char() {
                    if c == '\n' {
                        break;
                    }
                    self.pos += c.len_utf8();
                }
                self.push(TokenKind::LineComment, start);
            }
            '/' if self.starts_with("/*") => self.scan_block_comment(start)?,
            '"' => self.scan_string(start)?,
            '\'' => self.scan_quote(start)?,
            '`' => self.scan_backquoted(start)?,
            '0'..='9' => self.scan_number(start)?,
            '.' => self.scan_dots(start),
            '(' => {
                self.pos += 1;
                self.push(TokenKind::LeftParen, start);
            }
            ')' => {
                self.pos += 1;
                self.push(TokenKind::RightParen, start);
            }
            '[' => {
                self.pos += 1;
                self.push(TokenKind::LeftBracket, start);
            }
            ']' => {
                self.pos += 1;
                self.push(TokenKind::RightBracket, start);
            }
            ',' => {
                self.pos += 1;
                self.push(TokenKind::Comma, start);
            }
            ';' => {
                self.pos += 1;
                self.push(TokenKind::Semicolon, start);
            }
            '{' => {
                self.pos += 1;
                if let Some(ScanMode::Generic { brace_depth }) = self.modes.last_mut() {
                    *brace_depth += 1;
                }
                self.push(TokenKind::LeftBrace, start);
            }
            '}' => {
                self.pos += 1;
                let close_splice = match self.modes.last_mut() {
                    Some(ScanMode::Generic { brace_depth }) => {
                        if *brace_depth > 0 {
                            *brace_depth -= 1;
                        }
                        *brace_depth == 0 && self.modes.len() > 1
                    }
                    _ => false,
                };
                self.push(TokenKind::RightBrace, start);
                if close_splice {
                    self.modes.pop();
                    // Zero-width splice terminator; the string body resumes.
                    self.tokens
                        .push(Token::virtual_at(TokenKind::InterpolationSpliceEnd, self.pos));
                }
            }
            '$' => self.scan_dollar(start)?,
            c if is_ident_start(c) => self.scan_ident(start)?,
            c if is_operator_char(c) => self.scan_operator(start),
            other => {
                return Err(ParseError::Lexical {
                    message: format!("illegal character `{}`", other),
                    offset: start,
                });
            }
        }
        Ok(())
    }

    fn scan_newlines(&mut self, start: usize) {
        let mut newlines = 0;
        loop {
            match self.peek_char() {
                Some('\r') if self.char_at(self.pos + 1) == Some('\n') => {
                    self.pos += 2;
                    newlines += 1;
                }
                Some('\n') => {
                    self.pos += 1;
                    newlines += 1;
                }
                _ => break,
            }
            // A blank line may carry indentation; it still reads as LFLF.
            let mark = self.pos;
            while matches!(self.peek_char(), Some(' ') | Some('\t')) {
                self.pos += 1;
            }
            if !matches!(self.peek_char(), Some('\n'))
                && !(self.peek_char() == Some('\r') && self.char_at(self.pos + 1) == Some('\n'))
            {
                self.pos = mark;
                break;
            }
        }
        let kind = if newlines > 1 { TokenKind::LFLF } else { TokenKind::LF };
        self.push(kind, start);
    }

    fn scan_block_comment(&mut self, start: usize) -> ParseResult<()> {
        self.pos += 2;
        let mut depth = 1usize;
        while depth > 0 {
            if self.pos >= self.src.len() {
                return Err(ParseError::Lexical {
                    message: "unterminated block comment".to_string(),
                    offset: start,
                });
            }
            if self.starts_with("/*") {
                depth += 1;
                self.pos += 2;
            } else if self.starts_with("*/") {
                depth -= 1;
                self.pos += 2;
            } else if let Some(c) = self.peek_char() {
                self.pos += c.len_utf8();
            }
        }
        self.push(TokenKind::BlockComment, start);
        Ok(())
    }

    fn scan_dots(&mut self, start: usize) {
        if self.dialect.allow_unquotes {
            let rest = &self.src[self.pos..];
            let dots = rest.chars().take_while(|&c| c == '.').count();
            if (dots == 2 || dots == 3) && rest[dots..].starts_with('$') {
                self.pos += dots;
                self.push(TokenKind::Ellipsis, start);
                return;
            }
        }
        self.pos += 1;
        self.push(TokenKind::Dot, start);
    }

    fn scan_dollar(&mut self, start: usize) -> ParseResult<()> {
        let next = self.char_at(self.pos + 1);
        if self.dialect.allow_unquotes {
            if next == Some('{') || next.map(is_ident_start) == Some(true) {
                self.pos += 1;
                self.push(TokenKind::Unquote, start);
                return Ok(());
            }
        } else if next == Some('{') && self.dialect.allow_quotes_and_splices {
            self.pos += 1;
            self.push(TokenKind::MacroSplice, start);
            return Ok(());
        }
        self.scan_ident(start)
    }

    fn scan_ident(&mut self, start: usize) -> ParseResult<()> {
        while let Some(c) = self.peek_char() {
            if is_ident_part(c) {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        let mut text = &self.src[start..self.pos];
        if text == "_" {
            // `_` never merges with a following operator: `_*` is two tokens.
            self.push(TokenKind::Underscore, start);
            return Ok(());
        }
        // `foo_+`: an identifier ending in underscore absorbs an operator tail.
        if text.ends_with('_') {
            while let Some(c) = self.peek_char() {
                if is_operator_char(c) {
                    self.pos += c.len_utf8();
                } else {
                    break;
                }
            }
            text = &self.src[start..self.pos];
        }
        match keyword_kind(text, self.dialect) {
            Some(kind) => self.push(kind, start),
            None => {
                if self.peek_char() == Some('"') {
                    // Identifier directly against a quote: string interpolation.
                    self.push(TokenKind::InterpolationId, start);
                    self.begin_interpolation()?;
                } else {
                    self.push(TokenKind::Ident, start);
                }
            }
        }
        Ok(())
    }

    fn scan_backquoted(&mut self, start: usize) -> ParseResult<()> {
        self.pos += 1;
        while let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
            if c == '`' {
                self.push(TokenKind::Ident, start);
                return Ok(());
            }
            if c == '\n' {
                break;
            }
        }
        Err(ParseError::Lexical {
            message: "unterminated backquoted identifier".to_string(),
            offset: start,
        })
    }

    fn scan_operator(&mut self, start: usize) {
        while let Some(c) = self.peek_char() {
            // A comment opener terminates the operator: `+// tail` is `+`.
            if c == '/'
                && self.pos > start
                && matches!(self.char_at(self.pos + 1), Some('/') | Some('*'))
            {
                break;
            }
            if is_operator_char(c) {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        let text = &self.src[start..self.pos];
        let kind = match text {
            "=" => TokenKind::Eq,
            "=>" | "\u{21d2}" => TokenKind::RightArrow,
            "<-" | "\u{2190}" => TokenKind::LeftArrow,
            "<:" => TokenKind::Subtype,
            ">:" => TokenKind::Supertype,
            "<%" => TokenKind::ViewBound,
            "#" => TokenKind::Hash,
            "@" => TokenKind::At,
            ":" => TokenKind::Colon,
            "?=>" if self.dialect.allow_context_function_types => TokenKind::CtxArrow,
            "=>>" if self.dialect.allow_type_lambdas => TokenKind::TypeLambdaArrow,
            _ => TokenKind::Ident,
        };
        self.push(kind, start);
    }

    // ===== Literals =====

    fn scan_quote(&mut self, start: usize) -> ParseResult<()> {
        let next = self.char_at(self.pos + 1);
        let after = next.map(|c| self.pos + 1 + c.len_utf8());
        match next {
            Some('\\') => {
                self.pos += 1;
                let value = self.scan_escape(start)?;
                if self.peek_char() != Some('\'') {
                    return Err(ParseError::Lexical {
                        message: "unterminated character literal".to_string(),
                        offset: start,
                    });
                }
                self.pos += 1;
                self.push_payload(TokenKind::CharLit, start, Payload::Char(value));
                Ok(())
            }
            Some(c) if c != '\'' && after.and_then(|p| self.char_at(p)) == Some('\'') => {
                self.pos = after.unwrap_or(self.pos + 1) + 1;
                self.push_payload(TokenKind::CharLit, start, Payload::Char(c));
                Ok(())
            }
            Some('{') | Some('[') => {
                self.pos += 1;
                self.push(TokenKind::MacroQuote, start);
                Ok(())
            }
            Some(c) if is_ident_start(c) => {
                if !self.dialect.allow_symbol_literals {
                    return Err(ParseError::forbidden(
                        self.dialect.name,
                        "symbol literals",
                        start,
                    ));
                }
                self.pos += 1;
                let name_start = self.pos;
                while let Some(c) = self.peek_char() {
                    if is_ident_part(c) {
                        self.pos += c.len_utf8();
                    } else {
                        break;
                    }
                }
                let name: Arc<str> = Arc::from(&self.src[name_start..self.pos]);
                self.push_payload(TokenKind::SymbolLit, start, Payload::Str(name));
                Ok(())
            }
            _ => Err(ParseError::Lexical {
                message: "invalid character literal".to_string(),
                offset: start,
            }),
        }
    }

    fn scan_escape(&mut self, literal_start: usize) -> ParseResult<char> {
        // Positioned at the backslash.
        self.pos += 1;
        let c = self.peek_char().ok_or(ParseError::UnexpectedEof)?;
        self.pos += c.len_utf8();
        let value = match c {
            'b' => '\u{0008}',
            't' => '\t',
            'n' => '\n',
            'f' => '\u{000c}',
            'r' => '\r',
            '"' => '"',
            '\'' => '\'',
            '\\' => '\\',
            'u' => {
                let mut code = 0u32;
                for _ in 0..4 {
                    let d = self.peek_char().and_then(|c| c.to_digit(16)).ok_or_else(|| {
                        ParseError::Lexical {
                            message: "invalid unicode escape".to_string(),
                            offset: literal_start,
                        }
                    })?;
                    code = code * 16 + d;
                    self.pos += 1;
                }
                char::from_u32(code).ok_or_else(|| ParseError::Lexical {
                    message: "invalid unicode escape".to_string(),
                    offset: literal_start,
                })?
            }
            other => {
                return Err(ParseError::Lexical {
                    message: format!("invalid escape character `{}`", other),
                    offset: literal_start,
                });
            }
        };
        Ok(value)
    }

    fn scan_string(&mut self, start: usize) -> ParseResult<()> {
        if self.starts_with("\"\"\"") {
            self.pos += 3;
            let content_start = self.pos;
            loop {
                if self.pos >= self.src.len() {
                    return Err(ParseError::Lexical {
                        message: "unterminated triple-quoted string".to_string(),
                        offset: start,
                    });
                }
                if self.starts_with("\"\"\"") {
                    // Extra quotes before the terminator belong to the content.
                    let mut end = self.pos + 3;
                    while self.src[end..].starts_with('"') {
                        end += 1;
                    }
                    let content = &self.src[content_start..end - 3];
                    let payload = Payload::Str(Arc::from(content));
                    self.pos = end;
                    self.push_payload(TokenKind::StringLit, start, payload);
                    return Ok(());
                }
                if let Some(c) = self.peek_char() {
                    self.pos += c.len_utf8();
                }
            }
        }
        self.pos += 1;
        let mut decoded = String::new();
        loop {
            match self.peek_char() {
                None => {
                    return Err(ParseError::Lexical {
                        message: "unterminated string literal".to_string(),
                        offset: start,
                    });
                }
                Some('\n') => {
                    return Err(ParseError::Lexical {
                        message: "unterminated string literal".to_string(),
                        offset: start,
                    });
                }
                Some('"') => {
                    self.pos += 1;
                    self.push_payload(
                        TokenKind::StringLit,
                        start,
                        Payload::Str(Arc::from(decoded.as_str())),
                    );
                    return Ok(());
                }
                Some('\\') => {
                    let value = self.scan_escape(start)?;
                    decoded.push(value);
                }
                Some(c) => {
                    decoded.push(c);
                    self.pos += c.len_utf8();
                }
            }
        }
    }

    fn scan_number(&mut self, start: usize) -> ParseResult<()> {
        if self.starts_with("0x") || self.starts_with("0X") {
            self.pos += 2;
            let digits_start = self.pos;
            while let Some(c) = self.peek_char() {
                if c.is_ascii_hexdigit() || c == '_' {
                    self.pos += 1;
                } else {
                    break;
                }
            }
            let digits: String =
                self.src[digits_start..self.pos].chars().filter(|&c| c != '_').collect();
            if digits.is_empty() {
                return Err(ParseError::Lexical {
                    message: "invalid hexadecimal literal".to_string(),
                    offset: start,
                });
            }
            let long_suffix = matches!(self.peek_char(), Some('L') | Some('l'));
            if long_suffix {
                self.pos += 1;
            }
            let literal = &self.src[start..self.pos];
            let value = u64::from_str_radix(&digits, 16).map_err(|_| {
                ParseError::NumericOutOfRange {
                    kind: "integer",
                    literal: literal.to_string(),
                    target: if long_suffix { "Long" } else { "Int" },
                    offset: start,
                }
            })?;
            if long_suffix {
                self.push_payload(TokenKind::LongLit, start, Payload::Long(value as i64));
            } else {
                if value > u64::from(u32::MAX) {
                    return Err(ParseError::NumericOutOfRange {
                        kind: "integer",
                        literal: literal.to_string(),
                        target: "Int",
                        offset: start,
                    });
                }
                self.push_payload(TokenKind::IntLit, start, Payload::Int(value as u32 as i32));
            }
            return Ok(());
        }

        let mut is_floating = false;
        self.consume_digits();
        // A fraction only counts when a digit follows the dot: `1.toString`
        // keeps the dot as a selector.
        if self.peek_char() == Some('.')
            && self.char_at(self.pos + 1).map(|c| c.is_ascii_digit()) == Some(true)
        {
            is_floating = true;
            self.pos += 1;
            self.consume_digits();
        }
        if matches!(self.peek_char(), Some('e') | Some('E')) {
            let mark = self.pos;
            self.pos += 1;
            if matches!(self.peek_char(), Some('+') | Some('-')) {
                self.pos += 1;
            }
            if self.peek_char().map(|c| c.is_ascii_digit()) == Some(true) {
                is_floating = true;
                self.consume_digits();
            } else {
                self.pos = mark;
            }
        }

        let suffix = self.peek_char();
        match suffix {
            Some('f') | Some('F') => {
                self.pos += 1;
                let literal = &self.src[start..self.pos];
                let cleaned: String =
                    literal[..literal.len() - 1].chars().filter(|&c| c != '_').collect();
                let value: f32 = cleaned.parse().map_err(|_| ParseError::Lexical {
                    message: format!("malformed floating-point literal `{}`", literal),
                    offset: start,
                })?;
                if value.is_infinite() {
                    return Err(ParseError::NumericOutOfRange {
                        kind: "floating-point",
                        literal: literal.to_string(),
                        target: "Float",
                        offset: start,
                    });
                }
                self.push_payload(TokenKind::FloatLit, start, Payload::Float(value));
            }
            Some('d') | Some('D') => {
                self.pos += 1;
                let literal = &self.src[start..self.pos];
                let cleaned: String =
                    literal[..literal.len() - 1].chars().filter(|&c| c != '_').collect();
                let value: f64 = cleaned.parse().map_err(|_| ParseError::Lexical {
                    message: format!("malformed floating-point literal `{}`", literal),
                    offset: start,
                })?;
                if value.is_infinite() {
                    return Err(ParseError::NumericOutOfRange {
                        kind: "floating-point",
                        literal: literal.to_string(),
                        target: "Double",
                        offset: start,
                    });
                }
                self.push_payload(TokenKind::DoubleLit, start, Payload::Double(value));
            }
            Some('L') | Some('l') if !is_floating => {
                self.pos += 1;
                let literal = &self.src[start..self.pos];
                let cleaned: String =
                    literal[..literal.len() - 1].chars().filter(|&c| c != '_').collect();
                // Magnitude up to 2^63 is representable once a leading minus
                // is applied; the parser rejects the unsigned overflow case.
                let value: u64 = cleaned.parse().map_err(|_| ParseError::NumericOutOfRange {
                    kind: "integer",
                    literal: literal.to_string(),
                    target: "Long",
                    offset: start,
                })?;
                if value > (i64::MAX as u64) + 1 {
                    return Err(ParseError::NumericOutOfRange {
                        kind: "integer",
                        literal: literal.to_string(),
                        target: "Long",
                        offset: start,
                    });
                }
                self.push_payload(TokenKind::LongLit, start, Payload::Long(value as i64));
            }
            _ if is_floating => {
                let literal = &self.src[start..self.pos];
                let cleaned: String = literal.chars().filter(|&c| c != '_').collect();
                let value: f64 = cleaned.parse().map_err(|_| ParseError::Lexical {
                    message: format!("malformed floating-point literal `{}`", literal),
                    offset: start,
                })?;
                if value.is_infinite() {
                    return Err(ParseError::NumericOutOfRange {
                        kind: "floating-point",
                        literal: literal.to_string(),
                        target: "Double",
                        offset: start,
                    });
                }
                self.push_payload(TokenKind::DoubleLit, start, Payload::Double(value));
            }
            _ => {
                let literal = &self.src[start..self.pos];
                let cleaned: String = literal.chars().filter(|&c| c != '_').collect();
                let value: u64 = cleaned.parse().map_err(|_| ParseError::NumericOutOfRange {
                    kind: "integer",
                    literal: literal.to_string(),
                    target: "Int",
                    offset: start,
                })?;
                if value > (i32::MAX as u64) + 1 {
                    return Err(ParseError::NumericOutOfRange {
                        kind: "integer",
                        literal: literal.to_string(),
                        target: "Int",
                        offset: start,
                    });
                }
                self.push_payload(TokenKind::IntLit, start, Payload::Int(value as u32 as i32));
            }
        }
        Ok(())
    }

    fn consume_digits(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() || c == '_' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    // ===== Interpolated strings =====

    fn begin_interpolation(&mut self) -> ParseResult<()> {
        let start = self.pos;
        let triple = self.starts_with("\"\"\"");
        self.pos += if triple { 3 } else { 1 };
        self.push(TokenKind::InterpolationStart, start);
        self.modes.push(ScanMode::Interp { triple });
        Ok(())
    }

    fn scan_interp_part(&mut self, triple: bool) -> ParseResult<()> {
        let part_start = self.pos;
        let mut raw = String::new();
        loop {
            if self.pos >= self.src.len() {
                return Err(ParseError::Lexical {
                    message: "unterminated interpolated string".to_string(),
                    offset: part_start,
                });
            }
            if (triple && self.starts_with("\"\"\"")) || (!triple && self.starts_with("\"")) {
                self.flush_part(part_start, &raw);
                let end_start = self.pos;
                self.pos += if triple { 3 } else { 1 };
                self.push(TokenKind::InterpolationEnd, end_start);
                self.modes.pop();
                return Ok(());
            }
            let c = self.peek_char().ok_or(ParseError::UnexpectedEof)?;
            match c {
                '$' => {
                    let next = self.char_at(self.pos + 1);
                    match next {
                        Some('$') => {
                            // `$$` escapes a literal dollar.
                            raw.push('$');
                            self.pos += 2;
                        }
                        Some('{') => {
                            self.flush_part(part_start, &raw);
                            let splice_start = self.pos;
                            self.pos += 1;
                            self.push(TokenKind::InterpolationSpliceStart, splice_start);
                            self.modes.push(ScanMode::Generic { brace_depth: 0 });
                            return Ok(());
                        }
                        Some(n) if is_ident_start(n) => {
                            self.flush_part(part_start, &raw);
                            let splice_start = self.pos;
                            self.pos += 1;
                            self.push(TokenKind::InterpolationSpliceStart, splice_start);
                            let id_start = self.pos;
                            while let Some(c) = self.peek_char() {
                                if is_ident_part(c) {
                                    self.pos += c.len_utf8();
                                } else {
                                    break;
                                }
                            }
                            let kind = if &self.src[id_start..self.pos] == "this" {
                                TokenKind::KwThis
                            } else {
                                TokenKind::Ident
                            };
                            self.push(kind, id_start);
                            self.tokens.push(Token::virtual_at(
                                TokenKind::InterpolationSpliceEnd,
                                self.pos,
                            ));
                            return Ok(());
                        }
                        _ => {
                            return Err(ParseError::syntax(
                                "invalid string interpolation: expected identifier, `{`, or `$`",
                                self.pos,
                            ));
                        }
                    }
                }
                '\n' if !triple => {
                    return Err(ParseError::Lexical {
                        message: "unterminated interpolated string".to_string(),
                        offset: part_start,
                    });
                }
                '\\' if !triple => {
                    // Keep escapes raw; processing belongs to the interpolator.
                    raw.push('\\');
                    self.pos += 1;
                    if let Some(c) = self.peek_char() {
                        raw.push(c);
                        self.pos += c.len_utf8();
                    }
                }
                c => {
                    raw.push(c);
                    self.pos += c.len_utf8();
                }
            }
        }
    }

    fn flush_part(&mut self, part_start: usize, raw: &str) {
        if self.pos > part_start {
            let text = &self.src[part_start..self.pos];
            self.tokens.push(Token::with_payload(
                TokenKind::InterpolationPart,
                text,
                ByteSpan::new(part_start, self.pos),
                Payload::Str(Arc::from(raw)),
            ));
        }
    }
}

#[cfg(test)]
mod tests;
