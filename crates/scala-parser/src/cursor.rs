//! Token cursor with speculative lookahead and indentation synthesis.
//!
//! The cursor owns the materialized token vector and a small amount of
//! navigation state: the current index, the index of the previous
//! non-trivia token (for span computation), a stack of separator regions,
//! and a queue of pending virtual `Indent`/`Outdent` tokens.
//!
//! Navigation skips horizontal trivia (spaces and comments) but keeps line
//! breaks visible, because newlines are statement separators in Scala.
//! Inside parentheses and brackets, line breaks are insignificant and are
//! skipped too; the region stack tracks which rule applies.
//!
//! `fork` captures the complete navigation state and `restore` rewinds to
//! it unconditionally, including any virtual tokens synthesized inside the
//! abandoned branch. Forks nest arbitrarily; each snapshot is independent.

use scala_span::Input;
use scala_token::{Token, TokenKind};
use std::collections::VecDeque;
use tracing::trace;

/// Separator regions controlling newline visibility and indentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SepRegion {
    /// Inside `( ... )`: newlines are insignificant.
    Paren,
    /// Inside `[ ... ]`: newlines are insignificant.
    Bracket,
    /// Inside `{ ... }`: newlines separate statements.
    Brace,
    /// Inside an indentation block of the given column width.
    Indent(usize),
}

/// A snapshot of the cursor, produced by [`TokenCursor::fork`].
#[derive(Debug, Clone)]
pub struct CursorSnapshot {
    pos: usize,
    prev: usize,
    regions: Vec<SepRegion>,
    pending: VecDeque<Token>,
}

/// Mutable bidirectional iterator over scanner tokens.
#[derive(Debug)]
pub struct TokenCursor {
    input: Input,
    tokens: Vec<Token>,
    /// Index of the current (visible) token.
    pos: usize,
    /// Index of the previous non-trivia token consumed.
    prev: usize,
    regions: Vec<SepRegion>,
    /// Synthesized Indent/Outdent tokens awaiting consumption.
    pending: VecDeque<Token>,
}

impl TokenCursor {
    /// Create a cursor positioned at the leading `BOF` token.
    ///
    /// The token vector must begin with `BOF` and end with `EOF`; the
    /// scanner guarantees this.
    pub fn new(input: Input, tokens: Vec<Token>) -> Self {
        debug_assert!(matches!(tokens.first().map(|t| t.kind), Some(TokenKind::BOF)));
        debug_assert!(matches!(tokens.last().map(|t| t.kind), Some(TokenKind::EOF)));
        TokenCursor { input, tokens, pos: 0, prev: 0, regions: Vec::new(), pending: VecDeque::new() }
    }

    /// The full token vector.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// The input handle this cursor reads from.
    pub fn input(&self) -> &Input {
        &self.input
    }

    /// The current token (a pending virtual token takes precedence).
    pub fn current(&self) -> &Token {
        match self.pending.front() {
            Some(t) => t,
            None => &self.tokens[self.pos.min(self.tokens.len() - 1)],
        }
    }

    /// Kind of the current token.
    pub fn kind(&self) -> TokenKind {
        self.current().kind
    }

    /// Index of the current token in the token vector.
    pub fn index(&self) -> usize {
        self.pos
    }

    /// Index of the previously consumed non-trivia token.
    pub fn prev_index(&self) -> usize {
        self.prev
    }

    /// Exclusive end index for a node that ended at the previous token.
    pub fn end_index(&self) -> usize {
        self.prev + 1
    }

    /// The previously consumed non-trivia token.
    pub fn previous(&self) -> &Token {
        &self.tokens[self.prev]
    }

    /// Advance to the next visible token.
    ///
    /// Consumes a pending virtual token first if one is queued. Maintains
    /// the separator-region stack as delimiters go by.
    pub fn advance(&mut self) {
        if let Some(virt) = self.pending.pop_front() {
            trace!(kind = ?virt.kind, "consume virtual token");
            match virt.kind {
                TokenKind::Outdent => {
                    if matches!(self.regions.last(), Some(SepRegion::Indent(_))) {
                        self.regions.pop();
                    }
                }
                TokenKind::Indent => {}
                _ => {}
            }
            return;
        }
        let consumed = self.pos;
        if !self.tokens[consumed].kind.is_trivia() {
            self.prev = consumed;
        }
        match self.tokens[consumed].kind {
            TokenKind::LeftParen => self.regions.push(SepRegion::Paren),
            TokenKind::LeftBracket => self.regions.push(SepRegion::Bracket),
            TokenKind::LeftBrace => self.regions.push(SepRegion::Brace),
            TokenKind::RightParen => self.pop_region(SepRegion::Paren),
            TokenKind::RightBracket => self.pop_region(SepRegion::Bracket),
            TokenKind::RightBrace => self.pop_region(SepRegion::Brace),
            _ => {}
        }
        self.pos = self.next_visible(consumed + 1);
    }

    fn pop_region(&mut self, expected: SepRegion) {
        // Close any indentation regions opened inside the delimiter first.
        while matches!(self.regions.last(), Some(SepRegion::Indent(_))) {
            self.regions.pop();
        }
        if self.regions.last() == Some(&expected) {
            self.regions.pop();
        }
    }

    /// Whether newlines are currently significant (not inside `(`/`[`).
    pub fn newlines_significant(&self) -> bool {
        !matches!(self.regions.last(), Some(SepRegion::Paren) | Some(SepRegion::Bracket))
    }

    fn next_visible(&self, mut idx: usize) -> usize {
        let newline_insignificant =
            matches!(self.regions.last(), Some(SepRegion::Paren) | Some(SepRegion::Bracket));
        while idx < self.tokens.len() {
            let kind = self.tokens[idx].kind;
            if kind.is_horizontal_trivia() || kind == TokenKind::BOF {
                idx += 1;
                continue;
            }
            if kind.is_line_end() && newline_insignificant {
                idx += 1;
                continue;
            }
            break;
        }
        idx.min(self.tokens.len() - 1)
    }

    /// The next visible token after the current one, ignoring pending
    /// virtual tokens.
    pub fn peek(&self) -> &Token {
        let next = self.next_visible_skipping_newlines(self.pos);
        &self.tokens[next]
    }

    /// Kind of the next visible non-newline token after the current one.
    pub fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn next_visible_skipping_newlines(&self, from: usize) -> usize {
        let mut idx = from + 1;
        while idx < self.tokens.len() {
            let kind = self.tokens[idx].kind;
            if kind.is_trivia() && kind != TokenKind::EOF {
                idx += 1;
                continue;
            }
            break;
        }
        idx.min(self.tokens.len() - 1)
    }

    /// Capture the navigation state for speculative lookahead.
    pub fn fork(&self) -> CursorSnapshot {
        CursorSnapshot {
            pos: self.pos,
            prev: self.prev,
            regions: self.regions.clone(),
            pending: self.pending.clone(),
        }
    }

    /// Rewind to a snapshot, discarding everything since the fork
    /// (including virtual tokens synthesized in the abandoned branch).
    pub fn restore(&mut self, snapshot: CursorSnapshot) {
        self.pos = snapshot.pos;
        self.prev = snapshot.prev;
        self.regions = snapshot.regions;
        self.pending = snapshot.pending;
    }

    /// Column (0-based) of the current token in its line.
    pub fn current_indentation(&self) -> usize {
        self.input.column(self.current().span.start)
    }

    /// Column of the first visible token after the current line break.
    ///
    /// Only meaningful when the current token is `LF`/`LFLF`.
    pub fn indentation_after_newline(&self) -> usize {
        let next = self.next_visible_skipping_newlines(self.pos);
        self.input.column(self.tokens[next].span.start)
    }

    /// True when the innermost separator region is an indentation region.
    pub fn in_indent_region(&self) -> bool {
        matches!(self.regions.last(), Some(SepRegion::Indent(_)))
    }

    /// Width of the innermost indentation region (0 at top level).
    pub fn current_region_width(&self) -> usize {
        self.regions
            .iter()
            .rev()
            .find_map(|r| match r {
                SepRegion::Indent(w) => Some(*w),
                SepRegion::Brace => Some(0),
                _ => None,
            })
            .unwrap_or(0)
    }

    /// Synthesize an `Indent` if the position after the current line break
    /// begins a strictly-more-indented block.
    ///
    /// Returns true and leaves the virtual `Indent` as the current token on
    /// success; otherwise leaves the cursor untouched.
    pub fn observe_indented(&mut self) -> bool {
        if !self.pending.is_empty() {
            return false;
        }
        if !self.kind().is_line_end() {
            return false;
        }
        let width = self.indentation_after_newline();
        if width <= self.current_region_width() {
            return false;
        }
        // Skip past the line break, then present the virtual Indent.
        self.advance_over_newlines();
        let at = self.current().span.start;
        self.regions.push(SepRegion::Indent(width));
        self.pending.push_back(Token::virtual_at(TokenKind::Indent, at));
        trace!(width, "observe indent");
        true
    }

    /// Synthesize an `Outdent` if the next line dedents out of the current
    /// indentation region.
    ///
    /// Called at statement separators. Returns true and queues the virtual
    /// `Outdent` (leaving the line break unconsumed for the enclosing
    /// region) when a dedent is detected.
    pub fn observe_outdented(&mut self) -> bool {
        if !self.pending.is_empty() {
            return false;
        }
        let region = match self.regions.last() {
            Some(SepRegion::Indent(w)) => *w,
            _ => return false,
        };
        let dedent = match self.kind() {
            k if k.is_line_end() => self.indentation_after_newline() < region,
            TokenKind::EOF | TokenKind::RightBrace | TokenKind::RightParen
            | TokenKind::RightBracket => true,
            _ => return false,
        };
        if !dedent {
            return false;
        }
        let at = self.current().span.start;
        self.pending.push_back(Token::virtual_at(TokenKind::Outdent, at));
        trace!(width = region, "observe outdent");
        true
    }

    fn advance_over_newlines(&mut self) {
        while self.kind().is_line_end() && self.pending.is_empty() {
            let consumed = self.pos;
            self.pos = self.next_visible(consumed + 1);
        }
    }

    /// True when positioned at `EOF` with no pending virtual tokens.
    pub fn at_eof(&self) -> bool {
        self.pending.is_empty() && self.kind() == TokenKind::EOF
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use scala_dialect::Dialect;
    use scala_scanner::tokenize;

    fn cursor(src: &str) -> TokenCursor {
        let input = Input::new(src);
        let tokens = tokenize(&input, &Dialect::scala3()).unwrap();
        let mut c = TokenCursor::new(input, tokens);
        // Step off BOF onto the first visible token.
        c.advance();
        c
    }

    #[test]
    fn starts_at_bof_and_walks_visible_tokens() {
        let input = Input::new("a b");
        let tokens = tokenize(&input, &Dialect::scala3()).unwrap();
        let mut c = TokenCursor::new(input, tokens);
        assert_eq!(c.kind(), TokenKind::BOF);
        c.advance();
        assert_eq!(&*c.current().text, "a");
        c.advance();
        assert_eq!(&*c.current().text, "b");
        c.advance();
        assert!(c.at_eof());
    }

    #[test]
    fn newlines_visible_at_top_level_but_not_in_parens() {
        let mut c = cursor("a\nb");
        assert_eq!(&*c.current().text, "a");
        c.advance();
        assert_eq!(c.kind(), TokenKind::LF);

        let mut c = cursor("f(a,\nb)");
        for _ in 0..3 {
            c.advance(); // f ( a ,
        }
        assert_eq!(c.kind(), TokenKind::Comma);
        c.advance();
        // Newline inside parens is skipped.
        assert_eq!(&*c.current().text, "b");
    }

    #[test]
    fn fork_restore_roundtrip() {
        let mut c = cursor("a + b");
        let snapshot = c.fork();
        c.advance();
        c.advance();
        assert_eq!(&*c.current().text, "b");
        c.restore(snapshot);
        assert_eq!(&*c.current().text, "a");
    }

    #[test]
    fn observe_indented_synthesizes_virtual_token() {
        let mut c = cursor("a\n  b");
        c.advance(); // onto LF
        assert_eq!(c.kind(), TokenKind::LF);
        assert!(c.observe_indented());
        assert_eq!(c.kind(), TokenKind::Indent);
        c.advance();
        assert_eq!(&*c.current().text, "b");
    }

    #[test]
    fn observe_outdented_on_dedent() {
        let mut c = cursor("a\n  b\nc");
        c.advance(); // LF
        assert!(c.observe_indented());
        c.advance(); // consume Indent
        assert_eq!(&*c.current().text, "b");
        c.advance(); // LF before c
        assert!(c.observe_outdented());
        assert_eq!(c.kind(), TokenKind::Outdent);
        c.advance(); // consume Outdent, region popped
        assert_eq!(c.kind(), TokenKind::LF);
    }

    #[test]
    fn restore_discards_synthesized_tokens() {
        let mut c = cursor("a\n  b");
        c.advance(); // LF
        let snapshot = c.fork();
        assert!(c.observe_indented());
        assert_eq!(c.kind(), TokenKind::Indent);
        c.restore(snapshot);
        assert_eq!(c.kind(), TokenKind::LF);
        assert_eq!(c.current_region_width(), 0);
    }
}
