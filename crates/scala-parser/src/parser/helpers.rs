impl Parser {
    // ===== Token access =====

    #[inline]
    fn kind(&self) -> TokenKind {
        self.cursor.kind()
    }

    #[inline]
    fn at(&self, kind: TokenKind) -> bool {
        self.cursor.kind() == kind
    }

    /// True at an identifier with exactly this text.
    fn at_soft(&self, word: &str) -> bool {
        self.cursor.current().is_soft_kw(word)
    }

    fn current_text(&self) -> Arc<str> {
        Arc::clone(&self.cursor.current().text)
    }

    fn current_offset(&self) -> usize {
        self.cursor.current().span.start
    }

    #[inline]
    fn advance(&mut self) {
        self.cursor.advance();
    }

    /// Advance if the current token is of `kind`, otherwise fail with the
    /// standard "expected but found" error.
    fn accept(&mut self, kind: TokenKind) -> ParseResult<()> {
        if self.at(kind) {
            self.advance();
            Ok(())
        } else {
            Err(self.expected_error(kind.describe()))
        }
    }

    /// Advance only if the current token matches.
    fn accept_opt(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume an identifier and return its text.
    fn ident(&mut self) -> ParseResult<String> {
        if self.at(TokenKind::Ident) {
            let text = self.current_text().to_string();
            self.advance();
            Ok(text)
        } else {
            Err(self.expected_error("identifier"))
        }
    }

    /// Evaluate `body` with the cursor advanced by one visible token, then
    /// restore unconditionally.
    #[allow(dead_code)]
    fn ahead<T>(&mut self, body: impl FnOnce(&mut Self) -> T) -> T {
        let snapshot = self.cursor.fork();
        self.advance();
        let result = body(self);
        self.cursor.restore(snapshot);
        result
    }

    /// Run a speculative sub-parse: on `Ok(Some(_))` the cursor commits, on
    /// `Ok(None)` or `Err` it rewinds to the fork point.
    fn speculate<T>(
        &mut self,
        body: impl FnOnce(&mut Self) -> ParseResult<Option<T>>,
    ) -> Option<T> {
        let snapshot = self.cursor.fork();
        match body(self) {
            Ok(Some(value)) => Some(value),
            Ok(None) | Err(_) => {
                self.cursor.restore(snapshot);
                None
            }
        }
    }

    // ===== Errors and diagnostics =====

    fn expected_error(&mut self, expected: &str) -> ParseError {
        let found = self.describe_current();
        let offset = self.current_offset();
        self.report_error(format!("{} expected but {} found", expected, found));
        ParseError::unexpected(expected, found, offset)
    }

    fn describe_current(&self) -> String {
        let tok = self.cursor.current();
        match tok.kind {
            TokenKind::Ident => format!("`{}`", tok.text),
            other => other.describe().to_string(),
        }
    }

    /// Report and build a syntax error at the current token.
    fn error_here(&mut self, message: impl Into<String>) -> ParseError {
        let message = message.into();
        self.report_error(message.clone());
        ParseError::syntax(message, self.current_offset())
    }

    /// Report and build a dialect-gating error at the current token.
    fn forbidden_here(&mut self, construct: &str) -> ParseError {
        let message = format!("{} does not support {}", self.dialect.name, construct);
        self.report_error(message);
        ParseError::forbidden(self.dialect.name, construct, self.current_offset())
    }

    fn report_error(&mut self, message: String) {
        let span = self.current_byte_span();
        self.diagnostics.report(Diagnostic { severity: Severity::Error, span, message });
    }

    /// Emit a deprecation warning; never aborts.
    fn deprecation(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(%message, "deprecation");
        let span = self.current_byte_span();
        self.diagnostics.report(Diagnostic::warning(span, message));
    }

    fn current_byte_span(&self) -> ByteSpan {
        let local = self.cursor.current().span;
        self.input.absolute_span(local)
    }

    /// Run `f` under the recursion depth budget.
    fn with_recursion_guard<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        self.recursion_depth += 1;
        if self.recursion_depth > MAX_RECURSION_DEPTH {
            self.recursion_depth -= 1;
            return Err(ParseError::NestingTooDeep {
                depth: self.recursion_depth + 1,
                max_depth: MAX_RECURSION_DEPTH,
            });
        }
        let result = f(self);
        self.recursion_depth -= 1;
        result
    }

    // ===== Positions and origins =====

    /// Trim trivia from both ends of `[start, end)` token indices.
    ///
    /// An empty candidate range collapses to `[start, start)`; a range of
    /// nothing but trivia keeps a single token so the node still points at
    /// real input.
    fn trimmed_span(&self, start: usize, end: usize) -> Span {
        if end <= start {
            return Span::empty(start);
        }
        let tokens = self.cursor.tokens();
        let mut lo = start;
        let mut hi = end.min(tokens.len());
        while lo < hi && tokens[lo].kind.is_trivia() {
            lo += 1;
        }
        while hi > lo && tokens[hi - 1].kind.is_trivia() {
            hi -= 1;
        }
        if lo == hi {
            // Nothing but trivia: keep one token of it.
            return Span::new(start, start + 1);
        }
        Span::new(lo, hi)
    }

    /// Origin for a node whose first token is at index `start` and whose
    /// last token is the previously consumed one.
    fn origin_from(&self, start: usize) -> Origin {
        let end = self.cursor.end_index().max(start);
        self.origin_between(start, end)
    }

    fn origin_between(&self, start: usize, end: usize) -> Origin {
        let span = self.trimmed_span(start, end);
        let tokens = self.cursor.tokens();
        let bytes = if span.is_empty() {
            let at = tokens
                .get(span.start)
                .map(|t| t.span.start)
                .unwrap_or_else(|| self.input.len());
            ByteSpan::empty(at)
        } else {
            ByteSpan::new(tokens[span.start].span.start, tokens[span.end - 1].span.end)
        };
        Origin::new(self.input.clone(), self.dialect, span, bytes)
    }

    /// Zero-width origin at the current token, for synthesized nodes.
    fn synthetic_origin(&self) -> Origin {
        let at = self.cursor.index();
        let bytes = ByteSpan::empty(self.cursor.current().span.start);
        Origin::new(self.input.clone(), self.dialect, Span::empty(at), bytes)
    }

    // ===== Newlines and statement separators =====

    fn at_stat_sep(&self) -> bool {
        self.kind().is_stat_sep()
    }

    /// Skip any run of statement separators.
    ///
    /// A line break that dedents out of the current indentation region is
    /// not skipped; the synthesized `Outdent` becomes the current token so
    /// the enclosing region sees its closing.
    fn skip_stat_seps(&mut self) {
        loop {
            if self.cursor.observe_outdented() {
                break;
            }
            if matches!(self.kind(), TokenKind::Semicolon | TokenKind::LF | TokenKind::LFLF) {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Require a statement separator (or a closing token just ahead).
    fn accept_stat_sep(&mut self) -> ParseResult<()> {
        if self.cursor.observe_outdented() {
            return Ok(());
        }
        if self.at_stat_sep() {
            self.skip_stat_seps();
            Ok(())
        } else if self.cursor.current().is_closing() {
            Ok(())
        } else {
            Err(self.expected_error("`;` or newline"))
        }
    }

    /// Require the close of an indentation region, synthesizing the virtual
    /// `Outdent` first when the dedent (or end of input) has not been
    /// observed yet.
    fn accept_outdent(&mut self) -> ParseResult<()> {
        if !self.at(TokenKind::Outdent) {
            self.cursor.observe_outdented();
        }
        self.accept(TokenKind::Outdent)
    }

    /// Skip a single line break (not a blank-line break).
    fn newline_opt(&mut self) {
        if self.at(TokenKind::LF) {
            self.advance();
        }
    }

    /// Skip one or more line breaks of any kind.
    fn newlines_opt(&mut self) {
        while self.kind().is_line_end() {
            self.advance();
        }
    }

    /// Skip a single line break when the next visible token matches `kind`.
    fn newline_opt_when_followed_by(&mut self, kind: TokenKind) {
        if self.at(TokenKind::LF) && self.cursor.peek_kind() == kind {
            self.advance();
        }
    }

    /// True when the current token may begin an expression.
    fn at_expr_intro(&self) -> bool {
        self.cursor.current().is_expr_intro(&self.dialect)
    }

    /// True when the current token may begin a definition.
    fn at_defn_intro(&self) -> bool {
        self.cursor.current().is_defn_intro(&self.dialect)
    }

    /// Soft-keyword modifier check: the word must be followed by something
    /// that can continue a definition, otherwise it is a plain identifier.
    fn at_soft_modifier(&self, word: &str) -> bool {
        if !self.at_soft(word) {
            return false;
        }
        let next = self.cursor.peek();
        next.is_defn_intro(&self.dialect)
            || next.kind.is_modifier_kind()
            || next.kind == TokenKind::KwDef
            || next.kind == TokenKind::KwType
            || next.kind == TokenKind::KwGiven
    }

    /// Gate a construct on a dialect flag.
    fn require_dialect(&mut self, allowed: bool, construct: &str) -> ParseResult<()> {
        if allowed {
            Ok(())
        } else {
            Err(self.forbidden_here(construct))
        }
    }
}
