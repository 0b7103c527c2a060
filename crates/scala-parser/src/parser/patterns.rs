/// Pattern sequence context: whether `_*` is legal and whether XML
/// patterns are entered. Threaded explicitly through every
/// context-sensitive pattern production.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatMode {
    /// Sequence wildcards allowed (extractor arguments)
    SeqOk,
    /// Sequence wildcards rejected (tuples, binders)
    NoSeq,
    /// Sequence wildcards allowed inside XML patterns
    XmlSeqOk,
}

impl PatMode {
    fn seq_ok(self) -> bool {
        matches!(self, PatMode::SeqOk | PatMode::XmlSeqOk)
    }
}

impl Parser {
    /// `Pattern ::= Pattern1 {'|' Pattern1}`
    fn pattern(&mut self, mode: PatMode) -> ParseResult<Pat> {
        self.with_recursion_guard(|p| p.pattern_impl(mode))
    }

    fn pattern_impl(&mut self, mode: PatMode) -> ParseResult<Pat> {
        let start = self.cursor.index();
        let mut pat = self.pattern1(mode)?;
        while self.at(TokenKind::Ident) && &*self.current_text() == "|" {
            self.require_dialect(self.dialect.allow_pattern_alternatives, "pattern alternatives")?;
            self.advance();
            let rhs = self.pattern1(mode)?;
            let origin = self.origin_from(start);
            pat = Pat::new(
                PatKind::Alternative { lhs: Box::new(pat), rhs: Box::new(rhs) },
                origin,
            );
        }
        Ok(pat)
    }

    /// `Pattern1 ::= Pattern2 [':' Type]`
    fn pattern1(&mut self, mode: PatMode) -> ParseResult<Pat> {
        let start = self.cursor.index();
        let pat = self.pattern2(mode)?;
        if !self.at(TokenKind::Colon) {
            return Ok(pat);
        }
        // Ascription binds only to variables, wildcards, and unquotes.
        match pat.kind {
            PatKind::Var { .. }
            | PatKind::Wildcard
            | PatKind::Quasi { .. }
            | PatKind::Bind { .. } => {}
            _ => return Ok(pat),
        }
        self.advance();
        let tpe = self.pattern_typ()?;
        let origin = self.origin_from(start);
        Ok(Pat::new(PatKind::Typed { lhs: Box::new(pat), rhs: Box::new(tpe) }, origin))
    }

    /// `Pattern2 ::= [id '@'] Pattern3`
    fn pattern2(&mut self, mode: PatMode) -> ParseResult<Pat> {
        let start = self.cursor.index();

        // `_ @ p` binds nothing; it is just `p`.
        if self.at(TokenKind::Underscore) && self.cursor.peek_kind() == TokenKind::At {
            self.advance();
            self.advance();
            return self.pattern3(mode);
        }

        if self.at(TokenKind::Ident) && self.cursor.peek_kind() == TokenKind::At {
            let text = self.current_text();
            let bindable = scala_token::classifiers::is_pattern_var_text(&text)
                || (self.dialect.allow_upper_case_pattern_var_binding
                    && !scala_token::classifiers::is_backquoted(&text)
                    && !self.cursor.current().is_operator_ident());
            if bindable {
                self.advance();
                let lhs = Pat::new(
                    PatKind::Var { name: text.to_string() },
                    self.origin_between(start, start + 1),
                );
                self.accept(TokenKind::At)?;
                let rhs = self.pattern3(mode)?;
                let origin = self.origin_from(start);
                return Ok(Pat::new(
                    PatKind::Bind { lhs: Box::new(lhs), rhs: Box::new(rhs) },
                    origin,
                ));
            }
        }

        self.pattern3(mode)
    }

    /// `Pattern3 ::= SimplePattern {id [nl] SimplePattern}` via the shared
    /// infix engine, plus sequence-wildcard handling.
    fn pattern3(&mut self, mode: PatMode) -> ParseResult<Pat> {
        let ctx = PatInfixContext;
        let start = self.cursor.index();
        let mut stack: Vec<UnfinishedInfix<Pat>> = Vec::new();
        let mut rhs_start = start;
        let mut rhs = self.simple_pattern(mode)?;

        if let Some(seq) = self.seq_wildcard_opt(&rhs, mode, start)? {
            return Ok(seq);
        }

        loop {
            if !self.at_pattern_infix_op() {
                break;
            }
            let op = op_name(&self.current_text());
            let op_offset = self.current_offset();
            let rhs_end = self.cursor.end_index();
            rhs = reduce_stack(&ctx, self, &mut stack, 0, rhs, rhs_end, Some(&op))?;
            let lhs_start = rhs.origin.span.start.min(rhs_start);
            stack.push(UnfinishedInfix {
                lhs_start,
                lhs: rhs,
                op,
                op_offset,
                targs: Vec::new(),
            });
            self.advance();
            self.newline_opt();
            rhs_start = self.cursor.index();
            rhs = self.simple_pattern(mode)?;
        }

        let rhs_end = self.cursor.end_index();
        reduce_stack(&ctx, self, &mut stack, 0, rhs, rhs_end, None)
    }

    fn at_pattern_infix_op(&self) -> bool {
        if !self.at(TokenKind::Ident) {
            return false;
        }
        let text = self.current_text();
        // `|` is alternation, handled a level up.
        &*text != "|"
    }

    /// Detect `_ *`: in a sequence-OK context followed by a closing token
    /// it is the sequence wildcard; other uses are diagnosed.
    fn seq_wildcard_opt(
        &mut self,
        lhs: &Pat,
        mode: PatMode,
        start: usize,
    ) -> ParseResult<Option<Pat>> {
        if !matches!(lhs.kind, PatKind::Wildcard) {
            return Ok(None);
        }
        if !(self.at(TokenKind::Ident) && &*self.current_text() == "*") {
            return Ok(None);
        }
        if !mode.seq_ok() {
            return Err(self.error_here("bad use of _* (sequence pattern not allowed)"));
        }
        self.advance();
        if self.cursor.current().is_closing() {
            let origin = self.origin_from(start);
            Ok(Some(Pat::new(PatKind::SeqWildcard, origin)))
        } else if matches!(self.kind(), TokenKind::LeftBrace | TokenKind::LeftParen) {
            Err(self.error_here("bad brace or paren after _*"))
        } else {
            Err(self.error_here("bad use of _* (a sequence pattern must be the last pattern)"))
        }
    }

    /// Literals, extractors, variables, wildcards, tuples, interpolations,
    /// XML, unquotes.
    fn simple_pattern(&mut self, mode: PatMode) -> ParseResult<Pat> {
        let start = self.cursor.index();
        match self.kind() {
            TokenKind::Underscore => {
                self.advance();
                Ok(Pat::new(PatKind::Wildcard, self.origin_from(start)))
            }
            TokenKind::LeftParen => {
                self.advance();
                let mut items = Vec::new();
                if !self.at(TokenKind::RightParen) {
                    items.push(self.pattern(PatMode::NoSeq)?);
                    while self.accept_opt(TokenKind::Comma) {
                        items.push(self.pattern(PatMode::NoSeq)?);
                    }
                }
                self.accept(TokenKind::RightParen)?;
                let origin = self.origin_from(start);
                Ok(match items.len() {
                    0 => Pat::new(PatKind::Lit(Lit::Unit), origin),
                    1 => match items.pop() {
                        Some(p) => p,
                        None => return Err(ParseError::UnexpectedEof),
                    },
                    _ => Pat::new(PatKind::Tuple(items), origin),
                })
            }
            TokenKind::InterpolationId => {
                let (prefix, parts, args) = self.interpolate_parts(|p| {
                    p.pattern(PatMode::NoSeq)
                })?;
                let origin = self.origin_from(start);
                Ok(Pat::new(PatKind::Interpolate { prefix, parts, args }, origin))
            }
            TokenKind::XmlStart => {
                self.require_dialect(self.dialect.allow_xml_literals, "XML literals")?;
                if mode != PatMode::XmlSeqOk && mode != PatMode::SeqOk {
                    return Err(self.error_here("XML pattern not allowed here"));
                }
                let (parts, args) = self.xml_parts(|p| p.pattern(PatMode::XmlSeqOk))?;
                let origin = self.origin_from(start);
                Ok(Pat::new(PatKind::Xml { parts, args }, origin))
            }
            TokenKind::Unquote => {
                let (rank, tree) = self.unquote_tree()?;
                let quasi = Pat::new(
                    PatKind::Quasi { rank, tree: Box::new(tree) },
                    self.origin_from(start),
                );
                if self.at(TokenKind::LeftParen) {
                    let args = self.argument_patterns()?;
                    let origin = self.origin_from(start);
                    let fun = Term::new(
                        TermKind::Quasi {
                            rank,
                            tree: match quasi.kind {
                                PatKind::Quasi { tree, .. } => tree,
                                _ => return Err(ParseError::UnexpectedEof),
                            },
                        },
                        quasi.origin,
                    );
                    Ok(Pat::new(PatKind::Extract { fun: Box::new(fun), args }, origin))
                } else {
                    Ok(quasi)
                }
            }
            TokenKind::Ellipsis => {
                let (rank, tree) = self.ellipsis_unquote()?;
                Ok(Pat::new(
                    PatKind::Quasi { rank, tree: Box::new(tree) },
                    self.origin_from(start),
                ))
            }
            TokenKind::MacroQuote => {
                // Quoted pattern: `case '{ ... } =>`.
                self.quoted_pat_depth += 1;
                let quoted = self.quoted_expr(start);
                self.quoted_pat_depth -= 1;
                let term = quoted?;
                Ok(Pat::new(PatKind::Term(Box::new(term)), self.origin_from(start)))
            }
            TokenKind::Ident | TokenKind::KwThis => self.simple_pattern_path(start),
            k if k.is_literal() => {
                let lit = self.literal()?;
                Ok(Pat::new(PatKind::Lit(lit), self.origin_from(start)))
            }
            _ => Err(self.expected_error("pattern")),
        }
    }

    fn simple_pattern_path(&mut self, start: usize) -> ParseResult<Pat> {
        // Negative literal patterns: `-1`.
        if self.at(TokenKind::Ident)
            && &*self.current_text() == "-"
            && matches!(
                self.cursor.peek_kind(),
                TokenKind::IntLit | TokenKind::LongLit | TokenKind::FloatLit | TokenKind::DoubleLit
            )
        {
            self.advance();
            let lit = self.negated_literal()?;
            return Ok(Pat::new(PatKind::Lit(lit), self.origin_from(start)));
        }

        let first = self.current_text();
        let simple_var = self.at(TokenKind::Ident)
            && scala_token::classifiers::is_pattern_var_text(&first)
            && !scala_token::classifiers::is_backquoted(&first)
            && self.cursor.peek_kind() != TokenKind::Dot;

        if simple_var
            && !matches!(
                self.cursor.peek_kind(),
                TokenKind::LeftParen | TokenKind::LeftBracket
            )
        {
            self.advance();
            return Ok(Pat::new(
                PatKind::Var { name: first.to_string() },
                self.origin_from(start),
            ));
        }

        // A stable reference, possibly an extractor application.
        let mut fun = self.path_term()?;
        if self.at(TokenKind::LeftBracket) {
            let targs = self.type_args()?;
            let origin = self.origin_from(start);
            fun = Term::new(TermKind::ApplyType { fun: Box::new(fun), targs }, origin);
        }
        if self.at(TokenKind::LeftParen) {
            let args = self.argument_patterns()?;
            let origin = self.origin_from(start);
            return Ok(Pat::new(PatKind::Extract { fun: Box::new(fun), args }, origin));
        }
        let origin = self.origin_from(start);
        Ok(Pat::new(PatKind::Term(Box::new(fun)), origin))
    }

    /// `( [Patterns] )` with sequence wildcards allowed.
    fn argument_patterns(&mut self) -> ParseResult<Vec<Pat>> {
        self.accept(TokenKind::LeftParen)?;
        let mut args = Vec::new();
        if !self.at(TokenKind::RightParen) {
            args.push(self.pattern(PatMode::SeqOk)?);
            while self.accept_opt(TokenKind::Comma) {
                args.push(self.pattern(PatMode::SeqOk)?);
            }
        }
        self.accept(TokenKind::RightParen)?;
        Ok(args)
    }
}
