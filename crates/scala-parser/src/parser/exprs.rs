impl Parser {
    // ===== Entry: Term =====

    /// `Expr ::= if/while/for/try/throw/return/do | implicit-lambda |
    /// PostfixExpr [ascription | lambda | assignment | match]`
    fn expr(&mut self, location: Location, allow_repeated: bool) -> ParseResult<Term> {
        self.with_recursion_guard(|p| p.expr_impl(location, allow_repeated))
    }

    fn expr_impl(&mut self, location: Location, allow_repeated: bool) -> ParseResult<Term> {
        let start = self.cursor.index();
        match self.kind() {
            TokenKind::KwIf => self.if_expr(start),
            TokenKind::KwWhile => self.while_expr(start),
            TokenKind::KwTry => self.try_expr(start),
            TokenKind::KwDo => self.do_while_expr(start),
            TokenKind::KwFor => self.for_expr(start),
            TokenKind::KwReturn => {
                self.advance();
                let expr = if self.at_expr_intro() {
                    Some(Box::new(self.expr(Location::NoStat, false)?))
                } else {
                    None
                };
                Ok(Term::new(TermKind::Return(expr), self.origin_from(start)))
            }
            TokenKind::KwThrow => {
                self.advance();
                let expr = self.expr(Location::NoStat, false)?;
                Ok(Term::new(TermKind::Throw(Box::new(expr)), self.origin_from(start)))
            }
            TokenKind::KwImplicit => self.implicit_lambda(start, location),
            TokenKind::LeftParen => {
                if let Some(term) = self.try_paren_lambda(start, location)? {
                    Ok(term)
                } else {
                    self.expr_rest(start, location, allow_repeated)
                }
            }
            _ => self.expr_rest(start, location, allow_repeated),
        }
    }

    fn expr_rest(
        &mut self,
        start: usize,
        location: Location,
        allow_repeated: bool,
    ) -> ParseResult<Term> {
        let mut t = self.postfix_expr(allow_repeated)?;
        loop {
            match self.kind() {
                TokenKind::Eq if is_assignable(&t) => {
                    self.advance();
                    self.newlines_opt();
                    let rhs = self.expr(location, false)?;
                    let origin = self.origin_from(start);
                    t = Term::new(
                        TermKind::Assign { lhs: Box::new(t), rhs: Box::new(rhs) },
                        origin,
                    );
                }
                TokenKind::Colon => {
                    self.advance();
                    if self.at(TokenKind::At) {
                        let annots = self.annotations()?;
                        let origin = self.origin_from(start);
                        t = Term::new(
                            TermKind::Annotate { expr: Box::new(t), annots },
                            origin,
                        );
                    } else if self.at(TokenKind::Underscore)
                        && self.cursor.peek().is_soft_kw(soft::STAR)
                    {
                        if !allow_repeated {
                            return Err(
                                self.error_here("repeated argument not allowed here")
                            );
                        }
                        self.advance();
                        self.advance();
                        let origin = self.origin_from(start);
                        t = Term::new(TermKind::Repeated(Box::new(t)), origin);
                    } else {
                        let tpe = if location == Location::NoStat {
                            self.typ()?
                        } else {
                            self.infix_type()?
                        };
                        let origin = self.origin_from(start);
                        t = Term::new(
                            TermKind::Ascribe { expr: Box::new(t), tpe: Box::new(tpe) },
                            origin,
                        );
                    }
                }
                TokenKind::KwMatch => {
                    // Reached only when `match` is not an infix operator.
                    self.advance();
                    let cases = self.case_clauses_block()?;
                    let origin = self.origin_from(start);
                    t = Term::new(TermKind::Match { expr: Box::new(t), cases }, origin);
                }
                TokenKind::RightArrow | TokenKind::CtxArrow => {
                    return self.lambda_rest(start, t, location);
                }
                _ => return Ok(t),
            }
        }
    }

    // ===== Lambdas =====

    /// `t => body`: rewrite the parsed left-hand side into parameters.
    fn lambda_rest(&mut self, start: usize, lhs: Term, location: Location) -> ParseResult<Term> {
        let ctx = self.at(TokenKind::CtxArrow);
        if ctx {
            self.require_dialect(
                self.dialect.allow_context_function_types,
                "context function literals",
            )?;
        }
        self.advance();
        let params = self.convert_to_params(lhs)?;
        let body = self.lambda_body(location)?;
        let origin = self.origin_from(start);
        let kind = if ctx {
            TermKind::ContextFunction { params, body: Box::new(body) }
        } else {
            TermKind::Function { params, body: Box::new(body) }
        };
        Ok(Term::new(kind, origin))
    }

    /// In statement position a lambda body extends to the end of the
    /// enclosing block.
    fn lambda_body(&mut self, location: Location) -> ParseResult<Term> {
        if location == Location::NoStat {
            self.expr_or_indented()
        } else {
            let start = self.cursor.index();
            self.newlines_opt();
            let stats = self.block_stat_seq()?;
            let origin = self.origin_from(start);
            Ok(match single_term_stat(stats) {
                Ok(t) => t,
                Err(stats) => Term::new(TermKind::Block(stats), origin),
            })
        }
    }

    /// The six convertible shapes: `()`, `x`, `(x)`, `x: T`, `(x: T)`,
    /// tuples of those. Anything else is not a legal formal parameter.
    fn convert_to_params(&mut self, t: Term) -> ParseResult<Vec<TermParam>> {
        match t.kind {
            TermKind::Lit(Lit::Unit) => Ok(Vec::new()),
            TermKind::Tuple(items) => {
                let mut params = Vec::new();
                for item in items {
                    params.push(self.convert_to_param(item)?);
                }
                Ok(params)
            }
            _ => Ok(vec![self.convert_to_param(t)?]),
        }
    }

    fn convert_to_param(&mut self, t: Term) -> ParseResult<TermParam> {
        let origin = t.origin.clone();
        match t.kind {
            TermKind::Name(name) => Ok(TermParam {
                mods: Vec::new(),
                name: Some(name),
                tpe: None,
                default: None,
                origin,
            }),
            TermKind::Placeholder => Ok(TermParam {
                mods: Vec::new(),
                name: None,
                tpe: None,
                default: None,
                origin,
            }),
            TermKind::Ascribe { expr, tpe } => match expr.kind {
                TermKind::Name(name) => Ok(TermParam {
                    mods: Vec::new(),
                    name: Some(name),
                    tpe: Some(*tpe),
                    default: None,
                    origin,
                }),
                TermKind::Placeholder => Ok(TermParam {
                    mods: Vec::new(),
                    name: None,
                    tpe: Some(*tpe),
                    default: None,
                    origin,
                }),
                _ => Err(self.error_here("not a legal formal parameter")),
            },
            TermKind::Quasi { .. } => Ok(TermParam {
                mods: Vec::new(),
                name: None,
                tpe: None,
                default: None,
                origin,
            }),
            _ => Err(self.error_here("not a legal formal parameter")),
        }
    }

    /// `implicit x => body`
    fn implicit_lambda(&mut self, start: usize, location: Location) -> ParseResult<Term> {
        self.require_dialect(
            self.dialect.allow_implicit_function_literals,
            "implicit function literals",
        )?;
        let mod_start = self.cursor.index();
        self.accept(TokenKind::KwImplicit)?;
        let implicit_mod = Mod::new(ModKind::Implicit, self.origin_between(mod_start, mod_start + 1));
        let pstart = self.cursor.index();
        let name = if self.accept_opt(TokenKind::Underscore) {
            None
        } else {
            Some(self.ident()?)
        };
        let tpe = if self.accept_opt(TokenKind::Colon) {
            Some(self.infix_type()?)
        } else {
            None
        };
        let param = TermParam {
            mods: vec![implicit_mod],
            name,
            tpe,
            default: None,
            origin: self.origin_from(pstart),
        };
        self.accept(TokenKind::RightArrow)?;
        let body = self.lambda_body(location)?;
        let origin = self.origin_from(start);
        Ok(Term::new(TermKind::Function { params: vec![param], body: Box::new(body) }, origin))
    }

    /// Speculative parse of `(params) =>` including `using`/`implicit`
    /// clauses; rewinds entirely on no-match.
    fn try_paren_lambda(
        &mut self,
        start: usize,
        location: Location,
    ) -> ParseResult<Option<Term>> {
        let params = self.speculate(|p| {
            p.accept(TokenKind::LeftParen)?;
            let modifier = if p.at_soft(soft::USING) && p.dialect.allow_given_using {
                p.advance();
                ClauseMod::Using
            } else if p.at(TokenKind::KwImplicit) {
                p.advance();
                ClauseMod::Implicit
            } else {
                ClauseMod::None
            };
            let mut params = Vec::new();
            if !p.at(TokenKind::RightParen) {
                loop {
                    let pstart = p.cursor.index();
                    let name = if p.accept_opt(TokenKind::Underscore) {
                        None
                    } else if p.at(TokenKind::Ident) && !p.cursor.current().is_operator_ident() {
                        Some(p.ident()?)
                    } else {
                        return Ok(None);
                    };
                    let tpe = if p.accept_opt(TokenKind::Colon) {
                        Some(p.param_type()?)
                    } else {
                        None
                    };
                    let mut mods = Vec::new();
                    if modifier == ClauseMod::Using {
                        mods.push(Mod::new(ModKind::Using, p.origin_between(pstart, pstart)));
                    } else if modifier == ClauseMod::Implicit {
                        mods.push(Mod::new(ModKind::Implicit, p.origin_between(pstart, pstart)));
                    }
                    params.push(TermParam {
                        mods,
                        name,
                        tpe,
                        default: None,
                        origin: p.origin_from(pstart),
                    });
                    if !p.accept_opt(TokenKind::Comma) {
                        break;
                    }
                }
            }
            if !p.at(TokenKind::RightParen) {
                return Ok(None);
            }
            p.advance();
            if matches!(p.kind(), TokenKind::RightArrow | TokenKind::CtxArrow) {
                Ok(Some(params))
            } else {
                Ok(None)
            }
        });
        let params = match params {
            Some(params) => params,
            None => return Ok(None),
        };
        let ctx = self.at(TokenKind::CtxArrow);
        self.advance();
        let body = self.lambda_body(location)?;
        let origin = self.origin_from(start);
        let kind = if ctx {
            TermKind::ContextFunction { params, body: Box::new(body) }
        } else {
            TermKind::Function { params, body: Box::new(body) }
        };
        Ok(Some(Term::new(kind, origin)))
    }

    // ===== Control forms =====

    fn if_expr(&mut self, start: usize) -> ParseResult<Term> {
        self.accept(TokenKind::KwIf)?;
        let cond = self.condition(TokenKind::KwThen)?;
        let then_branch = self.expr_or_indented()?;
        if self.at(TokenKind::Semicolon) && self.cursor.peek_kind() == TokenKind::KwElse {
            self.advance();
        }
        self.newline_opt_when_followed_by(TokenKind::KwElse);
        let else_branch = if self.accept_opt(TokenKind::KwElse) {
            Some(Box::new(self.expr_or_indented()?))
        } else {
            None
        };
        Ok(Term::new(
            TermKind::If {
                cond: Box::new(cond),
                then_branch: Box::new(then_branch),
                else_branch,
            },
            self.origin_from(start),
        ))
    }

    /// A control-form condition: parenthesized, or bare followed by the
    /// given continuation keyword under quiet syntax.
    fn condition(&mut self, continuation: TokenKind) -> ParseResult<Term> {
        if self.at(TokenKind::LeftParen) {
            self.advance();
            let cond = self.expr(Location::NoStat, false)?;
            self.accept(TokenKind::RightParen)?;
            // `if (c) then e` also reads fine under quiet syntax.
            if self.dialect.allow_quiet_syntax {
                self.accept_opt(continuation);
            }
            self.newline_opt();
            Ok(cond)
        } else {
            self.require_dialect(self.dialect.allow_quiet_syntax, "quiet control syntax")?;
            let cond = self.expr(Location::NoStat, false)?;
            self.newline_opt();
            self.accept(continuation)?;
            Ok(cond)
        }
    }

    fn while_expr(&mut self, start: usize) -> ParseResult<Term> {
        self.accept(TokenKind::KwWhile)?;
        let cond = self.condition(TokenKind::KwDo)?;
        let body = self.expr_or_indented()?;
        Ok(Term::new(
            TermKind::While { cond: Box::new(cond), body: Box::new(body) },
            self.origin_from(start),
        ))
    }

    /// `do body while (cond)` (scala2 only).
    fn do_while_expr(&mut self, start: usize) -> ParseResult<Term> {
        self.require_dialect(self.dialect.allow_do_while, "do-while loops")?;
        self.accept(TokenKind::KwDo)?;
        let body = self.expr(Location::NoStat, false)?;
        self.skip_stat_seps();
        self.accept(TokenKind::KwWhile)?;
        self.accept(TokenKind::LeftParen)?;
        let cond = self.expr(Location::NoStat, false)?;
        self.accept(TokenKind::RightParen)?;
        Ok(Term::new(
            TermKind::DoWhile { body: Box::new(body), cond: Box::new(cond) },
            self.origin_from(start),
        ))
    }

    fn try_expr(&mut self, start: usize) -> ParseResult<Term> {
        self.accept(TokenKind::KwTry)?;
        let expr = self.expr_or_indented()?;
        self.newline_opt_when_followed_by(TokenKind::KwCatch);
        let mut catch_cases = Vec::new();
        let mut handler = None;
        if self.accept_opt(TokenKind::KwCatch) {
            if self.at(TokenKind::LeftBrace)
                || self.kind().is_line_end()
                || self.at(TokenKind::KwCase)
            {
                catch_cases = self.case_clauses_block()?;
            } else {
                handler = Some(Box::new(self.expr(Location::NoStat, false)?));
            }
        }
        self.newline_opt_when_followed_by(TokenKind::KwFinally);
        let finally_expr = if self.accept_opt(TokenKind::KwFinally) {
            Some(Box::new(self.expr_or_indented()?))
        } else {
            None
        };
        let origin = self.origin_from(start);
        Ok(match handler {
            Some(handler) => Term::new(
                TermKind::TryWithHandler { expr: Box::new(expr), handler, finally_expr },
                origin,
            ),
            None => Term::new(
                TermKind::Try { expr: Box::new(expr), catch_cases, finally_expr },
                origin,
            ),
        })
    }

    fn for_expr(&mut self, start: usize) -> ParseResult<Term> {
        self.accept(TokenKind::KwFor)?;
        let enums = match self.kind() {
            TokenKind::LeftParen => {
                self.advance();
                let enums = self.enumerators()?;
                self.accept(TokenKind::RightParen)?;
                enums
            }
            TokenKind::LeftBrace => {
                self.advance();
                self.skip_stat_seps();
                let enums = self.enumerators()?;
                self.skip_stat_seps();
                self.accept(TokenKind::RightBrace)?;
                enums
            }
            _ => {
                self.require_dialect(self.dialect.allow_quiet_syntax, "quiet for syntax")?;
                let indented = self.cursor.observe_indented() && self.accept_opt(TokenKind::Indent);
                let enums = self.enumerators()?;
                if indented {
                    if !self.at(TokenKind::Outdent) {
                        self.cursor.observe_outdented();
                    }
                    self.accept_opt(TokenKind::Outdent);
                }
                enums
            }
        };
        self.newlines_opt();
        if self.accept_opt(TokenKind::KwYield) {
            let body = self.expr_or_indented()?;
            Ok(Term::new(
                TermKind::ForYield { enums, body: Box::new(body) },
                self.origin_from(start),
            ))
        } else {
            if self.dialect.allow_quiet_syntax {
                self.accept_opt(TokenKind::KwDo);
            }
            let body = self.expr_or_indented()?;
            Ok(Term::new(
                TermKind::For { enums, body: Box::new(body) },
                self.origin_from(start),
            ))
        }
    }

    fn enumerators(&mut self) -> ParseResult<Vec<Enumerator>> {
        let mut enums = vec![self.enumerator(true)?];
        loop {
            if self.at(TokenKind::KwIf) {
                let gstart = self.cursor.index();
                self.advance();
                let cond = self.postfix_expr(false)?;
                enums.push(Enumerator::new(
                    EnumeratorKind::Guard(cond),
                    self.origin_from(gstart),
                ));
                continue;
            }
            if matches!(self.kind(), TokenKind::Semicolon | TokenKind::LF | TokenKind::LFLF) {
                self.skip_stat_seps();
                if self.cursor.current().is_closing()
                    || matches!(self.kind(), TokenKind::KwYield | TokenKind::KwDo)
                {
                    break;
                }
                enums.push(self.enumerator(false)?);
                continue;
            }
            break;
        }
        Ok(enums)
    }

    fn enumerator(&mut self, is_first: bool) -> ParseResult<Enumerator> {
        let start = self.cursor.index();
        if self.at(TokenKind::KwIf) {
            self.advance();
            let cond = self.postfix_expr(false)?;
            return Ok(Enumerator::new(EnumeratorKind::Guard(cond), self.origin_from(start)));
        }
        if self.at(TokenKind::KwCase) {
            self.advance();
            let pat = self.pattern1(PatMode::NoSeq)?;
            self.accept(TokenKind::LeftArrow)?;
            let rhs = self.expr(Location::NoStat, false)?;
            return Ok(Enumerator::new(
                EnumeratorKind::CaseGenerator { pat, rhs },
                self.origin_from(start),
            ));
        }
        if self.at(TokenKind::KwVal) {
            // `val x = rhs` enumerators survive only as a deprecated spelling.
            self.deprecation("`val` keyword in for comprehension is deprecated");
            self.advance();
        }
        let pat = self.pattern1(PatMode::NoSeq)?;
        match self.kind() {
            TokenKind::LeftArrow => {
                self.advance();
                let rhs = self.expr(Location::NoStat, false)?;
                Ok(Enumerator::new(
                    EnumeratorKind::Generator { pat, rhs },
                    self.origin_from(start),
                ))
            }
            TokenKind::Eq => {
                if is_first {
                    return Err(self.error_here("`<-` expected"));
                }
                self.advance();
                let rhs = self.expr(Location::NoStat, false)?;
                Ok(Enumerator::new(EnumeratorKind::Val { pat, rhs }, self.origin_from(start)))
            }
            _ => Err(self.expected_error("`<-`")),
        }
    }

    // ===== Postfix / infix chain =====

    fn postfix_expr(&mut self, allow_repeated: bool) -> ParseResult<Term> {
        let ctx = TermInfixContext;
        let start = self.cursor.index();
        let mut stack: Vec<UnfinishedInfix<Term>> = Vec::new();
        let mut rhs_start = start;
        let mut rhs: Vec<Term> = vec![self.prefix_expr(allow_repeated)?];

        loop {
            // Leading infix operator on a continuation line.
            if self.kind().is_line_end()
                && self.cursor.peek().is_leading_infix_candidate(&self.dialect)
            {
                let snapshot = self.cursor.fork();
                self.newlines_opt();
                if !(self.at(TokenKind::Ident) && self.cursor.current().is_operator_ident()) {
                    self.cursor.restore(snapshot);
                }
            }

            if self.at(TokenKind::KwMatch) && self.dialect.allow_match_as_operator {
                let op_offset = self.current_offset();
                let rhs_end = self.cursor.end_index();
                rhs = reduce_stack(&ctx, self, &mut stack, 0, rhs, rhs_end, Some("match"))?;
                let lhs = ctx.to_lhs(self, rhs, rhs_start);
                let lhs_start = lhs.origin.span.start.min(rhs_start);
                stack.push(UnfinishedInfix {
                    lhs_start,
                    lhs,
                    op: "match".to_string(),
                    op_offset,
                    targs: Vec::new(),
                });
                self.advance();
                rhs_start = self.cursor.index();
                let cstart = self.cursor.index();
                let cases = self.case_clauses_block()?;
                let pf = Term::new(
                    TermKind::PartialFunction(cases),
                    self.origin_from(cstart),
                );
                rhs = vec![pf];
                continue;
            }

            if !self.at(TokenKind::Ident) {
                break;
            }

            // `xs*` vararg splice.
            if self.at_soft(soft::STAR)
                && allow_repeated
                && self.dialect.allow_postfix_star_vararg_splices
                && matches!(
                    self.cursor.peek_kind(),
                    TokenKind::RightParen | TokenKind::Comma | TokenKind::EOF
                )
            {
                self.advance();
                let rhs_end = self.cursor.end_index();
                let reduced = reduce_stack(&ctx, self, &mut stack, 0, rhs, rhs_end, None)?;
                let inner = ctx.to_lhs(self, reduced, start);
                let origin = self.origin_from(start);
                return Ok(Term::new(TermKind::Repeated(Box::new(inner)), origin));
            }

            let op = op_name(&self.current_text());
            let op_offset = self.current_offset();
            let rhs_end = self.cursor.end_index();
            self.advance();

            let mut targs = Vec::new();
            if self.at(TokenKind::LeftBracket) {
                targs = self.type_args()?;
            }
            self.newline_opt();

            if !self.at_expr_intro() {
                // Postfix position: `t op` selects; type application is
                // disallowed here.
                if !targs.is_empty() {
                    return Err(self.error_here(
                        "type application is not allowed in postfix position",
                    ));
                }
                let reduced = reduce_stack(&ctx, self, &mut stack, 0, rhs, rhs_end, None)?;
                let lhs = ctx.to_lhs(self, reduced, start);
                let origin = self.origin_from(start);
                rhs = vec![Term::new(
                    TermKind::Select { qual: Box::new(lhs), name: op },
                    origin,
                )];
                rhs_start = start;
                continue;
            }

            rhs = reduce_stack(&ctx, self, &mut stack, 0, rhs, rhs_end, Some(&op))?;
            let lhs = ctx.to_lhs(self, rhs, rhs_start);
            let lhs_start = lhs.origin.span.start.min(rhs_start);
            stack.push(UnfinishedInfix { lhs_start, lhs, op, op_offset, targs });
            rhs_start = self.cursor.index();
            rhs = self.argument_exprs_or_prefix_expr()?;
        }

        let rhs_end = self.cursor.end_index();
        let reduced = reduce_stack(&ctx, self, &mut stack, 0, rhs, rhs_end, None)?;
        Ok(ctx.to_lhs(self, reduced, start))
    }

    /// Right-hand side of an infix operator: an argument list when braces
    /// or parens follow, otherwise a prefix expression.
    fn argument_exprs_or_prefix_expr(&mut self) -> ParseResult<Vec<Term>> {
        match self.kind() {
            TokenKind::LeftBrace => {
                let arg = self.block_expr()?;
                Ok(vec![arg])
            }
            TokenKind::LeftParen => {
                let start = self.cursor.index();
                let (args, using) = self.argument_exprs()?;
                if using {
                    return Err(self.error_here("`using` is not allowed here"));
                }
                // If a postfix suffix follows, the parens were grouping.
                if matches!(
                    self.kind(),
                    TokenKind::Dot | TokenKind::LeftBracket | TokenKind::LeftParen
                        | TokenKind::LeftBrace | TokenKind::Underscore
                ) {
                    let inner = self.args_to_term(args, start);
                    let t = self.simple_expr_rest(start, inner)?;
                    return Ok(vec![t]);
                }
                Ok(args)
            }
            _ => Ok(vec![self.prefix_expr(false)?]),
        }
    }

    fn args_to_term(&self, mut args: Vec<Term>, start: usize) -> Term {
        match args.len() {
            0 => Term::new(TermKind::Lit(Lit::Unit), self.origin_from(start)),
            1 => match args.pop() {
                Some(t) => t,
                None => Term::new(TermKind::Lit(Lit::Unit), self.origin_from(start)),
            },
            _ => Term::new(TermKind::Tuple(args), self.origin_from(start)),
        }
    }

    fn prefix_expr(&mut self, allow_repeated: bool) -> ParseResult<Term> {
        let start = self.cursor.index();
        if self.at(TokenKind::Ident) {
            let text = self.current_text();
            if matches!(&*text, "-" | "+" | "~" | "!") {
                if &*text == "-"
                    && matches!(
                        self.cursor.peek_kind(),
                        TokenKind::IntLit
                            | TokenKind::LongLit
                            | TokenKind::FloatLit
                            | TokenKind::DoubleLit
                    )
                {
                    self.advance();
                    let lit = self.negated_literal()?;
                    let t = Term::new(TermKind::Lit(lit), self.origin_from(start));
                    return self.simple_expr_rest(start, t);
                }
                self.advance();
                let arg = self.simple_expr(allow_repeated)?;
                let origin = self.origin_from(start);
                return Ok(Term::new(
                    TermKind::ApplyUnary { op: text.to_string(), arg: Box::new(arg) },
                    origin,
                ));
            }
        }
        self.simple_expr(allow_repeated)
    }

    fn simple_expr(&mut self, _allow_repeated: bool) -> ParseResult<Term> {
        let start = self.cursor.index();
        let t = match self.kind() {
            k if k.is_literal() => {
                let lit = self.literal()?;
                Term::new(TermKind::Lit(lit), self.origin_from(start))
            }
            TokenKind::InterpolationId => {
                let (prefix, parts, args) =
                    self.interpolate_parts(|p| p.splice_term_arg())?;
                Term::new(
                    TermKind::Interpolate { prefix, parts, args },
                    self.origin_from(start),
                )
            }
            TokenKind::XmlStart => {
                self.require_dialect(self.dialect.allow_xml_literals, "XML literals")?;
                let (parts, args) = self.xml_parts(|p| p.expr(Location::NoStat, false))?;
                Term::new(TermKind::Xml { parts, args }, self.origin_from(start))
            }
            TokenKind::Ident | TokenKind::KwThis | TokenKind::KwSuper => {
                self.path_start_term()?
            }
            TokenKind::Underscore => {
                self.advance();
                Term::new(TermKind::Placeholder, self.origin_from(start))
            }
            TokenKind::LeftParen => {
                self.advance();
                let mut items = Vec::new();
                if !self.at(TokenKind::RightParen) {
                    items.push(self.expr(Location::NoStat, false)?);
                    while self.accept_opt(TokenKind::Comma) {
                        items.push(self.expr(Location::NoStat, false)?);
                    }
                }
                self.accept(TokenKind::RightParen)?;
                self.args_to_term(items, start)
            }
            TokenKind::LeftBrace => self.block_expr()?,
            TokenKind::Indent => {
                self.advance();
                let stats = self.block_stat_seq()?;
                self.accept_outdent()?;
                Term::new(TermKind::Block(stats), self.origin_from(start))
            }
            TokenKind::KwNew => self.new_expr(start)?,
            TokenKind::MacroQuote => self.quoted_expr(start)?,
            TokenKind::MacroSplice => self.spliced_expr(start)?,
            TokenKind::Unquote => {
                let (rank, tree) = self.unquote_tree()?;
                Term::new(
                    TermKind::Quasi { rank, tree: Box::new(tree) },
                    self.origin_from(start),
                )
            }
            TokenKind::Ellipsis => {
                let (rank, tree) = self.ellipsis_unquote()?;
                Term::new(
                    TermKind::Quasi { rank, tree: Box::new(tree) },
                    self.origin_from(start),
                )
            }
            _ => return Err(self.expected_error("expression")),
        };
        self.simple_expr_rest(start, t)
    }

    /// `this`, `super[mix]`, or an identifier; selections and applications
    /// continue in `simple_expr_rest`.
    fn path_start_term(&mut self) -> ParseResult<Term> {
        let start = self.cursor.index();
        match self.kind() {
            TokenKind::KwThis => {
                self.advance();
                Ok(Term::new(TermKind::This { qual: None }, self.origin_from(start)))
            }
            TokenKind::KwSuper => {
                self.advance();
                let super_qual = if self.accept_opt(TokenKind::LeftBracket) {
                    let q = self.ident()?;
                    self.accept(TokenKind::RightBracket)?;
                    Some(q)
                } else {
                    None
                };
                Ok(Term::new(
                    TermKind::Super { this_qual: None, super_qual },
                    self.origin_from(start),
                ))
            }
            _ => {
                let name = self.ident()?;
                Ok(Term::new(TermKind::Name(name), self.origin_from(start)))
            }
        }
    }

    /// A stable dotted path: `a.b.C`, `this.x`, `super[M].y`. Stops before
    /// anything that is not a plain selection.
    fn path_term(&mut self) -> ParseResult<Term> {
        let start = self.cursor.index();
        let mut t = self.path_start_term()?;
        while self.at(TokenKind::Dot) && self.cursor.peek_kind() == TokenKind::Ident {
            self.advance();
            let name = self.ident()?;
            let origin = self.origin_from(start);
            t = Term::new(TermKind::Select { qual: Box::new(t), name }, origin);
        }
        Ok(t)
    }

    fn simple_expr_rest(&mut self, start: usize, mut t: Term) -> ParseResult<Term> {
        loop {
            self.newline_opt_when_followed_by(TokenKind::LeftBrace);
            match self.kind() {
                TokenKind::Dot => {
                    match self.cursor.peek_kind() {
                        TokenKind::Ident => {
                            self.advance();
                            let name = self.ident()?;
                            let origin = self.origin_from(start);
                            t = Term::new(
                                TermKind::Select { qual: Box::new(t), name },
                                origin,
                            );
                        }
                        TokenKind::KwThis => {
                            self.advance();
                            self.advance();
                            let qual = match &t.kind {
                                TermKind::Name(n) => Some(n.clone()),
                                _ => None,
                            };
                            let origin = self.origin_from(start);
                            t = Term::new(TermKind::This { qual }, origin);
                        }
                        TokenKind::KwSuper => {
                            self.advance();
                            self.advance();
                            let this_qual = match &t.kind {
                                TermKind::Name(n) => Some(n.clone()),
                                _ => None,
                            };
                            let super_qual = if self.accept_opt(TokenKind::LeftBracket) {
                                let q = self.ident()?;
                                self.accept(TokenKind::RightBracket)?;
                                Some(q)
                            } else {
                                None
                            };
                            let origin = self.origin_from(start);
                            t = Term::new(TermKind::Super { this_qual, super_qual }, origin);
                        }
                        _ => return Ok(t),
                    }
                }
                TokenKind::LeftBracket => {
                    let targs = self.type_args()?;
                    let origin = self.origin_from(start);
                    t = Term::new(TermKind::ApplyType { fun: Box::new(t), targs }, origin);
                }
                TokenKind::LeftParen => {
                    let (args, using) = self.argument_exprs()?;
                    let origin = self.origin_from(start);
                    t = if using {
                        Term::new(TermKind::ApplyUsing { fun: Box::new(t), args }, origin)
                    } else {
                        Term::new(TermKind::Apply { fun: Box::new(t), args }, origin)
                    };
                }
                TokenKind::LeftBrace => {
                    let arg = self.block_expr()?;
                    let origin = self.origin_from(start);
                    t = Term::new(
                        TermKind::Apply { fun: Box::new(t), args: vec![arg] },
                        origin,
                    );
                }
                TokenKind::Underscore => {
                    if !self.dialect.allow_postfix_eta {
                        self.deprecation(
                            "`<function> _` eta-expansion is no longer supported",
                        );
                    }
                    self.advance();
                    let origin = self.origin_from(start);
                    t = Term::new(TermKind::Eta(Box::new(t)), origin);
                    return Ok(t);
                }
                _ => return Ok(t),
            }
        }
    }

    /// `( [exprs] )` argument list; a leading `using` marks the clause.
    fn argument_exprs(&mut self) -> ParseResult<(Vec<Term>, bool)> {
        self.accept(TokenKind::LeftParen)?;
        let mut using = false;
        if self.at_soft(soft::USING) && self.dialect.allow_given_using {
            // `using` binds the whole clause only when an expression follows.
            if self.cursor.peek().is_expr_intro(&self.dialect) {
                using = true;
                self.advance();
            }
        }
        let mut args = Vec::new();
        if !self.at(TokenKind::RightParen) {
            args.push(self.expr(Location::NoStat, true)?);
            while self.accept_opt(TokenKind::Comma) {
                args.push(self.expr(Location::NoStat, true)?);
            }
        }
        self.accept(TokenKind::RightParen)?;
        Ok((args, using))
    }

    /// `{ ... }`: a partial function when the body starts with `case`,
    /// otherwise a block.
    fn block_expr(&mut self) -> ParseResult<Term> {
        let start = self.cursor.index();
        self.accept(TokenKind::LeftBrace)?;
        self.skip_stat_seps();
        let t = if self.at(TokenKind::KwCase) && !self.case_starts_defn() {
            let cases = self.case_clauses()?;
            Term::new(TermKind::PartialFunction(cases), self.origin_from(start))
        } else {
            let stats = self.block_stat_seq()?;
            Term::new(TermKind::Block(stats), self.origin_from(start))
        };
        self.accept(TokenKind::RightBrace)?;
        Ok(t)
    }

    /// `case` at block start could also begin a `case class` definition.
    fn case_starts_defn(&self) -> bool {
        matches!(
            self.cursor.peek_kind(),
            TokenKind::KwClass | TokenKind::KwObject
        )
    }

    /// Case clauses in braces or in an indented region.
    fn case_clauses_block(&mut self) -> ParseResult<Vec<Case>> {
        if self.at(TokenKind::LeftBrace) {
            self.advance();
            self.skip_stat_seps();
            let cases = self.case_clauses()?;
            self.accept(TokenKind::RightBrace)?;
            return Ok(cases);
        }
        if self.dialect.allow_significant_indentation {
            if self.kind().is_line_end() {
                self.cursor.observe_indented();
            }
            if self.accept_opt(TokenKind::Indent) {
                let cases = self.case_clauses()?;
                self.accept_outdent()?;
                return Ok(cases);
            }
            if self.at(TokenKind::KwCase) {
                // Single case on the same line: `catch case e => ...`.
                let start = self.cursor.index();
                self.advance();
                return Ok(vec![self.case_clause_rest(start)?]);
            }
        }
        Err(self.expected_error("`{`"))
    }

    fn case_clauses(&mut self) -> ParseResult<Vec<Case>> {
        let mut cases = Vec::new();
        loop {
            self.skip_stat_seps();
            if !self.at(TokenKind::KwCase) {
                break;
            }
            let start = self.cursor.index();
            self.advance();
            if self.at(TokenKind::Ellipsis) || self.at(TokenKind::Unquote) {
                let (rank, tree) = if self.at(TokenKind::Ellipsis) {
                    self.ellipsis_unquote()?
                } else {
                    self.unquote_tree()?
                };
                if self.at(TokenKind::RightArrow) {
                    // `case $pat => body` is a full clause, not a case quasi.
                    let pat = Pat::new(
                        PatKind::Quasi { rank, tree: Box::new(tree) },
                        self.origin_from(start),
                    );
                    cases.push(self.case_clause_with_pat(start, pat)?);
                } else {
                    cases.push(Case::new(
                        CaseKind::Quasi { rank, tree: Box::new(tree) },
                        self.origin_from(start),
                    ));
                }
                continue;
            }
            cases.push(self.case_clause_rest(start)?);
        }
        if cases.is_empty() {
            return Err(self.error_here("match statement requires cases"));
        }
        Ok(cases)
    }

    fn case_clause_rest(&mut self, start: usize) -> ParseResult<Case> {
        let pat = self.pattern(PatMode::NoSeq)?;
        self.case_clause_with_pat(start, pat)
    }

    fn case_clause_with_pat(&mut self, start: usize, pat: Pat) -> ParseResult<Case> {
        let cond = if self.accept_opt(TokenKind::KwIf) {
            Some(self.postfix_expr(false)?)
        } else {
            None
        };
        self.accept(TokenKind::RightArrow)?;
        let body = self.case_body()?;
        Ok(Case::new(CaseKind::Clause { pat, cond, body }, self.origin_from(start)))
    }

    /// A case body: statements until the next `case`, closing token, or
    /// dedent.
    fn case_body(&mut self) -> ParseResult<Term> {
        let start = self.cursor.index();
        if self.dialect.allow_significant_indentation && self.kind().is_line_end() {
            if self.cursor.in_indent_region()
                && self.cursor.indentation_after_newline() <= self.cursor.current_region_width()
            {
                // Dedent right after `=>`: the body is empty.
                let origin = self.origin_from(start);
                return Ok(Term::new(TermKind::Block(Vec::new()), origin));
            }
            self.cursor.observe_indented();
            if self.accept_opt(TokenKind::Indent) {
                let stats = self.stat_seq_until(|k| {
                    matches!(k, TokenKind::Outdent | TokenKind::KwCase | TokenKind::EOF)
                })?;
                if !self.at(TokenKind::Outdent) {
                    self.cursor.observe_outdented();
                }
                self.accept_opt(TokenKind::Outdent);
                let origin = self.origin_from(start);
                return Ok(match single_term_stat(stats) {
                    Ok(t) => t,
                    Err(stats) => Term::new(TermKind::Block(stats), origin),
                });
            }
        }
        self.newlines_opt();
        let stats = self.stat_seq_until(|k| {
            matches!(
                k,
                TokenKind::KwCase
                    | TokenKind::RightBrace
                    | TokenKind::Outdent
                    | TokenKind::EOF
            )
        })?;
        let origin = self.origin_from(start);
        Ok(match single_term_stat(stats) {
            Ok(t) => t,
            Err(stats) => Term::new(TermKind::Block(stats), origin),
        })
    }

    // ===== New, quote, splice, unquote =====

    fn new_expr(&mut self, start: usize) -> ParseResult<Term> {
        self.accept(TokenKind::KwNew)?;
        if self.at(TokenKind::LeftBrace) {
            let templ = self.template_body(TemplateOwner::Class, Vec::new(), start)?;
            return Ok(Term::new(TermKind::NewAnonymous(templ), self.origin_from(start)));
        }
        let init = self.init()?;
        self.newline_opt_when_followed_by(TokenKind::LeftBrace);
        if self.at(TokenKind::KwWith) || self.at(TokenKind::LeftBrace) {
            let mut inits = vec![init];
            while self.accept_opt(TokenKind::KwWith) {
                inits.push(self.init()?);
            }
            let templ = self.template_body(TemplateOwner::Class, inits, start)?;
            return Ok(Term::new(TermKind::NewAnonymous(templ), self.origin_from(start)));
        }
        Ok(Term::new(TermKind::New(init), self.origin_from(start)))
    }

    /// `'{ expr }` / `'[ type ]`
    fn quoted_expr(&mut self, start: usize) -> ParseResult<Term> {
        self.require_dialect(self.dialect.allow_quotes_and_splices, "quoted expressions")?;
        self.accept(TokenKind::MacroQuote)?;
        self.quoted_expr_depth += 1;
        trace!(
            quoted = self.quoted_expr_depth,
            quoted_pat = self.quoted_pat_depth,
            "enter quote"
        );
        let result = (|p: &mut Self| match p.kind() {
            TokenKind::LeftBrace => {
                let block = p.block_expr()?;
                Ok(Term::new(
                    TermKind::QuotedExpr(Box::new(block)),
                    p.origin_from(start),
                ))
            }
            TokenKind::LeftBracket => {
                p.advance();
                let tpe = p.typ()?;
                p.accept(TokenKind::RightBracket)?;
                Ok(Term::new(
                    TermKind::QuotedType(Box::new(tpe)),
                    p.origin_from(start),
                ))
            }
            _ => Err(p.expected_error("`{` or `[`")),
        })(self);
        self.quoted_expr_depth -= 1;
        result
    }

    /// `${ expr }`
    fn spliced_expr(&mut self, start: usize) -> ParseResult<Term> {
        self.require_dialect(self.dialect.allow_quotes_and_splices, "spliced expressions")?;
        self.accept(TokenKind::MacroSplice)?;
        let block = self.block_expr()?;
        Ok(Term::new(TermKind::SplicedExpr(Box::new(block)), self.origin_from(start)))
    }

    /// `$x` / `${ ... }` quasiquote unquote; returns `(rank, tree)`.
    fn unquote_tree(&mut self) -> ParseResult<(u8, Term)> {
        self.require_dialect(self.dialect.allow_unquotes, "unquotes")?;
        self.accept(TokenKind::Unquote)?;
        match self.kind() {
            TokenKind::Ident => {
                let start = self.cursor.index();
                let name = self.ident()?;
                Ok((0, Term::new(TermKind::Name(name), self.origin_from(start))))
            }
            TokenKind::LeftBrace => {
                let tree = self.block_expr()?;
                Ok((0, tree))
            }
            _ => Err(self.expected_error("identifier or `{`")),
        }
    }

    /// `..$xs` / `...$xss`
    fn ellipsis_unquote(&mut self) -> ParseResult<(u8, Term)> {
        self.require_dialect(self.dialect.allow_unquotes, "unquotes")?;
        let dots = self.current_text().len();
        self.accept(TokenKind::Ellipsis)?;
        let (_, tree) = self.unquote_tree()?;
        Ok(((dots.saturating_sub(1)) as u8, tree))
    }

    // ===== Interpolation and XML =====

    /// Shared interpolation machinery; `f` parses one spliced argument.
    fn interpolate_parts<T>(
        &mut self,
        f: impl Fn(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<(String, Vec<Lit>, Vec<T>)> {
        let prefix = self.current_text().to_string();
        self.accept(TokenKind::InterpolationId)?;
        self.accept(TokenKind::InterpolationStart)?;
        let mut parts: Vec<Lit> = Vec::new();
        let mut args: Vec<T> = Vec::new();
        loop {
            match self.kind() {
                TokenKind::InterpolationPart => {
                    let value = match &self.cursor.current().payload {
                        scala_token::Payload::Str(s) => Arc::clone(s),
                        _ => Arc::from(&*self.current_text()),
                    };
                    parts.push(Lit::String(value));
                    self.advance();
                }
                TokenKind::InterpolationSpliceStart => {
                    if parts.len() == args.len() {
                        parts.push(Lit::String(Arc::from("")));
                    }
                    self.advance();
                    args.push(f(self)?);
                    self.accept(TokenKind::InterpolationSpliceEnd)?;
                }
                TokenKind::InterpolationEnd => {
                    if parts.len() == args.len() {
                        parts.push(Lit::String(Arc::from("")));
                    }
                    self.advance();
                    return Ok((prefix, parts, args));
                }
                _ => return Err(self.expected_error("interpolation part")),
            }
        }
    }

    /// One spliced term argument: `$name`, `$this`, or `${ block }`.
    fn splice_term_arg(&mut self) -> ParseResult<Term> {
        let start = self.cursor.index();
        match self.kind() {
            TokenKind::Ident => {
                let name = self.ident()?;
                Ok(Term::new(TermKind::Name(name), self.origin_from(start)))
            }
            TokenKind::KwThis => {
                self.advance();
                Ok(Term::new(TermKind::This { qual: None }, self.origin_from(start)))
            }
            TokenKind::LeftBrace => self.block_expr(),
            TokenKind::Unquote => {
                let (rank, tree) = self.unquote_tree()?;
                Ok(Term::new(
                    TermKind::Quasi { rank, tree: Box::new(tree) },
                    self.origin_from(start),
                ))
            }
            _ => Err(self.expected_error("identifier, `this`, or `{`")),
        }
    }

    /// Shared XML machinery; `f` parses one spliced scala argument.
    fn xml_parts<T>(
        &mut self,
        f: impl Fn(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<(Vec<Lit>, Vec<T>)> {
        self.accept(TokenKind::XmlStart)?;
        let mut parts: Vec<Lit> = Vec::new();
        let mut args: Vec<T> = Vec::new();
        loop {
            match self.kind() {
                TokenKind::XmlPart => {
                    let value = match &self.cursor.current().payload {
                        scala_token::Payload::Str(s) => Arc::clone(s),
                        _ => Arc::from(&*self.current_text()),
                    };
                    parts.push(Lit::String(value));
                    self.advance();
                }
                TokenKind::XmlSpliceStart => {
                    if parts.len() == args.len() {
                        parts.push(Lit::String(Arc::from("")));
                    }
                    self.advance();
                    args.push(f(self)?);
                    self.accept(TokenKind::XmlSpliceEnd)?;
                }
                TokenKind::XmlEnd => {
                    if parts.len() == args.len() {
                        parts.push(Lit::String(Arc::from("")));
                    }
                    self.advance();
                    return Ok((parts, args));
                }
                _ => return Err(self.expected_error("XML part")),
            }
        }
    }

    // ===== Literals =====

    fn literal(&mut self) -> ParseResult<Lit> {
        let token = self.cursor.current().clone();
        let lit = match token.kind {
            TokenKind::IntLit => match token.payload {
                scala_token::Payload::Int(v) => {
                    if v < 0 {
                        // Only the negated spelling may reach the sign bit.
                        return Err(self.numeric_out_of_range(&token, "Int"));
                    }
                    Lit::Int(v)
                }
                _ => return Err(self.error_here("malformed integer literal")),
            },
            TokenKind::LongLit => match token.payload {
                scala_token::Payload::Long(v) => {
                    if v < 0 && !token.text.starts_with("0x") && !token.text.starts_with("0X") {
                        return Err(self.numeric_out_of_range(&token, "Long"));
                    }
                    Lit::Long(v)
                }
                _ => return Err(self.error_here("malformed long literal")),
            },
            TokenKind::FloatLit => match token.payload {
                scala_token::Payload::Float(v) => Lit::Float(v),
                _ => return Err(self.error_here("malformed float literal")),
            },
            TokenKind::DoubleLit => match token.payload {
                scala_token::Payload::Double(v) => Lit::Double(v),
                _ => return Err(self.error_here("malformed double literal")),
            },
            TokenKind::CharLit => match token.payload {
                scala_token::Payload::Char(c) => Lit::Char(c),
                _ => return Err(self.error_here("malformed character literal")),
            },
            TokenKind::StringLit => match &token.payload {
                scala_token::Payload::Str(s) => Lit::String(Arc::clone(s)),
                _ => return Err(self.error_here("malformed string literal")),
            },
            TokenKind::SymbolLit => match &token.payload {
                scala_token::Payload::Str(s) => Lit::Symbol(Arc::clone(s)),
                _ => return Err(self.error_here("malformed symbol literal")),
            },
            TokenKind::KwTrue => Lit::Bool(true),
            TokenKind::KwFalse => Lit::Bool(false),
            TokenKind::KwNull => Lit::Null,
            _ => return Err(self.expected_error("literal")),
        };
        self.advance();
        Ok(lit)
    }

    /// A literal right after unary minus; the sign folds into the value so
    /// `-2147483648` stays in range.
    fn negated_literal(&mut self) -> ParseResult<Lit> {
        let token = self.cursor.current().clone();
        let lit = match token.kind {
            TokenKind::IntLit => match token.payload {
                scala_token::Payload::Int(v) => Lit::Int(v.wrapping_neg()),
                _ => return Err(self.error_here("malformed integer literal")),
            },
            TokenKind::LongLit => match token.payload {
                scala_token::Payload::Long(v) => Lit::Long(v.wrapping_neg()),
                _ => return Err(self.error_here("malformed long literal")),
            },
            TokenKind::FloatLit => match token.payload {
                scala_token::Payload::Float(v) => Lit::Float(-v),
                _ => return Err(self.error_here("malformed float literal")),
            },
            TokenKind::DoubleLit => match token.payload {
                scala_token::Payload::Double(v) => Lit::Double(-v),
                _ => return Err(self.error_here("malformed double literal")),
            },
            _ => return Err(self.expected_error("numeric literal")),
        };
        self.advance();
        Ok(lit)
    }

    fn numeric_out_of_range(&mut self, token: &Token, target: &'static str) -> ParseError {
        let message = format!("integer number too large for {}", target);
        self.report_error(message);
        ParseError::NumericOutOfRange {
            kind: "integer",
            literal: token.text.to_string(),
            target,
            offset: token.span.start,
        }
    }

    // ===== Indented bodies =====

    /// An expression, or an indented block when the next line opens one.
    fn expr_or_indented(&mut self) -> ParseResult<Term> {
        if self.dialect.allow_significant_indentation
            && self.kind().is_line_end()
            && self.cursor.observe_indented()
        {
            let start = self.cursor.index();
            self.accept(TokenKind::Indent)?;
            let stats = self.block_stat_seq()?;
            self.accept_outdent()?;
            let origin = self.origin_from(start);
            return Ok(match single_term_stat(stats) {
                Ok(t) => t,
                Err(stats) => Term::new(TermKind::Block(stats), origin),
            });
        }
        self.newline_opt();
        self.expr(Location::NoStat, false)
    }
}

/// True if `t` can stand on the left of `=`.
fn is_assignable(t: &Term) -> bool {
    matches!(
        t.kind,
        TermKind::Name(_)
            | TermKind::Select { .. }
            | TermKind::Apply { .. }
            | TermKind::ApplyType { .. }
            | TermKind::Quasi { .. }
    )
}

/// Unwrap a single expression statement; hand back the stats otherwise.
fn single_term_stat(mut stats: Vec<Stat>) -> Result<Term, Vec<Stat>> {
    if stats.len() == 1 {
        match stats.pop() {
            Some(Stat::Term(t)) => Ok(t),
            Some(other) => Err(vec![other]),
            None => Err(Vec::new()),
        }
    } else {
        Err(stats)
    }
}
