impl Parser {
    // ===== Entry: Type =====

    /// `Type ::= FunTypeParams '=>' Type | InfixType ['=>' Type | 'forSome' ... | 'match' ...]`
    fn typ(&mut self) -> ParseResult<Type> {
        self.with_recursion_guard(|p| p.typ_impl())
    }

    fn typ_impl(&mut self) -> ParseResult<Type> {
        let start = self.cursor.index();

        if self.at(TokenKind::LeftBracket) && self.dialect.allow_type_lambdas {
            return self.type_lambda_or_poly_function(start);
        }

        if self.at(TokenKind::LeftParen) {
            return self.paren_type(start);
        }

        let t = self.infix_type()?;
        self.typ_suffix(start, t)
    }

    fn typ_suffix(&mut self, start: usize, mut t: Type) -> ParseResult<Type> {
        loop {
            match self.kind() {
                TokenKind::RightArrow => {
                    self.advance();
                    let res = self.typ()?;
                    let origin = self.origin_from(start);
                    t = Type::new(
                        TypeKind::Function { params: vec![t], res: Box::new(res) },
                        origin,
                    );
                }
                TokenKind::CtxArrow => {
                    self.require_dialect(
                        self.dialect.allow_context_function_types,
                        "context function types",
                    )?;
                    self.advance();
                    let res = self.typ()?;
                    let origin = self.origin_from(start);
                    t = Type::new(
                        TypeKind::ContextFunction { params: vec![t], res: Box::new(res) },
                        origin,
                    );
                }
                TokenKind::KwForsome => {
                    self.require_dialect(
                        self.dialect.allow_existential_types,
                        "existential types",
                    )?;
                    self.advance();
                    let stats = self.refinement_stats()?;
                    let origin = self.origin_from(start);
                    t = Type::new(
                        TypeKind::Existential { tpe: Box::new(t), stats },
                        origin,
                    );
                }
                TokenKind::KwMatch if self.dialect.allow_match_types => {
                    self.advance();
                    let cases = self.type_case_clauses()?;
                    let origin = self.origin_from(start);
                    t = Type::new(TypeKind::Match { tpe: Box::new(t), cases }, origin);
                }
                _ => return Ok(t),
            }
        }
    }

    /// `[X, Y] =>> T` (type lambda) or `[X, Y] => T` (polymorphic function
    /// type, whose body must itself be a function type).
    fn type_lambda_or_poly_function(&mut self, start: usize) -> ParseResult<Type> {
        let tparams = self.type_param_clause(true)?;
        match self.kind() {
            TokenKind::TypeLambdaArrow => {
                self.advance();
                let body = self.typ()?;
                let origin = self.origin_from(start);
                Ok(Type::new(TypeKind::Lambda { tparams, body: Box::new(body) }, origin))
            }
            TokenKind::RightArrow => {
                self.advance();
                let res = self.typ()?;
                if !matches!(
                    res.kind,
                    TypeKind::Function { .. }
                        | TypeKind::ContextFunction { .. }
                        | TypeKind::PolyFunction { .. }
                ) {
                    return Err(self.error_here(
                        "polymorphic function types must have a value parameter",
                    ));
                }
                let origin = self.origin_from(start);
                Ok(Type::new(
                    TypeKind::PolyFunction { tparams, res: Box::new(res) },
                    origin,
                ))
            }
            _ => Err(self.expected_error("`=>>` or `=>`")),
        }
    }

    /// Parenthesized type: tuple, function, or dependent function.
    ///
    /// Each comma-separated element is either a typed parameter
    /// (`name: Type`) or a plain type; the two forms may not mix. An arrow
    /// after `)` produces a function type; without one the elements must be
    /// plain types forming a tuple (or a grouped single type).
    fn paren_type(&mut self, start: usize) -> ParseResult<Type> {
        self.accept(TokenKind::LeftParen)?;
        let mut plain: Vec<Type> = Vec::new();
        let mut typed: Vec<TermParam> = Vec::new();
        if !self.at(TokenKind::RightParen) {
            loop {
                let elem_start = self.cursor.index();
                if self.at(TokenKind::Ident)
                    && self.cursor.peek_kind() == TokenKind::Colon
                    && !self.cursor.current().is_operator_ident()
                {
                    self.require_dialect(
                        self.dialect.allow_dependent_function_types,
                        "dependent function types",
                    )?;
                    if !plain.is_empty() {
                        return Err(self.error_here(
                            "can't mix function type and dependent function type syntaxes",
                        ));
                    }
                    let name = self.ident()?;
                    self.accept(TokenKind::Colon)?;
                    let tpe = self.typ()?;
                    typed.push(TermParam {
                        mods: Vec::new(),
                        name: Some(name),
                        tpe: Some(tpe),
                        default: None,
                        origin: self.origin_from(elem_start),
                    });
                } else {
                    if !typed.is_empty() {
                        return Err(self.error_here(
                            "can't mix function type and dependent function type syntaxes",
                        ));
                    }
                    plain.push(self.param_type()?);
                }
                if !self.accept_opt(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.accept(TokenKind::RightParen)?;

        if !typed.is_empty() {
            if !self.accept_opt(TokenKind::CtxArrow) {
                self.accept(TokenKind::RightArrow)?;
            }
            let res = self.typ()?;
            let origin = self.origin_from(start);
            return Ok(Type::new(
                TypeKind::DependentFunction { params: typed, res: Box::new(res) },
                origin,
            ));
        }

        match self.kind() {
            TokenKind::RightArrow => {
                self.advance();
                let res = self.typ()?;
                let origin = self.origin_from(start);
                Ok(Type::new(
                    TypeKind::Function { params: plain, res: Box::new(res) },
                    origin,
                ))
            }
            TokenKind::CtxArrow => {
                self.require_dialect(
                    self.dialect.allow_context_function_types,
                    "context function types",
                )?;
                self.advance();
                let res = self.typ()?;
                let origin = self.origin_from(start);
                Ok(Type::new(
                    TypeKind::ContextFunction { params: plain, res: Box::new(res) },
                    origin,
                ))
            }
            _ => {
                // No arrow: the elements must be plain types.
                for t in &plain {
                    if matches!(t.kind, TypeKind::ByName(_) | TypeKind::Repeated(_)) {
                        return Err(self.error_here(
                            "by-name and repeated types are only legal as function parameters",
                        ));
                    }
                }
                let t = if plain.len() == 1 {
                    match plain.pop() {
                        Some(t) => t,
                        None => return Err(ParseError::UnexpectedEof),
                    }
                } else {
                    let origin = self.origin_from(start);
                    Type::new(TypeKind::Tuple(plain), origin)
                };
                let t = self.simple_type_rest(start, t)?;
                let t = self.annot_and_with_rest(start, t)?;
                let t = self.infix_type_rest(t, start, 1)?;
                self.typ_suffix(start, t)
            }
        }
    }

    /// `InfixType ::= RefinedType {id [nl] RefinedType}` with term-identical
    /// precedence and associativity.
    fn infix_type(&mut self) -> ParseResult<Type> {
        let start = self.cursor.index();
        let lhs = self.refined_type()?;
        self.infix_type_rest(lhs, start, 1)
    }

    fn at_infix_type_op(&self) -> bool {
        if !self.at(TokenKind::Ident) {
            return false;
        }
        if self.at_soft(soft::STAR) {
            // `T*` is the vararg marker, not an operator, when a clause end
            // follows.
            return !matches!(
                self.cursor.peek_kind(),
                TokenKind::RightParen
                    | TokenKind::RightBracket
                    | TokenKind::Comma
                    | TokenKind::Eq
                    | TokenKind::RightBrace
                    | TokenKind::EOF
            );
        }
        true
    }

    fn infix_type_rest(
        &mut self,
        mut lhs: Type,
        lhs_start: usize,
        min_prec: u8,
    ) -> ParseResult<Type> {
        while self.at_infix_type_op() {
            let op = op_name(&self.current_text());
            let prec = operator_precedence(&op);
            if prec < min_prec {
                break;
            }
            let op_offset = self.current_offset();
            self.advance();
            self.newline_opt();
            let rhs_start = self.cursor.index();
            let mut rhs = self.refined_type()?;
            // Fold tighter (or right-associative equal) operators into rhs.
            while self.at_infix_type_op() {
                let next = op_name(&self.current_text());
                let next_prec = operator_precedence(&next);
                if next_prec > prec || (next_prec == prec && is_right_assoc(&next)) {
                    if next_prec == prec && is_right_assoc(&next) != is_right_assoc(&op) {
                        return Err(ParseError::syntax(
                            "left- and right-associative operators with same precedence \
                             may not be mixed",
                            op_offset,
                        ));
                    }
                    rhs = self.infix_type_rest(rhs, rhs_start, next_prec)?;
                } else {
                    break;
                }
            }
            let origin = self.origin_from(lhs_start);
            lhs = match op.as_str() {
                "&" if self.dialect.allow_and_or_types => Type::new(
                    TypeKind::And { lhs: Box::new(lhs), rhs: Box::new(rhs) },
                    origin,
                ),
                "|" if self.dialect.allow_and_or_types => Type::new(
                    TypeKind::Or { lhs: Box::new(lhs), rhs: Box::new(rhs) },
                    origin,
                ),
                _ => Type::new(
                    TypeKind::ApplyInfix { lhs: Box::new(lhs), op, rhs: Box::new(rhs) },
                    origin,
                ),
            };
        }
        Ok(lhs)
    }

    /// `RefinedType ::= AnnotType {'with' AnnotType} [Refinement]`
    fn refined_type(&mut self) -> ParseResult<Type> {
        let start = self.cursor.index();
        let t = self.annot_type()?;
        self.annot_and_with_rest(start, t)
    }

    fn annot_and_with_rest(&mut self, start: usize, mut t: Type) -> ParseResult<Type> {
        while self.accept_opt(TokenKind::KwWith) {
            let rhs = self.annot_type()?;
            let origin = self.origin_from(start);
            t = Type::new(TypeKind::With { lhs: Box::new(t), rhs: Box::new(rhs) }, origin);
        }
        self.newline_opt_when_followed_by(TokenKind::LeftBrace);
        while self.at(TokenKind::LeftBrace) {
            let stats = self.refinement_stats()?;
            let origin = self.origin_from(start);
            t = Type::new(TypeKind::Refine { tpe: Some(Box::new(t)), stats }, origin);
        }
        Ok(t)
    }

    /// `AnnotType ::= SimpleType {Annotation}`
    fn annot_type(&mut self) -> ParseResult<Type> {
        let start = self.cursor.index();
        let t = self.simple_type()?;
        if self.at(TokenKind::At) {
            let annots = self.annotations()?;
            let origin = self.origin_from(start);
            Ok(Type::new(TypeKind::Annotate { tpe: Box::new(t), annots }, origin))
        } else {
            Ok(t)
        }
    }

    /// Simple types: literals, wildcards, paths, projections, applications,
    /// tuples, bare refinements, unquotes.
    fn simple_type(&mut self) -> ParseResult<Type> {
        let start = self.cursor.index();
        let t = match self.kind() {
            TokenKind::LeftParen => {
                self.advance();
                let mut items = vec![self.typ()?];
                while self.accept_opt(TokenKind::Comma) {
                    items.push(self.typ()?);
                }
                self.accept(TokenKind::RightParen)?;
                if items.len() == 1 {
                    match items.pop() {
                        Some(t) => t,
                        None => return Err(ParseError::UnexpectedEof),
                    }
                } else {
                    Type::new(TypeKind::Tuple(items), self.origin_from(start))
                }
            }
            TokenKind::LeftBrace => {
                let stats = self.refinement_stats()?;
                Type::new(TypeKind::Refine { tpe: None, stats }, self.origin_from(start))
            }
            TokenKind::Underscore => {
                self.advance();
                let bounds = self.type_bounds()?;
                Type::new(TypeKind::Wildcard(bounds), self.origin_from(start))
            }
            TokenKind::Ident
                if self.dialect.allow_question_mark_as_type_wildcard
                    && &*self.current_text() == "?" =>
            {
                self.advance();
                let bounds = self.type_bounds()?;
                Type::new(TypeKind::Wildcard(bounds), self.origin_from(start))
            }
            TokenKind::Unquote => {
                let quasi = self.unquote_tree()?;
                Type::new(
                    TypeKind::Quasi { rank: quasi.0, tree: Box::new(quasi.1) },
                    self.origin_from(start),
                )
            }
            k if k.is_literal() && self.dialect.allow_literal_types => {
                let lit = self.literal()?;
                Type::new(TypeKind::Lit(lit), self.origin_from(start))
            }
            TokenKind::Ident
                if &*self.current_text() == "-"
                    && self.cursor.peek_kind().is_literal()
                    && self.dialect.allow_literal_types =>
            {
                self.advance();
                let lit = self.negated_literal()?;
                Type::new(TypeKind::Lit(lit), self.origin_from(start))
            }
            TokenKind::Ident | TokenKind::KwThis | TokenKind::KwSuper => {
                self.path_type(start)?
            }
            _ => return Err(self.expected_error("type")),
        };
        self.simple_type_rest(start, t)
    }

    fn simple_type_rest(&mut self, start: usize, mut t: Type) -> ParseResult<Type> {
        loop {
            match self.kind() {
                TokenKind::Hash => {
                    self.advance();
                    let name = self.ident()?;
                    let origin = self.origin_from(start);
                    t = Type::new(TypeKind::Project { qual: Box::new(t), name }, origin);
                }
                TokenKind::LeftBracket => {
                    let args = self.type_args()?;
                    let origin = self.origin_from(start);
                    t = Type::new(TypeKind::Apply { tpe: Box::new(t), args }, origin);
                }
                _ => return Ok(t),
            }
        }
    }

    /// A dotted path ending in a type name or `.type` singleton.
    fn path_type(&mut self, start: usize) -> ParseResult<Type> {
        let mut qual: Option<Term> = None;
        let mut name: Option<String> = None;

        match self.kind() {
            TokenKind::KwThis => {
                self.advance();
                qual = Some(Term::new(
                    TermKind::This { qual: None },
                    self.origin_from(start),
                ));
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
                qual = Some(Term::new(
                    TermKind::Super { this_qual: None, super_qual },
                    self.origin_from(start),
                ));
            }
            _ => {
                name = Some(self.ident()?);
            }
        }

        loop {
            if self.at(TokenKind::Dot) {
                match self.cursor.peek_kind() {
                    TokenKind::KwType => {
                        self.advance();
                        self.advance();
                        let path = self.assemble_path(start, qual, name)?;
                        let origin = self.origin_from(start);
                        return Ok(Type::new(TypeKind::Singleton(Box::new(path)), origin));
                    }
                    TokenKind::Ident | TokenKind::KwThis => {
                        self.advance();
                        if self.at(TokenKind::KwThis) {
                            self.advance();
                            let q = name.take();
                            qual = Some(Term::new(
                                TermKind::This { qual: q },
                                self.origin_from(start),
                            ));
                        } else {
                            let next = self.ident()?;
                            if let Some(prev) = name.take() {
                                let prev_term = self.assemble_path_step(start, qual.take(), prev);
                                qual = Some(prev_term);
                            }
                            name = Some(next);
                        }
                    }
                    _ => break,
                }
            } else {
                break;
            }
        }

        let origin = self.origin_from(start);
        match (qual, name) {
            (None, Some(n)) => Ok(Type::new(TypeKind::Name(n), origin)),
            (Some(q), Some(n)) => Ok(Type::new(
                TypeKind::Select { qual: Box::new(q), name: n },
                origin,
            )),
            (Some(q), None) => {
                // A bare `this`/`super` path is only a type as `.type`.
                let _ = q;
                Err(self.expected_error("`.type`"))
            }
            (None, None) => Err(self.expected_error("type")),
        }
    }

    fn assemble_path_step(&self, start: usize, qual: Option<Term>, name: String) -> Term {
        let origin = self.origin_from(start);
        match qual {
            None => Term::new(TermKind::Name(name), origin),
            Some(q) => Term::new(TermKind::Select { qual: Box::new(q), name }, origin),
        }
    }

    fn assemble_path(
        &mut self,
        start: usize,
        qual: Option<Term>,
        name: Option<String>,
    ) -> ParseResult<Term> {
        match (qual, name) {
            (q, Some(n)) => Ok(self.assemble_path_step(start, q, n)),
            (Some(q), None) => Ok(q),
            (None, None) => Err(self.expected_error("path")),
        }
    }

    /// `[T1, T2]` type argument clause.
    fn type_args(&mut self) -> ParseResult<Vec<Type>> {
        self.accept(TokenKind::LeftBracket)?;
        let mut args = vec![self.typ()?];
        while self.accept_opt(TokenKind::Comma) {
            args.push(self.typ()?);
        }
        self.accept(TokenKind::RightBracket)?;
        Ok(args)
    }

    /// Parameter-position type: `=> T` by-name, `T*` repeated, else `T`.
    fn param_type(&mut self) -> ParseResult<Type> {
        let start = self.cursor.index();
        if self.accept_opt(TokenKind::RightArrow) {
            let t = self.typ()?;
            let origin = self.origin_from(start);
            return Ok(Type::new(TypeKind::ByName(Box::new(t)), origin));
        }
        let t = self.typ()?;
        if self.at_soft(soft::STAR) {
            self.advance();
            let origin = self.origin_from(start);
            return Ok(Type::new(TypeKind::Repeated(Box::new(t)), origin));
        }
        Ok(t)
    }

    /// `[>: Lo] [<: Hi]`
    fn type_bounds(&mut self) -> ParseResult<TypeBounds> {
        let start = self.cursor.index();
        let lo = if self.accept_opt(TokenKind::Supertype) {
            Some(Box::new(self.typ()?))
        } else {
            None
        };
        let hi = if self.accept_opt(TokenKind::Subtype) {
            Some(Box::new(self.typ()?))
        } else {
            None
        };
        Ok(TypeBounds { lo, hi, origin: self.origin_from(start) })
    }

    /// `[+X <: B : Ord, ...]` type parameter clause.
    fn type_param_clause(&mut self, allow_variance: bool) -> ParseResult<Vec<TypeParam>> {
        self.accept(TokenKind::LeftBracket)?;
        let mut params = vec![self.type_param(allow_variance)?];
        while self.accept_opt(TokenKind::Comma) {
            params.push(self.type_param(allow_variance)?);
        }
        self.accept(TokenKind::RightBracket)?;
        Ok(params)
    }

    fn type_param(&mut self, allow_variance: bool) -> ParseResult<TypeParam> {
        let start = self.cursor.index();
        let mut mods = self.annotations_opt()?;
        if allow_variance && self.at(TokenKind::Ident) {
            let text = self.current_text();
            if &*text == "+" || &*text == "-" {
                let vstart = self.cursor.index();
                let kind = if &*text == "+" {
                    ModKind::Covariant
                } else {
                    ModKind::Contravariant
                };
                self.advance();
                mods.push(Mod::new(kind, self.origin_from(vstart)));
            }
        }
        let name = if self.accept_opt(TokenKind::Underscore) {
            None
        } else {
            Some(self.ident()?)
        };
        let tparams = if self.at(TokenKind::LeftBracket) {
            self.type_param_clause(true)?
        } else {
            Vec::new()
        };
        let bounds = self.type_bounds()?;
        let mut vbounds = Vec::new();
        while self.at(TokenKind::ViewBound) {
            self.require_dialect(self.dialect.allow_view_bounds, "view bounds")?;
            self.advance();
            vbounds.push(self.typ()?);
        }
        let mut cbounds = Vec::new();
        while self.accept_opt(TokenKind::Colon) {
            cbounds.push(self.typ()?);
        }
        Ok(TypeParam {
            mods,
            name,
            tparams,
            bounds,
            vbounds,
            cbounds,
            origin: self.origin_from(start),
        })
    }

    /// `{ case P => T ... }` or an indented run of type cases.
    fn type_case_clauses(&mut self) -> ParseResult<Vec<TypeCase>> {
        let braced = if self.at(TokenKind::LeftBrace) {
            self.advance();
            true
        } else {
            self.cursor.observe_indented();
            self.accept(TokenKind::Indent)?;
            false
        };
        let mut cases = Vec::new();
        loop {
            self.skip_stat_seps();
            if !self.at(TokenKind::KwCase) {
                break;
            }
            let start = self.cursor.index();
            self.advance();
            let pat = self.infix_type()?;
            self.accept(TokenKind::RightArrow)?;
            let body = self.typ()?;
            cases.push(TypeCase { pat, body, origin: self.origin_from(start) });
        }
        if cases.is_empty() {
            return Err(self.error_here("match statement requires cases"));
        }
        if braced {
            self.accept(TokenKind::RightBrace)?;
        } else {
            self.accept_outdent()?;
        }
        Ok(cases)
    }

    /// Types in pattern ascriptions: a lone lower-case name is a type
    /// variable.
    fn pattern_typ(&mut self) -> ParseResult<Type> {
        let t = self.infix_type()?;
        Ok(match t.kind {
            TypeKind::Name(name)
                if scala_token::classifiers::is_pattern_var_text(&name) =>
            {
                Type::new(TypeKind::Var { name }, t.origin)
            }
            _ => t,
        })
    }
}
