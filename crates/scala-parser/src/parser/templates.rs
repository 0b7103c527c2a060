impl Parser {
    // ===== Primary constructors =====

    /// Access modifiers plus parameter clauses following a class-like name.
    fn primary_ctor(&mut self, owner: TemplateOwner) -> ParseResult<Ctor> {
        let start = self.cursor.index();
        if owner == TemplateOwner::Object {
            return Ok(Ctor::new(
                CtorKind::Primary { mods: Vec::new(), paramss: Vec::new() },
                self.origin_from(start),
            ));
        }
        let mods = if self.at(TokenKind::At)
            || self.at(TokenKind::KwPrivate)
            || self.at(TokenKind::KwProtected)
        {
            self.modifiers(false)?
        } else {
            Vec::new()
        };
        if self.at(TokenKind::LeftParen)
            && owner == TemplateOwner::Trait
            && !self.dialect.allow_trait_parameters
        {
            return Err(self.forbidden_here("trait parameters"));
        }
        let paramss = self.param_clauses(true)?;
        Ok(Ctor::new(CtorKind::Primary { mods, paramss }, self.origin_from(start)))
    }

    /// `def this(params) = { this(...); stats }`
    fn secondary_ctor(&mut self, start: usize, mods: Vec<Mod>) -> ParseResult<Ctor> {
        self.accept(TokenKind::KwDef)?;
        self.accept(TokenKind::KwThis)?;
        let paramss = self.param_clauses(false)?;
        if paramss.is_empty() {
            return Err(self.expected_error("`(`"));
        }
        self.accept(TokenKind::Eq)?;
        self.newlines_opt();
        let (init, stats) = if self.accept_opt(TokenKind::LeftBrace) {
            self.skip_stat_seps();
            let init = self.self_ctor_call()?;
            self.skip_stat_seps();
            let stats = self.block_stat_seq()?;
            self.accept(TokenKind::RightBrace)?;
            (init, stats)
        } else {
            (self.self_ctor_call()?, Vec::new())
        };
        Ok(Ctor::new(
            CtorKind::Secondary { mods, paramss, init, stats },
            self.origin_from(start),
        ))
    }

    /// The mandatory `this(args)` call opening a secondary constructor.
    fn self_ctor_call(&mut self) -> ParseResult<Init> {
        let start = self.cursor.index();
        if !self.at(TokenKind::KwThis) {
            return Err(self.error_here(
                "secondary constructor body must begin with a call to `this`",
            ));
        }
        self.advance();
        let this_term = Term::new(TermKind::This { qual: None }, self.origin_from(start));
        let tpe = Type::new(
            TypeKind::Singleton(Box::new(this_term)),
            self.origin_from(start),
        );
        let mut argss = Vec::new();
        if !self.at(TokenKind::LeftParen) {
            return Err(self.expected_error("`(`"));
        }
        while self.at(TokenKind::LeftParen) {
            let (args, _using) = self.argument_exprs()?;
            argss.push(args);
        }
        Ok(Init::new(InitKind::Init { tpe, argss }, self.origin_from(start)))
    }

    // ===== Templates =====

    /// Optional `extends` clause, `derives` clause, and body.
    fn template_opt(&mut self, owner: TemplateOwner) -> ParseResult<Template> {
        let start = self.cursor.index();
        let mut inits = Vec::new();
        if self.accept_opt(TokenKind::KwExtends) {
            inits.push(self.init()?);
            while self.accept_opt(TokenKind::KwWith) {
                inits.push(self.init()?);
            }
        }
        let derives = self.derives_opt()?;
        let mut templ = self.template_body_opt(owner, inits, start)?;
        templ.derives = derives;
        Ok(templ)
    }

    /// The `parse_template` production: parents without the `extends`
    /// keyword, then the body.
    fn template_after_extends(&mut self, owner: TemplateOwner) -> ParseResult<Template> {
        let start = self.cursor.index();
        let mut inits = Vec::new();
        if !self.at(TokenKind::LeftBrace)
            && !self.at(TokenKind::Colon)
            && !self.cursor.current().is_closing()
        {
            inits.push(self.init()?);
            while self.accept_opt(TokenKind::KwWith) {
                inits.push(self.init()?);
            }
        }
        let derives = self.derives_opt()?;
        let mut templ = self.template_body_opt(owner, inits, start)?;
        templ.derives = derives;
        Ok(templ)
    }

    fn derives_opt(&mut self) -> ParseResult<Vec<Type>> {
        self.newline_opt_when_followed_by(TokenKind::Ident);
        if !(self.at_soft(soft::DERIVES) && self.dialect.allow_derives) {
            return Ok(Vec::new());
        }
        self.advance();
        let mut derives = vec![self.annot_type()?];
        while self.accept_opt(TokenKind::Comma) {
            derives.push(self.annot_type()?);
        }
        Ok(derives)
    }

    /// `{ [self =>] stats }`, a colon-EOL indented body, or nothing.
    fn template_body_opt(
        &mut self,
        owner: TemplateOwner,
        inits: Vec<Init>,
        start: usize,
    ) -> ParseResult<Template> {
        self.newline_opt_when_followed_by(TokenKind::LeftBrace);
        if self.at(TokenKind::LeftBrace) {
            return self.template_body(owner, inits, start);
        }
        if self.at(TokenKind::Colon) && self.dialect.allow_significant_indentation {
            let snapshot = self.cursor.fork();
            self.advance();
            if self.kind().is_line_end() && self.cursor.observe_indented() {
                self.accept(TokenKind::Indent)?;
                let self_type = self.self_type_opt()?;
                let stats = self.template_stat_seq(owner)?;
                self.accept_outdent()?;
                return Ok(Template {
                    inits,
                    self_type,
                    stats,
                    derives: Vec::new(),
                    has_body: true,
                    origin: self.origin_from(start),
                });
            }
            self.cursor.restore(snapshot);
        }
        Ok(Template {
            inits,
            self_type: None,
            stats: Vec::new(),
            derives: Vec::new(),
            has_body: false,
            origin: self.origin_from(start),
        })
    }

    /// Braced template body; `inits` are the already-parsed parents.
    fn template_body(
        &mut self,
        owner: TemplateOwner,
        inits: Vec<Init>,
        start: usize,
    ) -> ParseResult<Template> {
        self.newline_opt_when_followed_by(TokenKind::LeftBrace);
        self.accept(TokenKind::LeftBrace)?;
        let self_type = self.self_type_opt()?;
        let stats = self.template_stat_seq(owner)?;
        self.accept(TokenKind::RightBrace)?;
        Ok(Template {
            inits,
            self_type,
            stats,
            derives: Vec::new(),
            has_body: true,
            origin: self.origin_from(start),
        })
    }

    /// Speculative self-type: `name[: T] =>` at the start of a body.
    ///
    /// The prefix reparses as an ordinary statement when the arrow is
    /// missing, so the cursor rewinds completely on no-match.
    fn self_type_opt(&mut self) -> ParseResult<Option<SelfType>> {
        self.skip_stat_seps();
        let result = self.speculate(|p| {
            let start = p.cursor.index();
            let name = match p.kind() {
                TokenKind::Ident if !p.cursor.current().is_operator_ident() => {
                    let n = p.ident()?;
                    Some(n)
                }
                TokenKind::KwThis => {
                    p.advance();
                    None
                }
                TokenKind::Underscore => {
                    p.advance();
                    None
                }
                _ => return Ok(None),
            };
            let tpe = if p.accept_opt(TokenKind::Colon) {
                Some(p.infix_type()?)
            } else {
                None
            };
            if !p.at(TokenKind::RightArrow) {
                return Ok(None);
            }
            let origin = p.origin_from(start);
            p.advance();
            Ok(Some(SelfType { name, tpe, origin }))
        });
        Ok(result)
    }

    fn template_stat_seq(&mut self, owner: TemplateOwner) -> ParseResult<Vec<Stat>> {
        let mut stats = Vec::new();
        loop {
            self.skip_stat_seps();
            if self.cursor.current().is_closing() {
                break;
            }
            stats.push(self.template_stat(owner)?);
            if self.cursor.current().is_closing() {
                break;
            }
            self.accept_stat_sep()?;
        }
        Ok(stats)
    }

    fn template_stat(&mut self, owner: TemplateOwner) -> ParseResult<Stat> {
        match self.kind() {
            TokenKind::KwImport => Ok(Stat::Import(self.import_stmt()?)),
            TokenKind::KwExport => Ok(Stat::Export(self.export_stmt()?)),
            TokenKind::KwCase if owner == TemplateOwner::Enum => self.defn_stat(Some(owner)),
            _ => {
                if let Some(end) = self.end_marker_opt()? {
                    return Ok(end);
                }
                if self.at_statement_defn_intro() {
                    self.defn_stat(Some(owner))
                } else {
                    Ok(Stat::Term(self.expr(Location::TemplateStat, false)?))
                }
            }
        }
    }

    /// Refinement and existential bodies: `{ decls }`.
    fn refinement_stats(&mut self) -> ParseResult<Vec<Stat>> {
        self.accept(TokenKind::LeftBrace)?;
        let mut stats = Vec::new();
        loop {
            self.skip_stat_seps();
            if self.at(TokenKind::RightBrace) || self.at(TokenKind::EOF) {
                break;
            }
            if !self.at_defn_intro() {
                return Err(self.expected_error("declaration"));
            }
            stats.push(self.defn_stat(None)?);
            if self.at(TokenKind::RightBrace) {
                break;
            }
            self.accept_stat_sep()?;
        }
        self.accept(TokenKind::RightBrace)?;
        Ok(stats)
    }
}
