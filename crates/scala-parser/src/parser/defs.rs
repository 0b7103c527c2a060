/// Modifier pairs that may never appear together, per the fixed table.
const ILLEGAL_MOD_COMBINATIONS: [(&str, &str); 8] = [
    ("final", "abstract"),
    ("final", "sealed"),
    ("open", "sealed"),
    ("open", "final"),
    ("private", "protected"),
    ("case", "implicit"),
    ("override", "abstract"),
    ("lazy", "abstract"),
];

impl Parser {
    // ===== Statements =====

    /// One statement at source or block level.
    fn statement(&mut self) -> ParseResult<Stat> {
        match self.kind() {
            TokenKind::KwPackage => self.package_stat(),
            TokenKind::KwImport => Ok(Stat::Import(self.import_stmt()?)),
            TokenKind::KwExport => Ok(Stat::Export(self.export_stmt()?)),
            _ => {
                if let Some(end) = self.end_marker_opt()? {
                    return Ok(end);
                }
                if self.at_statement_defn_intro() {
                    self.defn_stat(None)
                } else {
                    Ok(Stat::Term(self.expr(Location::BlockStat, false)?))
                }
            }
        }
    }

    fn block_stat(&mut self) -> ParseResult<Stat> {
        match self.kind() {
            TokenKind::KwImport => Ok(Stat::Import(self.import_stmt()?)),
            _ => {
                if let Some(end) = self.end_marker_opt()? {
                    return Ok(end);
                }
                if self.at_statement_defn_intro() {
                    self.defn_stat(None)
                } else {
                    Ok(Stat::Term(self.expr(Location::BlockStat, false)?))
                }
            }
        }
    }

    /// Definition intro, minus the `implicit x => ...` lambda ambiguity.
    fn at_statement_defn_intro(&self) -> bool {
        if !self.at_defn_intro() {
            return false;
        }
        if self.at(TokenKind::KwImplicit) {
            // `implicit` begins a lambda when a parameter follows.
            return !matches!(
                self.cursor.peek_kind(),
                TokenKind::Ident | TokenKind::Underscore
            ) || self.cursor.peek().kind.is_modifier_kind();
        }
        if self.at(TokenKind::KwCase) {
            return matches!(
                self.cursor.peek_kind(),
                TokenKind::KwClass | TokenKind::KwObject
            );
        }
        if self.at(TokenKind::Ident) {
            // Soft keywords must actually start a definition here.
            return self.at_soft_modifier(soft::INLINE)
                || self.at_soft_modifier(soft::OPEN)
                || self.at_soft_modifier(soft::OPAQUE)
                || self.at_soft_modifier(soft::TRANSPARENT)
                || self.at_soft_modifier(soft::INFIX)
                || (self.at_soft(soft::EXTENSION)
                    && self.dialect.allow_extension_methods
                    && matches!(
                        self.cursor.peek_kind(),
                        TokenKind::LeftParen | TokenKind::LeftBracket
                    ));
        }
        true
    }

    fn stat_seq_until(
        &mut self,
        stop: impl Fn(TokenKind) -> bool,
    ) -> ParseResult<Vec<Stat>> {
        let mut stats = Vec::new();
        loop {
            self.skip_stat_seps();
            if stop(self.kind()) || self.cursor.current().is_closing() {
                break;
            }
            stats.push(self.statement()?);
            if stop(self.kind()) || self.cursor.current().is_closing() {
                break;
            }
            self.accept_stat_sep()?;
        }
        Ok(stats)
    }

    fn block_stat_seq(&mut self) -> ParseResult<Vec<Stat>> {
        let mut stats = Vec::new();
        loop {
            self.skip_stat_seps();
            if self.cursor.current().is_closing() {
                break;
            }
            if self.at(TokenKind::KwCase) && !self.case_starts_defn() {
                break;
            }
            stats.push(self.block_stat()?);
            if self.cursor.current().is_closing() {
                break;
            }
            self.accept_stat_sep()?;
        }
        Ok(stats)
    }

    /// `package p { stats }`, `package p:` + indent, a bare header, or a
    /// package object.
    fn package_stat(&mut self) -> ParseResult<Stat> {
        let start = self.cursor.index();
        self.accept(TokenKind::KwPackage)?;
        if self.at(TokenKind::KwObject) {
            self.advance();
            let name = self.ident()?;
            let templ = self.template_opt(TemplateOwner::Object)?;
            let origin = self.origin_from(start);
            return Ok(Stat::Defn(Defn::new(
                DefnKind::PkgObject { mods: Vec::new(), name, templ },
                origin,
            )));
        }
        let ref_ = self.path_term()?;
        let stats = if self.accept_opt(TokenKind::LeftBrace) {
            let stats = self.stat_seq_until(|k| k == TokenKind::RightBrace)?;
            self.accept(TokenKind::RightBrace)?;
            stats
        } else if self.at(TokenKind::Colon) && self.dialect.allow_significant_indentation {
            self.advance();
            self.cursor.observe_indented();
            self.accept(TokenKind::Indent)?;
            let stats = self.stat_seq_until(|k| k == TokenKind::Outdent)?;
            self.accept_outdent()?;
            stats
        } else {
            // Header form: the rest of the unit belongs to the package.
            self.skip_stat_seps();
            self.stat_seq_until(|k| k == TokenKind::EOF)?
        };
        let origin = self.origin_from(start);
        Ok(Stat::Pkg(Pkg { ref_, stats, origin }))
    }

    /// `end name` / `end if` closing marker.
    fn end_marker_opt(&mut self) -> ParseResult<Option<Stat>> {
        if !self.dialect.allow_end_markers || !self.at_soft(soft::END) {
            return Ok(None);
        }
        let next = self.cursor.peek();
        let markable = matches!(
            next.kind,
            TokenKind::Ident
                | TokenKind::KwIf
                | TokenKind::KwWhile
                | TokenKind::KwFor
                | TokenKind::KwMatch
                | TokenKind::KwTry
                | TokenKind::KwNew
                | TokenKind::KwThis
                | TokenKind::KwVal
                | TokenKind::KwGiven
                | TokenKind::KwExtends
        );
        if !markable {
            return Ok(None);
        }
        // The marked name must sit on the same line as `end`.
        let (end_line, _) = self.input.line_col(self.cursor.current().span.start);
        let (name_line, _) = self.input.line_col(next.span.start);
        if end_line != name_line {
            return Ok(None);
        }
        let start = self.cursor.index();
        self.advance();
        let name = self.current_text().to_string();
        self.advance();
        let origin = self.origin_from(start);
        Ok(Some(Stat::Term(Term::new(TermKind::EndMarker { name }, origin))))
    }

    // ===== Modifiers =====

    /// `@annot` then an optional argument list chain.
    fn annotation(&mut self) -> ParseResult<Mod> {
        let start = self.cursor.index();
        self.accept(TokenKind::At)?;
        let init = self.init_after_at()?;
        Ok(Mod::new(ModKind::Annot(init), self.origin_from(start)))
    }

    fn annotations(&mut self) -> ParseResult<Vec<Mod>> {
        let mut annots = vec![self.annotation()?];
        while self.at(TokenKind::At) {
            annots.push(self.annotation()?);
        }
        Ok(annots)
    }

    fn annotations_opt(&mut self) -> ParseResult<Vec<Mod>> {
        let mut annots = Vec::new();
        while self.at(TokenKind::At) {
            annots.push(self.annotation()?);
            self.newline_opt();
        }
        Ok(annots)
    }

    /// Collect annotations and modifiers, validating repetition and the
    /// illegal-combination table.
    fn modifiers(&mut self, is_local: bool) -> ParseResult<Vec<Mod>> {
        let mut mods: Vec<Mod> = Vec::new();
        loop {
            let start = self.cursor.index();
            let kind = match self.kind() {
                TokenKind::At
                    if self.cursor.peek_kind() == TokenKind::Ident
                        || self.cursor.peek_kind() == TokenKind::KwThis =>
                {
                    mods.push(self.annotation()?);
                    self.newline_opt();
                    continue;
                }
                TokenKind::KwImplicit => Some(ModKind::Implicit),
                TokenKind::KwFinal => Some(ModKind::Final),
                TokenKind::KwSealed => Some(ModKind::Sealed),
                TokenKind::KwAbstract => Some(ModKind::Abstract),
                TokenKind::KwLazy => Some(ModKind::Lazy),
                TokenKind::KwOverride if !is_local => Some(ModKind::Override),
                TokenKind::KwPrivate if !is_local => {
                    self.advance();
                    let within = self.access_qualifier()?;
                    mods.push(Mod::new(
                        ModKind::Private { within },
                        self.origin_from(start),
                    ));
                    self.validate_modifiers(&mods)?;
                    continue;
                }
                TokenKind::KwProtected if !is_local => {
                    self.advance();
                    let within = self.access_qualifier()?;
                    mods.push(Mod::new(
                        ModKind::Protected { within },
                        self.origin_from(start),
                    ));
                    self.validate_modifiers(&mods)?;
                    continue;
                }
                TokenKind::Ident => {
                    if self.at_soft_modifier(soft::INLINE) && self.dialect.allow_inline_mods {
                        Some(ModKind::Inline)
                    } else if self.at_soft_modifier(soft::TRANSPARENT)
                        && self.dialect.allow_inline_mods
                    {
                        Some(ModKind::Transparent)
                    } else if self.at_soft_modifier(soft::OPAQUE)
                        && self.dialect.allow_opaque_types
                    {
                        Some(ModKind::Opaque)
                    } else if self.at_soft_modifier(soft::OPEN)
                        && self.dialect.allow_open_class
                        && !is_local
                    {
                        Some(ModKind::Open)
                    } else if self.at_soft_modifier(soft::INFIX)
                        && self.dialect.allow_infix_mods
                    {
                        Some(ModKind::Infix)
                    } else {
                        None
                    }
                }
                _ => None,
            };
            match kind {
                Some(kind) => {
                    self.advance();
                    mods.push(Mod::new(kind, self.origin_from(start)));
                    self.validate_modifiers(&mods)?;
                }
                None => return Ok(mods),
            }
        }
    }

    /// `[within]` access boundary on `private`/`protected`.
    fn access_qualifier(&mut self) -> ParseResult<Option<String>> {
        if !self.accept_opt(TokenKind::LeftBracket) {
            return Ok(None);
        }
        let within = if self.accept_opt(TokenKind::KwThis) {
            "this".to_string()
        } else {
            self.ident()?
        };
        self.accept(TokenKind::RightBracket)?;
        Ok(Some(within))
    }

    /// Reject repeated modifiers and the fixed illegal combinations.
    fn validate_modifiers(&mut self, mods: &[Mod]) -> ParseResult<()> {
        let last = match mods.last() {
            Some(m) => m,
            None => return Ok(()),
        };
        let last_label = last.label();
        if last_label == "@" {
            return Ok(());
        }
        let offset = last.origin.bytes.start;
        for prev in &mods[..mods.len() - 1] {
            let prev_label = prev.label();
            if prev_label == last_label {
                let message = format!("repeated modifier `{}`", last_label);
                self.report_error(message.clone());
                return Err(ParseError::IllegalModifiers { message, offset });
            }
            for (a, b) in ILLEGAL_MOD_COMBINATIONS {
                if (prev_label == a && last_label == b) || (prev_label == b && last_label == a) {
                    let message = format!(
                        "illegal combination of modifiers: `{}` and `{}`",
                        prev_label, last_label
                    );
                    self.report_error(message.clone());
                    return Err(ParseError::IllegalModifiers { message, offset });
                }
            }
        }
        Ok(())
    }

    /// Reject a modifier that is misplaced on this construct.
    fn reject_modifier(
        &mut self,
        mods: &[Mod],
        label: &str,
        message: &str,
    ) -> ParseResult<()> {
        if let Some(m) = mods.iter().find(|m| m.label() == label) {
            let offset = m.origin.bytes.start;
            self.report_error(message.to_string());
            return Err(ParseError::IllegalModifiers { message: message.to_string(), offset });
        }
        Ok(())
    }

    // ===== Definitions =====

    /// Any definition or declaration, modifiers included.
    fn defn_stat(&mut self, owner: Option<TemplateOwner>) -> ParseResult<Stat> {
        let start = self.cursor.index();
        let mut mods = self.modifiers(false)?;
        if self.at(TokenKind::KwCase) {
            match owner {
                Some(TemplateOwner::Enum)
                    if !matches!(
                        self.cursor.peek_kind(),
                        TokenKind::KwClass | TokenKind::KwObject
                    ) =>
                {
                    return self.enum_case_def(start, mods);
                }
                _ => {
                    let cstart = self.cursor.index();
                    self.advance();
                    mods.push(Mod::new(ModKind::Case, self.origin_from(cstart)));
                    self.validate_modifiers(&mods)?;
                }
            }
        }
        match self.kind() {
            TokenKind::KwVal | TokenKind::KwVar => self.pat_def_or_dcl(start, mods),
            TokenKind::KwDef => self.def_or_dcl_or_secondary_ctor(start, mods, owner),
            TokenKind::KwType => self.type_def_or_dcl(start, mods),
            TokenKind::KwClass | TokenKind::KwTrait | TokenKind::KwObject
            | TokenKind::KwEnum => self.tmpl_def(start, mods),
            TokenKind::KwGiven => self.given_decl(start, mods),
            TokenKind::Ident if self.at_soft(soft::EXTENSION) => {
                self.extension_group_decl(start, mods)
            }
            _ => Err(self.expected_error("definition")),
        }
    }

    /// `val p, q: T = rhs` and the `var` / declaration variants.
    fn pat_def_or_dcl(&mut self, start: usize, mods: Vec<Mod>) -> ParseResult<Stat> {
        let is_var = self.at(TokenKind::KwVar);
        self.reject_modifier(&mods, "sealed", "`sealed` modifier can be used only for types")?;
        self.reject_modifier(&mods, "open", "`open` modifier can be used only for types")?;
        self.reject_modifier(&mods, "opaque", "`opaque` modifier can be used only for types")?;
        if is_var {
            self.reject_modifier(
                &mods,
                "lazy",
                "lazy not allowed here. Only vals can be lazy",
            )?;
        }
        self.advance();
        let mut pats = vec![self.pattern2(PatMode::NoSeq)?];
        while self.accept_opt(TokenKind::Comma) {
            pats.push(self.pattern2(PatMode::NoSeq)?);
        }
        let tpe = if self.accept_opt(TokenKind::Colon) {
            Some(self.typ()?)
        } else {
            None
        };
        if self.accept_opt(TokenKind::Eq) {
            if is_var && self.at(TokenKind::Underscore) {
                let snapshot = self.cursor.fork();
                self.advance();
                if self.at_stat_sep() || self.cursor.current().is_closing() {
                    let origin = self.origin_from(start);
                    return Ok(Stat::Defn(Defn::new(
                        DefnKind::Var { mods, pats, tpe, rhs: None },
                        origin,
                    )));
                }
                self.cursor.restore(snapshot);
            }
            let rhs = self.expr_or_indented()?;
            let origin = self.origin_from(start);
            let kind = if is_var {
                DefnKind::Var { mods, pats, tpe, rhs: Some(Box::new(rhs)) }
            } else {
                DefnKind::Val { mods, pats, tpe, rhs: Box::new(rhs) }
            };
            return Ok(Stat::Defn(Defn::new(kind, origin)));
        }
        // Declaration: requires an explicit type and name-only patterns.
        let tpe = match tpe {
            Some(t) => t,
            None => return Err(self.expected_error("`=` or `:`")),
        };
        for pat in &pats {
            if !matches!(pat.kind, PatKind::Var { .. } | PatKind::Quasi { .. }) {
                return Err(self.error_here("pattern definition may not be abstract"));
            }
        }
        let origin = self.origin_from(start);
        let kind = if is_var {
            DeclKind::Var { mods, pats, tpe }
        } else {
            DeclKind::Val { mods, pats, tpe }
        };
        Ok(Stat::Decl(Decl::new(kind, origin)))
    }

    fn def_or_dcl_or_secondary_ctor(
        &mut self,
        start: usize,
        mods: Vec<Mod>,
        owner: Option<TemplateOwner>,
    ) -> ParseResult<Stat> {
        if self.cursor.peek_kind() == TokenKind::KwThis {
            match owner {
                Some(owner) if owner.allows_secondary_ctors() => {
                    let ctor = self.secondary_ctor(start, mods)?;
                    let origin = self.origin_from(start);
                    return Ok(Stat::Defn(Defn::new(DefnKind::SecondaryCtor(ctor), origin)));
                }
                _ => {
                    return Err(
                        self.error_here("secondary constructors are only allowed in classes")
                    );
                }
            }
        }
        self.fun_def_rest(start, mods)
    }

    /// `def name [tparams] paramss [: T] [= body]`
    fn fun_def_rest(&mut self, start: usize, mods: Vec<Mod>) -> ParseResult<Stat> {
        self.reject_modifier(&mods, "lazy", "lazy not allowed here. Only vals can be lazy")?;
        self.reject_modifier(
            &mods,
            "sealed",
            "`sealed` modifier can be used only for classes",
        )?;
        self.reject_modifier(&mods, "opaque", "`opaque` modifier can be used only for types")?;
        self.accept(TokenKind::KwDef)?;
        let name = self.ident()?;
        let tparams = if self.at(TokenKind::LeftBracket) {
            self.type_param_clause(false)?
        } else {
            Vec::new()
        };
        let paramss = self.param_clauses(false)?;
        let tpe = if self.accept_opt(TokenKind::Colon) {
            Some(self.typ()?)
        } else {
            None
        };
        if self.accept_opt(TokenKind::Eq) {
            if self.at(TokenKind::KwMacro) {
                // scala2 macro defs: the body is the implementation reference.
                self.advance();
            }
            let body = self.expr_or_indented()?;
            let origin = self.origin_from(start);
            return Ok(Stat::Defn(Defn::new(
                DefnKind::Def { mods, name, tparams, paramss, tpe, body: Box::new(body) },
                origin,
            )));
        }
        self.newline_opt_when_followed_by(TokenKind::LeftBrace);
        if tpe.is_none() && self.at(TokenKind::LeftBrace) {
            // Procedure syntax: `def f { ... }` gets a synthesized Unit.
            let message = "procedure syntax is deprecated: add `: Unit =`";
            if self.dialect.allow_procedure_syntax {
                self.deprecation(message);
            } else {
                return Err(self.error_here(message));
            }
            let unit = Type::new(TypeKind::Name("Unit".to_string()), self.synthetic_origin());
            let body = self.block_expr()?;
            let origin = self.origin_from(start);
            return Ok(Stat::Defn(Defn::new(
                DefnKind::Def {
                    mods,
                    name,
                    tparams,
                    paramss,
                    tpe: Some(unit),
                    body: Box::new(body),
                },
                origin,
            )));
        }
        let tpe = match tpe {
            Some(t) => t,
            None => {
                // Declaration without a result type also counts as
                // procedure syntax.
                let message = "procedure syntax is deprecated: add `: Unit`";
                if self.dialect.allow_procedure_syntax {
                    self.deprecation(message);
                } else {
                    return Err(self.error_here(message));
                }
                Type::new(TypeKind::Name("Unit".to_string()), self.synthetic_origin())
            }
        };
        let origin = self.origin_from(start);
        Ok(Stat::Decl(Decl::new(
            DeclKind::Def { mods, name, tparams, paramss, tpe },
            origin,
        )))
    }

    /// `type T [tparams] [bounds] [= body]`
    fn type_def_or_dcl(&mut self, start: usize, mods: Vec<Mod>) -> ParseResult<Stat> {
        self.reject_modifier(&mods, "lazy", "lazy not allowed here. Only vals can be lazy")?;
        self.accept(TokenKind::KwType)?;
        self.newlines_opt();
        let name = self.ident()?;
        let tparams = if self.at(TokenKind::LeftBracket) {
            self.type_param_clause(true)?
        } else {
            Vec::new()
        };
        let bounds = self.type_bounds()?;
        if self.accept_opt(TokenKind::Eq) {
            let body = self.typ()?;
            let origin = self.origin_from(start);
            return Ok(Stat::Defn(Defn::new(
                DefnKind::Type { mods, name, tparams, bounds, body },
                origin,
            )));
        }
        let origin = self.origin_from(start);
        Ok(Stat::Decl(Decl::new(DeclKind::Type { mods, name, tparams, bounds }, origin)))
    }

    /// `class` / `trait` / `object` / `enum` definitions.
    fn tmpl_def(&mut self, start: usize, mods: Vec<Mod>) -> ParseResult<Stat> {
        self.reject_modifier(&mods, "lazy", "lazy not allowed here. Only vals can be lazy")?;
        let is_case = mods.iter().any(|m| m.label() == "case");
        match self.kind() {
            TokenKind::KwClass => {
                let owner = if is_case {
                    TemplateOwner::CaseClass
                } else {
                    TemplateOwner::Class
                };
                self.advance();
                let name = self.ident()?;
                let tparams = if self.at(TokenKind::LeftBracket) {
                    self.type_param_clause(true)?
                } else {
                    Vec::new()
                };
                let ctor = self.primary_ctor(owner)?;
                if owner == TemplateOwner::CaseClass {
                    if let CtorKind::Primary { paramss, .. } = &ctor.kind {
                        if paramss.is_empty() {
                            return Err(
                                self.error_here("case classes must have a parameter list")
                            );
                        }
                    }
                }
                let templ = self.template_opt(owner)?;
                let origin = self.origin_from(start);
                Ok(Stat::Defn(Defn::new(
                    DefnKind::Class { mods, name, tparams, ctor, templ },
                    origin,
                )))
            }
            TokenKind::KwTrait => {
                self.reject_modifier(
                    &mods,
                    "case",
                    "`case` modifier can be used only for classes and objects",
                )?;
                self.advance();
                let name = self.ident()?;
                let tparams = if self.at(TokenKind::LeftBracket) {
                    self.type_param_clause(true)?
                } else {
                    Vec::new()
                };
                let ctor = self.primary_ctor(TemplateOwner::Trait)?;
                let templ = self.template_opt(TemplateOwner::Trait)?;
                let origin = self.origin_from(start);
                Ok(Stat::Defn(Defn::new(
                    DefnKind::Trait { mods, name, tparams, ctor, templ },
                    origin,
                )))
            }
            TokenKind::KwObject => {
                self.reject_modifier(
                    &mods,
                    "abstract",
                    "`abstract` modifier cannot be used with objects",
                )?;
                self.advance();
                let name = self.ident()?;
                let templ = self.template_opt(TemplateOwner::Object)?;
                let origin = self.origin_from(start);
                Ok(Stat::Defn(Defn::new(DefnKind::Object { mods, name, templ }, origin)))
            }
            TokenKind::KwEnum => {
                self.require_dialect(self.dialect.allow_enums, "enum definitions")?;
                self.advance();
                let name = self.ident()?;
                let tparams = if self.at(TokenKind::LeftBracket) {
                    self.type_param_clause(true)?
                } else {
                    Vec::new()
                };
                let ctor = self.primary_ctor(TemplateOwner::Enum)?;
                let templ = self.template_opt(TemplateOwner::Enum)?;
                let origin = self.origin_from(start);
                Ok(Stat::Defn(Defn::new(
                    DefnKind::Enum { mods, name, tparams, ctor, templ },
                    origin,
                )))
            }
            _ => Err(self.expected_error("`class`, `trait`, `object`, or `enum`")),
        }
    }

    /// `case C(...) extends P` or `case A, B, C` inside an enum body.
    fn enum_case_def(&mut self, start: usize, mods: Vec<Mod>) -> ParseResult<Stat> {
        self.accept(TokenKind::KwCase)?;
        let name = self.ident()?;
        if self.at(TokenKind::Comma) {
            let mut cases = vec![name];
            while self.accept_opt(TokenKind::Comma) {
                cases.push(self.ident()?);
            }
            let origin = self.origin_from(start);
            return Ok(Stat::Defn(Defn::new(
                DefnKind::RepeatedEnumCase { mods, cases },
                origin,
            )));
        }
        let tparams = if self.at(TokenKind::LeftBracket) {
            self.type_param_clause(true)?
        } else {
            Vec::new()
        };
        let ctor = self.primary_ctor(TemplateOwner::CaseClass)?;
        let mut inits = Vec::new();
        if self.accept_opt(TokenKind::KwExtends) {
            inits.push(self.init()?);
            while self.accept_opt(TokenKind::KwWith) {
                inits.push(self.init()?);
            }
        }
        let origin = self.origin_from(start);
        Ok(Stat::Defn(Defn::new(
            DefnKind::EnumCase { mods, name, tparams, ctor, inits },
            origin,
        )))
    }

    // ===== Givens and extensions =====

    /// `given [name] [tparams] [using clauses] : Type (with body | = expr)`
    /// with speculative signature detection.
    fn given_decl(&mut self, start: usize, mods: Vec<Mod>) -> ParseResult<Stat> {
        self.require_dialect(self.dialect.allow_given_using, "given definitions")?;
        self.accept(TokenKind::KwGiven)?;

        // Speculate on the named-signature form; rewind completely when the
        // shape does not match.
        let sig = self.speculate(|p| {
            let name = if p.at(TokenKind::Ident) && !p.cursor.current().is_operator_ident() {
                Some(p.ident()?)
            } else {
                None
            };
            let tparams = if p.at(TokenKind::LeftBracket) {
                p.type_param_clause(false)?
            } else {
                Vec::new()
            };
            let mut paramss = Vec::new();
            while p.at(TokenKind::LeftParen) {
                paramss.push(p.param_clause(false)?);
            }
            if (name.is_some() || !tparams.is_empty() || !paramss.is_empty())
                && p.accept_opt(TokenKind::Colon)
            {
                Ok(Some((name, tparams, paramss)))
            } else {
                Ok(None)
            }
        });

        let (name, tparams, paramss) = match sig {
            Some(sig) => sig,
            None => (None, Vec::new(), Vec::new()),
        };

        let mut inits = vec![self.init()?];
        while self.at(TokenKind::KwWith)
            && !matches!(self.cursor.peek_kind(), TokenKind::LeftBrace)
        {
            self.advance();
            inits.push(self.init()?);
        }

        if self.accept_opt(TokenKind::Eq) {
            let tpe = self.inits_to_type(inits)?;
            let body = self.expr_or_indented()?;
            let origin = self.origin_from(start);
            return Ok(Stat::Defn(Defn::new(
                DefnKind::GivenAlias {
                    mods,
                    name,
                    tparams,
                    paramss,
                    tpe,
                    body: Box::new(body),
                },
                origin,
            )));
        }

        if self.at(TokenKind::KwWith) || self.at(TokenKind::LeftBrace) {
            self.accept_opt(TokenKind::KwWith);
            let templ = self.template_body(TemplateOwner::Class, inits, start)?;
            let origin = self.origin_from(start);
            return Ok(Stat::Defn(Defn::new(
                DefnKind::Given { mods, name, tparams, paramss, templ },
                origin,
            )));
        }

        // Abstract given: requires a name.
        let name = match name {
            Some(n) => n,
            None => return Err(self.error_here("anonymous given cannot be abstract")),
        };
        let tpe = self.inits_to_type(inits)?;
        let origin = self.origin_from(start);
        Ok(Stat::Decl(Decl::new(
            DeclKind::Given { mods, name, tparams, paramss, tpe },
            origin,
        )))
    }

    /// Collapse the parsed parent chain back into a plain type.
    fn inits_to_type(&mut self, inits: Vec<Init>) -> ParseResult<Type> {
        let mut tpe: Option<Type> = None;
        for init in inits {
            let t = match init.kind {
                InitKind::Init { tpe, argss } => {
                    if !argss.is_empty() {
                        return Err(
                            self.error_here("given type may not have constructor arguments")
                        );
                    }
                    tpe
                }
                InitKind::Quasi { rank, tree } => {
                    Type::new(TypeKind::Quasi { rank, tree }, init.origin)
                }
            };
            tpe = Some(match tpe {
                None => t,
                Some(lhs) => {
                    let origin = lhs.origin.clone();
                    Type::new(
                        TypeKind::With { lhs: Box::new(lhs), rhs: Box::new(t) },
                        origin,
                    )
                }
            });
        }
        match tpe {
            Some(t) => Ok(t),
            None => Err(self.expected_error("type")),
        }
    }

    /// `extension [tparams] (x: T) [using clauses] body`
    fn extension_group_decl(&mut self, start: usize, mods: Vec<Mod>) -> ParseResult<Stat> {
        self.require_dialect(self.dialect.allow_extension_methods, "extension methods")?;
        if !mods.is_empty() {
            return Err(self.error_here("extension groups do not take modifiers"));
        }
        self.advance();
        let tparams = if self.at(TokenKind::LeftBracket) {
            self.type_param_clause(false)?
        } else {
            Vec::new()
        };
        let mut paramss = Vec::new();
        while self.at(TokenKind::LeftParen) {
            paramss.push(self.param_clause(false)?);
        }
        if paramss.is_empty() {
            return Err(self.expected_error("`(`"));
        }
        self.newlines_opt();
        let body: Stat = if self.accept_opt(TokenKind::LeftBrace) {
            let bstart = self.cursor.index();
            let stats = self.stat_seq_until(|k| k == TokenKind::RightBrace)?;
            self.accept(TokenKind::RightBrace)?;
            let origin = self.origin_from(bstart);
            Stat::Term(Term::new(TermKind::Block(stats), origin))
        } else if self.dialect.allow_significant_indentation && self.at(TokenKind::Indent) {
            let bstart = self.cursor.index();
            self.advance();
            let stats = self.stat_seq_until(|k| k == TokenKind::Outdent)?;
            self.accept_outdent()?;
            let origin = self.origin_from(bstart);
            Stat::Term(Term::new(TermKind::Block(stats), origin))
        } else {
            self.defn_stat(None)?
        };
        let origin = self.origin_from(start);
        Ok(Stat::Defn(Defn::new(
            DefnKind::ExtensionGroup { tparams, paramss, body: Box::new(body) },
            origin,
        )))
    }

    // ===== Parameters =====

    /// All parameter clauses of a method or constructor.
    fn param_clauses(&mut self, allow_val_params: bool) -> ParseResult<Vec<ParamClause>> {
        let mut clauses = Vec::new();
        while self.at(TokenKind::LeftParen) {
            clauses.push(self.param_clause(allow_val_params)?);
        }
        Ok(clauses)
    }

    fn param_clause(&mut self, allow_val_params: bool) -> ParseResult<ParamClause> {
        let start = self.cursor.index();
        self.accept(TokenKind::LeftParen)?;
        let mut modifier = ClauseMod::None;
        if self.at(TokenKind::KwImplicit) {
            modifier = ClauseMod::Implicit;
            self.advance();
        } else if self.at_soft(soft::USING) && self.dialect.allow_given_using {
            // `using` introduces the clause both for named params and bare
            // types.
            modifier = ClauseMod::Using;
            self.advance();
        }
        let mut params = Vec::new();
        if !self.at(TokenKind::RightParen) {
            params.push(self.term_param(true, allow_val_params)?);
            while self.accept_opt(TokenKind::Comma) {
                params.push(self.term_param(true, allow_val_params)?);
            }
        }
        self.accept(TokenKind::RightParen)?;
        Ok(ParamClause { params, modifier, origin: self.origin_from(start) })
    }

    /// One term parameter: `[mods] [val|var] name: Type [= default]`, or a
    /// bare type in `using` clauses.
    fn term_param(&mut self, require_type: bool, allow_val_params: bool) -> ParseResult<TermParam> {
        let start = self.cursor.index();
        let mut mods = self.annotations_opt()?;
        if self.at_soft_modifier(soft::INLINE) && self.dialect.allow_inline_mods {
            let mstart = self.cursor.index();
            self.advance();
            mods.push(Mod::new(ModKind::Inline, self.origin_from(mstart)));
        }
        if allow_val_params {
            let access = self.modifiers(false)?;
            mods.extend(access);
            if self.at(TokenKind::KwVal) {
                let vstart = self.cursor.index();
                self.advance();
                mods.push(Mod::new(ModKind::ValParam, self.origin_from(vstart)));
            } else if self.at(TokenKind::KwVar) {
                let vstart = self.cursor.index();
                self.advance();
                mods.push(Mod::new(ModKind::VarParam, self.origin_from(vstart)));
            }
        }
        // Anonymous `using` parameters: a bare type with no `name :` prefix.
        let named = match self.kind() {
            TokenKind::Ident => self.cursor.peek_kind() == TokenKind::Colon,
            TokenKind::Underscore => true,
            _ => false,
        };
        if !named {
            let tpe = self.param_type()?;
            return Ok(TermParam {
                mods,
                name: None,
                tpe: Some(tpe),
                default: None,
                origin: self.origin_from(start),
            });
        }
        let name = if self.accept_opt(TokenKind::Underscore) {
            None
        } else {
            Some(self.ident()?)
        };
        let tpe = if self.accept_opt(TokenKind::Colon) {
            Some(self.param_type()?)
        } else if require_type {
            return Err(self.expected_error("`:`"));
        } else {
            None
        };
        let default = if self.accept_opt(TokenKind::Eq) {
            Some(self.expr(Location::NoStat, false)?)
        } else {
            None
        };
        Ok(TermParam { mods, name, tpe, default, origin: self.origin_from(start) })
    }

    // ===== Inits =====

    /// A constructor invocation: annotated simple type plus argument lists.
    fn init(&mut self) -> ParseResult<Init> {
        let start = self.cursor.index();
        if self.at(TokenKind::Unquote) {
            let (rank, tree) = self.unquote_tree()?;
            return Ok(Init::new(
                InitKind::Quasi { rank, tree: Box::new(tree) },
                self.origin_from(start),
            ));
        }
        let tpe = self.annot_type()?;
        let mut argss = Vec::new();
        while self.at(TokenKind::LeftParen) {
            let (args, _using) = self.argument_exprs()?;
            argss.push(args);
        }
        Ok(Init::new(InitKind::Init { tpe, argss }, self.origin_from(start)))
    }

    /// Annotation init: no infix types, so `@a @b` chains stay separate.
    fn init_after_at(&mut self) -> ParseResult<Init> {
        let start = self.cursor.index();
        let tpe = self.simple_type()?;
        let mut argss = Vec::new();
        while self.at(TokenKind::LeftParen) {
            let (args, _using) = self.argument_exprs()?;
            argss.push(args);
        }
        Ok(Init::new(InitKind::Init { tpe, argss }, self.origin_from(start)))
    }

    // ===== Imports and exports =====

    fn import_stmt(&mut self) -> ParseResult<Import> {
        let start = self.cursor.index();
        self.accept(TokenKind::KwImport)?;
        let mut importers = vec![self.importer()?];
        while self.accept_opt(TokenKind::Comma) {
            importers.push(self.importer()?);
        }
        Ok(Import { importers, origin: self.origin_from(start) })
    }

    fn export_stmt(&mut self) -> ParseResult<Export> {
        self.require_dialect(self.dialect.allow_export_clauses, "export clauses")?;
        let start = self.cursor.index();
        self.accept(TokenKind::KwExport)?;
        let mut importers = vec![self.importer()?];
        while self.accept_opt(TokenKind::Comma) {
            importers.push(self.importer()?);
        }
        Ok(Export { importers, origin: self.origin_from(start) })
    }

    /// `a.b.{x, y as z}` — a stable prefix and its selected importees.
    fn importer(&mut self) -> ParseResult<Importer> {
        let start = self.cursor.index();
        let mut ref_: Option<Term> = None;
        let mut pending: Option<String> = None;

        if self.at(TokenKind::KwThis) {
            self.advance();
            ref_ = Some(Term::new(TermKind::This { qual: None }, self.origin_from(start)));
        } else {
            pending = Some(self.ident()?);
        }

        loop {
            if !self.at(TokenKind::Dot) {
                break;
            }
            match self.cursor.peek_kind() {
                TokenKind::Ident | TokenKind::LeftBrace | TokenKind::Underscore
                | TokenKind::KwGiven | TokenKind::KwThis => {}
                _ => break,
            }
            self.advance();
            match self.kind() {
                TokenKind::Ident => {
                    // Another path segment, or the final selection.
                    let is_path_segment = self.cursor.peek_kind() == TokenKind::Dot;
                    if is_path_segment {
                        let seg = self.ident()?;
                        let prev = pending.take();
                        ref_ = Some(match (ref_.take(), prev) {
                            (None, None) => {
                                Term::new(TermKind::Name(seg), self.origin_from(start))
                            }
                            (r, p) => {
                                let base = match (r, p) {
                                    (Some(r), Some(p)) => Term::new(
                                        TermKind::Select { qual: Box::new(r), name: p },
                                        self.origin_from(start),
                                    ),
                                    (Some(r), None) => r,
                                    (None, Some(p)) => Term::new(
                                        TermKind::Name(p),
                                        self.origin_from(start),
                                    ),
                                    (None, None) => unreachable!(),
                                };
                                Term::new(
                                    TermKind::Select { qual: Box::new(base), name: seg },
                                    self.origin_from(start),
                                )
                            }
                        });
                        continue;
                    }
                    // Final single importee.
                    let prefix = self.importer_prefix(start, ref_.take(), pending.take())?;
                    let importee = self.importee()?;
                    return Ok(Importer {
                        ref_: prefix,
                        importees: vec![importee],
                        origin: self.origin_from(start),
                    });
                }
                TokenKind::KwThis => {
                    self.advance();
                    let qual = pending.take();
                    ref_ = Some(Term::new(TermKind::This { qual }, self.origin_from(start)));
                }
                TokenKind::LeftBrace => {
                    let prefix = self.importer_prefix(start, ref_.take(), pending.take())?;
                    self.advance();
                    let mut importees = vec![self.importee()?];
                    while self.accept_opt(TokenKind::Comma) {
                        importees.push(self.importee()?);
                    }
                    self.accept(TokenKind::RightBrace)?;
                    return Ok(Importer {
                        ref_: prefix,
                        importees,
                        origin: self.origin_from(start),
                    });
                }
                TokenKind::Underscore | TokenKind::KwGiven => {
                    let prefix = self.importer_prefix(start, ref_.take(), pending.take())?;
                    let importee = self.importee()?;
                    return Ok(Importer {
                        ref_: prefix,
                        importees: vec![importee],
                        origin: self.origin_from(start),
                    });
                }
                _ => return Err(self.expected_error("importee")),
            }
        }

        // `import a` — a single-segment import of the name itself is not
        // expressible; the last segment becomes the importee.
        match pending {
            Some(name) => {
                let prefix = match ref_ {
                    Some(r) => r,
                    None => {
                        return Err(ParseError::syntax(
                            format!("`.` expected after `{}`", name),
                            self.current_offset(),
                        ));
                    }
                };
                let origin = self.origin_from(start);
                let importee = Importee::new(ImporteeKind::Name(name), origin.clone());
                Ok(Importer { ref_: prefix, importees: vec![importee], origin })
            }
            None => Err(self.expected_error("importee")),
        }
    }

    fn importer_prefix(
        &mut self,
        start: usize,
        ref_: Option<Term>,
        pending: Option<String>,
    ) -> ParseResult<Term> {
        match (ref_, pending) {
            (Some(r), Some(p)) => Ok(Term::new(
                TermKind::Select { qual: Box::new(r), name: p },
                self.origin_from(start),
            )),
            (Some(r), None) => Ok(r),
            (None, Some(p)) => Ok(Term::new(TermKind::Name(p), self.origin_from(start))),
            (None, None) => Err(self.expected_error("import path")),
        }
    }

    /// A single importee: wildcard, given, name, rename, or unimport.
    fn importee(&mut self) -> ParseResult<Importee> {
        let start = self.cursor.index();
        match self.kind() {
            TokenKind::Underscore => {
                self.advance();
                Ok(Importee::new(ImporteeKind::Wildcard, self.origin_from(start)))
            }
            TokenKind::Ident if self.at_soft(soft::STAR) => {
                self.require_dialect(
                    self.dialect.allow_star_wildcard_import,
                    "`*` wildcard imports",
                )?;
                self.advance();
                Ok(Importee::new(ImporteeKind::Wildcard, self.origin_from(start)))
            }
            TokenKind::KwGiven => {
                self.advance();
                if self.at(TokenKind::Ident) || self.at(TokenKind::LeftParen) {
                    let tpe = self.infix_type()?;
                    Ok(Importee::new(ImporteeKind::Given(tpe), self.origin_from(start)))
                } else {
                    Ok(Importee::new(ImporteeKind::GivenAll, self.origin_from(start)))
                }
            }
            TokenKind::Unquote => {
                let (rank, tree) = self.unquote_tree()?;
                Ok(Importee::new(
                    ImporteeKind::Quasi { rank, tree: Box::new(tree) },
                    self.origin_from(start),
                ))
            }
            TokenKind::Ident => {
                let name = self.ident()?;
                let renamed = if self.accept_opt(TokenKind::RightArrow) {
                    true
                } else if self.at_soft(soft::GIVEN_ALIAS_AS)
                    && self.dialect.allow_star_wildcard_import
                {
                    self.advance();
                    true
                } else {
                    false
                };
                if renamed {
                    if self.accept_opt(TokenKind::Underscore) {
                        return Ok(Importee::new(
                            ImporteeKind::Unimport(name),
                            self.origin_from(start),
                        ));
                    }
                    let rename = self.ident()?;
                    return Ok(Importee::new(
                        ImporteeKind::Rename { name, rename },
                        self.origin_from(start),
                    ));
                }
                Ok(Importee::new(ImporteeKind::Name(name), self.origin_from(start)))
            }
            _ => Err(self.expected_error("importee")),
        }
    }
}
