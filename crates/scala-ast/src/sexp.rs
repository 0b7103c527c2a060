//! Tree-shaped debug rendering.
//!
//! `to_sexp` renders a compact S-expression of the node structure. Tests
//! assert against it when a full structural match would be noise; tools use
//! it for dumps. Origins are deliberately not rendered.

use crate::ast::*;

fn join(items: impl IntoIterator<Item = String>) -> String {
    items.into_iter().collect::<Vec<_>>().join(" ")
}

fn seq<T>(items: &[T], f: impl Fn(&T) -> String) -> String {
    join(items.iter().map(f))
}

fn opt(prefix: &str, item: &Option<String>) -> String {
    match item {
        Some(s) => format!(" ({} {})", prefix, s),
        None => String::new(),
    }
}

impl Lit {
    /// Render this literal.
    pub fn to_sexp(&self) -> String {
        match self {
            Lit::Int(v) => format!("(int {})", v),
            Lit::Long(v) => format!("(long {})", v),
            Lit::Float(v) => format!("(float {})", v),
            Lit::Double(v) => format!("(double {})", v),
            Lit::Char(c) => format!("(char {:?})", c),
            Lit::String(s) => format!("(string {:?})", s),
            Lit::Symbol(s) => format!("(symbol {})", s),
            Lit::Bool(b) => format!("(bool {})", b),
            Lit::Unit => "(unit)".to_string(),
            Lit::Null => "(null)".to_string(),
        }
    }
}

impl Term {
    /// Render this term as an S-expression.
    pub fn to_sexp(&self) -> String {
        match &self.kind {
            TermKind::Name(n) => format!("(name {})", n),
            TermKind::Select { qual, name } => {
                format!("(select {} {})", qual.to_sexp(), name)
            }
            TermKind::This { qual } => format!("(this{})", opt("qual", qual)),
            TermKind::Super { this_qual, super_qual } => {
                format!("(super{}{})", opt("this", this_qual), opt("mix", super_qual))
            }
            TermKind::Lit(l) => l.to_sexp(),
            TermKind::Interpolate { prefix, parts, args } => format!(
                "(interpolate {} ({}) ({}))",
                prefix,
                seq(parts, Lit::to_sexp),
                seq(args, Term::to_sexp)
            ),
            TermKind::Xml { parts, args } => format!(
                "(xml ({}) ({}))",
                seq(parts, Lit::to_sexp),
                seq(args, Term::to_sexp)
            ),
            TermKind::Apply { fun, args } => {
                format!("(apply {} {})", fun.to_sexp(), seq(args, Term::to_sexp))
            }
            TermKind::ApplyUsing { fun, args } => {
                format!("(apply_using {} {})", fun.to_sexp(), seq(args, Term::to_sexp))
            }
            TermKind::ApplyType { fun, targs } => {
                format!("(apply_type {} {})", fun.to_sexp(), seq(targs, Type::to_sexp))
            }
            TermKind::ApplyInfix { lhs, op, targs, args } => {
                let targs = if targs.is_empty() {
                    String::new()
                } else {
                    format!(" [{}]", seq(targs, Type::to_sexp))
                };
                format!(
                    "(apply_infix {} {}{} {})",
                    lhs.to_sexp(),
                    op,
                    targs,
                    seq(args, Term::to_sexp)
                )
            }
            TermKind::ApplyUnary { op, arg } => format!("(unary {} {})", op, arg.to_sexp()),
            TermKind::Assign { lhs, rhs } => {
                format!("(assign {} {})", lhs.to_sexp(), rhs.to_sexp())
            }
            TermKind::Return(expr) => match expr {
                Some(e) => format!("(return {})", e.to_sexp()),
                None => "(return)".to_string(),
            },
            TermKind::Throw(e) => format!("(throw {})", e.to_sexp()),
            TermKind::Ascribe { expr, tpe } => {
                format!("(ascribe {} {})", expr.to_sexp(), tpe.to_sexp())
            }
            TermKind::Annotate { expr, annots } => {
                format!("(annotate {} {})", expr.to_sexp(), seq(annots, Mod::to_sexp))
            }
            TermKind::Tuple(items) => format!("(tuple {})", seq(items, Term::to_sexp)),
            TermKind::Block(stats) => format!("(block {})", seq(stats, Stat::to_sexp)),
            TermKind::EndMarker { name } => format!("(end {})", name),
            TermKind::If { cond, then_branch, else_branch } => match else_branch {
                Some(e) => format!(
                    "(if {} {} {})",
                    cond.to_sexp(),
                    then_branch.to_sexp(),
                    e.to_sexp()
                ),
                None => format!("(if {} {})", cond.to_sexp(), then_branch.to_sexp()),
            },
            TermKind::Match { expr, cases } => {
                format!("(match {} {})", expr.to_sexp(), seq(cases, Case::to_sexp))
            }
            TermKind::Try { expr, catch_cases, finally_expr } => {
                let fin = finally_expr
                    .as_ref()
                    .map(|f| format!(" (finally {})", f.to_sexp()))
                    .unwrap_or_default();
                format!(
                    "(try {} ({}){})",
                    expr.to_sexp(),
                    seq(catch_cases, Case::to_sexp),
                    fin
                )
            }
            TermKind::TryWithHandler { expr, handler, finally_expr } => {
                let fin = finally_expr
                    .as_ref()
                    .map(|f| format!(" (finally {})", f.to_sexp()))
                    .unwrap_or_default();
                format!("(try_handler {} {}{})", expr.to_sexp(), handler.to_sexp(), fin)
            }
            TermKind::While { cond, body } => {
                format!("(while {} {})", cond.to_sexp(), body.to_sexp())
            }
            TermKind::DoWhile { body, cond } => {
                format!("(do_while {} {})", body.to_sexp(), cond.to_sexp())
            }
            TermKind::For { enums, body } => {
                format!("(for ({}) {})", seq(enums, Enumerator::to_sexp), body.to_sexp())
            }
            TermKind::ForYield { enums, body } => format!(
                "(for_yield ({}) {})",
                seq(enums, Enumerator::to_sexp),
                body.to_sexp()
            ),
            TermKind::New(init) => format!("(new {})", init.to_sexp()),
            TermKind::NewAnonymous(templ) => format!("(new_anon {})", templ.to_sexp()),
            TermKind::Placeholder => "(placeholder)".to_string(),
            TermKind::Eta(e) => format!("(eta {})", e.to_sexp()),
            TermKind::Repeated(e) => format!("(repeated {})", e.to_sexp()),
            TermKind::Function { params, body } => format!(
                "(function ({}) {})",
                seq(params, TermParam::to_sexp),
                body.to_sexp()
            ),
            TermKind::ContextFunction { params, body } => format!(
                "(ctx_function ({}) {})",
                seq(params, TermParam::to_sexp),
                body.to_sexp()
            ),
            TermKind::PolyFunction { tparams, body } => format!(
                "(poly_function ({}) {})",
                seq(tparams, TypeParam::to_sexp),
                body.to_sexp()
            ),
            TermKind::PartialFunction(cases) => {
                format!("(partial_function {})", seq(cases, Case::to_sexp))
            }
            TermKind::QuotedExpr(e) => format!("(quoted {})", e.to_sexp()),
            TermKind::QuotedType(t) => format!("(quoted_type {})", t.to_sexp()),
            TermKind::SplicedExpr(e) => format!("(spliced {})", e.to_sexp()),
            TermKind::Quasi { rank, tree } => format!("(quasi {} {})", rank, tree.to_sexp()),
        }
    }
}

impl Type {
    /// Render this type as an S-expression.
    pub fn to_sexp(&self) -> String {
        match &self.kind {
            TypeKind::Name(n) => format!("(tname {})", n),
            TypeKind::Select { qual, name } => {
                format!("(tselect {} {})", qual.to_sexp(), name)
            }
            TypeKind::Project { qual, name } => {
                format!("(tproject {} {})", qual.to_sexp(), name)
            }
            TypeKind::Singleton(path) => format!("(singleton {})", path.to_sexp()),
            TypeKind::Apply { tpe, args } => {
                format!("(tapply {} {})", tpe.to_sexp(), seq(args, Type::to_sexp))
            }
            TypeKind::ApplyInfix { lhs, op, rhs } => {
                format!("(tinfix {} {} {})", lhs.to_sexp(), op, rhs.to_sexp())
            }
            TypeKind::Function { params, res } => {
                format!("(tfunction ({}) {})", seq(params, Type::to_sexp), res.to_sexp())
            }
            TypeKind::ContextFunction { params, res } => format!(
                "(tctx_function ({}) {})",
                seq(params, Type::to_sexp),
                res.to_sexp()
            ),
            TypeKind::DependentFunction { params, res } => format!(
                "(tdep_function ({}) {})",
                seq(params, TermParam::to_sexp),
                res.to_sexp()
            ),
            TypeKind::PolyFunction { tparams, res } => format!(
                "(tpoly_function ({}) {})",
                seq(tparams, TypeParam::to_sexp),
                res.to_sexp()
            ),
            TypeKind::Lambda { tparams, body } => format!(
                "(tlambda ({}) {})",
                seq(tparams, TypeParam::to_sexp),
                body.to_sexp()
            ),
            TypeKind::Tuple(items) => format!("(ttuple {})", seq(items, Type::to_sexp)),
            TypeKind::With { lhs, rhs } => {
                format!("(twith {} {})", lhs.to_sexp(), rhs.to_sexp())
            }
            TypeKind::And { lhs, rhs } => {
                format!("(tand {} {})", lhs.to_sexp(), rhs.to_sexp())
            }
            TypeKind::Or { lhs, rhs } => format!("(tor {} {})", lhs.to_sexp(), rhs.to_sexp()),
            TypeKind::Refine { tpe, stats } => {
                let base = tpe.as_ref().map(|t| format!("{} ", t.to_sexp())).unwrap_or_default();
                format!("(trefine {}({}))", base, seq(stats, Stat::to_sexp))
            }
            TypeKind::Existential { tpe, stats } => format!(
                "(texistential {} ({}))",
                tpe.to_sexp(),
                seq(stats, Stat::to_sexp)
            ),
            TypeKind::Annotate { tpe, annots } => {
                format!("(tannotate {} {})", tpe.to_sexp(), seq(annots, Mod::to_sexp))
            }
            TypeKind::Wildcard(bounds) => format!("(twildcard{})", bounds.to_sexp_suffix()),
            TypeKind::ByName(t) => format!("(tbyname {})", t.to_sexp()),
            TypeKind::Repeated(t) => format!("(trepeated {})", t.to_sexp()),
            TypeKind::Var { name } => format!("(tvar {})", name),
            TypeKind::Match { tpe, cases } => format!(
                "(tmatch {} {})",
                tpe.to_sexp(),
                seq(cases, TypeCase::to_sexp)
            ),
            TypeKind::Lit(l) => format!("(tlit {})", l.to_sexp()),
            TypeKind::Quasi { rank, tree } => format!("(quasi {} {})", rank, tree.to_sexp()),
        }
    }
}

impl TypeBounds {
    fn to_sexp_suffix(&self) -> String {
        let mut out = String::new();
        if let Some(lo) = &self.lo {
            out.push_str(&format!(" (lo {})", lo.to_sexp()));
        }
        if let Some(hi) = &self.hi {
            out.push_str(&format!(" (hi {})", hi.to_sexp()));
        }
        out
    }
}

impl Pat {
    /// Render this pattern as an S-expression.
    pub fn to_sexp(&self) -> String {
        match &self.kind {
            PatKind::Wildcard => "(wildcard)".to_string(),
            PatKind::SeqWildcard => "(seq_wildcard)".to_string(),
            PatKind::Var { name } => format!("(var {})", name),
            PatKind::Bind { lhs, rhs } => {
                format!("(bind {} {})", lhs.to_sexp(), rhs.to_sexp())
            }
            PatKind::Alternative { lhs, rhs } => {
                format!("(alt {} {})", lhs.to_sexp(), rhs.to_sexp())
            }
            PatKind::Tuple(items) => format!("(ptuple {})", seq(items, Pat::to_sexp)),
            PatKind::Extract { fun, args } => {
                format!("(extract {} {})", fun.to_sexp(), seq(args, Pat::to_sexp))
            }
            PatKind::ExtractInfix { lhs, op, rhs } => format!(
                "(extract_infix {} {} {})",
                lhs.to_sexp(),
                op,
                seq(rhs, Pat::to_sexp)
            ),
            PatKind::Typed { lhs, rhs } => {
                format!("(typed {} {})", lhs.to_sexp(), rhs.to_sexp())
            }
            PatKind::Lit(l) => l.to_sexp(),
            PatKind::Term(t) => format!("(stable {})", t.to_sexp()),
            PatKind::Interpolate { prefix, parts, args } => format!(
                "(pinterpolate {} ({}) ({}))",
                prefix,
                seq(parts, Lit::to_sexp),
                seq(args, Pat::to_sexp)
            ),
            PatKind::Xml { parts, args } => format!(
                "(pxml ({}) ({}))",
                seq(parts, Lit::to_sexp),
                seq(args, Pat::to_sexp)
            ),
            PatKind::Quasi { rank, tree } => format!("(quasi {} {})", rank, tree.to_sexp()),
        }
    }
}

impl Mod {
    /// Render this modifier.
    pub fn to_sexp(&self) -> String {
        match &self.kind {
            ModKind::Annot(init) => format!("(annot {})", init.to_sexp()),
            ModKind::Private { within } => format!("(private{})", opt("within", within)),
            ModKind::Protected { within } => format!("(protected{})", opt("within", within)),
            ModKind::Quasi { rank, tree } => format!("(quasi {} {})", rank, tree.to_sexp()),
            other => format!("({})", other.label()),
        }
    }
}

impl Stat {
    /// Render this statement.
    pub fn to_sexp(&self) -> String {
        match self {
            Stat::Term(t) => t.to_sexp(),
            Stat::Decl(d) => d.to_sexp(),
            Stat::Defn(d) => d.to_sexp(),
            Stat::Import(i) => i.to_sexp(),
            Stat::Export(e) => e.to_sexp(),
            Stat::Pkg(p) => format!(
                "(package {} {})",
                p.ref_.to_sexp(),
                seq(&p.stats, Stat::to_sexp)
            ),
        }
    }
}

fn mods_prefix(mods: &[Mod]) -> String {
    if mods.is_empty() {
        String::new()
    } else {
        format!("({}) ", seq(mods, Mod::to_sexp))
    }
}

impl Decl {
    /// Render this declaration.
    pub fn to_sexp(&self) -> String {
        match &self.kind {
            DeclKind::Val { mods, pats, tpe } => format!(
                "(decl_val {}({}) {})",
                mods_prefix(mods),
                seq(pats, Pat::to_sexp),
                tpe.to_sexp()
            ),
            DeclKind::Var { mods, pats, tpe } => format!(
                "(decl_var {}({}) {})",
                mods_prefix(mods),
                seq(pats, Pat::to_sexp),
                tpe.to_sexp()
            ),
            DeclKind::Def { mods, name, tparams, paramss, tpe } => format!(
                "(decl_def {}{} ({}) ({}) {})",
                mods_prefix(mods),
                name,
                seq(tparams, TypeParam::to_sexp),
                seq(paramss, ParamClause::to_sexp),
                tpe.to_sexp()
            ),
            DeclKind::Type { mods, name, tparams, bounds } => format!(
                "(decl_type {}{} ({}){})",
                mods_prefix(mods),
                name,
                seq(tparams, TypeParam::to_sexp),
                bounds.to_sexp_suffix()
            ),
            DeclKind::Given { mods, name, tparams, paramss, tpe } => format!(
                "(decl_given {}{} ({}) ({}) {})",
                mods_prefix(mods),
                name,
                seq(tparams, TypeParam::to_sexp),
                seq(paramss, ParamClause::to_sexp),
                tpe.to_sexp()
            ),
        }
    }
}

impl Defn {
    /// Render this definition.
    pub fn to_sexp(&self) -> String {
        match &self.kind {
            DefnKind::Val { mods, pats, tpe, rhs } => {
                let tpe = tpe.as_ref().map(|t| format!(" {}", t.to_sexp())).unwrap_or_default();
                format!(
                    "(defn_val {}({}){} {})",
                    mods_prefix(mods),
                    seq(pats, Pat::to_sexp),
                    tpe,
                    rhs.to_sexp()
                )
            }
            DefnKind::Var { mods, pats, tpe, rhs } => {
                let tpe = tpe.as_ref().map(|t| format!(" {}", t.to_sexp())).unwrap_or_default();
                let rhs = rhs.as_ref().map(|r| r.to_sexp()).unwrap_or_else(|| "_".to_string());
                format!(
                    "(defn_var {}({}){} {})",
                    mods_prefix(mods),
                    seq(pats, Pat::to_sexp),
                    tpe,
                    rhs
                )
            }
            DefnKind::Def { mods, name, tparams, paramss, tpe, body } => {
                let tpe = tpe.as_ref().map(|t| format!(" {}", t.to_sexp())).unwrap_or_default();
                format!(
                    "(defn_def {}{} ({}) ({}){} {})",
                    mods_prefix(mods),
                    name,
                    seq(tparams, TypeParam::to_sexp),
                    seq(paramss, ParamClause::to_sexp),
                    tpe,
                    body.to_sexp()
                )
            }
            DefnKind::Type { mods, name, tparams, bounds, body } => format!(
                "(defn_type {}{} ({}){} {})",
                mods_prefix(mods),
                name,
                seq(tparams, TypeParam::to_sexp),
                bounds.to_sexp_suffix(),
                body.to_sexp()
            ),
            DefnKind::Class { mods, name, tparams, ctor, templ } => format!(
                "(class {}{} ({}) {} {})",
                mods_prefix(mods),
                name,
                seq(tparams, TypeParam::to_sexp),
                ctor.to_sexp(),
                templ.to_sexp()
            ),
            DefnKind::Trait { mods, name, tparams, ctor, templ } => format!(
                "(trait {}{} ({}) {} {})",
                mods_prefix(mods),
                name,
                seq(tparams, TypeParam::to_sexp),
                ctor.to_sexp(),
                templ.to_sexp()
            ),
            DefnKind::Object { mods, name, templ } => format!(
                "(object {}{} {})",
                mods_prefix(mods),
                name,
                templ.to_sexp()
            ),
            DefnKind::PkgObject { mods, name, templ } => format!(
                "(package_object {}{} {})",
                mods_prefix(mods),
                name,
                templ.to_sexp()
            ),
            DefnKind::Enum { mods, name, tparams, ctor, templ } => format!(
                "(enum {}{} ({}) {} {})",
                mods_prefix(mods),
                name,
                seq(tparams, TypeParam::to_sexp),
                ctor.to_sexp(),
                templ.to_sexp()
            ),
            DefnKind::EnumCase { mods, name, tparams, ctor, inits } => format!(
                "(enum_case {}{} ({}) {} ({}))",
                mods_prefix(mods),
                name,
                seq(tparams, TypeParam::to_sexp),
                ctor.to_sexp(),
                seq(inits, Init::to_sexp)
            ),
            DefnKind::RepeatedEnumCase { mods, cases } => format!(
                "(enum_cases {}{})",
                mods_prefix(mods),
                cases.join(" ")
            ),
            DefnKind::Given { mods, name, tparams, paramss, templ } => format!(
                "(given {}{} ({}) ({}) {})",
                mods_prefix(mods),
                name.clone().unwrap_or_else(|| "_".to_string()),
                seq(tparams, TypeParam::to_sexp),
                seq(paramss, ParamClause::to_sexp),
                templ.to_sexp()
            ),
            DefnKind::GivenAlias { mods, name, tparams, paramss, tpe, body } => format!(
                "(given_alias {}{} ({}) ({}) {} {})",
                mods_prefix(mods),
                name.clone().unwrap_or_else(|| "_".to_string()),
                seq(tparams, TypeParam::to_sexp),
                seq(paramss, ParamClause::to_sexp),
                tpe.to_sexp(),
                body.to_sexp()
            ),
            DefnKind::ExtensionGroup { tparams, paramss, body } => format!(
                "(extension ({}) ({}) {})",
                seq(tparams, TypeParam::to_sexp),
                seq(paramss, ParamClause::to_sexp),
                body.to_sexp()
            ),
            DefnKind::SecondaryCtor(ctor) => ctor.to_sexp(),
        }
    }
}

impl Ctor {
    /// Render this constructor.
    pub fn to_sexp(&self) -> String {
        match &self.kind {
            CtorKind::Primary { mods, paramss } => format!(
                "(ctor {}({}))",
                mods_prefix(mods),
                seq(paramss, ParamClause::to_sexp)
            ),
            CtorKind::Secondary { mods, paramss, init, stats } => format!(
                "(ctor_secondary {}({}) {} ({}))",
                mods_prefix(mods),
                seq(paramss, ParamClause::to_sexp),
                init.to_sexp(),
                seq(stats, Stat::to_sexp)
            ),
            CtorKind::Quasi { rank, tree } => format!("(quasi {} {})", rank, tree.to_sexp()),
        }
    }
}

impl Init {
    /// Render this init.
    pub fn to_sexp(&self) -> String {
        match &self.kind {
            InitKind::Init { tpe, argss } => {
                let argss = argss
                    .iter()
                    .map(|args| format!("({})", seq(args, Term::to_sexp)))
                    .collect::<Vec<_>>()
                    .join(" ");
                if argss.is_empty() {
                    format!("(init {})", tpe.to_sexp())
                } else {
                    format!("(init {} {})", tpe.to_sexp(), argss)
                }
            }
            InitKind::Quasi { rank, tree } => format!("(quasi {} {})", rank, tree.to_sexp()),
        }
    }
}

impl Template {
    /// Render this template.
    pub fn to_sexp(&self) -> String {
        let mut out = String::from("(template");
        if !self.inits.is_empty() {
            out.push_str(&format!(" (parents {})", seq(&self.inits, Init::to_sexp)));
        }
        if let Some(selfty) = &self.self_type {
            out.push_str(&format!(" {}", selfty.to_sexp()));
        }
        if !self.derives.is_empty() {
            out.push_str(&format!(" (derives {})", seq(&self.derives, Type::to_sexp)));
        }
        out.push_str(&format!(" ({})", seq(&self.stats, Stat::to_sexp)));
        out.push(')');
        out
    }
}

impl SelfType {
    /// Render this self type.
    pub fn to_sexp(&self) -> String {
        let name = self.name.clone().unwrap_or_else(|| "_".to_string());
        match &self.tpe {
            Some(t) => format!("(self {} {})", name, t.to_sexp()),
            None => format!("(self {})", name),
        }
    }
}

impl Case {
    /// Render this case clause.
    pub fn to_sexp(&self) -> String {
        match &self.kind {
            CaseKind::Clause { pat, cond, body } => {
                let cond = cond
                    .as_ref()
                    .map(|c| format!(" (guard {})", c.to_sexp()))
                    .unwrap_or_default();
                format!("(case {}{} {})", pat.to_sexp(), cond, body.to_sexp())
            }
            CaseKind::Quasi { rank, tree } => format!("(quasi {} {})", rank, tree.to_sexp()),
        }
    }
}

impl TypeCase {
    /// Render this type case.
    pub fn to_sexp(&self) -> String {
        format!("(type_case {} {})", self.pat.to_sexp(), self.body.to_sexp())
    }
}

impl Enumerator {
    /// Render this enumerator.
    pub fn to_sexp(&self) -> String {
        match &self.kind {
            EnumeratorKind::Generator { pat, rhs } => {
                format!("(generator {} {})", pat.to_sexp(), rhs.to_sexp())
            }
            EnumeratorKind::CaseGenerator { pat, rhs } => {
                format!("(case_generator {} {})", pat.to_sexp(), rhs.to_sexp())
            }
            EnumeratorKind::Val { pat, rhs } => {
                format!("(enum_val {} {})", pat.to_sexp(), rhs.to_sexp())
            }
            EnumeratorKind::Guard(cond) => format!("(guard {})", cond.to_sexp()),
            EnumeratorKind::Quasi { rank, tree } => {
                format!("(quasi {} {})", rank, tree.to_sexp())
            }
        }
    }
}

impl Import {
    /// Render this import.
    pub fn to_sexp(&self) -> String {
        format!("(import {})", seq(&self.importers, Importer::to_sexp))
    }
}

impl Export {
    /// Render this export.
    pub fn to_sexp(&self) -> String {
        format!("(export {})", seq(&self.importers, Importer::to_sexp))
    }
}

impl Importer {
    /// Render this importer.
    pub fn to_sexp(&self) -> String {
        format!(
            "(importer {} ({}))",
            self.ref_.to_sexp(),
            seq(&self.importees, Importee::to_sexp)
        )
    }
}

impl Importee {
    /// Render this importee.
    pub fn to_sexp(&self) -> String {
        match &self.kind {
            ImporteeKind::Wildcard => "(wildcard)".to_string(),
            ImporteeKind::GivenAll => "(given_all)".to_string(),
            ImporteeKind::Given(t) => format!("(given {})", t.to_sexp()),
            ImporteeKind::Name(n) => format!("(name {})", n),
            ImporteeKind::Rename { name, rename } => format!("(rename {} {})", name, rename),
            ImporteeKind::Unimport(n) => format!("(unimport {})", n),
            ImporteeKind::Quasi { rank, tree } => format!("(quasi {} {})", rank, tree.to_sexp()),
        }
    }
}

impl TermParam {
    /// Render this term parameter.
    pub fn to_sexp(&self) -> String {
        let name = self.name.clone().unwrap_or_else(|| "_".to_string());
        let mut out = format!("(param {}{}", mods_prefix(&self.mods), name);
        if let Some(t) = &self.tpe {
            out.push_str(&format!(" {}", t.to_sexp()));
        }
        if let Some(d) = &self.default {
            out.push_str(&format!(" (default {})", d.to_sexp()));
        }
        out.push(')');
        out
    }
}

impl TypeParam {
    /// Render this type parameter.
    pub fn to_sexp(&self) -> String {
        let name = self.name.clone().unwrap_or_else(|| "_".to_string());
        let mut out = format!("(tparam {}{}", mods_prefix(&self.mods), name);
        if !self.tparams.is_empty() {
            out.push_str(&format!(" ({})", seq(&self.tparams, TypeParam::to_sexp)));
        }
        out.push_str(&self.bounds.to_sexp_suffix());
        for v in &self.vbounds {
            out.push_str(&format!(" (view {})", v.to_sexp()));
        }
        for c in &self.cbounds {
            out.push_str(&format!(" (ctx {})", c.to_sexp()));
        }
        out.push(')');
        out
    }
}

impl ParamClause {
    /// Render this parameter clause.
    pub fn to_sexp(&self) -> String {
        let modifier = match self.modifier {
            ClauseMod::None => "",
            ClauseMod::Implicit => "implicit ",
            ClauseMod::Using => "using ",
        };
        format!("(clause {}{})", modifier, seq(&self.params, TermParam::to_sexp))
    }
}

impl Source {
    /// Render this source.
    pub fn to_sexp(&self) -> String {
        format!("(source {})", seq(&self.stats, Stat::to_sexp))
    }
}

impl MultiSource {
    /// Render this multi-source.
    pub fn to_sexp(&self) -> String {
        format!("(multi_source {})", seq(&self.sources, Source::to_sexp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::origin::Origin;
    use scala_dialect::Dialect;
    use scala_span::{ByteSpan, Input, Span};
    use std::sync::Arc;

    fn origin() -> Origin {
        Origin::new(Input::new(""), Dialect::scala3(), Span::empty(0), ByteSpan::empty(0))
    }

    #[test]
    fn literal_rendering() {
        assert_eq!(Lit::Int(42).to_sexp(), "(int 42)");
        assert_eq!(Lit::String(Arc::from("a b")).to_sexp(), "(string \"a b\")");
        assert_eq!(Lit::Unit.to_sexp(), "(unit)");
    }

    #[test]
    fn nested_terms_render_inline() {
        let a = Term::new(TermKind::Name("a".to_string()), origin());
        let b = Term::new(TermKind::Name("b".to_string()), origin());
        let infix = Term::new(
            TermKind::ApplyInfix {
                lhs: Box::new(a),
                op: "+".to_string(),
                targs: Vec::new(),
                args: vec![b],
            },
            origin(),
        );
        assert_eq!(infix.to_sexp(), "(apply_infix (name a) + (name b))");
    }

    #[test]
    fn modifier_labels() {
        assert_eq!(Mod::new(ModKind::Implicit, origin()).label(), "implicit");
        assert_eq!(Mod::new(ModKind::ValParam, origin()).label(), "val");
        assert_eq!(Mod::new(ModKind::Implicit, origin()).to_sexp(), "(implicit)");
    }
}

