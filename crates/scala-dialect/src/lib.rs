//! Dialect feature flags consumed by the parser.
//!
//! A [`Dialect`] is an immutable set of booleans gating grammar productions
//! and error messages. The parser never computes flags; it only reads them.
//! Named presets cover the language versions the parser understands, from
//! `scala211` through `scala3_future`, plus quasiquote variants that enable
//! unquote escapes inside a base dialect.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An immutable set of grammar feature flags.
///
/// Construct via a preset (`Dialect::scala3()`, `Dialect::scala213()`, ...)
/// and refine with the `with_*` builders where a tool needs a one-off
/// variation. Flag meanings follow the grammar production they gate; each is
/// documented where the parser consults it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Dialect {
    /// Human-readable preset name, for diagnostics ("scala3 does not support ...").
    #[serde(skip, default = "default_name")]
    pub name: &'static str,

    // Blocks and layout
    /// Indent/outdent act as block delimiters equivalent to `{`/`}`.
    pub allow_significant_indentation: bool,
    /// An operator at the start of a continuation line continues the
    /// preceding expression (only meaningful with significant indentation).
    pub allow_infix_operator_after_nl: bool,
    /// `end if` / `end Foo` closing markers.
    pub allow_end_markers: bool,
    /// `.method` starting a continuation line selects on the previous result.
    pub allow_fewer_braces: bool,

    // Terms
    /// `expr match { ... }` participates in infix chains as an operator.
    pub allow_match_as_operator: bool,
    /// `if cond then a else b` without parentheses around the condition.
    pub allow_quiet_syntax: bool,
    /// `do { ... } while (cond)` loops.
    pub allow_do_while: bool,
    /// `try` over an arbitrary expression (not just a block).
    pub allow_try_with_any_expr: bool,
    /// Postfix `*` splices a vararg argument (`xs*`) instead of `xs: _*`.
    pub allow_postfix_star_vararg_splices: bool,
    /// `'{ ... }` / `'[ ... ]` / `${ ... }` macro quoting and splicing.
    pub allow_quotes_and_splices: bool,
    /// Symbol literals `'name`.
    pub allow_symbol_literals: bool,
    /// XML literal expressions and patterns.
    pub allow_xml_literals: bool,
    /// `_` eta-expansion suffix (`f _`).
    pub allow_postfix_eta: bool,
    /// `42`, `"a"`, `true` usable as singleton types.
    pub allow_literal_types: bool,
    /// Procedure syntax `def f { ... }` is accepted (with a deprecation
    /// warning); when false its use is a hard error.
    pub allow_procedure_syntax: bool,

    // Types
    /// Type lambdas `[X] =>> T` and polymorphic function types `[X] => T`.
    pub allow_type_lambdas: bool,
    /// Context function types `T ?=> U`.
    pub allow_context_function_types: bool,
    /// Dependent function types `(x: T) => U`.
    pub allow_dependent_function_types: bool,
    /// Existential types `T forSome { ... }`.
    pub allow_existential_types: bool,
    /// Match types `T match { case ... }`.
    pub allow_match_types: bool,
    /// `&` intersection and `|` union types.
    pub allow_and_or_types: bool,
    /// `?` as the type wildcard (in addition to `_`).
    pub allow_question_mark_as_type_wildcard: bool,
    /// View bounds `A <% B` on type parameters (long deprecated).
    pub allow_view_bounds: bool,

    // Patterns
    /// An upper-case identifier directly followed by `@` binds a pattern
    /// variable rather than reading as a stable reference.
    pub allow_upper_case_pattern_var_binding: bool,
    /// `case a | b` alternation patterns binding no variables.
    pub allow_pattern_alternatives: bool,

    // Definitions
    /// `given` / `using` declarations and argument clauses.
    pub allow_given_using: bool,
    /// `extension (x: T) def f ...` groups.
    pub allow_extension_methods: bool,
    /// `enum` definitions and `case` entries.
    pub allow_enums: bool,
    /// `opaque type` definitions.
    pub allow_opaque_types: bool,
    /// `open` soft modifier on classes.
    pub allow_open_class: bool,
    /// `inline` / `transparent` soft modifiers.
    pub allow_inline_mods: bool,
    /// `infix` soft modifier on methods and types.
    pub allow_infix_mods: bool,
    /// Trait primary-constructor parameters.
    pub allow_trait_parameters: bool,
    /// `export` clauses.
    pub allow_export_clauses: bool,
    /// `derives` clauses on templates.
    pub allow_derives: bool,
    /// `import a.*` star wildcards and `import a.b as c` renames.
    pub allow_star_wildcard_import: bool,
    /// Top-level statements other than definitions and imports.
    pub allow_toplevel_terms: bool,
    /// `implicit` function literals `implicit x => ...`.
    pub allow_implicit_function_literals: bool,

    // Quasiquotes
    /// `$ident` / `${ ... }` unquote escapes; every AST family admits a
    /// `Quasi` variant when set. Only ever set by the `unquote_*` wrappers.
    pub allow_unquotes: bool,
    /// Unquote context parses patterns rather than terms.
    pub unquote_parses_patterns: bool,
    /// Multiline input for an unquote fragment.
    pub allow_multiline_programs: bool,
}

fn default_name() -> &'static str {
    "custom"
}

impl Dialect {
    /// Scala 2.11.
    pub fn scala211() -> Self {
        Dialect {
            name: "scala211",
            allow_significant_indentation: false,
            allow_infix_operator_after_nl: false,
            allow_end_markers: false,
            allow_fewer_braces: false,
            allow_match_as_operator: false,
            allow_quiet_syntax: false,
            allow_do_while: true,
            allow_try_with_any_expr: true,
            allow_postfix_star_vararg_splices: false,
            allow_quotes_and_splices: false,
            allow_symbol_literals: true,
            allow_xml_literals: true,
            allow_postfix_eta: true,
            allow_literal_types: false,
            allow_procedure_syntax: true,
            allow_type_lambdas: false,
            allow_context_function_types: false,
            allow_dependent_function_types: false,
            allow_existential_types: true,
            allow_match_types: false,
            allow_and_or_types: false,
            allow_question_mark_as_type_wildcard: false,
            allow_view_bounds: true,
            allow_upper_case_pattern_var_binding: false,
            allow_pattern_alternatives: true,
            allow_given_using: false,
            allow_extension_methods: false,
            allow_enums: false,
            allow_opaque_types: false,
            allow_open_class: false,
            allow_inline_mods: false,
            allow_infix_mods: false,
            allow_trait_parameters: false,
            allow_export_clauses: false,
            allow_derives: false,
            allow_star_wildcard_import: false,
            allow_toplevel_terms: false,
            allow_implicit_function_literals: true,
            allow_unquotes: false,
            unquote_parses_patterns: false,
            allow_multiline_programs: false,
        }
    }

    /// Scala 2.12. Identical grammar surface to 2.11 for our purposes.
    pub fn scala212() -> Self {
        Dialect { name: "scala212", ..Self::scala211() }
    }

    /// Scala 2.13: literal types land.
    pub fn scala213() -> Self {
        Dialect {
            name: "scala213",
            allow_literal_types: true,
            ..Self::scala212()
        }
    }

    /// Scala 2.13 with `-Xsource:3` — star imports, `as` renames, vararg
    /// splices, and `?` wildcards are accepted early.
    pub fn scala213_source3() -> Self {
        Dialect {
            name: "scala213source3",
            allow_star_wildcard_import: true,
            allow_postfix_star_vararg_splices: true,
            allow_question_mark_as_type_wildcard: true,
            allow_and_or_types: true,
            ..Self::scala213()
        }
    }

    /// Scala 3.
    pub fn scala3() -> Self {
        Dialect {
            name: "scala3",
            allow_significant_indentation: true,
            allow_infix_operator_after_nl: true,
            allow_end_markers: true,
            allow_fewer_braces: true,
            allow_match_as_operator: true,
            allow_quiet_syntax: true,
            allow_do_while: false,
            allow_try_with_any_expr: true,
            allow_postfix_star_vararg_splices: true,
            allow_quotes_and_splices: true,
            allow_symbol_literals: false,
            allow_xml_literals: true,
            allow_postfix_eta: false,
            allow_literal_types: true,
            allow_procedure_syntax: false,
            allow_type_lambdas: true,
            allow_context_function_types: true,
            allow_dependent_function_types: true,
            allow_existential_types: false,
            allow_match_types: true,
            allow_and_or_types: true,
            allow_question_mark_as_type_wildcard: true,
            allow_view_bounds: false,
            allow_upper_case_pattern_var_binding: true,
            allow_pattern_alternatives: true,
            allow_given_using: true,
            allow_extension_methods: true,
            allow_enums: true,
            allow_opaque_types: true,
            allow_open_class: true,
            allow_inline_mods: true,
            allow_infix_mods: true,
            allow_trait_parameters: true,
            allow_export_clauses: true,
            allow_derives: true,
            allow_star_wildcard_import: true,
            allow_toplevel_terms: true,
            allow_implicit_function_literals: true,
            allow_unquotes: false,
            unquote_parses_patterns: false,
            allow_multiline_programs: false,
        }
    }

    /// Scala 3 with in-progress syntax: XML literals withdrawn.
    pub fn scala3_future() -> Self {
        Dialect {
            name: "scala3future",
            allow_xml_literals: false,
            ..Self::scala3()
        }
    }

    /// Quasiquote term-mode variant of `self`: `$x` / `${ ... }` escapes
    /// become legal and every family admits `Quasi` nodes.
    pub fn unquote_term(self) -> Self {
        Dialect {
            name: "quasiquote-term",
            allow_unquotes: true,
            unquote_parses_patterns: false,
            allow_multiline_programs: true,
            ..self
        }
    }

    /// Quasiquote pattern-mode variant of `self`.
    pub fn unquote_pat(self) -> Self {
        Dialect {
            name: "quasiquote-pat",
            allow_unquotes: true,
            unquote_parses_patterns: true,
            allow_multiline_programs: true,
            ..self
        }
    }

    /// True if `other` enables every flag this dialect enables.
    ///
    /// Used by monotonicity tests: a strictly extending dialect must accept
    /// everything its base accepts.
    pub fn is_subset_of(&self, other: &Dialect) -> bool {
        macro_rules! implies {
            ($($field:ident),* $(,)?) => {
                $( (!self.$field || other.$field) )&&*
            };
        }
        implies!(
            allow_significant_indentation,
            allow_infix_operator_after_nl,
            allow_end_markers,
            allow_fewer_braces,
            allow_match_as_operator,
            allow_quiet_syntax,
            allow_do_while,
            allow_try_with_any_expr,
            allow_postfix_star_vararg_splices,
            allow_quotes_and_splices,
            allow_symbol_literals,
            allow_xml_literals,
            allow_postfix_eta,
            allow_literal_types,
            allow_procedure_syntax,
            allow_type_lambdas,
            allow_context_function_types,
            allow_dependent_function_types,
            allow_existential_types,
            allow_match_types,
            allow_and_or_types,
            allow_question_mark_as_type_wildcard,
            allow_view_bounds,
            allow_upper_case_pattern_var_binding,
            allow_pattern_alternatives,
            allow_given_using,
            allow_extension_methods,
            allow_enums,
            allow_opaque_types,
            allow_open_class,
            allow_inline_mods,
            allow_infix_mods,
            allow_trait_parameters,
            allow_export_clauses,
            allow_derives,
            allow_star_wildcard_import,
            allow_toplevel_terms,
            allow_implicit_function_literals,
            allow_unquotes,
            unquote_parses_patterns,
            allow_multiline_programs,
        )
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Self::scala3()
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_have_expected_flags() {
        let s2 = Dialect::scala213();
        assert!(!s2.allow_significant_indentation);
        assert!(s2.allow_existential_types);
        assert!(s2.allow_procedure_syntax);

        let s3 = Dialect::scala3();
        assert!(s3.allow_significant_indentation);
        assert!(s3.allow_given_using);
        assert!(!s3.allow_existential_types);
        assert!(!s3.allow_procedure_syntax);
    }

    #[test]
    fn unquote_wrappers_enable_quasi() {
        let d = Dialect::scala3().unquote_term();
        assert!(d.allow_unquotes);
        assert!(!d.unquote_parses_patterns);
        assert!(Dialect::scala3().unquote_pat().unquote_parses_patterns);
    }

    #[test]
    fn scala212_is_subset_of_scala213() {
        assert!(Dialect::scala212().is_subset_of(&Dialect::scala213()));
        assert!(!Dialect::scala3().is_subset_of(&Dialect::scala213()));
    }
}
