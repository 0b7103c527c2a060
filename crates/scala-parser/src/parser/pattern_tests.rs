#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use pretty_assertions::assert_eq;

fn pat(src: &str) -> Pat {
    let mut parser = Parser::new(src, Dialect::scala3()).unwrap();
    parser.parse_pat().unwrap()
}

fn pat2(src: &str) -> Pat {
    let mut parser = Parser::new(src, Dialect::scala213()).unwrap();
    parser.parse_pat().unwrap()
}

fn pat_err(src: &str) -> ParseError {
    let mut parser = Parser::new(src, Dialect::scala3()).unwrap();
    parser.parse_pat().unwrap_err()
}

#[test]
fn variable_vs_stable_reference() {
    assert_eq!(pat("x").to_sexp(), "(var x)");
    assert_eq!(pat("Nil").to_sexp(), "(stable (name Nil))");
    assert_eq!(pat("`x`").to_sexp(), "(stable (name `x`))");
    assert_eq!(pat("a.b").to_sexp(), "(stable (select (name a) b))");
}

#[test]
fn wildcard_and_literals() {
    assert_eq!(pat("_").to_sexp(), "(wildcard)");
    assert_eq!(pat("42").to_sexp(), "(int 42)");
    assert_eq!(pat("-1").to_sexp(), "(int -1)");
    assert_eq!(pat("\"s\"").to_sexp(), "(string \"s\")");
    assert_eq!(pat("true").to_sexp(), "(bool true)");
    assert_eq!(pat("null").to_sexp(), "(null)");
}

#[test]
fn extractors() {
    assert_eq!(
        pat("Cons(h, t)").to_sexp(),
        "(extract (name Cons) (var h) (var t))"
    );
    assert_eq!(
        pat("a.B(x)").to_sexp(),
        "(extract (select (name a) B) (var x))"
    );
    assert_eq!(pat("Empty()").to_sexp(), "(extract (name Empty))");
}

#[test]
fn extractor_with_type_args() {
    assert_eq!(
        pat("Cons[Int](h, t)").to_sexp(),
        "(extract (apply_type (name Cons) (tname Int)) (var h) (var t))"
    );
}

#[test]
fn infix_extractor_right_associative() {
    assert_eq!(
        pat("a :: b :: c").to_sexp(),
        "(extract_infix (var a) :: (extract_infix (var b) :: (var c)))"
    );
}

#[test]
fn infix_extractor_tuple_rhs_splats() {
    // `a op (b, c)` applies the extractor to both values.
    assert_eq!(
        pat("a op (b, c)").to_sexp(),
        "(extract_infix (var a) op (var b) (var c))"
    );
}

#[test]
fn tuples_and_grouping() {
    assert_eq!(pat("(a, b)").to_sexp(), "(ptuple (var a) (var b))");
    assert_eq!(pat("(a)").to_sexp(), "(var a)");
    assert_eq!(pat("()").to_sexp(), "(unit)");
}

#[test]
fn binding() {
    assert_eq!(
        pat("all @ Cons(h, t)").to_sexp(),
        "(bind (var all) (extract (name Cons) (var h) (var t)))"
    );
    // `_ @ p` binds nothing.
    assert_eq!(pat("_ @ Cons(h, t)").to_sexp(), "(extract (name Cons) (var h) (var t))");
}

#[test]
fn upper_case_binding_is_dialect_gated() {
    assert_eq!(pat("X @ _").to_sexp(), "(bind (var X) (wildcard))");
    let mut parser = Parser::new("X @ _", Dialect::scala213()).unwrap();
    assert!(parser.parse_pat().is_err());
}

#[test]
fn alternatives() {
    assert_eq!(pat("1 | 2 | 3").to_sexp(), "(alt (alt (int 1) (int 2)) (int 3))");
}

#[test]
fn typed_patterns() {
    assert_eq!(pat("x: Int").to_sexp(), "(typed (var x) (tname Int))");
    assert_eq!(pat("_: String").to_sexp(), "(typed (wildcard) (tname String))");
    // A lower-case ascription is a type variable.
    assert_eq!(pat("x: t").to_sexp(), "(typed (var x) (tvar t))");
}

#[test]
fn sequence_wildcards() {
    assert_eq!(
        pat("Seq(_*)").to_sexp(),
        "(extract (name Seq) (seq_wildcard))"
    );
    assert_eq!(
        pat2("Seq(xs @ _*)").to_sexp(),
        "(extract (name Seq) (bind (var xs) (seq_wildcard)))"
    );
    assert_eq!(
        pat("Seq(a, b, _*)").to_sexp(),
        "(extract (name Seq) (var a) (var b) (seq_wildcard))"
    );
}

#[test]
fn sequence_wildcard_misuse_is_diagnosed() {
    let err = pat_err("Seq(_*, a)");
    assert!(err
        .to_string()
        .contains("a sequence pattern must be the last pattern"));

    let err = pat_err("(a, _*)");
    assert!(err.to_string().contains("sequence pattern not allowed"));
}

#[test]
fn pattern_interpolation() {
    let p = pat(r#"s"prefix $x""#);
    match p.kind {
        PatKind::Interpolate { prefix, parts, args } => {
            assert_eq!(prefix, "s");
            assert_eq!(parts.len(), 2);
            assert!(matches!(&args[0].kind, PatKind::Var { name } if name == "x"));
        }
        other => panic!("expected interpolation pattern, got {:?}", other),
    }
}

#[test]
fn quoted_pattern() {
    let p = pat("'{ x }");
    match p.kind {
        PatKind::Term(t) => assert!(matches!(t.kind, TermKind::QuotedExpr(_))),
        other => panic!("expected quoted pattern, got {:?}", other),
    }
}

#[test]
fn case_clause_patterns_via_terms() {
    let mut parser = Parser::new(
        "x match { case h :: t if h > 0 => h case Nil => zero }",
        Dialect::scala3(),
    )
    .unwrap();
    let t = parser.parse_term().unwrap();
    assert_eq!(
        t.to_sexp(),
        "(match (name x) \
         (case (extract_infix (var h) :: (var t)) \
         (guard (apply_infix (name h) > (int 0))) (name h)) \
         (case (stable (name Nil)) (name zero)))"
    );
}
