//! Universal tree invariants: span sanity, containment, and dialect
//! monotonicity.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use pretty_assertions::assert_eq;
use scala_ast::*;
use scala_dialect::Dialect;
use scala_parser::Parser;

const SNIPPETS: &[&str] = &[
    "val x = 1",
    "def f(x: Int): Int = x + 1",
    "class C[T](x: T) extends B with M { def f = x }",
    "object O { private val cache = make() }",
    "trait T { self: U => def f: Int }",
    "for (x <- xs if x > 0) yield x * 2",
    "x match { case h :: t => h case Nil => zero }",
    "import a.b.{c, d => e}",
    "try f() catch { case e => g } finally h",
];

fn check_origin(origin: &Origin, token_count: usize) {
    assert!(origin.span.start <= origin.span.end, "span inverted: {}", origin.span);
    assert!(
        origin.span.end <= token_count,
        "span {} exceeds token count {}",
        origin.span,
        token_count
    );
    assert!(origin.bytes.start <= origin.bytes.end);
}

fn check_contains(parent: &Origin, child: &Origin) {
    assert!(
        parent.span.contains_span(child.span),
        "parent {} does not cover child {}",
        parent.span,
        child.span
    );
}

#[test]
fn spans_are_sane_and_children_are_contained() {
    for src in SNIPPETS {
        let mut parser = Parser::new(*src, Dialect::scala213()).unwrap();
        let source = parser.parse_source().unwrap();
        let token_count = parser.tokens().len();
        check_origin(&source.origin, token_count);
        for stat in &source.stats {
            check_origin(stat.origin(), token_count);
            check_contains(&source.origin, stat.origin());
        }
    }
}

#[test]
fn infix_spans_nest_monotonically() {
    let mut parser = Parser::new("a + b * c", Dialect::scala213()).unwrap();
    let term = parser.parse_term().unwrap();
    match &term.kind {
        TermKind::ApplyInfix { lhs, args, .. } => {
            check_contains(&term.origin, &lhs.origin);
            for arg in args {
                check_contains(&term.origin, &arg.origin);
                // Left spine: the parent's span starts where the lhs starts.
                assert_eq!(term.origin.span.start, lhs.origin.span.start);
            }
        }
        other => panic!("expected infix, got {:?}", other),
    }
}

#[test]
fn trivia_is_trimmed_from_node_spans() {
    let mut parser = Parser::new("  val x = 1  ", Dialect::scala213()).unwrap();
    let source = parser.parse_source().unwrap();
    let stat = &source.stats[0];
    let text = stat.origin().text();
    assert_eq!(text, "val x = 1");
}

#[test]
fn dialect_monotonicity_within_scala2() {
    let dialects = [Dialect::scala211(), Dialect::scala212(), Dialect::scala213()];
    for src in SNIPPETS {
        let mut rendered: Vec<String> = Vec::new();
        for dialect in dialects {
            let mut parser = Parser::new(*src, dialect).unwrap();
            rendered.push(parser.parse_source().unwrap().to_sexp());
        }
        assert_eq!(rendered[0], rendered[1], "{}", src);
        assert_eq!(rendered[1], rendered[2], "{}", src);
    }
}

#[test]
fn conservative_sources_parse_identically_in_scala3() {
    // Constructs whose meaning does not change across the dialect boundary.
    let conservative = [
        "val x = 1",
        "def f(x: Int): Int = x + 1",
        "x match { case h :: t => h case Nil => zero }",
    ];
    for src in conservative {
        let mut p2 = Parser::new(src, Dialect::scala213()).unwrap();
        let mut p3 = Parser::new(src, Dialect::scala3()).unwrap();
        assert_eq!(
            p2.parse_source().unwrap().to_sexp(),
            p3.parse_source().unwrap().to_sexp(),
            "{}",
            src
        );
    }
}
