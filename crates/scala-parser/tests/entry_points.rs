//! Every entry point accepts BOF, runs its production, and requires EOF.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use scala_ast::*;
use scala_dialect::Dialect;
use scala_parser::Parser;

fn p3(src: &str) -> Parser {
    Parser::new(src, Dialect::scala3()).unwrap()
}

fn p2(src: &str) -> Parser {
    Parser::new(src, Dialect::scala213()).unwrap()
}

#[test]
fn parse_source_returns_source() {
    let source = p3("import a.b\nval x = 1\nclass C").parse_source().unwrap();
    assert_eq!(source.stats.len(), 3);
    assert!(matches!(source.stats[0], Stat::Import(_)));
    assert!(matches!(source.stats[1], Stat::Defn(_)));
    assert!(matches!(source.stats[2], Stat::Defn(_)));
}

#[test]
fn parse_stat_returns_single_statement() {
    let stat = p3("def f = 1").parse_stat().unwrap();
    assert!(matches!(stat, Stat::Defn(_)));
}

#[test]
fn parse_term_and_type_and_pat() {
    assert!(matches!(
        p3("a + b").parse_term().unwrap().kind,
        TermKind::ApplyInfix { .. }
    ));
    assert!(matches!(
        p3("List[Int]").parse_type().unwrap().kind,
        TypeKind::Apply { .. }
    ));
    assert!(matches!(
        p3("Cons(h, t)").parse_pat().unwrap().kind,
        PatKind::Extract { .. }
    ));
}

#[test]
fn parse_case_ctor_init_self_template() {
    assert!(matches!(
        p3("case x => x").parse_case().unwrap().kind,
        CaseKind::Clause { .. }
    ));
    assert!(matches!(
        p3("(x: Int)").parse_ctor().unwrap().kind,
        CtorKind::Primary { .. }
    ));
    assert!(matches!(
        p3("Ord[Int]").parse_init().unwrap().kind,
        InitKind::Init { .. }
    ));
    assert!(p2("self: T =>").parse_self().is_ok());
    assert!(p2("B with M { }").parse_template().is_ok());
}

#[test]
fn parse_mod_enumerator_importer_importee_params() {
    assert!(matches!(
        p3("private[core]").parse_mod().unwrap().kind,
        ModKind::Private { .. }
    ));
    assert!(matches!(
        p3("x <- xs").parse_enumerator().unwrap().kind,
        EnumeratorKind::Generator { .. }
    ));
    assert!(p3("a.b.{c, d}").parse_importer().is_ok());
    assert!(matches!(
        p3("x => y").parse_importee().unwrap().kind,
        ImporteeKind::Rename { .. }
    ));
    let param = p3("x: Int").parse_term_param().unwrap();
    assert_eq!(param.name.as_deref(), Some("x"));
    let tparam = p3("+A <: Ord").parse_type_param().unwrap();
    assert_eq!(tparam.name.as_deref(), Some("A"));
    assert!(tparam.bounds.hi.is_some());
}

#[test]
fn entry_points_reject_trailing_input() {
    assert!(p3("a + b; c").parse_term().is_err());
    assert!(p3("Int ; more").parse_type().is_err());
}

#[test]
fn unquote_entry_points() {
    let d = Dialect::scala3().unquote_term();
    let mut parser = Parser::new("foo($x)", d).unwrap();
    let term = parser.parse_unquote_term().unwrap();
    match term.kind {
        TermKind::Apply { args, .. } => {
            assert!(matches!(args[0].kind, TermKind::Quasi { rank: 0, .. }));
        }
        other => panic!("expected apply, got {:?}", other),
    }

    let d = Dialect::scala3().unquote_pat();
    let mut parser = Parser::new("Cons($head, ..$tail)", d).unwrap();
    let pat = parser.parse_unquote_pat().unwrap();
    match pat.kind {
        PatKind::Extract { args, .. } => {
            assert!(matches!(args[0].kind, PatKind::Quasi { rank: 0, .. }));
            assert!(matches!(args[1].kind, PatKind::Quasi { rank: 1, .. }));
        }
        other => panic!("expected extract, got {:?}", other),
    }
}

#[test]
fn unquotes_are_rejected_without_the_dialect() {
    // In a plain dialect `$x` is an ordinary identifier.
    let term = p3("foo($x)").parse_term().unwrap();
    match term.kind {
        TermKind::Apply { args, .. } => {
            assert!(matches!(&args[0].kind, TermKind::Name(n) if n == "$x"));
        }
        other => panic!("expected apply, got {:?}", other),
    }
}

#[test]
fn parse_ammonite_splits_sources() {
    let mut parser = Parser::new("val x = 1\n@\nval y = 2\n@\nval z = 3", Dialect::scala213())
        .unwrap();
    let multi = parser.parse_ammonite().unwrap();
    assert_eq!(multi.sources.len(), 3);
    for source in &multi.sources {
        assert_eq!(source.stats.len(), 1);
    }
}

#[test]
fn diagnostics_mirror_errors() {
    let mut parser = p3("def = 1");
    assert!(parser.parse_stat().is_err());
    assert!(parser.diagnostics().has_errors());
}

#[test]
fn from_tokens_accepts_external_token_streams() {
    use scala_span::{ByteSpan, Input};
    use scala_token::{Token, TokenKind};

    // An XML literal front end: `<a/>` as a single-part XML term.
    let input = Input::new("<a/>");
    let tokens = vec![
        Token::virtual_at(TokenKind::BOF, 0),
        Token::new(TokenKind::XmlStart, "", ByteSpan::empty(0)),
        Token::new(TokenKind::XmlPart, "<a/>", ByteSpan::new(0, 4)),
        Token::new(TokenKind::XmlEnd, "", ByteSpan::empty(4)),
        Token::virtual_at(TokenKind::EOF, 4),
    ];
    let mut parser = Parser::from_tokens(input, Dialect::scala213(), tokens);
    let term = parser.parse_term().unwrap();
    match term.kind {
        TermKind::Xml { parts, args } => {
            assert_eq!(parts.len(), 1);
            assert!(args.is_empty());
        }
        other => panic!("expected xml, got {:?}", other),
    }
}
