//! Laws of the shared precedence/associativity engine.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use pretty_assertions::assert_eq;
use rstest::rstest;
use scala_dialect::Dialect;
use scala_parser::Parser;

fn term_sexp(src: &str) -> String {
    let mut parser = Parser::new(src, Dialect::scala213()).unwrap();
    parser.parse_term().unwrap().to_sexp()
}

#[rstest]
// Left-associative operators of equal precedence parse left-to-right.
#[case("a + b + c", "(a + b) + c")]
#[case("a * b * c", "(a * b) * c")]
// Right-associative (trailing colon) operators parse right-to-left.
#[case("a :: b :: c", "a :: (b :: c)")]
#[case("a +: b +: c", "a +: (b +: c)")]
// Precedence: higher binds over lower.
#[case("a + b * c", "a + (b * c)")]
#[case("a * b + c", "(a * b) + c")]
#[case("a == b || c", "(a == b) || c")]
#[case("a < b == c", "(a < b) == c")]
#[case("a :: b == c", "(a :: b) == c")]
#[case("a & b | c", "(a & b) | c")]
#[case("a eq b max c", "(a eq b) max c")]
fn infix_laws(#[case] src: &str, #[case] parenthesized: &str) {
    assert_eq!(term_sexp(src), term_sexp(parenthesized));
}

#[rstest]
#[case("a +: b + c")]
#[case("a :: b :+ c")]
fn mixed_associativity_at_equal_precedence_is_rejected(#[case] src: &str) {
    let mut parser = Parser::new(src, Dialect::scala213()).unwrap();
    let err = parser.parse_term().unwrap_err();
    assert!(err.to_string().contains("may not be mixed"), "{}", err);
}

#[test]
fn assignment_operators_take_the_lowest_tier() {
    assert_eq!(term_sexp("a ::= b :: c"), term_sexp("a ::= (b :: c)"));
}

#[test]
fn pattern_infix_shares_the_engine() {
    let mut parser = Parser::new("a :: b :: c", Dialect::scala213()).unwrap();
    let pat = parser.parse_pat().unwrap();
    assert_eq!(
        pat.to_sexp(),
        "(extract_infix (var a) :: (extract_infix (var b) :: (var c)))"
    );
}
