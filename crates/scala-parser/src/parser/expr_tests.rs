#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use pretty_assertions::assert_eq;

fn term(src: &str) -> Term {
    let mut parser = Parser::new(src, Dialect::scala3()).unwrap();
    parser.parse_term().unwrap()
}

fn term2(src: &str) -> Term {
    let mut parser = Parser::new(src, Dialect::scala213()).unwrap();
    parser.parse_term().unwrap()
}

fn term_err(src: &str) -> ParseError {
    let mut parser = Parser::new(src, Dialect::scala3()).unwrap();
    parser.parse_term().unwrap_err()
}

#[test]
fn unit_lambda() {
    assert_eq!(term("()  =>  x").to_sexp(), "(function () (name x))");
}

#[test]
fn partial_function_literal() {
    assert_eq!(
        term("{ case x => x }").to_sexp(),
        "(partial_function (case (var x) (name x)))"
    );
}

#[test]
fn precedence_higher_over_lower() {
    assert_eq!(
        term("a + b * c").to_sexp(),
        "(apply_infix (name a) + (apply_infix (name b) * (name c)))"
    );
}

#[test]
fn left_associative_parses_left_to_right() {
    assert_eq!(
        term("a + b + c").to_sexp(),
        "(apply_infix (apply_infix (name a) + (name b)) + (name c))"
    );
}

#[test]
fn right_associative_parses_right_to_left() {
    assert_eq!(
        term("a :: b :: c").to_sexp(),
        "(apply_infix (name a) :: (apply_infix (name b) :: (name c)))"
    );
}

#[test]
fn cons_binds_looser_than_plus() {
    assert_eq!(
        term("a + b :: c :: d").to_sexp(),
        "(apply_infix (apply_infix (name a) + (name b)) :: \
         (apply_infix (name c) :: (name d)))"
    );
}

#[test]
fn mixed_associativity_is_an_error() {
    let err = term_err("a +: b + c");
    assert!(matches!(err, ParseError::Syntax { .. }));
    assert!(err.to_string().contains("may not be mixed"));
}

#[test]
fn alphanumeric_infix_and_postfix() {
    assert_eq!(term2("a max b").to_sexp(), "(apply_infix (name a) max (name b))");
    assert_eq!(term2("xs toList").to_sexp(), "(select (name xs) toList)");
}

#[test]
fn infix_with_type_arguments() {
    assert_eq!(
        term("xs zip[Int] ys").to_sexp(),
        "(apply_infix (name xs) zip [(tname Int)] (name ys))"
    );
}

#[test]
fn infix_multi_arg_rhs() {
    assert_eq!(
        term("m updated (k, v)").to_sexp(),
        "(apply_infix (name m) updated (name k) (name v))"
    );
}

#[test]
fn selections_and_applications() {
    assert_eq!(
        term("a.b.c(1)").to_sexp(),
        "(apply (select (select (name a) b) c) (int 1))"
    );
    assert_eq!(
        term("f[Int](x)").to_sexp(),
        "(apply (apply_type (name f) (tname Int)) (name x))"
    );
    assert_eq!(term("f _").to_sexp(), "(eta (name f))");
}

#[test]
fn using_argument_clause() {
    assert_eq!(
        term("f(using ord)").to_sexp(),
        "(apply_using (name f) (name ord))"
    );
}

#[test]
fn tuples_and_unit() {
    assert_eq!(term("(1, 2)").to_sexp(), "(tuple (int 1) (int 2))");
    assert_eq!(term("()").to_sexp(), "(unit)");
}

#[test]
fn if_else_paren_form() {
    assert_eq!(
        term2("if (c) a else b").to_sexp(),
        "(if (name c) (name a) (name b))"
    );
}

#[test]
fn if_then_quiet_form() {
    assert_eq!(
        term("if x > 0 then x else -x").to_sexp(),
        "(if (apply_infix (name x) > (int 0)) (name x) (unary - (name x)))"
    );
}

#[test]
fn while_and_do_while() {
    assert_eq!(
        term2("while (c) step()").to_sexp(),
        "(while (name c) (apply (name step)))"
    );
    assert_eq!(
        term2("do step() while (c)").to_sexp(),
        "(do_while (apply (name step)) (name c))"
    );
    assert!(matches!(
        term_err("do step() while (c)"),
        ParseError::DialectForbidden { .. }
    ));
}

#[test]
fn for_yield_with_guard() {
    assert_eq!(
        term("for (x <- xs if x > 0) yield x").to_sexp(),
        "(for_yield ((generator (var x) (name xs)) \
         (guard (apply_infix (name x) > (int 0)))) (name x))"
    );
}

#[test]
fn for_with_value_binding() {
    assert_eq!(
        term("for (x <- xs; y = x) yield y").to_sexp(),
        "(for_yield ((generator (var x) (name xs)) (enum_val (var y) (name x))) (name y))"
    );
}

#[test]
fn for_case_generator() {
    assert_eq!(
        term("for (case (a, b) <- pairs) yield a").to_sexp(),
        "(for_yield ((case_generator (ptuple (var a) (var b)) (name pairs))) (name a))"
    );
}

#[test]
fn val_in_for_is_deprecated() {
    let mut parser = Parser::new("for (x <- xs; val y = x) yield y", Dialect::scala213()).unwrap();
    parser.parse_term().unwrap();
    assert!(parser
        .diagnostics()
        .items()
        .iter()
        .any(|d| d.severity == Severity::Warning && d.message.contains("deprecated")));
}

#[test]
fn try_catch_finally() {
    assert_eq!(
        term("try f() catch { case e => g } finally h").to_sexp(),
        "(try (apply (name f)) ((case (var e) (name g))) (finally (name h)))"
    );
    assert_eq!(
        term2("try f() catch handler").to_sexp(),
        "(try_handler (apply (name f)) (name handler))"
    );
}

#[test]
fn throw_and_return() {
    assert_eq!(term("throw boom").to_sexp(), "(throw (name boom))");
    assert_eq!(term("return").to_sexp(), "(return)");
    assert_eq!(term("return x").to_sexp(), "(return (name x))");
}

#[test]
fn match_expression_both_dialects() {
    let expected = "(match (name x) (case (int 1) (name a)) (case (wildcard) (name b)))";
    assert_eq!(term("x match { case 1 => a case _ => b }").to_sexp(), expected);
    assert_eq!(term2("x match { case 1 => a case _ => b }").to_sexp(), expected);
}

#[test]
fn match_chains_as_operator() {
    let t = term("x match { case 1 => a } match { case _ => b }");
    match t.kind {
        TermKind::Match { expr, .. } => {
            assert!(matches!(expr.kind, TermKind::Match { .. }));
        }
        other => panic!("expected match, got {:?}", other),
    }
}

#[test]
fn match_requires_cases() {
    let err = term_err("x match { }");
    assert!(err.to_string().contains("match statement requires cases"));
}

#[test]
fn guarded_case() {
    assert_eq!(
        term("x match { case n if n > 0 => n }").to_sexp(),
        "(match (name x) (case (var n) (guard (apply_infix (name n) > (int 0))) (name n)))"
    );
}

#[test]
fn assignment_forms() {
    assert_eq!(term("x = 1").to_sexp(), "(assign (name x) (int 1))");
    assert_eq!(
        term("a(i) = v").to_sexp(),
        "(assign (apply (name a) (name i)) (name v))"
    );
}

#[test]
fn ascription_and_annotation() {
    assert_eq!(term("x: Int").to_sexp(), "(ascribe (name x) (tname Int))");
    assert_eq!(
        term("x: @unchecked").to_sexp(),
        "(annotate (name x) (annot (init (tname unchecked))))"
    );
}

#[test]
fn vararg_splices() {
    assert_eq!(
        term2("f(xs: _*)").to_sexp(),
        "(apply (name f) (repeated (name xs)))"
    );
    assert_eq!(term("f(xs*)").to_sexp(), "(apply (name f) (repeated (name xs)))");
}

#[test]
fn lambdas() {
    assert_eq!(term("x => x").to_sexp(), "(function ((param x)) (name x))");
    assert_eq!(term("(x) => x").to_sexp(), "(function ((param x)) (name x))");
    assert_eq!(
        term("(x: Int) => x").to_sexp(),
        "(function ((param x (tname Int))) (name x))"
    );
    assert_eq!(
        term("(a, b) => a").to_sexp(),
        "(function ((param a) (param b)) (name a))"
    );
    assert_eq!(term("_ => 1").to_sexp(), "(function ((param _)) (int 1))");
}

#[test]
fn implicit_lambda() {
    let t = term2("implicit x => x");
    match t.kind {
        TermKind::Function { params, .. } => {
            assert_eq!(params.len(), 1);
            assert!(params[0].mods.iter().any(|m| m.label() == "implicit"));
        }
        other => panic!("expected function, got {:?}", other),
    }
}

#[test]
fn context_function_literal() {
    let t = term("(x: Int) ?=> x");
    assert!(matches!(t.kind, TermKind::ContextFunction { .. }));
}

#[test]
fn illegal_formal_parameter() {
    let err = term_err("(a + b) => c");
    assert!(err.to_string().contains("not a legal formal parameter"));
}

#[test]
fn new_expressions() {
    assert_eq!(term("new Foo(1)").to_sexp(), "(new (init (tname Foo) ((int 1))))");
    let t = term("new Foo { def f = 1 }");
    assert!(matches!(t.kind, TermKind::NewAnonymous(_)));
    let t = term2("new B with M { }");
    match t.kind {
        TermKind::NewAnonymous(templ) => assert_eq!(templ.inits.len(), 2),
        other => panic!("expected anonymous template, got {:?}", other),
    }
}

#[test]
fn string_interpolation() {
    assert_eq!(
        term(r#"s"a ${x + 1} b""#).to_sexp(),
        "(interpolate s ((string \"a \") (string \" b\")) \
         ((block (apply_infix (name x) + (int 1)))))"
    );
    assert_eq!(
        term(r#"s"hi $name""#).to_sexp(),
        "(interpolate s ((string \"hi \") (string \"\")) ((name name)))"
    );
}

#[test]
fn quote_and_splice() {
    assert_eq!(term("'{ x }").to_sexp(), "(quoted (block (name x)))");
    assert_eq!(term("'[ Int ]").to_sexp(), "(quoted_type (tname Int))");
    assert_eq!(term("${ x }").to_sexp(), "(spliced (block (name x)))");
    let mut parser = Parser::new("${ x }", Dialect::scala213()).unwrap();
    assert!(parser.parse_term().is_err());
}

#[test]
fn negated_literals_reach_min_values() {
    assert_eq!(term("-2147483648").to_sexp(), "(int -2147483648)");
    assert_eq!(term("-1").to_sexp(), "(int -1)");
    let err = term_err("2147483648");
    assert!(matches!(err, ParseError::NumericOutOfRange { .. }));
}

#[test]
fn blocks_and_local_definitions() {
    assert_eq!(
        term("{ val y = 1; y }").to_sexp(),
        "(block (defn_val ((var y)) (int 1)) (name y))"
    );
}

#[test]
fn block_lambda_extends_to_block_end() {
    assert_eq!(
        term("{ x => val y = x; y }").to_sexp(),
        "(block (function ((param x)) (block (defn_val ((var y)) (name x)) (name y))))"
    );
}

#[test]
fn leading_infix_operator_continues_line() {
    assert_eq!(
        term("a\n  + b").to_sexp(),
        "(apply_infix (name a) + (name b))"
    );
}

#[test]
fn indented_branches() {
    assert_eq!(
        term("if x > 0 then\n  a\nelse\n  b").to_sexp(),
        "(if (apply_infix (name x) > (int 0)) (name a) (name b))"
    );
}

#[test]
fn indented_match() {
    assert_eq!(
        term("x match\n  case 1 => a\n  case 2 => b").to_sexp(),
        "(match (name x) (case (int 1) (name a)) (case (int 2) (name b)))"
    );
}

#[test]
fn end_marker_statement() {
    let mut parser = Parser::new("object a:\n  val x = 1\nend a", Dialect::scala3()).unwrap();
    let source = parser.parse_source().unwrap();
    assert_eq!(source.stats.len(), 2);
    assert!(matches!(
        &source.stats[1],
        Stat::Term(Term { kind: TermKind::EndMarker { name }, .. }) if name == "a"
    ));
}
