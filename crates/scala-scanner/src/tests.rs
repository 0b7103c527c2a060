#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use pretty_assertions::assert_eq;
use scala_dialect::Dialect;
use scala_token::TokenKind as K;

fn scan_kinds(src: &str, dialect: &Dialect) -> Vec<K> {
    let input = Input::new(src);
    tokenize(&input, dialect)
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .filter(|k| !k.is_trivia())
        .collect()
}

fn scan_all(src: &str, dialect: &Dialect) -> Vec<Token> {
    tokenize(&Input::new(src), dialect).unwrap()
}

#[test]
fn scans_simple_definition() {
    let kinds = scan_kinds("val x = 42", &Dialect::scala3());
    assert_eq!(kinds, vec![K::KwVal, K::Ident, K::Eq, K::IntLit]);
}

#[test]
fn full_stream_is_bracketed_and_covering() {
    let tokens = scan_all("a + b", &Dialect::scala3());
    assert_eq!(tokens.first().unwrap().kind, K::BOF);
    assert_eq!(tokens.last().unwrap().kind, K::EOF);
    let mut pos = 0;
    for t in &tokens {
        assert_eq!(t.span.start, pos);
        pos = t.span.end;
    }
    assert_eq!(pos, 5);
}

#[test]
fn newline_kinds() {
    let tokens = scan_all("a\nb\n\nc", &Dialect::scala3());
    let breaks: Vec<K> = tokens.iter().map(|t| t.kind).filter(|k| k.is_line_end()).collect();
    assert_eq!(breaks, vec![K::LF, K::LFLF]);
}

#[test]
fn blank_line_with_spaces_is_still_lflf() {
    let tokens = scan_all("a\n   \nb", &Dialect::scala3());
    let breaks: Vec<K> = tokens.iter().map(|t| t.kind).filter(|k| k.is_line_end()).collect();
    assert_eq!(breaks, vec![K::LFLF]);
}

#[test]
fn comments_nest() {
    let kinds = scan_kinds("a /* one /* two */ still */ b // tail", &Dialect::scala3());
    assert_eq!(kinds, vec![K::Ident, K::Ident]);
    let tokens = scan_all("/* x */", &Dialect::scala3());
    assert!(tokens.iter().any(|t| t.kind == K::BlockComment));
}

#[test]
fn numeric_literals_decode() {
    let tokens = scan_all("42 42L 1.5 1.5f 2.5d 1e3 0xFF 0xFFL 1_000", &Dialect::scala3());
    let lits: Vec<(K, Payload)> = tokens
        .iter()
        .filter(|t| !t.kind.is_trivia())
        .map(|t| (t.kind, t.payload.clone()))
        .collect();
    assert_eq!(
        lits,
        vec![
            (K::IntLit, Payload::Int(42)),
            (K::LongLit, Payload::Long(42)),
            (K::DoubleLit, Payload::Double(1.5)),
            (K::FloatLit, Payload::Float(1.5)),
            (K::DoubleLit, Payload::Double(2.5)),
            (K::DoubleLit, Payload::Double(1000.0)),
            (K::IntLit, Payload::Int(255)),
            (K::LongLit, Payload::Long(255)),
            (K::IntLit, Payload::Int(1000)),
        ]
    );
}

#[test]
fn int_out_of_range_is_rejected() {
    let err = tokenize(&Input::new("2147483649"), &Dialect::scala3()).unwrap_err();
    assert!(matches!(err, ParseError::NumericOutOfRange { target: "Int", .. }));
    // The minimum magnitude is representable; the parser applies the sign.
    assert!(tokenize(&Input::new("2147483648"), &Dialect::scala3()).is_ok());
}

#[test]
fn dot_after_integer_is_a_selector() {
    let kinds = scan_kinds("1.toString", &Dialect::scala3());
    assert_eq!(kinds, vec![K::IntLit, K::Dot, K::Ident]);
}

#[test]
fn string_escapes_decode() {
    let tokens = scan_all(r#""a\tbA""#, &Dialect::scala3());
    let lit = tokens.iter().find(|t| t.kind == K::StringLit).unwrap();
    assert_eq!(lit.payload, Payload::Str(Arc::from("a\tbA")));
}

#[test]
fn triple_quoted_strings_keep_raw_content() {
    let src = "\"\"\" a \"quoted\" \\n \"\"\"";
    let tokens = scan_all(src, &Dialect::scala3());
    let lit = tokens.iter().find(|t| t.kind == K::StringLit).unwrap();
    assert_eq!(lit.payload, Payload::Str(Arc::from(" a \"quoted\" \\n ")));
}

#[test]
fn char_and_symbol_literals() {
    let tokens = scan_all("'a' '\\n' '{'", &Dialect::scala3());
    let chars: Vec<Payload> = tokens
        .iter()
        .filter(|t| t.kind == K::CharLit)
        .map(|t| t.payload.clone())
        .collect();
    assert_eq!(
        chars,
        vec![Payload::Char('a'), Payload::Char('\n'), Payload::Char('{')]
    );

    let tokens = scan_all("'sym", &Dialect::scala213());
    let sym = tokens.iter().find(|t| t.kind == K::SymbolLit).unwrap();
    assert_eq!(sym.payload, Payload::Str(Arc::from("sym")));

    let err = tokenize(&Input::new("'sym"), &Dialect::scala3()).unwrap_err();
    assert!(matches!(err, ParseError::DialectForbidden { .. }));
}

#[test]
fn macro_quote_and_splice() {
    let kinds = scan_kinds("'{ x }", &Dialect::scala3());
    assert_eq!(kinds, vec![K::MacroQuote, K::LeftBrace, K::Ident, K::RightBrace]);
    let kinds = scan_kinds("'[ T ]", &Dialect::scala3());
    assert_eq!(kinds, vec![K::MacroQuote, K::LeftBracket, K::Ident, K::RightBracket]);
    let kinds = scan_kinds("${ x }", &Dialect::scala3());
    assert_eq!(kinds, vec![K::MacroSplice, K::LeftBrace, K::Ident, K::RightBrace]);
}

#[test]
fn dialect_conditional_keywords_scan_as_idents_elsewhere() {
    assert_eq!(scan_kinds("given", &Dialect::scala3()), vec![K::KwGiven]);
    assert_eq!(scan_kinds("given", &Dialect::scala213()), vec![K::Ident]);
    assert_eq!(scan_kinds("enum", &Dialect::scala213()), vec![K::Ident]);
}

#[test]
fn operator_identifier_shapes() {
    assert_eq!(scan_kinds("foo_+", &Dialect::scala3()), vec![K::Ident]);
    assert_eq!(scan_kinds("_*", &Dialect::scala3()), vec![K::Underscore, K::Ident]);
    assert_eq!(scan_kinds("`type`", &Dialect::scala3()), vec![K::Ident]);
    assert_eq!(scan_kinds("a :: b", &Dialect::scala3()), vec![K::Ident, K::Ident, K::Ident]);
}

#[test]
fn reserved_arrows_are_dialect_gated() {
    assert_eq!(scan_kinds("=>>", &Dialect::scala3()), vec![K::TypeLambdaArrow]);
    assert_eq!(scan_kinds("=>>", &Dialect::scala213()), vec![K::Ident]);
    assert_eq!(scan_kinds("?=>", &Dialect::scala3()), vec![K::CtxArrow]);
    assert_eq!(scan_kinds("?=>", &Dialect::scala213()), vec![K::Ident]);
    assert_eq!(scan_kinds("=>", &Dialect::scala213()), vec![K::RightArrow]);
}

#[test]
fn interpolation_token_family() {
    let kinds = scan_kinds(r#"s"a ${x + 1} b $y end""#, &Dialect::scala3());
    assert_eq!(
        kinds,
        vec![
            K::InterpolationId,
            K::InterpolationStart,
            K::InterpolationPart,
            K::InterpolationSpliceStart,
            K::LeftBrace,
            K::Ident,
            K::Ident,
            K::IntLit,
            K::RightBrace,
            K::InterpolationSpliceEnd,
            K::InterpolationPart,
            K::InterpolationSpliceStart,
            K::Ident,
            K::InterpolationSpliceEnd,
            K::InterpolationPart,
            K::InterpolationEnd,
        ]
    );
}

#[test]
fn interpolation_dollar_escape() {
    let tokens = scan_all(r#"s"cost: $$5""#, &Dialect::scala3());
    let part = tokens.iter().find(|t| t.kind == K::InterpolationPart).unwrap();
    assert_eq!(part.payload, Payload::Str(Arc::from("cost: $5")));
}

#[test]
fn nested_interpolation() {
    let kinds = scan_kinds(r#"s"${s"inner"}""#, &Dialect::scala3());
    assert_eq!(
        kinds,
        vec![
            K::InterpolationId,
            K::InterpolationStart,
            K::InterpolationSpliceStart,
            K::LeftBrace,
            K::InterpolationId,
            K::InterpolationStart,
            K::InterpolationPart,
            K::InterpolationEnd,
            K::RightBrace,
            K::InterpolationSpliceEnd,
            K::InterpolationEnd,
        ]
    );
}

#[test]
fn unquote_dialect_tokens() {
    let d = Dialect::scala3().unquote_term();
    assert_eq!(scan_kinds("$x", &d), vec![K::Unquote, K::Ident]);
    assert_eq!(scan_kinds("${ x }", &d), vec![K::Unquote, K::LeftBrace, K::Ident, K::RightBrace]);
    assert_eq!(scan_kinds("..$xs", &d), vec![K::Ellipsis, K::Unquote, K::Ident]);
    assert_eq!(scan_kinds("...$xss", &d), vec![K::Ellipsis, K::Unquote, K::Ident]);
    // Without unquotes a dollar identifier stays an identifier.
    assert_eq!(scan_kinds("$x", &Dialect::scala3()), vec![K::Ident]);
}

#[test]
fn unterminated_forms_error() {
    assert!(tokenize(&Input::new("\"abc"), &Dialect::scala3()).is_err());
    assert!(tokenize(&Input::new("/* abc"), &Dialect::scala3()).is_err());
    assert!(tokenize(&Input::new("`abc"), &Dialect::scala3()).is_err());
    assert!(tokenize(&Input::new("s\"abc"), &Dialect::scala3()).is_err());
}
