//! Reserved word table.

use scala_dialect::Dialect;
use scala_token::TokenKind;

/// Reserved words that are keywords in every dialect.
static KEYWORDS: phf::Map<&'static str, TokenKind> = phf::phf_map! {
    "abstract" => TokenKind::KwAbstract,
    "case" => TokenKind::KwCase,
    "catch" => TokenKind::KwCatch,
    "class" => TokenKind::KwClass,
    "def" => TokenKind::KwDef,
    "do" => TokenKind::KwDo,
    "else" => TokenKind::KwElse,
    "extends" => TokenKind::KwExtends,
    "false" => TokenKind::KwFalse,
    "final" => TokenKind::KwFinal,
    "finally" => TokenKind::KwFinally,
    "for" => TokenKind::KwFor,
    "if" => TokenKind::KwIf,
    "implicit" => TokenKind::KwImplicit,
    "import" => TokenKind::KwImport,
    "lazy" => TokenKind::KwLazy,
    "macro" => TokenKind::KwMacro,
    "match" => TokenKind::KwMatch,
    "new" => TokenKind::KwNew,
    "null" => TokenKind::KwNull,
    "object" => TokenKind::KwObject,
    "override" => TokenKind::KwOverride,
    "package" => TokenKind::KwPackage,
    "private" => TokenKind::KwPrivate,
    "protected" => TokenKind::KwProtected,
    "return" => TokenKind::KwReturn,
    "sealed" => TokenKind::KwSealed,
    "super" => TokenKind::KwSuper,
    "this" => TokenKind::KwThis,
    "throw" => TokenKind::KwThrow,
    "trait" => TokenKind::KwTrait,
    "true" => TokenKind::KwTrue,
    "try" => TokenKind::KwTry,
    "type" => TokenKind::KwType,
    "val" => TokenKind::KwVal,
    "var" => TokenKind::KwVar,
    "while" => TokenKind::KwWhile,
    "with" => TokenKind::KwWith,
    "yield" => TokenKind::KwYield,
};

/// Classify an identifier's text, honoring dialect-conditional keywords.
///
/// `enum`, `export`, `given`, `then`, and `forSome` are reserved only in the
/// dialects that carry their constructs; elsewhere they scan as plain
/// identifiers.
pub fn keyword_kind(text: &str, dialect: &Dialect) -> Option<TokenKind> {
    if let Some(kind) = KEYWORDS.get(text) {
        return Some(*kind);
    }
    match text {
        "enum" if dialect.allow_enums => Some(TokenKind::KwEnum),
        "export" if dialect.allow_export_clauses => Some(TokenKind::KwExport),
        "given" if dialect.allow_given_using => Some(TokenKind::KwGiven),
        "then" if dialect.allow_quiet_syntax => Some(TokenKind::KwThen),
        "forSome" if dialect.allow_existential_types => Some(TokenKind::KwForsome),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialect_conditional_keywords() {
        let d2 = Dialect::scala213();
        let d3 = Dialect::scala3();
        assert_eq!(keyword_kind("enum", &d2), None);
        assert_eq!(keyword_kind("enum", &d3), Some(TokenKind::KwEnum));
        assert_eq!(keyword_kind("forSome", &d2), Some(TokenKind::KwForsome));
        assert_eq!(keyword_kind("forSome", &d3), None);
        assert_eq!(keyword_kind("val", &d2), Some(TokenKind::KwVal));
    }
}
