#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use pretty_assertions::assert_eq;

fn stat3(src: &str) -> Stat {
    let mut parser = Parser::new(src, Dialect::scala3()).unwrap();
    parser.parse_stat().unwrap()
}

fn stat2(src: &str) -> Stat {
    let mut parser = Parser::new(src, Dialect::scala213()).unwrap();
    parser.parse_stat().unwrap()
}

fn class_of(stat: Stat) -> (Vec<Mod>, String, Vec<TypeParam>, Ctor, Template) {
    match stat {
        Stat::Defn(Defn { kind: DefnKind::Class { mods, name, tparams, ctor, templ }, .. }) => {
            (mods, name, tparams, ctor, templ)
        }
        other => panic!("expected class, got {:?}", other),
    }
}

#[test]
fn class_with_bounded_tparam_parents_and_body() {
    let (mods, name, tparams, ctor, templ) =
        class_of(stat2("class C[T <: Ord[T]](x: T) extends B with M { def f = x }"));
    assert!(mods.is_empty());
    assert_eq!(name, "C");

    assert_eq!(tparams.len(), 1);
    assert_eq!(tparams[0].name.as_deref(), Some("T"));
    assert_eq!(
        tparams[0].bounds.hi.as_ref().map(|t| t.to_sexp()),
        Some("(tapply (tname Ord) (tname T))".to_string())
    );

    match &ctor.kind {
        CtorKind::Primary { paramss, .. } => {
            assert_eq!(paramss.len(), 1);
            let param = &paramss[0].params[0];
            assert_eq!(param.name.as_deref(), Some("x"));
            // A plain class parameter carries no val/var marker.
            assert!(param.mods.is_empty());
        }
        other => panic!("expected primary ctor, got {:?}", other),
    }

    assert_eq!(templ.inits.len(), 2);
    assert_eq!(templ.inits[0].to_sexp(), "(init (tname B))");
    assert_eq!(templ.inits[1].to_sexp(), "(init (tname M))");
    assert_eq!(templ.stats.len(), 1);
    assert_eq!(
        templ.stats[0].to_sexp(),
        "(defn_def f () () (name x))"
    );
}

#[test]
fn case_class_val_params() {
    let (mods, _, _, ctor, _) = class_of(stat3("case class P(x: Int, val y: Int)"));
    assert!(mods.iter().any(|m| m.label() == "case"));
    match &ctor.kind {
        CtorKind::Primary { paramss, .. } => {
            assert!(paramss[0].params[0].mods.is_empty());
            assert!(paramss[0].params[1].mods.iter().any(|m| m.label() == "val"));
        }
        other => panic!("expected primary ctor, got {:?}", other),
    }
}

#[test]
fn case_class_requires_params() {
    let mut parser = Parser::new("case class C", Dialect::scala3()).unwrap();
    let err = parser.parse_stat().unwrap_err();
    assert!(err.to_string().contains("case classes must have a parameter list"));
}

#[test]
fn self_type_annotation() {
    let s = stat2("trait Printer { self: Console => def print(): Unit }");
    match s {
        Stat::Defn(Defn { kind: DefnKind::Trait { templ, .. }, .. }) => {
            let selfty = templ.self_type.expect("self type");
            assert_eq!(selfty.name.as_deref(), Some("self"));
            assert_eq!(
                selfty.tpe.map(|t| t.to_sexp()),
                Some("(tname Console)".to_string())
            );
            assert_eq!(templ.stats.len(), 1);
        }
        other => panic!("expected trait, got {:?}", other),
    }
}

#[test]
fn self_type_speculation_rewinds() {
    // The prefix is an ordinary statement, not a self type.
    let s = stat2("trait T { foo(1); def g: Int }");
    match s {
        Stat::Defn(Defn { kind: DefnKind::Trait { templ, .. }, .. }) => {
            assert!(templ.self_type.is_none());
            assert_eq!(templ.stats.len(), 2);
        }
        other => panic!("expected trait, got {:?}", other),
    }
}

#[test]
fn trait_parameters_are_dialect_gated() {
    assert!(matches!(
        Parser::new("trait T(x: Int)", Dialect::scala213())
            .unwrap()
            .parse_stat()
            .unwrap_err(),
        ParseError::DialectForbidden { .. }
    ));
    let s = stat3("trait T(x: Int)");
    assert!(matches!(
        s,
        Stat::Defn(Defn { kind: DefnKind::Trait { .. }, .. })
    ));
}

#[test]
fn objects_and_case_objects() {
    assert_eq!(
        stat3("object Main { def run = 1 }").to_sexp(),
        "(object Main (template ((defn_def run () () (int 1)))))"
    );
    let s = stat3("case object Empty");
    match s {
        Stat::Defn(Defn { kind: DefnKind::Object { mods, .. }, .. }) => {
            assert!(mods.iter().any(|m| m.label() == "case"));
        }
        other => panic!("expected object, got {:?}", other),
    }
}

#[test]
fn secondary_constructors() {
    let (_, _, _, _, templ) =
        class_of(stat2("class C(x: Int) { def this() = this(0) }"));
    match &templ.stats[0] {
        Stat::Defn(Defn { kind: DefnKind::SecondaryCtor(ctor), .. }) => match &ctor.kind {
            CtorKind::Secondary { init, stats, .. } => {
                assert_eq!(init.to_sexp(), "(init (singleton (this)) ((int 0)))");
                assert!(stats.is_empty());
            }
            other => panic!("expected secondary ctor, got {:?}", other),
        },
        other => panic!("expected secondary ctor stat, got {:?}", other),
    }
}

#[test]
fn secondary_constructor_with_block_body() {
    let (_, _, _, _, templ) =
        class_of(stat2("class C(x: Int) { def this() = { this(0); init() } }"));
    match &templ.stats[0] {
        Stat::Defn(Defn { kind: DefnKind::SecondaryCtor(ctor), .. }) => match &ctor.kind {
            CtorKind::Secondary { stats, .. } => assert_eq!(stats.len(), 1),
            other => panic!("expected secondary ctor, got {:?}", other),
        },
        other => panic!("expected secondary ctor stat, got {:?}", other),
    }
}

#[test]
fn secondary_constructor_requires_this_call() {
    let mut parser =
        Parser::new("class C(x: Int) { def this() = { init() } }", Dialect::scala213()).unwrap();
    let err = parser.parse_stat().unwrap_err();
    assert!(err.to_string().contains("call to `this`"));
}

#[test]
fn enum_with_cases() {
    let s = stat3("enum Color { case Red, Green, Blue }");
    match s {
        Stat::Defn(Defn { kind: DefnKind::Enum { name, templ, .. }, .. }) => {
            assert_eq!(name, "Color");
            assert!(matches!(
                &templ.stats[0],
                Stat::Defn(Defn { kind: DefnKind::RepeatedEnumCase { cases, .. }, .. })
                    if cases == &["Red", "Green", "Blue"]
            ));
        }
        other => panic!("expected enum, got {:?}", other),
    }
}

#[test]
fn enum_with_parameterized_cases() {
    let s = stat3("enum Opt[+T] { case Som(value: T) extends Opt[T]; case Non }");
    match s {
        Stat::Defn(Defn { kind: DefnKind::Enum { tparams, templ, .. }, .. }) => {
            assert!(tparams[0].mods.iter().any(|m| m.label() == "covariant"));
            match &templ.stats[0] {
                Stat::Defn(Defn { kind: DefnKind::EnumCase { name, inits, .. }, .. }) => {
                    assert_eq!(name, "Som");
                    assert_eq!(inits.len(), 1);
                }
                other => panic!("expected enum case, got {:?}", other),
            }
            assert!(matches!(
                &templ.stats[1],
                Stat::Defn(Defn { kind: DefnKind::EnumCase { name, .. }, .. }) if name == "Non"
            ));
        }
        other => panic!("expected enum, got {:?}", other),
    }
}

#[test]
fn enums_are_dialect_gated() {
    assert!(Parser::new("enum Color { case Red }", Dialect::scala213())
        .unwrap()
        .parse_stat()
        .is_err());
}

#[test]
fn derives_clause() {
    let s = stat3("case class P(x: Int) derives Ord");
    match s {
        Stat::Defn(Defn { kind: DefnKind::Class { templ, .. }, .. }) => {
            assert_eq!(templ.derives.len(), 1);
            assert_eq!(templ.derives[0].to_sexp(), "(tname Ord)");
        }
        other => panic!("expected class, got {:?}", other),
    }
}

#[test]
fn colon_eol_template_body() {
    let s = stat3("class C:\n  def f = 1\n  def g = 2");
    match s {
        Stat::Defn(Defn { kind: DefnKind::Class { templ, .. }, .. }) => {
            assert!(templ.has_body);
            assert_eq!(templ.stats.len(), 2);
        }
        other => panic!("expected class, got {:?}", other),
    }
}

#[test]
fn bodyless_template() {
    let s = stat3("class C");
    match s {
        Stat::Defn(Defn { kind: DefnKind::Class { templ, .. }, .. }) => {
            assert!(!templ.has_body);
            assert!(templ.stats.is_empty());
        }
        other => panic!("expected class, got {:?}", other),
    }
}

#[test]
fn template_entry_point() {
    let mut parser = Parser::new("B with M { def f = 1 }", Dialect::scala213()).unwrap();
    let templ = parser.parse_template().unwrap();
    assert_eq!(templ.inits.len(), 2);
    assert_eq!(templ.stats.len(), 1);
}

#[test]
fn self_entry_point() {
    let mut parser = Parser::new("self: T =>", Dialect::scala213()).unwrap();
    let selfty = parser.parse_self().unwrap();
    assert_eq!(selfty.name.as_deref(), Some("self"));
}
