use super::*;
use crate::def::{DefKind, EnumKind, Variance};
use crate::test_fixtures::{Hierarchy, World};
use crate::types::{ParamInfo, StructuralMember};
use rust_decimal::Decimal;

#[test]
fn test_intrinsics_and_sentinels() {
    let w = World::new();
    assert_eq!(w.format(TypeId::UNKNOWN), "[unknown]");
    assert_eq!(w.format(TypeId::DYNAMIC_ANY), "any+");
    assert_eq!(w.format(TypeId::ANY), "any");
    assert_eq!(w.format(TypeId::UNDEFINED), "undefined");
    assert_eq!(w.format(TypeId::VOID), "void");
}

#[test]
fn test_literals() {
    let w = World::new();
    let negative = w.types.literal_number(Decimal::new(-35, 1));
    assert_eq!(w.format(negative), "-3.5");
    assert_eq!(w.format(w.types.literal_number(Decimal::new(10, 1))), "1");
    assert_eq!(w.format(w.types.literal_string("s")), "\"s\"");
    assert_eq!(w.format(w.types.literal_boolean(true)), "true");

    let (e, _) = w.enumeration("E", EnumKind::Normal, &["Red"]);
    let red = w.defs.get(e).expect("enum").members[0];
    assert_eq!(w.format(w.types.enum_literal(e, red)), "E.Red");
}

#[test]
fn test_composites() {
    let h = Hierarchy::new();
    let types = &h.world.types;
    let union = types.union_unsimplified(vec![h.a, h.b]);
    let inter = types.intersection_unsimplified(vec![h.a, h.i]);
    assert_eq!(h.world.format(union), "union{A,B}");
    assert_eq!(h.world.format(inter), "intersection{A,I}");
    assert_eq!(h.world.format(types.meta_type(h.a)), "type{A}");
    assert_eq!(h.world.format(types.constructor_type(h.a)), "constructor{A}");
    assert_eq!(h.world.format(types.this_type(Some(h.c))), "this[C]");
    assert_eq!(h.world.format(types.this_type(None)), "this");
}

#[test]
fn test_wildcards_and_generics() {
    let h = Hierarchy::new();
    let w = &h.world;
    let (g, _) = w.generic(DefKind::Class, "G", &[("T", Variance::Invariant)]);
    let extends_a = w.types.wildcard(Some(h.a), WildcardKind::Extends);
    let super_a = w.types.wildcard(Some(h.a), WildcardKind::Super);
    let open = w.types.wildcard(None, WildcardKind::Extends);

    assert_eq!(w.format(w.types.nominal(g, vec![extends_a])), "G<? extends A>");
    assert_eq!(w.format(super_a), "? super A");
    assert_eq!(w.format(open), "?");
}

#[test]
fn test_structural_types() {
    let w = World::new();
    let empty = w.types.structural(StructuralShape::default());
    assert_eq!(w.format(empty), "~Object");

    let shape = StructuralShape {
        members: vec![
            StructuralMember {
                name: w.atom("a"),
                type_id: TypeId::NUMBER,
                optional: false,
                def: None,
            },
            StructuralMember {
                name: w.atom("b"),
                type_id: TypeId::STRING,
                optional: true,
                def: None,
            },
        ],
    };
    assert_eq!(
        w.format(w.types.structural(shape)),
        "~Object with { a: number; b?: string }"
    );
}

#[test]
fn test_function_types() {
    let w = World::new();
    let mut optional = ParamInfo::required(w.atom("a"), TypeId::NUMBER);
    optional.optional = true;
    let mut rest = ParamInfo::required(w.atom("r"), TypeId::STRING);
    rest.rest = true;
    let f = w
        .types
        .function(FunctionShape::new(vec![optional, rest], TypeId::VOID));
    assert_eq!(w.format(f), "{function(number=,...string):void}");
}
