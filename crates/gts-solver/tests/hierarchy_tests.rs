use super::*;
use crate::def::{DefFlags, EnumKind, Variance};
use crate::test_fixtures::{Hierarchy, World};
use crate::types::{FunctionShape, ParamInfo, StructuralMember, StructuralShape};

fn sub(h: &Hierarchy, source: TypeId, target: TypeId) -> bool {
    TypeHierarchy::new(h.world.db()).is_subtype(&Environment::new(), source, target)
}

#[test]
fn test_class_hierarchy() {
    let h = Hierarchy::new();
    assert!(sub(&h, h.b, h.a));
    assert!(sub(&h, h.c, h.a));
    assert!(!sub(&h, h.a, h.b));
    assert!(!sub(&h, h.d, h.a));
    assert!(sub(&h, h.ai, h.i));
    assert!(!sub(&h, h.a, h.i));
}

#[test]
fn test_bottom_and_top_types() {
    let h = Hierarchy::new();
    assert!(sub(&h, TypeId::NULL, h.a));
    assert!(!sub(&h, TypeId::NULL, TypeId::UNDEFINED));
    assert!(sub(&h, TypeId::UNDEFINED, TypeId::NULL));
    assert!(sub(&h, h.a, TypeId::ANY));
    assert!(!sub(&h, TypeId::ANY, h.a));
    assert!(sub(&h, TypeId::DYNAMIC_ANY, h.a));
}

#[test]
fn test_unknown_is_never_a_contradiction() {
    let h = Hierarchy::new();
    assert!(sub(&h, TypeId::UNKNOWN, h.a));
    assert!(sub(&h, h.a, TypeId::UNKNOWN));
}

#[test]
fn test_literals_and_primitives() {
    let h = Hierarchy::new();
    let x = h.world.types.literal_string("x");
    let one = h.world.types.literal_number(1.into());
    let object = h.world.builtins.object_type;
    assert!(sub(&h, x, TypeId::STRING));
    assert!(!sub(&h, one, TypeId::STRING));
    assert!(!sub(&h, TypeId::STRING, x));
    assert!(!sub(&h, TypeId::NUMBER, object));
    assert!(sub(&h, h.a, object));
}

#[test]
fn test_unions_and_intersections() {
    let h = Hierarchy::new();
    let types = &h.world.types;
    let b_or_c = types.union_unsimplified(vec![h.b, h.c]);
    let a_or_d = types.union_unsimplified(vec![h.a, h.d]);
    let a_and_i = types.intersection_unsimplified(vec![h.a, h.i]);

    assert!(sub(&h, b_or_c, h.a));
    assert!(!sub(&h, a_or_d, h.a));
    assert!(sub(&h, h.d, a_or_d));
    assert!(sub(&h, h.ai, a_and_i));
    assert!(!sub(&h, h.b, a_and_i));
    assert!(sub(&h, a_and_i, h.i));
}

#[test]
fn test_generic_arguments_follow_declared_variance() {
    let h = Hierarchy::new();
    let w = &h.world;
    let array_b = w.builtins.array_of(&w.types, h.b);
    let array_a = w.builtins.array_of(&w.types, h.a);
    let iterable_b = w.builtins.iterable_of(&w.types, h.b, false);
    let iterable_a = w.builtins.iterable_of(&w.types, h.a, false);

    assert!(!sub(&h, array_b, array_a));
    assert!(sub(&h, iterable_b, iterable_a));
    assert!(sub(&h, array_b, iterable_a));
    assert!(!sub(&h, iterable_a, iterable_b));
}

#[test]
fn test_contravariant_type_parameter() {
    let h = Hierarchy::new();
    let w = &h.world;
    let (sink, _) = w.generic(DefKind::Interface, "Sink", &[("T", Variance::Contravariant)]);
    let sink_a = w.types.nominal(sink, vec![h.a]);
    let sink_b = w.types.nominal(sink, vec![h.b]);
    assert!(sub(&h, sink_a, sink_b));
    assert!(!sub(&h, sink_b, sink_a));
}

#[test]
fn test_wildcard_arguments() {
    let h = Hierarchy::new();
    let w = &h.world;
    let extends_a = w.types.wildcard(Some(h.a), WildcardKind::Extends);
    let super_b = w.types.wildcard(Some(h.b), WildcardKind::Super);
    let array = |t| w.builtins.array_of(&w.types, t);

    assert!(sub(&h, array(h.b), array(extends_a)));
    assert!(!sub(&h, array(h.d), array(extends_a)));
    assert!(sub(&h, array(h.a), array(super_b)));
    assert!(!sub(&h, array(h.c), array(super_b)));
    assert!(sub(&h, extends_a, h.a));
}

#[test]
fn test_function_parameters_are_contravariant() {
    let h = Hierarchy::new();
    let w = &h.world;
    let takes = |t| {
        w.types.function(FunctionShape::new(
            vec![ParamInfo::required(w.atom("p"), t)],
            TypeId::VOID,
        ))
    };
    assert!(sub(&h, takes(h.a), takes(h.b)));
    assert!(!sub(&h, takes(h.b), takes(h.a)));

    let returns = |t| w.types.function(FunctionShape::new(Vec::new(), t));
    assert!(sub(&h, returns(h.b), returns(h.a)));
    assert!(!sub(&h, returns(h.a), returns(h.b)));
    assert!(sub(&h, returns(h.a), w.builtins.function_type));
}

#[test]
fn test_structural_width_and_optional_members() {
    let h = Hierarchy::new();
    let w = &h.world;
    let member = |name: &str, ty, optional| StructuralMember {
        name: w.atom(name),
        type_id: ty,
        optional,
        def: None,
    };
    let a_only = w.types.structural(StructuralShape {
        members: vec![member("a", TypeId::NUMBER, false)],
    });
    let a_and_b = w.types.structural(StructuralShape {
        members: vec![
            member("a", TypeId::NUMBER, false),
            member("b", TypeId::STRING, false),
        ],
    });
    let a_opt_b = w.types.structural(StructuralShape {
        members: vec![
            member("a", TypeId::NUMBER, false),
            member("b", TypeId::STRING, true),
        ],
    });

    assert!(sub(&h, a_and_b, a_only));
    assert!(sub(&h, a_only, a_opt_b));
    assert!(!sub(&h, a_only, a_and_b));
    assert!(sub(&h, a_only, w.builtins.object_type));
    assert!(!sub(&h, a_only, h.a));
}

#[test]
fn test_meta_types() {
    let h = Hierarchy::new();
    let types = &h.world.types;
    assert!(sub(&h, types.constructor_type(h.b), types.meta_type(h.a)));
    assert!(sub(&h, types.meta_type(h.b), types.meta_type(h.a)));
    assert!(!sub(&h, types.meta_type(h.b), types.constructor_type(h.a)));
    assert!(!sub(&h, types.meta_type(h.a), types.meta_type(h.b)));
}

#[test]
fn test_enum_literal_is_subtype_of_its_enum() {
    let w = World::new();
    let (e, e_ty) = w.enumeration("Color", EnumKind::Normal, &["Red"]);
    let red = w.defs.get(e).expect("enum").members[0];
    let lit = w.types.enum_literal(e, red);
    let h = TypeHierarchy::new(w.db());
    let env = Environment::new();
    assert!(h.is_subtype(&env, lit, e_ty));
    assert!(h.is_subtype(&env, lit, w.types.nominal_simple(w.builtins.n4_enum)));
    assert!(!h.is_strict_subtype(&env, e_ty, e_ty));
    assert!(h.is_strict_subtype(&env, lit, e_ty));
}

#[test]
fn test_type_variable_uses_its_bound() {
    let h = Hierarchy::new();
    let (_, bounded) = h.world.type_param("T", Some(h.b));
    let (_, unbounded) = h.world.type_param("U", None);
    assert!(sub(&h, bounded, h.a));
    assert!(!sub(&h, unbounded, h.a));
    assert!(!sub(&h, h.b, bounded));
}

// =============================================================================
// Member lookup
// =============================================================================

#[test]
fn test_resolve_inherited_member() {
    let h = Hierarchy::new();
    let w = &h.world;
    let m = w.member(h.a_def, DefKind::Method, "m", TypeId::ANY, DefFlags::empty());
    let lookup = TypeHierarchy::new(w.db());

    assert_eq!(lookup.resolve_member(h.b, w.atom("m"), true, false), Some(m));
    assert_eq!(lookup.resolve_member(h.b, w.atom("m"), false, false), None);
    assert_eq!(lookup.resolve_member(h.a, w.atom("m"), false, false), Some(m));
    assert_eq!(lookup.resolve_member(h.a, w.atom("m"), true, true), None);
    assert_eq!(lookup.resolve_member(TypeId::NUMBER, w.atom("m"), true, false), None);
}

#[test]
fn test_resolve_static_member_through_meta_type() {
    let h = Hierarchy::new();
    let w = &h.world;
    let s = w.member(h.a_def, DefKind::Field, "s", TypeId::NUMBER, DefFlags::STATIC);
    let lookup = TypeHierarchy::new(w.db());
    let type_of_b = w.types.meta_type(h.b);
    assert_eq!(lookup.resolve_member(type_of_b, w.atom("s"), true, true), Some(s));
}

#[test]
fn test_resolve_enum_literals_and_literals_getter() {
    let w = World::new();
    let (e, e_ty) = w.enumeration("Color", EnumKind::StringBased, &["Red", "Green"]);
    let green = w.defs.get(e).expect("enum").members[1];
    let lookup = TypeHierarchy::new(w.db());
    let type_of_e = w.types.meta_type(e_ty);

    assert_eq!(lookup.resolve_member(type_of_e, w.atom("Green"), true, true), Some(green));
    assert_eq!(
        lookup.resolve_member(type_of_e, w.atom("literals"), true, true),
        Some(w.builtins.string_enum_literals)
    );
}

#[test]
fn test_resolve_member_on_union_requires_agreement() {
    let h = Hierarchy::new();
    let w = &h.world;
    let m = w.member(h.a_def, DefKind::Method, "m", TypeId::ANY, DefFlags::empty());
    let lookup = TypeHierarchy::new(w.db());

    let b_or_c = w.types.union_unsimplified(vec![h.b, h.c]);
    let a_or_d = w.types.union_unsimplified(vec![h.a, h.d]);
    assert_eq!(lookup.resolve_member(b_or_c, w.atom("m"), true, false), Some(m));
    assert_eq!(lookup.resolve_member(a_or_d, w.atom("m"), true, false), None);
}
