use super::*;
use crate::def::EnumKind;
use crate::test_fixtures::{Hierarchy, World};

#[test]
fn test_direct_supertypes_of_classes() {
    let h = Hierarchy::new();
    let db = h.world.db();
    assert_eq!(direct_supertypes(db, h.b).as_slice(), &[h.a]);
    assert_eq!(
        direct_supertypes(db, h.a).as_slice(),
        &[h.world.builtins.object_type]
    );
    assert!(direct_supertypes(db, h.world.builtins.object_type).is_empty());
    assert_eq!(
        direct_supertypes(db, h.ai).as_slice(),
        &[h.a, h.i]
    );
}

#[test]
fn test_all_supertypes_breadth_first() {
    let h = Hierarchy::new();
    let object = h.world.builtins.object_type;
    assert_eq!(all_supertypes(h.world.db(), h.c), vec![h.c, h.b, h.a, object]);
}

#[test]
fn test_supertypes_of_non_nominal_types() {
    let w = World::new();
    let db = w.db();
    let lit = w.types.literal_string("x");
    assert_eq!(direct_supertypes(db, lit).as_slice(), &[TypeId::STRING]);

    let f = w.types.function(crate::types::FunctionShape::new(Vec::new(), TypeId::VOID));
    assert_eq!(
        direct_supertypes(db, f).as_slice(),
        &[w.builtins.function_type]
    );
    assert!(direct_supertypes(db, TypeId::NUMBER).is_empty());
}

#[test]
fn test_cyclic_extends_terminates() {
    let w = World::new();
    let (x_def, x) = w.class("X", None);
    let (_, y) = w.class("Y", Some(x));
    w.defs.update(x_def, |info| info.extends = Some(y));

    let supers = all_supertypes(w.db(), x);
    assert_eq!(supers, vec![x, y]);
}

#[test]
fn test_find_instantiation_through_generic_chain() {
    let w = World::new();
    let generator = w.types.nominal(
        w.builtins.generator,
        vec![TypeId::NUMBER, TypeId::STRING, TypeId::BOOLEAN],
    );
    let found = find_instantiation(w.db(), generator, w.builtins.iterable).expect("iterable");
    assert_eq!(w.format(found), "Iterable<number>");
    assert!(find_instantiation(w.db(), generator, w.builtins.array).is_none());
}

#[test]
fn test_classifier_chain_of_enum_literal() {
    let w = World::new();
    let (e, _) = w.enumeration("Color", EnumKind::StringBased, &["Red"]);
    let red = w.defs.get(e).expect("enum").members[0];
    let lit = w.types.enum_literal(e, red);

    let chain = classifier_chain(w.db(), lit);
    assert_eq!(chain[0], e);
    assert!(chain.contains(&w.builtins.n4_string_based_enum));
    assert!(chain.contains(&w.builtins.n4_enum));
}
