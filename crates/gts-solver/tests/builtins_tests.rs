use super::*;
use crate::def::EnumKind;
use crate::inheritance::all_supertypes;
use crate::test_fixtures::World;

#[test]
fn test_install_registers_core_declarations() {
    let w = World::new();
    let b = &w.builtins;
    assert_eq!(w.format(b.object_type), "Object");
    assert_eq!(w.format(b.function_type), "Function");
    assert_eq!(w.format(b.regexp_type), "RegExp");
    assert_eq!(w.defs.kind(b.iterable), Some(DefKind::Interface));
    assert_eq!(w.defs.kind(b.array), Some(DefKind::Class));
    assert_eq!(w.defs.get(b.promise).expect("Promise").type_params.len(), 2);
    assert_eq!(w.defs.get(b.generator).expect("Generator").type_params.len(), 3);
}

#[test]
fn test_array_is_an_iterable_of_its_element() {
    let w = World::new();
    let array_of_string = w.builtins.array_of(&w.types, TypeId::STRING);
    assert_eq!(w.format(array_of_string), "Array<string>");

    let supers = all_supertypes(w.db(), array_of_string);
    let iterable_of_string = w.builtins.iterable_of(&w.types, TypeId::STRING, false);
    assert!(supers.contains(&iterable_of_string));
    assert!(supers.contains(&w.builtins.object_type));
    assert_eq!(w.db().array_element(array_of_string), Some(TypeId::STRING));
}

#[test]
fn test_array_carries_index_signature_and_length() {
    let w = World::new();
    let info = w.defs.get(w.builtins.array).expect("Array");
    assert!(info.flags.contains(DefFlags::INDEX_SIGNATURE));
    let length = w
        .defs
        .find_owned_member(w.builtins.array, w.atom("length"), false)
        .expect("length");
    assert_eq!(
        w.defs.get(length).expect("length").declared_type,
        Some(TypeId::NUMBER)
    );
}

#[test]
fn test_based_enums_have_static_literals_getter() {
    let w = World::new();
    let b = &w.builtins;
    let getter = w.defs.get(b.string_enum_literals).expect("literals");
    assert_eq!(getter.kind, DefKind::Getter);
    assert!(getter.is_static());
    assert_eq!(getter.owner, Some(b.n4_string_based_enum));
    assert_eq!(
        w.format(getter.declared_type.expect("type")),
        "Array<string>"
    );

    let number_getter = w.defs.get(b.number_enum_literals).expect("literals");
    assert_eq!(
        w.format(number_getter.declared_type.expect("type")),
        "Array<number>"
    );
}

#[test]
fn test_enum_base_by_kind() {
    let w = World::new();
    let b = &w.builtins;
    assert_eq!(b.enum_base(EnumKind::Normal), b.n4_enum);
    assert_eq!(b.enum_base(EnumKind::NumberBased), b.n4_number_based_enum);
    assert_eq!(b.enum_base(EnumKind::StringBased), b.n4_string_based_enum);
}

#[test]
fn test_promise_of_formats_both_arguments() {
    let w = World::new();
    let promise = w
        .builtins
        .promise_of(&w.types, TypeId::NUMBER, w.builtins.error_type);
    assert_eq!(w.format(promise), "Promise<number,Error>");
}
