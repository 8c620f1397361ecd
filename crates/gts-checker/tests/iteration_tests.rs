use super::*;
use crate::test_fixtures::Program;
use gts_solver::{DefinitionInfo, Variance};

#[test]
fn test_primitive_and_open_iterables() {
    let p = Program::new();
    let literal = p.types.literal_string("abc");

    p.with_judgment(|j| {
        let env = Environment::new();
        assert_eq!(j.iterable_element_type(&env, TypeId::STRING, false), Some(TypeId::STRING));
        assert_eq!(j.iterable_element_type(&env, literal, false), Some(TypeId::STRING));
        assert_eq!(j.iterable_element_type(&env, TypeId::ANY, false), Some(TypeId::ANY));
        assert_eq!(
            j.iterable_element_type(&env, TypeId::DYNAMIC_ANY, true),
            Some(TypeId::DYNAMIC_ANY)
        );
        assert_eq!(j.iterable_element_type(&env, TypeId::NUMBER, false), None);
    });
}

#[test]
fn test_inherited_iterable() {
    let p = Program::new();
    let numbers = p.array_of(TypeId::NUMBER);
    let (_, plain) = p.class("Plain", None);

    p.with_judgment(|j| {
        let env = Environment::new();
        assert_eq!(j.iterable_element_type(&env, numbers, false), Some(TypeId::NUMBER));
        assert_eq!(j.iterable_element_type(&env, plain, false), None);
    });
}

#[test]
fn test_union_iterates_every_member() {
    let p = Program::new();
    let numbers = p.array_of(TypeId::NUMBER);
    let either = p.types.union_unsimplified(vec![numbers, TypeId::STRING]);
    let partly = p.types.union_unsimplified(vec![numbers, TypeId::NUMBER]);

    let element = p.with_judgment(|j| j.iterable_element_type(&Environment::new(), either, false));
    assert_eq!(element.map(|e| p.format(e)), Some("union{number,string}".to_string()));
    assert_eq!(
        p.with_judgment(|j| j.iterable_element_type(&Environment::new(), partly, false)),
        None
    );
}

#[test]
fn test_type_variable_iterates_its_bound() {
    let p = Program::new();
    let strings = p.array_of(TypeId::STRING);
    let bounded = p.defs.register(DefinitionInfo::type_variable(
        p.atom("T"),
        Some(strings),
        Variance::Invariant,
    ));
    let unbounded = p.defs.register(DefinitionInfo::type_variable(
        p.atom("U"),
        None,
        Variance::Invariant,
    ));
    let bounded = p.types.type_variable(bounded);
    let unbounded = p.types.type_variable(unbounded);

    p.with_judgment(|j| {
        let env = Environment::new();
        assert_eq!(j.iterable_element_type(&env, bounded, false), Some(TypeId::STRING));
        assert_eq!(j.iterable_element_type(&env, unbounded, false), None);
    });
}

#[test]
fn test_async_iteration() {
    let p = Program::new();
    let builtins = &p.builtins;
    let async_strings = builtins.iterable_of(&p.types, TypeId::STRING, true);
    let promise = builtins.promise_of(&p.types, TypeId::NUMBER, TypeId::UNDEFINED);
    let promises = p.array_of(promise);
    let booleans = p.array_of(TypeId::BOOLEAN);

    p.with_judgment(|j| {
        let env = Environment::new();
        assert_eq!(j.iterable_element_type(&env, async_strings, true), Some(TypeId::STRING));
        assert_eq!(j.iterable_element_type(&env, async_strings, false), None);
        assert_eq!(j.iterable_element_type(&env, promises, true), Some(TypeId::NUMBER));
        assert_eq!(j.iterable_element_type(&env, promises, false), Some(promise));
        assert_eq!(j.iterable_element_type(&env, booleans, true), Some(TypeId::BOOLEAN));
    });
}
