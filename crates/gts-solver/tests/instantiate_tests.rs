use super::*;
use crate::def::{DefKind, Variance};
use crate::test_fixtures::World;
use crate::types::ParamInfo;

#[test]
fn test_instantiate_replaces_type_arguments() {
    let w = World::new();
    let (g, params) = w.generic(DefKind::Class, "G", &[("T", Variance::Invariant)]);
    let t = w.types.type_variable(params[0]);
    let g_of_t = w.types.nominal(g, vec![t]);

    let subst = TypeSubstitution::from_args(&params, &[TypeId::STRING]);
    let result = instantiate_type(w.db(), g_of_t, &subst);

    assert_eq!(w.format(result), "G<string>");
    assert_eq!(instantiate_type(w.db(), TypeId::NUMBER, &subst), TypeId::NUMBER);
}

#[test]
fn test_this_binding_fills_unbound_this() {
    let w = World::new();
    let (_, c) = w.class("C", None);
    let subst = TypeSubstitution::new().with_this(c);
    assert!(!subst.is_empty());

    let unbound = w.types.this_type(None);
    assert_eq!(w.format(instantiate_type(w.db(), unbound, &subst)), "this[C]");
    assert_eq!(instantiate_type(w.db(), TypeId::STRING, &subst), TypeId::STRING);
}

#[test]
fn test_unchanged_types_keep_their_id() {
    let w = World::new();
    let (_, a) = w.class("A", None);
    let (tp, _) = w.type_param("T", None);
    let subst = TypeSubstitution::from_args(&[tp], &[TypeId::STRING]);
    let union = w.types.union_unsimplified(vec![a, TypeId::NUMBER]);
    assert_eq!(instantiate_type(w.db(), union, &subst), union);
}

#[test]
fn test_substituted_function_type_params_are_closed() {
    let w = World::new();
    let (tp, t) = w.type_param("T", None);
    let mut shape = FunctionShape::new(vec![ParamInfo::required(w.atom("x"), t)], t);
    shape.type_params = vec![tp];
    let generic_fn = w.types.function(shape);
    assert_eq!(w.format(generic_fn), "{function<T>(T):T}");

    let subst = TypeSubstitution::from_args(&[tp], &[TypeId::NUMBER]);
    let closed = instantiate_type(w.db(), generic_fn, &subst);
    assert_eq!(w.format(closed), "{function(number):number}");
}

#[test]
fn test_single_pass_does_not_chain() {
    let w = World::new();
    let (t_def, t) = w.type_param("T", None);
    let (u_def, u) = w.type_param("U", None);
    let mut subst = TypeSubstitution::new();
    subst.insert(t_def, u);
    subst.insert(u_def, TypeId::STRING);
    assert_eq!(instantiate_type(w.db(), t, &subst), u);
}

#[test]
fn test_environment_substitution_follows_chains() {
    let w = World::new();
    let (t_def, t) = w.type_param("T", None);
    let (u_def, u) = w.type_param("U", None);
    let mut env = Environment::new();
    env.add_substitution(t_def, u);
    env.add_substitution(u_def, TypeId::STRING);

    assert_eq!(substitute_type_variables(w.db(), &env, t), TypeId::STRING);
}

#[test]
fn test_self_referential_substitution_terminates() {
    let w = World::new();
    let (t_def, t) = w.type_param("T", None);
    let (g, _) = w.generic(DefKind::Class, "G", &[("X", Variance::Covariant)]);
    let mut env = Environment::new();
    // T -> G<T> expands without end; the depth limit stops it.
    env.add_substitution(t_def, w.types.nominal(g, vec![t]));

    let result = substitute_type_variables(w.db(), &env, t);
    assert!(w.format(result).starts_with("G<G<"));
}

#[test]
fn test_this_binding_binds_unbound_this() {
    let w = World::new();
    let (_, a) = w.class("A", None);
    let unbound = w.types.this_type(None);
    let mut env = Environment::new();
    env.set_this_binding(a);

    let bound = substitute_type_variables(w.db(), &env, unbound);
    assert_eq!(w.format(bound), "this[A]");

    // A binding that is itself a bound this type is not nested.
    let mut env2 = Environment::new();
    env2.set_this_binding(bound);
    assert_eq!(substitute_type_variables(w.db(), &env2, unbound), bound);
}

#[test]
fn test_add_substitutions_walks_super_types() {
    let w = World::new();
    let array_of_string = w.builtins.array_of(&w.types, TypeId::STRING);
    let mut env = Environment::new();
    add_substitutions(w.db(), &mut env, array_of_string);

    let array_t = w.defs.get(w.builtins.array).expect("Array").type_params[0];
    let iterable_t = w.defs.get(w.builtins.iterable).expect("Iterable").type_params[0];
    assert_eq!(env.substitution(array_t), Some(TypeId::STRING));
    assert_eq!(env.substitution(iterable_t), Some(TypeId::STRING));
}

#[test]
fn test_add_substitutions_through_extends_clause() {
    let w = World::new();
    let (g, params) = w.generic(DefKind::Class, "G", &[("T", Variance::Invariant)]);
    let g_of_number = w.types.nominal(g, vec![TypeId::NUMBER]);
    let (_, c) = w.class("C", Some(g_of_number));

    let mut env = Environment::new();
    add_substitutions(w.db(), &mut env, c);
    assert_eq!(env.substitution(params[0]), Some(TypeId::NUMBER));
}
