use super::*;
use gts_common::NodeIndex;

fn key(kind: GuardKind, node: u32) -> GuardKey {
    GuardKey::new(kind, NodeIndex(node))
}

#[test]
fn test_child_writes_are_invisible_to_parent() {
    let mut parent = Environment::new();
    parent.add_substitution(DefId(1), TypeId::STRING);

    let mut child = parent.wrap();
    child.add_substitution(DefId(2), TypeId::NUMBER);

    assert_eq!(child.substitution(DefId(1)), Some(TypeId::STRING));
    assert_eq!(child.substitution(DefId(2)), Some(TypeId::NUMBER));
    assert_eq!(parent.substitution(DefId(2)), None);
    assert_eq!(child.depth(), 2);
    assert_eq!(parent.depth(), 1);
}

#[test]
fn test_inner_entries_shadow_outer_ones() {
    let mut outer = Environment::new();
    outer.set_this_binding(TypeId::STRING);
    let mut inner = outer.wrap();
    inner.set_this_binding(TypeId::NUMBER);

    assert_eq!(inner.this_binding(), Some(TypeId::NUMBER));
    assert_eq!(outer.this_binding(), Some(TypeId::STRING));
}

#[test]
fn test_clone_then_write_copies_the_shared_frame() {
    let mut original = Environment::new().wrap();
    original.add_substitution(DefId(1), TypeId::STRING);
    let mut copy = original.clone();
    copy.add_substitution(DefId(1), TypeId::BOOLEAN);
    copy.add_substitution(DefId(5), TypeId::NUMBER);

    assert_eq!(original.substitution(DefId(1)), Some(TypeId::STRING));
    assert_eq!(original.substitution(DefId(5)), None);
    assert_eq!(copy.substitution(DefId(1)), Some(TypeId::BOOLEAN));
}

#[test]
fn test_guard_lifecycle() {
    let env = Environment::new();
    let k = key(GuardKind::VariableInitializer, 3);
    assert_eq!(env.guard_state(k), GuardState::Absent);

    let guarded = env.with_guard(k);
    assert_eq!(guarded.guard_state(k), GuardState::Active);
    assert!(guarded.is_guarded(k));
    assert!(!env.is_guarded(k));

    let provisional = env.with_provisional(k, TypeId::ANY);
    assert_eq!(provisional.guard_state(k), GuardState::Provisional(TypeId::ANY));
}

#[test]
fn test_guard_kinds_on_same_node_do_not_collide() {
    let env = Environment::new().with_guard(key(GuardKind::CallExpression, 9));
    assert!(env.is_guarded(key(GuardKind::CallExpression, 9)));
    assert!(!env.is_guarded(key(GuardKind::PropertyAccess, 9)));
    assert!(!env.is_guarded(key(GuardKind::CallExpression, 10)));
}

#[test]
fn test_has_substitutions_scans_all_frames() {
    let mut base = Environment::new();
    assert!(!base.has_substitutions());
    base.add_substitution(DefId(4), TypeId::ANY);
    let nested = base.wrap().wrap().with_guard(key(GuardKind::FunctionReturn, 1));
    assert!(nested.has_substitutions());

    let mut only_this = Environment::new();
    only_this.set_this_binding(TypeId::STRING);
    assert!(!only_this.has_substitutions());
}
