//! Collaborator interfaces consumed by the engine.
//!
//! The engine does not own subtyping or member resolution; it asks these
//! traits. [`TypeHierarchy`](crate::TypeHierarchy) implements both over the
//! declared hierarchy and is what the tests and the default host use.

use crate::def::DefId;
use crate::environment::Environment;
use crate::types::TypeId;
use gts_common::Atom;

/// Subtype query. Must be total and terminating.
pub trait TypeRelation {
    fn is_subtype(&self, env: &Environment, source: TypeId, target: TypeId) -> bool;

    /// `source` is a subtype of `target` but not the other way around.
    fn is_strict_subtype(&self, env: &Environment, source: TypeId, target: TypeId) -> bool {
        source != target
            && self.is_subtype(env, source, target)
            && !self.is_subtype(env, target, source)
    }
}

/// Member/scope resolution.
pub trait MemberLookup {
    fn resolve_member(
        &self,
        receiver: TypeId,
        name: Atom,
        include_inherited: bool,
        static_only: bool,
    ) -> Option<DefId>;
}
