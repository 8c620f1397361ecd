//! instanceof-guard narrowing.
//!
//! Refines the type of an identifier reference from the definitive
//! `instanceof` facts that hold at the reference (supplied by flow analysis):
//!
//! - "always holds" facts add their type to the narrowing set
//! - "never holds" facts add their type to the exclusion set
//!
//! With no exclusions the result is the intersection of the base type and
//! every "always" type. With exclusions, each candidate of the narrowing set
//! is filtered: union candidates lose the members that are subtypes of an
//! excluded type, other candidates are dropped entirely when they are a
//! subtype of one. The survivors are intersected. When nothing survives the
//! base type is returned unchanged.
//!
//! Narrowing is a per-use-site refinement and is never memoized on the
//! declaration.

use crate::environment::Environment;
use crate::simplify::TypeSimplifier;
use crate::types::{TypeData, TypeId};
use tracing::{Level, span, trace};

/// Outcome of an `instanceof` test at a program point.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GuardAssertion {
    AlwaysHolds,
    NeverHolds,
    MayHold,
}

/// One definitive fact: `subject instanceof ty` always/never holds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InstanceofFact {
    pub assertion: GuardAssertion,
    pub ty: TypeId,
}

impl InstanceofFact {
    pub const fn always(ty: TypeId) -> Self {
        Self {
            assertion: GuardAssertion::AlwaysHolds,
            ty,
        }
    }

    pub const fn never(ty: TypeId) -> Self {
        Self {
            assertion: GuardAssertion::NeverHolds,
            ty,
        }
    }
}

/// Applies instanceof facts to a base type.
#[derive(Copy, Clone)]
pub struct GuardNarrowing<'a> {
    simplifier: TypeSimplifier<'a>,
}

impl<'a> GuardNarrowing<'a> {
    pub fn new(simplifier: TypeSimplifier<'a>) -> Self {
        Self { simplifier }
    }

    /// Narrow `base` (if known) by `facts`.
    pub fn narrow_by_instanceof_guards(
        &self,
        env: &Environment,
        base: Option<TypeId>,
        facts: &[InstanceofFact],
    ) -> Option<TypeId> {
        let _span =
            span!(Level::TRACE, "narrow_by_instanceof_guards", facts = facts.len()).entered();
        let relation = self.simplifier.relation();
        let db = self.simplifier.db();

        let mut narrowing: Vec<TypeId> = base.into_iter().collect();
        let mut excluded: Vec<TypeId> = Vec::new();
        for fact in facts {
            match fact.assertion {
                GuardAssertion::AlwaysHolds => narrowing.push(fact.ty),
                GuardAssertion::NeverHolds => excluded.push(fact.ty),
                GuardAssertion::MayHold => {}
            }
        }
        if narrowing.is_empty() {
            return base;
        }

        let is_excluded = |ty: TypeId| excluded.iter().any(|&ex| relation.is_subtype(env, ty, ex));

        let remaining: Vec<TypeId> = if excluded.is_empty() {
            narrowing
        } else {
            narrowing
                .into_iter()
                .filter_map(|candidate| match db.lookup(candidate) {
                    TypeData::Union(members) => {
                        let kept: Vec<TypeId> =
                            members.iter().copied().filter(|&m| !is_excluded(m)).collect();
                        if kept.is_empty() {
                            None
                        } else if kept.len() == members.len() {
                            Some(candidate)
                        } else {
                            Some(self.simplifier.create_union(env, &kept))
                        }
                    }
                    _ => (!is_excluded(candidate)).then_some(candidate),
                })
                .collect()
        };

        let result = match remaining.as_slice() {
            [] => base,
            [single] => Some(*single),
            _ => Some(self.simplifier.create_intersection(env, &remaining)),
        };
        trace!(?base, ?result, "instanceof narrowing");
        result
    }
}

#[cfg(test)]
#[path = "../tests/narrowing_tests.rs"]
mod tests;
