//! Union and intersection simplification.
//!
//! ## Union
//!
//! 1. Flatten nested unions, keeping first-occurrence order. Exact duplicates
//!    collapse silently.
//! 2. Remove every member `M` for which another member `S` is a strict
//!    supertype, reporting `UNI_REDUNDANT_SUBTYPE` per removal.
//! 3. Remove `undefined`/`null` when a non-nullable member remains.
//! 4. A single survivor is returned unwrapped.
//!
//! ## Intersection
//!
//! Mirrored: a member is redundant when another member is a strict subtype
//! of it (`INTER_REDUNDANT_SUPERTYPE`). Nullable members take no part in the
//! comparison.
//!
//! `[unknown]` is never removed and never removes anything: a result built
//! from an unknown member stays visibly unknown-tainted.

use crate::db::TypeDb;
use crate::diagnostics::{DiagnosticBuilder, DiagnosticSink, NullSink};
use crate::environment::Environment;
use crate::relation::TypeRelation;
use crate::types::{TypeData, TypeId};
use gts_common::NodeIndex;
use gts_common::limits::MAX_SIMPLIFY_PAIRWISE_MEMBERS;
use indexmap::IndexSet;
use rustc_hash::FxBuildHasher;
use tracing::{Level, span, trace};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Composite {
    Union,
    Intersection,
}

/// Union/intersection simplifier.
#[derive(Copy, Clone)]
pub struct TypeSimplifier<'a> {
    db: TypeDb<'a>,
    relation: &'a dyn TypeRelation,
}

impl<'a> TypeSimplifier<'a> {
    pub fn new(db: TypeDb<'a>, relation: &'a dyn TypeRelation) -> Self {
        Self { db, relation }
    }

    pub fn db(&self) -> TypeDb<'a> {
        self.db
    }

    pub fn relation(&self) -> &'a dyn TypeRelation {
        self.relation
    }

    /// Simplify a union or intersection; other types come back unchanged.
    pub fn simplify(&self, env: &Environment, ty: TypeId, sink: &mut dyn DiagnosticSink) -> TypeId {
        self.simplify_at(env, ty, NodeIndex::NONE, sink)
    }

    /// [`simplify`](Self::simplify) with diagnostics anchored on `node`.
    pub fn simplify_at(
        &self,
        env: &Environment,
        ty: TypeId,
        node: NodeIndex,
        sink: &mut dyn DiagnosticSink,
    ) -> TypeId {
        match self.db.lookup(ty) {
            TypeData::Union(members) => {
                self.simplify_members(env, Composite::Union, &members, node, sink)
            }
            TypeData::Intersection(members) => {
                self.simplify_members(env, Composite::Intersection, &members, node, sink)
            }
            _ => ty,
        }
    }

    /// Simplified union of `members`, without diagnostics.
    pub fn create_union(&self, env: &Environment, members: &[TypeId]) -> TypeId {
        self.simplify_members(env, Composite::Union, members, NodeIndex::NONE, &mut NullSink)
    }

    /// Simplified intersection of `members`, without diagnostics.
    pub fn create_intersection(&self, env: &Environment, members: &[TypeId]) -> TypeId {
        self.simplify_members(
            env,
            Composite::Intersection,
            members,
            NodeIndex::NONE,
            &mut NullSink,
        )
    }

    fn flatten(
        &self,
        kind: Composite,
        members: &[TypeId],
        out: &mut IndexSet<TypeId, FxBuildHasher>,
    ) {
        for &member in members {
            match (kind, self.db.lookup(member)) {
                (Composite::Union, TypeData::Union(nested))
                | (Composite::Intersection, TypeData::Intersection(nested)) => {
                    self.flatten(kind, &nested, out);
                }
                _ => {
                    out.insert(member);
                }
            }
        }
    }

    fn simplify_members(
        &self,
        env: &Environment,
        kind: Composite,
        members: &[TypeId],
        node: NodeIndex,
        sink: &mut dyn DiagnosticSink,
    ) -> TypeId {
        let _span = span!(Level::TRACE, "simplify", ?kind, members = members.len()).entered();

        let mut flat: IndexSet<TypeId, FxBuildHasher> = IndexSet::default();
        self.flatten(kind, members, &mut flat);

        if flat.is_empty() {
            return match kind {
                Composite::Union => TypeId::UNDEFINED,
                Composite::Intersection => TypeId::ANY,
            };
        }
        if flat.len() == 1 {
            return flat[0];
        }

        let candidates: Vec<TypeId> = flat
            .iter()
            .copied()
            .filter(|t| !t.is_unknown() && !t.is_nullish())
            .collect();

        let mut removed: IndexSet<TypeId, FxBuildHasher> = IndexSet::default();
        if candidates.len() <= MAX_SIMPLIFY_PAIRWISE_MEMBERS {
            let mut builder = DiagnosticBuilder::new(self.db);
            for &member in &candidates {
                // Witnesses are taken from all candidates, removed or not;
                // strict subtyping is transitive so the outcome is the same.
                let witness = candidates.iter().copied().find(|&other| {
                    other != member
                        && match kind {
                            Composite::Union => {
                                self.relation.is_strict_subtype(env, member, other)
                            }
                            Composite::Intersection => {
                                self.relation.is_strict_subtype(env, other, member)
                            }
                        }
                });
                if let Some(witness) = witness {
                    trace!(removed = member.0, kept = witness.0, "redundant member");
                    removed.insert(member);
                    let diagnostic = match kind {
                        Composite::Union => builder.redundant_union_member(node, member, witness),
                        Composite::Intersection => {
                            builder.redundant_intersection_member(node, member, witness)
                        }
                    };
                    sink.report(diagnostic);
                }
            }
        } else {
            trace!(members = candidates.len(), "too many members, redundancy check skipped");
        }

        let has_non_nullable = flat
            .iter()
            .any(|t| !t.is_nullish() && !removed.contains(t));
        let survivors: Vec<TypeId> = flat
            .iter()
            .copied()
            .filter(|t| !removed.contains(t))
            .filter(|t| !(kind == Composite::Union && t.is_nullish() && has_non_nullable))
            .collect();

        match survivors.as_slice() {
            [] => TypeId::UNDEFINED,
            [single] => *single,
            _ => match kind {
                Composite::Union => self.db.types.union_unsimplified(survivors),
                Composite::Intersection => self.db.types.intersection_unsimplified(survivors),
            },
        }
    }
}

#[cfg(test)]
#[path = "../tests/simplify_tests.rs"]
mod tests;
