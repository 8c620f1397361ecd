//! Least upper bound of types ("join").
//!
//! ## Algorithm
//!
//! 1. Unions and intersections among the arguments are simplified first
//!    (redundancies are reported to the caller's sink).
//! 2. `[unknown]` anywhere yields `[unknown]`; `any+` and `any` absorb.
//! 3. `null`/`undefined` are dropped while anything else remains.
//! 4. A union argument turns the join into the simplified union of all
//!    arguments.
//! 5. If one argument is a supertype of all others it is the result.
//! 6. Otherwise the super type sets of all arguments are intersected
//!    (an intersection argument contributes the super types of each of its
//!    members). Different instantiations of one generic declaration are
//!    merged per type parameter by declared variance:
//!    - covariant: `G<join(args)>`
//!    - invariant: `G<? extends join(args)>`
//!    - contravariant: the narrowest argument when one exists, else dropped
//! 7. The minimal common super types remain. None: the universal object type
//!    for object-like arguments, otherwise the union of the arguments. One:
//!    that type. Several: their intersection.
//!
//! Joining a generic type with one of its own type arguments therefore
//! degenerates to `Object`: type arguments are not inspected structurally.

use crate::db::TypeDb;
use crate::def::{DefId, Variance};
use crate::diagnostics::DiagnosticSink;
use crate::environment::Environment;
use crate::inheritance::all_supertypes;
use crate::recursion::{DepthCounter, RecursionProfile};
use crate::relation::TypeRelation;
use crate::simplify::TypeSimplifier;
use crate::types::{TypeData, TypeId, WildcardKind};
use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxBuildHasher;
use std::cell::RefCell;
use tracing::{Level, span, trace};

/// Computes joins. Holds a depth counter for nested type-argument joins, so
/// one instance serves one top-level request.
pub struct TypeJoiner<'a> {
    simplifier: TypeSimplifier<'a>,
    depth: RefCell<DepthCounter>,
}

impl<'a> TypeJoiner<'a> {
    pub fn new(simplifier: TypeSimplifier<'a>) -> Self {
        Self {
            simplifier,
            depth: RefCell::new(DepthCounter::with_profile(RecursionProfile::Join)),
        }
    }

    fn db(&self) -> TypeDb<'a> {
        self.simplifier.db()
    }

    fn relation(&self) -> &'a dyn TypeRelation {
        self.simplifier.relation()
    }

    /// Least upper bound of `types`.
    pub fn join(
        &self,
        env: &Environment,
        types: &[TypeId],
        sink: &mut dyn DiagnosticSink,
    ) -> TypeId {
        let _span = span!(Level::TRACE, "join", count = types.len()).entered();
        if !self.depth.borrow_mut().enter() {
            trace!("join depth exceeded");
            return TypeId::UNKNOWN;
        }
        let result = self.join_inner(env, types, sink);
        self.depth.borrow_mut().leave();
        trace!(result = result.0, "join");
        result
    }

    fn join_inner(
        &self,
        env: &Environment,
        types: &[TypeId],
        sink: &mut dyn DiagnosticSink,
    ) -> TypeId {
        let db = self.db();
        let args: Vec<TypeId> = types
            .iter()
            .map(|&t| self.simplifier.simplify(env, t, sink))
            .collect();

        match args.as_slice() {
            [] => return TypeId::UNKNOWN,
            [single] => return *single,
            _ => {}
        }
        if args.iter().any(|t| t.is_unknown()) {
            return TypeId::UNKNOWN;
        }
        if args.contains(&TypeId::DYNAMIC_ANY) {
            return TypeId::DYNAMIC_ANY;
        }
        if args.contains(&TypeId::ANY) {
            return TypeId::ANY;
        }

        let mut distinct: IndexSet<TypeId, FxBuildHasher> = args.iter().copied().collect();
        if distinct.iter().any(|t| !t.is_nullish()) {
            distinct.retain(|t| !t.is_nullish());
        }
        let mut args: Vec<TypeId> = distinct.into_iter().collect();
        if args.len() == 1 {
            return args[0];
        }
        // Argument order must not leak into the result.
        args.sort_by_key(|&t| self.canonical_key(t));

        if args
            .iter()
            .any(|&t| matches!(db.lookup(t), TypeData::Union(_)))
        {
            return self.simplifier.create_union(env, &args);
        }

        // An argument above all others.
        let mut tops: Vec<TypeId> = args
            .iter()
            .copied()
            .filter(|&candidate| {
                args.iter()
                    .all(|&other| {
                        other == candidate || self.relation().is_subtype(env, other, candidate)
                    })
            })
            .collect();
        if !tops.is_empty() {
            tops.sort_by_key(|&t| self.canonical_key(t));
            return tops[0];
        }

        let common = self.common_supertypes(env, &args, sink);
        let minimal = self.minimal(env, common);
        match minimal.as_slice() {
            [] => {
                if args.iter().all(|&t| db.is_object_like(t)) {
                    db.object_type()
                } else {
                    self.simplifier.create_union(env, &args)
                }
            }
            [single] => *single,
            _ => self.simplifier.create_intersection(env, &minimal),
        }
    }

    /// Ordering that does not depend on argument order.
    fn canonical_key(&self, ty: TypeId) -> (u32, u32) {
        match self.db().lookup(ty) {
            TypeData::Nominal(app) => (app.def.0, ty.0),
            _ => (u32::MAX, ty.0),
        }
    }

    fn common_supertypes(
        &self,
        env: &Environment,
        args: &[TypeId],
        sink: &mut dyn DiagnosticSink,
    ) -> Vec<TypeId> {
        let db = self.db();
        let object = db.object_type();
        let closures: Vec<Vec<TypeId>> = args.iter().map(|&t| all_supertypes(db, t)).collect();

        // Nominal super types grouped by declaration, one entry per argument.
        let mut by_decl: IndexMap<DefId, Vec<Vec<TypeId>>, FxBuildHasher> = IndexMap::default();
        let mut other: IndexMap<TypeId, usize, FxBuildHasher> = IndexMap::default();
        for (i, closure) in closures.iter().enumerate() {
            for &t in closure {
                match db.lookup(t) {
                    TypeData::Nominal(app) => {
                        let slots = by_decl
                            .entry(app.def)
                            .or_insert_with(|| vec![Vec::new(); args.len()]);
                        if !slots[i].contains(&t) {
                            slots[i].push(t);
                        }
                    }
                    _ => {
                        let seen = other.entry(t).or_insert(0);
                        if *seen == i {
                            *seen += 1;
                        }
                    }
                }
            }
        }

        let mut common = Vec::new();
        for (&def, slots) in &by_decl {
            if slots.iter().any(Vec::is_empty) {
                continue;
            }
            let firsts: Vec<TypeId> = slots.iter().map(|s| s[0]).collect();
            if firsts.iter().all(|&t| t == firsts[0]) {
                common.push(firsts[0]);
            } else if let Some(merged) = self.merge_instantiations(env, def, &firsts, sink) {
                common.push(merged);
            }
        }
        common.extend(
            other
                .iter()
                .filter(|&(_, &count)| count == args.len())
                .map(|(&t, _)| t),
        );
        // Object only answers when nothing closer is shared.
        common.retain(|&t| t != object);
        common
    }

    /// Merge `G<a1..>`, `G<b1..>`, ... into one instantiation of `G`.
    fn merge_instantiations(
        &self,
        env: &Environment,
        def: DefId,
        instantiations: &[TypeId],
        sink: &mut dyn DiagnosticSink,
    ) -> Option<TypeId> {
        let db = self.db();
        let info = db.def(def)?;
        let apps: Vec<_> = instantiations
            .iter()
            .filter_map(|&t| db.types.application(t))
            .collect();
        if apps.iter().any(|a| a.args.len() != info.type_params.len()) {
            // Raw reference among them.
            return Some(db.types.nominal_simple(def));
        }
        let mut merged_args = Vec::with_capacity(info.type_params.len());
        for (i, &param) in info.type_params.iter().enumerate() {
            let column: Vec<TypeId> = apps.iter().map(|a| a.args[i]).collect();
            if column.iter().all(|&t| t == column[0]) {
                merged_args.push(column[0]);
                continue;
            }
            let variance = db.def(param).map_or(Variance::Invariant, |p| p.variance);
            let upper: Vec<TypeId> = column.iter().map(|&t| db.upper_bound(t)).collect();
            let arg = match variance {
                Variance::Covariant => self.join(env, &upper, sink),
                Variance::Invariant => {
                    let bound = self.join(env, &upper, sink);
                    db.types.wildcard(Some(bound), WildcardKind::Extends)
                }
                Variance::Contravariant => column.iter().copied().find(|&c| {
                    column
                        .iter()
                        .all(|&o| self.relation().is_subtype(env, c, o))
                })?,
            };
            merged_args.push(arg);
        }
        Some(db.types.nominal(def, merged_args))
    }

    /// Drop every candidate that has a strictly more specific candidate.
    fn minimal(&self, env: &Environment, candidates: Vec<TypeId>) -> Vec<TypeId> {
        let mut result: Vec<TypeId> = candidates
            .iter()
            .copied()
            .filter(|&c| {
                !candidates
                    .iter()
                    .any(|&d| d != c && self.relation().is_strict_subtype(env, d, c))
            })
            .collect();
        result.sort_by_key(|&t| self.canonical_key(t));
        result.dedup();
        result
    }
}

#[cfg(test)]
#[path = "../tests/join_tests.rs"]
mod tests;
