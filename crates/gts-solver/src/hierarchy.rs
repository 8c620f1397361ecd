//! Reference subtype oracle and member resolver over the declared hierarchy.
//!
//! ## Subtype rules
//!
//! | Source | Target | Rule |
//! |--------|--------|------|
//! | any | `any`, `any+` | always |
//! | `undefined` | any | always (bottom) |
//! | `null` | anything but `undefined` | always |
//! | `any+` | any | always |
//! | `[unknown]` | any / any | always (never a contradiction) |
//! | union | T | every member <: T |
//! | S | union | S <: some member |
//! | S | intersection | S <: every member |
//! | intersection | T | some member <: T |
//! | literal | T | same literal, or base type <: T |
//! | nominal | nominal | instantiation of T's declaration among S's super types, arguments compared by declared variance |
//! | structural | structural | width and depth: every required member of T present in S with a subtype |
//! | function | function | parameters contravariant, return covariant |
//! | `type{A}` / `constructor{A}` | `type{B}` | A <: B |
//!
//! Cycles (recursive generic instantiations) are answered coinductively.

use crate::db::TypeDb;
use crate::def::{DefId, DefKind, Variance};
use crate::environment::Environment;
use crate::inheritance::{classifier_chain, find_instantiation};
use crate::instantiate::substitute_type_variables;
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::relation::{MemberLookup, TypeRelation};
use crate::types::{FunctionShape, IntrinsicKind, StructuralShape, TypeData, TypeId, WildcardKind};
use gts_common::Atom;
use tracing::trace;

/// Subtype oracle and member resolver for declared classes, interfaces
/// and enums.
#[derive(Copy, Clone)]
pub struct TypeHierarchy<'a> {
    db: TypeDb<'a>,
}

impl<'a> TypeHierarchy<'a> {
    pub fn new(db: TypeDb<'a>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> TypeDb<'a> {
        self.db
    }
}

impl TypeRelation for TypeHierarchy<'_> {
    fn is_subtype(&self, env: &Environment, source: TypeId, target: TypeId) -> bool {
        let source = substitute_type_variables(self.db, env, source);
        let target = substitute_type_variables(self.db, env, target);
        let mut checker = SubtypeChecker {
            db: self.db,
            guard: RecursionGuard::with_profile(RecursionProfile::SubtypeCheck),
        };
        let result = checker.check(source, target);
        trace!(source = source.0, target = target.0, result, "is_subtype");
        result
    }
}

struct SubtypeChecker<'a> {
    db: TypeDb<'a>,
    guard: RecursionGuard<(TypeId, TypeId)>,
}

impl SubtypeChecker<'_> {
    fn check(&mut self, source: TypeId, target: TypeId) -> bool {
        if source == target {
            return true;
        }
        match self.guard.enter((source, target)) {
            RecursionResult::Entered => {
                let result = self.check_inner(source, target);
                self.guard.leave((source, target));
                result
            }
            RecursionResult::Cycle => true,
            RecursionResult::DepthExceeded | RecursionResult::IterationExceeded => false,
        }
    }

    fn check_inner(&mut self, source: TypeId, target: TypeId) -> bool {
        let db = self.db;
        // Sentinels and extremes first.
        if source.is_unknown() || target.is_unknown() {
            return true;
        }
        if target.is_any() || source == TypeId::DYNAMIC_ANY {
            return true;
        }
        if source == TypeId::UNDEFINED {
            return true;
        }
        if source == TypeId::NULL {
            return target != TypeId::UNDEFINED;
        }
        if source == TypeId::ANY {
            return false;
        }

        let source = db.resolve_alias(source);
        let target = db.resolve_alias(target);
        let source_data = db.lookup(source);
        let target_data = db.lookup(target);

        // Unions and intersections decompose before anything else.
        if let TypeData::Union(members) = &source_data {
            return members.iter().all(|&m| self.check(m, target));
        }
        if let TypeData::Union(members) = &target_data {
            return members.iter().any(|&m| self.check(source, m));
        }
        if let TypeData::Intersection(members) = &target_data {
            return members.iter().all(|&m| self.check(source, m));
        }
        if let TypeData::Intersection(members) = &source_data {
            return members.iter().any(|&m| self.check(m, target));
        }

        match (source_data, target_data) {
            (TypeData::Wildcard { .. }, _) => {
                let upper = db.upper_bound(source);
                upper != source && self.check(upper, target)
            }
            (_, TypeData::Wildcard { bound, kind }) => match (bound, kind) {
                (None, _) => true,
                (Some(bound), WildcardKind::Extends) => self.check(source, bound),
                (Some(bound), WildcardKind::Super) => self.check(bound, source),
            },
            (TypeData::This(Some(b1)), TypeData::This(Some(b2))) => self.check(b1, b2),
            (TypeData::This(Some(bound)), _) => self.check(bound, target),
            (TypeData::This(None), _) => self.check(db.object_type(), target),
            (_, TypeData::This(_)) => false,
            (TypeData::TypeVariable(def), _) => {
                let bound = db.type_variable_bound(def);
                bound != TypeId::ANY && self.check(bound, target)
            }
            (_, TypeData::TypeVariable(_)) => false,
            (TypeData::Literal(value), _) => {
                let base = db.literal_base(&value);
                self.check(base, target)
            }
            (_, TypeData::Literal(_)) => false,
            (TypeData::Intrinsic(_), _) => false,
            (_, TypeData::Intrinsic(IntrinsicKind::Void)) => false,
            (
                TypeData::MetaType {
                    arg: a1,
                    constructor: c1,
                },
                TypeData::MetaType {
                    arg: a2,
                    constructor: c2,
                },
            ) => (c1 || !c2) && self.check(a1, a2),
            (TypeData::Function(s), TypeData::Function(t)) => self.check_function(&s, &t),
            (TypeData::Structural(s), TypeData::Structural(t)) => self.check_structural(&s, &t),
            (TypeData::Nominal(_), TypeData::Nominal(_))
            | (TypeData::Function(_), TypeData::Nominal(_))
            | (TypeData::Structural(_), TypeData::Nominal(_))
            | (TypeData::MetaType { .. }, TypeData::Nominal(_)) => {
                self.check_nominal(source, target)
            }
            _ => false,
        }
    }

    fn check_nominal(&mut self, source: TypeId, target: TypeId) -> bool {
        let db = self.db;
        let Some(target_app) = db.types.application(target) else {
            return false;
        };
        if target_app.def == db.builtins.object && target_app.args.is_empty() {
            return db.is_object_like(source);
        }
        let Some(instantiation) = find_instantiation(db, source, target_app.def) else {
            return false;
        };
        let Some(source_app) = db.types.application(instantiation) else {
            return false;
        };
        // Raw references compare by declaration only.
        if source_app.args.is_empty() || target_app.args.is_empty() {
            return true;
        }
        let params = db
            .def(target_app.def)
            .map(|info| info.type_params.clone())
            .unwrap_or_default();
        let pairs = source_app.args.iter().zip(target_app.args.iter());
        for (i, (&sa, &ta)) in pairs.enumerate() {
            let variance = params
                .get(i)
                .and_then(|&p| db.def(p))
                .map_or(Variance::Invariant, |info| info.variance);
            if !self.check_type_argument(sa, ta, variance) {
                return false;
            }
        }
        true
    }

    fn check_type_argument(&mut self, source: TypeId, target: TypeId, variance: Variance) -> bool {
        if source == target {
            return true;
        }
        if let TypeData::Wildcard { bound, kind } = self.db.lookup(target) {
            return match (bound, kind) {
                (None, _) => true,
                (Some(bound), WildcardKind::Extends) => {
                    let upper = self.db.upper_bound(source);
                    self.check(upper, bound)
                }
                (Some(bound), WildcardKind::Super) => match self.db.lookup(source) {
                    TypeData::Wildcard {
                        bound: Some(lower),
                        kind: WildcardKind::Super,
                    } => self.check(bound, lower),
                    TypeData::Wildcard { .. } => false,
                    _ => self.check(bound, source),
                },
            };
        }
        match variance {
            Variance::Covariant => self.check(source, target),
            Variance::Contravariant => self.check(target, source),
            Variance::Invariant => self.check(source, target) && self.check(target, source),
        }
    }

    fn check_function(&mut self, source: &FunctionShape, target: &FunctionShape) -> bool {
        // A function may ignore trailing arguments, not demand extra ones.
        let required = source
            .params
            .iter()
            .filter(|p| !p.optional && !p.rest)
            .count();
        if required > target.params.len() && !target.params.iter().any(|p| p.rest) {
            return false;
        }
        for (sp, tp) in source.params.iter().zip(target.params.iter()) {
            if !self.check(tp.type_id, sp.type_id) {
                return false;
            }
        }
        target.return_type == TypeId::VOID || self.check(source.return_type, target.return_type)
    }

    fn check_structural(&mut self, source: &StructuralShape, target: &StructuralShape) -> bool {
        target.members.iter().all(|tm| match source.member(tm.name) {
            Some(sm) => self.check(sm.type_id, tm.type_id),
            None => tm.optional,
        })
    }
}

// =============================================================================
// Member lookup
// =============================================================================

impl MemberLookup for TypeHierarchy<'_> {
    fn resolve_member(
        &self,
        receiver: TypeId,
        name: Atom,
        include_inherited: bool,
        static_only: bool,
    ) -> Option<DefId> {
        let db = self.db;
        let receiver = db.resolve_alias(receiver);
        match db.lookup(receiver) {
            TypeData::Structural(shape) => shape.member(name).and_then(|m| m.def),
            TypeData::MetaType { arg, .. } => {
                self.resolve_member(arg, name, include_inherited, static_only)
            }
            TypeData::Union(members) => {
                // Only a member every alternative agrees on.
                let mut found = None;
                for &m in members.iter() {
                    let def = self.resolve_member(m, name, include_inherited, static_only)?;
                    if found.is_some_and(|f| f != def) {
                        return None;
                    }
                    found = Some(def);
                }
                found
            }
            TypeData::Intersection(members) => members
                .iter()
                .find_map(|&m| self.resolve_member(m, name, include_inherited, static_only)),
            TypeData::Unknown | TypeData::DynamicAny | TypeData::Intrinsic(_) => None,
            _ => {
                let chain = classifier_chain(db, receiver);
                let searched = if include_inherited {
                    &chain[..]
                } else {
                    &chain[..chain.len().min(1)]
                };
                searched
                    .iter()
                    .filter(|&&def| db.defs.kind(def).is_some_and(DefKind::is_classifier))
                    .find_map(|&def| db.defs.find_owned_member(def, name, static_only))
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/hierarchy_tests.rs"]
mod tests;
