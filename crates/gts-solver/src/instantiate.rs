//! Type-variable substitution.
//!
//! Two entry points:
//! - [`instantiate_type`] applies an explicit [`TypeSubstitution`] once.
//! - [`substitute_type_variables`] applies whatever substitutions and `this`
//!   binding an [`Environment`] carries, following chains (`T -> U -> X`)
//!   up to a depth limit.
//!
//! [`add_substitutions`] fills an environment from a receiver type: the
//! receiver's own type arguments and, through the inheritance chain, the
//! arguments it passes to every super type.

use crate::db::TypeDb;
use crate::def::DefId;
use crate::environment::Environment;
use crate::inheritance::all_supertypes;
use crate::recursion::{DepthCounter, RecursionProfile};
use crate::types::{FunctionShape, StructuralShape, TypeData, TypeId};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

/// Mapping from type variables to replacements, plus an optional `this`.
#[derive(Clone, Debug, Default)]
pub struct TypeSubstitution {
    map: FxHashMap<DefId, TypeId>,
    this_type: Option<TypeId>,
}

impl TypeSubstitution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pair type parameters with arguments. Extra parameters stay unmapped.
    pub fn from_args(params: &[DefId], args: &[TypeId]) -> Self {
        let mut subst = Self::new();
        for (&param, &arg) in params.iter().zip(args) {
            subst.insert(param, arg);
        }
        subst
    }

    pub fn insert(&mut self, param: DefId, replacement: TypeId) {
        self.map.insert(param, replacement);
    }

    pub fn get(&self, param: DefId) -> Option<TypeId> {
        self.map.get(&param).copied()
    }

    /// Mapped type parameters, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (DefId, TypeId)> + '_ {
        self.map.iter().map(|(&param, &replacement)| (param, replacement))
    }

    pub fn with_this(mut self, this_type: TypeId) -> Self {
        self.this_type = Some(this_type);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty() && self.this_type.is_none()
    }
}

struct Instantiator<'a, F: Fn(DefId) -> Option<TypeId>> {
    db: TypeDb<'a>,
    resolve: F,
    this_type: Option<TypeId>,
    /// Re-apply substitution to replacements.
    chained: bool,
    depth: DepthCounter,
}

impl<F: Fn(DefId) -> Option<TypeId>> Instantiator<'_, F> {
    fn visit(&mut self, ty: TypeId) -> TypeId {
        if ty.is_intrinsic() {
            return ty;
        }
        if !self.depth.enter() {
            trace!(type_id = ty.0, "substitution depth exceeded");
            return ty;
        }
        let result = self.visit_inner(ty);
        self.depth.leave();
        result
    }

    fn visit_list(&mut self, list: &[TypeId]) -> (Vec<TypeId>, bool) {
        let mut changed = false;
        let out = list
            .iter()
            .map(|&t| {
                let r = self.visit(t);
                changed |= r != t;
                r
            })
            .collect();
        (out, changed)
    }

    fn visit_inner(&mut self, ty: TypeId) -> TypeId {
        let types = self.db.types;
        match self.db.lookup(ty) {
            TypeData::TypeVariable(def) => match (self.resolve)(def) {
                Some(replacement) if replacement != ty => {
                    if self.chained {
                        self.visit(replacement)
                    } else {
                        replacement
                    }
                }
                _ => ty,
            },
            TypeData::This(None) => match self.this_type {
                Some(this_type) => match self.db.lookup(this_type) {
                    // Never nest bound-this types.
                    TypeData::This(Some(_)) => this_type,
                    _ => types.this_type(Some(this_type)),
                },
                None => ty,
            },
            TypeData::This(Some(bound)) => {
                let new_bound = self.visit(bound);
                if new_bound == bound {
                    ty
                } else {
                    types.this_type(Some(new_bound))
                }
            }
            TypeData::Nominal(app) => {
                let (args, changed) = self.visit_list(&app.args);
                if changed {
                    types.nominal(app.def, args)
                } else {
                    ty
                }
            }
            TypeData::Union(members) => {
                let (members, changed) = self.visit_list(&members);
                if changed {
                    types.union_unsimplified(members)
                } else {
                    ty
                }
            }
            TypeData::Intersection(members) => {
                let (members, changed) = self.visit_list(&members);
                if changed {
                    types.intersection_unsimplified(members)
                } else {
                    ty
                }
            }
            TypeData::Function(shape) => {
                let mut new_shape = FunctionShape::clone(&shape);
                let mut changed = false;
                for param in &mut new_shape.params {
                    let t = self.visit(param.type_id);
                    changed |= t != param.type_id;
                    param.type_id = t;
                }
                let ret = self.visit(shape.return_type);
                changed |= ret != shape.return_type;
                new_shape.return_type = ret;
                if let Some(this_type) = shape.this_type {
                    let t = self.visit(this_type);
                    changed |= t != this_type;
                    new_shape.this_type = Some(t);
                }
                // Type parameters that were substituted are no longer open.
                let before = new_shape.type_params.len();
                new_shape
                    .type_params
                    .retain(|&tp| (self.resolve)(tp).is_none());
                changed |= new_shape.type_params.len() != before;
                if changed {
                    types.function(new_shape)
                } else {
                    ty
                }
            }
            TypeData::Structural(shape) => {
                let mut new_shape = StructuralShape::clone(&shape);
                let mut changed = false;
                for member in &mut new_shape.members {
                    let t = self.visit(member.type_id);
                    changed |= t != member.type_id;
                    member.type_id = t;
                }
                if changed {
                    types.structural(new_shape)
                } else {
                    ty
                }
            }
            TypeData::Wildcard {
                bound: Some(bound),
                kind,
            } => {
                let new_bound = self.visit(bound);
                if new_bound == bound {
                    ty
                } else {
                    types.wildcard(Some(new_bound), kind)
                }
            }
            TypeData::MetaType { arg, constructor } => {
                let new_arg = self.visit(arg);
                match (new_arg == arg, constructor) {
                    (true, _) => ty,
                    (false, true) => types.constructor_type(new_arg),
                    (false, false) => types.meta_type(new_arg),
                }
            }
            TypeData::Wildcard { bound: None, .. }
            | TypeData::Literal(_)
            | TypeData::Intrinsic(_)
            | TypeData::Unknown
            | TypeData::DynamicAny => ty,
        }
    }
}

/// Apply `subst` once (replacements are not substituted again).
pub fn instantiate_type(db: TypeDb<'_>, ty: TypeId, subst: &TypeSubstitution) -> TypeId {
    if subst.is_empty() {
        return ty;
    }
    let mut inst = Instantiator {
        db,
        resolve: |def: DefId| subst.get(def),
        this_type: subst.this_type,
        chained: false,
        depth: DepthCounter::with_profile(RecursionProfile::Substitution),
    };
    inst.visit(ty)
}

/// Apply the substitutions and `this` binding carried by `env`.
pub fn substitute_type_variables(db: TypeDb<'_>, env: &Environment, ty: TypeId) -> TypeId {
    let this_type = env.this_binding();
    if this_type.is_none() && !env.has_substitutions() {
        return ty;
    }
    let mut inst = Instantiator {
        db,
        resolve: |def: DefId| env.substitution(def),
        this_type,
        chained: true,
        depth: DepthCounter::with_profile(RecursionProfile::Substitution),
    };
    inst.visit(ty)
}

/// Record the type arguments of `receiver` (and of every super type it
/// instantiates) as substitutions in `env`. The first instantiation found
/// for a type parameter wins.
pub fn add_substitutions(db: TypeDb<'_>, env: &mut Environment, receiver: TypeId) {
    let mut seen: FxHashSet<DefId> = FxHashSet::default();
    for super_type in all_supertypes(db, receiver) {
        let TypeData::Nominal(app) = db.lookup(super_type) else {
            continue;
        };
        if app.args.is_empty() {
            continue;
        }
        let Some(info) = db.def(app.def) else {
            continue;
        };
        for (&param, &arg) in info.type_params.iter().zip(app.args.iter()) {
            if seen.insert(param) && arg != db.types.type_variable(param) {
                env.add_substitution(param, arg);
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/instantiate_tests.rs"]
mod tests;
