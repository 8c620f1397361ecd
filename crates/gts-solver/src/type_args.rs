//! Call-site type arguments for generic signatures.
//!
//! Explicit type arguments (`f<string>(x)`, `new G<A>()`) are paired with the
//! signature's type parameters. Without them each type parameter collects
//! candidates by matching the declared parameter types against the argument
//! types, and the join of its (literal-widened) candidates becomes the type
//! argument. A type parameter with no candidate falls back to its declared
//! bound, or `any`.

use crate::def::DefId;
use crate::diagnostics::NullSink;
use crate::environment::Environment;
use crate::inheritance::find_instantiation;
use crate::instantiate::TypeSubstitution;
use crate::join::TypeJoiner;
use crate::simplify::TypeSimplifier;
use crate::types::{FunctionShape, TypeData, TypeId};
use crate::widening::widen_literals;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use tracing::trace;

/// Type-argument inference for one call site.
pub struct TypeArgumentInference<'a> {
    simplifier: TypeSimplifier<'a>,
    candidates: IndexMap<DefId, Vec<TypeId>, FxBuildHasher>,
    depth: u32,
}

const MAX_MATCH_DEPTH: u32 = 16;

impl<'a> TypeArgumentInference<'a> {
    pub fn new(simplifier: TypeSimplifier<'a>) -> Self {
        Self {
            simplifier,
            candidates: IndexMap::default(),
            depth: 0,
        }
    }

    /// Substitution for the open type parameters of `shape` at a call with
    /// `explicit` type arguments and arguments of type `arg_types`.
    pub fn infer(
        mut self,
        env: &Environment,
        shape: &FunctionShape,
        explicit: &[TypeId],
        arg_types: &[TypeId],
    ) -> TypeSubstitution {
        if shape.type_params.is_empty() {
            return TypeSubstitution::new();
        }
        if !explicit.is_empty() {
            return TypeSubstitution::from_args(&shape.type_params, explicit);
        }
        for &tp in &shape.type_params {
            self.candidates.insert(tp, Vec::new());
        }

        let db = self.simplifier.db();
        for (i, &arg) in arg_types.iter().enumerate() {
            let param = match shape.params.get(i) {
                Some(p) => p,
                None => match shape.params.last() {
                    Some(last) if last.rest => last,
                    _ => break,
                },
            };
            let param_ty = if param.rest {
                db.array_element(param.type_id).unwrap_or(param.type_id)
            } else {
                param.type_id
            };
            self.collect(param_ty, arg);
        }

        let mut subst = TypeSubstitution::new();
        let joiner = TypeJoiner::new(self.simplifier);
        for (&tp, found) in &self.candidates {
            let widened: Vec<TypeId> = found
                .iter()
                .map(|&t| widen_literals(&self.simplifier, env, t))
                .collect();
            let inferred = if widened.is_empty() {
                db.type_variable_bound(tp)
            } else {
                joiner.join(env, &widened, &mut NullSink)
            };
            trace!(type_param = tp.0, inferred = inferred.0, "inferred type argument");
            subst.insert(tp, inferred);
        }
        subst
    }

    fn collect(&mut self, param: TypeId, arg: TypeId) {
        if param == arg || arg.is_unknown() || self.depth >= MAX_MATCH_DEPTH {
            return;
        }
        self.depth += 1;
        self.collect_inner(param, arg);
        self.depth -= 1;
    }

    fn collect_inner(&mut self, param: TypeId, arg: TypeId) {
        let db = self.simplifier.db();
        match db.lookup(param) {
            TypeData::TypeVariable(tp) => {
                if let Some(found) = self.candidates.get_mut(&tp) {
                    found.push(arg);
                }
            }
            TypeData::Nominal(app) if !app.args.is_empty() => {
                let Some(inst) = find_instantiation(db, arg, app.def) else {
                    return;
                };
                let Some(arg_app) = db.types.application(inst) else {
                    return;
                };
                for (&p, &a) in app.args.iter().zip(arg_app.args.iter()) {
                    self.collect(p, db.upper_bound(a));
                }
            }
            TypeData::Union(members) => {
                for &m in members.iter() {
                    self.collect(m, arg);
                }
            }
            TypeData::Function(param_shape) => {
                let Some(arg_shape) = db.types.function_shape(arg) else {
                    return;
                };
                for (p, a) in param_shape.params.iter().zip(arg_shape.params.iter()) {
                    self.collect(p.type_id, a.type_id);
                }
                self.collect(param_shape.return_type, arg_shape.return_type);
            }
            TypeData::Structural(param_shape) => {
                let TypeData::Structural(arg_shape) = db.lookup(arg) else {
                    return;
                };
                for member in &param_shape.members {
                    if let Some(found) = arg_shape.member(member.name) {
                        self.collect(member.type_id, found.type_id);
                    }
                }
            }
            TypeData::MetaType { arg: inner, .. } => {
                if let TypeData::MetaType { arg: arg_inner, .. } = db.lookup(arg) {
                    self.collect(inner, arg_inner);
                }
            }
            TypeData::Wildcard {
                bound: Some(bound), ..
            } => self.collect(bound, arg),
            _ => {}
        }
    }
}

#[cfg(test)]
#[path = "../tests/type_args_tests.rs"]
mod tests;
