//! Promisification of callback-style functions.
//!
//! A promisifiable function takes a callback as its last parameter. The
//! callback's parameters decide the promise:
//!
//! | Callback | Promise |
//! |----------|---------|
//! | `(err: E)` | `Promise<undefined, E>` |
//! | `(err: E, r: R)` | `Promise<R, E>` |
//! | `(err: E, r1: R1, r2: R2)` | `Promise<Array<union{R1,R2}>, E>` |
//! | `(r: R)` (first parameter not an `Error`) | `Promise<R, undefined>` |

use crate::judgment::TypeJudgment;
use gts_ast::NodeData;
use gts_common::NodeIndex;
use gts_solver::{Environment, FunctionShape, TypeId};

impl<'a> TypeJudgment<'a> {
    /// Type of `@Promisify call(...)`: the promise the call would produce.
    /// `[unknown]` when `expression` is not a call of a callback-style function.
    pub(crate) fn promisified_return_type(
        &self,
        env: &Environment,
        expression: NodeIndex,
    ) -> TypeId {
        let Some(NodeData::Call {
            target,
            type_args,
            args,
        }) = self.data(expression)
        else {
            return TypeId::UNKNOWN;
        };
        let Some(shape) = self.call_signature(env, *target) else {
            return TypeId::UNKNOWN;
        };
        let mut env2 = env.wrap();
        self.add_call_substitutions(&mut env2, &shape, type_args, args);
        match self.promisified_signature_return(&env2, &shape) {
            Some(promise) => self.substitute(&env2, promise),
            None => TypeId::UNKNOWN,
        }
    }

    pub(crate) fn is_promisifiable_call(&self, env: &Environment, expression: NodeIndex) -> bool {
        match self.data(expression) {
            Some(NodeData::Call { target, .. }) => self
                .call_signature(env, *target)
                .is_some_and(|shape| self.is_promisifiable(&shape)),
            _ => false,
        }
    }

    fn call_signature(
        &self,
        env: &Environment,
        callee: NodeIndex,
    ) -> Option<std::sync::Arc<FunctionShape>> {
        let callee_type = self.infer_node(env, callee);
        let signature = self.resolve_callable(env, callee_type)?.signature?;
        self.types().function_shape(signature)
    }

    /// `Promise<R, E>` derived from the trailing callback of `shape`.
    pub(crate) fn promisified_signature_return(
        &self,
        env: &Environment,
        shape: &FunctionShape,
    ) -> Option<TypeId> {
        let types = self.types();
        let builtins = self.db.builtins;
        let callback = shape.params.last()?;
        let callback = types.function_shape(self.db.upper_bound(callback.type_id))?;
        let param_types: Vec<TypeId> = callback.params.iter().map(|p| p.type_id).collect();

        let (error, results) = match param_types.split_first() {
            Some((&first, rest)) if self.is_error_type(env, first) => (first, rest),
            _ => (TypeId::UNDEFINED, param_types.as_slice()),
        };
        let value = match results {
            [] => TypeId::UNDEFINED,
            [single] => *single,
            many => builtins.array_of(types, self.simplifier().create_union(env, many)),
        };
        Some(builtins.promise_of(types, value, error))
    }

    fn is_error_type(&self, env: &Environment, ty: TypeId) -> bool {
        !ty.is_unknown()
            && !ty.is_any()
            && !ty.is_nullish()
            && self.relation.is_subtype(env, ty, self.db.builtins.error_type)
    }
}

#[cfg(test)]
#[path = "../tests/promisify_tests.rs"]
mod tests;
