//! Calls, `new`, `await` and `yield`.

use crate::judgment::TypeJudgment;
use gts_ast::NodeData;
use gts_common::NodeIndex;
use gts_solver::{
    DefFlags, DefId, Environment, FunctionShape, GuardKey, GuardKind, GuardState,
    TypeArgumentInference, TypeData, TypeId,
};
use tracing::trace;

impl<'a> TypeJudgment<'a> {
    /// Add the type arguments of a call to `env`: explicit ones as written,
    /// otherwise inferred from the argument types.
    pub(crate) fn add_call_substitutions(
        &self,
        env: &mut Environment,
        shape: &FunctionShape,
        type_args: &[TypeId],
        args: &[NodeIndex],
    ) {
        if shape.type_params.is_empty() {
            return;
        }
        let arg_types: Vec<TypeId> = if type_args.is_empty() {
            args.iter().map(|&arg| self.infer_node(env, arg)).collect()
        } else {
            Vec::new()
        };
        let subst =
            TypeArgumentInference::new(self.simplifier()).infer(env, shape, type_args, &arg_types);
        for (param, arg) in subst.iter() {
            env.add_substitution(param, arg);
        }
    }

    pub(crate) fn type_of_call(
        &self,
        env: &Environment,
        idx: NodeIndex,
        target: NodeIndex,
        type_args: &[TypeId],
        args: &[NodeIndex],
    ) -> TypeId {
        let target_type = self.infer_node(env, target);
        let Some(callable) = self.resolve_callable(env, target_type) else {
            return if target_type == TypeId::DYNAMIC_ANY {
                TypeId::DYNAMIC_ANY
            } else {
                TypeId::UNKNOWN
            };
        };
        let Some(signature) = callable.signature else {
            return if callable.dynamic {
                TypeId::DYNAMIC_ANY
            } else {
                TypeId::ANY
            };
        };
        let Some(shape) = self.types().function_shape(signature) else {
            return TypeId::UNKNOWN;
        };

        // A self-recursive function sees its declared return type.
        let key = GuardKey::new(GuardKind::CallExpression, idx);
        if let GuardState::Provisional(preliminary) = env.guard_state(key) {
            self.note_fallback();
            return self.substitute(env, preliminary);
        }
        let mut env2 = env.with_provisional(key, shape.return_type);
        self.add_call_substitutions(&mut env2, &shape, type_args, args);

        let awaited = matches!(
            self.data(self.arena.parent(idx)),
            Some(NodeData::Await { expression }) if *expression == idx
        );
        let return_type = if awaited && self.is_promisifiable(&shape) {
            trace!(node = idx.0, "type_of_call: auto-promisify");
            self.promisified_signature_return(&env2, &shape)
                .unwrap_or(TypeId::UNKNOWN)
        } else {
            shape.return_type
        };
        let ty = self.substitute(&env2, return_type);

        // A bound `this` must not leak out of a call whose receiver is not
        // literally `this` or `super`.
        if matches!(self.db.lookup(ty), TypeData::This(Some(_)))
            && !self.has_this_receiver(target)
        {
            return self.db.upper_bound(ty);
        }
        ty
    }

    fn has_this_receiver(&self, callee: NodeIndex) -> bool {
        match self.data(callee) {
            Some(NodeData::PropertyAccess { target, .. }) => {
                matches!(self.data(*target), Some(NodeData::This | NodeData::Super))
            }
            Some(NodeData::Paren { expression }) => self.has_this_receiver(*expression),
            _ => false,
        }
    }

    pub(crate) fn is_promisifiable(&self, shape: &FunctionShape) -> bool {
        shape
            .def
            .and_then(|def| self.db.def(def))
            .is_some_and(|info| info.flags.contains(DefFlags::PROMISIFIABLE))
    }

    pub(crate) fn type_of_new(
        &self,
        env: &Environment,
        callee: NodeIndex,
        type_args: &[TypeId],
        args: &[NodeIndex],
    ) -> TypeId {
        let callee_type = self.infer_node(env, callee);
        let Some(newable) = self.resolve_constructible(env, callee_type) else {
            return TypeId::UNKNOWN;
        };
        let Some(shape) = newable
            .signature
            .and_then(|signature| self.types().function_shape(signature))
        else {
            return newable.instance_type;
        };
        let mut env2 = env.wrap();
        self.add_call_substitutions(&mut env2, &shape, type_args, args);
        self.substitute(&env2, newable.instance_type)
    }

    // =========================================================================
    // Generators and async
    // =========================================================================

    /// `yield* g` is `g`'s return type argument; a plain `yield` is the
    /// `TNext` argument of the enclosing generator's declared return type.
    pub(crate) fn type_of_yield(
        &self,
        env: &Environment,
        idx: NodeIndex,
        expression: NodeIndex,
        is_delegate: bool,
    ) -> TypeId {
        let builtins = self.db.builtins;
        let is_generator_def =
            |def: DefId| def == builtins.generator || def == builtins.async_generator;
        if is_delegate {
            let delegated = self.db.upper_bound(self.infer_node(env, expression));
            return match self.types().application(delegated) {
                Some(app) if is_generator_def(app.def) => {
                    app.args.get(1).copied().unwrap_or(TypeId::ANY)
                }
                _ => TypeId::ANY,
            };
        }
        let declared_return = self
            .arena
            .enclosing_function(idx, true)
            .and_then(|function| self.data(function))
            .and_then(|data| data.declared_def())
            .and_then(|def| self.db.def(def))
            .filter(|info| !info.flags.contains(DefFlags::INFERRED_RETURN))
            .and_then(|info| info.declared_type)
            .and_then(|signature| self.types().function_shape(signature))
            .map(|shape| shape.return_type);
        match declared_return.and_then(|ty| self.types().application(ty)) {
            Some(app) if is_generator_def(app.def) => {
                app.args.get(2).copied().unwrap_or(TypeId::ANY)
            }
            _ => TypeId::ANY,
        }
    }

    /// `await p` unwraps `Promise<R,E>` to the upper bound of `R`; awaiting a
    /// promisifiable call awaits its promisified form; anything else passes
    /// through.
    pub(crate) fn type_of_await(&self, env: &Environment, expression: NodeIndex) -> TypeId {
        let awaited = self.infer_node(env, expression);
        if let Some(value) = self.promise_value_type(awaited) {
            return value;
        }
        if self.is_promisifiable_call(env, expression) {
            let promisified = self.promisified_return_type(env, expression);
            return self.promise_value_type(promisified).unwrap_or(promisified);
        }
        awaited
    }

    fn promise_value_type(&self, ty: TypeId) -> Option<TypeId> {
        let app = self.types().application(ty)?;
        (app.def == self.db.builtins.promise)
            .then(|| self.db.upper_bound(app.args.first().copied().unwrap_or(TypeId::ANY)))
    }
}

#[cfg(test)]
#[path = "../tests/calls_tests.rs"]
mod tests;
