//! Element types of iterated values.

use crate::judgment::TypeJudgment;
use gts_solver::inheritance::find_instantiation;
use gts_solver::{DefId, Environment, LiteralValue, TypeData, TypeId};

const MAX_ITERATION_BOUND_DEPTH: u32 = 16;

impl<'a> TypeJudgment<'a> {
    /// Element type `for (x of ty)` (or `for await`) iterates, `None` when
    /// `ty` is not iterable.
    ///
    /// Strings iterate strings; `any` iterates itself; unions iterate the
    /// union of their members' elements; everything else has to be or inherit
    /// `Iterable<T>` (`AsyncIterable<T>` first for `for await`, where a
    /// synchronous `Iterable<Promise<T>>` also yields `T`).
    pub(crate) fn iterable_element_type(
        &self,
        env: &Environment,
        ty: TypeId,
        is_async: bool,
    ) -> Option<TypeId> {
        self.element_type_bounded(env, ty, is_async, 0)
    }

    fn element_type_bounded(
        &self,
        env: &Environment,
        ty: TypeId,
        is_async: bool,
        depth: u32,
    ) -> Option<TypeId> {
        if depth > MAX_ITERATION_BOUND_DEPTH {
            return None;
        }
        let db = self.db;
        let ty = db.resolve_alias(ty);
        match db.lookup(ty) {
            TypeData::DynamicAny => return Some(TypeId::DYNAMIC_ANY),
            TypeData::Intrinsic(_) if ty == TypeId::ANY => return Some(TypeId::ANY),
            TypeData::Intrinsic(_) if ty == TypeId::STRING => return Some(TypeId::STRING),
            TypeData::Literal(LiteralValue::String(_)) => return Some(TypeId::STRING),
            TypeData::Union(members) => {
                let elements = members
                    .iter()
                    .map(|&m| self.element_type_bounded(env, m, is_async, depth + 1))
                    .collect::<Option<Vec<TypeId>>>()?;
                return Some(self.simplifier().create_union(env, &elements));
            }
            TypeData::TypeVariable(def) => {
                let bound = db.type_variable_bound(def);
                return (bound != TypeId::ANY)
                    .then(|| self.element_type_bounded(env, bound, is_async, depth + 1))
                    .flatten();
            }
            TypeData::Wildcard { .. } | TypeData::This(Some(_)) => {
                let upper = db.upper_bound(ty);
                return (upper != ty)
                    .then(|| self.element_type_bounded(env, upper, is_async, depth + 1))
                    .flatten();
            }
            _ => {}
        }

        let builtins = db.builtins;
        if is_async {
            if let Some(element) = self.type_argument_of(ty, builtins.async_iterable) {
                return Some(element);
            }
            let element = self.type_argument_of(ty, builtins.iterable)?;
            return Some(match self.types().application(element) {
                Some(app) if app.def == builtins.promise => {
                    db.upper_bound(app.args.first().copied().unwrap_or(TypeId::ANY))
                }
                _ => element,
            });
        }
        self.type_argument_of(ty, builtins.iterable)
    }

    /// First type argument of the instantiation of `def` among the super
    /// types of `ty`.
    fn type_argument_of(&self, ty: TypeId, def: DefId) -> Option<TypeId> {
        let instantiation = find_instantiation(self.db, ty, def)?;
        let app = self.types().application(instantiation)?;
        Some(app.args.first().copied().unwrap_or(TypeId::ANY))
    }
}

#[cfg(test)]
#[path = "../tests/iteration_tests.rs"]
mod tests;
