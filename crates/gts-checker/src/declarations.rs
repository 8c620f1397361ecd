//! Declarations and typed elements.
//!
//! Declaration-side rules map a [`DefId`] to the type it defines. Typed
//! elements (fields, parameters, variables) without an annotation are
//! inferred through their syntax node and memoized on the declaration, but
//! only when the result did not depend on a recursion guard of the caller
//! and the environment carries no substitution or `this` binding.

use crate::judgment::TypeJudgment;
use gts_ast::{ForKind, NodeData};
use gts_common::NodeIndex;
use gts_solver::{
    DefFlags, DefId, DefKind, DefinitionInfo, Environment, GuardKey, GuardKind, NullSink,
    StructuralMember, StructuralShape, TypeData, TypeId, TypeJoiner, WildcardKind,
    sanitize_declared_type, widen_literals,
};
use tracing::trace;

impl<'a> TypeJudgment<'a> {
    // =========================================================================
    // Declarations
    // =========================================================================

    pub(crate) fn infer_decl(&self, env: &Environment, def: DefId) -> TypeId {
        self.descend(def.0, || self.type_of_definition(env, def))
    }

    fn type_of_definition(&self, env: &Environment, def: DefId) -> TypeId {
        let def = self.db.defs.canonical(def);
        let Some(info) = self.db.def(def) else {
            return TypeId::UNKNOWN;
        };
        let types = self.types();
        let result = match info.kind {
            DefKind::Class => types.constructor_type(types.nominal_simple(def)),
            DefKind::Interface | DefKind::Enum(_) => types.meta_type(types.nominal_simple(def)),
            DefKind::TypeAlias => info
                .declared_type
                .map_or(TypeId::UNKNOWN, |aliased| types.meta_type(aliased)),
            DefKind::EnumLiteral => info
                .owner
                .map_or(TypeId::UNKNOWN, |owner| types.enum_literal(owner, def)),
            DefKind::Field | DefKind::Parameter | DefKind::Variable => {
                self.type_of_typed_element(env, def, &info)
            }
            DefKind::Getter | DefKind::Setter => info.declared_type.unwrap_or(TypeId::ANY),
            DefKind::Function | DefKind::Method => self.type_of_signature(env, def, &info),
            DefKind::TypeVariable => types.type_variable(def),
            DefKind::Dynamic => TypeId::DYNAMIC_ANY,
            DefKind::Namespace => types.nominal_simple(def),
        };
        trace!(def_id = def.0, type_id = result.0, "type_of_definition");
        result
    }

    /// Whether a result computed under `env` may be written to a memo cell.
    fn memoizable(&self, env: &Environment, fallbacks_before: u32) -> bool {
        self.fallback_count() == fallbacks_before
            && !env.has_substitutions()
            && env.this_binding().is_none()
    }

    fn type_of_typed_element(
        &self,
        env: &Environment,
        def: DefId,
        info: &DefinitionInfo,
    ) -> TypeId {
        if let Some(declared) = info.declared_type {
            if info.kind == DefKind::Parameter && info.flags.contains(DefFlags::VARIADIC) {
                return self.db.builtins.array_of(self.types(), declared);
            }
            return declared;
        }
        if let Some(cached) = info.cached_type() {
            return cached;
        }
        let Some(node) = info.node else {
            return TypeId::ANY;
        };
        let before = self.fallback_count();
        let ty = self.infer_node(env, node);
        if self.memoizable(env, before) {
            self.db.defs.cache_type(def, ty);
        }
        ty
    }

    /// Signature of a function or method. A signature flagged with an
    /// inferred return type gets it from the body's `return` expressions.
    fn type_of_signature(&self, env: &Environment, def: DefId, info: &DefinitionInfo) -> TypeId {
        let Some(signature) = info.declared_type else {
            return TypeId::UNKNOWN;
        };
        if !info.flags.contains(DefFlags::INFERRED_RETURN) {
            return signature;
        }
        if let Some(cached) = info.cached_type() {
            return cached;
        }
        let (Some(shape), Some(node)) = (self.types().function_shape(signature), info.node) else {
            return signature;
        };
        let key = GuardKey::new(GuardKind::FunctionReturn, node);
        if env.is_guarded(key) {
            self.note_fallback();
            return signature;
        }
        let before = self.fallback_count();
        let return_type = self.inferred_return_type(&env.with_guard(key), node, info.flags);
        let mut shape = (*shape).clone();
        shape.return_type = return_type;
        let ty = self.types().function(shape);
        if self.memoizable(env, before) {
            self.db.defs.cache_type(def, ty);
        }
        ty
    }

    fn inferred_return_type(
        &self,
        env: &Environment,
        body_owner: NodeIndex,
        flags: DefFlags,
    ) -> TypeId {
        let (returns, yields) = self.collect_exits(body_owner);
        let simplifier = self.simplifier();
        let joiner = TypeJoiner::new(simplifier);
        let types = self.types();
        let builtins = self.db.builtins;

        let returned: Vec<TypeId> = returns
            .iter()
            .map(|&expr| widen_literals(&simplifier, env, self.infer_node(env, expr)))
            .collect();
        let result = if returned.is_empty() {
            TypeId::VOID
        } else {
            joiner.join(env, &returned, &mut NullSink)
        };

        let is_async = flags.contains(DefFlags::ASYNC);
        if flags.contains(DefFlags::GENERATOR) {
            let yielded: Vec<TypeId> = yields
                .iter()
                .map(|&y| self.yielded_value_type(env, y))
                .map(|ty| widen_literals(&simplifier, env, ty))
                .collect();
            let yield_type = if yielded.is_empty() {
                TypeId::UNDEFINED
            } else {
                joiner.join(env, &yielded, &mut NullSink)
            };
            let def = if is_async {
                builtins.async_generator
            } else {
                builtins.generator
            };
            types.nominal(def, vec![yield_type, result, TypeId::ANY])
        } else if is_async {
            let error = types.wildcard(None, WildcardKind::Extends);
            builtins.promise_of(types, result, error)
        } else {
            result
        }
    }

    /// Type a `yield` contributes to the generator's yield type argument.
    fn yielded_value_type(&self, env: &Environment, yield_node: NodeIndex) -> TypeId {
        match self.data(yield_node) {
            Some(NodeData::Yield {
                expression,
                is_delegate: true,
            }) => {
                let iterated = self.infer_node(env, *expression);
                self.iterable_element_type(env, iterated, false)
                    .unwrap_or(TypeId::ANY)
            }
            Some(NodeData::Yield { expression, .. }) if expression.is_some() => {
                self.infer_node(env, *expression)
            }
            _ => TypeId::UNDEFINED,
        }
    }

    /// Returned expressions and `yield` nodes of a function body, not
    /// descending into nested functions or classes.
    fn collect_exits(&self, body_owner: NodeIndex) -> (Vec<NodeIndex>, Vec<NodeIndex>) {
        let mut returns = Vec::new();
        let mut yields = Vec::new();
        let mut stack: Vec<NodeIndex> = self.arena.children(body_owner).into_iter().collect();
        stack.reverse();
        while let Some(idx) = stack.pop() {
            let Some(data) = self.data(idx) else {
                continue;
            };
            match data {
                NodeData::Function { .. }
                | NodeData::Class { .. }
                | NodeData::Method { .. }
                | NodeData::Getter { .. }
                | NodeData::Setter { .. } => continue,
                NodeData::Return { expression } if expression.is_some() => {
                    returns.push(*expression);
                }
                NodeData::Yield { .. } => yields.push(idx),
                _ => {}
            }
            let mut children = data.children();
            children.reverse();
            stack.extend(children);
        }
        (returns, yields)
    }

    // =========================================================================
    // Typed element nodes
    // =========================================================================

    /// Type of unannotated variables, parameters and catch variables.
    pub(crate) fn untyped_element_type(&self) -> TypeId {
        if self.options.is_dynamic() {
            TypeId::DYNAMIC_ANY
        } else {
            TypeId::ANY
        }
    }

    /// Sanitized type of an initializer, guarded against the initializer
    /// referring to the element it initializes.
    pub(crate) fn type_of_initializer(
        &self,
        env: &Environment,
        initializer: NodeIndex,
        widen: bool,
    ) -> TypeId {
        if initializer.is_none() {
            return TypeId::ANY;
        }
        let key = GuardKey::new(GuardKind::VariableInitializer, initializer);
        if env.is_guarded(key) {
            self.note_fallback();
            return TypeId::ANY;
        }
        let ty = self.infer_node(&env.with_guard(key), initializer);
        sanitize_declared_type(&self.simplifier(), env, ty, widen)
    }

    pub(crate) fn type_of_field(
        &self,
        env: &Environment,
        declared: Option<TypeId>,
        initializer: NodeIndex,
        is_immutable: bool,
    ) -> TypeId {
        declared.unwrap_or_else(|| self.type_of_initializer(env, initializer, !is_immutable))
    }

    pub(crate) fn type_of_variable(
        &self,
        env: &Environment,
        idx: NodeIndex,
        declared: Option<TypeId>,
        initializer: NodeIndex,
        is_immutable: bool,
    ) -> TypeId {
        if let Some(declared) = declared {
            return declared;
        }
        if self.options.is_dynamic() {
            return TypeId::DYNAMIC_ANY;
        }
        let simplifier = self.simplifier();
        let parent = self.arena.parent(idx);
        match self.data(parent) {
            Some(NodeData::BindingElement { .. }) => {
                let key = GuardKey::new(GuardKind::DestructuringPattern, idx);
                if env.is_guarded(key) {
                    self.note_fallback();
                    return TypeId::ANY;
                }
                let ty = self.destructured_type(&env.with_guard(key), idx);
                if ty.is_unknown() {
                    return ty;
                }
                sanitize_declared_type(&simplifier, env, ty, !is_immutable)
            }
            Some(NodeData::For {
                kind: ForKind::Of { is_await },
                expression,
                ..
            }) => {
                let key = GuardKey::new(GuardKind::ForOfIteration, parent);
                if env.is_guarded(key) {
                    self.note_fallback();
                    return TypeId::ANY;
                }
                let iterated = self.infer_node(&env.with_guard(key), *expression);
                match self.iterable_element_type(env, iterated, *is_await) {
                    Some(element) => {
                        sanitize_declared_type(&simplifier, env, element, !is_immutable)
                    }
                    None => TypeId::UNKNOWN,
                }
            }
            Some(NodeData::For {
                kind: ForKind::In, ..
            }) => TypeId::STRING,
            _ if initializer.is_some() => {
                let key = GuardKey::new(GuardKind::VariableInitializer, initializer);
                if env.is_guarded(key) {
                    self.note_fallback();
                    return TypeId::ANY;
                }
                let ty = self.infer_node(&env.with_guard(key), initializer);
                if ty.is_unknown() || self.is_bound_this(ty) {
                    return ty;
                }
                sanitize_declared_type(&simplifier, env, ty, !is_immutable)
            }
            _ => TypeId::ANY,
        }
    }

    pub(crate) fn type_of_parameter(
        &self,
        env: &Environment,
        declared: Option<TypeId>,
        initializer: NodeIndex,
        is_variadic: bool,
    ) -> TypeId {
        let base = match declared {
            Some(declared) => declared,
            None if initializer.is_some() => self.type_of_initializer(env, initializer, true),
            None => self.untyped_element_type(),
        };
        if is_variadic {
            self.db.builtins.array_of(self.types(), base)
        } else {
            base
        }
    }

    /// `this[C]` or `type{this[C]}`.
    pub(crate) fn is_bound_this(&self, ty: TypeId) -> bool {
        match self.db.lookup(ty) {
            TypeData::This(Some(_)) => true,
            TypeData::MetaType { arg, .. } => {
                matches!(self.db.lookup(arg), TypeData::This(Some(_)))
            }
            _ => false,
        }
    }

    // =========================================================================
    // Object literals
    // =========================================================================

    pub(crate) fn type_of_object_literal(
        &self,
        env: &Environment,
        properties: &[NodeIndex],
    ) -> TypeId {
        let members = properties
            .iter()
            .filter_map(|&property| match self.data(property) {
                Some(NodeData::PropertyAssignment { def, name, .. }) => Some(StructuralMember {
                    name: *name,
                    type_id: self.infer_node(env, property),
                    optional: false,
                    def: *def,
                }),
                _ => None,
            })
            .collect();
        self.types().structural(StructuralShape { members })
    }
}

#[cfg(test)]
#[path = "../tests/declarations_tests.rs"]
mod tests;
