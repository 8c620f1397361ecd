//! Identifier references, `this`, `super`, property and index access.

use crate::constants::ConstantEvaluator;
use crate::judgment::TypeJudgment;
use gts_ast::NodeData;
use gts_common::{Atom, NodeIndex};
use gts_solver::inheritance::classifier_chain;
use gts_solver::{
    DefFlags, DefId, DefKind, EnumKind, Environment, GuardKey, GuardKind, GuardNarrowing,
    GuardState, InstanceofFact, LiteralValue, TypeData, TypeId, WildcardKind, add_substitutions,
};
use tracing::trace;

impl<'a> TypeJudgment<'a> {
    // =========================================================================
    // Identifiers
    // =========================================================================

    pub(crate) fn type_of_identifier(
        &self,
        env: &Environment,
        idx: NodeIndex,
        target: Option<DefId>,
    ) -> TypeId {
        let Some(target) = target else {
            return TypeId::UNKNOWN;
        };
        let declared = self.infer_decl(env, target);
        let narrowed = self.narrow_by_flow(env, idx, target, declared);
        let ty = self.substitute(env, narrowed);
        if self.arena.is_write_access(idx) {
            ty
        } else {
            self.capture(ty)
        }
    }

    /// Read access sees a wildcard through its upper bound.
    pub(crate) fn capture(&self, ty: TypeId) -> TypeId {
        match self.db.lookup(ty) {
            TypeData::Wildcard { .. } => self.db.upper_bound(ty),
            _ => ty,
        }
    }

    /// Refine `declared` with the definitive `instanceof` guards on `target`
    /// holding at `reference`.
    fn narrow_by_flow(
        &self,
        env: &Environment,
        reference: NodeIndex,
        target: DefId,
        declared: TypeId,
    ) -> TypeId {
        let guards = self.flow.definitive_guards(reference);
        if guards.is_empty() {
            return declared;
        }
        let defs = self.db.defs;
        let subject = defs.canonical(target);
        let facts: Vec<InstanceofFact> = guards
            .iter()
            .filter(|guard| defs.canonical(guard.subject) == subject)
            .filter(|guard| !guard.type_identifiers.is_empty())
            .map(|guard| {
                let tested: Vec<TypeId> = guard
                    .type_identifiers
                    .iter()
                    .map(|&type_ref| self.instanceof_target_type(env, type_ref))
                    .collect();
                let ty = match tested.as_slice() {
                    [single] => *single,
                    _ => self.types().union_unsimplified(tested),
                };
                InstanceofFact {
                    assertion: guard.assertion,
                    ty,
                }
            })
            .collect();
        if facts.is_empty() {
            return declared;
        }
        trace!(node = reference.0, facts = facts.len(), "narrow_by_flow");
        GuardNarrowing::new(self.simplifier())
            .narrow_by_instanceof_guards(env, Some(declared), &facts)
            .unwrap_or(declared)
    }

    /// Instance type tested by the right-hand side of `instanceof`.
    fn instanceof_target_type(&self, env: &Environment, type_ref: NodeIndex) -> TypeId {
        let ty = self.infer_node(env, type_ref);
        match self.db.lookup(ty) {
            TypeData::MetaType { arg, .. } => arg,
            _ => self
                .resolve_constructible(env, ty)
                .map_or(ty, |newable| newable.instance_type),
        }
    }

    // =========================================================================
    // this and super
    // =========================================================================

    /// Classifier declaration owning the innermost member around `idx`.
    pub(crate) fn enclosing_classifier(&self, idx: NodeIndex) -> Option<(NodeIndex, DefId)> {
        let member = self.arena.enclosing_member(idx)?;
        match self.data(self.arena.parent(member)) {
            Some(NodeData::Class { def, .. }) | Some(NodeData::Interface { def, .. }) => {
                def.map(|def| (member, def))
            }
            _ => None,
        }
    }

    /// `C<T1,...>` with the classifier's own type variables as arguments.
    pub(crate) fn own_type(&self, def: DefId) -> TypeId {
        let types = self.types();
        match self.db.def(def) {
            Some(info) if !info.type_params.is_empty() => {
                let args = info.type_params.iter().map(|&tp| types.type_variable(tp)).collect();
                types.nominal(def, args)
            }
            _ => types.nominal_simple(def),
        }
    }

    /// `this[C]` inside instance members of `C`, `type{this[C]}` inside
    /// static members, `None` outside classifiers.
    pub(crate) fn this_type_at(&self, idx: NodeIndex) -> Option<TypeId> {
        let (member, classifier) = self.enclosing_classifier(idx)?;
        let types = self.types();
        let this_type = types.this_type(Some(self.own_type(classifier)));
        let is_static = self.data(member).is_some_and(NodeData::is_static_member);
        Some(if is_static {
            types.meta_type(this_type)
        } else {
            this_type
        })
    }

    fn super_type_of(&self, class: DefId) -> TypeId {
        self.db
            .def(class)
            .and_then(|info| info.extends)
            .unwrap_or_else(|| self.db.object_type())
    }

    /// `super` depends on where it stands: a member access receiver is the
    /// super class (its constructor type inside static members), a bare call
    /// inside a constructor is the super constructor. Everything else is
    /// invalid and `[unknown]`.
    pub(crate) fn type_of_super(&self, env: &Environment, idx: NodeIndex) -> TypeId {
        let Some(member) = self.arena.enclosing_member(idx) else {
            return TypeId::UNKNOWN;
        };
        let class = match self.data(self.arena.parent(member)) {
            Some(NodeData::Class { def: Some(def), .. }) => *def,
            _ => return TypeId::UNKNOWN,
        };
        let types = self.types();
        let super_type = self.super_type_of(class);
        let member_data = self.data(member);
        match self.data(self.arena.parent(idx)) {
            Some(NodeData::PropertyAccess { target, .. })
            | Some(NodeData::IndexedAccess { target, .. })
                if *target == idx =>
            {
                if member_data.is_some_and(NodeData::is_static_member) {
                    types.constructor_type(super_type)
                } else {
                    super_type
                }
            }
            Some(NodeData::Call { target, .. }) if *target == idx => {
                if !matches!(
                    member_data,
                    Some(NodeData::Method {
                        is_constructor: true,
                        ..
                    })
                ) {
                    return TypeId::UNKNOWN;
                }
                self.resolve_constructible(env, types.constructor_type(super_type))
                    .and_then(|newable| newable.signature)
                    .unwrap_or(TypeId::UNKNOWN)
            }
            _ => TypeId::UNKNOWN,
        }
    }

    // =========================================================================
    // Property access
    // =========================================================================

    pub(crate) fn type_of_property_access(
        &self,
        env: &Environment,
        idx: NodeIndex,
        target: NodeIndex,
        name: Atom,
        property: Option<DefId>,
        type_args: &[TypeId],
    ) -> TypeId {
        let key = GuardKey::new(GuardKind::PropertyAccess, idx);
        if let GuardState::Provisional(preliminary) = env.guard_state(key) {
            self.note_fallback();
            return preliminary;
        }
        let mut env2 = env.with_provisional(key, TypeId::ANY);
        let receiver = self.infer_node(&env2, target);
        add_substitutions(self.db, &mut env2, receiver);
        env2.set_this_binding(receiver);

        let target_data = self.data(target);
        let on_super = matches!(target_data, Some(NodeData::Super));
        if !receiver.is_unknown() && matches!(target_data, Some(NodeData::This | NodeData::Super)) {
            // Type arguments the enclosing class passes to its super class.
            if let Some(extends) = self
                .enclosing_classifier(idx)
                .and_then(|(_, class)| self.db.def(class))
                .and_then(|info| info.extends)
            {
                add_substitutions(self.db, &mut env2, extends);
            }
        }

        let receiver_bound = self.db.upper_bound(receiver);
        let is_constructor_property = match property {
            Some(p) => self
                .db
                .def(p)
                .is_some_and(|info| info.flags.contains(DefFlags::CONSTRUCTOR)),
            None => &*self.types().resolve_atom(name) == "constructor",
        };

        let ty = if is_constructor_property {
            self.constructor_property_type(receiver_bound)
        } else if property.is_none() && receiver_bound == TypeId::DYNAMIC_ANY {
            TypeId::DYNAMIC_ANY
        } else {
            let resolved = property.or_else(|| {
                let is_static = matches!(self.db.lookup(receiver_bound), TypeData::MetaType { .. });
                self.members.resolve_member(receiver_bound, name, true, is_static)
            });
            match resolved {
                Some(member) => {
                    let member_type = self.infer_decl(&env2, member);
                    if !type_args.is_empty() {
                        self.bind_explicit_type_args(&mut env2, member, member_type, type_args);
                    }
                    member_type
                }
                None => self
                    .structural_member_type(receiver_bound, name)
                    .unwrap_or(TypeId::UNKNOWN),
            }
        };

        let mut ty = self.substitute(&env2, ty);
        if !self.arena.is_write_access(idx) {
            ty = self.capture(ty);
        }
        if on_super {
            ty = self.rebind_this_return(idx, ty);
        }
        ty
    }

    /// Type of a member of an anonymous object shape that has no declaration.
    pub(crate) fn structural_member_type(&self, receiver: TypeId, name: Atom) -> Option<TypeId> {
        match self.db.lookup(receiver) {
            TypeData::Structural(shape) => shape.member(name).map(|m| m.type_id),
            _ => None,
        }
    }

    fn bind_explicit_type_args(
        &self,
        env: &mut Environment,
        member: DefId,
        member_type: TypeId,
        type_args: &[TypeId],
    ) {
        let params = match self.db.def(member) {
            Some(info) if !info.type_params.is_empty() => info.type_params.clone(),
            _ => self
                .types()
                .function_shape(member_type)
                .map(|shape| shape.type_params.clone())
                .unwrap_or_default(),
        };
        for (&param, &arg) in params.iter().zip(type_args) {
            env.add_substitution(param, arg);
        }
    }

    /// The built-in `constructor` property: `constructor{Function}` on a meta
    /// type, `constructor{? extends C}` on instances of `C`.
    fn constructor_property_type(&self, receiver: TypeId) -> TypeId {
        let types = self.types();
        if matches!(self.db.lookup(receiver), TypeData::MetaType { .. }) {
            return types.constructor_type(self.db.builtins.function_type);
        }
        match self.declared_classifier(receiver) {
            Some(def) => {
                let bound = types.nominal_simple(def);
                types.constructor_type(types.wildcard(Some(bound), WildcardKind::Extends))
            }
            None => TypeId::UNKNOWN,
        }
    }

    /// Nominal declaration behind a receiver type.
    fn declared_classifier(&self, ty: TypeId) -> Option<DefId> {
        match self.db.lookup(ty) {
            TypeData::Nominal(app) => Some(app.def),
            TypeData::Literal(LiteralValue::EnumLiteral { enum_def, .. }) => Some(enum_def),
            _ => classifier_chain(self.db, ty)
                .into_iter()
                .find(|&def| self.db.defs.kind(def).is_some_and(DefKind::is_classifier)),
        }
    }

    /// `super.m()` returning `this` returns the `this` type of the calling
    /// class, not of the super class.
    fn rebind_this_return(&self, idx: NodeIndex, ty: TypeId) -> TypeId {
        let types = self.types();
        let Some(shape) = types.function_shape(ty) else {
            return ty;
        };
        if !matches!(self.db.lookup(shape.return_type), TypeData::This(Some(_))) {
            return ty;
        }
        let mut shape = (*shape).clone();
        shape.return_type = self.this_type_at(idx).unwrap_or(TypeId::UNKNOWN);
        types.function(shape)
    }

    // =========================================================================
    // Indexed access
    // =========================================================================

    pub(crate) fn type_of_indexed_access(
        &self,
        env: &Environment,
        target: NodeIndex,
        index: NodeIndex,
    ) -> TypeId {
        if target.is_none()
            || index.is_none()
            || matches!(self.data(target), Some(NodeData::Super))
        {
            return TypeId::UNKNOWN;
        }
        let db = self.db;
        let receiver = self.infer_node(env, target);
        let receiver_bound = db.resolve_alias(db.upper_bound(receiver));
        let index_type = self.infer_node(env, index);

        let is_numeric_index = !index_type.is_unknown()
            && !index_type.is_any()
            && self.relation.is_subtype(env, index_type, TypeId::NUMBER);
        if is_numeric_index {
            if let Some(element) = self.indexed_element_type(receiver_bound) {
                if self.is_raw_generic(receiver_bound) {
                    return TypeId::ANY;
                }
                let mut env2 = env.wrap();
                add_substitutions(db, &mut env2, receiver_bound);
                env2.set_this_binding(receiver_bound);
                return self.substitute(&env2, element);
            }
        }

        let constant = ConstantEvaluator::new(db, self.arena).evaluate(index);
        if let Some(constant) = constant {
            let name = self.types().intern_string(&constant.property_name());
            if let Some(ty) = self.member_value_type(env, receiver_bound, name) {
                return ty;
            }
            if receiver_bound == TypeId::DYNAMIC_ANY
                || self.has_index_signature(receiver_bound)
                || receiver_bound == db.object_type()
            {
                return TypeId::DYNAMIC_ANY;
            }
            return TypeId::UNKNOWN;
        }

        if receiver_bound == TypeId::DYNAMIC_ANY || self.has_index_signature(receiver_bound) {
            TypeId::DYNAMIC_ANY
        } else {
            TypeId::ANY
        }
    }

    /// Type of member `name` read from `receiver`, with the receiver's type
    /// arguments and `this` applied.
    pub(crate) fn member_value_type(
        &self,
        env: &Environment,
        receiver: TypeId,
        name: Atom,
    ) -> Option<TypeId> {
        if let Some(ty) = self.structural_member_type(receiver, name) {
            return Some(ty);
        }
        let is_static = matches!(self.db.lookup(receiver), TypeData::MetaType { .. });
        let member = self.members.resolve_member(receiver, name, true, is_static)?;
        let mut env2 = env.wrap();
        add_substitutions(self.db, &mut env2, receiver);
        env2.set_this_binding(receiver);
        let ty = self.infer_decl(&env2, member);
        Some(self.capture(self.substitute(&env2, ty)))
    }

    /// Element type a numeric index yields: strings and string-based enums
    /// yield `string`, array-like classes their declared element type.
    fn indexed_element_type(&self, receiver: TypeId) -> Option<TypeId> {
        let db = self.db;
        let is_string_based_enum = |def: DefId| {
            db.def(def)
                .is_some_and(|info| info.enum_kind() == Some(EnumKind::StringBased))
        };
        match db.lookup(receiver) {
            TypeData::Intrinsic(_) if receiver == TypeId::STRING => return Some(TypeId::STRING),
            TypeData::Literal(LiteralValue::String(_)) => return Some(TypeId::STRING),
            TypeData::Literal(LiteralValue::EnumLiteral { enum_def, .. })
                if is_string_based_enum(enum_def) =>
            {
                return Some(TypeId::STRING);
            }
            TypeData::Nominal(app) if is_string_based_enum(app.def) => return Some(TypeId::STRING),
            _ => {}
        }
        classifier_chain(db, receiver).into_iter().find_map(|def| {
            let info = db.def(def)?;
            (info.kind == DefKind::Class).then_some(info.element_type).flatten()
        })
    }

    /// Generic classifier referenced without type arguments.
    fn is_raw_generic(&self, ty: TypeId) -> bool {
        self.types().application(ty).is_some_and(|app| {
            app.args.is_empty()
                && self
                    .db
                    .def(app.def)
                    .is_some_and(|info| !info.type_params.is_empty())
        })
    }

    pub(crate) fn has_index_signature(&self, ty: TypeId) -> bool {
        classifier_chain(self.db, ty).into_iter().any(|def| {
            self.db
                .def(def)
                .is_some_and(|info| info.flags.contains(DefFlags::INDEX_SIGNATURE))
        })
    }
}

#[cfg(test)]
#[path = "../tests/access_tests.rs"]
mod tests;
