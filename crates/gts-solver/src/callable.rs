//! Call and construct signature resolution.
//!
//! Uniformly extracts the signature a call (`f(...)`) or `new` expression
//! uses from any type value:
//!
//! | Type | Callable | Constructible |
//! |------|----------|---------------|
//! | function type | itself | - |
//! | classifier with a call / construct signature member | that member's signature | that member's signature |
//! | `constructor{C}` | - | `C`'s constructor (inherited or default) |
//! | `Function` | no particular signature | - |
//! | `any+` | no particular signature, dynamic | no particular signature, dynamic |
//! | type variable, `this`, wildcard | via upper bound | via upper bound |
//!
//! Signatures taken from members are instantiated with the receiver's type
//! arguments and with `this` bound to the receiver.

use crate::db::TypeDb;
use crate::def::{DefFlags, DefId, DefKind};
use crate::environment::Environment;
use crate::inheritance::classifier_chain;
use crate::instantiate::{add_substitutions, substitute_type_variables};
use crate::types::{FunctionShape, TypeData, TypeId};
use tracing::trace;

/// Result of [`SignatureResolver::resolve_callable`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Callable {
    /// Function type to call, `None` when the callee accepts anything.
    pub signature: Option<TypeId>,
    /// The callee is dynamic-any.
    pub dynamic: bool,
}

/// Result of [`SignatureResolver::resolve_constructible`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Newable {
    /// Constructor signature, `None` when the callee accepts anything.
    pub signature: Option<TypeId>,
    /// Type of the constructed value.
    pub instance_type: TypeId,
    pub dynamic: bool,
}

#[derive(Copy, Clone)]
pub struct SignatureResolver<'a> {
    db: TypeDb<'a>,
}

impl<'a> SignatureResolver<'a> {
    pub fn new(db: TypeDb<'a>) -> Self {
        Self { db }
    }

    pub fn resolve_callable(&self, env: &Environment, ty: TypeId) -> Option<Callable> {
        let db = self.db;
        let ty = db.resolve_alias(substitute_type_variables(db, env, ty));
        let result = match db.lookup(ty) {
            TypeData::DynamicAny => Some(Callable {
                signature: None,
                dynamic: true,
            }),
            TypeData::Function(_) => Some(Callable {
                signature: Some(ty),
                dynamic: false,
            }),
            TypeData::Nominal(app) if app.def == db.builtins.function => Some(Callable {
                signature: None,
                dynamic: false,
            }),
            TypeData::Nominal(_) => self
                .signature_member(env, ty, DefFlags::CALL_SIGNATURE)
                .map(|signature| Callable {
                    signature: Some(signature),
                    dynamic: false,
                }),
            TypeData::TypeVariable(def) => {
                let bound = db.type_variable_bound(def);
                (bound != TypeId::ANY)
                    .then(|| self.resolve_callable(env, bound))
                    .flatten()
            }
            TypeData::This(Some(_)) | TypeData::Wildcard { .. } => {
                let upper = db.upper_bound(ty);
                (upper != ty)
                    .then(|| self.resolve_callable(env, upper))
                    .flatten()
            }
            TypeData::Intersection(members) => members
                .iter()
                .find_map(|&m| self.resolve_callable(env, m)),
            TypeData::Union(members) => {
                // Callable only when every alternative agrees on the signature.
                let mut agreed: Option<Callable> = None;
                for &m in members.iter() {
                    let callable = self.resolve_callable(env, m)?;
                    if agreed.is_some_and(|a| a != callable) {
                        return None;
                    }
                    agreed = Some(callable);
                }
                agreed
            }
            TypeData::Structural(_)
            | TypeData::MetaType { .. }
            | TypeData::Literal(_)
            | TypeData::This(None)
            | TypeData::Intrinsic(_)
            | TypeData::Unknown => None,
        };
        trace!(type_id = ty.0, ?result, "resolve_callable");
        result
    }

    pub fn resolve_constructible(&self, env: &Environment, ty: TypeId) -> Option<Newable> {
        let db = self.db;
        let ty = db.resolve_alias(substitute_type_variables(db, env, ty));
        let result = match db.lookup(ty) {
            TypeData::DynamicAny => Some(Newable {
                signature: None,
                instance_type: TypeId::DYNAMIC_ANY,
                dynamic: true,
            }),
            TypeData::MetaType {
                arg,
                constructor: true,
            } => self.class_constructor(env, db.upper_bound(arg)),
            TypeData::Nominal(_) => self
                .signature_member(env, ty, DefFlags::CONSTRUCT_SIGNATURE)
                .map(|signature| Newable {
                    signature: Some(signature),
                    instance_type: db
                        .types
                        .function_shape(signature)
                        .map_or(TypeId::UNKNOWN, |shape| shape.return_type),
                    dynamic: false,
                }),
            TypeData::TypeVariable(def) => {
                let bound = db.type_variable_bound(def);
                (bound != TypeId::ANY)
                    .then(|| self.resolve_constructible(env, bound))
                    .flatten()
            }
            TypeData::This(Some(_)) | TypeData::Wildcard { .. } => {
                let upper = db.upper_bound(ty);
                (upper != ty)
                    .then(|| self.resolve_constructible(env, upper))
                    .flatten()
            }
            TypeData::Intersection(members) => members
                .iter()
                .find_map(|&m| self.resolve_constructible(env, m)),
            TypeData::MetaType { .. }
            | TypeData::Union(_)
            | TypeData::Function(_)
            | TypeData::Structural(_)
            | TypeData::Literal(_)
            | TypeData::This(None)
            | TypeData::Intrinsic(_)
            | TypeData::Unknown => None,
        };
        trace!(type_id = ty.0, ?result, "resolve_constructible");
        result
    }

    /// Signature of the first member flagged `flag` along the hierarchy of
    /// `receiver`, instantiated for the receiver.
    fn signature_member(
        &self,
        env: &Environment,
        receiver: TypeId,
        flag: DefFlags,
    ) -> Option<TypeId> {
        let db = self.db;
        let member = classifier_chain(db, receiver)
            .into_iter()
            .filter_map(|def| db.def(def))
            .flat_map(|info| info.members.clone())
            .find(|&m| db.def(m).is_some_and(|info| info.flags.contains(flag)))?;
        let signature = db.def(member)?.declared_type?;
        Some(self.instantiate_for_receiver(env, receiver, signature))
    }

    fn instantiate_for_receiver(&self, env: &Environment, receiver: TypeId, ty: TypeId) -> TypeId {
        let mut scoped = env.wrap();
        add_substitutions(self.db, &mut scoped, receiver);
        scoped.set_this_binding(receiver);
        substitute_type_variables(self.db, &scoped, ty)
    }

    /// Constructor of class `instance`: the nearest declared constructor along
    /// the super class chain, or an implicit parameterless one.
    fn class_constructor(&self, env: &Environment, instance: TypeId) -> Option<Newable> {
        let db = self.db;
        let app = db.types.application(instance)?;
        let info = db.def(app.def)?;
        if info.kind != DefKind::Class {
            return None;
        }
        // A raw reference to a generic class instantiates with its own type
        // parameters, left open for the call site to infer.
        let (instance, open_params): (TypeId, Vec<DefId>) =
            if app.args.is_empty() && !info.type_params.is_empty() {
                let args = info
                    .type_params
                    .iter()
                    .map(|&tp| db.types.type_variable(tp))
                    .collect();
                (db.types.nominal(app.def, args), info.type_params.clone())
            } else {
                (instance, Vec::new())
            };

        let declared = classifier_chain(db, instance)
            .into_iter()
            .filter_map(|def| db.def(def))
            .filter(|info| info.kind == DefKind::Class)
            .flat_map(|info| info.members.clone())
            .find(|&m| {
                db.def(m)
                    .is_some_and(|info| info.flags.contains(DefFlags::CONSTRUCTOR))
            })
            .and_then(|m| db.def(m)?.declared_type);

        let mut shape = match declared.and_then(|sig| {
            let sig = self.instantiate_for_receiver(env, instance, sig);
            db.types.function_shape(sig)
        }) {
            Some(shape) => FunctionShape::clone(&shape),
            None => FunctionShape::new(Vec::new(), instance),
        };
        shape.return_type = instance;
        let mut type_params = open_params;
        type_params.extend(shape.type_params.iter().copied());
        shape.type_params = type_params;
        Some(Newable {
            signature: Some(db.types.function(shape)),
            instance_type: instance,
            dynamic: false,
        })
    }
}

#[cfg(test)]
#[path = "../tests/callable_tests.rs"]
mod tests;
