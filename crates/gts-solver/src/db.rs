//! Shared read access to the type world.

use crate::builtins::BuiltinTypes;
use crate::def::{DefId, DefKind, DefinitionInfo, DefinitionStore};
use crate::instantiate::{TypeSubstitution, instantiate_type};
use crate::intern::TypeInterner;
use crate::types::{LiteralValue, TypeData, TypeId, WildcardKind};
use std::sync::Arc;

/// The interner, the declarations and the built-ins, bundled so every
/// solver component takes one `Copy` handle instead of three references.
#[derive(Copy, Clone)]
pub struct TypeDb<'a> {
    pub types: &'a TypeInterner,
    pub defs: &'a DefinitionStore,
    pub builtins: &'a BuiltinTypes,
}

impl<'a> TypeDb<'a> {
    pub fn new(
        types: &'a TypeInterner,
        defs: &'a DefinitionStore,
        builtins: &'a BuiltinTypes,
    ) -> Self {
        Self {
            types,
            defs,
            builtins,
        }
    }

    /// Data behind `ty`; foreign ids read as `Unknown`.
    pub fn lookup(&self, ty: TypeId) -> TypeData {
        self.types.lookup(ty).unwrap_or(TypeData::Unknown)
    }

    pub fn def(&self, id: DefId) -> Option<Arc<DefinitionInfo>> {
        self.defs.get(id)
    }

    pub fn object_type(&self) -> TypeId {
        self.builtins.object_type
    }

    /// Expand type aliases until a non-alias type is reached.
    pub fn resolve_alias(&self, ty: TypeId) -> TypeId {
        let mut current = ty;
        for _ in 0..gts_common::limits::MAX_HIERARCHY_DEPTH {
            let TypeData::Nominal(app) = self.lookup(current) else {
                return current;
            };
            let Some(info) = self.def(app.def) else {
                return current;
            };
            if info.kind != DefKind::TypeAlias {
                return current;
            }
            let Some(aliased) = info.declared_type else {
                return current;
            };
            let subst = TypeSubstitution::from_args(&info.type_params, &app.args);
            current = instantiate_type(*self, aliased, &subst);
        }
        current
    }

    /// Base type of a literal type: `number`, `string`, `boolean` or the enum.
    pub fn literal_base(&self, value: &LiteralValue) -> TypeId {
        match value {
            LiteralValue::Boolean(_) => TypeId::BOOLEAN,
            LiteralValue::Number(_) => TypeId::NUMBER,
            LiteralValue::String(_) => TypeId::STRING,
            LiteralValue::EnumLiteral { enum_def, .. } => self.types.nominal_simple(*enum_def),
        }
    }

    /// Upper bound: wildcards to their `extends` bound, bound `this` to its
    /// receiver. Type variables are left alone.
    pub fn upper_bound(&self, ty: TypeId) -> TypeId {
        match self.lookup(ty) {
            TypeData::Wildcard {
                bound: Some(bound),
                kind: WildcardKind::Extends,
            } => self.upper_bound(bound),
            TypeData::Wildcard { .. } => TypeId::ANY,
            TypeData::This(Some(bound)) => self.upper_bound(bound),
            _ => ty,
        }
    }

    /// Declared bound of a type variable (`any` when unbounded).
    pub fn type_variable_bound(&self, def: DefId) -> TypeId {
        self.def(def)
            .and_then(|info| info.declared_type)
            .unwrap_or(TypeId::ANY)
    }

    /// Whether values of `ty` are objects (not primitives).
    pub fn is_object_like(&self, ty: TypeId) -> bool {
        match self.lookup(ty) {
            TypeData::Nominal(app) => match self.defs.kind(app.def) {
                Some(DefKind::TypeAlias) => {
                    let resolved = self.resolve_alias(ty);
                    resolved != ty && self.is_object_like(resolved)
                }
                Some(_) => true,
                None => false,
            },
            TypeData::Structural(_) | TypeData::Function(_) | TypeData::MetaType { .. } => true,
            TypeData::This(_) => true,
            TypeData::TypeVariable(def) => {
                let bound = self.type_variable_bound(def);
                bound != TypeId::ANY && self.is_object_like(bound)
            }
            TypeData::Intersection(members) => members.iter().any(|&m| self.is_object_like(m)),
            TypeData::Union(members) => members.iter().all(|&m| self.is_object_like(m)),
            TypeData::Wildcard { .. } => self.is_object_like(self.upper_bound(ty)),
            TypeData::Literal(LiteralValue::EnumLiteral { .. }) => true,
            TypeData::Literal(_)
            | TypeData::Intrinsic(_)
            | TypeData::Unknown
            | TypeData::DynamicAny => false,
        }
    }

    /// `Array<T>` element, or `None` when `ty` is not an array.
    pub fn array_element(&self, ty: TypeId) -> Option<TypeId> {
        let app = self.types.application(ty)?;
        (app.def == self.builtins.array).then(|| app.args.first().copied().unwrap_or(TypeId::ANY))
    }
}
