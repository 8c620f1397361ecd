//! Type interning.
//!
//! `TypeInterner` is the only place that constructs `TypeData` values and
//! assigns them ids. Identical type data always yields the same `TypeId`, so
//! equality of types is equality of ids.
//!
//! Union and intersection constructors here do NOT simplify. Callers that
//! need the minimal form go through the [`TypeSimplifier`](crate::TypeSimplifier).

use crate::def::DefId;
use crate::types::{
    FunctionShape, IntrinsicKind, LiteralValue, StructuralShape, TypeApplication, TypeData,
    TypeId, WildcardKind,
};
use dashmap::DashMap;
use gts_common::{Atom, Interner};
use rust_decimal::Decimal;
use rustc_hash::FxBuildHasher;
use std::sync::{Arc, RwLock};

const INTRINSICS: [(TypeId, TypeData); 10] = [
    (TypeId::UNKNOWN, TypeData::Unknown),
    (TypeId::DYNAMIC_ANY, TypeData::DynamicAny),
    (TypeId::ANY, TypeData::Intrinsic(IntrinsicKind::Any)),
    (TypeId::NUMBER, TypeData::Intrinsic(IntrinsicKind::Number)),
    (TypeId::STRING, TypeData::Intrinsic(IntrinsicKind::String)),
    (TypeId::BOOLEAN, TypeData::Intrinsic(IntrinsicKind::Boolean)),
    (TypeId::SYMBOL, TypeData::Intrinsic(IntrinsicKind::Symbol)),
    (TypeId::NULL, TypeData::Intrinsic(IntrinsicKind::Null)),
    (TypeId::UNDEFINED, TypeData::Intrinsic(IntrinsicKind::Undefined)),
    (TypeId::VOID, TypeData::Intrinsic(IntrinsicKind::Void)),
];

/// Concurrent type interner.
///
/// Also owns the string interner used for names and string literal values.
#[derive(Debug)]
pub struct TypeInterner {
    map: DashMap<TypeData, TypeId, FxBuildHasher>,
    types: RwLock<Vec<TypeData>>,
    strings: Interner,
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeInterner {
    pub fn new() -> Self {
        let map = DashMap::with_hasher(FxBuildHasher);
        // Reserved slots past the intrinsics resolve to Unknown but are never
        // handed out.
        let mut types = vec![TypeData::Unknown; TypeId::FIRST_DYNAMIC as usize];
        for (id, data) in INTRINSICS {
            types[id.0 as usize] = data.clone();
            map.insert(data, id);
        }
        Self {
            map,
            types: RwLock::new(types),
            strings: Interner::new(),
        }
    }

    fn intern(&self, data: TypeData) -> TypeId {
        if let Some(id) = self.map.get(&data) {
            return *id;
        }
        *self.map.entry(data.clone()).or_insert_with(|| {
            let mut types = self
                .types
                .write()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            let id = TypeId(types.len() as u32);
            types.push(data);
            id
        })
    }

    /// Data behind an id. Ids from another interner resolve to `None`.
    pub fn lookup(&self, id: TypeId) -> Option<TypeData> {
        let types = self
            .types
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        types.get(id.0 as usize).cloned()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    // =========================================================================
    // Strings
    // =========================================================================

    pub fn intern_string(&self, text: &str) -> Atom {
        self.strings.intern(text)
    }

    pub fn resolve_atom(&self, atom: Atom) -> Arc<str> {
        self.strings.resolve(atom)
    }

    pub fn strings(&self) -> &Interner {
        &self.strings
    }

    // =========================================================================
    // Constructors
    // =========================================================================

    pub fn nominal(&self, def: DefId, args: Vec<TypeId>) -> TypeId {
        self.intern(TypeData::Nominal(TypeApplication {
            def,
            args: args.into(),
        }))
    }

    pub fn nominal_simple(&self, def: DefId) -> TypeId {
        self.nominal(def, Vec::new())
    }

    pub fn structural(&self, shape: StructuralShape) -> TypeId {
        self.intern(TypeData::Structural(Arc::new(shape)))
    }

    /// Union with members kept exactly as given.
    pub fn union_unsimplified(&self, members: Vec<TypeId>) -> TypeId {
        self.intern(TypeData::Union(members.into()))
    }

    /// Intersection with members kept exactly as given.
    pub fn intersection_unsimplified(&self, members: Vec<TypeId>) -> TypeId {
        self.intern(TypeData::Intersection(members.into()))
    }

    pub fn function(&self, shape: FunctionShape) -> TypeId {
        self.intern(TypeData::Function(Arc::new(shape)))
    }

    pub fn literal_boolean(&self, value: bool) -> TypeId {
        self.intern(TypeData::Literal(LiteralValue::Boolean(value)))
    }

    pub fn literal_number(&self, value: Decimal) -> TypeId {
        // Normalized so `1.0` and `1` are the same literal type.
        self.intern(TypeData::Literal(LiteralValue::Number(value.normalize())))
    }

    pub fn literal_string(&self, value: &str) -> TypeId {
        let atom = self.intern_string(value);
        self.literal_string_atom(atom)
    }

    pub fn literal_string_atom(&self, value: Atom) -> TypeId {
        self.intern(TypeData::Literal(LiteralValue::String(value)))
    }

    pub fn enum_literal(&self, enum_def: DefId, member: DefId) -> TypeId {
        self.intern(TypeData::Literal(LiteralValue::EnumLiteral { enum_def, member }))
    }

    pub fn literal(&self, value: LiteralValue) -> TypeId {
        match value {
            LiteralValue::Number(n) => self.literal_number(n),
            other => self.intern(TypeData::Literal(other)),
        }
    }

    pub fn this_type(&self, bound: Option<TypeId>) -> TypeId {
        self.intern(TypeData::This(bound))
    }

    pub fn type_variable(&self, def: DefId) -> TypeId {
        self.intern(TypeData::TypeVariable(def))
    }

    pub fn wildcard(&self, bound: Option<TypeId>, kind: WildcardKind) -> TypeId {
        self.intern(TypeData::Wildcard { bound, kind })
    }

    /// `type{arg}`
    pub fn meta_type(&self, arg: TypeId) -> TypeId {
        self.intern(TypeData::MetaType {
            arg,
            constructor: false,
        })
    }

    /// `constructor{arg}`
    pub fn constructor_type(&self, arg: TypeId) -> TypeId {
        self.intern(TypeData::MetaType {
            arg,
            constructor: true,
        })
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Members of a union, or `None` for any other type.
    pub fn union_members(&self, id: TypeId) -> Option<Arc<[TypeId]>> {
        match self.lookup(id)? {
            TypeData::Union(members) => Some(members),
            _ => None,
        }
    }

    pub fn intersection_members(&self, id: TypeId) -> Option<Arc<[TypeId]>> {
        match self.lookup(id)? {
            TypeData::Intersection(members) => Some(members),
            _ => None,
        }
    }

    pub fn application(&self, id: TypeId) -> Option<TypeApplication> {
        match self.lookup(id)? {
            TypeData::Nominal(app) => Some(app),
            _ => None,
        }
    }

    pub fn function_shape(&self, id: TypeId) -> Option<Arc<FunctionShape>> {
        match self.lookup(id)? {
            TypeData::Function(shape) => Some(shape),
            _ => None,
        }
    }

    pub fn literal_value(&self, id: TypeId) -> Option<LiteralValue> {
        match self.lookup(id)? {
            TypeData::Literal(value) => Some(value),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../tests/intern_tests.rs"]
mod tests;
