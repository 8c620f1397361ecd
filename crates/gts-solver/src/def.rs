//! Declarations and their storage.
//!
//! Declarations (classes, interfaces, enums, members, variables, type
//! variables, ...) are long-lived entities owned by the surrounding program.
//! The engine refers to them by [`DefId`] and reads them from a
//! [`DefinitionStore`].
//!
//! ## Memoization
//!
//! Typed elements (fields, parameters, variables, properties) carry a
//! write-once memo cell. The first successful inference of an unannotated
//! element stores its type there; later requests read it back. Two requests
//! racing on the same declaration may both compute the type, but only the
//! first write lands, and both computed the same value, so the race is
//! harmless.

use crate::types::TypeId;
use bitflags::bitflags;
use dashmap::DashMap;
use gts_common::{Atom, NodeIndex};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::trace;

// =============================================================================
// DefId
// =============================================================================

/// Identifier of a declaration in a [`DefinitionStore`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub struct DefId(pub u32);

impl DefId {
    /// Sentinel value for invalid `DefId`.
    pub const INVALID: Self = Self(0);

    /// First valid `DefId`.
    pub const FIRST_VALID: u32 = 1;

    pub const fn is_valid(self) -> bool {
        self.0 >= Self::FIRST_VALID
    }
}

// =============================================================================
// Kinds and flags
// =============================================================================

/// Classification of an enum by its literal values.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum EnumKind {
    #[default]
    Normal,
    NumberBased,
    StringBased,
}

/// Declared variance of a type parameter.
///
/// Type parameters without an `in`/`out` annotation are `Invariant`, which
/// the join treats as "unsure" and answers with a wildcard.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Variance {
    Covariant,
    Contravariant,
    #[default]
    Invariant,
}

/// Kind of declaration.
///
/// Closed: the type judgment matches on it exhaustively.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DefKind {
    Class,
    Interface,
    Enum(EnumKind),
    /// `type A = ...`; `declared_type` holds the aliased type.
    TypeAlias,
    EnumLiteral,
    Function,
    Method,
    Getter,
    Setter,
    Field,
    Parameter,
    Variable,
    /// Type parameter; `declared_type` holds the upper bound.
    TypeVariable,
    /// A property created on the fly for a dynamic receiver.
    Dynamic,
    /// Namespace import of a module.
    Namespace,
}

impl DefKind {
    /// Declarations that define a nominal type.
    pub const fn is_classifier(self) -> bool {
        matches!(
            self,
            DefKind::Class | DefKind::Interface | DefKind::Enum(_)
        )
    }

    /// Members of a classifier.
    pub const fn is_member(self) -> bool {
        matches!(
            self,
            DefKind::Method | DefKind::Getter | DefKind::Setter | DefKind::Field
        )
    }

    /// Elements whose type is declared or inferred from an initializer.
    pub const fn is_typed_element(self) -> bool {
        matches!(
            self,
            DefKind::Field | DefKind::Parameter | DefKind::Variable
        )
    }
}

bitflags! {
    /// Declaration modifiers.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct DefFlags: u32 {
        const STATIC = 1 << 0;
        const ABSTRACT = 1 << 1;
        /// `const` variables and `final`/`const` fields; literal types survive.
        const CONST = 1 << 2;
        const OPTIONAL = 1 << 3;
        /// Rest parameter.
        const VARIADIC = 1 << 4;
        /// `@Promisifiable` functions and methods.
        const PROMISIFIABLE = 1 << 5;
        /// Class constructor.
        const CONSTRUCTOR = 1 << 6;
        /// Call signature member of an interface.
        const CALL_SIGNATURE = 1 << 7;
        /// Construct signature member of an interface.
        const CONSTRUCT_SIGNATURE = 1 << 8;
        /// Declared in dynamic-mode (untyped) code.
        const DYNAMIC = 1 << 9;
        /// Classifier accepts arbitrary property names.
        const INDEX_SIGNATURE = 1 << 10;
        /// The return type of the declared signature is a placeholder and
        /// must be inferred from the body's return statements.
        const INFERRED_RETURN = 1 << 11;
        /// `async` function or method.
        const ASYNC = 1 << 12;
        /// Generator function or method.
        const GENERATOR = 1 << 13;
    }
}

// =============================================================================
// DefinitionInfo
// =============================================================================

/// Everything the engine knows about one declaration.
#[derive(Clone, Debug)]
pub struct DefinitionInfo {
    pub kind: DefKind,
    pub name: Atom,
    pub flags: DefFlags,
    /// Type parameters of generic classifiers, functions and methods.
    pub type_params: Vec<DefId>,
    /// Annotated type of a typed element, signature of a function/method/
    /// getter/setter, aliased type of an alias, bound of a type variable.
    pub declared_type: Option<TypeId>,
    /// Super class (classes) or first super interface (interfaces).
    pub extends: Option<TypeId>,
    pub implements: Vec<TypeId>,
    /// Owned members (classifiers) or literals (enums), in declaration order.
    pub members: Vec<DefId>,
    /// Classifier owning a member, enum owning a literal, function owning a parameter.
    pub owner: Option<DefId>,
    /// Element type of array-like classifiers (`Array<T>` yields `T`).
    pub element_type: Option<TypeId>,
    pub variance: Variance,
    /// Syntax node that declares this entity, if it has one.
    pub node: Option<NodeIndex>,
    /// Partial declaration redirected to its canonical declaration.
    pub merged_into: Option<DefId>,
    inferred: OnceCell<TypeId>,
}

impl DefinitionInfo {
    pub fn new(kind: DefKind, name: Atom) -> Self {
        Self {
            kind,
            name,
            flags: DefFlags::empty(),
            type_params: Vec::new(),
            declared_type: None,
            extends: None,
            implements: Vec::new(),
            members: Vec::new(),
            owner: None,
            element_type: None,
            variance: Variance::Invariant,
            node: None,
            merged_into: None,
            inferred: OnceCell::new(),
        }
    }

    pub fn class(name: Atom) -> Self {
        Self::new(DefKind::Class, name)
    }

    pub fn interface(name: Atom) -> Self {
        Self::new(DefKind::Interface, name)
    }

    pub fn enumeration(name: Atom, kind: EnumKind) -> Self {
        Self::new(DefKind::Enum(kind), name)
    }

    pub fn type_variable(name: Atom, bound: Option<TypeId>, variance: Variance) -> Self {
        let mut info = Self::new(DefKind::TypeVariable, name);
        info.declared_type = bound;
        info.variance = variance;
        info
    }

    pub fn with_flags(mut self, flags: DefFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn with_type_params(mut self, type_params: Vec<DefId>) -> Self {
        self.type_params = type_params;
        self
    }

    pub fn with_declared_type(mut self, type_id: TypeId) -> Self {
        self.declared_type = Some(type_id);
        self
    }

    pub fn with_extends(mut self, super_type: TypeId) -> Self {
        self.extends = Some(super_type);
        self
    }

    pub fn with_implements(mut self, interfaces: Vec<TypeId>) -> Self {
        self.implements = interfaces;
        self
    }

    pub fn merged_into(mut self, canonical: DefId) -> Self {
        self.merged_into = Some(canonical);
        self
    }

    pub fn is_static(&self) -> bool {
        self.flags.contains(DefFlags::STATIC)
    }

    pub fn is_const(&self) -> bool {
        self.flags.contains(DefFlags::CONST)
    }

    pub fn enum_kind(&self) -> Option<EnumKind> {
        match self.kind {
            DefKind::Enum(kind) => Some(kind),
            _ => None,
        }
    }

    /// Type memoized by an earlier inference, if any.
    pub fn cached_type(&self) -> Option<TypeId> {
        self.inferred.get().copied()
    }
}

// =============================================================================
// DefinitionStore
// =============================================================================

/// Concurrent storage of declarations.
///
/// Uses `DashMap` so several inference requests can read (and memoize into)
/// declarations at once.
#[derive(Debug)]
pub struct DefinitionStore {
    definitions: DashMap<DefId, Arc<DefinitionInfo>>,
    next_id: AtomicU32,
}

impl Default for DefinitionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DefinitionStore {
    pub fn new() -> Self {
        Self {
            definitions: DashMap::new(),
            next_id: AtomicU32::new(DefId::FIRST_VALID),
        }
    }

    /// Register a new declaration and return its `DefId`.
    pub fn register(&self, info: DefinitionInfo) -> DefId {
        let id = DefId(self.next_id.fetch_add(1, Ordering::Relaxed));
        trace!(def_id = id.0, kind = ?info.kind, "DefinitionStore::register");
        self.definitions.insert(id, Arc::new(info));
        id
    }

    pub fn get(&self, id: DefId) -> Option<Arc<DefinitionInfo>> {
        self.definitions.get(&id).map(|r| Arc::clone(r.value()))
    }

    pub fn contains(&self, id: DefId) -> bool {
        self.definitions.contains_key(&id)
    }

    pub fn kind(&self, id: DefId) -> Option<DefKind> {
        self.definitions.get(&id).map(|r| r.kind)
    }

    pub fn name(&self, id: DefId) -> Option<Atom> {
        self.definitions.get(&id).map(|r| r.name)
    }

    /// Edit a declaration while the program is still being assembled.
    ///
    /// Readers holding an earlier `Arc` keep seeing the old version.
    pub fn update(&self, id: DefId, f: impl FnOnce(&mut DefinitionInfo)) {
        if let Some(mut entry) = self.definitions.get_mut(&id) {
            f(Arc::make_mut(entry.value_mut()));
        }
    }

    /// Attach `member` to `owner`, recording the back link.
    pub fn add_member(&self, owner: DefId, member: DefId) {
        self.update(owner, |info| info.members.push(member));
        self.update(member, |info| info.owner = Some(owner));
    }

    /// Follow declaration-merging links to the canonical declaration.
    pub fn canonical(&self, id: DefId) -> DefId {
        let mut current = id;
        // Merge chains are short; the bound only stops malformed cycles.
        for _ in 0..16 {
            match self.definitions.get(&current).and_then(|r| r.merged_into) {
                Some(next) if next != current => current = next,
                _ => break,
            }
        }
        current
    }

    /// Type memoized on a declaration by an earlier inference.
    pub fn cached_type(&self, id: DefId) -> Option<TypeId> {
        self.definitions.get(&id).and_then(|r| r.cached_type())
    }

    /// Memoize an inferred type. Only the first write lands; later writes
    /// are expected to carry the same value.
    pub fn cache_type(&self, id: DefId, type_id: TypeId) {
        let Some(entry) = self.definitions.get(&id) else {
            return;
        };
        if let Err(rejected) = entry.inferred.set(type_id) {
            if entry.inferred.get() != Some(&rejected) {
                trace!(
                    def_id = id.0,
                    kept = ?entry.inferred.get(),
                    rejected = rejected.0,
                    "DefinitionStore::cache_type: conflicting memo write ignored"
                );
            }
        }
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Look up a member by name among the members owned by `owner`.
    pub fn find_owned_member(&self, owner: DefId, name: Atom, static_only: bool) -> Option<DefId> {
        let info = self.get(owner)?;
        info.members.iter().copied().find(|&member| {
            self.definitions
                .get(&member)
                .is_some_and(|m| m.name == name && m.is_static() == static_only)
        })
    }
}

#[cfg(test)]
#[path = "../tests/def_tests.rs"]
mod tests;
