//! Semantic type values.
//!
//! Every type the engine manipulates is a [`TypeData`] interned into a
//! [`TypeInterner`](crate::TypeInterner) and referred to by its [`TypeId`].
//! Interning makes type equality an integer comparison and keeps every value
//! immutable: "changing" a type always means interning a new one.
//!
//! The variants are closed. Rules that consume types match on them
//! exhaustively, so adding a variant is a compile error everywhere it matters.

use crate::def::DefId;
use gts_common::Atom;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;

/// Handle to an interned type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeId(pub u32);

impl TypeId {
    /// Inference failed; nothing computed from this type should be reported.
    pub const UNKNOWN: TypeId = TypeId(0);
    /// Deliberately untyped (dynamic-mode code). Rendered as `any+`.
    pub const DYNAMIC_ANY: TypeId = TypeId(1);
    pub const ANY: TypeId = TypeId(2);
    pub const NUMBER: TypeId = TypeId(3);
    pub const STRING: TypeId = TypeId(4);
    pub const BOOLEAN: TypeId = TypeId(5);
    pub const SYMBOL: TypeId = TypeId(6);
    pub const NULL: TypeId = TypeId(7);
    pub const UNDEFINED: TypeId = TypeId(8);
    pub const VOID: TypeId = TypeId(9);

    /// First id handed out for non-intrinsic types.
    pub const FIRST_DYNAMIC: u32 = 16;

    #[inline]
    pub const fn is_unknown(self) -> bool {
        self.0 == Self::UNKNOWN.0
    }

    /// `any` in either its typed or its dynamic flavor.
    #[inline]
    pub const fn is_any(self) -> bool {
        self.0 == Self::ANY.0 || self.0 == Self::DYNAMIC_ANY.0
    }

    #[inline]
    pub const fn is_nullish(self) -> bool {
        self.0 == Self::NULL.0 || self.0 == Self::UNDEFINED.0
    }

    #[inline]
    pub const fn is_intrinsic(self) -> bool {
        self.0 < Self::FIRST_DYNAMIC
    }
}

/// Built-in primitive types and the `any` top type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum IntrinsicKind {
    Any,
    Number,
    String,
    Boolean,
    Symbol,
    Null,
    Undefined,
    Void,
}

impl IntrinsicKind {
    pub const fn type_id(self) -> TypeId {
        match self {
            IntrinsicKind::Any => TypeId::ANY,
            IntrinsicKind::Number => TypeId::NUMBER,
            IntrinsicKind::String => TypeId::STRING,
            IntrinsicKind::Boolean => TypeId::BOOLEAN,
            IntrinsicKind::Symbol => TypeId::SYMBOL,
            IntrinsicKind::Null => TypeId::NULL,
            IntrinsicKind::Undefined => TypeId::UNDEFINED,
            IntrinsicKind::Void => TypeId::VOID,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            IntrinsicKind::Any => "any",
            IntrinsicKind::Number => "number",
            IntrinsicKind::String => "string",
            IntrinsicKind::Boolean => "boolean",
            IntrinsicKind::Symbol => "symbol",
            IntrinsicKind::Null => "null",
            IntrinsicKind::Undefined => "undefined",
            IntrinsicKind::Void => "void",
        }
    }
}

/// Value carried by a literal type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum LiteralValue {
    Boolean(bool),
    /// Exact decimal value; negation never loses precision.
    Number(Decimal),
    String(Atom),
    /// A literal of an enum declaration.
    EnumLiteral { enum_def: DefId, member: DefId },
}

/// Reference to a nominal declaration with its (possibly empty) type arguments.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TypeApplication {
    pub def: DefId,
    pub args: Arc<[TypeId]>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ParamInfo {
    pub name: Atom,
    pub type_id: TypeId,
    pub optional: bool,
    pub rest: bool,
}

impl ParamInfo {
    pub fn required(name: Atom, type_id: TypeId) -> Self {
        ParamInfo {
            name,
            type_id,
            optional: false,
            rest: false,
        }
    }
}

/// Signature of a function, method, constructor or call member.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct FunctionShape {
    pub type_params: Vec<DefId>,
    pub params: Vec<ParamInfo>,
    pub return_type: TypeId,
    /// Declared or bound `this` type.
    pub this_type: Option<TypeId>,
    /// Declaration the signature was taken from, if any.
    pub def: Option<DefId>,
}

impl FunctionShape {
    pub fn new(params: Vec<ParamInfo>, return_type: TypeId) -> Self {
        FunctionShape {
            type_params: Vec::new(),
            params,
            return_type,
            this_type: None,
            def: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct StructuralMember {
    pub name: Atom,
    pub type_id: TypeId,
    pub optional: bool,
    /// Declaration backing the member (object literal properties have one).
    pub def: Option<DefId>,
}

/// Anonymous object shape, `~Object with { ... }`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct StructuralShape {
    pub members: Vec<StructuralMember>,
}

impl StructuralShape {
    pub fn member(&self, name: Atom) -> Option<&StructuralMember> {
        self.members.iter().find(|m| m.name == name)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum WildcardKind {
    /// `? extends B`
    Extends,
    /// `? super B`
    Super,
}

/// A type value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TypeData {
    /// Inference failed.
    Unknown,
    /// Deliberately untyped.
    DynamicAny,
    Intrinsic(IntrinsicKind),
    Nominal(TypeApplication),
    Structural(Arc<StructuralShape>),
    Union(Arc<[TypeId]>),
    Intersection(Arc<[TypeId]>),
    Function(Arc<FunctionShape>),
    Literal(LiteralValue),
    /// `this` type; unbound inside a class body, bound once a receiver is known.
    This(Option<TypeId>),
    TypeVariable(DefId),
    /// `?`, `? extends B` or `? super B`.
    Wildcard {
        bound: Option<TypeId>,
        kind: WildcardKind,
    },
    /// The type of a type. `constructor{C}` when `constructor` is set,
    /// `type{C}` otherwise.
    MetaType { arg: TypeId, constructor: bool },
}
