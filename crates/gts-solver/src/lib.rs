//! Type model and type algebra for the gts inference engine.
//!
//! This crate owns everything about types that does not need the syntax tree:
//!
//! - **Type model**: interned [`TypeData`] values behind [`TypeId`] handles
//! - **Declarations**: [`DefinitionStore`] with write-once memo cells
//! - **Environment**: persistent frames for substitutions, `this` and recursion guards
//! - **Simplifier / join**: minimal unions and intersections, least upper bounds
//! - **Guard narrowing**: `instanceof` facts applied to a base type
//! - **Signature resolution**: call and construct signatures of any type value
//!
//! Subtyping and member lookup are collaborator traits ([`TypeRelation`],
//! [`MemberLookup`]); [`TypeHierarchy`] implements both over the declared
//! hierarchy.
pub mod builtins;
pub mod callable;
mod db;
pub mod def;
mod diagnostics;
pub mod environment;
mod format;
mod hierarchy;
pub mod inheritance;
mod instantiate;
mod intern;
mod join;
pub mod narrowing;
pub mod recursion;
mod relation;
mod simplify;
pub mod type_args;
pub mod types;
pub mod widening;

pub use builtins::BuiltinTypes;
pub use callable::{Callable, Newable, SignatureResolver};
pub use db::TypeDb;
pub use def::{DefFlags, DefId, DefKind, DefinitionInfo, DefinitionStore, EnumKind, Variance};
pub use diagnostics::{DiagnosticBuilder, DiagnosticCollector, DiagnosticSink, NullSink};
pub use environment::{Environment, GuardKey, GuardKind, GuardState};
pub use format::TypeFormatter;
pub use hierarchy::TypeHierarchy;
pub use instantiate::{
    TypeSubstitution, add_substitutions, instantiate_type, substitute_type_variables,
};
pub use intern::TypeInterner;
pub use join::TypeJoiner;
pub use narrowing::{GuardAssertion, GuardNarrowing, InstanceofFact};
pub use relation::{MemberLookup, TypeRelation};
pub use simplify::TypeSimplifier;
pub use type_args::TypeArgumentInference;
pub use types::{
    FunctionShape, IntrinsicKind, LiteralValue, ParamInfo, StructuralMember, StructuralShape,
    TypeApplication, TypeData, TypeId, WildcardKind,
};
pub use widening::{sanitize_declared_type, widen_literals};

#[cfg(test)]
#[path = "../tests/test_fixtures.rs"]
pub(crate) mod test_fixtures;
