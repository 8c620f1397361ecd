//! gts: static type inference for a gradually typed language with nominal
//! classes, structural object types, unions, intersections and generics.
//!
//! The workspace is split the way the engine is layered:
//!
//! - [`common`] - string interning, node indices and diagnostics
//! - [`solver`] - the type model: interning, subtyping, simplification, join,
//!   narrowing and signature resolution
//! - [`ast`] - the syntax tree the judgment consumes
//! - [`checker`] - the type judgment over a bound program, constant
//!   evaluation and the enum usage check
//!
//! A host builds declarations into a [`solver::DefinitionStore`], nodes into
//! an [`ast::NodeArena`], and asks a [`checker::TypeJudgment`] for types.

pub use gts_ast as ast;
pub use gts_checker as checker;
pub use gts_common as common;
pub use gts_solver as solver;

pub mod tracing_config;

pub use checker::{InferenceOptions, SourceMode, Typable, TypeJudgment};
pub use solver::{Environment, TypeId};
