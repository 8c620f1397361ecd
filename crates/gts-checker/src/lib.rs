//! Type judgment for the gts inference engine.
//!
//! This crate computes the type of any typable node or declaration of a
//! bound program:
//! - `judgment` - [`TypeJudgment`], the dispatcher, and its public utilities
//! - `declarations`, `literals`, `access`, `calls`, `operators` - one rule
//!   per node kind
//! - `destructuring`, `iteration`, `promisify` - helpers shared by rules
//! - `constants` - compile-time values of computed property keys
//! - `enum_check` - validator helper for number/string-based enums
//! - `flow` - the flow analysis collaborator interface
//! - `options` - [`InferenceOptions`]

mod access;
mod calls;
pub mod constants;
mod declarations;
mod destructuring;
pub mod enum_check;
pub mod flow;
mod iteration;
pub mod judgment;
mod literals;
mod operators;
pub mod options;
mod promisify;

pub use constants::{ConstValue, ConstantEvaluator};
pub use enum_check::EnumUsageCheck;
pub use flow::{FlowAnalysis, InstanceofGuard, NoFlowFacts, RecordedFlowFacts};
pub use judgment::{Typable, TypeJudgment};
pub use options::{InferenceOptions, SourceMode};

#[cfg(test)]
#[path = "../tests/test_fixtures.rs"]
pub(crate) mod test_fixtures;
