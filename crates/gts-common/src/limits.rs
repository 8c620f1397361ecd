//! Centralized limits and thresholds.
//!
//! Recursion limits for the reference subtype oracle live in
//! `gts_solver::recursion::RecursionProfile`; the constants here bound the
//! dispatcher and the substitution machinery.

/// Maximum nesting depth of `TypeJudgment::infer` calls.
///
/// Deeply nested expressions (long `a.b.c...` chains, nested ternaries)
/// each add a frame. Past this depth the dispatcher answers `UNKNOWN`
/// instead of risking a stack overflow.
pub const MAX_INFERENCE_DEPTH: u32 = 500;

/// Maximum depth for type-variable substitution.
///
/// A substitution chain `T -> U -> T` would otherwise never terminate.
pub const MAX_SUBSTITUTION_DEPTH: u32 = 50;

/// Maximum number of members a union may have before redundancy removal
/// switches from pairwise subtype checks to plain de-duplication.
pub const MAX_SIMPLIFY_PAIRWISE_MEMBERS: usize = 512;

/// Maximum depth of the supertype walk used by `join` and member lookup.
pub const MAX_HIERARCHY_DEPTH: u32 = 64;
