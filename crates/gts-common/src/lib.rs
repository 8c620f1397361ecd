//! Common types and utilities for the gts type inference engine.
//!
//! This crate provides foundational types used across all gts crates:
//! - String interning (`Atom`, `Interner`)
//! - Diagnostic categories, codes and message templates
//! - Centralized limits and thresholds

// String interning for identifier and property-name deduplication
pub mod interner;
pub use interner::{Atom, Interner};

// Diagnostic data shared by the solver and the checker
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory};

// Centralized limits and thresholds
pub mod limits;

// Shared node handle - lives here so the solver can key recursion guards on
// syntax nodes without depending on the AST crate
pub mod node_index;
pub use node_index::NodeIndex;
