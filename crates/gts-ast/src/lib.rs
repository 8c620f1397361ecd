//! Syntax tree consumed by the gts type inference engine.
//!
//! - [`NodeData`]: closed set of node kinds, already linked to declarations
//! - [`NodeArena`]: flat node storage with parent links
//! - navigation helpers used by the type judgment (`skip_parens_up`,
//!   `enclosing_member`, `enclosing_class`, `is_write_access`)

mod access;
mod arena;
pub mod node;

pub use access::NodeList;
pub use arena::NodeArena;
pub use gts_common::NodeIndex;
pub use node::{
    AssignmentOperator, BinaryOperator, BinaryOperatorClass, ForKind, Node, NodeData, NodeKind,
    PostfixOperator, UnaryOperator,
};
