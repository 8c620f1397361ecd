//! NodeArena creation methods.
//!
//! Nodes are appended bottom-up: children first, then the parent, whose
//! `add` links every child back to it.

use crate::node::{Node, NodeData};
use gts_common::{Atom, NodeIndex};
use gts_solver::DefId;
use rust_decimal::Decimal;
use tracing::trace;

/// Flat storage for one syntax tree.
#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    pub(crate) nodes: Vec<Node>,
}

impl NodeArena {
    /// Maximum pre-allocation to avoid capacity overflow in huge files.
    const MAX_NODE_PREALLOC: usize = 5_000_000;

    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    pub fn with_capacity(capacity: usize) -> NodeArena {
        NodeArena {
            nodes: Vec::with_capacity(capacity.min(Self::MAX_NODE_PREALLOC)),
        }
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append a node and adopt its children.
    ///
    /// A child that already has a parent is re-parented; the arena is a
    /// tree, so each node is expected to be adopted exactly once.
    pub fn add(&mut self, data: NodeData) -> NodeIndex {
        let index = NodeIndex(self.nodes.len() as u32);
        for child in data.children() {
            if let Some(node) = self.nodes.get_mut(child.0 as usize) {
                node.parent = index;
            }
        }
        trace!(node = index.0, kind = ?data.kind(), "NodeArena::add");
        self.nodes.push(Node {
            data,
            parent: NodeIndex::NONE,
        });
        index
    }

    // =========================================================================
    // Shorthands for leaf nodes
    // =========================================================================

    pub fn add_identifier(&mut self, name: Atom, target: Option<DefId>) -> NodeIndex {
        self.add(NodeData::Identifier { name, target })
    }

    pub fn add_number(&mut self, value: Decimal) -> NodeIndex {
        self.add(NodeData::NumericLiteral(value))
    }

    pub fn add_string(&mut self, value: Atom) -> NodeIndex {
        self.add(NodeData::StringLiteral(value))
    }

    pub fn add_boolean(&mut self, value: bool) -> NodeIndex {
        self.add(NodeData::BooleanLiteral(value))
    }

    pub fn add_paren(&mut self, expression: NodeIndex) -> NodeIndex {
        self.add(NodeData::Paren { expression })
    }

    pub fn add_property_access(
        &mut self,
        target: NodeIndex,
        name: Atom,
        property: Option<DefId>,
    ) -> NodeIndex {
        self.add(NodeData::PropertyAccess {
            target,
            name,
            property,
            type_args: Vec::new(),
        })
    }

    pub fn add_call(&mut self, target: NodeIndex, args: Vec<NodeIndex>) -> NodeIndex {
        let args = args
            .into_iter()
            .map(|expression| {
                self.add(NodeData::Argument {
                    expression,
                    is_spread: false,
                })
            })
            .collect();
        self.add(NodeData::Call {
            target,
            type_args: Vec::new(),
            args,
        })
    }
}

#[cfg(test)]
#[path = "../tests/arena_tests.rs"]
mod tests;
