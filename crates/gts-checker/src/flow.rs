//! Flow analysis collaborator.
//!
//! The engine does not run control flow analysis itself. It asks a
//! [`FlowAnalysis`] for the `instanceof` guards that definitively hold (or
//! definitively fail) at an identifier reference and refines the
//! identifier's type with them.

use gts_common::NodeIndex;
use gts_solver::{DefId, GuardAssertion};
use rustc_hash::FxHashMap;

/// `subject instanceof T1 | T2 ...` with a definitive outcome at a reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstanceofGuard {
    /// Declaration the guard tests.
    pub subject: DefId,
    /// Right-hand side type references of the `instanceof`; more than one
    /// forms a union.
    pub type_identifiers: Vec<NodeIndex>,
    pub assertion: GuardAssertion,
}

pub trait FlowAnalysis {
    /// Definitive guards holding at `reference`.
    fn definitive_guards(&self, reference: NodeIndex) -> Vec<InstanceofGuard>;
}

/// No flow facts anywhere.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoFlowFacts;

impl FlowAnalysis for NoFlowFacts {
    fn definitive_guards(&self, _reference: NodeIndex) -> Vec<InstanceofGuard> {
        Vec::new()
    }
}

/// Flow facts computed ahead of time and recorded per reference node.
#[derive(Clone, Debug, Default)]
pub struct RecordedFlowFacts {
    guards: FxHashMap<NodeIndex, Vec<InstanceofGuard>>,
}

impl RecordedFlowFacts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, reference: NodeIndex, guard: InstanceofGuard) {
        self.guards.entry(reference).or_default().push(guard);
    }

    pub fn len(&self) -> usize {
        self.guards.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

impl FlowAnalysis for RecordedFlowFacts {
    fn definitive_guards(&self, reference: NodeIndex) -> Vec<InstanceofGuard> {
        self.guards.get(&reference).cloned().unwrap_or_default()
    }
}
