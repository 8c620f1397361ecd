//! Diagnostic sinks and builders for solver-emitted notices.

use crate::db::TypeDb;
use crate::format::TypeFormatter;
use crate::types::TypeId;
use gts_common::NodeIndex;
use gts_common::diagnostics::{Diagnostic, diagnostic_messages};

/// Receiver of non-fatal diagnostics.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Sink that drops everything. Used for internal simplification whose
/// redundancies are not the user's doing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&mut self, _diagnostic: Diagnostic) {}
}

/// Default sink: collects diagnostics in report order.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Codes in report order.
    pub fn codes(&self) -> Vec<u32> {
        self.diagnostics.iter().map(|d| d.code).collect()
    }
}

impl DiagnosticSink for DiagnosticCollector {
    fn report(&mut self, diagnostic: Diagnostic) {
        tracing::debug!(code = diagnostic.code, node = diagnostic.node, "diagnostic");
        self.diagnostics.push(diagnostic);
    }
}

/// Builds solver diagnostics with types rendered by [`TypeFormatter`].
pub struct DiagnosticBuilder<'a> {
    formatter: TypeFormatter<'a>,
}

impl<'a> DiagnosticBuilder<'a> {
    pub fn new(db: TypeDb<'a>) -> Self {
        Self {
            formatter: TypeFormatter::new(db),
        }
    }

    fn anchor(node: NodeIndex) -> u32 {
        if node.is_none() {
            Diagnostic::DETACHED
        } else {
            node.0
        }
    }

    /// `removed` was dropped from a union because it is a subtype of `kept`.
    pub fn redundant_union_member(
        &mut self,
        node: NodeIndex,
        removed: TypeId,
        kept: TypeId,
    ) -> Diagnostic {
        let removed = self.formatter.format(removed);
        let kept = self.formatter.format(kept);
        Diagnostic::from_message(
            Self::anchor(node),
            &diagnostic_messages::UNI_REDUNDANT_SUBTYPE,
            &[&removed, &kept],
        )
    }

    /// `removed` was dropped from an intersection because `kept` is a subtype of it.
    pub fn redundant_intersection_member(
        &mut self,
        node: NodeIndex,
        removed: TypeId,
        kept: TypeId,
    ) -> Diagnostic {
        let removed = self.formatter.format(removed);
        let kept = self.formatter.format(kept);
        Diagnostic::from_message(
            Self::anchor(node),
            &diagnostic_messages::INTER_REDUNDANT_SUPERTYPE,
            &[&removed, &kept],
        )
    }
}

#[cfg(test)]
#[path = "../tests/diagnostics_tests.rs"]
mod tests;
