//! Usage check for number- and string-based enums.
//!
//! Number- and string-based enums have no runtime representation: their
//! literals are compiled to the plain values. An identifier referring to
//! such an enum is therefore only valid as the receiver of an access to one
//! of its literals or to the synthetic static getter `literals`.

use gts_ast::{NodeArena, NodeData};
use gts_common::NodeIndex;
use gts_common::diagnostics::{Diagnostic, diagnostic_messages};
use gts_solver::{DefId, DiagnosticSink, EnumKind, TypeDb};
use tracing::debug;

#[derive(Copy, Clone)]
pub struct EnumUsageCheck<'a> {
    db: TypeDb<'a>,
    arena: &'a NodeArena,
}

impl<'a> EnumUsageCheck<'a> {
    pub fn new(db: TypeDb<'a>, arena: &'a NodeArena) -> Self {
        Self { db, arena }
    }

    /// Check every identifier of the tree. Returns the number of reported
    /// diagnostics.
    pub fn check_all(&self, sink: &mut dyn DiagnosticSink) -> usize {
        let mut reported = 0;
        for (idx, node) in self.arena.iter() {
            if matches!(node.data, NodeData::Identifier { .. })
                && !self.check_identifier(idx, sink)
            {
                reported += 1;
            }
        }
        reported
    }

    /// Check one identifier reference; `false` when a diagnostic was reported.
    pub fn check_identifier(&self, idx: NodeIndex, sink: &mut dyn DiagnosticSink) -> bool {
        let Some(NodeData::Identifier {
            target: Some(target),
            ..
        }) = self.arena.data(idx)
        else {
            return true;
        };
        let target = self.db.defs.canonical(*target);
        let is_value_based = self.db.def(target).is_some_and(|info| {
            matches!(
                info.enum_kind(),
                Some(EnumKind::NumberBased | EnumKind::StringBased)
            )
        });
        if !is_value_based || self.is_literal_access(idx, target) {
            return true;
        }
        debug!(node = idx.0, def_id = target.0, "invalid use of value-based enum");
        sink.report(Diagnostic::from_message(
            idx.0,
            &diagnostic_messages::ENM_INVALID_USE_OF_NUM_OR_STR_BASED_ENUM,
            &[],
        ));
        false
    }

    /// `E.literal` or `E.literals`, parentheses allowed around `E`.
    fn is_literal_access(&self, idx: NodeIndex, enum_def: DefId) -> bool {
        let (parent, child) = self.arena.skip_parens_up(idx);
        let Some(NodeData::PropertyAccess {
            target, property, ..
        }) = self.arena.data(parent)
        else {
            return false;
        };
        if *target != child {
            return false;
        }
        let Some(property) = property else {
            // Unresolved property: reported by member resolution.
            return true;
        };
        let property = self.db.defs.canonical(*property);
        let Some(info) = self.db.def(enum_def) else {
            return false;
        };
        let literals_getter = match info.enum_kind() {
            Some(EnumKind::NumberBased) => Some(self.db.builtins.number_enum_literals),
            Some(EnumKind::StringBased) => Some(self.db.builtins.string_enum_literals),
            _ => None,
        };
        literals_getter == Some(property) || info.members.contains(&property)
    }
}

#[cfg(test)]
#[path = "../tests/enum_check_tests.rs"]
mod tests;
