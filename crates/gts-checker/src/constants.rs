//! Compile-time constant evaluation.
//!
//! Computed property keys (`o[K]`, `o["a"]`, `o[-1]`) are treated as
//! dotted access when their value is known without running the program:
//! literals, substitution-free templates, signs, `+`, parentheses and
//! references to `const` variables and fields with constant initializers.

use gts_ast::{BinaryOperator, NodeArena, NodeData, UnaryOperator};
use gts_common::NodeIndex;
use gts_solver::{DefId, DefKind, TypeDb};
use rust_decimal::Decimal;
use rustc_hash::FxHashSet;
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConstValue {
    Number(Decimal),
    String(Arc<str>),
    Boolean(bool),
}

impl ConstValue {
    /// Name of the property the value selects (`1.50` selects `"1.5"`).
    pub fn property_name(&self) -> String {
        match self {
            ConstValue::Number(value) => value.normalize().to_string(),
            ConstValue::String(text) => text.to_string(),
            ConstValue::Boolean(value) => value.to_string(),
        }
    }
}

#[derive(Copy, Clone)]
pub struct ConstantEvaluator<'a> {
    db: TypeDb<'a>,
    arena: &'a NodeArena,
}

impl<'a> ConstantEvaluator<'a> {
    pub fn new(db: TypeDb<'a>, arena: &'a NodeArena) -> Self {
        Self { db, arena }
    }

    pub fn evaluate(&self, expression: NodeIndex) -> Option<ConstValue> {
        let mut visiting = FxHashSet::default();
        self.eval(expression, &mut visiting)
    }

    fn eval(&self, idx: NodeIndex, visiting: &mut FxHashSet<DefId>) -> Option<ConstValue> {
        match self.arena.data(idx)? {
            NodeData::NumericLiteral(value) => Some(ConstValue::Number(*value)),
            NodeData::StringLiteral(text) => {
                Some(ConstValue::String(self.db.types.resolve_atom(*text)))
            }
            NodeData::BooleanLiteral(value) => Some(ConstValue::Boolean(*value)),
            NodeData::TemplateLiteral { parts } => {
                let mut text = String::new();
                for &part in parts {
                    match self.arena.data(part)? {
                        NodeData::TemplateSegment(segment) => {
                            text.push_str(&self.db.types.resolve_atom(*segment));
                        }
                        _ => return None,
                    }
                }
                Some(ConstValue::String(text.into()))
            }
            NodeData::Paren { expression } => self.eval(*expression, visiting),
            NodeData::Unary {
                op: op @ (UnaryOperator::Plus | UnaryOperator::Minus),
                operand,
            } => match self.eval(*operand, visiting)? {
                ConstValue::Number(value) if *op == UnaryOperator::Minus => {
                    Some(ConstValue::Number(-value))
                }
                ConstValue::Number(value) => Some(ConstValue::Number(value)),
                _ => None,
            },
            NodeData::Binary {
                op: BinaryOperator::Add,
                left,
                right,
            } => {
                let left = self.eval(*left, visiting)?;
                let right = self.eval(*right, visiting)?;
                match (&left, &right) {
                    (ConstValue::Number(a), ConstValue::Number(b)) => {
                        a.checked_add(*b).map(ConstValue::Number)
                    }
                    (ConstValue::String(_), _) | (_, ConstValue::String(_)) => {
                        let text = format!("{}{}", left.property_name(), right.property_name());
                        Some(ConstValue::String(text.into()))
                    }
                    _ => None,
                }
            }
            NodeData::Identifier {
                target: Some(target),
                ..
            } => self.eval_reference(*target, visiting),
            _ => None,
        }
    }

    /// Value of a `const` variable or field, `None` on reference cycles.
    fn eval_reference(&self, target: DefId, visiting: &mut FxHashSet<DefId>) -> Option<ConstValue> {
        let target = self.db.defs.canonical(target);
        if !visiting.insert(target) {
            return None;
        }
        let info = self.db.def(target)?;
        if !info.is_const() || !matches!(info.kind, DefKind::Variable | DefKind::Field) {
            return None;
        }
        let initializer = match self.arena.data(info.node?)? {
            NodeData::Variable { initializer, .. } | NodeData::Field { initializer, .. } => {
                *initializer
            }
            _ => return None,
        };
        let value = self.eval(initializer, visiting);
        visiting.remove(&target);
        value
    }
}

#[cfg(test)]
#[path = "../tests/constants_tests.rs"]
mod tests;
