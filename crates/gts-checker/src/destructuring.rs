//! Destructuring.
//!
//! The type of a variable bound inside a pattern is found by replaying the
//! path from the pattern's root down to the variable against the type of the
//! destructured value:
//!
//! ```text
//! var {a: [, b]} = v;      // b : element type of (type of member a of v)
//! for (var [k, x] of m)    // x : element type of (element type of m)
//! ```

use crate::judgment::TypeJudgment;
use gts_ast::{ForKind, NodeData};
use gts_common::{Atom, NodeIndex};
use gts_solver::{Environment, TypeId};
use smallvec::SmallVec;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum PatternStep {
    Element { is_rest: bool },
    Property(Atom),
}

impl<'a> TypeJudgment<'a> {
    /// Type of `variable`, the target of a binding element.
    pub(crate) fn destructured_type(&self, env: &Environment, variable: NodeIndex) -> TypeId {
        let mut steps: SmallVec<[PatternStep; 4]> = SmallVec::new();
        let mut element = self.arena.parent(variable);
        let root = loop {
            let is_rest = matches!(
                self.data(element),
                Some(NodeData::BindingElement { is_rest: true, .. })
            );
            let container = self.arena.parent(element);
            let pattern = match self.data(container) {
                Some(NodeData::ArrayBindingPattern { .. }) => {
                    steps.push(PatternStep::Element { is_rest });
                    container
                }
                Some(NodeData::BindingProperty { name, .. }) => {
                    steps.push(PatternStep::Property(*name));
                    let pattern = self.arena.parent(container);
                    if !matches!(self.data(pattern), Some(NodeData::ObjectBindingPattern { .. })) {
                        return TypeId::UNKNOWN;
                    }
                    pattern
                }
                _ => return TypeId::UNKNOWN,
            };
            let owner = self.arena.parent(pattern);
            match self.data(owner) {
                Some(NodeData::BindingElement { .. }) => element = owner,
                Some(NodeData::VariableBinding { initializer, .. }) => {
                    break self.binding_source_type(env, owner, *initializer);
                }
                _ => return TypeId::UNKNOWN,
            }
        };

        let mut value = root;
        for &step in steps.iter().rev() {
            value = self.destructure_step(env, value, step);
            if value.is_unknown() {
                break;
            }
        }

        // Default value of the binding element.
        if let Some(NodeData::Variable { initializer, .. }) = self.data(variable) {
            if initializer.is_some() && (value.is_unknown() || value == TypeId::UNDEFINED) {
                return self.infer_node(env, *initializer);
            }
        }
        value
    }

    /// Type of the value a top-level pattern destructures: its initializer,
    /// or the iterated element of the enclosing `for-of`.
    fn binding_source_type(
        &self,
        env: &Environment,
        binding: NodeIndex,
        initializer: NodeIndex,
    ) -> TypeId {
        if initializer.is_some() {
            return self.infer_node(env, initializer);
        }
        match self.data(self.arena.parent(binding)) {
            Some(NodeData::For {
                kind: ForKind::Of { is_await },
                expression,
                ..
            }) => {
                let iterated = self.infer_node(env, *expression);
                self.iterable_element_type(env, iterated, *is_await)
                    .unwrap_or(TypeId::UNKNOWN)
            }
            _ => TypeId::UNKNOWN,
        }
    }

    fn destructure_step(&self, env: &Environment, value: TypeId, step: PatternStep) -> TypeId {
        if value.is_any() {
            return value;
        }
        match step {
            PatternStep::Element { is_rest } => {
                let element = self
                    .db
                    .array_element(value)
                    .or_else(|| self.iterable_element_type(env, value, false));
                match element {
                    Some(element) if is_rest => self.db.builtins.array_of(self.types(), element),
                    Some(element) => element,
                    None => TypeId::UNKNOWN,
                }
            }
            PatternStep::Property(name) => self
                .member_value_type(env, self.db.upper_bound(value), name)
                .unwrap_or(TypeId::UNKNOWN),
        }
    }
}

#[cfg(test)]
#[path = "../tests/destructuring_tests.rs"]
mod tests;
