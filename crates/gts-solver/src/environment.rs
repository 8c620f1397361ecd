//! Typing environment.
//!
//! A persistent chain of frames. [`Environment::wrap`] opens a child frame
//! that shares every outer frame with its parent; lookups walk outward from
//! the newest frame; writes only touch the newest frame. Exploring a side
//! branch of inference is therefore a `wrap()` away, and nothing written in
//! the branch is visible to the caller once the branch returns.
//!
//! Three kinds of entries live in an environment:
//! - substitutions (type variable to type argument)
//! - the current `this` binding
//! - recursion guards keyed by [`GuardKey`]

use crate::def::DefId;
use crate::types::TypeId;
use gts_common::NodeIndex;
use smallvec::SmallVec;
use std::sync::Arc;

/// Purpose of a recursion guard. Distinct purposes never collide even when
/// they are keyed on the same node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GuardKind {
    /// Initializer of a variable, field or property (`x = x || {}`).
    VariableInitializer,
    /// Destructuring pattern replayed against its initializer (`var [a,b] = b`).
    DestructuringPattern,
    /// Iterated expression of a `for-of` loop.
    ForOfIteration,
    /// Property access receiver.
    PropertyAccess,
    /// Call expression whose return type is being resolved.
    CallExpression,
    /// Return-type inference of a function body.
    FunctionReturn,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GuardKey {
    pub kind: GuardKind,
    pub node: NodeIndex,
}

impl GuardKey {
    pub const fn new(kind: GuardKind, node: NodeIndex) -> Self {
        Self { kind, node }
    }
}

/// Observed state of a guard.
///
/// `Absent -> Active | Provisional -> (frame dropped)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GuardState {
    Absent,
    /// Guard written without a preliminary result.
    Active,
    /// Guard written with a preliminary result visible to re-entrant calls.
    Provisional(TypeId),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EnvKey {
    Substitution(DefId),
    ThisBinding,
    Guard(GuardKey),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EnvValue {
    Type(TypeId),
    Marker,
}

#[derive(Clone, Debug)]
struct Frame {
    parent: Option<Arc<Frame>>,
    entries: SmallVec<[(EnvKey, EnvValue); 4]>,
}

/// Persistent typing environment.
#[derive(Clone, Debug, Default)]
pub struct Environment {
    head: Option<Arc<Frame>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Child environment with a fresh, empty newest frame.
    #[must_use]
    pub fn wrap(&self) -> Environment {
        Environment {
            head: Some(Arc::new(Frame {
                parent: self.head.clone(),
                entries: SmallVec::new(),
            })),
        }
    }

    /// Write into the newest frame. Shadows any outer entry for `key`.
    pub fn put(&mut self, key: EnvKey, value: EnvValue) {
        let head = self.head.get_or_insert_with(|| {
            Arc::new(Frame {
                parent: None,
                entries: SmallVec::new(),
            })
        });
        // Copy-on-write: a frame shared with another environment is cloned
        // (its parent link is shared, not copied).
        let frame = Arc::make_mut(head);
        if let Some(slot) = frame.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            frame.entries.push((key, value));
        }
    }

    /// Innermost value for `key`.
    pub fn get(&self, key: EnvKey) -> Option<EnvValue> {
        let mut frame = self.head.as_deref();
        while let Some(f) = frame {
            if let Some((_, value)) = f.entries.iter().rev().find(|(k, _)| *k == key) {
                return Some(*value);
            }
            frame = f.parent.as_deref();
        }
        None
    }

    /// Number of frames in the chain.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut frame = self.head.as_deref();
        while let Some(f) = frame {
            depth += 1;
            frame = f.parent.as_deref();
        }
        depth
    }

    // =========================================================================
    // Substitutions
    // =========================================================================

    pub fn add_substitution(&mut self, type_var: DefId, replacement: TypeId) {
        self.put(EnvKey::Substitution(type_var), EnvValue::Type(replacement));
    }

    pub fn substitution(&self, type_var: DefId) -> Option<TypeId> {
        match self.get(EnvKey::Substitution(type_var)) {
            Some(EnvValue::Type(ty)) => Some(ty),
            _ => None,
        }
    }

    /// Whether any frame carries a substitution. Lets substitution skip
    /// environments that cannot change anything.
    pub fn has_substitutions(&self) -> bool {
        let mut frame = self.head.as_deref();
        while let Some(f) = frame {
            if f
                .entries
                .iter()
                .any(|(k, _)| matches!(k, EnvKey::Substitution(_)))
            {
                return true;
            }
            frame = f.parent.as_deref();
        }
        false
    }

    // =========================================================================
    // this binding
    // =========================================================================

    pub fn set_this_binding(&mut self, this_type: TypeId) {
        self.put(EnvKey::ThisBinding, EnvValue::Type(this_type));
    }

    pub fn this_binding(&self) -> Option<TypeId> {
        match self.get(EnvKey::ThisBinding) {
            Some(EnvValue::Type(ty)) => Some(ty),
            _ => None,
        }
    }

    // =========================================================================
    // Recursion guards
    // =========================================================================

    pub fn guard_state(&self, key: GuardKey) -> GuardState {
        match self.get(EnvKey::Guard(key)) {
            None => GuardState::Absent,
            Some(EnvValue::Marker) => GuardState::Active,
            Some(EnvValue::Type(ty)) => GuardState::Provisional(ty),
        }
    }

    pub fn is_guarded(&self, key: GuardKey) -> bool {
        self.guard_state(key) != GuardState::Absent
    }

    /// Child environment with `key` marked active.
    #[must_use]
    pub fn with_guard(&self, key: GuardKey) -> Environment {
        let mut child = self.wrap();
        child.put(EnvKey::Guard(key), EnvValue::Marker);
        child
    }

    /// Child environment with `key` carrying a preliminary result.
    #[must_use]
    pub fn with_provisional(&self, key: GuardKey, preliminary: TypeId) -> Environment {
        let mut child = self.wrap();
        child.put(EnvKey::Guard(key), EnvValue::Type(preliminary));
        child
    }
}

#[cfg(test)]
#[path = "../tests/environment_tests.rs"]
mod tests;
