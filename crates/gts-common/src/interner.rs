//! String interning.
//!
//! Identifier names, property names and string literal values are interned
//! once and then compared as `Atom`s (a `u32`). The interner is shared by
//! the AST, the definition store and the type interner, so it must be usable
//! from several threads at once.

use dashmap::DashMap;
use std::sync::{Arc, RwLock};

/// An interned string handle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub struct Atom(pub u32);

impl Atom {
    /// Sentinel for "no name".
    pub const NONE: Self = Self(0);

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == Self::NONE.0
    }
}

/// Thread-safe string interner.
///
/// Slot 0 is reserved for `Atom::NONE` and resolves to the empty string.
#[derive(Debug)]
pub struct Interner {
    lookup: DashMap<Arc<str>, Atom>,
    strings: RwLock<Vec<Arc<str>>>,
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl Interner {
    pub fn new() -> Self {
        let empty: Arc<str> = Arc::from("");
        let lookup = DashMap::default();
        lookup.insert(empty.clone(), Atom::NONE);
        Self {
            lookup,
            strings: RwLock::new(vec![empty]),
        }
    }

    /// Intern a string, returning the existing atom if it was seen before.
    pub fn intern(&self, text: &str) -> Atom {
        if let Some(atom) = self.lookup.get(text) {
            return *atom;
        }
        let key: Arc<str> = Arc::from(text);
        // The entry API keeps two racing writers from allocating two atoms.
        *self.lookup.entry(key.clone()).or_insert_with(|| {
            let mut strings = self
                .strings
                .write()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            let atom = Atom(strings.len() as u32);
            strings.push(key);
            atom
        })
    }

    /// Resolve an atom back to its text.
    ///
    /// Unknown atoms resolve to the empty string.
    pub fn resolve(&self, atom: Atom) -> Arc<str> {
        let strings = self
            .strings
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        strings
            .get(atom.0 as usize)
            .cloned()
            .unwrap_or_else(|| strings[0].clone())
    }

    /// Number of interned strings, including the reserved empty string.
    pub fn len(&self) -> usize {
        self.strings
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

#[cfg(test)]
#[path = "../tests/interner_tests.rs"]
mod tests;
