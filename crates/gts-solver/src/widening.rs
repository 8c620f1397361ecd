//! Sanitizing inferred types before they become the type of a declaration.
//!
//! A variable, field, property or parameter that takes its type from an
//! initializer does not keep every detail of the initializer's type:
//! - wildcards are replaced by their upper bound
//! - literal types widen to their base type unless the element is immutable
//!   (`const x = 1` keeps `1`, `let x = 1` gets `number`)
//! - `undefined`, `null` and `void` become `any+` so later assignments are not
//!   over-constrained
//! - `[unknown]` becomes `any`

use crate::environment::Environment;
use crate::simplify::TypeSimplifier;
use crate::types::{TypeData, TypeId};
use tracing::trace;

/// Widen literal types to their base types, recursing into unions.
pub fn widen_literals(simplifier: &TypeSimplifier<'_>, env: &Environment, ty: TypeId) -> TypeId {
    let db = simplifier.db();
    match db.lookup(ty) {
        TypeData::Literal(value) => db.literal_base(&value),
        TypeData::Union(members) => {
            let widened: Vec<TypeId> = members
                .iter()
                .map(|&m| widen_literals(simplifier, env, m))
                .collect();
            if widened.iter().zip(members.iter()).all(|(a, b)| a == b) {
                ty
            } else {
                simplifier.create_union(env, &widened)
            }
        }
        _ => ty,
    }
}

/// Type a declaration receives from an initializer of type `ty`.
pub fn sanitize_declared_type(
    simplifier: &TypeSimplifier<'_>,
    env: &Environment,
    ty: TypeId,
    widen: bool,
) -> TypeId {
    let db = simplifier.db();
    let result = match ty {
        TypeId::UNKNOWN => TypeId::ANY,
        TypeId::NULL | TypeId::UNDEFINED | TypeId::VOID => TypeId::DYNAMIC_ANY,
        _ => {
            let upper = match db.lookup(ty) {
                TypeData::Wildcard { .. } => db.upper_bound(ty),
                _ => ty,
            };
            if widen {
                widen_literals(simplifier, env, upper)
            } else {
                upper
            }
        }
    };
    trace!(type_id = ty.0, result = result.0, widen, "sanitize_declared_type");
    result
}

#[cfg(test)]
#[path = "../tests/widening_tests.rs"]
mod tests;
