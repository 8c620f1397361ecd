//! Walks over the declared type hierarchy.
//!
//! Super types are computed with the receiver's type arguments substituted,
//! so `all_supertypes(Array<string>)` contains `Iterable<string>` and not
//! `Iterable<T>`.

use crate::db::TypeDb;
use crate::def::{DefId, DefKind};
use crate::instantiate::{TypeSubstitution, instantiate_type};
use crate::recursion::RecursionProfile;
use crate::types::{LiteralValue, TypeData, TypeId, WildcardKind};
use indexmap::IndexSet;
use rustc_hash::FxBuildHasher;
use smallvec::SmallVec;

/// Direct super types of `ty`, instantiated.
pub fn direct_supertypes(db: TypeDb<'_>, ty: TypeId) -> SmallVec<[TypeId; 4]> {
    let mut out = SmallVec::new();
    let object = db.object_type();
    match db.lookup(ty) {
        TypeData::Nominal(app) => {
            let Some(info) = db.def(app.def) else {
                return out;
            };
            let subst = TypeSubstitution::from_args(&info.type_params, &app.args);
            match info.kind {
                DefKind::Class | DefKind::Interface => {
                    if let Some(extends) = info.extends {
                        out.push(instantiate_type(db, extends, &subst));
                    }
                    for &implemented in &info.implements {
                        out.push(instantiate_type(db, implemented, &subst));
                    }
                    if info.extends.is_none() && app.def != db.builtins.object {
                        out.push(object);
                    }
                }
                DefKind::Enum(kind) => {
                    out.push(db.types.nominal_simple(db.builtins.enum_base(kind)));
                }
                DefKind::TypeAlias => {
                    let resolved = db.resolve_alias(ty);
                    if resolved != ty {
                        out.push(resolved);
                    }
                }
                DefKind::Namespace => out.push(object),
                DefKind::EnumLiteral
                | DefKind::Function
                | DefKind::Method
                | DefKind::Getter
                | DefKind::Setter
                | DefKind::Field
                | DefKind::Parameter
                | DefKind::Variable
                | DefKind::TypeVariable
                | DefKind::Dynamic => {}
            }
        }
        TypeData::Literal(value) => {
            out.push(db.literal_base(&value));
        }
        TypeData::Function(_) => out.push(db.builtins.function_type),
        TypeData::Structural(_) => out.push(object),
        TypeData::MetaType { constructor, .. } => {
            if constructor {
                out.push(db.builtins.function_type);
            } else {
                out.push(object);
            }
        }
        TypeData::TypeVariable(def) => {
            if let Some(bound) = db.def(def).and_then(|info| info.declared_type) {
                out.push(bound);
            }
        }
        TypeData::This(Some(bound)) => out.push(bound),
        TypeData::Wildcard {
            bound: Some(bound),
            kind: WildcardKind::Extends,
        } => out.push(bound),
        TypeData::Intersection(members) => out.extend(members.iter().copied()),
        TypeData::This(None)
        | TypeData::Wildcard { .. }
        | TypeData::Union(_)
        | TypeData::Intrinsic(_)
        | TypeData::Unknown
        | TypeData::DynamicAny => {}
    }
    out
}

/// `ty` followed by all of its (transitive) super types, breadth first,
/// without duplicates. Cyclic `extends` clauses terminate.
pub fn all_supertypes(db: TypeDb<'_>, ty: TypeId) -> Vec<TypeId> {
    let mut seen: IndexSet<TypeId, FxBuildHasher> = IndexSet::default();
    // Expanding generics (`class A<T> extends A<Array<T>>`) produce new
    // instantiations forever; the hierarchy depth caps the walk.
    let cap = RecursionProfile::Hierarchy.max_depth() as usize * 8;
    seen.insert(ty);
    let mut cursor = 0;
    while cursor < seen.len() && seen.len() < cap {
        let current = seen[cursor];
        cursor += 1;
        for super_type in direct_supertypes(db, current) {
            seen.insert(super_type);
        }
    }
    seen.into_iter().collect()
}

/// The instantiation of declaration `def` among the super types of `ty`.
pub fn find_instantiation(db: TypeDb<'_>, ty: TypeId, def: DefId) -> Option<TypeId> {
    all_supertypes(db, ty)
        .into_iter()
        .find(|&t| matches!(db.lookup(t), TypeData::Nominal(app) if app.def == def))
}

/// Declarations of all nominal types among `ty` and its super types.
pub fn classifier_chain(db: TypeDb<'_>, ty: TypeId) -> Vec<DefId> {
    all_supertypes(db, ty)
        .into_iter()
        .filter_map(|t| match db.lookup(t) {
            TypeData::Nominal(app) => Some(app.def),
            TypeData::Literal(LiteralValue::EnumLiteral { enum_def, .. }) => Some(enum_def),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
#[path = "../tests/inheritance_tests.rs"]
mod tests;
