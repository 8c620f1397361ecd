//! Human-readable rendering of types.
//!
//! Used in diagnostics and test assertions:
//! `A`, `G<? extends A>`, `union{A,B}`, `intersection{A,B}`, `type{A}`,
//! `constructor{A}`, `~Object with { a: number }`, `{function(number):string}`,
//! `this[C]`, `[unknown]`, `any+`.

use crate::db::TypeDb;
use crate::def::DefId;
use crate::recursion::{DepthCounter, RecursionProfile};
use crate::types::{FunctionShape, LiteralValue, StructuralShape, TypeData, TypeId, WildcardKind};
use std::fmt::Write;

pub struct TypeFormatter<'a> {
    db: TypeDb<'a>,
    depth: DepthCounter,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(db: TypeDb<'a>) -> Self {
        Self {
            db,
            depth: DepthCounter::with_profile(RecursionProfile::Hierarchy),
        }
    }

    pub fn format(&mut self, ty: TypeId) -> String {
        let mut out = String::new();
        self.write(&mut out, ty);
        out
    }

    fn def_name(&self, def: DefId) -> String {
        self.db
            .defs
            .name(def)
            .map_or_else(|| format!("<def {}>", def.0), |atom| {
                self.db.types.resolve_atom(atom).to_string()
            })
    }

    fn write_list(&mut self, out: &mut String, list: &[TypeId]) {
        for (i, &ty) in list.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            self.write(out, ty);
        }
    }

    fn write(&mut self, out: &mut String, ty: TypeId) {
        if !self.depth.enter() {
            out.push_str("...");
            return;
        }
        self.write_inner(out, ty);
        self.depth.leave();
    }

    fn write_inner(&mut self, out: &mut String, ty: TypeId) {
        match self.db.lookup(ty) {
            TypeData::Unknown => out.push_str("[unknown]"),
            TypeData::DynamicAny => out.push_str("any+"),
            TypeData::Intrinsic(kind) => out.push_str(kind.name()),
            TypeData::Nominal(app) => {
                out.push_str(&self.def_name(app.def));
                if !app.args.is_empty() {
                    out.push('<');
                    self.write_list(out, &app.args);
                    out.push('>');
                }
            }
            TypeData::Union(members) => {
                out.push_str("union{");
                self.write_list(out, &members);
                out.push('}');
            }
            TypeData::Intersection(members) => {
                out.push_str("intersection{");
                self.write_list(out, &members);
                out.push('}');
            }
            TypeData::Function(shape) => self.write_function(out, &shape),
            TypeData::Structural(shape) => self.write_structural(out, &shape),
            TypeData::Literal(value) => self.write_literal(out, &value),
            TypeData::This(Some(bound)) => {
                out.push_str("this[");
                self.write(out, bound);
                out.push(']');
            }
            TypeData::This(None) => out.push_str("this"),
            TypeData::TypeVariable(def) => out.push_str(&self.def_name(def)),
            TypeData::Wildcard { bound, kind } => {
                out.push('?');
                if let Some(bound) = bound {
                    out.push_str(match kind {
                        WildcardKind::Extends => " extends ",
                        WildcardKind::Super => " super ",
                    });
                    self.write(out, bound);
                }
            }
            TypeData::MetaType { arg, constructor } => {
                out.push_str(if constructor { "constructor{" } else { "type{" });
                self.write(out, arg);
                out.push('}');
            }
        }
    }

    fn write_function(&mut self, out: &mut String, shape: &FunctionShape) {
        out.push_str("{function");
        if !shape.type_params.is_empty() {
            out.push('<');
            for (i, &tp) in shape.type_params.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&self.def_name(tp));
            }
            out.push('>');
        }
        out.push('(');
        for (i, param) in shape.params.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            if param.rest {
                out.push_str("...");
            }
            self.write(out, param.type_id);
            if param.optional {
                out.push('=');
            }
        }
        out.push(')');
        out.push(':');
        self.write(out, shape.return_type);
        out.push('}');
    }

    fn write_structural(&mut self, out: &mut String, shape: &StructuralShape) {
        out.push_str("~Object");
        if shape.members.is_empty() {
            return;
        }
        out.push_str(" with { ");
        for (i, member) in shape.members.iter().enumerate() {
            if i > 0 {
                out.push_str("; ");
            }
            out.push_str(&self.db.types.resolve_atom(member.name));
            if member.optional {
                out.push('?');
            }
            out.push_str(": ");
            self.write(out, member.type_id);
        }
        out.push_str(" }");
    }

    fn write_literal(&mut self, out: &mut String, value: &LiteralValue) {
        match value {
            LiteralValue::Boolean(b) => {
                let _ = write!(out, "{b}");
            }
            LiteralValue::Number(n) => {
                let _ = write!(out, "{n}");
            }
            LiteralValue::String(atom) => {
                let _ = write!(out, "\"{}\"", self.db.types.resolve_atom(*atom));
            }
            LiteralValue::EnumLiteral { enum_def, member } => {
                let _ = write!(out, "{}.{}", self.def_name(*enum_def), self.def_name(*member));
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/format_tests.rs"]
mod tests;
