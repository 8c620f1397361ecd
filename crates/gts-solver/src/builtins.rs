//! Built-in declarations every program can rely on.
//!
//! `Object`, `Function`, `Array<T>`, `Iterable<T>`, `AsyncIterable<T>`,
//! `Generator<Y,R,N>`, `AsyncGenerator<Y,R,N>`, `Promise<R,E>`, `RegExp`,
//! `Error` and the enum base classes `N4Enum`, `N4NumberBasedEnum` and
//! `N4StringBasedEnum` (the latter two with their synthetic static getter
//! `literals`).

use crate::def::{DefFlags, DefId, DefKind, DefinitionInfo, DefinitionStore, Variance};
use crate::intern::TypeInterner;
use crate::types::{FunctionShape, ParamInfo, TypeId};
use tracing::debug;

/// Ids of the built-in declarations, returned by [`BuiltinTypes::install`].
#[derive(Clone, Debug)]
pub struct BuiltinTypes {
    pub object: DefId,
    pub function: DefId,
    pub array: DefId,
    pub iterable: DefId,
    pub async_iterable: DefId,
    pub generator: DefId,
    pub async_generator: DefId,
    pub promise: DefId,
    pub regexp: DefId,
    pub error: DefId,
    pub n4_enum: DefId,
    pub n4_number_based_enum: DefId,
    pub n4_string_based_enum: DefId,
    /// `N4NumberBasedEnum.literals`
    pub number_enum_literals: DefId,
    /// `N4StringBasedEnum.literals`
    pub string_enum_literals: DefId,
    pub object_type: TypeId,
    pub function_type: TypeId,
    pub regexp_type: TypeId,
    pub error_type: TypeId,
}

struct Installer<'a> {
    types: &'a TypeInterner,
    defs: &'a DefinitionStore,
}

impl Installer<'_> {
    fn type_param(&self, name: &str, variance: Variance) -> DefId {
        let atom = self.types.intern_string(name);
        self.defs
            .register(DefinitionInfo::type_variable(atom, None, variance))
    }

    fn classifier(&self, kind: DefKind, name: &str, type_params: Vec<DefId>) -> DefId {
        let atom = self.types.intern_string(name);
        let def = self
            .defs
            .register(DefinitionInfo::new(kind, atom).with_type_params(type_params.clone()));
        for tp in type_params {
            self.defs.update(tp, |info| info.owner = Some(def));
        }
        def
    }

    fn member(
        &self,
        owner: DefId,
        kind: DefKind,
        name: &str,
        ty: TypeId,
        flags: DefFlags,
    ) -> DefId {
        let atom = self.types.intern_string(name);
        let member = self.defs.register(
            DefinitionInfo::new(kind, atom)
                .with_declared_type(ty)
                .with_flags(flags),
        );
        self.defs.add_member(owner, member);
        member
    }

    fn type_var(&self, def: DefId) -> TypeId {
        self.types.type_variable(def)
    }
}

impl BuiltinTypes {
    /// Register the built-in declarations into `defs`.
    pub fn install(types: &TypeInterner, defs: &DefinitionStore) -> Self {
        let inst = Installer { types, defs };

        let object = inst.classifier(DefKind::Class, "Object", Vec::new());
        let object_type = types.nominal_simple(object);

        let function = inst.classifier(DefKind::Class, "Function", Vec::new());
        let function_type = types.nominal_simple(function);
        defs.update(function, |info| info.extends = Some(object_type));

        // Iterable<out T>
        let iter_t = inst.type_param("T", Variance::Covariant);
        let iterable = inst.classifier(DefKind::Interface, "Iterable", vec![iter_t]);
        let iter_t_ty = inst.type_var(iter_t);
        defs.update(iterable, |info| info.element_type = Some(iter_t_ty));

        // AsyncIterable<out T>
        let async_iter_t = inst.type_param("T", Variance::Covariant);
        let async_iterable =
            inst.classifier(DefKind::Interface, "AsyncIterable", vec![async_iter_t]);
        let async_iter_t_ty = inst.type_var(async_iter_t);
        defs.update(async_iterable, |info| {
            info.element_type = Some(async_iter_t_ty);
        });

        // Array<T> implements Iterable<T>
        let array_t = inst.type_param("T", Variance::Invariant);
        let array = inst.classifier(DefKind::Class, "Array", vec![array_t]);
        let array_t_ty = inst.type_var(array_t);
        let array_iterable = types.nominal(iterable, vec![array_t_ty]);
        defs.update(array, |info| {
            info.extends = Some(object_type);
            info.implements = vec![array_iterable];
            info.element_type = Some(array_t_ty);
            info.flags |= DefFlags::INDEX_SIGNATURE;
        });
        let length_atom = types.intern_string("length");
        let length = defs.register(
            DefinitionInfo::new(DefKind::Field, length_atom).with_declared_type(TypeId::NUMBER),
        );
        defs.add_member(array, length);

        // Generator<out Y, out R, N> extends Iterable<Y>
        let (generator, async_generator) = {
            let make = |name: &str, base: DefId| {
                let y = inst.type_param("TYield", Variance::Covariant);
                let r = inst.type_param("TReturn", Variance::Covariant);
                let n = inst.type_param("TNext", Variance::Contravariant);
                let def = inst.classifier(DefKind::Interface, name, vec![y, r, n]);
                let base_ty = types.nominal(base, vec![inst.type_var(y)]);
                defs.update(def, |info| info.extends = Some(base_ty));
                def
            };
            (make("Generator", iterable), make("AsyncGenerator", async_iterable))
        };

        // Promise<out R, out E>
        let promise_r = inst.type_param("R", Variance::Covariant);
        let promise_e = inst.type_param("E", Variance::Covariant);
        let promise = inst.classifier(DefKind::Class, "Promise", vec![promise_r, promise_e]);
        defs.update(promise, |info| info.extends = Some(object_type));

        let regexp = inst.classifier(DefKind::Class, "RegExp", Vec::new());
        defs.update(regexp, |info| info.extends = Some(object_type));
        let regexp_type = types.nominal_simple(regexp);

        let error = inst.classifier(DefKind::Class, "Error", Vec::new());
        defs.update(error, |info| info.extends = Some(object_type));
        let error_type = types.nominal_simple(error);
        inst.member(error, DefKind::Field, "message", TypeId::STRING, DefFlags::empty());

        // Enum base classes
        let n4_enum = inst.classifier(DefKind::Class, "N4Enum", Vec::new());
        defs.update(n4_enum, |info| {
            info.extends = Some(object_type);
            info.flags |= DefFlags::ABSTRACT;
        });
        inst.member(n4_enum, DefKind::Getter, "name", TypeId::STRING, DefFlags::empty());
        inst.member(n4_enum, DefKind::Getter, "value", TypeId::STRING, DefFlags::empty());
        let name_param = ParamInfo::required(types.intern_string("name"), TypeId::STRING);
        let find_by_name = types.function(FunctionShape::new(
            vec![name_param],
            types.this_type(None),
        ));
        inst.member(
            n4_enum,
            DefKind::Method,
            "findLiteralByName",
            find_by_name,
            DefFlags::STATIC,
        );

        let n4_enum_type = types.nominal_simple(n4_enum);
        let based = |name: &str, literal_values: TypeId| {
            let def = inst.classifier(DefKind::Class, name, Vec::new());
            defs.update(def, |info| {
                info.extends = Some(n4_enum_type);
                info.flags |= DefFlags::ABSTRACT;
            });
            let getter = inst.member(
                def,
                DefKind::Getter,
                "literals",
                types.nominal(array, vec![literal_values]),
                DefFlags::STATIC,
            );
            (def, getter)
        };
        let (n4_number_based_enum, number_enum_literals) =
            based("N4NumberBasedEnum", TypeId::NUMBER);
        let (n4_string_based_enum, string_enum_literals) =
            based("N4StringBasedEnum", TypeId::STRING);

        debug!(defs = defs.len(), "BuiltinTypes::install");

        BuiltinTypes {
            object,
            function,
            array,
            iterable,
            async_iterable,
            generator,
            async_generator,
            promise,
            regexp,
            error,
            n4_enum,
            n4_number_based_enum,
            n4_string_based_enum,
            number_enum_literals,
            string_enum_literals,
            object_type,
            function_type,
            regexp_type,
            error_type,
        }
    }

    /// `Array<element>`
    pub fn array_of(&self, types: &TypeInterner, element: TypeId) -> TypeId {
        types.nominal(self.array, vec![element])
    }

    /// `Promise<value, error>`
    pub fn promise_of(&self, types: &TypeInterner, value: TypeId, error: TypeId) -> TypeId {
        types.nominal(self.promise, vec![value, error])
    }

    /// `Iterable<element>` or `AsyncIterable<element>`.
    pub fn iterable_of(&self, types: &TypeInterner, element: TypeId, is_async: bool) -> TypeId {
        let def = if is_async {
            self.async_iterable
        } else {
            self.iterable
        };
        types.nominal(def, vec![element])
    }

    /// Built-in base class of an enum of the given kind.
    pub fn enum_base(&self, kind: crate::def::EnumKind) -> DefId {
        match kind {
            crate::def::EnumKind::Normal => self.n4_enum,
            crate::def::EnumKind::NumberBased => self.n4_number_based_enum,
            crate::def::EnumKind::StringBased => self.n4_string_based_enum,
        }
    }
}

#[cfg(test)]
#[path = "../tests/builtins_tests.rs"]
mod tests;
