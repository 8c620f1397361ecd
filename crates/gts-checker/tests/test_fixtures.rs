//! Programs assembled node by node for checker tests.
#![allow(dead_code)]

use crate::flow::RecordedFlowFacts;
use crate::judgment::{Typable, TypeJudgment};
use crate::options::InferenceOptions;
use gts_ast::{NodeArena, NodeData};
use gts_common::{Atom, NodeIndex};
use gts_solver::{
    BuiltinTypes, DefFlags, DefId, DefKind, DefinitionInfo, DefinitionStore, EnumKind,
    Environment, FunctionShape, ParamInfo, TypeDb, TypeFormatter, TypeHierarchy, TypeId,
    TypeInterner, Variance,
};
use rust_decimal::Decimal;

/// Route `RUST_LOG`-filtered tracing output through the test harness.
pub(crate) fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Declarations, syntax tree and flow facts of one test program.
pub(crate) struct Program {
    pub types: TypeInterner,
    pub defs: DefinitionStore,
    pub builtins: BuiltinTypes,
    pub arena: NodeArena,
    pub flow: RecordedFlowFacts,
    pub options: InferenceOptions,
}

impl Program {
    pub fn new() -> Self {
        init_test_tracing();
        let types = TypeInterner::new();
        let defs = DefinitionStore::new();
        let builtins = BuiltinTypes::install(&types, &defs);
        Self {
            types,
            defs,
            builtins,
            arena: NodeArena::new(),
            flow: RecordedFlowFacts::new(),
            options: InferenceOptions::default(),
        }
    }

    pub fn db(&self) -> TypeDb<'_> {
        TypeDb::new(&self.types, &self.defs, &self.builtins)
    }

    pub fn atom(&self, text: &str) -> Atom {
        self.types.intern_string(text)
    }

    pub fn format(&self, ty: TypeId) -> String {
        TypeFormatter::new(self.db()).format(ty)
    }

    /// Run `f` with a judgment over this program, using the declared
    /// hierarchy as subtype oracle and member resolver.
    pub fn with_judgment<R>(&self, f: impl FnOnce(&TypeJudgment<'_>) -> R) -> R {
        let hierarchy = TypeHierarchy::new(self.db());
        let judgment = TypeJudgment::new(self.db(), &self.arena, &hierarchy, &hierarchy)
            .with_flow(&self.flow)
            .with_options(self.options.clone());
        f(&judgment)
    }

    pub fn infer(&self, target: impl Into<Typable>) -> TypeId {
        let target = target.into();
        self.with_judgment(|j| j.infer(&Environment::new(), target))
    }

    /// Formatted type of `target`.
    pub fn type_of(&self, target: impl Into<Typable>) -> String {
        self.format(self.infer(target))
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    pub fn class(&self, name: &str, super_type: Option<TypeId>) -> (DefId, TypeId) {
        let mut info = DefinitionInfo::class(self.atom(name));
        if let Some(super_type) = super_type {
            info = info.with_extends(super_type);
        }
        let def = self.defs.register(info);
        (def, self.types.nominal_simple(def))
    }

    pub fn interface(&self, name: &str) -> (DefId, TypeId) {
        let def = self.defs.register(DefinitionInfo::interface(self.atom(name)));
        (def, self.types.nominal_simple(def))
    }

    /// Generic class; returns the type variables of its parameters.
    pub fn generic_class(&self, name: &str, params: &[&str]) -> (DefId, Vec<TypeId>) {
        let type_params: Vec<DefId> = params
            .iter()
            .map(|p| {
                self.defs.register(DefinitionInfo::type_variable(
                    self.atom(p),
                    None,
                    Variance::Invariant,
                ))
            })
            .collect();
        let def = self.defs.register(
            DefinitionInfo::class(self.atom(name)).with_type_params(type_params.clone()),
        );
        for &tp in &type_params {
            self.defs.update(tp, |info| info.owner = Some(def));
        }
        let vars = type_params
            .iter()
            .map(|&tp| self.types.type_variable(tp))
            .collect();
        (def, vars)
    }

    /// Enum with the given literals, returned in declaration order.
    pub fn enumeration(
        &self,
        name: &str,
        kind: EnumKind,
        literals: &[&str]) -> (DefId, Vec<DefId>,
    ) {
        let def = self
            .defs
            .register(DefinitionInfo::enumeration(self.atom(name), kind));
        let literals = literals
            .iter()
            .map(|literal| {
                let lit = self.defs.register(
                    DefinitionInfo::new(DefKind::EnumLiteral, self.atom(literal))
                        .with_flags(DefFlags::STATIC),
                );
                self.defs.add_member(def, lit);
                lit
            })
            .collect();
        (def, literals)
    }

    pub fn member(
        &self,
        owner: DefId,
        kind: DefKind,
        name: &str,
        ty: TypeId,
        flags: DefFlags,
    ) -> DefId {
        let member = self.defs.register(
            DefinitionInfo::new(kind, self.atom(name))
                .with_declared_type(ty)
                .with_flags(flags),
        );
        self.defs.add_member(owner, member);
        member
    }

    /// Declaration without a type annotation.
    pub fn declare(&self, kind: DefKind, name: &str, flags: DefFlags) -> DefId {
        self.defs
            .register(DefinitionInfo::new(kind, self.atom(name)).with_flags(flags))
    }

    pub fn function_type(&self, params: &[TypeId], return_type: TypeId) -> TypeId {
        let params = params
            .iter()
            .enumerate()
            .map(|(i, &ty)| ParamInfo::required(self.atom(&format!("p{i}")), ty))
            .collect();
        self.types.function(FunctionShape::new(params, return_type))
    }

    pub fn array_of(&self, element: TypeId) -> TypeId {
        self.builtins.array_of(&self.types, element)
    }

    /// Link `def` to the node declaring it.
    pub fn attach(&self, def: DefId, node: NodeIndex) {
        self.defs.update(def, |info| info.node = Some(node));
    }

    // =========================================================================
    // Nodes
    // =========================================================================

    pub fn add(&mut self, data: NodeData) -> NodeIndex {
        self.arena.add(data)
    }

    /// Reference to `def`, named after it.
    pub fn ident(&mut self, def: DefId) -> NodeIndex {
        let name = self.defs.name(def).unwrap_or_else(|| self.atom("?"));
        self.arena.add_identifier(name, Some(def))
    }

    pub fn unresolved(&mut self, name: &str) -> NodeIndex {
        let name = self.atom(name);
        self.arena.add_identifier(name, None)
    }

    pub fn num(&mut self, value: i64) -> NodeIndex {
        self.arena.add_number(Decimal::from(value))
    }

    pub fn string(&mut self, text: &str) -> NodeIndex {
        let text = self.atom(text);
        self.arena.add_string(text)
    }

    pub fn boolean(&mut self, value: bool) -> NodeIndex {
        self.arena.add_boolean(value)
    }

    pub fn paren(&mut self, expression: NodeIndex) -> NodeIndex {
        self.arena.add_paren(expression)
    }

    pub fn access(&mut self, target: NodeIndex, name: &str, property: Option<DefId>) -> NodeIndex {
        let name = self.atom(name);
        self.arena.add_property_access(target, name, property)
    }

    pub fn call(&mut self, target: NodeIndex, args: Vec<NodeIndex>) -> NodeIndex {
        self.arena.add_call(target, args)
    }

    pub fn array(&mut self, elements: Vec<NodeIndex>) -> NodeIndex {
        let elements = elements
            .into_iter()
            .map(|expression| {
                self.add(NodeData::ArrayElement {
                    expression,
                    is_spread: false,
                })
            })
            .collect();
        self.add(NodeData::ArrayLiteral { elements })
    }

    /// `var name[: declared] [= initializer]`
    pub fn variable(
        &mut self,
        name: &str,
        declared: Option<TypeId>,
        initializer: NodeIndex,
    ) -> (DefId, NodeIndex) {
        self.variable_with(name, declared, initializer, false)
    }

    /// `const name = initializer`
    pub fn constant(&mut self, name: &str, initializer: NodeIndex) -> (DefId, NodeIndex) {
        self.variable_with(name, None, initializer, true)
    }

    fn variable_with(
        &mut self,
        name: &str,
        declared: Option<TypeId>,
        initializer: NodeIndex,
        is_immutable: bool,
    ) -> (DefId, NodeIndex) {
        let flags = if is_immutable {
            DefFlags::CONST
        } else {
            DefFlags::empty()
        };
        let mut info = DefinitionInfo::new(DefKind::Variable, self.atom(name)).with_flags(flags);
        if let Some(declared) = declared {
            info = info.with_declared_type(declared);
        }
        let def = self.defs.register(info);
        let node = self.add(NodeData::Variable {
            def: Some(def),
            declared_type: declared,
            initializer,
            is_immutable,
        });
        self.attach(def, node);
        (def, node)
    }

    /// Class node for `def` owning `members`.
    pub fn class_node(&mut self, def: DefId, members: Vec<NodeIndex>) -> NodeIndex {
        let node = self.add(NodeData::Class {
            def: Some(def),
            is_expression: false,
            members,
        });
        self.attach(def, node);
        node
    }

    /// Method node for `def` with the given body statements.
    pub fn method_node(
        &mut self,
        def: DefId,
        is_static: bool,
        is_constructor: bool,
        body: Vec<NodeIndex>,
    ) -> NodeIndex {
        let node = self.add(NodeData::Method {
            def: Some(def),
            is_static,
            is_constructor,
            params: Vec::new(),
            body,
        });
        self.attach(def, node);
        node
    }

    pub fn statement(&mut self, expression: NodeIndex) -> NodeIndex {
        self.add(NodeData::ExpressionStatement { expression })
    }

    pub fn ret(&mut self, expression: NodeIndex) -> NodeIndex {
        self.add(NodeData::Return { expression })
    }
}
