//! The type judgment.
//!
//! [`TypeJudgment::infer`] is a total function from an environment and a
//! typable entity to a type:
//!
//! - declarations short-circuit to the type they define (`constructor{C}`,
//!   `type{I}`, an enum literal, a signature, a memoized element type)
//! - syntax nodes dispatch on their kind to exactly one rule each
//!
//! Unresolvable input (broken references, disallowed `super`, malformed
//! destructuring) yields `[unknown]`. Asking for the type of a statement or
//! pattern is a defect in the caller and panics.
//!
//! The rules themselves live in sibling modules, each adding an `impl` block
//! to [`TypeJudgment`]:
//!
//! | Module | Rules |
//! |--------|-------|
//! | `declarations` | declarations, fields, variables, parameters, object literals |
//! | `literals` | literals, templates, array literals, JSX |
//! | `access` | identifiers, `this`, `super`, property and index access |
//! | `calls` | calls, `new`, `await`, `yield` |
//! | `operators` | unary, binary, conditional, assignment |

use crate::flow::{FlowAnalysis, NoFlowFacts};
use crate::options::InferenceOptions;
use gts_ast::{NodeArena, NodeData};
use gts_common::NodeIndex;
use gts_solver::{
    Callable, DefId, DiagnosticSink, Environment, MemberLookup, Newable, NullSink,
    SignatureResolver, TypeDb, TypeId, TypeInterner, TypeJoiner, TypeRelation, TypeSimplifier,
    substitute_type_variables,
};
use std::cell::Cell;
use tracing::{Level, debug, span, trace};

static NO_FLOW: NoFlowFacts = NoFlowFacts;

/// Anything `infer` accepts: a syntax node or a declaration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Typable {
    Node(NodeIndex),
    Decl(DefId),
}

impl From<NodeIndex> for Typable {
    fn from(node: NodeIndex) -> Self {
        Typable::Node(node)
    }
}

impl From<DefId> for Typable {
    fn from(def: DefId) -> Self {
        Typable::Decl(def)
    }
}

/// Computes types of nodes and declarations of one program.
///
/// Cheap to construct; holds only borrowed collaborators plus two counters.
/// Not `Sync`: concurrent inference uses one judgment per thread over the
/// shared program, and meets only in the declaration memo cells.
pub struct TypeJudgment<'a> {
    pub(crate) db: TypeDb<'a>,
    pub(crate) arena: &'a NodeArena,
    pub(crate) relation: &'a dyn TypeRelation,
    pub(crate) members: &'a dyn MemberLookup,
    pub(crate) flow: &'a dyn FlowAnalysis,
    pub(crate) options: InferenceOptions,
    depth: Cell<u32>,
    /// Number of recursion-guard hits and depth cut-offs so far. A result
    /// computed while this moved depends on the guard state of the caller
    /// and must not be memoized.
    fallbacks: Cell<u32>,
}

impl<'a> TypeJudgment<'a> {
    pub fn new(
        db: TypeDb<'a>,
        arena: &'a NodeArena,
        relation: &'a dyn TypeRelation,
        members: &'a dyn MemberLookup,
    ) -> Self {
        Self {
            db,
            arena,
            relation,
            members,
            flow: &NO_FLOW,
            options: InferenceOptions::default(),
            depth: Cell::new(0),
            fallbacks: Cell::new(0),
        }
    }

    pub fn with_flow(mut self, flow: &'a dyn FlowAnalysis) -> Self {
        self.flow = flow;
        self
    }

    pub fn with_options(mut self, options: InferenceOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &InferenceOptions {
        &self.options
    }

    // =========================================================================
    // Public API
    // =========================================================================

    /// Type of a node or declaration.
    pub fn infer(&self, env: &Environment, target: impl Into<Typable>) -> TypeId {
        match target.into() {
            Typable::Node(idx) => self.infer_node(env, idx),
            Typable::Decl(def) => self.infer_decl(env, def),
        }
    }

    /// Simplify a union or intersection, reporting removed members to `sink`
    /// unless the options turn reporting off.
    pub fn simplify(
        &self,
        env: &Environment,
        ty: TypeId,
        node: NodeIndex,
        sink: &mut dyn DiagnosticSink,
    ) -> TypeId {
        let simplifier = self.simplifier();
        if self.options.report_redundant_members {
            simplifier.simplify_at(env, ty, node, sink)
        } else {
            simplifier.simplify(env, ty, &mut NullSink)
        }
    }

    /// Least upper bound of `types`.
    pub fn join(&self, env: &Environment, types: &[TypeId]) -> TypeId {
        TypeJoiner::new(self.simplifier()).join(env, types, &mut NullSink)
    }

    pub fn resolve_callable(&self, env: &Environment, ty: TypeId) -> Option<Callable> {
        self.resolver().resolve_callable(env, ty)
    }

    pub fn resolve_constructible(&self, env: &Environment, ty: TypeId) -> Option<Newable> {
        self.resolver().resolve_constructible(env, ty)
    }

    // =========================================================================
    // Shared helpers
    // =========================================================================

    #[inline]
    pub(crate) fn types(&self) -> &'a TypeInterner {
        self.db.types
    }

    #[inline]
    pub(crate) fn simplifier(&self) -> TypeSimplifier<'a> {
        TypeSimplifier::new(self.db, self.relation)
    }

    #[inline]
    pub(crate) fn resolver(&self) -> SignatureResolver<'a> {
        SignatureResolver::new(self.db)
    }

    #[inline]
    pub(crate) fn data(&self, idx: NodeIndex) -> Option<&'a NodeData> {
        self.arena.data(idx)
    }

    pub(crate) fn substitute(&self, env: &Environment, ty: TypeId) -> TypeId {
        substitute_type_variables(self.db, env, ty)
    }

    /// Record a recursion-guard hit.
    pub(crate) fn note_fallback(&self) {
        self.fallbacks.set(self.fallbacks.get() + 1);
    }

    pub(crate) fn fallback_count(&self) -> u32 {
        self.fallbacks.get()
    }

    /// Run `f` one level deeper, or give up with `[unknown]` past the depth
    /// cap.
    pub(crate) fn descend(&self, what: u32, f: impl FnOnce() -> TypeId) -> TypeId {
        let depth = self.depth.get();
        if depth >= self.options.max_inference_depth {
            debug!(what, depth, "TypeJudgment: inference depth exceeded");
            self.note_fallback();
            return TypeId::UNKNOWN;
        }
        self.depth.set(depth + 1);
        let result = f();
        self.depth.set(depth);
        result
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    pub(crate) fn infer_node(&self, env: &Environment, idx: NodeIndex) -> TypeId {
        let Some(node) = self.arena.get(idx) else {
            return TypeId::UNKNOWN;
        };
        let _span = span!(Level::TRACE, "infer", node = idx.0, kind = ?node.kind()).entered();
        let result = self.descend(idx.0, || self.dispatch(env, idx, &node.data));
        trace!(node = idx.0, type_id = result.0, "infer");
        result
    }

    fn dispatch(&self, env: &Environment, idx: NodeIndex, data: &NodeData) -> TypeId {
        let types = self.types();
        match data {
            // Declarations
            NodeData::Class { def, .. }
            | NodeData::Interface { def, .. }
            | NodeData::Enum { def, .. }
            | NodeData::EnumLiteral { def }
            | NodeData::TypeAlias { def }
            | NodeData::Function { def, .. }
            | NodeData::Method { def, .. } => {
                def.map_or(TypeId::UNKNOWN, |def| self.infer_decl(env, def))
            }
            NodeData::TypeVariable { def } => types.type_variable(*def),
            NodeData::Getter { declared_type, .. } | NodeData::Setter { declared_type, .. } => {
                declared_type.unwrap_or(TypeId::ANY)
            }
            NodeData::Field {
                declared_type,
                initializer,
                is_immutable,
                ..
            } => self.type_of_field(env, *declared_type, *initializer, *is_immutable),
            NodeData::Variable {
                declared_type,
                initializer,
                is_immutable,
                ..
            } => self.type_of_variable(env, idx, *declared_type, *initializer, *is_immutable),
            NodeData::Parameter {
                declared_type,
                initializer,
                is_variadic,
                ..
            } => self.type_of_parameter(env, *declared_type, *initializer, *is_variadic),
            NodeData::CatchVariable { .. } => self.untyped_element_type(),

            // Object literals
            NodeData::ObjectLiteral { properties } => self.type_of_object_literal(env, properties),
            NodeData::PropertyAssignment {
                declared_type,
                value,
                ..
            } => declared_type.unwrap_or_else(|| self.type_of_initializer(env, *value, true)),
            NodeData::PropertySpread { .. } => TypeId::UNKNOWN,

            // Literals
            NodeData::NullLiteral => TypeId::NULL,
            NodeData::BooleanLiteral(value) => types.literal_boolean(*value),
            NodeData::NumericLiteral(value) => types.literal_number(*value),
            NodeData::StringLiteral(value) => types.literal_string_atom(*value),
            NodeData::RegularExpressionLiteral => self.db.builtins.regexp_type,
            NodeData::TemplateLiteral { parts } => self.type_of_template(parts),
            NodeData::TemplateSegment(_) => TypeId::STRING,
            NodeData::TaggedTemplate { tag, .. } => self.type_of_tagged_template(env, *tag),
            NodeData::ArrayLiteral { elements } => self.type_of_array_literal(env, elements),
            NodeData::ArrayElement { expression, .. } => self.infer_node(env, *expression),
            NodeData::ArrayPadding => TypeId::UNDEFINED,

            // References and member access
            NodeData::Identifier { target, .. } => self.type_of_identifier(env, idx, *target),
            NodeData::This => self.this_type_at(idx).unwrap_or(TypeId::UNKNOWN),
            NodeData::Super => self.type_of_super(env, idx),
            NodeData::Paren { expression } => self.infer_node(env, *expression),
            NodeData::PropertyAccess {
                target,
                name,
                property,
                type_args,
            } => self.type_of_property_access(env, idx, *target, *name, *property, type_args),
            NodeData::IndexedAccess { target, index } => {
                self.type_of_indexed_access(env, *target, *index)
            }

            // Calls
            NodeData::Call {
                target,
                type_args,
                args,
            } => self.type_of_call(env, idx, *target, type_args, args),
            NodeData::Argument { expression, .. } => self.infer_node(env, *expression),
            NodeData::New {
                callee,
                type_args,
                args,
            } => self.type_of_new(env, *callee, type_args, args),
            NodeData::NewTarget => TypeId::UNKNOWN,
            NodeData::Yield {
                expression,
                is_delegate,
            } => self.type_of_yield(env, idx, *expression, *is_delegate),
            NodeData::Await { expression } => self.type_of_await(env, *expression),
            NodeData::Promisify { expression } => self.promisified_return_type(env, *expression),

            // Operators
            NodeData::Postfix { .. } => TypeId::NUMBER,
            NodeData::Unary { op, operand } => self.type_of_unary(env, *op, *operand),
            NodeData::Binary { op, left, right } => self.type_of_binary(env, *op, *left, *right),
            NodeData::Conditional {
                when_true,
                when_false,
                ..
            } => self.type_of_alternatives(env, *when_true, *when_false),
            NodeData::Assignment { op, left, right } => {
                self.type_of_assignment(env, *op, *left, *right)
            }
            NodeData::Comma { expressions } => expressions
                .last()
                .map_or(TypeId::UNKNOWN, |&last| self.infer_node(env, last)),
            NodeData::Cast { target_type, .. } => target_type.unwrap_or(TypeId::UNKNOWN),

            // JSX
            NodeData::JsxElement {
                element_class,
                props,
                ..
            } => self.type_of_jsx_element(*element_class, *props),
            NodeData::JsxFragment { element_class, .. } => {
                element_class.map_or(TypeId::UNKNOWN, |def| types.nominal_simple(def))
            }

            // No type of their own
            NodeData::VariableStatement { .. }
            | NodeData::ExpressionStatement { .. }
            | NodeData::Block { .. }
            | NodeData::Return { .. }
            | NodeData::For { .. }
            | NodeData::Catch { .. }
            | NodeData::VariableBinding { .. }
            | NodeData::ArrayBindingPattern { .. }
            | NodeData::ObjectBindingPattern { .. }
            | NodeData::BindingProperty { .. }
            | NodeData::BindingElement { .. } => {
                panic!("no type judgment for {:?} node {}", data.kind(), idx.0)
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/judgment_tests.rs"]
mod tests;
