//! Node kinds.
//!
//! The tree is produced by the external parser and linked to declarations
//! by the external binder: every node that refers to a declaration already
//! carries its resolved [`DefId`], and every type annotation already carries
//! its resolved [`TypeId`]. The engine only reads the tree.
//!
//! The set of node kinds is closed. Adding a variant is a breaking change
//! that every `match` in the checker has to acknowledge.

use gts_common::{Atom, NodeIndex};
use gts_solver::{DefId, TypeId};
use rust_decimal::Decimal;
use serde::Serialize;

// =============================================================================
// Operators
// =============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum UnaryOperator {
    Delete,
    Void,
    Typeof,
    Increment,
    Decrement,
    Plus,
    Minus,
    BitwiseNot,
    Not,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum PostfixOperator {
    Increment,
    Decrement,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum BinaryOperator {
    // Multiplicative
    Multiply,
    Divide,
    Modulo,
    // Additive
    Add,
    Subtract,
    // Shift
    ShiftLeft,
    ShiftRight,
    UnsignedShiftRight,
    // Relational
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    Instanceof,
    In,
    // Equality
    Equal,
    NotEqual,
    StrictEqual,
    StrictNotEqual,
    // Bitwise
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    // Logical
    And,
    Or,
    Coalesce,
}

/// Operator family; each family has a fixed result rule.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOperatorClass {
    Multiplicative,
    Additive,
    Shift,
    Relational,
    Equality,
    Bitwise,
    Logical,
    Coalesce,
}

impl BinaryOperator {
    pub const fn class(self) -> BinaryOperatorClass {
        use BinaryOperator::*;
        match self {
            Multiply | Divide | Modulo => BinaryOperatorClass::Multiplicative,
            Add | Subtract => BinaryOperatorClass::Additive,
            ShiftLeft | ShiftRight | UnsignedShiftRight => BinaryOperatorClass::Shift,
            Less | Greater | LessEqual | GreaterEqual | Instanceof | In => {
                BinaryOperatorClass::Relational
            }
            Equal | NotEqual | StrictEqual | StrictNotEqual => BinaryOperatorClass::Equality,
            BitwiseAnd | BitwiseOr | BitwiseXor => BinaryOperatorClass::Bitwise,
            And | Or => BinaryOperatorClass::Logical,
            Coalesce => BinaryOperatorClass::Coalesce,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum AssignmentOperator {
    Assign,
    AddAssign,
    SubtractAssign,
    MultiplyAssign,
    DivideAssign,
    ModuloAssign,
    ShiftLeftAssign,
    ShiftRightAssign,
    UnsignedShiftRightAssign,
    BitwiseAndAssign,
    BitwiseOrAssign,
    BitwiseXorAssign,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ForKind {
    /// `for (init; cond; update)`
    Plain,
    /// `for (x in obj)`
    In,
    /// `for (x of iterable)`, `for await (x of iterable)`
    Of { is_await: bool },
}

// =============================================================================
// Node data
// =============================================================================

/// Payload of a node. Child links are `NodeIndex`es into the same arena;
/// `NodeIndex::NONE` marks an absent optional child.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeData {
    // -------------------------------------------------------------------------
    // Declarations
    // -------------------------------------------------------------------------
    /// Class declaration or class expression.
    Class {
        def: Option<DefId>,
        is_expression: bool,
        members: Vec<NodeIndex>,
    },
    Interface {
        def: Option<DefId>,
        members: Vec<NodeIndex>,
    },
    Enum {
        def: Option<DefId>,
        literals: Vec<NodeIndex>,
    },
    EnumLiteral {
        def: Option<DefId>,
    },
    TypeAlias {
        def: Option<DefId>,
    },
    /// Function declaration, function expression or arrow function.
    Function {
        def: Option<DefId>,
        is_expression: bool,
        is_arrow: bool,
        params: Vec<NodeIndex>,
        body: Vec<NodeIndex>,
    },
    Method {
        def: Option<DefId>,
        is_static: bool,
        is_constructor: bool,
        params: Vec<NodeIndex>,
        body: Vec<NodeIndex>,
    },
    Getter {
        def: Option<DefId>,
        declared_type: Option<TypeId>,
        is_static: bool,
        body: Vec<NodeIndex>,
    },
    Setter {
        def: Option<DefId>,
        declared_type: Option<TypeId>,
        is_static: bool,
        param: NodeIndex,
        body: Vec<NodeIndex>,
    },
    Field {
        def: Option<DefId>,
        declared_type: Option<TypeId>,
        initializer: NodeIndex,
        is_static: bool,
        /// `const`/`final` fields keep literal initializer types.
        is_immutable: bool,
    },
    /// Variable declaration; inside a binding element the initializer is the
    /// element's default value.
    Variable {
        def: Option<DefId>,
        declared_type: Option<TypeId>,
        initializer: NodeIndex,
        is_immutable: bool,
    },
    Parameter {
        def: Option<DefId>,
        declared_type: Option<TypeId>,
        initializer: NodeIndex,
        is_variadic: bool,
    },
    /// Declaration of a type parameter.
    TypeVariable {
        def: DefId,
    },
    CatchVariable {
        def: Option<DefId>,
    },

    // -------------------------------------------------------------------------
    // Statements
    // -------------------------------------------------------------------------
    VariableStatement {
        declarations: Vec<NodeIndex>,
    },
    ExpressionStatement {
        expression: NodeIndex,
    },
    Block {
        statements: Vec<NodeIndex>,
    },
    Return {
        expression: NodeIndex,
    },
    For {
        kind: ForKind,
        /// Loop variables or bindings declared in the head.
        declarations: Vec<NodeIndex>,
        /// Iterated expression of `for-in`/`for-of`.
        expression: NodeIndex,
        body: NodeIndex,
    },
    Catch {
        variable: NodeIndex,
        body: NodeIndex,
    },

    // -------------------------------------------------------------------------
    // Destructuring
    // -------------------------------------------------------------------------
    /// `var [a, b] = init` / `var {a, b} = init`
    VariableBinding {
        pattern: NodeIndex,
        initializer: NodeIndex,
    },
    ArrayBindingPattern {
        elements: Vec<NodeIndex>,
    },
    ObjectBindingPattern {
        properties: Vec<NodeIndex>,
    },
    /// `name: element` inside an object pattern.
    BindingProperty {
        name: Atom,
        value: NodeIndex,
    },
    /// Either a variable or a nested pattern.
    BindingElement {
        target: NodeIndex,
        is_rest: bool,
    },

    // -------------------------------------------------------------------------
    // Object literals
    // -------------------------------------------------------------------------
    ObjectLiteral {
        properties: Vec<NodeIndex>,
    },
    /// `name: value` inside an object literal.
    PropertyAssignment {
        def: Option<DefId>,
        name: Atom,
        declared_type: Option<TypeId>,
        value: NodeIndex,
    },
    PropertySpread {
        expression: NodeIndex,
    },

    // -------------------------------------------------------------------------
    // Literals
    // -------------------------------------------------------------------------
    NullLiteral,
    BooleanLiteral(bool),
    NumericLiteral(Decimal),
    StringLiteral(Atom),
    RegularExpressionLiteral,
    /// Template literal; children are segments and embedded expressions.
    TemplateLiteral {
        parts: Vec<NodeIndex>,
    },
    TemplateSegment(Atom),
    TaggedTemplate {
        tag: NodeIndex,
        template: NodeIndex,
    },
    ArrayLiteral {
        elements: Vec<NodeIndex>,
    },
    ArrayElement {
        expression: NodeIndex,
        is_spread: bool,
    },
    /// Hole in `[a, , b]`.
    ArrayPadding,

    // -------------------------------------------------------------------------
    // References and member access
    // -------------------------------------------------------------------------
    Identifier {
        name: Atom,
        target: Option<DefId>,
    },
    This,
    Super,
    Paren {
        expression: NodeIndex,
    },
    PropertyAccess {
        target: NodeIndex,
        name: Atom,
        /// Member the binder resolved `name` to.
        property: Option<DefId>,
        type_args: Vec<TypeId>,
    },
    IndexedAccess {
        target: NodeIndex,
        index: NodeIndex,
    },

    // -------------------------------------------------------------------------
    // Calls
    // -------------------------------------------------------------------------
    Call {
        target: NodeIndex,
        type_args: Vec<TypeId>,
        args: Vec<NodeIndex>,
    },
    Argument {
        expression: NodeIndex,
        is_spread: bool,
    },
    New {
        callee: NodeIndex,
        type_args: Vec<TypeId>,
        args: Vec<NodeIndex>,
    },
    NewTarget,

    // -------------------------------------------------------------------------
    // Generators and async
    // -------------------------------------------------------------------------
    Yield {
        expression: NodeIndex,
        is_delegate: bool,
    },
    Await {
        expression: NodeIndex,
    },
    /// Explicit `@Promisify` expression.
    Promisify {
        expression: NodeIndex,
    },

    // -------------------------------------------------------------------------
    // Operators
    // -------------------------------------------------------------------------
    Postfix {
        op: PostfixOperator,
        operand: NodeIndex,
    },
    Unary {
        op: UnaryOperator,
        operand: NodeIndex,
    },
    Binary {
        op: BinaryOperator,
        left: NodeIndex,
        right: NodeIndex,
    },
    Conditional {
        condition: NodeIndex,
        when_true: NodeIndex,
        when_false: NodeIndex,
    },
    Assignment {
        op: AssignmentOperator,
        left: NodeIndex,
        right: NodeIndex,
    },
    Comma {
        expressions: Vec<NodeIndex>,
    },
    Cast {
        expression: NodeIndex,
        target_type: Option<TypeId>,
    },

    // -------------------------------------------------------------------------
    // JSX
    // -------------------------------------------------------------------------
    /// `<C ...>`; the host resolves the element classifier and props type.
    JsxElement {
        element_class: Option<DefId>,
        props: Option<TypeId>,
        children: Vec<NodeIndex>,
    },
    JsxFragment {
        element_class: Option<DefId>,
        children: Vec<NodeIndex>,
    },
}

/// Fieldless discriminant of [`NodeData`], for logging and dispatch tables.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum NodeKind {
    Class,
    Interface,
    Enum,
    EnumLiteral,
    TypeAlias,
    Function,
    Method,
    Getter,
    Setter,
    Field,
    Variable,
    Parameter,
    TypeVariable,
    CatchVariable,
    VariableStatement,
    ExpressionStatement,
    Block,
    Return,
    For,
    Catch,
    VariableBinding,
    ArrayBindingPattern,
    ObjectBindingPattern,
    BindingProperty,
    BindingElement,
    ObjectLiteral,
    PropertyAssignment,
    PropertySpread,
    NullLiteral,
    BooleanLiteral,
    NumericLiteral,
    StringLiteral,
    RegularExpressionLiteral,
    TemplateLiteral,
    TemplateSegment,
    TaggedTemplate,
    ArrayLiteral,
    ArrayElement,
    ArrayPadding,
    Identifier,
    This,
    Super,
    Paren,
    PropertyAccess,
    IndexedAccess,
    Call,
    Argument,
    New,
    NewTarget,
    Yield,
    Await,
    Promisify,
    Postfix,
    Unary,
    Binary,
    Conditional,
    Assignment,
    Comma,
    Cast,
    JsxElement,
    JsxFragment,
}

impl NodeData {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Class { .. } => NodeKind::Class,
            NodeData::Interface { .. } => NodeKind::Interface,
            NodeData::Enum { .. } => NodeKind::Enum,
            NodeData::EnumLiteral { .. } => NodeKind::EnumLiteral,
            NodeData::TypeAlias { .. } => NodeKind::TypeAlias,
            NodeData::Function { .. } => NodeKind::Function,
            NodeData::Method { .. } => NodeKind::Method,
            NodeData::Getter { .. } => NodeKind::Getter,
            NodeData::Setter { .. } => NodeKind::Setter,
            NodeData::Field { .. } => NodeKind::Field,
            NodeData::Variable { .. } => NodeKind::Variable,
            NodeData::Parameter { .. } => NodeKind::Parameter,
            NodeData::TypeVariable { .. } => NodeKind::TypeVariable,
            NodeData::CatchVariable { .. } => NodeKind::CatchVariable,
            NodeData::VariableStatement { .. } => NodeKind::VariableStatement,
            NodeData::ExpressionStatement { .. } => NodeKind::ExpressionStatement,
            NodeData::Block { .. } => NodeKind::Block,
            NodeData::Return { .. } => NodeKind::Return,
            NodeData::For { .. } => NodeKind::For,
            NodeData::Catch { .. } => NodeKind::Catch,
            NodeData::VariableBinding { .. } => NodeKind::VariableBinding,
            NodeData::ArrayBindingPattern { .. } => NodeKind::ArrayBindingPattern,
            NodeData::ObjectBindingPattern { .. } => NodeKind::ObjectBindingPattern,
            NodeData::BindingProperty { .. } => NodeKind::BindingProperty,
            NodeData::BindingElement { .. } => NodeKind::BindingElement,
            NodeData::ObjectLiteral { .. } => NodeKind::ObjectLiteral,
            NodeData::PropertyAssignment { .. } => NodeKind::PropertyAssignment,
            NodeData::PropertySpread { .. } => NodeKind::PropertySpread,
            NodeData::NullLiteral => NodeKind::NullLiteral,
            NodeData::BooleanLiteral(_) => NodeKind::BooleanLiteral,
            NodeData::NumericLiteral(_) => NodeKind::NumericLiteral,
            NodeData::StringLiteral(_) => NodeKind::StringLiteral,
            NodeData::RegularExpressionLiteral => NodeKind::RegularExpressionLiteral,
            NodeData::TemplateLiteral { .. } => NodeKind::TemplateLiteral,
            NodeData::TemplateSegment(_) => NodeKind::TemplateSegment,
            NodeData::TaggedTemplate { .. } => NodeKind::TaggedTemplate,
            NodeData::ArrayLiteral { .. } => NodeKind::ArrayLiteral,
            NodeData::ArrayElement { .. } => NodeKind::ArrayElement,
            NodeData::ArrayPadding => NodeKind::ArrayPadding,
            NodeData::Identifier { .. } => NodeKind::Identifier,
            NodeData::This => NodeKind::This,
            NodeData::Super => NodeKind::Super,
            NodeData::Paren { .. } => NodeKind::Paren,
            NodeData::PropertyAccess { .. } => NodeKind::PropertyAccess,
            NodeData::IndexedAccess { .. } => NodeKind::IndexedAccess,
            NodeData::Call { .. } => NodeKind::Call,
            NodeData::Argument { .. } => NodeKind::Argument,
            NodeData::New { .. } => NodeKind::New,
            NodeData::NewTarget => NodeKind::NewTarget,
            NodeData::Yield { .. } => NodeKind::Yield,
            NodeData::Await { .. } => NodeKind::Await,
            NodeData::Promisify { .. } => NodeKind::Promisify,
            NodeData::Postfix { .. } => NodeKind::Postfix,
            NodeData::Unary { .. } => NodeKind::Unary,
            NodeData::Binary { .. } => NodeKind::Binary,
            NodeData::Conditional { .. } => NodeKind::Conditional,
            NodeData::Assignment { .. } => NodeKind::Assignment,
            NodeData::Comma { .. } => NodeKind::Comma,
            NodeData::Cast { .. } => NodeKind::Cast,
            NodeData::JsxElement { .. } => NodeKind::JsxElement,
            NodeData::JsxFragment { .. } => NodeKind::JsxFragment,
        }
    }

    /// Declaration a node introduces, if any.
    pub fn declared_def(&self) -> Option<DefId> {
        match self {
            NodeData::Class { def, .. }
            | NodeData::Interface { def, .. }
            | NodeData::Enum { def, .. }
            | NodeData::EnumLiteral { def }
            | NodeData::TypeAlias { def }
            | NodeData::Function { def, .. }
            | NodeData::Method { def, .. }
            | NodeData::Getter { def, .. }
            | NodeData::Setter { def, .. }
            | NodeData::Field { def, .. }
            | NodeData::Variable { def, .. }
            | NodeData::Parameter { def, .. }
            | NodeData::CatchVariable { def }
            | NodeData::PropertyAssignment { def, .. } => *def,
            NodeData::TypeVariable { def } => Some(*def),
            _ => None,
        }
    }

    /// Member of a class or interface body.
    pub fn is_member_declaration(&self) -> bool {
        matches!(
            self,
            NodeData::Method { .. }
                | NodeData::Getter { .. }
                | NodeData::Setter { .. }
                | NodeData::Field { .. }
        )
    }

    /// `static` modifier of a member declaration.
    pub fn is_static_member(&self) -> bool {
        match self {
            NodeData::Method { is_static, .. }
            | NodeData::Getter { is_static, .. }
            | NodeData::Setter { is_static, .. }
            | NodeData::Field { is_static, .. } => *is_static,
            _ => false,
        }
    }
}

/// A node: payload plus parent link.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub data: NodeData,
    /// `NodeIndex::NONE` for roots.
    pub parent: NodeIndex,
}

impl Node {
    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }
}
