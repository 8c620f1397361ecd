//! NodeArena access methods and tree navigation.

use crate::arena::NodeArena;
use crate::node::{Node, NodeData, PostfixOperator, UnaryOperator};
use gts_common::NodeIndex;
use smallvec::SmallVec;

pub type NodeList = SmallVec<[NodeIndex; 4]>;

impl NodeData {
    /// Direct children in source order, absent optional children skipped.
    pub fn children(&self) -> NodeList {
        let mut out = NodeList::new();
        let mut push = |idx: NodeIndex| {
            if idx.is_some() {
                out.push(idx);
            }
        };
        match self {
            NodeData::Class { members, .. } | NodeData::Interface { members, .. } => {
                members.iter().copied().for_each(&mut push);
            }
            NodeData::Enum { literals, .. } => literals.iter().copied().for_each(&mut push),
            NodeData::Function { params, body, .. } | NodeData::Method { params, body, .. } => {
                params.iter().chain(body).copied().for_each(&mut push);
            }
            NodeData::Getter { body, .. } => body.iter().copied().for_each(&mut push),
            NodeData::Setter { param, body, .. } => {
                push(*param);
                body.iter().copied().for_each(&mut push);
            }
            NodeData::Field { initializer, .. }
            | NodeData::Variable { initializer, .. }
            | NodeData::Parameter { initializer, .. } => push(*initializer),
            NodeData::VariableStatement { declarations } => {
                declarations.iter().copied().for_each(&mut push);
            }
            NodeData::Block { statements } => statements.iter().copied().for_each(&mut push),
            NodeData::ExpressionStatement { expression }
            | NodeData::Return { expression }
            | NodeData::PropertySpread { expression }
            | NodeData::Paren { expression }
            | NodeData::ArrayElement { expression, .. }
            | NodeData::Argument { expression, .. }
            | NodeData::Yield { expression, .. }
            | NodeData::Await { expression }
            | NodeData::Promisify { expression }
            | NodeData::Cast { expression, .. } => push(*expression),
            NodeData::For {
                declarations,
                expression,
                body,
                ..
            } => {
                declarations.iter().copied().for_each(&mut push);
                push(*expression);
                push(*body);
            }
            NodeData::Catch { variable, body } => {
                push(*variable);
                push(*body);
            }
            NodeData::VariableBinding {
                pattern,
                initializer,
            } => {
                push(*pattern);
                push(*initializer);
            }
            NodeData::ArrayBindingPattern { elements } => {
                elements.iter().copied().for_each(&mut push);
            }
            NodeData::ObjectBindingPattern { properties }
            | NodeData::ObjectLiteral { properties } => {
                properties.iter().copied().for_each(&mut push);
            }
            NodeData::BindingProperty { value, .. }
            | NodeData::PropertyAssignment { value, .. } => push(*value),
            NodeData::BindingElement { target, .. } => push(*target),
            NodeData::TemplateLiteral { parts } => parts.iter().copied().for_each(&mut push),
            NodeData::TaggedTemplate { tag, template } => {
                push(*tag);
                push(*template);
            }
            NodeData::ArrayLiteral { elements } => elements.iter().copied().for_each(&mut push),
            NodeData::PropertyAccess { target, .. } => push(*target),
            NodeData::IndexedAccess { target, index } => {
                push(*target);
                push(*index);
            }
            NodeData::Call { target, args, .. } => {
                push(*target);
                args.iter().copied().for_each(&mut push);
            }
            NodeData::New { callee, args, .. } => {
                push(*callee);
                args.iter().copied().for_each(&mut push);
            }
            NodeData::Postfix { operand, .. } | NodeData::Unary { operand, .. } => push(*operand),
            NodeData::Binary { left, right, .. } | NodeData::Assignment { left, right, .. } => {
                push(*left);
                push(*right);
            }
            NodeData::Conditional {
                condition,
                when_true,
                when_false,
            } => {
                push(*condition);
                push(*when_true);
                push(*when_false);
            }
            NodeData::Comma { expressions } => expressions.iter().copied().for_each(&mut push),
            NodeData::JsxElement { children, .. } | NodeData::JsxFragment { children, .. } => {
                children.iter().copied().for_each(&mut push);
            }
            NodeData::EnumLiteral { .. }
            | NodeData::TypeAlias { .. }
            | NodeData::TypeVariable { .. }
            | NodeData::CatchVariable { .. }
            | NodeData::NullLiteral
            | NodeData::BooleanLiteral(_)
            | NodeData::NumericLiteral(_)
            | NodeData::StringLiteral(_)
            | NodeData::RegularExpressionLiteral
            | NodeData::TemplateSegment(_)
            | NodeData::ArrayPadding
            | NodeData::Identifier { .. }
            | NodeData::This
            | NodeData::Super
            | NodeData::NewTarget => {}
        }
        out
    }
}

impl NodeArena {
    #[inline]
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get(index.0 as usize)
        }
    }

    /// Every node with its index, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeIndex(i as u32), node))
    }

    #[inline]
    pub fn data(&self, index: NodeIndex) -> Option<&NodeData> {
        self.get(index).map(|node| &node.data)
    }

    /// Parent of `index`, `NodeIndex::NONE` for roots and unknown nodes.
    #[inline]
    pub fn parent(&self, index: NodeIndex) -> NodeIndex {
        self.get(index).map_or(NodeIndex::NONE, |node| node.parent)
    }

    pub fn children(&self, index: NodeIndex) -> NodeList {
        self.data(index).map(NodeData::children).unwrap_or_default()
    }

    /// Proper ancestors of `index`, innermost first.
    pub fn ancestors(&self, index: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        std::iter::successors(Some(self.parent(index)), |&idx| Some(self.parent(idx)))
            .take_while(|idx| idx.is_some())
    }

    /// Innermost ancestor matching `pred`.
    pub fn find_ancestor(
        &self,
        index: NodeIndex,
        pred: impl Fn(&NodeData) -> bool,
    ) -> Option<NodeIndex> {
        self.ancestors(index)
            .find(|&idx| self.data(idx).is_some_and(&pred))
    }

    /// First ancestor that is not a parenthesized expression, and the child
    /// on the path to it.
    pub fn skip_parens_up(&self, index: NodeIndex) -> (NodeIndex, NodeIndex) {
        let mut child = index;
        let mut parent = self.parent(index);
        while matches!(self.data(parent), Some(NodeData::Paren { .. })) {
            child = parent;
            parent = self.parent(parent);
        }
        (parent, child)
    }

    /// Innermost enclosing member declaration (method, getter, setter, field).
    pub fn enclosing_member(&self, index: NodeIndex) -> Option<NodeIndex> {
        self.find_ancestor(index, NodeData::is_member_declaration)
    }

    /// Class declaration or expression directly owning the innermost
    /// enclosing member.
    pub fn enclosing_class(&self, index: NodeIndex) -> Option<NodeIndex> {
        let member = self.enclosing_member(index)?;
        let owner = self.parent(member);
        matches!(self.data(owner), Some(NodeData::Class { .. })).then_some(owner)
    }

    /// Innermost function-like node whose body `index` is in. Arrow
    /// functions are skipped when `skip_arrows` is set.
    pub fn enclosing_function(&self, index: NodeIndex, skip_arrows: bool) -> Option<NodeIndex> {
        self.find_ancestor(index, |data| match data {
            NodeData::Function { is_arrow, .. } => !(skip_arrows && *is_arrow),
            NodeData::Method { .. } | NodeData::Getter { .. } | NodeData::Setter { .. } => true,
            _ => false,
        })
    }

    /// Whether the expression at `index` is written to: the left-hand side
    /// of an assignment or the operand of `++`/`--`. Parentheses are
    /// transparent.
    pub fn is_write_access(&self, index: NodeIndex) -> bool {
        let (parent, child) = self.skip_parens_up(index);
        match self.data(parent) {
            Some(NodeData::Assignment { left, .. }) => *left == child,
            Some(NodeData::Unary { op, .. }) => {
                matches!(op, UnaryOperator::Increment | UnaryOperator::Decrement)
            }
            Some(NodeData::Postfix {
                op: PostfixOperator::Increment | PostfixOperator::Decrement,
                ..
            }) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "../tests/access_tests.rs"]
mod tests;
