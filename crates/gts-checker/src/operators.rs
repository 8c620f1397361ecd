//! Unary, binary, conditional and assignment operators.

use crate::judgment::TypeJudgment;
use gts_ast::{AssignmentOperator, BinaryOperator, BinaryOperatorClass, UnaryOperator};
use gts_common::NodeIndex;
use gts_solver::{DefId, EnumKind, Environment, LiteralValue, TypeData, TypeId};

/// Bound on following type variable and wildcard bounds when classifying
/// operands.
const MAX_OPERAND_BOUND_DEPTH: u32 = 16;

impl<'a> TypeJudgment<'a> {
    pub(crate) fn type_of_unary(
        &self,
        env: &Environment,
        op: UnaryOperator,
        operand: NodeIndex,
    ) -> TypeId {
        match op {
            UnaryOperator::Delete | UnaryOperator::Not => TypeId::BOOLEAN,
            UnaryOperator::Void => TypeId::UNDEFINED,
            UnaryOperator::Typeof => TypeId::STRING,
            UnaryOperator::Plus | UnaryOperator::Minus => {
                let operand_type = self.infer_node(env, operand);
                match self.db.lookup(operand_type) {
                    TypeData::Literal(LiteralValue::Number(value))
                        if op == UnaryOperator::Minus =>
                    {
                        self.types().literal_number(-value)
                    }
                    TypeData::Literal(LiteralValue::Number(_)) => operand_type,
                    _ => TypeId::NUMBER,
                }
            }
            UnaryOperator::Increment | UnaryOperator::Decrement | UnaryOperator::BitwiseNot => {
                TypeId::NUMBER
            }
        }
    }

    pub(crate) fn type_of_binary(
        &self,
        env: &Environment,
        op: BinaryOperator,
        left: NodeIndex,
        right: NodeIndex,
    ) -> TypeId {
        match op.class() {
            BinaryOperatorClass::Additive if op == BinaryOperator::Add => {
                let left_type = self.infer_node(env, left);
                let right_type = self.infer_node(env, right);
                self.type_of_addition(env, left_type, right_type)
            }
            BinaryOperatorClass::Additive
            | BinaryOperatorClass::Multiplicative
            | BinaryOperatorClass::Shift
            | BinaryOperatorClass::Bitwise => TypeId::NUMBER,
            BinaryOperatorClass::Relational | BinaryOperatorClass::Equality => TypeId::BOOLEAN,
            BinaryOperatorClass::Logical | BinaryOperatorClass::Coalesce => {
                self.type_of_alternatives(env, left, right)
            }
        }
    }

    /// `+`: numeric when both sides are, `union{number,string}` when either
    /// side is unknown or both may be numeric, `string` otherwise.
    fn type_of_addition(&self, env: &Environment, left: TypeId, right: TypeId) -> TypeId {
        let left_unknown = left.is_unknown();
        let right_unknown = right.is_unknown();
        let number_or_string = || {
            self.simplifier()
                .create_union(env, &[TypeId::NUMBER, TypeId::STRING])
        };
        if left_unknown && right_unknown {
            return number_or_string();
        }
        let left_numeric = self.is_numeric_operand(left, 0);
        let right_numeric = self.is_numeric_operand(right, 0);
        if left_numeric && right_numeric {
            return TypeId::NUMBER;
        }
        if (left_unknown && right_numeric) || (right_unknown && left_numeric) {
            return number_or_string();
        }
        if self.may_be_numeric(left) && self.may_be_numeric(right) {
            return number_or_string();
        }
        TypeId::STRING
    }

    /// `number`, a numeric literal, a number-based enum or one of its
    /// literals, through bounds and intersections.
    fn is_numeric_operand(&self, ty: TypeId, depth: u32) -> bool {
        if depth > MAX_OPERAND_BOUND_DEPTH {
            return false;
        }
        let db = self.db;
        let is_number_based = |def: DefId| {
            db.def(def)
                .is_some_and(|info| info.enum_kind() == Some(EnumKind::NumberBased))
        };
        match db.lookup(ty) {
            TypeData::Intrinsic(_) => ty == TypeId::NUMBER,
            TypeData::Literal(LiteralValue::Number(_)) => true,
            TypeData::Literal(LiteralValue::EnumLiteral { enum_def, .. }) => {
                is_number_based(enum_def)
            }
            TypeData::Nominal(app) => is_number_based(app.def),
            TypeData::Intersection(members) => members
                .iter()
                .any(|&m| self.is_numeric_operand(m, depth + 1)),
            TypeData::TypeVariable(def) => {
                self.is_numeric_operand(db.type_variable_bound(def), depth + 1)
            }
            TypeData::Wildcard { .. } | TypeData::This(Some(_)) => {
                let upper = db.upper_bound(ty);
                upper != ty && self.is_numeric_operand(upper, depth + 1)
            }
            _ => false,
        }
    }

    fn may_be_numeric(&self, ty: TypeId) -> bool {
        if ty.is_any() || ty == TypeId::SYMBOL || self.is_numeric_operand(ty, 0) {
            return true;
        }
        self.types()
            .union_members(ty)
            .is_some_and(|members| members.iter().any(|&m| self.is_numeric_operand(m, 0)))
    }

    /// `a || b`, `a && b`, `a ?? b` and `c ? a : b`: the union of both sides,
    /// except that `[]` next to an array is just the array.
    pub(crate) fn type_of_alternatives(
        &self,
        env: &Environment,
        first: NodeIndex,
        second: NodeIndex,
    ) -> TypeId {
        let first_type = self.infer_node(env, first);
        let second_type = self.infer_node(env, second);
        if self.is_empty_array_literal(first) && self.db.array_element(second_type).is_some() {
            return second_type;
        }
        if self.is_empty_array_literal(second) && self.db.array_element(first_type).is_some() {
            return first_type;
        }
        self.simplifier().create_union(env, &[first_type, second_type])
    }

    pub(crate) fn type_of_assignment(
        &self,
        env: &Environment,
        op: AssignmentOperator,
        left: NodeIndex,
        right: NodeIndex,
    ) -> TypeId {
        match op {
            AssignmentOperator::Assign => self.infer_node(env, right),
            AssignmentOperator::AddAssign => {
                let left_type = self.infer_node(env, left);
                let right_type = self.infer_node(env, right);
                let numeric_like =
                    |ty: TypeId| ty == TypeId::BOOLEAN || self.is_numeric_operand(ty, 0);
                let both_numeric = numeric_like(left_type) && numeric_like(right_type);
                let nullish_and_numeric = (left_type.is_nullish() && numeric_like(right_type))
                    || (right_type.is_nullish() && numeric_like(left_type));
                if both_numeric || nullish_and_numeric {
                    TypeId::NUMBER
                } else {
                    TypeId::STRING
                }
            }
            AssignmentOperator::SubtractAssign
            | AssignmentOperator::MultiplyAssign
            | AssignmentOperator::DivideAssign
            | AssignmentOperator::ModuloAssign
            | AssignmentOperator::ShiftLeftAssign
            | AssignmentOperator::ShiftRightAssign
            | AssignmentOperator::UnsignedShiftRightAssign
            | AssignmentOperator::BitwiseAndAssign
            | AssignmentOperator::BitwiseOrAssign
            | AssignmentOperator::BitwiseXorAssign => TypeId::NUMBER,
        }
    }
}

#[cfg(test)]
#[path = "../tests/operators_tests.rs"]
mod tests;
