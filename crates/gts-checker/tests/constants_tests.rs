use super::*;
use crate::test_fixtures::Program;
use gts_solver::{DefFlags, TypeId};

fn evaluate(p: &Program, expression: NodeIndex) -> Option<ConstValue> {
    ConstantEvaluator::new(p.db(), &p.arena).evaluate(expression)
}

fn add(p: &mut Program, left: NodeIndex, right: NodeIndex) -> NodeIndex {
    p.add(NodeData::Binary {
        op: BinaryOperator::Add,
        left,
        right,
    })
}

fn string(text: &str) -> Option<ConstValue> {
    Some(ConstValue::String(text.into()))
}

#[test]
fn test_literals() {
    let mut p = Program::new();
    let number = p.num(3);
    let text = p.string("key");
    let flag = p.boolean(false);
    let null = p.add(NodeData::NullLiteral);

    assert_eq!(evaluate(&p, number), Some(ConstValue::Number(Decimal::from(3))));
    assert_eq!(evaluate(&p, text), string("key"));
    assert_eq!(evaluate(&p, flag), Some(ConstValue::Boolean(false)));
    assert_eq!(evaluate(&p, null), None);
    assert_eq!(evaluate(&p, NodeIndex::NONE), None);
}

#[test]
fn test_signs() {
    let mut p = Program::new();
    let value = p.add(NodeData::NumericLiteral(Decimal::new(15, 1)));
    let wrapped = p.paren(value);
    let negated = p.add(NodeData::Unary {
        op: UnaryOperator::Minus,
        operand: wrapped,
    });
    let text = p.string("a");
    let signed_text = p.add(NodeData::Unary {
        op: UnaryOperator::Plus,
        operand: text,
    });
    let operand = p.num(1);
    let not = p.add(NodeData::Unary {
        op: UnaryOperator::Not,
        operand,
    });

    assert_eq!(evaluate(&p, negated), Some(ConstValue::Number(Decimal::new(-15, 1))));
    assert_eq!(evaluate(&p, signed_text), None);
    assert_eq!(evaluate(&p, not), None);
}

#[test]
fn test_addition() {
    let mut p = Program::new();
    let one = p.num(1);
    let two = p.num(2);
    let sum = add(&mut p, one, two);
    let prefix = p.string("item");
    let index = p.num(7);
    let concat = add(&mut p, prefix, index);
    let yes = p.boolean(true);
    let one = p.num(1);
    let mixed = add(&mut p, yes, one);

    assert_eq!(evaluate(&p, sum), Some(ConstValue::Number(Decimal::from(3))));
    assert_eq!(evaluate(&p, concat), string("item7"));
    assert_eq!(evaluate(&p, mixed), None);
}

#[test]
fn test_templates() {
    let mut p = Program::new();
    let first = p.atom("a");
    let first = p.add(NodeData::TemplateSegment(first));
    let second = p.atom("b");
    let second = p.add(NodeData::TemplateSegment(second));
    let plain = p.add(NodeData::TemplateLiteral {
        parts: vec![first, second],
    });
    let head = p.atom("x");
    let head = p.add(NodeData::TemplateSegment(head));
    let embedded = p.num(1);
    let substituting = p.add(NodeData::TemplateLiteral {
        parts: vec![head, embedded],
    });

    assert_eq!(evaluate(&p, plain), string("ab"));
    assert_eq!(evaluate(&p, substituting), None);
}

#[test]
fn test_constant_references() {
    let mut p = Program::new();
    // const KEY = "k"; const LABEL = KEY + "!"; var loose = "v";
    let value = p.string("k");
    let (key, _) = p.constant("KEY", value);
    let key_ref = p.ident(key);
    let bang = p.string("!");
    let label_init = add(&mut p, key_ref, bang);
    let (label, _) = p.constant("LABEL", label_init);
    let value = p.string("v");
    let (loose, _) = p.variable("loose", None, value);

    let label_ref = p.ident(label);
    let loose_ref = p.ident(loose);
    let unresolved = p.unresolved("nowhere");

    assert_eq!(evaluate(&p, label_ref), string("k!"));
    assert_eq!(evaluate(&p, loose_ref), None);
    assert_eq!(evaluate(&p, unresolved), None);
}

#[test]
fn test_constant_fields() {
    let mut p = Program::new();
    let (owner, _) = p.class("C", None);
    let field = p.member(owner, DefKind::Field, "SIZE", TypeId::NUMBER, DefFlags::CONST);
    let initializer = p.num(4);
    let node = p.add(NodeData::Field {
        def: Some(field),
        declared_type: Some(TypeId::NUMBER),
        initializer,
        is_static: true,
        is_immutable: true,
    });
    p.attach(field, node);
    let reference = p.ident(field);

    assert_eq!(evaluate(&p, reference), Some(ConstValue::Number(Decimal::from(4))));
}

#[test]
fn test_reference_cycles_have_no_value() {
    let mut p = Program::new();
    let a = p.declare(DefKind::Variable, "a", DefFlags::CONST);
    let b = p.declare(DefKind::Variable, "b", DefFlags::CONST);
    for (def, other) in [(a, b), (b, a)] {
        let initializer = p.ident(other);
        let node = p.add(NodeData::Variable {
            def: Some(def),
            declared_type: None,
            initializer,
            is_immutable: true,
        });
        p.attach(def, node);
    }
    let reference = p.ident(a);

    assert_eq!(evaluate(&p, reference), None);
}

#[test]
fn test_repeated_reference_is_not_a_cycle() {
    let mut p = Program::new();
    let value = p.num(2);
    let (two, _) = p.constant("TWO", value);
    let left = p.ident(two);
    let right = p.ident(two);
    let doubled = add(&mut p, left, right);

    assert_eq!(evaluate(&p, doubled), Some(ConstValue::Number(Decimal::from(4))));
}

#[test]
fn test_property_names() {
    assert_eq!(ConstValue::Number(Decimal::new(150, 2)).property_name(), "1.5");
    assert_eq!(ConstValue::Number(Decimal::from(-3)).property_name(), "-3");
    assert_eq!(ConstValue::Boolean(true).property_name(), "true");
    assert_eq!(ConstValue::String("a b".into()).property_name(), "a b");
}
