use super::*;
use crate::test_fixtures::Program;
use gts_solver::{DefKind, DefinitionInfo, ParamInfo, Variance};

/// `function <name><T>(t: T): T`
fn identity_function(p: &Program, name: &str) -> DefId {
    let t = p.defs.register(DefinitionInfo::type_variable(
        p.atom("T"),
        None,
        Variance::Invariant,
    ));
    let t_type = p.types.type_variable(t);
    let mut shape = FunctionShape::new(vec![ParamInfo::required(p.atom("t"), t_type)], t_type);
    shape.type_params = vec![t];
    let signature = p.types.function(shape);
    p.defs.register(
        DefinitionInfo::new(DefKind::Function, p.atom(name))
            .with_type_params(vec![t])
            .with_declared_type(signature),
    )
}

/// `function read(path: string, callback: (err: Error, data: string) => void)`,
/// flagged promisifiable.
fn callback_function(p: &Program) -> DefId {
    let def = p.declare(DefKind::Function, "read", DefFlags::PROMISIFIABLE);
    let callback = p.function_type(&[p.builtins.error_type, TypeId::STRING], TypeId::VOID);
    let mut shape = FunctionShape::new(
        vec![
            ParamInfo::required(p.atom("path"), TypeId::STRING),
            ParamInfo::required(p.atom("callback"), callback),
        ],
        TypeId::VOID,
    );
    shape.def = Some(def);
    let signature = p.types.function(shape);
    p.defs.update(def, |info| info.declared_type = Some(signature));
    def
}

// =============================================================================
// Calls
// =============================================================================

#[test]
fn test_call_returns_signature_return_type() {
    let mut p = Program::new();
    let signature = p.function_type(&[TypeId::NUMBER], TypeId::STRING);
    let (f, _) = p.variable("f", Some(signature), NodeIndex::NONE);
    let callee = p.ident(f);
    let arg = p.num(1);
    let call = p.call(callee, vec![arg]);

    assert_eq!(p.infer(call), TypeId::STRING);
}

#[test]
fn test_call_of_non_callable_or_open_callee() {
    let mut p = Program::new();
    let (n, _) = p.variable("n", Some(TypeId::NUMBER), NodeIndex::NONE);
    let callee = p.ident(n);
    let not_callable = p.call(callee, Vec::new());

    let dynamic = p.declare(DefKind::Dynamic, "d", DefFlags::empty());
    let callee = p.ident(dynamic);
    let dynamic_call = p.call(callee, Vec::new());

    let (g, _) = p.variable("g", Some(p.builtins.function_type), NodeIndex::NONE);
    let callee = p.ident(g);
    let function_call = p.call(callee, Vec::new());

    let callee = p.unresolved("nowhere");
    let broken = p.call(callee, Vec::new());

    assert_eq!(p.infer(not_callable), TypeId::UNKNOWN);
    assert_eq!(p.type_of(dynamic_call), "any+");
    assert_eq!(p.infer(function_call), TypeId::ANY);
    assert_eq!(p.infer(broken), TypeId::UNKNOWN);
}

#[test]
fn test_generic_call_infers_widened_type_argument() {
    let mut p = Program::new();
    let id = identity_function(&p, "id");
    let callee = p.ident(id);
    let arg = p.string("s");
    let call = p.call(callee, vec![arg]);

    assert_eq!(p.infer(call), TypeId::STRING);
}

#[test]
fn test_generic_call_with_explicit_type_argument() {
    let mut p = Program::new();
    let id = identity_function(&p, "id");
    let callee = p.ident(id);
    let arg = p.num(1);
    let call = p.add(NodeData::Call {
        target: callee,
        type_args: vec![TypeId::BOOLEAN],
        args: vec![arg],
    });

    assert_eq!(p.infer(call), TypeId::BOOLEAN);
}

#[test]
fn test_bound_this_survives_only_this_receivers() {
    let mut p = Program::new();
    let (c_def, c) = p.class("C", None);
    let returns_this = p.function_type(&[], p.types.this_type(None));
    let m = p.member(c_def, DefKind::Method, "m", returns_this, DefFlags::empty());

    // class C { m(): this; n() { this.m(); } }
    let this = p.add(NodeData::This);
    let access = p.access(this, "m", Some(m));
    let on_this = p.call(access, Vec::new());
    let statement = p.statement(on_this);
    let signature = p.function_type(&[], TypeId::VOID);
    let n = p.member(c_def, DefKind::Method, "n", signature, DefFlags::empty());
    let n_node = p.method_node(n, false, false, vec![statement]);
    p.class_node(c_def, vec![n_node]);

    // x.m() with x: C
    let (x, _) = p.variable("x", Some(c), NodeIndex::NONE);
    let receiver = p.ident(x);
    let access = p.access(receiver, "m", Some(m));
    let on_variable = p.call(access, Vec::new());

    assert_eq!(p.type_of(on_this), "this[C]");
    assert_eq!(p.infer(on_variable), c);
}

// =============================================================================
// new
// =============================================================================

#[test]
fn test_new_instantiates_class() {
    let mut p = Program::new();
    let (c_def, c) = p.class("C", None);
    let callee = p.ident(c_def);
    let new = p.add(NodeData::New {
        callee,
        type_args: Vec::new(),
        args: Vec::new(),
    });

    let (n, _) = p.variable("n", Some(TypeId::NUMBER), NodeIndex::NONE);
    let callee = p.ident(n);
    let not_constructible = p.add(NodeData::New {
        callee,
        type_args: Vec::new(),
        args: Vec::new(),
    });

    assert_eq!(p.infer(new), c);
    assert_eq!(p.infer(not_constructible), TypeId::UNKNOWN);
}

#[test]
fn test_new_generic_class() {
    let mut p = Program::new();
    let (g_def, _) = p.generic_class("G", &["T"]);
    let callee = p.ident(g_def);
    let explicit = p.add(NodeData::New {
        callee,
        type_args: vec![TypeId::NUMBER],
        args: Vec::new(),
    });
    let callee = p.ident(g_def);
    let inferred = p.add(NodeData::New {
        callee,
        type_args: Vec::new(),
        args: Vec::new(),
    });

    assert_eq!(p.type_of(explicit), "G<number>");
    // No argument constrains T: it falls back to its bound.
    assert_eq!(p.type_of(inferred), "G<any>");
}

#[test]
fn test_new_on_dynamic_callee() {
    let mut p = Program::new();
    let dynamic = p.declare(DefKind::Dynamic, "D", DefFlags::empty());
    let callee = p.ident(dynamic);
    let new = p.add(NodeData::New {
        callee,
        type_args: Vec::new(),
        args: Vec::new(),
    });

    assert_eq!(p.infer(new), TypeId::DYNAMIC_ANY);
}

// =============================================================================
// await and yield
// =============================================================================

#[test]
fn test_await_unwraps_promises() {
    let mut p = Program::new();
    let promise = p.builtins.promise_of(&p.types, TypeId::NUMBER, TypeId::UNDEFINED);
    let (pending, _) = p.variable("pending", Some(promise), NodeIndex::NONE);
    let expression = p.ident(pending);
    let awaited = p.add(NodeData::Await { expression });

    let (n, _) = p.variable("n", Some(TypeId::STRING), NodeIndex::NONE);
    let expression = p.ident(n);
    let plain = p.add(NodeData::Await { expression });

    assert_eq!(p.infer(awaited), TypeId::NUMBER);
    assert_eq!(p.infer(plain), TypeId::STRING);
}

#[test]
fn test_await_promisifies_callback_functions() {
    let mut p = Program::new();
    let read = callback_function(&p);
    let callee = p.ident(read);
    let path = p.string("a.txt");
    let call = p.call(callee, vec![path]);
    let awaited = p.add(NodeData::Await { expression: call });

    let callee = p.ident(read);
    let path = p.string("b.txt");
    let plain_call = p.call(callee, vec![path]);

    assert_eq!(p.infer(awaited), TypeId::STRING);
    assert_eq!(p.type_of(call), "Promise<string,Error>");
    assert_eq!(p.infer(plain_call), TypeId::VOID);
}

/// `function* g(): <declared> { <yield> }`
fn generator_function(p: &mut Program, declared: TypeId, yield_node: NodeIndex) {
    let signature = p.function_type(&[], declared);
    let def = p.defs.register(
        DefinitionInfo::new(DefKind::Function, p.atom("g"))
            .with_flags(DefFlags::GENERATOR)
            .with_declared_type(signature),
    );
    let statement = p.statement(yield_node);
    let node = p.add(NodeData::Function {
        def: Some(def),
        is_expression: false,
        is_arrow: false,
        params: Vec::new(),
        body: vec![statement],
    });
    p.attach(def, node);
}

#[test]
fn test_yield_types() {
    let mut p = Program::new();
    let generator = p.builtins.generator;
    let delegated_type = p
        .types
        .nominal(generator, vec![TypeId::STRING, TypeId::NUMBER, TypeId::BOOLEAN]);
    let (inner, _) = p.variable("inner", Some(delegated_type), NodeIndex::NONE);
    let expression = p.ident(inner);
    let delegate = p.add(NodeData::Yield {
        expression,
        is_delegate: true,
    });
    let (n, _) = p.variable("n", Some(TypeId::NUMBER), NodeIndex::NONE);
    let expression = p.ident(n);
    let delegate_to_number = p.add(NodeData::Yield {
        expression,
        is_delegate: true,
    });

    let plain = p.add(NodeData::Yield {
        expression: NodeIndex::NONE,
        is_delegate: false,
    });
    let declared = p
        .types
        .nominal(generator, vec![TypeId::STRING, TypeId::VOID, TypeId::NUMBER]);
    generator_function(&mut p, declared, plain);

    let undeclared = p.add(NodeData::Yield {
        expression: NodeIndex::NONE,
        is_delegate: false,
    });

    assert_eq!(p.infer(delegate), TypeId::NUMBER);
    assert_eq!(p.infer(delegate_to_number), TypeId::ANY);
    assert_eq!(p.infer(plain), TypeId::NUMBER);
    assert_eq!(p.infer(undeclared), TypeId::ANY);
}
