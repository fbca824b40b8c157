//! Behavioural tests for the evaluator.
//!
//! The engine consumes pre-parsed trees, so each scenario is built with
//! the small node constructors at the top of the module; the JavaScript
//! each test encodes is quoted in a comment above it.

use crate::ast::*;
use crate::error::{Completion, Error};
use crate::exec::{Interpreter, Options};
use crate::host::HostObject;
use crate::value::Value;
use std::cell::Cell;
use std::rc::Rc;

// === node constructors =================================================

pub(crate) fn program(body: Vec<Statement>) -> Program {
    Program {
        body,
        directives: Vec::new(),
    }
}

fn num(value: f64) -> Expression {
    Expression::NumericLiteral(NumericLiteral { value })
}

fn str_lit(value: &str) -> Expression {
    Expression::StringLiteral(StringLiteral {
        value: value.to_owned(),
    })
}

fn bool_lit(value: bool) -> Expression {
    Expression::BooleanLiteral(BooleanLiteral { value })
}

fn ident(name: &str) -> Expression {
    Expression::Identifier(Identifier::new(name))
}

fn expr_stmt(expression: Expression) -> Statement {
    Statement::ExpressionStatement(ExpressionStatement { expression })
}

fn binary(operator: BinaryOp, left: Expression, right: Expression) -> Expression {
    Expression::BinaryExpression(BinaryExpression {
        operator,
        left: Box::new(left),
        right: Box::new(right),
    })
}

fn logical(operator: LogicalOp, left: Expression, right: Expression) -> Expression {
    Expression::LogicalExpression(LogicalExpression {
        operator,
        left: Box::new(left),
        right: Box::new(right),
    })
}

fn unary(operator: UnaryOp, argument: Expression) -> Expression {
    Expression::UnaryExpression(UnaryExpression {
        operator,
        argument: Box::new(argument),
    })
}

fn update(operator: UpdateOp, prefix: bool, argument: Expression) -> Expression {
    Expression::UpdateExpression(UpdateExpression {
        operator,
        prefix,
        argument: Box::new(argument),
    })
}

fn assign(left: Expression, right: Expression) -> Expression {
    Expression::AssignmentExpression(AssignmentExpression {
        operator: AssignOp::Assign,
        left: Box::new(left),
        right: Box::new(right),
    })
}

fn compound(operator: AssignOp, left: Expression, right: Expression) -> Expression {
    Expression::AssignmentExpression(AssignmentExpression {
        operator,
        left: Box::new(left),
        right: Box::new(right),
    })
}

fn member(object: Expression, name: &str) -> Expression {
    Expression::MemberExpression(MemberExpression {
        object: Box::new(object),
        property: Box::new(ident(name)),
        computed: false,
    })
}

fn index(object: Expression, key: Expression) -> Expression {
    Expression::MemberExpression(MemberExpression {
        object: Box::new(object),
        property: Box::new(key),
        computed: true,
    })
}

fn call(callee: Expression, arguments: Vec<Expression>) -> Expression {
    Expression::CallExpression(CallExpression {
        callee: Box::new(callee),
        arguments,
    })
}

fn new_expr(callee: Expression, arguments: Vec<Expression>) -> Expression {
    Expression::NewExpression(NewExpression {
        callee: Box::new(callee),
        arguments,
    })
}

fn array(elements: Vec<Expression>) -> Expression {
    Expression::ArrayExpression(ArrayExpression {
        elements: elements.into_iter().map(Some).collect(),
    })
}

fn object_lit(entries: Vec<(&str, Expression)>) -> Expression {
    Expression::ObjectExpression(ObjectExpression {
        properties: entries
            .into_iter()
            .map(|(key, value)| {
                ObjectMember::ObjectProperty(ObjectProperty {
                    key: ident(key),
                    value,
                    computed: false,
                })
            })
            .collect(),
    })
}

fn cond(test: Expression, consequent: Expression, alternate: Expression) -> Expression {
    Expression::ConditionalExpression(ConditionalExpression {
        test: Box::new(test),
        consequent: Box::new(consequent),
        alternate: Box::new(alternate),
    })
}

fn seq(expressions: Vec<Expression>) -> Expression {
    Expression::SequenceExpression(SequenceExpression { expressions })
}

fn params(names: &[&str]) -> Vec<Identifier> {
    names.iter().map(|name| Identifier::new(*name)).collect()
}

fn block(body: Vec<Statement>) -> BlockStatement {
    BlockStatement {
        body,
        directives: Vec::new(),
    }
}

fn block_stmt(body: Vec<Statement>) -> Statement {
    Statement::BlockStatement(block(body))
}

fn func_decl(name: &str, parameters: &[&str], body: Vec<Statement>) -> Statement {
    Statement::FunctionDeclaration(FunctionDeclaration {
        id: Identifier::new(name),
        params: params(parameters),
        body: block(body),
    })
}

fn func_expr(id: Option<&str>, parameters: &[&str], body: Vec<Statement>) -> Expression {
    Expression::FunctionExpression(FunctionExpression {
        id: id.map(Identifier::new),
        params: params(parameters),
        body: block(body),
    })
}

fn arrow(parameters: &[&str], body: Expression) -> Expression {
    Expression::ArrowFunctionExpression(ArrowFunctionExpression {
        params: params(parameters),
        body: FunctionBody::Expression(Box::new(body)),
    })
}

fn declaration(kind: DeclarationKind, name: &str, init: Option<Expression>) -> Statement {
    Statement::VariableDeclaration(VariableDeclaration {
        kind,
        declarations: vec![VariableDeclarator {
            id: Identifier::new(name),
            init,
        }],
    })
}

fn var_stmt(name: &str, init: Option<Expression>) -> Statement {
    declaration(DeclarationKind::Var, name, init)
}

fn let_stmt(name: &str, init: Option<Expression>) -> Statement {
    declaration(DeclarationKind::Let, name, init)
}

fn ret(argument: Option<Expression>) -> Statement {
    Statement::ReturnStatement(ReturnStatement { argument })
}

fn brk(label: Option<&str>) -> Statement {
    Statement::BreakStatement(BreakStatement {
        label: label.map(Identifier::new),
    })
}

fn cont(label: Option<&str>) -> Statement {
    Statement::ContinueStatement(ContinueStatement {
        label: label.map(Identifier::new),
    })
}

fn throw_stmt(argument: Expression) -> Statement {
    Statement::ThrowStatement(ThrowStatement { argument })
}

fn if_stmt(test: Expression, consequent: Statement) -> Statement {
    Statement::IfStatement(IfStatement {
        test,
        consequent: Box::new(consequent),
        alternate: None,
    })
}

fn while_stmt(test: Expression, body: Statement) -> Statement {
    Statement::WhileStatement(WhileStatement {
        test,
        body: Box::new(body),
    })
}

fn for_stmt(
    init: Option<ForInit>,
    test: Option<Expression>,
    step: Option<Expression>,
    body: Statement,
) -> Statement {
    Statement::ForStatement(ForStatement {
        init,
        test,
        update: step,
        body: Box::new(body),
    })
}

fn for_var(name: &str, start: f64) -> Option<ForInit> {
    match var_stmt(name, Some(num(start))) {
        Statement::VariableDeclaration(decl) => Some(ForInit::VariableDeclaration(decl)),
        _ => unreachable!(),
    }
}

fn for_in(name: &str, right: Expression, body: Statement) -> Statement {
    let left = match var_stmt(name, None) {
        Statement::VariableDeclaration(decl) => ForInTarget::VariableDeclaration(decl),
        _ => unreachable!(),
    };
    Statement::ForInStatement(ForInStatement {
        left,
        right,
        body: Box::new(body),
    })
}

fn labeled(label: &str, body: Statement) -> Statement {
    Statement::LabeledStatement(LabeledStatement {
        label: Identifier::new(label),
        body: Box::new(body),
    })
}

fn try_stmt(
    body: Vec<Statement>,
    handler: Option<(Option<&str>, Vec<Statement>)>,
    finalizer: Option<Vec<Statement>>,
) -> Statement {
    Statement::TryStatement(TryStatement {
        block: block(body),
        handler: handler.map(|(param, statements)| CatchClause {
            param: param.map(Identifier::new),
            body: block(statements),
        }),
        finalizer: finalizer.map(block),
    })
}

fn switch_case(test: Option<Expression>, consequent: Vec<Statement>) -> SwitchCase {
    SwitchCase { test, consequent }
}

fn switch_stmt(discriminant: Expression, cases: Vec<SwitchCase>) -> Statement {
    Statement::SwitchStatement(SwitchStatement {
        discriminant,
        cases,
    })
}

// === harness ===========================================================

fn eval_program(body: Vec<Statement>) -> Value {
    Interpreter::default()
        .evaluate(&program(body))
        .expect("evaluation failed")
}

fn eval_error(body: Vec<Statement>) -> Error {
    Interpreter::default()
        .evaluate(&program(body))
        .expect_err("evaluation unexpectedly succeeded")
}

// === expressions and operators =========================================

#[test]
fn arithmetic_precedence_is_the_trees_business() {
    // 2 + 3 * 4
    let result = eval_program(vec![expr_stmt(binary(
        BinaryOp::Add,
        num(2.0),
        binary(BinaryOp::Mul, num(3.0), num(4.0)),
    ))]);
    assert_eq!(result.to_number(), 14.0);
}

#[test]
fn string_concatenation_wins_over_addition() {
    // "n=" + 4
    let result = eval_program(vec![expr_stmt(binary(
        BinaryOp::Add,
        str_lit("n="),
        num(4.0),
    ))]);
    assert_eq!(result.to_js_string(), "n=4");
}

#[test]
fn loose_equality_behaves_strictly() {
    // "1" == 1
    let result = eval_program(vec![expr_stmt(binary(
        BinaryOp::Equal,
        str_lit("1"),
        num(1.0),
    ))]);
    assert!(!result.to_boolean());
}

#[test]
fn comparison_coerces_numbers_unless_both_strings() {
    // "10" > "9" (lexicographic: false), "10" > 9 (numeric: true)
    let lexicographic = eval_program(vec![expr_stmt(binary(
        BinaryOp::GreaterThan,
        str_lit("10"),
        str_lit("9"),
    ))]);
    assert!(!lexicographic.to_boolean());

    let numeric = eval_program(vec![expr_stmt(binary(
        BinaryOp::GreaterThan,
        str_lit("10"),
        num(9.0),
    ))]);
    assert!(numeric.to_boolean());
}

#[test]
fn bitwise_and_shift_operators() {
    // (5 & 3) | (1 << 4) ^ (-1 >>> 28)
    let and = eval_program(vec![expr_stmt(binary(BinaryOp::And, num(5.0), num(3.0)))]);
    assert_eq!(and.to_number(), 1.0);

    let shift = eval_program(vec![expr_stmt(binary(BinaryOp::Shl, num(1.0), num(4.0)))]);
    assert_eq!(shift.to_number(), 16.0);

    let ushr = eval_program(vec![expr_stmt(binary(
        BinaryOp::UShr,
        unary(UnaryOp::Minus, num(1.0)),
        num(28.0),
    ))]);
    assert_eq!(ushr.to_number(), 15.0);
}

#[test]
fn logical_operators_return_the_deciding_operand() {
    // 0 || "fallback"
    let or = eval_program(vec![expr_stmt(logical(
        LogicalOp::Or,
        num(0.0),
        str_lit("fallback"),
    ))]);
    assert_eq!(or.to_js_string(), "fallback");

    // "left" && 42
    let and = eval_program(vec![expr_stmt(logical(
        LogicalOp::And,
        str_lit("left"),
        num(42.0),
    ))]);
    assert_eq!(and.to_number(), 42.0);
}

#[test]
fn logical_and_short_circuits() {
    // var hits = 0; function bump(){ hits++; return true; }
    // false && bump(); hits
    let result = eval_program(vec![
        var_stmt("hits", Some(num(0.0))),
        func_decl(
            "bump",
            &[],
            vec![
                expr_stmt(update(UpdateOp::Increment, false, ident("hits"))),
                ret(Some(bool_lit(true))),
            ],
        ),
        expr_stmt(logical(LogicalOp::And, bool_lit(false), call(ident("bump"), vec![]))),
        expr_stmt(ident("hits")),
    ]);
    assert_eq!(result.to_number(), 0.0);
}

#[test]
fn conditional_evaluates_exactly_one_branch() {
    // var trace = ""; true ? trace += "a" : trace += "b"; trace
    let result = eval_program(vec![
        var_stmt("trace", Some(str_lit(""))),
        expr_stmt(cond(
            bool_lit(true),
            compound(AssignOp::Add, ident("trace"), str_lit("a")),
            compound(AssignOp::Add, ident("trace"), str_lit("b")),
        )),
        expr_stmt(ident("trace")),
    ]);
    assert_eq!(result.to_js_string(), "a");
}

#[test]
fn sequence_yields_the_last_value() {
    // (1, 2, 3)
    let result = eval_program(vec![expr_stmt(seq(vec![num(1.0), num(2.0), num(3.0)]))]);
    assert_eq!(result.to_number(), 3.0);
}

#[test]
fn update_expressions_prefix_and_postfix() {
    // var x = 5; [x++, x, ++x, x]
    let result = eval_program(vec![
        var_stmt("x", Some(num(5.0))),
        expr_stmt(call(
            member(
                array(vec![
                    update(UpdateOp::Increment, false, ident("x")),
                    ident("x"),
                    update(UpdateOp::Increment, true, ident("x")),
                    ident("x"),
                ]),
                "join",
            ),
            vec![str_lit(",")],
        )),
    ]);
    assert_eq!(result.to_js_string(), "5,6,7,7");
}

#[test]
fn update_coerces_strings_to_numbers() {
    // var x = "5"; x++; x
    let result = eval_program(vec![
        var_stmt("x", Some(str_lit("5"))),
        expr_stmt(update(UpdateOp::Increment, false, ident("x"))),
        expr_stmt(ident("x")),
    ]);
    assert_eq!(result.to_number(), 6.0);
}

#[test]
fn compound_assignment_on_members() {
    // var o = { n: 10 }; o.n += 5; o.n
    let result = eval_program(vec![
        var_stmt("o", Some(object_lit(vec![("n", num(10.0))]))),
        expr_stmt(compound(AssignOp::Add, member(ident("o"), "n"), num(5.0))),
        expr_stmt(member(ident("o"), "n")),
    ]);
    assert_eq!(result.to_number(), 15.0);
}

#[test]
fn typeof_reports_standard_tags() {
    let tags = vec![
        (num(1.0), "number"),
        (str_lit("s"), "string"),
        (bool_lit(true), "boolean"),
        (Expression::NullLiteral, "object"),
        (object_lit(vec![]), "object"),
        (func_expr(None, &[], vec![]), "function"),
        (ident("undefined"), "undefined"),
    ];
    for (expression, expected) in tags {
        let result = eval_program(vec![expr_stmt(unary(UnaryOp::TypeOf, expression))]);
        assert_eq!(result.to_js_string(), expected);
    }
}

#[test]
fn typeof_undeclared_is_undefined_not_an_error() {
    // typeof missing
    let result = eval_program(vec![expr_stmt(unary(UnaryOp::TypeOf, ident("missing")))]);
    assert_eq!(result.to_js_string(), "undefined");
}

#[test]
fn delete_removes_properties_and_in_observes_it() {
    // var o = { a: 1 }; delete o.a; "a" in o
    let result = eval_program(vec![
        var_stmt("o", Some(object_lit(vec![("a", num(1.0))]))),
        expr_stmt(unary(UnaryOp::Delete, member(ident("o"), "a"))),
        expr_stmt(binary(BinaryOp::In, str_lit("a"), ident("o"))),
    ]);
    assert!(!result.to_boolean());
}

#[test]
fn in_walks_the_prototype_chain() {
    // "hasOwnProperty" in {}
    let result = eval_program(vec![expr_stmt(binary(
        BinaryOp::In,
        str_lit("hasOwnProperty"),
        object_lit(vec![]),
    ))]);
    assert!(result.to_boolean());
}

// === variables, scope and hoisting =====================================

#[test]
fn var_access_before_initializer_is_undefined() {
    // typeof x + "," + (x === undefined) ... then x = 7 later
    let result = eval_program(vec![
        expr_stmt(binary(
            BinaryOp::StrictEqual,
            ident("x"),
            ident("undefined"),
        )),
        var_stmt("x", Some(num(7.0))),
    ]);
    assert!(result.to_boolean());
}

#[test]
fn function_declarations_hoist_above_their_position() {
    // var early = f(); function f(){ return 3; } early
    let result = eval_program(vec![
        var_stmt("early", Some(call(ident("f"), vec![]))),
        func_decl("f", &[], vec![ret(Some(num(3.0)))]),
        expr_stmt(ident("early")),
    ]);
    assert_eq!(result.to_number(), 3.0);
}

#[test]
fn var_leaks_out_of_blocks_let_does_not() {
    // { var a = 1; let b = 2; } [typeof a, typeof b]
    let result = eval_program(vec![
        block_stmt(vec![
            var_stmt("a", Some(num(1.0))),
            let_stmt("b", Some(num(2.0))),
        ]),
        expr_stmt(binary(
            BinaryOp::Add,
            unary(UnaryOp::TypeOf, ident("a")),
            unary(UnaryOp::TypeOf, ident("b")),
        )),
    ]);
    assert_eq!(result.to_js_string(), "numberundefined");
}

#[test]
fn assignment_to_undeclared_lands_in_the_originating_frame() {
    // var seen; { ghost = 1; seen = typeof ghost; } seen + "," + typeof ghost
    let result = eval_program(vec![
        var_stmt("seen", None),
        block_stmt(vec![
            expr_stmt(assign(ident("ghost"), num(1.0))),
            expr_stmt(assign(ident("seen"), unary(UnaryOp::TypeOf, ident("ghost")))),
        ]),
        expr_stmt(binary(
            BinaryOp::Add,
            ident("seen"),
            binary(BinaryOp::Add, str_lit(","), unary(UnaryOp::TypeOf, ident("ghost"))),
        )),
    ]);
    assert_eq!(result.to_js_string(), "number,undefined");
}

#[test]
fn reading_an_unbound_identifier_throws() {
    let error = eval_error(vec![expr_stmt(ident("missing"))]);
    assert_eq!(error.to_string(), "Uncaught Error: missing is not defined");
}

#[test]
fn lexical_closure_observes_later_mutation() {
    // var x = 1; function read(){ return x; } x = 2; read()
    let result = eval_program(vec![
        var_stmt("x", Some(num(1.0))),
        func_decl("read", &[], vec![ret(Some(ident("x")))]),
        expr_stmt(assign(ident("x"), num(2.0))),
        expr_stmt(call(ident("read"), vec![])),
    ]);
    assert_eq!(result.to_number(), 2.0);
}

#[test]
fn closures_capture_their_creation_scope_not_the_call_site() {
    // var mk = function(){ var c = 0; return function(){ return ++c; }; };
    // var f = mk(); f(); f(); f()
    let result = eval_program(vec![
        var_stmt(
            "mk",
            Some(func_expr(
                None,
                &[],
                vec![
                    var_stmt("c", Some(num(0.0))),
                    ret(Some(func_expr(
                        None,
                        &[],
                        vec![ret(Some(update(UpdateOp::Increment, true, ident("c"))))],
                    ))),
                ],
            )),
        ),
        var_stmt("f", Some(call(ident("mk"), vec![]))),
        expr_stmt(call(ident("f"), vec![])),
        expr_stmt(call(ident("f"), vec![])),
        expr_stmt(call(ident("f"), vec![])),
    ]);
    assert_eq!(result.to_number(), 3.0);
}

#[test]
fn two_closures_share_one_captured_frame() {
    // function pair(){ var n = 0; return [function(){n++;}, function(){return n;}]; }
    // var p = pair(); p[0](); p[0](); p[1]()
    let result = eval_program(vec![
        func_decl(
            "pair",
            &[],
            vec![
                var_stmt("n", Some(num(0.0))),
                ret(Some(array(vec![
                    func_expr(
                        None,
                        &[],
                        vec![expr_stmt(update(UpdateOp::Increment, false, ident("n")))],
                    ),
                    func_expr(None, &[], vec![ret(Some(ident("n")))]),
                ]))),
            ],
        ),
        var_stmt("p", Some(call(ident("pair"), vec![]))),
        expr_stmt(call(index(ident("p"), num(0.0)), vec![])),
        expr_stmt(call(index(ident("p"), num(0.0)), vec![])),
        expr_stmt(call(index(ident("p"), num(1.0)), vec![])),
    ]);
    assert_eq!(result.to_number(), 2.0);
}

// === functions =========================================================

#[test]
fn recursion_through_the_global_binding() {
    // function fib(n){ if (n <= 1) return n; return fib(n-1) + fib(n-2); } fib(10)
    let result = eval_program(vec![
        func_decl(
            "fib",
            &["n"],
            vec![
                if_stmt(
                    binary(BinaryOp::LessThanOrEqual, ident("n"), num(1.0)),
                    ret(Some(ident("n"))),
                ),
                ret(Some(binary(
                    BinaryOp::Add,
                    call(ident("fib"), vec![binary(BinaryOp::Sub, ident("n"), num(1.0))]),
                    call(ident("fib"), vec![binary(BinaryOp::Sub, ident("n"), num(2.0))]),
                ))),
            ],
        ),
        expr_stmt(call(ident("fib"), vec![num(10.0)])),
    ]);
    assert_eq!(result.to_number(), 55.0);
}

#[test]
fn named_function_expression_sees_itself() {
    // var f = function fact(n){ return n <= 1 ? 1 : n * fact(n - 1); }; f(5)
    let result = eval_program(vec![
        var_stmt(
            "f",
            Some(func_expr(
                Some("fact"),
                &["n"],
                vec![ret(Some(cond(
                    binary(BinaryOp::LessThanOrEqual, ident("n"), num(1.0)),
                    num(1.0),
                    binary(
                        BinaryOp::Mul,
                        ident("n"),
                        call(ident("fact"), vec![binary(BinaryOp::Sub, ident("n"), num(1.0))]),
                    ),
                )))],
            )),
        ),
        expr_stmt(call(ident("f"), vec![num(5.0)])),
    ]);
    assert_eq!(result.to_number(), 120.0);
}

#[test]
fn missing_arguments_are_undefined() {
    // function f(a, b){ return typeof b; } f(1)
    let result = eval_program(vec![
        func_decl("f", &["a", "b"], vec![ret(Some(unary(UnaryOp::TypeOf, ident("b"))))]),
        expr_stmt(call(ident("f"), vec![num(1.0)])),
    ]);
    assert_eq!(result.to_js_string(), "undefined");
}

#[test]
fn arguments_object_is_an_indexable_sequence() {
    // function f(){ return arguments.length + ":" + arguments[1]; } f(9, 8, 7)
    let result = eval_program(vec![
        func_decl(
            "f",
            &[],
            vec![ret(Some(binary(
                BinaryOp::Add,
                member(ident("arguments"), "length"),
                binary(BinaryOp::Add, str_lit(":"), index(ident("arguments"), num(1.0))),
            )))],
        ),
        expr_stmt(call(ident("f"), vec![num(9.0), num(8.0), num(7.0)])),
    ]);
    assert_eq!(result.to_js_string(), "3:8");
}

#[test]
fn member_calls_bind_this_to_the_receiver() {
    // var o = { v: 41, get: function(){ return this.v; } }; o.get()
    let result = eval_program(vec![
        var_stmt(
            "o",
            Some(object_lit(vec![
                ("v", num(41.0)),
                (
                    "get",
                    func_expr(None, &[], vec![ret(Some(member(Expression::ThisExpression, "v")))]),
                ),
            ])),
        ),
        expr_stmt(call(member(ident("o"), "get"), vec![])),
    ]);
    assert_eq!(result.to_number(), 41.0);
}

#[test]
fn plain_calls_get_undefined_this() {
    // function f(){ return typeof this; } f()
    let result = eval_program(vec![
        func_decl("f", &[], vec![ret(Some(unary(UnaryOp::TypeOf, Expression::ThisExpression)))]),
        expr_stmt(call(ident("f"), vec![])),
    ]);
    assert_eq!(result.to_js_string(), "undefined");
}

#[test]
fn arrows_capture_this_lexically() {
    // var o = { v: 7, get: function(){ var a = () => this.v; return a(); } }; o.get()
    let result = eval_program(vec![
        var_stmt(
            "o",
            Some(object_lit(vec![
                ("v", num(7.0)),
                (
                    "get",
                    func_expr(
                        None,
                        &[],
                        vec![
                            var_stmt("a", Some(arrow(&[], member(Expression::ThisExpression, "v")))),
                            ret(Some(call(ident("a"), vec![]))),
                        ],
                    ),
                ),
            ])),
        ),
        expr_stmt(call(member(ident("o"), "get"), vec![])),
    ]);
    assert_eq!(result.to_number(), 7.0);
}

#[test]
fn call_and_apply_set_the_receiver() {
    // function get(){ return this.v; }
    // get.call({v: 1}) + get.apply({v: 2}, [])
    let result = eval_program(vec![
        func_decl("get", &[], vec![ret(Some(member(Expression::ThisExpression, "v")))]),
        expr_stmt(binary(
            BinaryOp::Add,
            call(member(ident("get"), "call"), vec![object_lit(vec![("v", num(1.0))])]),
            call(
                member(ident("get"), "apply"),
                vec![object_lit(vec![("v", num(2.0))]), array(vec![])],
            ),
        )),
    ]);
    assert_eq!(result.to_number(), 3.0);
}

#[test]
fn bound_functions_forward_with_prepended_args() {
    // function f(a, b, c, d){ return this.t + a + b + c + d; }
    // var g = f.bind({t: 100}, 1, 2); g(3, 4)
    let result = eval_program(vec![
        func_decl(
            "f",
            &["a", "b", "c", "d"],
            vec![ret(Some(binary(
                BinaryOp::Add,
                member(Expression::ThisExpression, "t"),
                binary(
                    BinaryOp::Add,
                    ident("a"),
                    binary(
                        BinaryOp::Add,
                        ident("b"),
                        binary(BinaryOp::Add, ident("c"), ident("d")),
                    ),
                ),
            )))],
        ),
        var_stmt(
            "g",
            Some(call(
                member(ident("f"), "bind"),
                vec![object_lit(vec![("t", num(100.0))]), num(1.0), num(2.0)],
            )),
        ),
        expr_stmt(call(ident("g"), vec![num(3.0), num(4.0)])),
    ]);
    assert_eq!(result.to_number(), 110.0);
}

#[test]
fn binding_a_bound_function_extends_args_but_keeps_this() {
    // function f(a, b){ return this.t + a + b; }
    // var g = f.bind({t: 5}, 1); var h = g.bind({t: 999}, 2); h()
    let result = eval_program(vec![
        func_decl(
            "f",
            &["a", "b"],
            vec![ret(Some(binary(
                BinaryOp::Add,
                member(Expression::ThisExpression, "t"),
                binary(BinaryOp::Add, ident("a"), ident("b")),
            )))],
        ),
        var_stmt(
            "g",
            Some(call(
                member(ident("f"), "bind"),
                vec![object_lit(vec![("t", num(5.0))]), num(1.0)],
            )),
        ),
        var_stmt(
            "h",
            Some(call(
                member(ident("g"), "bind"),
                vec![object_lit(vec![("t", num(999.0))]), num(2.0)],
            )),
        ),
        expr_stmt(call(ident("h"), vec![])),
    ]);
    assert_eq!(result.to_number(), 8.0);
}

#[test]
fn calling_a_non_function_is_an_error() {
    let error = eval_error(vec![
        var_stmt("x", Some(num(4.0))),
        expr_stmt(call(ident("x"), vec![])),
    ]);
    assert_eq!(error.to_string(), "Uncaught Error: Value is not a function");
}

// === constructors and prototypes =======================================

#[test]
fn new_links_instances_to_the_prototype() {
    // function Dog(name){ this.name = name; }
    // Dog.prototype.speak = function(){ return this.name + " woofs"; };
    // new Dog("rex").speak()
    let result = eval_program(vec![
        func_decl(
            "Dog",
            &["name"],
            vec![expr_stmt(assign(
                member(Expression::ThisExpression, "name"),
                ident("name"),
            ))],
        ),
        expr_stmt(assign(
            member(member(ident("Dog"), "prototype"), "speak"),
            func_expr(
                None,
                &[],
                vec![ret(Some(binary(
                    BinaryOp::Add,
                    member(Expression::ThisExpression, "name"),
                    str_lit(" woofs"),
                )))],
            ),
        )),
        expr_stmt(call(
            member(new_expr(ident("Dog"), vec![str_lit("rex")]), "speak"),
            vec![],
        )),
    ]);
    assert_eq!(result.to_js_string(), "rex woofs");
}

#[test]
fn instanceof_walks_the_prototype_chain() {
    // function A(){} var a = new A(); [a instanceof A, ({}) instanceof A]
    let result = eval_program(vec![
        func_decl("A", &[], vec![]),
        var_stmt("a", Some(new_expr(ident("A"), vec![]))),
        expr_stmt(binary(BinaryOp::InstanceOf, ident("a"), ident("A"))),
    ]);
    assert!(result.to_boolean());

    let negative = eval_program(vec![
        func_decl("A", &[], vec![]),
        expr_stmt(binary(BinaryOp::InstanceOf, object_lit(vec![]), ident("A"))),
    ]);
    assert!(!negative.to_boolean());
}

#[test]
fn constructor_returning_an_object_replaces_the_instance() {
    // function F(){ this.a = 1; return { b: 2 }; } new F().b
    let result = eval_program(vec![
        func_decl(
            "F",
            &[],
            vec![
                expr_stmt(assign(member(Expression::ThisExpression, "a"), num(1.0))),
                ret(Some(object_lit(vec![("b", num(2.0))]))),
            ],
        ),
        expr_stmt(member(new_expr(ident("F"), vec![]), "b")),
    ]);
    assert_eq!(result.to_number(), 2.0);
}

#[test]
fn constructor_returning_a_primitive_keeps_the_instance() {
    // function F(){ this.a = 1; return null; } new F().a
    let result = eval_program(vec![
        func_decl(
            "F",
            &[],
            vec![
                expr_stmt(assign(member(Expression::ThisExpression, "a"), num(1.0))),
                ret(Some(Expression::NullLiteral)),
            ],
        ),
        expr_stmt(member(new_expr(ident("F"), vec![]), "a")),
    ]);
    assert_eq!(result.to_number(), 1.0);
}

#[test]
fn user_constructed_objects_keep_their_constructor() {
    // function A(){} (new A()).constructor === A
    let result = eval_program(vec![
        func_decl("A", &[], vec![]),
        expr_stmt(binary(
            BinaryOp::StrictEqual,
            member(new_expr(ident("A"), vec![]), "constructor"),
            ident("A"),
        )),
    ]);
    assert!(result.to_boolean());
}

#[test]
fn bound_functions_are_not_constructible() {
    let error = eval_error(vec![
        func_decl("A", &[], vec![]),
        var_stmt("B", Some(call(member(ident("A"), "bind"), vec![Expression::NullLiteral]))),
        expr_stmt(new_expr(ident("B"), vec![])),
    ]);
    assert_eq!(
        error.to_string(),
        "Uncaught Error: Value is not a constructor"
    );
}

// === control flow ======================================================

#[test]
fn while_and_do_while_loop() {
    // var n = 0; while (n < 5) n++; do n++; while (false); n
    let result = eval_program(vec![
        var_stmt("n", Some(num(0.0))),
        while_stmt(
            binary(BinaryOp::LessThan, ident("n"), num(5.0)),
            expr_stmt(update(UpdateOp::Increment, false, ident("n"))),
        ),
        Statement::DoWhileStatement(DoWhileStatement {
            body: Box::new(expr_stmt(update(UpdateOp::Increment, false, ident("n")))),
            test: bool_lit(false),
        }),
        expr_stmt(ident("n")),
    ]);
    assert_eq!(result.to_number(), 6.0);
}

#[test]
fn for_loop_with_break_and_continue() {
    // var sum = 0; for (var i = 0; i < 10; i++){ if (i === 3) continue;
    //   if (i === 6) break; sum += i; } sum   => 0+1+2+4+5 = 12
    let result = eval_program(vec![
        var_stmt("sum", Some(num(0.0))),
        for_stmt(
            for_var("i", 0.0),
            Some(binary(BinaryOp::LessThan, ident("i"), num(10.0))),
            Some(update(UpdateOp::Increment, false, ident("i"))),
            block_stmt(vec![
                if_stmt(binary(BinaryOp::StrictEqual, ident("i"), num(3.0)), cont(None)),
                if_stmt(binary(BinaryOp::StrictEqual, ident("i"), num(6.0)), brk(None)),
                expr_stmt(compound(AssignOp::Add, ident("sum"), ident("i"))),
            ]),
        ),
        expr_stmt(ident("sum")),
    ]);
    assert_eq!(result.to_number(), 12.0);
}

#[test]
fn labelled_break_exits_the_outer_loop() {
    // var n = 0;
    // outer: for (var i = 0; i < 3; i++)
    //   for (var j = 0; j < 3; j++) { if (i === 1 && j === 1) break outer; n++; }
    // n  => 4
    let result = eval_program(vec![
        var_stmt("n", Some(num(0.0))),
        labeled(
            "outer",
            for_stmt(
                for_var("i", 0.0),
                Some(binary(BinaryOp::LessThan, ident("i"), num(3.0))),
                Some(update(UpdateOp::Increment, false, ident("i"))),
                for_stmt(
                    for_var("j", 0.0),
                    Some(binary(BinaryOp::LessThan, ident("j"), num(3.0))),
                    Some(update(UpdateOp::Increment, false, ident("j"))),
                    block_stmt(vec![
                        if_stmt(
                            logical(
                                LogicalOp::And,
                                binary(BinaryOp::StrictEqual, ident("i"), num(1.0)),
                                binary(BinaryOp::StrictEqual, ident("j"), num(1.0)),
                            ),
                            brk(Some("outer")),
                        ),
                        expr_stmt(update(UpdateOp::Increment, false, ident("n"))),
                    ]),
                ),
            ),
        ),
        expr_stmt(ident("n")),
    ]);
    assert_eq!(result.to_number(), 4.0);
}

#[test]
fn labelled_continue_resumes_the_outer_loop() {
    // var log = "";
    // outer: for (var i = 0; i < 3; i++)
    //   for (var j = 0; j < 3; j++) { if (j === 1) continue outer; log += "" + i + j; }
    // log  => "00" "10" "20"
    let result = eval_program(vec![
        var_stmt("log", Some(str_lit(""))),
        labeled(
            "outer",
            for_stmt(
                for_var("i", 0.0),
                Some(binary(BinaryOp::LessThan, ident("i"), num(3.0))),
                Some(update(UpdateOp::Increment, false, ident("i"))),
                for_stmt(
                    for_var("j", 0.0),
                    Some(binary(BinaryOp::LessThan, ident("j"), num(3.0))),
                    Some(update(UpdateOp::Increment, false, ident("j"))),
                    block_stmt(vec![
                        if_stmt(
                            binary(BinaryOp::StrictEqual, ident("j"), num(1.0)),
                            cont(Some("outer")),
                        ),
                        expr_stmt(compound(
                            AssignOp::Add,
                            ident("log"),
                            binary(
                                BinaryOp::Add,
                                binary(BinaryOp::Add, str_lit(""), ident("i")),
                                ident("j"),
                            ),
                        )),
                    ]),
                ),
            ),
        ),
        expr_stmt(ident("log")),
    ]);
    assert_eq!(result.to_js_string(), "001020");
}

#[test]
fn for_in_iterates_keys_in_insertion_order() {
    // var o = { z: 1, a: 2, m: 3 }; var keys = ""; for (var k in o) keys += k; keys
    let result = eval_program(vec![
        var_stmt(
            "o",
            Some(object_lit(vec![("z", num(1.0)), ("a", num(2.0)), ("m", num(3.0))])),
        ),
        var_stmt("keys", Some(str_lit(""))),
        for_in(
            "k",
            ident("o"),
            expr_stmt(compound(AssignOp::Add, ident("keys"), ident("k"))),
        ),
        expr_stmt(ident("keys")),
    ]);
    assert_eq!(result.to_js_string(), "zam");
}

#[test]
fn for_in_over_arrays_skips_length() {
    // var a = [10, 20]; var keys = ""; for (var k in a) keys += k + ";"; keys
    let result = eval_program(vec![
        var_stmt("a", Some(array(vec![num(10.0), num(20.0)]))),
        var_stmt("keys", Some(str_lit(""))),
        for_in(
            "k",
            ident("a"),
            expr_stmt(compound(
                AssignOp::Add,
                ident("keys"),
                binary(BinaryOp::Add, ident("k"), str_lit(";")),
            )),
        ),
        expr_stmt(ident("keys")),
    ]);
    assert_eq!(result.to_js_string(), "0;1;");
}

#[test]
fn for_in_over_null_iterates_nothing() {
    // var n = 0; for (var k in null) n++; n
    let result = eval_program(vec![
        var_stmt("n", Some(num(0.0))),
        for_in(
            "k",
            Expression::NullLiteral,
            expr_stmt(update(UpdateOp::Increment, false, ident("n"))),
        ),
        expr_stmt(ident("n")),
    ]);
    assert_eq!(result.to_number(), 0.0);
}

#[test]
fn switch_matches_strictly_and_falls_through() {
    // var r = ""; switch (2) { case "2": r += "s"; case 2: r += "a";
    //   case 3: r += "b"; break; default: r += "d"; } r
    let result = eval_program(vec![
        var_stmt("r", Some(str_lit(""))),
        switch_stmt(
            num(2.0),
            vec![
                switch_case(
                    Some(str_lit("2")),
                    vec![expr_stmt(compound(AssignOp::Add, ident("r"), str_lit("s")))],
                ),
                switch_case(
                    Some(num(2.0)),
                    vec![expr_stmt(compound(AssignOp::Add, ident("r"), str_lit("a")))],
                ),
                switch_case(
                    Some(num(3.0)),
                    vec![
                        expr_stmt(compound(AssignOp::Add, ident("r"), str_lit("b"))),
                        brk(None),
                    ],
                ),
                switch_case(
                    None,
                    vec![expr_stmt(compound(AssignOp::Add, ident("r"), str_lit("d")))],
                ),
            ],
        ),
        expr_stmt(ident("r")),
    ]);
    assert_eq!(result.to_js_string(), "ab");
}

#[test]
fn switch_default_runs_when_nothing_matches() {
    // var r = ""; switch (9) { case 1: r += "a"; default: r += "d"; case 2: r += "b"; } r
    let result = eval_program(vec![
        var_stmt("r", Some(str_lit(""))),
        switch_stmt(
            num(9.0),
            vec![
                switch_case(
                    Some(num(1.0)),
                    vec![expr_stmt(compound(AssignOp::Add, ident("r"), str_lit("a")))],
                ),
                switch_case(
                    None,
                    vec![expr_stmt(compound(AssignOp::Add, ident("r"), str_lit("d")))],
                ),
                switch_case(
                    Some(num(2.0)),
                    vec![expr_stmt(compound(AssignOp::Add, ident("r"), str_lit("b")))],
                ),
            ],
        ),
        expr_stmt(ident("r")),
    ]);
    assert_eq!(result.to_js_string(), "db");
}

// === exceptions and control-flow opacity ===============================

#[test]
fn try_catch_finally_ordering() {
    // var r = ""; try { r += "a"; throw new Error("x"); r += "b"; }
    // catch (e) { r += "c"; } finally { r += "d"; } r  => "acd"
    let result = eval_program(vec![
        var_stmt("r", Some(str_lit(""))),
        try_stmt(
            vec![
                expr_stmt(compound(AssignOp::Add, ident("r"), str_lit("a"))),
                throw_stmt(new_expr(ident("Error"), vec![str_lit("x")])),
                expr_stmt(compound(AssignOp::Add, ident("r"), str_lit("b"))),
            ],
            Some((Some("e"), vec![expr_stmt(compound(AssignOp::Add, ident("r"), str_lit("c")))])),
            Some(vec![expr_stmt(compound(AssignOp::Add, ident("r"), str_lit("d")))]),
        ),
        expr_stmt(ident("r")),
    ]);
    assert_eq!(result.to_js_string(), "acd");
}

#[test]
fn caught_errors_expose_their_message() {
    // var m; try { throw new Error("boom"); } catch (e) { m = e.message; } m
    let result = eval_program(vec![
        var_stmt("m", None),
        try_stmt(
            vec![throw_stmt(new_expr(ident("Error"), vec![str_lit("boom")]))],
            Some((Some("e"), vec![expr_stmt(assign(ident("m"), member(ident("e"), "message")))])),
            None,
        ),
        expr_stmt(ident("m")),
    ]);
    assert_eq!(result.to_js_string(), "boom");
}

#[test]
fn thrown_non_error_values_arrive_unchanged() {
    // var got; try { throw 42; } catch (e) { got = e; } got
    let result = eval_program(vec![
        var_stmt("got", None),
        try_stmt(
            vec![throw_stmt(num(42.0))],
            Some((Some("e"), vec![expr_stmt(assign(ident("got"), ident("e")))])),
            None,
        ),
        expr_stmt(ident("got")),
    ]);
    assert_eq!(result.to_number(), 42.0);
}

#[test]
fn engine_errors_are_catchable() {
    // var m; try { missing(); } catch (e) { m = e.message; } m
    let result = eval_program(vec![
        var_stmt("m", None),
        try_stmt(
            vec![expr_stmt(call(ident("missing"), vec![]))],
            Some((Some("e"), vec![expr_stmt(assign(ident("m"), member(ident("e"), "message")))])),
            None,
        ),
        expr_stmt(ident("m")),
    ]);
    assert_eq!(result.to_js_string(), "missing is not defined");
}

#[test]
fn return_through_try_skips_catch_but_runs_finally_once() {
    // var trace = "";
    // function f(){ try { return "r"; } catch (e) { trace += "c"; }
    //               finally { trace += "f"; } }
    // f() + ":" + trace  => "r:f"
    let result = eval_program(vec![
        var_stmt("trace", Some(str_lit(""))),
        func_decl(
            "f",
            &[],
            vec![try_stmt(
                vec![ret(Some(str_lit("r")))],
                Some((Some("e"), vec![expr_stmt(compound(AssignOp::Add, ident("trace"), str_lit("c")))])),
                Some(vec![expr_stmt(compound(AssignOp::Add, ident("trace"), str_lit("f")))]),
            )],
        ),
        expr_stmt(binary(
            BinaryOp::Add,
            call(ident("f"), vec![]),
            binary(BinaryOp::Add, str_lit(":"), ident("trace")),
        )),
    ]);
    assert_eq!(result.to_js_string(), "r:f");
}

#[test]
fn break_through_try_reaches_its_loop() {
    // var n = 0;
    // while (true) { try { break; } finally { n++; } }
    // n
    let result = eval_program(vec![
        var_stmt("n", Some(num(0.0))),
        while_stmt(
            bool_lit(true),
            try_stmt(
                vec![brk(None)],
                None,
                Some(vec![expr_stmt(update(UpdateOp::Increment, false, ident("n")))]),
            ),
        ),
        expr_stmt(ident("n")),
    ]);
    assert_eq!(result.to_number(), 1.0);
}

#[test]
fn continue_through_try_is_invisible_to_catch() {
    // var caught = 0; var n = 0;
    // for (var i = 0; i < 3; i++) {
    //   try { continue; } catch (e) { caught++; } finally { n++; }
    // }
    // n * 10 + caught  => 30
    let result = eval_program(vec![
        var_stmt("caught", Some(num(0.0))),
        var_stmt("n", Some(num(0.0))),
        for_stmt(
            for_var("i", 0.0),
            Some(binary(BinaryOp::LessThan, ident("i"), num(3.0))),
            Some(update(UpdateOp::Increment, false, ident("i"))),
            try_stmt(
                vec![cont(None)],
                Some((Some("e"), vec![expr_stmt(update(UpdateOp::Increment, false, ident("caught")))])),
                Some(vec![expr_stmt(update(UpdateOp::Increment, false, ident("n")))]),
            ),
        ),
        expr_stmt(binary(
            BinaryOp::Add,
            binary(BinaryOp::Mul, ident("n"), num(10.0)),
            ident("caught"),
        )),
    ]);
    assert_eq!(result.to_number(), 30.0);
}

#[test]
fn finally_exceptions_supersede_the_try_outcome() {
    // try { throw new Error("first"); } finally { throw new Error("second"); }
    let error = eval_error(vec![try_stmt(
        vec![throw_stmt(new_expr(ident("Error"), vec![str_lit("first")]))],
        None,
        Some(vec![throw_stmt(new_expr(ident("Error"), vec![str_lit("second")]))]),
    )]);
    assert_eq!(error.to_string(), "Uncaught Error: second");
}

#[test]
fn uncaught_exceptions_surface_with_their_message() {
    let error = eval_error(vec![throw_stmt(new_expr(
        ident("Error"),
        vec![str_lit("kaboom")],
    ))]);
    assert_eq!(error.to_string(), "Uncaught Error: kaboom");
}

// === the reflective-access filter ======================================

#[test]
fn proto_reads_are_blanked() {
    // ({}).__proto__
    let result = eval_program(vec![expr_stmt(member(object_lit(vec![]), "__proto__"))]);
    assert!(result.is_undefined());
}

#[test]
fn builtin_constructor_reads_are_blanked() {
    // [].constructor
    let result = eval_program(vec![expr_stmt(member(array(vec![]), "constructor"))]);
    assert!(result.is_undefined());

    // ({}).constructor
    let result = eval_program(vec![expr_stmt(member(object_lit(vec![]), "constructor"))]);
    assert!(result.is_undefined());

    // "s".constructor
    let result = eval_program(vec![expr_stmt(member(str_lit("s"), "constructor"))]);
    assert!(result.is_undefined());
}

#[test]
fn prototype_reads_on_non_functions_are_blanked() {
    // ({}).prototype, [].prototype
    let result = eval_program(vec![expr_stmt(member(object_lit(vec![]), "prototype"))]);
    assert!(result.is_undefined());

    let result = eval_program(vec![expr_stmt(member(array(vec![]), "prototype"))]);
    assert!(result.is_undefined());
}

#[test]
fn prototype_reads_on_user_functions_pass() {
    // function f(){} typeof f.prototype
    let result = eval_program(vec![
        func_decl("f", &[], vec![]),
        expr_stmt(unary(UnaryOp::TypeOf, member(ident("f"), "prototype"))),
    ]);
    assert_eq!(result.to_js_string(), "object");
}

#[test]
fn filter_blocks_reads_not_writes() {
    // var o = {}; o.__proto__ = 5; o.__proto__
    let result = eval_program(vec![
        var_stmt("o", Some(object_lit(vec![]))),
        expr_stmt(assign(member(ident("o"), "__proto__"), num(5.0))),
        expr_stmt(member(ident("o"), "__proto__")),
    ]);
    // The write landed as a plain property, but reads stay blanked.
    assert!(result.is_undefined());
}

#[test]
fn the_function_constructor_is_absent() {
    // typeof Function
    let result = eval_program(vec![expr_stmt(unary(UnaryOp::TypeOf, ident("Function")))]);
    assert_eq!(result.to_js_string(), "undefined");
}

// === the op-count guard ================================================

#[test]
fn runaway_loops_hit_the_op_ceiling() {
    let mut interpreter = Interpreter::new(
        std::iter::empty::<(String, Value)>(),
        Options {
            max_ops: Some(1000),
            parse: None,
        },
    );
    let error = interpreter
        .evaluate(&program(vec![while_stmt(bool_lit(true), block_stmt(vec![]))]))
        .expect_err("the loop should have been stopped");
    assert_eq!(
        error.to_string(),
        "Execution timeout: maximum operations exceeded"
    );
    assert!(matches!(error, Error::Timeout));
}

#[test]
fn the_op_counter_resets_per_evaluate() {
    let mut interpreter = Interpreter::new(
        std::iter::empty::<(String, Value)>(),
        Options {
            max_ops: Some(2000),
            parse: None,
        },
    );
    // Each run fits under the ceiling on its own.
    let body = vec![
        var_stmt("n", Some(num(0.0))),
        while_stmt(
            binary(BinaryOp::LessThan, ident("n"), num(100.0)),
            expr_stmt(update(UpdateOp::Increment, false, ident("n"))),
        ),
        expr_stmt(ident("n")),
    ];
    for _ in 0..5 {
        let result = interpreter.evaluate(&program(body.clone())).unwrap();
        assert_eq!(result.to_number(), 100.0);
    }
}

#[test]
fn timeouts_are_not_catchable() {
    // try { while(true){} } catch (e) { } -- the fault must still escape
    let mut interpreter = Interpreter::new(
        std::iter::empty::<(String, Value)>(),
        Options {
            max_ops: Some(500),
            parse: None,
        },
    );
    let error = interpreter
        .evaluate(&program(vec![try_stmt(
            vec![while_stmt(bool_lit(true), block_stmt(vec![]))],
            Some((Some("e"), vec![])),
            None,
        )]))
        .expect_err("the timeout should escape the catch");
    assert!(matches!(error, Error::Timeout));
}

// === dynamic evaluation ================================================

fn two_plus_three() -> Program {
    program(vec![expr_stmt(binary(BinaryOp::Add, num(2.0), num(3.0)))])
}

#[test]
fn eval_works_through_the_parse_callback() {
    let mut interpreter = Interpreter::new(
        std::iter::empty::<(String, Value)>(),
        Options {
            max_ops: None,
            parse: Some(Box::new(|source| {
                if source == "2 + 3" {
                    Ok(two_plus_three())
                } else {
                    Err(format!("unexpected source: {}", source))
                }
            })),
        },
    );
    let result = interpreter
        .evaluate(&program(vec![expr_stmt(call(
            ident("eval"),
            vec![str_lit("2 + 3")],
        ))]))
        .unwrap();
    assert_eq!(result.to_number(), 5.0);
}

#[test]
fn eval_without_a_parser_fails_descriptively() {
    let error = eval_error(vec![expr_stmt(call(ident("eval"), vec![str_lit("1")]))]);
    assert_eq!(
        error.to_string(),
        "Uncaught Error: eval() is not supported without a parser"
    );
}

#[test]
fn eval_of_a_non_string_is_the_value_itself() {
    // eval(42)
    let result = eval_program(vec![expr_stmt(call(ident("eval"), vec![num(42.0)]))]);
    assert_eq!(result.to_number(), 42.0);
}

// === the host boundary =================================================

fn native_double(_this: &Value, args: &[Value], _: &mut Interpreter) -> Completion {
    Ok(Value::number(
        args.first().map(|v| v.to_number()).unwrap_or(f64::NAN) * 2.0,
    ))
}

/// A native that invokes a script callback twice: f(f(seed)).
fn native_twice(_this: &Value, args: &[Value], interpreter: &mut Interpreter) -> Completion {
    let callback = args.first().cloned().unwrap_or_else(Value::undefined);
    let seed = args.get(1).cloned().unwrap_or_else(Value::undefined);
    let once = interpreter.call(&callback, &Value::undefined(), &[seed])?;
    interpreter.call(&callback, &Value::undefined(), &[once])
}

#[test]
fn embedder_globals_are_callable_from_script() {
    let mut interpreter = Interpreter::new(
        vec![(
            "double".to_owned(),
            Value::native_function("double", native_double),
        )],
        Options::default(),
    );
    let result = interpreter
        .evaluate(&program(vec![expr_stmt(call(ident("double"), vec![num(21.0)]))]))
        .unwrap();
    assert_eq!(result.to_number(), 42.0);
}

#[test]
fn script_functions_cross_into_host_callbacks_and_back() {
    // function inc(x){ return x + 1; } twice(inc, 5)  => 7
    let mut interpreter = Interpreter::new(
        vec![(
            "twice".to_owned(),
            Value::native_function("twice", native_twice),
        )],
        Options::default(),
    );
    let result = interpreter
        .evaluate(&program(vec![
            func_decl(
                "inc",
                &["x"],
                vec![ret(Some(binary(BinaryOp::Add, ident("x"), num(1.0))))],
            ),
            expr_stmt(call(ident("twice"), vec![ident("inc"), num(5.0)])),
        ]))
        .unwrap();
    assert_eq!(result.to_number(), 7.0);
}

#[derive(Debug)]
struct Gauge {
    stored: Cell<f64>,
}

impl HostObject for Gauge {
    fn class_name(&self) -> &'static str {
        "Gauge"
    }

    fn get(&self, key: &str) -> Option<Value> {
        match key {
            "value" => Some(Value::number(self.stored.get())),
            _ => None,
        }
    }

    fn set(&self, key: &str, value: Value) {
        if key == "value" {
            self.stored.set(value.to_number());
        }
    }

    fn keys(&self) -> Vec<String> {
        vec!["value".to_owned()]
    }
}

#[test]
fn host_objects_reflect_reads_and_writes() {
    let gauge = Rc::new(Gauge {
        stored: Cell::new(10.0),
    });
    let mut interpreter = Interpreter::new(
        vec![("gauge".to_owned(), Value::host(gauge.clone()))],
        Options::default(),
    );

    // gauge.value = gauge.value + 5; gauge.value
    let result = interpreter
        .evaluate(&program(vec![
            expr_stmt(assign(
                member(ident("gauge"), "value"),
                binary(BinaryOp::Add, member(ident("gauge"), "value"), num(5.0)),
            )),
            expr_stmt(member(ident("gauge"), "value")),
        ]))
        .unwrap();
    assert_eq!(result.to_number(), 15.0);
    assert_eq!(gauge.stored.get(), 15.0);
}

#[test]
fn host_object_proto_reads_are_still_blanked() {
    let gauge = Rc::new(Gauge {
        stored: Cell::new(0.0),
    });
    let mut interpreter = Interpreter::new(
        vec![("gauge".to_owned(), Value::host(gauge))],
        Options::default(),
    );
    let result = interpreter
        .evaluate(&program(vec![expr_stmt(member(ident("gauge"), "__proto__"))]))
        .unwrap();
    assert!(result.is_undefined());
}

#[test]
fn typeof_distinguishes_host_callables() {
    #[derive(Debug)]
    struct Shout;
    impl HostObject for Shout {
        fn is_callable(&self) -> bool {
            true
        }
        fn call(&self, _this: &Value, args: &[Value], _: &mut Interpreter) -> Completion {
            Ok(Value::string(
                args.first()
                    .map(|v| v.to_js_string().to_uppercase())
                    .unwrap_or_default(),
            ))
        }
    }

    let mut interpreter = Interpreter::new(
        vec![("shout".to_owned(), Value::host(Rc::new(Shout)))],
        Options::default(),
    );
    let result = interpreter
        .evaluate(&program(vec![expr_stmt(binary(
            BinaryOp::Add,
            unary(UnaryOp::TypeOf, ident("shout")),
            binary(BinaryOp::Add, str_lit(":"), call(ident("shout"), vec![str_lit("hey")])),
        ))]))
        .unwrap();
    assert_eq!(result.to_js_string(), "function:HEY");
}

#[test]
fn embedder_globals_merge_over_the_defaults() {
    let mut interpreter = Interpreter::new(
        vec![("Math".to_owned(), Value::undefined())],
        Options::default(),
    );
    let result = interpreter
        .evaluate(&program(vec![expr_stmt(unary(UnaryOp::TypeOf, ident("Math")))]))
        .unwrap();
    assert_eq!(result.to_js_string(), "undefined");
}

#[test]
fn evaluations_share_the_global_frame() {
    let mut interpreter = Interpreter::default();
    interpreter
        .evaluate(&program(vec![var_stmt("counter", Some(num(1.0)))]))
        .unwrap();
    let result = interpreter
        .evaluate(&program(vec![expr_stmt(update(
            UpdateOp::Increment,
            true,
            ident("counter"),
        ))]))
        .unwrap();
    assert_eq!(result.to_number(), 2.0);
}

// === builtins ==========================================================

#[test]
fn array_map_and_join_round_trip() {
    // [1,2,3].map(function(x){ return x * 2; }).join(",")
    let result = eval_program(vec![expr_stmt(call(
        member(
            call(
                member(array(vec![num(1.0), num(2.0), num(3.0)]), "map"),
                vec![func_expr(
                    None,
                    &["x"],
                    vec![ret(Some(binary(BinaryOp::Mul, ident("x"), num(2.0))))],
                )],
            ),
            "join",
        ),
        vec![str_lit(",")],
    ))]);
    assert_eq!(result.to_js_string(), "2,4,6");
}

#[test]
fn array_push_pop_and_length() {
    // var a = []; a.push(1, 2); a.push(3); a.pop(); a.length + ":" + a.join("")
    let result = eval_program(vec![
        var_stmt("a", Some(array(vec![]))),
        expr_stmt(call(member(ident("a"), "push"), vec![num(1.0), num(2.0)])),
        expr_stmt(call(member(ident("a"), "push"), vec![num(3.0)])),
        expr_stmt(call(member(ident("a"), "pop"), vec![])),
        expr_stmt(binary(
            BinaryOp::Add,
            member(ident("a"), "length"),
            binary(
                BinaryOp::Add,
                str_lit(":"),
                call(member(ident("a"), "join"), vec![str_lit("")]),
            ),
        )),
    ]);
    assert_eq!(result.to_js_string(), "2:12");
}

#[test]
fn array_writes_past_the_end_grow_length() {
    // var a = [1]; a[4] = 9; a.length
    let result = eval_program(vec![
        var_stmt("a", Some(array(vec![num(1.0)]))),
        expr_stmt(assign(index(ident("a"), num(4.0)), num(9.0))),
        expr_stmt(member(ident("a"), "length")),
    ]);
    assert_eq!(result.to_number(), 5.0);
}

#[test]
fn array_filter_and_index_of() {
    // [1,2,3,4].filter(function(x){ return x % 2 === 0; }).indexOf(4)
    let result = eval_program(vec![expr_stmt(call(
        member(
            call(
                member(array(vec![num(1.0), num(2.0), num(3.0), num(4.0)]), "filter"),
                vec![func_expr(
                    None,
                    &["x"],
                    vec![ret(Some(binary(
                        BinaryOp::StrictEqual,
                        binary(BinaryOp::Mod, ident("x"), num(2.0)),
                        num(0.0),
                    )))],
                )],
            ),
            "indexOf",
        ),
        vec![num(4.0)],
    ))]);
    assert_eq!(result.to_number(), 1.0);
}

#[test]
fn string_methods_work_on_primitives() {
    // "Hello World".toUpperCase().indexOf("WORLD")
    let result = eval_program(vec![expr_stmt(call(
        member(
            call(member(str_lit("Hello World"), "toUpperCase"), vec![]),
            "indexOf",
        ),
        vec![str_lit("WORLD")],
    ))]);
    assert_eq!(result.to_number(), 6.0);

    // "a,b,c".split(",").length
    let result = eval_program(vec![expr_stmt(member(
        call(member(str_lit("a,b,c"), "split"), vec![str_lit(",")]),
        "length",
    ))]);
    assert_eq!(result.to_number(), 3.0);

    // "abc".length and "abc"[1]
    let result = eval_program(vec![expr_stmt(binary(
        BinaryOp::Add,
        member(str_lit("abc"), "length"),
        index(str_lit("abc"), num(1.0)),
    ))]);
    assert_eq!(result.to_js_string(), "3b");
}

#[test]
fn number_and_string_coercion_builtins() {
    // Number("0x10") + parseInt("42px") + parseFloat("3.5rem")
    let result = eval_program(vec![expr_stmt(binary(
        BinaryOp::Add,
        call(ident("Number"), vec![str_lit("0x10")]),
        binary(
            BinaryOp::Add,
            call(ident("parseInt"), vec![str_lit("42px")]),
            call(ident("parseFloat"), vec![str_lit("3.5rem")]),
        ),
    ))]);
    assert!(float_cmp::approx_eq!(
        f64,
        result.to_number(),
        16.0 + 42.0 + 3.5
    ));

    // isNaN("nope") && isFinite(1)
    let result = eval_program(vec![expr_stmt(logical(
        LogicalOp::And,
        call(ident("isNaN"), vec![str_lit("nope")]),
        call(ident("isFinite"), vec![num(1.0)]),
    ))]);
    assert!(result.to_boolean());
}

#[test]
fn math_namespace_operations() {
    // Math.max(1, 7, 3) + Math.floor(2.9) + Math.round(-2.5)
    let result = eval_program(vec![expr_stmt(binary(
        BinaryOp::Add,
        call(member(ident("Math"), "max"), vec![num(1.0), num(7.0), num(3.0)]),
        binary(
            BinaryOp::Add,
            call(member(ident("Math"), "floor"), vec![num(2.9)]),
            call(member(ident("Math"), "round"), vec![num(-2.5)]),
        ),
    ))]);
    assert_eq!(result.to_number(), 7.0 + 2.0 + -2.0);
}

#[test]
fn json_round_trips_objects() {
    // JSON.parse(JSON.stringify({a: [1, 2], b: "x"})).a[1]
    let result = eval_program(vec![expr_stmt(index(
        member(
            call(
                member(ident("JSON"), "parse"),
                vec![call(
                    member(ident("JSON"), "stringify"),
                    vec![object_lit(vec![
                        ("a", array(vec![num(1.0), num(2.0)])),
                        ("b", str_lit("x")),
                    ])],
                )],
            ),
            "a",
        ),
        num(1.0),
    ))]);
    assert_eq!(result.to_number(), 2.0);
}

#[test]
fn json_stringify_rejects_cycles() {
    // var o = {}; o.me = o; JSON.stringify(o)
    let error = eval_error(vec![
        var_stmt("o", Some(object_lit(vec![]))),
        expr_stmt(assign(member(ident("o"), "me"), ident("o"))),
        expr_stmt(call(member(ident("JSON"), "stringify"), vec![ident("o")])),
    ]);
    assert_eq!(
        error.to_string(),
        "Uncaught Error: Converting circular structure to JSON"
    );
}

#[test]
fn regexp_literals_test_and_exec() {
    // /a(b+)c/.exec("xxabbbc")[1]
    let result = eval_program(vec![expr_stmt(index(
        call(
            member(
                Expression::RegExpLiteral(RegExpLiteral {
                    pattern: "a(b+)c".to_owned(),
                    flags: String::new(),
                }),
                "exec",
            ),
            vec![str_lit("xxabbbc")],
        ),
        num(1.0),
    ))]);
    assert_eq!(result.to_js_string(), "bbb");

    // /^\d+$/.test("123")
    let result = eval_program(vec![expr_stmt(call(
        member(
            Expression::RegExpLiteral(RegExpLiteral {
                pattern: r"^\d+$".to_owned(),
                flags: String::new(),
            }),
            "test",
        ),
        vec![str_lit("123")],
    ))]);
    assert!(result.to_boolean());
}

#[test]
fn object_keys_lists_own_enumerable_keys() {
    // Object.keys({x: 1, y: 2}).join(",")
    let result = eval_program(vec![expr_stmt(call(
        member(
            call(
                member(ident("Object"), "keys"),
                vec![object_lit(vec![("x", num(1.0)), ("y", num(2.0))])],
            ),
            "join",
        ),
        vec![str_lit(",")],
    ))]);
    assert_eq!(result.to_js_string(), "x,y");
}

#[test]
fn date_now_and_get_time_are_consistent() {
    // new Date(1234).getTime()
    let result = eval_program(vec![expr_stmt(call(
        member(new_expr(ident("Date"), vec![num(1234.0)]), "getTime"),
        vec![],
    ))]);
    assert_eq!(result.to_number(), 1234.0);
}

// === program shape =====================================================

#[test]
fn the_program_result_is_the_last_expression_statement() {
    // var x = 1; x + 1; var y = 2;
    let result = eval_program(vec![
        var_stmt("x", Some(num(1.0))),
        expr_stmt(binary(BinaryOp::Add, ident("x"), num(1.0))),
        var_stmt("y", Some(num(2.0))),
    ]);
    assert_eq!(result.to_number(), 2.0);
}

#[test]
fn an_empty_program_yields_undefined() {
    assert!(eval_program(vec![]).is_undefined());
}

#[test]
fn a_directive_only_program_yields_the_directive() {
    let program = Program {
        body: Vec::new(),
        directives: vec![Directive {
            value: DirectiveLiteral {
                value: "use strict".to_owned(),
            },
        }],
    };
    let result = Interpreter::default().evaluate(&program).unwrap();
    assert_eq!(result.to_js_string(), "use strict");
}

#[test]
fn with_statements_are_rejected() {
    let statement = Statement::WithStatement(WithStatement {
        object: object_lit(vec![]),
        body: Box::new(block_stmt(vec![])),
    });
    let error = eval_error(vec![statement]);
    assert_eq!(error.to_string(), "with statement is not supported");
}

#[test]
fn top_level_return_is_illegal() {
    let error = eval_error(vec![ret(None)]);
    assert!(matches!(error, Error::IllegalReturn));
}

#[test]
fn object_spread_copies_own_enumerable_keys() {
    // var base = {a: 1, b: 2}; var copy = {...base, b: 3}; copy.a + copy.b
    let spread = Expression::ObjectExpression(ObjectExpression {
        properties: vec![
            ObjectMember::SpreadElement(SpreadElement {
                argument: ident("base"),
            }),
            ObjectMember::ObjectProperty(ObjectProperty {
                key: ident("b"),
                value: num(3.0),
                computed: false,
            }),
        ],
    });
    let result = eval_program(vec![
        var_stmt("base", Some(object_lit(vec![("a", num(1.0)), ("b", num(2.0))]))),
        var_stmt("copy", Some(spread)),
        expr_stmt(binary(
            BinaryOp::Add,
            member(ident("copy"), "a"),
            member(ident("copy"), "b"),
        )),
    ]);
    assert_eq!(result.to_number(), 4.0);
}

#[test]
fn object_methods_and_computed_keys() {
    // var o = { greet(){ return "hi"; }, ["k" + 1]: 2 }; o.greet() + o.k1
    let literal = Expression::ObjectExpression(ObjectExpression {
        properties: vec![
            ObjectMember::ObjectMethod(ObjectMethod {
                key: ident("greet"),
                params: vec![],
                body: block(vec![ret(Some(str_lit("hi")))]),
                computed: false,
            }),
            ObjectMember::ObjectProperty(ObjectProperty {
                key: binary(BinaryOp::Add, str_lit("k"), num(1.0)),
                value: num(2.0),
                computed: true,
            }),
        ],
    });
    let result = eval_program(vec![
        var_stmt("o", Some(literal)),
        expr_stmt(binary(
            BinaryOp::Add,
            call(member(ident("o"), "greet"), vec![]),
            member(ident("o"), "k1"),
        )),
    ]);
    assert_eq!(result.to_js_string(), "hi2");
}

#[test]
fn elided_array_slots_are_undefined() {
    let literal = Expression::ArrayExpression(ArrayExpression {
        elements: vec![Some(num(1.0)), None, Some(num(3.0))],
    });
    // typeof a[1]
    let result = eval_program(vec![
        var_stmt("a", Some(literal)),
        expr_stmt(unary(UnaryOp::TypeOf, index(ident("a"), num(1.0)))),
    ]);
    assert_eq!(result.to_js_string(), "undefined");
}
