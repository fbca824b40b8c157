//! The tree-walking evaluator.
//!
//! Every node kind implements [`Executable`]; the `Statement` and
//! `Expression` dispatchers charge the op-count guard and fan out to the
//! per-node implementations in the submodules. Non-local transfers
//! (`return`, `break`, `continue`, `throw`) travel on the error side of
//! [`Completion`] as [`Abrupt`] variants and are pattern-matched at loop,
//! switch, label, try and function-boundary sites.

mod block;
mod call;
mod declaration;
mod expression;
mod field;
mod iteration;
mod operator;
mod switch;
mod try_node;

#[cfg(test)]
pub(crate) mod tests;

use crate::ast::{
    DeclarationKind, Expression, ForInTarget, ForInit, FunctionBody, Identifier, Program,
    Statement,
};
use crate::builtins;
use crate::environment::LexicalEnvironment;
use crate::error::{Abrupt, Completion, Error};
use crate::function::{Function, FunctionFlags, ScriptFunction};
use crate::profiler::Profiler;
use crate::realm::{Intrinsics, Realm};
use crate::value::{display::error_to_string, Object, ObjectData, PropertyMap, Value};
use std::fmt;
use std::rc::Rc;

/// A node that can be evaluated against an interpreter.
pub trait Executable {
    fn run(&self, interpreter: &mut Interpreter) -> Completion;
}

/// The dynamic-evaluation callback: source text in, parsed program out.
/// Configuring one enables the script-visible `eval`.
pub type ParseFn = Box<dyn Fn(&str) -> Result<Program, String>>;

/// Construction options for an [`Interpreter`].
#[derive(Default)]
pub struct Options {
    /// Ceiling for the synchronous op-count guard; `None` means unbounded.
    pub max_ops: Option<u64>,
    /// Parser callback backing `eval`. Without it, `eval` fails with a
    /// descriptive error.
    pub parse: Option<ParseFn>,
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("max_ops", &self.max_ops)
            .field("parse", &self.parse.as_ref().map(|_| "fn"))
            .finish()
    }
}

/// A tree-walking ECMAScript interpreter over one realm.
///
/// One instance is one isolation domain: repeated `evaluate` calls share
/// the global frame. The instance must not be entered from multiple
/// threads.
pub struct Interpreter {
    realm: Realm,
    ops: u64,
    max_ops: Option<u64>,
    parse: Option<ParseFn>,
}

impl fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interpreter")
            .field("ops", &self.ops)
            .field("max_ops", &self.max_ops)
            .finish()
    }
}

impl Interpreter {
    /// Creates an interpreter whose global frame holds the default
    /// capability table with `globals` merged over it.
    pub fn new<G>(globals: G, options: Options) -> Self
    where
        G: IntoIterator<Item = (String, Value)>,
    {
        Self {
            realm: Realm::create(globals),
            ops: 0,
            max_ops: options.max_ops,
            parse: options.parse,
        }
    }

    /// Evaluates a program against the realm and returns the value of its
    /// last expression statement (or its directive prologue, for a program
    /// of nothing but directives).
    ///
    /// The op counter restarts on every call.
    pub fn evaluate(&mut self, program: &Program) -> Result<Value, Error> {
        let _timer = Profiler::global().start_event("evaluate", "exec");
        self.ops = 0;
        match self.run_program(program) {
            Ok(value) => Ok(value),
            Err(Abrupt::Throw(exception)) => Err(Error::Uncaught(error_to_string(&exception))),
            Err(Abrupt::Return(_)) => Err(Error::IllegalReturn),
            Err(Abrupt::Break(_)) => Err(Error::IllegalBreak),
            Err(Abrupt::Continue(_)) => Err(Error::IllegalContinue),
            Err(Abrupt::Fault(error)) => Err(error),
        }
    }

    fn run_program(&mut self, program: &Program) -> Completion {
        self.hoist(&program.body);
        let mut result = Value::undefined();
        let mut saw_expression = false;
        for statement in &program.body {
            let value = statement.run(self)?;
            if let Statement::ExpressionStatement(_) = statement {
                result = value;
                saw_expression = true;
            }
        }
        if !saw_expression {
            if let Some(directive) = program.directives.last() {
                result = Value::string(directive.value.value.clone());
            }
        }
        Ok(result)
    }

    /// The `eval` gate: parses through the embedder's callback and runs
    /// the result at global scope on the *same* op counter.
    pub(crate) fn dynamic_eval(&mut self, source: &str) -> Completion {
        let parsed = self.parse.as_ref().map(|parse| parse(source));
        match parsed {
            None => Err(self.throw_error("eval() is not supported without a parser")),
            Some(Err(message)) => Err(self.throw_error(message)),
            Some(Ok(program)) => {
                let global = self.realm.environment.global().clone();
                let saved = std::mem::replace(
                    &mut self.realm.environment,
                    LexicalEnvironment::with_global(global),
                );
                let result = self.run_program(&program);
                self.realm.environment = saved;
                result
            }
        }
    }

    pub fn realm(&self) -> &Realm {
        &self.realm
    }

    pub fn realm_mut(&mut self) -> &mut Realm {
        &mut self.realm
    }

    pub fn intrinsics(&self) -> &Intrinsics {
        &self.realm.intrinsics
    }

    /// Charges one node evaluation against the op ceiling.
    pub(crate) fn tick(&mut self) -> Result<(), Abrupt> {
        self.ops += 1;
        match self.max_ops {
            Some(max) if self.ops > max => Err(Abrupt::Fault(Error::Timeout)),
            _ => Ok(()),
        }
    }

    /// Raises a catchable engine error ("x is not defined" and friends)
    /// as an error object linked to the realm's `Error.prototype`.
    pub fn throw_error<M: Into<String>>(&mut self, message: M) -> Abrupt {
        Abrupt::Throw(builtins::error::create_error(self, message.into()))
    }

    /// A fresh ordinary object linked to the realm's `Object.prototype`.
    pub fn new_object(&self) -> Value {
        Value::object(Object::new(
            ObjectData::Ordinary,
            self.intrinsics().object_prototype.clone(),
        ))
    }

    /// Materialises a script function closing over the current frame.
    /// Non-arrows get a fresh `prototype` object with a `constructor`
    /// back-reference.
    pub(crate) fn create_function(
        &mut self,
        params: &[Identifier],
        body: FunctionBody,
        name: Option<String>,
        arrow: bool,
    ) -> Value {
        let params: Rc<[String]> = params.iter().map(|p| p.name.clone()).collect();
        let environment = self.realm.environment.current().clone();
        let flags = if arrow {
            FunctionFlags::LEXICAL_THIS
        } else {
            FunctionFlags::CONSTRUCTABLE
        };
        let function = Value::function(Function::Script(ScriptFunction {
            params,
            body: Rc::new(body),
            environment,
            name,
            flags,
            properties: PropertyMap::new(),
        }));
        if !arrow {
            let prototype = self.new_object();
            prototype.set_field("constructor", function.clone());
            function.set_field("prototype", prototype);
        }
        function
    }

    /// The hoisting pre-pass over one function (or program) body:
    /// materialises immediate function declarations and binds every `var`
    /// name reachable without crossing a nested function, all into the
    /// current frame's nearest function frame. Initializers stay where
    /// they are and run in place.
    pub(crate) fn hoist(&mut self, statements: &[Statement]) {
        for statement in statements {
            if let Statement::FunctionDeclaration(decl) = statement {
                let function = self.create_function(
                    &decl.params,
                    FunctionBody::Block(decl.body.clone()),
                    Some(decl.id.name.clone()),
                    false,
                );
                self.realm
                    .environment
                    .declare_var(decl.id.name.clone(), function);
            }
        }
        for statement in statements {
            self.hoist_vars(statement);
        }
    }

    fn hoist_vars(&mut self, statement: &Statement) {
        match statement {
            Statement::VariableDeclaration(decl) if decl.kind == DeclarationKind::Var => {
                for declarator in &decl.declarations {
                    self.realm
                        .environment
                        .declare_var_if_absent(&declarator.id.name, Value::undefined());
                }
            }
            Statement::BlockStatement(block) => {
                for statement in &block.body {
                    self.hoist_vars(statement);
                }
            }
            Statement::IfStatement(node) => {
                self.hoist_vars(&node.consequent);
                if let Some(alternate) = &node.alternate {
                    self.hoist_vars(alternate);
                }
            }
            Statement::WhileStatement(node) => self.hoist_vars(&node.body),
            Statement::DoWhileStatement(node) => self.hoist_vars(&node.body),
            Statement::ForStatement(node) => {
                if let Some(ForInit::VariableDeclaration(decl)) = &node.init {
                    if decl.kind == DeclarationKind::Var {
                        for declarator in &decl.declarations {
                            self.realm
                                .environment
                                .declare_var_if_absent(&declarator.id.name, Value::undefined());
                        }
                    }
                }
                self.hoist_vars(&node.body);
            }
            Statement::ForInStatement(node) => {
                if let ForInTarget::VariableDeclaration(decl) = &node.left {
                    if decl.kind == DeclarationKind::Var {
                        for declarator in &decl.declarations {
                            self.realm
                                .environment
                                .declare_var_if_absent(&declarator.id.name, Value::undefined());
                        }
                    }
                }
                self.hoist_vars(&node.body);
            }
            Statement::LabeledStatement(node) => self.hoist_vars(&node.body),
            Statement::TryStatement(node) => {
                for statement in &node.block.body {
                    self.hoist_vars(statement);
                }
                if let Some(handler) = &node.handler {
                    for statement in &handler.body.body {
                        self.hoist_vars(statement);
                    }
                }
                if let Some(finalizer) = &node.finalizer {
                    for statement in &finalizer.body {
                        self.hoist_vars(statement);
                    }
                }
            }
            Statement::SwitchStatement(node) => {
                for case in &node.cases {
                    for statement in &case.consequent {
                        self.hoist_vars(statement);
                    }
                }
            }
            _ => {}
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(std::iter::empty::<(String, Value)>(), Options::default())
    }
}

impl Executable for Statement {
    fn run(&self, interpreter: &mut Interpreter) -> Completion {
        interpreter.tick()?;
        match self {
            Statement::ExpressionStatement(node) => node.expression.run(interpreter),
            Statement::BlockStatement(node) => node.run(interpreter),
            Statement::EmptyStatement => Ok(Value::undefined()),
            Statement::VariableDeclaration(node) => node.run(interpreter),
            Statement::FunctionDeclaration(node) => node.run(interpreter),
            Statement::IfStatement(node) => node.run(interpreter),
            Statement::SwitchStatement(node) => node.run(interpreter),
            Statement::WhileStatement(node) => node.run_loop(interpreter, None),
            Statement::DoWhileStatement(node) => node.run_loop(interpreter, None),
            Statement::ForStatement(node) => node.run_loop(interpreter, None),
            Statement::ForInStatement(node) => node.run_loop(interpreter, None),
            Statement::BreakStatement(node) => {
                Err(Abrupt::Break(node.label.as_ref().map(|l| l.name.clone())))
            }
            Statement::ContinueStatement(node) => {
                Err(Abrupt::Continue(node.label.as_ref().map(|l| l.name.clone())))
            }
            Statement::ReturnStatement(node) => {
                let value = match &node.argument {
                    Some(argument) => argument.run(interpreter)?,
                    None => Value::undefined(),
                };
                Err(Abrupt::Return(value))
            }
            Statement::LabeledStatement(node) => node.run(interpreter),
            Statement::TryStatement(node) => node.run(interpreter),
            Statement::ThrowStatement(node) => {
                let value = node.argument.run(interpreter)?;
                Err(Abrupt::Throw(value))
            }
            Statement::WithStatement(_) => Err(Abrupt::Fault(Error::WithStatement)),
        }
    }
}

impl Executable for Expression {
    fn run(&self, interpreter: &mut Interpreter) -> Completion {
        interpreter.tick()?;
        match self {
            Expression::Identifier(node) => {
                match interpreter.realm.environment.get(&node.name) {
                    Some(value) => Ok(value),
                    None => Err(interpreter.throw_error(format!("{} is not defined", node.name))),
                }
            }
            Expression::ThisExpression => Ok(interpreter
                .realm
                .environment
                .get("this")
                .unwrap_or_else(Value::undefined)),
            Expression::StringLiteral(node) => Ok(Value::string(node.value.clone())),
            Expression::NumericLiteral(node) => Ok(Value::number(node.value)),
            Expression::BooleanLiteral(node) => Ok(Value::boolean(node.value)),
            Expression::NullLiteral => Ok(Value::null()),
            Expression::RegExpLiteral(node) => {
                Ok(Value::regexp(node.pattern.clone(), node.flags.clone()))
            }
            Expression::ArrayExpression(node) => node.run(interpreter),
            Expression::ObjectExpression(node) => node.run(interpreter),
            Expression::FunctionExpression(node) => node.run(interpreter),
            Expression::ArrowFunctionExpression(node) => node.run(interpreter),
            Expression::UnaryExpression(node) => node.run(interpreter),
            Expression::UpdateExpression(node) => node.run(interpreter),
            Expression::BinaryExpression(node) => node.run(interpreter),
            Expression::LogicalExpression(node) => node.run(interpreter),
            Expression::AssignmentExpression(node) => node.run(interpreter),
            Expression::ConditionalExpression(node) => node.run(interpreter),
            Expression::CallExpression(node) => node.run(interpreter),
            Expression::NewExpression(node) => node.run(interpreter),
            Expression::MemberExpression(node) => node.run(interpreter),
            Expression::SequenceExpression(node) => node.run(interpreter),
        }
    }
}
