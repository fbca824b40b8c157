//! Declaration execution: variable declarations run their initializers in
//! place (the names themselves were installed by the hoisting pre-pass for
//! `var`), function declarations and expressions materialise closures.

use super::{Executable, Interpreter};
use crate::ast::{
    ArrowFunctionExpression, DeclarationKind, FunctionBody, FunctionDeclaration,
    FunctionExpression, VariableDeclaration,
};
use crate::error::Completion;
use crate::value::Value;

impl Executable for VariableDeclaration {
    fn run(&self, interpreter: &mut Interpreter) -> Completion {
        for declarator in &self.declarations {
            let name = declarator.id.name.as_str();
            match self.kind {
                DeclarationKind::Var => {
                    // The binding exists from hoisting; a declarator
                    // without an initializer must not reset it.
                    if let Some(init) = &declarator.init {
                        let value = init.run(interpreter)?;
                        let environment = &mut interpreter.realm_mut().environment;
                        if environment.has_binding(name) {
                            environment.set(name, value);
                        } else {
                            environment.declare_var(name.to_owned(), value);
                        }
                    } else {
                        interpreter
                            .realm_mut()
                            .environment
                            .declare_var_if_absent(name, Value::undefined());
                    }
                }
                DeclarationKind::Let | DeclarationKind::Const => {
                    let value = match &declarator.init {
                        Some(init) => init.run(interpreter)?,
                        None => Value::undefined(),
                    };
                    interpreter
                        .realm_mut()
                        .environment
                        .declare_let(name.to_owned(), value);
                }
            }
        }
        Ok(Value::undefined())
    }
}

impl Executable for FunctionDeclaration {
    fn run(&self, interpreter: &mut Interpreter) -> Completion {
        // Top-level declarations were installed by the hoisting pre-pass;
        // re-binding here also covers declarations nested inside blocks,
        // which the pre-pass leaves alone.
        let function = interpreter.create_function(
            &self.params,
            FunctionBody::Block(self.body.clone()),
            Some(self.id.name.clone()),
            false,
        );
        interpreter
            .realm_mut()
            .environment
            .declare_var(self.id.name.clone(), function);
        Ok(Value::undefined())
    }
}

impl Executable for FunctionExpression {
    fn run(&self, interpreter: &mut Interpreter) -> Completion {
        Ok(interpreter.create_function(
            &self.params,
            FunctionBody::Block(self.body.clone()),
            self.id.as_ref().map(|id| id.name.clone()),
            false,
        ))
    }
}

impl Executable for ArrowFunctionExpression {
    fn run(&self, interpreter: &mut Interpreter) -> Completion {
        Ok(interpreter.create_function(&self.params, self.body.clone(), None, true))
    }
}
