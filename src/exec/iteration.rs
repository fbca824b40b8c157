//! Loop execution and labelled control flow.
//!
//! Loops receive the label of a directly enclosing labelled statement so
//! they can consume `break label`/`continue label` aimed at them;
//! signals carrying any other label are re-thrown outwards.

use super::field::{member_key, set_member};
use super::{Executable, Interpreter};
use crate::ast::{
    DeclarationKind, DoWhileStatement, Expression, ForInStatement, ForInTarget, ForInit,
    ForStatement, LabeledStatement, Statement, WhileStatement,
};
use crate::error::{Abrupt, Completion, Error};
use crate::profiler::Profiler;
use crate::value::Value;

/// Routes an abrupt body completion: consume a matching break/continue,
/// propagate everything else.
enum LoopSignal {
    Break,
    Continue,
    Propagate(Abrupt),
}

fn classify(err: Abrupt, label: Option<&str>) -> LoopSignal {
    match err {
        Abrupt::Break(None) => LoopSignal::Break,
        Abrupt::Break(Some(target)) if Some(target.as_str()) == label => LoopSignal::Break,
        Abrupt::Continue(None) => LoopSignal::Continue,
        Abrupt::Continue(Some(target)) if Some(target.as_str()) == label => LoopSignal::Continue,
        other => LoopSignal::Propagate(other),
    }
}

impl WhileStatement {
    pub(crate) fn run_loop(
        &self,
        interpreter: &mut Interpreter,
        label: Option<&str>,
    ) -> Completion {
        let mut result = Value::undefined();
        while self.test.run(interpreter)?.to_boolean() {
            match self.body.run(interpreter) {
                Ok(value) => result = value,
                Err(err) => match classify(err, label) {
                    LoopSignal::Break => break,
                    LoopSignal::Continue => continue,
                    LoopSignal::Propagate(err) => return Err(err),
                },
            }
        }
        Ok(result)
    }
}

impl DoWhileStatement {
    pub(crate) fn run_loop(
        &self,
        interpreter: &mut Interpreter,
        label: Option<&str>,
    ) -> Completion {
        let mut result = Value::undefined();
        loop {
            match self.body.run(interpreter) {
                Ok(value) => result = value,
                Err(err) => match classify(err, label) {
                    LoopSignal::Break => break,
                    LoopSignal::Continue => {}
                    LoopSignal::Propagate(err) => return Err(err),
                },
            }
            if !self.test.run(interpreter)?.to_boolean() {
                break;
            }
        }
        Ok(result)
    }
}

impl ForStatement {
    pub(crate) fn run_loop(
        &self,
        interpreter: &mut Interpreter,
        label: Option<&str>,
    ) -> Completion {
        let _timer = Profiler::global().start_event("ForLoop", "exec");
        // The header gets its own frame so `let` declarations do not leak.
        interpreter.realm_mut().environment.push_block();
        let result = self.run_in_frame(interpreter, label);
        interpreter.realm_mut().environment.pop();
        result
    }

    fn run_in_frame(&self, interpreter: &mut Interpreter, label: Option<&str>) -> Completion {
        match &self.init {
            Some(ForInit::VariableDeclaration(declaration)) => {
                declaration.run(interpreter)?;
            }
            Some(ForInit::Expression(expression)) => {
                expression.run(interpreter)?;
            }
            None => {}
        }

        let mut result = Value::undefined();
        loop {
            if let Some(test) = &self.test {
                if !test.run(interpreter)?.to_boolean() {
                    break;
                }
            }
            match self.body.run(interpreter) {
                Ok(value) => result = value,
                Err(err) => match classify(err, label) {
                    LoopSignal::Break => break,
                    // `continue` still runs the update expression below.
                    LoopSignal::Continue => {}
                    LoopSignal::Propagate(err) => return Err(err),
                },
            }
            if let Some(update) = &self.update {
                update.run(interpreter)?;
            }
        }
        Ok(result)
    }
}

impl ForInStatement {
    pub(crate) fn run_loop(
        &self,
        interpreter: &mut Interpreter,
        label: Option<&str>,
    ) -> Completion {
        let _timer = Profiler::global().start_event("ForIn", "exec");
        let object = self.right.run(interpreter)?;
        // Iterating nothing iterates nothing.
        if object.is_null_or_undefined() {
            return Ok(Value::undefined());
        }
        let keys = object.enumerable_keys();

        interpreter.realm_mut().environment.push_block();
        let result = self.run_in_frame(interpreter, label, keys);
        interpreter.realm_mut().environment.pop();
        result
    }

    fn run_in_frame(
        &self,
        interpreter: &mut Interpreter,
        label: Option<&str>,
        keys: Vec<String>,
    ) -> Completion {
        let mut result = Value::undefined();
        for key in keys {
            self.bind_key(interpreter, Value::string(key))?;
            match self.body.run(interpreter) {
                Ok(value) => result = value,
                Err(err) => match classify(err, label) {
                    LoopSignal::Break => break,
                    LoopSignal::Continue => continue,
                    LoopSignal::Propagate(err) => return Err(err),
                },
            }
        }
        Ok(result)
    }

    /// Binds the current key to the loop target before each iteration.
    fn bind_key(&self, interpreter: &mut Interpreter, key: Value) -> Result<(), Abrupt> {
        match &self.left {
            ForInTarget::VariableDeclaration(declaration) => {
                let declarator = match declaration.declarations.first() {
                    Some(declarator) => declarator,
                    None => {
                        return Err(Abrupt::Fault(Error::UnhandledNode(
                            "empty declaration in for-in head".into(),
                        )))
                    }
                };
                let name = declarator.id.name.clone();
                match declaration.kind {
                    DeclarationKind::Var => {
                        let environment = &mut interpreter.realm_mut().environment;
                        if environment.has_binding(&name) {
                            environment.set(&name, key);
                        } else {
                            environment.declare_var(name, key);
                        }
                    }
                    DeclarationKind::Let | DeclarationKind::Const => {
                        interpreter.realm_mut().environment.declare_let(name, key);
                    }
                }
                Ok(())
            }
            ForInTarget::Expression(Expression::Identifier(identifier)) => {
                interpreter
                    .realm_mut()
                    .environment
                    .set(&identifier.name, key);
                Ok(())
            }
            ForInTarget::Expression(Expression::MemberExpression(member)) => {
                let object = member.object.run(interpreter)?;
                let target_key = member_key(interpreter, member)?;
                set_member(interpreter, &object, &target_key, key)
            }
            ForInTarget::Expression(other) => Err(Abrupt::Fault(Error::UnhandledNode(format!(
                "{} in for-in head",
                other.kind_name()
            )))),
        }
    }
}

impl Executable for LabeledStatement {
    fn run(&self, interpreter: &mut Interpreter) -> Completion {
        let label = self.label.name.as_str();
        match &*self.body {
            // A label directly on a loop is the loop's label.
            Statement::WhileStatement(node) => {
                interpreter.tick()?;
                node.run_loop(interpreter, Some(label))
            }
            Statement::DoWhileStatement(node) => {
                interpreter.tick()?;
                node.run_loop(interpreter, Some(label))
            }
            Statement::ForStatement(node) => {
                interpreter.tick()?;
                node.run_loop(interpreter, Some(label))
            }
            Statement::ForInStatement(node) => {
                interpreter.tick()?;
                node.run_loop(interpreter, Some(label))
            }
            // Otherwise the label only gives `break` a target; a matching
            // labelled `continue` is rethrown unlabelled for the
            // enclosing loop.
            other => match other.run(interpreter) {
                Err(Abrupt::Break(Some(target))) if target == label => Ok(Value::undefined()),
                Err(Abrupt::Continue(Some(target))) if target == label => {
                    Err(Abrupt::Continue(None))
                }
                result => result,
            },
        }
    }
}
