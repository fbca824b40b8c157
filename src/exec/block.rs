//! Block and conditional statement execution.

use super::{Executable, Interpreter};
use crate::ast::{BlockStatement, IfStatement, Statement};
use crate::error::Completion;
use crate::profiler::Profiler;
use crate::value::Value;

/// Runs a statement list, yielding the value of its final expression
/// statement. Frames are the caller's business.
pub(crate) fn run_statement_list(
    statements: &[Statement],
    interpreter: &mut Interpreter,
) -> Completion {
    let mut result = Value::undefined();
    for statement in statements {
        let value = statement.run(interpreter)?;
        if let Statement::ExpressionStatement(_) = statement {
            result = value;
        }
    }
    Ok(result)
}

impl Executable for BlockStatement {
    fn run(&self, interpreter: &mut Interpreter) -> Completion {
        let _timer = Profiler::global().start_event("Block", "exec");
        interpreter.realm_mut().environment.push_block();
        let result = run_statement_list(&self.body, interpreter);
        interpreter.realm_mut().environment.pop();
        result
    }
}

impl Executable for IfStatement {
    fn run(&self, interpreter: &mut Interpreter) -> Completion {
        if self.test.run(interpreter)?.to_boolean() {
            self.consequent.run(interpreter)
        } else if let Some(alternate) = &self.alternate {
            alternate.run(interpreter)
        } else {
            Ok(Value::undefined())
        }
    }
}
