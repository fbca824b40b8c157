//! Switch execution, with ECMAScript fall-through.

use super::{Executable, Interpreter};
use crate::ast::SwitchStatement;
use crate::error::{Abrupt, Completion};
use crate::value::Value;

impl Executable for SwitchStatement {
    fn run(&self, interpreter: &mut Interpreter) -> Completion {
        let discriminant = self.discriminant.run(interpreter)?;
        // The case bodies share one frame, like a block.
        interpreter.realm_mut().environment.push_block();
        let result = self.run_cases(interpreter, &discriminant);
        interpreter.realm_mut().environment.pop();
        result
    }
}

impl SwitchStatement {
    fn run_cases(&self, interpreter: &mut Interpreter, discriminant: &Value) -> Completion {
        // Tests run in order until one matches strictly; the default arm
        // only fires when nothing matched, wherever it is written.
        let mut start = None;
        for (index, case) in self.cases.iter().enumerate() {
            if let Some(test) = &case.test {
                let test_value = test.run(interpreter)?;
                if discriminant.strict_equals(&test_value) {
                    start = Some(index);
                    break;
                }
            }
        }
        if start.is_none() {
            start = self
                .cases
                .iter()
                .position(|case| case.test.is_none());
        }
        let start = match start {
            Some(index) => index,
            None => return Ok(Value::undefined()),
        };

        // From the selected arm, execution falls through every following
        // arm until a `break` (or any other transfer) stops it.
        let mut result = Value::undefined();
        for case in &self.cases[start..] {
            for statement in &case.consequent {
                match statement.run(interpreter) {
                    Ok(value) => result = value,
                    Err(Abrupt::Break(None)) => return Ok(result),
                    Err(other) => return Err(other),
                }
            }
        }
        Ok(result)
    }
}
