//! Try/catch/finally execution.
//!
//! Only user exceptions ([`Abrupt::Throw`]) reach the handler. The
//! control-flow signals (`return`, `break`, `continue`) and host faults
//! re-throw immediately so they arrive at their real target without ever
//! being observable from script; the finalizer still runs on every path,
//! and its own abrupt completion supersedes the try/catch outcome.

use super::{Executable, Interpreter};
use crate::ast::TryStatement;
use crate::error::{Abrupt, Completion};
use crate::profiler::Profiler;

impl Executable for TryStatement {
    fn run(&self, interpreter: &mut Interpreter) -> Completion {
        let _timer = Profiler::global().start_event("Try", "exec");

        let mut result = match self.block.run(interpreter) {
            Err(Abrupt::Throw(exception)) => match &self.handler {
                Some(catch) => {
                    interpreter.realm_mut().environment.push_block();
                    if let Some(param) = &catch.param {
                        interpreter
                            .realm_mut()
                            .environment
                            .declare_let(param.name.clone(), exception);
                    }
                    let handled = catch.body.run(interpreter);
                    interpreter.realm_mut().environment.pop();
                    handled
                }
                None => Err(Abrupt::Throw(exception)),
            },
            other => other,
        };

        if let Some(finalizer) = &self.finalizer {
            if let Err(err) = finalizer.run(interpreter) {
                result = Err(err);
            }
        }
        result
    }
}
