//! The gated dynamic-evaluation primitive.
//!
//! `eval` only works when the embedder configured a parse callback; the
//! engine itself never turns strings into code. Evaluation happens at
//! global scope and on the caller's op counter, so runaway dynamic code
//! still trips the same guard.

use crate::error::Completion;
use crate::exec::Interpreter;
use crate::value::{Value, ValueData};

pub(crate) fn eval(_this: &Value, args: &[Value], interpreter: &mut Interpreter) -> Completion {
    let source = match args.first() {
        None => return Ok(Value::undefined()),
        Some(value) => match value.data() {
            ValueData::String(source) => source.clone(),
            // Like the host language: eval of a non-string is the value.
            _ => return Ok(value.clone()),
        },
    };
    interpreter.dynamic_eval(&source)
}
