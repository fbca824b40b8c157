//! The global `Boolean` constructor.

use super::{attach_fn, make_constructor};
use crate::error::Completion;
use crate::exec::Interpreter;
use crate::realm::Intrinsics;
use crate::value::Value;

pub(crate) fn create(intrinsics: &Intrinsics) -> Value {
    let prototype = &intrinsics.boolean_prototype;
    attach_fn(prototype, "toString", to_string);
    make_constructor("Boolean", constructor, prototype)
}

fn constructor(_this: &Value, args: &[Value], _: &mut Interpreter) -> Completion {
    Ok(Value::boolean(
        args.first().map(|v| v.to_boolean()).unwrap_or(false),
    ))
}

fn to_string(this: &Value, _: &[Value], _: &mut Interpreter) -> Completion {
    Ok(Value::string(this.to_js_string()))
}
