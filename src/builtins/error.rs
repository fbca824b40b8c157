//! The global `Error` constructor.
//!
//! Engine-raised exceptions ("x is not defined", "Value is not a
//! function") are the same error objects scripts build with
//! `new Error(message)`, so `catch (e) { e.message }` works uniformly.

use super::{attach_fn, make_constructor};
use crate::error::Completion;
use crate::exec::Interpreter;
use crate::realm::Intrinsics;
use crate::value::{Object, ObjectData, Value};

pub(crate) fn create(intrinsics: &Intrinsics) -> Value {
    let prototype = &intrinsics.error_prototype;
    attach_fn(prototype, "toString", to_string);
    make_constructor("Error", constructor, prototype)
}

/// Builds an error object linked to the realm's `Error.prototype`.
pub(crate) fn create_error(interpreter: &Interpreter, message: String) -> Value {
    let error = Value::object(Object::new(
        ObjectData::Error,
        interpreter.intrinsics().error_prototype.clone(),
    ));
    error.set_field("name", Value::string("Error"));
    error.set_field("message", Value::string(message));
    error
}

fn constructor(_this: &Value, args: &[Value], interpreter: &mut Interpreter) -> Completion {
    let message = match args.first() {
        Some(value) if !value.is_undefined() => value.to_js_string(),
        _ => String::new(),
    };
    Ok(create_error(interpreter, message))
}

fn to_string(this: &Value, _: &[Value], _: &mut Interpreter) -> Completion {
    Ok(Value::string(crate::value::display::error_to_string(this)))
}
