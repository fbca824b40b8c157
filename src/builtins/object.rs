//! The global `Object` constructor and `Object.prototype`.

use super::{attach_fn, make_constructor};
use crate::builtins::array;
use crate::error::Completion;
use crate::exec::Interpreter;
use crate::realm::Intrinsics;
use crate::value::Value;

pub(crate) fn create(intrinsics: &Intrinsics) -> Value {
    let prototype = &intrinsics.object_prototype;
    attach_fn(prototype, "hasOwnProperty", has_own_property);
    attach_fn(prototype, "toString", to_string);

    let constructor = make_constructor("Object", constructor, prototype);
    attach_fn(&constructor, "keys", keys);
    constructor
}

/// `Object(v)` / `new Object(v)`: pass objects through, box nothing.
fn constructor(_this: &Value, args: &[Value], interpreter: &mut Interpreter) -> Completion {
    match args.first() {
        Some(value) if value.is_object_like() => Ok(value.clone()),
        _ => Ok(interpreter.new_object()),
    }
}

fn has_own_property(this: &Value, args: &[Value], _: &mut Interpreter) -> Completion {
    let key = args
        .first()
        .map(|v| v.to_js_string())
        .unwrap_or_else(|| "undefined".into());
    let owned = match this.as_object() {
        Some(cell) => cell.borrow().properties().contains_key(&key),
        None => match this.as_function() {
            Some(cell) => cell.borrow().properties().contains_key(&key),
            None => false,
        },
    };
    Ok(Value::boolean(owned))
}

fn to_string(this: &Value, _: &[Value], _: &mut Interpreter) -> Completion {
    Ok(Value::string(this.to_js_string()))
}

/// `Object.keys(o)`: own enumerable keys, insertion order.
fn keys(_this: &Value, args: &[Value], interpreter: &mut Interpreter) -> Completion {
    let keys = args
        .first()
        .map(|v| v.enumerable_keys())
        .unwrap_or_default();
    Ok(array::array_of(
        interpreter,
        keys.into_iter().map(Value::string),
    ))
}
