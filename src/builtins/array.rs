//! The global `Array` constructor and `Array.prototype`.
//!
//! Arrays are ordinary objects with the `Array` flavour tag: index writes
//! maintain `length`, and the callback-taking methods re-enter the
//! evaluator, which is how script callbacks cross the host boundary in
//! the other direction.

use super::{attach_fn, make_constructor};
use crate::error::Completion;
use crate::exec::Interpreter;
use crate::realm::Intrinsics;
use crate::value::{Object, ObjectData, Value};

pub(crate) fn create(intrinsics: &Intrinsics) -> Value {
    let prototype = &intrinsics.array_prototype;
    attach_fn(prototype, "push", push);
    attach_fn(prototype, "pop", pop);
    attach_fn(prototype, "join", join);
    attach_fn(prototype, "indexOf", index_of);
    attach_fn(prototype, "slice", slice);
    attach_fn(prototype, "concat", concat);
    attach_fn(prototype, "map", map);
    attach_fn(prototype, "filter", filter);
    attach_fn(prototype, "forEach", for_each);

    let constructor = make_constructor("Array", constructor, prototype);
    attach_fn(&constructor, "isArray", is_array);
    constructor
}

/// A fresh empty array linked to the realm's `Array.prototype`.
pub(crate) fn new_array(interpreter: &Interpreter) -> Value {
    let value = Value::object(Object::new(
        ObjectData::Array,
        interpreter.intrinsics().array_prototype.clone(),
    ));
    value.set_field("length", Value::number(0));
    value
}

/// An array holding the given elements in order.
pub(crate) fn array_of<I>(interpreter: &Interpreter, elements: I) -> Value
where
    I: IntoIterator<Item = Value>,
{
    let array = new_array(interpreter);
    for (index, element) in elements.into_iter().enumerate() {
        array.set_field(index.to_string(), element);
    }
    array
}

fn length_of(value: &Value) -> u32 {
    value.get_field("length").to_uint32()
}

fn element(value: &Value, index: u32) -> Value {
    value.get_field(&index.to_string())
}

/// `Array(…)` / `new Array(…)`: one numeric argument preallocates a
/// length, anything else lists the elements.
fn constructor(_this: &Value, args: &[Value], interpreter: &mut Interpreter) -> Completion {
    if args.len() == 1 {
        if let crate::value::ValueData::Number(n) = args[0].data() {
            let array = new_array(interpreter);
            array.set_field("length", Value::number(n.trunc()));
            return Ok(array);
        }
    }
    Ok(array_of(interpreter, args.iter().cloned()))
}

fn is_array(_this: &Value, args: &[Value], _: &mut Interpreter) -> Completion {
    let result = args
        .first()
        .and_then(Value::as_object)
        .map_or(false, |cell| cell.borrow().is_array());
    Ok(Value::boolean(result))
}

fn push(this: &Value, args: &[Value], _: &mut Interpreter) -> Completion {
    let mut length = length_of(this);
    for arg in args {
        this.set_field(length.to_string(), arg.clone());
        length += 1;
    }
    Ok(Value::number(length))
}

fn pop(this: &Value, _: &[Value], _: &mut Interpreter) -> Completion {
    let length = length_of(this);
    if length == 0 {
        return Ok(Value::undefined());
    }
    let last = element(this, length - 1);
    this.remove_field(&(length - 1).to_string());
    this.set_field("length", Value::number(length - 1));
    Ok(last)
}

fn join(this: &Value, args: &[Value], _: &mut Interpreter) -> Completion {
    let separator = match args.first() {
        Some(sep) if !sep.is_undefined() => sep.to_js_string(),
        _ => ",".to_owned(),
    };
    let length = length_of(this);
    let mut parts = Vec::with_capacity(length as usize);
    for index in 0..length {
        let item = element(this, index);
        if item.is_null_or_undefined() {
            parts.push(String::new());
        } else {
            parts.push(item.to_js_string());
        }
    }
    Ok(Value::string(parts.join(&separator)))
}

fn index_of(this: &Value, args: &[Value], _: &mut Interpreter) -> Completion {
    let needle = args.first().cloned().unwrap_or_else(Value::undefined);
    let length = length_of(this);
    let from = match args.get(1) {
        Some(v) => {
            let n = v.to_number();
            if n < 0.0 {
                (length as f64 + n).max(0.0) as u32
            } else {
                n as u32
            }
        }
        None => 0,
    };
    for index in from..length {
        if element(this, index).strict_equals(&needle) {
            return Ok(Value::number(index));
        }
    }
    Ok(Value::number(-1))
}

fn slice(this: &Value, args: &[Value], interpreter: &mut Interpreter) -> Completion {
    let length = length_of(this) as f64;
    let resolve = |bound: Option<&Value>, default: f64| -> f64 {
        match bound {
            Some(v) if !v.is_undefined() => {
                let n = v.to_number();
                if n < 0.0 {
                    (length + n).max(0.0)
                } else {
                    n.min(length)
                }
            }
            _ => default,
        }
    };
    let begin = resolve(args.first(), 0.0) as u32;
    let end = resolve(args.get(1), length) as u32;
    let result = new_array(interpreter);
    let mut cursor = 0u32;
    for index in begin..end {
        result.set_field(cursor.to_string(), element(this, index));
        cursor += 1;
    }
    Ok(result)
}

fn concat(this: &Value, args: &[Value], interpreter: &mut Interpreter) -> Completion {
    let result = new_array(interpreter);
    let mut cursor = 0u32;
    let mut append = |value: Value| {
        result.set_field(cursor.to_string(), value);
        cursor += 1;
    };
    for index in 0..length_of(this) {
        append(element(this, index));
    }
    for arg in args {
        let is_array = arg
            .as_object()
            .map_or(false, |cell| cell.borrow().is_array());
        if is_array {
            for index in 0..length_of(arg) {
                append(element(arg, index));
            }
        } else {
            append(arg.clone());
        }
    }
    Ok(result)
}

fn callback_of(args: &[Value], interpreter: &mut Interpreter) -> Result<Value, crate::error::Abrupt> {
    match args.first() {
        Some(callback) if callback.is_callable() => Ok(callback.clone()),
        _ => Err(interpreter.throw_error("Value is not a function")),
    }
}

fn map(this: &Value, args: &[Value], interpreter: &mut Interpreter) -> Completion {
    let callback = callback_of(args, interpreter)?;
    let receiver = args.get(1).cloned().unwrap_or_else(Value::undefined);
    let length = length_of(this);
    let result = new_array(interpreter);
    for index in 0..length {
        let mapped = interpreter.call(
            &callback,
            &receiver,
            &[element(this, index), Value::number(index), this.clone()],
        )?;
        result.set_field(index.to_string(), mapped);
    }
    Ok(result)
}

fn filter(this: &Value, args: &[Value], interpreter: &mut Interpreter) -> Completion {
    let callback = callback_of(args, interpreter)?;
    let receiver = args.get(1).cloned().unwrap_or_else(Value::undefined);
    let length = length_of(this);
    let result = new_array(interpreter);
    let mut cursor = 0u32;
    for index in 0..length {
        let item = element(this, index);
        let keep = interpreter
            .call(
                &callback,
                &receiver,
                &[item.clone(), Value::number(index), this.clone()],
            )?
            .to_boolean();
        if keep {
            result.set_field(cursor.to_string(), item);
            cursor += 1;
        }
    }
    Ok(result)
}

fn for_each(this: &Value, args: &[Value], interpreter: &mut Interpreter) -> Completion {
    let callback = callback_of(args, interpreter)?;
    let receiver = args.get(1).cloned().unwrap_or_else(Value::undefined);
    let length = length_of(this);
    for index in 0..length {
        interpreter.call(
            &callback,
            &receiver,
            &[element(this, index), Value::number(index), this.clone()],
        )?;
    }
    Ok(Value::undefined())
}
