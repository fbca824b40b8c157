//! The global `String` constructor and the methods string primitives
//! answer through `String.prototype`.

use super::{attach_fn, make_constructor};
use crate::builtins::array;
use crate::error::Completion;
use crate::exec::Interpreter;
use crate::realm::Intrinsics;
use crate::value::Value;

pub(crate) fn create(intrinsics: &Intrinsics) -> Value {
    let prototype = &intrinsics.string_prototype;
    attach_fn(prototype, "charAt", char_at);
    attach_fn(prototype, "charCodeAt", char_code_at);
    attach_fn(prototype, "indexOf", index_of);
    attach_fn(prototype, "lastIndexOf", last_index_of);
    attach_fn(prototype, "slice", slice);
    attach_fn(prototype, "substring", substring);
    attach_fn(prototype, "split", split);
    attach_fn(prototype, "toUpperCase", to_upper_case);
    attach_fn(prototype, "toLowerCase", to_lower_case);
    attach_fn(prototype, "trim", trim);
    attach_fn(prototype, "toString", to_string);

    let constructor = make_constructor("String", constructor, prototype);
    attach_fn(&constructor, "fromCharCode", from_char_code);
    constructor
}

fn constructor(_this: &Value, args: &[Value], _: &mut Interpreter) -> Completion {
    Ok(Value::string(
        args.first().map(|v| v.to_js_string()).unwrap_or_default(),
    ))
}

fn receiver(this: &Value) -> String {
    this.to_js_string()
}

fn char_at(this: &Value, args: &[Value], _: &mut Interpreter) -> Completion {
    let string = receiver(this);
    let index = args.first().map(|v| v.to_number()).unwrap_or(0.0);
    if index < 0.0 || index.is_nan() {
        return Ok(Value::string(""));
    }
    Ok(Value::string(
        string
            .chars()
            .nth(index as usize)
            .map(|c| c.to_string())
            .unwrap_or_default(),
    ))
}

fn char_code_at(this: &Value, args: &[Value], _: &mut Interpreter) -> Completion {
    let string = receiver(this);
    let index = args.first().map(|v| v.to_number()).unwrap_or(0.0);
    if index < 0.0 || index.is_nan() {
        return Ok(Value::nan());
    }
    Ok(string
        .encode_utf16()
        .nth(index as usize)
        .map(|unit| Value::number(unit))
        .unwrap_or_else(Value::nan))
}

fn index_of(this: &Value, args: &[Value], _: &mut Interpreter) -> Completion {
    let string = receiver(this);
    let needle = args
        .first()
        .map(|v| v.to_js_string())
        .unwrap_or_else(|| "undefined".into());
    let chars: Vec<char> = string.chars().collect();
    let from = args
        .get(1)
        .map(|v| v.to_number().max(0.0) as usize)
        .unwrap_or(0);
    let haystack: String = chars.iter().skip(from).collect();
    match haystack.find(&needle) {
        Some(byte_index) => {
            let char_index = haystack[..byte_index].chars().count() + from;
            Ok(Value::number(char_index as u32))
        }
        None => Ok(Value::number(-1)),
    }
}

fn last_index_of(this: &Value, args: &[Value], _: &mut Interpreter) -> Completion {
    let string = receiver(this);
    let needle = args
        .first()
        .map(|v| v.to_js_string())
        .unwrap_or_else(|| "undefined".into());
    match string.rfind(&needle) {
        Some(byte_index) => Ok(Value::number(string[..byte_index].chars().count() as u32)),
        None => Ok(Value::number(-1)),
    }
}

fn resolve_bound(length: f64, bound: Option<&Value>, default: f64) -> f64 {
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
}

fn slice(this: &Value, args: &[Value], _: &mut Interpreter) -> Completion {
    let chars: Vec<char> = receiver(this).chars().collect();
    let length = chars.len() as f64;
    let begin = resolve_bound(length, args.first(), 0.0) as usize;
    let end = resolve_bound(length, args.get(1), length) as usize;
    if begin >= end {
        return Ok(Value::string(""));
    }
    Ok(Value::string(chars[begin..end].iter().collect::<String>()))
}

fn substring(this: &Value, args: &[Value], _: &mut Interpreter) -> Completion {
    let chars: Vec<char> = receiver(this).chars().collect();
    let length = chars.len() as f64;
    let clamp = |value: Option<&Value>, default: f64| -> usize {
        match value {
            Some(v) if !v.is_undefined() => v.to_number().max(0.0).min(length) as usize,
            _ => default as usize,
        }
    };
    let mut begin = clamp(args.first(), 0.0);
    let mut end = clamp(args.get(1), length);
    // substring swaps reversed bounds instead of returning "".
    if begin > end {
        std::mem::swap(&mut begin, &mut end);
    }
    Ok(Value::string(chars[begin..end].iter().collect::<String>()))
}

fn split(this: &Value, args: &[Value], interpreter: &mut Interpreter) -> Completion {
    let string = receiver(this);
    let separator = match args.first() {
        None => return Ok(array::array_of(interpreter, vec![Value::string(string)])),
        Some(v) if v.is_undefined() => {
            return Ok(array::array_of(interpreter, vec![Value::string(string)]))
        }
        Some(v) => v.to_js_string(),
    };
    let parts: Vec<Value> = if separator.is_empty() {
        string
            .chars()
            .map(|c| Value::string(c.to_string()))
            .collect()
    } else {
        string
            .split(separator.as_str())
            .map(Value::string)
            .collect()
    };
    Ok(array::array_of(interpreter, parts))
}

fn to_upper_case(this: &Value, _: &[Value], _: &mut Interpreter) -> Completion {
    Ok(Value::string(receiver(this).to_uppercase()))
}

fn to_lower_case(this: &Value, _: &[Value], _: &mut Interpreter) -> Completion {
    Ok(Value::string(receiver(this).to_lowercase()))
}

fn trim(this: &Value, _: &[Value], _: &mut Interpreter) -> Completion {
    Ok(Value::string(receiver(this).trim().to_owned()))
}

fn to_string(this: &Value, _: &[Value], _: &mut Interpreter) -> Completion {
    Ok(Value::string(receiver(this)))
}

fn from_char_code(_this: &Value, args: &[Value], _: &mut Interpreter) -> Completion {
    let units: Vec<u16> = args.iter().map(|v| v.to_uint32() as u16).collect();
    Ok(Value::string(String::from_utf16_lossy(&units)))
}
