//! The global `Number` constructor, numeric globals and parsing helpers.

use super::{attach_fn, make_constructor};
use crate::error::Completion;
use crate::exec::Interpreter;
use crate::realm::Intrinsics;
use crate::value::Value;

pub(crate) fn create(intrinsics: &Intrinsics) -> Value {
    let prototype = &intrinsics.number_prototype;
    attach_fn(prototype, "toString", to_string);
    attach_fn(prototype, "toFixed", to_fixed);
    make_constructor("Number", constructor, prototype)
}

fn constructor(_this: &Value, args: &[Value], _: &mut Interpreter) -> Completion {
    Ok(Value::number(
        args.first().map(|v| v.to_number()).unwrap_or(0.0),
    ))
}

fn to_string(this: &Value, _: &[Value], _: &mut Interpreter) -> Completion {
    Ok(Value::string(this.to_js_string()))
}

fn to_fixed(this: &Value, args: &[Value], _: &mut Interpreter) -> Completion {
    let digits = args
        .first()
        .map(|v| v.to_number().max(0.0).min(20.0) as usize)
        .unwrap_or(0);
    Ok(Value::string(format!("{:.*}", digits, this.to_number())))
}

/// The global `parseInt`.
pub(crate) fn parse_int(_this: &Value, args: &[Value], _: &mut Interpreter) -> Completion {
    let text = args
        .first()
        .map(|v| v.to_js_string())
        .unwrap_or_else(|| "undefined".into());
    let mut radix = args.get(1).map(|v| v.to_int32()).unwrap_or(0);

    let mut rest = text.trim_start();
    let mut sign = 1.0;
    if let Some(stripped) = rest.strip_prefix('-') {
        sign = -1.0;
        rest = stripped;
    } else if let Some(stripped) = rest.strip_prefix('+') {
        rest = stripped;
    }

    if radix == 16 || radix == 0 {
        if let Some(stripped) = rest
            .strip_prefix("0x")
            .or_else(|| rest.strip_prefix("0X"))
        {
            rest = stripped;
            radix = 16;
        }
    }
    if radix == 0 {
        radix = 10;
    }
    if !(2..=36).contains(&radix) {
        return Ok(Value::nan());
    }

    let digits: String = rest
        .chars()
        .take_while(|c| c.is_digit(radix as u32))
        .collect();
    if digits.is_empty() {
        return Ok(Value::nan());
    }
    let mut result = 0.0f64;
    for c in digits.chars() {
        result = result * radix as f64 + c.to_digit(radix as u32).unwrap_or(0) as f64;
    }
    Ok(Value::number(sign * result))
}

/// The global `parseFloat`: the longest numeric prefix, or NaN.
pub(crate) fn parse_float(_this: &Value, args: &[Value], _: &mut Interpreter) -> Completion {
    let text = args
        .first()
        .map(|v| v.to_js_string())
        .unwrap_or_else(|| "undefined".into());
    let trimmed = text.trim_start();
    let candidate: String = trimmed
        .chars()
        .take_while(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
        .collect();
    for end in (1..=candidate.len()).rev() {
        if let Ok(value) = candidate[..end].parse::<f64>() {
            return Ok(Value::number(value));
        }
    }
    Ok(Value::nan())
}

pub(crate) fn global_is_nan(_this: &Value, args: &[Value], _: &mut Interpreter) -> Completion {
    Ok(Value::boolean(
        args.first().map(|v| v.to_number().is_nan()).unwrap_or(true),
    ))
}

pub(crate) fn global_is_finite(_this: &Value, args: &[Value], _: &mut Interpreter) -> Completion {
    Ok(Value::boolean(
        args.first()
            .map(|v| v.to_number().is_finite())
            .unwrap_or(false),
    ))
}
