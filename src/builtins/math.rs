//! The `Math` namespace.

use super::attach_fn;
use crate::error::Completion;
use crate::exec::Interpreter;
use crate::realm::Intrinsics;
use crate::value::{Object, ObjectData, Value};

pub(crate) fn create(intrinsics: &Intrinsics) -> Value {
    let math = Value::object(Object::new(
        ObjectData::Ordinary,
        intrinsics.object_prototype.clone(),
    ));
    math.set_field("PI", Value::number(std::f64::consts::PI));
    math.set_field("E", Value::number(std::f64::consts::E));
    attach_fn(&math, "abs", abs);
    attach_fn(&math, "ceil", ceil);
    attach_fn(&math, "floor", floor);
    attach_fn(&math, "round", round);
    attach_fn(&math, "sqrt", sqrt);
    attach_fn(&math, "pow", pow);
    attach_fn(&math, "min", min);
    attach_fn(&math, "max", max);
    attach_fn(&math, "random", random);
    math
}

fn argument(args: &[Value]) -> f64 {
    args.first().map(|v| v.to_number()).unwrap_or(f64::NAN)
}

fn abs(_this: &Value, args: &[Value], _: &mut Interpreter) -> Completion {
    Ok(Value::number(argument(args).abs()))
}

fn ceil(_this: &Value, args: &[Value], _: &mut Interpreter) -> Completion {
    Ok(Value::number(argument(args).ceil()))
}

fn floor(_this: &Value, args: &[Value], _: &mut Interpreter) -> Completion {
    Ok(Value::number(argument(args).floor()))
}

fn round(_this: &Value, args: &[Value], _: &mut Interpreter) -> Completion {
    // JavaScript rounds .5 towards +Infinity, which is not what
    // `f64::round` does for negative inputs.
    let n = argument(args);
    let rounded = if n.is_finite() { (n + 0.5).floor() } else { n };
    Ok(Value::number(rounded))
}

fn sqrt(_this: &Value, args: &[Value], _: &mut Interpreter) -> Completion {
    Ok(Value::number(argument(args).sqrt()))
}

fn pow(_this: &Value, args: &[Value], _: &mut Interpreter) -> Completion {
    let base = argument(args);
    let exponent = args.get(1).map(|v| v.to_number()).unwrap_or(f64::NAN);
    Ok(Value::number(base.powf(exponent)))
}

fn min(_this: &Value, args: &[Value], _: &mut Interpreter) -> Completion {
    let mut result = f64::INFINITY;
    for arg in args {
        let n = arg.to_number();
        if n.is_nan() {
            return Ok(Value::nan());
        }
        result = result.min(n);
    }
    Ok(Value::number(result))
}

fn max(_this: &Value, args: &[Value], _: &mut Interpreter) -> Completion {
    let mut result = f64::NEG_INFINITY;
    for arg in args {
        let n = arg.to_number();
        if n.is_nan() {
            return Ok(Value::nan());
        }
        result = result.max(n);
    }
    Ok(Value::number(result))
}

fn random(_this: &Value, _: &[Value], _: &mut Interpreter) -> Completion {
    Ok(Value::number(rand::random::<f64>()))
}
