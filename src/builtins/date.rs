//! A minimal `Date`: construction, epoch milliseconds and ISO rendering.

use super::{attach_fn, make_constructor};
use crate::error::Completion;
use crate::exec::Interpreter;
use crate::realm::Intrinsics;
use crate::value::{Object, ObjectData, Value};
use chrono::{TimeZone, Utc};

pub(crate) fn create(intrinsics: &Intrinsics) -> Value {
    let prototype = &intrinsics.date_prototype;
    attach_fn(prototype, "getTime", get_time);
    attach_fn(prototype, "valueOf", get_time);
    attach_fn(prototype, "toISOString", to_iso_string);

    let constructor = make_constructor("Date", constructor, prototype);
    attach_fn(&constructor, "now", now);
    constructor
}

fn now_millis() -> f64 {
    Utc::now().timestamp_millis() as f64
}

fn constructor(_this: &Value, args: &[Value], interpreter: &mut Interpreter) -> Completion {
    let millis = match args.first() {
        Some(value) => value.to_number(),
        None => now_millis(),
    };
    Ok(Value::object(Object::new(
        ObjectData::Date(millis),
        interpreter.intrinsics().date_prototype.clone(),
    )))
}

fn millis_of(this: &Value) -> Option<f64> {
    let cell = this.as_object()?;
    match cell.borrow().data {
        ObjectData::Date(millis) => Some(millis),
        _ => None,
    }
}

fn now(_this: &Value, _: &[Value], _: &mut Interpreter) -> Completion {
    Ok(Value::number(now_millis()))
}

fn get_time(this: &Value, _: &[Value], _: &mut Interpreter) -> Completion {
    Ok(millis_of(this).map(Value::number).unwrap_or_else(Value::nan))
}

fn to_iso_string(this: &Value, _: &[Value], interpreter: &mut Interpreter) -> Completion {
    let millis = match millis_of(this) {
        Some(millis) if millis.is_finite() => millis,
        _ => return Err(interpreter.throw_error("Invalid time value")),
    };
    match Utc.timestamp_millis_opt(millis as i64).single() {
        Some(moment) => Ok(Value::string(
            moment.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        )),
        None => Err(interpreter.throw_error("Invalid time value")),
    }
}
