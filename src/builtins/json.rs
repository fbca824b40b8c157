//! The `JSON` namespace, bridged through serde_json.

use super::attach_fn;
use crate::builtins::array;
use crate::error::{Abrupt, Completion};
use crate::exec::Interpreter;
use crate::realm::Intrinsics;
use crate::value::{Object, ObjectData, Value, ValueData};
use serde_json::{Map, Number, Value as JsonValue};

pub(crate) fn create(intrinsics: &Intrinsics) -> Value {
    let json = Value::object(Object::new(
        ObjectData::Ordinary,
        intrinsics.object_prototype.clone(),
    ));
    attach_fn(&json, "parse", parse);
    attach_fn(&json, "stringify", stringify);
    json
}

fn parse(_this: &Value, args: &[Value], interpreter: &mut Interpreter) -> Completion {
    let text = args
        .first()
        .map(|v| v.to_js_string())
        .unwrap_or_else(|| "undefined".into());
    match serde_json::from_str::<JsonValue>(&text) {
        Ok(json) => Ok(from_json(interpreter, json)),
        Err(error) => Err(interpreter.throw_error(format!("JSON.parse: {}", error))),
    }
}

fn from_json(interpreter: &mut Interpreter, json: JsonValue) -> Value {
    match json {
        JsonValue::Null => Value::null(),
        JsonValue::Bool(b) => Value::boolean(b),
        JsonValue::Number(n) => Value::number(n.as_f64().unwrap_or(f64::NAN)),
        JsonValue::String(s) => Value::string(s),
        JsonValue::Array(items) => {
            let elements: Vec<Value> = items
                .into_iter()
                .map(|item| from_json(interpreter, item))
                .collect();
            array::array_of(interpreter, elements)
        }
        JsonValue::Object(entries) => {
            let object = interpreter.new_object();
            for (key, item) in entries {
                let value = from_json(interpreter, item);
                object.set_field(key, value);
            }
            object
        }
    }
}

fn stringify(_this: &Value, args: &[Value], interpreter: &mut Interpreter) -> Completion {
    let value = match args.first() {
        Some(value) => value,
        None => return Ok(Value::undefined()),
    };
    let mut seen = Vec::new();
    match to_json(interpreter, value, &mut seen)? {
        // `JSON.stringify(undefined)` is undefined, not "undefined".
        None => Ok(Value::undefined()),
        Some(json) => Ok(Value::string(json.to_string())),
    }
}

/// Converts a value to its JSON image; `None` for the kinds JSON omits
/// (undefined, functions).
fn to_json(
    interpreter: &mut Interpreter,
    value: &Value,
    seen: &mut Vec<*const ValueData>,
) -> Result<Option<JsonValue>, Abrupt> {
    Ok(match value.data() {
        ValueData::Undefined | ValueData::Function(_) | ValueData::Host(_) => None,
        ValueData::Null => Some(JsonValue::Null),
        ValueData::Boolean(b) => Some(JsonValue::Bool(*b)),
        ValueData::Number(n) => Some(match Number::from_f64(*n) {
            Some(number) => JsonValue::Number(number),
            // NaN and the infinities serialize as null.
            None => JsonValue::Null,
        }),
        ValueData::String(s) => Some(JsonValue::String(s.clone())),
        ValueData::RegExp(_) => Some(JsonValue::Object(Map::new())),
        ValueData::Object(cell) => {
            let marker = value.data() as *const ValueData;
            if seen.contains(&marker) {
                return Err(
                    interpreter.throw_error("Converting circular structure to JSON")
                );
            }
            seen.push(marker);

            let is_array = cell.borrow().is_array();
            let result = if is_array {
                let length = value.get_field("length").to_uint32();
                let mut items = Vec::with_capacity(length as usize);
                for index in 0..length {
                    let element = value.get_field(&index.to_string());
                    items.push(
                        to_json(interpreter, &element, seen)?.unwrap_or(JsonValue::Null),
                    );
                }
                Some(JsonValue::Array(items))
            } else {
                let entries = value.enumerable_entries();
                let mut map = Map::new();
                for (key, entry) in entries {
                    if let Some(json) = to_json(interpreter, &entry, seen)? {
                        map.insert(key, json);
                    }
                }
                Some(JsonValue::Object(map))
            };

            seen.pop();
            result
        }
    })
}
