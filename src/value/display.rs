//! Diagnostic rendering of values.
//!
//! `Display` is for humans: arrays render as `[ 1, 2 ]`, objects as
//! `{ a: 1 }`. Script-visible string conversion is
//! [`Value::to_js_string`](super::Value::to_js_string), which follows the
//! ECMAScript ToString rules instead.
//!
//! Objects can be cyclic, so nesting is cut off after one level rather
//! than chased.

use super::conversions::number_to_js_string;
use super::{ObjectData, Value, ValueData};
use std::fmt;

const MAX_DEPTH: usize = 1;

fn format_value(value: &Value, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    match value.data() {
        ValueData::Undefined => f.write_str("undefined"),
        ValueData::Null => f.write_str("null"),
        ValueData::Boolean(b) => write!(f, "{}", b),
        ValueData::Number(n) => f.write_str(&number_to_js_string(*n)),
        ValueData::String(s) => {
            if depth == 0 {
                f.write_str(s)
            } else {
                write!(f, "\"{}\"", s)
            }
        }
        ValueData::RegExp(r) => write!(f, "/{}/{}", r.source, r.flags),
        ValueData::Object(cell) => {
            let object = cell.borrow();
            match object.data {
                ObjectData::Error => f.write_str(&error_to_string(value)),
                ObjectData::Array | ObjectData::Arguments => {
                    if depth >= MAX_DEPTH {
                        return f.write_str("[Array]");
                    }
                    let length = object
                        .properties()
                        .get("length")
                        .map(|v| v.to_uint32())
                        .unwrap_or(0);
                    if length == 0 {
                        return f.write_str("[]");
                    }
                    f.write_str("[ ")?;
                    for index in 0..length {
                        if index > 0 {
                            f.write_str(", ")?;
                        }
                        match object.properties().get(&index.to_string()) {
                            Some(element) => format_value(element, f, depth + 1)?,
                            None => f.write_str("<empty>")?,
                        }
                    }
                    f.write_str(" ]")
                }
                _ => {
                    if depth >= MAX_DEPTH {
                        return f.write_str("[Object]");
                    }
                    if object.properties().is_empty() {
                        return f.write_str("{}");
                    }
                    f.write_str("{ ")?;
                    for (i, (key, nested)) in object.properties().iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{}: ", key)?;
                        format_value(nested, f, depth + 1)?;
                    }
                    f.write_str(" }")
                }
            }
        }
        ValueData::Function(cell) => match cell.borrow().name() {
            Some(name) => write!(f, "function {}() {{ ... }}", name),
            None => f.write_str("function () { ... }"),
        },
        ValueData::Host(host) => write!(f, "{:?}", host),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_value(self, f, 0)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value({})", self)
    }
}

/// Renders an exception the way an uncaught-error report expects:
/// `name: message` for error objects, the display form otherwise.
pub fn error_to_string(value: &Value) -> String {
    if let ValueData::Object(cell) = value.data() {
        let object = cell.borrow();
        if object.data == ObjectData::Error {
            let name = object
                .properties()
                .get("name")
                .map(|v| v.to_js_string())
                .unwrap_or_else(|| "Error".into());
            let message = object
                .properties()
                .get("message")
                .map(|v| v.to_js_string())
                .unwrap_or_default();
            return if message.is_empty() {
                name
            } else {
                format!("{}: {}", name, message)
            };
        }
    }
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Object, ObjectData};

    #[test]
    fn arrays_display_bracketed() {
        let array = Value::object(Object::new(ObjectData::Array, Value::null()));
        array.set_field("0", Value::number(1));
        array.set_field("1", Value::string("x"));
        assert_eq!(array.to_string(), "[ 1, \"x\" ]");
    }

    #[test]
    fn cyclic_objects_do_not_recurse() {
        let object = Value::object(Object::default());
        object.set_field("me", object.clone());
        assert_eq!(object.to_string(), "{ me: [Object] }");
    }

    #[test]
    fn error_objects_render_name_and_message() {
        let error = Value::object(Object::new(ObjectData::Error, Value::null()));
        error.set_field("name", Value::string("Error"));
        error.set_field("message", Value::string("boom"));
        assert_eq!(error_to_string(&error), "Error: boom");
    }

    #[test]
    fn non_error_exceptions_render_their_display_form() {
        assert_eq!(error_to_string(&Value::string("whoops")), "whoops");
        assert_eq!(error_to_string(&Value::number(3)), "3");
    }
}
