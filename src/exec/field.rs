//! Member access, including the reflective-access filter.
//!
//! Reads pass through a small blocklist before the lookup:
//!
//! | name          | condition                              | result    |
//! |---------------|----------------------------------------|-----------|
//! | `__proto__`   | any receiver                           | undefined |
//! | `prototype`   | receiver is not a function             | undefined |
//! | `constructor` | resolves to an engine constructor      | undefined |
//!
//! Writes are not filtered; the contract is read-side blocking of the
//! reflective escape paths only.

use super::{Executable, Interpreter};
use crate::ast::{Expression, MemberExpression};
use crate::error::{Abrupt, Completion, Error};
use crate::function::{function_member, is_builtin_constructor};
use crate::value::conversions::number_to_js_string;
use crate::value::{RegExp, Value, ValueData};

impl Executable for MemberExpression {
    fn run(&self, interpreter: &mut Interpreter) -> Completion {
        let object = self.object.run(interpreter)?;
        let key = member_key(interpreter, self)?;
        get_member(interpreter, &object, &key)
    }
}

/// Resolves a member expression's key: the identifier name when not
/// computed, the evaluated-and-stringified expression otherwise.
pub(crate) fn member_key(
    interpreter: &mut Interpreter,
    member: &MemberExpression,
) -> Result<String, Abrupt> {
    property_key(interpreter, &member.property, member.computed)
}

/// Shared with object literals, which carry the same key shapes.
pub(crate) fn property_key(
    interpreter: &mut Interpreter,
    key: &Expression,
    computed: bool,
) -> Result<String, Abrupt> {
    if computed {
        return Ok(key.run(interpreter)?.to_js_string());
    }
    match key {
        Expression::Identifier(identifier) => Ok(identifier.name.clone()),
        Expression::StringLiteral(literal) => Ok(literal.value.clone()),
        Expression::NumericLiteral(literal) => Ok(number_to_js_string(literal.value)),
        other => Err(Abrupt::Fault(Error::UnhandledNode(format!(
            "{} as a non-computed property key",
            other.kind_name()
        )))),
    }
}

/// A filtered member read.
pub(crate) fn get_member(interpreter: &mut Interpreter, value: &Value, key: &str) -> Completion {
    if value.is_null_or_undefined() {
        return Err(interpreter.throw_error(format!(
            "Cannot read properties of {} (reading '{}')",
            value.to_js_string(),
            key
        )));
    }

    if key == "__proto__" {
        return Ok(Value::undefined());
    }
    if key == "prototype" && !value.is_callable() {
        return Ok(Value::undefined());
    }

    let found = lookup_member(interpreter, value, key)?;

    if key == "constructor" && is_builtin_constructor(&found) {
        return Ok(Value::undefined());
    }
    Ok(found)
}

fn lookup_member(interpreter: &mut Interpreter, value: &Value, key: &str) -> Completion {
    let intrinsics = interpreter.intrinsics();
    Ok(match value.data() {
        ValueData::String(string) => match key {
            "length" => Value::number(string.chars().count() as u32),
            _ => match key.parse::<usize>() {
                Ok(index) => string
                    .chars()
                    .nth(index)
                    .map(|c| Value::string(c.to_string()))
                    .unwrap_or_else(Value::undefined),
                Err(_) => intrinsics.string_prototype.get_field(key),
            },
        },
        ValueData::Number(_) => intrinsics.number_prototype.get_field(key),
        ValueData::Boolean(_) => intrinsics.boolean_prototype.get_field(key),
        ValueData::RegExp(regexp) => regexp_member(regexp, key, &intrinsics.regexp_prototype),
        ValueData::Object(_) => value.get_field(key),
        ValueData::Function(_) => function_member(value, key).unwrap_or_else(Value::undefined),
        ValueData::Host(host) => host.get(key).unwrap_or_else(Value::undefined),
        ValueData::Undefined | ValueData::Null => unreachable!("checked by get_member"),
    })
}

fn regexp_member(regexp: &RegExp, key: &str, prototype: &Value) -> Value {
    match key {
        "source" => Value::string(regexp.source.clone()),
        "flags" => Value::string(regexp.flags.clone()),
        "global" => Value::boolean(regexp.flags.contains('g')),
        "ignoreCase" => Value::boolean(regexp.flags.contains('i')),
        "multiline" => Value::boolean(regexp.flags.contains('m')),
        _ => prototype.get_field(key),
    }
}

/// An unfiltered member write.
pub(crate) fn set_member(
    interpreter: &mut Interpreter,
    target: &Value,
    key: &str,
    value: Value,
) -> Result<(), Abrupt> {
    if target.is_null_or_undefined() {
        return Err(interpreter.throw_error(format!(
            "Cannot set properties of {} (setting '{}')",
            target.to_js_string(),
            key
        )));
    }
    target.set_field(key, value);
    Ok(())
}
