//! The global `RegExp` constructor and the methods regex values answer.
//!
//! Regex values carry only their pattern and flags; matching compiles
//! through `regress` on demand.

use super::{attach_fn, make_constructor};
use crate::builtins::array;
use crate::error::{Abrupt, Completion};
use crate::exec::Interpreter;
use crate::realm::Intrinsics;
use crate::value::{Value, ValueData};
use regress::Regex;

pub(crate) fn create(intrinsics: &Intrinsics) -> Value {
    let prototype = &intrinsics.regexp_prototype;
    attach_fn(prototype, "test", test);
    attach_fn(prototype, "exec", exec);
    attach_fn(prototype, "toString", to_string);
    make_constructor("RegExp", constructor, prototype)
}

fn constructor(_this: &Value, args: &[Value], interpreter: &mut Interpreter) -> Completion {
    let (source, flags) = match args.first().map(Value::data) {
        Some(ValueData::RegExp(regexp)) => (regexp.source.clone(), regexp.flags.clone()),
        Some(_) => {
            let source = args[0].to_js_string();
            let flags = match args.get(1) {
                Some(v) if !v.is_undefined() => v.to_js_string(),
                _ => String::new(),
            };
            (source, flags)
        }
        None => (String::new(), String::new()),
    };
    // Validate eagerly so a bad pattern fails at construction.
    compile(interpreter, &source, &flags)?;
    Ok(Value::regexp(source, flags))
}

fn compile(interpreter: &mut Interpreter, source: &str, flags: &str) -> Result<Regex, Abrupt> {
    // regress understands the matching-relevant subset of the flags.
    let matcher_flags: String = flags.chars().filter(|c| matches!(c, 'i' | 'm' | 's' | 'u')).collect();
    Regex::with_flags(source, matcher_flags.as_str()).map_err(|error| {
        interpreter.throw_error(format!("Invalid regular expression: {}", error))
    })
}

fn matcher_of(this: &Value, interpreter: &mut Interpreter) -> Result<Regex, Abrupt> {
    match this.data() {
        ValueData::RegExp(regexp) => compile(interpreter, &regexp.source, &regexp.flags),
        _ => Err(interpreter.throw_error("RegExp method called on a non-RegExp value")),
    }
}

fn subject(args: &[Value]) -> String {
    args.first()
        .map(|v| v.to_js_string())
        .unwrap_or_else(|| "undefined".into())
}

fn test(this: &Value, args: &[Value], interpreter: &mut Interpreter) -> Completion {
    let matcher = matcher_of(this, interpreter)?;
    let text = subject(args);
    Ok(Value::boolean(matcher.find(&text).is_some()))
}

/// `exec`: `[match, ...captures]` with an `index` property, or null.
fn exec(this: &Value, args: &[Value], interpreter: &mut Interpreter) -> Completion {
    let matcher = matcher_of(this, interpreter)?;
    let text = subject(args);
    let found = match matcher.find(&text) {
        Some(found) => found,
        None => return Ok(Value::null()),
    };

    let mut elements = vec![Value::string(text[found.start()..found.end()].to_owned())];
    for capture in found.captures.iter() {
        elements.push(match capture {
            Some(range) => Value::string(text[range.clone()].to_owned()),
            None => Value::undefined(),
        });
    }
    let result = array::array_of(interpreter, elements);
    result.set_field(
        "index",
        Value::number(text[..found.start()].chars().count() as u32),
    );
    result.set_field("input", Value::string(text));
    Ok(result)
}

fn to_string(this: &Value, _: &[Value], _: &mut Interpreter) -> Completion {
    Ok(Value::string(this.to_js_string()))
}
