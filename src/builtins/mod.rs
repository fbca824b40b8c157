//! The default capability table.
//!
//! A curated slice of the standard library, built once per realm:
//! constructors for the blocklisted builtin set (Object, Array, String,
//! Number, Boolean, Error, RegExp, Date), the `Math` and `JSON`
//! namespaces, the numeric globals and the gated `eval`. The source
//! language's function constructor is deliberately bound to undefined.
//!
//! Embedder globals merge *over* this table; the intrinsic prototype
//! objects stay with the realm either way, so replacing the `Array`
//! binding does not orphan array literals.

pub mod array;
pub mod boolean;
pub mod date;
pub mod error;
pub mod eval;
pub mod json;
pub mod math;
pub mod number;
pub mod object;
pub mod regexp;
pub mod string;

use crate::function::{Function, FunctionFlags, NativeFunctionData};
use crate::realm::Intrinsics;
use crate::value::{Object, ObjectData, Value};

/// Builds the default globals and the realm intrinsics they hang off.
pub(crate) fn init() -> (Vec<(String, Value)>, Intrinsics) {
    let object_prototype = Value::object(Object::new(ObjectData::Ordinary, Value::null()));
    let fresh = || {
        Value::object(Object::new(
            ObjectData::Ordinary,
            object_prototype.clone(),
        ))
    };
    let intrinsics = Intrinsics {
        array_prototype: fresh(),
        string_prototype: fresh(),
        number_prototype: fresh(),
        boolean_prototype: fresh(),
        error_prototype: fresh(),
        regexp_prototype: fresh(),
        date_prototype: fresh(),
        object_prototype,
    };

    let globals = vec![
        ("Object".to_owned(), object::create(&intrinsics)),
        ("Array".to_owned(), array::create(&intrinsics)),
        ("String".to_owned(), string::create(&intrinsics)),
        ("Number".to_owned(), number::create(&intrinsics)),
        ("Boolean".to_owned(), boolean::create(&intrinsics)),
        ("Error".to_owned(), error::create(&intrinsics)),
        ("RegExp".to_owned(), regexp::create(&intrinsics)),
        ("Date".to_owned(), date::create(&intrinsics)),
        ("Math".to_owned(), math::create(&intrinsics)),
        ("JSON".to_owned(), json::create(&intrinsics)),
        ("eval".to_owned(), Value::native_function("eval", eval::eval)),
        (
            "parseInt".to_owned(),
            Value::native_function("parseInt", number::parse_int),
        ),
        (
            "parseFloat".to_owned(),
            Value::native_function("parseFloat", number::parse_float),
        ),
        (
            "isNaN".to_owned(),
            Value::native_function("isNaN", number::global_is_nan),
        ),
        (
            "isFinite".to_owned(),
            Value::native_function("isFinite", number::global_is_finite),
        ),
        ("NaN".to_owned(), Value::nan()),
        ("Infinity".to_owned(), Value::number(f64::INFINITY)),
        ("undefined".to_owned(), Value::undefined()),
        // No dynamic code out of strings except through the eval gate.
        ("Function".to_owned(), Value::undefined()),
    ];
    (globals, intrinsics)
}

/// Attaches a native method to a prototype or namespace object.
pub(crate) fn attach_fn(target: &Value, name: &str, function: NativeFunctionData) {
    target.set_field(name, Value::native_function(name, function));
}

/// Builds one of the engine's constructors: constructable, flagged for the
/// reflective-access filter, wired to its prototype both ways.
pub(crate) fn make_constructor(
    name: &str,
    function: NativeFunctionData,
    prototype: &Value,
) -> Value {
    let mut native = Function::native(name, function);
    if let Function::Native(data) = &mut native {
        data.flags = FunctionFlags::CONSTRUCTABLE | FunctionFlags::BUILTIN_CONSTRUCTOR;
    }
    let constructor = Value::function(native);
    constructor.set_field("prototype", prototype.clone());
    prototype.set_field("constructor", constructor.clone());
    constructor
}
