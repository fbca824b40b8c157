//! The abstract conversions: ToBoolean, ToNumber, ToString, ToInt32 and
//! ToUint32.
//!
//! Conversions here are pure: object-to-primitive coercion uses the
//! built-in renderings (`"[object Object]"`, array joins) and does not
//! call user `toString`/`valueOf` methods.

use super::{Value, ValueData};

impl Value {
    /// ToBoolean: everything is truthy except undefined, null, `false`,
    /// `0`, `NaN` and the empty string.
    pub fn to_boolean(&self) -> bool {
        match self.data() {
            ValueData::Undefined | ValueData::Null => false,
            ValueData::Boolean(b) => *b,
            ValueData::Number(n) => *n != 0.0 && !n.is_nan(),
            ValueData::String(s) => !s.is_empty(),
            ValueData::RegExp(_)
            | ValueData::Object(_)
            | ValueData::Function(_)
            | ValueData::Host(_) => true,
        }
    }

    /// ToNumber.
    pub fn to_number(&self) -> f64 {
        match self.data() {
            ValueData::Undefined => f64::NAN,
            ValueData::Null => 0.0,
            ValueData::Boolean(true) => 1.0,
            ValueData::Boolean(false) => 0.0,
            ValueData::Number(n) => *n,
            ValueData::String(s) => string_to_number(s),
            ValueData::Object(cell) => {
                // Arrays coerce through their string form, like
                // `Number([5])` does; everything else is NaN.
                if cell.borrow().is_array() {
                    string_to_number(&self.to_js_string())
                } else {
                    f64::NAN
                }
            }
            ValueData::RegExp(_) | ValueData::Function(_) | ValueData::Host(_) => f64::NAN,
        }
    }

    /// ToInt32: modular wrap into the signed 32-bit range.
    pub fn to_int32(&self) -> i32 {
        let number = self.to_number();
        if !number.is_finite() || number == 0.0 {
            return 0;
        }
        let modulo = number.trunc().rem_euclid(4_294_967_296.0);
        if modulo >= 2_147_483_648.0 {
            (modulo - 4_294_967_296.0) as i32
        } else {
            modulo as i32
        }
    }

    /// ToUint32: modular wrap into the unsigned 32-bit range.
    pub fn to_uint32(&self) -> u32 {
        let number = self.to_number();
        if !number.is_finite() || number == 0.0 {
            return 0;
        }
        number.trunc().rem_euclid(4_294_967_296.0) as u32
    }

    /// ToString.
    pub fn to_js_string(&self) -> String {
        match self.data() {
            ValueData::Undefined => "undefined".into(),
            ValueData::Null => "null".into(),
            ValueData::Boolean(b) => b.to_string(),
            ValueData::Number(n) => number_to_js_string(*n),
            ValueData::String(s) => s.clone(),
            ValueData::RegExp(regexp) => format!("/{}/{}", regexp.source, regexp.flags),
            ValueData::Object(cell) => {
                let object = cell.borrow();
                if object.is_array() {
                    let length = object
                        .properties()
                        .get("length")
                        .map(|v| v.to_uint32())
                        .unwrap_or(0);
                    let mut parts = Vec::with_capacity(length as usize);
                    for index in 0..length {
                        let element = object
                            .properties()
                            .get(&index.to_string())
                            .cloned()
                            .unwrap_or_else(Value::undefined);
                        if element.is_null_or_undefined() {
                            parts.push(String::new());
                        } else {
                            parts.push(element.to_js_string());
                        }
                    }
                    parts.join(",")
                } else {
                    "[object Object]".into()
                }
            }
            ValueData::Function(cell) => {
                let function = cell.borrow();
                match function.name() {
                    Some(name) => format!("function {}() {{ ... }}", name),
                    None => "function () { ... }".into(),
                }
            }
            ValueData::Host(_) => "[object Host]".into(),
        }
    }
}

/// Renders a number the way JavaScript's ToString does: `"14"`, `"0.1"`,
/// `"NaN"`, `"Infinity"`.
pub fn number_to_js_string(number: f64) -> String {
    if number.is_nan() {
        return "NaN".into();
    }
    if number.is_infinite() {
        return if number > 0.0 { "Infinity" } else { "-Infinity" }.into();
    }
    if number == 0.0 {
        return "0".into();
    }
    let mut buffer = ryu_js::Buffer::new();
    buffer.format(number).into()
}

/// The ToNumber string grammar: optional whitespace, decimal or hex
/// literal, `Infinity`. Anything else is NaN.
pub fn string_to_number(string: &str) -> f64 {
    let trimmed = string.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        return match u64::from_str_radix(hex, 16) {
            Ok(value) => value as f64,
            Err(_) => f64::NAN,
        };
    }
    // Reject forms Rust's float grammar accepts but JavaScript's does not
    // ("inf", "nan", "1f32"), then let fast-float do the work.
    if !trimmed
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
    {
        return f64::NAN;
    }
    fast_float::parse(trimmed).unwrap_or(f64::NAN)
}
