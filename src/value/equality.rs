//! Strict equality.
//!
//! This engine deliberately gives `==`/`!=` the semantics of `===`/`!==`:
//! scripts written for it rely on the loose operators never coercing, so
//! both operator pairs funnel through [`Value::strict_equals`].

use super::{Value, ValueData};

impl Value {
    /// `===`. Primitives compare structurally (with the usual NaN caveat),
    /// reference values compare by identity.
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self.data(), other.data()) {
            (ValueData::Undefined, ValueData::Undefined) => true,
            (ValueData::Null, ValueData::Null) => true,
            (ValueData::Boolean(a), ValueData::Boolean(b)) => a == b,
            // NaN !== NaN falls out of the float comparison.
            (ValueData::Number(a), ValueData::Number(b)) => a == b,
            (ValueData::String(a), ValueData::String(b)) => a == b,
            (ValueData::Object(_), ValueData::Object(_))
            | (ValueData::Function(_), ValueData::Function(_))
            | (ValueData::RegExp(_), ValueData::RegExp(_)) => self.ptr_eq(other),
            (ValueData::Host(a), ValueData::Host(b)) => a.ptr_eq(b) || self.ptr_eq(other),
            _ => false,
        }
    }

    /// `==`, which this engine defines as strict equality. See the module
    /// docs for the rationale.
    pub fn equals(&self, other: &Value) -> bool {
        self.strict_equals(other)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.strict_equals(other)
    }
}
