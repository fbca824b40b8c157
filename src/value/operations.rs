//! Operator semantics over values.
//!
//! The arithmetic and bitwise operators are implemented as the standard
//! `std::ops` traits so call sites read as plain Rust expressions; they
//! all take operands by reference and produce fresh values.

use super::{Value, ValueData};
use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Not, Rem, Shl, Shr, Sub};

impl Add for &Value {
    type Output = Value;

    /// `+`: string concatenation when either operand is a string,
    /// numeric addition otherwise.
    fn add(self, other: Self) -> Value {
        match (self.data(), other.data()) {
            (ValueData::String(a), _) => Value::string(format!("{}{}", a, other.to_js_string())),
            (_, ValueData::String(b)) => Value::string(format!("{}{}", self.to_js_string(), b)),
            _ => Value::number(self.to_number() + other.to_number()),
        }
    }
}

impl Sub for &Value {
    type Output = Value;

    fn sub(self, other: Self) -> Value {
        Value::number(self.to_number() - other.to_number())
    }
}

impl Mul for &Value {
    type Output = Value;

    fn mul(self, other: Self) -> Value {
        Value::number(self.to_number() * other.to_number())
    }
}

impl Div for &Value {
    type Output = Value;

    fn div(self, other: Self) -> Value {
        Value::number(self.to_number() / other.to_number())
    }
}

impl Rem for &Value {
    type Output = Value;

    /// `%` truncates toward zero, unlike Rust's `rem_euclid`.
    fn rem(self, other: Self) -> Value {
        Value::number(self.to_number() % other.to_number())
    }
}

impl Neg for &Value {
    type Output = Value;

    fn neg(self) -> Value {
        Value::number(-self.to_number())
    }
}

impl Not for &Value {
    type Output = Value;

    fn not(self) -> Value {
        Value::boolean(!self.to_boolean())
    }
}

impl BitAnd for &Value {
    type Output = Value;

    fn bitand(self, other: Self) -> Value {
        Value::number(self.to_int32() & other.to_int32())
    }
}

impl BitOr for &Value {
    type Output = Value;

    fn bitor(self, other: Self) -> Value {
        Value::number(self.to_int32() | other.to_int32())
    }
}

impl BitXor for &Value {
    type Output = Value;

    fn bitxor(self, other: Self) -> Value {
        Value::number(self.to_int32() ^ other.to_int32())
    }
}

impl Shl for &Value {
    type Output = Value;

    fn shl(self, other: Self) -> Value {
        Value::number(self.to_int32().wrapping_shl(other.to_uint32() & 0x1f))
    }
}

impl Shr for &Value {
    type Output = Value;

    /// `>>`, the sign-propagating shift. `>>>` is [`Value::ushr`].
    fn shr(self, other: Self) -> Value {
        Value::number(self.to_int32().wrapping_shr(other.to_uint32() & 0x1f))
    }
}

impl Value {
    /// `>>>`: zero-fill right shift, always yielding an unsigned result.
    pub fn ushr(&self, other: &Value) -> Value {
        Value::number(self.to_uint32().wrapping_shr(other.to_uint32() & 0x1f))
    }

    /// `~`: bitwise not over the ToInt32 image.
    pub fn bitnot(&self) -> Value {
        Value::number(!self.to_int32())
    }

    /// The relational comparison backing `<`, `<=`, `>` and `>=`:
    /// lexicographic when both operands are strings, numeric otherwise
    /// (`None` when a NaN is involved, which makes every form false).
    fn compare(&self, other: &Value) -> Option<std::cmp::Ordering> {
        match (self.data(), other.data()) {
            (ValueData::String(a), ValueData::String(b)) => Some(a.cmp(b)),
            _ => self.to_number().partial_cmp(&other.to_number()),
        }
    }

    pub fn lt(&self, other: &Value) -> bool {
        matches!(self.compare(other), Some(std::cmp::Ordering::Less))
    }

    pub fn le(&self, other: &Value) -> bool {
        matches!(
            self.compare(other),
            Some(std::cmp::Ordering::Less) | Some(std::cmp::Ordering::Equal)
        )
    }

    pub fn gt(&self, other: &Value) -> bool {
        matches!(self.compare(other), Some(std::cmp::Ordering::Greater))
    }

    pub fn ge(&self, other: &Value) -> bool {
        matches!(
            self.compare(other),
            Some(std::cmp::Ordering::Greater) | Some(std::cmp::Ordering::Equal)
        )
    }
}
