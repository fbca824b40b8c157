//! Operator tokens as they appear in the consumed node set.
//!
//! The serde renames match the operator spellings emitted by Babel-style
//! parsers, so `{"operator": "+"}` deserializes directly.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result};

/// A binary operation between two values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    /// `a + b` - Addition / string concatenation
    #[serde(rename = "+")]
    Add,
    /// `a - b` - Subtraction
    #[serde(rename = "-")]
    Sub,
    /// `a * b` - Multiplication
    #[serde(rename = "*")]
    Mul,
    /// `a / b` - Division
    #[serde(rename = "/")]
    Div,
    /// `a % b` - Modulus
    #[serde(rename = "%")]
    Mod,
    /// `a == b` - Loose equality
    #[serde(rename = "==")]
    Equal,
    /// `a != b` - Loose inequality
    #[serde(rename = "!=")]
    NotEqual,
    /// `a === b` - Strict equality
    #[serde(rename = "===")]
    StrictEqual,
    /// `a !== b` - Strict inequality
    #[serde(rename = "!==")]
    StrictNotEqual,
    /// `a < b`
    #[serde(rename = "<")]
    LessThan,
    /// `a <= b`
    #[serde(rename = "<=")]
    LessThanOrEqual,
    /// `a > b`
    #[serde(rename = ">")]
    GreaterThan,
    /// `a >= b`
    #[serde(rename = ">=")]
    GreaterThanOrEqual,
    /// `a << b` - Left shift
    #[serde(rename = "<<")]
    Shl,
    /// `a >> b` - Sign-propagating right shift
    #[serde(rename = ">>")]
    Shr,
    /// `a >>> b` - Zero-fill right shift
    #[serde(rename = ">>>")]
    UShr,
    /// `a & b` - Bitwise and
    #[serde(rename = "&")]
    And,
    /// `a | b` - Bitwise or
    #[serde(rename = "|")]
    Or,
    /// `a ^ b` - Bitwise xor
    #[serde(rename = "^")]
    Xor,
    /// `a in b` - Property membership
    #[serde(rename = "in")]
    In,
    /// `a instanceof b` - Prototype-chain membership
    #[serde(rename = "instanceof")]
    InstanceOf,
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::StrictEqual => "===",
            BinaryOp::StrictNotEqual => "!==",
            BinaryOp::LessThan => "<",
            BinaryOp::LessThanOrEqual => "<=",
            BinaryOp::GreaterThan => ">",
            BinaryOp::GreaterThanOrEqual => ">=",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::UShr => ">>>",
            BinaryOp::And => "&",
            BinaryOp::Or => "|",
            BinaryOp::Xor => "^",
            BinaryOp::In => "in",
            BinaryOp::InstanceOf => "instanceof",
        }
    }
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(self.as_str())
    }
}

/// A short-circuiting logical operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalOp {
    /// `a && b`
    #[serde(rename = "&&")]
    And,
    /// `a || b`
    #[serde(rename = "||")]
    Or,
}

impl Display for LogicalOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(match *self {
            LogicalOp::And => "&&",
            LogicalOp::Or => "||",
        })
    }
}

/// A unary operation on a single value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    /// `-a` - negate the value
    #[serde(rename = "-")]
    Minus,
    /// `+a` - convert to a number
    #[serde(rename = "+")]
    Plus,
    /// `!a` - boolean negation
    #[serde(rename = "!")]
    Not,
    /// `~a` - bitwise not
    #[serde(rename = "~")]
    Tilde,
    /// `typeof a` - type tag of the value
    #[serde(rename = "typeof")]
    TypeOf,
    /// `void a` - evaluate and discard
    #[serde(rename = "void")]
    Void,
    /// `delete a.b` - remove a property
    #[serde(rename = "delete")]
    Delete,
}

impl Display for UnaryOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(match *self {
            UnaryOp::Minus => "-",
            UnaryOp::Plus => "+",
            UnaryOp::Not => "!",
            UnaryOp::Tilde => "~",
            UnaryOp::TypeOf => "typeof",
            UnaryOp::Void => "void",
            UnaryOp::Delete => "delete",
        })
    }
}

/// `++` / `--`, prefix or postfix depending on the node's `prefix` flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateOp {
    #[serde(rename = "++")]
    Increment,
    #[serde(rename = "--")]
    Decrement,
}

impl Display for UpdateOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(match *self {
            UpdateOp::Increment => "++",
            UpdateOp::Decrement => "--",
        })
    }
}

/// An assignment operator, either plain `=` or compound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignOp {
    #[serde(rename = "=")]
    Assign,
    #[serde(rename = "+=")]
    Add,
    #[serde(rename = "-=")]
    Sub,
    #[serde(rename = "*=")]
    Mul,
    #[serde(rename = "/=")]
    Div,
    #[serde(rename = "%=")]
    Mod,
    #[serde(rename = "<<=")]
    Shl,
    #[serde(rename = ">>=")]
    Shr,
    #[serde(rename = ">>>=")]
    UShr,
    #[serde(rename = "&=")]
    And,
    #[serde(rename = "|=")]
    Or,
    #[serde(rename = "^=")]
    Xor,
}

impl AssignOp {
    /// The binary operator a compound assignment applies, `None` for plain `=`.
    pub fn binary_op(self) -> Option<BinaryOp> {
        match self {
            AssignOp::Assign => None,
            AssignOp::Add => Some(BinaryOp::Add),
            AssignOp::Sub => Some(BinaryOp::Sub),
            AssignOp::Mul => Some(BinaryOp::Mul),
            AssignOp::Div => Some(BinaryOp::Div),
            AssignOp::Mod => Some(BinaryOp::Mod),
            AssignOp::Shl => Some(BinaryOp::Shl),
            AssignOp::Shr => Some(BinaryOp::Shr),
            AssignOp::UShr => Some(BinaryOp::UShr),
            AssignOp::And => Some(BinaryOp::And),
            AssignOp::Or => Some(BinaryOp::Or),
            AssignOp::Xor => Some(BinaryOp::Xor),
        }
    }
}

impl Display for AssignOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(match *self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Mod => "%=",
            AssignOp::Shl => "<<=",
            AssignOp::Shr => ">>=",
            AssignOp::UShr => ">>>=",
            AssignOp::And => "&=",
            AssignOp::Or => "|=",
            AssignOp::Xor => "^=",
        })
    }
}
