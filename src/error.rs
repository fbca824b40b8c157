//! The two signalling channels of evaluation.
//!
//! Script-visible exceptions and engine-level control transfers share the
//! `Err` side of [`Completion`], but as *distinct variants* of [`Abrupt`]:
//! a `throw` produces [`Abrupt::Throw`] and is catchable, while `return`,
//! `break` and `continue` ride their own variants that every `try` site
//! rethrows before running its handler, so script code can never observe
//! them. [`Abrupt::Fault`] carries host-domain failures (op-guard timeout,
//! unsupported nodes) that propagate out of `evaluate` unconditionally.

use crate::value::Value;
use thiserror::Error as ThisError;

/// The result of evaluating a node.
pub type Completion = Result<Value, Abrupt>;

/// An abrupt completion: anything other than falling through to the next
/// statement.
#[derive(Debug)]
pub enum Abrupt {
    /// A user exception: `throw`, or an engine-raised error object
    /// ("x is not defined" and friends). Catchable.
    Throw(Value),
    /// `return`, carrying the returned value to the function boundary.
    Return(Value),
    /// `break`, optionally labelled. Consumed by the targeted loop,
    /// switch or labelled statement.
    Break(Option<String>),
    /// `continue`, optionally labelled. Consumed by the targeted loop.
    Continue(Option<String>),
    /// A host-domain failure. Not catchable; `try` sites rethrow it.
    Fault(Error),
}

/// The failures [`Interpreter::evaluate`](crate::Interpreter::evaluate)
/// surfaces to the embedder. The message strings are part of the engine's
/// contract and stay stable across releases.
#[derive(Debug, ThisError)]
pub enum Error {
    /// The op-count guard tripped.
    #[error("Execution timeout: maximum operations exceeded")]
    Timeout,

    /// The tree contained a node kind the evaluator does not implement.
    #[error("Unhandled node type: {0}")]
    UnhandledNode(String),

    #[error("with statement is not supported")]
    WithStatement,

    /// A `return` escaped to the top level.
    #[error("Illegal return statement")]
    IllegalReturn,

    /// A `break` escaped its loop, switch and label context.
    #[error("Illegal break statement")]
    IllegalBreak,

    /// A `continue` escaped its loop context.
    #[error("Illegal continue statement")]
    IllegalContinue,

    /// A user exception reached the top level. The payload is the rendered
    /// exception ("Error: boom").
    #[error("Uncaught {0}")]
    Uncaught(String),
}
