//! Terrarium is an embeddable ECMAScript 5 interpreter that evaluates
//! pre-parsed syntax trees against a capability-gated table of host
//! globals.
//!
//! The host supplies the program as an [`ast::Program`] (built directly,
//! or deserialized from a Babel-style parser's JSON) plus a table of
//! globals; the interpreter walks the tree and returns the final value.
//! There is no parser and no ambient authority: scripts see exactly the
//! defaults plus whatever the embedder passed in, reflective escape
//! hatches (`__proto__`, builtin `constructor`s, the function
//! constructor) are blanked at the member-read boundary, and a
//! configurable op-count guard bounds runaway evaluation.
//!
//! ```
//! use terrarium::Interpreter;
//!
//! let program = serde_json::from_str(
//!     r#"{
//!         "type": "Program",
//!         "body": [{
//!             "type": "ExpressionStatement",
//!             "expression": {
//!                 "type": "BinaryExpression",
//!                 "operator": "+",
//!                 "left": { "type": "NumericLiteral", "value": 2 },
//!                 "right": { "type": "NumericLiteral", "value": 3 }
//!             }
//!         }]
//!     }"#,
//! )
//! .unwrap();
//!
//! let mut interpreter = Interpreter::default();
//! let result = interpreter.evaluate(&program).unwrap();
//! assert_eq!(result.to_number(), 5.0);
//! ```

#![deny(
    unused_qualifications,
    clippy::all,
    unused_import_braces,
    unused_lifetimes,
    unreachable_pub,
    trivial_numeric_casts,
    missing_debug_implementations,
    meta_variable_misuse,
    non_ascii_idents,
    rust_2018_compatibility,
    rust_2018_idioms,
    future_incompatible,
    nonstandard_style
)]
#![warn(clippy::perf, clippy::single_match_else, clippy::dbg_macro)]
#![allow(
    clippy::missing_inline_in_public_items,
    clippy::cognitive_complexity,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::as_conversions
)]

pub mod ast;
pub mod builtins;
pub mod environment;
pub mod error;
pub mod exec;
pub mod function;
pub mod host;
pub mod profiler;
pub mod realm;
pub mod value;

pub use crate::{
    error::{Abrupt, Completion, Error},
    exec::{Executable, Interpreter, Options, ParseFn},
    host::HostObject,
    realm::Realm,
    value::Value,
};

/// Evaluates a program in a fresh interpreter with the default globals.
pub fn evaluate(program: &ast::Program) -> Result<Value, Error> {
    let mut interpreter = Interpreter::default();
    interpreter.evaluate(program)
}
