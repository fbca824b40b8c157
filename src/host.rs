//! The host side of the native/script boundary.
//!
//! Embedder values enter the interpreter as [`Value::host`] wrapping an
//! `Rc<dyn HostObject>`. The evaluator never introspects a host value: it
//! forwards member reads and writes to the trait, asks it whether it is
//! callable, and invokes it with a `&mut Interpreter` so host code can
//! re-enter the evaluator (call script functions it was handed, construct
//! script objects, and so on). Re-entrant invocations run on the same op
//! counter as the evaluation that triggered them.
//!
//! The reverse direction needs no wrapper type: a script function handed
//! to the host is an ordinary [`Value`], and the host calls it through
//! [`Interpreter::call`](crate::Interpreter::call).

use crate::error::Completion;
use crate::exec::Interpreter;
use crate::value::Value;
use gc::{Finalize, Trace};
use std::fmt;
use std::rc::Rc;

/// Reflection hooks for one embedder value.
///
/// All methods take `&self`; hosts that need mutation use interior
/// mutability. Every method has a default so plain opaque data needs no
/// code at all.
#[allow(unused_variables)]
pub trait HostObject: 'static {
    /// A short tag for diagnostics.
    fn class_name(&self) -> &'static str {
        "HostObject"
    }

    /// Whether call sites may invoke this value. Callables answer
    /// `"function"` to `typeof`.
    fn is_callable(&self) -> bool {
        false
    }

    /// Invokes the value. Only consulted when [`is_callable`](Self::is_callable)
    /// is true.
    fn call(&self, this: &Value, args: &[Value], interpreter: &mut Interpreter) -> Completion {
        Err(interpreter.throw_error("Value is not a function"))
    }

    /// `new` on this value.
    fn construct(&self, args: &[Value], interpreter: &mut Interpreter) -> Completion {
        Err(interpreter.throw_error("Value is not a constructor"))
    }

    /// A member read, after the reflective-access filter has run.
    fn get(&self, key: &str) -> Option<Value> {
        None
    }

    /// A member write. Writes are not filtered.
    fn set(&self, key: &str, value: Value) {}

    /// `key in value`.
    fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// `delete value[key]`.
    fn delete(&self, key: &str) -> bool {
        false
    }

    /// The keys `for … in` visits.
    fn keys(&self) -> Vec<String> {
        Vec::new()
    }

    /// `lhs instanceof thisCallable`, under whatever notion of instance
    /// the host maintains.
    fn instance_of(&self, value: &Value) -> bool {
        false
    }
}

/// A shared handle to a host object.
///
/// The handle is opaque to the collector (`empty_trace`): script values a
/// host object holds on to act as GC roots for as long as the host object
/// is alive.
#[derive(Clone, Finalize)]
pub struct HostRef(Rc<dyn HostObject>);

unsafe impl Trace for HostRef {
    gc::unsafe_empty_trace!();
}

impl HostRef {
    pub fn new(object: Rc<dyn HostObject>) -> Self {
        Self(object)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl std::ops::Deref for HostRef {
    type Target = dyn HostObject;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl fmt::Debug for HostRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[host {}]", self.0.class_name())
    }
}
