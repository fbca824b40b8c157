//! The script value model.
//!
//! Values are garbage-collected and shared by reference: cloning a `Value`
//! clones a pointer, never the data behind it. The variants cover the
//! primitives, script objects, script/native/bound functions and the
//! opaque host reference of the embedder boundary.

pub mod conversions;
pub mod display;
pub mod equality;
pub mod object;
pub mod operations;

pub use self::object::{array_index, Object, ObjectData, PropertyMap};

use crate::function::{Function, NativeFunctionData};
use crate::host::{HostObject, HostRef};
use gc::{Finalize, Gc, GcCell, Trace};
use std::rc::Rc;

/// A regular-expression value: pattern and flags, matched lazily by the
/// `RegExp` builtin.
#[derive(Debug, Clone, Trace, Finalize, PartialEq)]
pub struct RegExp {
    pub source: String,
    pub flags: String,
}

/// The underlying data of a [`Value`].
#[derive(Debug, Trace, Finalize)]
pub enum ValueData {
    Undefined,
    Null,
    Boolean(bool),
    /// Every script number is an IEEE-754 double.
    Number(f64),
    String(String),
    RegExp(RegExp),
    Object(Box<GcCell<Object>>),
    Function(Box<GcCell<Function>>),
    /// An opaque reference into the embedder's value domain.
    Host(HostRef),
}

/// A garbage-collected script value.
///
/// `Debug` and `Display` are hand-written in [`display`] because object
/// graphs can be cyclic.
#[derive(Clone, Trace, Finalize)]
pub struct Value(Gc<ValueData>);

impl Value {
    #[inline]
    pub fn undefined() -> Self {
        Self(Gc::new(ValueData::Undefined))
    }

    #[inline]
    pub fn null() -> Self {
        Self(Gc::new(ValueData::Null))
    }

    #[inline]
    pub fn boolean(value: bool) -> Self {
        Self(Gc::new(ValueData::Boolean(value)))
    }

    #[inline]
    pub fn number<N>(value: N) -> Self
    where
        N: Into<f64>,
    {
        Self(Gc::new(ValueData::Number(value.into())))
    }

    #[inline]
    pub fn nan() -> Self {
        Self::number(f64::NAN)
    }

    #[inline]
    pub fn string<S>(value: S) -> Self
    where
        S: Into<String>,
    {
        Self(Gc::new(ValueData::String(value.into())))
    }

    #[inline]
    pub fn regexp<S, F>(source: S, flags: F) -> Self
    where
        S: Into<String>,
        F: Into<String>,
    {
        Self(Gc::new(ValueData::RegExp(RegExp {
            source: source.into(),
            flags: flags.into(),
        })))
    }

    #[inline]
    pub fn object(object: Object) -> Self {
        Self(Gc::new(ValueData::Object(Box::new(GcCell::new(object)))))
    }

    #[inline]
    pub fn function(function: Function) -> Self {
        Self(Gc::new(ValueData::Function(Box::new(GcCell::new(
            function,
        )))))
    }

    /// Wraps a plain native function. The capability table is usually
    /// populated with these.
    pub fn native_function<N: Into<String>>(name: N, function: NativeFunctionData) -> Self {
        Self::function(Function::native(name, function))
    }

    /// Wraps an embedder value behind the [`HostObject`] reflection trait.
    pub fn host(object: Rc<dyn HostObject>) -> Self {
        Self(Gc::new(ValueData::Host(HostRef::new(object))))
    }

    /// Gets the underlying `ValueData` structure.
    #[inline]
    pub fn data(&self) -> &ValueData {
        &*self.0
    }

    /// Pointer identity, the `===` notion of sameness for reference values.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.data(), other.data())
    }

    #[inline]
    pub fn is_undefined(&self) -> bool {
        matches!(self.data(), ValueData::Undefined)
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self.data(), ValueData::Null)
    }

    #[inline]
    pub fn is_null_or_undefined(&self) -> bool {
        matches!(self.data(), ValueData::Null | ValueData::Undefined)
    }

    #[inline]
    pub fn is_string(&self) -> bool {
        matches!(self.data(), ValueData::String(_))
    }

    #[inline]
    pub fn is_object(&self) -> bool {
        matches!(self.data(), ValueData::Object(_))
    }

    #[inline]
    pub fn is_function(&self) -> bool {
        matches!(self.data(), ValueData::Function(_))
    }

    /// True for anything `new` may return in place of the fresh instance:
    /// script objects, functions and host references. `null` is classified
    /// as a primitive here.
    #[inline]
    pub fn is_object_like(&self) -> bool {
        matches!(
            self.data(),
            ValueData::Object(_) | ValueData::Function(_) | ValueData::Host(_)
        )
    }

    /// True for script functions and callable host references.
    pub fn is_callable(&self) -> bool {
        match self.data() {
            ValueData::Function(_) => true,
            ValueData::Host(host) => host.is_callable(),
            _ => false,
        }
    }

    /// The `typeof` tag.
    pub fn type_of(&self) -> &'static str {
        match self.data() {
            ValueData::Undefined => "undefined",
            ValueData::Boolean(_) => "boolean",
            ValueData::Number(_) => "number",
            ValueData::String(_) => "string",
            ValueData::Function(_) => "function",
            ValueData::Host(host) if host.is_callable() => "function",
            ValueData::Null | ValueData::Object(_) | ValueData::RegExp(_) | ValueData::Host(_) => {
                "object"
            }
        }
    }

    pub fn as_object(&self) -> Option<&GcCell<Object>> {
        match self.data() {
            ValueData::Object(cell) => Some(cell),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&GcCell<Function>> {
        match self.data() {
            ValueData::Function(cell) => Some(cell),
            _ => None,
        }
    }

    /// Reads a property without the evaluator's reflective-access filter:
    /// own properties first, then the prototype chain. Returns undefined
    /// when nothing in the chain has the key.
    pub fn get_field(&self, key: &str) -> Value {
        let mut current = self.clone();
        loop {
            let next = match current.data() {
                ValueData::Object(cell) => {
                    let object = cell.borrow();
                    if let Some(value) = object.properties().get(key) {
                        return value.clone();
                    }
                    object.prototype().clone()
                }
                ValueData::Function(cell) => {
                    let function = cell.borrow();
                    if let Some(value) = function.properties().get(key) {
                        return value.clone();
                    }
                    return Value::undefined();
                }
                _ => return Value::undefined(),
            };
            current = next;
        }
    }

    /// True when `key` is present on the value or anywhere up its
    /// prototype chain (the `in` operator's notion of presence).
    pub fn has_field(&self, key: &str) -> bool {
        let mut current = self.clone();
        loop {
            let next = match current.data() {
                ValueData::Object(cell) => {
                    let object = cell.borrow();
                    if object.properties().contains_key(key) {
                        return true;
                    }
                    object.prototype().clone()
                }
                ValueData::Function(cell) => {
                    return cell.borrow().properties().contains_key(key);
                }
                ValueData::Host(host) => return host.has(key),
                _ => return false,
            };
            current = next;
        }
    }

    /// Writes an own property. Writes are unfiltered; on arrays the
    /// `length` invariant is maintained: index writes grow it, assigning
    /// `length` truncates.
    pub fn set_field<K: AsRef<str>>(&self, key: K, value: Value) {
        let key = key.as_ref();
        match self.data() {
            ValueData::Object(cell) => {
                let mut object = cell.borrow_mut();
                if object.is_array() {
                    if key == "length" {
                        let new_length = value.to_uint32();
                        let stale: Vec<String> = object
                            .properties()
                            .keys()
                            .filter(|k| matches!(array_index(k), Some(i) if i >= new_length))
                            .cloned()
                            .collect();
                        for k in stale {
                            object.properties_mut().remove(&k);
                        }
                        object
                            .properties_mut()
                            .insert("length", Value::number(new_length));
                        return;
                    }
                    if let Some(index) = array_index(key) {
                        object.properties_mut().insert(key, value);
                        let length = object
                            .properties()
                            .get("length")
                            .map(Value::to_uint32)
                            .unwrap_or(0);
                        if index >= length {
                            object
                                .properties_mut()
                                .insert("length", Value::number(index + 1));
                        }
                        return;
                    }
                }
                object.properties_mut().insert(key, value);
            }
            ValueData::Function(cell) => {
                cell.borrow_mut().properties_mut().insert(key, value);
            }
            ValueData::Host(host) => host.set(key, value),
            _ => {
                // Property writes on primitives are silently dropped, as in
                // non-strict ECMAScript.
            }
        }
    }

    /// Removes an own property; the `delete` operator. Deleting an array
    /// index leaves a hole and does not touch `length`.
    pub fn remove_field(&self, key: &str) -> bool {
        match self.data() {
            ValueData::Object(cell) => cell.borrow_mut().properties_mut().remove(key).is_some(),
            ValueData::Function(cell) => {
                cell.borrow_mut().properties_mut().remove(key).is_some()
            }
            ValueData::Host(host) => host.delete(key),
            _ => true,
        }
    }

    /// The keys `for … in` iterates, in the value's enumeration order.
    pub fn enumerable_keys(&self) -> Vec<String> {
        match self.data() {
            ValueData::Object(cell) => cell.borrow().enumerable_keys(),
            ValueData::Host(host) => host.keys(),
            ValueData::String(s) => (0..s.chars().count()).map(|i| i.to_string()).collect(),
            _ => Vec::new(),
        }
    }

    /// Own enumerable `(key, value)` pairs; object spread copies these.
    pub fn enumerable_entries(&self) -> Vec<(String, Value)> {
        match self.data() {
            ValueData::Object(cell) => {
                let object = cell.borrow();
                object
                    .enumerable_keys()
                    .into_iter()
                    .map(|key| {
                        let value = object
                            .properties()
                            .get(&key)
                            .cloned()
                            .unwrap_or_else(Value::undefined);
                        (key, value)
                    })
                    .collect()
            }
            ValueData::Host(host) => host
                .keys()
                .into_iter()
                .map(|key| {
                    let value = host.get(&key).unwrap_or_else(Value::undefined);
                    (key, value)
                })
                .collect(),
            ValueData::String(s) => s
                .chars()
                .enumerate()
                .map(|(i, c)| (i.to_string(), Value::string(c.to_string())))
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::undefined()
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::boolean(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::string(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::string(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn array_like() -> Value {
        let value = Value::object(Object::new(ObjectData::Array, Value::null()));
        value.set_field("length", Value::number(0));
        value
    }

    #[test]
    fn index_writes_grow_array_length() {
        let array = array_like();
        array.set_field("0", Value::number(10));
        array.set_field("5", Value::number(60));
        assert_eq!(array.get_field("length").to_number(), 6.0);
    }

    #[test]
    fn length_write_truncates() {
        let array = array_like();
        array.set_field("0", Value::number(1));
        array.set_field("1", Value::number(2));
        array.set_field("2", Value::number(3));
        array.set_field("length", Value::number(1));
        assert!(array.get_field("1").is_undefined());
        assert_eq!(array.get_field("0").to_number(), 1.0);
        assert_eq!(array.get_field("length").to_number(), 1.0);
    }

    #[test]
    fn non_index_keys_do_not_affect_length() {
        let array = array_like();
        array.set_field("magic", Value::number(5));
        assert_eq!(array.get_field("length").to_number(), 0.0);
    }

    #[test]
    fn get_field_walks_prototype_chain() {
        let proto = Value::object(Object::default());
        proto.set_field("answer", Value::number(42));
        let child = Value::object(Object::new(ObjectData::Ordinary, proto));
        assert_eq!(child.get_field("answer").to_number(), 42.0);
        assert!(child.get_field("missing").is_undefined());
    }

    #[test]
    fn typeof_tags() {
        assert_eq!(Value::undefined().type_of(), "undefined");
        assert_eq!(Value::null().type_of(), "object");
        assert_eq!(Value::boolean(true).type_of(), "boolean");
        assert_eq!(Value::number(1).type_of(), "number");
        assert_eq!(Value::string("x").type_of(), "string");
        assert_eq!(Value::regexp("a", "g").type_of(), "object");
    }
}
