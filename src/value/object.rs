//! Script objects: ordered string-keyed containers with a prototype link.

use crate::value::Value;
use gc::{custom_trace, Finalize, Trace};
use indexmap::IndexMap;
use rustc_hash::FxHasher;
use std::hash::BuildHasherDefault;

/// An insertion-ordered property table.
///
/// `for … in` iterates properties in the order they were created, so the
/// table is an `IndexMap`; `indexmap` has no `Trace` impl, hence the
/// newtype with a manual mark of every value.
#[derive(Clone, Debug, Default, Finalize)]
pub struct PropertyMap(IndexMap<String, Value, BuildHasherDefault<FxHasher>>);

unsafe impl Trace for PropertyMap {
    custom_trace!(this, {
        for (_, value) in this.0.iter() {
            mark(value);
        }
    });
}

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert<K: Into<String>>(&mut self, key: K, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Discriminates the handful of object flavours the engine creates itself.
#[derive(Debug, Clone, PartialEq, Trace, Finalize)]
pub enum ObjectData {
    Ordinary,
    Array,
    Arguments,
    Error,
    /// Milliseconds since the Unix epoch.
    Date(f64),
}

/// A script object: keyed container plus prototype link.
///
/// Arrays and arguments objects are ordinary objects whose `length`
/// property is maintained by the index-write path and hidden from
/// enumeration.
#[derive(Debug, Trace, Finalize)]
pub struct Object {
    pub data: ObjectData,
    properties: PropertyMap,
    prototype: Value,
}

impl Object {
    /// Creates an object of the given flavour linked to `prototype`
    /// (an object value, or null/undefined for the end of the chain).
    pub fn new(data: ObjectData, prototype: Value) -> Self {
        Self {
            data,
            properties: PropertyMap::new(),
            prototype,
        }
    }

    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut PropertyMap {
        &mut self.properties
    }

    pub fn prototype(&self) -> &Value {
        &self.prototype
    }

    pub fn set_prototype(&mut self, prototype: Value) {
        self.prototype = prototype;
    }

    pub fn is_array(&self) -> bool {
        self.data == ObjectData::Array
    }

    /// The keys `for … in` and object spread observe, in insertion order.
    /// `length` is bookkeeping on arrays and arguments objects, not data.
    pub fn enumerable_keys(&self) -> Vec<String> {
        let skip_length =
            matches!(self.data, ObjectData::Array | ObjectData::Arguments);
        self.properties
            .keys()
            .filter(|key| !(skip_length && key.as_str() == "length"))
            .cloned()
            .collect()
    }
}

impl Default for Object {
    fn default() -> Self {
        Self::new(ObjectData::Ordinary, Value::null())
    }
}

/// Parses `key` as a canonical array index (`"0"`, `"1"`, …; no leading
/// zeros, no sign).
pub fn array_index(key: &str) -> Option<u32> {
    if key == "0" {
        return Some(0);
    }
    if key.is_empty() || key.starts_with('0') || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}
