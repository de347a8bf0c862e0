//! # Attribute Maps
//!
//! Typed key/value container handed to the engine for shape attributes and
//! encoder options.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A typed attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Int(i32),
    Float(f64),
    String(String),
    BoolArray(Vec<bool>),
    IntArray(Vec<i32>),
    FloatArray(Vec<f64>),
    StringArray(Vec<String>),
}

/// Type tag of an [`AttributeValue`], as reported by [`AttributeMap::value_type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeType {
    Bool,
    Int,
    Float,
    String,
    BoolArray,
    IntArray,
    FloatArray,
    StringArray,
}

impl AttributeValue {
    /// Returns the type tag of this value.
    pub fn value_type(&self) -> AttributeType {
        match self {
            AttributeValue::Bool(_) => AttributeType::Bool,
            AttributeValue::Int(_) => AttributeType::Int,
            AttributeValue::Float(_) => AttributeType::Float,
            AttributeValue::String(_) => AttributeType::String,
            AttributeValue::BoolArray(_) => AttributeType::BoolArray,
            AttributeValue::IntArray(_) => AttributeType::IntArray,
            AttributeValue::FloatArray(_) => AttributeType::FloatArray,
            AttributeValue::StringArray(_) => AttributeType::StringArray,
        }
    }
}

/// Ordered map of typed attributes.
///
/// Setting a key twice replaces the earlier value, whatever its type.
///
/// # Example
///
/// ```rust
/// use prt_api::{AttributeMap, AttributeType};
///
/// let mut map = AttributeMap::new();
/// map.set_int("seed", 555);
/// map.set_string("shapeName", "A");
/// assert_eq!(map.get_int("seed"), Some(555));
/// assert_eq!(map.value_type("shapeName"), Some(AttributeType::String));
/// assert_eq!(map.get_int("shapeName"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeMap {
    entries: BTreeMap<String, AttributeValue>,
}

impl AttributeMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value of any type.
    pub fn set(&mut self, key: impl Into<String>, value: AttributeValue) {
        self.entries.insert(key.into(), value);
    }

    pub fn set_bool(&mut self, key: impl Into<String>, value: bool) {
        self.set(key, AttributeValue::Bool(value));
    }

    pub fn set_int(&mut self, key: impl Into<String>, value: i32) {
        self.set(key, AttributeValue::Int(value));
    }

    pub fn set_float(&mut self, key: impl Into<String>, value: f64) {
        self.set(key, AttributeValue::Float(value));
    }

    pub fn set_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.set(key, AttributeValue::String(value.into()));
    }

    pub fn set_bool_array(&mut self, key: impl Into<String>, values: Vec<bool>) {
        self.set(key, AttributeValue::BoolArray(values));
    }

    pub fn set_int_array(&mut self, key: impl Into<String>, values: Vec<i32>) {
        self.set(key, AttributeValue::IntArray(values));
    }

    pub fn set_float_array(&mut self, key: impl Into<String>, values: Vec<f64>) {
        self.set(key, AttributeValue::FloatArray(values));
    }

    pub fn set_string_array(&mut self, key: impl Into<String>, values: Vec<String>) {
        self.set(key, AttributeValue::StringArray(values));
    }

    /// Returns true if the key is present.
    pub fn has_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the raw value for a key.
    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.entries.get(key)
    }

    /// Returns the type of the value stored under `key`.
    pub fn value_type(&self, key: &str) -> Option<AttributeType> {
        self.entries.get(key).map(AttributeValue::value_type)
    }

    /// Returns the value if it is a bool.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.entries.get(key) {
            Some(AttributeValue::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value if it is an int.
    pub fn get_int(&self, key: &str) -> Option<i32> {
        match self.entries.get(key) {
            Some(AttributeValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value if it is a float.
    pub fn get_float(&self, key: &str) -> Option<f64> {
        match self.entries.get(key) {
            Some(AttributeValue::Float(v)) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value if it is a string.
    pub fn get_string(&self, key: &str) -> Option<&str> {
        match self.entries.get(key) {
            Some(AttributeValue::String(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Iterates over all entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates over all keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================
