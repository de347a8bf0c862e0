//! # Attribute Dictionaries
//!
//! Conversion of host attribute dictionaries (JSON objects) into typed
//! [`AttributeMap`]s.
//!
//! | JSON value             | Attribute type |
//! |------------------------|----------------|
//! | `true` / `false`       | bool           |
//! | integer fitting `i32`  | int            |
//! | other number           | float          |
//! | string                 | string         |
//! | array                  | typed by its first element |

use prt_api::AttributeMap;
use serde_json::{Map, Number, Value};
use tracing::{error, warn};

/// Host-side attribute dictionary of one initial shape or encoder.
pub type AttributeDict = Map<String, Value>;

/// Converts `dict` into an attribute map.
///
/// Values that cannot be represented are skipped and logged; the
/// conversion itself never fails.
///
/// # Example
///
/// ```rust
/// use prt_client::attributes::attribute_map_from_dict;
/// use serde_json::json;
///
/// let dict = json!({"seed": 555, "height": 12.5, "tags": ["a", "b"]});
/// let map = attribute_map_from_dict(dict.as_object().unwrap());
/// assert_eq!(map.get_int("seed"), Some(555));
/// assert_eq!(map.get_float("height"), Some(12.5));
/// assert_eq!(map.len(), 3);
/// ```
pub fn attribute_map_from_dict(dict: &AttributeDict) -> AttributeMap {
    let mut map = AttributeMap::new();
    for (key, value) in dict {
        match value {
            Value::Array(items) => set_array(&mut map, key, items),
            Value::Bool(b) => map.set_bool(key.as_str(), *b),
            Value::Number(n) => set_number(&mut map, key, n),
            Value::String(s) => map.set_string(key.as_str(), s.as_str()),
            Value::Null | Value::Object(_) => {
                warn!(key = %key, "unsupported scalar attribute type, skipping");
            }
        }
    }
    map
}

fn set_number(map: &mut AttributeMap, key: &str, n: &Number) {
    if n.is_f64() {
        if let Some(f) = n.as_f64() {
            map.set_float(key, f);
        }
        return;
    }
    match n.as_i64().and_then(|i| i32::try_from(i).ok()) {
        Some(i) => map.set_int(key, i),
        None => error!(key = %key, value = %n, "cannot set int attribute, out of range"),
    }
}

fn set_array(map: &mut AttributeMap, key: &str, items: &[Value]) {
    let Some(first) = items.first() else {
        warn!(key = %key, "empty array attribute, skipping");
        return;
    };

    let converted = match first {
        Value::Bool(_) => collect(items, Value::as_bool).map(|v| map.set_bool_array(key, v)),
        Value::Number(n) if n.is_f64() => {
            collect(items, Value::as_f64).map(|v| map.set_float_array(key, v))
        }
        Value::Number(_) => collect(items, |v| v.as_i64().and_then(|i| i32::try_from(i).ok()))
            .map(|v| map.set_int_array(key, v)),
        Value::String(_) => collect(items, |v| v.as_str().map(str::to_owned))
            .map(|v| map.set_string_array(key, v)),
        Value::Null | Value::Array(_) | Value::Object(_) => {
            warn!(key = %key, "unsupported array attribute type, skipping");
            return;
        }
    };

    if converted.is_none() {
        error!(key = %key, "cannot set array attribute, elements differ in type or are out of range");
    }
}

fn collect<T>(items: &[Value], convert: impl Fn(&Value) -> Option<T>) -> Option<Vec<T>> {
    items.iter().map(convert).collect()
}

// =============================================================================
// TESTS
// =============================================================================
