//! # Payload Callbacks
//!
//! In-memory callback sink. The engine reports geometry, reports, prints,
//! errors and attributes per initial shape index in arbitrary interleaving;
//! [`PayloadCallbacks`] demultiplexes them into one [`GeneratedPayload`]
//! per shape.
//!
//! ## Slots
//!
//! One slot per initial shape is allocated up front and guarded by its own
//! lock, so events for different shapes never contend. A slot's payload is
//! created on first touch.

use crate::error::CallbackError;
use crate::payload::{EvaluatedAttribute, GeneratedPayload, ReportValue};
use config::constants::CGA_STYLE_DEFAULT_PREFIX;
use parking_lot::Mutex;
use prt_api::{
    CallbackResult, Callbacks, CgaErrorLevel, GeometryCallbacks, ReportBatch, Status,
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::error;

/// Collects engine output into per-shape payloads.
///
/// # Example
///
/// ```rust
/// use prt_api::{Callbacks, GeometryCallbacks};
/// use prt_client::PayloadCallbacks;
/// use std::collections::HashSet;
///
/// let callbacks = PayloadCallbacks::new(1, HashSet::new());
/// callbacks.add_geometry(0, Some(&[0.0, 0.0, 0.0]), None, None);
/// callbacks.cga_print(0, 1, "hello ").unwrap();
/// callbacks.cga_print(0, 1, "world").unwrap();
///
/// let payload = callbacks.generated_payload(0).unwrap();
/// assert_eq!(payload.vertices().len(), 3);
/// assert_eq!(payload.cga_prints(), "hello world");
/// ```
#[derive(Debug)]
pub struct PayloadCallbacks {
    slots: Vec<Mutex<Option<Arc<GeneratedPayload>>>>,
    hidden_attributes: HashSet<String>,
}

impl PayloadCallbacks {
    /// Creates a sink for `shape_count` initial shapes.
    pub fn new(shape_count: usize, hidden_attributes: HashSet<String>) -> Self {
        Self {
            slots: (0..shape_count).map(|_| Mutex::new(None)).collect(),
            hidden_attributes,
        }
    }

    pub fn shape_count(&self) -> usize {
        self.slots.len()
    }

    /// Returns the payload of shape `index`, creating an empty one if no
    /// event arrived for it.
    pub fn generated_payload(&self, index: usize) -> Result<Arc<GeneratedPayload>, CallbackError> {
        let slot = self.slots.get(index).ok_or(CallbackError::IndexOutOfRange {
            index,
            count: self.slots.len(),
        })?;
        Ok(slot.lock().get_or_insert_with(Arc::default).clone())
    }

    fn is_hidden(&self, key: &str) -> bool {
        self.hidden_attributes.contains(key)
    }

    /// Runs `update` on the payload of shape `index`.
    fn update(&self, index: usize, update: impl FnOnce(&mut GeneratedPayload)) -> CallbackResult {
        let Some(slot) = self.slots.get(index) else {
            error!(index, count = self.slots.len(), "callback for unknown initial shape index");
            return Err(Status::InvalidArgument);
        };
        let mut slot = slot.lock();
        update(Arc::make_mut(slot.get_or_insert_with(Arc::default)));
        Ok(())
    }

    fn store_attribute(&self, index: usize, key: &str, value: EvaluatedAttribute) -> CallbackResult {
        if self.is_hidden(key) {
            return Ok(());
        }
        let key = strip_default_style(key).to_owned();
        self.update(index, |payload| {
            payload.attributes.insert(key, value);
        })
    }

    fn store_array<T: Clone>(
        &self,
        index: usize,
        key: &str,
        values: &[T],
        n_rows: usize,
        flat: impl FnOnce(Vec<T>) -> EvaluatedAttribute,
        rows: impl FnOnce(Vec<Vec<T>>) -> EvaluatedAttribute,
    ) -> CallbackResult {
        if self.is_hidden(key) {
            return Ok(());
        }
        let value = match reshape(values, n_rows) {
            Some(Shaped::Flat(v)) => flat(v),
            Some(Shaped::Rows(v)) => rows(v),
            None => {
                error!(
                    index,
                    key,
                    len = values.len(),
                    n_rows,
                    "array attribute length is not divisible by its row count"
                );
                return Err(Status::InvalidArgument);
            }
        };
        self.store_attribute(index, key, value)
    }
}

/// Removes the default style prefix from an attribute key.
///
/// # Example
///
/// ```rust
/// use prt_client::callbacks::strip_default_style;
///
/// assert_eq!(strip_default_style("Default$height"), "height");
/// assert_eq!(strip_default_style("Other$height"), "Other$height");
/// ```
pub fn strip_default_style(key: &str) -> &str {
    key.strip_prefix(CGA_STYLE_DEFAULT_PREFIX).unwrap_or(key)
}

/// Flat or row-major shaped array data.
#[derive(Debug, Clone, PartialEq)]
pub enum Shaped<T> {
    Flat(Vec<T>),
    Rows(Vec<Vec<T>>),
}

/// Splits `values` into `n_rows` rows of equal length.
///
/// One row (or no data at all) stays flat. Returns `None` if the length is
/// not divisible by `n_rows`.
pub fn reshape<T: Clone>(values: &[T], n_rows: usize) -> Option<Shaped<T>> {
    match n_rows {
        0 if values.is_empty() => Some(Shaped::Flat(Vec::new())),
        0 => None,
        1 => Some(Shaped::Flat(values.to_vec())),
        _ if values.is_empty() => Some(Shaped::Rows(vec![Vec::new(); n_rows])),
        _ if values.len() % n_rows != 0 => None,
        _ => {
            let columns = values.len() / n_rows;
            Some(Shaped::Rows(
                values.chunks(columns).map(<[T]>::to_vec).collect(),
            ))
        }
    }
}

fn format_cga_error(level: CgaErrorLevel, message: &str) -> String {
    format!("CGA {level}: {message}")
}

fn format_asset_error(level: CgaErrorLevel, key: &str, uri: &str, message: &str) -> String {
    format!("Asset {level} {key} {uri}: {message}")
}

// =============================================================================
// CALLBACK CONTRACT
// =============================================================================

impl Callbacks for PayloadCallbacks {
    fn generate_error(&self, _index: usize, _status: Status, _message: &str) -> CallbackResult {
        Ok(())
    }

    fn asset_error(
        &self,
        index: usize,
        level: CgaErrorLevel,
        key: &str,
        uri: &str,
        message: &str,
    ) -> CallbackResult {
        let entry = format_asset_error(level, key, uri, message);
        self.update(index, |payload| payload.cga_errors.push(entry))
    }

    fn cga_error(
        &self,
        index: usize,
        _shape_id: i32,
        level: CgaErrorLevel,
        _method_id: i32,
        _pc: i32,
        message: &str,
    ) -> CallbackResult {
        let entry = format_cga_error(level, message);
        self.update(index, |payload| payload.cga_errors.push(entry))
    }

    fn cga_print(&self, index: usize, _shape_id: i32, text: &str) -> CallbackResult {
        self.update(index, |payload| payload.cga_prints.push_str(text))
    }

    fn cga_report_bool(&self, _index: usize, _shape_id: i32, _key: &str, _value: bool) -> CallbackResult {
        Ok(())
    }

    fn cga_report_float(&self, _index: usize, _shape_id: i32, _key: &str, _value: f64) -> CallbackResult {
        Ok(())
    }

    fn cga_report_string(
        &self,
        _index: usize,
        _shape_id: i32,
        _key: &str,
        _value: &str,
    ) -> CallbackResult {
        Ok(())
    }

    fn attr_bool(&self, index: usize, _shape_id: i32, key: &str, value: bool) -> CallbackResult {
        self.store_attribute(index, key, EvaluatedAttribute::Bool(value))
    }

    fn attr_float(&self, index: usize, _shape_id: i32, key: &str, value: f64) -> CallbackResult {
        self.store_attribute(index, key, EvaluatedAttribute::Float(value))
    }

    fn attr_string(&self, index: usize, _shape_id: i32, key: &str, value: &str) -> CallbackResult {
        self.store_attribute(index, key, EvaluatedAttribute::String(value.to_owned()))
    }

    fn attr_bool_array(
        &self,
        index: usize,
        _shape_id: i32,
        key: &str,
        values: &[bool],
        n_rows: usize,
    ) -> CallbackResult {
        self.store_array(
            index,
            key,
            values,
            n_rows,
            EvaluatedAttribute::BoolArray,
            EvaluatedAttribute::BoolMatrix,
        )
    }

    fn attr_float_array(
        &self,
        index: usize,
        _shape_id: i32,
        key: &str,
        values: &[f64],
        n_rows: usize,
    ) -> CallbackResult {
        self.store_array(
            index,
            key,
            values,
            n_rows,
            EvaluatedAttribute::FloatArray,
            EvaluatedAttribute::FloatMatrix,
        )
    }

    fn attr_string_array(
        &self,
        index: usize,
        _shape_id: i32,
        key: &str,
        values: &[&str],
        n_rows: usize,
    ) -> CallbackResult {
        let owned: Vec<String> = values.iter().map(|s| (*s).to_owned()).collect();
        self.store_array(
            index,
            key,
            &owned,
            n_rows,
            EvaluatedAttribute::StringArray,
            EvaluatedAttribute::StringMatrix,
        )
    }

    fn geometry_sink(&self) -> Option<&dyn GeometryCallbacks> {
        Some(self)
    }
}

impl GeometryCallbacks for PayloadCallbacks {
    fn add_geometry(
        &self,
        index: usize,
        vertex_coords: Option<&[f64]>,
        face_indices: Option<&[u32]>,
        face_counts: Option<&[u32]>,
    ) {
        let _ = self.update(index, |payload| {
            if let Some(coords) = vertex_coords {
                payload.vertices.extend_from_slice(coords);
            }
            if let Some(indices) = face_indices {
                payload.indices.extend_from_slice(indices);
            }
            if let Some(counts) = face_counts {
                payload.faces.extend_from_slice(counts);
            }
        });
    }

    fn add_reports(&self, index: usize, reports: &ReportBatch<'_>) {
        let _ = self.update(index, |payload| {
            for &(key, value) in reports.bools {
                payload.report.insert(key.to_owned(), ReportValue::Bool(value));
            }
            for &(key, value) in reports.floats {
                payload.report.insert(key.to_owned(), ReportValue::Float(value));
            }
            for &(key, value) in reports.strings {
                payload.report.insert(key.to_owned(), ReportValue::String(value.to_owned()));
            }
        });
    }
}
