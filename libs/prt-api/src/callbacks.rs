//! # Callback Contract
//!
//! The fixed interface through which the engine reports generated output.
//! Every method of [`Callbacks`] must be implemented; encoders that need an
//! extended capability (in-memory geometry, file output) query it through
//! [`Callbacks::geometry_sink`] or [`Callbacks::file_sink`].
//!
//! The engine may invoke a callback object from several threads during one
//! generation, but never concurrently for the same initial shape index.

use crate::Status;
use std::fmt;

/// Result returned by every callback method.
pub type CallbackResult = Result<(), Status>;

/// Severity of a CGA or asset error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CgaErrorLevel {
    Error,
    Warning,
    Info,
}

impl fmt::Display for CgaErrorLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CgaErrorLevel::Error => write!(f, "Error"),
            CgaErrorLevel::Warning => write!(f, "Warning"),
            CgaErrorLevel::Info => write!(f, "Info"),
        }
    }
}

/// Reports of one initial shape, delivered in one batch by the report
/// encoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportBatch<'a> {
    pub strings: &'a [(&'a str, &'a str)],
    pub floats: &'a [(&'a str, f64)],
    pub bools: &'a [(&'a str, bool)],
}

/// Base callback interface every generation target implements.
pub trait Callbacks: Send + Sync {
    fn generate_error(&self, initial_shape_index: usize, status: Status, message: &str)
        -> CallbackResult;

    fn asset_error(
        &self,
        initial_shape_index: usize,
        level: CgaErrorLevel,
        key: &str,
        uri: &str,
        message: &str,
    ) -> CallbackResult;

    fn cga_error(
        &self,
        initial_shape_index: usize,
        shape_id: i32,
        level: CgaErrorLevel,
        method_id: i32,
        pc: i32,
        message: &str,
    ) -> CallbackResult;

    fn cga_print(&self, initial_shape_index: usize, shape_id: i32, text: &str) -> CallbackResult;

    fn cga_report_bool(
        &self,
        initial_shape_index: usize,
        shape_id: i32,
        key: &str,
        value: bool,
    ) -> CallbackResult;

    fn cga_report_float(
        &self,
        initial_shape_index: usize,
        shape_id: i32,
        key: &str,
        value: f64,
    ) -> CallbackResult;

    fn cga_report_string(
        &self,
        initial_shape_index: usize,
        shape_id: i32,
        key: &str,
        value: &str,
    ) -> CallbackResult;

    fn attr_bool(&self, initial_shape_index: usize, shape_id: i32, key: &str, value: bool)
        -> CallbackResult;

    fn attr_float(&self, initial_shape_index: usize, shape_id: i32, key: &str, value: f64)
        -> CallbackResult;

    fn attr_string(
        &self,
        initial_shape_index: usize,
        shape_id: i32,
        key: &str,
        value: &str,
    ) -> CallbackResult;

    /// `values` holds `n_rows` rows of equal length, row-major.
    fn attr_bool_array(
        &self,
        initial_shape_index: usize,
        shape_id: i32,
        key: &str,
        values: &[bool],
        n_rows: usize,
    ) -> CallbackResult;

    /// `values` holds `n_rows` rows of equal length, row-major.
    fn attr_float_array(
        &self,
        initial_shape_index: usize,
        shape_id: i32,
        key: &str,
        values: &[f64],
        n_rows: usize,
    ) -> CallbackResult;

    /// `values` holds `n_rows` rows of equal length, row-major.
    fn attr_string_array(
        &self,
        initial_shape_index: usize,
        shape_id: i32,
        key: &str,
        values: &[&str],
        n_rows: usize,
    ) -> CallbackResult;

    /// In-memory geometry capability used by the structured encoder.
    fn geometry_sink(&self) -> Option<&dyn GeometryCallbacks> {
        None
    }

    /// File output capability used by file-writing encoders.
    fn file_sink(&self) -> Option<&dyn FileCallbacks> {
        None
    }
}

/// Capability of receiving generated geometry and report batches in memory.
pub trait GeometryCallbacks: Send + Sync {
    /// Appends geometry fragments; `None` means no data of that kind.
    fn add_geometry(
        &self,
        initial_shape_index: usize,
        vertex_coords: Option<&[f64]>,
        face_indices: Option<&[u32]>,
        face_counts: Option<&[u32]>,
    );

    fn add_reports(&self, initial_shape_index: usize, reports: &ReportBatch<'_>);
}

/// Capability of persisting encoder output as named files.
pub trait FileCallbacks: Send + Sync {
    fn write_file(&self, initial_shape_index: usize, name: &str, contents: &[u8])
        -> CallbackResult;
}
