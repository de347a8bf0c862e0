//! # Generated Payloads
//!
//! Per-shape output assembled by [`crate::PayloadCallbacks`] during one
//! generation: geometry buffers, reports, print output, errors and
//! evaluated rule attributes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Value of one CGA report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReportValue {
    Bool(bool),
    Float(f64),
    String(String),
}

/// Value of one evaluated rule attribute.
///
/// Array attributes reported with more than one row become matrices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EvaluatedAttribute {
    Bool(bool),
    Float(f64),
    String(String),
    BoolArray(Vec<bool>),
    FloatArray(Vec<f64>),
    StringArray(Vec<String>),
    BoolMatrix(Vec<Vec<bool>>),
    FloatMatrix(Vec<Vec<f64>>),
    StringMatrix(Vec<Vec<String>>),
}

/// Generated output of one initial shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratedPayload {
    pub(crate) vertices: Vec<f64>,
    pub(crate) indices: Vec<u32>,
    pub(crate) faces: Vec<u32>,
    pub(crate) report: BTreeMap<String, ReportValue>,
    pub(crate) cga_prints: String,
    pub(crate) cga_errors: Vec<String>,
    pub(crate) attributes: BTreeMap<String, EvaluatedAttribute>,
}

impl GeneratedPayload {
    /// Flat `(x, y, z)` vertex coordinates.
    pub fn vertices(&self) -> &[f64] {
        &self.vertices
    }

    /// Vertex indices of all faces, concatenated.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of indices per face.
    pub fn faces(&self) -> &[u32] {
        &self.faces
    }

    pub fn report(&self) -> &BTreeMap<String, ReportValue> {
        &self.report
    }

    pub fn cga_prints(&self) -> &str {
        &self.cga_prints
    }

    pub fn cga_errors(&self) -> &[String] {
        &self.cga_errors
    }

    pub fn attributes(&self) -> &BTreeMap<String, EvaluatedAttribute> {
        &self.attributes
    }

    /// Returns true if no callback touched this payload.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
