//! # Generated Models
//!
//! Result entry of one initial shape, as returned by
//! [`crate::ModelGenerator::generate_model`].

use crate::payload::{EvaluatedAttribute, GeneratedPayload, ReportValue};
use glam::DVec3;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Generated output of one initial shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedModel {
    initial_shape_index: usize,
    #[serde(flatten)]
    payload: Arc<GeneratedPayload>,
}

impl GeneratedModel {
    pub fn new(initial_shape_index: usize, payload: Arc<GeneratedPayload>) -> Self {
        Self {
            initial_shape_index,
            payload,
        }
    }

    pub fn initial_shape_index(&self) -> usize {
        self.initial_shape_index
    }

    pub fn vertices(&self) -> &[f64] {
        self.payload.vertices()
    }

    pub fn indices(&self) -> &[u32] {
        self.payload.indices()
    }

    pub fn faces(&self) -> &[u32] {
        self.payload.faces()
    }

    pub fn report(&self) -> &BTreeMap<String, ReportValue> {
        self.payload.report()
    }

    pub fn cga_prints(&self) -> &str {
        self.payload.cga_prints()
    }

    pub fn cga_errors(&self) -> &[String] {
        self.payload.cga_errors()
    }

    pub fn attributes(&self) -> &BTreeMap<String, EvaluatedAttribute> {
        self.payload.attributes()
    }

    pub fn payload(&self) -> &Arc<GeneratedPayload> {
        &self.payload
    }

    /// Vertices as points. A trailing partial triple is ignored.
    pub fn positions(&self) -> Vec<DVec3> {
        self.vertices()
            .chunks_exact(3)
            .map(DVec3::from_slice)
            .collect()
    }

    /// JSON form of the model, payload fields inlined.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

// =============================================================================
// TESTS
// =============================================================================
