//! # Initial Shapes
//!
//! Geometry buffers, the initial shape builder and the finished initial
//! shape handed to [`crate::Engine::generate`].

use crate::{AttributeMap, Cache, Engine, ResolveMap, Status};
use config::constants::HOLE_DELIMITER;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Flat polygon-soup geometry of one initial shape.
///
/// - `vertex_coords`: `[x, y, z, x, y, z, ...]`
/// - `indices`: vertex indices of all faces, concatenated
/// - `face_counts`: number of indices per face
/// - `holes`: `face, hole, hole, ..., HOLE_DELIMITER` groups
///
/// # Example
///
/// ```rust
/// use prt_api::Geometry;
///
/// let quad = Geometry {
///     vertex_coords: vec![0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0, 0.0, 0.0],
///     indices: vec![0, 1, 2, 3],
///     face_counts: vec![4],
///     holes: Vec::new(),
/// };
/// assert!(quad.validate().is_ok());
/// assert_eq!(quad.vertex_count(), 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub vertex_coords: Vec<f64>,
    pub indices: Vec<u32>,
    pub face_counts: Vec<u32>,
    pub holes: Vec<u32>,
}

impl Geometry {
    /// Number of vertices (coordinate triples).
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertex_coords.len() / 3
    }

    /// Number of faces.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.face_counts.len()
    }

    /// Checks that the buffers describe a consistent polygon soup.
    pub fn validate(&self) -> Result<(), Status> {
        if self.vertex_coords.is_empty() || self.vertex_coords.len() % 3 != 0 {
            return Err(Status::InvalidGeometry);
        }
        if self.face_counts.is_empty() {
            return Err(Status::InvalidGeometry);
        }

        let index_total: usize = self.face_counts.iter().map(|&c| c as usize).sum();
        if index_total != self.indices.len() {
            return Err(Status::InvalidGeometry);
        }

        let vertex_count = self.vertex_count();
        if self.indices.iter().any(|&i| i as usize >= vertex_count) {
            return Err(Status::InvalidGeometry);
        }

        for group in self.hole_groups()? {
            let (&face, holes) = group.split_first().ok_or(Status::InvalidGeometry)?;
            if holes.is_empty() || face as usize >= self.face_count() {
                return Err(Status::InvalidGeometry);
            }
            if holes
                .iter()
                .any(|&h| h == face || h as usize >= self.face_count())
            {
                return Err(Status::InvalidGeometry);
            }
        }

        Ok(())
    }

    /// Splits the flat hole buffer into `[face, hole, ...]` groups.
    pub fn hole_groups(&self) -> Result<Vec<&[u32]>, Status> {
        if self.holes.is_empty() {
            return Ok(Vec::new());
        }
        if self.holes.last() != Some(&HOLE_DELIMITER) {
            return Err(Status::InvalidGeometry);
        }
        let body = &self.holes[..self.holes.len() - 1];
        Ok(body.split(|&v| v == HOLE_DELIMITER).collect())
    }
}

/// Rule-related attributes of one initial shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeAttributes {
    pub rule_file: String,
    pub start_rule: String,
    pub random_seed: i32,
    pub name: String,
    pub attributes: AttributeMap,
    pub resolve_map: Option<Arc<ResolveMap>>,
}

/// Accumulates geometry and attributes until an [`InitialShape`] can be
/// created. One builder is kept per input shape for the lifetime of a
/// model generator; attributes are replaced before every generation.
#[derive(Debug, Clone, Default)]
pub struct InitialShapeBuilder {
    geometry: Option<Geometry>,
    attributes: Option<ShapeAttributes>,
}

impl InitialShapeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets explicit geometry after validating it.
    pub fn set_geometry(&mut self, geometry: Geometry) -> Result<(), Status> {
        geometry.validate()?;
        self.geometry = Some(geometry);
        Ok(())
    }

    /// Lets the engine decode geometry for `key`, looking up the asset and
    /// its dependencies through `resolve_map`.
    pub fn resolve_geometry(
        &mut self,
        engine: &dyn Engine,
        key: &str,
        resolve_map: Option<&ResolveMap>,
        cache: &Cache,
    ) -> Result<(), Status> {
        let geometry = engine.resolve_geometry(key, resolve_map, cache)?;
        self.set_geometry(geometry)
    }

    /// Replaces the rule attributes.
    pub fn set_attributes(&mut self, attributes: ShapeAttributes) {
        self.attributes = Some(attributes);
    }

    pub fn geometry(&self) -> Option<&Geometry> {
        self.geometry.as_ref()
    }

    /// Snapshots the builder into an initial shape.
    pub fn create_initial_shape(&self) -> Result<InitialShape, Status> {
        let geometry = self.geometry.clone().ok_or(Status::NoGeometry)?;
        let attributes = self.attributes.clone().ok_or(Status::NoAttributes)?;
        Ok(InitialShape {
            geometry,
            attributes,
        })
    }
}

/// Finished input of one rule evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct InitialShape {
    geometry: Geometry,
    attributes: ShapeAttributes,
}

impl InitialShape {
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn rule_file(&self) -> &str {
        &self.attributes.rule_file
    }

    pub fn start_rule(&self) -> &str {
        &self.attributes.start_rule
    }

    pub fn random_seed(&self) -> i32 {
        self.attributes.random_seed
    }

    pub fn name(&self) -> &str {
        &self.attributes.name
    }

    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes.attributes
    }

    pub fn resolve_map(&self) -> Option<&ResolveMap> {
        self.attributes.resolve_map.as_deref()
    }
}

// =============================================================================
// TESTS
// =============================================================================
