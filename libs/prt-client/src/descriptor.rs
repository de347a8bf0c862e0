//! # Shape Descriptors
//!
//! Immutable description of one input shape: either explicit polygon
//! geometry or an asset file the engine decodes.

use crate::error::ShapeError;
use config::constants::{DEFAULT_DIRECTORY_RECURSION_DEPTH, HOLE_DELIMITER};
use glam::DVec3;
use prt_api::Geometry;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where the geometry of a shape comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeSource {
    /// Explicit polygon soup.
    Geometry {
        vertex_coords: Vec<f64>,
        indices: Vec<u32>,
        face_counts: Vec<u32>,
        /// `[face, hole, hole, ...]` groups.
        holes: Vec<Vec<u32>>,
    },
    /// Asset file plus the depth to which neighbouring directories are
    /// scanned for dependencies.
    Path {
        path: PathBuf,
        recursion_depth: u8,
    },
}

/// One input shape of a model generator.
///
/// # Example
///
/// ```rust
/// use prt_client::ShapeDescriptor;
///
/// let quad = ShapeDescriptor::from_vertices(vec![
///     0.0, 0.0, 0.0, 0.0, 0.0, 10.0, 10.0, 0.0, 10.0, 10.0, 0.0, 0.0,
/// ])
/// .unwrap();
/// assert_eq!(quad.face_counts(), Some(&[4][..]));
/// assert!(!quad.is_path());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeDescriptor {
    source: ShapeSource,
}

impl ShapeDescriptor {
    /// One counter-clockwise polygon through all vertices.
    pub fn from_vertices(vertex_coords: Vec<f64>) -> Result<Self, ShapeError> {
        check_coordinates(&vertex_coords)?;
        let vertex_count = (vertex_coords.len() / 3) as u32;
        Ok(Self {
            source: ShapeSource::Geometry {
                vertex_coords,
                indices: (0..vertex_count).collect(),
                face_counts: vec![vertex_count],
                holes: Vec::new(),
            },
        })
    }

    /// One counter-clockwise polygon through `points`.
    pub fn from_points(points: &[DVec3]) -> Self {
        let vertex_coords = points.iter().flat_map(|p| p.to_array()).collect();
        let vertex_count = points.len() as u32;
        Self {
            source: ShapeSource::Geometry {
                vertex_coords,
                indices: (0..vertex_count).collect(),
                face_counts: vec![vertex_count],
                holes: Vec::new(),
            },
        }
    }

    /// Explicit faces with optional holes.
    ///
    /// Each hole group starts with the index of the enclosing face followed
    /// by the indices of the faces that cut holes into it.
    pub fn from_faces(
        vertex_coords: Vec<f64>,
        indices: Vec<u32>,
        face_counts: Vec<u32>,
        holes: Vec<Vec<u32>>,
    ) -> Result<Self, ShapeError> {
        check_coordinates(&vertex_coords)?;

        let face_count_sum: usize = face_counts.iter().map(|&c| c as usize).sum();
        if face_count_sum != indices.len() {
            return Err(ShapeError::FaceCountMismatch {
                face_count_sum,
                index_count: indices.len(),
            });
        }

        if let Some(group) = holes.iter().position(|g| g.len() < 2) {
            return Err(ShapeError::IncompleteHoleGroup { group });
        }

        Ok(Self {
            source: ShapeSource::Geometry {
                vertex_coords,
                indices,
                face_counts,
                holes,
            },
        })
    }

    /// Asset file; `recursion_depth` defaults to
    /// [`DEFAULT_DIRECTORY_RECURSION_DEPTH`] when `None`.
    pub fn from_path(path: impl Into<PathBuf>, recursion_depth: Option<u8>) -> Self {
        Self {
            source: ShapeSource::Path {
                path: path.into(),
                recursion_depth: recursion_depth.unwrap_or(DEFAULT_DIRECTORY_RECURSION_DEPTH),
            },
        }
    }

    pub fn source(&self) -> &ShapeSource {
        &self.source
    }

    pub fn is_path(&self) -> bool {
        matches!(self.source, ShapeSource::Path { .. })
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            ShapeSource::Path { path, .. } => Some(path),
            ShapeSource::Geometry { .. } => None,
        }
    }

    pub fn recursion_depth(&self) -> Option<u8> {
        match &self.source {
            ShapeSource::Path {
                recursion_depth, ..
            } => Some(*recursion_depth),
            ShapeSource::Geometry { .. } => None,
        }
    }

    pub fn vertex_coords(&self) -> Option<&[f64]> {
        match &self.source {
            ShapeSource::Geometry { vertex_coords, .. } => Some(vertex_coords),
            ShapeSource::Path { .. } => None,
        }
    }

    pub fn indices(&self) -> Option<&[u32]> {
        match &self.source {
            ShapeSource::Geometry { indices, .. } => Some(indices),
            ShapeSource::Path { .. } => None,
        }
    }

    pub fn face_counts(&self) -> Option<&[u32]> {
        match &self.source {
            ShapeSource::Geometry { face_counts, .. } => Some(face_counts),
            ShapeSource::Path { .. } => None,
        }
    }

    pub fn holes(&self) -> Option<&[Vec<u32>]> {
        match &self.source {
            ShapeSource::Geometry { holes, .. } => Some(holes),
            ShapeSource::Path { .. } => None,
        }
    }

    /// Engine geometry for explicit shapes, with hole groups flattened.
    pub fn to_geometry(&self) -> Option<Geometry> {
        match &self.source {
            ShapeSource::Geometry {
                vertex_coords,
                indices,
                face_counts,
                holes,
            } => Some(Geometry {
                vertex_coords: vertex_coords.clone(),
                indices: indices.clone(),
                face_counts: face_counts.clone(),
                holes: flatten_holes(holes),
            }),
            ShapeSource::Path { .. } => None,
        }
    }
}

/// Flattens hole groups into `face, hole, ..., HOLE_DELIMITER` runs.
pub fn flatten_holes(groups: &[Vec<u32>]) -> Vec<u32> {
    let mut flat = Vec::with_capacity(groups.iter().map(|g| g.len() + 1).sum());
    for group in groups {
        flat.extend_from_slice(group);
        flat.push(HOLE_DELIMITER);
    }
    flat
}

fn check_coordinates(vertex_coords: &[f64]) -> Result<(), ShapeError> {
    if vertex_coords.len() % 3 != 0 {
        return Err(ShapeError::CoordinateCount {
            count: vertex_coords.len(),
        });
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
