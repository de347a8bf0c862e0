//! # Client Errors
//!
//! Error types of the model generation client, one per layer.

use prt_api::Status;
use std::path::PathBuf;
use thiserror::Error;

/// Invalid shape descriptor input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    /// Coordinate buffer is not made of `(x, y, z)` triples.
    #[error("vertex coordinate count {count} is not a multiple of 3")]
    CoordinateCount { count: usize },

    /// Face counts do not add up to the index count.
    #[error("face counts sum to {face_count_sum} but {index_count} indices were given")]
    FaceCountMismatch {
        face_count_sum: usize,
        index_count: usize,
    },

    /// A hole group needs a face index followed by at least one hole index.
    #[error("hole group {group} must contain a face index and at least one hole index")]
    IncompleteHoleGroup { group: usize },
}

/// Failure while loading a rule package.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("rule package {}: {}", .path.display(), .status)]
pub struct RulePackageError {
    pub path: PathBuf,
    pub status: Status,
}

impl RulePackageError {
    pub fn new(path: impl Into<PathBuf>, status: Status) -> Self {
        Self {
            path: path.into(),
            status,
        }
    }
}

/// Failure of a payload lookup on the output aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallbackError {
    #[error("initial shape index {index} is out of range ({count} shapes)")]
    IndexOutOfRange { index: usize, count: usize },
}

/// Failure of the process-wide runtime lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    /// The runtime is already running.
    #[error("procedural runtime is already initialized")]
    AlreadyInitialized,

    /// The runtime was shut down and cannot be brought up again.
    #[error("procedural runtime was shut down and cannot be re-initialized")]
    ShutDown,

    /// No runtime has been initialized.
    #[error("procedural runtime is not initialized")]
    NotInitialized,

    /// The engine refused to start.
    #[error("engine initialization failed: {0}")]
    Engine(Status),
}

/// Failure of one model generation call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    /// At least one initial shape failed to build at construction time.
    #[error("invalid model generator: {failed} of {total} initial shapes failed to build")]
    InvalidGenerator { failed: usize, total: usize },

    /// The runtime is not running.
    #[error("procedural runtime is not initialized")]
    NotInitialized,

    /// Fewer attribute dictionaries than shapes, and not exactly one.
    #[error("not enough shape attribute dictionaries: {given} given for {shapes} initial shapes")]
    AttributeCount { given: usize, shapes: usize },

    #[error(transparent)]
    RulePackage(#[from] RulePackageError),

    /// The engine rejected the options of an encoder.
    #[error("invalid options for encoder '{encoder}': {status}")]
    EncoderOptions { encoder: String, status: Status },

    /// The file output directory is missing or not a directory.
    #[error("output path is not a valid directory: {}", .path.display())]
    OutputPath { path: PathBuf },

    /// An initial shape could not be created from its builder.
    #[error("could not create initial shape {index}: {status}")]
    InitialShape { index: usize, status: Status },

    /// The generate call returned a failure status.
    #[error("generate failed with status '{}' ({})", .0, .0.code())]
    Engine(Status),

    /// The engine or a callback panicked.
    #[error("generation panicked: {0}")]
    Panicked(String),
}

// =============================================================================
// TESTS
// =============================================================================
