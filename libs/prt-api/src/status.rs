//! # Engine Status Codes
//!
//! Non-success status codes reported by the engine. Success is `Ok(())`.

use thiserror::Error;

/// Failure status returned by engine calls and callback methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum Status {
    /// Unspecified failure inside the engine.
    #[error("Unspecified error")]
    UnspecifiedError,

    /// A file could not be found.
    #[error("File not found")]
    FileNotFound,

    /// A URI could not be parsed or does not point to anything.
    #[error("Invalid URI")]
    InvalidUri,

    /// No resolve map provider can handle the given URI.
    #[error("Resolve map provider not found")]
    ResolveMapProviderNotFound,

    /// An argument violates the call contract.
    #[error("Invalid argument")]
    InvalidArgument,

    /// Initial shape geometry is inconsistent.
    #[error("Invalid geometry")]
    InvalidGeometry,

    /// An initial shape was requested before geometry was set.
    #[error("No geometry set on initial shape builder")]
    NoGeometry,

    /// An initial shape was requested before rule attributes were set.
    #[error("No rule attributes set on initial shape builder")]
    NoAttributes,

    /// The requested encoder is not registered with the engine.
    #[error("Encoder not found")]
    EncoderNotFound,

    /// A key was not found in a map.
    #[error("Key not found")]
    KeyNotFound,

    /// The rule file could not be read or decoded.
    #[error("Rule file could not be read")]
    RuleFileError,

    /// The engine has not been initialized or was shut down.
    #[error("Engine not initialized")]
    NotInitialized,

    /// The engine was already initialized in this process.
    #[error("Engine already initialized")]
    AlreadyInitialized,
}

impl Status {
    /// Numeric code of the status, stable across releases.
    pub fn code(self) -> i32 {
        match self {
            Status::UnspecifiedError => 1,
            Status::FileNotFound => 2,
            Status::InvalidUri => 3,
            Status::ResolveMapProviderNotFound => 4,
            Status::InvalidArgument => 5,
            Status::InvalidGeometry => 6,
            Status::NoGeometry => 7,
            Status::NoAttributes => 8,
            Status::EncoderNotFound => 9,
            Status::KeyNotFound => 10,
            Status::RuleFileError => 11,
            Status::NotInitialized => 12,
            Status::AlreadyInitialized => 13,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
