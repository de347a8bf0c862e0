//! # Config Crate
//!
//! Centralized configuration constants for the procedural runtime client.
//! Encoder identifiers, reserved attribute keys, rule annotations and the
//! other literals shared by `prt-api` and `prt-client` are defined here so
//! that no crate scatters its own copies.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{DEFAULT_SEED, DEFAULT_SHAPE_NAME, ENCODER_ID_PYTHON};
//!
//! let encoder = ENCODER_ID_PYTHON;
//! assert!(encoder.starts_with("com.esri"));
//! assert_eq!(DEFAULT_SEED, 0);
//! assert_eq!(DEFAULT_SHAPE_NAME, "InitialShape");
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Engine Compatible**: Identifiers match what the procedural runtime expects
//! - **Well-Documented**: Every constant has clear documentation

pub mod constants;
