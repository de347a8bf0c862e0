//! # PRT Client
//!
//! Model generation on top of a procedural runtime engine.
//!
//! ## Architecture
//!
//! ```text
//! ShapeDescriptor ─┐
//!                  ├→ ModelGenerator → Engine::generate → PayloadCallbacks → GeneratedModel
//! rule package ────┘                                   ↘ FileOutputCallbacks → files
//! ```
//!
//! - [`descriptor`]: input shapes (explicit geometry or asset files)
//! - [`resolver`]: asset dependency discovery for file-based shapes
//! - [`rule_package`]: rule file, start rule and hidden attributes
//! - [`generator`]: the generation pipeline
//! - [`callbacks`]: in-memory aggregation of engine output
//! - [`context`]: process-wide engine lifecycle
//!
//! ## Usage
//!
//! ```rust,ignore
//! use prt_client::{context, ContextOptions, ModelGenerator, ShapeDescriptor};
//! use config::constants::ENCODER_ID_PYTHON;
//!
//! context::initialize(engine, ContextOptions::default())?;
//!
//! let lot = ShapeDescriptor::from_vertices(vec![0.0, 0.0, 0.0, 0.0, 0.0, 10.0, 10.0, 0.0, 10.0, 10.0, 0.0, 0.0])?;
//! let mut generator = ModelGenerator::new(&[lot])?;
//! let attrs = serde_json::json!({"seed": 555}).as_object().cloned().unwrap_or_default();
//! let models = generator.generate_model(&[attrs], "candler.rpk", ENCODER_ID_PYTHON, &Default::default());
//! println!("{} faces", models[0].faces().len());
//! ```

pub mod attributes;
pub mod callbacks;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod file_output;
pub mod generator;
pub mod logging;
pub mod model;
pub mod payload;
pub mod resolver;
pub mod rule_package;

pub use attributes::{attribute_map_from_dict, AttributeDict};
pub use callbacks::PayloadCallbacks;
pub use context::{ContextOptions, PrtContext};
pub use descriptor::{ShapeDescriptor, ShapeSource};
pub use error::{CallbackError, ContextError, GenerateError, RulePackageError, ShapeError};
pub use file_output::FileOutputCallbacks;
pub use generator::{GenerateRequest, ModelGenerator, ShapeStatus};
pub use model::GeneratedModel;
pub use payload::{EvaluatedAttribute, GeneratedPayload, ReportValue};
pub use rule_package::{load_rule_package, RulePackage};
