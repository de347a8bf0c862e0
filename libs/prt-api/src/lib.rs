//! # PRT API
//!
//! Engine boundary for the procedural runtime client.
//!
//! ## Architecture
//!
//! ```text
//! prt-client (ModelGenerator) → prt-api (Engine, Callbacks) → engine implementation
//! ```
//!
//! The client never talks to a concrete engine. It builds [`InitialShape`]s,
//! [`AttributeMap`]s and [`ResolveMap`]s, hands them to [`Engine::generate`]
//! together with a [`Callbacks`] implementation, and the engine reports the
//! generated output back through that callback object.
//!
//! ## Example
//!
//! ```rust
//! use prt_api::{AttributeMap, AttributeValue};
//!
//! let mut attrs = AttributeMap::new();
//! attrs.set_float("height", 12.5);
//! assert_eq!(attrs.get("height"), Some(&AttributeValue::Float(12.5)));
//! ```

pub mod attribute_map;
pub mod cache;
pub mod callbacks;
pub mod engine;
pub mod resolve_map;
pub mod rule_info;
pub mod shape;
pub mod status;

// Re-export public API
pub use attribute_map::{AttributeMap, AttributeType, AttributeValue};
pub use cache::Cache;
pub use callbacks::{
    CallbackResult, Callbacks, CgaErrorLevel, FileCallbacks, GeometryCallbacks, ReportBatch,
};
pub use engine::{Engine, LogLevel};
pub use resolve_map::{ResolveMap, ResolveMapBuilder};
pub use rule_info::{Annotation, AttributeInfo, RuleFileInfo, RuleInfo};
pub use shape::{Geometry, InitialShape, InitialShapeBuilder, ShapeAttributes};
pub use status::Status;
