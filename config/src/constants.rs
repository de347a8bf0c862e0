//! # Configuration Constants
//!
//! Centralized constants for the procedural runtime client. Encoder ids,
//! option names, reserved shape attributes and rule annotations are all
//! defined here.
//!
//! ## Categories
//!
//! - **Encoders**: Identifiers of the geometry and auxiliary encoders
//! - **Shape Attributes**: Reserved keys and their defaults
//! - **Rule Metadata**: Annotation names and the rule file extension
//! - **Geometry**: Sentinels used in flattened buffers
//! - **Output**: File-mode output locations

use std::fmt;

// =============================================================================
// ENCODER CONSTANTS
// =============================================================================

/// Identifier of the structured in-memory encoder.
///
/// When this encoder is requested, generated geometry, reports, prints,
/// errors and attributes are returned to the caller instead of being
/// written to files.
///
/// # Example
///
/// ```rust
/// use config::constants::ENCODER_ID_PYTHON;
///
/// let requested = "com.esri.pyprt.PyEncoder";
/// assert_eq!(requested, ENCODER_ID_PYTHON);
/// ```
pub const ENCODER_ID_PYTHON: &str = "com.esri.pyprt.PyEncoder";

/// Auxiliary encoder redirecting CGA reports into the callbacks.
pub const ENCODER_ID_CGA_REPORT: &str = "com.esri.prt.core.CGAReportEncoder";

/// Auxiliary encoder redirecting CGA `print` output into the callbacks.
pub const ENCODER_ID_CGA_PRINT: &str = "com.esri.prt.core.CGAPrintEncoder";

/// Auxiliary encoder redirecting CGA errors into the callbacks.
pub const ENCODER_ID_CGA_ERROR: &str = "com.esri.prt.core.CGAErrorEncoder";

/// Auxiliary encoder evaluating rule attributes into the callbacks.
pub const ENCODER_ID_ATTR_EVAL: &str = "com.esri.prt.core.AttributeEvalEncoder";

/// Auxiliary encoders appended after the in-memory geometry encoder, in
/// the order they are handed to the engine.
///
/// # Example
///
/// ```rust
/// use config::constants::{AUXILIARY_ENCODERS, ENCODER_ID_CGA_REPORT};
///
/// assert_eq!(AUXILIARY_ENCODERS.len(), 4);
/// assert_eq!(AUXILIARY_ENCODERS[0], ENCODER_ID_CGA_REPORT);
/// ```
pub const AUXILIARY_ENCODERS: [&str; 4] = [
    ENCODER_ID_CGA_REPORT,
    ENCODER_ID_CGA_PRINT,
    ENCODER_ID_CGA_ERROR,
    ENCODER_ID_ATTR_EVAL,
];

/// Encoder option naming the directory file-writing encoders write into.
pub const ENCODER_OPTION_OUTPUT_PATH: &str = "outputPath";

// =============================================================================
// SHAPE ATTRIBUTE CONSTANTS
// =============================================================================

/// Reserved shape attribute key carrying the random seed.
pub const KEY_SEED: &str = "seed";

/// Reserved shape attribute key carrying the initial shape name.
pub const KEY_SHAPE_NAME: &str = "shapeName";

/// Seed used when a shape attribute dictionary carries no integer `seed`.
pub const DEFAULT_SEED: i32 = 0;

/// Shape name used when a shape attribute dictionary carries no string
/// `shapeName`.
pub const DEFAULT_SHAPE_NAME: &str = "InitialShape";

/// Prefix the engine puts in front of attribute names of the default style.
///
/// # Example
///
/// ```rust
/// use config::constants::CGA_STYLE_DEFAULT_PREFIX;
///
/// let key = "Default$height";
/// assert_eq!(key.strip_prefix(CGA_STYLE_DEFAULT_PREFIX), Some("height"));
/// ```
pub const CGA_STYLE_DEFAULT_PREFIX: &str = "Default$";

// =============================================================================
// RULE METADATA CONSTANTS
// =============================================================================

/// Annotation marking the entry rule of a rule file.
pub const ANNOTATION_START_RULE: &str = "@StartRule";

/// Annotation marking attributes excluded from attribute listings.
pub const ANNOTATION_HIDDEN: &str = "@Hidden";

/// Extension of compiled rule files inside a rule package.
pub const RULE_FILE_EXTENSION: &str = ".cgb";

// =============================================================================
// GEOMETRY CONSTANTS
// =============================================================================

/// Terminates one hole group in a flattened hole buffer.
///
/// A face with two holes is encoded as `face, hole_a, hole_b, HOLE_DELIMITER`.
///
/// # Example
///
/// ```rust
/// use config::constants::HOLE_DELIMITER;
///
/// let flat = [0, 1, HOLE_DELIMITER];
/// assert_eq!(flat.iter().filter(|&&v| v == HOLE_DELIMITER).count(), 1);
/// ```
pub const HOLE_DELIMITER: u32 = u32::MAX;

/// Default directory recursion depth for asset-based initial shapes.
pub const DEFAULT_DIRECTORY_RECURSION_DEPTH: u8 = 0;

// =============================================================================
// OUTPUT CONSTANTS
// =============================================================================

/// Name of the directory created below the system temp directory when a
/// file-writing encoder is used without an `outputPath` option.
pub const FALLBACK_OUTPUT_DIR_NAME: &str = "prt_fallback_output";

// =============================================================================
// GENERATOR DEFAULTS
// =============================================================================

/// Defaults a model generator falls back to for every initial shape.
///
/// # Examples
/// ```
/// use config::constants::GeneratorDefaults;
/// let defaults = GeneratorDefaults::default();
/// assert_eq!(defaults.seed, 0);
/// assert_eq!(defaults.shape_name, "InitialShape");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorDefaults {
    /// Seed used when a shape dictionary has no integer `seed`.
    pub seed: i32,
    /// Name used when a shape dictionary has no string `shapeName`.
    pub shape_name: String,
}

impl GeneratorDefaults {
    /// Builds defaults, rejecting an empty shape name.
    ///
    /// # Examples
    /// ```
    /// use config::constants::GeneratorDefaults;
    /// let defaults = GeneratorDefaults::new(42, "Lot").expect("valid defaults");
    /// assert_eq!(defaults.seed, 42);
    /// assert!(GeneratorDefaults::new(1, "").is_err());
    /// ```
    pub fn new(seed: i32, shape_name: impl Into<String>) -> Result<Self, ConfigError> {
        let shape_name = shape_name.into();
        if shape_name.is_empty() {
            return Err(ConfigError::EmptyShapeName);
        }
        Ok(Self { seed, shape_name })
    }
}

impl Default for GeneratorDefaults {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            shape_name: DEFAULT_SHAPE_NAME.to_string(),
        }
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Raised when the default shape name is empty.
    EmptyShapeName,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyShapeName => write!(f, "default shape name must not be empty"),
        }
    }
}

impl std::error::Error for ConfigError {}
