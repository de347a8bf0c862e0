//! # Engine Boundary
//!
//! The operations a procedural runtime engine exposes to the client core.
//! The client never evaluates rules itself; every generation goes through
//! [`Engine::generate`].

use crate::{AttributeMap, Cache, Callbacks, Geometry, InitialShape, ResolveMap, RuleFileInfo, Status};
use serde::{Deserialize, Serialize};

/// Minimal severity of engine log output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warning,
    Error,
    Fatal,
    /// Disables engine logging.
    None,
}

/// A procedural runtime engine.
///
/// Implementations must be shareable across threads: `generate` may call
/// back into the [`Callbacks`] object from worker threads.
///
/// # Examples
/// ```
/// use prt_api::{
///     AttributeMap, Cache, Callbacks, Engine, Geometry, InitialShape, ResolveMap,
///     RuleFileInfo, Status,
/// };
///
/// struct Offline;
///
/// impl Engine for Offline {
///     fn create_resolve_map(&self, _uri: &str, _cache: &Cache) -> Result<ResolveMap, Status> {
///         Err(Status::ResolveMapProviderNotFound)
///     }
///     fn create_rule_file_info(&self, _uri: &str, _cache: &Cache) -> Result<RuleFileInfo, Status> {
///         Err(Status::RuleFileError)
///     }
///     fn resolve_geometry(
///         &self,
///         _key: &str,
///         _map: Option<&ResolveMap>,
///         _cache: &Cache,
///     ) -> Result<Geometry, Status> {
///         Err(Status::FileNotFound)
///     }
///     fn validate_encoder_options(
///         &self,
///         _id: &str,
///         _options: &AttributeMap,
///     ) -> Result<AttributeMap, Status> {
///         Err(Status::EncoderNotFound)
///     }
///     fn generate(
///         &self,
///         _shapes: &[InitialShape],
///         _encoders: &[&str],
///         _options: &[AttributeMap],
///         _callbacks: &dyn Callbacks,
///         _cache: &Cache,
///     ) -> Result<(), Status> {
///         Err(Status::NotInitialized)
///     }
/// }
///
/// let engine = Offline;
/// assert!(engine.init(Default::default()).is_ok());
/// assert_eq!(engine.create_cache().len(), 0);
/// ```
pub trait Engine: Send + Sync {
    /// Brings the engine up. Called once per process by the runtime context.
    fn init(&self, _log_level: LogLevel) -> Result<(), Status> {
        Ok(())
    }

    /// Releases engine resources. Called once by the runtime context.
    fn shutdown(&self) {}

    fn create_cache(&self) -> Cache {
        Cache::new()
    }

    /// Builds the resolve map of a rule package.
    fn create_resolve_map(&self, package_uri: &str, cache: &Cache) -> Result<ResolveMap, Status>;

    /// Locates the compiled rule file in a resolve map.
    ///
    /// Engines with a direct lookup override this; the default scans the
    /// keys for the rule file extension.
    fn find_rule_file_key(&self, resolve_map: &ResolveMap) -> Option<String> {
        resolve_map.find_rule_file_key().map(str::to_owned)
    }

    /// Decodes rule and attribute metadata of a compiled rule file.
    fn create_rule_file_info(&self, rule_file_uri: &str, cache: &Cache)
        -> Result<RuleFileInfo, Status>;

    /// Decodes the asset behind `key` into initial shape geometry.
    fn resolve_geometry(
        &self,
        key: &str,
        resolve_map: Option<&ResolveMap>,
        cache: &Cache,
    ) -> Result<Geometry, Status>;

    /// Completes `options` with the encoder's defaults and checks them.
    fn validate_encoder_options(
        &self,
        encoder_id: &str,
        options: &AttributeMap,
    ) -> Result<AttributeMap, Status>;

    /// Generates all `shapes` with the index-aligned `encoders` and
    /// `encoder_options`, reporting output through `callbacks`.
    fn generate(
        &self,
        shapes: &[InitialShape],
        encoders: &[&str],
        encoder_options: &[AttributeMap],
        callbacks: &dyn Callbacks,
        cache: &Cache,
    ) -> Result<(), Status>;
}
