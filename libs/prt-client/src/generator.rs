//! # Model Generator
//!
//! Drives one engine generation for a fixed set of initial shapes.
//!
//! ## Pipeline
//!
//! ```text
//! ShapeDescriptor → InitialShapeBuilder     (once, at construction)
//! attribute dicts + rule package → InitialShape
//! encoders + callbacks → Engine::generate → GeneratedModel
//! ```
//!
//! Builders and the cache live as long as the generator. Rule package,
//! encoders and attributes are resolved again on every call.

use crate::attributes::{attribute_map_from_dict, AttributeDict};
use crate::callbacks::PayloadCallbacks;
use crate::context::{self, PrtContext};
use crate::descriptor::{ShapeDescriptor, ShapeSource};
use crate::error::{ContextError, GenerateError};
use crate::file_output::FileOutputCallbacks;
use crate::model::GeneratedModel;
use crate::resolver::{generic_path, resolve_asset_dependencies};
use crate::rule_package::{load_rule_package, RulePackage};
use config::constants::{
    GeneratorDefaults, AUXILIARY_ENCODERS, ENCODER_ID_PYTHON, ENCODER_OPTION_OUTPUT_PATH,
    FALLBACK_OUTPUT_DIR_NAME, KEY_SEED, KEY_SHAPE_NAME,
};
use prt_api::{
    AttributeMap, Cache, Engine, InitialShape, InitialShapeBuilder, ShapeAttributes, Status,
};
use std::any::Any;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use url::Url;

/// Construction result of one initial shape.
pub type ShapeStatus = Result<(), Status>;

/// Arguments of one generation call.
#[derive(Debug, Clone, Copy)]
pub struct GenerateRequest<'a> {
    /// One dictionary for all shapes, or one per shape.
    pub shape_attributes: &'a [AttributeDict],
    pub rule_package: &'a Path,
    pub encoder: &'a str,
    pub encoder_options: &'a AttributeDict,
    /// Extra resolve map entries (key → URI) layered over the package.
    pub assets: Option<&'a BTreeMap<String, String>>,
}

impl<'a> GenerateRequest<'a> {
    pub fn new(
        shape_attributes: &'a [AttributeDict],
        rule_package: &'a Path,
        encoder: &'a str,
        encoder_options: &'a AttributeDict,
    ) -> Self {
        Self {
            shape_attributes,
            rule_package,
            encoder,
            encoder_options,
            assets: None,
        }
    }

    pub fn with_assets(mut self, assets: &'a BTreeMap<String, String>) -> Self {
        self.assets = Some(assets);
        self
    }
}

/// Generates models for a fixed list of initial shapes.
///
/// A generator is valid only if every shape built. Generation on an invalid
/// generator fails without calling the engine; [`Self::shape_status`] tells
/// which shapes failed.
pub struct ModelGenerator {
    context: Arc<PrtContext>,
    cache: Cache,
    builders: Vec<Option<InitialShapeBuilder>>,
    shape_status: Vec<ShapeStatus>,
    defaults: GeneratorDefaults,
    rule_package: Option<RulePackage>,
    encoders: Vec<String>,
    encoder_options: Vec<AttributeMap>,
}

impl ModelGenerator {
    /// Builds a generator on the process-wide runtime.
    pub fn new(descriptors: &[ShapeDescriptor]) -> Result<Self, ContextError> {
        Ok(Self::with_context(context::current()?, descriptors))
    }

    /// Builds a generator on an explicit runtime context.
    ///
    /// On a context that is no longer running no shape is built and every
    /// slot reports [`Status::NotInitialized`].
    pub fn with_context(context: Arc<PrtContext>, descriptors: &[ShapeDescriptor]) -> Self {
        if !context.is_running() {
            error!(shapes = descriptors.len(), "procedural runtime is not running, no initial shapes built");
            return Self {
                context,
                cache: Cache::new(),
                builders: descriptors.iter().map(|_| None).collect(),
                shape_status: descriptors.iter().map(|_| Err(Status::NotInitialized)).collect(),
                defaults: GeneratorDefaults::default(),
                rule_package: None,
                encoders: Vec::new(),
                encoder_options: Vec::new(),
            };
        }

        let engine = context.engine().clone();
        let cache = engine.create_cache();

        let mut builders = Vec::with_capacity(descriptors.len());
        let mut shape_status = Vec::with_capacity(descriptors.len());
        for (index, descriptor) in descriptors.iter().enumerate() {
            match build_shape(engine.as_ref(), descriptor, &cache) {
                Ok(builder) => {
                    builders.push(Some(builder));
                    shape_status.push(Ok(()));
                }
                Err(status) => {
                    error!(index, %status, "failed to build initial shape");
                    builders.push(None);
                    shape_status.push(Err(status));
                }
            }
        }

        Self {
            context,
            cache,
            builders,
            shape_status,
            defaults: GeneratorDefaults::default(),
            rule_package: None,
            encoders: Vec::new(),
            encoder_options: Vec::new(),
        }
    }

    /// Replaces the seed and shape name used when a dictionary has none.
    pub fn with_defaults(mut self, defaults: GeneratorDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn is_valid(&self) -> bool {
        self.shape_status.iter().all(Result::is_ok)
    }

    pub fn shape_count(&self) -> usize {
        self.builders.len()
    }

    /// Construction result per initial shape, in descriptor order.
    pub fn shape_status(&self) -> &[ShapeStatus] {
        &self.shape_status
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Rule package of the last generation that got past package loading.
    pub fn rule_package(&self) -> Option<&RulePackage> {
        self.rule_package.as_ref()
    }

    /// Encoders of the last generation, index-aligned with
    /// [`Self::encoder_options`].
    pub fn encoders(&self) -> &[String] {
        &self.encoders
    }

    pub fn encoder_options(&self) -> &[AttributeMap] {
        &self.encoder_options
    }

    /// Generates all shapes and returns one model per shape for the
    /// in-memory encoder, or an empty list for file encoders.
    ///
    /// Every failure is logged and yields an empty list; use
    /// [`Self::try_generate`] to get the error.
    pub fn generate_model(
        &mut self,
        shape_attributes: &[AttributeDict],
        rule_package: impl AsRef<Path>,
        encoder: &str,
        encoder_options: &AttributeDict,
    ) -> Vec<GeneratedModel> {
        let request = GenerateRequest::new(
            shape_attributes,
            rule_package.as_ref(),
            encoder,
            encoder_options,
        );
        self.try_generate(&request).unwrap_or_else(|err| {
            error!(error = %err, "model generation failed");
            Vec::new()
        })
    }

    /// Generates all shapes, returning the failure instead of logging it.
    pub fn try_generate(
        &mut self,
        request: &GenerateRequest<'_>,
    ) -> Result<Vec<GeneratedModel>, GenerateError> {
        if !self.is_valid() {
            return Err(GenerateError::InvalidGenerator {
                failed: self.shape_status.iter().filter(|s| s.is_err()).count(),
                total: self.shape_status.len(),
            });
        }
        if !self.context.is_running() {
            return Err(GenerateError::NotInitialized);
        }

        let given = request.shape_attributes.len();
        let shapes = self.builders.len();
        if given != 1 && given < shapes {
            return Err(GenerateError::AttributeCount { given, shapes });
        }
        if given > shapes {
            warn!(given, shapes, "more shape attribute dictionaries than initial shapes, ignoring extras");
        }

        info!(
            shapes,
            encoder = request.encoder,
            rule_package = %request.rule_package.display(),
            "generating models"
        );
        panic::catch_unwind(AssertUnwindSafe(|| self.run(request)))
            .unwrap_or_else(|payload| Err(GenerateError::Panicked(panic_message(payload))))
    }

    fn run(&mut self, request: &GenerateRequest<'_>) -> Result<Vec<GeneratedModel>, GenerateError> {
        let engine = self.context.engine().clone();

        let package = load_rule_package(
            engine.as_ref(),
            request.rule_package,
            &self.cache,
            request.assets,
        )?;
        let shapes = self.create_initial_shapes(request.shape_attributes, &package)?;
        self.configure_encoders(engine.as_ref(), request.encoder, request.encoder_options)?;
        let hidden = package.hidden_attributes.clone();
        self.rule_package = Some(package);

        let encoders: Vec<&str> = self.encoders.iter().map(String::as_str).collect();

        if request.encoder == ENCODER_ID_PYTHON {
            let callbacks = PayloadCallbacks::new(shapes.len(), hidden);
            engine
                .generate(&shapes, &encoders, &self.encoder_options, &callbacks, &self.cache)
                .map_err(GenerateError::Engine)?;

            Ok((0..shapes.len())
                .filter_map(|index| {
                    let payload = callbacks.generated_payload(index).ok()?;
                    Some(GeneratedModel::new(index, payload))
                })
                .collect())
        } else {
            let directory = output_directory(request.encoder_options)?;
            let callbacks = FileOutputCallbacks::new(&directory)
                .map_err(|_| GenerateError::OutputPath { path: directory.clone() })?;
            engine
                .generate(&shapes, &encoders, &self.encoder_options, &callbacks, &self.cache)
                .map_err(GenerateError::Engine)?;

            debug!(
                directory = %directory.display(),
                files = callbacks.written_files().len(),
                "file generation finished"
            );
            Ok(Vec::new())
        }
    }

    fn create_initial_shapes(
        &mut self,
        shape_attributes: &[AttributeDict],
        package: &RulePackage,
    ) -> Result<Vec<InitialShape>, GenerateError> {
        let shape_count = self.builders.len();
        let mut shapes = Vec::with_capacity(shape_count);

        for (index, slot) in self.builders.iter_mut().enumerate() {
            let (Some(builder), Some(dict)) =
                (slot.as_mut(), shape_attributes.get(index).or(shape_attributes.first()))
            else {
                return Err(GenerateError::AttributeCount {
                    given: shape_attributes.len(),
                    shapes: shape_count,
                });
            };

            let attributes = attribute_map_from_dict(dict);
            let random_seed = attributes.get_int(KEY_SEED).unwrap_or(self.defaults.seed);
            let name = attributes
                .get_string(KEY_SHAPE_NAME)
                .unwrap_or(self.defaults.shape_name.as_str())
                .to_owned();

            builder.set_attributes(ShapeAttributes {
                rule_file: package.rule_file.clone(),
                start_rule: package.start_rule.clone(),
                random_seed,
                name,
                attributes,
                resolve_map: Some(package.resolve_map.clone()),
            });

            let shape = builder
                .create_initial_shape()
                .map_err(|status| GenerateError::InitialShape { index, status })?;
            shapes.push(shape);
        }
        Ok(shapes)
    }

    fn configure_encoders(
        &mut self,
        engine: &dyn Engine,
        encoder: &str,
        options: &AttributeDict,
    ) -> Result<(), GenerateError> {
        let validate = |id: &str, options: &AttributeMap| {
            engine
                .validate_encoder_options(id, options)
                .map_err(|status| GenerateError::EncoderOptions {
                    encoder: id.to_owned(),
                    status,
                })
        };

        let mut encoders = vec![encoder.to_owned()];
        let mut encoder_options = vec![validate(encoder, &attribute_map_from_dict(options))?];

        if encoder == ENCODER_ID_PYTHON {
            for auxiliary in AUXILIARY_ENCODERS {
                encoder_options.push(validate(auxiliary, &AttributeMap::new())?);
                encoders.push(auxiliary.to_owned());
            }
        }

        debug_assert_eq!(encoders.len(), encoder_options.len());
        self.encoders = encoders;
        self.encoder_options = encoder_options;
        Ok(())
    }
}

impl std::fmt::Debug for ModelGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelGenerator")
            .field("shapes", &self.builders.len())
            .field("valid", &self.is_valid())
            .field("encoders", &self.encoders)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn build_shape(
    engine: &dyn Engine,
    descriptor: &ShapeDescriptor,
    cache: &Cache,
) -> Result<InitialShapeBuilder, Status> {
    let mut builder = InitialShapeBuilder::new();
    match descriptor.source() {
        ShapeSource::Path {
            path,
            recursion_depth,
        } => {
            if Url::from_file_path(path).is_err() {
                error!(path = %path.display(), "could not read initial shape geometry, invalid path");
                return Err(Status::InvalidUri);
            }
            debug!(path = %path.display(), "reading initial shape geometry");

            let resolve_map = resolve_asset_dependencies(path, *recursion_depth);
            if resolve_map.is_none() {
                warn!(
                    path = %path.display(),
                    "could not scan asset path for related files, the initial shape asset might be incomplete"
                );
            }
            builder.resolve_geometry(engine, &generic_path(path), resolve_map.as_ref(), cache)?;
        }
        ShapeSource::Geometry { .. } => {
            let geometry = descriptor.to_geometry().ok_or(Status::InvalidGeometry)?;
            builder.set_geometry(geometry)?;
        }
    }
    Ok(builder)
}

/// Output directory of a file encoder: the `outputPath` option, or a
/// directory below the system temp directory created on demand.
fn output_directory(options: &AttributeDict) -> Result<PathBuf, GenerateError> {
    let directory = match options.get(ENCODER_OPTION_OUTPUT_PATH) {
        Some(value) => match value.as_str() {
            Some(path) => PathBuf::from(path),
            None => {
                return Err(GenerateError::OutputPath {
                    path: PathBuf::from(value.to_string()),
                })
            }
        },
        None => {
            let fallback = env::temp_dir().join(FALLBACK_OUTPUT_DIR_NAME);
            fs::create_dir_all(&fallback).map_err(|_| GenerateError::OutputPath {
                path: fallback.clone(),
            })?;
            warn!(
                option = ENCODER_OPTION_OUTPUT_PATH,
                directory = %fallback.display(),
                "output path not specified, falling back to system temp directory"
            );
            fallback
        }
    };

    if !directory.is_dir() {
        return Err(GenerateError::OutputPath { path: directory });
    }
    Ok(directory)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_owned())
}
