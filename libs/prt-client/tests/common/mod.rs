//! Stub engine shared by the integration tests.
//!
//! Rule packages are plain files; every package contains one rule file with
//! a `@StartRule` rule and one `@Hidden` attribute. Asset files hold
//! JSON-encoded geometry. Generation echoes the input geometry, reports the
//! shape's float attributes plus its seed and name, prints one line, emits
//! one CGA warning and evaluates three attributes.

#![allow(dead_code)]

use config::constants::{
    ANNOTATION_HIDDEN, ANNOTATION_START_RULE, ENCODER_ID_ATTR_EVAL, ENCODER_ID_CGA_ERROR,
    ENCODER_ID_CGA_PRINT, ENCODER_ID_CGA_REPORT, ENCODER_ID_PYTHON,
};
use parking_lot::Mutex;
use prt_api::{
    AttributeInfo, AttributeMap, AttributeValue, Cache, CallbackResult, Callbacks, CgaErrorLevel,
    Engine, Geometry, InitialShape, LogLevel, ReportBatch, ResolveMap, ResolveMapBuilder,
    RuleFileInfo, RuleInfo, Status,
};
use prt_client::{AttributeDict, PrtContext, ShapeDescriptor};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use url::Url;

pub const OBJ_ENCODER: &str = "com.esri.prt.codecs.OBJEncoder";
pub const RULE_FILE_KEY: &str = "bin/candler.cgb";
pub const TEXTURE_KEY: &str = "assets/brick.jpg";

/// Inputs of one initial shape as seen by `generate`.
#[derive(Debug, Clone, PartialEq)]
pub struct SeenShape {
    pub rule_file: String,
    pub start_rule: String,
    pub seed: i32,
    pub name: String,
    pub attributes: AttributeMap,
}

#[derive(Default)]
pub struct StubEngine {
    pub init_calls: AtomicUsize,
    pub shutdown_calls: AtomicUsize,
    pub generate_calls: AtomicUsize,
    pub rule_info_loads: AtomicUsize,
    pub panic_on_generate: AtomicBool,
    pub fail_generate: Mutex<Option<Status>>,
    pub seen_shapes: Mutex<Vec<SeenShape>>,
    pub seen_encoders: Mutex<Vec<String>>,
    /// Entry count of the resolve map passed to each geometry resolution.
    pub asset_map_sizes: Mutex<Vec<usize>>,
}

impl StubEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }

    fn rule_file_info() -> RuleFileInfo {
        RuleFileInfo {
            rules: vec![
                RuleInfo::new("Default$Facade").with_parameter("height"),
                RuleInfo::new("Default$Lot").with_annotation(ANNOTATION_START_RULE),
            ],
            attributes: vec![
                AttributeInfo::new("Default$height"),
                AttributeInfo::new("Default$secret").with_annotation(ANNOTATION_HIDDEN),
            ],
        }
    }

    fn emit(
        &self,
        index: usize,
        shape: &InitialShape,
        encoders: &[&str],
        callbacks: &dyn Callbacks,
    ) -> CallbackResult {
        let geometry = shape.geometry();
        let has = |id: &str| encoders.contains(&id);

        if has(ENCODER_ID_PYTHON) {
            let sink = callbacks.geometry_sink().ok_or(Status::InvalidArgument)?;
            sink.add_geometry(
                index,
                Some(geometry.vertex_coords.as_slice()),
                Some(geometry.indices.as_slice()),
                Some(geometry.face_counts.as_slice()),
            );
        }

        if has(ENCODER_ID_CGA_REPORT) {
            let sink = callbacks.geometry_sink().ok_or(Status::InvalidArgument)?;
            let mut floats: Vec<(String, f64)> = shape
                .attributes()
                .iter()
                .filter_map(|(key, value)| match value {
                    AttributeValue::Float(f) => Some((key.to_owned(), *f)),
                    _ => None,
                })
                .collect();
            floats.push(("seed".to_owned(), f64::from(shape.random_seed())));
            let float_refs: Vec<(&str, f64)> =
                floats.iter().map(|(k, v)| (k.as_str(), *v)).collect();
            let strings = [("shapeName", shape.name())];
            sink.add_reports(
                index,
                &ReportBatch {
                    strings: &strings,
                    floats: &float_refs,
                    bools: &[("generated", true)],
                },
            );
        }

        if has(ENCODER_ID_CGA_PRINT) {
            callbacks.cga_print(index, 1, &format!("shape {index}\n"))?;
        }

        if has(ENCODER_ID_CGA_ERROR) {
            callbacks.cga_error(index, 1, CgaErrorLevel::Warning, 0, 0, "stub warning")?;
        }

        if has(ENCODER_ID_ATTR_EVAL) {
            let height = shape.attributes().get_float("height").unwrap_or(10.0);
            callbacks.attr_float(index, 1, "Default$height", height)?;
            callbacks.attr_float(index, 1, "Default$secret", 42.0)?;
            callbacks.attr_float_array(index, 1, "Default$levels", &[1.0, 2.0, 3.0, 4.0], 2)?;
        }

        if has(OBJ_ENCODER) {
            let sink = callbacks.file_sink().ok_or(Status::InvalidArgument)?;
            let obj: String = geometry
                .vertex_coords
                .chunks_exact(3)
                .map(|v| format!("v {} {} {}\n", v[0], v[1], v[2]))
                .collect();
            sink.write_file(index, &format!("shape_{index}.obj"), obj.as_bytes())?;
        }

        Ok(())
    }
}

impl Engine for StubEngine {
    fn init(&self, _log_level: LogLevel) -> Result<(), Status> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn shutdown(&self) {
        self.shutdown_calls.fetch_add(1, Ordering::SeqCst);
    }

    fn create_resolve_map(&self, package_uri: &str, _cache: &Cache) -> Result<ResolveMap, Status> {
        let url = Url::parse(package_uri).map_err(|_| Status::InvalidUri)?;
        let path = url.to_file_path().map_err(|_| Status::InvalidUri)?;
        if !path.is_file() {
            return Err(Status::ResolveMapProviderNotFound);
        }

        let mut builder = ResolveMapBuilder::new();
        builder.add_entry(TEXTURE_KEY, format!("rpk:{package_uri}!/{TEXTURE_KEY}"));
        if !path.to_string_lossy().contains("norule") {
            builder.add_entry(RULE_FILE_KEY, format!("rpk:{package_uri}!/{RULE_FILE_KEY}"));
        }
        Ok(builder.create_resolve_map())
    }

    fn create_rule_file_info(&self, rule_file_uri: &str, cache: &Cache) -> Result<RuleFileInfo, Status> {
        if let Some(info) = cache.get::<RuleFileInfo>(rule_file_uri) {
            return Ok((*info).clone());
        }
        self.rule_info_loads.fetch_add(1, Ordering::SeqCst);
        let info = cache.insert(rule_file_uri, Self::rule_file_info());
        Ok((*info).clone())
    }

    fn resolve_geometry(
        &self,
        key: &str,
        resolve_map: Option<&ResolveMap>,
        _cache: &Cache,
    ) -> Result<Geometry, Status> {
        self.asset_map_sizes
            .lock()
            .push(resolve_map.map_or(0, ResolveMap::len));
        let text = fs::read_to_string(key).map_err(|_| Status::FileNotFound)?;
        serde_json::from_str(&text).map_err(|_| Status::InvalidGeometry)
    }

    fn validate_encoder_options(
        &self,
        encoder_id: &str,
        options: &AttributeMap,
    ) -> Result<AttributeMap, Status> {
        let known = [
            ENCODER_ID_PYTHON,
            ENCODER_ID_CGA_REPORT,
            ENCODER_ID_CGA_PRINT,
            ENCODER_ID_CGA_ERROR,
            ENCODER_ID_ATTR_EVAL,
            OBJ_ENCODER,
        ];
        if !known.contains(&encoder_id) {
            return Err(Status::EncoderNotFound);
        }
        let mut validated = options.clone();
        if !validated.has_key("triangulate") {
            validated.set_bool("triangulate", false);
        }
        Ok(validated)
    }

    fn generate(
        &self,
        shapes: &[InitialShape],
        encoders: &[&str],
        encoder_options: &[AttributeMap],
        callbacks: &dyn Callbacks,
        _cache: &Cache,
    ) -> Result<(), Status> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(encoders.len(), encoder_options.len());
        *self.seen_encoders.lock() = encoders.iter().map(|e| e.to_string()).collect();
        *self.seen_shapes.lock() = shapes
            .iter()
            .map(|shape| SeenShape {
                rule_file: shape.rule_file().to_owned(),
                start_rule: shape.start_rule().to_owned(),
                seed: shape.random_seed(),
                name: shape.name().to_owned(),
                attributes: shape.attributes().clone(),
            })
            .collect();

        if self.panic_on_generate.load(Ordering::SeqCst) {
            panic!("engine exploded");
        }
        if let Some(status) = *self.fail_generate.lock() {
            return Err(status);
        }

        shapes
            .par_iter()
            .enumerate()
            .try_for_each(|(index, shape)| self.emit(index, shape, encoders, callbacks))
    }
}

// =============================================================================
// FIXTURES
// =============================================================================

pub fn context(engine: &Arc<StubEngine>) -> Arc<PrtContext> {
    let engine: Arc<dyn Engine> = engine.clone();
    PrtContext::new(engine, Default::default()).unwrap()
}

/// Quad with corners `(0,0,0)`, `(0,0,10)`, `(10,0,10)`, `(10,0,0)`.
pub fn quad() -> ShapeDescriptor {
    ShapeDescriptor::from_vertices(vec![
        0.0, 0.0, 0.0, 0.0, 0.0, 10.0, 10.0, 0.0, 10.0, 10.0, 0.0, 0.0,
    ])
    .unwrap()
}

/// Directory holding rule packages and assets.
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn rule_package(&self) -> PathBuf {
        self.file("candler.rpk", b"rpk")
    }

    pub fn rule_package_without_rule_file(&self) -> PathBuf {
        self.file("norule.rpk", b"rpk")
    }

    /// Asset file with JSON geometry plus a texture next to it.
    pub fn asset(&self, geometry: &Geometry) -> PathBuf {
        self.file("lot/brick.jpg", &[0u8; 4]);
        let json = serde_json::to_vec(geometry).unwrap();
        self.file("lot/lot.json", &json)
    }

    pub fn file(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

pub fn dict(value: serde_json::Value) -> AttributeDict {
    value.as_object().cloned().unwrap_or_default()
}
