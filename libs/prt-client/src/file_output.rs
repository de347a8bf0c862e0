//! # File Output Callbacks
//!
//! Callback sink for file-writing encoders. Encoder output is written below
//! one output directory; prints and errors go to the log.

use parking_lot::Mutex;
use prt_api::{CallbackResult, Callbacks, CgaErrorLevel, FileCallbacks, Status};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Writes encoder output files into a directory.
#[derive(Debug)]
pub struct FileOutputCallbacks {
    directory: PathBuf,
    written: Mutex<Vec<PathBuf>>,
}

impl FileOutputCallbacks {
    /// Targets an existing directory.
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self, Status> {
        let directory = directory.into();
        if !directory.is_dir() {
            return Err(Status::FileNotFound);
        }
        Ok(Self {
            directory,
            written: Mutex::new(Vec::new()),
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Paths of all files written so far, in write order.
    pub fn written_files(&self) -> Vec<PathBuf> {
        self.written.lock().clone()
    }

    fn target(&self, name: &str) -> Option<PathBuf> {
        let relative = Path::new(name);
        let plain = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        (plain && !name.is_empty()).then(|| self.directory.join(relative))
    }
}

fn log_level(level: CgaErrorLevel, index: usize, message: &str) {
    match level {
        CgaErrorLevel::Error => error!(index, "{message}"),
        CgaErrorLevel::Warning => warn!(index, "{message}"),
        CgaErrorLevel::Info => info!(index, "{message}"),
    }
}

impl FileCallbacks for FileOutputCallbacks {
    fn write_file(&self, index: usize, name: &str, contents: &[u8]) -> CallbackResult {
        let Some(path) = self.target(name) else {
            error!(index, name, "refusing to write outside the output directory");
            return Err(Status::InvalidArgument);
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                error!(index, path = %parent.display(), error = %err, "cannot create output directory");
                Status::UnspecifiedError
            })?;
        }
        fs::write(&path, contents).map_err(|err| {
            error!(index, path = %path.display(), error = %err, "cannot write output file");
            Status::UnspecifiedError
        })?;
        debug!(index, path = %path.display(), bytes = contents.len(), "wrote output file");
        self.written.lock().push(path);
        Ok(())
    }
}

impl Callbacks for FileOutputCallbacks {
    fn generate_error(&self, index: usize, status: Status, message: &str) -> CallbackResult {
        error!(index, %status, "{message}");
        Ok(())
    }

    fn asset_error(
        &self,
        index: usize,
        level: CgaErrorLevel,
        key: &str,
        uri: &str,
        message: &str,
    ) -> CallbackResult {
        log_level(level, index, &format!("Asset {key} {uri}: {message}"));
        Ok(())
    }

    fn cga_error(
        &self,
        index: usize,
        _shape_id: i32,
        level: CgaErrorLevel,
        _method_id: i32,
        _pc: i32,
        message: &str,
    ) -> CallbackResult {
        log_level(level, index, message);
        Ok(())
    }

    fn cga_print(&self, index: usize, _shape_id: i32, text: &str) -> CallbackResult {
        info!(index, "{text}");
        Ok(())
    }

    fn cga_report_bool(&self, _index: usize, _shape_id: i32, _key: &str, _value: bool) -> CallbackResult {
        Ok(())
    }

    fn cga_report_float(&self, _index: usize, _shape_id: i32, _key: &str, _value: f64) -> CallbackResult {
        Ok(())
    }

    fn cga_report_string(
        &self,
        _index: usize,
        _shape_id: i32,
        _key: &str,
        _value: &str,
    ) -> CallbackResult {
        Ok(())
    }

    fn attr_bool(&self, _index: usize, _shape_id: i32, _key: &str, _value: bool) -> CallbackResult {
        Ok(())
    }

    fn attr_float(&self, _index: usize, _shape_id: i32, _key: &str, _value: f64) -> CallbackResult {
        Ok(())
    }

    fn attr_string(&self, _index: usize, _shape_id: i32, _key: &str, _value: &str) -> CallbackResult {
        Ok(())
    }

    fn attr_bool_array(
        &self,
        _index: usize,
        _shape_id: i32,
        _key: &str,
        _values: &[bool],
        _n_rows: usize,
    ) -> CallbackResult {
        Ok(())
    }

    fn attr_float_array(
        &self,
        _index: usize,
        _shape_id: i32,
        _key: &str,
        _values: &[f64],
        _n_rows: usize,
    ) -> CallbackResult {
        Ok(())
    }

    fn attr_string_array(
        &self,
        _index: usize,
        _shape_id: i32,
        _key: &str,
        _values: &[&str],
        _n_rows: usize,
    ) -> CallbackResult {
        Ok(())
    }

    fn file_sink(&self) -> Option<&dyn FileCallbacks> {
        Some(self)
    }
}

// =============================================================================
// TESTS
// =============================================================================
