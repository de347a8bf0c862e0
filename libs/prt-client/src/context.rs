//! # Runtime Context
//!
//! The engine runtime is a process-wide singleton: it is initialized once,
//! shut down once, and cannot be brought up again afterwards.
//!
//! ```text
//! initialize() → running → shutdown() → shut down (terminal)
//! ```
//!
//! Embedders that manage the engine lifetime themselves create standalone
//! contexts with [`PrtContext::new`] instead.

use crate::error::ContextError;
use parking_lot::{const_mutex, Mutex};
use prt_api::{Engine, LogLevel};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use tracing::info;

static RUNTIME: OnceLock<Arc<PrtContext>> = OnceLock::new();
static INIT_LOCK: Mutex<()> = const_mutex(());

/// Options for bringing up the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContextOptions {
    /// Minimal severity of engine log output.
    pub log_level: LogLevel,
}

/// A running engine plus its lifecycle state.
pub struct PrtContext {
    engine: Arc<dyn Engine>,
    running: AtomicBool,
    options: ContextOptions,
}

impl PrtContext {
    /// Initializes `engine` and wraps it in a standalone context.
    pub fn new(engine: Arc<dyn Engine>, options: ContextOptions) -> Result<Arc<Self>, ContextError> {
        engine.init(options.log_level).map_err(ContextError::Engine)?;
        info!(log_level = ?options.log_level, "procedural runtime initialized");
        Ok(Arc::new(Self {
            engine,
            running: AtomicBool::new(true),
            options,
        }))
    }

    pub fn engine(&self) -> &Arc<dyn Engine> {
        &self.engine
    }

    pub fn options(&self) -> ContextOptions {
        self.options
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Shuts the engine down. Later calls do nothing.
    pub fn shutdown(&self) {
        if self.running.swap(false, Ordering::AcqRel) {
            self.engine.shutdown();
            info!("procedural runtime shut down");
        }
    }
}

impl fmt::Debug for PrtContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrtContext")
            .field("running", &self.is_running())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// PROCESS-WIDE RUNTIME
// =============================================================================

/// Initializes the process-wide runtime.
///
/// Fails with [`ContextError::AlreadyInitialized`] while a runtime is
/// running and with [`ContextError::ShutDown`] once it was shut down.
pub fn initialize(
    engine: Arc<dyn Engine>,
    options: ContextOptions,
) -> Result<Arc<PrtContext>, ContextError> {
    let _guard = INIT_LOCK.lock();
    if let Some(existing) = RUNTIME.get() {
        return Err(if existing.is_running() {
            ContextError::AlreadyInitialized
        } else {
            ContextError::ShutDown
        });
    }

    let context = PrtContext::new(engine, options)?;
    RUNTIME
        .set(context.clone())
        .map_err(|_| ContextError::AlreadyInitialized)?;
    Ok(context)
}

/// The running process-wide runtime.
pub fn current() -> Result<Arc<PrtContext>, ContextError> {
    RUNTIME
        .get()
        .filter(|context| context.is_running())
        .cloned()
        .ok_or(ContextError::NotInitialized)
}

/// Returns true while the process-wide runtime is running.
pub fn is_initialized() -> bool {
    current().is_ok()
}

/// Shuts the process-wide runtime down for good.
pub fn shutdown() {
    if let Some(context) = RUNTIME.get() {
        context.shutdown();
    }
}
