//! # Engine Cache
//!
//! Shared, reference-counted cache handle. Engines memoise decoded rule
//! files, resolve maps and assets in it; the client only owns and passes it.

use parking_lot::RwLock;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type Entry = Arc<dyn Any + Send + Sync>;

/// Cloneable handle to one engine cache; clones share the same storage.
///
/// # Example
///
/// ```rust
/// use prt_api::Cache;
///
/// let cache = Cache::new();
/// let shared = cache.clone();
/// shared.insert("rule:bin/a.cgb", 42_u32);
/// assert_eq!(cache.get::<u32>("rule:bin/a.cgb").as_deref(), Some(&42));
/// ```
#[derive(Clone, Default)]
pub struct Cache {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry stored under `key` if it has type `T`.
    pub fn get<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        let entry = self.entries.read().get(key).cloned()?;
        entry.downcast::<T>().ok()
    }

    /// Stores `value` under `key`, replacing any previous entry.
    pub fn insert<T: Any + Send + Sync>(&self, key: impl Into<String>, value: T) -> Arc<T> {
        let value = Arc::new(value);
        self.entries.write().insert(key.into(), value.clone());
        value
    }

    /// Drops every cached entry.
    pub fn flush_all(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Number of live handles to this cache.
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.entries)
    }
}

impl fmt::Debug for Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("entries", &self.len())
            .field("handles", &self.handle_count())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
