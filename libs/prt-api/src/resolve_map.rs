//! # Resolve Maps
//!
//! Lookup table from logical asset names to URIs. The engine uses it to
//! locate rule files, textures and other assets.

use config::constants::RULE_FILE_EXTENSION;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Immutable mapping from logical names to URIs.
///
/// # Example
///
/// ```rust
/// use prt_api::ResolveMapBuilder;
///
/// let mut builder = ResolveMapBuilder::new();
/// builder.add_entry("bin/rule.cgb", "file:/tmp/rule.cgb");
/// let map = builder.create_resolve_map();
/// assert_eq!(map.get_string("bin/rule.cgb"), Some("file:/tmp/rule.cgb"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveMap {
    entries: BTreeMap<String, String>,
}

impl ResolveMap {
    /// Returns the URI registered for `key`.
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Iterates over all keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterates over all entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Scans the keys for the first compiled rule file.
    ///
    /// Engines without a direct rule file lookup use this.
    pub fn find_rule_file_key(&self) -> Option<&str> {
        self.keys().find(|key| key.ends_with(RULE_FILE_EXTENSION))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Mutable builder for [`ResolveMap`].
#[derive(Debug, Clone, Default)]
pub struct ResolveMapBuilder {
    entries: BTreeMap<String, String>,
}

impl ResolveMapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from the entries of an existing map.
    pub fn from_resolve_map(map: &ResolveMap) -> Self {
        Self {
            entries: map.entries.clone(),
        }
    }

    /// Adds an entry, replacing any previous URI for the same key.
    pub fn add_entry(&mut self, key: impl Into<String>, uri: impl Into<String>) -> &mut Self {
        self.entries.insert(key.into(), uri.into());
        self
    }

    /// Builds the map; the builder keeps its entries.
    pub fn create_resolve_map(&self) -> ResolveMap {
        ResolveMap {
            entries: self.entries.clone(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
