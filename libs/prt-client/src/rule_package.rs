//! # Rule Packages
//!
//! Loads the resolve map of a rule package and extracts what generation
//! needs from it: the rule file key, the start rule and the hidden
//! attribute set.

use crate::error::RulePackageError;
use config::constants::{ANNOTATION_HIDDEN, ANNOTATION_START_RULE};
use prt_api::{Cache, Engine, ResolveMap, ResolveMapBuilder, RuleFileInfo, Status};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error};
use url::Url;

/// Everything generation needs from one rule package.
#[derive(Debug, Clone, PartialEq)]
pub struct RulePackage {
    pub resolve_map: Arc<ResolveMap>,
    /// Resolve map key of the compiled rule file.
    pub rule_file: String,
    /// Empty when the rule file declares no start rule.
    pub start_rule: String,
    pub hidden_attributes: HashSet<String>,
}

/// Loads the rule package at `path`.
///
/// Entries of `assets` are added to the package resolve map, replacing
/// package entries with the same key.
pub fn load_rule_package(
    engine: &dyn Engine,
    path: &Path,
    cache: &Cache,
    assets: Option<&BTreeMap<String, String>>,
) -> Result<RulePackage, RulePackageError> {
    let fail = |status: Status| RulePackageError::new(path, status);

    if !path.exists() {
        error!(path = %path.display(), "rule package path does not exist");
        return Err(fail(Status::FileNotFound));
    }

    let package_uri = package_uri(path).ok_or_else(|| fail(Status::InvalidUri))?;
    let mut resolve_map = engine
        .create_resolve_map(package_uri.as_str(), cache)
        .map_err(|status| {
            error!(path = %path.display(), %status, "could not create resolve map of rule package");
            fail(status)
        })?;

    if let Some(assets) = assets.filter(|a| !a.is_empty()) {
        let mut builder = ResolveMapBuilder::from_resolve_map(&resolve_map);
        for (key, uri) in assets {
            builder.add_entry(key.as_str(), uri.as_str());
        }
        resolve_map = builder.create_resolve_map();
    }

    let rule_file = engine.find_rule_file_key(&resolve_map).unwrap_or_default();
    let Some(rule_file_uri) = resolve_map.get_string(&rule_file).filter(|_| !rule_file.is_empty())
    else {
        error!(path = %path.display(), "could not find rule file URI in resolve map of rule package");
        return Err(fail(Status::InvalidUri));
    };

    let info = engine
        .create_rule_file_info(rule_file_uri, cache)
        .map_err(|status| {
            error!(rule_file = %rule_file, %status, "could not get rule file info");
            fail(status)
        })?;

    let start_rule = detect_start_rule(&info).unwrap_or_default();
    let hidden_attributes = hidden_attributes(&info);
    debug!(
        rule_file = %rule_file,
        start_rule = %start_rule,
        hidden = hidden_attributes.len(),
        "loaded rule package"
    );

    Ok(RulePackage {
        resolve_map: Arc::new(resolve_map),
        rule_file,
        start_rule,
        hidden_attributes,
    })
}

/// First rule without parameters that carries the start rule annotation.
pub fn detect_start_rule(info: &RuleFileInfo) -> Option<String> {
    info.rules
        .iter()
        .filter(|rule| rule.parameters.is_empty())
        .find(|rule| rule.has_annotation(ANNOTATION_START_RULE))
        .map(|rule| rule.name.clone())
}

/// Names of all attributes annotated as hidden.
pub fn hidden_attributes(info: &RuleFileInfo) -> HashSet<String> {
    info.attributes
        .iter()
        .filter(|attr| attr.has_annotation(ANNOTATION_HIDDEN))
        .map(|attr| attr.name.clone())
        .collect()
}

fn package_uri(path: &Path) -> Option<Url> {
    let absolute = path.canonicalize().ok()?;
    Url::from_file_path(absolute).ok()
}

// =============================================================================
// TESTS
// =============================================================================
