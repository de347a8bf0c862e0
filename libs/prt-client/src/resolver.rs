//! # Asset Dependency Resolution
//!
//! The engine can only load textures and other dependencies of an asset if
//! they are in the resolve map, but those dependencies are unknown until the
//! asset is decoded. We therefore assume they live in the directory tree
//! around the asset and register every regular file found there, up to a
//! recursion limit.

use prt_api::{ResolveMap, ResolveMapBuilder};
use std::fs;
use std::io;
use std::path::{Path, MAIN_SEPARATOR};
use tracing::debug;
use url::Url;

/// Builds a resolve map for the asset at `asset_path`.
///
/// The asset itself is registered first, then every regular file below its
/// parent directory. Files directly in the parent directory have depth 0;
/// entries deeper than `recursion_limit` are skipped and not descended
/// into. Keys are forward-slash paths, values `file:` URIs.
///
/// Returns `None` if the path is not an absolute path to a regular file or
/// if the directory walk fails.
///
/// # Example
///
/// ```rust
/// use prt_client::resolver::resolve_asset_dependencies;
///
/// assert!(resolve_asset_dependencies("relative/asset.obj", 0).is_none());
/// ```
pub fn resolve_asset_dependencies(
    asset_path: impl AsRef<Path>,
    recursion_limit: u8,
) -> Option<ResolveMap> {
    let asset_path = asset_path.as_ref();
    if !asset_path.is_absolute() || !asset_path.is_file() {
        return None;
    }

    let mut builder = ResolveMapBuilder::new();
    add_file(&mut builder, asset_path)?;

    let root = asset_path.parent()?;
    if let Err(err) = walk(&mut builder, root, 0, recursion_limit) {
        debug!(path = %root.display(), error = %err, "asset directory scan failed");
        return None;
    }

    Some(builder.create_resolve_map())
}

fn walk(
    builder: &mut ResolveMapBuilder,
    dir: &Path,
    depth: u32,
    recursion_limit: u8,
) -> io::Result<()> {
    if depth > u32::from(recursion_limit) {
        return Ok(());
    }

    let mut entries = fs::read_dir(dir)?.collect::<Result<Vec<_>, _>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        debug!(depth, path = %path.display(), "asset scan");
        if entry.file_type()?.is_dir() {
            walk(builder, &path, depth + 1, recursion_limit)?;
        } else if path.is_file() && add_file(builder, &path).is_none() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("cannot convert {} to a file URI", path.display()),
            ));
        }
    }
    Ok(())
}

fn add_file(builder: &mut ResolveMapBuilder, path: &Path) -> Option<()> {
    let uri = Url::from_file_path(path).ok()?;
    builder.add_entry(generic_path(path), uri.as_str());
    Some(())
}

/// Path string with `/` separators on every platform.
pub fn generic_path(path: &Path) -> String {
    let text = path.to_string_lossy();
    if MAIN_SEPARATOR == '/' {
        text.into_owned()
    } else {
        text.replace(MAIN_SEPARATOR, "/")
    }
}

// =============================================================================
// TESTS
// =============================================================================
