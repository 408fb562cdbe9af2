//! Loading and interpreting per-directory dependency manifests.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;

use crate::asset_paths::join_virtual_path;
use crate::error::{BundleError, BundleResult};

/// Deserialised representation of a directory's dependency manifest.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DependencyManifest {
  /// Directories the owning directory depends on, in load order.
  ///
  /// Entries are `~/` rooted or relative to the directory holding the manifest.
  #[serde(default)]
  pub dependencies: Vec<String>,
}

impl DependencyManifest {
  /// Resolve the declared entries against the declaring directory.
  ///
  /// Blank entries are skipped. An entry that climbs above `~` is reported as missing.
  pub fn resolve_dependencies(&self, declaring_dir: &str) -> BundleResult<Vec<String>> {
    self
      .dependencies
      .iter()
      .map(|entry| entry.trim())
      .filter(|entry| !entry.is_empty())
      .map(|entry| {
        join_virtual_path(declaring_dir, entry).ok_or_else(|| {
          BundleError::MissingDependencyDirectory {
            directory: entry.to_string(),
            required_by: Some(declaring_dir.to_string()),
          }
        })
      })
      .collect()
  }
}

/// Load a dependency manifest from disk.
///
/// A missing file means the directory declares no dependencies and yields `None`.
pub fn load_dependency_manifest(path: &Path) -> BundleResult<Option<DependencyManifest>> {
  let content = match fs::read_to_string(path) {
    Ok(content) => content,
    Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
    Err(err) => return Err(BundleError::filesystem(path, err)),
  };

  let manifest: DependencyManifest =
    serde_json::from_str(&content).map_err(|source| BundleError::ManifestParse {
      path: path.to_path_buf(),
      source,
    })?;
  Ok(Some(manifest))
}
