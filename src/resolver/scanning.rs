//! Directory scanning for the asset files a single directory carries.

use std::fs;

use crate::asset_paths::{AssetPath, AssetRoot, AssetTypeRules};
use crate::error::{BundleError, BundleResult};
use crate::models::AssetType;

/// List the script and stylesheet files directly inside `directory`.
///
/// Subdirectories, dot-files and files of other types are skipped. Files come back ordered by
/// file name so resolution does not depend on the order the platform enumerates entries in.
pub fn scan_asset_files(
  root: &AssetRoot,
  directory: &str,
  rules: &AssetTypeRules,
) -> BundleResult<Vec<(AssetType, AssetPath)>> {
  let physical = root.to_physical(directory);
  let entries = fs::read_dir(&physical).map_err(|err| BundleError::filesystem(&physical, err))?;

  let mut files = Vec::new();
  for entry in entries {
    let entry = entry.map_err(|err| BundleError::filesystem(&physical, err))?;
    let path = entry.path();
    let file_name = entry.file_name();
    let Some(name) = file_name.to_str() else {
      tracing::warn!(path = %path.display(), "skipping asset with non UTF-8 name");
      continue;
    };
    if name.starts_with('.') {
      continue;
    }

    // Follows symlinks.
    let metadata = fs::metadata(&path).map_err(|err| BundleError::filesystem(&path, err))?;
    if !metadata.is_file() {
      continue;
    }

    if let Some(asset_type) = rules.classify(&path) {
      let virtual_path = format!("{directory}/{name}");
      files.push((asset_type, AssetPath::new(virtual_path, path)));
    }
  }

  files.sort_by(|(_, a), (_, b)| a.virtual_path().cmp(b.virtual_path()));
  Ok(files)
}
