//! Data structures produced while resolving and bundling assets.

use serde::Serialize;

use crate::asset_paths::AssetPath;

/// Kind of asset file. Every resolved file belongs to exactly one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AssetType {
  /// JavaScript files.
  Script,
  /// CSS files.
  StyleSheet,
}

impl AssetType {
  /// Path segment used when naming bundles of this type.
  pub fn bundle_segment(self) -> &'static str {
    match self {
      AssetType::Script => "scripts",
      AssetType::StyleSheet => "styles",
    }
  }
}

/// Ordered file lists, one per [`AssetType`].
///
/// Order is load order. Lists may hold the same file more than once; duplicates are removed
/// when the lists are partitioned into bundles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileListsByAssetType {
  scripts: Vec<AssetPath>,
  style_sheets: Vec<AssetPath>,
}

impl FileListsByAssetType {
  /// Empty lists.
  pub fn new() -> Self {
    Self::default()
  }

  /// Append a single file to the list for `asset_type`.
  pub fn push(&mut self, asset_type: AssetType, file: AssetPath) {
    self.get_list_mut(asset_type).push(file);
  }

  /// Extend every list with the matching list of `other`, keeping both orders.
  pub fn append(&mut self, other: &FileListsByAssetType) {
    self.scripts.extend(other.scripts.iter().cloned());
    self.style_sheets.extend(other.style_sheets.iter().cloned());
  }

  /// Consuming form of [`FileListsByAssetType::append`], for folding over directories.
  pub fn appended(mut self, other: &FileListsByAssetType) -> Self {
    self.append(other);
    self
  }

  /// Accumulated files of one type, in load order.
  pub fn get_list(&self, asset_type: AssetType) -> &[AssetPath] {
    match asset_type {
      AssetType::Script => &self.scripts,
      AssetType::StyleSheet => &self.style_sheets,
    }
  }

  /// Mutable handle on the files of one type.
  pub fn get_list_mut(&mut self, asset_type: AssetType) -> &mut Vec<AssetPath> {
    match asset_type {
      AssetType::Script => &mut self.scripts,
      AssetType::StyleSheet => &mut self.style_sheets,
    }
  }

  /// Take ownership of the files of one type, leaving that list empty.
  pub fn take_list(&mut self, asset_type: AssetType) -> Vec<AssetPath> {
    std::mem::take(self.get_list_mut(asset_type))
  }

  /// Returns `true` when no files of any type were collected.
  pub fn is_empty(&self) -> bool {
    self.scripts.is_empty() && self.style_sheets.is_empty()
  }
}

/// Virtual paths of the bundles produced by one build, in load order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildOutput {
  /// Script bundle paths.
  pub script_bundle_virtual_paths: Vec<String>,
  /// Style bundle paths.
  pub style_bundle_virtual_paths: Vec<String>,
}

impl BuildOutput {
  /// Bundle paths for one asset type.
  pub fn bundle_virtual_paths(&self, asset_type: AssetType) -> &[String] {
    match asset_type {
      AssetType::Script => &self.script_bundle_virtual_paths,
      AssetType::StyleSheet => &self.style_bundle_virtual_paths,
    }
  }
}
