use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use super::virtual_path::virtual_segments;

/// A file or directory known both by its root-relative virtual path and its location on disk.
///
/// Identity is the absolute path: two values naming the same file through differently spelled
/// virtual paths compare equal.
#[derive(Debug, Clone)]
pub struct AssetPath {
  virtual_path: String,
  absolute_path: PathBuf,
}

impl AssetPath {
  /// Pair a virtual path with the absolute path it maps to.
  pub fn new(virtual_path: impl Into<String>, absolute_path: impl Into<PathBuf>) -> Self {
    Self {
      virtual_path: virtual_path.into(),
      absolute_path: absolute_path.into(),
    }
  }

  /// Root-relative path, e.g. `~/Views/Shared/site.css`.
  pub fn virtual_path(&self) -> &str {
    &self.virtual_path
  }

  /// Location on disk.
  pub fn absolute_path(&self) -> &Path {
    &self.absolute_path
  }
}

impl PartialEq for AssetPath {
  fn eq(&self, other: &Self) -> bool {
    self.absolute_path == other.absolute_path
  }
}

impl Eq for AssetPath {}

impl Hash for AssetPath {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.absolute_path.hash(state);
  }
}

/// Maps the virtual root `~` onto a physical directory.
#[derive(Debug, Clone)]
pub struct AssetRoot {
  physical_root: PathBuf,
}

impl AssetRoot {
  /// Root virtual paths at the given directory.
  pub fn new(physical_root: impl Into<PathBuf>) -> Self {
    Self {
      physical_root: physical_root.into(),
    }
  }

  /// Physical directory behind `~`.
  pub fn physical_root(&self) -> &Path {
    &self.physical_root
  }

  /// Physical location of a normalised virtual path.
  pub fn to_physical(&self, virtual_path: &str) -> PathBuf {
    virtual_segments(virtual_path).fold(self.physical_root.clone(), |path, segment| {
      path.join(segment)
    })
  }

  /// Build an [`AssetPath`] for a normalised virtual path.
  pub fn asset_path(&self, virtual_path: &str) -> AssetPath {
    AssetPath::new(virtual_path, self.to_physical(virtual_path))
  }
}
