//! Bundle construction and registration.

use serde::Serialize;

use crate::asset_paths::AssetPath;
use crate::models::AssetType;

use super::partition::RouteGroup;

/// Registry the constructed bundles are added to, typically owned by the hosting framework.
pub trait BundleCollection {
  /// Bundle object stored by the collection.
  type Bundle;

  /// Returns `true` when a bundle is already registered under `virtual_path`.
  fn contains(&self, virtual_path: &str) -> bool;

  /// Register a bundle under `virtual_path`.
  fn add(&mut self, virtual_path: &str, bundle: Self::Bundle);
}

/// Builds a bundle object from its virtual path and ordered file virtual paths.
pub type BundleFactory<B> = Box<dyn Fn(&str, &[String]) -> B + Send + Sync>;

/// One bundle factory per asset type.
pub struct BundleFactories<B> {
  script: BundleFactory<B>,
  style: BundleFactory<B>,
}

impl<B> BundleFactories<B> {
  /// Pair a script bundle factory with a style bundle factory.
  pub fn new(script: BundleFactory<B>, style: BundleFactory<B>) -> Self {
    Self { script, style }
  }

  /// Factory for one asset type.
  pub fn for_type(&self, asset_type: AssetType) -> &BundleFactory<B> {
    match asset_type {
      AssetType::Script => &self.script,
      AssetType::StyleSheet => &self.style,
    }
  }
}

/// Plain bundle description used when no framework-specific bundle type is needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
  /// Virtual path the bundle is served under.
  pub virtual_path: String,
  /// Type of every file in the bundle.
  pub asset_type: AssetType,
  /// File virtual paths in load order.
  pub files: Vec<String>,
}

impl BundleFactories<Bundle> {
  /// Factories producing [`Bundle`] values.
  pub fn plain() -> Self {
    Self::new(
      Box::new(|virtual_path: &str, files: &[String]| Bundle {
        virtual_path: virtual_path.to_string(),
        asset_type: AssetType::Script,
        files: files.to_vec(),
      }),
      Box::new(|virtual_path: &str, files: &[String]| Bundle {
        virtual_path: virtual_path.to_string(),
        asset_type: AssetType::StyleSheet,
        files: files.to_vec(),
      }),
    )
  }
}

/// Bundle collection kept in memory, in registration order.
#[derive(Debug)]
pub struct InMemoryBundleCollection<B = Bundle> {
  bundles: Vec<(String, B)>,
}

impl<B> Default for InMemoryBundleCollection<B> {
  fn default() -> Self {
    Self {
      bundles: Vec::new(),
    }
  }
}

impl<B> InMemoryBundleCollection<B> {
  /// Empty collection.
  pub fn new() -> Self {
    Self::default()
  }

  /// Bundle registered under `virtual_path`.
  pub fn get(&self, virtual_path: &str) -> Option<&B> {
    self
      .bundles
      .iter()
      .find(|(path, _)| path == virtual_path)
      .map(|(_, bundle)| bundle)
  }

  /// Registered bundles in registration order.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &B)> {
    self
      .bundles
      .iter()
      .map(|(path, bundle)| (path.as_str(), bundle))
  }

  /// Number of registered bundles.
  pub fn len(&self) -> usize {
    self.bundles.len()
  }

  /// Returns `true` when nothing is registered.
  pub fn is_empty(&self) -> bool {
    self.bundles.is_empty()
  }
}

impl<B> BundleCollection for InMemoryBundleCollection<B> {
  type Bundle = B;

  fn contains(&self, virtual_path: &str) -> bool {
    self.get(virtual_path).is_some()
  }

  fn add(&mut self, virtual_path: &str, bundle: B) {
    self.bundles.push((virtual_path.to_string(), bundle));
  }
}

/// Deterministic virtual path for a bundle holding `files`.
///
/// The name is derived from the ordered file list, so the same files in the same order always
/// map to the same bundle.
pub fn bundle_virtual_path(prefix: &str, asset_type: AssetType, files: &[String]) -> String {
  let mut hasher = blake3::Hasher::new();
  for file in files {
    hasher.update(file.as_bytes());
    hasher.update(b"\n");
  }
  let digest = hasher.finalize();
  format!(
    "{}/{}/{}",
    prefix.trim_end_matches('/'),
    asset_type.bundle_segment(),
    hex::encode(&digest.as_bytes()[..8])
  )
}

/// Register one bundle per group and return their virtual paths in group order.
///
/// Bundles already present in the collection are not built again.
pub fn add_groups_as_bundles<C: BundleCollection>(
  collection: &mut C,
  groups: &[RouteGroup],
  asset_type: AssetType,
  prefix: &str,
  factory: &BundleFactory<C::Bundle>,
) -> Vec<String> {
  groups
    .iter()
    .map(|group| {
      let files: Vec<String> = group
        .files
        .iter()
        .map(AssetPath::virtual_path)
        .map(str::to_string)
        .collect();
      let virtual_path = bundle_virtual_path(prefix, asset_type, &files);

      if !collection.contains(&virtual_path) {
        tracing::debug!(bundle = %virtual_path, files = files.len(), "registering bundle");
        let bundle = factory(virtual_path.as_str(), files.as_slice());
        collection.add(&virtual_path, bundle);
      }

      virtual_path
    })
    .collect()
}
