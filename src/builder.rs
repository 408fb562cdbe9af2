//! Build orchestrator turning requested asset directories into registered bundles.

use crate::asset_paths::AssetRoot;
use crate::bundle::{
  AreaControllerClassifier, BundleCollection, BundleFactories, BundlePartitioner,
  RouteClassifier, RouteGroup, add_groups_as_bundles,
};
use crate::cache::CacheHelper;
use crate::config::BundlerConfig;
use crate::error::{BundleError, BundleResult};
use crate::models::{AssetType, BuildOutput, FileListsByAssetType};
use crate::resolver::DependencyResolver;

/// Builds the bundles a page needs from the asset directories of its views.
pub struct DynamicBundlesBuilder<'a, C: BundleCollection> {
  root: AssetRoot,
  config: BundlerConfig,
  cache: &'a dyn CacheHelper,
  collection: C,
  factories: BundleFactories<C::Bundle>,
  classifier: Box<dyn RouteClassifier + 'a>,
}

impl<'a, C: BundleCollection> DynamicBundlesBuilder<'a, C> {
  /// Create a builder registering bundles into `collection`.
  ///
  /// Files are grouped with [`AreaControllerClassifier`] unless another classifier is set
  /// through [`DynamicBundlesBuilder::with_classifier`].
  pub fn new(
    root: AssetRoot,
    config: BundlerConfig,
    cache: &'a dyn CacheHelper,
    collection: C,
    factories: BundleFactories<C::Bundle>,
  ) -> Self {
    Self {
      root,
      config,
      cache,
      collection,
      factories,
      classifier: Box::new(AreaControllerClassifier),
    }
  }

  /// Replace the routing classifier used to group files into bundles.
  pub fn with_classifier(mut self, classifier: impl RouteClassifier + 'a) -> Self {
    self.classifier = Box::new(classifier);
    self
  }

  /// Collection the bundles are registered in.
  pub fn collection(&self) -> &C {
    &self.collection
  }

  /// Give up the builder and keep the collection.
  pub fn into_collection(self) -> C {
    self.collection
  }

  /// Resolve `asset_directories` in the given order and register their bundles.
  ///
  /// The order of the directories drives the order of files across directories. Every
  /// directory is resolved before any bundle is registered, so a failing build leaves the
  /// collection untouched.
  pub fn build<S: AsRef<str>>(&mut self, asset_directories: &[S]) -> BundleResult<BuildOutput> {
    let mut files = self.collect_required_files(asset_directories)?;

    let partitioner = BundlePartitioner::new(self.classifier.as_ref());
    let script_groups = partitioner.partition(files.take_list(AssetType::Script));
    let style_groups = partitioner.partition(files.take_list(AssetType::StyleSheet));

    let output = BuildOutput {
      script_bundle_virtual_paths: self.create_bundles(&script_groups, AssetType::Script),
      style_bundle_virtual_paths: self.create_bundles(&style_groups, AssetType::StyleSheet),
    };

    tracing::info!(
      directories = asset_directories.len(),
      script_bundles = output.script_bundle_virtual_paths.len(),
      style_bundles = output.style_bundle_virtual_paths.len(),
      "built dynamic bundles"
    );
    Ok(output)
  }

  fn collect_required_files<S: AsRef<str>>(
    &self,
    asset_directories: &[S],
  ) -> BundleResult<FileListsByAssetType> {
    let resolver = DependencyResolver::new(&self.root, &self.config, self.cache);
    asset_directories
      .iter()
      .try_fold(FileListsByAssetType::new(), |files, directory| {
        let required = resolver.get_required_files_for_directory(directory.as_ref())?;
        Ok::<_, BundleError>(files.appended(&required))
      })
  }

  fn create_bundles(&mut self, groups: &[RouteGroup], asset_type: AssetType) -> Vec<String> {
    add_groups_as_bundles(
      &mut self.collection,
      groups,
      asset_type,
      &self.config.bundle_prefix,
      self.factories.for_type(asset_type),
    )
  }
}
