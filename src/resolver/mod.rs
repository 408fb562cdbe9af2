//! Transitive resolution of the asset files an asset directory needs.
//!
//! A directory depends on its parent directory (when the ancestor policy is `inherit`) and on
//! every directory listed in its dependency manifest. Dependencies are emitted before the
//! directory that needs them, so shared code always loads ahead of page-specific code.

mod scanning;

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;

use crate::asset_paths::{
  AssetRoot, AssetTypeRules, is_within, normalise_virtual_path, parent_virtual_path,
};
use crate::cache::CacheHelper;
use crate::config::{AncestorPolicy, BundlerConfig};
use crate::error::{BundleError, BundleResult};
use crate::manifest::load_dependency_manifest;
use crate::models::FileListsByAssetType;

pub use scanning::scan_asset_files;

/// Resolves asset directories into ordered file lists, memoising results through a cache.
pub struct DependencyResolver<'a> {
  root: &'a AssetRoot,
  cache: &'a dyn CacheHelper,
  rules: AssetTypeRules,
  manifest_file_name: String,
  ancestor_policy: AncestorPolicy,
  ancestor_root: String,
}

impl<'a> DependencyResolver<'a> {
  /// Create a resolver for directories below `root`.
  pub fn new(root: &'a AssetRoot, config: &BundlerConfig, cache: &'a dyn CacheHelper) -> Self {
    Self {
      root,
      cache,
      rules: config.asset_type_rules(),
      manifest_file_name: config.manifest_file_name.clone(),
      ancestor_policy: config.ancestor_policy,
      ancestor_root: config.ancestor_root.clone(),
    }
  }

  /// Every file `directory` needs, dependencies first, grouped by asset type.
  ///
  /// Results are cached per directory. A directory reached twice through different
  /// dependencies is emitted once, at its first position.
  pub fn get_required_files_for_directory(
    &self,
    directory: &str,
  ) -> BundleResult<FileListsByAssetType> {
    let directory =
      normalise_virtual_path(directory).ok_or_else(|| BundleError::MissingDependencyDirectory {
        directory: directory.to_string(),
        required_by: None,
      })?;
    let key = self.root.to_physical(&directory).to_string_lossy().into_owned();

    self.cache.get_or_compute(&key, &mut || -> BundleResult<FileListsByAssetType> {
      let mut walk = Walk::new(self);
      walk.visit(&directory, None)?;
      Ok(walk.files)
    })
  }

  /// Directories `directory` depends on directly, in load order.
  ///
  /// The parent directory comes first, followed by manifest entries in declared order.
  fn direct_dependencies(&self, directory: &str) -> BundleResult<Vec<String>> {
    let mut dependencies = Vec::new();

    if self.ancestor_policy == AncestorPolicy::Inherit
      && directory != self.ancestor_root
      && is_within(directory, &self.ancestor_root)
    {
      if let Some(parent) = parent_virtual_path(directory) {
        dependencies.push(parent);
      }
    }

    let manifest_path = self
      .root
      .to_physical(directory)
      .join(&self.manifest_file_name);
    if let Some(manifest) = load_dependency_manifest(&manifest_path)? {
      dependencies.extend(manifest.resolve_dependencies(directory)?);
    }

    Ok(dependencies)
  }

  fn ensure_directory(&self, directory: &str, required_by: Option<&str>) -> BundleResult<()> {
    let physical = self.root.to_physical(directory);
    let missing = || BundleError::MissingDependencyDirectory {
      directory: directory.to_string(),
      required_by: required_by.map(str::to_string),
    };

    match fs::metadata(&physical) {
      Ok(metadata) if metadata.is_dir() => Ok(()),
      Ok(_) => Err(missing()),
      Err(err) if err.kind() == ErrorKind::NotFound => Err(missing()),
      Err(err) => Err(BundleError::filesystem(physical, err)),
    }
  }
}

/// Depth-first walk over the dependency graph of one requested directory.
struct Walk<'r, 'a> {
  resolver: &'r DependencyResolver<'a>,
  in_progress: Vec<String>,
  emitted: HashSet<String>,
  files: FileListsByAssetType,
}

impl<'r, 'a> Walk<'r, 'a> {
  fn new(resolver: &'r DependencyResolver<'a>) -> Self {
    Self {
      resolver,
      in_progress: Vec::new(),
      emitted: HashSet::new(),
      files: FileListsByAssetType::new(),
    }
  }

  fn visit(&mut self, directory: &str, required_by: Option<&str>) -> BundleResult<()> {
    if let Some(start) = self.in_progress.iter().position(|entry| entry == directory) {
      let mut chain = self.in_progress[start..].to_vec();
      chain.push(directory.to_string());
      return Err(BundleError::CyclicDependency { chain });
    }
    if self.emitted.contains(directory) {
      return Ok(());
    }

    self.resolver.ensure_directory(directory, required_by)?;

    self.in_progress.push(directory.to_string());
    for dependency in self.resolver.direct_dependencies(directory)? {
      self.visit(&dependency, Some(directory))?;
    }
    self.in_progress.pop();
    self.emitted.insert(directory.to_string());

    let files = scan_asset_files(self.resolver.root, directory, &self.resolver.rules)?;
    tracing::debug!(directory, files = files.len(), "resolved asset directory");
    for (asset_type, file) in files {
      self.files.push(asset_type, file);
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use std::path::Path;

  use super::*;
  use crate::asset_paths::AssetPath;
  use crate::cache::{MemoryCache, NoCache};
  use crate::models::AssetType;
  use tempfile::tempdir;

  fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
  }

  fn names(lists: &FileListsByAssetType, asset_type: AssetType) -> Vec<&str> {
    lists
      .get_list(asset_type)
      .iter()
      .map(AssetPath::virtual_path)
      .collect()
  }

  fn ignore_ancestors() -> BundlerConfig {
    BundlerConfig {
      ancestor_policy: AncestorPolicy::Ignore,
      ..BundlerConfig::default()
    }
  }

  #[test]
  fn emits_declared_dependencies_before_own_files() {
    let dir = tempdir().unwrap();
    let web = dir.path();
    write_file(&web.join("Views/Shared/Lib/lib.js"), "");
    write_file(&web.join("Views/Shared/Lib/lib.css"), "");
    write_file(&web.join("Views/Home/Index/index.js"), "");
    write_file(
      &web.join("Views/Home/Index/dependencies.json"),
      r#"{"dependencies": ["~/Views/Shared/Lib"]}"#,
    );

    let root = AssetRoot::new(web);
    let resolver = DependencyResolver::new(&root, &ignore_ancestors(), &NoCache);
    let lists = resolver
      .get_required_files_for_directory("~/Views/Home/Index")
      .unwrap();

    assert_eq!(names(&lists, AssetType::Script), vec![
      "~/Views/Shared/Lib/lib.js",
      "~/Views/Home/Index/index.js",
    ]);
    assert_eq!(names(&lists, AssetType::StyleSheet), vec!["~/Views/Shared/Lib/lib.css"]);
  }

  #[test]
  fn inherits_ancestor_files_outermost_first() {
    let dir = tempdir().unwrap();
    let web = dir.path();
    write_file(&web.join("site.js"), "");
    write_file(&web.join("Views/views.js"), "");
    write_file(&web.join("Views/Home/Index/index.js"), "");

    let root = AssetRoot::new(web);
    let config = BundlerConfig::default();
    let resolver = DependencyResolver::new(&root, &config, &NoCache);
    let lists = resolver
      .get_required_files_for_directory("~/Views/Home/Index")
      .unwrap();

    assert_eq!(names(&lists, AssetType::Script), vec![
      "~/site.js",
      "~/Views/views.js",
      "~/Views/Home/Index/index.js",
    ]);
  }

  #[test]
  fn ancestor_walk_stops_at_configured_root() {
    let dir = tempdir().unwrap();
    let web = dir.path();
    write_file(&web.join("site.js"), "");
    write_file(&web.join("Views/views.js"), "");
    write_file(&web.join("Views/Home/home.js"), "");
    write_file(&web.join("Scripts/standalone.js"), "");

    let root = AssetRoot::new(web);
    let config = BundlerConfig {
      ancestor_root: "~/Views".into(),
      ..BundlerConfig::default()
    };
    let resolver = DependencyResolver::new(&root, &config, &NoCache);

    let home = resolver.get_required_files_for_directory("~/Views/Home").unwrap();
    assert_eq!(names(&home, AssetType::Script), vec![
      "~/Views/views.js",
      "~/Views/Home/home.js",
    ]);

    let scripts = resolver.get_required_files_for_directory("~/Scripts").unwrap();
    assert_eq!(names(&scripts, AssetType::Script), vec!["~/Scripts/standalone.js"]);
  }

  #[test]
  fn ancestors_precede_manifest_dependencies() {
    let dir = tempdir().unwrap();
    let web = dir.path();
    write_file(&web.join("Views/views.css"), "");
    write_file(&web.join("Content/theme.css"), "");
    write_file(&web.join("Views/Home/home.css"), "");
    write_file(
      &web.join("Views/Home/dependencies.json"),
      r#"{"dependencies": ["/Content"]}"#,
    );

    let root = AssetRoot::new(web);
    let config = BundlerConfig::default();
    let resolver = DependencyResolver::new(&root, &config, &NoCache);
    let lists = resolver.get_required_files_for_directory("~/Views/Home").unwrap();

    assert_eq!(names(&lists, AssetType::StyleSheet), vec![
      "~/Views/views.css",
      "~/Content/theme.css",
      "~/Views/Home/home.css",
    ]);
  }

  #[test]
  fn shared_dependency_is_emitted_once_per_resolution() {
    let dir = tempdir().unwrap();
    let web = dir.path();
    write_file(&web.join("Lib/jquery.js"), "");
    write_file(&web.join("A/a.js"), "");
    write_file(&web.join("A/dependencies.json"), r#"{"dependencies": ["~/Lib"]}"#);
    write_file(&web.join("B/b.js"), "");
    write_file(&web.join("B/dependencies.json"), r#"{"dependencies": ["~/Lib"]}"#);
    write_file(&web.join("Page/page.js"), "");
    write_file(
      &web.join("Page/dependencies.json"),
      r#"{"dependencies": ["~/A", "~/B"]}"#,
    );

    let root = AssetRoot::new(web);
    let resolver = DependencyResolver::new(&root, &ignore_ancestors(), &NoCache);
    let lists = resolver.get_required_files_for_directory("~/Page").unwrap();

    assert_eq!(names(&lists, AssetType::Script), vec![
      "~/Lib/jquery.js",
      "~/A/a.js",
      "~/B/b.js",
      "~/Page/page.js",
    ]);
  }

  #[test]
  fn detects_cycles_with_the_offending_chain() {
    let dir = tempdir().unwrap();
    let web = dir.path();
    write_file(&web.join("A/dependencies.json"), r#"{"dependencies": ["~/B"]}"#);
    write_file(&web.join("B/dependencies.json"), r#"{"dependencies": ["../A"]}"#);

    let root = AssetRoot::new(web);
    let resolver = DependencyResolver::new(&root, &ignore_ancestors(), &NoCache);
    let err = resolver.get_required_files_for_directory("~/A").unwrap_err();

    match err {
      BundleError::CyclicDependency { chain } => {
        assert_eq!(chain, vec!["~/A", "~/B", "~/A"]);
      }
      other => panic!("expected a cycle, got {other:?}"),
    }
  }

  #[test]
  fn manifest_pointing_at_a_descendant_cycles_through_the_parent() {
    let dir = tempdir().unwrap();
    let web = dir.path();
    write_file(&web.join("Views/Shared/_Layout/layout.css"), "");
    write_file(
      &web.join("Views/Shared/dependencies.json"),
      r#"{"dependencies": ["_Layout"]}"#,
    );

    let root = AssetRoot::new(web);
    let config = BundlerConfig::default();
    let resolver = DependencyResolver::new(&root, &config, &NoCache);
    let err = resolver
      .get_required_files_for_directory("~/Views/Shared")
      .unwrap_err();

    assert!(matches!(err, BundleError::CyclicDependency { .. }));
  }

  #[test]
  fn missing_declared_directory_fails() {
    let dir = tempdir().unwrap();
    let web = dir.path();
    write_file(&web.join("Home/home.js"), "");
    write_file(&web.join("Home/dependencies.json"), r#"{"dependencies": ["~/Gone"]}"#);

    let root = AssetRoot::new(web);
    let resolver = DependencyResolver::new(&root, &ignore_ancestors(), &NoCache);
    let err = resolver.get_required_files_for_directory("~/Home").unwrap_err();

    match err {
      BundleError::MissingDependencyDirectory {
        directory,
        required_by,
      } => {
        assert_eq!(directory, "~/Gone");
        assert_eq!(required_by.as_deref(), Some("~/Home"));
      }
      other => panic!("expected a missing directory, got {other:?}"),
    }
  }

  #[test]
  fn missing_requested_directory_fails() {
    let dir = tempdir().unwrap();
    let root = AssetRoot::new(dir.path());
    let resolver = DependencyResolver::new(&root, &ignore_ancestors(), &NoCache);

    let err = resolver.get_required_files_for_directory("~/Nope").unwrap_err();
    assert!(matches!(
      err,
      BundleError::MissingDependencyDirectory { required_by: None, .. }
    ));

    let err = resolver.get_required_files_for_directory("Views").unwrap_err();
    assert!(matches!(err, BundleError::MissingDependencyDirectory { .. }));
  }

  #[test]
  fn malformed_manifest_fails() {
    let dir = tempdir().unwrap();
    let web = dir.path();
    write_file(&web.join("Home/dependencies.json"), "{ not json");

    let root = AssetRoot::new(web);
    let resolver = DependencyResolver::new(&root, &ignore_ancestors(), &NoCache);
    let err = resolver.get_required_files_for_directory("~/Home").unwrap_err();
    assert!(matches!(err, BundleError::ManifestParse { .. }));
  }

  #[test]
  fn cached_resolution_is_stable() {
    let dir = tempdir().unwrap();
    let web = dir.path();
    write_file(&web.join("Home/b.js"), "");
    write_file(&web.join("Home/a.js"), "");

    let root = AssetRoot::new(web);
    let cache = MemoryCache::new();
    let resolver = DependencyResolver::new(&root, &ignore_ancestors(), &cache);

    let first = resolver.get_required_files_for_directory("~/Home").unwrap();
    write_file(&web.join("Home/c.js"), "");
    let second = resolver.get_required_files_for_directory("~/Home/").unwrap();

    assert_eq!(first, second);
    assert_eq!(names(&second, AssetType::Script), vec!["~/Home/a.js", "~/Home/b.js"]);
    assert_eq!(cache.len(), 1);
  }
}
