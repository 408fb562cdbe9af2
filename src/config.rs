//! Project configuration loader describing how asset directories are resolved and bundled.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;

use crate::asset_paths::{AssetTypeRules, VIRTUAL_ROOT, normalise_virtual_path};
use crate::error::{BundleError, BundleResult};

/// File name looked up by [`BundlerConfig::discover`].
pub const DEFAULT_CONFIG_FILE: &str = "dynamic-bundles.config.json";

/// Whether a directory implicitly depends on its parent directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AncestorPolicy {
    /// Parent directories up to the ancestor root contribute their files first.
    #[default]
    Inherit,
    /// Only manifest-declared dependencies are followed.
    Ignore,
}

/// Discoverable configuration for dependency resolution and bundle naming.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BundlerConfig {
    /// File inside an asset directory listing the directories it depends on.
    pub manifest_file_name: String,
    /// Extensions classified as scripts.
    pub script_extensions: Vec<String>,
    /// Extensions classified as stylesheets.
    pub style_extensions: Vec<String>,
    /// Whether parent directories are implicit dependencies.
    pub ancestor_policy: AncestorPolicy,
    /// Highest virtual directory the ancestor walk reaches, inclusive.
    pub ancestor_root: String,
    /// Virtual directory under which bundle paths are generated.
    pub bundle_prefix: String,
}

impl Default for BundlerConfig {
    fn default() -> Self {
        Self {
            manifest_file_name: "dependencies.json".into(),
            script_extensions: vec!["js".into()],
            style_extensions: vec!["css".into()],
            ancestor_policy: AncestorPolicy::Inherit,
            ancestor_root: VIRTUAL_ROOT.into(),
            bundle_prefix: "~/dynamicbundles".into(),
        }
    }
}

impl BundlerConfig {
    /// Load configuration from the project directory.
    ///
    /// Only an absent configuration file falls back to the defaults. A file that exists but
    /// cannot be read, parsed or validated is an error.
    pub fn discover(project_dir: &Path) -> BundleResult<Self> {
        let candidate = project_dir.join(DEFAULT_CONFIG_FILE);
        match fs::read_to_string(&candidate) {
            Ok(content) => Self::from_json(&candidate, &content),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %candidate.display(), "no configuration file, using defaults");
                Ok(Self::default())
            }
            Err(err) => Err(BundleError::config(candidate, err)),
        }
    }

    /// Read configuration from a specific JSON file.
    pub fn from_path(path: &Path) -> BundleResult<Self> {
        let content = fs::read_to_string(path).map_err(|err| BundleError::config(path, err))?;
        Self::from_json(path, &content)
    }

    fn from_json(path: &Path, content: &str) -> BundleResult<Self> {
        let config: Self =
            serde_json::from_str(content).map_err(|err| BundleError::config(path, err))?;
        config.validated(path)
    }

    fn validated(mut self, path: &Path) -> BundleResult<Self> {
        self.ancestor_root = normalise_virtual_path(&self.ancestor_root).ok_or_else(|| {
            BundleError::config(
                path,
                format!("ancestorRoot `{}` is not a ~/ path", self.ancestor_root),
            )
        })?;
        self.bundle_prefix = normalise_virtual_path(&self.bundle_prefix).ok_or_else(|| {
            BundleError::config(
                path,
                format!("bundlePrefix `{}` is not a ~/ path", self.bundle_prefix),
            )
        })?;
        if self.manifest_file_name.trim().is_empty() {
            return Err(BundleError::config(path, "manifestFileName must not be empty"));
        }
        Ok(self)
    }

    /// Extension rules derived from the configured lists.
    pub fn asset_type_rules(&self) -> AssetTypeRules {
        AssetTypeRules::new(
            self.script_extensions.iter().cloned(),
            self.style_extensions.iter().cloned(),
        )
    }
}
