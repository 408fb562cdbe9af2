//! Error type shared by resolution, partitioning and configuration loading.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used across the crate.
pub type BundleResult<T> = Result<T, BundleError>;

/// Failures that abort a build. No bundles are registered once one of these is raised.
#[derive(Debug, Error)]
pub enum BundleError {
  /// A requested, inherited or manifest-declared directory is missing on disk.
  #[error("asset directory `{directory}` does not exist (required by {})", .required_by.as_deref().unwrap_or("the build request"))]
  MissingDependencyDirectory {
    /// Virtual path of the missing directory.
    directory: String,
    /// Virtual path of the directory that declared the dependency, if any.
    required_by: Option<String>,
  },

  /// A dependency manifest could not be parsed.
  #[error("failed to parse dependency manifest {}", .path.display())]
  ManifestParse {
    /// Manifest file location.
    path: PathBuf,
    /// Underlying JSON error.
    #[source]
    source: serde_json::Error,
  },

  /// The dependency graph loops back onto a directory that is still being resolved.
  #[error("cyclic asset dependency: {}", .chain.join(" -> "))]
  CyclicDependency {
    /// Virtual paths from the first occurrence of the repeated directory to its re-entry.
    chain: Vec<String>,
  },

  /// Enumerating or reading from the filesystem failed.
  #[error("filesystem error at {}", .path.display())]
  Filesystem {
    /// Path being accessed.
    path: PathBuf,
    /// Underlying I/O error.
    #[source]
    source: std::io::Error,
  },

  /// A configuration file exists but could not be read, parsed or validated.
  #[error("failed to load configuration from {}", .path.display())]
  Config {
    /// Configuration file location.
    path: PathBuf,
    /// I/O, JSON or validation failure.
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },
}

impl BundleError {
  pub(crate) fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    Self::Filesystem {
      path: path.into(),
      source,
    }
  }

  pub(crate) fn config(
    path: impl Into<PathBuf>,
    source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
  ) -> Self {
    Self::Config {
      path: path.into(),
      source: source.into(),
    }
  }
}
