#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![allow(clippy::module_inception)]

pub mod asset_paths;
pub mod builder;
pub mod bundle;
pub mod cache;
pub mod config;
pub mod error;
pub mod manifest;
pub mod models;
pub mod resolver;

pub use asset_paths::{AssetPath, AssetRoot};
pub use builder::DynamicBundlesBuilder;
pub use bundle::{
  AreaControllerClassifier, Bundle, BundleCollection, BundleFactories, InMemoryBundleCollection,
  RouteClassifier, RouteScope,
};
pub use cache::{CacheHelper, MemoryCache, NoCache};
pub use config::{AncestorPolicy, BundlerConfig};
pub use error::{BundleError, BundleResult};
pub use models::{AssetType, BuildOutput, FileListsByAssetType};
pub use resolver::DependencyResolver;
