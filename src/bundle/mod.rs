//! Turning resolved file lists into route-scoped bundles.

pub mod collection;
pub mod partition;
pub mod route;

pub use collection::{
  Bundle, BundleCollection, BundleFactories, BundleFactory, InMemoryBundleCollection,
  add_groups_as_bundles, bundle_virtual_path,
};
pub use partition::{BundlePartitioner, RouteGroup};
pub use route::{AreaControllerClassifier, RouteClassifier, RouteScope};
