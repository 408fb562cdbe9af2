//! Dependency manifests declaring which other asset directories a directory needs.

mod loading;

pub use loading::{DependencyManifest, load_dependency_manifest};
