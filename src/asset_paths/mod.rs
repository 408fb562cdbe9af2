//! Helpers for naming asset files and directories.
//!
//! Virtual path arithmetic, the [`AssetPath`] value type and the extension rules that sort
//! files into scripts and stylesheets live in separate submodules so each can be tested on
//! its own.

mod asset_path;
mod filters;
mod virtual_path;

pub use asset_path::{AssetPath, AssetRoot};
pub use filters::{AssetTypeRules, unminified_sibling};
pub use virtual_path::{
  VIRTUAL_ROOT, is_within, join_virtual_path, normalise_virtual_path, parent_virtual_path,
  virtual_segments,
};
