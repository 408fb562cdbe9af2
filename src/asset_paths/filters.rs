use std::path::{Path, PathBuf};

use regex::Regex;

use crate::models::AssetType;

fn minified_file_name() -> &'static Regex {
  use std::sync::OnceLock;

  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| {
    Regex::new(r"^(?P<stem>.+)\.min(?P<ext>\.[^.]+)$").expect("invalid minified file regex")
  })
}

/// For a minified file such as `dir/app.min.js`, the path its unminified sibling would have.
///
/// Returns `None` when the file name carries no `.min` infix directly before the extension.
pub fn unminified_sibling(path: &Path) -> Option<PathBuf> {
  let directory = path.parent()?;
  let file_name = path.file_name()?.to_str()?;
  let captures = minified_file_name().captures(file_name)?;
  Some(directory.join(format!("{}{}", &captures["stem"], &captures["ext"])))
}

/// Extension rules deciding which [`AssetType`] a file belongs to.
#[derive(Debug, Clone)]
pub struct AssetTypeRules {
  script_extensions: Vec<String>,
  style_extensions: Vec<String>,
}

impl AssetTypeRules {
  /// Build rules from extension lists. Leading dots and case are ignored.
  pub fn new(
    script_extensions: impl IntoIterator<Item = String>,
    style_extensions: impl IntoIterator<Item = String>,
  ) -> Self {
    Self {
      script_extensions: normalise_extensions(script_extensions),
      style_extensions: normalise_extensions(style_extensions),
    }
  }

  /// Classify a file by its extension, `None` for files that are neither scripts nor styles.
  pub fn classify(&self, path: &Path) -> Option<AssetType> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    if self.script_extensions.contains(&extension) {
      Some(AssetType::Script)
    } else if self.style_extensions.contains(&extension) {
      Some(AssetType::StyleSheet)
    } else {
      None
    }
  }
}

impl Default for AssetTypeRules {
  fn default() -> Self {
    Self::new(vec!["js".to_string()], vec!["css".to_string()])
  }
}

fn normalise_extensions(values: impl IntoIterator<Item = String>) -> Vec<String> {
  values
    .into_iter()
    .map(|value| value.trim().trim_start_matches('.').to_ascii_lowercase())
    .filter(|value| !value.is_empty())
    .collect()
}
