//! Splitting an aggregated file list into route-scoped bundle groups.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::asset_paths::{AssetPath, unminified_sibling};

use super::route::{RouteClassifier, RouteScope};

/// Files of one routing scope, in load order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGroup {
  /// Scope shared by every file in the group.
  pub scope: RouteScope,
  /// Files in load order.
  pub files: Vec<AssetPath>,
}

/// Turns the aggregated, possibly repetitive file list of one asset type into bundle groups.
pub struct BundlePartitioner<'c> {
  classifier: &'c dyn RouteClassifier,
}

impl<'c> BundlePartitioner<'c> {
  /// Partition using the given route classifier.
  pub fn new(classifier: &'c dyn RouteClassifier) -> Self {
    Self { classifier }
  }

  /// Remove repeats and redundant minified files, then group by routing scope.
  ///
  /// Groups come back in order of first appearance of their scope; an empty input yields no
  /// groups.
  pub fn partition(&self, mut files: Vec<AssetPath>) -> Vec<RouteGroup> {
    remove_repeated_files(&mut files);
    remove_minified_duplicates(&mut files);
    group_by_route(files, self.classifier)
  }
}

/// Keep only the first occurrence of each file.
pub fn remove_repeated_files(files: &mut Vec<AssetPath>) {
  let mut seen = HashSet::new();
  files.retain(|file| seen.insert(file.absolute_path().to_path_buf()));
}

/// Drop `name.min.ext` wherever `name.ext` from the same directory is also in the list.
pub fn remove_minified_duplicates(files: &mut Vec<AssetPath>) {
  let present: HashSet<&Path> = files.iter().map(AssetPath::absolute_path).collect();
  let redundant: HashSet<usize> = files
    .iter()
    .enumerate()
    .filter(|(_, file)| {
      unminified_sibling(file.absolute_path())
        .is_some_and(|sibling| present.contains(sibling.as_path()))
    })
    .map(|(index, _)| index)
    .collect();

  if redundant.is_empty() {
    return;
  }

  for index in &redundant {
    tracing::debug!(
      file = files[*index].virtual_path(),
      "dropping minified file with unminified sibling"
    );
  }

  let mut index = 0;
  files.retain(|_| {
    let keep = !redundant.contains(&index);
    index += 1;
    keep
  });
}

/// Group files by the scope the classifier assigns, keeping load order inside each group.
pub fn group_by_route(files: Vec<AssetPath>, classifier: &dyn RouteClassifier) -> Vec<RouteGroup> {
  let mut groups: Vec<RouteGroup> = Vec::new();
  let mut positions: HashMap<RouteScope, usize> = HashMap::new();

  for file in files {
    let scope = classifier.classify(file.virtual_path());
    match positions.get(&scope) {
      Some(&position) => groups[position].files.push(file),
      None => {
        positions.insert(scope.clone(), groups.len());
        groups.push(RouteGroup {
          scope,
          files: vec![file],
        });
      }
    }
  }

  groups
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::bundle::route::AreaControllerClassifier;

  fn file(virtual_path: &str) -> AssetPath {
    let relative = virtual_path.trim_start_matches("~/");
    AssetPath::new(virtual_path, Path::new("/web").join(relative))
  }

  fn virtual_paths(files: &[AssetPath]) -> Vec<&str> {
    files.iter().map(AssetPath::virtual_path).collect()
  }

  #[test]
  fn drops_minified_file_regardless_of_position() {
    for input in [
      vec!["~/Lib/a.min.js", "~/Lib/b.js", "~/Lib/a.js"],
      vec!["~/Lib/a.js", "~/Lib/b.js", "~/Lib/a.min.js"],
    ] {
      let mut files: Vec<AssetPath> = input.into_iter().map(file).collect();
      remove_minified_duplicates(&mut files);
      let mut kept = virtual_paths(&files);
      kept.sort();
      assert_eq!(kept, vec!["~/Lib/a.js", "~/Lib/b.js"]);
    }
  }

  #[test]
  fn keeps_minified_file_without_sibling_in_same_directory() {
    let mut files = vec![file("~/Lib/a.min.js"), file("~/Other/a.js")];
    remove_minified_duplicates(&mut files);
    assert_eq!(virtual_paths(&files), vec!["~/Lib/a.min.js", "~/Other/a.js"]);
  }

  #[test]
  fn keeps_first_occurrence_of_repeated_files() {
    let mut files = vec![
      file("~/Shared/site.css"),
      file("~/Home/home.css"),
      file("~/Shared/site.css"),
      file("~/Shared/layout.css"),
    ];
    remove_repeated_files(&mut files);
    assert_eq!(virtual_paths(&files), vec![
      "~/Shared/site.css",
      "~/Home/home.css",
      "~/Shared/layout.css",
    ]);
  }

  #[test]
  fn groups_follow_first_appearance_and_keep_order() {
    let classifier = AreaControllerClassifier;
    let partitioner = BundlePartitioner::new(&classifier);
    let groups = partitioner.partition(vec![
      file("~/Views/Shared/_Layout/jquery.js"),
      file("~/Views/Account/Login/login.js"),
      file("~/Views/Shared/_Layout/site.js"),
      file("~/Views/Account/Details/details.js"),
      file("~/Views/Home/Index/index.js"),
    ]);

    let scopes: Vec<&RouteScope> = groups.iter().map(|group| &group.scope).collect();
    assert_eq!(scopes, vec![
      &RouteScope::global(),
      &RouteScope::new(None, Some("Account")),
      &RouteScope::new(None, Some("Home")),
    ]);
    assert_eq!(virtual_paths(&groups[0].files), vec![
      "~/Views/Shared/_Layout/jquery.js",
      "~/Views/Shared/_Layout/site.js",
    ]);
    assert_eq!(virtual_paths(&groups[1].files), vec![
      "~/Views/Account/Login/login.js",
      "~/Views/Account/Details/details.js",
    ]);
  }

  #[test]
  fn distinct_scopes_never_share_a_group() {
    let classifier = AreaControllerClassifier;
    let groups = BundlePartitioner::new(&classifier).partition(vec![
      file("~/Areas/Admin/Views/Users/users.js"),
      file("~/Views/Users/users.js"),
      file("~/Areas/Admin/Views/Users/extra.js"),
    ]);

    assert_eq!(groups.len(), 2);
    for group in &groups {
      for member in &group.files {
        assert_eq!(classifier.classify(member.virtual_path()), group.scope);
      }
    }
  }

  #[test]
  fn empty_input_yields_no_groups() {
    let classifier = AreaControllerClassifier;
    assert!(BundlePartitioner::new(&classifier).partition(Vec::new()).is_empty());
  }
}
