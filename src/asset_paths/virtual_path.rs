//! String arithmetic on root-relative (`~/...`) virtual paths.

/// Virtual path of the application root.
pub const VIRTUAL_ROOT: &str = "~";

/// Normalise a root-relative virtual path.
///
/// Backslashes become forward slashes, empty and `.` segments are dropped and `..` pops the
/// previous segment. Returns `None` when the value is not rooted at `~` or climbs above it.
pub fn normalise_virtual_path(raw: &str) -> Option<String> {
  let value = raw.trim().replace('\\', "/");
  let rest = value.strip_prefix(VIRTUAL_ROOT)?;
  if !(rest.is_empty() || rest.starts_with('/')) {
    return None;
  }

  let mut segments: Vec<&str> = Vec::new();
  for segment in rest.split('/') {
    match segment {
      "" | "." => {}
      ".." => {
        segments.pop()?;
      }
      other => segments.push(other),
    }
  }

  if segments.is_empty() {
    Some(VIRTUAL_ROOT.to_string())
  } else {
    Some(format!("{VIRTUAL_ROOT}/{}", segments.join("/")))
  }
}

/// Resolve a directory reference found in a manifest against the declaring directory.
///
/// `~/...` references are root-relative, `/...` references are treated as rooted at `~`, and
/// everything else is relative to `base_dir`.
pub fn join_virtual_path(base_dir: &str, reference: &str) -> Option<String> {
  let reference = reference.trim().replace('\\', "/");
  if reference.starts_with(VIRTUAL_ROOT) {
    normalise_virtual_path(&reference)
  } else if reference.starts_with('/') {
    normalise_virtual_path(&format!("{VIRTUAL_ROOT}{reference}"))
  } else {
    normalise_virtual_path(&format!("{base_dir}/{reference}"))
  }
}

/// Parent directory of a normalised virtual path, `None` for the root itself.
pub fn parent_virtual_path(path: &str) -> Option<String> {
  if path == VIRTUAL_ROOT {
    return None;
  }
  path
    .rsplit_once('/')
    .map(|(parent, _)| parent.to_string())
}

/// Returns `true` when `candidate` equals `scope` or lives underneath it.
pub fn is_within(candidate: &str, scope: &str) -> bool {
  if candidate == scope {
    return true;
  }

  candidate
    .strip_prefix(scope)
    .is_some_and(|suffix| suffix.starts_with('/'))
}

/// Split a virtual path into its segments below `~`.
pub fn virtual_segments(path: &str) -> impl Iterator<Item = &str> {
  path
    .strip_prefix(VIRTUAL_ROOT)
    .unwrap_or(path)
    .split('/')
    .filter(|segment| !segment.is_empty())
}
