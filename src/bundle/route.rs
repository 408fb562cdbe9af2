//! Mapping asset files onto the routing scope (area and controller) they serve.

use crate::asset_paths::virtual_segments;

/// Area/controller pair a file belongs to. Both empty means the file is global.
///
/// Names are stored in ASCII lowercase, since area and controller routing is case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RouteScope {
  /// Area name, if the file lives under `~/Areas/{area}`.
  pub area: Option<String>,
  /// Controller name, if the file lives under a controller's view directory.
  pub controller: Option<String>,
}

impl RouteScope {
  /// Scope for files shared by every page.
  pub fn global() -> Self {
    Self::default()
  }

  /// Scope for one controller, optionally inside an area.
  pub fn new(area: Option<&str>, controller: Option<&str>) -> Self {
    Self {
      area: area.map(str::to_ascii_lowercase),
      controller: controller.map(str::to_ascii_lowercase),
    }
  }

  /// Returns `true` for the global scope.
  pub fn is_global(&self) -> bool {
    self.area.is_none() && self.controller.is_none()
  }
}

/// Decides which routing scope a file's virtual path belongs to.
pub trait RouteClassifier {
  /// Scope for the file at `virtual_path`. Unclassifiable paths belong to the global scope.
  fn classify(&self, virtual_path: &str) -> RouteScope;
}

impl<F> RouteClassifier for F
where
  F: Fn(&str) -> RouteScope,
{
  fn classify(&self, virtual_path: &str) -> RouteScope {
    self(virtual_path)
  }
}

/// Classifier following the MVC view layout.
///
/// - `~/Views/{Controller}/...` maps to that controller.
/// - `~/Areas/{Area}/Views/{Controller}/...` maps to the controller inside the area.
/// - `Shared` view directories map to the enclosing area, or the global scope outside areas.
/// - Other files under `~/Areas/{Area}/` map to the area, everything else is global.
///
/// Directory names are matched case-insensitively.
#[derive(Debug, Default, Clone, Copy)]
pub struct AreaControllerClassifier;

impl RouteClassifier for AreaControllerClassifier {
  fn classify(&self, virtual_path: &str) -> RouteScope {
    let segments: Vec<&str> = virtual_segments(virtual_path).collect();
    let Some((_, directories)) = segments.split_last() else {
      return RouteScope::global();
    };

    let (area, rest) = match directories {
      [areas, area, rest @ ..] if areas.eq_ignore_ascii_case("areas") => (Some(*area), rest),
      _ => (None, directories),
    };

    let controller = match rest {
      [views, controller, ..]
        if views.eq_ignore_ascii_case("views") && !controller.eq_ignore_ascii_case("shared") =>
      {
        Some(*controller)
      }
      _ => None,
    };

    RouteScope::new(area, controller)
  }
}
