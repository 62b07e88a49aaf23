//! Surface geometry helpers
//!
//! Default sizing and desktop centering for newly created surfaces. Decoration
//! expansion is left to the platform because border metrics are platform data.

use serde::{Deserialize, Serialize};

/// Screen-space rectangle with exclusive right/bottom edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub left: i32,
    /// Top edge
    pub top: i32,
    /// Right edge (exclusive)
    pub right: i32,
    /// Bottom edge (exclusive)
    pub bottom: i32,
}

impl Rect {
    /// Create a rectangle from its edges
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    /// Create a rectangle at `(left, top)` with the given size
    pub const fn from_origin_size(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self::new(left, top, left + width, top + height)
    }

    /// Horizontal extent
    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    /// Vertical extent
    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Grow every edge outward by the given insets
    pub const fn expand(&self, insets: Insets) -> Self {
        Self::new(
            self.left - insets.left,
            self.top - insets.top,
            self.right + insets.right,
            self.bottom + insets.bottom,
        )
    }

    /// Shrink every edge inward by the given insets, never past zero size
    pub fn shrink(&self, insets: Insets) -> Self {
        let left = self.left + insets.left;
        let top = self.top + insets.top;
        Self::new(
            left,
            top,
            (self.right - insets.right).max(left),
            (self.bottom - insets.bottom).max(top),
        )
    }
}

/// Per-edge decoration thickness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Insets {
    /// Left edge thickness
    pub left: i32,
    /// Top edge thickness (includes the title bar)
    pub top: i32,
    /// Right edge thickness
    pub right: i32,
    /// Bottom edge thickness
    pub bottom: i32,
}

impl Insets {
    /// Same thickness on all four edges
    pub const fn uniform(thickness: i32) -> Self {
        Self { left: thickness, top: thickness, right: thickness, bottom: thickness }
    }
}

/// Default surface size for the given desktop
///
/// Both axes derive from the desktop *width*: a third for the width and a
/// quarter for the height. Local sessions get double that.
pub const fn default_surface_size(desktop: &Rect, remote: bool) -> (i32, i32) {
    let mut width = desktop.width() / 3;
    let mut height = desktop.width() / 4;

    if !remote {
        width *= 2;
        height *= 2;
    }

    (width, height)
}

/// Resolve the requested client size, falling back to the default when either
/// axis is non-positive or the session is remote
pub fn resolve_surface_size(width: i32, height: i32, desktop: &Rect, remote: bool) -> (i32, i32) {
    if width <= 0 || height <= 0 || remote {
        let size = default_surface_size(desktop, remote);
        log::debug!(
            "Requested surface size {}x{} replaced by default {}x{} (remote: {})",
            width, height, size.0, size.1, remote
        );
        size
    } else {
        (width, height)
    }
}

/// Rectangle of the given size centered on the desktop
pub const fn centered_on(desktop: &Rect, width: i32, height: i32) -> Rect {
    let left = (desktop.left + desktop.right - width) / 2;
    let top = (desktop.top + desktop.bottom - height) / 2;
    Rect::from_origin_size(left, top, width, height)
}
