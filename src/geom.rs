//! Geometry: client-space points, bounding boxes, and the coordinate normalizer.
//!
//! Client points are in CSS pixels relative to the viewport, exactly as a
//! pointer event reports them. Normalized points are fractions of the page
//! content box and are what strokes store.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use serde::{Deserialize, Serialize};

/// A point in client (viewport) or canvas CSS-pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A point expressed as a fraction of the page content box.
///
/// Both axes are always within `0.0..=1.0` when produced by [`normalize`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormPoint {
    pub x: f64,
    pub y: f64,
}

impl NormPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Map back to CSS pixels for a box of the given size.
    #[must_use]
    pub fn denormalize(self, width: f64, height: f64) -> Point {
        Point { x: self.x * width, y: self.y * height }
    }
}

/// An element's bounding box in client space, as from `getBoundingClientRect`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// Whether the box has a usable, positive area.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
    }

    /// Size of the box as `(width, height)`.
    #[must_use]
    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }
}

/// Convert a client-space pointer position to a normalized page point.
///
/// Each axis is clamped to `[0, 1]` independently, so a drag that leaves the
/// page sticks to the nearest edge. A missing or degenerate target yields the
/// origin rather than failing.
#[must_use]
pub fn normalize(client: Point, target: Option<Rect>) -> NormPoint {
    let Some(rect) = target else {
        return NormPoint::default();
    };
    if rect.is_degenerate() {
        return NormPoint::default();
    }
    NormPoint {
        x: clamp_unit((client.x - rect.left) / rect.width),
        y: clamp_unit((client.y - rect.top) / rect.height),
    }
}

/// Clamp to `[0, 1]`; NaN maps to 0.
#[must_use]
pub fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}
