//! Shared defaults for the overlay crate.

// ── Stroke style ────────────────────────────────────────────────

/// Default stroke color for new annotations.
pub const DEFAULT_STROKE_COLOR: &str = "#EF4444";

/// Default stroke width in CSS pixels.
pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;

/// Canvas line cap used for every stroke.
pub const DEFAULT_LINE_CAP: &str = "round";

/// Canvas line join used for every stroke.
pub const DEFAULT_LINE_JOIN: &str = "round";

// ── DOM ─────────────────────────────────────────────────────────

/// Attribute marking a node inside the page container as the page content.
pub const PAGE_CONTENT_ATTR: &str = "data-annotation-page";

/// Attribute placed on the overlay canvas so content probing skips it.
pub const OVERLAY_ATTR: &str = "data-annotation-overlay";

/// Selectors probed, in order, to find the rendered page inside its container.
pub const DEFAULT_CONTENT_SELECTORS: [&str; 3] = [
    "img",
    "[data-annotation-page]",
    "canvas:not([data-annotation-overlay])",
];

// ── Display ─────────────────────────────────────────────────────

/// Fallback device pixel ratio when the host reports a non-positive value.
pub const FALLBACK_DPR: f64 = 1.0;
