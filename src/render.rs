//! Rendering: sizes the backing buffer and replays every stroke.
//!
//! Each repaint derives absolute pixel positions from the normalized points
//! and the current CSS size of the page, so stored strokes are correct at any
//! zoom level. This module only reads stroke state; it never mutates it.
//!
//! All fallible surface calls propagate errors via `Result<(), OverlayError>`.
//! The top-level caller ([`crate::overlay::Overlay::render`]) handles the result.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::config::OverlayConfig;
use crate::consts::{DEFAULT_STROKE_WIDTH, FALLBACK_DPR};
use crate::error::OverlayError;
use crate::geom::Rect;
use crate::stroke::{Stroke, StrokeSet};
use crate::surface::Surface;

/// CSS size of the page content and the device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Layout {
    pub css_width: f64,
    pub css_height: f64,
    pub dpr: f64,
}

impl Layout {
    /// Build a layout, replacing unusable values: negative or non-finite
    /// sizes become 0 and a non-positive DPR becomes 1.
    #[must_use]
    pub fn new(css_width: f64, css_height: f64, dpr: f64) -> Self {
        let sane = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { FALLBACK_DPR };
        Self { css_width: sane(css_width), css_height: sane(css_height), dpr }
    }

    /// Layout for a measured content box.
    #[must_use]
    pub fn from_rect(rect: Rect, dpr: f64) -> Self {
        Self::new(rect.width, rect.height, dpr)
    }

    /// Backing buffer size in device pixels.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn buffer_size(&self) -> (u32, u32) {
        let w = (self.css_width * self.dpr).round().clamp(0.0, f64::from(u32::MAX));
        let h = (self.css_height * self.dpr).round().clamp(0.0, f64::from(u32::MAX));
        (w as u32, h as u32)
    }
}

/// Line cap, join and fallback width shared by every stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub cap: String,
    pub join: String,
    pub fallback_width: f64,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self::from_config(&OverlayConfig::default())
    }
}

impl LineStyle {
    #[must_use]
    pub fn from_config(config: &OverlayConfig) -> Self {
        Self { cap: config.line_cap.clone(), join: config.line_join.clone(), fallback_width: config.stroke_width }
    }
}

/// Tracks the backing buffer size so it is reallocated only on change.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderTarget {
    size: Option<(u32, u32)>,
}

impl RenderTarget {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resize the surface if `layout` needs a different buffer. Returns `true`
    /// when a reallocation happened.
    pub fn sync<S: Surface + ?Sized>(&mut self, surface: &mut S, layout: Layout) -> bool {
        let size = layout.buffer_size();
        if self.size == Some(size) {
            return false;
        }
        log::debug!("render target resized to {}x{} (dpr {})", size.0, size.1, layout.dpr);
        surface.resize(size.0, size.1);
        self.size = Some(size);
        true
    }

    /// Last buffer size applied, if any.
    #[must_use]
    pub fn size(&self) -> Option<(u32, u32)> {
        self.size
    }

    /// Forget the applied size so the next sync reallocates.
    pub fn invalidate(&mut self) {
        self.size = None;
    }
}

/// Repaint the completed strokes plus the in-progress stroke.
///
/// # Errors
///
/// Returns `Err` if the surface rejects the transform.
pub fn draw<S: Surface + ?Sized>(
    surface: &mut S,
    target: &mut RenderTarget,
    layout: Layout,
    style: &LineStyle,
    strokes: &StrokeSet,
    in_progress: Option<&Stroke>,
) -> Result<(), OverlayError> {
    target.sync(surface, layout);

    // Draw in CSS pixels from here on.
    surface.set_transform(layout.dpr, 0.0, 0.0, layout.dpr, 0.0, 0.0)?;
    surface.clear_rect(0.0, 0.0, layout.css_width, layout.css_height);

    for stroke in strokes {
        draw_stroke(surface, layout, style, stroke);
    }
    if let Some(stroke) = in_progress {
        draw_stroke(surface, layout, style, stroke);
    }
    Ok(())
}

fn draw_stroke<S: Surface + ?Sized>(surface: &mut S, layout: Layout, style: &LineStyle, stroke: &Stroke) {
    let Some((first, rest)) = stroke.points.split_first() else {
        return;
    };

    surface.set_stroke_style(&stroke.color);
    surface.set_line_width(line_width(stroke.width, style.fallback_width));
    surface.set_line_cap(&style.cap);
    surface.set_line_join(&style.join);

    let start = first.denormalize(layout.css_width, layout.css_height);
    surface.begin_path();
    surface.move_to(start.x, start.y);
    if rest.is_empty() {
        // Zero-length segment; round caps render it as a dot.
        surface.line_to(start.x, start.y);
    }
    for p in rest {
        let px = p.denormalize(layout.css_width, layout.css_height);
        surface.line_to(px.x, px.y);
    }
    surface.stroke();
}

fn line_width(width: f64, fallback: f64) -> f64 {
    if width.is_finite() && width > 0.0 {
        width
    } else if fallback.is_finite() && fallback > 0.0 {
        fallback
    } else {
        DEFAULT_STROKE_WIDTH
    }
}
