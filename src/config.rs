//! Overlay configuration.
//!
//! Hosts may pass a JSON object with any subset of fields; anything missing
//! takes its default. Values that would produce an invisible or invalid
//! stroke are replaced by the defaults in [`OverlayConfig::sanitized`].

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;

use crate::consts::{
    DEFAULT_CONTENT_SELECTORS, DEFAULT_LINE_CAP, DEFAULT_LINE_JOIN, DEFAULT_STROKE_COLOR, DEFAULT_STROKE_WIDTH,
};
use crate::error::ConfigError;

/// Stroke style and DOM probing settings for one overlay.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Color for newly recorded strokes.
    pub stroke_color: String,
    /// Width for newly recorded strokes, in CSS pixels.
    pub stroke_width: f64,
    /// Canvas `lineCap` applied to every stroke.
    pub line_cap: String,
    /// Canvas `lineJoin` applied to every stroke.
    pub line_join: String,
    /// Selectors probed in order to find the page content inside its container.
    pub content_selectors: Vec<String>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            stroke_color: DEFAULT_STROKE_COLOR.to_owned(),
            stroke_width: DEFAULT_STROKE_WIDTH,
            line_cap: DEFAULT_LINE_CAP.to_owned(),
            line_join: DEFAULT_LINE_JOIN.to_owned(),
            content_selectors: DEFAULT_CONTENT_SELECTORS.iter().map(|s| (*s).to_owned()).collect(),
        }
    }
}

impl OverlayConfig {
    /// Parse host overrides and sanitize them.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `json` is not a valid config object.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Replace unusable values with defaults.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.stroke_width.is_finite() && self.stroke_width > 0.0) {
            log::warn!("invalid stroke width {}; using default", self.stroke_width);
            self.stroke_width = defaults.stroke_width;
        }
        if self.stroke_color.trim().is_empty() {
            self.stroke_color = defaults.stroke_color;
        }
        if !matches!(self.line_cap.as_str(), "butt" | "round" | "square") {
            self.line_cap = defaults.line_cap;
        }
        if !matches!(self.line_join.as_str(), "bevel" | "round" | "miter") {
            self.line_join = defaults.line_join;
        }
        self.content_selectors.retain(|s| !s.trim().is_empty());
        if self.content_selectors.is_empty() {
            self.content_selectors = defaults.content_selectors;
        }
        self
    }
}
