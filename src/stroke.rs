//! Stroke model: a single freehand stroke and the read-only collection of
//! completed strokes supplied by the parent page.
//!
//! Strokes travel to and from the host as JSON. The collection is replaced
//! wholesale whenever the parent refetches; the overlay never edits it.

#[cfg(test)]
#[path = "stroke_test.rs"]
mod stroke_test;

use serde::{Deserialize, Serialize};

use crate::error::StrokeError;
use crate::geom::{NormPoint, clamp_unit};

/// One continuous freehand gesture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// CSS hex color, e.g. `"#EF4444"`.
    pub color: String,
    /// Line width in CSS pixels.
    pub width: f64,
    /// Ordered normalized points. Append-only while recording.
    #[serde(default)]
    pub points: Vec<NormPoint>,
}

impl Stroke {
    /// Start a stroke at `start`.
    #[must_use]
    pub fn begin(color: impl Into<String>, width: f64, start: NormPoint) -> Self {
        Self { color: color.into(), width, points: vec![start] }
    }

    pub fn push(&mut self, point: NormPoint) {
        self.points.push(point);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Serialize for the host's persistence call.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `serde_json` rejects the value.
    pub fn to_json(&self) -> Result<String, StrokeError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Ordered, read-only collection of completed strokes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrokeSet {
    strokes: Vec<Stroke>,
}

impl StrokeSet {
    #[must_use]
    pub fn new(strokes: Vec<Stroke>) -> Self {
        Self { strokes }
    }

    /// Decode the host's stroke payload.
    ///
    /// Accepts a JSON array or `null` (no annotations yet). Entries that do not
    /// decode as strokes are dropped with a warning; point coordinates outside
    /// `[0, 1]` are clamped so stored data stays a valid page fraction.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the payload is not JSON, or is neither an array nor `null`.
    pub fn from_json(json: &str) -> Result<Self, StrokeError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let entries = match value {
            serde_json::Value::Null => return Ok(Self::default()),
            serde_json::Value::Array(entries) => entries,
            _ => return Err(StrokeError::NotAnArray),
        };

        let mut strokes = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            match serde_json::from_value::<Stroke>(entry) {
                Ok(mut stroke) => {
                    for p in &mut stroke.points {
                        p.x = clamp_unit(p.x);
                        p.y = clamp_unit(p.y);
                    }
                    strokes.push(stroke);
                }
                Err(e) => log::warn!("dropping malformed stroke {index}: {e}"),
            }
        }
        Ok(Self { strokes })
    }

    /// Iterate strokes in draw order.
    pub fn iter(&self) -> std::slice::Iter<'_, Stroke> {
        self.strokes.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }
}

impl From<Vec<Stroke>> for StrokeSet {
    fn from(strokes: Vec<Stroke>) -> Self {
        Self::new(strokes)
    }
}

impl<'a> IntoIterator for &'a StrokeSet {
    type Item = &'a Stroke;
    type IntoIter = std::slice::Iter<'a, Stroke>;

    fn into_iter(self) -> Self::IntoIter {
        self.strokes.iter()
    }
}
