//! Input model: pointer events, the capture token, and recorder states.
//!
//! The browser routes every event of a captured pointer back to the element
//! that captured it. Hosts without that primitive get the same behavior from
//! [`CaptureToken`]: once a gesture starts, only events carrying the captured
//! pointer id reach the recorder, wherever the pointer is.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::geom::Point;
use crate::stroke::Stroke;

/// Pointer identifier as reported by `PointerEvent.pointerId`.
pub type PointerId = i32;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Button {
    /// Left mouse button, pen contact, or single-finger touch.
    #[default]
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

impl Button {
    /// Map a DOM `PointerEvent.button` value.
    #[must_use]
    pub fn from_dom(button: i16) -> Self {
        match button {
            1 => Self::Middle,
            2 => Self::Secondary,
            _ => Self::Primary,
        }
    }
}

/// A pointer event in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub pointer_id: PointerId,
    /// Viewport position in CSS pixels (`clientX`, `clientY`).
    pub client: Point,
    pub button: Button,
}

impl PointerInput {
    #[must_use]
    pub fn new(pointer_id: PointerId, client: Point, button: Button) -> Self {
        Self { pointer_id, client, button }
    }

    /// Primary-button event for `pointer_id` at `(x, y)`.
    #[must_use]
    pub fn primary(pointer_id: PointerId, x: f64, y: f64) -> Self {
        Self::new(pointer_id, Point::new(x, y), Button::Primary)
    }
}

/// Ownership of the pointer for the duration of one gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureToken {
    pub pointer_id: PointerId,
}

impl CaptureToken {
    /// Whether `input` belongs to the captured gesture.
    #[must_use]
    pub fn owns(&self, input: &PointerInput) -> bool {
        self.pointer_id == input.pointer_id
    }
}

/// Recorder state between pointer-down and pointer-up.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RecorderState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A stroke is being drawn by the captured pointer.
    Drawing {
        capture: CaptureToken,
        stroke: Stroke,
    },
    /// The stroke has been taken for hand-off; returns to `Idle` once delivered.
    ///
    /// Transient: entered and left within a single recorder call, so callers
    /// only ever observe `Idle` or `Drawing`.
    Finalizing,
}

impl RecorderState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    #[must_use]
    pub fn is_drawing(&self) -> bool {
        matches!(self, Self::Drawing { .. })
    }
}
