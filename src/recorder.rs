//! Gesture state machine that turns pointer events into one stroke.
//!
//! `Idle → Drawing` on a primary pointer-down while annotating, `Drawing →
//! Drawing` on every move of the captured pointer, and `Drawing → Finalizing →
//! Idle` on pointer-up. Pointer-cancel drops the stroke. Every handler is a
//! no-op while annotation mode is off, so the host lets events pass through.
//!
//! Turning annotation mode off mid-gesture commits what has been drawn so far
//! and releases the capture, so the pointer is never left captured.

#[cfg(test)]
#[path = "recorder_test.rs"]
mod recorder_test;

use crate::config::OverlayConfig;
use crate::geom::{Rect, normalize};
use crate::input::{Button, CaptureToken, PointerInput, RecorderState};
use crate::overlay::Action;
use crate::stroke::Stroke;

/// Records one stroke at a time from pointer input.
#[derive(Debug, Clone)]
pub struct StrokeRecorder {
    state: RecorderState,
    annotating: bool,
    color: String,
    width: f64,
}

impl Default for StrokeRecorder {
    fn default() -> Self {
        Self::new(&OverlayConfig::default())
    }
}

impl StrokeRecorder {
    /// New idle recorder using the config's stroke style. Annotation mode starts off.
    #[must_use]
    pub fn new(config: &OverlayConfig) -> Self {
        Self {
            state: RecorderState::Idle,
            annotating: false,
            color: config.stroke_color.clone(),
            width: config.stroke_width,
        }
    }

    // --- Mode ---

    #[must_use]
    pub fn is_annotating(&self) -> bool {
        self.annotating
    }

    /// Toggle annotation mode. Turning it off while drawing commits the stroke.
    pub fn set_annotating(&mut self, annotating: bool) -> Vec<Action> {
        if self.annotating == annotating {
            return Vec::new();
        }
        self.annotating = annotating;
        if annotating {
            return Vec::new();
        }
        if self.state.is_drawing() {
            log::debug!("annotation mode disabled mid-gesture; committing stroke");
        }
        self.finalize()
    }

    // --- Queries ---

    #[must_use]
    pub fn state(&self) -> &RecorderState {
        &self.state
    }

    /// The stroke being drawn, if a gesture is live.
    #[must_use]
    pub fn in_progress(&self) -> Option<&Stroke> {
        match &self.state {
            RecorderState::Drawing { stroke, .. } => Some(stroke),
            _ => None,
        }
    }

    /// The captured pointer, if a gesture is live.
    #[must_use]
    pub fn capture(&self) -> Option<CaptureToken> {
        match &self.state {
            RecorderState::Drawing { capture, .. } => Some(*capture),
            _ => None,
        }
    }

    // --- Pointer events ---

    /// Start a stroke at the pointer position.
    pub fn pointer_down(&mut self, input: &PointerInput, target: Option<Rect>) -> Vec<Action> {
        if !self.annotating || input.button != Button::Primary || !self.state.is_idle() {
            return Vec::new();
        }
        let capture = CaptureToken { pointer_id: input.pointer_id };
        let start = normalize(input.client, target);
        log::debug!("stroke started by pointer {} at ({:.4}, {:.4})", input.pointer_id, start.x, start.y);
        self.state = RecorderState::Drawing { capture, stroke: Stroke::begin(self.color.clone(), self.width, start) };
        vec![Action::CapturePointer(input.pointer_id), Action::RenderNeeded]
    }

    /// Append the pointer position to the live stroke.
    pub fn pointer_move(&mut self, input: &PointerInput, target: Option<Rect>) -> Vec<Action> {
        if !self.annotating {
            return Vec::new();
        }
        let RecorderState::Drawing { capture, stroke } = &mut self.state else {
            return Vec::new();
        };
        if !capture.owns(input) {
            return Vec::new();
        }
        stroke.push(normalize(input.client, target));
        vec![Action::RenderNeeded]
    }

    /// Finish the gesture and hand the stroke off.
    pub fn pointer_up(&mut self, input: &PointerInput) -> Vec<Action> {
        if !self.annotating || !self.capture().is_some_and(|c| c.owns(input)) {
            return Vec::new();
        }
        self.finalize()
    }

    /// Abort the gesture, discarding the stroke.
    pub fn pointer_cancel(&mut self, input: &PointerInput) -> Vec<Action> {
        let Some(capture) = self.capture() else {
            return Vec::new();
        };
        if !capture.owns(input) {
            return Vec::new();
        }
        log::debug!("stroke cancelled by pointer {}", capture.pointer_id);
        self.state = RecorderState::Idle;
        vec![Action::ReleasePointer(capture.pointer_id), Action::RenderNeeded]
    }

    fn finalize(&mut self) -> Vec<Action> {
        match std::mem::replace(&mut self.state, RecorderState::Finalizing) {
            RecorderState::Drawing { capture, stroke } => {
                let mut actions = vec![Action::ReleasePointer(capture.pointer_id)];
                if stroke.is_empty() {
                    log::debug!("discarding empty stroke");
                } else {
                    log::debug!("stroke completed with {} points", stroke.len());
                    actions.push(Action::StrokeCompleted(stroke));
                }
                actions.push(Action::RenderNeeded);
                self.state = RecorderState::Idle;
                actions
            }
            other => {
                self.state = other;
                Vec::new()
            }
        }
    }
}
