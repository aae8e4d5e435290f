//! Drawing surface the renderer paints through.
//!
//! [`Surface`] is the subset of the Canvas 2D API the overlay needs. The
//! browser implementation wraps `CanvasRenderingContext2d` (see `web`);
//! [`RecordingSurface`] keeps a command log instead of pixels and is used for
//! headless rendering and tests.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use crate::error::OverlayError;

/// Minimal 2D drawing surface.
pub trait Surface {
    /// Reallocate the backing buffer to `width × height` device pixels.
    fn resize(&mut self, width: u32, height: u32);

    /// Replace the current transform with the matrix `[a c e; b d f]`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the underlying context rejects the call.
    fn set_transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Result<(), OverlayError>;

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn set_stroke_style(&mut self, color: &str);
    fn set_line_width(&mut self, width: f64);
    fn set_line_cap(&mut self, cap: &str);
    fn set_line_join(&mut self, join: &str);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn stroke(&mut self);
}

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Resize { width: u32, height: u32 },
    SetTransform([f64; 6]),
    ClearRect { x: f64, y: f64, width: f64, height: f64 },
    StrokeStyle(String),
    LineWidth(f64),
    LineCap(String),
    LineJoin(String),
    BeginPath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    Stroke,
}

/// Surface that records calls instead of rasterizing them.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    width: u32,
    height: u32,
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current backing buffer size in device pixels.
    #[must_use]
    pub fn buffer_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drain the command log.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of `stroke()` calls recorded.
    #[must_use]
    pub fn stroke_count(&self) -> usize {
        self.commands.iter().filter(|c| matches!(c, DrawCommand::Stroke)).count()
    }
}

impl Surface for RecordingSurface {
    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.commands.push(DrawCommand::Resize { width, height });
    }

    fn set_transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Result<(), OverlayError> {
        self.commands.push(DrawCommand::SetTransform([a, b, c, d, e, f]));
        Ok(())
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(DrawCommand::ClearRect { x, y, width, height });
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.commands.push(DrawCommand::StrokeStyle(color.to_owned()));
    }

    fn set_line_width(&mut self, width: f64) {
        self.commands.push(DrawCommand::LineWidth(width));
    }

    fn set_line_cap(&mut self, cap: &str) {
        self.commands.push(DrawCommand::LineCap(cap.to_owned()));
    }

    fn set_line_join(&mut self, join: &str) {
        self.commands.push(DrawCommand::LineJoin(join.to_owned()));
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::LineTo(x, y));
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke);
    }
}
