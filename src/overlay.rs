use crate::config::OverlayConfig;
use crate::error::OverlayError;
use crate::geom::Rect;
use crate::input::{PointerId, PointerInput, RecorderState};
use crate::observe::Invalidation;
use crate::recorder::StrokeRecorder;
use crate::render::{self, Layout, LineStyle, RenderTarget};
use crate::stroke::{Stroke, StrokeSet};
use crate::surface::Surface;

#[cfg(test)]
#[path = "overlay_test.rs"]
mod overlay_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Route all further events of this pointer to the overlay.
    CapturePointer(PointerId),
    /// Give the pointer back.
    ReleasePointer(PointerId),
    /// A finished stroke. Only surfaced when no completion callback is
    /// installed; pass it to [`deliver_completed`] once the core is released.
    StrokeCompleted(Stroke),
    /// Overlay state changed; repaint before the next frame.
    RenderNeeded,
}

/// Completion callback receiving each finished stroke by value.
pub type OnComplete = Box<dyn FnMut(Stroke)>;

/// Hand every finished stroke in `actions` to `on_complete`, returning the rest.
///
/// Hosts that share the overlay through a `RefCell` call this after the borrow
/// ends, so the callback may call back into the overlay.
pub fn deliver_completed(actions: Vec<Action>, on_complete: &mut dyn FnMut(Stroke)) -> Vec<Action> {
    let mut rest = Vec::with_capacity(actions.len());
    for action in actions {
        match action {
            Action::StrokeCompleted(stroke) => on_complete(stroke),
            other => rest.push(other),
        }
    }
    rest
}

/// Core overlay state — everything that doesn't depend on the drawing surface.
///
/// Separated from `Overlay` so it can be tested without a browser.
pub struct OverlayCore {
    config: OverlayConfig,
    style: LineStyle,
    recorder: StrokeRecorder,
    strokes: StrokeSet,
    zoom: f64,
    page_rect: Option<Rect>,
    dpr: f64,
    target: RenderTarget,
    invalidation: Invalidation,
    on_complete: Option<OnComplete>,
}

impl Default for OverlayCore {
    fn default() -> Self {
        OverlayBuilder::new().build_core()
    }
}

impl OverlayCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Props ---

    /// Replace the stroke collection. `None` means the parent has nothing loaded.
    pub fn set_strokes(&mut self, strokes: Option<StrokeSet>) {
        self.strokes = strokes.unwrap_or_default();
        self.invalidation.invalidate();
    }

    /// Record the host zoom level. Only used to trigger a repaint.
    pub fn set_zoom(&mut self, zoom: f64) {
        if (zoom - self.zoom).abs() > f64::EPSILON {
            self.zoom = zoom;
            self.invalidation.invalidate();
        }
    }

    /// Toggle annotation mode; disabling mid-gesture commits the stroke.
    pub fn set_annotating(&mut self, annotating: bool) -> Vec<Action> {
        let actions = self.recorder.set_annotating(annotating);
        self.dispatch(actions)
    }

    pub fn set_on_complete(&mut self, on_complete: Option<OnComplete>) {
        self.on_complete = on_complete;
    }

    /// Detach the completion callback. Finished strokes are then returned as
    /// [`Action::StrokeCompleted`] for the host to deliver.
    pub fn take_on_complete(&mut self) -> Option<OnComplete> {
        self.on_complete.take()
    }

    /// Latest client-space bounding box of the page content.
    ///
    /// Only a size change invalidates; the position matters for normalizing
    /// pointer input but not for painting.
    pub fn set_page_rect(&mut self, rect: Option<Rect>) {
        let old_size = self.page_rect.map(|r| r.size());
        let new_size = rect.map(|r| r.size());
        self.page_rect = rect;
        if old_size != new_size {
            self.invalidation.invalidate();
        }
    }

    pub fn set_dpr(&mut self, dpr: f64) {
        if (dpr - self.dpr).abs() > f64::EPSILON {
            self.dpr = dpr;
            self.invalidation.invalidate();
        }
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, input: &PointerInput) -> Vec<Action> {
        let actions = self.recorder.pointer_down(input, self.page_rect);
        self.dispatch(actions)
    }

    pub fn on_pointer_move(&mut self, input: &PointerInput) -> Vec<Action> {
        let actions = self.recorder.pointer_move(input, self.page_rect);
        self.dispatch(actions)
    }

    pub fn on_pointer_up(&mut self, input: &PointerInput) -> Vec<Action> {
        let actions = self.recorder.pointer_up(input);
        self.dispatch(actions)
    }

    pub fn on_pointer_cancel(&mut self, input: &PointerInput) -> Vec<Action> {
        let actions = self.recorder.pointer_cancel(input);
        self.dispatch(actions)
    }

    /// Hand finished strokes to the callback and mark repaints.
    fn dispatch(&mut self, actions: Vec<Action>) -> Vec<Action> {
        let mut out = Vec::with_capacity(actions.len());
        for action in actions {
            match action {
                Action::StrokeCompleted(stroke) => match self.on_complete.as_mut() {
                    Some(cb) => cb(stroke),
                    None => out.push(Action::StrokeCompleted(stroke)),
                },
                Action::RenderNeeded => {
                    self.invalidation.invalidate();
                    out.push(Action::RenderNeeded);
                }
                other => out.push(other),
            }
        }
        out
    }

    // --- Render ---

    /// Paint the current state onto `surface`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the surface rejects a call; prior contents are left as-is.
    pub fn render<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Result<(), OverlayError> {
        self.invalidation.take();
        let layout = self.layout();
        render::draw(surface, &mut self.target, layout, &self.style, &self.strokes, self.recorder.in_progress())
    }

    /// Repaint if anything invalidated since the last paint. Returns whether a
    /// paint happened. Surface failures are logged, never raised.
    pub fn flush<S: Surface + ?Sized>(&mut self, surface: &mut S) -> bool {
        if !self.invalidation.is_dirty() {
            return false;
        }
        if let Err(e) = self.render(surface) {
            log::debug!("overlay repaint failed: {e}");
            return false;
        }
        true
    }

    // --- Queries ---

    /// Settings fixed at build time.
    #[must_use]
    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    #[must_use]
    pub fn layout(&self) -> Layout {
        self.page_rect.map_or_else(|| Layout::new(0.0, 0.0, self.dpr), |r| Layout::from_rect(r, self.dpr))
    }

    #[must_use]
    pub fn strokes(&self) -> &StrokeSet {
        &self.strokes
    }

    #[must_use]
    pub fn in_progress(&self) -> Option<&Stroke> {
        self.recorder.in_progress()
    }

    #[must_use]
    pub fn recorder_state(&self) -> &RecorderState {
        self.recorder.state()
    }

    #[must_use]
    pub fn is_annotating(&self) -> bool {
        self.recorder.is_annotating()
    }

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    #[must_use]
    pub fn page_rect(&self) -> Option<Rect> {
        self.page_rect
    }

    #[must_use]
    pub fn render_target(&self) -> RenderTarget {
        self.target
    }

    /// Handle to the dirty flag, for resize subscriptions.
    #[must_use]
    pub fn invalidation(&self) -> Invalidation {
        self.invalidation.clone()
    }
}

/// Collects the overlay's inputs before the surface exists.
#[must_use]
pub struct OverlayBuilder {
    config: OverlayConfig,
    strokes: Option<StrokeSet>,
    zoom: f64,
    annotating: bool,
    page_rect: Option<Rect>,
    dpr: f64,
    on_complete: Option<OnComplete>,
}

impl Default for OverlayBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayBuilder {
    pub fn new() -> Self {
        Self {
            config: OverlayConfig::default(),
            strokes: None,
            zoom: 1.0,
            annotating: false,
            page_rect: None,
            dpr: 1.0,
            on_complete: None,
        }
    }

    pub fn config(mut self, config: OverlayConfig) -> Self {
        self.config = config.sanitized();
        self
    }

    pub fn strokes(mut self, strokes: Option<StrokeSet>) -> Self {
        self.strokes = strokes;
        self
    }

    pub fn zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn annotating(mut self, annotating: bool) -> Self {
        self.annotating = annotating;
        self
    }

    pub fn page_rect(mut self, rect: Rect) -> Self {
        self.page_rect = Some(rect);
        self
    }

    pub fn dpr(mut self, dpr: f64) -> Self {
        self.dpr = dpr;
        self
    }

    pub fn on_complete(mut self, on_complete: impl FnMut(Stroke) + 'static) -> Self {
        self.on_complete = Some(Box::new(on_complete));
        self
    }

    /// Build the surface-independent core. It starts dirty so the first flush paints.
    pub fn build_core(self) -> OverlayCore {
        let mut recorder = StrokeRecorder::new(&self.config);
        recorder.set_annotating(self.annotating);
        let invalidation = Invalidation::new();
        invalidation.invalidate();
        OverlayCore {
            style: LineStyle::from_config(&self.config),
            config: self.config,
            recorder,
            strokes: self.strokes.unwrap_or_default(),
            zoom: self.zoom,
            page_rect: self.page_rect,
            dpr: self.dpr,
            target: RenderTarget::new(),
            invalidation,
            on_complete: self.on_complete,
        }
    }

    /// Build an overlay painting onto `surface`.
    pub fn build<S: Surface>(self, surface: S) -> Overlay<S> {
        Overlay { surface, core: self.build_core() }
    }
}

/// The full overlay. Wraps `OverlayCore` and owns the drawing surface.
pub struct Overlay<S: Surface> {
    surface: S,
    pub core: OverlayCore,
}

impl<S: Surface> Overlay<S> {
    /// Overlay with default settings bound to `surface`.
    #[must_use]
    pub fn new(surface: S) -> Self {
        OverlayBuilder::new().build(surface)
    }

    // --- Delegated props ---

    pub fn set_strokes(&mut self, strokes: Option<StrokeSet>) {
        self.core.set_strokes(strokes);
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.core.set_zoom(zoom);
    }

    pub fn set_annotating(&mut self, annotating: bool) -> Vec<Action> {
        self.core.set_annotating(annotating)
    }

    pub fn set_page_rect(&mut self, rect: Option<Rect>) {
        self.core.set_page_rect(rect);
    }

    pub fn set_dpr(&mut self, dpr: f64) {
        self.core.set_dpr(dpr);
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, input: &PointerInput) -> Vec<Action> {
        self.core.on_pointer_down(input)
    }

    pub fn on_pointer_move(&mut self, input: &PointerInput) -> Vec<Action> {
        self.core.on_pointer_move(input)
    }

    pub fn on_pointer_up(&mut self, input: &PointerInput) -> Vec<Action> {
        self.core.on_pointer_up(input)
    }

    pub fn on_pointer_cancel(&mut self, input: &PointerInput) -> Vec<Action> {
        self.core.on_pointer_cancel(input)
    }

    // --- Render ---

    /// Draw the current state to the surface, logging any failure.
    pub fn render(&mut self) {
        if let Err(e) = self.core.render(&mut self.surface) {
            log::debug!("overlay render failed: {e}");
        }
    }

    /// Repaint only if something changed since the last paint.
    pub fn flush(&mut self) -> bool {
        self.core.flush(&mut self.surface)
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
