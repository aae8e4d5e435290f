//! Browser bindings: canvas surface, page content resolution, resize
//! observation and pointer capture.
//!
//! Everything here is a thin adapter over `web_sys`. State and decisions live
//! in [`crate::overlay::OverlayCore`]; this module measures the DOM, forwards
//! events, and carries out the returned [`Action`]s.
//!
//! TRADE-OFFS
//! ==========
//! Every DOM call is best-effort. Failures are logged at debug level and the
//! overlay keeps whatever it last drew, so the host page never sees an error.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement, PointerEvent, ResizeObserver};

use crate::config::OverlayConfig;
use crate::consts::{FALLBACK_DPR, OVERLAY_ATTR};
use crate::error::OverlayError;
use crate::geom::{Point, Rect};
use crate::input::{Button, PointerInput};
use crate::observe::{ResizeBridge, ResizeSource};
use crate::overlay::{Action, OnComplete, Overlay, OverlayBuilder, deliver_completed};
use crate::stroke::StrokeSet;
use crate::surface::Surface;

fn js_err(e: &JsValue) -> OverlayError {
    OverlayError::Surface(format!("{e:?}"))
}

/// Install the console logger and panic hook. Safe to call more than once.
pub fn init_logging(level: log::Level) {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(level) {
        log::debug!("console logger already installed: {e}");
    }
}

// =============================================================
// Surface
// =============================================================

/// [`Surface`] over a `<canvas>` 2D context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Acquire the 2D context of `canvas`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the browser has no 2D context for this canvas.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, OverlayError> {
        let ctx = match canvas.get_context("2d") {
            Ok(Some(obj)) => obj.dyn_into::<CanvasRenderingContext2d>().map_err(|o| js_err(&o.into()))?,
            Ok(None) => return Err(OverlayError::ContextUnavailable),
            Err(e) => return Err(js_err(&e)),
        };
        Ok(Self { canvas, ctx })
    }

    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl Surface for CanvasSurface {
    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn set_transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Result<(), OverlayError> {
        self.ctx.set_transform(a, b, c, d, e, f).map_err(|e| js_err(&e))
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.clear_rect(x, y, width, height);
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.ctx.set_stroke_style_str(color);
    }

    fn set_line_width(&mut self, width: f64) {
        self.ctx.set_line_width(width);
    }

    fn set_line_cap(&mut self, cap: &str) {
        self.ctx.set_line_cap(cap);
    }

    fn set_line_join(&mut self, join: &str) {
        self.ctx.set_line_join(join);
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ctx.line_to(x, y);
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }
}

// =============================================================
// DOM measurement
// =============================================================

/// Find the rendered page inside `container`, probing `selectors` in order
/// and falling back to the container itself.
#[must_use]
pub fn resolve_content_element(container: &Element, selectors: &[String]) -> Element {
    for selector in selectors {
        match container.query_selector(selector) {
            Ok(Some(el)) => return el,
            Ok(None) => {}
            Err(e) => log::debug!("content selector {selector:?} rejected: {e:?}"),
        }
    }
    container.clone()
}

/// Client-space bounding box of `el`.
#[must_use]
pub fn element_rect(el: &Element) -> Rect {
    let r = el.get_bounding_client_rect();
    Rect::new(r.left(), r.top(), r.width(), r.height())
}

/// Current device pixel ratio, or 1 outside a window.
#[must_use]
pub fn device_pixel_ratio() -> f64 {
    web_sys::window().map_or(FALLBACK_DPR, |w| w.device_pixel_ratio())
}

/// Convert a DOM pointer event.
#[must_use]
pub fn pointer_input(ev: &PointerEvent) -> PointerInput {
    PointerInput::new(
        ev.pointer_id(),
        Point::new(f64::from(ev.client_x()), f64::from(ev.client_y())),
        Button::from_dom(ev.button()),
    )
}

/// The page container and the content node resolved inside it, captured
/// once at mount so events never walk the DOM.
#[derive(Debug, Clone)]
pub struct PageHandle {
    pub container: Element,
    pub content: Element,
}

impl PageHandle {
    #[must_use]
    pub fn resolve(container: Element, config: &OverlayConfig) -> Self {
        let content = resolve_content_element(&container, &config.content_selectors);
        Self { container, content }
    }

    #[must_use]
    pub fn rect(&self) -> Rect {
        element_rect(&self.content)
    }
}

// =============================================================
// Resize observation
// =============================================================

type ObserverCallback = Closure<dyn FnMut(js_sys::Array, ResizeObserver)>;

/// [`ResizeSource`] backed by a `ResizeObserver` on one element.
pub struct ElementResizeSource {
    element: Element,
    observer: Option<ResizeObserver>,
    callback: Option<ObserverCallback>,
}

impl ElementResizeSource {
    #[must_use]
    pub fn new(element: Element) -> Self {
        Self { element, observer: None, callback: None }
    }
}

impl ResizeSource for ElementResizeSource {
    fn subscribe(&mut self, mut on_resize: Box<dyn FnMut()>) -> Result<(), OverlayError> {
        self.unsubscribe();
        let callback: ObserverCallback =
            Closure::wrap(Box::new(move |_entries: js_sys::Array, _observer: ResizeObserver| on_resize())
                as Box<dyn FnMut(js_sys::Array, ResizeObserver)>);
        let observer = ResizeObserver::new(callback.as_ref().unchecked_ref()).map_err(|e| js_err(&e))?;
        observer.observe(&self.element);
        self.observer = Some(observer);
        self.callback = Some(callback);
        Ok(())
    }

    fn unsubscribe(&mut self) {
        if let Some(observer) = self.observer.take() {
            observer.disconnect();
        }
        self.callback.take();
    }
}

impl Drop for ElementResizeSource {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

// =============================================================
// Mounted overlay
// =============================================================

type SharedOverlay = Rc<RefCell<Overlay<CanvasSurface>>>;

/// Overlay mounted on a `<canvas>` above a page container.
///
/// Owns the resize subscription; dropping it disconnects the observer.
/// The completion callback runs after the overlay borrow is released, so it
/// may call `set_strokes` on this overlay.
pub struct BrowserOverlay {
    overlay: SharedOverlay,
    on_complete: RefCell<Option<OnComplete>>,
    canvas: HtmlCanvasElement,
    page: Option<PageHandle>,
    bridge: ResizeBridge<ElementResizeSource>,
}

impl BrowserOverlay {
    /// Mount on `canvas`, observing the page inside `container`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the canvas has no 2D context.
    pub fn mount(canvas: HtmlCanvasElement, container: Element, builder: OverlayBuilder) -> Result<Self, OverlayError> {
        canvas.set_attribute(OVERLAY_ATTR, "").map_err(|e| js_err(&e))?;
        let surface = CanvasSurface::new(canvas.clone())?;
        let mut overlay = builder.dpr(device_pixel_ratio()).build(surface);
        let on_complete = RefCell::new(overlay.core.take_on_complete());
        let bridge = ResizeBridge::new(overlay.core.invalidation());
        let mut mounted = Self { overlay: Rc::new(RefCell::new(overlay)), on_complete, canvas, page: None, bridge };
        mounted.apply_pointer_events();
        mounted.set_page(container);
        Ok(mounted)
    }

    /// Point the overlay at a new page container. Detaches the old observer,
    /// resolves the content node once, repaints, then observes it.
    pub fn set_page(&mut self, container: Element) {
        self.bridge.detach();
        let page = {
            let overlay = self.overlay.borrow();
            PageHandle::resolve(container, overlay.core.config())
        };

        let weak: Weak<RefCell<Overlay<CanvasSurface>>> = Rc::downgrade(&self.overlay);
        let content = page.content.clone();
        let canvas = self.canvas.clone();
        let source = ElementResizeSource::new(page.content.clone());
        if let Err(e) = self.bridge.attach(source, move || {
            if let Some(overlay) = weak.upgrade() {
                repaint(&overlay, &content, &canvas);
            }
        }) {
            log::debug!("resize observer unavailable: {e}");
        }

        repaint(&self.overlay, &page.content, &self.canvas);
        self.page = Some(page);
    }

    #[must_use]
    pub fn page(&self) -> Option<&PageHandle> {
        self.page.as_ref()
    }

    // --- Props ---

    pub fn set_strokes(&self, strokes: Option<StrokeSet>) {
        self.with_overlay(|o| o.set_strokes(strokes));
        self.repaint();
    }

    /// Replace strokes from the host's JSON payload; undecodable payloads clear the overlay.
    pub fn set_strokes_json(&self, json: &str) {
        let strokes = match StrokeSet::from_json(json) {
            Ok(set) => set,
            Err(e) => {
                log::warn!("ignoring stroke payload: {e}");
                StrokeSet::default()
            }
        };
        self.set_strokes(Some(strokes));
    }

    pub fn set_zoom(&self, zoom: f64) {
        self.with_overlay(|o| o.set_zoom(zoom));
        self.repaint();
    }

    pub fn set_annotating(&self, annotating: bool) {
        let actions = self.with_overlay(|o| o.set_annotating(annotating)).unwrap_or_default();
        self.apply(actions);
        self.apply_pointer_events();
    }

    // --- Pointer events ---

    /// Returns whether the event was consumed; the default action is then prevented.
    pub fn on_pointer_down(&self, ev: &PointerEvent) -> bool {
        self.handle(ev, |o, input| o.on_pointer_down(input))
    }

    pub fn on_pointer_move(&self, ev: &PointerEvent) -> bool {
        self.handle(ev, |o, input| o.on_pointer_move(input))
    }

    pub fn on_pointer_up(&self, ev: &PointerEvent) -> bool {
        self.handle(ev, |o, input| o.on_pointer_up(input))
    }

    pub fn on_pointer_cancel(&self, ev: &PointerEvent) -> bool {
        self.handle(ev, |o, input| o.on_pointer_cancel(input))
    }

    /// Measure and repaint now.
    pub fn repaint(&self) {
        if let Some(page) = &self.page {
            repaint(&self.overlay, &page.content, &self.canvas);
        }
    }

    fn handle(
        &self,
        ev: &PointerEvent,
        f: impl FnOnce(&mut Overlay<CanvasSurface>, &PointerInput) -> Vec<Action>,
    ) -> bool {
        let input = pointer_input(ev);
        let rect = self.page.as_ref().map(PageHandle::rect);
        let actions = self
            .with_overlay(|o| {
                // Re-measure: scrolling moves the page without resizing it.
                o.set_page_rect(rect);
                f(o, &input)
            })
            .unwrap_or_default();
        if actions.is_empty() {
            return false;
        }
        ev.prevent_default();
        self.apply(actions);
        true
    }

    /// Carry out `actions`. Called with the overlay borrow already released.
    fn apply(&self, actions: Vec<Action>) {
        let actions = self.deliver(actions);
        for action in actions {
            match action {
                Action::CapturePointer(id) => {
                    if let Err(e) = self.canvas.set_pointer_capture(id) {
                        log::debug!("pointer capture failed for {id}: {e:?}");
                    }
                }
                Action::ReleasePointer(id) => {
                    if self.canvas.has_pointer_capture(id) {
                        if let Err(e) = self.canvas.release_pointer_capture(id) {
                            log::debug!("pointer release failed for {id}: {e:?}");
                        }
                    }
                }
                Action::StrokeCompleted(stroke) => {
                    log::warn!("stroke with {} points completed but was not delivered", stroke.len());
                }
                Action::RenderNeeded => self.repaint(),
            }
        }
    }

    fn deliver(&self, actions: Vec<Action>) -> Vec<Action> {
        match self.on_complete.try_borrow_mut() {
            Ok(mut slot) => match slot.as_mut() {
                Some(cb) => deliver_completed(actions, &mut **cb),
                None => actions,
            },
            Err(e) => {
                log::debug!("completion callback busy: {e}");
                actions
            }
        }
    }

    /// Let events through to the page unless annotating.
    fn apply_pointer_events(&self) {
        let annotating = self.with_overlay(|o| o.core.is_annotating()).unwrap_or_default();
        let value = if annotating { "auto" } else { "none" };
        if let Err(e) = self.canvas.style().set_property("pointer-events", value) {
            log::debug!("failed to set pointer-events: {e:?}");
        }
    }

    fn with_overlay<T>(&self, f: impl FnOnce(&mut Overlay<CanvasSurface>) -> T) -> Option<T> {
        match self.overlay.try_borrow_mut() {
            Ok(mut overlay) => Some(f(&mut overlay)),
            Err(e) => {
                log::debug!("overlay busy: {e}");
                None
            }
        }
    }
}

/// Pull every render input from the DOM and repaint if anything changed.
fn repaint(overlay: &RefCell<Overlay<CanvasSurface>>, content: &Element, canvas: &HtmlCanvasElement) {
    let Ok(mut overlay) = overlay.try_borrow_mut() else {
        log::debug!("skipping repaint; overlay busy");
        return;
    };
    let rect = element_rect(content);
    overlay.set_page_rect(Some(rect));
    overlay.set_dpr(device_pixel_ratio());
    if overlay.flush() {
        size_canvas_css(canvas, rect);
    }
}

fn size_canvas_css(canvas: &HtmlCanvasElement, rect: Rect) {
    let style = canvas.style();
    for (prop, px) in [("width", rect.width), ("height", rect.height)] {
        if let Err(e) = style.set_property(prop, &format!("{px}px")) {
            log::debug!("failed to set canvas {prop}: {e:?}");
        }
    }
}
