//! Resize observation as an explicit subscription.
//!
//! A [`ResizeSource`] calls back with no payload whenever the page content
//! changes size. The callback only marks the shared [`Invalidation`] flag and
//! pokes the host; the repaint then re-derives every render input from
//! current state. Nothing polls.

#[cfg(test)]
#[path = "observe_test.rs"]
mod observe_test;

use std::cell::Cell;
use std::rc::Rc;

use crate::error::OverlayError;

/// Shared dirty flag: set by subscriptions and state changes, cleared by a repaint.
#[derive(Debug, Clone, Default)]
pub struct Invalidation {
    dirty: Rc<Cell<bool>>,
}

impl Invalidation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invalidate(&self) {
        self.dirty.set(true);
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Clear the flag, returning whether it was set.
    pub fn take(&self) -> bool {
        self.dirty.replace(false)
    }
}

/// Something that reports size changes of the page content.
pub trait ResizeSource {
    /// Start delivering notifications to `on_resize`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the host refuses to create the observer.
    fn subscribe(&mut self, on_resize: Box<dyn FnMut()>) -> Result<(), OverlayError>;

    /// Stop delivering notifications and release the callback.
    fn unsubscribe(&mut self);
}

/// Keeps at most one [`ResizeSource`] attached and routes its notifications
/// into an [`Invalidation`].
pub struct ResizeBridge<S: ResizeSource> {
    source: Option<S>,
    invalidation: Invalidation,
}

impl<S: ResizeSource> ResizeBridge<S> {
    #[must_use]
    pub fn new(invalidation: Invalidation) -> Self {
        Self { source: None, invalidation }
    }

    /// Observe `source`, replacing any previous one.
    ///
    /// Marks the overlay dirty right away so the caller's next flush performs
    /// the initial paint. Each later notification invalidates, then runs
    /// `on_change` (typically a repaint).
    ///
    /// # Errors
    ///
    /// Returns `Err` if `source` cannot subscribe; the bridge is left detached.
    pub fn attach(&mut self, mut source: S, mut on_change: impl FnMut() + 'static) -> Result<(), OverlayError> {
        self.detach();
        let invalidation = self.invalidation.clone();
        source.subscribe(Box::new(move || {
            invalidation.invalidate();
            on_change();
        }))?;
        self.invalidation.invalidate();
        self.source = Some(source);
        Ok(())
    }

    /// Disconnect the current source, if any.
    pub fn detach(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.unsubscribe();
        }
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.source.is_some()
    }

    #[must_use]
    pub fn source(&self) -> Option<&S> {
        self.source.as_ref()
    }
}

impl<S: ResizeSource> Drop for ResizeBridge<S> {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Resize source driven by the host calling [`ManualResizeSource::notify`].
///
/// For hosts that learn about size changes out of band (a native window
/// event loop, or tests).
#[derive(Clone, Default)]
pub struct ManualResizeSource {
    callback: Rc<std::cell::RefCell<Option<Box<dyn FnMut()>>>>,
}

impl ManualResizeSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver one notification. Returns `false` when nothing is subscribed.
    pub fn notify(&self) -> bool {
        let mut slot = self.callback.borrow_mut();
        match slot.as_mut() {
            Some(cb) => {
                cb();
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.callback.borrow().is_some()
    }
}

impl ResizeSource for ManualResizeSource {
    fn subscribe(&mut self, on_resize: Box<dyn FnMut()>) -> Result<(), OverlayError> {
        *self.callback.borrow_mut() = Some(on_resize);
        Ok(())
    }

    fn unsubscribe(&mut self) {
        self.callback.borrow_mut().take();
    }
}
