//! Freehand annotation overlay for rendered document pages.
//!
//! The overlay sits on top of a page image and lets the user draw strokes
//! over it. Strokes are stored in normalized page coordinates (`0..=1` on each
//! axis), so they stay put through zoom, window resizes and late image loads.
//! The parent page owns the stroke collection and persists completed strokes;
//! this crate only records gestures and repaints.
//!
//! The core ([`overlay::OverlayCore`]) has no browser dependency and is unit
//! tested natively. The `browser` feature adds the `web_sys` bindings: canvas
//! surface, content-node resolution, pointer capture and resize observation.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`overlay`] | Top-level overlay, its builder, and the testable [`overlay::OverlayCore`] |
//! | [`geom`] | Points, bounding boxes and coordinate normalization |
//! | [`stroke`] | Stroke data model and the read-only stroke collection |
//! | [`input`] | Pointer event types, capture token and recorder states |
//! | [`recorder`] | Gesture state machine that builds the in-progress stroke |
//! | [`render`] | Render target sizing and the stroke replay pipeline |
//! | [`surface`] | Drawing-surface trait the renderer paints through |
//! | [`observe`] | Invalidation flag and the resize observer bridge |
//! | [`config`] | Overlay configuration (default stroke style, content selectors) |
//! | [`error`] | Error types for the fallible edges |
//! | [`consts`] | Shared defaults |

pub mod config;
pub mod consts;
pub mod error;
pub mod geom;
pub mod input;
pub mod observe;
pub mod overlay;
pub mod recorder;
pub mod render;
pub mod stroke;
pub mod surface;

#[cfg(feature = "browser")]
pub mod web;

#[cfg(feature = "browser")]
pub use web::init_logging;
