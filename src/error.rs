//! Error types for the fallible edges of the overlay.
//!
//! Core operations never fail. These errors only arise when decoding host
//! input or talking to the drawing surface, and they stop at the overlay
//! boundary: they are logged, never surfaced to the user.

/// Failure decoding a stroke collection supplied by the host.
#[derive(Debug, thiserror::Error)]
pub enum StrokeError {
    #[error("failed to decode stroke collection: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("stroke collection must be a JSON array or null")]
    NotAnArray,
}

/// Failure parsing host-supplied overlay configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid overlay config: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// Failure while painting.
#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    #[error("2d context unavailable")]
    ContextUnavailable,
    #[error("surface call failed: {0}")]
    Surface(String),
}
