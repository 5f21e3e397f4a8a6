//! # Engine Error Types
//!
//! All errors that can occur in the particle engine.

use thiserror::Error;

/// Errors that can occur in the particle engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// No drawing surface is attached to the session.
    #[error("drawing surface unavailable")]
    SurfaceUnavailable,

    /// A colour string could not be parsed.
    #[error("invalid colour: {0}")]
    InvalidColor(String),

    /// Surface dimensions are negative or not finite.
    #[error("invalid extent: {width}x{height}")]
    InvalidExtent {
        /// Requested width.
        width: f32,
        /// Requested height.
        height: f32,
    },
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
