//! Host integration points.
//!
//! The engine never talks to a browser, window or GPU directly. A host
//! provides:
//! - a [`Surface`] that accepts [`DrawCommand`]s and knows its size
//! - a [`Scheduler`] for next-frame callbacks and one-shot / repeating timers
//!
//! The host calls back into the session with the handle it gave out
//! (`Session::on_frame`, `Session::on_timer`). Everything runs on one thread.

use std::time::Duration;

use crate::color::Color;
use crate::math::{Extent, Vec2};

/// Compositing mode for subsequent commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Normal alpha blending.
    #[default]
    SourceOver,
    /// Additive blending (overlapping particles get brighter).
    Lighter,
}

/// One segment of a filled path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    /// Starts a new sub-path.
    MoveTo(Vec2),
    /// Cubic Bézier curve from the current point.
    CubicTo {
        /// First control point.
        c1: Vec2,
        /// Second control point.
        c2: Vec2,
        /// End point.
        to: Vec2,
    },
    /// Closes the current sub-path.
    Close,
}

/// A draw command for the surface.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Clears the whole surface to transparent.
    Clear,
    /// Fills the whole surface with a (usually translucent) colour.
    Fill {
        /// Overlay colour, alpha included.
        color: Color,
    },
    /// Switches the blend mode.
    Blend(BlendMode),
    /// Filled circle with an optional glow.
    Circle {
        /// Centre.
        center: Vec2,
        /// Radius.
        radius: f32,
        /// Fill colour.
        color: Color,
        /// Global alpha for this shape.
        alpha: f32,
        /// Glow (shadow blur) radius, 0 for none.
        glow: f32,
    },
    /// Filled path.
    Path {
        /// Path segments.
        segments: Vec<PathSegment>,
        /// Fill colour.
        color: Color,
        /// Global alpha for this shape.
        alpha: f32,
    },
}

/// A 2D drawing surface sized to the viewport.
pub trait Surface {
    /// Current surface dimensions.
    fn extent(&self) -> Extent;

    /// Resizes the backing store.
    fn set_extent(&mut self, extent: Extent);

    /// Executes a draw command.
    fn draw(&mut self, command: DrawCommand);

    /// Marks the end of a frame.
    fn present(&mut self) {}
}

/// Handle for a requested animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(pub u64);

/// Handle for a one-shot or repeating timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(pub u64);

/// Host scheduling primitives.
///
/// All cancel operations must be idempotent: cancelling a handle that has
/// already fired or was already cancelled is a no-op.
pub trait Scheduler {
    /// Requests a single callback before the next repaint.
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancels a pending frame request.
    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Arms a one-shot timer.
    fn set_timeout(&mut self, delay: Duration) -> TimerHandle;

    /// Arms a repeating timer.
    fn set_interval(&mut self, period: Duration) -> TimerHandle;

    /// Disarms a timer of either kind.
    fn clear_timer(&mut self, handle: TimerHandle);
}
