//! Rendering capability surface.
//!
//! The engine never draws pixels itself. It talks to an external
//! windowing/rendering toolkit through [`RenderSurface`]: create a window
//! and 3D axes, create polyline-with-bounded-history primitives and point
//! markers, push updates, and probe window liveness. Actual redraw
//! scheduling is the surface's own business; every call here returns
//! immediately.

use anyhow::Result;

use crate::Point;
use crate::config::AxisBounds;
use crate::style::{Marker, Rgba, TraceStyle};

pub mod memory;
pub mod rerun;

/// Handle to a window created on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub(crate) u64);

/// Handle to a set of 3D axes inside a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AxesId(pub(crate) u64);

/// Handle to a bounded-history polyline primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(pub(crate) u64);

/// Handle to a single-point marker primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerId(pub(crate) u64);

/// Minimal windowing/rendering toolkit interface consumed by the engine.
///
/// Handles returned by a surface are only meaningful to that surface.
/// A destroyed or externally closed window makes its handle stale;
/// staleness is observable only through [`RenderSurface::is_live`], never
/// through a notification callback.
pub trait RenderSurface {
    fn create_window(&mut self, name: &str) -> Result<WindowId>;

    /// Clears a window's contents in place, preserving position and size.
    fn clear(&mut self, window: WindowId) -> Result<()>;

    /// Destroys a window and everything in it.
    fn destroy(&mut self, window: WindowId) -> Result<()>;

    /// Liveness probe. False for destroyed windows, windows closed by the
    /// user, and handles this surface never issued.
    fn is_live(&self, window: WindowId) -> bool;

    fn create_axes(
        &mut self,
        window: WindowId,
        bounds: &AxisBounds,
        camera: Point,
        grid: bool,
    ) -> Result<AxesId>;

    /// Creates a polyline that retains at most `capacity` points.
    fn create_trace(&mut self, axes: AxesId, capacity: usize, style: &TraceStyle)
    -> Result<TraceId>;

    /// Appends one point to a bounded polyline, evicting the oldest point
    /// beyond its capacity.
    fn append_point(&mut self, trace: TraceId, point: Point) -> Result<()>;

    fn create_marker(&mut self, axes: AxesId, shape: Marker, color: Rgba) -> Result<MarkerId>;

    /// Moves a marker; overwrite, not append.
    fn set_marker_position(&mut self, marker: MarkerId, point: Point) -> Result<()>;

    fn set_window_title(&mut self, window: WindowId, text: &str) -> Result<()>;

    fn set_toolbar_visible(&mut self, window: WindowId, visible: bool) -> Result<()>;
}
