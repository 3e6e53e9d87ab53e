//! In-process, headless rendering surface.
//!
//! Records every operation instead of drawing. Used by the test-suite and
//! by CI runs without a viewer; `close_window` simulates the user closing
//! a window so the lazy staleness path can be exercised.

use std::collections::{HashMap, VecDeque};

use anyhow::{Result, bail};

use crate::Point;
use crate::config::AxisBounds;
use crate::style::{Marker, Rgba, TraceStyle};

use super::{AxesId, MarkerId, RenderSurface, TraceId, WindowId};

#[derive(Debug)]
pub struct MemoryWindow {
    pub name: String,
    pub title: String,
    pub live: bool,
    pub toolbar: bool,
    /// Number of in-place clears this window has seen.
    pub clears: u32,
}

#[derive(Debug)]
pub struct MemoryAxes {
    pub window: WindowId,
    pub bounds: AxisBounds,
    pub camera: Point,
    pub grid: bool,
}

#[derive(Debug)]
pub struct MemoryTrace {
    pub window: WindowId,
    pub capacity: usize,
    pub style: TraceStyle,
    pub points: VecDeque<Point>,
}

#[derive(Debug)]
pub struct MemoryMarker {
    pub window: WindowId,
    pub shape: Marker,
    pub color: Rgba,
    pub position: Option<Point>,
}

#[derive(Default)]
pub struct MemorySurface {
    next_id: u64,
    windows: HashMap<WindowId, MemoryWindow>,
    axes: HashMap<AxesId, MemoryAxes>,
    traces: HashMap<TraceId, MemoryTrace>,
    markers: HashMap<MarkerId, MemoryMarker>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn live_window(&self, window: WindowId) -> Result<&MemoryWindow> {
        match self.windows.get(&window) {
            Some(w) if w.live => Ok(w),
            Some(_) => bail!("window {window:?} is no longer live"),
            None => bail!("unknown window handle {window:?}"),
        }
    }

    /// Simulates the user closing the window. The handle stays known to
    /// the surface (so the record remains inspectable) but is not live.
    pub fn close_window(&mut self, window: WindowId) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.live = false;
        }
    }

    pub fn window(&self, window: WindowId) -> Option<&MemoryWindow> {
        self.windows.get(&window)
    }

    pub fn axes(&self, axes: AxesId) -> Option<&MemoryAxes> {
        self.axes.get(&axes)
    }

    pub fn trace(&self, trace: TraceId) -> Option<&MemoryTrace> {
        self.traces.get(&trace)
    }

    pub fn marker(&self, marker: MarkerId) -> Option<&MemoryMarker> {
        self.markers.get(&marker)
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    pub fn live_window_count(&self) -> usize {
        self.windows.values().filter(|w| w.live).count()
    }

    /// Traces currently attached to a window, in creation order.
    pub fn traces_in(&self, window: WindowId) -> Vec<&MemoryTrace> {
        let mut entries: Vec<(&TraceId, &MemoryTrace)> = self
            .traces
            .iter()
            .filter(|(_, t)| t.window == window)
            .collect();
        entries.sort_by_key(|(id, _)| id.0);
        entries.into_iter().map(|(_, t)| t).collect()
    }

    /// Markers currently attached to a window, in creation order.
    pub fn markers_in(&self, window: WindowId) -> Vec<&MemoryMarker> {
        let mut entries: Vec<(&MarkerId, &MemoryMarker)> = self
            .markers
            .iter()
            .filter(|(_, m)| m.window == window)
            .collect();
        entries.sort_by_key(|(id, _)| id.0);
        entries.into_iter().map(|(_, m)| m).collect()
    }

    fn drop_window_contents(&mut self, window: WindowId) {
        self.axes.retain(|_, a| a.window != window);
        self.traces.retain(|_, t| t.window != window);
        self.markers.retain(|_, m| m.window != window);
    }
}

impl RenderSurface for MemorySurface {
    fn create_window(&mut self, name: &str) -> Result<WindowId> {
        let id = WindowId(self.next_id());
        self.windows.insert(
            id,
            MemoryWindow {
                name: name.to_string(),
                title: name.to_string(),
                live: true,
                toolbar: false,
                clears: 0,
            },
        );
        Ok(id)
    }

    fn clear(&mut self, window: WindowId) -> Result<()> {
        self.live_window(window)?;
        self.drop_window_contents(window);
        if let Some(w) = self.windows.get_mut(&window) {
            w.clears += 1;
        }
        Ok(())
    }

    fn destroy(&mut self, window: WindowId) -> Result<()> {
        if self.windows.remove(&window).is_none() {
            bail!("unknown window handle {window:?}");
        }
        self.drop_window_contents(window);
        Ok(())
    }

    fn is_live(&self, window: WindowId) -> bool {
        self.windows.get(&window).map(|w| w.live).unwrap_or(false)
    }

    fn create_axes(
        &mut self,
        window: WindowId,
        bounds: &AxisBounds,
        camera: Point,
        grid: bool,
    ) -> Result<AxesId> {
        self.live_window(window)?;
        let id = AxesId(self.next_id());
        self.axes.insert(
            id,
            MemoryAxes {
                window,
                bounds: *bounds,
                camera,
                grid,
            },
        );
        Ok(id)
    }

    fn create_trace(
        &mut self,
        axes: AxesId,
        capacity: usize,
        style: &TraceStyle,
    ) -> Result<TraceId> {
        let Some(axes_rec) = self.axes.get(&axes) else {
            bail!("unknown axes handle {axes:?}");
        };
        let window = axes_rec.window;
        self.live_window(window)?;
        let id = TraceId(self.next_id());
        self.traces.insert(
            id,
            MemoryTrace {
                window,
                capacity,
                style: *style,
                points: VecDeque::with_capacity(capacity),
            },
        );
        Ok(id)
    }

    fn append_point(&mut self, trace: TraceId, point: Point) -> Result<()> {
        let Some(rec) = self.traces.get(&trace) else {
            bail!("unknown trace handle {trace:?}");
        };
        let window = rec.window;
        self.live_window(window)?;
        let rec = self.traces.get_mut(&trace).unwrap();
        if rec.points.len() == rec.capacity {
            rec.points.pop_front();
        }
        rec.points.push_back(point);
        Ok(())
    }

    fn create_marker(&mut self, axes: AxesId, shape: Marker, color: Rgba) -> Result<MarkerId> {
        let Some(axes_rec) = self.axes.get(&axes) else {
            bail!("unknown axes handle {axes:?}");
        };
        let window = axes_rec.window;
        self.live_window(window)?;
        let id = MarkerId(self.next_id());
        self.markers.insert(
            id,
            MemoryMarker {
                window,
                shape,
                color,
                position: None,
            },
        );
        Ok(id)
    }

    fn set_marker_position(&mut self, marker: MarkerId, point: Point) -> Result<()> {
        let Some(rec) = self.markers.get(&marker) else {
            bail!("unknown marker handle {marker:?}");
        };
        let window = rec.window;
        self.live_window(window)?;
        self.markers.get_mut(&marker).unwrap().position = Some(point);
        Ok(())
    }

    fn set_window_title(&mut self, window: WindowId, text: &str) -> Result<()> {
        self.live_window(window)?;
        self.windows.get_mut(&window).unwrap().title = text.to_string();
        Ok(())
    }

    fn set_toolbar_visible(&mut self, window: WindowId, visible: bool) -> Result<()> {
        self.live_window(window)?;
        self.windows.get_mut(&window).unwrap().toolbar = visible;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{LineStyle, line_color};

    fn style() -> TraceStyle {
        TraceStyle {
            line: LineStyle::Solid,
            marker: None,
            color: line_color(0),
        }
    }

    fn bounds() -> AxisBounds {
        AxisBounds::new(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0)
    }

    #[test]
    fn test_window_lifecycle() {
        let mut surface = MemorySurface::new();
        let w = surface.create_window("scope").unwrap();
        assert!(surface.is_live(w));

        surface.destroy(w).unwrap();
        assert!(!surface.is_live(w));
        assert_eq!(surface.window_count(), 0);
    }

    #[test]
    fn test_close_keeps_record_but_not_live() {
        let mut surface = MemorySurface::new();
        let w = surface.create_window("scope").unwrap();
        surface.close_window(w);
        assert!(!surface.is_live(w));
        assert!(surface.window(w).is_some());
    }

    #[test]
    fn test_trace_capacity_is_honored() {
        let mut surface = MemorySurface::new();
        let w = surface.create_window("scope").unwrap();
        let axes = surface
            .create_axes(w, &bounds(), Point::new(1.0, 1.0, 1.0), false)
            .unwrap();
        let trace = surface.create_trace(axes, 2, &style()).unwrap();

        for i in 0..4 {
            surface.append_point(trace, Point::new(i as f64, 0.0, 0.0)).unwrap();
        }
        let rec = surface.trace(trace).unwrap();
        assert_eq!(rec.points.len(), 2);
        assert!(rec.points[0].is_close(&Point::new(2.0, 0.0, 0.0)));
        assert!(rec.points[1].is_close(&Point::new(3.0, 0.0, 0.0)));
    }

    #[test]
    fn test_clear_drops_contents_in_place() {
        let mut surface = MemorySurface::new();
        let w = surface.create_window("scope").unwrap();
        let axes = surface
            .create_axes(w, &bounds(), Point::new(1.0, 1.0, 1.0), true)
            .unwrap();
        let trace = surface.create_trace(axes, 4, &style()).unwrap();
        surface.append_point(trace, Point::new(0.0, 0.0, 0.0)).unwrap();

        surface.clear(w).unwrap();
        assert!(surface.is_live(w));
        assert!(surface.trace(trace).is_none());
        assert_eq!(surface.window(w).unwrap().clears, 1);
    }

    #[test]
    fn test_operations_on_dead_window_fail() {
        let mut surface = MemorySurface::new();
        let w = surface.create_window("scope").unwrap();
        let axes = surface
            .create_axes(w, &bounds(), Point::new(1.0, 1.0, 1.0), false)
            .unwrap();
        let trace = surface.create_trace(axes, 4, &style()).unwrap();

        surface.close_window(w);
        assert!(surface.append_point(trace, Point::new(0.0, 0.0, 0.0)).is_err());
        assert!(surface.set_window_title(w, "x").is_err());
    }

    #[test]
    fn test_marker_overwrites_position() {
        let mut surface = MemorySurface::new();
        let w = surface.create_window("scope").unwrap();
        let axes = surface
            .create_axes(w, &bounds(), Point::new(1.0, 1.0, 1.0), false)
            .unwrap();
        let marker = surface
            .create_marker(axes, Marker::Circle, line_color(0))
            .unwrap();

        surface.set_marker_position(marker, Point::new(1.0, 2.0, 3.0)).unwrap();
        surface.set_marker_position(marker, Point::new(4.0, 5.0, 6.0)).unwrap();
        let rec = surface.marker(marker).unwrap();
        assert!(rec.position.unwrap().is_close(&Point::new(4.0, 5.0, 6.0)));
    }
}
