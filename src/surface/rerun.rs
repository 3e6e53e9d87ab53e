//! Rerun-backed rendering surface.
//!
//! Each window maps to its own Rerun recording stream (one viewer window
//! per scope). Traces are re-logged as [`rr::LineStrips3D`] on a `"step"`
//! time sequence so the viewer scrubs through the trailing history; head
//! markers are [`rr::Points3D`] overwritten in place.

use std::collections::{HashMap, VecDeque};

use anyhow::{Result, bail};
use rerun as rr;

use crate::Point;
use crate::config::AxisBounds;
use crate::style::{Marker, Rgba, TraceStyle};

use super::{AxesId, MarkerId, RenderSurface, TraceId, WindowId};

const ENTITY_ROOT: &str = "scene";
const STEP_TIMELINE: &str = "step";
const TRACE_RADIUS: f32 = 0.02;
const POINT_RADIUS: f32 = 0.05;
const HEAD_RADIUS: f32 = 0.08;
const GRID_DIVISIONS: usize = 5;

impl From<Point> for rr::Vec3D {
    fn from(val: Point) -> Self {
        rr::Vec3D([val.x as f32, val.y as f32, val.z as f32])
    }
}

fn color(rgba: Rgba) -> rr::Color {
    let (r, g, b, a) = rgba;
    rr::Color(rr::Rgba32::from_linear_unmultiplied_rgba_f32(r, g, b, a))
}

struct RerunWindow {
    stream: rr::RecordingStream,
    traces_created: u64,
    markers_created: u64,
    toolbar: bool,
}

struct RerunTrace {
    window: WindowId,
    path: String,
    capacity: usize,
    style: TraceStyle,
    points: VecDeque<Point>,
    step: i64,
}

struct RerunMarker {
    window: WindowId,
    path: String,
    color: Rgba,
    radius: f32,
    step: i64,
}

#[derive(Default)]
pub struct RerunSurface {
    next_id: u64,
    windows: HashMap<WindowId, RerunWindow>,
    axes: HashMap<AxesId, WindowId>,
    traces: HashMap<TraceId, RerunTrace>,
    markers: HashMap<MarkerId, RerunMarker>,
}

impl RerunSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn window(&self, window: WindowId) -> Result<&RerunWindow> {
        match self.windows.get(&window) {
            Some(w) => Ok(w),
            None => bail!("unknown window handle {window:?}"),
        }
    }

    fn drop_window_contents(&mut self, window: WindowId) {
        self.axes.retain(|_, w| *w != window);
        self.traces.retain(|_, t| t.window != window);
        self.markers.retain(|_, m| m.window != window);
    }
}

/// Bounds box wireframe: bottom loop, top loop, four verticals.
fn bounds_strips(b: &AxisBounds) -> Vec<Vec<rr::Vec3D>> {
    let corner = |x: f64, y: f64, z: f64| rr::Vec3D([x as f32, y as f32, z as f32]);
    let bottom = vec![
        corner(b.xmin, b.ymin, b.zmin),
        corner(b.xmax, b.ymin, b.zmin),
        corner(b.xmax, b.ymax, b.zmin),
        corner(b.xmin, b.ymax, b.zmin),
        corner(b.xmin, b.ymin, b.zmin),
    ];
    let top = vec![
        corner(b.xmin, b.ymin, b.zmax),
        corner(b.xmax, b.ymin, b.zmax),
        corner(b.xmax, b.ymax, b.zmax),
        corner(b.xmin, b.ymax, b.zmax),
        corner(b.xmin, b.ymin, b.zmax),
    ];
    let mut strips = vec![bottom, top];
    for (x, y) in [
        (b.xmin, b.ymin),
        (b.xmax, b.ymin),
        (b.xmax, b.ymax),
        (b.xmin, b.ymax),
    ] {
        strips.push(vec![corner(x, y, b.zmin), corner(x, y, b.zmax)]);
    }
    strips
}

/// Grid lines on the floor plane (z = zmin).
fn grid_strips(b: &AxisBounds) -> Vec<Vec<rr::Vec3D>> {
    let corner = |x: f64, y: f64| rr::Vec3D([x as f32, y as f32, b.zmin as f32]);
    let mut strips = Vec::new();
    for i in 1..GRID_DIVISIONS {
        let f = i as f64 / GRID_DIVISIONS as f64;
        let x = b.xmin + (b.xmax - b.xmin) * f;
        let y = b.ymin + (b.ymax - b.ymin) * f;
        strips.push(vec![corner(x, b.ymin), corner(x, b.ymax)]);
        strips.push(vec![corner(b.xmin, y), corner(b.xmax, y)]);
    }
    strips
}

/// Rerun points carry no glyph attribute; marker shapes map to radii.
fn head_radius(shape: Marker) -> f32 {
    match shape {
        Marker::Circle => HEAD_RADIUS,
        Marker::Cross => HEAD_RADIUS * 0.9,
        Marker::Plus => HEAD_RADIUS * 0.8,
        Marker::Asterisk => HEAD_RADIUS * 1.1,
        Marker::Square => HEAD_RADIUS * 1.2,
        Marker::Diamond => HEAD_RADIUS * 1.05,
    }
}

impl RenderSurface for RerunSurface {
    fn create_window(&mut self, name: &str) -> Result<WindowId> {
        let stream = rr::RecordingStreamBuilder::new(name).spawn()?;
        let id = WindowId(self.next_id());
        self.windows.insert(
            id,
            RerunWindow {
                stream,
                traces_created: 0,
                markers_created: 0,
                toolbar: false,
            },
        );
        Ok(id)
    }

    fn clear(&mut self, window: WindowId) -> Result<()> {
        let w = self.window(window)?;
        w.stream.log(ENTITY_ROOT, &rr::Clear::recursive())?;
        self.drop_window_contents(window);
        if let Some(w) = self.windows.get_mut(&window) {
            w.traces_created = 0;
            w.markers_created = 0;
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
        self.windows.contains_key(&window)
    }

    fn create_axes(
        &mut self,
        window: WindowId,
        bounds: &AxisBounds,
        _camera: Point,
        grid: bool,
    ) -> Result<AxesId> {
        // The Rerun viewer owns its camera; the configured position is
        // carried in the scene record only.
        let w = self.window(window)?;
        w.stream
            .log_static(ENTITY_ROOT, &rr::ViewCoordinates::RIGHT_HAND_Z_UP())?;
        w.stream.log_static(
            format!("{ENTITY_ROOT}/bounds"),
            &rr::LineStrips3D::new(bounds_strips(bounds))
                .with_radii([TRACE_RADIUS * 0.5])
                .with_colors([color((0.5, 0.5, 0.5, 0.8))]),
        )?;
        if grid {
            w.stream.log_static(
                format!("{ENTITY_ROOT}/grid"),
                &rr::LineStrips3D::new(grid_strips(bounds))
                    .with_radii([TRACE_RADIUS * 0.25])
                    .with_colors([color((0.5, 0.5, 0.5, 0.3))]),
            )?;
        }
        let id = AxesId(self.next_id());
        self.axes.insert(id, window);
        Ok(id)
    }

    fn create_trace(
        &mut self,
        axes: AxesId,
        capacity: usize,
        style: &TraceStyle,
    ) -> Result<TraceId> {
        let Some(&window) = self.axes.get(&axes) else {
            bail!("unknown axes handle {axes:?}");
        };
        let Some(w) = self.windows.get_mut(&window) else {
            bail!("unknown window handle {window:?}");
        };
        let path = format!("{ENTITY_ROOT}/traces/{}", w.traces_created);
        w.traces_created += 1;
        let id = TraceId(self.next_id());
        self.traces.insert(
            id,
            RerunTrace {
                window,
                path,
                capacity,
                style: *style,
                points: VecDeque::with_capacity(capacity),
                step: 0,
            },
        );
        Ok(id)
    }

    fn append_point(&mut self, trace: TraceId, point: Point) -> Result<()> {
        let Some(rec) = self.traces.get_mut(&trace) else {
            bail!("unknown trace handle {trace:?}");
        };
        if rec.points.len() == rec.capacity {
            rec.points.pop_front();
        }
        rec.points.push_back(point);
        rec.step += 1;

        let window = rec.window;
        let path = rec.path.clone();
        let style = rec.style;
        let step = rec.step;
        let strip: Vec<rr::Vec3D> = rec.points.iter().map(|p| rr::Vec3D::from(*p)).collect();

        let w = self.window(window)?;
        w.stream.set_time_sequence(STEP_TIMELINE, step);
        w.stream.log(
            path.clone(),
            &rr::LineStrips3D::new([strip.clone()])
                .with_radii([TRACE_RADIUS])
                .with_colors([color(style.color)]),
        )?;
        if style.marker.is_some() {
            w.stream.log(
                format!("{path}/points"),
                &rr::Points3D::new(strip)
                    .with_radii([POINT_RADIUS])
                    .with_colors([color(style.color)]),
            )?;
        }
        Ok(())
    }

    fn create_marker(&mut self, axes: AxesId, shape: Marker, color: Rgba) -> Result<MarkerId> {
        let Some(&window) = self.axes.get(&axes) else {
            bail!("unknown axes handle {axes:?}");
        };
        let Some(w) = self.windows.get_mut(&window) else {
            bail!("unknown window handle {window:?}");
        };
        let path = format!("{ENTITY_ROOT}/heads/{}", w.markers_created);
        w.markers_created += 1;
        let id = MarkerId(self.next_id());
        self.markers.insert(
            id,
            RerunMarker {
                window,
                path,
                color,
                radius: head_radius(shape),
                step: 0,
            },
        );
        Ok(id)
    }

    fn set_marker_position(&mut self, marker: MarkerId, point: Point) -> Result<()> {
        let Some(rec) = self.markers.get_mut(&marker) else {
            bail!("unknown marker handle {marker:?}");
        };
        rec.step += 1;
        let window = rec.window;
        let path = rec.path.clone();
        let rgba = rec.color;
        let radius = rec.radius;
        let step = rec.step;

        let w = self.window(window)?;
        w.stream.set_time_sequence(STEP_TIMELINE, step);
        w.stream.log(
            path,
            &rr::Points3D::new([rr::Vec3D::from(point)])
                .with_radii([radius])
                .with_colors([color(rgba)]),
        )?;
        Ok(())
    }

    fn set_window_title(&mut self, window: WindowId, text: &str) -> Result<()> {
        let w = self.window(window)?;
        w.stream.log_static(
            format!("{ENTITY_ROOT}/title"),
            &rr::TextDocument::new(text),
        )?;
        Ok(())
    }

    fn set_toolbar_visible(&mut self, window: WindowId, visible: bool) -> Result<()> {
        // Viewer chrome is not scriptable; the flag is recorded only.
        let Some(w) = self.windows.get_mut(&window) else {
            bail!("unknown window handle {window:?}");
        };
        w.toolbar = visible;
        Ok(())
    }
}
