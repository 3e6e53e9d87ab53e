use anyhow::Result;
use tracing::debug;

use crate::Point;
use crate::config::ScopeConfig;
use crate::style::{TraceStyle, head_shape, line_color};
use crate::surface::{AxesId, RenderSurface, WindowId};
use crate::trace::{HeadMarker, Trace};

/// Fixed base title of every scope window.
pub const SCENE_TITLE: &str = "3D Scope";

pub(crate) fn window_title(display_name: &str) -> String {
    format!("{SCENE_TITLE}: {display_name}")
}

/// One rendering surface (window + 3D axes) with its bound traces.
///
/// The configuration snapshot is immutable for the life of the scene;
/// re-running setup rebuilds the scene in place.
#[derive(Debug)]
pub struct Scene {
    window: WindowId,
    axes: AxesId,
    config: ScopeConfig,
    traces: Vec<Trace>,
    markers: Vec<HeadMarker>,
    display_name: String,
}

impl Scene {
    /// Builds a scene on a fresh window, or rebuilds in place when `reuse`
    /// carries the window of a prior scene for the same block identity
    /// (the window keeps its position and size).
    ///
    /// On any surface failure after the window exists, the window is torn
    /// down before the error is reported; no partial scene is left behind.
    pub(crate) fn build<S: RenderSurface>(
        surface: &mut S,
        config: &ScopeConfig,
        display_name: &str,
        reuse: Option<WindowId>,
    ) -> Result<Scene> {
        let window = match reuse {
            Some(w) => {
                debug!(window = ?w, "rebuilding scene in existing window");
                surface.clear(w)?;
                w
            }
            None => surface.create_window(SCENE_TITLE)?,
        };
        match Self::populate(surface, config, display_name, window) {
            Ok(scene) => Ok(scene),
            Err(err) => {
                let _ = surface.destroy(window);
                Err(err)
            }
        }
    }

    fn populate<S: RenderSurface>(
        surface: &mut S,
        config: &ScopeConfig,
        display_name: &str,
        window: WindowId,
    ) -> Result<Scene> {
        let axes = surface.create_axes(window, &config.bounds, config.camera, config.grid)?;
        surface.set_toolbar_visible(window, config.toolbar)?;
        surface.set_window_title(window, &window_title(display_name))?;

        let n = config.num_objects;
        let mut traces = Vec::with_capacity(n);
        for i in 0..n {
            let style = TraceStyle {
                line: config.line_style,
                marker: config.marker_style,
                color: line_color(i),
            };
            let handle = surface.create_trace(axes, config.capacity, &style)?;
            traces.push(Trace::new(handle, config.capacity));
        }

        let mut markers = Vec::new();
        if config.head_markers {
            markers.reserve(n);
            for i in 0..n {
                let handle = surface.create_marker(axes, head_shape(i), line_color(i))?;
                markers.push(HeadMarker::new(handle));
            }
        }

        Ok(Scene {
            window,
            axes,
            config: config.clone(),
            traces,
            markers,
            display_name: display_name.to_string(),
        })
    }

    /// Applies one step's input vector: appends a triple per trace and
    /// overwrites each head marker. The caller has already checked the
    /// vector length against the configuration.
    pub(crate) fn apply<S: RenderSurface>(&mut self, surface: &mut S, u: &[f64]) -> Result<()> {
        debug_assert_eq!(u.len(), self.config.input_width());
        for (i, triple) in u.chunks_exact(3).enumerate() {
            let point = Point::new(triple[0], triple[1], triple[2]);
            self.traces[i].append(point);
            surface.append_point(self.traces[i].handle(), point)?;
            if let Some(head) = self.markers.get_mut(i) {
                head.set_position(point);
                surface.set_marker_position(head.handle(), point)?;
            }
        }
        Ok(())
    }

    pub(crate) fn set_display_name<S: RenderSurface>(
        &mut self,
        surface: &mut S,
        display_name: &str,
    ) -> Result<()> {
        surface.set_window_title(self.window, &window_title(display_name))?;
        self.display_name = display_name.to_string();
        Ok(())
    }

    pub fn window(&self) -> WindowId {
        self.window
    }

    pub fn axes(&self) -> AxesId {
        self.axes
    }

    pub fn config(&self) -> &ScopeConfig {
        &self.config
    }

    pub fn traces(&self) -> &[Trace] {
        &self.traces
    }

    pub fn head_markers(&self) -> &[HeadMarker] {
        &self.markers
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AxisBounds, ScopeParams};
    use crate::style::Marker;
    use crate::surface::memory::MemorySurface;

    fn config(n: f64, m: f64, heads: bool) -> ScopeConfig {
        let mut params = ScopeParams::new();
        params.num_objects = n;
        params.capacity = m;
        params.head_markers = heads;
        params.resolve().unwrap()
    }

    #[test]
    fn test_build_creates_traces_and_markers() {
        let mut surface = MemorySurface::new();
        let scene = Scene::build(&mut surface, &config(3.0, 5.0, true), "blk", None).unwrap();

        assert_eq!(scene.traces().len(), 3);
        assert_eq!(scene.head_markers().len(), 3);
        for trace in scene.traces() {
            assert_eq!(trace.capacity(), 5);
            assert!(trace.is_empty());
        }
        assert_eq!(surface.traces_in(scene.window()).len(), 3);
        assert_eq!(surface.markers_in(scene.window()).len(), 3);
        assert_eq!(
            surface.window(scene.window()).unwrap().title,
            "3D Scope: blk"
        );
    }

    #[test]
    fn test_axes_reflect_configuration() {
        let mut surface = MemorySurface::new();
        let mut params = ScopeParams::new();
        params.bounds = vec![0.0, 1.0, 0.0, 2.0, 0.0, 3.0];
        params.camera = vec![5.0, 6.0, 7.0];
        params.grid = false;
        params.toolbar = true;
        let config = params.resolve().unwrap();

        let scene = Scene::build(&mut surface, &config, "blk", None).unwrap();
        let axes = surface.axes(scene.axes()).unwrap();
        assert_eq!(axes.bounds, AxisBounds::new(0.0, 1.0, 0.0, 2.0, 0.0, 3.0));
        assert!(axes.camera.is_close(&Point::new(5.0, 6.0, 7.0)));
        assert!(!axes.grid);
        assert!(surface.window(scene.window()).unwrap().toolbar);
    }

    #[test]
    fn test_no_markers_when_disabled() {
        let mut surface = MemorySurface::new();
        let scene = Scene::build(&mut surface, &config(2.0, 5.0, false), "blk", None).unwrap();
        assert!(scene.head_markers().is_empty());
        assert!(surface.markers_in(scene.window()).is_empty());
    }

    #[test]
    fn test_colors_cycle_palette() {
        let mut surface = MemorySurface::new();
        let scene = Scene::build(&mut surface, &config(9.0, 5.0, false), "blk", None).unwrap();
        let traces = surface.traces_in(scene.window());
        assert_eq!(traces[0].style.color, line_color(0));
        assert_eq!(traces[7].style.color, line_color(0));
        assert_eq!(traces[8].style.color, line_color(1));
    }

    #[test]
    fn test_head_shapes_cycle_distinct_palette() {
        let mut surface = MemorySurface::new();
        let scene = Scene::build(&mut surface, &config(8.0, 5.0, true), "blk", None).unwrap();
        let markers = surface.markers_in(scene.window());
        assert_eq!(markers[0].shape, Marker::Circle);
        assert_eq!(markers[6].shape, Marker::Circle);
        assert_eq!(markers[1].shape, markers[7].shape);
    }

    #[test]
    fn test_rebuild_reuses_window() {
        let mut surface = MemorySurface::new();
        let first = Scene::build(&mut surface, &config(2.0, 3.0, true), "blk", None).unwrap();
        let window = first.window();

        let second =
            Scene::build(&mut surface, &config(2.0, 3.0, true), "blk", Some(window)).unwrap();
        assert_eq!(second.window(), window);
        assert_eq!(surface.window_count(), 1);
        assert_eq!(surface.window(window).unwrap().clears, 1);
        for trace in second.traces() {
            assert!(trace.is_empty());
        }
    }

    #[test]
    fn test_apply_appends_and_overwrites_heads() {
        let mut surface = MemorySurface::new();
        let mut scene = Scene::build(&mut surface, &config(2.0, 3.0, true), "blk", None).unwrap();

        scene.apply(&mut surface, &[0.0, 0.0, 0.0, 1.0, 1.0, 1.0]).unwrap();
        scene.apply(&mut surface, &[0.0, 0.0, 1.0, 1.0, 1.0, 2.0]).unwrap();

        assert_eq!(scene.traces()[0].len(), 2);
        assert!(
            scene.traces()[1]
                .latest()
                .unwrap()
                .is_close(&Point::new(1.0, 1.0, 2.0))
        );
        assert!(
            scene.head_markers()[0]
                .position()
                .unwrap()
                .is_close(&Point::new(0.0, 0.0, 1.0))
        );

        // The surface primitives saw the same points.
        let traces = surface.traces_in(scene.window());
        assert_eq!(traces[0].points.len(), 2);
        let markers = surface.markers_in(scene.window());
        assert!(
            markers[1]
                .position
                .unwrap()
                .is_close(&Point::new(1.0, 1.0, 2.0))
        );
    }

    #[test]
    fn test_failed_rebuild_leaves_no_window() {
        let mut surface = MemorySurface::new();
        let first = Scene::build(&mut surface, &config(1.0, 3.0, false), "blk", None).unwrap();
        let window = first.window();

        // Simulate the window dying right before a rebuild: clear fails and
        // no partial scene may remain.
        surface.close_window(window);
        let result = Scene::build(&mut surface, &config(1.0, 3.0, false), "blk", Some(window));
        assert!(result.is_err());
        assert_eq!(surface.live_window_count(), 0);
    }
}
