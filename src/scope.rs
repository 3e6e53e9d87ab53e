use anyhow::Result;
use thiserror::Error;
use tracing::debug;

use crate::config::ScopeParams;
use crate::directory::{Resolve, SceneDirectory};
use crate::id::BlockId;
use crate::scene::Scene;
use crate::surface::RenderSurface;

/// Port shape declared by setup: one input port carrying an (x, y, z)
/// triple per tracked object, no output ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortSpec {
    pub input_width: usize,
    pub output_count: usize,
}

/// The external scheduler delivered an input vector whose length does not
/// match the configured object count. Fatal: it indicates a misconfigured
/// or mismatched port binding, and recovery is not attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("input vector has {actual} values, expected {expected} (3 per object, {num_objects} objects)")]
pub struct ContractViolation {
    pub expected: usize,
    pub actual: usize,
    pub num_objects: usize,
}

/// Live 3D trajectory scope engine.
///
/// Owns the rendering surface and the process-wide scene directory. The
/// host calls [`Scope::setup`] once per block initialization, then
/// [`Scope::update`] once per simulation step; the four lifecycle handlers
/// react to editor events on the owning block. All calls are synchronous
/// and return immediately; the surface schedules its own redraws, and the
/// host guarantees callbacks are serialized.
pub struct Scope<S: RenderSurface> {
    surface: S,
    directory: SceneDirectory,
}

impl<S: RenderSurface> Scope<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            directory: SceneDirectory::new(),
        }
    }

    /// Validates the descriptor and builds (or rebuilds in place) the
    /// scene for this block identity. Validation happens before any
    /// rendering resource is touched; on failure nothing is allocated.
    pub fn setup(
        &mut self,
        id: &BlockId,
        display_name: &str,
        params: &ScopeParams,
    ) -> Result<PortSpec> {
        let config = params.resolve()?;

        let reuse = match self.directory.resolve(id, &self.surface) {
            Resolve::Live(scene) => Some(scene.window()),
            Resolve::Absent | Resolve::JustInvalidated => None,
        };

        let scene = Scene::build(&mut self.surface, &config, display_name, reuse)?;
        debug!(
            block = id.as_str(),
            objects = config.num_objects,
            capacity = config.capacity,
            reused = reuse.is_some(),
            "scene bound"
        );
        self.directory.bind(id.clone(), scene);

        Ok(PortSpec {
            input_width: config.input_width(),
            output_count: 0,
        })
    }

    /// Consumes one step's input vector `u` of length `3 * N`.
    ///
    /// An absent scene (the user closed the window) is the expected
    /// steady state, not a fault: the call is a silent no-op, forever.
    /// A length mismatch is a [`ContractViolation`].
    pub fn update(&mut self, id: &BlockId, u: &[f64]) -> Result<()> {
        match self.directory.resolve(id, &self.surface) {
            Resolve::Absent | Resolve::JustInvalidated => Ok(()),
            Resolve::Live(scene) => {
                let expected = scene.config().input_width();
                if u.len() != expected {
                    return Err(ContractViolation {
                        expected,
                        actual: u.len(),
                        num_objects: scene.config().num_objects,
                    }
                    .into());
                }
                scene.apply(&mut self.surface, u)
            }
        }
    }

    /// Retitles the window after the owning block was renamed. No-op when
    /// no live scene exists.
    pub fn rename(&mut self, id: &BlockId, display_name: &str) {
        if let Resolve::Live(scene) = self.directory.resolve(id, &self.surface)
            && let Err(err) = scene.set_display_name(&mut self.surface, display_name)
        {
            debug!(block = id.as_str(), %err, "retitle after rename failed");
        }
    }

    /// A copy of the owning block must not inherit its scene: the
    /// association is dropped immediately, the window is left alone.
    pub fn copy(&mut self, id: &BlockId) {
        if self.directory.invalidate(id) {
            debug!(block = id.as_str(), "scene binding dropped for copied block");
        }
    }

    /// A reloaded block starts without a scene association, like a copy.
    pub fn load(&mut self, id: &BlockId) {
        if self.directory.invalidate(id) {
            debug!(block = id.as_str(), "scene binding dropped for reloaded block");
        }
    }

    /// Destroys the window (if still live) and removes the association.
    pub fn delete(&mut self, id: &BlockId) {
        self.directory.unbind(id, &mut self.surface);
    }

    /// Directory lookup with liveness probe; see [`Resolve`].
    pub fn resolve(&mut self, id: &BlockId) -> Resolve<'_> {
        self.directory.resolve(id, &self.surface)
    }

    /// The live scene for this identity, if any.
    pub fn scene(&mut self, id: &BlockId) -> Option<&Scene> {
        match self.directory.resolve(id, &self.surface) {
            Resolve::Live(scene) => Some(scene),
            Resolve::Absent | Resolve::JustInvalidated => None,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
