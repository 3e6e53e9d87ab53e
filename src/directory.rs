use std::collections::HashMap;

use tracing::debug;

use crate::id::BlockId;
use crate::scene::Scene;
use crate::surface::RenderSurface;

/// Outcome of a directory lookup.
///
/// Staleness is detected lazily: a scene whose window has gone away is
/// reported as `JustInvalidated` exactly once (and removed), then as
/// `Absent` on every later lookup. Callers treat both as "no scene", but
/// the distinction keeps the no-op path observable.
#[derive(Debug)]
pub enum Resolve<'a> {
    Live(&'a mut Scene),
    Absent,
    JustInvalidated,
}

impl Resolve<'_> {
    pub fn is_live(&self) -> bool {
        matches!(self, Resolve::Live(_))
    }
}

/// Process-wide association between block identities and their scenes.
///
/// At most one scene is bound per identity. Only ever touched by the
/// host's serialized callbacks, so no interior locking is needed.
#[derive(Default)]
pub struct SceneDirectory {
    scenes: HashMap<BlockId, Scene>,
}

impl SceneDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the scene for `id`, probing the surface for liveness.
    pub fn resolve<S: RenderSurface>(&mut self, id: &BlockId, surface: &S) -> Resolve<'_> {
        let stale = match self.scenes.get(id) {
            None => return Resolve::Absent,
            Some(scene) => !surface.is_live(scene.window()),
        };
        if stale {
            self.scenes.remove(id);
            debug!(block = id.as_str(), "dropped stale scene binding");
            return Resolve::JustInvalidated;
        }
        match self.scenes.get_mut(id) {
            Some(scene) => Resolve::Live(scene),
            None => Resolve::Absent,
        }
    }

    /// Records the association, replacing any prior entry. Overwriting a
    /// live scene is only legal on the rebuild path, where the new scene
    /// occupies the same window.
    pub fn bind(&mut self, id: BlockId, scene: Scene) {
        self.scenes.insert(id, scene);
    }

    /// Removes the association and destroys the window if it is still
    /// live. Safe to call when no entry exists.
    pub fn unbind<S: RenderSurface>(&mut self, id: &BlockId, surface: &mut S) {
        if let Some(scene) = self.scenes.remove(id) {
            let window = scene.window();
            if surface.is_live(window)
                && let Err(err) = surface.destroy(window)
            {
                debug!(block = id.as_str(), %err, "window destruction failed");
            }
        }
    }

    /// Removes the association without touching the window. Returns true
    /// if an entry existed.
    pub fn invalidate(&mut self, id: &BlockId) -> bool {
        self.scenes.remove(id).is_some()
    }

    pub fn contains(&self, id: &BlockId) -> bool {
        self.scenes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScopeParams;
    use crate::surface::memory::MemorySurface;

    fn build_scene(surface: &mut MemorySurface) -> Scene {
        let config = ScopeParams::new().resolve().unwrap();
        Scene::build(surface, &config, "blk", None).unwrap()
    }

    #[test]
    fn test_resolve_absent_without_binding() {
        let surface = MemorySurface::new();
        let mut directory = SceneDirectory::new();
        let id = BlockId::from("a");
        assert!(matches!(directory.resolve(&id, &surface), Resolve::Absent));
    }

    #[test]
    fn test_bind_then_resolve_live() {
        let mut surface = MemorySurface::new();
        let mut directory = SceneDirectory::new();
        let id = BlockId::from("a");
        let scene = build_scene(&mut surface);
        let window = scene.window();
        directory.bind(id.clone(), scene);

        assert!(directory.resolve(&id, &surface).is_live());
        match directory.resolve(&id, &surface) {
            Resolve::Live(scene) => assert_eq!(scene.window(), window),
            other => panic!("expected live scene, got {other:?}"),
        }
    }

    #[test]
    fn test_stale_entry_invalidated_once_then_absent() {
        let mut surface = MemorySurface::new();
        let mut directory = SceneDirectory::new();
        let id = BlockId::from("a");
        let scene = build_scene(&mut surface);
        let window = scene.window();
        directory.bind(id.clone(), scene);

        surface.close_window(window);
        assert!(matches!(
            directory.resolve(&id, &surface),
            Resolve::JustInvalidated
        ));
        assert!(matches!(directory.resolve(&id, &surface), Resolve::Absent));
        assert!(!directory.contains(&id));
    }

    #[test]
    fn test_unbind_destroys_live_window() {
        let mut surface = MemorySurface::new();
        let mut directory = SceneDirectory::new();
        let id = BlockId::from("a");
        let scene = build_scene(&mut surface);
        let window = scene.window();
        directory.bind(id.clone(), scene);

        directory.unbind(&id, &mut surface);
        assert!(!directory.contains(&id));
        assert!(!surface.is_live(window));
        assert_eq!(surface.window_count(), 0);
    }

    #[test]
    fn test_unbind_without_entry_is_noop() {
        let mut surface = MemorySurface::new();
        let mut directory = SceneDirectory::new();
        directory.unbind(&BlockId::from("missing"), &mut surface);
        assert!(directory.is_empty());
    }

    #[test]
    fn test_invalidate_leaves_window_alone() {
        let mut surface = MemorySurface::new();
        let mut directory = SceneDirectory::new();
        let id = BlockId::from("a");
        let scene = build_scene(&mut surface);
        let window = scene.window();
        directory.bind(id.clone(), scene);

        assert!(directory.invalidate(&id));
        assert!(!directory.invalidate(&id));
        // The window survives; only the association is gone.
        assert!(surface.is_live(window));
    }
}
