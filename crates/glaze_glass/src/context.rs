//! Glass context
//!
//! Holds every surface mounted in one rendering context together with the
//! allocator their filter ids come from. The allocator is shared through an
//! `Arc` so other contexts (or threads mounting surfaces of their own) can
//! draw from the same id space.
//!
//! Events are routed through an index from [`EventTarget`] to surface: each
//! surface is indexed under its own filter id and under every content node
//! it wraps.

use std::sync::Arc;

use glaze_core::{Event, EventTarget, FilterIdAllocator, Layer};
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};

use crate::config::SurfaceConfig;
use crate::surface::GlassSurface;

new_key_type! {
    /// Handle to a surface mounted in a [`GlassContext`]
    pub struct SurfaceKey;
}

/// Set of concurrently mounted glass surfaces
pub struct GlassContext {
    allocator: Arc<FilterIdAllocator>,
    surfaces: SlotMap<SurfaceKey, GlassSurface>,
    targets: FxHashMap<EventTarget, SurfaceKey>,
}

impl GlassContext {
    pub fn new() -> Self {
        Self::with_allocator(Arc::new(FilterIdAllocator::new()))
    }

    /// Create a context drawing ids from an existing allocator
    pub fn with_allocator(allocator: Arc<FilterIdAllocator>) -> Self {
        Self {
            allocator,
            surfaces: SlotMap::with_key(),
            targets: FxHashMap::default(),
        }
    }

    pub fn allocator(&self) -> &Arc<FilterIdAllocator> {
        &self.allocator
    }

    pub fn mount(&mut self, config: SurfaceConfig, content: Layer) -> SurfaceKey {
        let surface = GlassSurface::mount(&self.allocator, config, content);
        let key = self.surfaces.insert(surface);
        self.index(key);
        key
    }

    pub fn get(&self, key: SurfaceKey) -> Option<&GlassSurface> {
        self.surfaces.get(key)
    }

    pub fn get_mut(&mut self, key: SurfaceKey) -> Option<&mut GlassSurface> {
        self.surfaces.get_mut(key)
    }

    /// Replace a surface's content and re-index its nodes.
    ///
    /// Returns false if the key is gone.
    pub fn set_content(&mut self, key: SurfaceKey, content: Layer) -> bool {
        self.unindex(key);
        match self.surfaces.get_mut(key) {
            Some(surface) => {
                surface.set_content(content);
                self.index(key);
                true
            }
            None => false,
        }
    }

    /// Unmount a surface. Returns false if the key was already gone.
    pub fn unmount(&mut self, key: SurfaceKey) -> bool {
        self.unindex(key);
        match self.surfaces.remove(key) {
            Some(surface) => {
                surface.unmount(&self.allocator);
                true
            }
            None => false,
        }
    }

    fn index(&mut self, key: SurfaceKey) {
        let Some(surface) = self.surfaces.get(key) else {
            return;
        };
        self.targets.insert(surface.target(), key);
        for node in surface.content_nodes() {
            if let Some(previous) = self.targets.insert(EventTarget::Node(node), key) {
                if previous != key {
                    tracing::debug!("content node {} moved to another glass surface", node.id);
                }
            }
        }
    }

    fn unindex(&mut self, key: SurfaceKey) {
        self.targets.retain(|_, k| *k != key);
    }

    /// Find the surface an event target belongs to
    pub fn key_for_target(&self, target: EventTarget) -> Option<SurfaceKey> {
        self.targets.get(&target).copied()
    }

    /// Route an event to the surface it targets
    pub fn dispatch(&mut self, event: &mut Event) -> bool {
        let Some(key) = self.key_for_target(event.target) else {
            tracing::trace!("no glass surface for event target {:?}", event.target);
            return false;
        };
        self.surfaces
            .get_mut(key)
            .is_some_and(|surface| surface.handle_event(event))
    }

    /// Advance every surface's fade. Returns true while any needs frames.
    pub fn tick_all(&mut self, dt_ms: f32) -> bool {
        let mut active = false;
        for (_, surface) in self.surfaces.iter_mut() {
            active |= surface.tick(dt_ms);
        }
        active
    }

    pub fn iter(&self) -> impl Iterator<Item = (SurfaceKey, &GlassSurface)> {
        self.surfaces.iter()
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

impl Default for GlassContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glaze_core::events::event_types;
    use glaze_core::UiNode;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_mount_and_unmount() {
        let mut ctx = GlassContext::new();
        let a = ctx.mount(SurfaceConfig::default(), Layer::ui(UiNode::new(1)));
        let b = ctx.mount(SurfaceConfig::default(), Layer::ui(UiNode::new(2)));

        assert_eq!(ctx.len(), 2);
        assert_eq!(ctx.allocator().live_count(), 2);
        assert_ne!(ctx.get(a).unwrap().id(), ctx.get(b).unwrap().id());

        assert!(ctx.unmount(a));
        assert!(!ctx.unmount(a));
        assert_eq!(ctx.len(), 1);
        assert_eq!(ctx.allocator().live_count(), 1);
        assert!(ctx.get(a).is_none());
        assert_eq!(ctx.key_for_target(EventTarget::Node(UiNode::new(1))), None);
        assert_eq!(ctx.key_for_target(EventTarget::Node(UiNode::new(2))), Some(b));
    }

    #[test]
    fn test_dispatch_routes_by_target() {
        let mut ctx = GlassContext::new();
        let a = ctx.mount(SurfaceConfig::default(), Layer::empty());
        let b = ctx.mount(SurfaceConfig::default(), Layer::empty());
        let id_a = ctx.get(a).unwrap().id();
        let unknown = ctx.allocator().allocate();

        assert!(ctx.dispatch(&mut Event::resize(id_a, 100.0, 40.0)));
        assert!(ctx.dispatch(&mut Event::asset_load(id_a)));
        assert!(!ctx.dispatch(&mut Event::asset_load(unknown)));

        assert!(ctx.get(a).unwrap().readiness().is_ready());
        assert!(!ctx.get(b).unwrap().readiness().is_ready());
    }

    #[test]
    fn test_crossed_node_and_filter_ids_route_to_owner() {
        let mut ctx = GlassContext::new();
        let a = ctx.mount(SurfaceConfig::default(), Layer::ui(UiNode::new(2)));
        let b = ctx.mount(SurfaceConfig::default(), Layer::ui(UiNode::new(1)));
        assert_eq!(ctx.get(a).unwrap().id().raw(), 1);
        assert_eq!(ctx.get(b).unwrap().id().raw(), 2);

        let a_hits = Arc::new(AtomicUsize::new(0));
        let b_hits = Arc::new(AtomicUsize::new(0));
        let a_clone = a_hits.clone();
        let b_clone = b_hits.clone();
        ctx.get_mut(a).unwrap().on(event_types::CLICK, move |_| {
            a_clone.fetch_add(1, Ordering::SeqCst);
        });
        ctx.get_mut(b).unwrap().on(event_types::CLICK, move |_| {
            b_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert!(ctx.dispatch(&mut Event::pointer(event_types::CLICK, UiNode::new(1), 0.0, 0.0)));
        assert_eq!(a_hits.load(Ordering::SeqCst), 0);
        assert_eq!(b_hits.load(Ordering::SeqCst), 1);

        assert!(ctx.dispatch(&mut Event::pointer(event_types::CLICK, UiNode::new(2), 0.0, 0.0)));
        assert_eq!(a_hits.load(Ordering::SeqCst), 1);
        assert_eq!(b_hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_set_content_reindexes() {
        let mut ctx = GlassContext::new();
        let key = ctx.mount(SurfaceConfig::default(), Layer::ui(UiNode::new(5)));
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_clone = hits.clone();
        ctx.get_mut(key).unwrap().on(event_types::CLICK, move |_| {
            hits_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert!(ctx.set_content(key, Layer::ui(UiNode::new(6))));
        assert!(!ctx.dispatch(&mut Event::pointer(event_types::CLICK, UiNode::new(5), 0.0, 0.0)));
        assert!(ctx.dispatch(&mut Event::pointer(event_types::CLICK, UiNode::new(6), 0.0, 0.0)));
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        let id = ctx.get(key).unwrap().id();
        assert_eq!(ctx.key_for_target(EventTarget::Surface(id)), Some(key));
    }

    #[test]
    fn test_index_survives_churn() {
        let mut ctx = GlassContext::new();
        let keep = ctx.mount(SurfaceConfig::default(), Layer::ui(UiNode::new(100)));
        for n in 0..32 {
            let key = ctx.mount(SurfaceConfig::default(), Layer::ui(UiNode::new(n)));
            assert!(ctx.unmount(key));
        }

        let id = ctx.get(keep).unwrap().id();
        assert_eq!(ctx.key_for_target(EventTarget::Surface(id)), Some(keep));
        assert_eq!(ctx.key_for_target(EventTarget::Node(UiNode::new(100))), Some(keep));
        assert_eq!(ctx.key_for_target(EventTarget::Node(UiNode::new(3))), None);
    }

    #[test]
    fn test_tick_all_until_settled() {
        let mut ctx = GlassContext::new();
        let key = ctx.mount(SurfaceConfig::default(), Layer::empty());
        assert!(!ctx.tick_all(16.0));

        let surface = ctx.get_mut(key).unwrap();
        surface.observe_size(glaze_core::Size::new(10.0, 10.0));
        surface.attach_asset();

        let mut frames = 0;
        while ctx.tick_all(16.0) {
            frames += 1;
        }
        assert!(frames > 0);
        assert_eq!(ctx.get(key).unwrap().effect_opacity(), 1.0);
    }
}
