//! Glass surface
//!
//! A [`GlassSurface`] ties one mounted instance together: its resolved
//! parameters, its own filter, its readiness machine, and the fade that brings
//! the effect in. [`GlassSurface::render`] produces the layered output:
//!
//! ```text
//! Stack "glass-surface"         (caller classes/styles land here only)
//! ├── Opacity(1 - e) Fill       "glass-fallback"  (only while e < 1)
//! ├── Opacity(e) Backdrop       "glass-backdrop"
//! ├── Opacity(e) Filtered       "glass-filtered"  (bound to this instance's id)
//! ├── Border                    "glass-border"    (when a border color is set)
//! └── Stack                     "glass-content"   (always present, interactive)
//! ```
//!
//! `e` is the effect opacity. It stays at 0 until readiness reaches `Ready`
//! and then fades to 1 over the configured transition.

use std::sync::Arc;

use glaze_animation::Fade;
use glaze_core::events::event_types;
use glaze_core::{
    Color, CornerRadius, Event, EventData, EventDispatcher, EventTarget, EventType, FilterId,
    FilterIdAllocator, Layer, LayerProperties, UiNode,
};

use crate::config::{SurfaceAttributes, SurfaceConfig};
use crate::filter::{Dimensions, FilterDefinition, FilterSynthesizer};
use crate::preset::{GlassConfig, GlassOverrides, VariantName};
use crate::readiness::{ReadinessCoordinator, ReadinessPhase, ReadinessState};

/// Names given to the layers of a rendered surface
pub mod layer_names {
    pub const SURFACE: &str = "glass-surface";
    pub const FALLBACK: &str = "glass-fallback";
    pub const BACKDROP: &str = "glass-backdrop";
    pub const FILTERED: &str = "glass-filtered";
    pub const BORDER: &str = "glass-border";
    pub const CONTENT: &str = "glass-content";
}

/// Border stroke width in px
pub const BORDER_WIDTH: f32 = 1.0;

/// Handler attached to the content layer as a whole
type ContentHandler = Arc<dyn Fn(&Event) + Send + Sync>;

/// One mounted glass surface
pub struct GlassSurface {
    source: SurfaceConfig,
    config: GlassConfig,
    filter: FilterSynthesizer,
    readiness: ReadinessCoordinator,
    effect: Fade,
    content: Layer,
    handlers: Vec<(EventType, ContentHandler)>,
    dispatcher: EventDispatcher,
}

impl GlassSurface {
    /// Mount a surface around `content`, taking a fresh filter id from
    /// `allocator`.
    pub fn mount(allocator: &FilterIdAllocator, source: SurfaceConfig, content: Layer) -> Self {
        let id = allocator.allocate();
        let config = source.resolve();
        let effect = Fade::new(0.0, source.transition.duration_ms, source.transition.easing);

        tracing::debug!("mounted glass surface {} ({})", id, source.variant);

        Self {
            filter: FilterSynthesizer::new(id, &config, Dimensions::ZERO),
            readiness: ReadinessCoordinator::new(),
            handlers: Vec::new(),
            dispatcher: EventDispatcher::new(),
            source,
            config,
            effect,
            content,
        }
    }

    /// Tear down: detach handlers and give the filter id back.
    pub fn unmount(mut self, allocator: &FilterIdAllocator) {
        let id = self.id();
        self.unbind_content();
        self.handlers.clear();
        allocator.release(id);
        tracing::debug!("unmounted glass surface {}", id);
    }

    pub fn id(&self) -> FilterId {
        self.filter.id()
    }

    /// Target for observation signals (resize, asset load) aimed at this
    /// surface. Interaction targets the content nodes instead.
    pub fn target(&self) -> EventTarget {
        EventTarget::Surface(self.id())
    }

    /// Caller nodes inside the content layer
    pub fn content_nodes(&self) -> Vec<UiNode> {
        self.content.ui_nodes()
    }

    /// Effective parameters
    pub fn config(&self) -> &GlassConfig {
        &self.config
    }

    pub fn variant(&self) -> VariantName {
        self.source.variant
    }

    pub fn overrides(&self) -> &GlassOverrides {
        &self.source.overrides
    }

    pub fn attributes(&self) -> &SurfaceAttributes {
        &self.source.attributes
    }

    pub fn filter(&self) -> &FilterDefinition {
        self.filter.definition()
    }

    /// Number of times this surface's filter has been re-synthesized
    pub fn filter_generation(&self) -> u64 {
        self.filter.generation()
    }

    pub fn readiness(&self) -> &ReadinessCoordinator {
        &self.readiness
    }

    pub fn readiness_state(&self) -> ReadinessState {
        self.readiness.state()
    }

    pub fn phase(&self) -> ReadinessPhase {
        self.readiness.phase()
    }

    pub fn should_show_fallback(&self) -> bool {
        self.readiness.should_show_fallback()
    }

    /// Run `callback` once the effect becomes ready
    pub fn on_ready<F: FnMut() + Send + 'static>(&mut self, callback: F) {
        self.readiness.on_ready(callback);
    }

    /// Switch preset, keeping overrides
    pub fn set_variant(&mut self, variant: VariantName) {
        self.source.variant = variant;
        self.reconfigure();
    }

    pub fn set_overrides(&mut self, overrides: GlassOverrides) {
        self.source.overrides = overrides;
        self.reconfigure();
    }

    /// Replace the caller content, moving content handlers onto the new
    /// nodes. Surfaces held by a `GlassContext` change content through
    /// `GlassContext::set_content` so its routing index stays current.
    pub(crate) fn set_content(&mut self, content: Layer) {
        self.unbind_content();
        self.content = content;
        for node in self.content.ui_nodes() {
            for (event_type, handler) in &self.handlers {
                let handler = handler.clone();
                self.dispatcher
                    .register(EventTarget::Node(node), *event_type, move |e| handler(e));
            }
        }
    }

    fn unbind_content(&mut self) {
        for node in self.content.ui_nodes() {
            self.dispatcher.unregister_target(EventTarget::Node(node));
        }
    }

    fn reconfigure(&mut self) {
        self.config = self.source.resolve();
        self.filter.update(&self.config, self.readiness.dimensions());
    }

    /// Feed a layout observation
    pub fn observe_size(&mut self, dimensions: Dimensions) {
        if self.readiness.observe_size(dimensions) {
            self.filter.update(&self.config, dimensions);
        }
        self.sync_effect();
    }

    /// Feed the filter asset's load signal
    pub fn attach_asset(&mut self) {
        self.readiness.attach_asset();
        self.sync_effect();
    }

    fn sync_effect(&mut self) {
        if self.readiness.is_ready() {
            self.effect.fade_to(1.0);
        }
    }

    /// Register a handler for interaction events on any node of this
    /// surface's content
    pub fn on<F>(&mut self, event_type: EventType, handler: F)
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let handler: ContentHandler = Arc::new(handler);
        for node in self.content.ui_nodes() {
            let handler = handler.clone();
            self.dispatcher
                .register(EventTarget::Node(node), event_type, move |e| handler(e));
        }
        self.handlers.push((event_type, handler));
    }

    /// Route an event aimed at this surface or its content.
    ///
    /// Resize and asset-load events aimed at the surface drive readiness.
    /// Interaction events aimed at one of its content nodes go to content
    /// handlers whatever the readiness state. Returns true when the event was
    /// consumed.
    pub fn handle_event(&mut self, event: &mut Event) -> bool {
        match event.target {
            EventTarget::Surface(id) if id == self.id() => match event.event_type {
                event_types::RESIZE => match event.data {
                    EventData::Resize { width, height } => {
                        self.observe_size(Dimensions::new(width, height));
                        true
                    }
                    _ => false,
                },
                event_types::ASSET_LOAD => {
                    self.attach_asset();
                    true
                }
                _ => false,
            },
            EventTarget::Node(node) if event_types::is_interaction(event.event_type) => {
                self.content.ui_nodes().contains(&node) && self.dispatcher.dispatch(event) > 0
            }
            _ => false,
        }
    }

    /// Advance the fade. Returns true while it still needs frames.
    pub fn tick(&mut self, dt_ms: f32) -> bool {
        self.effect.tick(dt_ms)
    }

    /// Current opacity of the backdrop and filtered layers
    pub fn effect_opacity(&self) -> f32 {
        self.effect.value()
    }

    /// Standalone SVG document carrying this surface's filter
    pub fn filter_asset(&self) -> String {
        self.filter.definition().to_svg_asset()
    }

    /// Build the layer tree for the current frame
    pub fn render(&self) -> Layer {
        let effect = self.effect.value();
        let corner_radius = CornerRadius::uniform(self.config.radius);
        let tint = Color::WHITE.with_alpha(self.config.frost);

        let mut layers = Vec::with_capacity(5);

        if effect < 1.0 {
            layers.push(
                Layer::Fill {
                    color: tint,
                    corner_radius,
                    props: LayerProperties::new()
                        .with_name(layer_names::FALLBACK)
                        .inert(),
                }
                .with_opacity(1.0 - effect),
            );
        }

        layers.push(
            Layer::Backdrop {
                blur: self.config.backdrop_blur,
                tint,
                corner_radius,
                props: LayerProperties::new()
                    .with_name(layer_names::BACKDROP)
                    .inert(),
            }
            .with_opacity(effect),
        );

        layers.push(
            Layer::Filtered {
                filter: self.id(),
                corner_radius,
                props: LayerProperties::new()
                    .with_name(layer_names::FILTERED)
                    .inert(),
            }
            .with_opacity(effect),
        );

        if let Some(color) = self.config.border_color {
            layers.push(Layer::Border {
                color,
                width: BORDER_WIDTH,
                corner_radius,
                props: LayerProperties::new()
                    .with_name(layer_names::BORDER)
                    .inert(),
            });
        }

        layers.push(Layer::Stack {
            layers: vec![self.content.clone()],
            props: LayerProperties::new().with_name(layer_names::CONTENT),
        });

        Layer::Stack {
            layers,
            props: self.outer_props(),
        }
    }

    fn outer_props(&self) -> LayerProperties {
        let attributes = &self.source.attributes;
        let mut props = LayerProperties::new().with_name(layer_names::SURFACE);
        for class in &attributes.class_names {
            props = props.with_class(class.clone());
        }
        for (property, value) in &attributes.style {
            props = props.with_style(property.clone(), value.clone());
        }
        props
    }
}

impl std::fmt::Debug for GlassSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlassSurface")
            .field("id", &self.id())
            .field("variant", &self.source.variant)
            .field("config", &self.config)
            .field("phase", &self.readiness.phase())
            .field("effect", &self.effect.value())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glaze_core::{PointerEvents, UiNode};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn mount(allocator: &FilterIdAllocator) -> GlassSurface {
        GlassSurface::mount(
            allocator,
            SurfaceConfig::default(),
            Layer::ui(UiNode::new(7)),
        )
    }

    fn make_ready(surface: &mut GlassSurface) {
        surface.observe_size(Dimensions::new(200.0, 100.0));
        surface.attach_asset();
    }

    fn opacity_of(tree: &Layer, inner: &str) -> Option<f32> {
        let mut found = None;
        tree.traverse(|layer, _| {
            if let Layer::Opacity { value, layer, .. } = layer {
                if layer.name() == Some(inner) {
                    found = Some(*value);
                }
            }
        });
        found
    }

    #[test]
    fn test_content_rendered_before_ready() {
        let allocator = FilterIdAllocator::new();
        let surface = mount(&allocator);

        let tree = surface.render();
        assert_eq!(tree.ui_nodes(), vec![UiNode::new(7)]);
        assert_eq!(opacity_of(&tree, layer_names::BACKDROP), Some(0.0));
        assert_eq!(opacity_of(&tree, layer_names::FILTERED), Some(0.0));
        assert_eq!(opacity_of(&tree, layer_names::FALLBACK), Some(1.0));

        let content = tree.find_named(layer_names::CONTENT).unwrap();
        assert_eq!(content.props().pointer_events, PointerEvents::Auto);
    }

    #[test]
    fn test_effect_fades_in_once_ready() {
        let allocator = FilterIdAllocator::new();
        let mut surface = mount(&allocator);

        surface.observe_size(Dimensions::new(200.0, 100.0));
        assert!(!surface.tick(16.0));
        assert_eq!(surface.effect_opacity(), 0.0);

        surface.attach_asset();
        assert!(surface.tick(150.0));
        let midway = surface.effect_opacity();
        assert!(midway > 0.0 && midway < 1.0);

        assert!(!surface.tick(1000.0));
        assert_eq!(surface.effect_opacity(), 1.0);

        let tree = surface.render();
        assert!(tree.find_named(layer_names::FALLBACK).is_none());
        assert_eq!(opacity_of(&tree, layer_names::FILTERED), Some(1.0));
        assert_eq!(tree.ui_nodes(), vec![UiNode::new(7)]);
    }

    #[test]
    fn test_filtered_layer_binds_own_filter() {
        let allocator = FilterIdAllocator::new();
        let a = mount(&allocator);
        let b = mount(&allocator);

        assert_ne!(a.id(), b.id());
        assert_eq!(a.render().filter_refs(), vec![a.id()]);
        assert_eq!(b.render().filter_refs(), vec![b.id()]);
        assert!(a.filter_asset().contains(&a.id().url()));
    }

    #[test]
    fn test_border_optional() {
        let allocator = FilterIdAllocator::new();
        let with_border = mount(&allocator);
        assert!(with_border.render().find_named(layer_names::BORDER).is_some());

        let without = GlassSurface::mount(
            &allocator,
            SurfaceConfig::new(VariantName::Minimal),
            Layer::empty(),
        );
        assert!(without.render().find_named(layer_names::BORDER).is_none());
    }

    #[test]
    fn test_attributes_on_outer_layer_only() {
        let allocator = FilterIdAllocator::new();
        let source = SurfaceConfig::default().with_attributes(
            SurfaceAttributes::default()
                .with_class("rounded-xl")
                .with_style("margin", "8px"),
        );
        let surface = GlassSurface::mount(&allocator, source, Layer::ui(UiNode::new(1)));

        let tree = surface.render();
        assert_eq!(tree.name(), Some(layer_names::SURFACE));
        assert_eq!(tree.props().class_names.as_slice(), ["rounded-xl".to_string()]);
        assert_eq!(tree.props().style_value("margin"), Some("8px"));

        let mut decorated = 0;
        tree.traverse(|layer, _| {
            if !layer.props().class_names.is_empty() || !layer.props().style.is_empty() {
                decorated += 1;
            }
        });
        assert_eq!(decorated, 1);
    }

    #[test]
    fn test_interaction_ignores_readiness() {
        let allocator = FilterIdAllocator::new();
        let mut surface = mount(&allocator);

        let clicks = Arc::new(AtomicUsize::new(0));
        let clicks_clone = clicks.clone();
        surface.on(event_types::CLICK, move |_| {
            clicks_clone.fetch_add(1, Ordering::SeqCst);
        });

        let content = UiNode::new(7);
        assert!(surface.handle_event(&mut Event::pointer(event_types::CLICK, content, 5.0, 5.0)));
        assert_eq!(clicks.load(Ordering::SeqCst), 1);
        assert!(surface.should_show_fallback());

        let stranger = UiNode::new(1007);
        assert!(!surface.handle_event(&mut Event::pointer(event_types::CLICK, stranger, 5.0, 5.0)));
        assert_eq!(clicks.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_node_id_matching_filter_id_is_not_the_surface() {
        let allocator = FilterIdAllocator::new();
        let mut surface = GlassSurface::mount(
            &allocator,
            SurfaceConfig::default(),
            Layer::ui(UiNode::new(2)),
        );
        assert_eq!(surface.id().raw(), 1);

        let clicks = Arc::new(AtomicUsize::new(0));
        let clicks_clone = clicks.clone();
        surface.on(event_types::CLICK, move |_| {
            clicks_clone.fetch_add(1, Ordering::SeqCst);
        });

        let mut foreign = Event::pointer(event_types::CLICK, UiNode::new(1), 0.0, 0.0);
        assert!(!surface.handle_event(&mut foreign));
        let mut own = Event::pointer(event_types::CLICK, UiNode::new(2), 0.0, 0.0);
        assert!(surface.handle_event(&mut own));
        assert_eq!(clicks.load(Ordering::SeqCst), 1);

        let mut click_on_surface = Event::new(
            event_types::CLICK,
            surface.target(),
            EventData::Pointer {
                x: 0.0,
                y: 0.0,
                button: 0,
            },
        );
        assert!(!surface.handle_event(&mut click_on_surface));
    }

    #[test]
    fn test_handlers_follow_new_content() {
        let allocator = FilterIdAllocator::new();
        let mut surface = mount(&allocator);

        let keys = Arc::new(AtomicUsize::new(0));
        let keys_clone = keys.clone();
        surface.on(event_types::KEY_DOWN, move |event| {
            if let EventData::Key { code } = event.data {
                keys_clone.fetch_add(code as usize, Ordering::SeqCst);
            }
        });

        surface.set_content(Layer::stack(vec![
            Layer::ui(UiNode::new(20)),
            Layer::ui(UiNode::new(21)),
        ]));
        assert_eq!(surface.content_nodes(), vec![UiNode::new(20), UiNode::new(21)]);

        assert!(!surface.handle_event(&mut Event::key(event_types::KEY_DOWN, UiNode::new(7), 1)));
        assert!(surface.handle_event(&mut Event::key(event_types::KEY_DOWN, UiNode::new(20), 10)));
        assert!(surface.handle_event(&mut Event::key(event_types::KEY_DOWN, UiNode::new(21), 5)));
        assert_eq!(keys.load(Ordering::SeqCst), 15);
    }

    #[test]
    fn test_events_drive_readiness() {
        let allocator = FilterIdAllocator::new();
        let mut surface = mount(&allocator);
        let id = surface.id();

        assert!(surface.handle_event(&mut Event::asset_load(id)));
        assert_eq!(
            surface.phase(),
            ReadinessPhase::Unmeasured {
                asset_attached: true
            }
        );

        assert!(surface.handle_event(&mut Event::resize(id, 0.0, 0.0)));
        assert!(surface.should_show_fallback());

        let other = allocator.allocate();
        assert!(!surface.handle_event(&mut Event::asset_load(other)));

        assert!(surface.handle_event(&mut Event::resize(id, 320.0, 180.0)));
        assert_eq!(surface.phase(), ReadinessPhase::Ready);
        assert_eq!(surface.filter().dimensions, Dimensions::new(320.0, 180.0));
    }

    #[test]
    fn test_resize_after_ready_resynthesizes_without_regressing() {
        let allocator = FilterIdAllocator::new();
        let mut surface = mount(&allocator);
        make_ready(&mut surface);
        let generation = surface.filter_generation();

        surface.observe_size(Dimensions::new(640.0, 480.0));
        assert!(surface.filter_generation() > generation);
        assert_eq!(surface.filter().dimensions, Dimensions::new(640.0, 480.0));
        assert_eq!(
            surface.readiness_state(),
            ReadinessState {
                container_measured: true,
                asset_attached: true,
            }
        );
    }

    #[test]
    fn test_reconfigure_replaces_filter() {
        let allocator = FilterIdAllocator::new();
        let mut surface = mount(&allocator);
        let id = surface.id();

        surface.set_overrides(GlassOverrides::new().scale(120.0));
        assert_eq!(surface.filter().displacement.scale, 120.0);
        assert_eq!(surface.id(), id);

        surface.set_variant(VariantName::Subtle);
        assert_eq!(surface.config().scale, 120.0);
        assert_eq!(surface.config().frost, VariantName::Subtle.base().frost);
        assert_eq!(surface.filter().frost, VariantName::Subtle.base().frost);
    }

    #[test]
    fn test_unmount_releases_id() {
        let allocator = FilterIdAllocator::new();
        let mut surface = mount(&allocator);
        surface.on(event_types::CLICK, |_| {});
        assert_eq!(allocator.live_count(), 1);

        surface.unmount(&allocator);
        assert_eq!(allocator.live_count(), 0);
        assert_ne!(mount(&allocator).id().raw(), 1);
    }
}
