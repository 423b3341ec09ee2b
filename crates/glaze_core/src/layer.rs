//! Layer model
//!
//! Rendered output is described as a tree of composable layers. A glass
//! surface is a [`Layer::Stack`] of backdrop, filtered, border, and content
//! layers, each wrapped in [`Layer::Opacity`] where its visibility is animated.
//!
//! The model is renderer-agnostic: a host walks the tree and maps each layer
//! onto whatever it draws with (CSS + inline SVG, a GPU pass, a test harness).

use smallvec::SmallVec;

use crate::color::Color;
use crate::geometry::CornerRadius;
use crate::id::FilterId;

// ─────────────────────────────────────────────────────────────────────────────
// Layer Properties
// ─────────────────────────────────────────────────────────────────────────────

/// Pointer event behavior
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PointerEvents {
    /// Normal hit testing
    #[default]
    Auto,
    /// Transparent to input
    None,
}

/// Properties common to all layers
#[derive(Clone, Debug, Default)]
pub struct LayerProperties {
    /// Visibility (skips render entirely when false)
    pub visible: bool,

    /// Pointer event behavior
    pub pointer_events: PointerEvents,

    /// Name used for lookup and debugging
    pub name: Option<String>,

    /// Host-specific class names (e.g. CSS utility classes)
    pub class_names: SmallVec<[String; 2]>,

    /// Inline style declarations as `(property, value)` pairs
    pub style: Vec<(String, String)>,
}

impl LayerProperties {
    pub fn new() -> Self {
        Self {
            visible: true,
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Exclude this layer from hit testing
    pub fn inert(mut self) -> Self {
        self.pointer_events = PointerEvents::None;
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class_names.push(class.into());
        self
    }

    pub fn with_style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.push((property.into(), value.into()));
        self
    }

    /// Look up an inline style declaration
    pub fn style_value(&self, property: &str) -> Option<&str> {
        self.style
            .iter()
            .rev()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// UI Node
// ─────────────────────────────────────────────────────────────────────────────

/// Reference to caller-owned content in the host's node tree
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UiNode {
    /// Node identifier. Interaction on the node is aimed at
    /// `EventTarget::Node`, never at a surface id.
    pub id: u64,
}

impl UiNode {
    pub fn new(id: u64) -> Self {
        Self { id }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Layer Enum
// ─────────────────────────────────────────────────────────────────────────────

/// A node in the rendered layer tree
#[derive(Clone, Debug)]
pub enum Layer {
    /// Caller-supplied content
    Ui { node: UiNode, props: LayerProperties },

    /// Translucent tinted layer that blurs whatever is behind it
    Backdrop {
        blur: f32,
        tint: Color,
        corner_radius: CornerRadius,
        props: LayerProperties,
    },

    /// Layer that applies a synthesized filter, bound by id
    Filtered {
        filter: FilterId,
        corner_radius: CornerRadius,
        props: LayerProperties,
    },

    /// Border / glow outline
    Border {
        color: Color,
        width: f32,
        corner_radius: CornerRadius,
        props: LayerProperties,
    },

    /// Flat fill with no effects
    Fill {
        color: Color,
        corner_radius: CornerRadius,
        props: LayerProperties,
    },

    /// Stack of layers composited back to front
    Stack {
        layers: Vec<Layer>,
        props: LayerProperties,
    },

    /// Opacity applied to a layer
    Opacity {
        value: f32,
        layer: Box<Layer>,
        props: LayerProperties,
    },

    /// Empty layer (useful as placeholder)
    Empty { props: LayerProperties },
}

impl Layer {
    /// Get the layer properties
    pub fn props(&self) -> &LayerProperties {
        match self {
            Layer::Ui { props, .. }
            | Layer::Backdrop { props, .. }
            | Layer::Filtered { props, .. }
            | Layer::Border { props, .. }
            | Layer::Fill { props, .. }
            | Layer::Stack { props, .. }
            | Layer::Opacity { props, .. }
            | Layer::Empty { props } => props,
        }
    }

    /// Get mutable layer properties
    pub fn props_mut(&mut self) -> &mut LayerProperties {
        match self {
            Layer::Ui { props, .. }
            | Layer::Backdrop { props, .. }
            | Layer::Filtered { props, .. }
            | Layer::Border { props, .. }
            | Layer::Fill { props, .. }
            | Layer::Stack { props, .. }
            | Layer::Opacity { props, .. }
            | Layer::Empty { props } => props,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.props().name.as_deref()
    }

    pub fn is_visible(&self) -> bool {
        self.props().visible
    }

    /// Create an empty layer
    pub fn empty() -> Self {
        Layer::Empty {
            props: LayerProperties::new(),
        }
    }

    /// Create a content layer for a caller node
    pub fn ui(node: UiNode) -> Self {
        Layer::Ui {
            node,
            props: LayerProperties::new(),
        }
    }

    /// Create a stack of layers
    pub fn stack(layers: Vec<Layer>) -> Self {
        Layer::Stack {
            layers,
            props: LayerProperties::new(),
        }
    }

    /// Wrap this layer with opacity
    pub fn with_opacity(self, value: f32) -> Self {
        Layer::Opacity {
            value: value.clamp(0.0, 1.0),
            layer: Box::new(self),
            props: LayerProperties::new(),
        }
    }

    /// Set this layer's name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.props_mut().name = Some(name.into());
        self
    }

    /// Visit direct children
    pub fn visit_children<F: FnMut(&Layer)>(&self, mut f: F) {
        match self {
            Layer::Stack { layers, .. } => {
                for layer in layers {
                    f(layer);
                }
            }
            Layer::Opacity { layer, .. } => f(layer),
            _ => {}
        }
    }

    /// Traverse this layer and its descendants depth-first
    pub fn traverse<F: FnMut(&Layer, usize)>(&self, mut f: F) {
        fn walk<F: FnMut(&Layer, usize)>(layer: &Layer, depth: usize, f: &mut F) {
            f(layer, depth);
            layer.visit_children(|child| walk(child, depth + 1, f));
        }
        walk(self, 0, &mut f);
    }

    /// Find the first layer (depth-first) with the given name
    pub fn find_named(&self, name: &str) -> Option<&Layer> {
        if self.name() == Some(name) {
            return Some(self);
        }
        match self {
            Layer::Stack { layers, .. } => layers.iter().find_map(|l| l.find_named(name)),
            Layer::Opacity { layer, .. } => layer.find_named(name),
            _ => None,
        }
    }

    /// Total number of layers in this subtree
    pub fn layer_count(&self) -> usize {
        let mut count = 0;
        self.traverse(|_, _| count += 1);
        count
    }

    /// Every filter referenced in this subtree
    pub fn filter_refs(&self) -> Vec<FilterId> {
        let mut refs = Vec::new();
        self.traverse(|layer, _| {
            if let Layer::Filtered { filter, .. } = layer {
                refs.push(*filter);
            }
        });
        refs
    }

    /// Every caller node present in this subtree
    pub fn ui_nodes(&self) -> Vec<UiNode> {
        let mut nodes = Vec::new();
        self.traverse(|layer, _| {
            if let Layer::Ui { node, .. } = layer {
                nodes.push(*node);
            }
        });
        nodes
    }
}
