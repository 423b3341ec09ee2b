//! Glaze Glass
//!
//! The liquid glass surface primitive: blurred, translucent, chromatically
//! aberrated surfaces that never flash unstyled content.
//!
//! # Features
//!
//! - **Presets**: five named variants merged with typed, field-level overrides
//! - **Filter synthesis**: a displacement + chromatic aberration filter per
//!   instance, bound by an id no other mounted instance shares
//! - **Readiness**: the effect stays hidden until the container is measured
//!   and the filter asset has attached, in either order, and never regresses
//! - **Rendering**: a layered surface whose content is always present and
//!   interactive while the effect fades in
//!
//! # Example
//!
//! ```rust
//! use glaze_glass::prelude::*;
//!
//! let mut ctx = GlassContext::new();
//! let card = ctx.mount(
//!     SurfaceConfig::new(VariantName::Subtle)
//!         .with_overrides(GlassOverrides::new().frost(0.9)),
//!     Layer::ui(UiNode::new(1)),
//! );
//!
//! let surface = ctx.get_mut(card).unwrap();
//! assert_eq!(surface.config().frost, 0.9);
//! assert!(surface.should_show_fallback());
//!
//! surface.observe_size(Size::new(200.0, 100.0));
//! surface.attach_asset();
//! assert!(!surface.should_show_fallback());
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod filter;
pub mod preset;
pub mod readiness;
pub mod surface;

pub use config::{SurfaceAttributes, SurfaceConfig, TransitionConfig};
pub use context::{GlassContext, SurfaceKey};
pub use error::GlassError;
pub use filter::{
    synthesize, ChromaticOffsets, Dimensions, DisplacementParams, FilterDefinition,
    FilterSynthesizer,
};
pub use preset::{resolve, resolve_named, GlassConfig, GlassOverrides, VariantName};
pub use readiness::{ReadinessCoordinator, ReadinessPhase, ReadinessSignal, ReadinessState};
pub use surface::{layer_names, GlassSurface};

/// Prelude module - import everything commonly needed
pub mod prelude {
    pub use crate::config::{SurfaceAttributes, SurfaceConfig};
    pub use crate::context::{GlassContext, SurfaceKey};
    pub use crate::error::GlassError;
    pub use crate::preset::{resolve, GlassConfig, GlassOverrides, VariantName};
    pub use crate::readiness::{ReadinessPhase, ReadinessState};
    pub use crate::surface::{layer_names, GlassSurface};

    // Core types
    pub use glaze_animation::Easing;
    pub use glaze_core::events::event_types;
    pub use glaze_core::{Color, Event, EventTarget, FilterIdAllocator, Layer, Size, UiNode};
}
