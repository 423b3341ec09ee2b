//! Glaze Core
//!
//! Foundational types shared by the Glaze glass-surface crates:
//!
//! - **Geometry & color**: sizes, corner radii, RGBA colors with hex parsing
//! - **Layer model**: a renderer-agnostic tree describing what a surface draws
//! - **Event dispatch**: interaction events and observation signals (resize,
//!   asset load) in one shape
//! - **Filter identities**: an injectable allocator handing out ids that are
//!   unique across every concurrently mounted surface
//!
//! # Example
//!
//! ```rust
//! use glaze_core::{FilterIdAllocator, Layer, UiNode};
//!
//! let allocator = FilterIdAllocator::new();
//! let a = allocator.allocate();
//! let b = allocator.allocate();
//! assert_ne!(a, b);
//!
//! let tree = Layer::stack(vec![Layer::ui(UiNode::new(1)).named("content")]);
//! assert!(tree.find_named("content").is_some());
//! ```

pub mod color;
pub mod events;
pub mod geometry;
pub mod id;
pub mod layer;

pub use color::{Color, ColorParseError};
pub use events::{Event, EventData, EventDispatcher, EventTarget, EventType};
pub use geometry::{CornerRadius, Size, Vec2};
pub use id::{FilterId, FilterIdAllocator};
pub use layer::{Layer, LayerProperties, PointerEvents, UiNode};
