//! Glaze Animation
//!
//! Easing curves and the [`Fade`] transition used to bring glass effects in
//! smoothly once they are ready, instead of snapping them on.

pub mod easing;
pub mod fade;

pub use easing::Easing;
pub use fade::{Fade, DEFAULT_FADE_MS};
