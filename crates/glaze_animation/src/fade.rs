//! Opacity fades
//!
//! A [`Fade`] moves a single value toward a target over a fixed duration with
//! an easing curve. Retargeting mid-flight starts the new leg from the value
//! currently on screen, so a fade never jumps.

use crate::easing::Easing;

/// Default fade duration in milliseconds
pub const DEFAULT_FADE_MS: u32 = 300;

/// A timed transition of one value
#[derive(Clone, Debug)]
pub struct Fade {
    from: f32,
    to: f32,
    elapsed_ms: f32,
    duration_ms: u32,
    easing: Easing,
    playing: bool,
}

impl Fade {
    /// Create a settled fade resting at `value`
    pub fn new(value: f32, duration_ms: u32, easing: Easing) -> Self {
        Self {
            from: value,
            to: value,
            elapsed_ms: 0.0,
            duration_ms,
            easing,
            playing: false,
        }
    }

    /// Start moving toward `target` from the current value
    pub fn fade_to(&mut self, target: f32) {
        if target == self.to {
            return;
        }
        self.from = self.value();
        self.to = target;
        self.elapsed_ms = 0.0;
        self.playing = self.duration_ms > 0 && self.from != target;
        tracing::trace!(
            "fade {:.3} -> {:.3} over {}ms",
            self.from,
            self.to,
            self.duration_ms
        );
    }

    /// Settle immediately at `value`
    pub fn jump_to(&mut self, value: f32) {
        self.from = value;
        self.to = value;
        self.elapsed_ms = 0.0;
        self.playing = false;
    }

    /// Advance the fade. Returns true while it still needs frames.
    pub fn tick(&mut self, dt_ms: f32) -> bool {
        if !self.playing {
            return false;
        }

        self.elapsed_ms += dt_ms.max(0.0);
        if self.elapsed_ms >= self.duration_ms as f32 {
            self.elapsed_ms = self.duration_ms as f32;
            self.playing = false;
        }
        self.playing
    }

    /// Current value
    pub fn value(&self) -> f32 {
        if !self.playing || self.duration_ms == 0 {
            return self.to;
        }
        let progress = self.elapsed_ms / self.duration_ms as f32;
        self.from + (self.to - self.from) * self.easing.apply(progress)
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    pub fn is_settled(&self) -> bool {
        !self.playing
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }
}

impl Default for Fade {
    fn default() -> Self {
        Self::new(0.0, DEFAULT_FADE_MS, Easing::default())
    }
}
