//! Built-in glass presets and override merging.
//!
//! A [`VariantName`] selects a base [`GlassConfig`]; a [`GlassOverrides`]
//! replaces individual fields of it. [`resolve`] is a pure function of the two,
//! so identical inputs always give identical configs.

use glaze_core::Color;
use serde::{Deserialize, Deserializer};
use std::fmt::{Display, Formatter};

/// Upper bound for distortion displacement
pub const MAX_SCALE: f32 = 300.0;

/// Chromatic aberration in px per unit of displacement scale
pub const CHROMATIC_RATIO: f32 = 0.05;

/// Built-in preset catalog.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VariantName {
    /// Balanced distortion and frost.
    #[default]
    Default,
    /// Light distortion, barely frosted.
    Subtle,
    /// Heavy refraction and strong fringing.
    Intense,
    /// Almost flat glass with no border.
    Minimal,
    /// Blur and frost without any distortion.
    Clean,
}

impl VariantName {
    /// Stable id for config/serialization.
    pub fn id(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Subtle => "subtle",
            Self::Intense => "intense",
            Self::Minimal => "minimal",
            Self::Clean => "clean",
        }
    }

    /// Full preset list.
    pub fn all() -> &'static [VariantName] {
        const VARIANTS: [VariantName; 5] = [
            VariantName::Default,
            VariantName::Subtle,
            VariantName::Intense,
            VariantName::Minimal,
            VariantName::Clean,
        ];
        &VARIANTS
    }

    /// Parse a variant name. Unrecognized names fall back to `Default`.
    pub fn parse(name: &str) -> Self {
        let normalized = name.trim().to_ascii_lowercase();
        match Self::all().iter().find(|v| v.id() == normalized) {
            Some(variant) => *variant,
            None => {
                tracing::debug!("unknown glass variant {:?}, using default", name);
                Self::Default
            }
        }
    }

    /// Base parameters for this preset.
    pub fn base(self) -> GlassConfig {
        match self {
            Self::Default => DEFAULT_PRESET,
            Self::Subtle => SUBTLE_PRESET,
            Self::Intense => INTENSE_PRESET,
            Self::Minimal => MINIMAL_PRESET,
            Self::Clean => CLEAN_PRESET,
        }
    }
}

impl Display for VariantName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl<'de> Deserialize<'de> for VariantName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::parse(&name))
    }
}

/// Effective parameters for one rendered glass surface.
///
/// Invariants after [`resolve`]: `frost` is in `[0, 1]`; `scale`, `radius`,
/// and `backdrop_blur` are finite and non-negative.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlassConfig {
    /// Distortion intensity (displacement map scale)
    pub scale: f32,
    /// Corner radius in px
    pub radius: f32,
    /// Backdrop blur radius in px
    pub backdrop_blur: f32,
    /// Background tint strength
    pub frost: f32,
    /// Border/glow color, `None` for no border
    pub border_color: Option<Color>,
}

impl GlassConfig {
    /// Displacement actually applied by the filter
    pub fn displacement(&self) -> f32 {
        self.scale.clamp(0.0, MAX_SCALE)
    }

    /// Channel separation in px, derived from the distortion scale.
    ///
    /// Linear in the clamped displacement, so it is monotonic and continuous
    /// and every variant shares one visual language.
    pub fn chromatic_aberration(&self) -> f32 {
        self.displacement() * CHROMATIC_RATIO
    }
}

impl Default for GlassConfig {
    fn default() -> Self {
        DEFAULT_PRESET
    }
}

const DEFAULT_PRESET: GlassConfig = GlassConfig {
    scale: 70.0,
    radius: 24.0,
    backdrop_blur: 12.0,
    frost: 0.10,
    border_color: Some(Color::rgba(1.0, 1.0, 1.0, 0.25)),
};

const SUBTLE_PRESET: GlassConfig = GlassConfig {
    scale: 30.0,
    radius: 20.0,
    backdrop_blur: 8.0,
    frost: 0.05,
    border_color: Some(Color::rgba(1.0, 1.0, 1.0, 0.15)),
};

const INTENSE_PRESET: GlassConfig = GlassConfig {
    scale: 140.0,
    radius: 28.0,
    backdrop_blur: 20.0,
    frost: 0.20,
    border_color: Some(Color::rgba(1.0, 1.0, 1.0, 0.40)),
};

const MINIMAL_PRESET: GlassConfig = GlassConfig {
    scale: 15.0,
    radius: 12.0,
    backdrop_blur: 4.0,
    frost: 0.02,
    border_color: None,
};

const CLEAN_PRESET: GlassConfig = GlassConfig {
    scale: 0.0,
    radius: 16.0,
    backdrop_blur: 16.0,
    frost: 0.15,
    border_color: Some(Color::rgba(1.0, 1.0, 1.0, 0.20)),
};

/// Caller-supplied field overrides. `None` means "use the preset's value".
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlassOverrides {
    pub scale: Option<f32>,
    pub radius: Option<f32>,
    pub backdrop_blur: Option<f32>,
    pub frost: Option<f32>,
    /// `Some(None)` explicitly removes the border.
    ///
    /// In config files this is a hex color or the string `"none"`.
    #[serde(deserialize_with = "deserialize_border")]
    pub border_color: Option<Option<Color>>,
}

impl GlassOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scale(mut self, scale: f32) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn radius(mut self, radius: f32) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn backdrop_blur(mut self, blur: f32) -> Self {
        self.backdrop_blur = Some(blur);
        self
    }

    pub fn frost(mut self, frost: f32) -> Self {
        self.frost = Some(frost);
        self
    }

    pub fn border_color(mut self, color: Color) -> Self {
        self.border_color = Some(Some(color));
        self
    }

    pub fn no_border(mut self) -> Self {
        self.border_color = Some(None);
        self
    }

    /// True when no field is overridden
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn deserialize_border<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Option<Color>>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    if raw.trim().eq_ignore_ascii_case("none") {
        return Ok(Some(None));
    }
    raw.parse::<Color>()
        .map(|c| Some(Some(c)))
        .map_err(serde::de::Error::custom)
}

/// Merge `overrides` over the base parameters of `variant`.
///
/// Each field takes the override when one is given and it is a finite number;
/// otherwise the preset's value. Results are clamped into their valid ranges
/// rather than rejected.
pub fn resolve(variant: VariantName, overrides: &GlassOverrides) -> GlassConfig {
    let base = variant.base();

    let config = GlassConfig {
        scale: pick(overrides.scale, base.scale).max(0.0),
        radius: pick(overrides.radius, base.radius).max(0.0),
        backdrop_blur: pick(overrides.backdrop_blur, base.backdrop_blur).max(0.0),
        frost: pick(overrides.frost, base.frost).clamp(0.0, 1.0),
        border_color: match overrides.border_color {
            Some(color) => color.map(Color::clamped),
            None => base.border_color,
        },
    };

    tracing::trace!(
        "resolved glass variant {} with overrides {:?} -> {:?}",
        variant,
        overrides,
        config
    );
    config
}

/// [`resolve`] with a variant given by name (unknown names use the default).
pub fn resolve_named(variant: &str, overrides: &GlassOverrides) -> GlassConfig {
    resolve(VariantName::parse(variant), overrides)
}

fn pick(value: Option<f32>, base: f32) -> f32 {
    value.filter(|v| v.is_finite()).unwrap_or(base)
}
