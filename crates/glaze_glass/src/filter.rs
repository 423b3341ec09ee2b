//! Distortion filter synthesis
//!
//! Turns a resolved [`GlassConfig`] plus the measured surface size into the
//! parameters of a displacement + chromatic-aberration filter graph:
//!
//! ```text
//! fractal noise ──► displacement map ──┬─► red   channel ─► offset +m ─┐
//!                                      ├─► green channel ──────────────┼─► screen blend
//!                                      └─► blue  channel ─► offset -m ─┘
//! ```
//!
//! Every definition carries the [`FilterId`] of the surface that owns it. The
//! id is never derived from the config, so two surfaces with identical
//! parameters still get distinct filters.

use std::fmt::Write;

use glaze_core::color::trim_float;
use glaze_core::{FilterId, Size, Vec2};

use crate::preset::GlassConfig;

/// Measured size of a rendered surface
pub type Dimensions = Size;

/// Noise frequency used before the surface has been measured
pub const DEFAULT_BASE_FREQUENCY: f32 = 0.008;

/// Number of noise periods spanning each axis of a measured surface
const RIPPLES_PER_AXIS: f32 = 3.0;
const MIN_BASE_FREQUENCY: f32 = 0.002;
const MAX_BASE_FREQUENCY: f32 = 0.05;

/// Fractal noise octaves
pub const NOISE_OCTAVES: u32 = 2;

/// Displacement map parameters
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplacementParams {
    /// Displacement in px, clamped to `[0, MAX_SCALE]`
    pub scale: f32,
    /// Noise frequency per axis
    pub base_frequency: Vec2,
    pub octaves: u32,
    pub seed: u32,
}

/// Per-channel offsets producing color fringing
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChromaticOffsets {
    pub red: Vec2,
    pub green: Vec2,
    pub blue: Vec2,
}

impl ChromaticOffsets {
    /// Offsets for a separation of `magnitude` px along x
    pub fn horizontal(magnitude: f32) -> Self {
        Self {
            red: Vec2::new(magnitude, 0.0),
            green: Vec2::ZERO,
            blue: Vec2::new(-magnitude, 0.0),
        }
    }

    /// Channel separation in px
    pub fn magnitude(&self) -> f32 {
        self.red.length()
    }
}

/// A complete filter definition for one surface instance
#[derive(Clone, Debug, PartialEq)]
pub struct FilterDefinition {
    pub id: FilterId,
    pub displacement: DisplacementParams,
    pub chromatic: ChromaticOffsets,
    /// Corner radius passed through as geometry
    pub radius: f32,
    /// Backdrop blur passed through as style
    pub blur: f32,
    pub frost: f32,
    pub border_color: Option<glaze_core::Color>,
    /// Size the geometry was derived from
    pub dimensions: Dimensions,
}

/// Build the filter definition for `config` at `dimensions`.
pub fn synthesize(id: FilterId, config: &GlassConfig, dimensions: Dimensions) -> FilterDefinition {
    let displacement = config.displacement();

    FilterDefinition {
        id,
        displacement: DisplacementParams {
            scale: displacement,
            base_frequency: base_frequency(dimensions),
            octaves: NOISE_OCTAVES,
            seed: (id.raw() % 10_000) as u32,
        },
        chromatic: ChromaticOffsets::horizontal(config.chromatic_aberration()),
        radius: config.radius,
        blur: config.backdrop_blur,
        frost: config.frost,
        border_color: config.border_color,
        dimensions,
    }
}

/// Noise frequency so that a fixed number of ripples span each axis.
///
/// Non-square surfaces get non-uniform frequencies.
fn base_frequency(dimensions: Dimensions) -> Vec2 {
    if !dimensions.is_nonzero() {
        return Vec2::new(DEFAULT_BASE_FREQUENCY, DEFAULT_BASE_FREQUENCY);
    }
    let axis = |extent: f32| (RIPPLES_PER_AXIS / extent).clamp(MIN_BASE_FREQUENCY, MAX_BASE_FREQUENCY);
    Vec2::new(axis(dimensions.width), axis(dimensions.height))
}

impl FilterDefinition {
    /// SVG `<filter>` element bound to this definition's id
    pub fn to_svg_filter(&self) -> String {
        let d = &self.displacement;
        let mut svg = String::new();

        let _ = write!(
            svg,
            r#"<filter id="{}" color-interpolation-filters="sRGB">"#,
            self.id.element_id()
        );
        let _ = write!(
            svg,
            r#"<feTurbulence type="fractalNoise" baseFrequency="{} {}" numOctaves="{}" seed="{}" result="noise"/>"#,
            trim_float(d.base_frequency.x),
            trim_float(d.base_frequency.y),
            d.octaves,
            d.seed
        );
        let _ = write!(
            svg,
            r#"<feDisplacementMap in="SourceGraphic" in2="noise" scale="{}" xChannelSelector="R" yChannelSelector="G" result="displaced"/>"#,
            trim_float(d.scale)
        );

        let channels = [
            ("red", "1 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 1 0", self.chromatic.red),
            ("green", "0 0 0 0 0 0 1 0 0 0 0 0 0 0 0 0 0 0 1 0", self.chromatic.green),
            ("blue", "0 0 0 0 0 0 0 0 0 0 0 0 1 0 0 0 0 0 1 0", self.chromatic.blue),
        ];
        for (name, matrix, offset) in channels {
            let _ = write!(
                svg,
                r#"<feColorMatrix in="displaced" type="matrix" values="{matrix}" result="{name}"/>"#
            );
            let _ = write!(
                svg,
                r#"<feOffset in="{name}" dx="{}" dy="{}" result="{name}-shifted"/>"#,
                trim_float(offset.x),
                trim_float(offset.y)
            );
        }

        svg.push_str(
            r#"<feBlend in="red-shifted" in2="green-shifted" mode="screen" result="red-green"/>"#,
        );
        svg.push_str(r#"<feBlend in="red-green" in2="blue-shifted" mode="screen"/>"#);
        svg.push_str("</filter>");
        svg
    }

    /// Standalone SVG document embedding the filter.
    ///
    /// This is the asset a host attaches next to the surface; its load signal
    /// is what moves the surface to ready.
    pub fn to_svg_asset(&self) -> String {
        let extent = |v: f32| if v.is_finite() { v.max(1.0) } else { 1.0 };
        let width = extent(self.dimensions.width);
        let height = extent(self.dimensions.height);
        let tint = glaze_core::Color::WHITE;

        format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
                r#"<defs>{filter}</defs>"#,
                r#"<rect width="{w}" height="{h}" rx="{rx}" fill="{fill}" fill-opacity="{opacity}" filter="{url}"/>"#,
                r#"</svg>"#
            ),
            w = trim_float(width),
            h = trim_float(height),
            filter = self.to_svg_filter(),
            rx = trim_float(self.radius.min(width.min(height) / 2.0)),
            fill = tint.to_rgb_hex(),
            opacity = trim_float(self.frost),
            url = self.id.url(),
        )
    }
}

/// Per-instance owner of the current filter definition.
///
/// Holds the instance's id for its whole lifetime and replaces the definition
/// wholesale whenever the config or dimensions change.
#[derive(Debug)]
pub struct FilterSynthesizer {
    config: GlassConfig,
    current: FilterDefinition,
    generation: u64,
}

impl FilterSynthesizer {
    pub fn new(id: FilterId, config: &GlassConfig, dimensions: Dimensions) -> Self {
        Self {
            config: *config,
            current: synthesize(id, config, dimensions),
            generation: 0,
        }
    }

    pub fn id(&self) -> FilterId {
        self.current.id
    }

    pub fn definition(&self) -> &FilterDefinition {
        &self.current
    }

    /// Number of times the definition has been replaced
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Re-synthesize if the inputs changed. Returns true when replaced.
    pub fn update(&mut self, config: &GlassConfig, dimensions: Dimensions) -> bool {
        if *config == self.config && dimensions == self.current.dimensions {
            return false;
        }

        self.config = *config;
        self.current = synthesize(self.current.id, config, dimensions);
        self.generation += 1;

        tracing::debug!(
            "re-synthesized filter {} (generation {}, {}x{})",
            self.current.id,
            self.generation,
            dimensions.width,
            dimensions.height
        );
        true
    }
}
