//! RGBA color values
//!
//! Colors are stored as normalized `f32` channels. In configuration files they
//! are written as hex strings (`"#RRGGBB"` or `"#RRGGBBAA"`).

use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// RGBA color
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Error returned when a hex color string cannot be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid hex color `{0}` (expected #RRGGBB or #RRGGBBAA)")]
pub struct ColorParseError(pub String);

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build an opaque color from a `0xRRGGBB` literal
    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self::rgb(r, g, b)
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha;
        self
    }

    /// Clamp every channel into `[0, 1]`
    pub fn clamped(self) -> Self {
        Self {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
            a: self.a.clamp(0.0, 1.0),
        }
    }

    /// CSS `rgba()` notation, used for SVG attributes and inline styles
    pub fn to_css(&self) -> String {
        let c = self.clamped();
        format!(
            "rgba({}, {}, {}, {})",
            channel_to_u8(c.r),
            channel_to_u8(c.g),
            channel_to_u8(c.b),
            trim_float(c.a)
        )
    }

    /// `#RRGGBB` notation, alpha dropped
    pub fn to_rgb_hex(&self) -> String {
        let c = self.clamped();
        format!(
            "#{:02x}{:02x}{:02x}",
            channel_to_u8(c.r),
            channel_to_u8(c.g),
            channel_to_u8(c.b)
        )
    }

    /// `#RRGGBBAA` notation
    pub fn to_hex_string(&self) -> String {
        let c = self.clamped();
        format!(
            "#{:02x}{:02x}{:02x}{:02x}",
            channel_to_u8(c.r),
            channel_to_u8(c.g),
            channel_to_u8(c.b),
            channel_to_u8(c.a)
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches('#');
        let err = || ColorParseError(s.to_string());

        if !(digits.len() == 6 || digits.len() == 8) || !digits.is_ascii() {
            return Err(err());
        }

        let channel = |i: usize| -> Result<f32, ColorParseError> {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|_| err())
        };

        let a = if digits.len() == 8 { channel(6)? } else { 1.0 };
        Ok(Color::rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex_string())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

fn channel_to_u8(v: f32) -> u8 {
    (v * 255.0).round() as u8
}

/// Format a float without trailing zeros (`0.25`, `1`, `0.5`)
pub fn trim_float(v: f32) -> String {
    let s = format!("{:.3}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() || s == "-" || s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}
