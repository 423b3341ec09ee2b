//! Surface configuration
//!
//! Everything a consumer passes into a glass surface, loadable from TOML:
//!
//! ```toml
//! variant = "subtle"
//!
//! [overrides]
//! frost = 0.9
//! border_color = "none"
//!
//! [transition]
//! duration_ms = 450
//! easing = "ease-in-out"
//!
//! [attributes]
//! class_names = ["rounded-xl", "p-4"]
//! style = { margin = "8px" }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use glaze_animation::{Easing, DEFAULT_FADE_MS};
use serde::Deserialize;

use crate::error::GlassError;
use crate::preset::{resolve, GlassConfig, GlassOverrides, VariantName};

/// How the effect fades in once ready
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransitionConfig {
    pub duration_ms: u32,
    pub easing: Easing,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_FADE_MS,
            easing: Easing::default(),
        }
    }
}

/// Presentation attributes applied to the outermost surface layer only
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SurfaceAttributes {
    pub class_names: Vec<String>,
    pub style: BTreeMap<String, String>,
}

impl SurfaceAttributes {
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class_names.push(class.into());
        self
    }

    pub fn with_style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.insert(property.into(), value.into());
        self
    }
}

/// Full input for one glass surface
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SurfaceConfig {
    pub variant: VariantName,
    pub overrides: GlassOverrides,
    pub transition: TransitionConfig,
    pub attributes: SurfaceAttributes,
}

impl SurfaceConfig {
    pub fn new(variant: VariantName) -> Self {
        Self {
            variant,
            ..Default::default()
        }
    }

    pub fn with_overrides(mut self, overrides: GlassOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn with_transition(mut self, duration_ms: u32, easing: Easing) -> Self {
        self.transition = TransitionConfig {
            duration_ms,
            easing,
        };
        self
    }

    pub fn with_attributes(mut self, attributes: SurfaceAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Parse from a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, GlassError> {
        Ok(toml::from_str(source)?)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, GlassError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        tracing::debug!("loading surface config from {}", path.display());
        Self::from_toml_str(&source)
    }

    /// Effective glass parameters for this configuration
    pub fn resolve(&self) -> GlassConfig {
        resolve(self.variant, &self.overrides)
    }
}
