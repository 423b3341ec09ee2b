//! Error types
//!
//! Only loading configuration can fail. Resolving presets, synthesizing
//! filters, readiness transitions, and rendering are infallible: bad visual
//! parameters degrade to valid ones instead of erroring.

use std::io;
use thiserror::Error;

/// Errors that can occur when loading surface configuration
#[derive(Error, Debug)]
pub enum GlassError {
    /// IO error when reading a config file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Malformed TOML or field value
    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),
}
