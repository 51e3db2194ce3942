//! Errors raised while building a simulation or loading its assets.
//!
//! Everything past start-up is a closed simulation: bad ball ids and other
//! broken invariants panic instead of surfacing here.

use thiserror::Error;

use crate::api::types::BallId;

/// Errors that abort start-up.
#[derive(Debug, Error)]
pub enum SetupError {
    /// A cushion polygon has no area (fewer than three distinct points).
    #[error("cushion {index} is degenerate")]
    DegenerateCushion { index: usize },

    /// The same ball id was registered with the engine twice.
    #[error("ball {0:?} already exists")]
    DuplicateBall(BallId),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The asset manifest is missing a required image.
    #[error("missing asset: {0}")]
    MissingAsset(String),

    /// The asset manifest is not valid JSON for the expected shape.
    #[error("malformed asset manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

impl SetupError {
    /// Create an invalid config error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a missing asset error.
    pub fn missing_asset(msg: impl Into<String>) -> Self {
        Self::MissingAsset(msg.into())
    }
}
