//! Error types for rasterization and encoding.

use thiserror::Error;

/// Errors that can occur while rasterizing a tile.
#[derive(Debug, Clone, Error)]
pub enum RenderError {
    /// `render()` was called before any extent was configured
    #[error("no extent configured for render")]
    NoExtent,

    /// Rasterization failed (bad dimensions, buffer mismatch)
    #[error("rasterization failed: {0}")]
    Raster(String),
}

/// Error produced by a [`TileEncoder`](crate::render::TileEncoder).
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct EncodeError {
    /// Human-readable failure detail
    pub message: String,
}

impl EncodeError {
    /// Creates an encode error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
