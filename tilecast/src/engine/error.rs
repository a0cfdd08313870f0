//! Error types for the render engine.

use crate::render::{EncodeError, RenderError};
use thiserror::Error;

/// Errors that can occur operating the render engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Engine has not (yet) transitioned to Ready
    #[error("render engine is not ready")]
    NotReady,

    /// `initialize` was called more than once
    #[error("render engine initialization already started")]
    AlreadyInitializing,

    /// Style load failed; the engine will never become Ready
    #[error("style load failed: {0}")]
    LoadFailed(String),

    /// Rasterization failed for one request
    #[error("render failed: {0}")]
    RenderFailed(String),

    /// Encoding failed for one request
    #[error("encode failed: {0}")]
    EncodeFailed(String),

    /// Internal error (e.g. a blocking task panicked)
    #[error("internal engine error: {0}")]
    Internal(String),
}

impl From<RenderError> for EngineError {
    fn from(err: RenderError) -> Self {
        EngineError::RenderFailed(err.to_string())
    }
}

impl From<EncodeError> for EngineError {
    fn from(err: EncodeError) -> Self {
        EngineError::EncodeFailed(err.message)
    }
}
