//! Service error types.

use crate::coord::CoordError;
use crate::engine::EngineError;
use std::fmt;

/// Errors that can occur handling a tile request.
#[derive(Debug)]
pub enum ServiceError {
    /// A path parameter was not a non-negative integer in range
    InvalidParameter { name: &'static str, value: String },
    /// The parsed address violates the grid bounds for its zoom
    AddressOutOfRange(CoordError),
    /// The render engine has not reached Ready
    EngineNotReady,
    /// Rasterization failed
    RenderFailed(String),
    /// Encoding failed
    EncodeFailed(String),
    /// Unexpected internal failure
    Internal(String),
}

impl ServiceError {
    /// True for errors caused by the request itself (400-class).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ServiceError::InvalidParameter { .. } | ServiceError::AddressOutOfRange(_)
        )
    }

    /// True while the engine is still loading or has failed to load (503-class).
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ServiceError::EngineNotReady)
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter { name, value } => {
                write!(
                    f,
                    "Invalid tile parameter '{}': '{}' is not a valid non-negative integer",
                    name, value
                )
            }
            Self::AddressOutOfRange(e) => write!(f, "Tile address out of range: {}", e),
            Self::EngineNotReady => write!(f, "Render engine is not ready"),
            Self::RenderFailed(msg) => write!(f, "Render failed: {}", msg),
            Self::EncodeFailed(msg) => write!(f, "Encode failed: {}", msg),
            Self::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::AddressOutOfRange(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CoordError> for ServiceError {
    fn from(e: CoordError) -> Self {
        Self::AddressOutOfRange(e)
    }
}

impl From<EngineError> for ServiceError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::NotReady | EngineError::LoadFailed(_) => Self::EngineNotReady,
            EngineError::RenderFailed(msg) => Self::RenderFailed(msg),
            EngineError::EncodeFailed(msg) => Self::EncodeFailed(msg),
            EngineError::AlreadyInitializing => {
                Self::Internal("engine initialization raced a render request".to_string())
            }
            EngineError::Internal(msg) => Self::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_invalid_parameter() {
        let err = ServiceError::InvalidParameter {
            name: "x",
            value: "abc".to_string(),
        };
        assert!(err.to_string().contains("'x'"));
        assert!(err.to_string().contains("abc"));
        assert!(err.is_client_error());
    }

    #[test]
    fn test_display_out_of_range() {
        let err: ServiceError = CoordError::ColumnOutOfRange { col: 4, zoom: 2 }.into();
        assert!(err.to_string().contains("out of range"));
        assert!(err.is_client_error());
        assert!(!err.is_unavailable());
    }

    #[test]
    fn test_engine_not_ready_classification() {
        let err = ServiceError::EngineNotReady;
        assert!(err.is_unavailable());
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_from_engine_error_mapping() {
        assert!(matches!(
            ServiceError::from(EngineError::NotReady),
            ServiceError::EngineNotReady
        ));
        assert!(matches!(
            ServiceError::from(EngineError::LoadFailed("x".to_string())),
            ServiceError::EngineNotReady
        ));
        assert!(matches!(
            ServiceError::from(EngineError::RenderFailed("boom".to_string())),
            ServiceError::RenderFailed(_)
        ));
        assert!(matches!(
            ServiceError::from(EngineError::EncodeFailed("boom".to_string())),
            ServiceError::EncodeFailed(_)
        ));
    }

    #[test]
    fn test_render_failure_is_server_error() {
        let err = ServiceError::RenderFailed("style reference".to_string());
        assert!(!err.is_client_error());
        assert!(!err.is_unavailable());
    }
}
