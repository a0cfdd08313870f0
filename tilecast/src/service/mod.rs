//! Tile service orchestration.
//!
//! Sits between the HTTP boundary and the render engine: parses and
//! validates the z/x/y path parameters, computes the tile's projected
//! extent, and hands it to the backend. Engine errors map 1:1 onto
//! service errors; there are no retries at this layer.

mod error;

pub use error::ServiceError;

use crate::coord::{tile_extent, Extent, TileAddress, WEB_MERCATOR_EXTENT};
use crate::engine::{EncodedTile, EngineError, EngineState};
use crate::health::{HealthSnapshot, ServiceHealth};
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// Backend seam between the tile service and the render engine.
///
/// [`RenderEngine`](crate::engine::RenderEngine) is the production
/// implementation; tests substitute recording fakes.
pub trait TileBackend: Send + Sync {
    /// Current engine lifecycle state.
    fn state(&self) -> EngineState;

    /// Reports whether render work is accepted.
    fn is_ready(&self) -> bool {
        self.state().is_ready()
    }

    /// Renders the extent and encodes the result.
    fn render_and_encode(
        &self,
        extent: Extent,
    ) -> impl Future<Output = Result<EncodedTile, EngineError>> + Send;
}

/// Orchestrates tile requests against a render backend.
pub struct TileService<B> {
    backend: Arc<B>,
    health: Arc<ServiceHealth>,
    world: Extent,
}

impl<B: TileBackend> TileService<B> {
    /// Creates a service over the full Web Mercator world bounds.
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            health: Arc::new(ServiceHealth::new()),
            world: WEB_MERCATOR_EXTENT,
        }
    }

    /// Current engine lifecycle state, for status reporting.
    pub fn engine_state(&self) -> EngineState {
        self.backend.state()
    }

    /// Snapshot of the service health counters.
    pub fn health_snapshot(&self) -> HealthSnapshot {
        self.health.snapshot()
    }

    /// Handles one tile request from raw path parameters.
    ///
    /// Validation order matters: malformed or out-of-range addresses are
    /// rejected before the engine is consulted, so bad input never costs a
    /// render slot and scenario tests can assert the engine was not called.
    pub async fn handle_tile_request(
        &self,
        zoom: &str,
        col: &str,
        row: &str,
    ) -> Result<EncodedTile, ServiceError> {
        let zoom = parse_param_u8("z", zoom)?;
        let col = parse_param("x", col)?;
        let row = parse_param("y", row)?;
        let addr = TileAddress::new(zoom, col, row)?;

        if !self.backend.is_ready() {
            self.health.record_rejected_not_ready();
            return Err(ServiceError::EngineNotReady);
        }

        let extent = tile_extent(addr, &self.world);
        debug!(tile = %addr, %extent, "dispatching render");

        self.health.record_started();
        match self.backend.render_and_encode(extent).await {
            Ok(tile) => {
                self.health.record_completed();
                Ok(tile)
            }
            Err(e) => {
                self.health.record_failed();
                Err(e.into())
            }
        }
    }
}

// `FromStr` for integers tolerates a leading `+`; path parameters are
// bare unsigned decimals, nothing else.
fn parse_param(name: &'static str, value: &str) -> Result<u32, ServiceError> {
    let invalid = || ServiceError::InvalidParameter {
        name,
        value: value.to_string(),
    };
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    value.parse().map_err(|_| invalid())
}

fn parse_param_u8(name: &'static str, value: &str) -> Result<u8, ServiceError> {
    let invalid = || ServiceError::InvalidParameter {
        name,
        value: value.to_string(),
    };
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    value.parse().map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Backend that records the extents it was invoked with.
    struct RecordingBackend {
        ready: AtomicBool,
        calls: Mutex<Vec<Extent>>,
        failures: AtomicUsize,
    }

    impl RecordingBackend {
        fn ready() -> Self {
            Self {
                ready: AtomicBool::new(true),
                calls: Mutex::new(Vec::new()),
                failures: AtomicUsize::new(0),
            }
        }

        fn loading() -> Self {
            let backend = Self::ready();
            backend.ready.store(false, Ordering::SeqCst);
            backend
        }

        fn failing() -> Self {
            let backend = Self::ready();
            backend.failures.store(1, Ordering::SeqCst);
            backend
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl TileBackend for RecordingBackend {
        fn state(&self) -> EngineState {
            if self.ready.load(Ordering::SeqCst) {
                EngineState::Ready
            } else {
                EngineState::Loading
            }
        }

        fn render_and_encode(
            &self,
            extent: Extent,
        ) -> impl Future<Output = Result<EncodedTile, EngineError>> + Send {
            self.calls.lock().unwrap().push(extent);
            let fail = self.failures.load(Ordering::SeqCst) > 0;
            async move {
                if fail {
                    Err(EngineError::RenderFailed("mock render failure".to_string()))
                } else {
                    Ok(EncodedTile {
                        bytes: vec![1, 2, 3],
                        content_type: "image/png",
                    })
                }
            }
        }
    }

    #[tokio::test]
    async fn test_whole_world_tile() {
        let backend = Arc::new(RecordingBackend::ready());
        let service = TileService::new(Arc::clone(&backend));
        service.handle_tile_request("0", "0", "0").await.unwrap();

        let calls = backend.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], WEB_MERCATOR_EXTENT);
    }

    #[tokio::test]
    async fn test_non_numeric_parameters_skip_engine() {
        let backend = Arc::new(RecordingBackend::ready());
        let service = TileService::new(Arc::clone(&backend));

        for (z, x, y) in [
            ("abc", "0", "0"),
            ("0", "abc", "0"),
            ("0", "0", "abc"),
            ("0", "-1", "0"),
            ("0", "", "0"),
            ("+0", "0", "0"),
            ("0", "+0", "0"),
            ("0", "0", "+0"),
            ("0", " 0", "0"),
        ] {
            let err = service.handle_tile_request(z, x, y).await.unwrap_err();
            assert!(
                matches!(err, ServiceError::InvalidParameter { .. }),
                "expected InvalidParameter for ({}, {}, {})",
                z,
                x,
                y
            );
        }
        assert_eq!(backend.call_count(), 0, "engine must not be called");
    }

    #[tokio::test]
    async fn test_out_of_range_address_skips_engine() {
        let backend = Arc::new(RecordingBackend::ready());
        let service = TileService::new(Arc::clone(&backend));

        let err = service.handle_tile_request("2", "4", "0").await.unwrap_err();
        assert!(matches!(err, ServiceError::AddressOutOfRange(_)));
        let err = service.handle_tile_request("2", "0", "4").await.unwrap_err();
        assert!(matches!(err, ServiceError::AddressOutOfRange(_)));
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_not_ready_rejects_without_engine_call() {
        let backend = Arc::new(RecordingBackend::loading());
        let service = TileService::new(Arc::clone(&backend));

        let err = service.handle_tile_request("0", "0", "0").await.unwrap_err();
        assert!(matches!(err, ServiceError::EngineNotReady));
        assert_eq!(backend.call_count(), 0);
        assert_eq!(service.health_snapshot().rejected_not_ready, 1);
    }

    #[tokio::test]
    async fn test_engine_failure_maps_and_counts() {
        let backend = Arc::new(RecordingBackend::failing());
        let service = TileService::new(Arc::clone(&backend));

        let err = service.handle_tile_request("0", "0", "0").await.unwrap_err();
        assert!(matches!(err, ServiceError::RenderFailed(_)));
        let snapshot = service.health_snapshot();
        assert_eq!(snapshot.render_failures, 1);
        assert_eq!(snapshot.tiles_served, 0);
    }

    #[tokio::test]
    async fn test_success_counts_tile_served() {
        let backend = Arc::new(RecordingBackend::ready());
        let service = TileService::new(backend);
        service.handle_tile_request("1", "1", "1").await.unwrap();
        assert_eq!(service.health_snapshot().tiles_served, 1);
        assert_eq!(service.health_snapshot().in_flight, 0);
    }
}
