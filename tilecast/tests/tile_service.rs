//! End-to-end tile service scenarios with a recording fake backend.
//!
//! The fake encodes the extent it was called with into the tile bytes, so
//! tests can verify that each concurrent request got an image rendered
//! for its own extent and nothing else's.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tilecast::coord::{tile_extent, Extent, TileAddress, WEB_MERCATOR_EXTENT};
use tilecast::engine::{EncodedTile, EngineError, EngineState};
use tilecast::service::{ServiceError, TileBackend, TileService};

/// Serializes an extent into tile bytes so responses are attributable.
fn encode_extent(extent: &Extent) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(32);
    for v in [extent.min_x, extent.min_y, extent.max_x, extent.max_y] {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    bytes
}

fn decode_extent(bytes: &[u8]) -> Extent {
    let f = |i: usize| {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&bytes[i * 8..i * 8 + 8]);
        f64::from_le_bytes(buf)
    };
    Extent {
        min_x: f(0),
        min_y: f(1),
        max_x: f(2),
        max_y: f(3),
    }
}

/// Fake engine with a single render slot, like a one-context pool.
///
/// Records the extent observed at the moment of invocation and tracks how
/// many renders overlap, so cross-request extent corruption would show up
/// either as a wrong recorded extent or as a peak above one.
struct FakeEngine {
    ready: AtomicBool,
    slot: tokio::sync::Mutex<()>,
    seen: Mutex<Vec<Extent>>,
    active: AtomicUsize,
    peak_active: AtomicUsize,
}

impl FakeEngine {
    fn new(ready: bool) -> Self {
        Self {
            ready: AtomicBool::new(ready),
            slot: tokio::sync::Mutex::new(()),
            seen: Mutex::new(Vec::new()),
            active: AtomicUsize::new(0),
            peak_active: AtomicUsize::new(0),
        }
    }
}

impl TileBackend for FakeEngine {
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
        async move {
            let _slot = self.slot.lock().await;
            let current = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_active.fetch_max(current, Ordering::SeqCst);

            // "Set extent" then "read it back during rasterization": the
            // hold window is where interleaving would corrupt the result.
            self.seen.lock().unwrap().push(extent);
            tokio::time::sleep(Duration::from_millis(2)).await;
            let bytes = encode_extent(&extent);

            self.active.fetch_sub(1, Ordering::SeqCst);
            Ok(EncodedTile {
                bytes,
                content_type: "image/png",
            })
        }
    }
}

#[tokio::test]
async fn scenario_whole_world_at_zoom_zero() {
    let engine = Arc::new(FakeEngine::new(true));
    let service = TileService::new(Arc::clone(&engine));

    let tile = service.handle_tile_request("0", "0", "0").await.unwrap();
    assert_eq!(decode_extent(&tile.bytes), WEB_MERCATOR_EXTENT);
}

#[tokio::test]
async fn scenario_bottom_right_quadrant_at_zoom_one() {
    let engine = Arc::new(FakeEngine::new(true));
    let service = TileService::new(engine);

    let tile = service.handle_tile_request("1", "1", "1").await.unwrap();
    let extent = decode_extent(&tile.bytes);
    assert_eq!(extent.min_x, 0.0);
    assert_eq!(extent.max_x, WEB_MERCATOR_EXTENT.max_x);
    assert_eq!(extent.min_y, WEB_MERCATOR_EXTENT.min_y);
    assert_eq!(extent.max_y, 0.0);
}

#[tokio::test]
async fn scenario_non_numeric_address_never_reaches_engine() {
    let engine = Arc::new(FakeEngine::new(true));
    let service = TileService::new(Arc::clone(&engine));

    let err = service
        .handle_tile_request("1", "abc", "abc")
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidParameter { .. }));
    assert!(engine.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn scenario_request_before_ready_gets_not_ready() {
    let engine = Arc::new(FakeEngine::new(false));
    let service = TileService::new(Arc::clone(&engine));

    let err = service.handle_tile_request("0", "0", "0").await.unwrap_err();
    assert!(matches!(err, ServiceError::EngineNotReady));
    assert!(engine.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn scenario_boundary_address_is_rejected_not_wrapped() {
    let engine = Arc::new(FakeEngine::new(true));
    let service = TileService::new(Arc::clone(&engine));

    // col == 2^z and row == 2^z are one past the valid range.
    for (z, x, y) in [("0", "1", "0"), ("0", "0", "1"), ("4", "16", "0"), ("4", "0", "16")] {
        let err = service.handle_tile_request(z, x, y).await.unwrap_err();
        assert!(
            matches!(err, ServiceError::AddressOutOfRange(_)),
            "({}, {}, {}) must be out of range",
            z,
            x,
            y
        );
    }
    assert!(engine.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn concurrent_requests_do_not_cross_contaminate() {
    let engine = Arc::new(FakeEngine::new(true));
    let service = Arc::new(TileService::new(Arc::clone(&engine)));

    let zoom = 4u8;
    let mut handles = Vec::new();
    for i in 0..32u32 {
        let service = Arc::clone(&service);
        let (col, row) = (i % 8, i / 8);
        handles.push(tokio::spawn(async move {
            let tile = service
                .handle_tile_request(&zoom.to_string(), &col.to_string(), &row.to_string())
                .await
                .unwrap();
            (col, row, decode_extent(&tile.bytes))
        }));
    }

    for handle in handles {
        let (col, row, got) = handle.await.unwrap();
        let addr = TileAddress::new(zoom, col, row).unwrap();
        let expected = tile_extent(addr, &WEB_MERCATOR_EXTENT);
        assert_eq!(
            got, expected,
            "tile ({}, {}) got an extent rendered for another request",
            col, row
        );
    }

    // Single render slot: render windows must never have overlapped.
    assert_eq!(engine.peak_active.load(Ordering::SeqCst), 1);
    assert_eq!(engine.seen.lock().unwrap().len(), 32);
}
