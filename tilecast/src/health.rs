//! Service health counters.
//!
//! Thread-safe counters for the tile service, surfaced through the HTTP
//! status endpoint. Useful even when the engine never becomes Ready, since
//! the rejected-request counter keeps moving.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// A point-in-time snapshot of service health.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HealthSnapshot {
    /// Tiles rendered and returned since startup.
    pub tiles_served: u64,
    /// Render or encode failures since startup.
    pub render_failures: u64,
    /// Requests rejected because the engine was not ready.
    pub rejected_not_ready: u64,
    /// Renders currently in progress.
    pub in_flight: usize,
    /// Peak concurrent renders seen.
    pub peak_in_flight: usize,
}

/// Service health monitor with atomic counters.
#[derive(Debug, Default)]
pub struct ServiceHealth {
    tiles_served: AtomicU64,
    render_failures: AtomicU64,
    rejected_not_ready: AtomicU64,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl ServiceHealth {
    /// Creates a monitor with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a render entering the engine.
    pub fn record_started(&self) {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);
    }

    /// Records a successful render.
    pub fn record_completed(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.tiles_served.fetch_add(1, Ordering::SeqCst);
    }

    /// Records a failed render.
    pub fn record_failed(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.render_failures.fetch_add(1, Ordering::SeqCst);
    }

    /// Records a request rejected before reaching the engine.
    pub fn record_rejected_not_ready(&self) {
        self.rejected_not_ready.fetch_add(1, Ordering::SeqCst);
    }

    /// Takes a snapshot of all counters.
    pub fn snapshot(&self) -> HealthSnapshot {
        HealthSnapshot {
            tiles_served: self.tiles_served.load(Ordering::SeqCst),
            render_failures: self.render_failures.load(Ordering::SeqCst),
            rejected_not_ready: self.rejected_not_ready.load(Ordering::SeqCst),
            in_flight: self.in_flight.load(Ordering::SeqCst),
            peak_in_flight: self.peak_in_flight.load(Ordering::SeqCst),
        }
    }
}
