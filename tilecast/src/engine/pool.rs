//! Context pool for render concurrency control.
//!
//! The renderer's mutable current-extent state makes each context
//! single-owner: two renders interleaving on one context would overwrite
//! each other's extent and produce wrong pixels. Instead of one context
//! behind a single lock, the pool keeps N independent contexts checked in
//! and out of a free list, with a bounded semaphore as the capacity gate.
//! Requests beyond capacity queue on the semaphore rather than interleave;
//! a pool of one reproduces the single-global-lock discipline.

use crate::render::RenderContext;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// A bounded pool of render contexts.
#[derive(Debug)]
pub struct ContextPool {
    semaphore: Arc<Semaphore>,
    free: Arc<Mutex<Vec<RenderContext>>>,
    capacity: usize,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
}

impl ContextPool {
    /// Creates a pool of `capacity` contexts produced by `make_context`.
    pub fn new<F>(capacity: usize, make_context: F) -> Self
    where
        F: Fn() -> RenderContext,
    {
        assert!(capacity > 0, "capacity must be > 0");
        let contexts = (0..capacity).map(|_| make_context()).collect();
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            free: Arc::new(Mutex::new(contexts)),
            capacity,
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Checks a context out of the pool, waiting if all are in use.
    ///
    /// The context returns to the pool when the guard is dropped. Once
    /// checked out, a render runs to completion; there is no mid-render
    /// cancellation path that could leave a context in a dirty state.
    pub async fn acquire(&self) -> PooledContext {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("semaphore closed unexpectedly");

        let context = self
            .free
            .lock()
            .expect("context pool mutex poisoned")
            .pop()
            .expect("free list empty while permit held");

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);

        PooledContext {
            context: Some(context),
            free: Arc::clone(&self.free),
            in_flight: Arc::clone(&self.in_flight),
            _permit: permit,
        }
    }

    /// Total number of contexts in the pool.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Contexts currently checked out.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of contexts ever simultaneously checked out.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

/// A render context checked out of a [`ContextPool`].
///
/// Dereferences to [`RenderContext`]; the context is pushed back to the
/// free list on drop, after which the permit releases the capacity slot.
#[derive(Debug)]
pub struct PooledContext {
    context: Option<RenderContext>,
    free: Arc<Mutex<Vec<RenderContext>>>,
    in_flight: Arc<AtomicUsize>,
    _permit: OwnedSemaphorePermit,
}

impl Deref for PooledContext {
    type Target = RenderContext;

    fn deref(&self) -> &Self::Target {
        self.context.as_ref().expect("context taken before drop")
    }
}

impl DerefMut for PooledContext {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.context.as_mut().expect("context taken before drop")
    }
}

impl Drop for PooledContext {
    fn drop(&mut self) {
        if let Some(context) = self.context.take() {
            if let Ok(mut free) = self.free.lock() {
                free.push(context);
            }
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
