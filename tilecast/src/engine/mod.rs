//! Render engine: lifecycle, context pool, and the render+encode path.
//!
//! The engine is the only component with shared mutable state (each render
//! context's current extent), so it also owns the concurrency discipline:
//! contexts are pooled with per-context exclusivity, and capacity is gated
//! by a bounded semaphore.

mod error;
mod handle;
mod pool;
mod state;

pub use error::EngineError;
pub use handle::{EncodedTile, EngineConfig, RenderEngine};
pub use pool::{ContextPool, PooledContext};
pub use state::EngineState;
