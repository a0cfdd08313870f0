//! Rasterization and encoding.
//!
//! `RenderContext` rasterizes the loaded style for one extent at a time;
//! `TileEncoder` turns the resulting image into wire bytes. Both are used
//! exclusively through the engine, which owns the concurrency discipline.

mod context;
mod encoder;
mod error;

pub use context::{RenderContext, DEFAULT_TILE_SIZE};
pub use encoder::{PngTileEncoder, TileEncoder};
pub use error::{EncodeError, RenderError};
