//! Tilecast - Web Mercator raster tile server
//!
//! This library renders a pre-loaded cartographic style into fixed-size PNG
//! tiles addressed by zoom/column/row, and serves them over HTTP.
//!
//! # High-Level API
//!
//! ```ignore
//! use tilecast::engine::{EngineConfig, RenderEngine};
//! use tilecast::render::PngTileEncoder;
//! use tilecast::server::{serve, AppState};
//! use tilecast::service::TileService;
//! use std::sync::Arc;
//!
//! let engine = Arc::new(RenderEngine::new(
//!     EngineConfig::new("styles/basic.json"),
//!     Arc::new(PngTileEncoder::new()),
//! ));
//! engine.initialize().await?;
//!
//! let service = TileService::new(Arc::clone(&engine));
//! serve(addr, Arc::new(AppState::new(service, false))).await?;
//! ```

pub mod config;
pub mod coord;
pub mod engine;
pub mod health;
pub mod logging;
pub mod render;
pub mod server;
pub mod service;
pub mod style;

/// Version of the tilecast library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
