//! Render engine handle.
//!
//! A process-wide handle wrapping the loaded cartographic style: load once,
//! render many. Initialization is single-shot behind a one-time guard; the
//! per-request path checks out a pooled context, renders and encodes on a
//! blocking worker thread, and returns the encoded bytes.

use crate::coord::Extent;
use crate::engine::{ContextPool, EngineError, EngineState};
use crate::render::{RenderContext, TileEncoder, DEFAULT_TILE_SIZE};
use crate::service::TileBackend;
use crate::style::StyleDocument;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use tokio::sync::watch;
use tokio::task::spawn_blocking;
use tracing::{debug, error, info, instrument};

/// Configuration for a [`RenderEngine`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Path to the JSON style document
    pub style_path: PathBuf,
    /// Edge length of rendered tiles in pixels
    pub tile_size: u32,
    /// Number of independent render contexts in the pool
    pub renderers: usize,
}

impl EngineConfig {
    /// Creates a configuration with default tile size and a single renderer.
    pub fn new(style_path: impl Into<PathBuf>) -> Self {
        Self {
            style_path: style_path.into(),
            tile_size: DEFAULT_TILE_SIZE,
            renderers: 1,
        }
    }

    /// Sets the tile edge length in pixels.
    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    /// Sets the number of pooled render contexts.
    pub fn with_renderers(mut self, renderers: usize) -> Self {
        self.renderers = renderers.max(1);
        self
    }
}

/// An encoded tile ready for the HTTP boundary.
///
/// Ownership of the byte buffer transfers to the caller.
#[derive(Debug, Clone)]
pub struct EncodedTile {
    /// Encoded image bytes
    pub bytes: Vec<u8>,
    /// MIME type of `bytes`
    pub content_type: &'static str,
}

/// Shared render engine handle.
///
/// Lifecycle: `Uninitialized → Loading → Ready | LoadFailed`, observable
/// through [`state`](Self::state) / [`subscribe`](Self::subscribe). Render
/// requests arriving before Ready are rejected with
/// [`EngineError::NotReady`] rather than blocking behind the load.
pub struct RenderEngine {
    config: EngineConfig,
    encoder: Arc<dyn TileEncoder>,
    state_tx: watch::Sender<EngineState>,
    init_started: AtomicBool,
    pool: OnceLock<ContextPool>,
}

impl RenderEngine {
    /// Creates an engine in the `Uninitialized` state.
    ///
    /// No I/O happens until [`initialize`](Self::initialize) is called.
    pub fn new(config: EngineConfig, encoder: Arc<dyn TileEncoder>) -> Self {
        let (state_tx, _) = watch::channel(EngineState::Uninitialized);
        Self {
            config,
            encoder,
            state_tx,
            init_started: AtomicBool::new(false),
            pool: OnceLock::new(),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> EngineState {
        self.state_tx.borrow().clone()
    }

    /// Subscribes to lifecycle state changes.
    pub fn subscribe(&self) -> watch::Receiver<EngineState> {
        self.state_tx.subscribe()
    }

    /// Reports whether the engine has transitioned to Ready.
    pub fn is_ready(&self) -> bool {
        self.state_tx.borrow().is_ready()
    }

    /// Loads the style and builds the context pool.
    ///
    /// Runs at most once per engine: concurrent or repeated calls get
    /// [`EngineError::AlreadyInitializing`] and cannot corrupt state. The
    /// load itself runs on a blocking worker thread. On failure the engine
    /// transitions to `LoadFailed` and stays there; there is no automatic
    /// retry.
    #[instrument(skip(self), fields(style = %self.config.style_path.display()))]
    pub async fn initialize(&self) -> Result<(), EngineError> {
        if self.init_started.swap(true, Ordering::SeqCst) {
            return Err(EngineError::AlreadyInitializing);
        }
        self.state_tx.send_replace(EngineState::Loading);
        info!("loading style document");

        let style_path = self.config.style_path.clone();
        let loaded = spawn_blocking(move || load_style(&style_path)).await;

        let style = match loaded {
            Ok(Ok(style)) => style,
            Ok(Err(reason)) => {
                error!(reason = %reason, "style load failed");
                self.state_tx
                    .send_replace(EngineState::LoadFailed(reason.clone()));
                return Err(EngineError::LoadFailed(reason));
            }
            Err(join_err) => {
                let reason = format!("style load task panicked: {}", join_err);
                error!(reason = %reason, "style load failed");
                self.state_tx
                    .send_replace(EngineState::LoadFailed(reason.clone()));
                return Err(EngineError::LoadFailed(reason));
            }
        };

        let style = Arc::new(style);
        let tile_size = self.config.tile_size;
        let pool = ContextPool::new(self.config.renderers, || {
            RenderContext::new(Arc::clone(&style), tile_size)
        });
        let _ = self.pool.set(pool);

        self.state_tx.send_replace(EngineState::Ready);
        info!(
            style = %style.name,
            layers = style.layers.len(),
            renderers = self.config.renderers,
            tile_size,
            "render engine ready"
        );
        Ok(())
    }

    /// Renders the given extent and encodes the result.
    ///
    /// Sets the extent on a pooled context, rasterizes a fixed-size image
    /// and encodes it, all on a blocking worker thread so one slow render
    /// does not stall request intake. The context's extent mutation is
    /// scoped to this call by the pool's exclusivity guarantee. Once
    /// admitted, the render runs to completion; there is no mid-render
    /// abort.
    pub async fn render_and_encode(&self, extent: Extent) -> Result<EncodedTile, EngineError> {
        if !self.is_ready() {
            return Err(EngineError::NotReady);
        }
        let pool = self
            .pool
            .get()
            .ok_or_else(|| EngineError::Internal("context pool missing while Ready".to_string()))?;

        let mut context = pool.acquire().await;
        let encoder = Arc::clone(&self.encoder);
        let bytes = spawn_blocking(move || -> Result<Vec<u8>, EngineError> {
            context.set_extent(extent);
            let image = context.render()?;
            let bytes = encoder.encode(&image)?;
            Ok(bytes)
        })
        .await
        .map_err(|e| EngineError::Internal(format!("render task panicked: {}", e)))??;

        debug!(%extent, size_bytes = bytes.len(), "tile rendered and encoded");
        Ok(EncodedTile {
            bytes,
            content_type: self.encoder.content_type(),
        })
    }
}

impl TileBackend for RenderEngine {
    fn state(&self) -> EngineState {
        RenderEngine::state(self)
    }

    fn render_and_encode(
        &self,
        extent: Extent,
    ) -> impl Future<Output = Result<EncodedTile, EngineError>> + Send {
        RenderEngine::render_and_encode(self, extent)
    }
}

fn load_style(path: &Path) -> Result<StyleDocument, String> {
    StyleDocument::from_path(path).map_err(|e| e.to_string())
}
