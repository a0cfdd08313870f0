//! HTTP boundary.
//!
//! Exposes `GET /{z}/{x}/{y}.png` plus status endpoints (`/`, `/health`,
//! `/status` all answer the same health check), maps service
//! errors to status codes, and keeps internal failure detail out of
//! response bodies unless dev mode is on. The routing layer only supplies
//! validated strings and forwards bytes; all tile semantics live in the
//! service.

use crate::service::{ServiceError, TileBackend, TileService};
use axum::extract::{Path, Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::{error, info, warn};

/// Errors that can occur running the HTTP server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Could not bind the listen address
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// The accept loop failed
    #[error("server error: {0}")]
    Serve(std::io::Error),
}

/// Shared state for the HTTP handlers.
pub struct AppState<B> {
    service: TileService<B>,
    dev_mode: bool,
}

impl<B: TileBackend> AppState<B> {
    /// Creates handler state.
    ///
    /// With `dev_mode` set, internal error detail is surfaced in 500
    /// bodies; otherwise clients only get a generic message.
    pub fn new(service: TileService<B>, dev_mode: bool) -> Self {
        Self { service, dev_mode }
    }
}

/// Builds the router for the tile server.
pub fn router<B: TileBackend + 'static>(state: Arc<AppState<B>>) -> Router {
    Router::new()
        .route("/", get(status_handler::<B>))
        .route("/health", get(status_handler::<B>))
        .route("/status", get(status_handler::<B>))
        .route("/:z/:x/:y", get(tile_handler::<B>))
        .layer(middleware::from_fn(log_request_response))
        .layer(CatchPanicLayer::new())
        .with_state(state)
}

/// Binds the address and serves until SIGINT/SIGTERM.
///
/// In-flight renders run to completion during shutdown; only request
/// intake stops.
pub async fn serve<B: TileBackend + 'static>(
    addr: SocketAddr,
    state: Arc<AppState<B>>,
) -> Result<(), ServerError> {
    let app = router(state);
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    info!("tile server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)?;

    info!("tile server stopped");
    Ok(())
}

async fn tile_handler<B: TileBackend + 'static>(
    State(state): State<Arc<AppState<B>>>,
    Path((z, x, y)): Path<(String, String, String)>,
) -> Response {
    // The route matches any final segment; only `.png` names are tiles.
    let Some(row) = y.strip_suffix(".png") else {
        return (StatusCode::NOT_FOUND, "not found\n").into_response();
    };

    match state.service.handle_tile_request(&z, &x, row).await {
        Ok(tile) => (
            [(header::CONTENT_TYPE, tile.content_type)],
            tile.bytes,
        )
            .into_response(),
        Err(err) => error_response(&err, state.dev_mode),
    }
}

async fn status_handler<B: TileBackend + 'static>(
    State(state): State<Arc<AppState<B>>>,
) -> Response {
    let engine_state = state.service.engine_state();
    let body = json!({
        "version": crate::VERSION,
        "engine": {
            "state": engine_state.as_str(),
            "reason": engine_state.failure_reason(),
        },
        "health": state.service.health_snapshot(),
    });
    Json(body).into_response()
}

fn error_response(err: &ServiceError, dev_mode: bool) -> Response {
    if err.is_client_error() {
        warn!(error = %err, "rejected tile request");
        return (StatusCode::BAD_REQUEST, format!("{}\n", err)).into_response();
    }
    if err.is_unavailable() {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            "Tile engine is not ready\n",
        )
            .into_response();
    }

    // Internal detail is logged but never leaked to clients by default.
    error!(error = %err, "Error rendering tile");
    let body = if dev_mode {
        format!("Error rendering tile: {}\n", err)
    } else {
        "Error rendering tile\n".to_string()
    };
    (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
}

async fn log_request_response(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let response = next.run(req).await;
    info!(%method, %path, status = %response.status(), "request");
    response
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to install SIGINT handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => error!(error = %e, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
