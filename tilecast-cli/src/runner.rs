//! CLI runner for setup and server lifecycle.
//!
//! Wires configuration, logging, engine initialization and the HTTP
//! server together. The style load runs as a background task so the
//! server starts accepting requests immediately; requests arriving before
//! the engine is Ready get 503 responses.

use crate::error::CliError;
use crate::Args;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tilecast::config::ConfigFile;
use tilecast::engine::{EngineConfig, RenderEngine};
use tilecast::logging::init_logging;
use tilecast::render::PngTileEncoder;
use tilecast::server::{serve, AppState};
use tilecast::service::TileService;
use tracing::{error, info};

/// Runs the tile server until shutdown.
pub fn run(args: Args) -> Result<(), CliError> {
    let config = load_config(&args)?;

    let style_path = config.style.path.clone().ok_or(CliError::MissingStyle)?;

    let log_path = &config.logging.file;
    let log_dir = log_path
        .parent()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| ".".to_string());
    let log_file = log_path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "tilecast.log".to_string());

    // Guard must stay alive for the server's lifetime.
    let _logging_guard = init_logging(&log_dir, &log_file, args.debug)
        .map_err(|e| CliError::LoggingInit(e.to_string()))?;

    info!("tilecast v{}", tilecast::VERSION);
    info!(style = %style_path.display(), "starting tile server");

    let addr: SocketAddr = format!("{}:{}", config.server.address, config.server.port)
        .parse()
        .map_err(|e| {
            CliError::Config(format!(
                "invalid listen address '{}:{}': {}",
                config.server.address, config.server.port, e
            ))
        })?;

    let renderers = if config.render.renderers == 0 {
        num_cpus::get()
    } else {
        config.render.renderers
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::Runtime(e.to_string()))?;

    runtime.block_on(async_run(
        addr,
        style_path,
        config.render.tile_size,
        renderers,
        config.server.dev_mode,
    ))
}

async fn async_run(
    addr: SocketAddr,
    style_path: PathBuf,
    tile_size: u32,
    renderers: usize,
    dev_mode: bool,
) -> Result<(), CliError> {
    let engine_config = EngineConfig::new(style_path)
        .with_tile_size(tile_size)
        .with_renderers(renderers);
    info!(renderers, tile_size, "creating render engine");

    let engine = Arc::new(RenderEngine::new(
        engine_config,
        Arc::new(PngTileEncoder::new()),
    ));

    // Load the style in the background; the server rejects tile requests
    // with 503 until the engine reports Ready. A failed load is fatal to
    // rendering but not to the process: /status stays reachable.
    let loader = Arc::clone(&engine);
    tokio::spawn(async move {
        match loader.initialize().await {
            Ok(()) => info!("style loaded, serving tiles"),
            Err(e) => error!(error = %e, "style load failed; tile requests will be rejected"),
        }
    });

    let service = TileService::new(engine);
    let state = Arc::new(AppState::new(service, dev_mode));
    serve(addr, state).await.map_err(CliError::Serve)
}

fn load_config(args: &Args) -> Result<ConfigFile, CliError> {
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from("tilecast.ini"));
    let mut config =
        ConfigFile::load_from(&config_path).map_err(|e| CliError::Config(e.to_string()))?;

    // CLI flags overlay file values.
    if let Some(style) = &args.style {
        config.style.path = Some(style.clone());
    }
    if let Some(address) = &args.address {
        config.server.address = address.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(tile_size) = args.tile_size {
        config.render.tile_size = tile_size;
    }
    if let Some(renderers) = args.renderers {
        config.render.renderers = renderers;
    }
    if args.dev {
        config.server.dev_mode = true;
    }
    Ok(config)
}
