//! Tilecast CLI - command-line interface
//!
//! This binary serves rendered map tiles over HTTP from a JSON style
//! document.

mod error;
mod runner;

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "tilecast")]
#[command(about = "Serve rendered Web Mercator map tiles over HTTP", long_about = None)]
pub struct Args {
    /// Path to the JSON style document
    #[arg(long)]
    pub style: Option<PathBuf>,

    /// Path to the INI config file (default: tilecast.ini)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// IP address to bind to
    #[arg(long)]
    pub address: Option<String>,

    /// Port to listen on
    #[arg(long)]
    pub port: Option<u16>,

    /// Tile edge length in pixels
    #[arg(long)]
    pub tile_size: Option<u32>,

    /// Number of pooled render contexts (default: one per CPU)
    #[arg(long)]
    pub renderers: Option<usize>,

    /// Surface internal error detail in 500 responses
    #[arg(long)]
    pub dev: bool,

    /// Enable debug-level logging
    #[arg(long)]
    pub debug: bool,
}

fn main() {
    let args = Args::parse();
    if let Err(e) = runner::run(args) {
        e.exit();
    }
}
