//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

/// Complete application configuration loaded from tilecast.ini.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    /// HTTP server settings
    pub server: ServerSettings,
    /// Style document settings
    pub style: StyleSettings,
    /// Render engine settings
    pub render: RenderSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// IP address to bind to
    pub address: String,
    /// Port to listen on
    pub port: u16,
    /// Surface internal error detail in 500 bodies
    pub dev_mode: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".to_string(),
            port: 8080,
            dev_mode: false,
        }
    }
}

/// Style document configuration.
#[derive(Debug, Clone, Default)]
pub struct StyleSettings {
    /// Path to the JSON style document; required unless given on the CLI
    pub path: Option<PathBuf>,
}

/// Render engine configuration.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    /// Tile edge length in pixels
    pub tile_size: u32,
    /// Pooled render contexts; 0 means one per CPU
    pub renderers: usize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            tile_size: 256,
            renderers: 0,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: PathBuf::from("logs/tilecast.log"),
        }
    }
}
