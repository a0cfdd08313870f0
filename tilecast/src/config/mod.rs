//! Configuration for tilecast components.
//!
//! Settings come from an INI file with per-section structs; CLI flags
//! overlay file values at startup. Missing files fall back to defaults so
//! the server can be driven entirely from the command line.

mod file;
mod parser;
mod settings;

pub use file::ConfigFileError;
pub use settings::{ConfigFile, LoggingSettings, RenderSettings, ServerSettings, StyleSettings};
