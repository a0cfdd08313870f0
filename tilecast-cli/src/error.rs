//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;
use tilecast::server::ServerError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// No style document was given on the CLI or in the config file
    MissingStyle,
    /// Configuration error
    Config(String),
    /// Failed to create the Tokio runtime
    Runtime(String),
    /// HTTP server error
    Serve(ServerError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Serve(ServerError::Bind { addr, .. }) => {
                eprintln!();
                eprintln!("Could not listen on {}. Common issues:", addr);
                eprintln!("  1. Port already in use: pick another with --port");
                eprintln!("  2. Privileged port (<1024): use a port above 1024 or elevate");
            }
            CliError::MissingStyle => {
                eprintln!();
                eprintln!("A style document is required, e.g.:");
                eprintln!("  tilecast --style styles/basic.json");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::MissingStyle => {
                write!(f, "no style document given (use --style or [style] path)")
            }
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Runtime(msg) => write!(f, "Runtime error: {}", msg),
            CliError::Serve(e) => write!(f, "HTTP server error: {}", e),
        }
    }
}

impl std::error::Error for CliError {}
