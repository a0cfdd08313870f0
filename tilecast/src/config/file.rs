//! Config file loading.

use super::parser::parse_ini;
use super::settings::ConfigFile;
use ini::Ini;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur loading the config file.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// File exists but could not be read or parsed as INI
    #[error("failed to read config file: {0}")]
    Read(String),

    /// A value failed validation
    #[error("invalid value for [{section}] {key} = '{value}': {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

impl ConfigFile {
    /// Loads configuration from the given INI file.
    ///
    /// A missing file is not an error: defaults are returned so the server
    /// can run from CLI flags alone.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        let ini = Ini::load_from_file(path).map_err(|e| ConfigFileError::Read(e.to_string()))?;
        parse_ini(&ini)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = ConfigFile::load_from(Path::new("/nonexistent/tilecast.ini")).unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\naddress = 127.0.0.1\nport = 9000\ndev_mode = true").unwrap();
        writeln!(file, "[style]\npath = styles/basic.json").unwrap();
        writeln!(file, "[render]\ntile_size = 512\nrenderers = 4").unwrap();
        writeln!(file, "[logging]\nfile = /tmp/tc.log").unwrap();

        let config = ConfigFile::load_from(file.path()).unwrap();
        assert_eq!(config.server.address, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert!(config.server.dev_mode);
        assert_eq!(
            config.style.path.as_deref(),
            Some(Path::new("styles/basic.json"))
        );
        assert_eq!(config.render.tile_size, 512);
        assert_eq!(config.render.renderers, 4);
        assert_eq!(config.logging.file, std::path::PathBuf::from("/tmp/tc.log"));
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = seventy").unwrap();

        let err = ConfigFile::load_from(file.path()).unwrap_err();
        match err {
            ConfigFileError::InvalidValue { section, key, .. } => {
                assert_eq!(section, "server");
                assert_eq!(key, "port");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
