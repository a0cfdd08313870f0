//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module is the single place where INI key names are mapped to
//! struct fields. Starts from `ConfigFile::default()` and overlays any
//! values found in the INI.

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use ini::Ini;
use std::path::PathBuf;

pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    if let Some(section) = ini.section(Some("server")) {
        if let Some(v) = section.get("address") {
            config.server.address = v.trim().to_string();
        }
        if let Some(v) = section.get("port") {
            config.server.port = parse_value("server", "port", v, "must be a port number")?;
        }
        if let Some(v) = section.get("dev_mode") {
            config.server.dev_mode = parse_bool("server", "dev_mode", v)?;
        }
    }

    if let Some(section) = ini.section(Some("style")) {
        if let Some(v) = section.get("path") {
            let v = v.trim();
            if !v.is_empty() {
                config.style.path = Some(PathBuf::from(v));
            }
        }
    }

    if let Some(section) = ini.section(Some("render")) {
        if let Some(v) = section.get("tile_size") {
            let tile_size: u32 =
                parse_value("render", "tile_size", v, "must be a positive integer")?;
            if tile_size == 0 || tile_size > 4096 {
                return Err(ConfigFileError::InvalidValue {
                    section: "render".to_string(),
                    key: "tile_size".to_string(),
                    value: v.to_string(),
                    reason: "must be between 1 and 4096".to_string(),
                });
            }
            config.render.tile_size = tile_size;
        }
        if let Some(v) = section.get("renderers") {
            config.render.renderers =
                parse_value("render", "renderers", v, "must be a non-negative integer")?;
        }
    }

    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = PathBuf::from(v);
            }
        }
    }

    Ok(config)
}

fn parse_value<T: std::str::FromStr>(
    section: &str,
    key: &str,
    value: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigFileError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        })
}

fn parse_bool(section: &str, key: &str, value: &str) -> Result<bool, ConfigFileError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(ConfigFileError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: "must be true or false".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_ini_is_all_defaults() {
        let ini = Ini::new();
        let config = parse_ini(&ini).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.render.tile_size, 256);
    }

    #[test]
    fn test_bool_variants() {
        for v in ["true", "YES", "1", "on"] {
            assert!(parse_bool("s", "k", v).unwrap());
        }
        for v in ["false", "No", "0", "off"] {
            assert!(!parse_bool("s", "k", v).unwrap());
        }
        assert!(parse_bool("s", "k", "maybe").is_err());
    }

    #[test]
    fn test_tile_size_bounds() {
        let mut ini = Ini::new();
        ini.with_section(Some("render")).set("tile_size", "0");
        assert!(parse_ini(&ini).is_err());

        let mut ini = Ini::new();
        ini.with_section(Some("render")).set("tile_size", "8192");
        assert!(parse_ini(&ini).is_err());

        let mut ini = Ini::new();
        ini.with_section(Some("render")).set("tile_size", "512");
        assert_eq!(parse_ini(&ini).unwrap().render.tile_size, 512);
    }
}
