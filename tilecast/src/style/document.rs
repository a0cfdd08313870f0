//! Style document schema and loader.
//!
//! A style document is a JSON file describing what the renderer draws:
//! a background color and an ordered list of fill/line layers whose
//! geometry is given in projected (EPSG:3857) meters. The document is
//! parsed once at engine initialization and shared read-only across
//! render contexts afterwards.

use crate::style::StyleError;
use serde::de::{self, Deserializer};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::warn;

/// An RGBA color parsed from a `#rrggbb` or `#rrggbbaa` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Parses a hex color string.
    ///
    /// # Errors
    ///
    /// Returns `StyleError::InvalidColor` for anything that is not a
    /// `#`-prefixed 6- or 8-digit hex string.
    pub fn parse(value: &str) -> Result<Self, StyleError> {
        let invalid = || StyleError::InvalidColor(value.to_string());
        let hex = value.strip_prefix('#').ok_or_else(invalid)?;
        // from_str_radix tolerates a leading `+`; only bare hex digits here.
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let byte_at = |index: usize| -> Result<u8, StyleError> {
            u8::from_str_radix(&hex[index..index + 2], 16).map_err(|_| invalid())
        };
        match hex.len() {
            6 => Ok(Self {
                r: byte_at(0)?,
                g: byte_at(2)?,
                b: byte_at(4)?,
                a: 0xff,
            }),
            8 => Ok(Self {
                r: byte_at(0)?,
                g: byte_at(2)?,
                b: byte_at(4)?,
                a: byte_at(6)?,
            }),
            _ => Err(invalid()),
        }
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Color::parse(&raw).map_err(de::Error::custom)
    }
}

/// One drawable layer of a style document.
///
/// Geometry is expressed in projected meters; the render context maps it
/// into pixel space for whatever extent is current at render time.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StyleLayer {
    /// A filled polygon layer. Each ring is a closed sequence of `[x, y]`
    /// vertices.
    Fill {
        id: String,
        color: Color,
        rings: Vec<Vec<[f64; 2]>>,
    },
    /// A stroked line layer. Each path is an open sequence of `[x, y]`
    /// vertices; `width` is in pixels.
    Line {
        id: String,
        color: Color,
        #[serde(default = "default_line_width")]
        width: f32,
        paths: Vec<Vec<[f64; 2]>>,
    },
}

impl StyleLayer {
    /// Layer identifier, for diagnostics.
    pub fn id(&self) -> &str {
        match self {
            StyleLayer::Fill { id, .. } | StyleLayer::Line { id, .. } => id,
        }
    }
}

fn default_line_width() -> f32 {
    1.0
}

fn default_background() -> Color {
    // Matches the classic unstyled-map white.
    Color {
        r: 0xff,
        g: 0xff,
        b: 0xff,
        a: 0xff,
    }
}

/// A parsed cartographic style.
#[derive(Debug, Clone, Deserialize)]
pub struct StyleDocument {
    /// Human-readable style name
    pub name: String,
    /// Background color painted before any layer
    #[serde(default = "default_background")]
    pub background: Color,
    /// Layers drawn in order, first layer at the bottom
    #[serde(default)]
    pub layers: Vec<StyleLayer>,
}

impl StyleDocument {
    /// Parses a style document from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, StyleError> {
        let style: StyleDocument = serde_json::from_str(json)?;
        if style.layers.is_empty() {
            warn!(style = %style.name, "style loaded with no layers; tiles will be background only");
        }
        Ok(style)
    }

    /// Loads and parses a style document from a file.
    pub fn from_path(path: &Path) -> Result<Self, StyleError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC_STYLE: &str = r##"{
        "name": "basic",
        "background": "#a5bfdd",
        "layers": [
            {
                "kind": "fill",
                "id": "land",
                "color": "#f1eee8",
                "rings": [[[-10000000, -6000000], [10000000, -6000000], [0, 8000000]]]
            },
            {
                "kind": "line",
                "id": "equator",
                "color": "#cc3333aa",
                "width": 2.5,
                "paths": [[[-20037508.342789244, 0], [20037508.342789244, 0]]]
            }
        ]
    }"##;

    #[test]
    fn test_parse_basic_style() {
        let style = StyleDocument::from_json(BASIC_STYLE).unwrap();
        assert_eq!(style.name, "basic");
        assert_eq!(style.background, Color::parse("#a5bfdd").unwrap());
        assert_eq!(style.layers.len(), 2);
        assert_eq!(style.layers[0].id(), "land");
        match &style.layers[1] {
            StyleLayer::Line { color, width, paths, .. } => {
                assert_eq!(color.a, 0xaa);
                assert_eq!(*width, 2.5);
                assert_eq!(paths[0].len(), 2);
            }
            other => panic!("expected line layer, got {:?}", other),
        }
    }

    #[test]
    fn test_background_defaults_to_white() {
        let style = StyleDocument::from_json(r#"{"name": "empty"}"#).unwrap();
        assert_eq!(style.background, Color::parse("#ffffff").unwrap());
        assert!(style.layers.is_empty());
    }

    #[test]
    fn test_parse_rejects_bad_json() {
        let result = StyleDocument::from_json("{ not json");
        assert!(matches!(result.unwrap_err(), StyleError::Parse(_)));
    }

    #[test]
    fn test_parse_rejects_bad_color() {
        let result = StyleDocument::from_json(r#"{"name": "x", "background": "blue"}"#);
        // Color errors surface through serde as parse errors with the value named.
        let msg = result.unwrap_err().to_string();
        assert!(msg.contains("blue"));
    }

    #[test]
    fn test_color_parse_variants() {
        assert_eq!(
            Color::parse("#102030").unwrap(),
            Color { r: 0x10, g: 0x20, b: 0x30, a: 0xff }
        );
        assert_eq!(
            Color::parse("#10203040").unwrap(),
            Color { r: 0x10, g: 0x20, b: 0x30, a: 0x40 }
        );
        assert!(Color::parse("102030").is_err());
        assert!(Color::parse("#1020").is_err());
        assert!(Color::parse("#10203g").is_err());
        assert!(Color::parse("#aa€é").is_err());
        assert!(Color::parse("#+1+2+3").is_err());
    }

    #[test]
    fn test_from_path_missing_file() {
        let result = StyleDocument::from_path(Path::new("/nonexistent/style.json"));
        assert!(matches!(result.unwrap_err(), StyleError::Io(_)));
    }
}
