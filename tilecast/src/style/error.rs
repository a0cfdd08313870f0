//! Error types for style loading.

use thiserror::Error;

/// Errors that can occur while loading or parsing a style document.
#[derive(Debug, Error)]
pub enum StyleError {
    /// Style file could not be read
    #[error("failed to read style file: {0}")]
    Io(#[from] std::io::Error),

    /// Style document is not valid JSON or violates the schema
    #[error("failed to parse style document: {0}")]
    Parse(#[from] serde_json::Error),

    /// A color value is not a valid `#rrggbb` / `#rrggbbaa` hex string
    #[error("invalid color '{0}': expected #rrggbb or #rrggbbaa")]
    InvalidColor(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_color_display() {
        let err = StyleError::InvalidColor("teal".to_string());
        assert!(err.to_string().contains("teal"));
        assert!(err.to_string().contains("#rrggbb"));
    }
}
