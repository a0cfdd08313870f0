//! TileEncoder trait for abstracting image encoding strategies.
//!
//! The encoder turns a raw rendered image into the byte buffer handed back
//! to the HTTP boundary. PNG is the only format the server ships, but the
//! trait keeps the seam open for others (and for mocks in tests).

use crate::render::EncodeError;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use std::io::Cursor;

/// Trait for tile encoding strategies.
///
/// Implementations must be thread-safe (`Send + Sync`) since encoding runs
/// on blocking worker threads shared across concurrent requests.
pub trait TileEncoder: Send + Sync {
    /// Encode a rendered RGBA image into the target format.
    ///
    /// # Errors
    ///
    /// Returns `EncodeError` if the image cannot be written.
    fn encode(&self, image: &RgbaImage) -> Result<Vec<u8>, EncodeError>;

    /// MIME type of the encoded output (e.g. `image/png`).
    fn content_type(&self) -> &'static str;

    /// File extension without the leading dot (e.g. `png`).
    fn extension(&self) -> &'static str;

    /// Human-readable encoder name.
    fn name(&self) -> &str;
}

/// PNG encoder backed by the `image` crate.
#[derive(Debug, Default)]
pub struct PngTileEncoder;

impl PngTileEncoder {
    /// Creates a PNG encoder.
    pub fn new() -> Self {
        Self
    }
}

impl TileEncoder for PngTileEncoder {
    fn encode(&self, image: &RgbaImage) -> Result<Vec<u8>, EncodeError> {
        let mut cursor = Cursor::new(Vec::new());
        PngEncoder::new(&mut cursor)
            .write_image(
                image.as_raw(),
                image.width(),
                image.height(),
                ExtendedColorType::Rgba8,
            )
            .map_err(|e| EncodeError::new(format!("PNG encoding failed: {}", e)))?;
        Ok(cursor.into_inner())
    }

    fn content_type(&self) -> &'static str {
        "image/png"
    }

    fn extension(&self) -> &'static str {
        "png"
    }

    fn name(&self) -> &str {
        "PNG"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

    #[test]
    fn test_encode_produces_png_signature() {
        let image = RgbaImage::from_pixel(8, 8, image::Rgba([10, 20, 30, 255]));
        let bytes = PngTileEncoder::new().encode(&image).unwrap();
        assert_eq!(&bytes[..8], &PNG_MAGIC);
    }

    #[test]
    fn test_encoded_png_roundtrips() {
        let image = RgbaImage::from_pixel(4, 4, image::Rgba([200, 100, 50, 255]));
        let bytes = PngTileEncoder::new().encode(&image).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (4, 4));
        assert_eq!(decoded.get_pixel(2, 2).0, [200, 100, 50, 255]);
    }

    #[test]
    fn test_metadata() {
        let encoder = PngTileEncoder::new();
        assert_eq!(encoder.content_type(), "image/png");
        assert_eq!(encoder.extension(), "png");
        assert_eq!(encoder.name(), "PNG");
    }
}
