//! Render context - rasterizes a style for the current extent.
//!
//! A `RenderContext` is the stateful heart of the engine: it owns a shared
//! reference to the parsed style and a mutable "current extent" that is set
//! before each render call. The extent field is why contexts must have
//! exactly one logical owner at a time; the engine's context pool enforces
//! that.

use crate::coord::Extent;
use crate::render::RenderError;
use crate::style::{Color, StyleDocument, StyleLayer};
use image::RgbaImage;
use std::sync::Arc;
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Stroke, Transform};
use tracing::trace;

/// Default edge length of a rendered tile in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// A reusable rasterization context for one style.
///
/// Not internally synchronized: callers must guarantee exclusive access
/// for the duration of a `set_extent` + `render` pair.
#[derive(Debug)]
pub struct RenderContext {
    style: Arc<StyleDocument>,
    tile_size: u32,
    extent: Option<Extent>,
}

impl RenderContext {
    /// Creates a context rendering `tile_size × tile_size` images of `style`.
    pub fn new(style: Arc<StyleDocument>, tile_size: u32) -> Self {
        Self {
            style,
            tile_size,
            extent: None,
        }
    }

    /// Sets the extent the next [`render`](Self::render) call will draw.
    pub fn set_extent(&mut self, extent: Extent) {
        self.extent = Some(extent);
    }

    /// Tile edge length in pixels.
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Rasterizes the style for the current extent.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::NoExtent`] if no extent was set, or
    /// [`RenderError::Raster`] if the pixel buffer cannot be produced.
    pub fn render(&mut self) -> Result<RgbaImage, RenderError> {
        let extent = self.extent.ok_or(RenderError::NoExtent)?;
        let size = self.tile_size;
        let mut pixmap = Pixmap::new(size, size)
            .ok_or_else(|| RenderError::Raster(format!("invalid tile size {}", size)))?;

        pixmap.fill(to_skia_color(self.style.background));

        // Projected meters -> pixel space. Pixel Y grows southward while
        // mercator Y grows northward, hence the flip against max_y.
        let scale_x = size as f64 / extent.width();
        let scale_y = size as f64 / extent.height();
        let to_px = |x: f64| ((x - extent.min_x) * scale_x) as f32;
        let to_py = |y: f64| ((extent.max_y - y) * scale_y) as f32;

        for layer in &self.style.layers {
            match layer {
                StyleLayer::Fill { id, color, rings } => {
                    let mut builder = PathBuilder::new();
                    for ring in rings {
                        if ring.len() < 3 {
                            trace!(layer = %id, "skipping degenerate ring");
                            continue;
                        }
                        builder.move_to(to_px(ring[0][0]), to_py(ring[0][1]));
                        for vertex in &ring[1..] {
                            builder.line_to(to_px(vertex[0]), to_py(vertex[1]));
                        }
                        builder.close();
                    }
                    if let Some(path) = builder.finish() {
                        let paint = solid_paint(*color);
                        pixmap.fill_path(
                            &path,
                            &paint,
                            FillRule::Winding,
                            Transform::identity(),
                            None,
                        );
                    }
                }
                StyleLayer::Line { id, color, width, paths } => {
                    let mut builder = PathBuilder::new();
                    for path in paths {
                        if path.len() < 2 {
                            trace!(layer = %id, "skipping degenerate path");
                            continue;
                        }
                        builder.move_to(to_px(path[0][0]), to_py(path[0][1]));
                        for vertex in &path[1..] {
                            builder.line_to(to_px(vertex[0]), to_py(vertex[1]));
                        }
                    }
                    if let Some(path) = builder.finish() {
                        let paint = solid_paint(*color);
                        let stroke = Stroke {
                            width: *width,
                            ..Stroke::default()
                        };
                        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
                    }
                }
            }
        }

        // tiny-skia stores premultiplied RGBA; the encoder expects straight.
        let mut data = Vec::with_capacity((size * size * 4) as usize);
        for pixel in pixmap.pixels() {
            let c = pixel.demultiply();
            data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        RgbaImage::from_raw(size, size, data)
            .ok_or_else(|| RenderError::Raster("pixel buffer size mismatch".to_string()))
    }
}

fn to_skia_color(color: Color) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(color.r, color.g, color.b, color.a)
}

fn solid_paint<'a>(color: Color) -> Paint<'a> {
    let mut paint = Paint::default();
    paint.set_color(to_skia_color(color));
    paint.anti_alias = true;
    paint
}
