//! Coordinate conversion module
//!
//! Provides the tile-address-to-extent transform at the heart of the tile
//! server, plus conversions between geographic coordinates (latitude/
//! longitude) and the Web Mercator plane the renderer draws in.

mod types;

pub use types::{
    CoordError, Extent, TileAddress, EARTH_RADIUS, MAX_LAT, MAX_LON, MAX_ZOOM,
    MERCATOR_HALF_WORLD, MIN_LAT, MIN_LON, MIN_ZOOM, WEB_MERCATOR_EXTENT,
};

use std::f64::consts::PI;

/// Computes the projected extent covered by a tile address.
///
/// The world extent is divided into a `2^zoom × 2^zoom` grid; tile
/// (col, row) occupies one cell of that grid, with row 0 at the north
/// edge (XYZ / slippy-map convention). The math is done directly in the
/// projection's native units, so no forward-projection is involved.
///
/// The function is total for any validated [`TileAddress`], and pure:
/// identical inputs yield bit-identical extents.
#[inline]
pub fn tile_extent(addr: TileAddress, world: &Extent) -> Extent {
    let n = addr.grid_size() as f64;
    let span_x = world.width() / n;
    let span_y = world.height() / n;
    let col = addr.col() as f64;
    let row = addr.row() as f64;

    Extent {
        min_x: world.min_x + col * span_x,
        max_x: world.min_x + (col + 1.0) * span_x,
        // Row 0 is the northernmost strip, so Y counts down from the top.
        max_y: world.max_y - row * span_y,
        min_y: world.max_y - (row + 1.0) * span_y,
    }
}

/// Converts longitude/latitude in degrees to Web Mercator meters (EPSG:3857).
///
/// Latitude is clamped to the Mercator limit (±85.05112878°) to avoid the
/// singularity at the poles.
#[inline]
pub fn lon_lat_to_mercator(lon: f64, lat: f64) -> (f64, f64) {
    let lat = lat.clamp(MIN_LAT, MAX_LAT);
    let x = EARTH_RADIUS * lon.to_radians();
    let y = EARTH_RADIUS * ((PI / 4.0) + (lat.to_radians() / 2.0)).tan().ln();
    (x, y)
}

/// Converts Web Mercator meters (EPSG:3857) to longitude/latitude in degrees.
#[inline]
pub fn mercator_to_lon_lat(x: f64, y: f64) -> (f64, f64) {
    let lon = (x / EARTH_RADIUS).to_degrees();
    let lat = (2.0 * (y / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees();
    (lon, lat)
}
