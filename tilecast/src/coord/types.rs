//! Coordinate type definitions

use std::fmt;

/// Web Mercator valid latitude range
pub const MIN_LAT: f64 = -85.05112878;
pub const MAX_LAT: f64 = 85.05112878;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// WGS84 equatorial radius in meters (EPSG:3857 sphere).
pub const EARTH_RADIUS: f64 = 6378137.0;

/// Half the circumference of the Web Mercator plane in meters.
pub const MERCATOR_HALF_WORLD: f64 = 20037508.342789244;

/// Supported zoom levels.
///
/// The tile grid at zoom z is `2^z × 2^z`; 30 keeps the shift well inside
/// exact integer range for f64 math.
pub const MIN_ZOOM: u8 = 0;
pub const MAX_ZOOM: u8 = 30;

/// An axis-aligned bounding rectangle in projected (EPSG:3857) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    /// Western edge in meters
    pub min_x: f64,
    /// Southern edge in meters
    pub min_y: f64,
    /// Eastern edge in meters
    pub max_x: f64,
    /// Northern edge in meters
    pub max_y: f64,
}

impl Extent {
    /// Creates an extent, enforcing `min_x < max_x` and `min_y < max_y`.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Result<Self, CoordError> {
        if !(min_x < max_x) || !(min_y < max_y) {
            return Err(CoordError::InvalidExtent {
                min_x,
                min_y,
                max_x,
                max_y,
            });
        }
        Ok(Self {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    /// Width of the extent in projected units.
    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the extent in projected units.
    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}, {}]",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

/// The full Web Mercator world bounds in projected meters.
pub const WEB_MERCATOR_EXTENT: Extent = Extent {
    min_x: -MERCATOR_HALF_WORLD,
    min_y: -MERCATOR_HALF_WORLD,
    max_x: MERCATOR_HALF_WORLD,
    max_y: MERCATOR_HALF_WORLD,
};

/// Tile address in the Web Mercator / Slippy Map quad-tree grid.
///
/// Row 0 is at the north edge of the world, column 0 at the west edge.
/// The constructor validates that column and row fall within the grid for
/// the given zoom; out-of-range addresses are an error, never wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileAddress {
    zoom: u8,
    col: u32,
    row: u32,
}

impl TileAddress {
    /// Creates a validated tile address.
    ///
    /// # Errors
    ///
    /// Returns `CoordError` if the zoom exceeds [`MAX_ZOOM`] or if the
    /// column/row falls outside `[0, 2^zoom)`.
    pub fn new(zoom: u8, col: u32, row: u32) -> Result<Self, CoordError> {
        if zoom > MAX_ZOOM {
            return Err(CoordError::InvalidZoom(zoom));
        }
        let n = 1u64 << zoom;
        if (col as u64) >= n {
            return Err(CoordError::ColumnOutOfRange { col, zoom });
        }
        if (row as u64) >= n {
            return Err(CoordError::RowOutOfRange { row, zoom });
        }
        Ok(Self { zoom, col, row })
    }

    /// Zoom level.
    #[inline]
    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    /// Column (X index, 0 at the west edge).
    #[inline]
    pub fn col(&self) -> u32 {
        self.col
    }

    /// Row (Y index, 0 at the north edge).
    #[inline]
    pub fn row(&self) -> u32 {
        self.row
    }

    /// Number of tiles along one axis of this address's grid.
    #[inline]
    pub fn grid_size(&self) -> u64 {
        1u64 << self.zoom
    }
}

impl fmt::Display for TileAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.col, self.row)
    }
}

/// Errors that can occur constructing coordinates and extents.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordError {
    /// Zoom level is outside the supported range (0 to 30)
    InvalidZoom(u8),
    /// Column is outside `[0, 2^zoom)` for the given zoom
    ColumnOutOfRange { col: u32, zoom: u8 },
    /// Row is outside `[0, 2^zoom)` for the given zoom
    RowOutOfRange { row: u32, zoom: u8 },
    /// Extent does not satisfy `min < max` on both axes
    InvalidExtent {
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
    },
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::InvalidZoom(zoom) => {
                write!(
                    f,
                    "Invalid zoom level: {} (must be between {} and {})",
                    zoom, MIN_ZOOM, MAX_ZOOM
                )
            }
            CoordError::ColumnOutOfRange { col, zoom } => {
                write!(
                    f,
                    "Column {} out of range at zoom {} (must be below {})",
                    col,
                    zoom,
                    1u64 << zoom
                )
            }
            CoordError::RowOutOfRange { row, zoom } => {
                write!(
                    f,
                    "Row {} out of range at zoom {} (must be below {})",
                    row,
                    zoom,
                    1u64 << zoom
                )
            }
            CoordError::InvalidExtent {
                min_x,
                min_y,
                max_x,
                max_y,
            } => {
                write!(
                    f,
                    "Invalid extent [{}, {}, {}, {}]: min must be below max on both axes",
                    min_x, min_y, max_x, max_y
                )
            }
        }
    }
}

impl std::error::Error for CoordError {}
