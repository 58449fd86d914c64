//! Tile coordinates as used by ArcGIS tile caches
//!
//! A [`TileCoord`] addresses one tile by zoom level, column and row. Columns grow to the east,
//! rows grow to the south, and both start at the top left corner of the tiling scheme.
//!
//! ArcGIS tiling schemes are not restricted to the `2^zoom` tiles per axis of a Web Mercator
//! pyramid, so [`TileCoord::new`] does not check any upper bound. [`TileCoord::from_geo`] is the
//! only Web Mercator specific helper.
//!
//! # Examples
//!
//! ```
//! use compactcache_core::TileCoord;
//!
//! let coord = TileCoord::new(11, 1600, 35);
//! assert_eq!(coord.zoom, 11);
//! assert_eq!(coord.column, 1600);
//! assert_eq!(coord.row, 35);
//! ```

use anyhow::{Result, ensure};
use std::{
	f64::consts::PI,
	fmt::{self, Debug},
};

/// Highest zoom level for which a Web Mercator tile index still fits into a `u32`.
pub const MAX_GEO_ZOOM: u8 = 31;

/// Latitude limit of the Web Mercator projection, in degrees.
const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

/// A tile address: zoom level, column (x) and row (y).
#[derive(Eq, PartialEq, Clone, Hash, Copy)]
pub struct TileCoord {
	/// The zoom level, the `L<zz>` part of the cache path.
	pub zoom: u8,
	/// The column index of the tile.
	pub column: u32,
	/// The row index of the tile.
	pub row: u32,
}

impl TileCoord {
	pub fn new(zoom: u8, column: u32, row: u32) -> TileCoord {
		TileCoord { zoom, column, row }
	}

	/// Returns the Web Mercator tile containing the point `lon`/`lat` (WGS84 degrees) at `zoom`.
	///
	/// Latitudes beyond the projection limit of ±85.0511° are clamped to it.
	///
	/// # Errors
	/// Returns an error if `zoom` exceeds [`MAX_GEO_ZOOM`], or `lon`/`lat` are outside
	/// `[-180, 180]`/`[-90, 90]`.
	///
	/// ```
	/// use compactcache_core::TileCoord;
	///
	/// let coord = TileCoord::from_geo(13.404954, 52.520008, 10).unwrap();
	/// assert_eq!(coord, TileCoord::new(10, 550, 335));
	/// ```
	pub fn from_geo(lon: f64, lat: f64, zoom: u8) -> Result<TileCoord> {
		ensure!(zoom <= MAX_GEO_ZOOM, "zoom ({zoom}) must be <= {MAX_GEO_ZOOM}");
		ensure!((-180.0..=180.0).contains(&lon), "longitude ({lon}) must be within [-180, 180]");
		ensure!((-90.0..=90.0).contains(&lat), "latitude ({lat}) must be within [-90, 90]");

		let tiles = 2f64.powi(i32::from(zoom));
		let lat_rad = lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();

		let x = (lon + 180.0) / 360.0 * tiles;
		let y = (1.0 - lat_rad.tan().asinh() / PI) / 2.0 * tiles;

		let max = tiles - 1.0;
		Ok(TileCoord {
			zoom,
			column: x.clamp(0.0, max).floor() as u32,
			row: y.clamp(0.0, max).floor() as u32,
		})
	}
}

impl Debug for TileCoord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TileCoord({}, [{}, {}])", self.zoom, self.column, self.row)
	}
}

impl fmt::Display for TileCoord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}/{}", self.zoom, self.column, self.row)
	}
}
