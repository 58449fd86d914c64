use anyhow::{Context, Result};
use clap::Args;
use compactcache::{
	bundle::{BundleCacheReader, StorageFormat, coord_from_signed},
	config::CacheConfig,
	core::TileCoord,
};
use std::path::PathBuf;

/// Arguments selecting a cache and one tile in it.
#[derive(Args, Debug)]
pub struct TileArgs {
	/// cache directory containing "_alllayers", or a YAML config file
	#[arg(required = true)]
	pub cache: PathBuf,

	/// zoom level, the <zz> of "L<zz>"
	#[arg(allow_negative_numbers = true)]
	pub zoom: i64,

	/// tile column
	#[arg(allow_negative_numbers = true, required_unless_present = "lon")]
	pub column: Option<i64>,

	/// tile row
	#[arg(allow_negative_numbers = true, required_unless_present = "lat")]
	pub row: Option<i64>,

	/// longitude in degrees; selects the Web Mercator tile instead of column/row
	#[arg(long, allow_negative_numbers = true, requires = "lat", conflicts_with_all = ["column", "row"])]
	pub lon: Option<f64>,

	/// latitude in degrees
	#[arg(long, allow_negative_numbers = true, requires = "lon")]
	pub lat: Option<f64>,

	/// storage format of the cache [default: v1, or the value of the config file]
	#[arg(long, short)]
	pub format: Option<StorageFormat>,
}

impl TileArgs {
	pub fn reader(&self) -> Result<BundleCacheReader> {
		let mut config = if self.cache.is_file() {
			CacheConfig::from_path(&self.cache)?
		} else {
			CacheConfig::new(&self.cache, StorageFormat::default())
		};
		if let Some(format) = self.format {
			config.format = format;
		}
		Ok(BundleCacheReader::from_config(&config))
	}

	pub fn coord(&self) -> Result<TileCoord> {
		match (self.lon, self.lat) {
			(Some(lon), Some(lat)) => {
				let zoom = coord_from_signed(0, 0, self.zoom)?.zoom;
				TileCoord::from_geo(lon, lat, zoom)
			}
			_ => {
				let column = self.column.context("missing tile column")?;
				let row = self.row.context("missing tile row")?;
				coord_from_signed(column, row, self.zoom)
			}
		}
	}
}
