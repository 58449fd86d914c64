//! Maps a tile coordinate to its group, its file pair and its slot inside the bundle.
//!
//! Tiles are grouped into blocks of 128×128. The group origin is the tile row and column rounded
//! down to a multiple of 128; the offsets `dx`/`dy` of the tile from that origin give its slot:
//!
//! - `CompactV1` stores slots column by column: `slot = 128 * dx + dy`
//! - `CompactV2` stores slots row by row: `slot = 128 * dy + dx`
//!
//! Picking the wrong order returns the bytes of a different tile without any error, so the
//! format always has to travel together with the coordinate.

use super::{BundleError, GROUP_SIZE, SLOT_COUNT, StorageFormat, path};
use anyhow::{Result, ensure};
use compactcache_core::TileCoord;
use std::path::{Path, PathBuf};

/// The group a tile belongs to: its level directory and the row/column of its origin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupOrigin {
	pub level_dir: String,
	pub row_group: u32,
	pub col_group: u32,
}

impl GroupOrigin {
	/// Returns the origin of the group containing `coord`.
	pub fn of(coord: &TileCoord) -> GroupOrigin {
		GroupOrigin {
			level_dir: path::level_dir_name(coord.zoom),
			row_group: group_start(coord.row),
			col_group: group_start(coord.column),
		}
	}
}

/// Rounds `value` down to the nearest multiple of [`GROUP_SIZE`].
pub fn group_start(value: u32) -> u32 {
	(value / GROUP_SIZE) * GROUP_SIZE
}

/// Returns the slot of `coord` inside the bundle whose group starts at `origin`.
///
/// # Errors
///
/// Fails with [`BundleError::InvalidArgument`] if the tile lies outside the group, i.e. if
/// `column - col_group` or `row - row_group` is not in `[0, 128)`.
///
/// ```
/// use compactcache::bundle::{GroupOrigin, StorageFormat, slot_index};
/// use compactcache_core::TileCoord;
///
/// let coord = TileCoord::new(4, 130, 5);
/// let origin = GroupOrigin::of(&coord);
/// assert_eq!(slot_index(&coord, &origin, StorageFormat::CompactV1).unwrap(), 128 * 2 + 5);
/// assert_eq!(slot_index(&coord, &origin, StorageFormat::CompactV2).unwrap(), 128 * 5 + 2);
/// ```
pub fn slot_index(coord: &TileCoord, origin: &GroupOrigin, format: StorageFormat) -> Result<u32> {
	let dx = group_offset(coord.column, origin.col_group, "column")?;
	let dy = group_offset(coord.row, origin.row_group, "row")?;

	let slot = match format {
		StorageFormat::CompactV1 => GROUP_SIZE * dx + dy,
		StorageFormat::CompactV2 => GROUP_SIZE * dy + dx,
	};
	debug_assert!(slot < SLOT_COUNT);
	Ok(slot)
}

fn group_offset(value: u32, start: u32, axis: &str) -> Result<u32> {
	let offset = value.checked_sub(start).filter(|offset| *offset < GROUP_SIZE);
	offset.ok_or_else(|| {
		BundleError::invalid_argument(format!(
			"{axis} {value} is outside the group starting at {start}, offset must be in [0, {GROUP_SIZE})"
		))
		.into()
	})
}

/// Where a tile is stored: the file pair of its group and its slot in there.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BundleLocation {
	pub bundle_path: PathBuf,
	pub index_path: PathBuf,
	pub slot_index: u32,
}

impl BundleLocation {
	/// Computes the location of `coord` in the cache at `root`. Does not touch the filesystem.
	pub fn resolve(root: &Path, coord: &TileCoord, format: StorageFormat) -> Result<BundleLocation> {
		let origin = GroupOrigin::of(coord);
		let stem = path::bundle_stem(root, coord.zoom, origin.row_group, origin.col_group)?;
		let slot_index = slot_index(coord, &origin, format)?;

		ensure!(
			slot_index < SLOT_COUNT,
			BundleError::invalid_argument(format!("slot index {slot_index} must be < {SLOT_COUNT}"))
		);

		Ok(BundleLocation {
			bundle_path: path::bundle_path(&stem),
			index_path: path::index_path(&stem),
			slot_index,
		})
	}
}

/// Builds a [`TileCoord`] from signed values, as they come from user input.
///
/// # Errors
///
/// Fails with [`BundleError::InvalidArgument`] if a value is negative or too large.
pub fn coord_from_signed(column: i64, row: i64, zoom: i64) -> Result<TileCoord> {
	let column = non_negative::<u32>(column, "column")?;
	let row = non_negative::<u32>(row, "row")?;
	let zoom = non_negative::<u8>(zoom, "zoom")?;
	Ok(TileCoord::new(zoom, column, row))
}

fn non_negative<T: TryFrom<i64>>(value: i64, name: &str) -> Result<T> {
	ensure!(
		value >= 0,
		BundleError::invalid_argument(format!("{name} ({value}) must not be negative"))
	);
	T::try_from(value).map_err(|_| BundleError::invalid_argument(format!("{name} ({value}) is too large")).into())
}
