//! Reads single tiles from an ArcGIS compact bundle cache.
//!
//! The cache directory must contain an `_alllayers` folder with one `L<zz>` folder per zoom
//! level, each holding pairs of `.bundle`/`.bundlx` files:
//! ```text
//! <root>/_alllayers/L<zz>/R<rrrr>C<cccc>.bundle
//! <root>/_alllayers/L<zz>/R<rrrr>C<cccc>.bundlx
//! ```
//!
//! Every lookup reads one index record and one tile payload with bounded reads. Nothing is
//! cached between lookups, and the reader only holds its root path and storage format, so it
//! can be shared between threads freely.
//!
//! ## Usage
//! ```no_run
//! use compactcache::bundle::{BundleCacheReader, StorageFormat};
//! use std::path::Path;
//!
//! let reader = BundleCacheReader::with_format(Path::new("/data/cache/Layers"), StorageFormat::CompactV2);
//! let tile = reader.get_tile(1600, 35, 11).unwrap();
//! println!("{} bytes", tile.length);
//! ```

use super::{
	BundleLocation, StorageFormat, TileBlob,
	extract::read_tile,
	index::read_tile_offset,
	path::{BUNDLE_EXTENSION, INDEX_EXTENSION, LAYERS_DIR, parse_group_file_stem, parse_level_dir_name},
};
use crate::config::CacheConfig;
use anyhow::{Context, Result};
use compactcache_core::TileCoord;
use std::{
	collections::BTreeMap,
	fs,
	path::{Path, PathBuf},
};

/// A reader for tiles stored in a compact bundle cache.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BundleCacheReader {
	root: PathBuf,
	format: StorageFormat,
}

impl BundleCacheReader {
	/// Creates a reader for the cache at `root`, assuming the `CompactV1` layout.
	pub fn new(root: &Path) -> BundleCacheReader {
		BundleCacheReader::with_format(root, StorageFormat::default())
	}

	/// Creates a reader for the cache at `root` using the given layout.
	///
	/// Nothing is read from disk here; a missing cache shows up on the first lookup.
	pub fn with_format(root: &Path, format: StorageFormat) -> BundleCacheReader {
		log::debug!("open compact cache {root:?} as {format}");
		BundleCacheReader {
			root: root.to_path_buf(),
			format,
		}
	}

	pub fn from_config(config: &CacheConfig) -> BundleCacheReader {
		BundleCacheReader::with_format(&config.root, config.format)
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	pub fn format(&self) -> StorageFormat {
		self.format
	}

	/// Computes where the tile at `coord` is stored, without reading any file.
	pub fn locate(&self, coord: &TileCoord) -> Result<BundleLocation> {
		BundleLocation::resolve(&self.root, coord, self.format)
	}

	/// Reads the tile at `column`/`row` of zoom level `zoom`.
	///
	/// # Errors
	///
	/// The error carries a [`BundleError`](super::BundleError) describing the kind of failure:
	/// invalid coordinates, missing or truncated files, or undecodable offsets and lengths.
	pub fn get_tile(&self, column: u32, row: u32, zoom: u8) -> Result<TileBlob> {
		self.get_tile_by_coord(&TileCoord::new(zoom, column, row))
	}

	pub fn get_tile_by_coord(&self, coord: &TileCoord) -> Result<TileBlob> {
		log::trace!("get_tile {coord:?}");

		let fetch = || -> Result<TileBlob> {
			let location = self.locate(coord)?;
			log::trace!("{coord:?} -> {location:?}");

			let offset = read_tile_offset(&location, self.format)?;
			read_tile(&location.bundle_path, offset)
		};

		fetch().with_context(|| format!("fetching tile {coord:?} from compact cache {:?} ({})", self.root, self.format))
	}

	/// Lists the bundles present in the cache, grouped by zoom level.
	///
	/// Only the directory structure is inspected; the files themselves are not opened.
	pub fn list_bundles(&self) -> Result<BTreeMap<u8, Vec<BundleEntry>>> {
		let layers = self.root.join(LAYERS_DIR);
		let mut levels: BTreeMap<u8, Vec<BundleEntry>> = BTreeMap::new();

		let level_dirs = fs::read_dir(&layers).with_context(|| format!("reading directory {layers:?}"))?;
		for entry in level_dirs {
			let entry = entry?;
			let Some(zoom) = entry.file_name().to_str().and_then(parse_level_dir_name) else {
				continue;
			};
			if !entry.file_type()?.is_dir() {
				continue;
			}

			let mut bundles = BTreeMap::<(u32, u32), BundleEntry>::new();
			for file in fs::read_dir(entry.path())? {
				let path = file?.path();
				let (Some(stem), Some(extension)) = (
					path.file_stem().and_then(|s| s.to_str()),
					path.extension().and_then(|s| s.to_str()),
				) else {
					continue;
				};
				let Some((row_group, col_group)) = parse_group_file_stem(stem) else {
					continue;
				};

				let bundle = bundles.entry((row_group, col_group)).or_insert(BundleEntry {
					row_group,
					col_group,
					has_bundle: false,
					has_index: false,
				});
				match extension {
					BUNDLE_EXTENSION => bundle.has_bundle = true,
					INDEX_EXTENSION => bundle.has_index = true,
					_ => {}
				}
			}

			let bundles = bundles
				.into_values()
				.filter(|bundle| bundle.has_bundle || bundle.has_index)
				.collect::<Vec<_>>();
			if !bundles.is_empty() {
				levels.insert(zoom, bundles);
			}
		}

		Ok(levels)
	}
}

/// A bundle group found by [`BundleCacheReader::list_bundles`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BundleEntry {
	pub row_group: u32,
	pub col_group: u32,
	pub has_bundle: bool,
	pub has_index: bool,
}

impl BundleEntry {
	pub fn is_complete(&self) -> bool {
		self.has_bundle && self.has_index
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::bundle::{BundleError, bundle_error};
	use assert_fs::TempDir;
	use pretty_assertions::assert_eq;

	/// Writes a bundle pair holding a single tile at `slot`.
	fn write_group(root: &Path, zoom: u8, stem: &str, format: StorageFormat, slot: u32, payload: &[u8]) {
		let dir = root.join(LAYERS_DIR).join(format!("L{zoom:02}"));
		fs::create_dir_all(&dir).unwrap();

		let offset = 100u32;
		let mut bundle = vec![0u8; offset as usize];
		bundle.extend_from_slice(&(payload.len() as u32).to_le_bytes());
		bundle.extend_from_slice(payload);
		fs::write(dir.join(format!("{stem}.bundle")), bundle).unwrap();

		let mut index = vec![0u8; format.index_file_len() as usize];
		let position = (format.index_header_len() + format.index_record_len() * u64::from(slot)) as usize;
		let stored = match format {
			StorageFormat::CompactV1 => offset,
			StorageFormat::CompactV2 => offset + 4,
		};
		index[position..position + 4].copy_from_slice(&stored.to_le_bytes());
		fs::write(dir.join(format!("{stem}.bundlx")), index).unwrap();
	}

	#[test]
	fn get_tile_v1() -> Result<()> {
		let dir = TempDir::new()?;
		// column 1600 row 35 -> dx 64, dy 35
		write_group(dir.path(), 11, "R0000C0600", StorageFormat::CompactV1, 128 * 64 + 35, b"0123456789");

		let reader = BundleCacheReader::new(dir.path());
		assert_eq!(reader.format(), StorageFormat::CompactV1);

		let tile = reader.get_tile(1600, 35, 11)?;
		assert_eq!(tile.offset, 100);
		assert_eq!(tile.length, 10);
		assert_eq!(tile.bytes.as_slice(), b"0123456789");
		Ok(())
	}

	#[test]
	fn get_tile_v2() -> Result<()> {
		let dir = TempDir::new()?;
		write_group(dir.path(), 11, "R0000C0600", StorageFormat::CompactV2, 128 * 35 + 64, b"abcdefghij");

		let reader = BundleCacheReader::with_format(dir.path(), StorageFormat::CompactV2);
		let tile = reader.get_tile_by_coord(&TileCoord::new(11, 1600, 35))?;
		assert_eq!(tile.offset, 100);
		assert_eq!(tile.bytes.as_slice(), b"abcdefghij");
		Ok(())
	}

	#[test]
	fn wrong_format_reads_another_slot() -> Result<()> {
		let dir = TempDir::new()?;
		write_group(dir.path(), 11, "R0000C0600", StorageFormat::CompactV1, 128 * 64 + 35, b"0123456789");

		// slot 128 * 35 + 64 has an all-zero record, which points at offset 0 (an empty tile)
		let reader = BundleCacheReader::with_format(dir.path(), StorageFormat::CompactV2);
		let error = reader.get_tile(1600, 35, 11).unwrap_err();
		assert!(matches!(bundle_error(&error), Some(BundleError::Decode(_))));
		Ok(())
	}

	#[test]
	fn missing_bundle_is_an_io_error() -> Result<()> {
		let dir = TempDir::new()?;
		let reader = BundleCacheReader::new(dir.path());
		let error = reader.get_tile(0, 0, 3).unwrap_err();

		assert!(matches!(bundle_error(&error), Some(BundleError::Io { .. })));
		assert!(error.to_string().starts_with("fetching tile TileCoord(3, [0, 0]) from compact cache"));
		Ok(())
	}

	#[test]
	fn locate_does_not_touch_the_filesystem() {
		let reader = BundleCacheReader::with_format(Path::new("/does/not/exist"), StorageFormat::CompactV2);
		let location = reader.locate(&TileCoord::new(5, 130, 260)).unwrap();
		assert_eq!(
			location.index_path,
			PathBuf::from("/does/not/exist/_alllayers/L05/R0100C0080.bundlx")
		);
		assert_eq!(location.slot_index, 128 * 4 + 2);
	}

	#[test]
	fn from_config() {
		let config = CacheConfig {
			root: PathBuf::from("/data"),
			format: StorageFormat::CompactV2,
		};
		let reader = BundleCacheReader::from_config(&config);
		assert_eq!(reader.root(), Path::new("/data"));
		assert_eq!(reader.format(), StorageFormat::CompactV2);
	}

	#[test]
	fn list_bundles() -> Result<()> {
		let dir = TempDir::new()?;
		write_group(dir.path(), 3, "R0000C0000", StorageFormat::CompactV1, 0, b"a");
		write_group(dir.path(), 3, "R0000C0080", StorageFormat::CompactV1, 0, b"b");
		write_group(dir.path(), 12, "R0C00C0C00", StorageFormat::CompactV1, 0, b"c");
		fs::remove_file(dir.path().join("_alllayers/L12/R0C00C0C00.bundlx"))?;
		fs::write(dir.path().join("_alllayers/L03/notes.txt"), "ignored")?;
		fs::create_dir_all(dir.path().join("_alllayers/extra"))?;

		let levels = BundleCacheReader::new(dir.path()).list_bundles()?;
		assert_eq!(levels.keys().copied().collect::<Vec<_>>(), vec![3, 12]);
		assert_eq!(
			levels[&3],
			vec![
				BundleEntry {
					row_group: 0,
					col_group: 0,
					has_bundle: true,
					has_index: true
				},
				BundleEntry {
					row_group: 0,
					col_group: 128,
					has_bundle: true,
					has_index: true
				},
			]
		);
		assert!(!levels[&12][0].is_complete());
		assert_eq!((levels[&12][0].row_group, levels[&12][0].col_group), (0xC00, 0xC00));
		Ok(())
	}

	#[test]
	fn list_bundles_without_layers() -> Result<()> {
		let dir = TempDir::new()?;
		assert!(BundleCacheReader::new(dir.path()).list_bundles().is_err());
		Ok(())
	}
}
