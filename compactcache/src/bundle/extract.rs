//! Reads length-prefixed tile payloads from `.bundle` files.
//!
//! Every tile in a bundle is stored as a 4 byte little-endian length followed by that many
//! bytes of payload, usually an encoded PNG or JPEG image. A length of 0 marks an empty tile.

use super::{BundleError, LENGTH_PREFIX_LEN};
use anyhow::{Context, Result, ensure};
use compactcache_core::{Blob, ByteRange, io::DataReaderFile};
use std::path::Path;

/// Upper limit for the length of a single tile payload.
///
/// Larger values are treated as corruption and rejected before any buffer is allocated.
pub const MAX_TILE_LENGTH: u32 = 64 * 1024 * 1024;

/// The bytes of one tile together with where they were found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileBlob {
	/// Position of the length prefix in the bundle file.
	pub offset: u32,
	/// Number of payload bytes.
	pub length: u32,
	/// The payload, exactly `length` bytes.
	pub bytes: Blob,
}

impl TileBlob {
	pub fn is_empty(&self) -> bool {
		self.length == 0
	}

	pub fn into_blob(self) -> Blob {
		self.bytes
	}
}

/// Reads the tile whose length prefix starts at `offset` in the bundle file at `path`.
///
/// # Errors
///
/// - [`BundleError::Io`] if the file cannot be opened, or ends before the length prefix or
///   before the end of the payload.
/// - [`BundleError::Decode`] if the length exceeds [`MAX_TILE_LENGTH`].
pub fn read_tile(path: &Path, offset: u32) -> Result<TileBlob> {
	let mut reader =
		DataReaderFile::open(path).map_err(|error| BundleError::io(path, format!("cannot open bundle file: {error:#}")))?;

	let prefix = ByteRange::new(u64::from(offset), LENGTH_PREFIX_LEN);
	ensure!(
		reader.contains(&prefix),
		BundleError::io(
			path,
			format!(
				"bundle file has {} bytes, too short for a length prefix at offset {offset}",
				reader.len()
			)
		)
	);

	let length = reader
		.read_u32_le(prefix.offset)
		.map_err(|error| BundleError::io(path, format!("{error:#}")))?;
	log::trace!("tile at offset {offset} of {path:?} has {length} bytes");

	ensure!(
		length <= MAX_TILE_LENGTH,
		BundleError::decode(format!("tile length {length} at offset {offset} exceeds {MAX_TILE_LENGTH}"))
	);

	let payload = prefix
		.following(u64::from(length))
		.context("payload range overflows")?;
	ensure!(
		reader.contains(&payload),
		BundleError::io(
			path,
			format!(
				"bundle file has {} bytes, too short for a tile of {length} bytes at offset {offset}",
				reader.len()
			)
		)
	);

	let bytes = reader
		.read_range(&payload)
		.map_err(|error| BundleError::io(path, format!("{error:#}")))?;

	Ok(TileBlob { offset, length, bytes })
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::bundle::bundle_error;
	use assert_fs::TempDir;
	use std::path::PathBuf;

	/// Writes `padding` zero bytes, then each tile as length prefix plus payload.
	fn write_bundle(dir: &TempDir, padding: usize, tiles: &[&[u8]]) -> PathBuf {
		let path = dir.path().join("R0000C0000.bundle");
		let mut bytes = vec![0u8; padding];
		for tile in tiles {
			bytes.extend_from_slice(&(tile.len() as u32).to_le_bytes());
			bytes.extend_from_slice(tile);
		}
		std::fs::write(&path, bytes).unwrap();
		path
	}

	#[test]
	fn reads_exactly_the_payload() -> Result<()> {
		let dir = TempDir::new()?;
		let payload: &[u8] = &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
		let path = write_bundle(&dir, 100, &[payload, b"next"]);

		let tile = read_tile(&path, 100)?;
		assert_eq!(tile.offset, 100);
		assert_eq!(tile.length, 10);
		assert_eq!(tile.bytes.as_slice(), payload);

		let next = read_tile(&path, 114)?;
		assert_eq!(next.into_blob().as_slice(), b"next");
		Ok(())
	}

	#[test]
	fn empty_tile() -> Result<()> {
		let dir = TempDir::new()?;
		let path = write_bundle(&dir, 60, &[&[]]);

		let tile = read_tile(&path, 60)?;
		assert!(tile.is_empty());
		assert!(tile.bytes.is_empty());
		Ok(())
	}

	#[test]
	fn prefix_past_end_is_an_io_error() -> Result<()> {
		let dir = TempDir::new()?;
		let path = write_bundle(&dir, 10, &[b"abc"]);

		for offset in [15, 17, u32::MAX] {
			let error = read_tile(&path, offset).unwrap_err();
			assert!(matches!(bundle_error(&error), Some(BundleError::Io { .. })), "{error:#}");
		}
		Ok(())
	}

	#[test]
	fn truncated_payload_is_an_io_error() -> Result<()> {
		let dir = TempDir::new()?;
		let path = dir.path().join("short.bundle");
		let mut bytes = 10u32.to_le_bytes().to_vec();
		bytes.extend_from_slice(&[1, 2, 3]);
		std::fs::write(&path, bytes)?;

		let error = read_tile(&path, 0).unwrap_err();
		assert!(matches!(bundle_error(&error), Some(BundleError::Io { .. })));
		Ok(())
	}

	#[test]
	fn implausible_length_is_a_decode_error() -> Result<()> {
		let dir = TempDir::new()?;
		let path = dir.path().join("huge.bundle");
		std::fs::write(&path, (MAX_TILE_LENGTH + 1).to_le_bytes())?;

		let error = read_tile(&path, 0).unwrap_err();
		assert!(matches!(bundle_error(&error), Some(BundleError::Decode(_))));
		Ok(())
	}

	#[test]
	fn longest_allowed_length_is_checked_against_the_file() -> Result<()> {
		let dir = TempDir::new()?;
		let path = dir.path().join("short.bundle");
		std::fs::write(&path, MAX_TILE_LENGTH.to_le_bytes())?;

		// at the bound the length is plausible, the file is just too short
		let error = read_tile(&path, 0).unwrap_err();
		assert!(matches!(bundle_error(&error), Some(BundleError::Io { .. })), "{error:#}");
		Ok(())
	}

	#[test]
	fn missing_bundle_is_an_io_error() -> Result<()> {
		let dir = TempDir::new()?;
		let error = read_tile(&dir.path().join("none.bundle"), 0).unwrap_err();
		assert!(matches!(bundle_error(&error), Some(BundleError::Io { .. })));
		Ok(())
	}
}
