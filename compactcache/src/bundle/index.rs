//! Decodes `.bundlx` index records.
//!
//! An index file starts with a fixed-size header followed by one record per slot:
//!
//! - `CompactV1`: 16 byte header, 5 byte records. The first 4 bytes of a record are the
//!   little-endian offset of the tile's length prefix in the bundle. The 5th byte is ignored.
//! - `CompactV2`: 64 byte header, 8 byte records. The first 4 bytes are the little-endian offset
//!   of the tile payload, the next 4 bytes its size. The length prefix sits 4 bytes in front of
//!   the payload.
//!
//! Only the one record needed is read, via a seek and a bounded read.

use super::{BundleError, BundleLocation, StorageFormat};
use anyhow::{Context, Result, ensure};
use byteorder::{ByteOrder, LittleEndian};
use compactcache_core::{ByteRange, io::DataReaderFile};
use std::path::Path;

/// Size of the length prefix in front of every tile payload.
pub const LENGTH_PREFIX_LEN: u64 = 4;

/// One decoded index record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexRecord {
	/// The offset as stored in the record.
	pub stored_offset: u32,
	/// The size field of a `CompactV2` record; not present in `CompactV1`.
	pub stored_size: Option<u32>,
}

impl IndexRecord {
	/// Returns the position of the length prefix in the bundle file.
	///
	/// # Errors
	///
	/// Fails with [`BundleError::Decode`] if a `CompactV2` offset points before byte 4, where no
	/// length prefix can precede it.
	pub fn tile_offset(&self, format: StorageFormat) -> Result<u32> {
		match format {
			StorageFormat::CompactV1 => Ok(self.stored_offset),
			StorageFormat::CompactV2 => self.stored_offset.checked_sub(LENGTH_PREFIX_LEN as u32).ok_or_else(|| {
				BundleError::decode(format!(
					"payload offset {} leaves no room for the {LENGTH_PREFIX_LEN} byte length prefix",
					self.stored_offset
				))
				.into()
			}),
		}
	}
}

/// Returns the byte range of the record of `slot_index` in an index file of `format`.
pub fn record_range(format: StorageFormat, slot_index: u32) -> ByteRange {
	ByteRange::new(
		format.index_header_len() + format.index_record_len() * u64::from(slot_index),
		format.index_record_len(),
	)
}

/// Reads the record of `slot_index` from the index file at `path`.
///
/// # Errors
///
/// Fails with [`BundleError::Io`] if the file cannot be opened or ends before the record does.
pub fn read_record(path: &Path, format: StorageFormat, slot_index: u32) -> Result<IndexRecord> {
	let range = record_range(format, slot_index);
	log::trace!("read index record {range:?} of slot {slot_index} from {path:?}");

	let mut reader =
		DataReaderFile::open(path).map_err(|error| BundleError::io(path, format!("cannot open index file: {error:#}")))?;

	ensure!(
		reader.contains(&range),
		BundleError::io(
			path,
			format!(
				"index file has {} bytes, too short for the record of slot {slot_index} at {range:?}",
				reader.len()
			)
		)
	);

	let record = reader
		.read_range(&range)
		.map_err(|error| BundleError::io(path, format!("{error:#}")))?;
	let bytes = record.as_slice();

	Ok(IndexRecord {
		stored_offset: LittleEndian::read_u32(&bytes[0..4]),
		stored_size: match format {
			StorageFormat::CompactV1 => None,
			StorageFormat::CompactV2 => Some(LittleEndian::read_u32(&bytes[4..8])),
		},
	})
}

/// Resolves the slot of `location` to the position of the tile's length prefix in the bundle.
pub fn read_tile_offset(location: &BundleLocation, format: StorageFormat) -> Result<u32> {
	let path = &location.index_path;
	let record = read_record(path, format, location.slot_index)?;
	let offset = record
		.tile_offset(format)
		.with_context(|| format!("decoding record of slot {} in {path:?}", location.slot_index))?;

	log::trace!("slot {} -> bundle offset {offset} ({record:?})", location.slot_index);
	Ok(offset)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::bundle::bundle_error;
	use assert_fs::TempDir;
	use rstest::rstest;
	use std::path::PathBuf;

	fn write_index(dir: &TempDir, header_len: usize, records: &[(u32, &[u8])]) -> PathBuf {
		let path = dir.path().join("R0000C0000.bundlx");
		let mut bytes = vec![0u8; header_len];
		for (offset, extra) in records {
			bytes.extend_from_slice(&offset.to_le_bytes());
			bytes.extend_from_slice(extra);
		}
		std::fs::write(&path, bytes).unwrap();
		path
	}

	fn location(index_path: PathBuf, slot_index: u32) -> BundleLocation {
		BundleLocation {
			bundle_path: index_path.with_extension("bundle"),
			index_path,
			slot_index,
		}
	}

	#[rstest]
	#[case(StorageFormat::CompactV1, 0, 16)]
	#[case(StorageFormat::CompactV1, 3, 31)]
	#[case(StorageFormat::CompactV1, 16383, 81931)]
	#[case(StorageFormat::CompactV2, 0, 64)]
	#[case(StorageFormat::CompactV2, 3, 88)]
	#[case(StorageFormat::CompactV2, 16383, 131128)]
	fn record_positions(#[case] format: StorageFormat, #[case] slot: u32, #[case] position: u64) {
		let range = record_range(format, slot);
		assert_eq!(range.offset, position);
		assert_eq!(range.length, format.index_record_len());
	}

	#[test]
	fn v1_reads_four_of_five_bytes() -> Result<()> {
		let dir = TempDir::new()?;
		let path = write_index(&dir, 16, &[(7, &[0xAA]), (100, &[0xFF]), (0x0102_0304, &[0x05])]);

		let record = read_record(&path, StorageFormat::CompactV1, 1)?;
		assert_eq!(
			record,
			IndexRecord {
				stored_offset: 100,
				stored_size: None,
			}
		);

		let offset = read_tile_offset(&location(path, 2), StorageFormat::CompactV1)?;
		assert_eq!(offset, 0x0102_0304);
		Ok(())
	}

	#[test]
	fn v2_rewinds_to_the_length_prefix() -> Result<()> {
		let dir = TempDir::new()?;
		let size = 10u32.to_le_bytes();
		let path = write_index(&dir, 64, &[(0, &size), (104, &size)]);

		let record = read_record(&path, StorageFormat::CompactV2, 1)?;
		assert_eq!(record.stored_offset, 104);
		assert_eq!(record.stored_size, Some(10));
		assert_eq!(read_tile_offset(&location(path, 1), StorageFormat::CompactV2)?, 100);
		Ok(())
	}

	#[rstest]
	#[case(0)]
	#[case(3)]
	fn v2_offset_without_room_for_prefix(#[case] stored_offset: u32) -> Result<()> {
		let dir = TempDir::new()?;
		let path = write_index(&dir, 64, &[(stored_offset, &[0, 0, 0, 0])]);

		let error = read_tile_offset(&location(path, 0), StorageFormat::CompactV2).unwrap_err();
		assert!(matches!(bundle_error(&error), Some(BundleError::Decode(_))));
		Ok(())
	}

	#[rstest]
	#[case(StorageFormat::CompactV1, 2)]
	#[case(StorageFormat::CompactV1, 16383)]
	#[case(StorageFormat::CompactV2, 2)]
	fn truncated_index_is_an_io_error(#[case] format: StorageFormat, #[case] slot: u32) -> Result<()> {
		let dir = TempDir::new()?;
		let header_len = format.index_header_len() as usize;
		let extra: &[u8] = if format == StorageFormat::CompactV1 { &[0] } else { &[0, 0, 0, 0] };
		// two complete records and half of a third one
		let path = write_index(&dir, header_len, &[(1, extra), (2, extra)]);
		let mut bytes = std::fs::read(&path)?;
		bytes.extend_from_slice(&[9, 9]);
		std::fs::write(&path, bytes)?;

		let error = read_record(&path, format, slot).unwrap_err();
		assert!(matches!(bundle_error(&error), Some(BundleError::Io { .. })), "{error:#}");
		Ok(())
	}

	#[test]
	fn missing_index_is_an_io_error() -> Result<()> {
		let dir = TempDir::new()?;
		let error = read_record(&dir.path().join("nope.bundlx"), StorageFormat::CompactV1, 0).unwrap_err();
		assert!(matches!(bundle_error(&error), Some(BundleError::Io { .. })));
		Ok(())
	}
}
