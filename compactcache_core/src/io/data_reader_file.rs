//! This module provides bounded reads from a file.
//!
//! # Overview
//!
//! `DataReaderFile` opens a file once, remembers its size, and serves reads of exact byte ranges
//! by seeking to the requested offset. Ranges reaching past the end of the file are rejected
//! before anything is read, so a truncated file never yields a short or padded buffer.
//!
//! # Examples
//!
//! ```no_run
//! use compactcache_core::{io::DataReaderFile, ByteRange};
//! use anyhow::Result;
//! use std::path::Path;
//!
//! fn main() -> Result<()> {
//!     let mut reader = DataReaderFile::open(Path::new("/data/_alllayers/L00/R0000C0000.bundlx"))?;
//!     let header = reader.read_range(&ByteRange::new(0, 16))?;
//!     assert_eq!(header.len(), 16);
//!     Ok(())
//! }
//! ```

use crate::{Blob, ByteRange};
use anyhow::{Context, Result, ensure};
use byteorder::{ByteOrder, LittleEndian};
use std::{
	fs::File,
	io::{Read, Seek, SeekFrom},
	path::Path,
};

/// A file opened for bounded, seek-based reading.
///
/// The handle is closed when the reader is dropped.
#[derive(Debug)]
pub struct DataReaderFile {
	name: String,
	file: File,
	size: u64,
}

impl DataReaderFile {
	/// Opens the file at `path` and records its size.
	///
	/// # Errors
	///
	/// Returns an error if the path does not exist, is not a regular file, or cannot be opened.
	pub fn open(path: &Path) -> Result<DataReaderFile> {
		ensure!(path.exists(), "file {path:?} does not exist");
		ensure!(path.is_file(), "path {path:?} must be a file");

		let file = File::open(path).with_context(|| format!("failed to open file {path:?}"))?;
		let size = file
			.metadata()
			.with_context(|| format!("failed to read metadata of file {path:?}"))?
			.len();

		log::trace!("opened {path:?} ({size} bytes)");

		Ok(DataReaderFile {
			name: path.to_string_lossy().into_owned(),
			file,
			size,
		})
	}

	/// Returns the size of the file in bytes, as observed when it was opened.
	pub fn len(&self) -> u64 {
		self.size
	}

	pub fn is_empty(&self) -> bool {
		self.size == 0
	}

	/// Returns the path the file was opened with.
	pub fn get_name(&self) -> &str {
		&self.name
	}

	/// Returns `true` if `range` lies completely inside the file.
	pub fn contains(&self, range: &ByteRange) -> bool {
		range.end().is_some_and(|end| end <= self.size)
	}

	/// Reads exactly the bytes of `range`.
	///
	/// # Errors
	///
	/// Returns an error if the range reaches past the end of the file, or if seeking or
	/// reading fails.
	pub fn read_range(&mut self, range: &ByteRange) -> Result<Blob> {
		ensure!(
			self.contains(range),
			"range {range:?} exceeds the {} bytes of file '{}'",
			self.size,
			self.name
		);

		let length = usize::try_from(range.length)
			.with_context(|| format!("range {range:?} does not fit into memory"))?;
		let mut blob = Blob::new_sized(length);

		self
			.file
			.seek(SeekFrom::Start(range.offset))
			.with_context(|| format!("failed to seek to offset {} in file '{}'", range.offset, self.name))?;
		self.file.read_exact(blob.as_mut_slice()).with_context(|| {
			format!(
				"failed to read {} bytes at offset {} in file '{}'",
				range.length, range.offset, self.name
			)
		})?;

		Ok(blob)
	}

	/// Reads a little-endian `u32` at `offset`.
	pub fn read_u32_le(&mut self, offset: u64) -> Result<u32> {
		let blob = self.read_range(&ByteRange::new(offset, 4))?;
		Ok(LittleEndian::read_u32(blob.as_slice()))
	}
}
