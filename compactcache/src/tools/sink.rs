//! Destinations for extracted tiles.

use anyhow::{Context, Result};
use compactcache::bundle::TileBlob;
use std::{
	io::Write,
	path::{Path, PathBuf},
};
use time::{OffsetDateTime, macros::format_description};

/// Receives the bytes of an extracted tile.
pub trait TileSink {
	/// Stores the tile and returns a short description of where it went.
	fn write_tile(&mut self, tile: &TileBlob) -> Result<String>;
}

/// Writes the tile into a file.
pub struct FileSink {
	path: PathBuf,
}

impl FileSink {
	pub fn new(path: &Path) -> Self {
		FileSink { path: path.to_path_buf() }
	}

	/// Writes to `tile_<date>T<time>.bin` in `dir`, named after the current UTC time.
	pub fn timestamped(dir: &Path) -> Result<Self> {
		Ok(FileSink::new(&dir.join(timestamp_file_name(OffsetDateTime::now_utc())?)))
	}
}

impl TileSink for FileSink {
	fn write_tile(&mut self, tile: &TileBlob) -> Result<String> {
		tile.bytes.save_to_file(&self.path)?;
		Ok(format!("wrote {} bytes to {:?}", tile.length, self.path))
	}
}

/// Writes the raw tile bytes to stdout.
pub struct StdoutSink;

impl TileSink for StdoutSink {
	fn write_tile(&mut self, tile: &TileBlob) -> Result<String> {
		let mut stdout = std::io::stdout().lock();
		stdout.write_all(tile.bytes.as_slice()).context("writing tile to stdout")?;
		stdout.flush()?;
		Ok(format!("wrote {} bytes to stdout", tile.length))
	}
}

pub fn timestamp_file_name(now: OffsetDateTime) -> Result<String> {
	let format = format_description!("[year][month][day]T[hour][minute][second]");
	Ok(format!("tile_{}.bin", now.format(&format)?))
}

#[cfg(test)]
mod tests {
	use super::*;
	use assert_fs::TempDir;
	use compactcache::core::Blob;
	use time::macros::datetime;

	fn tile(bytes: &[u8]) -> TileBlob {
		TileBlob {
			offset: 100,
			length: bytes.len() as u32,
			bytes: Blob::from(bytes),
		}
	}

	#[test]
	fn timestamp_name() {
		let name = timestamp_file_name(datetime!(2026-10-16 08:05:09 UTC)).unwrap();
		assert_eq!(name, "tile_20261016T080509.bin");
	}

	#[test]
	fn file_sink() -> Result<()> {
		let dir = TempDir::new()?;
		let path = dir.path().join("out.png");

		let message = FileSink::new(&path).write_tile(&tile(b"\x89PNG"))?;
		assert!(message.starts_with("wrote 4 bytes to"));
		assert_eq!(std::fs::read(&path)?, b"\x89PNG");
		Ok(())
	}

	#[test]
	fn timestamped_sink() -> Result<()> {
		let dir = TempDir::new()?;
		FileSink::timestamped(dir.path())?.write_tile(&tile(b"abc"))?;

		let names = std::fs::read_dir(dir.path())?
			.map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
			.collect::<std::io::Result<Vec<_>>>()?;
		assert_eq!(names.len(), 1);
		assert!(names[0].starts_with("tile_") && names[0].ends_with(".bin"), "{names:?}");
		Ok(())
	}
}
