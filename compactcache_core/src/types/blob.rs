//! This module provides the [`Blob`] struct, an owned byte buffer holding a tile payload or
//! any other chunk of bytes read from a bundle.
//!
//! # Examples
//!
//! ```rust
//! use compactcache_core::Blob;
//!
//! let blob = Blob::from(vec![0x89, b'P', b'N', b'G']);
//! assert_eq!(blob.len(), 4);
//! assert_eq!(blob.as_slice(), &[0x89, b'P', b'N', b'G']);
//! ```

use anyhow::{Context, Result};
use std::fmt::Debug;
use std::path::Path;

/// Number of leading bytes shown by the [`Debug`] implementation.
const DEBUG_PREVIEW: usize = 16;

/// An owned sequence of bytes.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Blob(Vec<u8>);

impl Blob {
	/// Creates a `Blob` with the specified size, filled with zeros.
	///
	/// Used as the target buffer of bounded reads.
	#[must_use]
	pub fn new_sized(length: usize) -> Blob {
		Blob(vec![0u8; length])
	}

	#[must_use]
	pub fn as_slice(&self) -> &[u8] {
		&self.0
	}

	#[must_use]
	pub fn as_mut_slice(&mut self) -> &mut [u8] {
		&mut self.0
	}

	#[must_use]
	pub fn into_vec(self) -> Vec<u8> {
		self.0
	}

	/// Returns the bytes as space separated lowercase hex pairs.
	///
	/// ```rust
	/// use compactcache_core::Blob;
	///
	/// assert_eq!(Blob::from(&[0x0a, 0xff]).as_hex(), "0a ff");
	/// ```
	#[must_use]
	pub fn as_hex(&self) -> String {
		hex_pairs(&self.0)
	}

	/// Returns the number of bytes.
	#[must_use]
	pub fn len(&self) -> u64 {
		self.0.len() as u64
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Writes the bytes to `path`, creating or truncating the file.
	pub fn save_to_file(&self, path: &Path) -> Result<()> {
		std::fs::write(path, &self.0).with_context(|| format!("failed to write {} bytes to {path:?}", self.0.len()))
	}
}

fn hex_pairs(bytes: &[u8]) -> String {
	bytes
		.iter()
		.map(|byte| format!("{byte:02x}"))
		.collect::<Vec<_>>()
		.join(" ")
}

impl From<Vec<u8>> for Blob {
	fn from(item: Vec<u8>) -> Self {
		Blob(item)
	}
}

impl From<&[u8]> for Blob {
	fn from(item: &[u8]) -> Self {
		Blob(item.to_vec())
	}
}

impl<const N: usize> From<&[u8; N]> for Blob {
	fn from(item: &[u8; N]) -> Self {
		Blob(item.to_vec())
	}
}

impl AsRef<[u8]> for Blob {
	fn as_ref(&self) -> &[u8] {
		&self.0
	}
}

/// Prints the length and a hex preview of the first bytes; tile payloads can be large.
impl Debug for Blob {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		if self.0.len() > DEBUG_PREVIEW {
			write!(f, "Blob({}): {} ..", self.0.len(), hex_pairs(&self.0[..DEBUG_PREVIEW]))
		} else {
			write!(f, "Blob({}): {}", self.0.len(), self.as_hex())
		}
	}
}
