//! This module provides the `ByteRange` struct, which describes a bounded read: an offset into a
//! file and the number of bytes to read from there.
//!
//! # Examples
//!
//! ```rust
//! use compactcache_core::ByteRange;
//!
//! let range = ByteRange::new(16, 5);
//! assert_eq!(range.offset, 16);
//! assert_eq!(range.length, 5);
//! assert_eq!(range.end(), Some(21));
//! ```

use std::fmt;

/// A contiguous range of bytes given by offset and length.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct ByteRange {
	/// The starting offset of the byte range.
	pub offset: u64,
	/// The length of the byte range.
	pub length: u64,
}

impl ByteRange {
	pub fn new(offset: u64, length: u64) -> Self {
		Self { offset, length }
	}

	/// Returns the exclusive end position, or `None` if it does not fit into a `u64`.
	pub fn end(&self) -> Option<u64> {
		self.offset.checked_add(self.length)
	}

	/// Returns a new `ByteRange` that starts right after this one.
	///
	/// ```rust
	/// use compactcache_core::ByteRange;
	///
	/// assert_eq!(ByteRange::new(100, 4).following(10), Some(ByteRange::new(104, 10)));
	/// ```
	pub fn following(&self, length: u64) -> Option<Self> {
		Some(Self::new(self.end()?, length))
	}
}

impl fmt::Debug for ByteRange {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "ByteRange[{},{}]", self.offset, self.length)
	}
}
