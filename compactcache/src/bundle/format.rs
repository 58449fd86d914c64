//! This module defines the `StorageFormat` enum, which selects between the two on-disk layouts
//! of compact bundle caches.
//!
//! Both layouts pack 128×128 tiles per bundle. They differ in how a tile is mapped to its slot
//! and in the layout of the `.bundlx` index records:
//!
//! | Format      | Slot order   | Index header | Record size | Record content                 |
//! |-------------|--------------|--------------|-------------|--------------------------------|
//! | `CompactV1` | column-major | 16 bytes     | 5 bytes     | offset of the length prefix    |
//! | `CompactV2` | row-major    | 64 bytes     | 8 bytes     | offset of the payload and size |
//!
//! A cache does not reliably declare its format, so it has to be chosen by the caller.
//!
//! # Examples
//!
//! ```
//! use compactcache::bundle::StorageFormat;
//!
//! let format = StorageFormat::parse_str("v2").unwrap();
//! assert_eq!(format, StorageFormat::CompactV2);
//! assert_eq!(format.to_string(), "compact_v2");
//! assert_eq!(StorageFormat::default(), StorageFormat::CompactV1);
//! ```

use super::BundleError;
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::ValueEnum;
use serde::Deserialize;
use std::fmt::Display;

/// Number of tiles per group along each axis.
pub const GROUP_SIZE: u32 = 128;

/// Number of slots in one bundle.
pub const SLOT_COUNT: u32 = GROUP_SIZE * GROUP_SIZE;

/// The layout of a compact bundle cache.
#[cfg_attr(feature = "cli", derive(ValueEnum))]
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq)]
#[serde(try_from = "String")]
pub enum StorageFormat {
	#[default]
	#[cfg_attr(feature = "cli", value(name = "v1", alias = "compact_v1"))]
	CompactV1,
	#[cfg_attr(feature = "cli", value(name = "v2", alias = "compact_v2"))]
	CompactV2,
}

impl StorageFormat {
	pub fn as_str(&self) -> &'static str {
		match self {
			StorageFormat::CompactV1 => "compact_v1",
			StorageFormat::CompactV2 => "compact_v2",
		}
	}

	/// Parses a format name. Accepts `compact_v1`, `compactv1`, `v1` and the same for `v2`,
	/// ignoring case and surrounding whitespace.
	///
	/// # Errors
	///
	/// Fails with [`BundleError::UnsupportedFormat`] for any other name.
	pub fn parse_str(value: &str) -> Result<Self> {
		Ok(match value.to_lowercase().trim() {
			"compact_v1" | "compactv1" | "v1" => StorageFormat::CompactV1,
			"compact_v2" | "compactv2" | "v2" => StorageFormat::CompactV2,
			_ => return Err(BundleError::UnsupportedFormat(value.to_string()).into()),
		})
	}

	/// Size of the header in front of the first index record.
	pub fn index_header_len(&self) -> u64 {
		match self {
			StorageFormat::CompactV1 => 16,
			StorageFormat::CompactV2 => 64,
		}
	}

	/// Size of one index record.
	pub fn index_record_len(&self) -> u64 {
		match self {
			StorageFormat::CompactV1 => 5,
			StorageFormat::CompactV2 => 8,
		}
	}

	/// Size of a complete index file holding all [`SLOT_COUNT`] records.
	pub fn index_file_len(&self) -> u64 {
		self.index_header_len() + self.index_record_len() * u64::from(SLOT_COUNT)
	}
}

impl Display for StorageFormat {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

impl TryFrom<String> for StorageFormat {
	type Error = BundleError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		StorageFormat::parse_str(&value).map_err(|_| BundleError::UnsupportedFormat(value))
	}
}
