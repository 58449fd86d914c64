//! Builds the paths of bundle and index files inside a cache.
//!
//! All tiles of a group live in one file pair:
//! ```text
//! <root>/_alllayers/L<zz>/R<rrrr>C<cccc>.bundle
//! <root>/_alllayers/L<zz>/R<rrrr>C<cccc>.bundlx
//! ```
//! where `<zz>` is the zoom level in decimal (at least 2 digits) and `<rrrr>`/`<cccc>` are the
//! row and column of the group origin in uppercase hexadecimal (at least 4 digits).

use super::{BundleError, GROUP_SIZE};
use anyhow::{Result, ensure};
use std::path::{Path, PathBuf};

/// Name of the directory holding all zoom levels of a cache.
pub const LAYERS_DIR: &str = "_alllayers";

pub const BUNDLE_EXTENSION: &str = "bundle";
pub const INDEX_EXTENSION: &str = "bundlx";

/// Returns the directory name of a zoom level, e.g. `L05`.
pub fn level_dir_name(zoom: u8) -> String {
	format!("L{zoom:02}")
}

/// Returns the file stem of a group, e.g. `R0080C0600`.
pub fn group_file_stem(row_group: u32, col_group: u32) -> String {
	format!("R{row_group:04X}C{col_group:04X}")
}

/// Returns `root/_alllayers/L{zz}/R{rrrr}C{cccc}`, the path shared by the bundle and index
/// file of a group, without extension.
///
/// # Errors
///
/// Fails with [`BundleError::InvalidArgument`] if `row_group` or `col_group` is not a multiple
/// of the group size.
///
/// ```
/// use compactcache::bundle::bundle_stem;
/// use std::path::{Path, PathBuf};
///
/// let stem = bundle_stem(Path::new("/data"), 11, 0, 1536).unwrap();
/// assert_eq!(stem, PathBuf::from("/data/_alllayers/L11/R0000C0600"));
/// ```
pub fn bundle_stem(root: &Path, zoom: u8, row_group: u32, col_group: u32) -> Result<PathBuf> {
	ensure!(
		row_group % GROUP_SIZE == 0,
		BundleError::invalid_argument(format!("row group {row_group} is not a multiple of {GROUP_SIZE}"))
	);
	ensure!(
		col_group % GROUP_SIZE == 0,
		BundleError::invalid_argument(format!("column group {col_group} is not a multiple of {GROUP_SIZE}"))
	);

	Ok(root
		.join(LAYERS_DIR)
		.join(level_dir_name(zoom))
		.join(group_file_stem(row_group, col_group)))
}

/// Returns the path of the `.bundle` file for a stem built by [`bundle_stem`].
pub fn bundle_path(stem: &Path) -> PathBuf {
	stem.with_extension(BUNDLE_EXTENSION)
}

/// Returns the path of the `.bundlx` file for a stem built by [`bundle_stem`].
pub fn index_path(stem: &Path) -> PathBuf {
	stem.with_extension(INDEX_EXTENSION)
}

/// Parses a group file stem like `R0080C0600` back into `(row_group, col_group)`.
///
/// Returns `None` for names that do not follow the pattern. `C` is also a hex digit, so every
/// `C` is tried as separator and the first split with two valid 4+ digit numbers wins.
pub fn parse_group_file_stem(stem: &str) -> Option<(u32, u32)> {
	let rest = stem.strip_prefix('R')?;
	rest.match_indices('C').find_map(|(index, _)| {
		let (row, col) = (&rest[..index], &rest[index + 1..]);
		if row.len() < 4 || col.len() < 4 {
			return None;
		}
		Some((parse_hex(row)?, parse_hex(col)?))
	})
}

fn parse_hex(digits: &str) -> Option<u32> {
	if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
		return None;
	}
	u32::from_str_radix(digits, 16).ok()
}

/// Parses a level directory name like `L05` back into the zoom level.
pub fn parse_level_dir_name(name: &str) -> Option<u8> {
	let digits = name.strip_prefix('L')?;
	if digits.len() < 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
		return None;
	}
	digits.parse().ok()
}
