use std::path::{Path, PathBuf};
use thiserror::Error;

/// The kinds of failure a tile lookup can end with.
///
/// Lookups return [`anyhow::Result`]; the underlying `BundleError` stays reachable through
/// [`anyhow::Error::downcast_ref`] even after context has been attached.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BundleError {
	/// A coordinate, zoom level, group origin or slot index is out of range.
	#[error("invalid argument: {0}")]
	InvalidArgument(String),

	/// The name of a storage format is not known.
	#[error("unsupported storage format '{0}', expected compact_v1 or compact_v2")]
	UnsupportedFormat(String),

	/// A file is missing, unreadable, or too short for the requested read.
	#[error("i/o error on '{}': {message}", path.display())]
	Io { path: PathBuf, message: String },

	/// A decoded offset or length cannot describe a tile.
	#[error("decode error: {0}")]
	Decode(String),
}

impl BundleError {
	pub fn invalid_argument(message: impl Into<String>) -> Self {
		BundleError::InvalidArgument(message.into())
	}

	pub fn io(path: &Path, message: impl Into<String>) -> Self {
		BundleError::Io {
			path: path.to_path_buf(),
			message: message.into(),
		}
	}

	pub fn decode(message: impl Into<String>) -> Self {
		BundleError::Decode(message.into())
	}
}

/// Returns the [`BundleError`] carried by `error`, if there is one.
pub fn bundle_error(error: &anyhow::Error) -> Option<&BundleError> {
	error.downcast_ref::<BundleError>()
}
