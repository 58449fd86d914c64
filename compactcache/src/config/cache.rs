use crate::bundle::StorageFormat;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
	fs::File,
	io::{BufReader, Read},
	path::{Path, PathBuf},
};

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
	/// Directory containing the `_alllayers` folder.
	/// Relative paths are resolved against the directory of the config file.
	pub root: PathBuf,

	/// Layout of the cache, `compact_v1` (default) or `compact_v2`.
	#[serde(default)]
	pub format: StorageFormat,
}

impl CacheConfig {
	pub fn new(root: &Path, format: StorageFormat) -> Self {
		CacheConfig {
			root: root.to_path_buf(),
			format,
		}
	}

	pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
		Ok(serde_yaml_ng::from_reader(reader)?)
	}

	pub fn from_string(text: &str) -> Result<Self> {
		Ok(serde_yaml_ng::from_str(text)?)
	}

	/// Parses the file at `path` and resolves a relative `root` against the file's directory.
	pub fn from_path(path: &Path) -> Result<Self> {
		let file = File::open(path).with_context(|| format!("opening config file {path:?}"))?;
		let mut config = CacheConfig::from_reader(BufReader::new(file)).with_context(|| format!("parsing config file {path:?}"))?;

		if config.root.is_relative()
			&& let Some(base) = path.parent()
		{
			config.root = base.join(&config.root);
		}
		Ok(config)
	}
}
