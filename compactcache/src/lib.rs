//! # compactcache
//!
//! Reads single tiles from ArcGIS compact bundle caches (`.bundle`/`.bundlx` file pairs)
//! without loading or indexing the whole cache.
//!
//! ## Usage Example
//!
//! ```no_run
//! use compactcache::bundle::{BundleCacheReader, StorageFormat};
//! use std::path::Path;
//!
//! let reader = BundleCacheReader::with_format(Path::new("/data/cache/Layers"), StorageFormat::CompactV1);
//! let tile = reader.get_tile(1600, 35, 11).unwrap();
//! std::fs::write("tile.png", tile.bytes.as_slice()).unwrap();
//! ```

pub mod bundle;
pub mod config;

pub use compactcache_core as core;
