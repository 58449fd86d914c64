//! Lookup of single tiles in ArcGIS compact bundle caches.
//!
//! A lookup runs through four stages, each a plain function over immutable values:
//!
//! 1. [`path`] builds the bundle and index paths of the tile's group,
//! 2. [`location`] computes the tile's slot inside that group,
//! 3. [`index`] reads the slot's record from the `.bundlx` file,
//! 4. [`extract`] reads the length-prefixed payload from the `.bundle` file.
//!
//! [`BundleCacheReader`] ties the stages together.

mod error;
pub mod extract;
mod format;
pub mod index;
pub mod location;
pub mod path;
mod reader;

pub use error::*;
pub use extract::{MAX_TILE_LENGTH, TileBlob};
pub use format::*;
pub use index::{IndexRecord, LENGTH_PREFIX_LEN};
pub use location::{BundleLocation, GroupOrigin, coord_from_signed, group_start, slot_index};
pub use path::{bundle_path, bundle_stem, index_path};
pub use reader::*;
