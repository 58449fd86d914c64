//! Contains types like tile coordinates, byte ranges and blobs.

mod blob;
pub use blob::*;

mod byte_range;
pub use byte_range::*;

mod tile_coord;
pub use tile_coord::*;
