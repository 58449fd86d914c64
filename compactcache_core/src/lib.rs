//! Contains the value types shared by the compact cache reader: tile coordinates, byte blobs,
//! byte ranges, and a bounded file reader.

pub mod macros;

pub mod io;

pub mod types;
pub use types::*;
