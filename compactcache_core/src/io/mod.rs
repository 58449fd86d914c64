//! Bounded, seek-based file reading.

mod data_reader_file;

pub use data_reader_file::*;
