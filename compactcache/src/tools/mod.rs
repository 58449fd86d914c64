pub mod get;
pub mod locate;
pub mod probe;
mod sink;
mod tile_args;
