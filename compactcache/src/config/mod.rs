//! Configuration of a compact cache, usually loaded from a YAML file:
//!
//! ```yaml
//! root: ./Layers
//! format: compact_v2
//! ```

mod cache;

pub use cache::CacheConfig;
