//! Clip cache: a bounded in-memory layer over a durable on-disk layer.
//!
//! Identical cache keys always mean identical content, so last-writer-wins
//! is safe everywhere in this crate.

pub mod config;
pub mod disk;
pub mod error;
pub mod memory;
pub mod store;

pub use config::CacheConfig;
pub use disk::DiskCache;
pub use error::{CacheError, CacheResult};
pub use memory::MemoryCache;
pub use store::CacheStore;
