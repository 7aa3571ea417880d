//! Cache configuration.

use std::path::PathBuf;

pub const DEFAULT_CACHE_DIR: &str = "/tmp/adclip-cache";
pub const DEFAULT_MEMORY_CAPACITY: usize = 32;

#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Directory for the durable layer
    pub dir: PathBuf,
    /// Maximum entries held in memory before eviction
    pub memory_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_CACHE_DIR),
            memory_capacity: DEFAULT_MEMORY_CAPACITY,
        }
    }
}

impl CacheConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            dir: std::env::var("CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.dir),
            memory_capacity: std::env::var("CACHE_MEMORY_CAPACITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.memory_capacity),
        }
    }
}
