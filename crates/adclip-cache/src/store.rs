//! Two-layer cache facade.
//!
//! Reads check memory first, then disk, hydrating memory on a disk hit.
//! Writes land in memory immediately; the durable write happens on a
//! background task and its failure is logged, never surfaced.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use adclip_models::{CacheKey, CachedClip};

use crate::config::CacheConfig;
use crate::disk::DiskCache;
use crate::error::CacheResult;
use crate::memory::MemoryCache;

pub struct CacheStore {
    memory: Mutex<MemoryCache>,
    disk: DiskCache,
}

impl CacheStore {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            memory: Mutex::new(MemoryCache::new(config.memory_capacity)),
            disk: DiskCache::new(config.dir),
        }
    }

    pub fn shared(config: CacheConfig) -> Arc<Self> {
        Arc::new(Self::new(config))
    }

    /// Verify the durable layer is usable. Used by the readiness probe.
    pub async fn check(&self) -> CacheResult<()> {
        tokio::fs::create_dir_all(self.disk.dir()).await?;
        Ok(())
    }

    /// Look up a clip, hydrating memory from disk when needed.
    pub async fn get(&self, key: &CacheKey) -> Option<CachedClip> {
        let fingerprint = key.fingerprint();

        if let Some(clip) = self.memory.lock().await.get(&fingerprint) {
            debug!(key = %key.as_key_string(), "Cache hit (memory)");
            return Some(clip);
        }

        let clip = self.disk.load(&fingerprint).await?;
        debug!(key = %key.as_key_string(), "Cache hit (disk), hydrating memory");
        self.memory
            .lock()
            .await
            .put(fingerprint, clip.clone());
        Some(clip)
    }

    /// Store a clip in both layers.
    pub async fn put(&self, key: &CacheKey, clip: CachedClip) {
        let fingerprint = key.fingerprint();
        self.memory
            .lock()
            .await
            .put(fingerprint.clone(), clip.clone());

        let disk = self.disk.clone();
        tokio::spawn(async move {
            if let Err(e) = disk.store(&fingerprint, &clip).await {
                warn!(fingerprint = %fingerprint, error = %e, "Durable cache write failed");
            }
        });
    }

    /// Empty both layers, reporting the number of distinct entries removed.
    pub async fn clear(&self) -> CacheResult<usize> {
        let memory_fingerprints = self.memory.lock().await.drain();
        let disk_fingerprints = self.disk.clear().await?;

        let distinct: HashSet<String> = memory_fingerprints
            .into_iter()
            .chain(disk_fingerprints)
            .collect();
        let count = distinct.len();

        info!(count = count, "Cleared clip cache");
        Ok(count)
    }
}
