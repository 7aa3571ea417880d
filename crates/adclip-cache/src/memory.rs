//! Bounded in-memory cache layer.
//!
//! Eviction is strictly insertion-order (FIFO): when the capacity is
//! exceeded the earliest-inserted entry goes first, regardless of how
//! often or how recently it was read.

use std::collections::{HashMap, VecDeque};

use tracing::debug;

use adclip_models::CachedClip;

#[derive(Debug)]
pub struct MemoryCache {
    entries: HashMap<String, CachedClip>,
    order: VecDeque<String>,
    capacity: usize,
}

impl MemoryCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity,
        }
    }

    pub fn get(&self, fingerprint: &str) -> Option<CachedClip> {
        self.entries.get(fingerprint).cloned()
    }

    /// Insert an entry, evicting the oldest if over capacity.
    ///
    /// Re-inserting an existing fingerprint replaces the value but keeps
    /// its original position in the eviction order; identical fingerprints
    /// carry identical content, so the position does not matter.
    pub fn put(&mut self, fingerprint: String, clip: CachedClip) {
        if self.entries.insert(fingerprint.clone(), clip).is_none() {
            self.order.push_back(fingerprint);
        }

        while self.entries.len() > self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    debug!(fingerprint = %oldest, "Evicting oldest cache entry");
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
    }

    /// Remove everything, returning the fingerprints that were present.
    pub fn drain(&mut self) -> Vec<String> {
        self.order.clear();
        self.entries.drain().map(|(fingerprint, _)| fingerprint).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
