//! Durable cache layer: one gzip-compressed JSON file per fingerprint.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use tracing::{debug, warn};

use adclip_models::CachedClip;

use crate::error::{CacheError, CacheResult};

const ENTRY_SUFFIX: &str = ".json.gz";

/// Compress a clip record to gzip JSON bytes.
pub fn compress_clip(clip: &CachedClip) -> CacheResult<Vec<u8>> {
    let json = serde_json::to_string(clip)
        .map_err(|e| CacheError::serialization(format!("Failed to serialize clip: {}", e)))?;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(json.as_bytes())
        .map_err(|e| CacheError::serialization(format!("Failed to gzip clip: {}", e)))?;

    encoder
        .finish()
        .map_err(|e| CacheError::serialization(format!("Failed to finish gzip encoding: {}", e)))
}

/// Decompress gzip JSON bytes back into a clip record.
///
/// Returns `None` if decompression or deserialization fails (treated as
/// a cache miss).
pub fn decompress_clip(data: &[u8]) -> Option<CachedClip> {
    let mut decoder = GzDecoder::new(data);
    let mut json = String::new();

    if let Err(e) = decoder.read_to_string(&mut json) {
        warn!(error = %e, "Failed to decompress cached clip");
        return None;
    }

    match serde_json::from_str::<CachedClip>(&json) {
        Ok(clip) => Some(clip),
        Err(e) => {
            warn!(error = %e, "Failed to deserialize cached clip");
            None
        }
    }
}

#[derive(Debug, Clone)]
pub struct DiskCache {
    dir: PathBuf,
}

impl DiskCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, fingerprint: &str) -> PathBuf {
        self.dir.join(format!("{}{}", fingerprint, ENTRY_SUFFIX))
    }

    /// Write an entry, creating the cache directory if needed.
    pub async fn store(&self, fingerprint: &str, clip: &CachedClip) -> CacheResult<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let compressed = compress_clip(clip)?;
        let path = self.entry_path(fingerprint);

        tokio::fs::write(&path, compressed).await?;
        debug!(path = %path.display(), "Stored clip in durable cache");
        Ok(())
    }

    /// Load an entry. Any failure reads as a miss.
    pub async fn load(&self, fingerprint: &str) -> Option<CachedClip> {
        let path = self.entry_path(fingerprint);

        let data = match tokio::fs::read(&path).await {
            Ok(data) => data,
            Err(_) => {
                debug!(fingerprint = %fingerprint, "Durable cache miss");
                return None;
            }
        };

        match decompress_clip(&data) {
            Some(clip) => {
                debug!(fingerprint = %fingerprint, "Durable cache hit");
                Some(clip)
            }
            None => {
                debug!(fingerprint = %fingerprint, "Durable cache miss (corrupt entry)");
                None
            }
        }
    }

    /// Remove every entry, returning the fingerprints that were deleted.
    pub async fn clear(&self) -> CacheResult<Vec<String>> {
        let mut removed = Vec::new();

        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            // A missing directory is already clear.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(removed),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if let Some(fingerprint) = name.strip_suffix(ENTRY_SUFFIX) {
                tokio::fs::remove_file(entry.path()).await?;
                removed.push(fingerprint.to_string());
            }
        }

        debug!(count = removed.len(), "Cleared durable cache");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adclip_models::JobId;
    use chrono::Utc;
    use tempfile::TempDir;

    fn clip(tag: &str) -> CachedClip {
        CachedClip {
            job_id: JobId::from_string(tag),
            model_used: "veo-3.0-generate-preview".to_string(),
            mime_type: "video/mp4".to_string(),
            source_uri: None,
            video_url: format!("data:video/mp4;base64,{tag}"),
            cached_at: Utc::now(),
            requested_timestamp_seconds: 5.0,
            applied_timestamp_seconds: 8.0,
            person_generation_profile_used: "allow_all".to_string(),
        }
    }

    #[test]
    fn test_compress_decompress_round_trip() {
        let original = clip("round");
        let compressed = compress_clip(&original).unwrap();
        let restored = decompress_clip(&compressed).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn test_corrupt_bytes_read_as_miss() {
        assert!(decompress_clip(b"definitely not gzip").is_none());
    }

    #[tokio::test]
    async fn test_store_then_load() {
        let dir = TempDir::new().unwrap();
        let cache = DiskCache::new(dir.path());

        cache.store("abc123", &clip("one")).await.unwrap();
        let loaded = cache.load("abc123").await.unwrap();
        assert_eq!(loaded.job_id.as_str(), "one");
        assert!(cache.load("missing").await.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_miss() {
        let dir = TempDir::new().unwrap();
        let cache = DiskCache::new(dir.path());

        tokio::fs::write(dir.path().join("bad.json.gz"), b"garbage")
            .await
            .unwrap();
        assert!(cache.load("bad").await.is_none());
    }

    #[tokio::test]
    async fn test_clear_reports_fingerprints() {
        let dir = TempDir::new().unwrap();
        let cache = DiskCache::new(dir.path());

        cache.store("aaa", &clip("a")).await.unwrap();
        cache.store("bbb", &clip("b")).await.unwrap();
        // Unrelated files in the directory are left alone.
        tokio::fs::write(dir.path().join("notes.txt"), b"keep")
            .await
            .unwrap();

        let mut removed = cache.clear().await.unwrap();
        removed.sort();
        assert_eq!(removed, vec!["aaa".to_string(), "bbb".to_string()]);
        assert!(cache.load("aaa").await.is_none());
        assert!(dir.path().join("notes.txt").exists());
    }

    #[tokio::test]
    async fn test_clear_missing_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        let cache = DiskCache::new(dir.path().join("never-created"));
        assert!(cache.clear().await.unwrap().is_empty());
    }
}
