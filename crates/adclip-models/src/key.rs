//! Cache key derivation.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::{AdStyle, AspectRatio, GenerationRequest, Resolution};

/// Deterministic identity of a generation request for caching.
///
/// Scene context is deliberately absent: two requests that differ only in
/// free-text context share one cached clip. Timestamps are rounded to
/// millisecond precision so float noise cannot split the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct CacheKey {
    pub video_id: String,
    pub timestamp_ms: u64,
    pub duration_ms: u64,
    pub product_id: String,
    pub style: AdStyle,
    pub aspect_ratio: AspectRatio,
    pub resolution: Resolution,
    /// Seed as text, `auto` when the caller left it to the model
    pub seed: String,
}

impl CacheKey {
    /// Derive the key for a request.
    ///
    /// Keyed on the requested timestamp, not the one a fallback candidate
    /// ends up applying: two identical requests must share a key even when
    /// the first was served from a shifted candidate.
    pub fn for_request(request: &GenerationRequest) -> Self {
        Self {
            video_id: request.video_id.clone(),
            timestamp_ms: round_ms(request.timestamp_seconds),
            duration_ms: round_ms(request.duration_seconds),
            product_id: request.product.slug(),
            style: request.style,
            aspect_ratio: request.aspect_ratio,
            resolution: request.resolution,
            seed: request
                .seed
                .map(|s| s.to_string())
                .unwrap_or_else(|| "auto".to_string()),
        }
    }

    /// Canonical key string.
    pub fn as_key_string(&self) -> String {
        format!(
            "adclip:v1:{}:{}ms:{}ms:{}:{}:{}:{}:{}",
            self.video_id,
            self.timestamp_ms,
            self.duration_ms,
            self.product_id,
            self.style,
            self.aspect_ratio,
            self.resolution,
            self.seed,
        )
    }

    /// Filesystem-safe fingerprint: first 16 bytes of the SHA-256 of the
    /// key string, hex-encoded (32 chars).
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.as_key_string().as_bytes());
        digest[..16].iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_key_string())
    }
}

fn round_ms(seconds: f64) -> u64 {
    (seconds.max(0.0) * 1000.0).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProductDescriptor;

    fn request() -> GenerationRequest {
        GenerationRequest {
            video_id: "dQw4w9WgXcQ".to_string(),
            timestamp_seconds: 42.0,
            duration_seconds: 12.0,
            product: ProductDescriptor {
                brand: "Aurora".to_string(),
                product: "Trail Shoe".to_string(),
                tagline: "Run anywhere".to_string(),
                visual_description: "Blue trail running shoe".to_string(),
                action_script: "Runner sprints along a ridge".to_string(),
                benefits: vec!["a".to_string(), "b".to_string(), "c".to_string()],
                gradient_colors: vec!["#000".to_string(), "#fff".to_string()],
            },
            scene_context: Some("a sunny ridge line".to_string()),
            style: AdStyle::Cinematic,
            aspect_ratio: AspectRatio::LANDSCAPE,
            resolution: Resolution::P720,
            seed: None,
            bypass_cache: false,
        }
    }

    #[test]
    fn test_key_string_shape() {
        let key = CacheKey::for_request(&request());
        assert_eq!(
            key.as_key_string(),
            "adclip:v1:dQw4w9WgXcQ:42000ms:12000ms:aurora-trail-shoe:cinematic:16:9:720p:auto"
        );
    }

    #[test]
    fn test_scene_context_excluded() {
        let a = request();
        let mut b = request();
        b.scene_context = Some("completely different text".to_string());
        assert_eq!(CacheKey::for_request(&a), CacheKey::for_request(&b));
    }

    #[test]
    fn test_millisecond_rounding() {
        let mut a = request();
        a.timestamp_seconds = 42.0001;
        let mut b = request();
        b.timestamp_seconds = 42.0004;
        let key_a = CacheKey::for_request(&a);
        let key_b = CacheKey::for_request(&b);
        assert_eq!(key_a.timestamp_ms, 42000);
        assert_eq!(key_a, key_b);

        let mut c = request();
        c.timestamp_seconds = 42.0006;
        let key_c = CacheKey::for_request(&c);
        assert_eq!(key_c.timestamp_ms, 42001);
        assert_ne!(key_a, key_c);
    }

    #[test]
    fn test_seed_in_key() {
        let mut r = request();
        r.seed = Some(1234);
        let key = CacheKey::for_request(&r);
        assert_eq!(key.seed, "1234");
        assert_ne!(key, CacheKey::for_request(&request()));
    }

    #[test]
    fn test_requested_timestamp_changes_key() {
        let mut shifted = request();
        shifted.timestamp_seconds = 45.0;
        assert_ne!(
            CacheKey::for_request(&request()),
            CacheKey::for_request(&shifted)
        );
    }

    #[test]
    fn test_fingerprint_stable_hex() {
        let key = CacheKey::for_request(&request());
        let fp = key.fingerprint();
        assert_eq!(fp.len(), 32);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(fp, key.fingerprint());
    }
}
