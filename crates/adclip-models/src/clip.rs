//! Cached clip records and the outbound response.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a generation job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Terminal status reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ClipStatus {
    Completed,
    Failed,
}

impl ClipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClipStatus::Completed => "completed",
            ClipStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for ClipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A fully assembled, duration-correct clip as stored in the cache.
///
/// Only complete results are ever written; a partially generated or failed
/// attempt never reaches this type. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CachedClip {
    pub job_id: JobId,

    /// Model that produced the final clip
    pub model_used: String,

    pub mime_type: String,

    /// Remote URI the bytes came from, when there was one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_uri: Option<String>,

    /// Playable reference: an inline `data:` URL or a remote URL
    pub video_url: String,

    pub cached_at: DateTime<Utc>,

    pub requested_timestamp_seconds: f64,

    /// Timestamp actually used; differs from requested when a fallback
    /// candidate produced the clip
    pub applied_timestamp_seconds: f64,

    pub person_generation_profile_used: String,
}

/// Body of a successful `POST /api/ads/generate`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdClipResponse {
    pub job_id: JobId,
    pub status: ClipStatus,
    pub video_url: String,
    pub model_used: String,
    pub mime_type: String,
    pub cache_hit: bool,
    pub requested_timestamp_seconds: f64,
    pub applied_timestamp_seconds: f64,
    pub person_generation_profile_used: String,
}

impl AdClipResponse {
    /// Build the response for a clip, fresh or from cache.
    pub fn from_clip(clip: &CachedClip, cache_hit: bool) -> Self {
        Self {
            job_id: clip.job_id.clone(),
            status: ClipStatus::Completed,
            video_url: clip.video_url.clone(),
            model_used: clip.model_used.clone(),
            mime_type: clip.mime_type.clone(),
            cache_hit,
            requested_timestamp_seconds: clip.requested_timestamp_seconds,
            applied_timestamp_seconds: clip.applied_timestamp_seconds,
            person_generation_profile_used: clip.person_generation_profile_used.clone(),
        }
    }
}
