//! Inbound generation request types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{AdStyle, AspectRatio, ProductDescriptor, Resolution};

/// Body of `POST /api/ads/generate`.
///
/// Validation runs before any external call; failures surface as a 400
/// without touching the frame tool or the model.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdClipRequest {
    /// Source video identifier
    #[validate(length(min = 1, max = 128))]
    pub video_id: String,

    /// Anchor timestamp in the source video
    #[validate(range(min = 0.0))]
    pub timestamp_seconds: f64,

    /// Target clip duration
    #[validate(range(min = 1.0, max = 60.0))]
    pub duration_seconds: f64,

    /// Advertised product
    #[validate(nested)]
    pub product: ProductDescriptor,

    /// Free-text description of the surrounding scene. Feeds the prompt
    /// only; never part of the cache identity.
    #[validate(length(max = 2000))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scene_context: Option<String>,

    #[serde(default)]
    pub style: AdStyle,

    #[serde(default)]
    pub aspect_ratio: AspectRatio,

    #[serde(default)]
    pub resolution: Resolution,

    /// Fixed generation seed; omitted means the model picks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Skip both cache layers for this request
    #[serde(default)]
    pub bypass_cache: bool,
}

impl AdClipRequest {
    /// Normalize into the immutable request the orchestrator works with.
    pub fn into_request(self) -> GenerationRequest {
        GenerationRequest {
            video_id: self.video_id.trim().to_string(),
            timestamp_seconds: self.timestamp_seconds,
            duration_seconds: self.duration_seconds,
            product: self.product,
            scene_context: self
                .scene_context
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            style: self.style,
            aspect_ratio: self.aspect_ratio,
            resolution: self.resolution,
            seed: self.seed,
            bypass_cache: self.bypass_cache,
        }
    }
}

/// A validated, normalized generation request. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GenerationRequest {
    pub video_id: String,
    pub timestamp_seconds: f64,
    pub duration_seconds: f64,
    pub product: ProductDescriptor,
    pub scene_context: Option<String>,
    pub style: AdStyle,
    pub aspect_ratio: AspectRatio,
    pub resolution: Resolution,
    pub seed: Option<u64>,
    pub bypass_cache: bool,
}
