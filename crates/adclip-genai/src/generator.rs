//! Generator trait the orchestration layer depends on.

use async_trait::async_trait;

use adclip_models::{AspectRatio, ExtractedFrame, Resolution, SafetyProfile};

use crate::client::{GenAiClient, GeneratedClip};
use crate::error::GenAiResult;

/// Everything needed for one model call.
///
/// A single-segment generation carries first and last boundary frames;
/// a split generation issues two specs that share the middle frame.
#[derive(Debug, Clone)]
pub struct SegmentSpec {
    pub model: String,
    pub prompt: String,
    pub first_frame: ExtractedFrame,
    pub last_frame: Option<ExtractedFrame>,
    /// Whole seconds, as the model API requires
    pub duration_seconds: u32,
    pub aspect_ratio: AspectRatio,
    pub resolution: Resolution,
    pub safety: SafetyProfile,
    pub seed: Option<u64>,
}

/// One segment generation, end to end: submit, poll, resolve bytes.
///
/// Behind a trait so orchestration tests can run against scripted fakes
/// instead of the live API.
#[async_trait]
pub trait VideoGenerator: Send + Sync {
    async fn generate(&self, spec: &SegmentSpec) -> GenAiResult<GeneratedClip>;

    /// Longest duration a single call may request.
    fn max_single_call_secs(&self) -> f64;
}

#[async_trait]
impl VideoGenerator for GenAiClient {
    async fn generate(&self, spec: &SegmentSpec) -> GenAiResult<GeneratedClip> {
        GenAiClient::generate(self, spec).await
    }

    fn max_single_call_secs(&self) -> f64 {
        self.config().max_single_call_secs
    }
}
