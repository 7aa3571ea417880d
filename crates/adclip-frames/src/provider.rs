//! Frame source trait and the default tool-then-thumbnail provider.

use async_trait::async_trait;
use tracing::warn;

use adclip_models::ExtractedFrame;

use crate::config::FrameConfig;
use crate::error::{FrameError, FrameResult};
use crate::thumbnail::ThumbnailClient;
use crate::tool::ExtractionTool;

/// Anything that can produce a still frame for a video at a timestamp.
///
/// The orchestration layer depends on this trait so tests can swap in
/// canned frames without spawning a subprocess.
#[async_trait]
pub trait FrameSource: Send + Sync {
    async fn get_frame(&self, video_id: &str, timestamp_seconds: f64)
        -> FrameResult<ExtractedFrame>;
}

/// Default provider: live extraction first, thumbnail ladder second.
///
/// A frame is only reported unavailable when both paths have failed.
pub struct FrameProvider {
    tool: ExtractionTool,
    thumbnails: ThumbnailClient,
}

impl FrameProvider {
    pub fn new(config: FrameConfig) -> FrameResult<Self> {
        let thumbnails = ThumbnailClient::new(&config)?;
        Ok(Self {
            tool: ExtractionTool::new(config),
            thumbnails,
        })
    }

    /// Readiness check for the underlying tool.
    pub fn check(&self) -> FrameResult<()> {
        self.tool.check()
    }
}

#[async_trait]
impl FrameSource for FrameProvider {
    async fn get_frame(
        &self,
        video_id: &str,
        timestamp_seconds: f64,
    ) -> FrameResult<ExtractedFrame> {
        let tool_error = match self.tool.extract(video_id, timestamp_seconds).await {
            Ok(frame) => return Ok(frame),
            Err(e) => {
                warn!(
                    video_id = %video_id,
                    timestamp = timestamp_seconds,
                    error = %e,
                    "Frame extraction failed, trying thumbnail fallback"
                );
                e
            }
        };

        match self.thumbnails.fetch_best(video_id).await {
            Ok(frame) => Ok(frame),
            Err(thumb_error) => {
                warn!(
                    video_id = %video_id,
                    tool_error = %tool_error,
                    thumbnail_error = %thumb_error,
                    "All frame sources exhausted"
                );
                Err(FrameError::Unavailable {
                    video_id: video_id.to_string(),
                    timestamp_seconds,
                })
            }
        }
    }
}
