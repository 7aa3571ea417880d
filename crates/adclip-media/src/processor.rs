//! Post-processing behind a trait so orchestration can run against fakes.

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::fs;

use crate::command::{check_ffmpeg, check_ffprobe};
use crate::config::MediaConfig;
use crate::error::MediaResult;
use crate::extend::extend;
use crate::probe::probe_video;
use crate::stitch::stitch;

/// The two assembly transforms plus the duration probe they depend on.
#[async_trait]
pub trait PostProcessor: Send + Sync {
    /// Trim B to `keep_seconds_of_b`, then concatenate A followed by B.
    async fn stitch(
        &self,
        segment_a: &[u8],
        segment_b: &[u8],
        keep_seconds_of_b: f64,
    ) -> MediaResult<Vec<u8>>;

    /// Pad by holding the final frame; `hold_seconds <= 0` is identity.
    async fn extend(&self, clip: &[u8], hold_seconds: f64) -> MediaResult<Vec<u8>>;

    /// Container duration of a clip, in seconds.
    async fn clip_duration(&self, clip: &[u8]) -> MediaResult<f64>;
}

/// The real implementation, backed by the ffmpeg CLI.
#[derive(Debug, Clone)]
pub struct FfmpegPostProcessor {
    config: MediaConfig,
}

impl FfmpegPostProcessor {
    pub fn new(config: MediaConfig) -> Self {
        Self { config }
    }

    /// Verify ffmpeg and ffprobe are invocable. Used by the readiness probe.
    pub fn check(&self) -> MediaResult<()> {
        check_ffmpeg()?;
        check_ffprobe()?;
        Ok(())
    }
}

#[async_trait]
impl PostProcessor for FfmpegPostProcessor {
    async fn stitch(
        &self,
        segment_a: &[u8],
        segment_b: &[u8],
        keep_seconds_of_b: f64,
    ) -> MediaResult<Vec<u8>> {
        stitch(segment_a, segment_b, keep_seconds_of_b, &self.config).await
    }

    async fn extend(&self, clip: &[u8], hold_seconds: f64) -> MediaResult<Vec<u8>> {
        extend(clip, hold_seconds, &self.config).await
    }

    async fn clip_duration(&self, clip: &[u8]) -> MediaResult<f64> {
        let workdir = TempDir::new()?;
        let path = workdir.path().join("probe.mp4");
        fs::write(&path, clip).await?;
        let info = probe_video(&path).await?;
        Ok(info.duration)
    }
}
