//! The orchestration error taxonomy.
//!
//! Every failure an ad clip request can surface maps onto exactly one of
//! these variants; the retry policy in `classify` is written against this
//! taxonomy, never against provider-specific errors.

use thiserror::Error;

use adclip_cache::CacheError;
use adclip_frames::FrameError;
use adclip_genai::GenAiError;
use adclip_media::MediaError;

pub type ClipResult<T> = Result<T, ClipError>;

#[derive(Debug, Error)]
pub enum ClipError {
    /// No frame could be produced for a candidate timestamp.
    #[error("Frame unavailable: {0}")]
    FrameUnavailable(String),

    /// Generation polling exceeded its deadline.
    #[error("Generation timed out after {0} seconds")]
    GenerationTimeout(u64),

    /// The model failed for a reason other than content policy.
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// Content policy rejected an input frame.
    #[error("Input image blocked by content policy: {0}")]
    BlockedInputImage(String),

    /// The model finished without usable output.
    #[error("No generated sample was usable: {0}")]
    MissingGeneratedSample(String),

    /// Account-level rejection. Never retried.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Quota or rate limit exhausted. Never retried.
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Stitching or padding the generated segments failed.
    #[error("Post-processing failed: {0}")]
    PostProcessingFailed(String),

    /// Rejected before any external call was made.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Cache maintenance failure, only reachable from the clear operation.
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}

impl ClipError {
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }
}

impl From<FrameError> for ClipError {
    fn from(e: FrameError) -> Self {
        ClipError::FrameUnavailable(e.to_string())
    }
}

impl From<GenAiError> for ClipError {
    fn from(e: GenAiError) -> Self {
        if e.is_content_blocked() {
            return ClipError::BlockedInputImage(e.to_string());
        }
        match e {
            GenAiError::PermissionDenied(msg) => ClipError::PermissionDenied(msg),
            GenAiError::QuotaExceeded(msg) => ClipError::QuotaExceeded(msg),
            GenAiError::Timeout(secs) => ClipError::GenerationTimeout(secs),
            GenAiError::MissingSample(msg) => ClipError::MissingGeneratedSample(msg),
            // A reference that cannot be fetched is output we cannot use.
            GenAiError::ResolveFailed(msg) => ClipError::MissingGeneratedSample(msg),
            GenAiError::JobFailed(msg) => ClipError::GenerationFailed(msg),
            other => ClipError::GenerationFailed(other.to_string()),
        }
    }
}

impl From<MediaError> for ClipError {
    fn from(e: MediaError) -> Self {
        ClipError::PostProcessingFailed(e.to_string())
    }
}
