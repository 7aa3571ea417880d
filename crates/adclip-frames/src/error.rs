//! Error types for frame resolution.

use thiserror::Error;

/// Result type for frame operations.
pub type FrameResult<T> = Result<T, FrameError>;

/// Errors that can occur while resolving a frame.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("Frame tool not found: {0}")]
    ToolNotFound(String),

    #[error("Frame tool failed: {message}")]
    ToolFailed {
        message: String,
        details: Option<String>,
        exit_code: Option<i32>,
    },

    #[error("Frame tool timed out after {0} seconds")]
    ToolTimeout(u64),

    #[error("Frame tool produced malformed output: {0}")]
    MalformedOutput(String),

    #[error("No thumbnail variant available for video {0}")]
    ThumbnailUnavailable(String),

    #[error("No frame available for video {video_id} at {timestamp_seconds}s")]
    Unavailable {
        video_id: String,
        timestamp_seconds: f64,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FrameError {
    /// Create a tool failure error.
    pub fn tool_failed(
        message: impl Into<String>,
        details: Option<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::ToolFailed {
            message: message.into(),
            details,
            exit_code,
        }
    }

    /// Create a malformed output error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedOutput(message.into())
    }
}
