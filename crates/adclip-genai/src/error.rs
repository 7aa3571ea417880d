//! Generation client error types.

use thiserror::Error;

pub type GenAiResult<T> = Result<T, GenAiError>;

#[derive(Debug, Error)]
pub enum GenAiError {
    /// Account lacks access to the model. Never retried.
    #[error("Permission denied by video model API: {0}")]
    PermissionDenied(String),

    /// Quota or rate limit exhausted. Never retried.
    #[error("Video model quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Polling exceeded the configured deadline.
    #[error("Generation did not complete within {0} seconds")]
    Timeout(u64),

    /// Terminal operation error, message kept verbatim for classification.
    #[error("Generation job failed: {0}")]
    JobFailed(String),

    /// Operation completed but produced no usable video sample.
    #[error("Generation returned no usable sample: {0}")]
    MissingSample(String),

    /// Video reference could not be turned into bytes.
    #[error("Failed to resolve generated video bytes: {0}")]
    ResolveFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GenAiError {
    pub fn job_failed(msg: impl Into<String>) -> Self {
        Self::JobFailed(msg.into())
    }

    pub fn missing_sample(msg: impl Into<String>) -> Self {
        Self::MissingSample(msg.into())
    }

    pub fn resolve_failed(msg: impl Into<String>) -> Self {
        Self::ResolveFailed(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Map an HTTP-level API rejection onto the taxonomy.
    pub fn from_api_status(status: reqwest::StatusCode, body: String) -> Self {
        match status.as_u16() {
            401 | 403 => Self::PermissionDenied(body),
            429 => Self::QuotaExceeded(body),
            _ => Self::JobFailed(format!("API returned {}: {}", status, body)),
        }
    }

    /// Map a terminal operation error payload onto the taxonomy.
    ///
    /// gRPC codes: 7 = PERMISSION_DENIED, 8 = RESOURCE_EXHAUSTED. Anything
    /// else stays a raw job failure so the retry policy can inspect the
    /// message text.
    pub fn from_operation_error(code: Option<i64>, message: String) -> Self {
        let lowered = message.to_lowercase();
        if code == Some(7) || lowered.contains("permission_denied") || lowered.contains("permission denied") {
            return Self::PermissionDenied(message);
        }
        if code == Some(8)
            || lowered.contains("resource_exhausted")
            || lowered.contains("quota")
            || lowered.contains("rate limit")
        {
            return Self::QuotaExceeded(message);
        }
        Self::JobFailed(message)
    }

    /// Check whether the failure reads as a content-policy rejection of the
    /// input image, as opposed to an infrastructure problem.
    pub fn is_content_blocked(&self) -> bool {
        let msg = match self {
            GenAiError::JobFailed(msg) => msg,
            _ => return false,
        };
        let msg = msg.to_lowercase();

        msg.contains("safety")
            || msg.contains("blocked")
            || msg.contains("flagged")
            || msg.contains("content policy")
            || msg.contains("prohibited")
            || msg.contains("violat")
    }
}
