//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use adclip_engine::ClipError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Clip(#[from] ClipError),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Clip(e) => match e {
                ClipError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
                ClipError::PermissionDenied(_) => StatusCode::FORBIDDEN,
                ClipError::QuotaExceeded(_) => StatusCode::TOO_MANY_REQUESTS,
                ClipError::GenerationTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
                ClipError::FrameUnavailable(_)
                | ClipError::GenerationFailed(_)
                | ClipError::BlockedInputImage(_)
                | ClipError::MissingGeneratedSample(_)
                | ClipError::PostProcessingFailed(_) => StatusCode::BAD_GATEWAY,
                ClipError::Cache(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn code(&self) -> Option<&'static str> {
        match self {
            ApiError::Clip(e) => Some(clip_error_code(e)),
            _ => None,
        }
    }
}

/// Stable machine-readable name for a generation failure.
pub fn clip_error_code(e: &ClipError) -> &'static str {
    match e {
        ClipError::FrameUnavailable(_) => "frame_unavailable",
        ClipError::GenerationTimeout(_) => "generation_timeout",
        ClipError::GenerationFailed(_) => "generation_failed",
        ClipError::BlockedInputImage(_) => "blocked_input_image",
        ClipError::MissingGeneratedSample(_) => "missing_generated_sample",
        ClipError::PermissionDenied(_) => "permission_denied",
        ClipError::QuotaExceeded(_) => "quota_exceeded",
        ClipError::PostProcessingFailed(_) => "post_processing_failed",
        ClipError::InvalidRequest(_) => "invalid_request",
        ClipError::Cache(_) => "cache_error",
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Don't expose internal error details in production
        let detail = match &self {
            ApiError::Internal(_) | ApiError::Clip(ClipError::Cache(_)) => {
                if std::env::var("ENVIRONMENT").unwrap_or_default() == "production" {
                    "An internal error occurred".to_string()
                } else {
                    self.to_string()
                }
            }
            _ => self.to_string(),
        };

        let body = ErrorResponse {
            detail,
            code: self.code().map(|c| c.to_string()),
        };

        (status, Json(body)).into_response()
    }
}
