//! Ad clip generation handlers.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tracing::info;
use validator::Validate;

use adclip_engine::ClipError;
use adclip_models::{AdClipRequest, AdClipResponse};

use crate::error::{clip_error_code, ApiError, ApiResult};
use crate::metrics;
use crate::security::{is_valid_video_id, sanitize_string};
use crate::state::AppState;

/// `POST /api/ads/generate`
pub async fn generate_ad(
    State(state): State<AppState>,
    Json(mut request): Json<AdClipRequest>,
) -> ApiResult<Json<AdClipResponse>> {
    request
        .validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    if !is_valid_video_id(request.video_id.trim()) {
        return Err(ApiError::bad_request(
            "videoId must contain only alphanumerics, hyphens and underscores",
        ));
    }

    // Free text goes into the model prompt; strip control characters first.
    request.scene_context = request.scene_context.as_deref().map(sanitize_string);

    let request = request.into_request();
    info!(
        video_id = %request.video_id,
        timestamp = request.timestamp_seconds,
        duration = request.duration_seconds,
        "Ad clip requested"
    );

    match state.engine.generate_clip(request).await {
        Ok(response) => {
            metrics::record_generation(&response.model_used, response.cache_hit);
            info!(
                job_id = %response.job_id,
                model = %response.model_used,
                cache_hit = response.cache_hit,
                applied_timestamp = response.applied_timestamp_seconds,
                "Ad clip ready"
            );
            Ok(Json(response))
        }
        Err(e) => {
            metrics::record_generation_failure(clip_error_code(&e));
            Err(ApiError::from(e))
        }
    }
}

/// Body of a successful `DELETE /api/ads/cache`.
#[derive(Serialize)]
pub struct ClearCacheResponse {
    pub cleared: usize,
}

/// `DELETE /api/ads/cache`
pub async fn clear_cache(State(state): State<AppState>) -> ApiResult<Json<ClearCacheResponse>> {
    let cleared = state.cache.clear().await.map_err(ClipError::from)?;
    metrics::record_cache_cleared(cleared);
    info!(cleared, "Ad clip cache cleared");
    Ok(Json(ClearCacheResponse { cleared }))
}
