//! Application state.

use std::sync::Arc;

use adclip_cache::{CacheConfig, CacheStore};
use adclip_engine::{ClipEngine, EngineConfig};
use adclip_frames::{FrameConfig, FrameProvider};
use adclip_genai::{GenAiClient, GenAiConfig};
use adclip_media::{FfmpegPostProcessor, MediaConfig};

use crate::config::ApiConfig;

/// Shared application state.
///
/// The concrete provider handles stay visible here so the readiness probe
/// can run their checks; the engine only sees them behind trait objects.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub engine: Arc<ClipEngine>,
    pub frames: Arc<FrameProvider>,
    pub post: Arc<FfmpegPostProcessor>,
    pub cache: Arc<CacheStore>,
}

impl AppState {
    /// Create new application state.
    pub async fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let frames = Arc::new(FrameProvider::new(FrameConfig::from_env())?);
        let generator = Arc::new(GenAiClient::new(GenAiConfig::from_env()?)?);
        let post = Arc::new(FfmpegPostProcessor::new(MediaConfig::from_env()));
        let cache = CacheStore::shared(CacheConfig::from_env());
        cache.check().await?;

        let engine = Arc::new(ClipEngine::new(
            EngineConfig::from_env(),
            frames.clone(),
            generator,
            post.clone(),
            cache.clone(),
        ));

        Ok(Self {
            config,
            engine,
            frames,
            post,
            cache,
        })
    }
}
