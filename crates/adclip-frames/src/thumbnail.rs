//! Thumbnail fallback for when live frame extraction fails.
//!
//! Walks the hosted thumbnail variants from highest to lowest quality
//! and returns the first one that actually exists. Variants that are
//! missing or empty are skipped, not treated as hard failures.

use std::time::Duration;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use tracing::debug;

use adclip_models::ExtractedFrame;

use crate::config::{FrameConfig, DEFAULT_THUMBNAIL_VARIANTS};
use crate::error::{FrameError, FrameResult};

#[derive(Debug, Clone)]
pub struct ThumbnailClient {
    http: reqwest::Client,
    base_url: String,
}

impl ThumbnailClient {
    pub fn new(config: &FrameConfig) -> FrameResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.thumbnail_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.thumbnail_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the best available thumbnail for a video.
    pub async fn fetch_best(&self, video_id: &str) -> FrameResult<ExtractedFrame> {
        for variant in DEFAULT_THUMBNAIL_VARIANTS {
            match self.fetch_variant(video_id, variant).await? {
                Some(frame) => {
                    debug!(video_id = %video_id, variant = %variant, "Using thumbnail fallback");
                    return Ok(frame);
                }
                None => continue,
            }
        }
        Err(FrameError::ThumbnailUnavailable(video_id.to_string()))
    }

    /// Ok(None) means "this variant does not exist, try the next one".
    async fn fetch_variant(
        &self,
        video_id: &str,
        variant: &str,
    ) -> FrameResult<Option<ExtractedFrame>> {
        let url = format!("{}/{}/{}.jpg", self.base_url, video_id, variant);
        let response = match self.http.get(&url).send().await {
            Ok(response) => response,
            // Network-level failures on one variant should not kill the ladder.
            Err(e) if e.is_timeout() || e.is_connect() => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if !response.status().is_success() {
            return Ok(None);
        }

        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
            .unwrap_or_else(|| "image/jpeg".to_string());

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(None);
        }

        Ok(Some(ExtractedFrame {
            mime_type,
            image_bytes: BASE64.encode(&bytes),
            width: None,
            height: None,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> FrameConfig {
        FrameConfig {
            thumbnail_base_url: server.uri(),
            thumbnail_timeout_secs: 5,
            ..FrameConfig::default()
        }
    }

    #[tokio::test]
    async fn test_first_variant_wins() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/vid123/maxresdefault.jpg"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "image/jpeg")
                    .set_body_bytes(vec![0xFF, 0xD8, 0xFF]),
            )
            .mount(&server)
            .await;

        let client = ThumbnailClient::new(&config_for(&server)).unwrap();
        let frame = client.fetch_best("vid123").await.unwrap();
        assert_eq!(frame.mime_type, "image/jpeg");
        assert_eq!(frame.image_bytes, BASE64.encode([0xFF, 0xD8, 0xFF]));
    }

    #[tokio::test]
    async fn test_ladder_falls_through_missing_variants() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/vid123/maxresdefault.jpg"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/vid123/sddefault.jpg"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/vid123/hqdefault.jpg"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "image/jpeg; charset=binary")
                    .set_body_bytes(vec![1, 2, 3, 4]),
            )
            .mount(&server)
            .await;

        let client = ThumbnailClient::new(&config_for(&server)).unwrap();
        let frame = client.fetch_best("vid123").await.unwrap();
        // Parameters after ';' are stripped from the content type.
        assert_eq!(frame.mime_type, "image/jpeg");
        assert_eq!(frame.image_bytes, BASE64.encode([1, 2, 3, 4]));
    }

    #[tokio::test]
    async fn test_empty_body_is_skipped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/vid123/maxresdefault.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(Vec::<u8>::new()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/vid123/sddefault.jpg"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "image/jpeg")
                    .set_body_bytes(vec![9, 9]),
            )
            .mount(&server)
            .await;

        let client = ThumbnailClient::new(&config_for(&server)).unwrap();
        let frame = client.fetch_best("vid123").await.unwrap();
        assert_eq!(frame.image_bytes, BASE64.encode([9, 9]));
    }

    #[tokio::test]
    async fn test_all_variants_missing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = ThumbnailClient::new(&config_for(&server)).unwrap();
        let result = client.fetch_best("gone").await;
        assert!(matches!(result, Err(FrameError::ThumbnailUnavailable(id)) if id == "gone"));
    }
}
