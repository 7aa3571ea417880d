//! Turning a finished operation's video reference into actual bytes.
//!
//! Resolution strategies, tried in order:
//!   1. inline base64 bytes carried by the operation itself
//!   2. direct HTTP download of the video URI
//!   3. bucket read through the helper tool for gs:// style URIs
//!   4. streamed download to a temp file, then read back
//!
//! The temp directory in step 4 is owned by this function and removed
//! on every exit path.

use std::process::Stdio;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Client;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::client::VideoPayload;
use crate::config::GenAiConfig;
use crate::error::{GenAiError, GenAiResult};

pub(crate) async fn resolve_video_bytes(
    client: &Client,
    config: &GenAiConfig,
    payload: &VideoPayload,
) -> GenAiResult<Vec<u8>> {
    let mut last_error: Option<GenAiError> = None;

    if let Some(encoded) = &payload.inline_base64 {
        match BASE64.decode(encoded) {
            Ok(bytes) if !bytes.is_empty() => {
                debug!(size = bytes.len(), "Resolved video from inline bytes");
                return Ok(bytes);
            }
            Ok(_) => {
                last_error = Some(GenAiError::resolve_failed("inline video payload was empty"));
            }
            Err(e) => {
                last_error = Some(GenAiError::resolve_failed(format!(
                    "inline video payload was not valid base64: {}",
                    e
                )));
            }
        }
    }

    let uri = match payload.uri.as_deref() {
        Some(uri) => uri,
        None => {
            return Err(last_error.unwrap_or_else(|| {
                GenAiError::resolve_failed("operation returned neither inline bytes nor a URI")
            }))
        }
    };

    if uri.starts_with("http://") || uri.starts_with("https://") {
        match download_direct(client, config, uri).await {
            Ok(bytes) => return Ok(bytes),
            Err(e) => {
                warn!(uri = %uri, error = %e, "Direct video download failed");
                last_error = Some(e);
            }
        }
    }

    if let Some(gs_uri) = to_gs_uri(uri) {
        match bucket_read(config, &gs_uri).await {
            Ok(bytes) => return Ok(bytes),
            Err(e) => {
                warn!(uri = %gs_uri, error = %e, "Bucket video read failed");
                last_error = Some(e);
            }
        }
    }

    if uri.starts_with("http://") || uri.starts_with("https://") {
        match download_via_temp_file(client, config, uri).await {
            Ok(bytes) => return Ok(bytes),
            Err(e) => {
                warn!(uri = %uri, error = %e, "Temp-file video download failed");
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| {
        GenAiError::resolve_failed(format!("no resolution strategy applies to {}", uri))
    }))
}

/// In-memory HTTP download.
async fn download_direct(client: &Client, config: &GenAiConfig, uri: &str) -> GenAiResult<Vec<u8>> {
    let response = client
        .get(with_key(uri, &config.api_key))
        .timeout(Duration::from_secs(config.download_timeout_secs))
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(GenAiError::resolve_failed(format!(
            "video download returned {}",
            response.status()
        )));
    }

    let bytes = response.bytes().await?;
    if bytes.is_empty() {
        return Err(GenAiError::resolve_failed("video download returned an empty body"));
    }

    debug!(uri = %uri, size = bytes.len(), "Resolved video via direct download");
    Ok(bytes.to_vec())
}

/// Read the object through the bucket helper tool.
async fn bucket_read(config: &GenAiConfig, gs_uri: &str) -> GenAiResult<Vec<u8>> {
    let mut command = tokio::process::Command::new(&config.bucket_tool_bin);
    command
        .arg("cat")
        .arg(gs_uri)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let timeout = Duration::from_secs(config.download_timeout_secs);
    let output = tokio::time::timeout(timeout, command.output())
        .await
        .map_err(|_| {
            GenAiError::resolve_failed(format!(
                "bucket read timed out after {} seconds",
                config.download_timeout_secs
            ))
        })??;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GenAiError::resolve_failed(format!(
            "bucket tool failed: {}",
            stderr.trim()
        )));
    }
    if output.stdout.is_empty() {
        return Err(GenAiError::resolve_failed("bucket read returned no data"));
    }

    debug!(uri = %gs_uri, size = output.stdout.len(), "Resolved video via bucket tool");
    Ok(output.stdout)
}

/// Last resort: stream the download to disk, then read it back.
async fn download_via_temp_file(
    client: &Client,
    config: &GenAiConfig,
    uri: &str,
) -> GenAiResult<Vec<u8>> {
    let temp_dir = tempfile::tempdir()?;
    let file_path = temp_dir.path().join("generated-video.mp4");

    let mut response = client
        .get(with_key(uri, &config.api_key))
        .timeout(Duration::from_secs(config.download_timeout_secs))
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(GenAiError::resolve_failed(format!(
            "video download returned {}",
            response.status()
        )));
    }

    let mut file = tokio::fs::File::create(&file_path).await?;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
    }
    file.flush().await?;
    drop(file);

    let bytes = tokio::fs::read(&file_path).await?;
    if bytes.is_empty() {
        return Err(GenAiError::resolve_failed("downloaded video file was empty"));
    }

    debug!(uri = %uri, size = bytes.len(), "Resolved video via temp file");
    Ok(bytes)
}

/// gs:// form of a URI, if it has one.
fn to_gs_uri(uri: &str) -> Option<String> {
    if uri.starts_with("gs://") {
        return Some(uri.to_string());
    }
    let rest = uri.strip_prefix("https://storage.googleapis.com/")?;
    let rest = rest.split('?').next().unwrap_or(rest);
    if rest.is_empty() {
        return None;
    }
    Some(format!("gs://{}", rest))
}

/// Append the API key query parameter unless one is already present.
fn with_key(uri: &str, key: &str) -> String {
    if key.is_empty() || uri.contains("key=") {
        return uri.to_string();
    }
    let separator = if uri.contains('?') { '&' } else { '?' };
    format!("{}{}key={}", uri, separator, key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config() -> GenAiConfig {
        GenAiConfig {
            api_key: "k123".to_string(),
            download_timeout_secs: 5,
            ..GenAiConfig::default()
        }
    }

    #[test]
    fn test_to_gs_uri() {
        assert_eq!(
            to_gs_uri("gs://bucket/videos/a.mp4").as_deref(),
            Some("gs://bucket/videos/a.mp4")
        );
        assert_eq!(
            to_gs_uri("https://storage.googleapis.com/bucket/videos/a.mp4?alt=media").as_deref(),
            Some("gs://bucket/videos/a.mp4")
        );
        assert_eq!(to_gs_uri("https://example.com/a.mp4"), None);
        assert_eq!(to_gs_uri("https://storage.googleapis.com/"), None);
    }

    #[test]
    fn test_with_key() {
        assert_eq!(with_key("https://x/y", "k"), "https://x/y?key=k");
        assert_eq!(with_key("https://x/y?alt=media", "k"), "https://x/y?alt=media&key=k");
        assert_eq!(with_key("https://x/y?key=other", "k"), "https://x/y?key=other");
        assert_eq!(with_key("https://x/y", ""), "https://x/y");
    }

    #[tokio::test]
    async fn test_inline_bytes_win() {
        let client = Client::new();
        let payload = VideoPayload {
            inline_base64: Some(BASE64.encode(b"clip")),
            uri: Some("https://should-not-be-hit.invalid/a.mp4".to_string()),
            mime_type: None,
        };
        let bytes = resolve_video_bytes(&client, &test_config(), &payload)
            .await
            .unwrap();
        assert_eq!(bytes, b"clip");
    }

    #[tokio::test]
    async fn test_direct_download_with_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/videos/a.mp4"))
            .and(query_param("key", "k123"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"mp4data".to_vec()))
            .mount(&server)
            .await;

        let client = Client::new();
        let payload = VideoPayload {
            uri: Some(format!("{}/videos/a.mp4", server.uri())),
            ..VideoPayload::default()
        };
        let bytes = resolve_video_bytes(&client, &test_config(), &payload)
            .await
            .unwrap();
        assert_eq!(bytes, b"mp4data");
    }

    #[tokio::test]
    async fn test_temp_file_fallback_after_direct_failure() {
        let server = MockServer::start().await;
        // First request fails, the retry through the temp-file path succeeds.
        Mock::given(method("GET"))
            .and(path("/videos/a.mp4"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/videos/a.mp4"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"recovered".to_vec()))
            .mount(&server)
            .await;

        let client = Client::new();
        let payload = VideoPayload {
            uri: Some(format!("{}/videos/a.mp4", server.uri())),
            ..VideoPayload::default()
        };
        let bytes = resolve_video_bytes(&client, &test_config(), &payload)
            .await
            .unwrap();
        assert_eq!(bytes, b"recovered");
    }

    #[tokio::test]
    async fn test_all_strategies_exhausted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = Client::new();
        let payload = VideoPayload {
            uri: Some(format!("{}/videos/gone.mp4", server.uri())),
            ..VideoPayload::default()
        };
        let result = resolve_video_bytes(&client, &test_config(), &payload).await;
        assert!(matches!(result, Err(GenAiError::ResolveFailed(_))));
    }

    #[tokio::test]
    async fn test_no_reference_at_all() {
        let client = Client::new();
        let result =
            resolve_video_bytes(&client, &test_config(), &VideoPayload::default()).await;
        assert!(matches!(result, Err(GenAiError::ResolveFailed(_))));
    }
}
