//! HTTP client for the long-running video generation API.
//!
//! The model exposes a submit-and-poll surface: submission returns an
//! operation name, and the operation is polled until it reports done
//! with either a video reference or an error payload.

use std::time::{Duration, Instant};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::GenAiConfig;
use crate::error::{GenAiError, GenAiResult};
use crate::generator::SegmentSpec;
use crate::resolve::resolve_video_bytes;

/// Handle for one submitted generation job.
#[derive(Debug, Clone)]
pub struct JobHandle {
    pub operation_name: String,
    pub model: String,
}

/// One poll observation.
#[derive(Debug, Clone)]
pub enum PollOutcome {
    InProgress,
    Complete(VideoPayload),
}

/// The video reference a finished operation carries. At least one of the
/// fields is populated; byte resolution decides which one to use.
#[derive(Debug, Clone, Default)]
pub struct VideoPayload {
    pub uri: Option<String>,
    pub inline_base64: Option<String>,
    pub mime_type: Option<String>,
}

/// A fully resolved generated segment.
#[derive(Debug, Clone)]
pub struct GeneratedClip {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    /// Remote URI the bytes came from, when resolution used one
    pub source_uri: Option<String>,
}

/// Generation API request.
#[derive(Debug, Serialize)]
struct PredictRequest {
    instances: Vec<Instance>,
    parameters: Parameters,
}

#[derive(Debug, Serialize)]
struct Instance {
    prompt: String,
    image: ImagePayload,
    #[serde(rename = "lastFrame", skip_serializing_if = "Option::is_none")]
    last_frame: Option<ImagePayload>,
}

#[derive(Debug, Serialize)]
struct ImagePayload {
    #[serde(rename = "bytesBase64Encoded")]
    bytes_base64_encoded: String,
    #[serde(rename = "mimeType")]
    mime_type: String,
}

#[derive(Debug, Serialize)]
struct Parameters {
    #[serde(rename = "aspectRatio")]
    aspect_ratio: String,
    #[serde(rename = "durationSeconds")]
    duration_seconds: u32,
    #[serde(rename = "personGeneration")]
    person_generation: String,
    resolution: String,
    #[serde(rename = "sampleCount")]
    sample_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
}

/// Generation API responses.
#[derive(Debug, Deserialize)]
struct SubmitResponse {
    name: String,
}

#[derive(Debug, Deserialize)]
struct OperationStatus {
    #[serde(default)]
    done: bool,
    error: Option<OperationError>,
    response: Option<OperationResponse>,
}

#[derive(Debug, Deserialize)]
struct OperationError {
    code: Option<i64>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OperationResponse {
    #[serde(rename = "generateVideoResponse")]
    generate_video_response: Option<GenerateVideoResponse>,
}

#[derive(Debug, Deserialize)]
struct GenerateVideoResponse {
    #[serde(rename = "generatedSamples", default)]
    generated_samples: Vec<GeneratedSample>,
    #[serde(rename = "raiMediaFilteredCount")]
    rai_media_filtered_count: Option<u32>,
    #[serde(rename = "raiMediaFilteredReasons", default)]
    rai_media_filtered_reasons: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GeneratedSample {
    video: Option<VideoReference>,
}

#[derive(Debug, Deserialize)]
struct VideoReference {
    uri: Option<String>,
    #[serde(rename = "bytesBase64Encoded")]
    bytes_base64_encoded: Option<String>,
    #[serde(rename = "mimeType")]
    mime_type: Option<String>,
}

/// Video generation API client.
pub struct GenAiClient {
    config: GenAiConfig,
    client: Client,
}

impl GenAiClient {
    pub fn new(config: GenAiConfig) -> GenAiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &GenAiConfig {
        &self.config
    }

    /// Submit a generation job and return its operation handle.
    pub async fn submit(&self, spec: &SegmentSpec) -> GenAiResult<JobHandle> {
        let url = format!(
            "{}/models/{}:predictLongRunning?key={}",
            self.config.base_url, spec.model, self.config.api_key
        );

        let request = PredictRequest {
            instances: vec![Instance {
                prompt: spec.prompt.clone(),
                image: ImagePayload {
                    bytes_base64_encoded: spec.first_frame.image_bytes.clone(),
                    mime_type: spec.first_frame.mime_type.clone(),
                },
                last_frame: spec.last_frame.as_ref().map(|frame| ImagePayload {
                    bytes_base64_encoded: frame.image_bytes.clone(),
                    mime_type: frame.mime_type.clone(),
                }),
            }],
            parameters: Parameters {
                aspect_ratio: spec.aspect_ratio.to_string(),
                duration_seconds: spec.duration_seconds,
                person_generation: spec.safety.person_generation.to_string(),
                resolution: spec.resolution.to_string(),
                sample_count: 1,
                seed: spec.seed,
            },
        };

        debug!(
            model = %spec.model,
            duration = spec.duration_seconds,
            person_generation = %spec.safety.person_generation,
            "Submitting generation job"
        );

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenAiError::from_api_status(status, body));
        }

        let submitted: SubmitResponse = response
            .json()
            .await
            .map_err(|e| GenAiError::job_failed(format!("Malformed submit response: {}", e)))?;

        info!(operation = %submitted.name, model = %spec.model, "Generation job submitted");
        Ok(JobHandle {
            operation_name: submitted.name,
            model: spec.model.clone(),
        })
    }

    /// Poll a job once.
    pub async fn poll(&self, handle: &JobHandle) -> GenAiResult<PollOutcome> {
        let url = format!(
            "{}/models/{}:fetchPredictOperation?key={}",
            self.config.base_url, handle.model, self.config.api_key
        );

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "operationName": handle.operation_name }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenAiError::from_api_status(status, body));
        }

        let status: OperationStatus = response
            .json()
            .await
            .map_err(|e| GenAiError::job_failed(format!("Malformed poll response: {}", e)))?;

        if !status.done {
            return Ok(PollOutcome::InProgress);
        }

        if let Some(error) = status.error {
            let message = error
                .message
                .unwrap_or_else(|| "generation failed without a message".to_string());
            return Err(GenAiError::from_operation_error(error.code, message));
        }

        let video = status
            .response
            .and_then(|r| r.generate_video_response)
            .ok_or_else(|| GenAiError::missing_sample("operation done with empty response"))?;

        match video.generated_samples.into_iter().find_map(|s| s.video) {
            Some(reference) => Ok(PollOutcome::Complete(VideoPayload {
                uri: reference.uri,
                inline_base64: reference.bytes_base64_encoded,
                mime_type: reference.mime_type,
            })),
            None => {
                let filtered = video.rai_media_filtered_count.unwrap_or(0);
                let reason = if video.rai_media_filtered_reasons.is_empty() {
                    format!("no samples returned ({} filtered)", filtered)
                } else {
                    video.rai_media_filtered_reasons.join("; ")
                };
                Err(GenAiError::missing_sample(reason))
            }
        }
    }

    /// Run one job end to end: submit, poll to the deadline, resolve bytes.
    pub async fn generate(&self, spec: &SegmentSpec) -> GenAiResult<GeneratedClip> {
        let handle = self.submit(spec).await?;
        let deadline = Instant::now() + Duration::from_secs(self.config.timeout_secs);
        let interval = Duration::from_secs(self.config.poll_interval_secs);

        loop {
            match self.poll(&handle).await? {
                PollOutcome::Complete(payload) => {
                    debug!(operation = %handle.operation_name, "Generation complete");
                    let mime_type = payload
                        .mime_type
                        .clone()
                        .unwrap_or_else(|| "video/mp4".to_string());
                    let bytes =
                        resolve_video_bytes(&self.client, &self.config, &payload).await?;
                    return Ok(GeneratedClip {
                        bytes,
                        mime_type,
                        source_uri: payload.uri,
                    });
                }
                PollOutcome::InProgress => {
                    if Instant::now() + interval >= deadline {
                        warn!(
                            operation = %handle.operation_name,
                            "Generation exceeded {} second deadline",
                            self.config.timeout_secs
                        );
                        return Err(GenAiError::Timeout(self.config.timeout_secs));
                    }
                    tokio::time::sleep(interval).await;
                }
            }
        }
    }
}
