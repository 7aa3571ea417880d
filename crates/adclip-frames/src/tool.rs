//! Subprocess client for the frame extraction tool.

use std::process::Stdio;
use std::time::Duration;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, warn};

use adclip_models::ExtractedFrame;

use crate::config::FrameConfig;
use crate::error::{FrameError, FrameResult};

/// Structured error the tool prints to stderr on failure.
#[derive(Debug, Deserialize)]
struct ToolErrorPayload {
    error: String,
    details: Option<String>,
}

/// Invokes the external extraction tool:
/// `<bin> <script> --video-id <id> --timestamp <secs>`.
///
/// Success is one JSON object on stdout (mimeType + base64 imageBytes);
/// failure is a nonzero exit with a JSON `{error, details?}` on stderr.
#[derive(Debug, Clone)]
pub struct ExtractionTool {
    config: FrameConfig,
}

impl ExtractionTool {
    pub fn new(config: FrameConfig) -> Self {
        Self { config }
    }

    /// Verify the tool can be invoked. Used by the readiness probe.
    pub fn check(&self) -> FrameResult<()> {
        which::which(&self.config.tool_bin)
            .map_err(|_| FrameError::ToolNotFound(self.config.tool_bin.clone()))?;
        if !self.config.tool_script.exists() {
            return Err(FrameError::ToolNotFound(
                self.config.tool_script.to_string_lossy().to_string(),
            ));
        }
        Ok(())
    }

    /// Extract a frame, killing the tool if it exceeds the timeout.
    pub async fn extract(
        &self,
        video_id: &str,
        timestamp_seconds: f64,
    ) -> FrameResult<ExtractedFrame> {
        let timestamp = timestamp_seconds.max(0.0);
        debug!(
            video_id = %video_id,
            timestamp = format!("{:.3}", timestamp),
            "Invoking frame extraction tool"
        );

        let mut command = Command::new(&self.config.tool_bin);
        command
            .arg(&self.config.tool_script)
            .arg("--video-id")
            .arg(video_id)
            .arg("--timestamp")
            .arg(format!("{:.3}", timestamp))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let timeout = Duration::from_secs(self.config.tool_timeout_secs);
        let output = match tokio::time::timeout(timeout, command.output()).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(
                    video_id = %video_id,
                    "Frame tool timed out after {} seconds",
                    self.config.tool_timeout_secs
                );
                return Err(FrameError::ToolTimeout(self.config.tool_timeout_secs));
            }
        };

        if !output.status.success() {
            return Err(failure_from_stderr(&output.stderr, output.status.code()));
        }

        let frame: ExtractedFrame = serde_json::from_slice(&output.stdout)
            .map_err(|e| FrameError::malformed(e.to_string()))?;
        if frame.is_empty() {
            return Err(FrameError::malformed("tool returned an empty image payload"));
        }

        Ok(frame)
    }
}

/// Map the tool's stderr into a structured failure.
fn failure_from_stderr(stderr: &[u8], exit_code: Option<i32>) -> FrameError {
    if let Ok(payload) = serde_json::from_slice::<ToolErrorPayload>(stderr) {
        return FrameError::tool_failed(payload.error, payload.details, exit_code);
    }

    let text = String::from_utf8_lossy(stderr);
    let trimmed = text.trim();
    let message = if trimmed.is_empty() {
        "frame tool failed without diagnostics".to_string()
    } else {
        trimmed.to_string()
    };
    FrameError::tool_failed(message, None, exit_code)
}
