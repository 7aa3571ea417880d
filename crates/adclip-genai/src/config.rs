//! Generation client configuration.

use crate::error::{GenAiError, GenAiResult};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Longest clip the model produces in one call.
pub const DEFAULT_MAX_SINGLE_CALL_SECS: f64 = 8.0;

#[derive(Debug, Clone)]
pub struct GenAiConfig {
    pub base_url: String,
    pub api_key: String,
    /// Fixed sleep between polls
    pub poll_interval_secs: u64,
    /// Overall deadline for one generation job
    pub timeout_secs: u64,
    pub max_single_call_secs: f64,
    /// Helper binary for bucket-style video reads
    pub bucket_tool_bin: String,
    /// Timeout for the temp-file download fallback
    pub download_timeout_secs: u64,
}

impl Default for GenAiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            poll_interval_secs: 10,
            timeout_secs: 360,
            max_single_call_secs: DEFAULT_MAX_SINGLE_CALL_SECS,
            bucket_tool_bin: "gsutil".to_string(),
            download_timeout_secs: 120,
        }
    }
}

impl GenAiConfig {
    /// Load from environment. The API key is the only required variable.
    pub fn from_env() -> GenAiResult<Self> {
        let api_key = std::env::var("GENAI_API_KEY")
            .map_err(|_| GenAiError::config("GENAI_API_KEY not set"))?;
        let defaults = Self::default();

        Ok(Self {
            base_url: std::env::var("GENAI_BASE_URL")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            api_key,
            poll_interval_secs: env_parse("GENAI_POLL_INTERVAL_SECS", defaults.poll_interval_secs),
            timeout_secs: env_parse("GENAI_TIMEOUT_SECS", defaults.timeout_secs),
            max_single_call_secs: env_parse(
                "GENAI_MAX_SINGLE_CALL_SECS",
                defaults.max_single_call_secs,
            ),
            bucket_tool_bin: std::env::var("BUCKET_TOOL_BIN").unwrap_or(defaults.bucket_tool_bin),
            download_timeout_secs: env_parse(
                "GENAI_DOWNLOAD_TIMEOUT_SECS",
                defaults.download_timeout_secs,
            ),
        })
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
