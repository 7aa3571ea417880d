//! Frame provider configuration.

use std::path::PathBuf;

/// Thumbnail quality variants, best to worst.
pub const DEFAULT_THUMBNAIL_VARIANTS: &[&str] = &[
    "maxresdefault",
    "sddefault",
    "hqdefault",
    "mqdefault",
    "default",
];

/// Configuration for frame resolution.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Interpreter for the extraction tool
    pub tool_bin: String,
    /// Path to the extraction tool script
    pub tool_script: PathBuf,
    /// Timeout for one tool invocation
    pub tool_timeout_secs: u64,
    /// Base URL for static thumbnails, without trailing slash
    pub thumbnail_base_url: String,
    /// Timeout for one thumbnail fetch
    pub thumbnail_timeout_secs: u64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            tool_bin: "python3".to_string(),
            tool_script: PathBuf::from("scripts/extract_yt_frame.py"),
            tool_timeout_secs: 45,
            thumbnail_base_url: "https://i.ytimg.com/vi".to_string(),
            thumbnail_timeout_secs: 20,
        }
    }
}

impl FrameConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            tool_bin: std::env::var("FRAME_TOOL_BIN").unwrap_or(defaults.tool_bin),
            tool_script: std::env::var("FRAME_TOOL_SCRIPT")
                .map(PathBuf::from)
                .unwrap_or(defaults.tool_script),
            tool_timeout_secs: std::env::var("FRAME_TOOL_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.tool_timeout_secs),
            thumbnail_base_url: std::env::var("THUMBNAIL_BASE_URL")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or(defaults.thumbnail_base_url),
            thumbnail_timeout_secs: std::env::var("THUMBNAIL_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.thumbnail_timeout_secs),
        }
    }
}
