//! Extracted boundary frames.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A still frame resolved for a video + timestamp.
///
/// Field names mirror the extraction tool's stdout payload so the tool
/// output deserializes directly. Never persisted beyond the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedFrame {
    /// Image MIME type, e.g. `image/jpeg`
    pub mime_type: String,

    /// Base64-encoded image bytes
    pub image_bytes: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl ExtractedFrame {
    pub fn new(mime_type: impl Into<String>, image_bytes: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            image_bytes: image_bytes.into(),
            width: None,
            height: None,
        }
    }

    /// True when the payload carries no image data.
    pub fn is_empty(&self) -> bool {
        self.image_bytes.is_empty()
    }
}
