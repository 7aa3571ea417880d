//! Input sanitization utilities.

/// Maximum free-text length fed into the generation prompt.
pub const MAX_CONTEXT_LENGTH: usize = 2000;

/// Sanitize a user-provided string before it reaches the prompt or logs.
///
/// Strips control characters (newlines and tabs survive) and caps length.
pub fn sanitize_string(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .take(MAX_CONTEXT_LENGTH)
        .collect()
}

/// Validate video ID format.
///
/// The ID is passed to the frame extraction subprocess as an argument, so
/// only alphanumerics, hyphens and underscores are accepted.
pub fn is_valid_video_id(id: &str) -> bool {
    if id.is_empty() || id.len() > 64 {
        return false;
    }
    id.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
