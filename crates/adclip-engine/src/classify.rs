//! The retry policy, as a pure function over the error taxonomy.
//!
//! Keeping classification free of I/O means the whole fallback policy is
//! testable without touching a model, a tool, or the filesystem.

use crate::error::ClipError;

/// What the orchestrator does next after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Stop the entire orchestration and surface the error.
    Abort,
    /// Try the next safety profile with the same frames and model;
    /// when profiles run out, abandon this timestamp candidate.
    RetryProfile,
    /// Skip the rest of this timestamp candidate immediately.
    AbandonCandidate,
    /// Try the next model, restarting from the first safety profile;
    /// when models run out, move to the next timestamp candidate.
    NextModel,
}

pub fn classify(error: &ClipError) -> Decision {
    match error {
        // Account and billing problems end everything at once.
        ClipError::PermissionDenied(_) | ClipError::QuotaExceeded(_) => Decision::Abort,

        // Content-policy rejections are worth a more permissive profile.
        ClipError::BlockedInputImage(_) | ClipError::MissingGeneratedSample(_) => {
            Decision::RetryProfile
        }

        // No frames means no attempt is possible at this timestamp.
        ClipError::FrameUnavailable(_) => Decision::AbandonCandidate,

        ClipError::GenerationTimeout(_)
        | ClipError::GenerationFailed(_)
        | ClipError::PostProcessingFailed(_)
        | ClipError::InvalidRequest(_)
        | ClipError::Cache(_) => Decision::NextModel,
    }
}
