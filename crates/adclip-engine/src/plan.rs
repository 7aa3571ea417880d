//! Pure planning: timestamp candidates and the generation shape.

use std::collections::HashSet;

use crate::error::{ClipError, ClipResult};

/// Offsets tried around the requested timestamp, in order.
pub const DEFAULT_TIMESTAMP_OFFSETS: &[f64] =
    &[0.0, 3.0, -3.0, 6.0, -6.0, 10.0, -10.0, 15.0, -15.0];

/// Candidate timestamps for a request: requested plus each offset, clamped
/// to zero and deduplicated (clamping can collapse several negatives onto
/// 0). Order is preserved.
pub fn candidate_timestamps(requested_seconds: f64, offsets: &[f64]) -> Vec<f64> {
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for offset in offsets {
        let t = (requested_seconds + offset).max(0.0);
        let ms = (t * 1000.0).round() as u64;
        if seen.insert(ms) {
            candidates.push(t);
        }
    }

    candidates
}

/// Shape of the generation for a target duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationPlan {
    /// One model call; any remainder is padded on at assembly.
    Single { model_duration_secs: u32 },
    /// Two model calls sharing a middle boundary frame; assembly trims
    /// segment B so the total is exact.
    Split { segment_duration_secs: u32 },
}

impl GenerationPlan {
    pub fn is_split(&self) -> bool {
        matches!(self, GenerationPlan::Split { .. })
    }
}

/// Decide single versus split for a target duration.
///
/// The model takes whole seconds. A single call requests the floor of the
/// target (padding covers the fraction); a split requests equal halves
/// rounded up, so the two segments always cover the target with room for
/// the trim.
pub fn plan_generation(target_seconds: f64, max_single_call_secs: f64) -> ClipResult<GenerationPlan> {
    if target_seconds <= 0.0 {
        return Err(ClipError::invalid_request(format!(
            "duration must be positive, got {target_seconds}"
        )));
    }
    if target_seconds > 2.0 * max_single_call_secs {
        return Err(ClipError::invalid_request(format!(
            "duration {target_seconds}s exceeds the {:.0}s limit of a two-segment generation",
            2.0 * max_single_call_secs
        )));
    }

    let max_whole = max_single_call_secs.floor() as u32;

    if target_seconds <= max_single_call_secs {
        let model_duration_secs = (target_seconds.floor() as u32).clamp(1, max_whole);
        Ok(GenerationPlan::Single { model_duration_secs })
    } else {
        let segment_duration_secs = ((target_seconds / 2.0).ceil() as u32).clamp(1, max_whole);
        Ok(GenerationPlan::Split { segment_duration_secs })
    }
}

/// Source-video timestamps of the boundary frames for one candidate.
///
/// Single: first and last. Split: first, middle, last.
pub fn frame_timestamps(candidate_seconds: f64, target_seconds: f64, split: bool) -> Vec<f64> {
    if split {
        vec![
            candidate_seconds,
            candidate_seconds + target_seconds / 2.0,
            candidate_seconds + target_seconds,
        ]
    } else {
        vec![candidate_seconds, candidate_seconds + target_seconds]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates_default_order() {
        let candidates = candidate_timestamps(30.0, DEFAULT_TIMESTAMP_OFFSETS);
        assert_eq!(
            candidates,
            vec![30.0, 33.0, 27.0, 36.0, 24.0, 40.0, 20.0, 45.0, 15.0]
        );
    }

    #[test]
    fn test_candidates_clamped_and_deduped() {
        // Near the start of the video most negative offsets collapse to 0.
        let candidates = candidate_timestamps(1.0, DEFAULT_TIMESTAMP_OFFSETS);
        assert_eq!(candidates, vec![1.0, 4.0, 0.0, 7.0, 11.0, 16.0]);
    }

    #[test]
    fn test_single_plan_floors_duration() {
        assert_eq!(
            plan_generation(6.0, 8.0).unwrap(),
            GenerationPlan::Single { model_duration_secs: 6 }
        );
        assert_eq!(
            plan_generation(7.5, 8.0).unwrap(),
            GenerationPlan::Single { model_duration_secs: 7 }
        );
        assert_eq!(
            plan_generation(8.0, 8.0).unwrap(),
            GenerationPlan::Single { model_duration_secs: 8 }
        );
    }

    #[test]
    fn test_split_plan_rounds_halves_up() {
        assert_eq!(
            plan_generation(12.0, 8.0).unwrap(),
            GenerationPlan::Split { segment_duration_secs: 6 }
        );
        assert_eq!(
            plan_generation(15.0, 8.0).unwrap(),
            GenerationPlan::Split { segment_duration_secs: 8 }
        );
        assert_eq!(
            plan_generation(16.0, 8.0).unwrap(),
            GenerationPlan::Split { segment_duration_secs: 8 }
        );
    }

    #[test]
    fn test_over_limit_rejected() {
        let result = plan_generation(16.1, 8.0);
        assert!(matches!(result, Err(ClipError::InvalidRequest(_))));
    }

    #[test]
    fn test_frame_timestamps() {
        assert_eq!(frame_timestamps(30.0, 6.0, false), vec![30.0, 36.0]);
        assert_eq!(frame_timestamps(30.0, 12.0, true), vec![30.0, 36.0, 42.0]);
    }
}
