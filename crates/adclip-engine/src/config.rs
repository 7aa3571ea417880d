//! Orchestration configuration.

use adclip_models::SafetyProfile;

use crate::plan::DEFAULT_TIMESTAMP_OFFSETS;

/// Models tried in order for each timestamp candidate.
pub const DEFAULT_MODEL_CANDIDATES: &[&str] = &[
    "veo-3.0-generate-preview",
    "veo-3.0-fast-generate-preview",
    "veo-2.0-generate-001",
];

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Offsets applied to the requested timestamp, in fallback order
    pub timestamp_offsets: Vec<f64>,
    /// Model ladder, best first
    pub model_candidates: Vec<String>,
    /// Safety profile ladder, strictest first
    pub safety_ladder: Vec<SafetyProfile>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timestamp_offsets: DEFAULT_TIMESTAMP_OFFSETS.to_vec(),
            model_candidates: DEFAULT_MODEL_CANDIDATES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            safety_ladder: SafetyProfile::default_ladder(),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let timestamp_offsets = std::env::var("TIMESTAMP_OFFSETS")
            .ok()
            .map(|s| parse_offsets(&s))
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.timestamp_offsets);

        let model_candidates = std::env::var("GENAI_MODEL_CANDIDATES")
            .ok()
            .map(|s| {
                s.split(',')
                    .map(|m| m.trim().to_string())
                    .filter(|m| !m.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.model_candidates);

        let safety_ladder = std::env::var("GENAI_PERSON_PROFILES")
            .ok()
            .map(|s| SafetyProfile::parse_ladder(&s))
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.safety_ladder);

        Self {
            timestamp_offsets,
            model_candidates,
            safety_ladder,
        }
    }
}

fn parse_offsets(s: &str) -> Vec<f64> {
    s.split(',')
        .filter_map(|part| part.trim().parse::<f64>().ok())
        .collect()
}
