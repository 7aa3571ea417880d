//! Safety profiles for the generative video model.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Person-generation policy accepted by the video model.
///
/// Ordered strictest to most permissive; the orchestrator walks this
/// ladder only on content-policy failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PersonGeneration {
    /// No people in generated output
    DontAllow,
    /// Adults only
    AllowAdult,
    /// No restriction
    AllowAll,
}

impl PersonGeneration {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonGeneration::DontAllow => "dont_allow",
            PersonGeneration::AllowAdult => "allow_adult",
            PersonGeneration::AllowAll => "allow_all",
        }
    }
}

impl fmt::Display for PersonGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PersonGeneration {
    type Err = PersonGenerationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dont_allow" => Ok(PersonGeneration::DontAllow),
            "allow_adult" => Ok(PersonGeneration::AllowAdult),
            "allow_all" => Ok(PersonGeneration::AllowAll),
            _ => Err(PersonGenerationParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown person generation policy: {0}")]
pub struct PersonGenerationParseError(String);

/// One rung of the safety ladder tried during generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct SafetyProfile {
    pub person_generation: PersonGeneration,
}

impl SafetyProfile {
    pub const fn new(person_generation: PersonGeneration) -> Self {
        Self { person_generation }
    }

    /// Default ladder: adults first, unrestricted as the escalation.
    pub fn default_ladder() -> Vec<SafetyProfile> {
        vec![
            SafetyProfile::new(PersonGeneration::AllowAdult),
            SafetyProfile::new(PersonGeneration::AllowAll),
        ]
    }

    /// Parse a comma-separated policy list, preserving order and skipping
    /// unknown entries.
    pub fn parse_ladder(s: &str) -> Vec<SafetyProfile> {
        s.split(',')
            .filter_map(|part| part.trim().parse::<PersonGeneration>().ok())
            .map(SafetyProfile::new)
            .collect()
    }
}

impl fmt::Display for SafetyProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.person_generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_generation_parse() {
        assert_eq!(
            "allow_adult".parse::<PersonGeneration>().unwrap(),
            PersonGeneration::AllowAdult
        );
        assert!("allow_nobody".parse::<PersonGeneration>().is_err());
    }

    #[test]
    fn test_default_ladder_order() {
        let ladder = SafetyProfile::default_ladder();
        assert_eq!(ladder.len(), 2);
        assert_eq!(ladder[0].person_generation, PersonGeneration::AllowAdult);
        assert_eq!(ladder[1].person_generation, PersonGeneration::AllowAll);
    }

    #[test]
    fn test_parse_ladder_skips_unknown() {
        let ladder = SafetyProfile::parse_ladder("dont_allow, bogus ,allow_all");
        assert_eq!(ladder.len(), 2);
        assert_eq!(ladder[0].person_generation, PersonGeneration::DontAllow);
        assert_eq!(ladder[1].person_generation, PersonGeneration::AllowAll);
    }
}
