//! Ad style, aspect ratio, and resolution definitions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Visual treatment applied to a generated ad clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum AdStyle {
    /// Filmic lighting and shallow depth of field
    #[default]
    Cinematic,
    /// Natural handheld look, no grading
    Realistic,
    /// Bright colors and energetic motion
    Playful,
    /// Muted palette, slow deliberate camera
    Luxury,
}

impl AdStyle {
    pub const ALL: &'static [AdStyle] = &[
        AdStyle::Cinematic,
        AdStyle::Realistic,
        AdStyle::Playful,
        AdStyle::Luxury,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AdStyle::Cinematic => "cinematic",
            AdStyle::Realistic => "realistic",
            AdStyle::Playful => "playful",
            AdStyle::Luxury => "luxury",
        }
    }

    /// Phrase appended to the generation prompt for this style.
    pub fn prompt_fragment(&self) -> &'static str {
        match self {
            AdStyle::Cinematic => "cinematic lighting, shallow depth of field, film grain",
            AdStyle::Realistic => "natural lighting, documentary handheld camera",
            AdStyle::Playful => "bright saturated colors, fast energetic cuts",
            AdStyle::Luxury => "muted premium palette, slow gliding camera",
        }
    }
}

impl fmt::Display for AdStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AdStyle {
    type Err = StyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cinematic" => Ok(AdStyle::Cinematic),
            "realistic" => Ok(AdStyle::Realistic),
            "playful" => Ok(AdStyle::Playful),
            "luxury" => Ok(AdStyle::Luxury),
            _ => Err(StyleParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown ad style: {0}")]
pub struct StyleParseError(String);

/// Output aspect ratio. Displays as `width:height`, which is the form
/// the generation API takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    /// Standard landscape (16:9), matching most host videos.
    pub const LANDSCAPE: AspectRatio = AspectRatio {
        width: 16,
        height: 9,
    };

    /// Portrait (9:16) for vertical placements.
    pub const PORTRAIT: AspectRatio = AspectRatio {
        width: 9,
        height: 16,
    };

    /// Square (1:1)
    pub const SQUARE: AspectRatio = AspectRatio {
        width: 1,
        height: 1,
    };

    /// Const constructor for ratios outside the presets.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height as a decimal.
    pub fn as_f64(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

impl FromStr for AspectRatio {
    type Err = AspectRatioParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(':')
            .ok_or_else(|| AspectRatioParseError::InvalidFormat(s.to_string()))?;

        let width: u32 = w
            .trim()
            .parse()
            .map_err(|_| AspectRatioParseError::InvalidNumber(w.to_string()))?;
        let height: u32 = h
            .trim()
            .parse()
            .map_err(|_| AspectRatioParseError::InvalidNumber(h.to_string()))?;

        if width == 0 || height == 0 {
            return Err(AspectRatioParseError::ZeroValue);
        }

        Ok(AspectRatio { width, height })
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::LANDSCAPE
    }
}

#[derive(Debug, Error)]
pub enum AspectRatioParseError {
    #[error("aspect ratio must be 'W:H', got: {0}")]
    InvalidFormat(String),
    #[error("aspect ratio has a non-numeric part: {0}")]
    InvalidNumber(String),
    #[error("aspect ratio parts must be nonzero")]
    ZeroValue,
}

/// Output resolution requested from the generative model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
pub enum Resolution {
    #[default]
    #[serde(rename = "720p")]
    P720,
    #[serde(rename = "1080p")]
    P1080,
}

impl Resolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::P720 => "720p",
            Resolution::P1080 => "1080p",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Resolution {
    type Err = ResolutionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "720p" | "720" => Ok(Resolution::P720),
            "1080p" | "1080" => Ok(Resolution::P1080),
            _ => Err(ResolutionParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown resolution: {0}")]
pub struct ResolutionParseError(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_parse() {
        assert_eq!("cinematic".parse::<AdStyle>().unwrap(), AdStyle::Cinematic);
        assert_eq!("LUXURY".parse::<AdStyle>().unwrap(), AdStyle::Luxury);
        assert!("unknown".parse::<AdStyle>().is_err());
    }

    #[test]
    fn test_style_display_round_trip() {
        for style in AdStyle::ALL {
            assert_eq!(style.to_string().parse::<AdStyle>().unwrap(), *style);
        }
    }

    #[test]
    fn test_aspect_ratio_parse() {
        assert_eq!(
            "16:9".parse::<AspectRatio>().unwrap(),
            AspectRatio::LANDSCAPE
        );
        assert_eq!("1:1".parse::<AspectRatio>().unwrap(), AspectRatio::SQUARE);
        assert!("invalid".parse::<AspectRatio>().is_err());
        assert!("0:16".parse::<AspectRatio>().is_err());
    }

    #[test]
    fn test_aspect_ratio_display() {
        assert_eq!(AspectRatio::PORTRAIT.to_string(), "9:16");
    }

    #[test]
    fn test_resolution_parse() {
        assert_eq!("720p".parse::<Resolution>().unwrap(), Resolution::P720);
        assert_eq!("1080".parse::<Resolution>().unwrap(), Resolution::P1080);
        assert!("480p".parse::<Resolution>().is_err());
    }

    #[test]
    fn test_resolution_serde_rename() {
        let json = serde_json::to_string(&Resolution::P1080).unwrap();
        assert_eq!(json, "\"1080p\"");
        let parsed: Resolution = serde_json::from_str("\"720p\"").unwrap();
        assert_eq!(parsed, Resolution::P720);
    }
}
