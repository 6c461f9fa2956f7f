use serde::{Deserialize, Serialize};

use super::definition::DefinitionError;
use super::ranking::ratio_on_scale;

/// Three-tier classification shared by every instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Strong,
    Moderate,
    Weak,
}

impl Level {
    pub const fn label(self) -> &'static str {
        match self {
            Level::Strong => "strong",
            Level::Moderate => "moderate",
            Level::Weak => "weak",
        }
    }
}

/// Percentage cutpoints. Both boundaries are closed: a value equal to a cutpoint belongs to
/// the outer tier, never to `Moderate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PercentThresholds {
    pub strong_at_or_above: u8,
    pub weak_at_or_below: u8,
}

impl PercentThresholds {
    pub fn new(strong_at_or_above: u8, weak_at_or_below: u8) -> Result<Self, DefinitionError> {
        let thresholds = Self {
            strong_at_or_above,
            weak_at_or_below,
        };
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn level(&self, percent: u8) -> Level {
        if percent >= self.strong_at_or_above {
            Level::Strong
        } else if percent <= self.weak_at_or_below {
            Level::Weak
        } else {
            Level::Moderate
        }
    }

    pub fn validate(&self) -> Result<(), DefinitionError> {
        if self.weak_at_or_below < self.strong_at_or_above && self.strong_at_or_above <= 100 {
            Ok(())
        } else {
            Err(DefinitionError::InvalidPercentThresholds {
                strong_at_or_above: self.strong_at_or_above,
                weak_at_or_below: self.weak_at_or_below,
            })
        }
    }
}

/// Cutpoints on a fixed normalized range such as `0..=35`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleThresholds {
    pub scale_max: u32,
    pub low_max: u32,
    pub mid_max: u32,
}

impl ScaleThresholds {
    pub fn level(&self, value: u32) -> Level {
        if value <= self.low_max {
            Level::Weak
        } else if value <= self.mid_max {
            Level::Moderate
        } else {
            Level::Strong
        }
    }

    pub fn validate(&self) -> Result<(), DefinitionError> {
        if self.low_max < self.mid_max && self.mid_max < self.scale_max {
            Ok(())
        } else {
            Err(DefinitionError::InvalidScaleThresholds {
                scale_max: self.scale_max,
                low_max: self.low_max,
                mid_max: self.mid_max,
            })
        }
    }
}

/// Level configuration chosen by the test definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scheme", rename_all = "snake_case")]
pub enum LevelScheme {
    Percent(PercentThresholds),
    Scale(ScaleThresholds),
}

impl LevelScheme {
    /// Upper bound of the normalized range values are expressed in.
    pub fn scale_max(&self) -> u32 {
        match self {
            LevelScheme::Percent(_) => 100,
            LevelScheme::Scale(scale) => scale.scale_max,
        }
    }

    pub fn normalize(&self, points: u32, maximum: u32) -> u32 {
        ratio_on_scale(points, maximum, self.scale_max())
    }

    pub fn level(&self, normalized: u32) -> Level {
        match self {
            LevelScheme::Percent(thresholds) => {
                thresholds.level(u8::try_from(normalized.min(100)).unwrap_or(100))
            }
            LevelScheme::Scale(scale) => scale.level(normalized),
        }
    }

    pub fn validate(&self) -> Result<(), DefinitionError> {
        match self {
            LevelScheme::Percent(thresholds) => thresholds.validate(),
            LevelScheme::Scale(scale) => scale.validate(),
        }
    }
}
