//! Flexibility and asymmetry classification.
//!
//! Both classifiers are total functions with fixed boundaries. A value that
//! lands exactly on a boundary belongs to the bucket named in the right-hand
//! column below, except that `50°` flexion is still `Normal`.
//!
//! | Flexion angle       | Level           |
//! |---------------------|-----------------|
//! | `< 30`              | `Stiff`         |
//! | `30 ≤ a < 40`       | `SomewhatStiff` |
//! | `40 ≤ a ≤ 50`       | `Normal`        |
//! | `> 50`              | `Flexible`      |
//!
//! | Left/right difference | Level         |
//! |-----------------------|---------------|
//! | `< 5`                 | `Normal`      |
//! | `5 ≤ d < 10`          | `Mild`        |
//! | `10 ≤ d < 15`         | `Moderate`    |
//! | `≥ 15`                | `Significant` |

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Lower bound of `SomewhatStiff`, in degrees.
pub const SOMEWHAT_STIFF_MIN_DEG: f64 = 30.0;
/// Lower bound of `Normal` flexion, in degrees.
pub const NORMAL_MIN_DEG: f64 = 40.0;
/// Upper bound (inclusive) of `Normal` flexion, in degrees.
pub const NORMAL_MAX_DEG: f64 = 50.0;

/// Lower bound of `Mild` asymmetry, in degrees.
pub const MILD_ASYMMETRY_DEG: f64 = 5.0;
/// Lower bound of `Moderate` asymmetry, in degrees.
pub const MODERATE_ASYMMETRY_DEG: f64 = 10.0;
/// Lower bound of `Significant` asymmetry, in degrees.
pub const SIGNIFICANT_ASYMMETRY_DEG: f64 = 15.0;

/// Lateral flexibility of one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum FlexibilityLevel {
    /// Under 30°
    Stiff,
    /// 30° to under 40°
    SomewhatStiff,
    /// 40° to 50°
    Normal,
    /// Over 50°
    Flexible,
}

impl FlexibilityLevel {
    /// Short label for reports.
    pub fn label(&self) -> &'static str {
        match self {
            FlexibilityLevel::Stiff => "Stiff",
            FlexibilityLevel::SomewhatStiff => "Somewhat stiff",
            FlexibilityLevel::Normal => "Normal",
            FlexibilityLevel::Flexible => "Flexible",
        }
    }

    /// Human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            FlexibilityLevel::Stiff => "Lateral flexion is clearly restricted",
            FlexibilityLevel::SomewhatStiff => "Lateral flexion is slightly below the normal range",
            FlexibilityLevel::Normal => "Lateral flexion is within the normal range",
            FlexibilityLevel::Flexible => "Lateral flexion is above the normal range",
        }
    }

    /// Returns `true` for the two restricted levels.
    pub fn is_restricted(&self) -> bool {
        matches!(self, FlexibilityLevel::Stiff | FlexibilityLevel::SomewhatStiff)
    }
}

impl std::fmt::Display for FlexibilityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlexibilityLevel::Stiff => write!(f, "STIFF"),
            FlexibilityLevel::SomewhatStiff => write!(f, "SOMEWHAT_STIFF"),
            FlexibilityLevel::Normal => write!(f, "NORMAL"),
            FlexibilityLevel::Flexible => write!(f, "FLEXIBLE"),
        }
    }
}

/// Difference between right and left flexibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum AsymmetryLevel {
    /// Under 5°
    Normal,
    /// 5° to under 10°
    Mild,
    /// 10° to under 15°
    Moderate,
    /// 15° or more
    Significant,
}

impl AsymmetryLevel {
    /// Short label for reports.
    pub fn label(&self) -> &'static str {
        match self {
            AsymmetryLevel::Normal => "Balanced",
            AsymmetryLevel::Mild => "Mild",
            AsymmetryLevel::Moderate => "Moderate",
            AsymmetryLevel::Significant => "Significant",
        }
    }

    /// Human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            AsymmetryLevel::Normal => "Both sides move about equally",
            AsymmetryLevel::Mild => "One side is slightly more restricted",
            AsymmetryLevel::Moderate => "One side is noticeably more restricted",
            AsymmetryLevel::Significant => "One side is markedly more restricted",
        }
    }
}

impl std::fmt::Display for AsymmetryLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AsymmetryLevel::Normal => write!(f, "NORMAL"),
            AsymmetryLevel::Mild => write!(f, "MILD"),
            AsymmetryLevel::Moderate => write!(f, "MODERATE"),
            AsymmetryLevel::Significant => write!(f, "SIGNIFICANT"),
        }
    }
}

/// Classifies one side's lateral-flexion angle.
pub fn classify_flexibility(angle: f64) -> FlexibilityLevel {
    if angle < SOMEWHAT_STIFF_MIN_DEG {
        FlexibilityLevel::Stiff
    } else if angle < NORMAL_MIN_DEG {
        FlexibilityLevel::SomewhatStiff
    } else if angle <= NORMAL_MAX_DEG {
        FlexibilityLevel::Normal
    } else {
        FlexibilityLevel::Flexible
    }
}

/// Classifies the left/right flexion difference.
pub fn classify_asymmetry(diff: f64) -> AsymmetryLevel {
    if diff < MILD_ASYMMETRY_DEG {
        AsymmetryLevel::Normal
    } else if diff < MODERATE_ASYMMETRY_DEG {
        AsymmetryLevel::Mild
    } else if diff < SIGNIFICANT_ASYMMETRY_DEG {
        AsymmetryLevel::Moderate
    } else {
        AsymmetryLevel::Significant
    }
}
