//! Rule-based advisory statements.
//!
//! Rules are evaluated in a fixed order over the classification outputs:
//!
//! 1. Significant asymmetry names the stiffer side and suggests a professional
//!    evaluation.
//! 2. Otherwise moderate asymmetry names the stiffer side and suggests
//!    stretching toward it.
//! 3. Either side stiff: general mobility restriction.
//! 4. Otherwise either side somewhat stiff: habitual stretching.
//! 5. Neither side flexible: desk posture and movement breaks.
//! 6. Nothing fired: maintain current mobility.
//!
//! Rules 3 to 5 may fire together.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::classify::{AsymmetryLevel, FlexibilityLevel};
use crate::types::Side;

/// One advisory statement.
///
/// `Display` renders the text stored in
/// [`DiagnosisResult::recommendations`](crate::types::DiagnosisResult).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Recommendation {
    /// Large left/right difference
    ProfessionalEvaluation {
        /// Side with the smaller flexion
        stiffer_side: Side,
    },
    /// Noticeable left/right difference
    TargetedStretching {
        /// Side with the smaller flexion
        stiffer_side: Side,
    },
    /// At least one side is stiff
    MobilityRestriction,
    /// At least one side is somewhat stiff
    HabitualStretching,
    /// Neither side reaches the flexible range
    DeskPosture,
    /// No concerns found
    MaintainMobility,
}

impl Recommendation {
    /// Returns `true` for the two rules driven by left/right asymmetry.
    #[must_use]
    pub fn is_asymmetry(&self) -> bool {
        matches!(
            self,
            Self::ProfessionalEvaluation { .. } | Self::TargetedStretching { .. }
        )
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProfessionalEvaluation { stiffer_side } => write!(
                f,
                "Your {stiffer_side} side is markedly stiffer than the other. \
                 A professional evaluation of the {stiffer_side} side of the neck is recommended."
            ),
            Self::TargetedStretching { stiffer_side } => write!(
                f,
                "Your {stiffer_side} side is stiffer than the other. \
                 Add gentle stretches bending the head toward the {stiffer_side}."
            ),
            Self::MobilityRestriction => write!(
                f,
                "Neck side-bending is restricted. Stretch regularly, and consult \
                 a professional if the stiffness persists or causes pain."
            ),
            Self::HabitualStretching => write!(
                f,
                "Neck side-bending is slightly limited. Make a habit of light \
                 neck stretches during the day."
            ),
            Self::DeskPosture => write!(
                f,
                "Check your desk posture and take a short movement break every hour."
            ),
            Self::MaintainMobility => write!(
                f,
                "Neck mobility looks good. Keep up your current routine to maintain it."
            ),
        }
    }
}

/// Side with the smaller flexion angle, or `None` when they are equal.
#[must_use]
pub fn stiffer_side(right_flexion: f64, left_flexion: f64) -> Option<Side> {
    if left_flexion < right_flexion {
        Some(Side::Left)
    } else if right_flexion < left_flexion {
        Some(Side::Right)
    } else {
        None
    }
}

/// Evaluates the advisory rules in priority order.
#[must_use]
pub fn generate_recommendations(
    right_level: FlexibilityLevel,
    left_level: FlexibilityLevel,
    asymmetry: AsymmetryLevel,
    right_flexion: f64,
    left_flexion: f64,
) -> Vec<Recommendation> {
    let mut out = Vec::new();
    let levels = [right_level, left_level];

    // Moderate or worse asymmetry implies the angles differ.
    let stiffer = stiffer_side(right_flexion, left_flexion);
    match (asymmetry, stiffer) {
        (AsymmetryLevel::Significant, Some(stiffer_side)) => {
            out.push(Recommendation::ProfessionalEvaluation { stiffer_side });
        }
        (AsymmetryLevel::Moderate, Some(stiffer_side)) => {
            out.push(Recommendation::TargetedStretching { stiffer_side });
        }
        _ => {}
    }

    if levels.contains(&FlexibilityLevel::Stiff) {
        out.push(Recommendation::MobilityRestriction);
    } else if levels.contains(&FlexibilityLevel::SomewhatStiff) {
        out.push(Recommendation::HabitualStretching);
    }

    if !levels.contains(&FlexibilityLevel::Flexible) {
        out.push(Recommendation::DeskPosture);
    }

    if out.is_empty() {
        out.push(Recommendation::MaintainMobility);
    }
    out
}
