//! Domain types shared across the pipeline stages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed label vocabulary of the occlusion stage.
///
/// Variant order matches the occlusion model's output vector:
/// index 0 = hand over face, 1 = normal, 2 = mask worn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OcclusionLabel {
    HandOverFace,
    Normal,
    WithMask,
}

impl OcclusionLabel {
    /// Labels in model output order.
    pub const CLASSES: [OcclusionLabel; 3] =
        [Self::HandOverFace, Self::Normal, Self::WithMask];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HandOverFace => "hand_over_face",
            Self::Normal => "normal",
            Self::WithMask => "with_mask",
        }
    }
}

impl fmt::Display for OcclusionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal liveness classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Prediction {
    Live,
    Spoof,
}

impl Prediction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Live => "Live",
            Self::Spoof => "Spoof",
        }
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of the occlusion stage for a single image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OcclusionVerdict {
    pub label: OcclusionLabel,
    /// Probability assigned to `label`, in [0, 1].
    pub confidence: f32,
}

/// Result of the liveness stage for a single image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LivenessVerdict {
    pub prediction: Prediction,
    /// Confidence in `prediction` (relative to the winning class), in [0, 1].
    pub confidence: f32,
}

/// Terminal outcome of a detection request.
///
/// `failure_reason` is populated exactly when the Spoof verdict came from the
/// occlusion stage; a Spoof decided by the liveness model carries no reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LivenessOutcome {
    pub prediction: Prediction,
    pub confidence: f32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub failure_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_strings_match_model_vocabulary() {
        assert_eq!(OcclusionLabel::HandOverFace.as_str(), "hand_over_face");
        assert_eq!(OcclusionLabel::Normal.as_str(), "normal");
        assert_eq!(OcclusionLabel::WithMask.as_str(), "with_mask");
        assert_eq!(Prediction::Live.as_str(), "Live");
        assert_eq!(Prediction::Spoof.as_str(), "Spoof");
    }

    #[test]
    fn test_class_order_matches_output_indices() {
        assert_eq!(OcclusionLabel::CLASSES[0], OcclusionLabel::HandOverFace);
        assert_eq!(OcclusionLabel::CLASSES[1], OcclusionLabel::Normal);
        assert_eq!(OcclusionLabel::CLASSES[2], OcclusionLabel::WithMask);
    }

    #[test]
    fn test_outcome_omits_absent_failure_reason() {
        let outcome = LivenessOutcome {
            prediction: Prediction::Live,
            confidence: 0.93,
            failure_reason: None,
        };
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(!json.contains("failure_reason"));
        assert!(json.contains("\"Live\""));
    }

    #[test]
    fn test_outcome_serializes_failure_reason_when_present() {
        let outcome = LivenessOutcome {
            prediction: Prediction::Spoof,
            confidence: 0.7,
            failure_reason: Some("Face is occluded: with_mask".to_string()),
        };
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("Face is occluded: with_mask"));

        let back: LivenessOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(back, outcome);
    }
}
