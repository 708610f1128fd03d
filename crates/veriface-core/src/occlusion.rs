//! Occlusion classification stage.
//!
//! Decides whether the face is unobstructed (`normal`), covered by a hand, or
//! wearing a mask. The stage is advisory: a missing or structurally broken
//! occlusion model does not fail the pipeline — the classifier falls back to
//! a fixed `normal` verdict and lets the liveness stage decide.

use crate::domain::{OcclusionLabel, OcclusionVerdict};
use crate::error::LivenessError;
use crate::port::{run_first_io, InferencePort};
use crate::{tensor, validate};
use image::DynamicImage;

/// Below this probability an argmax of `normal` is distrusted. The `normal`
/// class scores systematically high near the decision boundary, so a weak
/// `normal` win is reassigned to the stronger occlusion class.
pub const NORMAL_CONFIDENCE_FLOOR: f32 = 0.7;

/// Verdict reported when the occlusion model is unavailable.
const DEGRADED_CONFIDENCE: f32 = 0.7;

const CLASS_COUNT: usize = 3;

/// Apply the occlusion decision policy to a 3-class probability vector
/// indexed `[hand_over_face, normal, with_mask]`.
pub fn decide(probs: [f32; 3]) -> OcclusionVerdict {
    let (max_idx, max_prob) = probs
        .iter()
        .copied()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |best, (idx, prob)| {
            if prob > best.1 {
                (idx, prob)
            } else {
                best
            }
        });

    let label = OcclusionLabel::CLASSES[max_idx];
    if label == OcclusionLabel::Normal && max_prob < NORMAL_CONFIDENCE_FLOOR {
        // Reassign by comparing the two occlusion classes directly, not
        // against the original max.
        let hand = probs[0];
        let mask = probs[2];
        return if mask > hand {
            OcclusionVerdict {
                label: OcclusionLabel::WithMask,
                confidence: mask,
            }
        } else {
            OcclusionVerdict {
                label: OcclusionLabel::HandOverFace,
                confidence: hand,
            }
        };
    }

    OcclusionVerdict {
        label,
        confidence: max_prob,
    }
}

pub struct OcclusionClassifier {
    /// `None` when the model failed to load; the classifier then runs in
    /// degraded mode and reports [`OcclusionClassifier::degraded_verdict`].
    port: Option<Box<dyn InferencePort>>,
}

impl OcclusionClassifier {
    pub fn new(port: Option<Box<dyn InferencePort>>) -> Self {
        Self { port }
    }

    /// Classify one image.
    ///
    /// Invalid images fail closed even in degraded mode. Structural model
    /// faults are absorbed into the degraded verdict; engine execution
    /// faults propagate.
    pub fn classify(&mut self, image: &DynamicImage) -> Result<OcclusionVerdict, LivenessError> {
        if !validate::validate(image) {
            return Err(LivenessError::InvalidInput);
        }

        let Some(port) = self.port.as_mut() else {
            return Ok(Self::degraded_verdict());
        };

        let input = tensor::preprocess(
            image,
            tensor::INPUT_SIZE,
            tensor::INPUT_SIZE,
            tensor::IMAGENET_MEAN,
            tensor::IMAGENET_STD,
        )?;

        let probs = match run_first_io(port.as_mut(), input.view()) {
            Ok(values) => values,
            Err(err) if err.is_structural() => {
                tracing::warn!(error = %err, "occlusion model unusable — reporting default verdict");
                return Ok(Self::degraded_verdict());
            }
            Err(err) => return Err(err.into()),
        };

        if probs.len() != CLASS_COUNT {
            tracing::warn!(
                len = probs.len(),
                "occlusion model returned wrong output arity — reporting default verdict"
            );
            return Ok(Self::degraded_verdict());
        }

        Ok(decide([probs[0], probs[1], probs[2]]))
    }

    /// Fixed fail-open verdict for a missing occlusion model.
    pub fn degraded_verdict() -> OcclusionVerdict {
        OcclusionVerdict {
            label: OcclusionLabel::Normal,
            confidence: DEGRADED_CONFIDENCE,
        }
    }
}
