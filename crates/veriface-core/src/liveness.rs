//! Liveness classification stage.
//!
//! The safety-critical decision: a single scalar logit from the liveness
//! model is squashed through a sigmoid and thresholded at 0.5. Unlike the
//! occlusion stage, every fault here fails closed — a liveness verdict is
//! never guessed.

use crate::domain::{LivenessVerdict, Prediction};
use crate::error::LivenessError;
use crate::port::{run_first_io, InferencePort};
use crate::{tensor, validate};
use image::DynamicImage;

/// Sigmoid confidence above which an image is judged live.
pub const LIVE_THRESHOLD: f32 = 0.5;

pub fn sigmoid(logit: f32) -> f32 {
    1.0 / (1.0 + (-logit).exp())
}

/// Apply the liveness decision policy to a raw logit.
///
/// The reported confidence is always relative to the winning class: the
/// sigmoid value as-is for `Live`, its complement for `Spoof`.
pub fn decide(logit: f32) -> LivenessVerdict {
    let confidence = sigmoid(logit);
    if confidence > LIVE_THRESHOLD {
        LivenessVerdict {
            prediction: Prediction::Live,
            confidence,
        }
    } else {
        LivenessVerdict {
            prediction: Prediction::Spoof,
            confidence: 1.0 - confidence,
        }
    }
}

pub struct LivenessClassifier {
    port: Box<dyn InferencePort>,
}

impl LivenessClassifier {
    pub fn new(port: Box<dyn InferencePort>) -> Self {
        Self { port }
    }

    /// Classify one image. Fails closed on every fault.
    pub fn classify(&mut self, image: &DynamicImage) -> Result<LivenessVerdict, LivenessError> {
        if !validate::validate(image) {
            return Err(LivenessError::InvalidInput);
        }

        let input = tensor::preprocess(
            image,
            tensor::INPUT_SIZE,
            tensor::INPUT_SIZE,
            tensor::IMAGENET_MEAN,
            tensor::IMAGENET_STD,
        )?;

        let output = run_first_io(self.port.as_mut(), input.view())?;
        let logit = output.first().copied().ok_or_else(|| {
            LivenessError::ModelUnavailable("liveness model returned empty output".to_string())
        })?;

        Ok(decide(logit))
    }
}
