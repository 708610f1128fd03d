//! Pipeline error surface.
//!
//! Every internal fault is re-wrapped into [`LivenessError`] at classifier
//! boundaries, so callers match on one enum regardless of which stage failed.

use crate::port::PortError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LivenessError {
    /// The submitted image is null-sized, undecodable, or outside the
    /// accepted dimension bounds. Terminal; never retried.
    #[error("invalid image")]
    InvalidInput,

    /// A model failed to load, or inference failed structurally (missing
    /// node names, wrong-arity output). Hard for the liveness stage; the
    /// occlusion stage absorbs this into its default verdict instead.
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    /// The inference engine raised during execution. Wrapped and surfaced;
    /// callers wanting a retry must re-invoke the whole pipeline.
    #[error("inference failed: {0}")]
    Inference(String),

    /// The pipeline was closed while a request was in flight, or the worker
    /// is gone.
    #[error("pipeline instance is closed")]
    InstanceGone,
}

impl From<PortError> for LivenessError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::Execution(msg) => Self::Inference(msg),
            structural => Self::ModelUnavailable(structural.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_faults_map_to_inference() {
        let err = LivenessError::from(PortError::Execution("engine abort".into()));
        assert!(matches!(err, LivenessError::Inference(_)));
    }

    #[test]
    fn test_structural_faults_map_to_model_unavailable() {
        for err in [
            PortError::ModelNotFound("face_liveness.onnx".into()),
            PortError::Load("corrupt graph".into()),
            PortError::MissingNodes("input"),
            PortError::MalformedOutput("empty tensor".into()),
        ] {
            assert!(matches!(
                LivenessError::from(err),
                LivenessError::ModelUnavailable(_)
            ));
        }
    }
}
