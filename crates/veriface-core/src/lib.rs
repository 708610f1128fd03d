//! Face liveness verification pipeline.
//!
//! Given a single decoded photograph believed to contain a face, the pipeline
//! decides whether the face is a live human presentation or a spoof (printed
//! photo, screen replay, mask), first filtering out images where the face is
//! occluded or technically unusable.
//!
//! Two model stages run in sequence: an occlusion classifier (advisory,
//! fail-open) and a liveness classifier (safety-critical, fail-closed). The
//! inference engine sits behind the [`port::InferencePort`] boundary; the
//! production ONNX Runtime adapter lives in the `veriface-onnx` crate.
//!
//! ```no_run
//! # async fn demo(store: &dyn veriface_core::ModelStore, photo: image::DynamicImage)
//! # -> Result<(), veriface_core::LivenessError> {
//! use veriface_core::{DetectionConfig, LivenessPipeline};
//!
//! let pipeline = LivenessPipeline::new(store, DetectionConfig::new())?;
//! let outcome = pipeline.detect(photo).await?;
//! println!("{} ({:.2})", outcome.prediction, outcome.confidence);
//! pipeline.close().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod liveness;
pub mod occlusion;
pub mod pipeline;
pub mod port;
pub mod tensor;
pub mod validate;

pub use config::DetectionConfig;
pub use domain::{LivenessOutcome, LivenessVerdict, OcclusionLabel, OcclusionVerdict, Prediction};
pub use error::LivenessError;
pub use pipeline::{LivenessPipeline, LIVENESS_MODEL, OCCLUSION_MODEL};
pub use port::{InferencePort, ModelStore, PortError};

/// Static SDK version identifier.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_version_matches_manifest() {
        assert_eq!(super::version(), env!("CARGO_PKG_VERSION"));
        assert!(!super::version().is_empty());
    }
}
