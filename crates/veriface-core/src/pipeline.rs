//! Pipeline orchestration.
//!
//! A [`LivenessPipeline`] owns both classifiers on a dedicated worker thread
//! and sequences validation → occlusion → liveness for each request. Callers
//! submit detection requests through an async handle; requests against one
//! pipeline run to completion in submission order, which also serializes
//! access to the underlying model handles.
//!
//! An occlusion verdict other than `normal` short-circuits to a `Spoof`
//! outcome carrying a failure reason; the liveness model is never invoked
//! for that image.

use crate::config::DetectionConfig;
use crate::domain::{LivenessOutcome, OcclusionLabel, Prediction};
use crate::error::LivenessError;
use crate::liveness::LivenessClassifier;
use crate::occlusion::OcclusionClassifier;
use crate::port::ModelStore;
use crate::validate;
use image::DynamicImage;
use tokio::sync::{mpsc, oneshot};

/// Store name of the occlusion classification model.
pub const OCCLUSION_MODEL: &str = "face_occlusion";

/// Store name of the liveness classification model.
pub const LIVENESS_MODEL: &str = "face_liveness";

enum PipelineRequest {
    Detect {
        image: DynamicImage,
        reply: oneshot::Sender<Result<LivenessOutcome, LivenessError>>,
    },
    Close {
        reply: oneshot::Sender<()>,
    },
}

/// Clone-safe async handle to the pipeline worker.
#[derive(Clone)]
#[derive(Debug)]
pub struct LivenessPipeline {
    tx: mpsc::Sender<PipelineRequest>,
}

impl LivenessPipeline {
    /// Load both models and spawn the worker thread.
    ///
    /// The liveness model is required: a load failure here is a hard error.
    /// The occlusion model is advisory — if it cannot be loaded the stage
    /// runs in degraded mode and the pipeline stays available.
    pub fn new(store: &dyn ModelStore, config: DetectionConfig) -> Result<Self, LivenessError> {
        let liveness = LivenessClassifier::new(
            store.load(LIVENESS_MODEL).map_err(LivenessError::from)?,
        );
        tracing::info!(model = LIVENESS_MODEL, "liveness model loaded");

        let occlusion = match store.load(OCCLUSION_MODEL) {
            Ok(port) => {
                tracing::info!(model = OCCLUSION_MODEL, "occlusion model loaded");
                OcclusionClassifier::new(Some(port))
            }
            Err(err) => {
                tracing::warn!(
                    model = OCCLUSION_MODEL,
                    error = %err,
                    "occlusion model unavailable — stage will report its default verdict"
                );
                OcclusionClassifier::new(None)
            }
        };

        let (tx, mut rx) = mpsc::channel::<PipelineRequest>(4);

        std::thread::Builder::new()
            .name("veriface-pipeline".into())
            .spawn(move || {
                let mut stages = Some(Stages {
                    occlusion,
                    liveness,
                    config,
                });
                while let Some(req) = rx.blocking_recv() {
                    match req {
                        PipelineRequest::Detect { image, reply } => {
                            let result = match stages.as_mut() {
                                Some(stages) => stages.run(&image),
                                None => Err(LivenessError::InstanceGone),
                            };
                            let _ = reply.send(result);
                        }
                        PipelineRequest::Close { reply } => {
                            if stages.take().is_some() {
                                tracing::info!("pipeline closed — model handles released");
                            }
                            let _ = reply.send(());
                        }
                    }
                }
            })
            .map_err(|err| {
                LivenessError::Inference(format!("failed to spawn pipeline thread: {err}"))
            })?;

        Ok(Self { tx })
    }

    /// Run one detection request to completion on the worker.
    ///
    /// Completes exactly once with either an outcome or an error; there is no
    /// cancellation or timeout.
    pub async fn detect(&self, image: DynamicImage) -> Result<LivenessOutcome, LivenessError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(PipelineRequest::Detect {
                image,
                reply: reply_tx,
            })
            .await
            .map_err(|_| LivenessError::InstanceGone)?;
        reply_rx.await.map_err(|_| LivenessError::InstanceGone)?
    }

    /// Release both classifiers' model handles. Idempotent; an in-flight
    /// request finishes first, and later requests fail with `InstanceGone`.
    pub async fn close(&self) {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self
            .tx
            .send(PipelineRequest::Close { reply: reply_tx })
            .await
            .is_ok()
        {
            let _ = reply_rx.await;
        }
    }
}

/// Classifier stages owned by the worker thread. Dropped on close.
struct Stages {
    occlusion: OcclusionClassifier,
    liveness: LivenessClassifier,
    config: DetectionConfig,
}

impl Stages {
    fn run(&mut self, image: &DynamicImage) -> Result<LivenessOutcome, LivenessError> {
        if !validate::validate(image) {
            return Err(LivenessError::InvalidInput);
        }

        if !self.config.skip_occlusion_check {
            let verdict = self.occlusion.classify(image)?;
            if self.config.debug_logging {
                tracing::debug!(
                    label = %verdict.label,
                    confidence = verdict.confidence,
                    "occlusion stage"
                );
            }
            if verdict.label != OcclusionLabel::Normal {
                return Ok(LivenessOutcome {
                    prediction: Prediction::Spoof,
                    confidence: verdict.confidence,
                    failure_reason: Some(format!("Face is occluded: {}", verdict.label)),
                });
            }
        }

        let verdict = self.liveness.classify(image)?;
        if self.config.debug_logging {
            tracing::debug!(
                prediction = %verdict.prediction,
                confidence = verdict.confidence,
                "liveness stage"
            );
        }

        Ok(LivenessOutcome {
            prediction: verdict.prediction,
            confidence: verdict.confidence,
            failure_reason: None,
        })
    }
}
