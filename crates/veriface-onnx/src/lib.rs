//! ONNX Runtime implementation of the veriface inference port.
//!
//! [`OnnxModelStore`] resolves model names to `.onnx` artifacts under a model
//! directory and builds an `ort` session per model; [`OnnxModel`] wraps the
//! session as a [`veriface_core::InferencePort`]. Sessions are owned by the
//! pipeline worker thread, so no additional locking is needed here.

use ndarray::ArrayView4;
use ort::session::Session;
use ort::value::TensorRef;
use std::path::{Path, PathBuf};
use veriface_core::{InferencePort, ModelStore, PortError};

/// Intra-op thread count per session. Two inference sessions may exist per
/// pipeline, so keep each one narrow.
const INTRA_THREADS: usize = 2;

/// Loads ONNX models from a directory on disk.
pub struct OnnxModelStore {
    model_dir: PathBuf,
    verify_checksums: bool,
}

impl OnnxModelStore {
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
            verify_checksums: false,
        }
    }

    /// Additionally verify each artifact against its `.sha256` sidecar
    /// before building a session.
    pub fn with_checksum_verification(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
            verify_checksums: true,
        }
    }

    fn model_path(&self, name: &str) -> PathBuf {
        self.model_dir.join(format!("{name}.onnx"))
    }
}

impl ModelStore for OnnxModelStore {
    fn load(&self, name: &str) -> Result<Box<dyn InferencePort>, PortError> {
        let path = self.model_path(name);
        if !path.exists() {
            return Err(PortError::ModelNotFound(path.display().to_string()));
        }

        if self.verify_checksums {
            veriface_models::verify_model(&path)
                .map_err(|err| PortError::Load(err.to_string()))?;
        }

        Ok(Box::new(OnnxModel::load(&path)?))
    }
}

/// One loaded ONNX session with its declared node names.
pub struct OnnxModel {
    session: Session,
    input_names: Vec<String>,
    output_names: Vec<String>,
}

impl OnnxModel {
    /// Build a session from an `.onnx` file and cache its node names.
    pub fn load(path: &Path) -> Result<Self, PortError> {
        let session = Session::builder()
            .and_then(|builder| Ok(builder.with_intra_threads(INTRA_THREADS)?))
            .and_then(|mut builder| builder.commit_from_file(path))
            .map_err(|err| PortError::Load(err.to_string()))?;

        let input_names: Vec<String> = session
            .inputs()
            .iter()
            .map(|input| input.name().to_string())
            .collect();
        let output_names: Vec<String> = session
            .outputs()
            .iter()
            .map(|output| output.name().to_string())
            .collect();

        tracing::info!(
            path = %path.display(),
            inputs = ?input_names,
            outputs = ?output_names,
            "loaded ONNX model"
        );

        Ok(Self {
            session,
            input_names,
            output_names,
        })
    }
}

impl InferencePort for OnnxModel {
    fn input_names(&self) -> &[String] {
        &self.input_names
    }

    fn output_names(&self) -> &[String] {
        &self.output_names
    }

    fn run(
        &mut self,
        input: ArrayView4<'_, f32>,
        input_name: &str,
        output_name: &str,
    ) -> Result<Vec<f32>, PortError> {
        let tensor = TensorRef::from_array_view(input)
            .map_err(|err| PortError::Execution(err.to_string()))?;

        let outputs = self
            .session
            .run(ort::inputs![input_name => tensor])
            .map_err(|err| PortError::Execution(err.to_string()))?;

        let (_, data) = outputs[output_name]
            .try_extract_tensor::<f32>()
            .map_err(|err| PortError::MalformedOutput(err.to_string()))?;

        Ok(data.to_vec())
    }
}
