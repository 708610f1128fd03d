//! Inference-engine boundary.
//!
//! The pipeline never talks to a neural-network runtime directly. It loads
//! opaque model handles through [`ModelStore`] and runs them through
//! [`InferencePort`]; the production implementation lives in the
//! `veriface-onnx` crate, and tests substitute scripted mocks.

use ndarray::ArrayView4;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortError {
    #[error("model artifact not found: {0}")]
    ModelNotFound(String),
    #[error("model failed to load: {0}")]
    Load(String),
    #[error("model declares no {0} nodes")]
    MissingNodes(&'static str),
    #[error("malformed model output: {0}")]
    MalformedOutput(String),
    #[error("inference execution failed: {0}")]
    Execution(String),
}

impl PortError {
    /// Structural faults mean the model itself is unusable (load failure,
    /// missing nodes, bad output arity), as opposed to the engine raising
    /// during an otherwise well-formed run.
    pub fn is_structural(&self) -> bool {
        !matches!(self, Self::Execution(_))
    }
}

/// A loaded model handle: accepts a named input tensor, returns the named
/// output as a flat `f32` buffer.
pub trait InferencePort: Send {
    /// Declared input node names, in model order.
    fn input_names(&self) -> &[String];

    /// Declared output node names, in model order.
    fn output_names(&self) -> &[String];

    /// Run one inference pass.
    fn run(
        &mut self,
        input: ArrayView4<'_, f32>,
        input_name: &str,
        output_name: &str,
    ) -> Result<Vec<f32>, PortError>;
}

impl std::fmt::Debug for dyn InferencePort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferencePort")
            .field("inputs", &self.input_names())
            .field("outputs", &self.output_names())
            .finish()
    }
}

/// Resolves a model name to a loaded [`InferencePort`].
pub trait ModelStore {
    fn load(&self, name: &str) -> Result<Box<dyn InferencePort>, PortError>;
}

/// Run a port against its first declared input and output node.
pub(crate) fn run_first_io(
    port: &mut dyn InferencePort,
    input: ArrayView4<'_, f32>,
) -> Result<Vec<f32>, PortError> {
    let input_name = port
        .input_names()
        .first()
        .cloned()
        .ok_or(PortError::MissingNodes("input"))?;
    let output_name = port
        .output_names()
        .first()
        .cloned()
        .ok_or(PortError::MissingNodes("output"))?;
    port.run(input, &input_name, &output_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array4;

    struct NamelessPort;

    impl InferencePort for NamelessPort {
        fn input_names(&self) -> &[String] {
            &[]
        }
        fn output_names(&self) -> &[String] {
            &[]
        }
        fn run(
            &mut self,
            _input: ArrayView4<'_, f32>,
            _input_name: &str,
            _output_name: &str,
        ) -> Result<Vec<f32>, PortError> {
            unreachable!("must not run without node names")
        }
    }

    #[test]
    fn test_missing_node_names_is_structural() {
        let mut port = NamelessPort;
        let input = Array4::<f32>::zeros((1, 3, 2, 2));
        let err = run_first_io(&mut port, input.view()).unwrap_err();
        assert!(matches!(err, PortError::MissingNodes("input")));
        assert!(err.is_structural());
    }

    #[test]
    fn test_execution_fault_is_not_structural() {
        assert!(!PortError::Execution("boom".into()).is_structural());
    }
}
