//! Model artifact integrity verification.
//!
//! The classification models are proprietary artifacts deployed alongside the
//! host application, so expected digests ship as `<model>.sha256` sidecar
//! files next to each artifact (first whitespace-separated token is the hex
//! digest, `sha256sum` output compatible). A corrupted or swapped model file
//! must be caught before it silently shifts classification thresholds.

use sha2::{Digest, Sha256};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelIntegrityError {
    #[error("model file not found: {path}")]
    MissingModel { path: PathBuf },

    #[error("checksum sidecar not found for {path} (expected {sidecar})")]
    MissingChecksum { path: PathBuf, sidecar: PathBuf },

    #[error("checksum sidecar is empty: {sidecar}")]
    EmptyChecksum { sidecar: PathBuf },

    #[error("failed to open model file: {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read model file: {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "model checksum mismatch for {path}\n  expected: {expected}\n  got:      {got}"
    )]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        got: String,
    },
}

/// Compute SHA-256 hex digest of a file.
pub fn sha256_file_hex(path: &Path) -> Result<String, ModelIntegrityError> {
    let mut file = fs::File::open(path).map_err(|source| ModelIntegrityError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];

    loop {
        let n = file
            .read(&mut buf)
            .map_err(|source| ModelIntegrityError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Sidecar path for a model artifact: `<path>.sha256`.
pub fn sidecar_path(model_path: &Path) -> PathBuf {
    let mut name = model_path.as_os_str().to_os_string();
    name.push(".sha256");
    PathBuf::from(name)
}

/// Verify one model artifact against its sidecar digest.
pub fn verify_model(model_path: &Path) -> Result<(), ModelIntegrityError> {
    if !model_path.exists() {
        return Err(ModelIntegrityError::MissingModel {
            path: model_path.to_path_buf(),
        });
    }

    let sidecar = sidecar_path(model_path);
    let contents = fs::read_to_string(&sidecar).map_err(|_| ModelIntegrityError::MissingChecksum {
        path: model_path.to_path_buf(),
        sidecar: sidecar.clone(),
    })?;
    let expected = contents
        .split_whitespace()
        .next()
        .ok_or(ModelIntegrityError::EmptyChecksum { sidecar })?
        .to_ascii_lowercase();

    let got = sha256_file_hex(model_path)?;
    if got != expected {
        return Err(ModelIntegrityError::ChecksumMismatch {
            path: model_path.to_path_buf(),
            expected,
            got,
        });
    }

    Ok(())
}

/// Verify every named model artifact under `model_dir`.
pub fn verify_models_dir(
    model_dir: &Path,
    model_files: &[&str],
) -> Result<(), ModelIntegrityError> {
    for name in model_files {
        verify_model(&model_dir.join(name))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "veriface-models-test-{tag}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn verify_model_rejects_missing_artifact() {
        let dir = temp_dir("missing");
        let err = verify_model(&dir.join("nope.onnx")).unwrap_err();
        assert!(matches!(err, ModelIntegrityError::MissingModel { .. }));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn verify_model_rejects_missing_sidecar() {
        let dir = temp_dir("no-sidecar");
        let path = dir.join("model.onnx");
        fs::write(&path, b"weights").unwrap();

        let err = verify_model(&path).unwrap_err();
        assert!(matches!(err, ModelIntegrityError::MissingChecksum { .. }));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn verify_model_rejects_mismatch() {
        let dir = temp_dir("mismatch");
        let path = dir.join("model.onnx");
        fs::write(&path, b"weights").unwrap();
        fs::write(sidecar_path(&path), "00\n").unwrap();

        let err = verify_model(&path).unwrap_err();
        assert!(matches!(err, ModelIntegrityError::ChecksumMismatch { .. }));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn verify_model_accepts_match() {
        let dir = temp_dir("match");
        let path = dir.join("model.onnx");
        fs::write(&path, b"weights").unwrap();

        let digest = sha256_file_hex(&path).unwrap();
        // sha256sum-style sidecar: "<digest>  <filename>"
        fs::write(sidecar_path(&path), format!("{digest}  model.onnx\n")).unwrap();

        verify_model(&path).unwrap();

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn verify_models_dir_reports_first_failure() {
        let dir = temp_dir("dir");
        let good = dir.join("a.onnx");
        fs::write(&good, b"a").unwrap();
        let digest = sha256_file_hex(&good).unwrap();
        fs::write(sidecar_path(&good), digest).unwrap();

        let err = verify_models_dir(&dir, &["a.onnx", "b.onnx"]).unwrap_err();
        assert!(matches!(err, ModelIntegrityError::MissingModel { .. }));

        let _ = fs::remove_dir_all(&dir);
    }
}
