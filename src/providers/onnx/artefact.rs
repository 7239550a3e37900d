use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::errors::OnnxEncoderError;

/// Model or tokenizer file pinned to a recorded SHA-256 digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OnnxArtefact {
    /// Location of the artefact on disk.
    pub path: PathBuf,
    /// Expected digest as hexadecimal; case and surrounding space are ignored.
    pub sha256: String,
}

impl OnnxArtefact {
    /// Hashes the file and compares it with the recorded digest.
    ///
    /// # Errors
    ///
    /// Returns `ChecksumMismatch` when the digests differ and `Io` when the
    /// file cannot be read.
    pub fn verify(&self) -> Result<(), OnnxEncoderError> {
        let expected = normalise_hex(&self.sha256);
        let actual = sha256_hex(&self.path)?;
        if actual == expected {
            Ok(())
        } else {
            Err(OnnxEncoderError::ChecksumMismatch {
                path: self.path.clone(),
                expected,
                actual,
            })
        }
    }
}

/// Streams the file at `path` through SHA-256 and returns the lowercase hex digest.
///
/// # Errors
///
/// Returns `Io` when the file cannot be opened or read.
pub fn sha256_hex(path: &Path) -> Result<String, OnnxEncoderError> {
    let io_error = |source: io::Error| OnnxEncoderError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::open(path).map_err(io_error)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).map_err(io_error)?;
    Ok(format!("{:x}", hasher.finalize()))
}

fn normalise_hex(value: &str) -> String {
    value.trim().to_ascii_lowercase()
}
