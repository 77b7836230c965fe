use std::path::PathBuf;

use thiserror::Error;

/// Error type for signing key operations.
///
/// Every variant except `ExportFailed` is fatal at startup: a service
/// without a usable keypair must not serve traffic.
#[derive(Debug, Clone, Error)]
pub enum KeyError {
    #[error("Failed to load key from {path}: {reason}")]
    LoadFailed { path: PathBuf, reason: String },

    #[error("Failed to generate RSA keypair: {0}")]
    GenerationFailed(String),

    #[error("Failed to persist key to {path}: {reason}")]
    PersistFailed { path: PathBuf, reason: String },

    #[error("Invalid key material: {0}")]
    InvalidKey(String),

    #[error("Failed to export public key: {0}")]
    ExportFailed(String),
}
