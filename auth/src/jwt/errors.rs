use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Why a presented token was rejected.
///
/// Safe to return to callers: none of the reasons reveal anything about
/// credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationReason {
    BadSignature,
    Expired,
    NotYetValid,
    Malformed,
    AlgorithmMismatch,
}

impl VerificationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationReason::BadSignature => "bad_signature",
            VerificationReason::Expired => "expired",
            VerificationReason::NotYetValid => "not_yet_valid",
            VerificationReason::Malformed => "malformed",
            VerificationReason::AlgorithmMismatch => "algorithm_mismatch",
        }
    }
}

impl fmt::Display for VerificationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for JWT operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to sign token: {0}")]
    SigningFailed(String),

    #[error("Token verification failed: {0}")]
    VerificationFailed(VerificationReason),
}

impl JwtError {
    /// Verification reason, if this is a verification failure.
    pub fn reason(&self) -> Option<VerificationReason> {
        match self {
            JwtError::VerificationFailed(reason) => Some(*reason),
            JwtError::SigningFailed(_) => None,
        }
    }
}
