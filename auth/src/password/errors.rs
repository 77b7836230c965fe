use thiserror::Error;

/// Error type for credential hashing.
///
/// A password that simply does not match is not an error; `verify` reports
/// it as `Ok(false)`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    /// Input over the bcrypt limit, or bcrypt itself failed.
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// The stored value could not be read as a bcrypt hash.
    #[error("Stored password hash is unusable: {0}")]
    VerificationFailed(String),

    #[error("Invalid bcrypt cost {cost}: must be between {min} and {max}")]
    InvalidCost { cost: u32, min: u32, max: u32 },
}
