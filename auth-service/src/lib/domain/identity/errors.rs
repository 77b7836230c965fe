use auth::JwtError;
use auth::KeyError;
use auth::PasswordError;
use thiserror::Error;

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error(
        "Username contains invalid characters (only alphanumeric, underscore, and hyphen allowed)"
    )]
    InvalidCharacters,
}

/// Error for identity store operations
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Stored identity is invalid: {0}")]
    CorruptRecord(String),
}

/// Error for login and key export operations.
///
/// `InvalidCredentials` is the only variant a caller may see verbatim; it is
/// deliberately identical for an unknown username and a wrong password.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("Token issuance failed: {0}")]
    TokenIssuance(#[source] JwtError),

    #[error("Public key export failed: {0}")]
    KeyExport(#[from] KeyError),

    #[error("Identity store error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Error for the default account bootstrap
#[derive(Debug, Clone, Error)]
pub enum BootstrapError {
    #[error("Failed to hash default password: {0}")]
    Hashing(#[from] PasswordError),

    #[error("Identity store error: {0}")]
    Repository(#[from] RepositoryError),
}
