use async_trait::async_trait;
use auth::Token;

use crate::identity::errors::AuthError;
use crate::identity::errors::BootstrapError;
use crate::identity::errors::RepositoryError;
use crate::identity::models::BootstrapOutcome;
use crate::identity::models::Identity;
use crate::identity::models::TokenCheck;
use crate::identity::models::Username;

/// Port for authentication domain service operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Verify credentials and issue a token.
    ///
    /// # Arguments
    /// * `username` - Raw login name
    /// * `password` - Plaintext password
    ///
    /// # Returns
    /// Signed token for the identity
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username or wrong password
    /// * `TokenIssuance` - Token signing failed
    /// * `Repository` - Identity store failed
    async fn login(&self, username: &str, password: &str) -> Result<Token, AuthError>;

    /// Ensure the default account exists with a hashed password.
    ///
    /// Idempotent: safe to call on every health probe.
    ///
    /// # Returns
    /// What the bootstrap had to do
    ///
    /// # Errors
    /// * `Hashing` - Default password could not be hashed
    /// * `Repository` - Identity store failed
    async fn bootstrap_default_account(&self) -> Result<BootstrapOutcome, BootstrapError>;

    /// Check a presented token.
    ///
    /// # Arguments
    /// * `token` - Raw compact JWT
    ///
    /// # Returns
    /// The token's username when valid, otherwise the rejection reason
    async fn check_token(&self, token: &str) -> TokenCheck;

    /// PEM-encoded public key for verifying issued tokens.
    ///
    /// # Errors
    /// * `KeyExport` - Encoding the public key failed
    async fn public_key_pem(&self) -> Result<String, AuthError>;
}

/// Persistence operations for identities.
#[async_trait]
pub trait IdentityRepository: Send + Sync + 'static {
    /// Retrieve identity by username.
    ///
    /// # Arguments
    /// * `username` - Username to search for
    ///
    /// # Returns
    /// Optional identity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    /// * `CorruptRecord` - Stored row could not be mapped onto an identity
    async fn find_by_username(&self, username: &Username)
        -> Result<Option<Identity>, RepositoryError>;

    /// Insert an identity, or replace the one with the same username.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn save(&self, identity: Identity) -> Result<(), RepositoryError>;

    /// Whether an identity with this username exists.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn exists(&self, username: &Username) -> Result<bool, RepositoryError>;
}
