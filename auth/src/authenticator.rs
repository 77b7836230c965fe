use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::Token;
use crate::keys::KeyError;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and JWT issuance.
///
/// Provides high-level authentication operations by coordinating
/// password hashing and JWT token handling.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
}

/// Authentication operation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Token issuance failed: {0}")]
    TokenIssuance(#[source] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `password_hasher` - Hasher used for storage and verification
    /// * `jwt_handler` - Token issuer/verifier
    ///
    /// # Returns
    /// Configured Authenticator instance
    pub fn new(password_hasher: PasswordHasher, jwt_handler: JwtHandler) -> Self {
        Self {
            password_hasher,
            jwt_handler,
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `HashingFailed` - Password longer than 72 bytes, or hashing failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a password against a stored hash without issuing anything.
    ///
    /// # Errors
    /// * `VerificationFailed` - Stored value is not a password hash
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Verify credentials and issue a token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `user_id` - Identifier written into the token
    /// * `username` - Login name written into the token
    ///
    /// # Returns
    /// Signed token for the identity
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash could not be used for verification
    /// * `TokenIssuance` - Token signing failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        user_id: &str,
        username: &str,
    ) -> Result<Token, AuthenticationError> {
        let is_valid = self.password_hasher.verify(password, stored_hash)?;

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        self.jwt_handler
            .issue(user_id, username)
            .map_err(AuthenticationError::TokenIssuance)
    }

    /// Issue a token without password verification.
    ///
    /// Useful when authentication has already been verified by other means.
    ///
    /// # Errors
    /// * `SigningFailed` - Token signing failed
    pub fn issue_token(&self, user_id: &str, username: &str) -> Result<Token, JwtError> {
        self.jwt_handler.issue(user_id, username)
    }

    /// Validate a token and return its claims.
    ///
    /// # Errors
    /// * `VerificationFailed` - Token was rejected, with the reason
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.verify(token)
    }

    /// PEM-encoded public key for independent token verification.
    ///
    /// # Errors
    /// * `ExportFailed` - Encoding the public key failed
    pub fn public_key_pem(&self) -> Result<String, KeyError> {
        self.jwt_handler.public_key_pem()
    }
}
