use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::Token;
use auth::VerificationReason;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::identity::errors::AuthError;
use crate::identity::errors::BootstrapError;
use crate::identity::legacy;
use crate::identity::models::BootstrapOutcome;
use crate::identity::models::DefaultAccount;
use crate::identity::models::Identity;
use crate::identity::models::TokenCheck;
use crate::identity::models::Username;
use crate::identity::ports::AuthServicePort;
use crate::identity::ports::IdentityRepository;

/// Verified against when the username is unknown, so that a miss costs a
/// full bcrypt verification like a wrong password does.
const TIMING_DUMMY_PASSWORD: &str = "timing-equalization-dummy";

/// Domain service implementation for authentication operations.
///
/// Concrete implementation of AuthServicePort with dependency injection.
pub struct AuthService<IR>
where
    IR: IdentityRepository,
{
    repository: Arc<IR>,
    authenticator: Arc<Authenticator>,
    default_account: DefaultAccount,
    bootstrap_lock: Mutex<()>,
    dummy_hash: Option<String>,
}

impl<IR> AuthService<IR>
where
    IR: IdentityRepository,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Identity persistence implementation
    /// * `authenticator` - Password verification and token issuance
    /// * `default_account` - Account ensured by the bootstrap
    ///
    /// # Returns
    /// Configured auth service instance
    pub fn new(
        repository: Arc<IR>,
        authenticator: Arc<Authenticator>,
        default_account: DefaultAccount,
    ) -> Self {
        let dummy_hash = match authenticator.hash_password(TIMING_DUMMY_PASSWORD) {
            Ok(hash) => Some(hash),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to prepare timing dummy hash");
                None
            }
        };

        Self {
            repository,
            authenticator,
            default_account,
            bootstrap_lock: Mutex::new(()),
            dummy_hash,
        }
    }

    fn burn_verification(&self, password: &str) {
        if let Some(hash) = &self.dummy_hash {
            let _ = self.authenticator.verify_password(password, hash);
        }
    }

    async fn create_default_account(&self) -> Result<BootstrapOutcome, BootstrapError> {
        let password_hash = self
            .authenticator
            .hash_password(&self.default_account.password)?;

        let identity = Identity::new(self.default_account.username.clone(), password_hash);
        self.repository.save(identity).await?;

        tracing::info!(
            username = %self.default_account.username,
            "Default account created"
        );

        Ok(BootstrapOutcome::Created)
    }

    async fn upgrade_default_account(
        &self,
        mut identity: Identity,
    ) -> Result<BootstrapOutcome, BootstrapError> {
        identity.password_hash = self
            .authenticator
            .hash_password(&self.default_account.password)?;
        identity.updated_at = Utc::now();

        self.repository.save(identity).await?;

        tracing::info!(
            username = %self.default_account.username,
            "Default account password upgraded to hash"
        );

        Ok(BootstrapOutcome::Upgraded)
    }
}

#[async_trait]
impl<IR> AuthServicePort for AuthService<IR>
where
    IR: IdentityRepository,
{
    async fn login(&self, username: &str, password: &str) -> Result<Token, AuthError> {
        let Ok(username) = Username::new(username.to_string()) else {
            self.burn_verification(password);
            return Err(AuthError::InvalidCredentials);
        };

        let Some(identity) = self.repository.find_by_username(&username).await? else {
            self.burn_verification(password);
            tracing::debug!(username = %username, "Login for unknown username");
            return Err(AuthError::InvalidCredentials);
        };

        let result = self.authenticator.authenticate(
            password,
            &identity.password_hash,
            &identity.id.to_string(),
            identity.username.as_str(),
        );

        match result {
            Ok(token) => {
                tracing::info!(
                    user_id = %identity.id,
                    username = %identity.username,
                    "Login succeeded"
                );
                Ok(token)
            }
            Err(AuthenticationError::InvalidCredentials) => {
                tracing::debug!(username = %identity.username, "Login with wrong password");
                Err(AuthError::InvalidCredentials)
            }
            Err(AuthenticationError::PasswordError(e)) => {
                tracing::error!(
                    user_id = %identity.id,
                    error = %e,
                    "Stored password hash is unusable"
                );
                Err(AuthError::InvalidCredentials)
            }
            Err(AuthenticationError::TokenIssuance(e)) => Err(AuthError::TokenIssuance(e)),
        }
    }

    async fn bootstrap_default_account(&self) -> Result<BootstrapOutcome, BootstrapError> {
        let _guard = self.bootstrap_lock.lock().await;
        let username = &self.default_account.username;

        let existing = if self.repository.exists(username).await? {
            self.repository.find_by_username(username).await?
        } else {
            None
        };

        match existing {
            None => self.create_default_account().await,
            Some(identity) if legacy::is_staged_plaintext(&identity.password_hash) => {
                self.upgrade_default_account(identity).await
            }
            Some(_) => Ok(BootstrapOutcome::Unchanged),
        }
    }

    async fn check_token(&self, token: &str) -> TokenCheck {
        match self.authenticator.validate_token(token) {
            Ok(claims) => TokenCheck::Valid {
                username: claims.username,
            },
            Err(e) => {
                let reason = e.reason().unwrap_or(VerificationReason::Malformed);
                tracing::debug!(
                    reason = %reason,
                    token_length = token.len(),
                    "Token rejected"
                );
                TokenCheck::Invalid { reason }
            }
        }
    }

    async fn public_key_pem(&self) -> Result<String, AuthError> {
        Ok(self.authenticator.public_key_pem()?)
    }
}
