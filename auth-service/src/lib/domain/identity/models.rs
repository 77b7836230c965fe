use std::fmt;

use auth::VerificationReason;
use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::identity::errors::UsernameError;

/// Identity entity.
///
/// Represents a user able to authenticate. Only the password hash is ever
/// stored, never the plaintext.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: IdentityId,
    pub username: Username,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identity {
    /// Create a new identity with a fresh identifier.
    ///
    /// # Arguments
    /// * `username` - Validated login name
    /// * `password_hash` - Hashed password
    ///
    /// # Returns
    /// Identity created and updated now
    pub fn new(username: Username, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: IdentityId::new(),
            username,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Identity unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdentityId(pub Uuid);

impl IdentityId {
    /// Generate a new random identity ID.
    ///
    /// # Returns
    /// IdentityId with random UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for IdentityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// Ensures username is 3-50 characters and contains only ASCII alphanumerics,
/// underscore, and hyphen.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 50;

    /// Create a new valid username.
    ///
    /// Validates length and character constraints.
    ///
    /// # Arguments
    /// * `username` - Raw username string
    ///
    /// # Returns
    /// Validated Username value object
    ///
    /// # Errors
    /// * `TooShort` - Username shorter than 3 characters
    /// * `TooLong` - Username longer than 50 characters
    /// * `InvalidCharacters` - Contains characters other than ASCII alphanumerics, _ and -
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let username = Self::with_valid_length(username)?;
        let username = Self::with_valid_chars(username)?;
        Ok(Self(username))
    }

    fn with_valid_length(username: String) -> Result<String, UsernameError> {
        let length = username.chars().count();
        if length < Self::MIN_LENGTH {
            Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(username)
        }
    }

    fn with_valid_chars(username: String) -> Result<String, UsernameError> {
        if username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            Ok(username)
        } else {
            Err(UsernameError::InvalidCharacters)
        }
    }

    /// Get username as string slice.
    ///
    /// # Returns
    /// Username string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Account guaranteed to exist by the bootstrap.
#[derive(Debug, Clone)]
pub struct DefaultAccount {
    pub username: Username,
    pub password: String,
}

impl DefaultAccount {
    pub fn new(username: Username, password: String) -> Self {
        Self { username, password }
    }
}

/// Outcome of checking a presented token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenCheck {
    Valid { username: String },
    Invalid { reason: VerificationReason },
}

impl TokenCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, TokenCheck::Valid { .. })
    }
}

/// What the default account bootstrap did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// The account did not exist and was created.
    Created,
    /// The account held a staged plaintext password which is now hashed.
    Upgraded,
    /// The account already held a hash; nothing was written.
    Unchanged,
}

impl BootstrapOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            BootstrapOutcome::Created => "default account created",
            BootstrapOutcome::Upgraded => "default account password upgraded to hash",
            BootstrapOutcome::Unchanged => "default account present",
        }
    }
}
