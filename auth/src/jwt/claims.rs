use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Identity claims carried by every issued token.
///
/// All fields are required: a payload missing any of them does not
/// deserialize and the token is rejected as malformed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Identifier of the authenticated identity
    pub user_id: String,

    /// Login name of the authenticated identity
    pub username: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Subject (same value as `user_id`)
    pub sub: String,
}

impl Claims {
    /// Create claims for an identity, valid from `now` for `ttl`.
    ///
    /// # Arguments
    /// * `user_id` - Unique identity identifier (also used as `sub`)
    /// * `username` - Login name
    /// * `issuer` - Issuing service name
    /// * `now` - Issue instant
    /// * `ttl` - Lifetime of the token
    pub fn for_identity(
        user_id: impl ToString,
        username: impl ToString,
        issuer: impl ToString,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        let user_id = user_id.to_string();
        let issued_at = now.timestamp();

        Self {
            sub: user_id.clone(),
            user_id,
            username: username.to_string(),
            iat: issued_at,
            nbf: issued_at,
            exp: (now + ttl).timestamp(),
            iss: issuer.to_string(),
        }
    }
}
