use chrono::DateTime;
use chrono::Utc;

/// A signed token together with the cleartext fields it was built from.
///
/// The signed `value` is immutable; expiry is judged by the verifier when the
/// token is presented, never by changing the token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub value: String,
    pub user_id: String,
    pub username: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Token {
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// True once `now` is strictly after the expiry instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn token_expiring_at(expires_at: DateTime<Utc>) -> Token {
        Token {
            value: "header.payload.signature".to_string(),
            user_id: "user123".to_string(),
            username: "alice".to_string(),
            issued_at: expires_at - Duration::hours(24),
            expires_at,
        }
    }

    #[test]
    fn test_not_expired() {
        let token = token_expiring_at(Utc::now() + Duration::hours(1));
        assert!(!token.is_expired());
    }

    #[test]
    fn test_expired() {
        let token = token_expiring_at(Utc::now() - Duration::hours(1));
        assert!(token.is_expired());
    }

    #[test]
    fn test_expiry_boundary() {
        let expires_at = Utc::now();
        let token = token_expiring_at(expires_at);

        assert!(!token.is_expired_at(expires_at));
        assert!(token.is_expired_at(expires_at + Duration::milliseconds(1)));
    }
}
