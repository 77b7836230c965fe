//! One-shot upgrade support for identities staged before password hashing.
//!
//! Older deployments seeded the default account with its plaintext password.
//! A bcrypt hash is always 60 characters, so anything shorter than
//! [`MIN_HASHED_LENGTH`] is taken to be such a staged plaintext. The check is
//! only consulted by the default account bootstrap.

/// Stored values shorter than this are treated as plaintext.
pub const MIN_HASHED_LENGTH: usize = 50;

pub fn is_staged_plaintext(stored_password: &str) -> bool {
    stored_password.len() < MIN_HASHED_LENGTH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plaintext_is_staged() {
        assert!(is_staged_plaintext("Password123!"));
        assert!(is_staged_plaintext(""));
        assert!(is_staged_plaintext(&"x".repeat(49)));
    }

    #[test]
    fn test_hash_is_not_staged() {
        let hash = auth::PasswordHasher::with_cost(4)
            .unwrap()
            .hash("Password123!")
            .unwrap();
        assert!(!is_staged_plaintext(&hash));
        assert!(!is_staged_plaintext(&"x".repeat(50)));
    }
}
