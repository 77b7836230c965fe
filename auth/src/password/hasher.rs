use super::errors::PasswordError;

/// Password hashing implementation.
///
/// Provides salted, adaptive password hashing (internally uses bcrypt).
/// Every call to [`hash`](PasswordHasher::hash) embeds a fresh random salt,
/// so hashing the same plaintext twice never yields the same string.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Work factor used unless the deployment configures another one.
    pub const DEFAULT_COST: u32 = 12;

    /// bcrypt only reads the first 72 bytes of its input.
    pub const MAX_PASSWORD_BYTES: usize = 72;

    const MIN_COST: u32 = 4;
    const MAX_COST: u32 = 31;

    /// Create a new password hasher instance.
    ///
    /// # Returns
    /// PasswordHasher instance using cost factor 12
    pub fn new() -> Self {
        Self {
            cost: Self::DEFAULT_COST,
        }
    }

    /// Create a password hasher with a custom work factor.
    ///
    /// # Arguments
    /// * `cost` - bcrypt cost factor (4..=31)
    ///
    /// # Errors
    /// * `InvalidCost` - Cost is outside the range bcrypt accepts
    pub fn with_cost(cost: u32) -> Result<Self, PasswordError> {
        if !(Self::MIN_COST..=Self::MAX_COST).contains(&cost) {
            return Err(PasswordError::InvalidCost {
                cost,
                min: Self::MIN_COST,
                max: Self::MAX_COST,
            });
        }

        Ok(Self { cost })
    }

    /// Hash a plaintext password securely.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// Modular crypt format hash (`$2b$<cost>$<salt><digest>`)
    ///
    /// # Errors
    /// * `HashingFailed` - Password longer than 72 bytes, or bcrypt failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        if password.len() > Self::MAX_PASSWORD_BYTES {
            return Err(PasswordError::HashingFailed(format!(
                "password is {} bytes, maximum is {}",
                password.len(),
                Self::MAX_PASSWORD_BYTES
            )));
        }

        bcrypt::hash(password, self.cost).map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// Uses bcrypt's own comparison, which checks digests in constant time.
    /// Inputs longer than 72 bytes never match: bcrypt would otherwise
    /// silently compare only their prefix.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `hash` - Stored password hash
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `VerificationFailed` - Stored value is not a bcrypt hash
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        if password.len() > Self::MAX_PASSWORD_BYTES {
            return Ok(false);
        }

        bcrypt::verify(password, hash).map_err(|e| {
            PasswordError::VerificationFailed(format!("Invalid password hash: {}", e))
        })
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_hasher() -> PasswordHasher {
        PasswordHasher::with_cost(4).expect("cost 4 is valid")
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = fast_hasher();
        let password = "my_secure_password";

        // Hash the password
        let hash = hasher.hash(password).expect("Failed to hash password");

        // Verify correct password
        assert!(hasher
            .verify(password, &hash)
            .expect("Failed to verify password"));

        // Verify incorrect password
        assert!(!hasher
            .verify("wrong_password", &hash)
            .expect("Failed to verify password"));
    }

    #[test]
    fn test_default_cost_is_twelve() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash("Password123!").expect("Failed to hash password");

        assert!(hash.starts_with("$2b$12$"));
        assert_eq!(hash.len(), 60);
    }

    #[test]
    fn test_same_password_hashes_differently() {
        let hasher = fast_hasher();

        let first = hasher.hash("Password123!").expect("Failed to hash password");
        let second = hasher.hash("Password123!").expect("Failed to hash password");

        assert_ne!(first, second);
        assert!(hasher.verify("Password123!", &first).unwrap());
        assert!(hasher.verify("Password123!", &second).unwrap());
    }

    #[test]
    fn test_empty_password_is_hashable() {
        let hasher = fast_hasher();
        let hash = hasher.hash("").expect("Failed to hash empty password");

        assert!(hasher.verify("", &hash).unwrap());
        assert!(!hasher.verify("x", &hash).unwrap());
    }

    #[test]
    fn test_password_at_limit_is_accepted() {
        let hasher = fast_hasher();
        let password = "a".repeat(PasswordHasher::MAX_PASSWORD_BYTES);

        let hash = hasher.hash(&password).expect("72 bytes must be accepted");
        assert!(hasher.verify(&password, &hash).unwrap());
    }

    #[test]
    fn test_password_over_limit_is_rejected() {
        let hasher = fast_hasher();
        let password = "a".repeat(PasswordHasher::MAX_PASSWORD_BYTES + 1);

        let result = hasher.hash(&password);
        assert!(matches!(result, Err(PasswordError::HashingFailed(_))));
    }

    #[test]
    fn test_multibyte_limit_counts_bytes() {
        let hasher = fast_hasher();
        // 37 two-byte characters are 74 bytes
        let password = "é".repeat(37);

        assert!(hasher.hash(&password).is_err());
    }

    #[test]
    fn test_overlong_password_never_matches_prefix_hash() {
        let hasher = fast_hasher();
        let prefix = "a".repeat(PasswordHasher::MAX_PASSWORD_BYTES);
        let hash = hasher.hash(&prefix).unwrap();

        let longer = format!("{}tail", prefix);
        assert!(!hasher.verify(&longer, &hash).unwrap());
    }

    #[test]
    fn test_verify_invalid_hash() {
        let hasher = fast_hasher();
        let result = hasher.verify("password", "invalid_hash");
        assert!(matches!(result, Err(PasswordError::VerificationFailed(_))));
    }

    #[test]
    fn test_with_cost_bounds() {
        assert!(PasswordHasher::with_cost(4).is_ok());
        assert!(PasswordHasher::with_cost(31).is_ok());
        assert!(matches!(
            PasswordHasher::with_cost(3),
            Err(PasswordError::InvalidCost { cost: 3, .. })
        ));
        assert!(PasswordHasher::with_cost(32).is_err());
    }
}
