//! Authentication utilities library
//!
//! Provides the credential and token primitives of the authentication service:
//! - Password hashing (bcrypt, cost 12 by default)
//! - RSA signing keypair lifecycle (load from PEM files or generate and persist)
//! - RS256 JWT issuance and verification with machine-readable failure reasons
//! - Authentication coordination
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::with_cost(4).unwrap();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## JWT Tokens
//! ```no_run
//! use std::sync::Arc;
//!
//! use auth::{JwtHandler, KeyManager, KeyPaths};
//!
//! let keys = Arc::new(KeyManager::load_or_generate(&KeyPaths::default()).unwrap());
//! let handler = JwtHandler::new(keys);
//! let token = handler.issue("user123", "alice").unwrap();
//! let claims = handler.verify(&token.value).unwrap();
//! assert_eq!(claims.username, "alice");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use std::sync::Arc;
//!
//! use auth::{Authenticator, JwtHandler, KeyManager, PasswordHasher};
//!
//! let keys = Arc::new(KeyManager::generate().unwrap());
//! let auth = Authenticator::new(PasswordHasher::with_cost(4).unwrap(), JwtHandler::new(keys));
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and issue token
//! let token = auth.authenticate("password123", &hash, "user123", "alice").unwrap();
//!
//! // Validate token
//! let claims = auth.validate_token(&token.value).unwrap();
//! assert_eq!(claims.sub, "user123");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod keys;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::Token;
pub use jwt::VerificationReason;
pub use keys::KeyError;
pub use keys::KeyManager;
pub use keys::KeyPaths;
pub use password::PasswordError;
pub use password::PasswordHasher;
