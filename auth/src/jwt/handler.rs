use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::DateTime;
use chrono::Duration;
use chrono::SubsecRound;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::decode_header;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::JwtError;
use super::errors::VerificationReason;
use super::token::Token;
use crate::keys::KeyError;
use crate::keys::KeyManager;

/// Algorithm used for every token this handler signs.
const SIGNING_ALGORITHM: Algorithm = Algorithm::RS256;

/// Header algorithms accepted on verification: the RSA family only.
const ACCEPTED_ALGORITHMS: [Algorithm; 6] = [
    Algorithm::RS256,
    Algorithm::RS384,
    Algorithm::RS512,
    Algorithm::PS256,
    Algorithm::PS384,
    Algorithm::PS512,
];

const REQUIRED_CLAIMS: [&str; 5] = ["exp", "nbf", "iat", "iss", "sub"];

/// JWT issuer and verifier backed by the service's RSA keypair.
///
/// Tokens are signed with RS256 using the private key held by the
/// [`KeyManager`] and verified against its public key. The handler holds no
/// mutable state, so a single instance can be shared across threads.
pub struct JwtHandler {
    keys: Arc<KeyManager>,
    issuer: String,
    ttl: Duration,
    leeway: u64,
}

impl JwtHandler {
    pub const DEFAULT_ISSUER: &'static str = "auth-service";
    pub const DEFAULT_EXPIRATION_HOURS: i64 = 24;

    /// Create a new JWT handler over a keypair.
    ///
    /// # Arguments
    /// * `keys` - Signing keypair shared with the rest of the process
    ///
    /// # Returns
    /// JwtHandler issuing 24 hour tokens as `auth-service`, with no clock leeway
    pub fn new(keys: Arc<KeyManager>) -> Self {
        Self {
            keys,
            issuer: Self::DEFAULT_ISSUER.to_string(),
            ttl: Duration::hours(Self::DEFAULT_EXPIRATION_HOURS),
            leeway: 0,
        }
    }

    /// Set the `iss` claim written into issued tokens.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    /// Set the lifetime of issued tokens.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the clock skew tolerance, in seconds, applied to `exp` and `nbf`.
    pub fn with_leeway(mut self, seconds: u64) -> Self {
        self.leeway = seconds;
        self
    }

    /// Issue a signed token for an identity, valid from now.
    ///
    /// # Arguments
    /// * `user_id` - Identity identifier
    /// * `username` - Identity login name
    ///
    /// # Returns
    /// Signed token with its cleartext fields
    ///
    /// # Errors
    /// * `SigningFailed` - Token could not be signed
    pub fn issue(&self, user_id: &str, username: &str) -> Result<Token, JwtError> {
        self.issue_at(user_id, username, Utc::now())
    }

    /// Issue a signed token whose validity window starts at `now`.
    ///
    /// # Errors
    /// * `SigningFailed` - Lifetime is not positive, or signing failed
    pub fn issue_at(
        &self,
        user_id: &str,
        username: &str,
        now: DateTime<Utc>,
    ) -> Result<Token, JwtError> {
        if self.ttl <= Duration::zero() {
            return Err(JwtError::SigningFailed(
                "token lifetime must be positive".to_string(),
            ));
        }

        // Claims carry whole seconds; the returned timestamps must agree with them
        let now = now.trunc_subsecs(0);
        let claims = Claims::for_identity(user_id, username, &self.issuer, now, self.ttl);
        let header = Header::new(SIGNING_ALGORITHM);

        let value = encode(&header, &claims, self.keys.encoding_key())
            .map_err(|e| JwtError::SigningFailed(e.to_string()))?;

        Ok(Token {
            value,
            user_id: user_id.to_string(),
            username: username.to_string(),
            issued_at: now,
            expires_at: now + self.ttl,
        })
    }

    /// Verify a token and return its claims.
    ///
    /// Checks, in order, that the header names an RSA algorithm, that the
    /// signature matches the current public key, that the payload has the
    /// expected claim shape, and that the current time lies within
    /// `[nbf, exp]` (widened by the configured leeway).
    ///
    /// # Arguments
    /// * `token` - Compact JWT string
    ///
    /// # Returns
    /// Verified claims
    ///
    /// # Errors
    /// * `VerificationFailed(AlgorithmMismatch)` - Header algorithm is not RSA
    /// * `VerificationFailed(BadSignature)` - Signature does not verify
    /// * `VerificationFailed(Expired)` - Current time is after `exp`
    /// * `VerificationFailed(NotYetValid)` - Current time is before `nbf`
    /// * `VerificationFailed(Malformed)` - Token or payload cannot be decoded
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        validation.leeway = self.leeway;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&REQUIRED_CLAIMS);

        decode::<Claims>(token, self.keys.decoding_key(), &validation)
            .map(|data| data.claims)
            .map_err(|e| JwtError::VerificationFailed(classify(token, &e)))
    }

    /// PEM-encoded public key that verifies this handler's tokens.
    ///
    /// # Errors
    /// * `ExportFailed` - Encoding the public key failed
    pub fn public_key_pem(&self) -> Result<String, KeyError> {
        self.keys.public_key_pem()
    }
}

fn classify(token: &str, err: &jsonwebtoken::errors::Error) -> VerificationReason {
    match err.kind() {
        ErrorKind::ExpiredSignature => VerificationReason::Expired,
        ErrorKind::ImmatureSignature => VerificationReason::NotYetValid,
        ErrorKind::InvalidSignature => VerificationReason::BadSignature,
        ErrorKind::InvalidAlgorithm
        | ErrorKind::InvalidAlgorithmName
        | ErrorKind::MissingAlgorithm => VerificationReason::AlgorithmMismatch,
        // The payload is only decoded after the signature verifies, so with a
        // readable header the undecodable segment is the signature
        ErrorKind::Base64(_) if decode_header(token).is_ok() => VerificationReason::BadSignature,
        // `jsonwebtoken` has no variant for names such as "none", so the
        // header fails to deserialize before any algorithm check runs
        ErrorKind::Json(_) if names_foreign_algorithm(token) => {
            VerificationReason::AlgorithmMismatch
        }
        _ => VerificationReason::Malformed,
    }
}

/// Whether the token's header is readable JSON whose `alg` is a string
/// outside the accepted RSA family.
fn names_foreign_algorithm(token: &str) -> bool {
    let Some(encoded) = token.split('.').next() else {
        return false;
    };
    let Ok(bytes) = URL_SAFE_NO_PAD.decode(encoded) else {
        return false;
    };
    let Ok(header) = serde_json::from_slice::<serde_json::Value>(&bytes) else {
        return false;
    };

    match header.get("alg").and_then(|alg| alg.as_str()) {
        Some(name) => name
            .parse::<Algorithm>()
            .map_or(true, |algorithm| !ACCEPTED_ALGORITHMS.contains(&algorithm)),
        None => false,
    }
}
