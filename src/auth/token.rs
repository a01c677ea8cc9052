//! Bearer tokens
//!
//! JWTs signed with HMAC-SHA256. Only HS256 is accepted on verification, so a
//! token re-labelled with another algorithm (including `none`) is rejected.

use std::fmt;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::CredentialError;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Token payload.
///
/// `uid` is a fixed integer; a token carrying it as a float or string fails
/// verification. Unknown extra claims are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject user ID
    pub uid: i64,
    /// Expiry, seconds since the Unix epoch
    pub exp: i64,
    /// Issued at, seconds since the Unix epoch
    #[serde(default)]
    pub iat: i64,
}

/// Issues and verifies tokens for one shared secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    /// Default lifetime of issued tokens
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `user_id` using the configured lifetime.
    pub fn issue(&self, user_id: i64) -> Result<String, CredentialError> {
        self.issue_with_ttl(user_id, self.ttl)
    }

    /// Issue a token for `user_id` expiring `ttl` from now.
    pub fn issue_with_ttl(&self, user_id: i64, ttl: Duration) -> Result<String, CredentialError> {
        if ttl <= Duration::zero() {
            return Err(CredentialError::NonPositiveTtl);
        }

        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or(CredentialError::TtlOutOfRange)?;
        let claims = Claims {
            uid: user_id,
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(ALGORITHM), &claims, &self.encoding).map_err(CredentialError::Signing)
    }

    /// Verify signature, algorithm and expiry, and return the subject user ID.
    pub fn verify(&self, token: &str) -> Result<i64, CredentialError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            CredentialError::InvalidToken
        })?;

        if data.claims.uid <= 0 {
            tracing::debug!(uid = data.claims.uid, "Rejected bearer token with invalid subject");
            return Err(CredentialError::InvalidToken);
        }

        Ok(data.claims.uid)
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &ALGORITHM)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

/// Issue a token for `user_id`, signed with `secret`, valid for `ttl`.
pub fn issue_token(user_id: i64, secret: &str, ttl: Duration) -> Result<String, CredentialError> {
    TokenService::new(secret, ttl).issue(user_id)
}

/// Verify `token` against `secret` and return its subject user ID.
pub fn verify_token(token: &str, secret: &str) -> Result<i64, CredentialError> {
    // The lifetime only matters when issuing.
    TokenService::new(secret, Duration::zero()).verify(token)
}
