//! Credential module
//!
//! One-way password hashing (bcrypt) and HMAC-signed bearer tokens (JWT, HS256).

pub mod password;
pub mod token;

pub use password::{hash_password, verify_password, PasswordHasher};
pub use token::{issue_token, verify_token, Claims, TokenService};

/// Errors raised by the credential module
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// Salt generation or hash encoding failed
    #[error("Password hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    /// Token could not be encoded
    #[error("Token signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    /// Bad signature, unexpected algorithm, expired, or malformed claims
    #[error("Invalid token")]
    InvalidToken,

    #[error("Token lifetime must be positive")]
    NonPositiveTtl,

    /// Expiry falls outside the representable date range
    #[error("Token lifetime is too long")]
    TtlOutOfRange,
}
