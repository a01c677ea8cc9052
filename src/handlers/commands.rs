//! Command definitions
//!
//! Commands carry raw client input into a handler; `validate` turns them
//! into the normalized form the handler works with.

use serde::{Deserialize, Serialize};

use crate::domain::validation::{validate_email, validate_name, validate_password};
use crate::domain::ValidationError;

/// Command to create an account
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterCommand {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterCommand {
    pub fn new(name: impl Into<String>, email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// Trim the name, normalize the email and check the password length.
    pub fn validate(self) -> Result<Self, ValidationError> {
        let name = validate_name(&self.name)?;
        let email = validate_email(&self.email)?;
        validate_password(&self.password)?;

        Ok(Self {
            name,
            email,
            password: self.password,
        })
    }
}

/// Command to exchange credentials for a token
#[derive(Debug, Clone, Deserialize)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

impl LoginCommand {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Result of a successful register or login
#[derive(Debug, Clone, Serialize)]
pub struct AuthResult {
    #[serde(rename = "id")]
    pub user_id: i64,
    pub token: String,
}
