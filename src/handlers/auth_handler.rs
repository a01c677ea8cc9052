//! Authentication Handlers
//!
//! Account creation and credential exchange. bcrypt is CPU bound, so hashing
//! and verification run on the blocking pool.

use crate::api::AppState;
use crate::auth::{PasswordHasher, TokenService};
use crate::domain::validation::normalize_email;
use crate::error::AppError;
use crate::repository::UserRepository;

use super::{AuthResult, LoginCommand, RegisterCommand};

/// Run a bcrypt operation off the async workers.
async fn run_blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(format!("blocking task failed: {e}")))
}

/// Handler for account registration
pub struct RegisterHandler {
    users: UserRepository,
    tokens: TokenService,
    passwords: PasswordHasher,
}

impl RegisterHandler {
    pub fn new(state: &AppState) -> Self {
        Self {
            users: state.store.users(),
            tokens: state.tokens.clone(),
            passwords: state.passwords,
        }
    }

    /// Validate, hash, persist, then issue a token for the new user.
    ///
    /// An email that is already registered fails with `email_in_use`.
    pub async fn execute(&self, command: RegisterCommand) -> Result<AuthResult, AppError> {
        let command = command.validate()?;

        let hasher = self.passwords;
        let password = command.password;
        let password_hash = run_blocking(move || hasher.hash(&password)).await??;

        let user = self
            .users
            .create(&command.name, &command.email, &password_hash)
            .await?;

        let token = self.tokens.issue(user.id)?;

        tracing::info!(user_id = user.id, "User registered");

        Ok(AuthResult {
            user_id: user.id,
            token,
        })
    }
}

/// Handler for login
pub struct LoginHandler {
    users: UserRepository,
    tokens: TokenService,
    passwords: PasswordHasher,
}

impl LoginHandler {
    pub fn new(state: &AppState) -> Self {
        Self {
            users: state.store.users(),
            tokens: state.tokens.clone(),
            passwords: state.passwords,
        }
    }

    /// Check credentials and issue a token.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller:
    /// both return `InvalidCredentials`, and both pay for one bcrypt round.
    pub async fn execute(&self, command: LoginCommand) -> Result<AuthResult, AppError> {
        let email = normalize_email(&command.email);
        if email.is_empty() || command.password.is_empty() {
            return Err(AppError::InvalidRequest(
                "email and password are required".to_string(),
            ));
        }

        let hasher = self.passwords;
        let password = command.password;

        let Some(user) = self.users.get_by_email(&email).await? else {
            run_blocking(move || {
                let _ = hasher.hash(&password);
            })
            .await?;
            tracing::debug!("Login for unknown email");
            return Err(AppError::InvalidCredentials);
        };

        let stored_hash = user.password_hash;
        let matches = run_blocking(move || hasher.verify(&stored_hash, &password)).await?;

        if !matches {
            tracing::debug!(user_id = user.id, "Login with wrong password");
            return Err(AppError::InvalidCredentials);
        }

        let token = self.tokens.issue(user.id)?;

        Ok(AuthResult {
            user_id: user.id,
            token,
        })
    }
}
