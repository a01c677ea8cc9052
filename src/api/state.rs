//! Shared application state

use crate::auth::{PasswordHasher, TokenService};
use crate::config::Config;
use crate::repository::Store;

/// State handed to every handler. Cheap to clone; the pool is reference counted.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Store,
    pub tokens: TokenService,
    pub passwords: PasswordHasher,
}

impl AppState {
    pub fn new(store: Store, tokens: TokenService, passwords: PasswordHasher) -> Self {
        Self {
            store,
            tokens,
            passwords,
        }
    }

    /// Build state from loaded configuration and an open pool.
    pub fn from_config(config: &Config, pool: sqlx::PgPool) -> Self {
        Self::new(
            Store::new(pool),
            TokenService::new(&config.jwt_secret, config.token_ttl()),
            PasswordHasher::new(config.bcrypt_cost),
        )
    }
}
