//! Common test utilities
//!
//! Database tests run against `DATABASE_URL` and are skipped when it is not
//! set. Every test registers fresh users with unique emails, so tests never
//! see each other's rows and need no truncation between runs.

#![allow(dead_code)]

use chrono::Duration;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::sync::OnceCell;
use uuid::Uuid;

use finance_tracker::auth::{PasswordHasher, TokenService};
use finance_tracker::db;
use finance_tracker::repository::User;
use finance_tracker::{AppState, Store};

pub const TEST_SECRET: &str = "integration-test-secret";

static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// Connect to the test database and apply migrations once per test binary.
///
/// Returns `None` (and the caller returns early) when `DATABASE_URL` is unset.
pub async fn setup_test_db() -> Option<PgPool> {
    dotenvy::dotenv().ok();
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping database test");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    MIGRATED
        .get_or_init(|| async {
            db::run_migrations(&pool)
                .await
                .expect("Failed to run migrations");
        })
        .await;

    Some(pool)
}

/// Application state over `pool` with a cheap bcrypt cost.
pub fn test_state(pool: PgPool) -> AppState {
    AppState::new(
        Store::new(pool),
        TokenService::new(TEST_SECRET, Duration::hours(1)),
        PasswordHasher::new(4),
    )
}

pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.com", prefix, Uuid::new_v4().simple())
}

/// Insert a user directly through the repository.
pub async fn create_user(store: &Store, prefix: &str) -> User {
    store
        .users()
        .create(prefix, &unique_email(prefix), "$2b$04$not-a-real-hash")
        .await
        .expect("Failed to create user")
}
