//! Data-access layer
//!
//! One repository per entity. Every query on owned data carries a
//! `user_id = $1` predicate, and uniqueness / referential rules are enforced
//! by the database. Storage-engine error codes are translated into
//! [`RepoError`] here and nowhere else.

mod budget;
mod category;
mod dashboard;
mod error;
mod transaction;
mod user;

pub use budget::{Budget, BudgetFields, BudgetFilter, BudgetRepository};
pub use category::{Category, CategoryFields, CategoryRepository};
pub use dashboard::{DashboardRepository, MonthSummary};
pub use error::{Conflict, ConflictKind, RepoError};
pub use transaction::{Transaction, TransactionFields, TransactionFilter, TransactionRepository};
pub use user::{User, UserRepository};

use sqlx::PgPool;

/// Hands out repositories bound to the shared connection pool.
#[derive(Debug, Clone)]
pub struct Store {
    pool: PgPool,
}

impl Store {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    pub fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(self.pool.clone())
    }

    pub fn transactions(&self) -> TransactionRepository {
        TransactionRepository::new(self.pool.clone())
    }

    pub fn budgets(&self) -> BudgetRepository {
        BudgetRepository::new(self.pool.clone())
    }

    pub fn dashboard(&self) -> DashboardRepository {
        DashboardRepository::new(self.pool.clone())
    }
}
