//! Budget Repository
//!
//! Monthly spending limits, optionally per category. At most one budget per
//! (user, category, month); a NULL category is the month's global budget.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use crate::domain::{Amount, PeriodMonth};

use super::error::classify_write;
use super::{Conflict, RepoError};

const BUDGET_EXISTS: Conflict = Conflict::duplicate(
    "budget_exists",
    "A budget for this category and month already exists",
);

/// A row of the `budgets` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Budget {
    pub id: i64,
    pub user_id: i64,
    pub category_id: Option<i64>,
    #[sqlx(try_from = "String")]
    pub period_month: PeriodMonth,
    pub limit_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Writable budget fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetFields {
    pub category_id: Option<i64>,
    pub period_month: PeriodMonth,
    pub limit_amount: Amount,
}

/// Optional list filters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BudgetFilter {
    pub month: Option<PeriodMonth>,
    pub category_id: Option<i64>,
}

/// Repository for the `budgets` table
#[derive(Debug, Clone)]
pub struct BudgetRepository {
    pool: PgPool,
}

impl BudgetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Budgets owned by `user_id` matching `filter`, ordered by id.
    pub async fn list(&self, user_id: i64, filter: &BudgetFilter) -> Result<Vec<Budget>, RepoError> {
        let budgets = sqlx::query_as::<_, Budget>(
            r#"
            SELECT id, user_id, category_id, period_month, limit_amount, created_at
            FROM budgets
            WHERE user_id = $1
              AND ($2::text IS NULL OR period_month = $2)
              AND ($3::bigint IS NULL OR category_id = $3)
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .bind(filter.month.map(|m| m.to_string()))
        .bind(filter.category_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(budgets)
    }

    /// A single budget owned by `user_id`.
    pub async fn get(&self, user_id: i64, id: i64) -> Result<Option<Budget>, RepoError> {
        let budget = sqlx::query_as::<_, Budget>(
            r#"
            SELECT id, user_id, category_id, period_month, limit_amount, created_at
            FROM budgets
            WHERE user_id = $1 AND id = $2
            "#,
        )
        .bind(user_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(budget)
    }

    /// Insert a budget for `user_id`.
    pub async fn create(&self, user_id: i64, fields: &BudgetFields) -> Result<Budget, RepoError> {
        sqlx::query_as::<_, Budget>(
            r#"
            INSERT INTO budgets (user_id, category_id, period_month, limit_amount)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, category_id, period_month, limit_amount, created_at
            "#,
        )
        .bind(user_id)
        .bind(fields.category_id)
        .bind(fields.period_month.to_string())
        .bind(fields.limit_amount.value())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify_write(e, BUDGET_EXISTS))
    }

    /// Replace all fields of a budget owned by `user_id`.
    ///
    /// `Ok(None)` when no owned row has this id; `Conflict(budget_exists)`
    /// when the new (category, month) pair is already taken.
    pub async fn update(
        &self,
        user_id: i64,
        id: i64,
        fields: &BudgetFields,
    ) -> Result<Option<Budget>, RepoError> {
        sqlx::query_as::<_, Budget>(
            r#"
            UPDATE budgets
            SET category_id = $3, period_month = $4, limit_amount = $5
            WHERE user_id = $1 AND id = $2
            RETURNING id, user_id, category_id, period_month, limit_amount, created_at
            "#,
        )
        .bind(user_id)
        .bind(id)
        .bind(fields.category_id)
        .bind(fields.period_month.to_string())
        .bind(fields.limit_amount.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| classify_write(e, BUDGET_EXISTS))
    }

    /// Delete a budget owned by `user_id`. `false` when nothing matched.
    pub async fn delete(&self, user_id: i64, id: i64) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM budgets WHERE user_id = $1 AND id = $2")
            .bind(user_id)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
