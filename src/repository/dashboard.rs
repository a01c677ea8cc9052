//! Dashboard Repository
//!
//! Read-only monthly aggregation over transactions.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use crate::domain::PeriodMonth;

use super::RepoError;

/// Income and expense totals for one month. Derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthSummary {
    pub month: PeriodMonth,
    pub income_total: Decimal,
    pub expense_total: Decimal,
}

/// Repository for dashboard aggregates
#[derive(Debug, Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Sum amounts per type for `user_id` over the whole calendar month.
    ///
    /// A month without transactions yields zero totals.
    pub async fn summary(&self, user_id: i64, month: PeriodMonth) -> Result<MonthSummary, RepoError> {
        let (income_total, expense_total): (Decimal, Decimal) = sqlx::query_as(
            r#"
            SELECT
                COALESCE(SUM(amount) FILTER (WHERE type = 'income'), 0) AS income_total,
                COALESCE(SUM(amount) FILTER (WHERE type = 'expense'), 0) AS expense_total
            FROM transactions
            WHERE user_id = $1 AND date >= $2 AND date < $3
            "#,
        )
        .bind(user_id)
        .bind(month.start())
        .bind(month.end())
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(
            user_id = user_id,
            month = %month,
            income_total = %income_total,
            expense_total = %expense_total,
            "Computed month summary"
        );

        Ok(MonthSummary {
            month,
            income_total,
            expense_total,
        })
    }
}
