//! Transaction Repository
//!
//! Income and expense records. `category_id` is optional; when present it
//! must name a category owned by the same user (composite foreign key).

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use crate::domain::{Amount, EntryType};

use super::error::classify_reference;
use super::RepoError;

/// A row of the `transactions` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub category_id: Option<i64>,
    pub amount: Decimal,
    #[serde(rename = "type")]
    #[sqlx(rename = "type", try_from = "String")]
    pub kind: EntryType,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Writable transaction fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionFields {
    pub category_id: Option<i64>,
    pub amount: Amount,
    pub kind: EntryType,
    pub date: NaiveDate,
    pub description: Option<String>,
}

/// Optional list filters; all bounds are inclusive
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub kind: Option<EntryType>,
    pub category_id: Option<i64>,
}

/// Repository for the `transactions` table
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: PgPool,
}

impl TransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Transactions owned by `user_id` matching `filter`, ordered by id.
    pub async fn list(
        &self,
        user_id: i64,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, RepoError> {
        let transactions = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, user_id, category_id, amount, type, date, description, created_at
            FROM transactions
            WHERE user_id = $1
              AND ($2::date IS NULL OR date >= $2)
              AND ($3::date IS NULL OR date <= $3)
              AND ($4::text IS NULL OR type = $4)
              AND ($5::bigint IS NULL OR category_id = $5)
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .bind(filter.from)
        .bind(filter.to)
        .bind(filter.kind.map(|k| k.as_str()))
        .bind(filter.category_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }

    /// A single transaction owned by `user_id`.
    pub async fn get(&self, user_id: i64, id: i64) -> Result<Option<Transaction>, RepoError> {
        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, user_id, category_id, amount, type, date, description, created_at
            FROM transactions
            WHERE user_id = $1 AND id = $2
            "#,
        )
        .bind(user_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(transaction)
    }

    /// Insert a transaction for `user_id`.
    ///
    /// A `category_id` not owned by the user fails with `MissingReference`.
    pub async fn create(
        &self,
        user_id: i64,
        fields: &TransactionFields,
    ) -> Result<Transaction, RepoError> {
        sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions (user_id, category_id, amount, type, date, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, category_id, amount, type, date, description, created_at
            "#,
        )
        .bind(user_id)
        .bind(fields.category_id)
        .bind(fields.amount.value())
        .bind(fields.kind.as_str())
        .bind(fields.date)
        .bind(fields.description.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(classify_reference)
    }

    /// Replace all fields of a transaction owned by `user_id`.
    ///
    /// `Ok(None)` when no owned row has this id.
    pub async fn update(
        &self,
        user_id: i64,
        id: i64,
        fields: &TransactionFields,
    ) -> Result<Option<Transaction>, RepoError> {
        sqlx::query_as::<_, Transaction>(
            r#"
            UPDATE transactions
            SET category_id = $3, amount = $4, type = $5, date = $6, description = $7
            WHERE user_id = $1 AND id = $2
            RETURNING id, user_id, category_id, amount, type, date, description, created_at
            "#,
        )
        .bind(user_id)
        .bind(id)
        .bind(fields.category_id)
        .bind(fields.amount.value())
        .bind(fields.kind.as_str())
        .bind(fields.date)
        .bind(fields.description.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(classify_reference)
    }

    /// Delete a transaction owned by `user_id`. `false` when nothing matched.
    pub async fn delete(&self, user_id: i64, id: i64) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM transactions WHERE user_id = $1 AND id = $2")
            .bind(user_id)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
