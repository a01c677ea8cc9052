//! Category Repository
//!
//! Per-user income / expense categories, unique on (user_id, name, type).

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::domain::EntryType;

use super::error::{classify_write, violation, Violation};
use super::{Conflict, RepoError};

const CATEGORY_EXISTS: Conflict = Conflict::duplicate(
    "category_exists",
    "A category with this name and type already exists",
);

const CATEGORY_HAS_BUDGETS: Conflict = Conflict::dependent_row(
    "category_has_budgets",
    "Delete or reassign budgets for this category before deleting it.",
);

const CATEGORY_HAS_TRANSACTIONS: Conflict = Conflict::dependent_row(
    "category_has_transactions",
    "Delete or reassign transactions for this category before deleting it.",
);

/// A row of the `categories` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type", try_from = "String")]
    pub kind: EntryType,
    pub created_at: DateTime<Utc>,
}

/// Writable category fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryFields {
    pub name: String,
    pub kind: EntryType,
}

/// Repository for the `categories` table
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All categories owned by `user_id`, ordered by id.
    pub async fn list(&self, user_id: i64) -> Result<Vec<Category>, RepoError> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, user_id, name, type, created_at
            FROM categories
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// A single category owned by `user_id`.
    pub async fn get(&self, user_id: i64, id: i64) -> Result<Option<Category>, RepoError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, user_id, name, type, created_at
            FROM categories
            WHERE user_id = $1 AND id = $2
            "#,
        )
        .bind(user_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// Insert a category for `user_id`.
    pub async fn create(
        &self,
        user_id: i64,
        fields: &CategoryFields,
    ) -> Result<Category, RepoError> {
        sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (user_id, name, type)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, name, type, created_at
            "#,
        )
        .bind(user_id)
        .bind(&fields.name)
        .bind(fields.kind.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify_write(e, CATEGORY_EXISTS))
    }

    /// Replace name and type of a category owned by `user_id`.
    ///
    /// `Ok(None)` when no owned row has this id.
    pub async fn update(
        &self,
        user_id: i64,
        id: i64,
        fields: &CategoryFields,
    ) -> Result<Option<Category>, RepoError> {
        sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = $3, type = $4
            WHERE user_id = $1 AND id = $2
            RETURNING id, user_id, name, type, created_at
            "#,
        )
        .bind(user_id)
        .bind(id)
        .bind(&fields.name)
        .bind(fields.kind.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| classify_write(e, CATEGORY_EXISTS))
    }

    /// Delete a category owned by `user_id`.
    ///
    /// Returns `false` when nothing matched. A category still referenced by a
    /// budget or transaction is protected by `ON DELETE RESTRICT` and yields a
    /// dependent-row conflict; both rows are left intact.
    pub async fn delete(&self, user_id: i64, id: i64) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM categories WHERE user_id = $1 AND id = $2")
            .bind(user_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match violation(&e) {
                Some(Violation::ForeignKey { constraint }) => {
                    RepoError::Conflict(dependent_conflict(constraint.as_deref()))
                }
                _ => RepoError::Database(e),
            })?;

        Ok(result.rows_affected() > 0)
    }
}

/// Pick the conflict for the referencing table named by the FK constraint.
fn dependent_conflict(constraint: Option<&str>) -> Conflict {
    match constraint {
        Some(name) if name.starts_with("transactions_") => CATEGORY_HAS_TRANSACTIONS,
        _ => CATEGORY_HAS_BUDGETS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependent_conflict_by_constraint() {
        assert_eq!(
            dependent_conflict(Some("budgets_category_fkey")).code,
            "category_has_budgets"
        );
        assert_eq!(
            dependent_conflict(Some("transactions_category_fkey")).code,
            "category_has_transactions"
        );
        assert_eq!(dependent_conflict(None).code, "category_has_budgets");
    }

    #[test]
    fn test_category_serializes_type_field() {
        let category = Category {
            id: 3,
            user_id: 1,
            name: "Salary".to_string(),
            kind: EntryType::Income,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&category).unwrap();
        assert_eq!(json["type"], "income");
        assert_eq!(json["name"], "Salary");
    }
}
