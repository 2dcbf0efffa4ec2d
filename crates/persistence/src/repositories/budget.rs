//! Budget repository.

use sqlx::PgPool;

use domain::models::BudgetKind;

use crate::entities::{BudgetItemEntity, BudgetKindDb};
use crate::metrics::QueryTimer;

/// Repository for budget line items.
#[derive(Clone)]
pub struct BudgetRepository {
    pool: PgPool,
}

impl BudgetRepository {
    /// Creates a new BudgetRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all budget items, newest first.
    pub async fn list(&self) -> Result<Vec<BudgetItemEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_budget_items");
        let result = sqlx::query_as::<_, BudgetItemEntity>(
            r#"
            SELECT id, label, amount, kind, event_id, created_at
            FROM budget_items
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Add a budget item.
    pub async fn create(
        &self,
        id: &str,
        label: &str,
        amount: i64,
        kind: BudgetKind,
        event_id: Option<&str>,
    ) -> Result<BudgetItemEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_budget_item");
        let result = sqlx::query_as::<_, BudgetItemEntity>(
            r#"
            INSERT INTO budget_items (id, label, amount, kind, event_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, label, amount, kind, event_id, created_at
            "#,
        )
        .bind(id)
        .bind(label)
        .bind(amount)
        .bind(BudgetKindDb::from(kind))
        .bind(event_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a budget item. Returns the number of rows deleted (0 or 1).
    pub async fn delete(&self, id: &str) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_budget_item");
        let result = sqlx::query("DELETE FROM budget_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
