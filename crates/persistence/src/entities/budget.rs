//! Budget item entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::{BudgetItem, BudgetKind};

/// Database enum for budget_kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "budget_kind", rename_all = "lowercase")]
pub enum BudgetKindDb {
    Income,
    Expense,
}

impl From<BudgetKindDb> for BudgetKind {
    fn from(db: BudgetKindDb) -> Self {
        match db {
            BudgetKindDb::Income => BudgetKind::Income,
            BudgetKindDb::Expense => BudgetKind::Expense,
        }
    }
}

impl From<BudgetKind> for BudgetKindDb {
    fn from(kind: BudgetKind) -> Self {
        match kind {
            BudgetKind::Income => BudgetKindDb::Income,
            BudgetKind::Expense => BudgetKindDb::Expense,
        }
    }
}

/// Database row mapping for the budget_items table.
#[derive(Debug, Clone, FromRow)]
pub struct BudgetItemEntity {
    pub id: String,
    pub label: String,
    pub amount: i64,
    pub kind: BudgetKindDb,
    pub event_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<BudgetItemEntity> for BudgetItem {
    fn from(entity: BudgetItemEntity) -> Self {
        Self {
            id: entity.id,
            label: entity.label,
            amount: entity.amount,
            kind: entity.kind.into(),
            event_id: entity.event_id,
            created_at: entity.created_at,
        }
    }
}
