//! Budget line items for the admin dashboard.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Whether a line item brings money in or out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetKind {
    Income,
    Expense,
}

impl BudgetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::fmt::Display for BudgetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BudgetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(format!("Unknown budget kind: {}", other)),
        }
    }
}

/// A budget line item. `amount` is always positive; `kind` gives the sign.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetItem {
    pub id: String,
    pub label: String,
    pub amount: i64,
    pub kind: BudgetKind,
    pub event_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl BudgetItem {
    /// Amount with the sign implied by the kind.
    pub fn signed_amount(&self) -> i64 {
        match self.kind {
            BudgetKind::Income => self.amount,
            BudgetKind::Expense => -self.amount,
        }
    }
}

/// Request payload for adding a budget item.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBudgetItemRequest {
    #[validate(length(min = 1, max = 200, message = "Label must be between 1 and 200 characters"))]
    pub label: String,

    #[validate(range(min = 1, max = 100000000, message = "Amount must be positive"))]
    pub amount: i64,

    pub kind: BudgetKind,

    pub event_id: Option<String>,
}

/// Totals over all budget items, in CZK.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    pub income: i64,
    pub expense: i64,
    pub balance: i64,
}

impl BudgetSummary {
    pub fn from_items(items: &[BudgetItem]) -> Self {
        let (income, expense) = items.iter().fold((0, 0), |(inc, exp), item| match item.kind {
            BudgetKind::Income => (inc + item.amount, exp),
            BudgetKind::Expense => (inc, exp + item.amount),
        });
        Self {
            income,
            expense,
            balance: income - expense,
        }
    }
}

/// Budget listing with totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetResponse {
    pub items: Vec<BudgetItem>,
    pub summary: BudgetSummary,
}
