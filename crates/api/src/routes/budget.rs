//! Budget routes (admin only).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::budget::{BudgetResponse, CreateBudgetItemRequest};
use domain::models::{BudgetItem, BudgetSummary};
use persistence::repositories::BudgetRepository;
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::middleware::AdminSession;

/// Budget items with income, expense and balance totals.
///
/// GET /api/admin/budget
pub async fn list_budget(
    State(state): State<AppState>,
    _session: AdminSession,
) -> Result<Json<BudgetResponse>, ApiError> {
    let repo = BudgetRepository::new(state.pool.clone());
    let items: Vec<BudgetItem> = repo.list().await?.into_iter().map(BudgetItem::from).collect();
    let summary = BudgetSummary::from_items(&items);
    Ok(Json(BudgetResponse { items, summary }))
}

/// POST /api/admin/budget
pub async fn create_budget_item(
    State(state): State<AppState>,
    session: AdminSession,
    ValidatedJson(request): ValidatedJson<CreateBudgetItemRequest>,
) -> Result<(StatusCode, Json<BudgetItem>), ApiError> {
    let repo = BudgetRepository::new(state.pool.clone());
    let item = repo
        .create(
            &Uuid::new_v4().to_string(),
            request.label.trim(),
            request.amount,
            request.kind,
            request.event_id.as_deref(),
        )
        .await?;

    info!(
        item_id = %item.id,
        amount = item.amount,
        session = %session.jti,
        "Budget item added"
    );
    Ok((StatusCode::CREATED, Json(item.into())))
}

/// DELETE /api/admin/budget/:id
pub async fn delete_budget_item(
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let repo = BudgetRepository::new(state.pool.clone());
    if repo.delete(&id).await? == 0 {
        return Err(ApiError::NotFound("Budget item not found".into()));
    }

    info!(item_id = %id, session = %session.jti, "Budget item deleted");
    Ok(StatusCode::NO_CONTENT)
}
