//! Budget categories API endpoints.

use api_types::{
    budget::BudgetView,
    category::{CategoryNew, CategoryUpdate},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::CategoryPatch;
use uuid::Uuid;

use crate::{
    ServerError,
    budgets::budget_view,
    server::{Caller, ServerState},
};

pub async fn create(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Path(budget_id): Path<Uuid>,
    Json(payload): Json<CategoryNew>,
) -> Result<(StatusCode, Json<BudgetView>), ServerError> {
    let budget = state
        .engine
        .add_category(&caller.0, budget_id, &payload.name, payload.limit_minor)
        .await?;
    Ok((StatusCode::CREATED, Json(budget_view(budget))))
}

pub async fn update(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Path((budget_id, category_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<CategoryUpdate>,
) -> Result<Json<BudgetView>, ServerError> {
    if payload.name.is_none() && payload.limit_minor.is_none() {
        return Err(ServerError::Generic(
            "provide at least one of name or limit_minor".to_string(),
        ));
    }

    let patch = CategoryPatch {
        name: payload.name,
        limit_minor: payload.limit_minor,
    };
    let budget = state
        .engine
        .update_category(&caller.0, budget_id, category_id, patch)
        .await?;
    Ok(Json(budget_view(budget)))
}

pub async fn delete(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Path((budget_id, category_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_category(&caller.0, budget_id, category_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
