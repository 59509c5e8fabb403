//! Budgets API endpoints.

use api_types::{
    budget::{BudgetCreated, BudgetListResponse, BudgetNew, BudgetUpdate, BudgetView},
    category::CategoryView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{Budget, BudgetPatch, BudgetWindow, format_date};
use uuid::Uuid;

use crate::{
    ServerError,
    server::{Caller, ServerState},
};

pub(crate) fn budget_view(budget: Budget) -> BudgetView {
    BudgetView {
        id: budget.id,
        name: budget.name,
        limit_minor: budget.limit.cents(),
        start: format_date(budget.valid_from),
        end: format_date(budget.valid_until),
        categories: budget
            .categories
            .into_iter()
            .map(|c| CategoryView {
                id: c.id,
                name: c.name,
                limit_minor: c.limit.cents(),
            })
            .collect(),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

/// Pick the window form. Only presence is checked here: the token and the
/// dates are passed through for the engine to validate.
fn budget_window(payload: &BudgetNew) -> Result<BudgetWindow, ServerError> {
    let period = non_empty(payload.period.as_deref());
    let start = non_empty(payload.start.as_deref());
    let end = non_empty(payload.end.as_deref());

    match (period, start, end) {
        (Some(period), None, None) => Ok(BudgetWindow::period(period)),
        (None, Some(start), Some(end)) => Ok(BudgetWindow::dates(start, end)),
        (None, None, None) => Err(ServerError::Generic(
            "missing arguments: provide period or start and end".to_string(),
        )),
        (Some(_), _, _) => Err(ServerError::Generic(
            "provide either period or start and end, not both".to_string(),
        )),
        (None, _, _) => Err(ServerError::Generic(
            "missing arguments: start and end are both required".to_string(),
        )),
    }
}

pub async fn create(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Json(payload): Json<BudgetNew>,
) -> Result<(StatusCode, Json<BudgetCreated>), ServerError> {
    let window = budget_window(&payload)?;
    let id = state
        .engine
        .create_budget(&caller.0, &payload.name, payload.limit_minor, window)
        .await?;

    Ok((StatusCode::CREATED, Json(BudgetCreated { id })))
}

pub async fn list(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
) -> Result<Json<BudgetListResponse>, ServerError> {
    let budgets = state.engine.budgets(&caller.0).await?;
    Ok(Json(BudgetListResponse {
        budgets: budgets.into_iter().map(budget_view).collect(),
    }))
}

pub async fn get(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Path(budget_id): Path<Uuid>,
) -> Result<Json<BudgetView>, ServerError> {
    let budget = state.engine.budget(&caller.0, budget_id).await?;
    Ok(Json(budget_view(budget)))
}

pub async fn update(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Path(budget_id): Path<Uuid>,
    Json(payload): Json<BudgetUpdate>,
) -> Result<Json<BudgetView>, ServerError> {
    if payload.name.is_none()
        && payload.limit_minor.is_none()
        && payload.start.is_none()
        && payload.end.is_none()
    {
        return Err(ServerError::Generic("no new updates".to_string()));
    }

    let patch = BudgetPatch {
        name: payload.name,
        limit_minor: payload.limit_minor,
        start: payload.start,
        end: payload.end,
    };
    let budget = state
        .engine
        .update_budget(&caller.0, budget_id, patch)
        .await?;
    Ok(Json(budget_view(budget)))
}

pub async fn delete(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Path(budget_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_budget(&caller.0, budget_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(period: Option<&str>, start: Option<&str>, end: Option<&str>) -> BudgetNew {
        BudgetNew {
            name: "Food".to_string(),
            limit_minor: 100,
            period: period.map(ToString::to_string),
            start: start.map(ToString::to_string),
            end: end.map(ToString::to_string),
        }
    }

    #[test]
    fn window_forms_are_exclusive() {
        assert!(matches!(
            budget_window(&payload(Some("week"), None, None)),
            Ok(BudgetWindow::Period(ref token)) if token == "week"
        ));
        assert!(matches!(
            budget_window(&payload(None, Some("2024-01-01"), Some("2024-01-10"))),
            Ok(BudgetWindow::Dates { .. })
        ));
        assert!(matches!(
            budget_window(&payload(None, None, None)),
            Err(ServerError::Generic(_))
        ));
        assert!(matches!(
            budget_window(&payload(Some("week"), Some("2024-01-01"), None)),
            Err(ServerError::Generic(_))
        ));
        assert!(matches!(
            budget_window(&payload(None, Some("2024-01-01"), Some(" "))),
            Err(ServerError::Generic(_))
        ));
        assert!(matches!(
            budget_window(&payload(Some("decade"), None, None)),
            Ok(BudgetWindow::Period(ref token)) if token == "decade"
        ));
    }
}
