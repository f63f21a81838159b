//! Endpoints for reading and setting the monthly budget.

use axum::{
    Extension, Json,
    body::Bytes,
    extract::{FromRef, OriginalUri, State},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::{
    AppState, Error, auth::UserId, budget::ProfileStore, db::SQLiteStore,
    extract::parse_json_body,
};

/// The state needed to get or set the monthly budget.
#[derive(Debug, Clone)]
pub struct BudgetState {
    pub store: SQLiteStore,
}

impl FromRef<AppState> for BudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }
}

/// The monthly budget as sent to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetData {
    pub target_amount: i64,
}

/// Get the caller's monthly budget.
pub async fn get_budget_endpoint(
    State(state): State<BudgetState>,
    Extension(user_id): Extension<UserId>,
    OriginalUri(uri): OriginalUri,
) -> Response {
    match get_budget(&state.store, &user_id) {
        Ok(budget_data) => Json(json!({ "ok": true, "budgetData": budget_data })).into_response(),
        Err(error) => error.into_problem_response(uri.path()),
    }
}

/// Set the caller's monthly budget from a body like `{"targetAmount": 500000}`.
pub async fn put_budget_endpoint(
    State(state): State<BudgetState>,
    Extension(user_id): Extension<UserId>,
    OriginalUri(uri): OriginalUri,
    body: Bytes,
) -> Response {
    match set_budget(&state.store, &user_id, &body) {
        Ok(budget_data) => Json(json!({ "ok": true, "budgetData": budget_data })).into_response(),
        Err(error) => error.into_problem_response(uri.path()),
    }
}

pub fn get_budget(store: &impl ProfileStore, user_id: &UserId) -> Result<BudgetData, Error> {
    store
        .get_monthly_budget(user_id)
        .map(|target_amount| BudgetData { target_amount })
}

/// Validate `body` and store the new budget.
///
/// Fractional amounts are floored.
pub fn set_budget(
    store: &impl ProfileStore,
    user_id: &UserId,
    body: &[u8],
) -> Result<BudgetData, Error> {
    let target_amount = parse_target_amount(body)?;

    store
        .set_monthly_budget(user_id, target_amount)
        .map(|target_amount| BudgetData { target_amount })
}

fn parse_target_amount(body: &[u8]) -> Result<i64, Error> {
    let body: Value = parse_json_body(body)?;

    let Some(fields) = body.as_object() else {
        return Err(Error::InvalidRequest(
            "Request body must be an object".to_owned(),
        ));
    };

    let Some(target_amount) = fields.get("targetAmount").and_then(Value::as_f64) else {
        return Err(Error::InvalidRequest(
            "targetAmount must be a number".to_owned(),
        ));
    };

    if target_amount < 0.0 {
        return Err(Error::InvalidRequest(
            "targetAmount must be >= 0".to_owned(),
        ));
    }

    Ok(target_amount.floor() as i64)
}
