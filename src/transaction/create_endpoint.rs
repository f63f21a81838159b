//! Defines the endpoint for recording a new transaction.

use axum::{
    Extension, Json,
    body::Bytes,
    extract::{OriginalUri, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    Error,
    auth::UserId,
    extract::parse_json_body,
    timestamp::{normalize_timestamp, now_timestamp},
    transaction::{
        Category, NewTransaction, Transaction, TransactionState, TransactionStore,
        TransactionType,
    },
};

/// The JSON body for creating a transaction.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionBody {
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: Category,
    pub amount: i64,
    pub is_fixed: bool,
    /// RFC 3339 timestamp, defaults to now.
    pub created_at: Option<String>,
    /// RFC 3339 timestamp.
    pub end_date: Option<String>,
}

/// A route handler for recording a transaction, responds with the stored transaction.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserId>,
    OriginalUri(uri): OriginalUri,
    body: Bytes,
) -> Response {
    match create_transaction(&state.store, &user_id, &body) {
        Ok(transaction) => Json(json!({ "ok": true, "data": transaction })).into_response(),
        Err(error) => error.into_problem_response(uri.path()),
    }
}

/// Validate `body` and store it as a new transaction owned by `user_id`.
///
/// # Errors
/// Returns [Error::InvalidRequest] if the body is not valid, or any error from the store.
pub fn create_transaction(
    store: &impl TransactionStore,
    user_id: &UserId,
    body: &[u8],
) -> Result<Transaction, Error> {
    let body: CreateTransactionBody = parse_json_body(body)?;

    if body.amount < 0 {
        return Err(Error::InvalidRequest("amount must be >= 0".to_owned()));
    }

    let created_at = match body.created_at {
        Some(text) => parse_body_timestamp("createdAt", &text)?,
        None => now_timestamp(),
    };
    let end_date = body
        .end_date
        .map(|text| parse_body_timestamp("endDate", &text))
        .transpose()?;

    store.create(
        user_id,
        NewTransaction {
            transaction_type: body.transaction_type,
            category: body.category,
            amount: body.amount,
            is_fixed: body.is_fixed,
            created_at,
            end_date,
        },
    )
}

fn parse_body_timestamp(name: &str, text: &str) -> Result<String, Error> {
    normalize_timestamp(text)
        .map_err(|_| Error::InvalidRequest(format!("{name} must be an RFC 3339 timestamp")))
}
