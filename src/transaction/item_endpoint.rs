//! Endpoints for reading and editing a single transaction.

use axum::{
    Extension, Json,
    body::Bytes,
    extract::{OriginalUri, Path, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    Error,
    auth::UserId,
    extract::{parse_id, parse_json_body},
    timestamp::now_timestamp,
    transaction::{
        Category, Transaction, TransactionId, TransactionPatch, TransactionState,
        TransactionStore,
    },
};

const INVALID_TRANSACTION_ID: &str = "Invalid transaction id";

/// The JSON body for editing a transaction. Unknown fields are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchTransactionBody {
    pub category: Option<Category>,
    pub amount: Option<i64>,
    pub is_fixed: Option<bool>,
}

/// Get one of the caller's transactions.
pub async fn get_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserId>,
    OriginalUri(uri): OriginalUri,
    Path(transaction_id): Path<String>,
) -> Response {
    let result = parse_id(&transaction_id, INVALID_TRANSACTION_ID)
        .and_then(|id| state.store.get(&user_id, id));

    match result {
        Ok(transaction) => Json(json!({ "ok": true, "data": transaction })).into_response(),
        Err(error) => error.into_problem_response(uri.path()),
    }
}

/// Change the category, amount or fixed flag of one of the caller's transactions.
pub async fn patch_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserId>,
    OriginalUri(uri): OriginalUri,
    Path(transaction_id): Path<String>,
    body: Bytes,
) -> Response {
    let result = parse_id(&transaction_id, INVALID_TRANSACTION_ID)
        .and_then(|id| update_transaction(&state.store, &user_id, id, &body));

    match result {
        Ok(transaction) => Json(json!({ "ok": true, "data": transaction })).into_response(),
        Err(error) => error.into_problem_response(uri.path()),
    }
}

/// Validate `body` and apply it to the transaction `id`.
///
/// # Errors
/// Returns [Error::InvalidRequest] if the body is invalid or sets no fields,
/// [Error::NotFound] if `user_id` has no transaction `id`, or any other store error.
pub fn update_transaction(
    store: &impl TransactionStore,
    user_id: &UserId,
    id: TransactionId,
    body: &[u8],
) -> Result<Transaction, Error> {
    let body: PatchTransactionBody = parse_json_body(body)?;

    if body.amount.is_some_and(|amount| amount < 0) {
        return Err(Error::InvalidRequest("amount must be >= 0".to_owned()));
    }

    let patch = TransactionPatch {
        category: body.category,
        amount: body.amount,
        is_fixed: body.is_fixed,
    };

    if patch.is_empty() {
        return Err(Error::InvalidRequest(
            "At least one field must be provided".to_owned(),
        ));
    }

    store.update(user_id, id, &patch, &now_timestamp())
}
