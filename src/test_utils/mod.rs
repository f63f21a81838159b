#![allow(missing_docs)]

use axum_test::TestServer;
use jsonwebtoken::EncodingKey;
use rusqlite::Connection;
use time::Duration;

use crate::{
    AppState,
    auth::{UserId, encode_token},
    build_router,
    db::SQLiteStore,
    pagination::PaginationConfig,
    timestamp::normalize_timestamp,
    transaction::{Category, NewTransaction, Transaction, TransactionStore, TransactionType},
};

pub(crate) const TEST_JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hs256";

/// App state backed by an in-memory database in Asia/Seoul.
pub(crate) fn get_test_state() -> AppState {
    let connection = Connection::open_in_memory().expect("Could not open in-memory database");

    AppState::new(
        connection,
        TEST_JWT_SECRET,
        "Asia/Seoul",
        PaginationConfig::default(),
    )
    .expect("Could not create app state")
}

pub(crate) fn get_test_server(state: AppState) -> TestServer {
    TestServer::try_new(build_router(state)).expect("Could not create test server.")
}

/// A token for `user_id` signed with [TEST_JWT_SECRET] that expires in an hour.
pub(crate) fn bearer_token(user_id: &UserId) -> String {
    encode_token(
        user_id,
        Duration::hours(1),
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("Could not encode token")
}

/// Store a transaction created at `created_at`, an RFC 3339 timestamp.
pub(crate) fn create_test_transaction(
    store: &SQLiteStore,
    user_id: &UserId,
    transaction_type: TransactionType,
    category: Category,
    amount: i64,
    created_at: &str,
) -> Transaction {
    store
        .create(
            user_id,
            NewTransaction {
                transaction_type,
                category,
                amount,
                is_fixed: false,
                created_at: normalize_timestamp(created_at).expect("Invalid test timestamp"),
                end_date: None,
            },
        )
        .expect("Could not create test transaction")
}
