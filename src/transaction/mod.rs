//! Transactions and the endpoints for recording, editing and listing them.
//!
//! This module contains:
//! - The [Transaction] model and its [TransactionType] and [Category] enums
//! - The [TransactionStore] trait and its SQLite implementation
//! - Opaque cursors for paging through transactions
//! - The route handlers for the transaction endpoints

mod core;
mod create_endpoint;
mod cursor;
mod db;
mod item_endpoint;
mod list;
mod store;

use axum::extract::FromRef;

use crate::{AppState, db::SQLiteStore, pagination::PaginationConfig};

pub use core::{
    Category, NewTransaction, Transaction, TransactionId, TransactionPatch, TransactionType,
    create_transaction_table,
};
pub use create_endpoint::create_transaction_endpoint;
pub use cursor::Cursor;
pub use item_endpoint::{get_transaction_endpoint, patch_transaction_endpoint};
pub use list::get_transactions_endpoint;
pub use store::{SortOrder, TransactionFilter, TransactionStore, TransactionSummary};

/// The state needed by the transaction endpoints.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The store for the caller's transactions.
    pub store: SQLiteStore,
    /// The config that controls the size of pages of transactions.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}
