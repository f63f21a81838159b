//! Defines the transaction store trait.

use serde::Serialize;

use crate::{
    Error,
    auth::UserId,
    month::MonthRange,
    transaction::{
        Category, Cursor, NewTransaction, Transaction, TransactionId, TransactionPatch,
        TransactionType,
    },
};

/// Handles the creation, update and retrieval of a user's transactions.
///
/// Every method is scoped to the transactions owned by `user_id`.
pub trait TransactionStore {
    /// Create a new transaction in the store.
    fn create(&self, user_id: &UserId, transaction: NewTransaction) -> Result<Transaction, Error>;

    /// Retrieve a transaction from the store.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if `user_id` has no transaction with the ID `id`.
    fn get(&self, user_id: &UserId, id: TransactionId) -> Result<Transaction, Error>;

    /// Apply `patch` to a transaction and set its update time to `updated_at`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if `user_id` has no transaction with the ID `id`.
    fn update(
        &self,
        user_id: &UserId,
        id: TransactionId,
        patch: &TransactionPatch,
        updated_at: &str,
    ) -> Result<Transaction, Error>;

    /// Retrieve up to `limit` transactions matching `filter`, ordered by
    /// creation time then ID in the direction `sort`, starting strictly after
    /// `cursor`.
    fn query_page(
        &self,
        user_id: &UserId,
        filter: &TransactionFilter,
        sort: SortOrder,
        cursor: Option<&Cursor>,
        limit: u64,
    ) -> Result<Vec<Transaction>, Error>;

    /// Total income and expense over every transaction matching `filter`.
    fn summarize(
        &self,
        user_id: &UserId,
        filter: &TransactionFilter,
    ) -> Result<TransactionSummary, Error>;

    /// The sum of the amounts of transactions of `transaction_type` in `range`.
    fn total_amount(
        &self,
        user_id: &UserId,
        transaction_type: TransactionType,
        range: &MonthRange,
    ) -> Result<i64, Error>;

    /// The sum of the amounts of transactions of `transaction_type` in `range`
    /// per category. Categories without transactions are omitted.
    fn totals_by_category(
        &self,
        user_id: &UserId,
        transaction_type: TransactionType,
        range: &MonthRange,
    ) -> Result<Vec<(Category, i64)>, Error>;
}

/// Conditions that every selected transaction must meet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub transaction_type: Option<TransactionType>,
    pub is_fixed: Option<bool>,
    /// Matches any of the listed categories. Empty matches every category.
    pub categories: Vec<Category>,
    /// Inclusive lower bound on the creation time, in the storage format.
    pub from: Option<String>,
    /// Inclusive upper bound on the creation time, in the storage format.
    pub to: Option<String>,
}

/// The order to sort transactions in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Oldest first.
    Ascending,
    /// Newest first.
    #[default]
    Descending,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}

/// Totals over a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    pub total_income: i64,
    pub total_expense: i64,
}
