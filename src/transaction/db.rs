//! Implements the transaction store for the SQLite database.

use rusqlite::{Row, params_from_iter, types::Value};

use crate::{
    Error,
    auth::UserId,
    db::SQLiteStore,
    month::MonthRange,
    timestamp::format_timestamp,
    transaction::{
        Category, Cursor, NewTransaction, SortOrder, Transaction, TransactionFilter,
        TransactionId, TransactionPatch, TransactionStore, TransactionSummary, TransactionType,
    },
};

const COLUMNS: &str =
    "id, type, category, amount, is_fixed, created_at, updated_at, end_date";

const TRANSACTION_NOT_FOUND: &str = "Transaction not found";

impl TransactionStore for SQLiteStore {
    fn create(&self, user_id: &UserId, transaction: NewTransaction) -> Result<Transaction, Error> {
        let connection = self.lock()?;

        connection
            .prepare(&format!(
                "INSERT INTO \"transaction\" \
                (user_id, type, category, amount, is_fixed, created_at, updated_at, end_date) \
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6, ?7) \
                RETURNING {COLUMNS}"
            ))?
            .query_row(
                (
                    user_id.as_str(),
                    transaction.transaction_type,
                    transaction.category,
                    transaction.amount,
                    transaction.is_fixed,
                    &transaction.created_at,
                    &transaction.end_date,
                ),
                map_row,
            )
            .map_err(Error::from)
    }

    fn get(&self, user_id: &UserId, id: TransactionId) -> Result<Transaction, Error> {
        let connection = self.lock()?;

        connection
            .prepare(&format!(
                "SELECT {COLUMNS} FROM \"transaction\" WHERE id = ?1 AND user_id = ?2"
            ))?
            .query_row((id, user_id.as_str()), map_row)
            .map_err(not_found_as_missing_transaction)
    }

    fn update(
        &self,
        user_id: &UserId,
        id: TransactionId,
        patch: &TransactionPatch,
        updated_at: &str,
    ) -> Result<Transaction, Error> {
        let mut set_clause_parts = vec![];
        let mut query_parameters = vec![];

        if let Some(category) = patch.category {
            query_parameters.push(Value::Text(category.as_str().to_owned()));
            set_clause_parts.push(format!("category = ?{}", query_parameters.len()));
        }

        if let Some(amount) = patch.amount {
            query_parameters.push(Value::Integer(amount));
            set_clause_parts.push(format!("amount = ?{}", query_parameters.len()));
        }

        if let Some(is_fixed) = patch.is_fixed {
            query_parameters.push(Value::Integer(i64::from(is_fixed)));
            set_clause_parts.push(format!("is_fixed = ?{}", query_parameters.len()));
        }

        query_parameters.push(Value::Text(updated_at.to_owned()));
        set_clause_parts.push(format!("updated_at = ?{}", query_parameters.len()));

        query_parameters.push(Value::Integer(id));
        let id_index = query_parameters.len();
        query_parameters.push(Value::Text(user_id.as_str().to_owned()));
        let user_id_index = query_parameters.len();

        let query_string = format!(
            "UPDATE \"transaction\" SET {} WHERE id = ?{id_index} AND user_id = ?{user_id_index} \
            RETURNING {COLUMNS}",
            set_clause_parts.join(", ")
        );

        let connection = self.lock()?;

        connection
            .prepare(&query_string)?
            .query_row(params_from_iter(query_parameters.iter()), map_row)
            .map_err(not_found_as_missing_transaction)
    }

    fn query_page(
        &self,
        user_id: &UserId,
        filter: &TransactionFilter,
        sort: SortOrder,
        cursor: Option<&Cursor>,
        limit: u64,
    ) -> Result<Vec<Transaction>, Error> {
        let (mut where_clause_parts, mut query_parameters) = build_filter(user_id, filter);

        if let Some(cursor) = cursor {
            let comparison = match sort {
                SortOrder::Ascending => ">",
                SortOrder::Descending => "<",
            };

            query_parameters.push(Value::Text(cursor.last_created_at.clone()));
            let created_at_index = query_parameters.len();
            query_parameters.push(Value::Integer(cursor.last_id));
            let id_index = query_parameters.len();

            where_clause_parts.push(format!(
                "(created_at {comparison} ?{created_at_index} \
                OR (created_at = ?{created_at_index} AND id {comparison} ?{id_index}))"
            ));
        }

        let direction = sort.as_sql();
        let query_string = format!(
            "SELECT {COLUMNS} FROM \"transaction\" WHERE {} \
            ORDER BY created_at {direction}, id {direction} LIMIT {limit}",
            where_clause_parts.join(" AND ")
        );

        let connection = self.lock()?;

        connection
            .prepare(&query_string)?
            .query_map(params_from_iter(query_parameters.iter()), map_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
            .collect()
    }

    fn summarize(
        &self,
        user_id: &UserId,
        filter: &TransactionFilter,
    ) -> Result<TransactionSummary, Error> {
        let (where_clause_parts, query_parameters) = build_filter(user_id, filter);

        let query_string = format!(
            "SELECT \
                COALESCE(SUM(CASE WHEN type = 'IN' THEN amount ELSE 0 END), 0), \
                COALESCE(SUM(CASE WHEN type = 'OUT' THEN amount ELSE 0 END), 0) \
            FROM \"transaction\" WHERE {}",
            where_clause_parts.join(" AND ")
        );

        let connection = self.lock()?;

        connection
            .prepare(&query_string)?
            .query_row(params_from_iter(query_parameters.iter()), |row| {
                Ok(TransactionSummary {
                    total_income: row.get(0)?,
                    total_expense: row.get(1)?,
                })
            })
            .map_err(Error::from)
    }

    fn total_amount(
        &self,
        user_id: &UserId,
        transaction_type: TransactionType,
        range: &MonthRange,
    ) -> Result<i64, Error> {
        let connection = self.lock()?;

        connection
            .prepare(
                "SELECT COALESCE(SUM(amount), 0) FROM \"transaction\" \
                WHERE user_id = ?1 AND type = ?2 AND created_at >= ?3 AND created_at < ?4",
            )?
            .query_row(
                (
                    user_id.as_str(),
                    transaction_type,
                    format_timestamp(range.start),
                    format_timestamp(range.end),
                ),
                |row| row.get(0),
            )
            .map_err(Error::from)
    }

    fn totals_by_category(
        &self,
        user_id: &UserId,
        transaction_type: TransactionType,
        range: &MonthRange,
    ) -> Result<Vec<(Category, i64)>, Error> {
        let connection = self.lock()?;

        connection
            .prepare(
                "SELECT category, SUM(amount) FROM \"transaction\" \
                WHERE user_id = ?1 AND type = ?2 AND created_at >= ?3 AND created_at < ?4 \
                GROUP BY category",
            )?
            .query_map(
                (
                    user_id.as_str(),
                    transaction_type,
                    format_timestamp(range.start),
                    format_timestamp(range.end),
                ),
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?
            .map(|maybe_total| maybe_total.map_err(Error::from))
            .collect()
    }
}

/// Build the WHERE clause conditions and their parameters for `filter`.
///
/// The first condition always restricts rows to `user_id`.
fn build_filter(user_id: &UserId, filter: &TransactionFilter) -> (Vec<String>, Vec<Value>) {
    let mut where_clause_parts = vec!["user_id = ?1".to_owned()];
    let mut query_parameters = vec![Value::Text(user_id.as_str().to_owned())];

    if let Some(transaction_type) = filter.transaction_type {
        query_parameters.push(Value::Text(transaction_type.as_str().to_owned()));
        where_clause_parts.push(format!("type = ?{}", query_parameters.len()));
    }

    if let Some(is_fixed) = filter.is_fixed {
        query_parameters.push(Value::Integer(i64::from(is_fixed)));
        where_clause_parts.push(format!("is_fixed = ?{}", query_parameters.len()));
    }

    if !filter.categories.is_empty() {
        let placeholders: Vec<String> = filter
            .categories
            .iter()
            .map(|category| {
                query_parameters.push(Value::Text(category.as_str().to_owned()));
                format!("?{}", query_parameters.len())
            })
            .collect();

        where_clause_parts.push(format!("category IN ({})", placeholders.join(", ")));
    }

    if let Some(from) = &filter.from {
        query_parameters.push(Value::Text(from.clone()));
        where_clause_parts.push(format!("created_at >= ?{}", query_parameters.len()));
    }

    if let Some(to) = &filter.to {
        query_parameters.push(Value::Text(to.clone()));
        where_clause_parts.push(format!("created_at <= ?{}", query_parameters.len()));
    }

    (where_clause_parts, query_parameters)
}

fn map_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        transaction_type: row.get(1)?,
        category: row.get(2)?,
        amount: row.get(3)?,
        is_fixed: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
        end_date: row.get(7)?,
    })
}

fn not_found_as_missing_transaction(error: rusqlite::Error) -> Error {
    match error {
        rusqlite::Error::QueryReturnedNoRows => Error::NotFound(TRANSACTION_NOT_FOUND.to_owned()),
        error => error.into(),
    }
}
