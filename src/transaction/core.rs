//! Core transaction types and their database representation.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::Error;

/// Database identifier for transactions.
pub type TransactionId = i64;

/// Whether money came in or went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    /// Income.
    #[serde(rename = "IN")]
    In,
    /// Expense.
    #[serde(rename = "OUT")]
    Out,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::In => "IN",
            TransactionType::Out => "OUT",
        }
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "IN" => Ok(TransactionType::In),
            "OUT" => Ok(TransactionType::Out),
            other => Err(Error::TypeMismatch(format!(
                "Invalid value for parameter 'type': {other}"
            ))),
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a transaction was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Food,
    Cafe,
    Transport,
    Housing,
    Shopping,
    Medical,
    Education,
    Leisure,
    Etc,
}

impl Category {
    /// Every category in display order.
    pub const ALL: [Category; 9] = [
        Category::Food,
        Category::Cafe,
        Category::Transport,
        Category::Housing,
        Category::Shopping,
        Category::Medical,
        Category::Education,
        Category::Leisure,
        Category::Etc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "FOOD",
            Category::Cafe => "CAFE",
            Category::Transport => "TRANSPORT",
            Category::Housing => "HOUSING",
            Category::Shopping => "SHOPPING",
            Category::Medical => "MEDICAL",
            Category::Education => "EDUCATION",
            Category::Leisure => "LEISURE",
            Category::Etc => "ETC",
        }
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == text)
            .ok_or_else(|| {
                Error::TypeMismatch(format!("Invalid value for parameter 'category': {text}"))
            })
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// An income or expense recorded by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: Category,
    /// Whole won, never negative.
    pub amount: i64,
    /// Whether the transaction recurs every month, e.g. rent.
    pub is_fixed: bool,
    pub created_at: String,
    pub updated_at: String,
    pub end_date: Option<String>,
}

/// The data needed to create a [Transaction].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub transaction_type: TransactionType,
    pub category: Category,
    pub amount: i64,
    pub is_fixed: bool,
    /// Timestamp in the storage format.
    pub created_at: String,
    /// Timestamp in the storage format.
    pub end_date: Option<String>,
}

/// The fields of a transaction that may be changed after creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionPatch {
    pub category: Option<Category>,
    pub amount: Option<i64>,
    pub is_fixed: Option<bool>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.amount.is_none() && self.is_fixed.is_none()
    }
}

/// Create the transaction table and the index used for paging.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            type TEXT NOT NULL CHECK (type IN ('IN', 'OUT')),
            category TEXT NOT NULL,
            amount INTEGER NOT NULL CHECK (amount >= 0),
            is_fixed INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            end_date TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_user_created_at
            ON \"transaction\"(user_id, created_at, id);",
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::{Category, TransactionType};

    #[test]
    fn parses_every_category() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>(), Ok(category));
        }
    }

    #[test]
    fn unknown_category_is_type_mismatch() {
        let result = "food".parse::<Category>();

        assert!(matches!(result, Err(Error::TypeMismatch(_))));
    }

    #[test]
    fn unknown_type_is_type_mismatch() {
        let result = "SIDEWAYS".parse::<TransactionType>();

        assert_eq!(
            result,
            Err(Error::TypeMismatch(
                "Invalid value for parameter 'type': SIDEWAYS".to_owned()
            ))
        );
    }

    #[test]
    fn serializes_with_wire_names() {
        let got = serde_json::to_string(&(TransactionType::Out, Category::Etc)).unwrap();

        assert_eq!(got, r#"["OUT","ETC"]"#);
    }
}
