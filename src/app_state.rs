//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use jsonwebtoken::DecodingKey;
use rusqlite::Connection;

use crate::{
    budget::MainCardThresholds, db::SQLiteStore, db::initialize, pagination::PaginationConfig,
};

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState {
    /// The store for profiles and transactions.
    pub store: SQLiteStore,

    /// The key used to verify bearer tokens.
    pub jwt_decoding_key: DecodingKey,

    /// The local timezone as a canonical timezone name, e.g. "Asia/Seoul".
    ///
    /// Months and "today" are resolved in this timezone.
    pub local_timezone: String,

    /// The config that controls the size of pages of transactions.
    pub pagination_config: PaginationConfig,

    /// The percentages used to pick the main card status.
    pub main_card_thresholds: MainCardThresholds,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// `jwt_secret` is the shared secret the identity provider signs tokens with.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Asia/Seoul".
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        jwt_secret: &str,
        local_timezone: &str,
        pagination_config: PaginationConfig,
    ) -> Result<Self, rusqlite::Error> {
        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));

        Ok(Self {
            store: SQLiteStore::new(connection),
            jwt_decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            local_timezone: local_timezone.to_owned(),
            pagination_config,
            main_card_thresholds: MainCardThresholds::default(),
        })
    }

    /// Replace the default main card thresholds.
    pub fn with_main_card_thresholds(mut self, thresholds: MainCardThresholds) -> Self {
        self.main_card_thresholds = thresholds;
        self
    }
}
