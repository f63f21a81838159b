//! The per-user profile that holds the monthly budget.

use rusqlite::Connection;

use crate::{Error, auth::UserId, db::SQLiteStore, timestamp::now_timestamp};

const PROFILE_NOT_FOUND: &str = "Profile not found";

/// Handles reading and writing a user's monthly budget.
pub trait ProfileStore {
    /// Create a profile for `user_id` if it does not exist yet.
    fn create_profile(&self, user_id: &UserId, monthly_budget: i64) -> Result<(), Error>;

    /// Get the user's monthly budget in whole won.
    ///
    /// # Errors
    /// Returns [Error::MissingProfile] if the user has no profile.
    fn get_monthly_budget(&self, user_id: &UserId) -> Result<i64, Error>;

    /// Set the user's monthly budget and return the stored value.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if the user has no profile.
    fn set_monthly_budget(&self, user_id: &UserId, monthly_budget: i64) -> Result<i64, Error>;
}

impl ProfileStore for SQLiteStore {
    fn create_profile(&self, user_id: &UserId, monthly_budget: i64) -> Result<(), Error> {
        let connection = self.lock()?;

        connection.execute(
            "INSERT INTO profile (user_id, monthly_budget, created_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(user_id) DO NOTHING",
            (user_id.as_str(), monthly_budget, now_timestamp()),
        )?;

        Ok(())
    }

    fn get_monthly_budget(&self, user_id: &UserId) -> Result<i64, Error> {
        let connection = self.lock()?;

        connection
            .prepare("SELECT monthly_budget FROM profile WHERE user_id = :user_id")?
            .query_row(&[(":user_id", user_id.as_str())], |row| row.get(0))
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => Error::MissingProfile,
                error => error.into(),
            })
    }

    fn set_monthly_budget(&self, user_id: &UserId, monthly_budget: i64) -> Result<i64, Error> {
        let connection = self.lock()?;

        let rows_affected = connection.execute(
            "UPDATE profile SET monthly_budget = ?1 WHERE user_id = ?2",
            (monthly_budget, user_id.as_str()),
        )?;

        if rows_affected == 0 {
            return Err(Error::NotFound(PROFILE_NOT_FOUND.to_owned()));
        }

        Ok(monthly_budget)
    }
}

/// Initialize the profile table.
pub fn create_profile_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS profile (
            user_id TEXT PRIMARY KEY,
            monthly_budget INTEGER NOT NULL DEFAULT 0 CHECK (monthly_budget >= 0),
            created_at TEXT NOT NULL
        );",
    )?;

    Ok(())
}
