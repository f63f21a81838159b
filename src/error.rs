//! Defines the app level error type and its conversion to problem details responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request did not carry a valid bearer token.
    #[error("{0}")]
    Unauthorized(String),

    /// The request was malformed, e.g. bad JSON, an out of range number or
    /// conflicting query parameters.
    #[error("{0}")]
    InvalidRequest(String),

    /// A parameter could not be parsed as one of the values of its closed set,
    /// e.g. a transaction type other than `IN` or `OUT`.
    #[error("{0}")]
    TypeMismatch(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("{0}")]
    NotFound(String),

    /// An unhandled/unexpected SQL error.
    #[error("{0}")]
    SqlError(rusqlite::Error),

    /// The user has no budget profile.
    ///
    /// Profiles are provisioned when the user signs up, so a missing profile
    /// on read is a server side inconsistency rather than a client error.
    #[error("Profile not found")]
    MissingProfile,

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => {
                Error::NotFound("the requested resource could not be found".to_owned())
            }
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

/// The error codes sent to clients in the `title` of a problem details body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unauthorized,
    InvalidRequest,
    TypeMismatch,
    NotFound,
    InternalServerError,
}

impl ErrorKind {
    /// The code as it appears on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::TypeMismatch => "TYPE_MISMATCH",
            Self::NotFound => "NOT_FOUND",
            Self::InternalServerError => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Each kind maps to exactly one HTTP status.
    pub fn status(self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::InvalidRequest | Self::TypeMismatch => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// The JSON body sent for every failed request.
#[derive(Debug, Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub problem_type: &'static str,
    pub title: &'static str,
    pub status: u16,
    pub detail: String,
    pub timestamp: String,
    pub path: String,
}

impl ProblemDetails {
    /// Create a problem for `kind` that occurred while serving `path`.
    pub fn new(kind: ErrorKind, detail: String, path: &str) -> Self {
        let timestamp = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default();

        Self {
            problem_type: "about:blank",
            title: kind.as_str(),
            status: kind.status().as_u16(),
            detail,
            timestamp,
            path: path.to_owned(),
        }
    }
}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(self)).into_response()
    }
}

impl Error {
    /// The error code reported to the client.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Unauthorized(_) => ErrorKind::Unauthorized,
            Error::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Error::TypeMismatch(_) => ErrorKind::TypeMismatch,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::SqlError(_)
            | Error::MissingProfile
            | Error::DatabaseLockError
            | Error::InvalidTimezoneError(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert the error into a problem details response for a request to `path`.
    ///
    /// Store errors are passed through verbatim in the `detail` field.
    pub fn into_problem_response(self, path: &str) -> Response {
        let kind = self.kind();

        if kind == ErrorKind::InternalServerError {
            tracing::error!("An unexpected error occurred while serving {path}: {self}");
        }

        ProblemDetails::new(kind, self.to_string(), path).into_response()
    }
}
