//! Parsing of query strings, JSON bodies and path parameters into typed values.
//!
//! Handlers take the raw request parts and parse them with these functions so
//! that every rejection is reported as a problem details response.

use serde::de::DeserializeOwned;
use serde_json::error::Category as JsonErrorCategory;

use crate::Error;

/// Parse the raw query string of a request.
///
/// # Errors
/// Returns [Error::InvalidRequest] if the query string cannot be deserialized as `T`.
pub fn parse_query<T: DeserializeOwned>(raw_query: Option<&str>) -> Result<T, Error> {
    serde_urlencoded::from_str(raw_query.unwrap_or_default())
        .map_err(|error| Error::InvalidRequest(format!("Invalid query string: {error}")))
}

/// Parse a JSON request body.
///
/// # Errors
/// Returns [Error::InvalidRequest] with the message "Invalid JSON body" if
/// `body` is not JSON, or with the deserializer's message if the JSON does
/// not have the shape of `T`.
pub fn parse_json_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, Error> {
    serde_json::from_slice(body).map_err(|error| match error.classify() {
        JsonErrorCategory::Data => Error::InvalidRequest(error.to_string()),
        JsonErrorCategory::Syntax | JsonErrorCategory::Eof | JsonErrorCategory::Io => {
            Error::InvalidRequest("Invalid JSON body".to_owned())
        }
    })
}

/// Parse a database ID from a path segment. IDs are positive integers.
///
/// # Errors
/// Returns [Error::InvalidRequest] with `message` if `text` is not a positive integer.
pub fn parse_id(text: &str, message: &str) -> Result<i64, Error> {
    match text.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(Error::InvalidRequest(message.to_owned())),
    }
}

/// Parse an optional boolean query parameter.
///
/// Only "true" and "false" are recognised, anything else is treated as absent.
pub fn parse_flag(value: Option<&str>) -> Option<bool> {
    match value {
        Some("true") => Some(true),
        Some("false") => Some(false),
        _ => None,
    }
}
