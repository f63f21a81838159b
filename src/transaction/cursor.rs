//! The opaque cursor used to page through transactions.

use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    timestamp::normalize_timestamp,
    transaction::{Transaction, TransactionId},
};

const INVALID_CURSOR_MESSAGE: &str = "Invalid cursor format";

/// The position of the last transaction on a page.
///
/// On the wire a cursor is base64 encoded JSON, e.g.
/// `{"lastId":42,"lastCreatedAt":"2026-02-03T05:00:00.000000+00:00"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cursor {
    pub last_id: TransactionId,
    /// Timestamp in the storage format.
    pub last_created_at: String,
}

impl Cursor {
    /// The cursor pointing just after `transaction`.
    pub fn after(transaction: &Transaction) -> Self {
        Self {
            last_id: transaction.id,
            last_created_at: transaction.created_at.clone(),
        }
    }

    pub fn encode(&self) -> String {
        // Serializing a struct of an integer and a string cannot fail.
        let json = serde_json::to_vec(self).unwrap_or_default();

        B64.encode(json)
    }

    /// Decode a cursor sent by a client.
    ///
    /// # Errors
    /// Returns [Error::InvalidRequest] if `text` is not base64, does not hold
    /// the expected JSON object, has a non-positive `lastId` or has a
    /// `lastCreatedAt` that is not a timestamp.
    pub fn decode(text: &str) -> Result<Self, Error> {
        let invalid = |reason: String| {
            tracing::debug!("Rejected cursor {text:?}: {reason}");
            Error::InvalidRequest(INVALID_CURSOR_MESSAGE.to_owned())
        };

        let bytes = B64.decode(text).map_err(|error| invalid(error.to_string()))?;
        let cursor: Cursor =
            serde_json::from_slice(&bytes).map_err(|error| invalid(error.to_string()))?;

        if cursor.last_id <= 0 {
            return Err(invalid(format!("non-positive id {}", cursor.last_id)));
        }

        let last_created_at = normalize_timestamp(&cursor.last_created_at)
            .map_err(|error| invalid(error.to_string()))?;

        Ok(Self {
            last_id: cursor.last_id,
            last_created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use base64::{Engine as _, engine::general_purpose::STANDARD as B64};

    use crate::Error;

    use super::Cursor;

    fn invalid_cursor() -> Result<Cursor, Error> {
        Err(Error::InvalidRequest("Invalid cursor format".to_owned()))
    }

    #[test]
    fn decodes_what_it_encodes() {
        let cursor = Cursor {
            last_id: 42,
            last_created_at: "2026-02-03T05:00:00.000000+00:00".to_owned(),
        };

        assert_eq!(Cursor::decode(&cursor.encode()), Ok(cursor));
    }

    #[test]
    fn wire_format_is_base64_json() {
        let cursor = Cursor {
            last_id: 7,
            last_created_at: "2026-02-03T05:00:00.000000+00:00".to_owned(),
        };

        let json = B64.decode(cursor.encode()).unwrap();

        assert_eq!(
            String::from_utf8(json).unwrap(),
            r#"{"lastId":7,"lastCreatedAt":"2026-02-03T05:00:00.000000+00:00"}"#
        );
    }

    #[test]
    fn normalizes_client_timestamps() {
        let text = B64.encode(r#"{"lastId":3,"lastCreatedAt":"2026-02-03T14:00:00+09:00"}"#);

        let cursor = Cursor::decode(&text).unwrap();

        assert_eq!(cursor.last_created_at, "2026-02-03T05:00:00.000000+00:00");
    }

    #[test]
    fn rejects_tampered_cursors() {
        let cases = [
            "%%%not-base64%%%".to_owned(),
            B64.encode("not json"),
            B64.encode(r#"{"lastId":3}"#),
            B64.encode(r#"{"lastCreatedAt":"2026-02-03T05:00:00Z"}"#),
            B64.encode(r#"{"lastId":"3","lastCreatedAt":"2026-02-03T05:00:00Z"}"#),
            B64.encode(r#"{"lastId":0,"lastCreatedAt":"2026-02-03T05:00:00Z"}"#),
            B64.encode(r#"{"lastId":-1,"lastCreatedAt":"2026-02-03T05:00:00Z"}"#),
            B64.encode(r#"{"lastId":3,"lastCreatedAt":"yesterday"}"#),
            B64.encode(r#"{"lastId":3,"lastCreatedAt":"9999-12-31T23:59:59-09:00"}"#),
            String::new(),
        ];

        for text in cases {
            assert_eq!(Cursor::decode(&text), invalid_cursor(), "accepted {text:?}");
        }
    }
}
