use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// The ID of an authenticated user, as issued by the identity provider.
///
/// Route handlers behind [auth_guard](crate::auth::auth_guard) receive it with
/// `Extension(user_id): Extension<UserId>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create a new user ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
