//! Bearer token authentication.
//!
//! Tokens are issued by the identity provider and signed with a shared secret.
//! The [auth_guard] middleware verifies them and hands the user ID to handlers.

mod middleware;
mod token;
mod user;

pub use middleware::auth_guard;
pub use token::{decode_token, encode_token};
pub use user::UserId;
