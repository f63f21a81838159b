//! Encoding and verification of the bearer tokens that identify a user.

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{Error, auth::UserId};

/// The audience the identity provider sets on tokens for signed in users.
pub const AUDIENCE: &str = "authenticated";

/// The contents of a JSON Web Token.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// The ID of the user the token was issued to.
    pub sub: UserId,
    /// The audience of the token.
    pub aud: String,
    /// The expiry time of the token as a unix timestamp.
    pub exp: usize,
}

/// Create a signed token for `user_id` that expires after `duration`.
///
/// # Errors
/// Returns an error if the claims could not be signed.
pub fn encode_token(
    user_id: &UserId,
    duration: Duration,
    encoding_key: &EncodingKey,
) -> Result<String, jsonwebtoken::errors::Error> {
    let exp = (OffsetDateTime::now_utc() + duration).unix_timestamp().max(0) as usize;
    let claims = Claims {
        sub: user_id.clone(),
        aud: AUDIENCE.to_owned(),
        exp,
    };

    encode(&Header::new(Algorithm::HS256), &claims, encoding_key)
}

/// Verify `token` and return its claims.
///
/// # Errors
/// Returns [Error::Unauthorized] if the token is malformed, has an invalid
/// signature, has expired or was issued for another audience.
pub fn decode_token(token: &str, decoding_key: &DecodingKey) -> Result<Claims, Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[AUDIENCE]);
    validation.set_required_spec_claims(&["exp", "aud", "sub"]);

    decode::<Claims>(token, decoding_key, &validation)
        .map(|token_data| token_data.claims)
        .map_err(|error| {
            tracing::debug!("Rejected bearer token: {error}");

            match error.kind() {
                ErrorKind::ExpiredSignature => Error::Unauthorized("Token has expired".to_owned()),
                _ => Error::Unauthorized("Invalid token".to_owned()),
            }
        })
}
