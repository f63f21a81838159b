//! Authentication middleware that verifies bearer tokens.

use axum::{
    RequestPartsExt,
    extract::{FromRef, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use jsonwebtoken::DecodingKey;

use crate::{
    AppState, Error,
    auth::{UserId, decode_token},
};

/// The state needed for the auth middleware
#[derive(Clone)]
pub struct AuthState {
    /// The key used to verify the signature of bearer tokens.
    pub decoding_key: DecodingKey,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            decoding_key: state.jwt_decoding_key.clone(),
        }
    }
}

/// Middleware function that checks for a valid bearer token.
///
/// The user ID is placed into the request and the request executed normally
/// if the token is valid, otherwise an unauthorized problem response is
/// returned without running the handler.
///
/// **Note**: Route handlers can use the function argument
/// `Extension(user_id): Extension<UserId>` to receive the user ID.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();

    let user_id = match authenticate(&mut parts, &state).await {
        Ok(user_id) => user_id,
        Err(error) => return error.into_problem_response(parts.uri.path()),
    };

    parts.extensions.insert(user_id);
    let request = Request::from_parts(parts, body);

    next.run(request).await
}

async fn authenticate(parts: &mut Parts, state: &AuthState) -> Result<UserId, Error> {
    let TypedHeader(Authorization(bearer)) = parts
        .extract::<TypedHeader<Authorization<Bearer>>>()
        .await
        .map_err(|_| Error::Unauthorized("Missing bearer token".to_owned()))?;

    decode_token(bearer.token(), &state.decoding_key).map(|claims| claims.sub)
}

#[cfg(test)]
mod auth_guard_tests {
    use axum::{Extension, Router, http::StatusCode, middleware, routing::get};
    use axum_test::TestServer;
    use jsonwebtoken::{DecodingKey, EncodingKey};
    use serde_json::Value;
    use time::Duration;

    use crate::auth::{UserId, auth_guard, encode_token};

    use super::AuthState;

    const SECRET: &[u8] = b"nafstenoas";
    const TEST_PROTECTED_ROUTE: &str = "/api/dashboard/protected";

    async fn test_handler(Extension(user_id): Extension<UserId>) -> String {
        user_id.to_string()
    }

    fn get_test_server() -> TestServer {
        let state = AuthState {
            decoding_key: DecodingKey::from_secret(SECRET),
        };

        let app = Router::new()
            .route(TEST_PROTECTED_ROUTE, get(test_handler))
            .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    fn token_for(user_id: &str, duration: Duration) -> String {
        encode_token(
            &UserId::new(user_id),
            duration,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn passes_user_id_to_handler() {
        let server = get_test_server();

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .authorization_bearer(token_for("user-123", Duration::minutes(5)))
            .await;

        response.assert_status_ok();
        response.assert_text("user-123");
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let server = get_test_server();

        let response = server.get(TEST_PROTECTED_ROUTE).await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        let body = response.json::<Value>();
        assert_eq!(body["title"], "UNAUTHORIZED");
        assert_eq!(body["status"], 401);
        assert_eq!(body["path"], TEST_PROTECTED_ROUTE);
    }

    #[tokio::test]
    async fn expired_token_is_unauthorized() {
        let server = get_test_server();

        server
            .get(TEST_PROTECTED_ROUTE)
            .authorization_bearer(token_for("user-123", Duration::hours(-2)))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn malformed_token_is_unauthorized() {
        let server = get_test_server();

        server
            .get(TEST_PROTECTED_ROUTE)
            .authorization_bearer("FooBarBaz")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
