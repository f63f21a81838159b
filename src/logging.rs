//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes, to_bytes},
    extract::Request,
    http::{HeaderMap, HeaderValue, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

use crate::Error;

/// The number of bytes of a body that is logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level with the
/// bearer token redacted.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is truncated
/// and the full body is logged at the `debug` level.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let path = parts.uri.path().to_owned();

    let body_bytes = match to_bytes(body, usize::MAX).await {
        Ok(body_bytes) => body_bytes,
        Err(error) => {
            tracing::warn!("Could not read request body: {error}");
            return Error::InvalidRequest("Could not read request body".to_owned())
                .into_problem_response(&path);
        }
    };

    tracing::info!(
        "Received request: {} {}\nheaders: {:#?}\nbody: {}",
        parts.method,
        parts.uri,
        redact_authorization(&parts.headers),
        truncate_body(&body_bytes)
    );
    log_full_body("request", &body_bytes);

    let response = next.run(Request::from_parts(parts, Body::from(body_bytes))).await;

    let (parts, body) = response.into_parts();
    let body_bytes = match to_bytes(body, usize::MAX).await {
        Ok(body_bytes) => body_bytes,
        Err(error) => {
            tracing::error!("Could not read response body for {path}: {error}");
            return Response::from_parts(parts, Body::empty());
        }
    };

    tracing::info!(
        "Sending response: {}\nheaders: {:#?}\nbody: {}",
        parts.status,
        parts.headers,
        truncate_body(&body_bytes)
    );
    log_full_body("response", &body_bytes);

    Response::from_parts(parts, Body::from(body_bytes))
}

fn redact_authorization(headers: &HeaderMap) -> HeaderMap {
    let mut headers = headers.clone();

    if let Some(value) = headers.get_mut(AUTHORIZATION) {
        *value = HeaderValue::from_static("Bearer ********");
    }

    headers
}

fn truncate_body(body: &Bytes) -> String {
    let text = String::from_utf8_lossy(body);

    if text.len() <= LOG_BODY_LENGTH_LIMIT {
        return format!("{text:?}");
    }

    let mut end = LOG_BODY_LENGTH_LIMIT;
    while !text.is_char_boundary(end) {
        end -= 1;
    }

    format!("{:?}...", &text[..end])
}

fn log_full_body(kind: &str, body: &Bytes) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::debug!("Full {kind} body: {:?}", String::from_utf8_lossy(body));
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Bytes,
        http::{HeaderMap, HeaderValue, header::AUTHORIZATION},
        middleware,
        routing::post,
    };
    use axum_test::TestServer;

    use super::{LOG_BODY_LENGTH_LIMIT, logging_middleware, redact_authorization, truncate_body};

    #[test]
    fn redacts_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer secret"));

        let got = redact_authorization(&headers);

        assert_eq!(got[AUTHORIZATION], "Bearer ********");
        assert_eq!(headers[AUTHORIZATION], "Bearer secret");
    }

    #[test]
    fn short_body_is_not_truncated() {
        assert_eq!(truncate_body(&Bytes::from_static(b"{}")), "\"{}\"");
    }

    #[test]
    fn truncates_on_char_boundary() {
        let text = "가".repeat(LOG_BODY_LENGTH_LIMIT);

        let got = truncate_body(&Bytes::from(text));

        assert!(got.ends_with("..."));
        // Each character is three bytes, so 21 fit in the limit.
        assert_eq!(got, format!("{:?}...", "가".repeat(21)));
    }

    #[tokio::test]
    async fn passes_bodies_through() {
        let app = Router::new()
            .route("/echo", post(|body: String| async move { body }))
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::try_new(app).expect("Could not create test server.");
        let body = "x".repeat(LOG_BODY_LENGTH_LIMIT * 2);

        let response = server.post("/echo").text(&body).await;

        response.assert_status_ok();
        response.assert_text(body);
    }
}
