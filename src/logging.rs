//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

/// The number of bytes of a body that are logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is truncated
/// and the full body is logged at the `debug` level.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match read_body(body).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::warn!("Could not read request body: {error}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    log_body(
        &format!("Received request: {} {}", parts.method, parts.uri),
        &body_bytes,
    );

    let response = next.run(Request::from_parts(parts, body_bytes.into())).await;

    let (parts, body) = response.into_parts();
    let body_bytes = match read_body(body).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    log_body(&format!("Sending response: {}", parts.status), &body_bytes);

    Response::from_parts(parts, body_bytes.into())
}

async fn read_body(body: Body) -> Result<Bytes, axum::Error> {
    axum::body::to_bytes(body, usize::MAX).await
}

fn log_body(message: &str, body: &[u8]) {
    let body = String::from_utf8_lossy(body);

    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!("{message}\nbody: {}...", truncate(&body, LOG_BODY_LENGTH_LIMIT));
        tracing::debug!("Full body: {body:?}");
    } else {
        tracing::info!("{message}\nbody: {body:?}");
    }
}

/// The longest prefix of `text` that is at most `limit` bytes and ends on a
/// character boundary.
fn truncate(text: &str, limit: usize) -> &str {
    let mut end = limit.min(text.len());

    while !text.is_char_boundary(end) {
        end -= 1;
    }

    &text[..end]
}
