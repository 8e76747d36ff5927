use super::{handlers::AppState, handlers::into_api_error};
use crate::Error;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

pub const API_KEY_HEADER: &str = "Api-Key";

/// Rejects any request whose `Api-Key` header does not match the configured key.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    match provided {
        Some(key) if keys_match(key.as_bytes(), state.api_key.as_bytes()) => {
            next.run(request).await
        }
        _ => {
            warn!(
                "Rejected {} {}: missing or invalid access credential",
                request.method(),
                request.uri().path()
            );
            into_api_error(Error::Unauthorized).into_response()
        }
    }
}

/// Compares every byte regardless of where the first mismatch is.
/// Only the key length can be learned from timing.
fn keys_match(provided: &[u8], expected: &[u8]) -> bool {
    if provided.len() != expected.len() {
        return false;
    }
    provided
        .iter()
        .zip(expected)
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}
