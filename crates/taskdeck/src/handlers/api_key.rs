//! API key validation middleware.
//!
//! Active only when an API key secret is configured. The `x-api-key` header
//! must equal the secret's value; preflight requests are let through so
//! browsers can discover the allowed headers.

use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};

use taskdeck_core::http::ApiResponse;
use taskdeck_core::secrets::api_key_matches;

use super::tasks::TaskResponse;
use crate::state::AppState;

/// Header carrying the API key, as advertised in CORS headers.
pub const API_KEY_HEADER_NAME: &str = "X-Api-Key";

pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(secret_name) = state.api_key_secret.as_deref() else {
        return next.run(request).await;
    };

    if request.method() == Method::OPTIONS {
        return next.run(request).await;
    }

    let presented = request
        .headers()
        .get(API_KEY_HEADER_NAME)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let Some(presented) = presented else {
        tracing::warn!(path = %request.uri().path(), "Request without API key");
        return reject(&state, 401);
    };

    match state.secrets.get_secret(secret_name).await {
        Ok(expected) if api_key_matches(&expected, &presented) => next.run(request).await,
        Ok(_) => {
            tracing::warn!(path = %request.uri().path(), "Request with invalid API key");
            reject(&state, 401)
        }
        Err(err) => {
            tracing::error!(secret = secret_name, error = %err, "API key lookup failed");
            reject(&state, 500)
        }
    }
}

fn reject(state: &AppState, status: u16) -> Response {
    TaskResponse(ApiResponse::status_only(status, &state.cors)).into_response()
}
