use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
    Json,
};
use config::Secret;
use tracing::debug;

use crate::models::ErrorResponse;

/// Header clients present their key in.
pub const API_KEY_HEADER: &str = "X-MCP-API-Key";

/// Expected inbound key, shared with the auth middleware.
#[derive(Clone)]
pub struct AuthState {
    api_key: Secret,
}

impl AuthState {
    pub fn new(api_key: Secret) -> Self {
        Self { api_key }
    }
}

/// Reject requests whose `X-MCP-API-Key` header is absent or does not match
/// the configured key. The presented value is never logged.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let presented = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    match presented {
        Some(value) if value == state.api_key.as_str() => Ok(next.run(request).await),
        _ => {
            debug!("rejected request with a missing or invalid API key");
            Err((
                StatusCode::FORBIDDEN,
                Json(ErrorResponse::new(
                    "Invalid API key".to_string(),
                    "invalid_api_key".to_string(),
                )),
            ))
        }
    }
}
