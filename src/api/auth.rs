//! Shared-secret bearer authentication.
//!
//! The website is the only intended caller; it authenticates every request
//! with `Authorization: Bearer <DISCORD_BOT_SECRET>`. Anything else is
//! rejected before the handler runs.

use super::{AppState, error::ApiError};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

/// Rejects requests whose bearer token doesn't match the shared secret.
pub async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|token| token == &*state.shared_secret);

    if authorized {
        next.run(request).await
    } else {
        warn!("Unauthorized API access attempt");
        ApiError::Unauthorized.into_response()
    }
}
