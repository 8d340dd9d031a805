//! Maps crate errors onto the façade's JSON error envelope.

use crate::errors::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// API-surface error; every failing handler path funnels through here so the
/// response envelope is uniform.
#[derive(Debug)]
pub enum ApiError {
    /// 400 with a caller-correctable reason
    BadRequest(String),
    /// 401 bearer authentication failure
    Unauthorized,
    /// 500 with the details kept server-side
    Internal,
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        match &error {
            Error::Validation { .. }
            | Error::AmountOutOfRange { .. }
            | Error::NotAMember
            | Error::UserNotFound { .. }
            | Error::DuplicateOpenTicket { .. }
            | Error::TicketNotFound { .. }
            | Error::TicketAlreadyProcessed { .. }
            | Error::InsufficientBalance { .. }
            | Error::PermissionDenied => Self::BadRequest(error.to_string()),
            Error::Database(_)
            | Error::Discord(_)
            | Error::EnvVar(_)
            | Error::Io(_)
            | Error::Config { .. } => {
                tracing::error!("Internal error serving API request: {error}");
                Self::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason),
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            Self::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        (status, Json(json!({ "success": false, "error": message }))).into_response()
    }
}
