//! Membership check endpoint.

use super::{AppState, error::ApiError};
use crate::core::user::is_valid_discord_id;
use axum::{Json, extract::State};
use poise::serenity_prelude as serenity;
use serde::Deserialize;
use serde_json::{Value, json};

/// `POST /check-user` request body.
#[derive(Debug, Deserialize)]
pub struct CheckUserRequest {
    /// Discord user ID to check, 17-19 digits
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
}

/// Reports whether a Discord identity is currently a member of the server.
pub async fn check_user(
    State(state): State<AppState>,
    Json(body): Json<CheckUserRequest>,
) -> Result<Json<Value>, ApiError> {
    let user_id = body.user_id.as_deref().map(str::trim).unwrap_or_default();

    if user_id.is_empty() {
        return Err(ApiError::BadRequest("User ID required".to_string()));
    }
    if !is_valid_discord_id(user_id) {
        return Err(ApiError::BadRequest("Invalid user ID format".to_string()));
    }
    let Ok(raw) = user_id.parse::<u64>() else {
        return Err(ApiError::BadRequest("Invalid user ID format".to_string()));
    };

    let in_server = state.service.is_member(serenity::UserId::new(raw)).await;

    Ok(Json(json!({
        "success": true,
        "inServer": in_server,
        "message": if in_server { "User is in server" } else { "User is not in server" },
    })))
}
