//! Ticket creation endpoint.
//!
//! Normalizes the website's request (trimmed strings, lowercased type,
//! number-or-string amount) and hands it to the same
//! [`TicketService::open_ticket`](crate::tickets::TicketService::open_ticket)
//! path the rest of the system uses, so the validation rules cannot drift
//! between surfaces.

use super::{AppState, error::ApiError};
use crate::core::{ticket::TicketType, user::is_valid_discord_id};
use axum::{Json, extract::State};
use poise::serenity_prelude as serenity;
use serde::{Deserialize, Deserializer};
use serde_json::{Value, json};

/// `POST /create-ticket` request body.
#[derive(Debug, Deserialize)]
pub struct CreateTicketRequest {
    /// Discord user ID of the requester, 17-19 digits
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
    /// Ticket type: `support`, `deposit`, or `withdraw`
    #[serde(rename = "type", default)]
    pub ticket_type: Option<String>,
    /// GC amount; required for monetary types. Accepts a JSON number or a
    /// numeric string; anything else coerces to absent.
    #[serde(default, deserialize_with = "amount_from_json")]
    pub amount: Option<f64>,
    /// Optional free-text description
    #[serde(default)]
    pub description: Option<String>,
}

fn amount_from_json<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_amount))
}

fn coerce_amount(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Creates a ticket on behalf of the website.
pub async fn create_ticket(
    State(state): State<AppState>,
    Json(body): Json<CreateTicketRequest>,
) -> Result<Json<Value>, ApiError> {
    let user_id = body.user_id.as_deref().map(str::trim).unwrap_or_default();
    let type_raw = body
        .ticket_type
        .as_deref()
        .map(|value| value.trim().to_lowercase())
        .unwrap_or_default();

    if user_id.is_empty() || type_raw.is_empty() {
        return Err(ApiError::BadRequest("User ID and type required".to_string()));
    }
    if !is_valid_discord_id(user_id) {
        return Err(ApiError::BadRequest("Invalid user ID format".to_string()));
    }
    let Ok(raw_id) = user_id.parse::<u64>() else {
        return Err(ApiError::BadRequest("Invalid user ID format".to_string()));
    };
    let Some(ticket_type) = TicketType::parse(&type_raw) else {
        return Err(ApiError::BadRequest("Invalid ticket type".to_string()));
    };

    let description = body
        .description
        .as_deref()
        .map(str::trim)
        .unwrap_or_default();

    let opened = state
        .service
        .open_ticket(
            serenity::UserId::new(raw_id),
            ticket_type,
            body.amount,
            description,
        )
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": format!("Ticket created successfully: {}", opened.channel_name),
        "data": {
            "channelId": opened.channel_id.to_string(),
            "channelName": opened.channel_name,
        },
    })))
}
