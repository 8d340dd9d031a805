//! Health check endpoint.

use axum::Json;
use serde_json::{Value, json};

/// Liveness probe; deliberately free of auth and collaborator calls.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Discord bot server is running",
    }))
}
