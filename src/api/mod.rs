//! HTTP façade - the bot's only externally reachable entry point.
//!
//! The website calls two operations here (membership check, ticket creation)
//! with a shared-secret bearer token; `/health` is open. Everything is
//! rate-limited per caller IP and wrapped in permissive CORS plus request
//! tracing. Handlers delegate to the same [`TicketService`] the Discord
//! handlers use, so validation is identical on both paths.

/// Bearer-token authentication middleware
pub mod auth;
/// Crate-error to HTTP-response mapping
pub mod error;
/// Health check endpoint
pub mod health;
/// Per-IP fixed-window rate limiting
pub mod rate_limit;
/// Ticket creation endpoint
pub mod tickets;
/// Membership check endpoint
pub mod users;

use crate::config::AppConfig;
use crate::tickets::TicketService;
use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};
use rate_limit::RateLimiter;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared state for all API handlers.
#[derive(Clone)]
pub struct AppState {
    /// The ticket workflow service
    pub service: Arc<TicketService>,
    /// Shared secret the caller must present as a bearer token
    pub shared_secret: Arc<str>,
    /// Per-IP request limiter
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    /// Builds the state from the shared service handle and configuration.
    #[must_use]
    pub fn new(service: Arc<TicketService>, shared_secret: String, config: &AppConfig) -> Self {
        Self {
            service,
            shared_secret: shared_secret.into(),
            rate_limiter: Arc::new(RateLimiter::new(
                config.api.rate_limit_max_requests,
                config.api.rate_limit_window_secs,
            )),
        }
    }
}

/// Assembles the API router with auth, rate limiting, CORS, and tracing.
#[must_use]
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/check-user", post(users::check_user))
        .route("/create-ticket", post(tickets::create_ticket))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer,
        ));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(protected)
        .layer({
            let limiter = Arc::clone(&state.rate_limiter);
            axum_middleware::from_fn(move |headers, req, next| {
                let limiter = Arc::clone(&limiter);
                async move { limiter.middleware(headers, req, next).await }
            })
        })
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::config::settings::ApiConfig;
    use crate::test_utils::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use poise::serenity_prelude as serenity;
    use tower::ServiceExt;

    const SECRET: &str = "test-shared-secret";

    async fn test_router() -> Router {
        let db = setup_test_db().await.unwrap();
        let config = Arc::new(AppConfig {
            guild_id: 900_000_000_000_000_001,
            admin_role_id: 900_000_000_000_000_002,
            support_category_id: None,
            deposit_withdraw_category_id: None,
            website_url: None,
            api: ApiConfig::default(),
        });
        let service = Arc::new(TicketService::new(
            Arc::new(serenity::Http::new("")),
            db,
            Arc::clone(&config),
        ));
        router(AppState::new(service, SECRET.to_string(), &config))
    }

    fn post_json(uri: &str, auth: Option<&str>, body: serde_json::Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = auth {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_is_open() {
        let response = test_router()
            .await
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
    }

    #[tokio::test]
    async fn test_missing_bearer_is_unauthorized() {
        let request = post_json(
            "/check-user",
            None,
            serde_json::json!({"userId": "123456789012345678"}),
        );
        let response = test_router().await.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Unauthorized");
    }

    #[tokio::test]
    async fn test_wrong_bearer_is_unauthorized() {
        let request = post_json(
            "/create-ticket",
            Some("not-the-secret"),
            serde_json::json!({"userId": "123456789012345678", "type": "support"}),
        );
        let response = test_router().await.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_check_user_rejects_bad_id_format() {
        let router = test_router().await;

        for bad in ["", "123", "123456789012345678901", "12345678901234567a"] {
            let request = post_json(
                "/check-user",
                Some(SECRET),
                serde_json::json!({"userId": bad}),
            );
            let response = router.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "id: {bad:?}");
        }
    }

    #[tokio::test]
    async fn test_create_ticket_rejects_invalid_type() {
        let request = post_json(
            "/create-ticket",
            Some(SECRET),
            serde_json::json!({"userId": "123456789012345678", "type": "refund"}),
        );
        let response = test_router().await.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Invalid ticket type");
    }

    #[tokio::test]
    async fn test_create_ticket_requires_user_and_type() {
        let request = post_json(
            "/create-ticket",
            Some(SECRET),
            serde_json::json!({"description": "hello"}),
        );
        let response = test_router().await.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "User ID and type required");
    }

    #[tokio::test]
    async fn test_create_ticket_enforces_amount_limits() {
        // 600 is above the default 50-500 range; the limit check fires
        // before any Discord call.
        let request = post_json(
            "/create-ticket",
            Some(SECRET),
            serde_json::json!({
                "userId": "123456789012345678",
                "type": "withdraw",
                "amount": 600,
            }),
        );
        let response = test_router().await.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Amount must be between 50 and 500 GC");
    }

    #[tokio::test]
    async fn test_amount_is_coerced_from_string() {
        // Same limit violation, but the amount arrives as a numeric string
        // the way some website forms submit it.
        let request = post_json(
            "/create-ticket",
            Some(SECRET),
            serde_json::json!({
                "userId": "123456789012345678",
                "type": "deposit",
                "amount": "9000",
            }),
        );
        let response = test_router().await.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Amount must be between 50 and 500 GC");
    }

    #[tokio::test]
    async fn test_unlinked_user_cannot_create_ticket() {
        let request = post_json(
            "/create-ticket",
            Some(SECRET),
            serde_json::json!({"userId": "123456789012345678", "type": "support"}),
        );
        let response = test_router().await.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(
            body["error"],
            "User not found in database. Please ensure you have linked your Discord account."
        );
    }
}
