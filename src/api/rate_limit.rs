//! Per-IP fixed-window rate limiting.
//!
//! One counter per caller IP per window; when the ceiling is hit the caller
//! gets a fixed JSON message object with 429 until the window rolls over.
//! The store is in-memory - this is a single-process bot, not a fleet.

use axum::{
    Json,
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use serde_json::json;
use std::{
    net::{IpAddr, Ipv4Addr},
    time::{SystemTime, UNIX_EPOCH},
};
use tracing::debug;

#[derive(Debug)]
struct WindowEntry {
    count: u32,
    window_start: u64,
}

/// Fixed-window request limiter keyed by caller IP.
pub struct RateLimiter {
    store: DashMap<IpAddr, WindowEntry>,
    max_requests: u32,
    window_secs: u64,
}

impl RateLimiter {
    /// Creates a limiter admitting `max_requests` per `window_secs` per IP.
    #[must_use]
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            store: DashMap::new(),
            max_requests,
            // a zero window would divide by zero below
            window_secs: window_secs.max(1),
        }
    }

    /// Counts a request at `now` (unix seconds) and reports whether it is
    /// within the window's budget.
    fn check(&self, ip: IpAddr, now: u64) -> bool {
        let window_start = (now / self.window_secs) * self.window_secs;

        let mut entry = self.store.entry(ip).or_insert(WindowEntry {
            count: 0,
            window_start,
        });

        if entry.window_start < window_start {
            entry.count = 0;
            entry.window_start = window_start;
        }

        if entry.count >= self.max_requests {
            return false;
        }
        entry.count += 1;
        true
    }

    /// Axum middleware entry point.
    pub async fn middleware(&self, headers: HeaderMap, request: Request, next: Next) -> Response {
        let ip = client_ip(&headers);
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_secs());

        if self.check(ip, now) {
            next.run(request).await
        } else {
            debug!("Rate limit exceeded for {ip}");
            (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({
                    "success": false,
                    "error": "Too many requests from this IP, please try again later.",
                })),
            )
                .into_response()
        }
    }
}

/// Caller IP as reported by the reverse proxy; this service is deployed
/// behind one, so the forwarding headers are trusted.
fn client_ip(headers: &HeaderMap) -> IpAddr {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .and_then(|value| value.trim().parse().ok())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.parse().ok())
        })
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}
