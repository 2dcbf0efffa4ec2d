//! Rate limiting middleware.
//!
//! Public write endpoints (reservations, reviews, votes, feedback, checkout,
//! direct email sends) are limited per client IP with a GCRA limiter.

use std::net::{IpAddr, SocketAddr};
use std::num::NonZeroU32;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use governor::{
    clock::{Clock, DefaultClock},
    state::keyed::DefaultKeyedStateStore,
    Quota, RateLimiter as GovRateLimiter,
};
use serde_json::json;

use crate::app::AppState;

/// Keyed limiter: one GCRA cell per client key.
type ClientRateLimiter = GovRateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>;

/// Tracked clients above which stale entries are pruned.
const PRUNE_THRESHOLD: usize = 10_000;

/// Rate limiter state shared across all requests.
pub struct RateLimiterState {
    limiter: ClientRateLimiter,
    clock: DefaultClock,
    rate_limit_per_minute: u32,
}

impl RateLimiterState {
    /// Create a new rate limiter state with the specified limit per minute.
    ///
    /// A zero limit is treated as one request per minute.
    pub fn new(rate_limit_per_minute: u32) -> Self {
        let per_minute = NonZeroU32::new(rate_limit_per_minute).unwrap_or(NonZeroU32::MIN);
        Self {
            limiter: GovRateLimiter::keyed(Quota::per_minute(per_minute)),
            clock: DefaultClock::default(),
            rate_limit_per_minute,
        }
    }

    /// Check if a request from the given client should be allowed.
    /// Returns Ok(()) if allowed, or Err with retry_after seconds if rate limited.
    pub fn check(&self, client_key: &str) -> Result<(), u64> {
        if self.limiter.len() > PRUNE_THRESHOLD {
            self.limiter.retain_recent();
        }

        match self.limiter.check_key(&client_key.to_string()) {
            Ok(()) => Ok(()),
            Err(not_until) => {
                let wait_time = not_until.wait_time_from(self.clock.now());
                // Return retry after in seconds, minimum 1 second
                Err(wait_time.as_secs().max(1))
            }
        }
    }

    pub fn rate_limit_per_minute(&self) -> u32 {
        self.rate_limit_per_minute
    }
}

impl std::fmt::Debug for RateLimiterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiterState")
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("tracked_clients", &self.limiter.len())
            .finish()
    }
}

/// Identifies the client: the first `X-Forwarded-For` hop when the proxy
/// is trusted, otherwise the socket peer address.
fn client_key(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trust_forwarded_for: bool,
) -> String {
    if trust_forwarded_for {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .and_then(|first| first.trim().parse::<IpAddr>().ok());
        if let Some(ip) = forwarded {
            return ip.to_string();
        }
    }

    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Middleware that applies rate limiting per client IP.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let Some(rate_limiter) = state.rate_limiter.as_ref() else {
        return next.run(req).await;
    };

    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let key = client_key(
        req.headers(),
        peer,
        state.config.security.trust_forwarded_for,
    );

    if let Err(retry_after) = rate_limiter.check(&key) {
        tracing::debug!(client = %key, retry_after, "Rate limit exceeded");
        return rate_limited_response(rate_limiter.rate_limit_per_minute(), retry_after);
    }

    next.run(req).await
}

/// Create a rate limited response with proper headers and body.
fn rate_limited_response(limit: u32, retry_after: u64) -> Response {
    let body = json!({
        "error": "rate_limited",
        "message": format!("Rate limit of {} requests/minute exceeded", limit),
        "retryAfter": retry_after
    });

    let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limiter_allows_requests() {
        let state = RateLimiterState::new(100);
        assert!(state.check("10.0.0.1").is_ok());
    }

    #[test]
    fn test_rate_limiter_exhaustion() {
        let state = RateLimiterState::new(1);
        assert!(state.check("10.0.0.1").is_ok());

        let result = state.check("10.0.0.1");
        assert!(result.unwrap_err() >= 1);
    }

    #[test]
    fn test_rate_limiter_clients_independent() {
        let state = RateLimiterState::new(1);
        assert!(state.check("10.0.0.1").is_ok());
        assert!(state.check("10.0.0.2").is_ok());

        assert!(state.check("10.0.0.1").is_err());
        assert!(state.check("10.0.0.2").is_err());
    }

    #[test]
    fn test_rate_limiter_allows_configured_burst() {
        let state = RateLimiterState::new(5);
        for i in 0..5 {
            assert!(state.check("client").is_ok(), "Request {} should be allowed", i);
        }
        assert!(state.check("client").is_err());
    }

    #[test]
    fn test_zero_limit_is_one_per_minute() {
        let state = RateLimiterState::new(0);
        assert!(state.check("client").is_ok());
        assert!(state.check("client").is_err());
    }

    #[test]
    fn test_rate_limiter_state_debug() {
        let state = RateLimiterState::new(100);
        state.check("a").unwrap();
        let debug = format!("{:?}", state);
        assert!(debug.contains("rate_limit_per_minute"));
        assert!(debug.contains("tracked_clients"));
    }

    #[test]
    fn test_client_key_from_peer() {
        let peer: SocketAddr = "192.0.2.7:5555".parse().unwrap();
        assert_eq!(client_key(&HeaderMap::new(), Some(peer), false), "192.0.2.7");
        assert_eq!(client_key(&HeaderMap::new(), None, false), "unknown");
    }

    #[test]
    fn test_client_key_forwarded_for() {
        let peer: SocketAddr = "10.0.0.1:80".parse().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );

        assert_eq!(client_key(&headers, Some(peer), true), "203.0.113.9");
        // Untrusted proxies cannot pick their own key.
        assert_eq!(client_key(&headers, Some(peer), false), "10.0.0.1");
    }

    #[test]
    fn test_client_key_ignores_garbage_forwarded_for() {
        let peer: SocketAddr = "10.0.0.1:80".parse().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("not-an-ip"));
        assert_eq!(client_key(&headers, Some(peer), true), "10.0.0.1");
    }

    #[test]
    fn test_rate_limited_response_format() {
        let response = rate_limited_response(100, 60);
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "60");
    }
}
