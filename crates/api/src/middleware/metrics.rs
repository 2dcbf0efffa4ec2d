//! Prometheus metrics middleware.
//!
//! Provides HTTP request/response metrics collection and export, plus the
//! business counters for the reservation and notification flows.

use std::sync::OnceLock;
use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{header, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Middleware to record HTTP request metrics.
///
/// Records the following metrics:
/// - `http_requests_total`: Counter with labels (method, path, status)
/// - `http_request_duration_seconds`: Histogram with labels (method, path)
pub async fn metrics_middleware(req: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = method_to_str(req.method());
    // Matched route template keeps label cardinality bounded.
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(req).await;

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    counter!(
        "http_requests_total",
        "method" => method,
        "path" => path.clone(),
        "status" => status
    )
    .increment(1);

    histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path
    )
    .record(duration);

    response
}

/// Convert HTTP method to string for metric labels.
fn method_to_str(method: &Method) -> &'static str {
    match *method {
        Method::GET => "GET",
        Method::POST => "POST",
        Method::PUT => "PUT",
        Method::DELETE => "DELETE",
        Method::PATCH => "PATCH",
        Method::HEAD => "HEAD",
        Method::OPTIONS => "OPTIONS",
        _ => "OTHER",
    }
}

pub fn record_reservation_created(people_count: i32) {
    counter!("reservations_created_total").increment(1);
    counter!("reserved_seats_total").increment(people_count.max(0) as u64);
}

/// Reservation attempts turned away, labelled by reason.
pub fn record_reservation_rejected(reason: &'static str) {
    counter!("reservations_rejected_total", "reason" => reason).increment(1);
}

pub fn record_reservations_expired(count: usize, seats_released: i64) {
    counter!("reservations_expired_total").increment(count as u64);
    counter!("released_seats_total").increment(seats_released.max(0) as u64);
}

/// Payment webhook results, labelled by outcome.
pub fn record_payment_outcome(outcome: &'static str) {
    counter!("payments_processed_total", "outcome" => outcome).increment(1);
}

pub fn record_checkout_session(success: bool) {
    let result = if success { "created" } else { "failed" };
    counter!("checkout_sessions_total", "result" => result).increment(1);
}

/// Outbox deliveries, labelled by notification kind and result.
pub fn record_notification(kind: &'static str, result: &'static str) {
    counter!("notifications_total", "kind" => kind, "result" => result).increment(1);
}

/// Background job runs, labelled by job name and result.
pub fn record_job_run(job: &'static str, success: bool, duration_secs: f64) {
    let result = if success { "success" } else { "failure" };
    counter!("job_runs_total", "job" => job, "result" => result).increment(1);
    histogram!("job_duration_seconds", "job" => job).record(duration_secs);
}

/// Handler for /metrics endpoint that returns Prometheus text format.
pub async fn metrics_handler() -> impl IntoResponse {
    match PROMETHEUS_HANDLE.get() {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        ),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            [(header::CONTENT_TYPE, "text/plain")],
            "Metrics not initialized".to_string(),
        ),
    }
}

/// Initialize the Prometheus metrics recorder.
///
/// Must be called once during application startup before any metrics are
/// recorded. A second call is a no-op.
pub fn init_metrics() -> Result<(), BuildError> {
    if PROMETHEUS_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new()
        .set_buckets(&[0.001, 0.005, 0.01, 0.05, 0.1, 0.2, 0.5, 1.0, 2.0, 5.0])?
        .install_recorder()?;

    let _ = PROMETHEUS_HANDLE.set(handle);
    Ok(())
}
