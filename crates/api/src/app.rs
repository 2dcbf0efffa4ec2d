use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use shared::jwt::{JwtConfig, JwtError};
use sqlx::PgPool;
use thiserror::Error;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, require_admin,
    security_headers_middleware, trace_id, RateLimiterState,
};
use crate::routes::{
    admin, budget, content, crew, events, feedback, gallery, health, maintenance, notifications,
    payments, polls, reservations, reviews,
};
use crate::services::{
    EmailError, EmailService, PaymentError, PaymentGateway, ReservationService, StripeGateway,
};

/// Failure while wiring the application together at startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("email service: {0}")]
    Email(#[from] EmailError),

    #[error("payment gateway: {0}")]
    Payments(#[from] PaymentError),

    #[error("admin tokens: {0}")]
    Jwt(#[from] JwtError),
}

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
    pub email: EmailService,
    pub payments: Arc<dyn PaymentGateway>,
    pub reservations: ReservationService,
    /// `None` when the admin API is not configured.
    pub jwt: Option<JwtConfig>,
}

impl AppState {
    /// Builds the state with the given payment gateway.
    pub fn new(
        config: Config,
        pool: PgPool,
        payments: Arc<dyn PaymentGateway>,
    ) -> Result<Self, StartupError> {
        let config = Arc::new(config);

        // Rate limiting is enabled when rate_limit_per_minute > 0
        let rate_limiter = (config.security.rate_limit_per_minute > 0).then(|| {
            Arc::new(RateLimiterState::new(
                config.security.rate_limit_per_minute,
            ))
        });

        let jwt = if config.admin.is_enabled() {
            Some(JwtConfig::from_secret(
                &config.admin.jwt_secret,
                config.admin.token_expiry_secs,
                config.admin.leeway_secs,
            )?)
        } else {
            tracing::warn!("Admin API disabled: admin.password_hash or admin.jwt_secret not set");
            None
        };

        Ok(Self {
            email: EmailService::new(config.email.clone())?,
            reservations: ReservationService::new(pool.clone(), &config.reservations),
            pool,
            config,
            rate_limiter,
            payments,
            jwt,
        })
    }
}

/// Creates the application router with the Stripe gateway.
pub fn create_app(config: Config, pool: PgPool) -> Result<Router, StartupError> {
    let payments: Arc<dyn PaymentGateway> = Arc::new(StripeGateway::new(&config.payments)?);
    let state = AppState::new(config, pool, payments)?;
    Ok(router(state))
}

/// Builds the router for an already constructed state.
pub fn router(state: AppState) -> Router {
    let config = state.config.clone();

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Public reads, webhook and cron entry points
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/live", get(health::live))
        .route("/api/health/ready", get(health::ready))
        .route("/metrics", get(metrics_handler))
        .route("/api/events", get(events::list_events))
        .route("/api/events/:id", get(events::get_event))
        .route("/api/reservations/:id", get(reservations::get_reservation_status))
        .route("/api/reviews", get(reviews::list_reviews))
        .route("/api/polls", get(polls::list_polls))
        .route("/api/gallery", get(gallery::list_gallery))
        .route("/api/crew", get(crew::list_crew))
        .route("/api/content/:key", get(content::get_content))
        .route("/api/stripe-webhook", post(payments::stripe_webhook))
        .route(
            "/api/cleanup-expired",
            get(maintenance::cleanup_expired).post(maintenance::cleanup_expired),
        );

    // Public writes, limited per client IP
    let public_write_routes = Router::new()
        .route("/api/reservations", post(reservations::create_reservation))
        .route("/api/reviews", post(reviews::create_review))
        .route("/api/polls/:id/vote", post(polls::vote))
        .route("/api/feedback", post(feedback::create_feedback))
        .route(
            "/api/create-checkout-session",
            post(payments::create_checkout_session),
        )
        .route("/api/send-feedback", post(notifications::send_feedback))
        .route(
            "/api/send-reservation-confirmation",
            post(notifications::send_reservation_confirmation),
        )
        .route(
            "/api/send-reservation-email",
            post(notifications::send_reservation_email),
        )
        .route("/api/admin/login", post(admin::login))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    // Admin routes (require an admin session token)
    let admin_routes = Router::new()
        .route(
            "/api/admin/events",
            get(events::admin_list_events).post(events::create_event),
        )
        .route(
            "/api/admin/events/:id",
            patch(events::update_event).delete(events::delete_event),
        )
        .route("/api/admin/events/:id/archive", post(events::archive_event))
        .route(
            "/api/admin/reservations",
            get(reservations::admin_list_reservations),
        )
        .route(
            "/api/admin/reservations/:id",
            get(reservations::admin_get_reservation),
        )
        .route("/api/admin/reviews", get(reviews::admin_list_reviews))
        .route("/api/admin/reviews/:id", delete(reviews::delete_review))
        .route("/api/admin/reviews/:id/approve", post(reviews::approve_review))
        .route(
            "/api/admin/polls",
            get(polls::admin_list_polls).post(polls::create_poll),
        )
        .route("/api/admin/polls/:id", delete(polls::delete_poll))
        .route("/api/admin/polls/:id/active", put(polls::set_poll_active))
        .route("/api/admin/gallery", post(gallery::create_gallery_item))
        .route("/api/admin/gallery/:id", delete(gallery::delete_gallery_item))
        .route("/api/admin/crew", post(crew::create_crew_member))
        .route(
            "/api/admin/crew/:id",
            patch(crew::update_crew_member).delete(crew::delete_crew_member),
        )
        .route(
            "/api/admin/budget",
            get(budget::list_budget).post(budget::create_budget_item),
        )
        .route("/api/admin/budget/:id", delete(budget::delete_budget_item))
        .route("/api/admin/content/:key", put(content::upsert_content))
        .route("/api/admin/feedback", get(feedback::admin_list_feedback))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .merge(public_routes)
        .merge(public_write_routes)
        .merge(admin_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            security_headers_middleware,
        ))
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
