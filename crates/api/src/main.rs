use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use persistence::repositories::{EventRepository, NotificationRepository};
use poznej_hraj_api::app;
use poznej_hraj_api::config::Config;
use poznej_hraj_api::jobs::{
    ArchivePastEventsJob, ExpireReservationsJob, JobScheduler, NotificationCleanupJob,
    NotificationDispatchJob, PoolMetricsJob,
};
use poznej_hraj_api::middleware;
use poznej_hraj_api::services::{EmailService, NotificationDispatcher, ReservationService};

const JOB_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // `poznej-hraj hash-password <password>` prints an admin.password_hash value
    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(String::as_str) == Some("hash-password") {
        let password = args
            .get(2)
            .context("usage: poznej-hraj hash-password <password>")?;
        let hash = shared::password::hash_password(password)?;
        println!("{}", hash);
        return Ok(());
    }

    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    middleware::logging::init_logging(&config.logging)?;
    middleware::init_metrics()?;

    info!("Starting Poznej & Hraj API v{}", env!("CARGO_PKG_VERSION"));

    // Create database pool
    let pool = persistence::db::create_pool(&config.database.pool_config()).await?;

    // Run migrations
    info!("Running database migrations...");
    persistence::db::run_migrations(&pool).await?;
    info!("Migrations completed");

    // Background jobs
    let scheduler = if config.jobs.enabled {
        let mut scheduler = JobScheduler::new();
        scheduler.register(ExpireReservationsJob::new(
            ReservationService::new(pool.clone(), &config.reservations),
            config.reservations.sweep_interval_secs,
        ));
        scheduler.register(NotificationDispatchJob::new(NotificationDispatcher::new(
            pool.clone(),
            EmailService::new(config.email.clone())?,
            config.jobs.notification_batch_size,
            config.jobs.notification_lease_secs,
        )));
        scheduler.register(ArchivePastEventsJob::new(EventRepository::new(pool.clone())));
        scheduler.register(PoolMetricsJob::new(pool.clone()));
        scheduler.register(NotificationCleanupJob::new(
            NotificationRepository::new(pool.clone()),
            config.jobs.notification_retention_days,
        ));
        scheduler.start();
        Some(scheduler)
    } else {
        info!("Background jobs disabled");
        None
    };

    // Build application
    let addr = config.socket_addr()?;
    let app = app::create_app(config, pool)?;

    // Start server
    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    if let Some(scheduler) = scheduler {
        scheduler.shutdown();
        scheduler.wait_for_shutdown(JOB_SHUTDOWN_TIMEOUT).await;
    }

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
