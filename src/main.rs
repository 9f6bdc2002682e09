use diagnostic_booking::{
    auth::transport,
    booking::repository::{
        BookingRepository, InMemoryBookingRepository, PostgresBookingRepository,
    },
    catalog::repository::{InMemoryTestRepository, PostgresTestRepository, TestRepository},
    create_router,
    database::setup_database,
    user::repository::{InMemoryUserRepository, PostgresUserRepository, UserRepository},
    AppConfig, AppState, TokenConfig,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type Repositories = (
    Arc<dyn TestRepository + Send + Sync>,
    Arc<dyn BookingRepository + Send + Sync>,
    Arc<dyn UserRepository + Send + Sync>,
);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "diagnostic_booking=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting diagnostic booking server");

    let config = AppConfig::from_env()?;
    info!(
        port = config.port,
        transport = config.transport.as_ref(),
        production = config.production,
        "Configuration loaded"
    );

    // Switch between implementations on whether a database is configured
    let pool = match config.database_url.as_deref() {
        Some(url) => Some(setup_database(url).await?),
        None => {
            warn!("No DATABASE_URL set, records live in memory only");
            None
        }
    };

    let (test_repository, booking_repository, user_repository): Repositories = match &pool {
        Some(pool) => (
            Arc::new(PostgresTestRepository::new(pool.clone())),
            Arc::new(PostgresBookingRepository::new(pool.clone())),
            Arc::new(PostgresUserRepository::new(pool.clone())),
        ),
        None => (
            Arc::new(InMemoryTestRepository::new()),
            Arc::new(InMemoryBookingRepository::new()),
            Arc::new(InMemoryUserRepository::new()),
        ),
    };

    let app_state = AppState::new(
        TokenConfig::from_config(&config),
        transport::from_config(&config),
        test_repository,
        booking_repository,
        user_repository,
    );
    let app = create_router(app_state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running on http://localhost:{}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pool) = pool {
        pool.close().await;
        info!("Database connections closed");
    }

    Ok(())
}

/// Resolves on SIGINT or SIGTERM
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C signal, shutting down gracefully"),
        _ = terminate => info!("Received SIGTERM signal, shutting down gracefully"),
    }
}
