use std::sync::Arc;
use std::time::Duration;

use auth::PasswordHasher;
use auth::TokenService;
use market_user::config::Config;
use market_user::domain::user::hashing::CredentialHasher;
use market_user::inbound::http::router::create_router;
use market_user::inbound::http::router::AppState;
use market_user::outbound::repositories::PostgresCredentialStore;
use sqlx::postgres::PgPoolOptions;
use tokio::sync::Notify;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Wait for SIGTERM or Ctrl+C.
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "market_user=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "market-user",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        database_host = %config.database.host,
        database_name = %config.database.name,
        http_port = config.server.http_port,
        token_lookup = %config.jwt.token_lookup,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.timeout())
        .connect_with(config.database.connect_options())
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let hasher = CredentialHasher::new(
        PasswordHasher::with_params(config.password.hash_params())?,
        config.password.timeout(),
    );
    let tokens = Arc::new(TokenService::new(
        config.jwt.secret.as_bytes(),
        config.jwt.token_config()?,
    )?);
    let store = Arc::new(PostgresCredentialStore::new(
        pg_pool.clone(),
        config.database.timeout(),
    ));

    let http_application = create_router(AppState::new(store, hasher, tokens));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let shutdown = Arc::new(Notify::new());
    let mut http_server = tokio::spawn({
        let shutdown = Arc::clone(&shutdown);
        async move {
            axum::serve(http_listener, http_application)
                .with_graceful_shutdown(async move { shutdown.notified().await })
                .await
        }
    });

    tokio::select! {
        result = &mut http_server => {
            match result {
                Ok(Ok(())) => tracing::info!("Server exited"),
                Ok(Err(e)) => tracing::error!(error = %e, "Server error"),
                Err(e) => tracing::error!(error = %e, "Server task failed"),
            }
            pg_pool.close().await;
            return Ok(());
        }
        _ = shutdown_signal() => {}
    }

    // In-flight requests get a bounded grace period.
    shutdown.notify_one();
    let grace = Duration::from_secs(config.server.shutdown_timeout_seconds);
    match tokio::time::timeout(grace, &mut http_server).await {
        Ok(Ok(Ok(()))) => tracing::info!("Server shut down gracefully"),
        Ok(Ok(Err(e))) => tracing::error!(error = %e, "Server error during shutdown"),
        Ok(Err(e)) => tracing::error!(error = %e, "Server task failed during shutdown"),
        Err(_) => {
            tracing::warn!(
                timeout_seconds = config.server.shutdown_timeout_seconds,
                "Shutdown timed out, dropping remaining connections"
            );
            http_server.abort();
        }
    }

    pg_pool.close().await;
    tracing::info!("Database pool closed");

    Ok(())
}
