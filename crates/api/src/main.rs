use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use doctrack_api::config::ServerConfig;
use doctrack_api::router::build_app_router;
use doctrack_api::state::AppState;
use doctrack_db::DbPool;
use doctrack_storage::S3BlobStore;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = config.port,
        bucket = %config.storage.bucket,
        max_upload_bytes = config.max_upload_bytes,
        "Loaded server configuration"
    );

    let pool = connect_database().await;
    let blobs = Arc::new(S3BlobStore::connect(&config.storage).await);
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        blobs,
    };

    let app = build_app_router(state, &config);

    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    // Once a signal arrives, in-flight requests get `shutdown_timeout_secs`
    // to finish before the server stops waiting for them.
    let draining = Arc::new(Notify::new());
    let signal_draining = Arc::clone(&draining);
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        signal_draining.notify_one();
    });
    let grace = Duration::from_secs(config.shutdown_timeout_secs);
    let deadline = async move {
        draining.notified().await;
        tokio::time::sleep(grace).await;
    };

    tokio::select! {
        result = server => result.expect("Server error"),
        () = deadline => {
            tracing::warn!(grace_secs = grace.as_secs(), "Shutdown grace period elapsed, dropping open connections");
        }
    }

    tracing::info!("Graceful shutdown complete");
}

/// `RUST_LOG` wins; otherwise debug for this crate and tower-http.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "doctrack_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Connect to `DATABASE_URL`, verify it answers and apply migrations.
///
/// Any failure aborts startup.
async fn connect_database() -> DbPool {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = doctrack_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    doctrack_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    doctrack_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database ready, migrations applied");
    pool
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
