//! MailChimp Member Mirror - API Server Binary
//!
//! This binary starts the HTTP API server for the member mirror.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin mailchimp-mirror-api
//!
//! # Run with environment variables
//! API_PORT=8080 API_MAILCHIMP_API_KEY=... API_DATABASE_URL=postgres://... cargo run --bin mailchimp-mirror-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_DATABASE_URL` - PostgreSQL connection string
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `API_MAILCHIMP_API_KEY` - MailChimp API key, including the data center suffix
//! * `API_MAILCHIMP_BASE_URL` - Overrides the MailChimp API root
//! * `API_MAILCHIMP_TIMEOUT_SECS` - MailChimp request timeout (default: 30)

use std::net::SocketAddr;
use std::sync::Arc;

use domain_mailchimp::{MailChimpAdapter, MemberService};
use infra_db::{create_pool, run_migrations, PostgresListStore, PostgresMemberStore};
use interface_api::{config::ApiConfig, create_router, AppState};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Main entry point for the API server.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration cannot be loaded from environment
/// - The MailChimp settings are invalid
/// - Database connection or migration fails
/// - Server fails to bind to the configured address
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env()?;
    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        "Starting MailChimp member mirror API server"
    );

    let pool = create_pool(config.database()).await?;
    run_migrations(&pool).await?;

    let lists = Arc::new(PostgresListStore::new(pool.clone()));
    let members = Arc::new(PostgresMemberStore::new(pool));
    let remote = Arc::new(MailChimpAdapter::new(config.mailchimp())?);
    tracing::info!(api_root = remote.api_root(), "MailChimp adapter ready");

    let service = MemberService::new(lists, members.clone(), remote);
    let state = AppState::new(service, config.clone()).with_readiness_check(members);
    let app = create_router(state);

    let addr: SocketAddr = config.server_addr().parse()?;
    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber; `RUST_LOG` wins over the configured level.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
