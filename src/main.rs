//! CareMatch API server
//! Mission: Serve the marketplace dashboards behind role-checked sessions

use anyhow::{Context, Result};
use carematch_backend::{auth::hash_password, router, store::Database, AppState, Config};
use clap::Parser;
use dotenv::dotenv;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; real environment variables win
    dotenv().ok();
    init_tracing();

    let config = Config::parse();
    config.validate().context("Invalid configuration")?;

    info!("🚀 CareMatch API starting ({:?})", config.environment);

    let db = Database::open(&config.database_path)?;
    info!("📊 Database initialized at: {}", config.database_path);

    match config.seed_admin_password.as_deref() {
        Some(password) => {
            let password_hash = hash_password(password, config.bcrypt_cost)?;
            db.seed_default_admin(&config.seed_admin_email, password_hash)
                .await?;
        }
        None => warn!("SEED_ADMIN_PASSWORD not set; skipping default admin seeding"),
    }

    let addr = config.bind_addr();
    let app = router(AppState::new(config, db));

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("🎯 API server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

/// Initialize tracing, honouring RUST_LOG
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "carematch_backend=debug,carematch=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
