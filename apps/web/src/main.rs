//! # Pharmacy Inventory Web Server
//!
//! ```text
//! load config ──► open SQLite (+ migrations) ──► bind ──► serve
//!                                                          │
//!                                     Ctrl+C / SIGTERM ────┘ graceful shutdown
//! ```

use anyhow::Context;
use pharmacy_db::{Database, DbConfig};
use pharmacy_web::{init_tracing, router, AppConfig, AppState};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("Starting pharmacy inventory server...");

    let config = AppConfig::load().context("Failed to load configuration")?;
    let addr = config.bind_addr()?;
    info!(
        %addr,
        db_path = %config.database.path,
        store = %config.store.name,
        "Configuration loaded"
    );

    let db_config = DbConfig::new(&config.database.path)
        .max_connections(config.database.max_connections);
    let db = Database::new(db_config)
        .await
        .context("Failed to open database")?;
    info!("Database ready");

    let state = AppState::new(db.clone(), config.policy, config.store);
    let app = router(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received, starting graceful shutdown...");
}
