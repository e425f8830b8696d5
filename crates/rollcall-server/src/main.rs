//! Rollcall Server — application entry point.

use rollcall_db::{DbConfig, DbManager, run_migrations};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("rollcall=info".parse().unwrap()),
        )
        .json()
        .init();

    tracing::info!("Starting Rollcall server...");

    let config = DbConfig::default();
    match DbManager::connect(&config).await {
        Ok(manager) => {
            if let Err(e) = run_migrations(manager.client()).await {
                tracing::error!(error = %e, "Migration failed");
                std::process::exit(1);
            }
            // TODO: mount the HTTP adapter over rollcall_session::AttendanceApi
            tracing::info!("Rollcall server ready.");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to SurrealDB");
            std::process::exit(1);
        }
    }

    tracing::info!("Rollcall server stopped.");
}
