use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storyreel_pipeline::store::LocalArtifactStore;
use storyreel_provider::{GenerativeProvider, HttpProvider, ProviderConfig};
use storyreel_worker::config::WorkerConfig;
use storyreel_worker::sweep::sweep_once;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storyreel_worker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = WorkerConfig::from_env();
    tracing::info!(
        sweep_interval_secs = config.sweep_interval_secs,
        sweep_expiry_secs = config.sweep_expiry_secs,
        "Loaded worker configuration"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = storyreel_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");

    storyreel_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    // --- Provider adapter ---
    let provider = HttpProvider::new(ProviderConfig::from_env());
    tracing::info!(
        configured = provider.is_configured(),
        "Generation provider adapter ready"
    );

    let store = LocalArtifactStore::new(&config.artifacts_dir);

    // --- Sweep loop ---
    let mut ticker = tokio::time::interval(Duration::from_secs(config.sweep_interval_secs));
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match sweep_once(&pool, &provider, &store, config.sweep_expiry_secs).await {
                    Ok(report) if report.scanned > 0 => {
                        tracing::info!(
                            scanned = report.scanned,
                            completed = report.completed,
                            failed = report.failed,
                            still_processing = report.still_processing,
                            errors = report.errors,
                            "Sweep pass finished"
                        );
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::error!(error = %e, "Sweep pass failed");
                    }
                }
            }
            () = &mut shutdown => {
                break;
            }
        }
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
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
