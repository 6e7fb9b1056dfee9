use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hrsync_events::{
    default_registry, ConsumerRuntime, DeadLetterSink, KafkaSource, MirrorStore,
    PgDeadLetterSink, PgMirrorStore,
};
use hrsync_worker::config::SyncConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hrsync_worker=debug,hrsync_events=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = SyncConfig::from_env()?;
    tracing::info!(
        brokers = %config.kafka.brokers,
        group_id = %config.kafka.group_id,
        mode = ?config.consumer.mode,
        "Loaded worker configuration",
    );

    // --- Database ---
    let pool = hrsync_db::create_pool(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    hrsync_db::health_check(&pool)
        .await
        .context("Database health check failed")?;
    hrsync_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database ready");

    // --- Handlers ---
    let store: Arc<dyn MirrorStore> = Arc::new(PgMirrorStore::new(pool.clone()));
    let registry = Arc::new(default_registry(store)?);
    let dead_letters: Arc<dyn DeadLetterSink> = Arc::new(PgDeadLetterSink::new(pool.clone()));

    // --- Consumer ---
    let source = KafkaSource::connect(&config.kafka)?;
    let runtime = ConsumerRuntime::new(source, registry, dead_letters, config.consumer);

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        signal_cancel.cancel();
    });

    let stats = runtime.run(cancel).await?;
    tracing::info!(
        received = stats.received,
        succeeded = stats.succeeded,
        dead_lettered = stats.dead_lettered,
        committed = stats.committed,
        "Worker stopped",
    );

    pool.close().await;
    Ok(())
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
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
        () = ctrl_c => tracing::info!("Received SIGINT (Ctrl-C), draining consumer"),
        () = terminate => tracing::info!("Received SIGTERM, draining consumer"),
    }
}
