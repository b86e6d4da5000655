use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use xpshare_recs::{
    api::{create_router, AppState},
    config::StorageBackend,
    db::{create_redis_client, InMemoryProfileRepository, ProfileRepository, RedisProfileRepository},
    Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let mut writer_handle = None;
    let repository: Arc<dyn ProfileRepository> = match config.storage_backend {
        StorageBackend::Memory => Arc::new(InMemoryProfileRepository::new()),
        StorageBackend::Redis => {
            let client = create_redis_client(&config.redis_url)?;
            let (repository, handle) = RedisProfileRepository::new(client, config.profile_ttl_secs);
            writer_handle = Some(handle);
            Arc::new(repository)
        }
    };

    tracing::info!(backend = repository.name(), "Profile storage ready");

    let state = AppState::with_repository(repository, config.default_recommendation_limit)
        .with_session_idle(Duration::from_secs(config.session_idle_secs));
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = writer_handle {
        handle.shutdown().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
