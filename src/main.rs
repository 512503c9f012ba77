use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use cinematch_api::{
    api::{create_router, AppState, Settings},
    config::Config,
    db::{create_pool, create_redis_client, Cache, PgCatalogStore, PgUserStore, RedisSessionStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cinematch_api=debug,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let pool = create_pool(&config.database_url, config.database_max_connections).await?;
    let redis_client = create_redis_client(&config.redis_url)?;

    let state = AppState::new(
        Arc::new(PgCatalogStore::new(pool.clone())),
        Arc::new(PgUserStore::new(pool)),
        Arc::new(RedisSessionStore::new(
            Cache::new(redis_client),
            config.session_ttl_secs,
        )),
        Settings::from(&config),
    );

    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
