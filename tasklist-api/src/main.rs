//! # Tasklist API Server
//!
//! Multi-user to-do list service. Users register, log in for a 30 minute
//! bearer token and manage their own tasks.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/tasklist JWT_SECRET=... cargo run -p tasklist-api
//! TESTING=1 cargo run -p tasklist-api   # in-memory store
//! ```

use std::sync::Arc;

use anyhow::Context;
use tasklist_api::{
    app::{build_router, AppState},
    config::Config,
};
use tasklist_shared::{
    db::{
        migrations::run_migrations,
        pool::{close_pool, create_pool, DatabaseConfig},
    },
    store::{memory::MemoryStore, postgres::PgStore},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "tasklist_api=debug,tasklist_shared=debug,tower_http=debug".into()
    });
    let registry = tracing_subscriber::registry().with(filter);

    // LOG_FORMAT=json for machine-readable logs
    if std::env::var("LOG_FORMAT").is_ok_and(|format| format == "json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!(
        "Tasklist API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env().context("Failed to load configuration")?;
    let bind_address = config.bind_address();

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    if config.is_in_memory() {
        tracing::warn!("Using in-memory store; data is lost on exit");

        let state = AppState::with_store(Arc::new(MemoryStore::new()), config);

        tracing::info!("Server listening on http://{}", bind_address);
        axum::serve(listener, build_router(state))
            .with_graceful_shutdown(shutdown_signal())
            .await?;
    } else {
        let pool = create_pool(DatabaseConfig {
            url: config.database.url.clone(),
            max_connections: config.database.max_connections,
            ..Default::default()
        })
        .await
        .context("Failed to connect to database")?;

        run_migrations(&pool)
            .await
            .context("Failed to run database migrations")?;

        let state = AppState::with_store(Arc::new(PgStore::new(pool.clone())), config);

        tracing::info!("Server listening on http://{}", bind_address);
        axum::serve(listener, build_router(state))
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        close_pool(pool).await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, exiting...");
}
