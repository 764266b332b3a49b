//! Property listing server.
//!
//! Uses Postgres when `DATABASE_URL` is set, otherwise an in-memory store.

use property_listing::{app, demo_listings, ensure_database_exists, AppConfig, AppState, MemoryStore, PgStore, PropertyStore};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("property_listing=info,tower_http=info")),
        )
        .init();

    let store: Arc<dyn PropertyStore> = match &config.database_url {
        Some(url) => {
            ensure_database_exists(url).await?;
            let store = PgStore::connect(url, config.db_max_connections).await?;
            store.ensure_schema().await?;
            tracing::info!("using postgres store");
            Arc::new(store)
        }
        None => {
            let records = if config.seed_demo_data { demo_listings() } else { Vec::new() };
            tracing::info!(seeded = records.len(), "DATABASE_URL not set, using in-memory store");
            Arc::new(MemoryStore::with_records(records))
        }
    };

    let state = AppState::new(store, config.environment);
    let router = app(state, config.body_limit_bytes);
    let listener = TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(environment = ?config.environment, "listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}
