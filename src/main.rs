use std::sync::Arc;

use rentbase_api::config::{self, StoreBackend};
use rentbase_api::storage::LocalStorage;
use rentbase_api::store::{MemoryStore, PgStore, Store};
use rentbase_api::{app, AppState};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting Rentbase API in {:?} mode", config.environment);

    let store: Arc<dyn Store> = match config.storage.store_backend {
        StoreBackend::Memory => {
            tracing::warn!("running against the in-memory store; data will not survive restarts");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::Postgres => {
            let url = config
                .database
                .url
                .as_deref()
                .unwrap_or_else(|| panic!("DATABASE_URL must be set (or RENTBASE_STORE=memory)"));
            let store = PgStore::connect(url, config.database.max_connections)
                .await
                .unwrap_or_else(|e| panic!("failed to connect to database: {}", e));
            store
                .migrate()
                .await
                .unwrap_or_else(|e| panic!("failed to run migrations: {}", e));
            Arc::new(store)
        }
    };

    let files = Arc::new(LocalStorage::new(
        &config.storage.upload_dir,
        &config.storage.public_base_url,
    ));

    let state = AppState::new(store, files);
    let router = app(state);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Rentbase API listening on http://{}", bind_addr);

    axum::serve(listener, router).await.expect("server");
}
