use std::sync::Arc;

use template_api_rust::backend::BackendClient;
use template_api_rust::database::{MemoryStore, PostgresStore};
use template_api_rust::{app, config, AppState};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, BACKEND_URL, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting template API in {:?} mode", config.environment);

    let backend = BackendClient::from_env();
    let state = match std::env::var("DATABASE_URL") {
        Ok(url) => {
            let store = Arc::new(
                PostgresStore::connect(&url)
                    .await
                    .unwrap_or_else(|e| panic!("failed to connect to database: {}", e)),
            );
            AppState::new(store.clone(), store, backend)
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set; using in-memory store, data will not persist");
            let store = Arc::new(MemoryStore::new());
            AppState::new(store.clone(), store, backend)
        }
    };

    let app = app(state);

    // Allow tests or deployments to override port via env
    let port = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 Template API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
