pub mod auth;
pub mod backend;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod shortid;

use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use backend::BackendClient;
use database::{ProfileStore, TemplateStore};
use services::{ProfileService, TemplateService};

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub templates: TemplateService,
    pub profiles: ProfileService,
    pub backend: BackendClient,
}

impl AppState {
    pub fn new(
        template_store: Arc<dyn TemplateStore>,
        profile_store: Arc<dyn ProfileStore>,
        backend: BackendClient,
    ) -> Self {
        Self {
            templates: TemplateService::new(template_store),
            profiles: ProfileService::new(profile_store),
            backend,
        }
    }
}

/// Build the full router. Everything under /api requires a valid bearer
/// token; `/` and `/health` stay public.
pub fn app(state: AppState) -> Router {
    use axum::routing::{delete, patch, post, put};
    use handlers::{api_key, onboarding, profile, templates};

    let protected = Router::new()
        .route("/api/templates", post(templates::create).get(templates::list))
        .route(
            "/api/templates/:id",
            get(templates::get).delete(templates::delete).patch(templates::rename),
        )
        .route("/api/templates/:id/content", put(templates::save_content))
        .route("/api/templates/:id/render", post(templates::render))
        .route("/api/onboarding/complete", post(onboarding::complete))
        .route("/api/api-key/log-requests", post(api_key::set_log_requests))
        .route("/api/profile", get(profile::get))
        .layer(axum::middleware::from_fn(middleware::jwt_auth_middleware));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(protected)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "name": "template-api-rust",
        "status": "ok",
    }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}
