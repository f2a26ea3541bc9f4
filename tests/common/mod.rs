use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use template_api_rust::backend::BackendClient;
use template_api_rust::database::MemoryStore;
use template_api_rust::{app, AppState};

/// Shared-secret the app verifies tokens against during tests.
pub const TEST_JWT_SECRET: &str = "integration-test-secret";

/// Build the app over a fresh in-memory store. The backend client points at
/// a closed local port so an accidental outbound call fails fast instead of
/// reaching anything real.
pub fn test_app() -> Router {
    test_app_with_backend("http://127.0.0.1:9")
}

/// Same app, but with the backend client pointed somewhere specific - e.g. a
/// local listener standing in for the rendering backend.
pub fn test_app_with_backend(backend_url: &str) -> Router {
    std::env::set_var("SUPABASE_JWT_SECRET", TEST_JWT_SECRET);
    let store = Arc::new(MemoryStore::new());
    let backend = BackendClient::new(backend_url);
    app(AppState::new(store.clone(), store, backend))
}

/// Mint an access token the way the identity provider would.
pub fn token_for(user_id: Uuid) -> String {
    let exp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_secs() as i64
        + 3600;
    let claims = json!({
        "sub": user_id.to_string(),
        "email": "designer@example.com",
        "exp": exp,
    });
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("token encoding")
}

/// Fire one request at the router and decode the JSON response body.
pub async fn request(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    request_with_headers(app, method, uri, token, &[], body).await
}

/// [`request`], plus arbitrary extra headers (e.g. `X-Team-ID`).
pub async fn request_with_headers(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    extra_headers: &[(&str, &str)],
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    for (name, value) in extra_headers {
        builder = builder.header(*name, *value);
    }
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).expect("request build"))
        .await
        .expect("infallible");

    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collect")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}
