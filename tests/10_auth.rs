mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn health_endpoint_is_public() {
    let app = common::test_app();
    let (status, body) = common::request(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn missing_token_is_rejected() {
    let app = common::test_app();
    let (status, body) = common::request(&app, Method::GET, "/api/templates", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
    assert_eq!(body["error"], true);
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let app = common::test_app();
    let (status, _) = common::request(
        &app,
        Method::GET,
        "/api/templates",
        Some("not-a-jwt"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_signed_with_wrong_secret_is_rejected() {
    use jsonwebtoken::{encode, EncodingKey, Header};
    let app = common::test_app();

    let claims = json!({
        "sub": Uuid::new_v4().to_string(),
        "exp": 4102444800i64,
    });
    let forged = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"some-other-secret"),
    )
    .unwrap();

    let (status, _) =
        common::request(&app, Method::GET, "/api/templates", Some(&forged), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn valid_token_resolves_a_principal() {
    let app = common::test_app();
    let token = common::token_for(Uuid::new_v4());

    let (status, body) =
        common::request(&app, Method::GET, "/api/templates", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["templates"], json!([]));
}

#[tokio::test]
async fn unauthenticated_flag_mutation_performs_no_write() {
    let app = common::test_app();

    let (status, body) = common::request(
        &app,
        Method::POST,
        "/api/api-key/log-requests",
        None,
        Some(json!({ "log_requests": false })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    // A user authenticating afterwards still has no profile row at all,
    // so the rejected call cannot have flipped anything.
    let token = common::token_for(Uuid::new_v4());
    let (status, body) =
        common::request(&app, Method::GET, "/api/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["profile"].is_null());
}
