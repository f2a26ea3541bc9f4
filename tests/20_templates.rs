mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;
use uuid::Uuid;

const SAFE_ALPHABET: &str = "23456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnpqrstuvwxyz";

#[tokio::test]
async fn create_assigns_short_id_from_safe_alphabet() {
    let app = common::test_app();
    let token = common::token_for(Uuid::new_v4());

    let (status, body) = common::request(
        &app,
        Method::POST,
        "/api/templates",
        Some(&token),
        Some(json!({
            "name": "Invoice",
            "content": { "html": "<h1>Invoice</h1>", "paper_format": "A4" }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "body: {body}");
    assert_eq!(body["success"], true);
    let short_id = body["template"]["short_id"].as_str().unwrap();
    assert_eq!(short_id.len(), 12);
    assert!(short_id.chars().all(|c| SAFE_ALPHABET.contains(c)));
    assert_eq!(body["template"]["content"]["paper_format"], "A4");
}

#[tokio::test]
async fn create_without_html_fails_validation_and_writes_nothing() {
    let app = common::test_app();
    let token = common::token_for(Uuid::new_v4());

    let (status, body) = common::request(
        &app,
        Method::POST,
        "/api/templates",
        Some(&token),
        Some(json!({ "name": "Broken", "content": { "css": "p {}" } })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["field_errors"]["html"], "This field is required");

    let (_, body) = common::request(&app, Method::GET, "/api/templates", Some(&token), None).await;
    assert_eq!(body["templates"], json!([]));
}

#[tokio::test]
async fn templates_are_fetchable_by_uuid_and_short_id() {
    let app = common::test_app();
    let token = common::token_for(Uuid::new_v4());

    let (_, created) = common::request(
        &app,
        Method::POST,
        "/api/templates",
        Some(&token),
        Some(json!({ "name": "Receipt", "content": { "html": "<p>total</p>" } })),
    )
    .await;
    let id = created["template"]["id"].as_str().unwrap().to_string();
    let short_id = created["template"]["short_id"].as_str().unwrap().to_string();

    let (status, by_id) = common::request(
        &app,
        Method::GET,
        &format!("/api/templates/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_id["template"]["id"], id.as_str());

    let (status, by_short) = common::request(
        &app,
        Method::GET,
        &format!("/api/templates/{short_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_short["template"]["id"], id.as_str());
    assert_eq!(by_short["template"]["content"]["html"], "<p>total</p>");
}

#[tokio::test]
async fn save_is_full_replace_with_last_write_wins() {
    let app = common::test_app();
    let token = common::token_for(Uuid::new_v4());

    let (_, created) = common::request(
        &app,
        Method::POST,
        "/api/templates",
        Some(&token),
        Some(json!({
            "name": "Letter",
            "content": { "html": "<p>first</p>", "css": "p { color: red }" }
        })),
    )
    .await;
    let id = created["template"]["id"].as_str().unwrap().to_string();

    // Second save omits css entirely; the replace must not merge it back.
    let (status, body) = common::request(
        &app,
        Method::PUT,
        &format!("/api/templates/{id}/content"),
        Some(&token),
        Some(json!({ "html": "<p>second</p>" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "body: {body}");

    let (_, fetched) = common::request(
        &app,
        Method::GET,
        &format!("/api/templates/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(fetched["template"]["content"]["html"], "<p>second</p>");
    assert!(fetched["template"]["content"].get("css").is_none());
}

#[tokio::test]
async fn save_without_html_is_rejected_before_overwriting() {
    let app = common::test_app();
    let token = common::token_for(Uuid::new_v4());

    let (_, created) = common::request(
        &app,
        Method::POST,
        "/api/templates",
        Some(&token),
        Some(json!({ "name": "Label", "content": { "html": "<p>keep me</p>" } })),
    )
    .await;
    let id = created["template"]["id"].as_str().unwrap().to_string();

    let (status, body) = common::request(
        &app,
        Method::PUT,
        &format!("/api/templates/{id}/content"),
        Some(&token),
        Some(json!({ "html": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (_, fetched) = common::request(
        &app,
        Method::GET,
        &format!("/api/templates/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(fetched["template"]["content"]["html"], "<p>keep me</p>");
}

#[tokio::test]
async fn rename_and_delete_round_trip() {
    let app = common::test_app();
    let token = common::token_for(Uuid::new_v4());

    let (_, created) = common::request(
        &app,
        Method::POST,
        "/api/templates",
        Some(&token),
        Some(json!({ "name": "Draft", "content": { "html": "<p>x</p>" } })),
    )
    .await;
    let id = created["template"]["id"].as_str().unwrap().to_string();

    let (status, _) = common::request(
        &app,
        Method::PATCH,
        &format!("/api/templates/{id}"),
        Some(&token),
        Some(json!({ "name": "Final" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, fetched) = common::request(
        &app,
        Method::GET,
        &format!("/api/templates/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(fetched["template"]["name"], "Final");

    let (status, _) = common::request(
        &app,
        Method::DELETE,
        &format!("/api/templates/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = common::request(
        &app,
        Method::GET,
        &format!("/api/templates/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn templates_are_invisible_to_other_users() {
    let app = common::test_app();
    let owner = common::token_for(Uuid::new_v4());
    let stranger = common::token_for(Uuid::new_v4());

    let (_, created) = common::request(
        &app,
        Method::POST,
        "/api/templates",
        Some(&owner),
        Some(json!({ "name": "Private", "content": { "html": "<p>secret</p>" } })),
    )
    .await;
    let id = created["template"]["id"].as_str().unwrap().to_string();

    let (status, _) = common::request(
        &app,
        Method::GET,
        &format!("/api/templates/{id}"),
        Some(&stranger),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = common::request(
        &app,
        Method::DELETE,
        &format!("/api/templates/{id}"),
        Some(&stranger),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Still there for the owner
    let (status, _) = common::request(
        &app,
        Method::GET,
        &format!("/api/templates/{id}"),
        Some(&owner),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
