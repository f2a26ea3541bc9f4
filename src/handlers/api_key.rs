use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LogRequestsRequest {
    #[serde(alias = "logRequests")]
    pub log_requests: bool,
}

/// POST /api/api-key/log-requests - Toggle request logging for the caller's
/// API key usage. Idempotent.
pub async fn set_log_requests(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<LogRequestsRequest>,
) -> Result<Json<Value>, ApiError> {
    state
        .profiles
        .set_log_requests(Some(&user), body.log_requests)
        .await?;
    Ok(Json(json!({ "success": true })))
}
