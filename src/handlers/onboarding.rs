use axum::{extract::State, Extension, Json};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::AppState;

/// POST /api/onboarding/complete - Mark the caller's onboarding as done.
/// Safe to call repeatedly; the flag never reverts.
pub async fn complete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, ApiError> {
    state.profiles.complete_onboarding(Some(&user)).await?;
    Ok(Json(json!({ "success": true })))
}
