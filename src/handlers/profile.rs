use axum::{extract::State, Extension, Json};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::AppState;

/// GET /api/profile - The caller's settings flags. `null` until the first
/// flag mutation creates the row.
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, ApiError> {
    let profile = state.profiles.get_profile(Some(&user)).await?;
    Ok(Json(json!({ "profile": profile })))
}
