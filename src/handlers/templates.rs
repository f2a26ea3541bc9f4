use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::backend::{RequestContext, TEAM_ID_HEADER};
use crate::database::models::TemplateContent;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateTemplateRequest {
    pub name: String,
    #[serde(default)]
    pub content: Option<TemplateContent>,
}

#[derive(Debug, Deserialize)]
pub struct RenameTemplateRequest {
    pub name: String,
}

/// POST /api/templates - Create a template, optionally with initial content
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CreateTemplateRequest>,
) -> Result<Json<Value>, ApiError> {
    let created = state
        .templates
        .create_template(Some(&user), &body.name, body.content)
        .await?;
    Ok(Json(json!({ "success": true, "template": created })))
}

/// GET /api/templates - List the caller's templates, newest first
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, ApiError> {
    let templates = state.templates.list_templates(Some(&user)).await?;
    Ok(Json(json!({ "templates": templates })))
}

/// GET /api/templates/:ident - Fetch one template with its current content.
/// Accepts either the primary uuid or the shareable short id.
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(ident): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let template = state.templates.find_template(Some(&user), &ident).await?;
    Ok(Json(json!({ "template": template })))
}

/// PUT /api/templates/:id/content - Full-replace save of the content payload
pub async fn save_content(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(content): Json<TemplateContent>,
) -> Result<Json<Value>, ApiError> {
    state.templates.save_content(Some(&user), id, &content).await?;
    Ok(Json(json!({ "success": true })))
}

/// PATCH /api/templates/:id - Rename
pub async fn rename(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<RenameTemplateRequest>,
) -> Result<Json<Value>, ApiError> {
    state
        .templates
        .rename_template(Some(&user), id, &body.name)
        .await?;
    Ok(Json(json!({ "success": true })))
}

/// DELETE /api/templates/:id - Delete the template and its content
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    state.templates.delete_template(Some(&user), id).await?;
    Ok(Json(json!({ "success": true })))
}

#[derive(Debug, Deserialize, Default)]
pub struct RenderRequest {
    /// Overrides the template's stored sample data for this render.
    #[serde(default)]
    pub data: Option<Value>,
}

/// POST /api/templates/:ident/render - Proxy a PDF render to the backend.
///
/// The caller's bearer token is forwarded as-is; an inbound `X-Team-ID`
/// header (set by admin tooling while impersonating) is passed through as
/// the tenant-scope override.
pub async fn render(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    headers: HeaderMap,
    Path(ident): Path<String>,
    Json(body): Json<RenderRequest>,
) -> Result<Json<Value>, ApiError> {
    let template = state.templates.find_template(Some(&user), &ident).await?;
    let content = template
        .content
        .ok_or_else(|| ApiError::bad_request("Template has no content to render"))?;

    let impersonated_team_id = headers
        .get(TEAM_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let ctx = RequestContext {
        access_token: user.access_token.clone(),
        impersonated_team_id,
    };

    let data = body
        .data
        .unwrap_or_else(|| Value::Object(content.data.clone()));
    let payload = json!({
        "html": content.html,
        "css": content.css,
        "paper_format": content.paper_format,
        "page_orientation": content.page_orientation,
        "page_padding": content.page_padding,
        "infinite_mode": content.infinite_mode,
        "data": data,
    });

    let result = state.backend.post_json("/ui/pdf/create", &ctx, &payload).await?;
    Ok(Json(result))
}
