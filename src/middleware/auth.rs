use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::{decode_access_token, Claims};
use crate::error::ApiError;

/// Authenticated principal extracted from the identity provider's access
/// token. The raw token is kept so outbound backend calls can forward it.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
    pub access_token: String,
}

impl AuthUser {
    fn from_claims(claims: Claims, access_token: String) -> Result<Self, String> {
        let id = Uuid::parse_str(&claims.sub)
            .map_err(|_| format!("Invalid subject claim: {}", claims.sub))?;
        Ok(Self {
            id,
            email: claims.email,
            access_token,
        })
    }
}

/// Authentication middleware: validates the bearer token and injects an
/// [`AuthUser`] into request extensions. Runs before any handler touches the
/// store, so unauthenticated requests never cause a partial mutation.
pub async fn jwt_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers).map_err(ApiError::unauthorized)?;
    let claims = decode_access_token(&token).map_err(ApiError::unauthorized)?;
    let auth_user = AuthUser::from_claims(claims, token).map_err(ApiError::unauthorized)?;

    request.extensions_mut().insert(auth_user);
    Ok(next.run(request).await)
}

/// Extract the bearer token from the Authorization header.
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty bearer token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}
