use serde_json::Value;
use thiserror::Error;

use super::{backend_url, RequestContext};

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// Thin JSON client for the rendering/admin backend. Credentials and tenant
/// scope come from the [`RequestContext`] on every call; no retry, no
/// timeout policy - callers impose those at the transport boundary.
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Client pointed at the configured backend (`BACKEND_URL` or fallback).
    pub fn from_env() -> Self {
        Self::new(backend_url())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn post_json(
        &self,
        path: &str,
        ctx: &RequestContext,
        body: &Value,
    ) -> Result<Value, BackendError> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        let mut request = self.http.post(&url).json(body);
        for (name, value) in ctx.headers() {
            request = request.header(&name, &value);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }
}
