//! Credential and tenant-scoping contract for calls to the rendering/admin
//! backend.
//!
//! Every privileged backend request carries a JSON content type and a bearer
//! token; administrative tooling may additionally scope a request to another
//! team via the `X-Team-ID` header (impersonation). Impersonation state is
//! written by the admin surface only - this module just reads it, and any
//! malformed stored record degrades to "not impersonating" instead of
//! failing the request.

pub mod client;

use std::collections::HashMap;

pub use client::BackendClient;

/// Header carrying the impersonated team's id.
pub const TEAM_ID_HEADER: &str = "X-Team-ID";

/// Fixed key under which the admin UI stores the impersonated team record
/// in the session-scoped store.
pub const IMPERSONATION_KEY: &str = "impersonating_team";

/// Base URL of the rendering/admin backend: `BACKEND_URL` when configured,
/// otherwise the placeholder fallback baked into the config presets.
pub fn backend_url() -> String {
    crate::config::config().backend.url.clone()
}

/// Session-scoped string store holding admin state, e.g. browser session
/// storage. Execution contexts without one (server-side, tests) simply pass
/// no store and resolve to "not impersonating".
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
}

impl SessionStore for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

/// Best-effort parse of the stored impersonation record `{ "id": ... }`.
///
/// Returns the team id only for a well-formed record with a non-empty string
/// `id`. Anything else - absent value, invalid JSON, wrong shape - yields
/// `None`; the failure is logged at debug level and never surfaced, so an
/// admin-only convenience can't break normal requests.
pub fn parse_impersonation(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(record) => match record.get("id").and_then(|id| id.as_str()) {
            Some(id) if !id.is_empty() => Some(id.to_string()),
            _ => {
                tracing::debug!("impersonation record has no usable id; ignoring");
                None
            }
        },
        Err(e) => {
            tracing::debug!("malformed impersonation record ignored: {}", e);
            None
        }
    }
}

/// Identity and tenant scope for one backend request, threaded explicitly
/// through call sites rather than read from ambient global state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub access_token: String,
    pub impersonated_team_id: Option<String>,
}

impl RequestContext {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            impersonated_team_id: None,
        }
    }

    pub fn impersonating(access_token: impl Into<String>, team_id: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            impersonated_team_id: Some(team_id.into()),
        }
    }

    /// Resolve impersonation from a session store, if one exists in this
    /// execution context. A missing store deterministically means no
    /// impersonation.
    pub fn from_session(
        access_token: impl Into<String>,
        session: Option<&dyn SessionStore>,
    ) -> Self {
        let stored = session.and_then(|s| s.get(IMPERSONATION_KEY));
        Self {
            access_token: access_token.into(),
            impersonated_team_id: parse_impersonation(stored.as_deref()),
        }
    }

    /// Headers for a backend request: always JSON content type and a bearer
    /// token, plus `X-Team-ID` only while impersonating.
    pub fn headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert(
            "Authorization".to_string(),
            format!("Bearer {}", self.access_token),
        );
        if let Some(team_id) = &self.impersonated_team_id {
            headers.insert(TEAM_ID_HEADER.to_string(), team_id.clone());
        }
        headers
    }
}
