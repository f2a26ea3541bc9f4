use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Per-user settings row. Flags here are idempotent toggles: writing the
/// same value twice changes nothing beyond `updated_at`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    /// Set once when the user finishes onboarding; never reverts to false.
    pub onboarding_done: bool,
    /// Whether the backend records request logs for this user's API keys.
    pub log_requests: bool,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            onboarding_done: false,
            log_requests: true,
            updated_at: Utc::now(),
        }
    }
}
