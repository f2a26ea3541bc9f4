use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::content::TemplateContent;

/// Template identity and bookkeeping. Content lives in its own row and is
/// replaced wholesale on every save; there is no revision history.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Template {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Secondary human-friendly identifier used in shareable URLs.
    pub short_id: Option<String>,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Template {
    pub fn new(user_id: Uuid, name: impl Into<String>, short_id: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            short_id: Some(short_id),
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A template together with its current content payload, as returned to
/// callers. `content` is `None` for a template that has never been saved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateWithContent {
    #[serde(flatten)]
    pub template: Template,
    pub content: Option<TemplateContent>,
}
