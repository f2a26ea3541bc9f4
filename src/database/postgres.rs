//! Postgres store backend over sqlx.
//!
//! Templates keep identity/bookkeeping in `templates`; the single live
//! content payload sits in `template_contents` with `ON DELETE CASCADE`, so
//! deleting a template can never orphan content. Uniqueness on `id` and
//! `short_id` is enforced here and reported as [`StoreError::UniqueViolation`]
//! (SQLSTATE 23505) for callers that retry short-id generation.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::config;

use super::models::{
    PagePadding, PaperFormat, PageOrientation, Profile, Template, TemplateContent,
};
use super::store::{ProfileStore, StoreError, TemplateStore};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS templates (
    id          UUID PRIMARY KEY,
    user_id     UUID NOT NULL,
    short_id    TEXT UNIQUE,
    name        TEXT NOT NULL,
    created_at  TIMESTAMPTZ NOT NULL,
    updated_at  TIMESTAMPTZ NOT NULL
);
CREATE INDEX IF NOT EXISTS templates_user_id_idx ON templates (user_id);

CREATE TABLE IF NOT EXISTS template_contents (
    template_id       UUID PRIMARY KEY REFERENCES templates(id) ON DELETE CASCADE,
    html_content      TEXT NOT NULL,
    css_content       TEXT,
    paper_format      TEXT,
    page_orientation  TEXT,
    page_padding      JSONB,
    infinite_mode     BOOLEAN NOT NULL DEFAULT FALSE,
    sample_data       JSONB NOT NULL DEFAULT '{}'::jsonb
);

CREATE TABLE IF NOT EXISTS profiles (
    id               UUID PRIMARY KEY,
    onboarding_done  BOOLEAN NOT NULL DEFAULT FALSE,
    log_requests     BOOLEAN NOT NULL DEFAULT TRUE,
    updated_at       TIMESTAMPTZ NOT NULL DEFAULT now()
);
"#;

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect using pool sizing from the app config and make sure the
    /// schema exists.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let db = &config::config().database;
        let pool = PgPoolOptions::new()
            .max_connections(db.max_connections)
            .acquire_timeout(Duration::from_secs(db.connection_timeout))
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        use sqlx::Executor;
        self.pool.execute(SCHEMA).await.map_err(map_sqlx_err)?;
        Ok(())
    }
}

fn map_sqlx_err(e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
            StoreError::UniqueViolation(db.message().to_string())
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => StoreError::Connection(e.to_string()),
        _ => StoreError::Query(e.to_string()),
    }
}

/// Layout enums travel through their plain serde string forms, so the text
/// columns hold exactly what the JSON wire format carries.
fn enum_to_text<T: serde::Serialize>(value: &Option<T>) -> Option<String> {
    value.as_ref().and_then(|v| match serde_json::to_value(v) {
        Ok(Value::String(s)) => Some(s),
        _ => None,
    })
}

fn enum_from_text<T: serde::de::DeserializeOwned>(text: Option<String>) -> Option<T> {
    text.and_then(|s| serde_json::from_value(Value::String(s)).ok())
}

fn content_from_row(row: &sqlx::postgres::PgRow) -> Result<TemplateContent, StoreError> {
    let padding: Option<Value> = row.try_get("page_padding").map_err(map_sqlx_err)?;
    let sample_data: Value = row.try_get("sample_data").map_err(map_sqlx_err)?;

    Ok(TemplateContent {
        html: row.try_get("html_content").map_err(map_sqlx_err)?,
        css: row.try_get("css_content").map_err(map_sqlx_err)?,
        paper_format: enum_from_text::<PaperFormat>(
            row.try_get("paper_format").map_err(map_sqlx_err)?,
        ),
        page_orientation: enum_from_text::<PageOrientation>(
            row.try_get("page_orientation").map_err(map_sqlx_err)?,
        ),
        page_padding: padding.and_then(|v| serde_json::from_value::<PagePadding>(v).ok()),
        infinite_mode: row.try_get("infinite_mode").map_err(map_sqlx_err)?,
        data: sample_data.as_object().cloned().unwrap_or_default(),
    })
}

#[async_trait]
impl TemplateStore for PostgresStore {
    async fn insert_template(&self, template: &Template) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO templates (id, user_id, short_id, name, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(template.id)
        .bind(template.user_id)
        .bind(&template.short_id)
        .bind(&template.name)
        .bind(template.created_at)
        .bind(template.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;
        Ok(())
    }

    async fn get_template(&self, user_id: Uuid, id: Uuid) -> Result<Option<Template>, StoreError> {
        sqlx::query_as::<_, Template>(
            "SELECT id, user_id, short_id, name, created_at, updated_at
             FROM templates WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)
    }

    async fn get_template_by_short_id(
        &self,
        user_id: Uuid,
        short_id: &str,
    ) -> Result<Option<Template>, StoreError> {
        sqlx::query_as::<_, Template>(
            "SELECT id, user_id, short_id, name, created_at, updated_at
             FROM templates WHERE short_id = $1 AND user_id = $2",
        )
        .bind(short_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)
    }

    async fn list_templates(&self, user_id: Uuid) -> Result<Vec<Template>, StoreError> {
        sqlx::query_as::<_, Template>(
            "SELECT id, user_id, short_id, name, created_at, updated_at
             FROM templates WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)
    }

    async fn rename_template(
        &self,
        user_id: Uuid,
        id: Uuid,
        name: &str,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE templates SET name = $3, updated_at = now()
             WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .bind(name)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_template(&self, user_id: Uuid, id: Uuid) -> Result<bool, StoreError> {
        // Content goes with it via ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM templates WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn replace_content(
        &self,
        user_id: Uuid,
        id: Uuid,
        content: &TemplateContent,
    ) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_err)?;

        let touched = sqlx::query(
            "UPDATE templates SET updated_at = now() WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_err)?;

        if touched.rows_affected() == 0 {
            return Ok(false);
        }

        let padding = content
            .page_padding
            .as_ref()
            .map(|p| serde_json::to_value(p).unwrap_or(Value::Null));

        sqlx::query(
            "INSERT INTO template_contents
                 (template_id, html_content, css_content, paper_format,
                  page_orientation, page_padding, infinite_mode, sample_data)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT (template_id) DO UPDATE SET
                 html_content = EXCLUDED.html_content,
                 css_content = EXCLUDED.css_content,
                 paper_format = EXCLUDED.paper_format,
                 page_orientation = EXCLUDED.page_orientation,
                 page_padding = EXCLUDED.page_padding,
                 infinite_mode = EXCLUDED.infinite_mode,
                 sample_data = EXCLUDED.sample_data",
        )
        .bind(id)
        .bind(&content.html)
        .bind(&content.css)
        .bind(enum_to_text(&content.paper_format))
        .bind(enum_to_text(&content.page_orientation))
        .bind(padding)
        .bind(content.infinite_mode)
        .bind(Value::Object(content.data.clone()))
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_err)?;

        tx.commit().await.map_err(map_sqlx_err)?;
        Ok(true)
    }

    async fn get_content(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<TemplateContent>, StoreError> {
        let row = sqlx::query(
            "SELECT c.html_content, c.css_content, c.paper_format, c.page_orientation,
                    c.page_padding, c.infinite_mode, c.sample_data
             FROM template_contents c
             JOIN templates t ON t.id = c.template_id
             WHERE t.id = $1 AND t.user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        row.as_ref().map(content_from_row).transpose()
    }
}

#[async_trait]
impl ProfileStore for PostgresStore {
    async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError> {
        sqlx::query_as::<_, Profile>(
            "SELECT id, onboarding_done, log_requests, updated_at FROM profiles WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)
    }

    async fn set_onboarding_done(&self, user_id: Uuid) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO profiles (id, onboarding_done, updated_at)
             VALUES ($1, TRUE, now())
             ON CONFLICT (id) DO UPDATE SET onboarding_done = TRUE, updated_at = now()",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;
        Ok(())
    }

    async fn set_log_requests(&self, user_id: Uuid, enabled: bool) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO profiles (id, log_requests, updated_at)
             VALUES ($1, $2, now())
             ON CONFLICT (id) DO UPDATE SET log_requests = EXCLUDED.log_requests, updated_at = now()",
        )
        .bind(user_id)
        .bind(enabled)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;
        Ok(())
    }
}
