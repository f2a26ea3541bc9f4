//! In-memory store backend.
//!
//! Used by the test suite and as the fallback when no `DATABASE_URL` is
//! configured. Mirrors the Postgres backend's observable behavior, including
//! the unique constraints on `id` and `short_id`.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{Profile, Template, TemplateContent};
use super::store::{ProfileStore, StoreError, TemplateStore};

#[derive(Default)]
struct Inner {
    templates: HashMap<Uuid, Template>,
    contents: HashMap<Uuid, TemplateContent>,
    profiles: HashMap<Uuid, Profile>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TemplateStore for MemoryStore {
    async fn insert_template(&self, template: &Template) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;

        if inner.templates.contains_key(&template.id) {
            return Err(StoreError::UniqueViolation(format!(
                "duplicate key value violates unique constraint \"templates_pkey\": {}",
                template.id
            )));
        }
        if let Some(short_id) = &template.short_id {
            let taken = inner
                .templates
                .values()
                .any(|t| t.short_id.as_deref() == Some(short_id.as_str()));
            if taken {
                return Err(StoreError::UniqueViolation(format!(
                    "duplicate key value violates unique constraint \"templates_short_id_key\": {short_id}"
                )));
            }
        }

        inner.templates.insert(template.id, template.clone());
        Ok(())
    }

    async fn get_template(&self, user_id: Uuid, id: Uuid) -> Result<Option<Template>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .templates
            .get(&id)
            .filter(|t| t.user_id == user_id)
            .cloned())
    }

    async fn get_template_by_short_id(
        &self,
        user_id: Uuid,
        short_id: &str,
    ) -> Result<Option<Template>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .templates
            .values()
            .find(|t| t.user_id == user_id && t.short_id.as_deref() == Some(short_id))
            .cloned())
    }

    async fn list_templates(&self, user_id: Uuid) -> Result<Vec<Template>, StoreError> {
        let inner = self.inner.read().await;
        let mut templates: Vec<Template> = inner
            .templates
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        templates.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(templates)
    }

    async fn rename_template(
        &self,
        user_id: Uuid,
        id: Uuid,
        name: &str,
    ) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        match inner.templates.get_mut(&id).filter(|t| t.user_id == user_id) {
            Some(template) => {
                template.name = name.to_string();
                template.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_template(&self, user_id: Uuid, id: Uuid) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        let owned = inner
            .templates
            .get(&id)
            .is_some_and(|t| t.user_id == user_id);
        if !owned {
            return Ok(false);
        }
        inner.templates.remove(&id);
        // Cascade: content has no lifecycle of its own.
        inner.contents.remove(&id);
        Ok(true)
    }

    async fn replace_content(
        &self,
        user_id: Uuid,
        id: Uuid,
        content: &TemplateContent,
    ) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        let Inner {
            templates, contents, ..
        } = &mut *inner;
        match templates.get_mut(&id).filter(|t| t.user_id == user_id) {
            Some(template) => {
                template.updated_at = Utc::now();
                contents.insert(id, content.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn get_content(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<TemplateContent>, StoreError> {
        let inner = self.inner.read().await;
        let owned = inner
            .templates
            .get(&id)
            .is_some_and(|t| t.user_id == user_id);
        if !owned {
            return Ok(None);
        }
        Ok(inner.contents.get(&id).cloned())
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.profiles.get(&user_id).cloned())
    }

    async fn set_onboarding_done(&self, user_id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let profile = inner
            .profiles
            .entry(user_id)
            .or_insert_with(|| Profile::new(user_id));
        profile.onboarding_done = true;
        profile.updated_at = Utc::now();
        Ok(())
    }

    async fn set_log_requests(&self, user_id: Uuid, enabled: bool) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let profile = inner
            .profiles
            .entry(user_id)
            .or_insert_with(|| Profile::new(user_id));
        profile.log_requests = enabled;
        profile.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shortid;

    fn template_for(user_id: Uuid) -> Template {
        Template::new(user_id, "Invoice", shortid::generate())
    }

    #[tokio::test]
    async fn short_id_collision_reports_unique_violation() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();

        let first = template_for(user);
        store.insert_template(&first).await.unwrap();

        let mut second = template_for(user);
        second.short_id = first.short_id.clone();
        let err = store.insert_template(&second).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation(_)));
    }

    #[tokio::test]
    async fn access_is_scoped_to_the_owner() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();

        let template = template_for(owner);
        store.insert_template(&template).await.unwrap();

        assert!(store.get_template(owner, template.id).await.unwrap().is_some());
        assert!(store.get_template(stranger, template.id).await.unwrap().is_none());
        assert!(!store.delete_template(stranger, template.id).await.unwrap());
        assert!(store.get_template(owner, template.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn delete_cascades_content() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let template = template_for(owner);
        store.insert_template(&template).await.unwrap();

        let content = TemplateContent::new("<p>hello</p>");
        assert!(store.replace_content(owner, template.id, &content).await.unwrap());
        assert!(store.delete_template(owner, template.id).await.unwrap());
        assert!(store.get_content(owner, template.id).await.unwrap().is_none());
    }
}
