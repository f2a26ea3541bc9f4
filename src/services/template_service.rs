use std::sync::Arc;

use uuid::Uuid;

use crate::database::models::{ContentError, Template, TemplateContent, TemplateWithContent};
use crate::database::{StoreError, TemplateStore};
use crate::middleware::AuthUser;
use crate::shortid;

/// Attempts at generating a short id before giving up. Collisions are
/// cryptographically unlikely, so more than one retry means something else
/// is wrong.
const SHORT_ID_ATTEMPTS: usize = 3;

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("not authenticated")]
    Unauthorized,
    #[error("template not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error("could not allocate a unique short id after {0} attempts")]
    ShortIdExhausted(usize),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Owner-scoped template operations over the store contract.
///
/// Content saves are full-replace with last-write-wins semantics; two
/// concurrent saves race at that granularity and the later one sticks.
/// There is no version or etag check - an accepted limitation.
#[derive(Clone)]
pub struct TemplateService {
    store: Arc<dyn TemplateStore>,
}

impl TemplateService {
    pub fn new(store: Arc<dyn TemplateStore>) -> Self {
        Self { store }
    }

    fn require<'a>(auth: Option<&'a AuthUser>) -> Result<&'a AuthUser, TemplateError> {
        auth.ok_or(TemplateError::Unauthorized)
    }

    /// Create a template, allocating a fresh short id, and attach its
    /// initial content when supplied. Validation runs before any store
    /// write.
    pub async fn create_template(
        &self,
        auth: Option<&AuthUser>,
        name: &str,
        content: Option<TemplateContent>,
    ) -> Result<TemplateWithContent, TemplateError> {
        let user = Self::require(auth)?;

        if name.trim().is_empty() {
            return Err(ContentError::MissingRequiredField("name").into());
        }
        if let Some(content) = &content {
            content.validate()?;
        }

        let template = self.insert_with_short_id(user.id, name).await?;

        if let Some(content) = &content {
            self.store
                .replace_content(user.id, template.id, content)
                .await?;
        }

        Ok(TemplateWithContent { template, content })
    }

    /// Insert with a generated short id, retrying generation on a
    /// unique-constraint violation.
    async fn insert_with_short_id(
        &self,
        user_id: Uuid,
        name: &str,
    ) -> Result<Template, TemplateError> {
        for attempt in 1..=SHORT_ID_ATTEMPTS {
            let template = Template::new(user_id, name, shortid::generate());
            match self.store.insert_template(&template).await {
                Ok(()) => return Ok(template),
                Err(StoreError::UniqueViolation(msg)) if attempt < SHORT_ID_ATTEMPTS => {
                    tracing::warn!(attempt, "short id collision, regenerating: {}", msg);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(TemplateError::ShortIdExhausted(SHORT_ID_ATTEMPTS))
    }

    /// Look up a template by primary id or short id, with its current
    /// content.
    pub async fn find_template(
        &self,
        auth: Option<&AuthUser>,
        ident: &str,
    ) -> Result<TemplateWithContent, TemplateError> {
        let user = Self::require(auth)?;

        let template = match Uuid::parse_str(ident) {
            Ok(id) => self.store.get_template(user.id, id).await?,
            Err(_) => self.store.get_template_by_short_id(user.id, ident).await?,
        }
        .ok_or_else(|| TemplateError::NotFound(ident.to_string()))?;

        let content = self.store.get_content(user.id, template.id).await?;
        Ok(TemplateWithContent { template, content })
    }

    pub async fn list_templates(
        &self,
        auth: Option<&AuthUser>,
    ) -> Result<Vec<Template>, TemplateError> {
        let user = Self::require(auth)?;
        Ok(self.store.list_templates(user.id).await?)
    }

    /// Overwrite the template's entire content payload. No field-level
    /// patch exists; callers send the complete value every time.
    pub async fn save_content(
        &self,
        auth: Option<&AuthUser>,
        id: Uuid,
        content: &TemplateContent,
    ) -> Result<(), TemplateError> {
        let user = Self::require(auth)?;
        content.validate()?;

        let replaced = self.store.replace_content(user.id, id, content).await?;
        if !replaced {
            return Err(TemplateError::NotFound(id.to_string()));
        }
        Ok(())
    }

    pub async fn rename_template(
        &self,
        auth: Option<&AuthUser>,
        id: Uuid,
        name: &str,
    ) -> Result<(), TemplateError> {
        let user = Self::require(auth)?;
        if name.trim().is_empty() {
            return Err(ContentError::MissingRequiredField("name").into());
        }

        let renamed = self.store.rename_template(user.id, id, name).await?;
        if !renamed {
            return Err(TemplateError::NotFound(id.to_string()));
        }
        Ok(())
    }

    pub async fn delete_template(
        &self,
        auth: Option<&AuthUser>,
        id: Uuid,
    ) -> Result<(), TemplateError> {
        let user = Self::require(auth)?;
        let deleted = self.store.delete_template(user.id, id).await?;
        if !deleted {
            return Err(TemplateError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
