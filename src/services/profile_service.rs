use std::sync::Arc;

use crate::database::models::Profile;
use crate::database::{ProfileStore, StoreError};
use crate::middleware::AuthUser;

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("not authenticated")]
    Unauthorized,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Idempotent, user-scoped settings flags. The authorization check always
/// precedes any store access, so an unauthenticated call can never mutate.
#[derive(Clone)]
pub struct ProfileService {
    store: Arc<dyn ProfileStore>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    fn require<'a>(auth: Option<&'a AuthUser>) -> Result<&'a AuthUser, ProfileError> {
        auth.ok_or(ProfileError::Unauthorized)
    }

    pub async fn get_profile(
        &self,
        auth: Option<&AuthUser>,
    ) -> Result<Option<Profile>, ProfileError> {
        let user = Self::require(auth)?;
        Ok(self.store.get_profile(user.id).await?)
    }

    /// Mark onboarding as finished. Calling it again is a no-op; the flag
    /// never transitions back to false.
    pub async fn complete_onboarding(&self, auth: Option<&AuthUser>) -> Result<(), ProfileError> {
        let user = Self::require(auth)?;
        self.store.set_onboarding_done(user.id).await?;
        Ok(())
    }

    /// Toggle request logging for the user's API key usage. Setting the same
    /// value twice changes nothing beyond `updated_at`.
    pub async fn set_log_requests(
        &self,
        auth: Option<&AuthUser>,
        enabled: bool,
    ) -> Result<(), ProfileError> {
        let user = Self::require(auth)?;
        self.store.set_log_requests(user.id, enabled).await?;
        Ok(())
    }
}
