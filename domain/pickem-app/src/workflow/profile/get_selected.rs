use std::sync::Arc;

use crate::domain::{
    AccountId, ProfileId,
    profile::{Profile, ProfileRepository},
};

#[async_trait::async_trait]
pub trait GetSelectedProfileUseCase {
    /// Resolve the session's selection pointer. Ownership is re-validated
    /// on every call; an absent, dangling or foreign pointer is `None`,
    /// never an error.
    async fn get_selected(
        &self,
        account_id: AccountId,
        selected: Option<ProfileId>,
    ) -> Result<Option<Profile>, GetSelectedProfileError>;
}

#[derive(Debug)]
pub enum GetSelectedProfileError {
    RepositoryError,
}

pub struct GetSelectedProfileUseCaseImpl<P: ProfileRepository> {
    profile_repository: Arc<P>,
}

impl<P: ProfileRepository> GetSelectedProfileUseCaseImpl<P> {
    pub fn new(profile_repository: Arc<P>) -> Self {
        Self { profile_repository }
    }
}

#[async_trait::async_trait]
impl<P: ProfileRepository + Send + Sync + 'static> GetSelectedProfileUseCase
    for GetSelectedProfileUseCaseImpl<P>
{
    async fn get_selected(
        &self,
        account_id: AccountId,
        selected: Option<ProfileId>,
    ) -> Result<Option<Profile>, GetSelectedProfileError> {
        let Some(profile_id) = selected else {
            return Ok(None);
        };
        let profile = self
            .profile_repository
            .get_profile(profile_id)
            .await
            .map_err(|e| {
                log::error!("Failed to load profile {}: {}", profile_id, e);
                GetSelectedProfileError::RepositoryError
            })?;
        Ok(profile.filter(|p| p.account_id == account_id))
    }
}
