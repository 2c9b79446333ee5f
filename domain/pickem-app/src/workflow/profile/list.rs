use std::sync::Arc;

use crate::domain::{AccountId, profile::{Profile, ProfileRepository}};

#[async_trait::async_trait]
pub trait ListProfilesUseCase {
    /// Profiles owned by the account, sorted by username for display.
    async fn list_profiles(&self, account_id: AccountId)
    -> Result<Vec<Profile>, ListProfilesError>;
}

#[derive(Debug)]
pub enum ListProfilesError {
    RepositoryError,
}

pub struct ListProfilesUseCaseImpl<P: ProfileRepository> {
    profile_repository: Arc<P>,
}

impl<P: ProfileRepository> ListProfilesUseCaseImpl<P> {
    pub fn new(profile_repository: Arc<P>) -> Self {
        Self { profile_repository }
    }
}

#[async_trait::async_trait]
impl<P: ProfileRepository + Send + Sync + 'static> ListProfilesUseCase
    for ListProfilesUseCaseImpl<P>
{
    async fn list_profiles(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<Profile>, ListProfilesError> {
        let mut profiles = self
            .profile_repository
            .list_by_account(account_id)
            .await
            .map_err(|e| {
                log::error!("Failed to list profiles for account {}: {}", account_id, e);
                ListProfilesError::RepositoryError
            })?;
        profiles.sort_by(|a, b| a.username.as_str().cmp(b.username.as_str()));
        Ok(profiles)
    }
}
