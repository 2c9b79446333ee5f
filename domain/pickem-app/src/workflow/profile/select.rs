use std::sync::Arc;

use crate::domain::{
    ProfileId,
    account::Account,
    profile::{Profile, ProfileRepository},
};

#[async_trait::async_trait]
pub trait SelectProfileUseCase {
    /// Validate that `profile_id` is owned by the calling account before
    /// the API layer persists the selection pointer.
    async fn select_profile(
        &self,
        account: &Account,
        profile_id: ProfileId,
    ) -> Result<Profile, SelectProfileError>;
}

#[derive(Debug)]
pub enum SelectProfileError {
    NotFound,
    /// Selecting another account's profile by guessing an id.
    Forbidden,
    StorageError,
}

pub struct SelectProfileUseCaseImpl<P: ProfileRepository> {
    profile_repository: Arc<P>,
}

impl<P: ProfileRepository> SelectProfileUseCaseImpl<P> {
    pub fn new(profile_repository: Arc<P>) -> Self {
        Self { profile_repository }
    }
}

#[async_trait::async_trait]
impl<P: ProfileRepository + Send + Sync + 'static> SelectProfileUseCase
    for SelectProfileUseCaseImpl<P>
{
    async fn select_profile(
        &self,
        account: &Account,
        profile_id: ProfileId,
    ) -> Result<Profile, SelectProfileError> {
        let profile = self
            .profile_repository
            .get_profile(profile_id)
            .await
            .map_err(|e| {
                log::error!("Failed to load profile {}: {}", profile_id, e);
                SelectProfileError::StorageError
            })?
            .ok_or(SelectProfileError::NotFound)?;

        if profile.account_id != account.account_id {
            return Err(SelectProfileError::Forbidden);
        }
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        AccountId,
        profile::{Avatar, MockProfileRepository, ProfileName},
    };

    fn account() -> Account {
        Account {
            account_id: AccountId(uuid::Uuid::new_v4()),
            display_name: "someone".to_string(),
            is_admin: false,
            is_suspended: false,
        }
    }

    #[tokio::test]
    async fn owner_may_select_their_profile() {
        let owner = account();
        let profile = Profile::new(
            owner.account_id,
            ProfileName::parse("alice").unwrap(),
            Avatar::Fox,
        );
        let profile_id = profile.profile_id;
        let use_case = SelectProfileUseCaseImpl::new(Arc::new(
            MockProfileRepository::default().with_profile(profile),
        ));

        let selected = use_case.select_profile(&owner, profile_id).await.unwrap();
        assert_eq!(selected.profile_id, profile_id);
    }

    #[tokio::test]
    async fn foreign_profile_selection_is_forbidden() {
        let owner = account();
        let stranger = account();
        let profile = Profile::new(
            owner.account_id,
            ProfileName::parse("alice").unwrap(),
            Avatar::Fox,
        );
        let profile_id = profile.profile_id;
        let use_case = SelectProfileUseCaseImpl::new(Arc::new(
            MockProfileRepository::default().with_profile(profile),
        ));

        let err = use_case
            .select_profile(&stranger, profile_id)
            .await
            .unwrap_err();
        assert!(matches!(err, SelectProfileError::Forbidden));
    }

    #[tokio::test]
    async fn missing_profile_is_not_found() {
        let use_case =
            SelectProfileUseCaseImpl::new(Arc::new(MockProfileRepository::default()));
        let err = use_case
            .select_profile(&account(), ProfileId::new())
            .await
            .unwrap_err();
        assert!(matches!(err, SelectProfileError::NotFound));
    }
}
