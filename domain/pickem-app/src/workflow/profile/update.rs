use std::sync::Arc;

use crate::domain::{
    ProfileId,
    account::Account,
    profile::{
        Avatar, InsertProfileError, InvalidProfileName, Profile, ProfileName, ProfileRepository,
    },
};

#[async_trait::async_trait]
pub trait UpdateProfileUseCase {
    /// Rename a profile or swap its avatar. `None` fields are left
    /// untouched; ownership never changes.
    async fn update_profile(
        &self,
        account: &Account,
        profile_id: ProfileId,
        username: Option<&str>,
        avatar: Option<Avatar>,
    ) -> Result<Profile, UpdateProfileError>;
}

#[derive(Debug)]
pub enum UpdateProfileError {
    NotFound,
    /// Editing another account's profile by guessing an id.
    Forbidden,
    EmptyPatch,
    InvalidUsername(InvalidProfileName),
    UsernameTaken,
    StorageError,
}

pub struct UpdateProfileUseCaseImpl<P: ProfileRepository> {
    profile_repository: Arc<P>,
}

impl<P: ProfileRepository> UpdateProfileUseCaseImpl<P> {
    pub fn new(profile_repository: Arc<P>) -> Self {
        Self { profile_repository }
    }
}

#[async_trait::async_trait]
impl<P: ProfileRepository + Send + Sync + 'static> UpdateProfileUseCase
    for UpdateProfileUseCaseImpl<P>
{
    async fn update_profile(
        &self,
        account: &Account,
        profile_id: ProfileId,
        username: Option<&str>,
        avatar: Option<Avatar>,
    ) -> Result<Profile, UpdateProfileError> {
        if username.is_none() && avatar.is_none() {
            return Err(UpdateProfileError::EmptyPatch);
        }

        let profile = self
            .profile_repository
            .get_profile(profile_id)
            .await
            .map_err(|e| {
                log::error!("Failed to load profile {}: {}", profile_id, e);
                UpdateProfileError::StorageError
            })?
            .ok_or(UpdateProfileError::NotFound)?;
        if profile.account_id != account.account_id {
            return Err(UpdateProfileError::Forbidden);
        }

        let new_name = match username {
            Some(raw) => {
                Some(ProfileName::parse(raw).map_err(UpdateProfileError::InvalidUsername)?)
            }
            None => None,
        };

        // Renaming to the current name is a no-op, not a conflict. Any
        // other holder of the name wins via the unique constraint below.
        let updated = self
            .profile_repository
            .update_identity(
                profile_id,
                new_name.filter(|name| name != &profile.username),
                avatar,
            )
            .await
            .map_err(|e| match e {
                InsertProfileError::UsernameTaken => UpdateProfileError::UsernameTaken,
                InsertProfileError::StorageError(e) => {
                    log::error!("Failed to update profile {}: {}", profile_id, e);
                    UpdateProfileError::StorageError
                }
            })?;
        if !updated {
            return Err(UpdateProfileError::NotFound);
        }

        self.profile_repository
            .get_profile(profile_id)
            .await
            .map_err(|e| {
                log::error!("Failed to reload profile {}: {}", profile_id, e);
                UpdateProfileError::StorageError
            })?
            .ok_or(UpdateProfileError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccountId, profile::MockProfileRepository};

    fn account() -> Account {
        Account {
            account_id: AccountId(uuid::Uuid::new_v4()),
            display_name: "someone".to_string(),
            is_admin: false,
            is_suspended: false,
        }
    }

    fn fixture(owner: &Account, name: &str) -> (UpdateProfileUseCaseImpl<MockProfileRepository>, ProfileId) {
        let profile = Profile::new(
            owner.account_id,
            ProfileName::parse(name).unwrap(),
            Avatar::Fox,
        );
        let profile_id = profile.profile_id;
        let use_case = UpdateProfileUseCaseImpl::new(Arc::new(
            MockProfileRepository::default().with_profile(profile),
        ));
        (use_case, profile_id)
    }

    #[tokio::test]
    async fn owner_may_rename_and_change_avatar() {
        let owner = account();
        let (use_case, profile_id) = fixture(&owner, "alice");

        let updated = use_case
            .update_profile(&owner, profile_id, Some("Alice_2"), Some(Avatar::Owl))
            .await
            .unwrap();

        assert_eq!(updated.username.as_str(), "alice_2");
        assert_eq!(updated.avatar, Avatar::Owl);
    }

    #[tokio::test]
    async fn avatar_only_patch_keeps_the_username() {
        let owner = account();
        let (use_case, profile_id) = fixture(&owner, "alice");

        let updated = use_case
            .update_profile(&owner, profile_id, None, Some(Avatar::Shark))
            .await
            .unwrap();

        assert_eq!(updated.username.as_str(), "alice");
        assert_eq!(updated.avatar, Avatar::Shark);
    }

    #[tokio::test]
    async fn empty_patch_is_rejected() {
        let owner = account();
        let (use_case, profile_id) = fixture(&owner, "alice");

        let err = use_case
            .update_profile(&owner, profile_id, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, UpdateProfileError::EmptyPatch));
    }

    #[tokio::test]
    async fn foreign_profile_edits_are_forbidden() {
        let owner = account();
        let stranger = account();
        let (use_case, profile_id) = fixture(&owner, "alice");

        let err = use_case
            .update_profile(&stranger, profile_id, None, Some(Avatar::Owl))
            .await
            .unwrap_err();
        assert!(matches!(err, UpdateProfileError::Forbidden));
    }

    #[tokio::test]
    async fn renaming_onto_a_taken_username_conflicts() {
        let owner = account();
        let alice = Profile::new(
            owner.account_id,
            ProfileName::parse("alice").unwrap(),
            Avatar::Fox,
        );
        let bob = Profile::new(
            owner.account_id,
            ProfileName::parse("bob").unwrap(),
            Avatar::Bear,
        );
        let bob_id = bob.profile_id;
        let use_case = UpdateProfileUseCaseImpl::new(Arc::new(
            MockProfileRepository::default()
                .with_profile(alice)
                .with_profile(bob),
        ));

        let err = use_case
            .update_profile(&owner, bob_id, Some("Alice"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, UpdateProfileError::UsernameTaken));
    }

    #[tokio::test]
    async fn renaming_to_the_current_name_is_a_no_op() {
        let owner = account();
        let (use_case, profile_id) = fixture(&owner, "alice");

        let updated = use_case
            .update_profile(&owner, profile_id, Some("ALICE"), None)
            .await
            .unwrap();
        assert_eq!(updated.username.as_str(), "alice");
    }

    #[tokio::test]
    async fn invalid_usernames_never_reach_storage() {
        let owner = account();
        let (use_case, profile_id) = fixture(&owner, "alice");

        let err = use_case
            .update_profile(&owner, profile_id, Some("no spaces"), None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            UpdateProfileError::InvalidUsername(InvalidProfileName::InvalidCharacter)
        ));
    }
}
