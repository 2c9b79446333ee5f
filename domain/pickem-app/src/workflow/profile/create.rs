use std::sync::Arc;

use crate::domain::{
    access_request::AccessRequestRepository,
    account::Account,
    enrollment::{EnrollmentError, EnrollmentPolicy},
    group::GroupRepository,
    membership::MembershipRepository,
    profile::{
        Avatar, InsertProfileError, InvalidProfileName, Profile, ProfileName, ProfileRepository,
    },
};

#[async_trait::async_trait]
pub trait CreateProfileUseCase {
    async fn create_profile(
        &self,
        account: &Account,
        raw_username: &str,
        avatar: Avatar,
    ) -> Result<Profile, CreateProfileError>;
}

#[derive(Debug)]
pub enum CreateProfileError {
    InvalidUsername(InvalidProfileName),
    UsernameTaken,
    StorageError,
}

pub struct CreateProfileUseCaseImpl<
    P: ProfileRepository,
    G: GroupRepository,
    M: MembershipRepository,
    R: AccessRequestRepository,
> {
    profile_repository: Arc<P>,
    group_repository: Arc<G>,
    membership_repository: Arc<M>,
    request_repository: Arc<R>,
}

impl<P: ProfileRepository, G: GroupRepository, M: MembershipRepository, R: AccessRequestRepository>
    CreateProfileUseCaseImpl<P, G, M, R>
{
    pub fn new(
        profile_repository: Arc<P>,
        group_repository: Arc<G>,
        membership_repository: Arc<M>,
        request_repository: Arc<R>,
    ) -> Self {
        Self {
            profile_repository,
            group_repository,
            membership_repository,
            request_repository,
        }
    }
}

#[async_trait::async_trait]
impl<P, G, M, R> CreateProfileUseCase for CreateProfileUseCaseImpl<P, G, M, R>
where
    P: ProfileRepository + Send + Sync + 'static,
    G: GroupRepository + Send + Sync + 'static,
    M: MembershipRepository + Send + Sync + 'static,
    R: AccessRequestRepository + Send + Sync + 'static,
{
    async fn create_profile(
        &self,
        account: &Account,
        raw_username: &str,
        avatar: Avatar,
    ) -> Result<Profile, CreateProfileError> {
        let username =
            ProfileName::parse(raw_username).map_err(CreateProfileError::InvalidUsername)?;

        // Fast path; the unique constraint below is the authority.
        let existing = self
            .profile_repository
            .find_by_username(&username)
            .await
            .map_err(|e| {
                log::error!("Failed to check username {}: {}", username, e);
                CreateProfileError::StorageError
            })?;
        if existing.is_some() {
            return Err(CreateProfileError::UsernameTaken);
        }

        let profile = Profile::new(account.account_id, username, avatar);
        match self.profile_repository.insert_profile(profile.clone()).await {
            Ok(()) => {}
            Err(InsertProfileError::UsernameTaken) => {
                return Err(CreateProfileError::UsernameTaken);
            }
            Err(InsertProfileError::StorageError(e)) => {
                log::error!("Failed to insert profile {}: {}", profile.username, e);
                return Err(CreateProfileError::StorageError);
            }
        }

        let active_group = self.group_repository.find_active().await.map_err(|e| {
            log::error!("Failed to look up the active group: {}", e);
            CreateProfileError::StorageError
        })?;

        if let Some(group) = active_group {
            let policy = EnrollmentPolicy::for_account(account);
            match policy
                .apply(
                    self.membership_repository.as_ref(),
                    self.request_repository.as_ref(),
                    &profile,
                    &group,
                )
                .await
            {
                Ok(outcome) => {
                    log::info!(
                        "Profile {} enrolled into group {} as {:?}",
                        profile.username,
                        group.name,
                        outcome
                    );
                }
                Err(EnrollmentError::StorageError(e)) => {
                    // The profile exists; the gate will route the user to
                    // request access on the next resolution.
                    log::error!(
                        "Enrollment of profile {} into group {} failed: {}",
                        profile.username,
                        group.name,
                        e
                    );
                }
            }
        }

        Ok(profile)
    }
}
