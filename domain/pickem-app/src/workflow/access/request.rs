use std::sync::Arc;

use crate::domain::{
    GroupId, ProfileId,
    access_request::{AccessRequest, AccessRequestRepository, InsertAccessRequestError},
    account::Account,
    group::GroupRepository,
    profile::ProfileRepository,
};

#[async_trait::async_trait]
pub trait RequestAccessUseCase {
    async fn request_access(
        &self,
        account: &Account,
        profile_id: ProfileId,
        group_id: GroupId,
    ) -> Result<AccessRequest, RequestAccessError>;
}

#[derive(Debug)]
pub enum RequestAccessError {
    ProfileNotFound,
    /// The profile belongs to a different account.
    Forbidden,
    GroupNotFound,
    /// The group is not accepting requests (not joinable or finished).
    GroupClosed,
    AlreadyRequested,
    StorageError,
}

pub struct RequestAccessUseCaseImpl<
    P: ProfileRepository,
    G: GroupRepository,
    R: AccessRequestRepository,
> {
    profile_repository: Arc<P>,
    group_repository: Arc<G>,
    request_repository: Arc<R>,
}

impl<P: ProfileRepository, G: GroupRepository, R: AccessRequestRepository>
    RequestAccessUseCaseImpl<P, G, R>
{
    pub fn new(
        profile_repository: Arc<P>,
        group_repository: Arc<G>,
        request_repository: Arc<R>,
    ) -> Self {
        Self {
            profile_repository,
            group_repository,
            request_repository,
        }
    }
}

#[async_trait::async_trait]
impl<P, G, R> RequestAccessUseCase for RequestAccessUseCaseImpl<P, G, R>
where
    P: ProfileRepository + Send + Sync + 'static,
    G: GroupRepository + Send + Sync + 'static,
    R: AccessRequestRepository + Send + Sync + 'static,
{
    async fn request_access(
        &self,
        account: &Account,
        profile_id: ProfileId,
        group_id: GroupId,
    ) -> Result<AccessRequest, RequestAccessError> {
        let profile = self
            .profile_repository
            .get_profile(profile_id)
            .await
            .map_err(|e| {
                log::error!("Failed to load profile {}: {}", profile_id, e);
                RequestAccessError::StorageError
            })?
            .ok_or(RequestAccessError::ProfileNotFound)?;

        if profile.account_id != account.account_id {
            return Err(RequestAccessError::Forbidden);
        }

        let group = self
            .group_repository
            .get_group(group_id)
            .await
            .map_err(|e| {
                log::error!("Failed to load group {}: {}", group_id, e);
                RequestAccessError::StorageError
            })?
            .ok_or(RequestAccessError::GroupNotFound)?;

        if !group.is_active() {
            return Err(RequestAccessError::GroupClosed);
        }

        // Fast path; the unique constraint below is the authority.
        let pending = self
            .request_repository
            .has_pending(profile_id, group_id)
            .await
            .map_err(|e| {
                log::error!(
                    "Failed to check pending request for profile {}: {}",
                    profile_id,
                    e
                );
                RequestAccessError::StorageError
            })?;
        if pending {
            return Err(RequestAccessError::AlreadyRequested);
        }

        let request = AccessRequest::new(profile_id, group_id);
        match self.request_repository.insert_request(request.clone()).await {
            Ok(()) => Ok(request),
            Err(InsertAccessRequestError::AlreadyRequested) => {
                Err(RequestAccessError::AlreadyRequested)
            }
            Err(InsertAccessRequestError::StorageError(e)) => {
                log::error!(
                    "Failed to insert access request for profile {}: {}",
                    profile_id,
                    e
                );
                Err(RequestAccessError::StorageError)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        AccountId, TournamentId,
        access_request::MockAccessRequestRepository,
        group::{Group, MockGroupRepository},
        profile::{Avatar, MockProfileRepository, Profile, ProfileName},
    };

    fn account() -> Account {
        Account {
            account_id: AccountId(uuid::Uuid::new_v4()),
            display_name: "bob".to_string(),
            is_admin: false,
            is_suspended: false,
        }
    }

    fn group(joinable: bool, finished: bool) -> Group {
        Group {
            group_id: GroupId::new(),
            tournament_id: TournamentId(uuid::Uuid::new_v4()),
            name: "NFL-2025".to_string(),
            joinable,
            finished,
            created_at: chrono::Utc::now(),
        }
    }

    fn use_case(
        profiles: MockProfileRepository,
        groups: MockGroupRepository,
        requests: MockAccessRequestRepository,
    ) -> RequestAccessUseCaseImpl<
        MockProfileRepository,
        MockGroupRepository,
        MockAccessRequestRepository,
    > {
        RequestAccessUseCaseImpl::new(Arc::new(profiles), Arc::new(groups), Arc::new(requests))
    }

    #[tokio::test]
    async fn second_request_for_the_same_pair_conflicts() {
        let owner = account();
        let profile = Profile::new(
            owner.account_id,
            ProfileName::parse("bob").unwrap(),
            Avatar::Fox,
        );
        let profile_id = profile.profile_id;
        let active = group(true, false);
        let group_id = active.group_id;

        let requests = MockAccessRequestRepository::default();
        let use_case = use_case(
            MockProfileRepository::default().with_profile(profile),
            MockGroupRepository::default().with_group(active),
            requests.clone(),
        );

        use_case
            .request_access(&owner, profile_id, group_id)
            .await
            .unwrap();
        let err = use_case
            .request_access(&owner, profile_id, group_id)
            .await
            .unwrap_err();

        assert!(matches!(err, RequestAccessError::AlreadyRequested));
        assert_eq!(requests.all().len(), 1);
    }

    #[tokio::test]
    async fn losing_the_insert_race_maps_to_the_same_conflict() {
        let owner = account();
        let profile = Profile::new(
            owner.account_id,
            ProfileName::parse("bob").unwrap(),
            Avatar::Fox,
        );
        let profile_id = profile.profile_id;
        let active = group(true, false);
        let group_id = active.group_id;

        // A denied request occupies the pair: the pre-check passes (it only
        // sees pending rows) but the insert hits the unique constraint.
        let mut denied = AccessRequest::new(profile_id, group_id);
        denied.denied = true;
        let requests = MockAccessRequestRepository::default().with_request(denied);

        let use_case = use_case(
            MockProfileRepository::default().with_profile(profile),
            MockGroupRepository::default().with_group(active),
            requests.clone(),
        );

        let err = use_case
            .request_access(&owner, profile_id, group_id)
            .await
            .unwrap_err();
        assert!(matches!(err, RequestAccessError::AlreadyRequested));
        assert_eq!(requests.all().len(), 1);
    }

    #[tokio::test]
    async fn foreign_profiles_are_forbidden() {
        let owner = account();
        let stranger = account();
        let profile = Profile::new(
            owner.account_id,
            ProfileName::parse("bob").unwrap(),
            Avatar::Fox,
        );
        let profile_id = profile.profile_id;
        let active = group(true, false);
        let group_id = active.group_id;

        let use_case = use_case(
            MockProfileRepository::default().with_profile(profile),
            MockGroupRepository::default().with_group(active),
            MockAccessRequestRepository::default(),
        );

        let err = use_case
            .request_access(&stranger, profile_id, group_id)
            .await
            .unwrap_err();
        assert!(matches!(err, RequestAccessError::Forbidden));
    }

    #[tokio::test]
    async fn closed_groups_reject_requests() {
        let owner = account();
        let profile = Profile::new(
            owner.account_id,
            ProfileName::parse("bob").unwrap(),
            Avatar::Fox,
        );
        let profile_id = profile.profile_id;

        for (joinable, finished) in [(false, false), (true, true), (false, true)] {
            let closed = group(joinable, finished);
            let group_id = closed.group_id;
            let use_case = use_case(
                MockProfileRepository::default().with_profile(profile.clone()),
                MockGroupRepository::default().with_group(closed),
                MockAccessRequestRepository::default(),
            );

            let err = use_case
                .request_access(&owner, profile_id, group_id)
                .await
                .unwrap_err();
            assert!(matches!(err, RequestAccessError::GroupClosed));
        }
    }
}
