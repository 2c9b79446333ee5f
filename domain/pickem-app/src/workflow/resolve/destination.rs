use std::sync::Arc;

use crate::{
    domain::{ProfileId, account::Account, profile::ProfileRepository},
    workflow::access::gate::{GateDecision, MembershipGateUseCase},
};

/// Where the router sends the requester. Derived from session presence,
/// the profile set, selection-pointer validity and the gate decision; the
/// same inputs always yield the same destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Login,
    CreateProfile,
    SelectProfile,
    RequestAccess { username: String },
    Dashboard,
    Admin,
}

#[derive(Debug)]
pub enum ResolveError {
    RepositoryError,
}

#[async_trait::async_trait]
pub trait ResolveDestinationUseCase {
    async fn resolve(
        &self,
        account: Option<&Account>,
        selected: Option<ProfileId>,
    ) -> Result<Destination, ResolveError>;
}

pub struct ResolveDestinationUseCaseImpl<P: ProfileRepository, GT: MembershipGateUseCase> {
    profile_repository: Arc<P>,
    membership_gate: Arc<GT>,
}

impl<P: ProfileRepository, GT: MembershipGateUseCase> ResolveDestinationUseCaseImpl<P, GT> {
    pub fn new(profile_repository: Arc<P>, membership_gate: Arc<GT>) -> Self {
        Self {
            profile_repository,
            membership_gate,
        }
    }
}

#[async_trait::async_trait]
impl<P, GT> ResolveDestinationUseCase for ResolveDestinationUseCaseImpl<P, GT>
where
    P: ProfileRepository + Send + Sync + 'static,
    GT: MembershipGateUseCase + Send + Sync + 'static,
{
    async fn resolve(
        &self,
        account: Option<&Account>,
        selected: Option<ProfileId>,
    ) -> Result<Destination, ResolveError> {
        let Some(account) = account else {
            return Ok(Destination::Login);
        };

        let profiles = self
            .profile_repository
            .list_by_account(account.account_id)
            .await
            .map_err(|e| {
                log::error!(
                    "Failed to list profiles for account {}: {}",
                    account.account_id,
                    e
                );
                ResolveError::RepositoryError
            })?;

        if profiles.is_empty() {
            return Ok(Destination::CreateProfile);
        }

        // A stale or foreign pointer means no selection, never an error.
        let selected_profile = selected.and_then(|profile_id| {
            profiles
                .iter()
                .find(|p| p.profile_id == profile_id)
                .cloned()
        });
        let Some(profile) = selected_profile else {
            return Ok(Destination::SelectProfile);
        };

        match self
            .membership_gate
            .check(profile.profile_id)
            .await
            .map_err(|_| ResolveError::RepositoryError)?
        {
            GateDecision::Granted => {
                if account.is_admin {
                    Ok(Destination::Admin)
                } else {
                    Ok(Destination::Dashboard)
                }
            }
            GateDecision::Denied(_) => Ok(Destination::RequestAccess {
                username: profile.username.as_str().to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            AccountId, GroupId, TournamentId,
            group::{Group, MockGroupRepository},
            membership::{Membership, MockMembershipRepository},
            profile::{Avatar, MockProfileRepository, Profile, ProfileName},
        },
        workflow::access::gate::MembershipGateUseCaseImpl,
    };

    fn account(is_admin: bool) -> Account {
        Account {
            account_id: AccountId(uuid::Uuid::new_v4()),
            display_name: "someone".to_string(),
            is_admin,
            is_suspended: false,
        }
    }

    fn active_group(name: &str) -> Group {
        Group {
            group_id: GroupId::new(),
            tournament_id: TournamentId(uuid::Uuid::new_v4()),
            name: name.to_string(),
            joinable: true,
            finished: false,
            created_at: chrono::Utc::now(),
        }
    }

    struct Fixture {
        profiles: MockProfileRepository,
        groups: MockGroupRepository,
        memberships: MockMembershipRepository,
        use_case: ResolveDestinationUseCaseImpl<
            MockProfileRepository,
            MembershipGateUseCaseImpl<MockGroupRepository, MockMembershipRepository>,
        >,
    }

    fn fixture() -> Fixture {
        let profiles = MockProfileRepository::default();
        let groups = MockGroupRepository::default();
        let memberships = MockMembershipRepository::default();
        let gate = MembershipGateUseCaseImpl::new(
            Arc::new(groups.clone()),
            Arc::new(memberships.clone()),
        );
        let use_case =
            ResolveDestinationUseCaseImpl::new(Arc::new(profiles.clone()), Arc::new(gate));
        Fixture {
            profiles,
            groups,
            memberships,
            use_case,
        }
    }

    #[tokio::test]
    async fn no_session_resolves_to_login() {
        let f = fixture();
        assert_eq!(
            f.use_case.resolve(None, None).await.unwrap(),
            Destination::Login
        );
    }

    #[tokio::test]
    async fn walkthrough_from_empty_account_to_dashboard() {
        // Scenario: zero profiles, then a profile without selection, then a
        // selection with no active group.
        let f = fixture();
        let owner = account(false);

        assert_eq!(
            f.use_case.resolve(Some(&owner), None).await.unwrap(),
            Destination::CreateProfile
        );

        let alice = Profile::new(
            owner.account_id,
            ProfileName::parse("alice").unwrap(),
            Avatar::Fox,
        );
        let alice_id = alice.profile_id;
        f.profiles.profiles.lock().unwrap().push(alice);

        assert_eq!(
            f.use_case.resolve(Some(&owner), None).await.unwrap(),
            Destination::SelectProfile
        );
        assert_eq!(
            f.use_case
                .resolve(Some(&owner), Some(alice_id))
                .await
                .unwrap(),
            Destination::Dashboard
        );
    }

    #[tokio::test]
    async fn denied_gate_routes_to_request_access_with_username() {
        // Scenario: active group exists, selected profile has no membership.
        let f = fixture();
        let owner = account(false);
        let group = active_group("NFL-2025");
        let group_id = group.group_id;
        f.groups.groups.lock().unwrap().push(group);

        let bob = Profile::new(
            owner.account_id,
            ProfileName::parse("bob").unwrap(),
            Avatar::Bear,
        );
        let bob_id = bob.profile_id;
        f.profiles.profiles.lock().unwrap().push(bob);

        assert_eq!(
            f.use_case
                .resolve(Some(&owner), Some(bob_id))
                .await
                .unwrap(),
            Destination::RequestAccess {
                username: "bob".to_string()
            }
        );

        f.memberships
            .memberships
            .lock()
            .unwrap()
            .push(Membership::new(bob_id, group_id));

        assert_eq!(
            f.use_case
                .resolve(Some(&owner), Some(bob_id))
                .await
                .unwrap(),
            Destination::Dashboard
        );
    }

    #[tokio::test]
    async fn granted_admins_land_on_the_admin_surface() {
        let f = fixture();
        let admin = account(true);
        let profile = Profile::new(
            admin.account_id,
            ProfileName::parse("commish").unwrap(),
            Avatar::Eagle,
        );
        let profile_id = profile.profile_id;
        f.profiles.profiles.lock().unwrap().push(profile);

        // No active group: open door, admin destination.
        assert_eq!(
            f.use_case
                .resolve(Some(&admin), Some(profile_id))
                .await
                .unwrap(),
            Destination::Admin
        );
    }

    #[tokio::test]
    async fn stale_or_foreign_pointer_falls_back_to_select_profile() {
        let f = fixture();
        let owner = account(false);
        let profile = Profile::new(
            owner.account_id,
            ProfileName::parse("alice").unwrap(),
            Avatar::Fox,
        );
        f.profiles.profiles.lock().unwrap().push(profile);

        // Dangling pointer.
        assert_eq!(
            f.use_case
                .resolve(Some(&owner), Some(ProfileId::new()))
                .await
                .unwrap(),
            Destination::SelectProfile
        );

        // Pointer at another account's profile.
        let stranger = account(false);
        let foreign = Profile::new(
            stranger.account_id,
            ProfileName::parse("mallory").unwrap(),
            Avatar::Shark,
        );
        let foreign_id = foreign.profile_id;
        f.profiles.profiles.lock().unwrap().push(foreign);

        assert_eq!(
            f.use_case
                .resolve(Some(&owner), Some(foreign_id))
                .await
                .unwrap(),
            Destination::SelectProfile
        );
    }

    #[tokio::test]
    async fn identical_inputs_yield_identical_destinations() {
        let f = fixture();
        let owner = account(false);
        let group = active_group("NFL-2025");
        f.groups.groups.lock().unwrap().push(group);
        let bob = Profile::new(
            owner.account_id,
            ProfileName::parse("bob").unwrap(),
            Avatar::Bear,
        );
        let bob_id = bob.profile_id;
        f.profiles.profiles.lock().unwrap().push(bob);

        let first = f.use_case.resolve(Some(&owner), Some(bob_id)).await.unwrap();
        for _ in 0..5 {
            let again = f.use_case.resolve(Some(&owner), Some(bob_id)).await.unwrap();
            assert_eq!(again, first);
        }
    }
}
