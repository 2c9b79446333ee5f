use std::sync::Arc;

use crate::domain::{
    ProfileId,
    group::GroupRepository,
    membership::MembershipRepository,
};

/// The authorization check every protected entry point runs before
/// rendering. `Denied` is a routing signal, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Granted,
    Denied(DenialReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    NoMembership,
    Suspended,
}

#[derive(Debug)]
pub enum GateError {
    RepositoryError,
}

#[async_trait::async_trait]
pub trait MembershipGateUseCase {
    async fn check(&self, profile_id: ProfileId) -> Result<GateDecision, GateError>;
}

pub struct MembershipGateUseCaseImpl<G: GroupRepository, M: MembershipRepository> {
    group_repository: Arc<G>,
    membership_repository: Arc<M>,
}

impl<G: GroupRepository, M: MembershipRepository> MembershipGateUseCaseImpl<G, M> {
    pub fn new(group_repository: Arc<G>, membership_repository: Arc<M>) -> Self {
        Self {
            group_repository,
            membership_repository,
        }
    }
}

#[async_trait::async_trait]
impl<G, M> MembershipGateUseCase for MembershipGateUseCaseImpl<G, M>
where
    G: GroupRepository + Send + Sync + 'static,
    M: MembershipRepository + Send + Sync + 'static,
{
    async fn check(&self, profile_id: ProfileId) -> Result<GateDecision, GateError> {
        let active_group = self.group_repository.find_active().await.map_err(|e| {
            log::error!("Failed to look up the active group: {}", e);
            GateError::RepositoryError
        })?;

        // No active competition means nothing to gate.
        let Some(group) = active_group else {
            return Ok(GateDecision::Granted);
        };

        let membership = self
            .membership_repository
            .find(profile_id, group.group_id)
            .await
            .map_err(|e| {
                log::error!(
                    "Failed to look up membership for profile {}: {}",
                    profile_id,
                    e
                );
                GateError::RepositoryError
            })?;

        Ok(match membership {
            Some(membership) if !membership.suspended => GateDecision::Granted,
            Some(_) => GateDecision::Denied(DenialReason::Suspended),
            None => GateDecision::Denied(DenialReason::NoMembership),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        GroupId, TournamentId,
        group::{Group, MockGroupRepository},
        membership::{Membership, MockMembershipRepository},
    };

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

    fn gate(
        groups: MockGroupRepository,
        memberships: MockMembershipRepository,
    ) -> MembershipGateUseCaseImpl<MockGroupRepository, MockMembershipRepository> {
        MembershipGateUseCaseImpl::new(Arc::new(groups), Arc::new(memberships))
    }

    #[tokio::test]
    async fn grants_everyone_when_no_group_is_active() {
        let groups = MockGroupRepository::default().with_group(group(false, false));
        let gate = gate(groups, MockMembershipRepository::default());

        let decision = gate.check(ProfileId::new()).await.unwrap();
        assert_eq!(decision, GateDecision::Granted);
    }

    #[tokio::test]
    async fn denies_without_membership_in_the_active_group() {
        let groups = MockGroupRepository::default().with_group(group(true, false));
        let gate = gate(groups, MockMembershipRepository::default());

        let decision = gate.check(ProfileId::new()).await.unwrap();
        assert_eq!(decision, GateDecision::Denied(DenialReason::NoMembership));
    }

    #[tokio::test]
    async fn suspension_flips_granted_to_denied() {
        let active = group(true, false);
        let profile_id = ProfileId::new();
        let membership = Membership::new(profile_id, active.group_id);
        let membership_id = membership.membership_id;

        let groups = MockGroupRepository::default().with_group(active);
        let memberships = MockMembershipRepository::default().with_membership(membership);
        let gate = gate(groups, memberships.clone());

        assert_eq!(gate.check(profile_id).await.unwrap(), GateDecision::Granted);

        memberships.set_suspended(membership_id, true).await.unwrap();
        assert_eq!(
            gate.check(profile_id).await.unwrap(),
            GateDecision::Denied(DenialReason::Suspended)
        );
        // No other row was touched.
        assert_eq!(memberships.all().len(), 1);
    }
}
