use std::sync::Arc;

use crate::domain::{
    GroupId,
    access_request::{AccessRequest, AccessRequestRepository},
    account::Account,
    group::{Group, GroupRepository},
    membership::{Membership, MembershipRepository},
};

/// Everything an admin needs to act on a group: the membership rows to
/// suspend and the access requests still waiting on a decision.
#[derive(Debug)]
pub struct GroupRoster {
    pub group: Group,
    pub memberships: Vec<Membership>,
    pub requests: Vec<AccessRequest>,
}

#[async_trait::async_trait]
pub trait GroupRosterUseCase {
    async fn group_roster(
        &self,
        actor: &Account,
        group_id: GroupId,
    ) -> Result<GroupRoster, GroupRosterError>;
}

#[derive(Debug)]
pub enum GroupRosterError {
    NotAdmin,
    GroupNotFound,
    StorageError,
}

pub struct GroupRosterUseCaseImpl<G: GroupRepository, M: MembershipRepository, R: AccessRequestRepository>
{
    group_repository: Arc<G>,
    membership_repository: Arc<M>,
    request_repository: Arc<R>,
}

impl<G: GroupRepository, M: MembershipRepository, R: AccessRequestRepository>
    GroupRosterUseCaseImpl<G, M, R>
{
    pub fn new(
        group_repository: Arc<G>,
        membership_repository: Arc<M>,
        request_repository: Arc<R>,
    ) -> Self {
        Self {
            group_repository,
            membership_repository,
            request_repository,
        }
    }
}

#[async_trait::async_trait]
impl<
    G: GroupRepository + Send + Sync + 'static,
    M: MembershipRepository + Send + Sync + 'static,
    R: AccessRequestRepository + Send + Sync + 'static,
> GroupRosterUseCase for GroupRosterUseCaseImpl<G, M, R>
{
    async fn group_roster(
        &self,
        actor: &Account,
        group_id: GroupId,
    ) -> Result<GroupRoster, GroupRosterError> {
        if !actor.is_admin {
            return Err(GroupRosterError::NotAdmin);
        }

        let group = self
            .group_repository
            .get_group(group_id)
            .await
            .map_err(|e| {
                log::error!("Failed to load group {}: {}", group_id, e);
                GroupRosterError::StorageError
            })?
            .ok_or(GroupRosterError::GroupNotFound)?;

        let memberships = self
            .membership_repository
            .list_for_group(group_id)
            .await
            .map_err(|e| {
                log::error!("Failed to list memberships of group {}: {}", group_id, e);
                GroupRosterError::StorageError
            })?;
        let requests = self
            .request_repository
            .list_for_group(group_id)
            .await
            .map_err(|e| {
                log::error!("Failed to list requests of group {}: {}", group_id, e);
                GroupRosterError::StorageError
            })?;

        Ok(GroupRoster {
            group,
            memberships,
            requests,
        })
    }
}
