use std::sync::Arc;

use crate::{
    domain::{MembershipId, account::Account, membership::MembershipRepository},
    workflow::admin::{BulkOutcome, BulkReport},
};

#[async_trait::async_trait]
pub trait SuspendMembershipsUseCase {
    /// Suspend or reactivate memberships, one row at a time. No invariant
    /// couples two rows, so partial success is fine and reported per id.
    async fn set_suspension(
        &self,
        actor: &Account,
        membership_ids: &[MembershipId],
        suspended: bool,
    ) -> Result<BulkReport<MembershipId>, SuspendMembershipsError>;
}

#[derive(Debug)]
pub enum SuspendMembershipsError {
    NotAdmin,
    StorageError,
}

pub struct SuspendMembershipsUseCaseImpl<M: MembershipRepository> {
    membership_repository: Arc<M>,
}

impl<M: MembershipRepository> SuspendMembershipsUseCaseImpl<M> {
    pub fn new(membership_repository: Arc<M>) -> Self {
        Self {
            membership_repository,
        }
    }
}

#[async_trait::async_trait]
impl<M: MembershipRepository + Send + Sync + 'static> SuspendMembershipsUseCase
    for SuspendMembershipsUseCaseImpl<M>
{
    async fn set_suspension(
        &self,
        actor: &Account,
        membership_ids: &[MembershipId],
        suspended: bool,
    ) -> Result<BulkReport<MembershipId>, SuspendMembershipsError> {
        if !actor.is_admin {
            return Err(SuspendMembershipsError::NotAdmin);
        }

        let mut results = Vec::with_capacity(membership_ids.len());
        for &membership_id in membership_ids {
            let updated = self
                .membership_repository
                .set_suspended(membership_id, suspended)
                .await
                .map_err(|e| {
                    log::error!("Failed to update membership {}: {}", membership_id, e);
                    SuspendMembershipsError::StorageError
                })?;
            let outcome = if updated {
                BulkOutcome::Updated
            } else {
                BulkOutcome::NotFound
            };
            results.push((membership_id, outcome));
        }

        log::info!(
            "Admin {} set suspended={} on {} of {} memberships",
            actor.account_id,
            suspended,
            results
                .iter()
                .filter(|(_, o)| *o == BulkOutcome::Updated)
                .count(),
            membership_ids.len()
        );
        Ok(BulkReport { results })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        AccountId, GroupId, ProfileId,
        membership::{Membership, MockMembershipRepository},
    };

    fn account(is_admin: bool) -> Account {
        Account {
            account_id: AccountId(uuid::Uuid::new_v4()),
            display_name: "someone".to_string(),
            is_admin,
            is_suspended: false,
        }
    }

    #[tokio::test]
    async fn non_admins_are_rejected() {
        let use_case =
            SuspendMembershipsUseCaseImpl::new(Arc::new(MockMembershipRepository::default()));
        let err = use_case
            .set_suspension(&account(false), &[MembershipId::new()], true)
            .await
            .unwrap_err();
        assert!(matches!(err, SuspendMembershipsError::NotAdmin));
    }

    #[tokio::test]
    async fn unknown_ids_are_reported_not_skipped() {
        let known = Membership::new(ProfileId::new(), GroupId::new());
        let known_id = known.membership_id;
        let unknown_id = MembershipId::new();
        let memberships = MockMembershipRepository::default().with_membership(known);
        let use_case = SuspendMembershipsUseCaseImpl::new(Arc::new(memberships.clone()));

        let report = use_case
            .set_suspension(&account(true), &[known_id, unknown_id], true)
            .await
            .unwrap();

        assert_eq!(report.affected(), 1);
        assert_eq!(
            report.results,
            vec![
                (known_id, BulkOutcome::Updated),
                (unknown_id, BulkOutcome::NotFound)
            ]
        );
        assert!(memberships.all()[0].suspended);
    }

    #[tokio::test]
    async fn empty_id_list_is_a_no_op() {
        let use_case =
            SuspendMembershipsUseCaseImpl::new(Arc::new(MockMembershipRepository::default()));
        let report = use_case
            .set_suspension(&account(true), &[], true)
            .await
            .unwrap();
        assert!(report.results.is_empty());
        assert_eq!(report.affected(), 0);
    }
}
