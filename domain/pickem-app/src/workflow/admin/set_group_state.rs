use std::sync::Arc;

use crate::{
    domain::{
        GroupId,
        account::Account,
        group::{GroupRepository, GroupStatePatch},
    },
    workflow::admin::{BulkOutcome, BulkReport},
};

#[async_trait::async_trait]
pub trait SetGroupStateUseCase {
    /// Apply the same joinable/finished patch to each group independently.
    async fn set_group_state(
        &self,
        actor: &Account,
        group_ids: &[GroupId],
        patch: GroupStatePatch,
    ) -> Result<BulkReport<GroupId>, SetGroupStateError>;
}

#[derive(Debug)]
pub enum SetGroupStateError {
    NotAdmin,
    EmptyPatch,
    StorageError,
}

pub struct SetGroupStateUseCaseImpl<G: GroupRepository> {
    group_repository: Arc<G>,
}

impl<G: GroupRepository> SetGroupStateUseCaseImpl<G> {
    pub fn new(group_repository: Arc<G>) -> Self {
        Self { group_repository }
    }
}

#[async_trait::async_trait]
impl<G: GroupRepository + Send + Sync + 'static> SetGroupStateUseCase
    for SetGroupStateUseCaseImpl<G>
{
    async fn set_group_state(
        &self,
        actor: &Account,
        group_ids: &[GroupId],
        patch: GroupStatePatch,
    ) -> Result<BulkReport<GroupId>, SetGroupStateError> {
        if !actor.is_admin {
            return Err(SetGroupStateError::NotAdmin);
        }
        if patch.is_empty() {
            return Err(SetGroupStateError::EmptyPatch);
        }

        let mut results = Vec::with_capacity(group_ids.len());
        for &group_id in group_ids {
            let updated = self
                .group_repository
                .set_state(group_id, patch)
                .await
                .map_err(|e| {
                    log::error!("Failed to update group {}: {}", group_id, e);
                    SetGroupStateError::StorageError
                })?;
            let outcome = if updated {
                BulkOutcome::Updated
            } else {
                BulkOutcome::NotFound
            };
            results.push((group_id, outcome));
        }

        log::info!(
            "Admin {} patched {:?} on {} of {} groups",
            actor.account_id,
            patch,
            results
                .iter()
                .filter(|(_, o)| *o == BulkOutcome::Updated)
                .count(),
            group_ids.len()
        );
        Ok(BulkReport { results })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        AccountId, TournamentId,
        group::{Group, MockGroupRepository},
    };

    fn admin() -> Account {
        Account {
            account_id: AccountId(uuid::Uuid::new_v4()),
            display_name: "commish".to_string(),
            is_admin: true,
            is_suspended: false,
        }
    }

    fn group(joinable: bool, finished: bool) -> Group {
        Group {
            group_id: GroupId::new(),
            tournament_id: TournamentId(uuid::Uuid::new_v4()),
            name: "group".to_string(),
            joinable,
            finished,
            created_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn empty_patch_is_rejected() {
        let use_case = SetGroupStateUseCaseImpl::new(Arc::new(MockGroupRepository::default()));
        let err = use_case
            .set_group_state(&admin(), &[GroupId::new()], GroupStatePatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SetGroupStateError::EmptyPatch));
    }

    #[tokio::test]
    async fn finishing_groups_updates_each_row_independently() {
        let a = group(true, false);
        let b = group(false, false);
        let a_id = a.group_id;
        let b_id = b.group_id;
        let unknown = GroupId::new();
        let groups = MockGroupRepository::default().with_group(a).with_group(b);
        let use_case = SetGroupStateUseCaseImpl::new(Arc::new(groups.clone()));

        let report = use_case
            .set_group_state(
                &admin(),
                &[a_id, b_id, unknown],
                GroupStatePatch {
                    joinable: None,
                    finished: Some(true),
                },
            )
            .await
            .unwrap();

        assert_eq!(report.affected(), 2);
        assert_eq!(report.results[2], (unknown, BulkOutcome::NotFound));
        assert!(groups.all().iter().all(|g| g.finished));
    }

    #[tokio::test]
    async fn opening_a_group_demotes_other_active_ones() {
        let old_active = group(true, false);
        let next = group(false, false);
        let old_id = old_active.group_id;
        let next_id = next.group_id;
        let groups = MockGroupRepository::default()
            .with_group(old_active)
            .with_group(next);
        let use_case = SetGroupStateUseCaseImpl::new(Arc::new(groups.clone()));

        use_case
            .set_group_state(
                &admin(),
                &[next_id],
                GroupStatePatch {
                    joinable: Some(true),
                    finished: None,
                },
            )
            .await
            .unwrap();

        let all = groups.all();
        let active: Vec<_> = all.iter().filter(|g| g.is_active()).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].group_id, next_id);
        assert!(!all.iter().find(|g| g.group_id == old_id).unwrap().joinable);
    }

    #[tokio::test]
    async fn patching_a_finished_group_leaves_the_active_one_alone() {
        let active = group(true, false);
        let finished = group(false, true);
        let active_id = active.group_id;
        let finished_id = finished.group_id;
        let groups = MockGroupRepository::default()
            .with_group(active)
            .with_group(finished);
        let use_case = SetGroupStateUseCaseImpl::new(Arc::new(groups.clone()));

        // joinable=true on a still-finished group activates nothing and
        // must not demote the current group.
        use_case
            .set_group_state(
                &admin(),
                &[finished_id],
                GroupStatePatch {
                    joinable: Some(true),
                    finished: None,
                },
            )
            .await
            .unwrap();

        let all = groups.all();
        assert!(all.iter().find(|g| g.group_id == active_id).unwrap().is_active());
        assert!(!all.iter().find(|g| g.group_id == finished_id).unwrap().is_active());
    }

    #[tokio::test]
    async fn reviving_a_finished_group_takes_over_as_the_active_one() {
        let active = group(true, false);
        let finished = group(false, true);
        let active_id = active.group_id;
        let finished_id = finished.group_id;
        let groups = MockGroupRepository::default()
            .with_group(active)
            .with_group(finished);
        let use_case = SetGroupStateUseCaseImpl::new(Arc::new(groups.clone()));

        use_case
            .set_group_state(
                &admin(),
                &[finished_id],
                GroupStatePatch {
                    joinable: Some(true),
                    finished: Some(false),
                },
            )
            .await
            .unwrap();

        let all = groups.all();
        let active_now: Vec<_> = all.iter().filter(|g| g.is_active()).collect();
        assert_eq!(active_now.len(), 1);
        assert_eq!(active_now[0].group_id, finished_id);
        assert!(!all.iter().find(|g| g.group_id == active_id).unwrap().joinable);
    }
}
