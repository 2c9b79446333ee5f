use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use crate::domain::{GroupId, RepoError, TournamentId};

/// A competition. At most one group should be active (`joinable` and not
/// `finished`) at a time; `GroupRepository` implementations keep the
/// predicate convergent when toggling `joinable`.
#[derive(Debug, Clone)]
pub struct Group {
    pub group_id: GroupId,
    pub tournament_id: TournamentId,
    pub name: String,
    pub joinable: bool,
    pub finished: bool,
    pub created_at: DateTime<Utc>,
}

impl Group {
    pub fn is_active(&self) -> bool {
        self.joinable && !self.finished
    }
}

/// Partial state update for a group; `None` fields are left untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupStatePatch {
    pub joinable: Option<bool>,
    pub finished: Option<bool>,
}

impl GroupStatePatch {
    pub fn is_empty(&self) -> bool {
        self.joinable.is_none() && self.finished.is_none()
    }
}

#[async_trait::async_trait]
pub trait GroupRepository {
    async fn get_group(&self, group_id: GroupId) -> Result<Option<Group>, RepoError>;
    /// The currently open competition. When more than one row satisfies
    /// the active predicate, the newest `created_at` wins.
    async fn find_active(&self) -> Result<Option<Group>, RepoError>;
    async fn insert_group(&self, group: Group) -> Result<(), RepoError>;
    /// Apply a partial state update to one group. Returns whether the row
    /// exists. When the patched row ends up active (joinable and not
    /// finished), every other unfinished group is demoted so the active
    /// predicate keeps a single row; a patch that leaves the target
    /// inactive never touches other rows.
    async fn set_state(&self, group_id: GroupId, patch: GroupStatePatch)
    -> Result<bool, RepoError>;
}

#[derive(Clone, Default)]
pub struct MockGroupRepository {
    pub groups: Arc<Mutex<Vec<Group>>>,
}

#[allow(unused)]
impl MockGroupRepository {
    pub fn with_group(self, group: Group) -> Self {
        self.groups.lock().unwrap().push(group);
        self
    }

    pub fn all(&self) -> Vec<Group> {
        self.groups.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl GroupRepository for MockGroupRepository {
    async fn get_group(&self, group_id: GroupId) -> Result<Option<Group>, RepoError> {
        Ok(self
            .groups
            .lock()
            .unwrap()
            .iter()
            .find(|g| g.group_id == group_id)
            .cloned())
    }

    async fn find_active(&self) -> Result<Option<Group>, RepoError> {
        Ok(self
            .groups
            .lock()
            .unwrap()
            .iter()
            .filter(|g| g.is_active())
            .max_by_key(|g| g.created_at)
            .cloned())
    }

    async fn insert_group(&self, group: Group) -> Result<(), RepoError> {
        self.groups.lock().unwrap().push(group);
        Ok(())
    }

    async fn set_state(
        &self,
        group_id: GroupId,
        patch: GroupStatePatch,
    ) -> Result<bool, RepoError> {
        let mut groups = self.groups.lock().unwrap();
        let Some(current) = groups.iter().find(|g| g.group_id == group_id).cloned() else {
            return Ok(false);
        };
        let ends_active = patch.joinable.unwrap_or(current.joinable)
            && !patch.finished.unwrap_or(current.finished);
        if ends_active {
            for other in groups.iter_mut() {
                if other.group_id != group_id && !other.finished {
                    other.joinable = false;
                }
            }
        }
        let group = groups.iter_mut().find(|g| g.group_id == group_id).unwrap();
        if let Some(joinable) = patch.joinable {
            group.joinable = joinable;
        }
        if let Some(finished) = patch.finished {
            group.finished = finished;
        }
        Ok(true)
    }
}
