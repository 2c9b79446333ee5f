use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use crate::domain::{GroupId, MembershipId, ProfileId, RepoError};

/// A durable grant of participation rights for a profile in a group,
/// unique per (profile, group) pair.
#[derive(Debug, Clone)]
pub struct Membership {
    pub membership_id: MembershipId,
    pub profile_id: ProfileId,
    pub group_id: GroupId,
    pub suspended: bool,
    pub paid: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Membership {
    pub fn new(profile_id: ProfileId, group_id: GroupId) -> Self {
        Self {
            membership_id: MembershipId::new(),
            profile_id,
            group_id,
            suspended: false,
            paid: false,
            notes: None,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug)]
pub enum InsertMembershipError {
    AlreadyMember,
    StorageError(String),
}

#[async_trait::async_trait]
pub trait MembershipRepository {
    /// The (profile, group) unique constraint is the authority under
    /// concurrent writers; a losing insert gets `AlreadyMember`.
    async fn insert_membership(&self, membership: Membership)
    -> Result<(), InsertMembershipError>;
    async fn find(
        &self,
        profile_id: ProfileId,
        group_id: GroupId,
    ) -> Result<Option<Membership>, RepoError>;
    /// Returns whether the row exists.
    async fn set_suspended(
        &self,
        membership_id: MembershipId,
        suspended: bool,
    ) -> Result<bool, RepoError>;
    async fn list_for_group(&self, group_id: GroupId) -> Result<Vec<Membership>, RepoError>;
}

#[derive(Clone, Default)]
pub struct MockMembershipRepository {
    pub memberships: Arc<Mutex<Vec<Membership>>>,
}

#[allow(unused)]
impl MockMembershipRepository {
    pub fn with_membership(self, membership: Membership) -> Self {
        self.memberships.lock().unwrap().push(membership);
        self
    }

    pub fn all(&self) -> Vec<Membership> {
        self.memberships.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl MembershipRepository for MockMembershipRepository {
    async fn insert_membership(
        &self,
        membership: Membership,
    ) -> Result<(), InsertMembershipError> {
        let mut memberships = self.memberships.lock().unwrap();
        if memberships
            .iter()
            .any(|m| m.profile_id == membership.profile_id && m.group_id == membership.group_id)
        {
            return Err(InsertMembershipError::AlreadyMember);
        }
        memberships.push(membership);
        Ok(())
    }

    async fn find(
        &self,
        profile_id: ProfileId,
        group_id: GroupId,
    ) -> Result<Option<Membership>, RepoError> {
        Ok(self
            .memberships
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.profile_id == profile_id && m.group_id == group_id)
            .cloned())
    }

    async fn set_suspended(
        &self,
        membership_id: MembershipId,
        suspended: bool,
    ) -> Result<bool, RepoError> {
        let mut memberships = self.memberships.lock().unwrap();
        match memberships
            .iter_mut()
            .find(|m| m.membership_id == membership_id)
        {
            Some(membership) => {
                membership.suspended = suspended;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_for_group(&self, group_id: GroupId) -> Result<Vec<Membership>, RepoError> {
        Ok(self
            .memberships
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.group_id == group_id)
            .cloned()
            .collect())
    }
}
