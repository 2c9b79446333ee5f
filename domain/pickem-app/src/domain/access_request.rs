use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use crate::domain::{AccessRequestId, GroupId, ProfileId, RepoError};

/// A pending ask by a profile to join a group, unique per (profile, group)
/// pair. Stays pending until resolved into a membership or denied.
#[derive(Debug, Clone)]
pub struct AccessRequest {
    pub request_id: AccessRequestId,
    pub profile_id: ProfileId,
    pub group_id: GroupId,
    pub denied: bool,
    pub created_at: DateTime<Utc>,
}

impl AccessRequest {
    pub fn new(profile_id: ProfileId, group_id: GroupId) -> Self {
        Self {
            request_id: AccessRequestId::new(),
            profile_id,
            group_id,
            denied: false,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug)]
pub enum InsertAccessRequestError {
    AlreadyRequested,
    StorageError(String),
}

#[async_trait::async_trait]
pub trait AccessRequestRepository {
    /// The (profile, group) unique constraint is the authority under
    /// concurrent writers; a losing insert gets `AlreadyRequested`.
    async fn insert_request(
        &self,
        request: AccessRequest,
    ) -> Result<(), InsertAccessRequestError>;
    /// Existence check excluding denied requests.
    async fn has_pending(&self, profile_id: ProfileId, group_id: GroupId)
    -> Result<bool, RepoError>;
    async fn list_for_group(&self, group_id: GroupId) -> Result<Vec<AccessRequest>, RepoError>;
}

#[derive(Clone, Default)]
pub struct MockAccessRequestRepository {
    pub requests: Arc<Mutex<Vec<AccessRequest>>>,
}

#[allow(unused)]
impl MockAccessRequestRepository {
    pub fn with_request(self, request: AccessRequest) -> Self {
        self.requests.lock().unwrap().push(request);
        self
    }

    pub fn all(&self) -> Vec<AccessRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl AccessRequestRepository for MockAccessRequestRepository {
    async fn insert_request(
        &self,
        request: AccessRequest,
    ) -> Result<(), InsertAccessRequestError> {
        let mut requests = self.requests.lock().unwrap();
        if requests
            .iter()
            .any(|r| r.profile_id == request.profile_id && r.group_id == request.group_id)
        {
            return Err(InsertAccessRequestError::AlreadyRequested);
        }
        requests.push(request);
        Ok(())
    }

    async fn has_pending(
        &self,
        profile_id: ProfileId,
        group_id: GroupId,
    ) -> Result<bool, RepoError> {
        Ok(self
            .requests
            .lock()
            .unwrap()
            .iter()
            .any(|r| r.profile_id == profile_id && r.group_id == group_id && !r.denied))
    }

    async fn list_for_group(&self, group_id: GroupId) -> Result<Vec<AccessRequest>, RepoError> {
        Ok(self
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.group_id == group_id)
            .cloned()
            .collect())
    }
}
