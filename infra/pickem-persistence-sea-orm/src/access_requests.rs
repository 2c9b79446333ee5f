use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set, SqlErr,
};

use crate::{create_db_pool, entity::access_request};
use pickem_app::domain::{
    AccessRequestId, GroupId, ProfileId, RepoError,
    access_request::{AccessRequest, AccessRequestRepository, InsertAccessRequestError},
};

pub struct AccessRequestRepositoryImpl {
    db: DatabaseConnection,
}

impl AccessRequestRepositoryImpl {
    pub async fn new() -> Self {
        let db = create_db_pool().await;
        Self { db }
    }

    fn model_to_request(model: access_request::Model) -> AccessRequest {
        AccessRequest {
            request_id: AccessRequestId(model.id),
            profile_id: ProfileId(model.profile_id),
            group_id: GroupId(model.group_id),
            denied: model.denied,
            created_at: model.created_at,
        }
    }
}

#[async_trait::async_trait]
impl AccessRequestRepository for AccessRequestRepositoryImpl {
    async fn insert_request(&self, r: AccessRequest) -> Result<(), InsertAccessRequestError> {
        let new_request = access_request::ActiveModel {
            id: Set(r.request_id.0),
            profile_id: Set(r.profile_id.0),
            group_id: Set(r.group_id.0),
            denied: Set(r.denied),
            created_at: Set(r.created_at),
        };

        new_request
            .insert(&self.db)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    InsertAccessRequestError::AlreadyRequested
                }
                _ => InsertAccessRequestError::StorageError(e.to_string()),
            })?;
        Ok(())
    }

    async fn has_pending(
        &self,
        profile_id: ProfileId,
        group_id: GroupId,
    ) -> Result<bool, RepoError> {
        let count = access_request::Entity::find()
            .filter(access_request::Column::ProfileId.eq(profile_id.0))
            .filter(access_request::Column::GroupId.eq(group_id.0))
            .filter(access_request::Column::Denied.eq(false))
            .count(&self.db)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;
        Ok(count > 0)
    }

    async fn list_for_group(&self, group_id: GroupId) -> Result<Vec<AccessRequest>, RepoError> {
        let models = access_request::Entity::find()
            .filter(access_request::Column::GroupId.eq(group_id.0))
            .all(&self.db)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;
        Ok(models.into_iter().map(Self::model_to_request).collect())
    }
}
