use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr,
    sea_query::Expr,
};

use crate::{create_db_pool, entity::membership};
use pickem_app::domain::{
    GroupId, MembershipId, ProfileId, RepoError,
    membership::{InsertMembershipError, Membership, MembershipRepository},
};

pub struct MembershipRepositoryImpl {
    db: DatabaseConnection,
}

impl MembershipRepositoryImpl {
    pub async fn new() -> Self {
        let db = create_db_pool().await;
        Self { db }
    }

    fn model_to_membership(model: membership::Model) -> Membership {
        Membership {
            membership_id: MembershipId(model.id),
            profile_id: ProfileId(model.profile_id),
            group_id: GroupId(model.group_id),
            suspended: model.suspended,
            paid: model.paid,
            notes: model.notes,
            created_at: model.created_at,
        }
    }
}

#[async_trait::async_trait]
impl MembershipRepository for MembershipRepositoryImpl {
    async fn insert_membership(&self, m: Membership) -> Result<(), InsertMembershipError> {
        let new_membership = membership::ActiveModel {
            id: Set(m.membership_id.0),
            profile_id: Set(m.profile_id.0),
            group_id: Set(m.group_id.0),
            suspended: Set(m.suspended),
            paid: Set(m.paid),
            notes: Set(m.notes),
            created_at: Set(m.created_at),
        };

        new_membership
            .insert(&self.db)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => InsertMembershipError::AlreadyMember,
                _ => InsertMembershipError::StorageError(e.to_string()),
            })?;
        Ok(())
    }

    async fn find(
        &self,
        profile_id: ProfileId,
        group_id: GroupId,
    ) -> Result<Option<Membership>, RepoError> {
        let model = membership::Entity::find()
            .filter(membership::Column::ProfileId.eq(profile_id.0))
            .filter(membership::Column::GroupId.eq(group_id.0))
            .one(&self.db)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;
        Ok(model.map(Self::model_to_membership))
    }

    async fn set_suspended(
        &self,
        membership_id: MembershipId,
        suspended: bool,
    ) -> Result<bool, RepoError> {
        // MySQL reports changed rows, not matched rows, so existence is
        // checked up front rather than read off rows_affected.
        let exists = membership::Entity::find_by_id(membership_id.0)
            .one(&self.db)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?
            .is_some();
        if !exists {
            return Ok(false);
        }

        membership::Entity::update_many()
            .col_expr(membership::Column::Suspended, Expr::value(suspended))
            .filter(membership::Column::Id.eq(membership_id.0))
            .exec(&self.db)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;
        Ok(true)
    }

    async fn list_for_group(&self, group_id: GroupId) -> Result<Vec<Membership>, RepoError> {
        let models = membership::Entity::find()
            .filter(membership::Column::GroupId.eq(group_id.0))
            .all(&self.db)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;
        Ok(models.into_iter().map(Self::model_to_membership).collect())
    }
}
