use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};

use crate::{create_db_pool, entity::group};
use pickem_app::domain::{
    GroupId, RepoError, TournamentId,
    group::{Group, GroupRepository, GroupStatePatch},
};

pub struct GroupRepositoryImpl {
    db: DatabaseConnection,
}

impl GroupRepositoryImpl {
    pub async fn new() -> Self {
        let db = create_db_pool().await;
        Self { db }
    }

    fn model_to_group(model: group::Model) -> Group {
        Group {
            group_id: GroupId(model.id),
            tournament_id: TournamentId(model.tournament_id),
            name: model.name,
            joinable: model.joinable,
            finished: model.finished,
            created_at: model.created_at,
        }
    }
}

#[async_trait::async_trait]
impl GroupRepository for GroupRepositoryImpl {
    async fn get_group(&self, group_id: GroupId) -> Result<Option<Group>, RepoError> {
        let model = group::Entity::find_by_id(group_id.0)
            .one(&self.db)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;
        Ok(model.map(Self::model_to_group))
    }

    async fn find_active(&self) -> Result<Option<Group>, RepoError> {
        // The newest active group wins if the predicate ever holds more
        // than one row; set_state keeps that from persisting.
        let model = group::Entity::find()
            .filter(group::Column::Joinable.eq(true))
            .filter(group::Column::Finished.eq(false))
            .order_by_desc(group::Column::CreatedAt)
            .one(&self.db)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;
        Ok(model.map(Self::model_to_group))
    }

    async fn insert_group(&self, g: Group) -> Result<(), RepoError> {
        let new_group = group::ActiveModel {
            id: Set(g.group_id.0),
            tournament_id: Set(g.tournament_id.0),
            name: Set(g.name),
            joinable: Set(g.joinable),
            finished: Set(g.finished),
            created_at: Set(g.created_at),
        };
        new_group
            .insert(&self.db)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;
        Ok(())
    }

    async fn set_state(
        &self,
        group_id: GroupId,
        patch: GroupStatePatch,
    ) -> Result<bool, RepoError> {
        // MySQL reports changed rows, not matched rows, so existence is
        // checked up front rather than read off rows_affected.
        let Some(current) = group::Entity::find_by_id(group_id.0)
            .one(&self.db)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?
        else {
            return Ok(false);
        };

        // Demote every other unfinished group only when the patched row
        // ends up active, so a patch on a finished group cannot deactivate
        // the genuinely active one.
        let ends_active = patch.joinable.unwrap_or(current.joinable)
            && !patch.finished.unwrap_or(current.finished);
        if ends_active {
            group::Entity::update_many()
                .col_expr(group::Column::Joinable, Expr::value(false))
                .filter(group::Column::Id.ne(group_id.0))
                .filter(group::Column::Finished.eq(false))
                .exec(&self.db)
                .await
                .map_err(|e| RepoError::StorageError(e.to_string()))?;
        }

        let mut update = group::Entity::update_many().filter(group::Column::Id.eq(group_id.0));
        if let Some(joinable) = patch.joinable {
            update = update.col_expr(group::Column::Joinable, Expr::value(joinable));
        }
        if let Some(finished) = patch.finished {
            update = update.col_expr(group::Column::Finished, Expr::value(finished));
        }
        update
            .exec(&self.db)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;
        Ok(true)
    }
}
