use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr,
};

use crate::{create_db_pool, entity::profile};
use pickem_app::domain::{
    AccountId, ProfileId, RepoError,
    profile::{Avatar, InsertProfileError, Profile, ProfileName, ProfileRepository},
};

pub struct ProfileRepositoryImpl {
    db: DatabaseConnection,
    profile_cache: Arc<moka::future::Cache<ProfileId, Profile>>,
}

impl ProfileRepositoryImpl {
    pub async fn new() -> Self {
        let db = create_db_pool().await;
        let profile_cache = Arc::new(
            moka::future::Cache::builder()
                .max_capacity(10_000)
                .time_to_live(std::time::Duration::from_secs(60 * 60))
                .build(),
        );
        Self { db, profile_cache }
    }

    fn model_to_profile(model: profile::Model) -> Result<Profile, RepoError> {
        let username = ProfileName::parse(&model.username)
            .map_err(|e| RepoError::StorageError(format!("corrupt username column: {}", e)))?;
        let avatar = model
            .avatar
            .parse::<Avatar>()
            .map_err(|_| RepoError::StorageError(format!("unknown avatar '{}'", model.avatar)))?;
        Ok(Profile {
            profile_id: ProfileId(model.id),
            account_id: AccountId(model.account_id),
            username,
            avatar,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[async_trait::async_trait]
impl ProfileRepository for ProfileRepositoryImpl {
    async fn insert_profile(&self, p: Profile) -> Result<(), InsertProfileError> {
        let new_profile = profile::ActiveModel {
            id: Set(p.profile_id.0),
            account_id: Set(p.account_id.0),
            username: Set(p.username.as_str().to_string()),
            avatar: Set(p.avatar.as_str().to_string()),
            created_at: Set(p.created_at),
            updated_at: Set(p.updated_at),
        };

        new_profile.insert(&self.db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => InsertProfileError::UsernameTaken,
            _ => InsertProfileError::StorageError(e.to_string()),
        })?;

        self.profile_cache.invalidate(&p.profile_id).await;
        Ok(())
    }

    async fn get_profile(&self, profile_id: ProfileId) -> Result<Option<Profile>, RepoError> {
        if let Some(p) = self.profile_cache.get(&profile_id).await {
            return Ok(Some(p));
        }

        let model = profile::Entity::find_by_id(profile_id.0)
            .one(&self.db)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;

        if let Some(model) = model {
            let p = Self::model_to_profile(model)?;
            self.profile_cache.insert(profile_id, p.clone()).await;
            Ok(Some(p))
        } else {
            Ok(None)
        }
    }

    async fn list_by_account(&self, account_id: AccountId) -> Result<Vec<Profile>, RepoError> {
        let models = profile::Entity::find()
            .filter(profile::Column::AccountId.eq(account_id.0))
            .all(&self.db)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;
        models.into_iter().map(Self::model_to_profile).collect()
    }

    async fn find_by_username(
        &self,
        username: &ProfileName,
    ) -> Result<Option<Profile>, RepoError> {
        let model = profile::Entity::find()
            .filter(profile::Column::Username.eq(username.as_str()))
            .one(&self.db)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;
        model.map(Self::model_to_profile).transpose()
    }

    async fn update_identity(
        &self,
        profile_id: ProfileId,
        username: Option<ProfileName>,
        avatar: Option<Avatar>,
    ) -> Result<bool, InsertProfileError> {
        let existing = profile::Entity::find_by_id(profile_id.0)
            .one(&self.db)
            .await
            .map_err(|e| InsertProfileError::StorageError(e.to_string()))?;
        let Some(_) = existing else {
            return Ok(false);
        };

        let mut update = profile::ActiveModel {
            id: Set(profile_id.0),
            updated_at: Set(chrono::Utc::now()),
            ..Default::default()
        };
        if let Some(name) = username {
            update.username = Set(name.as_str().to_string());
        }
        if let Some(avatar) = avatar {
            update.avatar = Set(avatar.as_str().to_string());
        }

        update.update(&self.db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => InsertProfileError::UsernameTaken,
            _ => InsertProfileError::StorageError(e.to_string()),
        })?;

        self.profile_cache.invalidate(&profile_id).await;
        Ok(true)
    }
}
