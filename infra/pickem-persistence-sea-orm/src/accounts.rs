use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

use crate::{create_db_pool, entity::account};
use pickem_app::domain::{
    AccountId, RepoError,
    account::{Account, AccountRepository},
};

pub struct AccountRepositoryImpl {
    db: DatabaseConnection,
}

impl AccountRepositoryImpl {
    pub async fn new() -> Self {
        let db = create_db_pool().await;
        Self { db }
    }

    fn model_to_account(model: account::Model) -> Account {
        Account {
            account_id: AccountId(model.id),
            display_name: model.display_name,
            is_admin: model.is_admin,
            is_suspended: model.is_suspended,
        }
    }
}

#[async_trait::async_trait]
impl AccountRepository for AccountRepositoryImpl {
    async fn get_account(&self, account_id: AccountId) -> Result<Option<Account>, RepoError> {
        let model = account::Entity::find_by_id(account_id.0)
            .one(&self.db)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;
        Ok(model.map(Self::model_to_account))
    }

    async fn insert_account(&self, a: Account) -> Result<(), RepoError> {
        let new_account = account::ActiveModel {
            id: Set(a.account_id.0),
            display_name: Set(a.display_name),
            is_admin: Set(a.is_admin),
            is_suspended: Set(a.is_suspended),
        };
        new_account
            .insert(&self.db)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;
        Ok(())
    }
}
