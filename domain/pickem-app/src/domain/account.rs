use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use crate::domain::{AccountId, RepoError};

/// An authenticated identity. Accounts come from the authentication
/// provider and are never deleted by this engine; profiles hang off them.
#[derive(Debug, Clone)]
pub struct Account {
    pub account_id: AccountId,
    pub display_name: String,
    pub is_admin: bool,
    pub is_suspended: bool,
}

#[async_trait::async_trait]
pub trait AccountRepository {
    async fn get_account(&self, account_id: AccountId) -> Result<Option<Account>, RepoError>;
    async fn insert_account(&self, account: Account) -> Result<(), RepoError>;
}

#[derive(Clone, Default)]
pub struct MockAccountRepository {
    pub accounts: Arc<Mutex<HashMap<AccountId, Account>>>,
}

#[allow(unused)]
impl MockAccountRepository {
    pub fn with_account(self, account: Account) -> Self {
        self.accounts
            .lock()
            .unwrap()
            .insert(account.account_id, account);
        self
    }
}

#[async_trait::async_trait]
impl AccountRepository for MockAccountRepository {
    async fn get_account(&self, account_id: AccountId) -> Result<Option<Account>, RepoError> {
        Ok(self.accounts.lock().unwrap().get(&account_id).cloned())
    }

    async fn insert_account(&self, account: Account) -> Result<(), RepoError> {
        self.accounts
            .lock()
            .unwrap()
            .insert(account.account_id, account);
        Ok(())
    }
}
