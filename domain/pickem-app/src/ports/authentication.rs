use crate::domain::account::Account;

/// Resolves a client-held session credential to an account. Issuing
/// sessions is the identity provider's business, not this engine's.
#[async_trait::async_trait]
pub trait AuthenticationPort {
    async fn get_account_by_session(&self, token: &str) -> Option<Account>;
}
