use std::sync::Arc;

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pickem_app::{
    domain::{AccountId, account::{Account, AccountRepository}},
    ports::authentication::AuthenticationPort,
};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: usize,
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Keys {
    fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

fn read_or_generate_secret() -> Vec<u8> {
    if let Ok(secret) = std::env::var("PICKEM_JWT_SECRET") {
        secret.as_bytes().to_vec()
    } else {
        log::warn!("JWT secret not found, generating a random one");
        Uuid::new_v4().as_bytes().to_vec()
    }
}

/// Verifies session tokens minted by the identity provider and resolves
/// them to account rows. This service never issues sessions for real
/// users; `create_session_token` exists for ops tooling and tests.
pub struct JwtAuthenticationService<A: AccountRepository> {
    account_repository: Arc<A>,
    keys: Keys,
}

impl<A: AccountRepository> JwtAuthenticationService<A> {
    pub fn new(account_repository: Arc<A>) -> Self {
        Self {
            account_repository,
            keys: Keys::new(&read_or_generate_secret()),
        }
    }

    pub fn create_session_token(&self, account_id: AccountId) -> String {
        let claims = Claims {
            sub: account_id.to_string(),
            exp: (chrono::Utc::now() + chrono::Duration::days(30)).timestamp() as usize,
        };
        encode(&Header::default(), &claims, &self.keys.encoding)
            .expect("HS256 encoding cannot fail with a valid key")
    }

    fn account_id_from_token(&self, token: &str) -> Option<AccountId> {
        let data = decode::<Claims>(token, &self.keys.decoding, &Validation::default()).ok()?;
        Uuid::parse_str(&data.claims.sub).ok().map(AccountId)
    }
}

#[async_trait::async_trait]
impl<A: AccountRepository + Send + Sync + 'static> AuthenticationPort
    for JwtAuthenticationService<A>
{
    async fn get_account_by_session(&self, token: &str) -> Option<Account> {
        let account_id = self.account_id_from_token(token)?;
        match self.account_repository.get_account(account_id).await {
            Ok(account) => account,
            Err(e) => {
                log::error!("Failed to load account {}: {}", account_id, e);
                None
            }
        }
    }
}
