use std::sync::Arc;

use pickem_app::domain::{
    AccountId,
    account::{Account, AccountRepository},
};
use pickem_auth_jwt::JwtAuthenticationService;
use pickem_persistence_sea_orm::accounts::AccountRepositoryImpl;

/// Seeds an account row and prints a session token for it. Accounts
/// normally arrive through the identity provider; this exists for local
/// setups and for bootstrapping the first admin.
#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();
    let is_admin = args.iter().any(|a| a == "--admin");
    let display_name = match args.iter().skip(1).find(|a| !a.starts_with("--")) {
        Some(name) => name.clone(),
        None => {
            eprintln!("Usage: add_account <display-name> [--admin]");
            std::process::exit(1);
        }
    };

    let account = Account {
        account_id: AccountId(uuid::Uuid::new_v4()),
        display_name,
        is_admin,
        is_suspended: false,
    };
    let account_id = account.account_id;

    let accounts = Arc::new(AccountRepositoryImpl::new().await);
    accounts
        .insert_account(account)
        .await
        .expect("Failed to insert account");

    let auth = JwtAuthenticationService::new(accounts);
    let token = auth.create_session_token(account_id);

    println!("Created account {} (admin: {})", account_id, is_admin);
    println!("Session token: {}", token);
}
