use async_lock::OnceCell;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

pub mod access_requests;
pub mod accounts;
pub mod entity;
pub mod groups;
pub mod memberships;
pub mod profiles;

static DB_POOL: OnceCell<DatabaseConnection> = OnceCell::new();

const DEFAULT_POOL_SIZE: u32 = 10;

fn database_url_from_env() -> String {
    let database = std::env::var("MARIADB_DATABASE").expect("MARIADB_DATABASE must be set");
    let user = std::env::var("MARIADB_USER").expect("MARIADB_USER must be set");
    let password = std::env::var("MARIADB_PASSWORD").expect("MARIADB_PASSWORD must be set");
    let host = std::env::var("MARIADB_HOST").unwrap_or_else(|_| "localhost".to_string());
    let port = std::env::var("MARIADB_PORT").unwrap_or_else(|_| "3306".to_string());
    format!("mysql://{user}:{password}@{host}:{port}/{database}")
}

/// Process-wide pool, shared by every repository and ops binary. Statement
/// logging is off; workflow-level logging carries the useful context.
pub async fn create_db_pool() -> DatabaseConnection {
    DB_POOL
        .get_or_init(|| async move {
            let pool_size = std::env::var("MARIADB_POOL_SIZE")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(DEFAULT_POOL_SIZE);

            let mut opt = ConnectOptions::new(database_url_from_env());
            opt.max_connections(pool_size).sqlx_logging(false);

            Database::connect(opt)
                .await
                .expect("Failed to connect to database")
        })
        .await
        .clone()
}
