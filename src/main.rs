use std::sync::Arc;

use log::info;
use pickem_app::build_application;
use pickem_auth_jwt::JwtAuthenticationService;
use pickem_persistence_sea_orm::{
    access_requests::AccessRequestRepositoryImpl, accounts::AccountRepositoryImpl,
    groups::GroupRepositoryImpl, memberships::MembershipRepositoryImpl,
    profiles::ProfileRepositoryImpl,
};

mod logs;

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received. Preparing graceful exit...");
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    logs::init_logger();

    let profile_repository = Arc::new(ProfileRepositoryImpl::new().await);
    let group_repository = Arc::new(GroupRepositoryImpl::new().await);
    let membership_repository = Arc::new(MembershipRepositoryImpl::new().await);
    let request_repository = Arc::new(AccessRequestRepositoryImpl::new().await);
    let account_repository = Arc::new(AccountRepositoryImpl::new().await);

    let auth = Arc::new(JwtAuthenticationService::new(account_repository));

    let app = Arc::new(build_application(
        profile_repository,
        group_repository,
        membership_repository,
        request_repository,
    ));

    info!("Starting pick'em server");
    pickem_api::http::run(app, auth, shutdown_signal()).await;
}
