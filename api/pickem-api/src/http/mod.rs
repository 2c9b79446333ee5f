use std::sync::Arc;

use axum::{
    Router,
    extract::FromRef,
    routing::{get, post, put},
};
use axum_extra::extract::cookie::Key;
use log::info;
use pickem_app::{Application, ports::authentication::AuthenticationPort};

mod access;
mod admin;
mod profiles;
mod resolve;

#[derive(Clone)]
pub struct AppState {
    pub app: Arc<Application>,
    pub auth: Arc<dyn AuthenticationPort + Send + Sync + 'static>,
    pub cookie_key: Key,
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Key {
        state.cookie_key.clone()
    }
}

pub fn cookie_key_from_env() -> Key {
    match std::env::var("PICKEM_COOKIE_KEY") {
        Ok(secret) => Key::derive_from(secret.as_bytes()),
        Err(_) => {
            log::warn!("Cookie key not found, generating a random one");
            Key::generate()
        }
    }
}

pub async fn run(
    app: Arc<Application>,
    auth: Arc<dyn AuthenticationPort + Send + Sync + 'static>,
    shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
) {
    let router: Router<AppState> = Router::new().nest(
        "/v1",
        Router::new()
            .route("/resolve", get(resolve::resolve_destination))
            .route("/profiles", get(profiles::list_profiles))
            .route("/profiles", post(profiles::create_profile))
            .route("/profiles/select", put(profiles::select_profile))
            .route("/profiles/{profile_id}", put(profiles::update_profile))
            .route("/requests", post(access::request_access))
            .route(
                "/admin/memberships/suspend",
                post(admin::suspend_memberships),
            )
            .route("/admin/groups/state", post(admin::set_group_state))
            .route("/admin/groups/{group_id}/roster", get(admin::group_roster)),
    );

    let port = std::env::var("PICKEM_HTTP_PORT")
        .expect("PICKEM_HTTP_PORT must be set")
        .parse::<u16>()
        .expect("PICKEM_HTTP_PORT must be a valid u16");

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port))
        .await
        .unwrap();

    let state = AppState {
        app,
        auth,
        cookie_key: cookie_key_from_env(),
    };

    info!("API server listening on port {}", port);
    axum::serve(listener, router.with_state(state))
        .with_graceful_shutdown(shutdown_signal)
        .await
        .unwrap();

    info!("HTTP API shut down gracefully");
}
