use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use pickem_app::domain::ProfileId;
use uuid::Uuid;

use crate::http::AppState;

pub const SELECTED_PROFILE_COOKIE: &str = "pickem_profile";

const SELECTION_MAX_AGE_DAYS: i64 = 30;

/// The per-session selected-profile pointer, carried in a signed cookie.
/// The signature only guards against tampering; ownership is re-validated
/// by the workflows on every request, so an unreadable or stale value is
/// simply no selection.
pub struct SelectedProfile(pub Option<ProfileId>);

impl FromRequestParts<AppState> for SelectedProfile {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        app: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = SignedCookieJar::from_headers(&parts.headers, app.cookie_key.clone());
        let selected = jar
            .get(SELECTED_PROFILE_COOKIE)
            .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
            .map(ProfileId);
        Ok(SelectedProfile(selected))
    }
}

pub fn selection_cookie(profile_id: ProfileId) -> Cookie<'static> {
    Cookie::build((SELECTED_PROFILE_COOKIE, profile_id.to_string()))
        .path("/")
        .http_only(true)
        .secure(in_production())
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(SELECTION_MAX_AGE_DAYS))
        .build()
}

fn in_production() -> bool {
    std::env::var("PICKEM_ENV").is_ok_and(|env| env == "production")
}
