use axum::{
    extract::FromRequestParts,
    http::{header::COOKIE, request::Parts},
};
use pickem_app::domain::account::Account;

use crate::{ServiceError, http::AppState};

pub const SESSION_COOKIE: &str = "pickem_session";

/// Rejecting extractor for protected routes: bearer header or session
/// cookie, in that order. Suspended accounts are turned away here.
pub struct Auth(pub Account);

/// Non-rejecting variant for the resolve endpoint, which must answer
/// with a login destination instead of a 401.
pub struct MaybeAuth(pub Option<Account>);

impl FromRequestParts<AppState> for Auth {
    type Rejection = ServiceError;

    async fn from_request_parts(
        parts: &mut Parts,
        app: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(account) = account_from_parts(parts, app).await else {
            return Err(ServiceError::Unauthorized(
                "authentication failed".to_string(),
            ));
        };
        if account.is_suspended {
            return Err(ServiceError::Forbidden("account suspended".to_string()));
        }
        Ok(Auth(account))
    }
}

impl FromRequestParts<AppState> for MaybeAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        app: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let account = account_from_parts(parts, app)
            .await
            .filter(|a| !a.is_suspended);
        Ok(MaybeAuth(account))
    }
}

async fn account_from_parts(parts: &mut Parts, app: &AppState) -> Option<Account> {
    if let Some(auth_header) = parts.headers.get("authorization")
        && let Ok(value) = auth_header.to_str()
        && let Some(token) = value.strip_prefix("Bearer ")
        && let Some(account) = app.auth.get_account_by_session(token).await
    {
        return Some(account);
    }

    if let Some(cookie_header) = parts.headers.get(COOKIE)
        && let Ok(cookies) = cookie_header.to_str()
        && let Some(token) = session_cookie_value(cookies)
        && let Some(account) = app.auth.get_account_by_session(token).await
    {
        return Some(account);
    }

    None
}

fn session_cookie_value(cookies: &str) -> Option<&str> {
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then_some(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_is_found_among_others() {
        let cookies = "theme=dark; pickem_session=abc.def.ghi; lang=en";
        assert_eq!(session_cookie_value(cookies), Some("abc.def.ghi"));
        assert_eq!(session_cookie_value("theme=dark"), None);
    }
}
