use axum::{Json, extract::State};
use pickem_app::workflow::resolve::destination::Destination;

use crate::{ServiceError, auth::MaybeAuth, http::AppState, selection::SelectedProfile};

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationResponse {
    destination: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
}

impl From<Destination> for DestinationResponse {
    fn from(destination: Destination) -> Self {
        match destination {
            Destination::Login => Self {
                destination: "LOGIN",
                username: None,
            },
            Destination::CreateProfile => Self {
                destination: "CREATE_PROFILE",
                username: None,
            },
            Destination::SelectProfile => Self {
                destination: "SELECT_PROFILE",
                username: None,
            },
            Destination::RequestAccess { username } => Self {
                destination: "REQUEST_ACCESS",
                username: Some(username),
            },
            Destination::Dashboard => Self {
                destination: "DASHBOARD",
                username: None,
            },
            Destination::Admin => Self {
                destination: "ADMIN",
                username: None,
            },
        }
    }
}

/// Never rejects on missing authentication; an anonymous caller gets the
/// login destination. A denied gate is a redirect, not an error.
pub async fn resolve_destination(
    State(state): State<AppState>,
    MaybeAuth(account): MaybeAuth,
    SelectedProfile(selected): SelectedProfile,
) -> Result<Json<DestinationResponse>, ServiceError> {
    let destination = state
        .app
        .resolve_destination_use_case
        .resolve(account.as_ref(), selected)
        .await?;
    Ok(Json(destination.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_access_carries_the_username() {
        let response: DestinationResponse = Destination::RequestAccess {
            username: "bob".to_string(),
        }
        .into();
        assert_eq!(response.destination, "REQUEST_ACCESS");
        assert_eq!(response.username.as_deref(), Some("bob"));

        let response: DestinationResponse = Destination::Dashboard.into();
        assert_eq!(response.destination, "DASHBOARD");
        assert!(response.username.is_none());
    }
}
