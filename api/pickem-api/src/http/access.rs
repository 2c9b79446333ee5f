use axum::{Json, extract::State, http::StatusCode};
use pickem_app::domain::{GroupId, ProfileId, access_request::AccessRequest};
use uuid::Uuid;

use crate::{ServiceError, auth::Auth, http::AppState};

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestAccessRequest {
    profile_id: Uuid,
    group_id: Uuid,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRequestView {
    request_id: String,
    profile_id: String,
    group_id: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<AccessRequest> for AccessRequestView {
    fn from(request: AccessRequest) -> Self {
        Self {
            request_id: request.request_id.to_string(),
            profile_id: request.profile_id.to_string(),
            group_id: request.group_id.to_string(),
            created_at: request.created_at,
        }
    }
}

pub async fn request_access(
    State(state): State<AppState>,
    Auth(account): Auth,
    Json(body): Json<RequestAccessRequest>,
) -> Result<(StatusCode, Json<AccessRequestView>), ServiceError> {
    let request = state
        .app
        .request_access_use_case
        .request_access(
            &account,
            ProfileId(body.profile_id),
            GroupId(body.group_id),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(request.into())))
}
