use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::cookie::SignedCookieJar;
use pickem_app::domain::{ProfileId, profile::{Avatar, Profile}};
use uuid::Uuid;

use crate::{
    ServiceError,
    auth::Auth,
    http::AppState,
    selection::selection_cookie,
};

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    profile_id: String,
    username: String,
    avatar: &'static str,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Profile> for ProfileView {
    fn from(profile: Profile) -> Self {
        Self {
            profile_id: profile.profile_id.to_string(),
            username: profile.username.as_str().to_string(),
            avatar: profile.avatar.as_str(),
            created_at: profile.created_at,
        }
    }
}

pub async fn list_profiles(
    State(state): State<AppState>,
    Auth(account): Auth,
) -> Result<Json<Vec<ProfileView>>, ServiceError> {
    let profiles = state
        .app
        .profile_list_use_case
        .list_profiles(account.account_id)
        .await?;
    Ok(Json(profiles.into_iter().map(ProfileView::from).collect()))
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileRequest {
    username: String,
    avatar: String,
}

pub async fn create_profile(
    State(state): State<AppState>,
    Auth(account): Auth,
    Json(body): Json<CreateProfileRequest>,
) -> Result<(StatusCode, Json<ProfileView>), ServiceError> {
    let avatar = body
        .avatar
        .parse::<Avatar>()
        .map_err(|_| ServiceError::BadRequest(format!("unknown avatar '{}'", body.avatar)))?;

    let profile = state
        .app
        .profile_create_use_case
        .create_profile(&account, &body.username, avatar)
        .await?;
    Ok((StatusCode::CREATED, Json(profile.into())))
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    avatar: Option<String>,
}

pub async fn update_profile(
    State(state): State<AppState>,
    Auth(account): Auth,
    Path(profile_id): Path<Uuid>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileView>, ServiceError> {
    let avatar = match &body.avatar {
        Some(raw) => Some(
            raw.parse::<Avatar>()
                .map_err(|_| ServiceError::BadRequest(format!("unknown avatar '{}'", raw)))?,
        ),
        None => None,
    };

    let profile = state
        .app
        .profile_update_use_case
        .update_profile(
            &account,
            ProfileId(profile_id),
            body.username.as_deref(),
            avatar,
        )
        .await?;
    Ok(Json(profile.into()))
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectProfileRequest {
    profile_id: Uuid,
}

pub async fn select_profile(
    State(state): State<AppState>,
    Auth(account): Auth,
    jar: SignedCookieJar,
    Json(body): Json<SelectProfileRequest>,
) -> Result<(SignedCookieJar, Json<ProfileView>), ServiceError> {
    let profile = state
        .app
        .profile_select_use_case
        .select_profile(&account, ProfileId(body.profile_id))
        .await?;

    let jar = jar.add(selection_cookie(profile.profile_id));
    Ok((jar, Json(profile.into())))
}
