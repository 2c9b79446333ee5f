use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use pickem_app::workflow::{
    access::request::RequestAccessError,
    admin::{
        group_roster::GroupRosterError, set_group_state::SetGroupStateError,
        suspend_memberships::SuspendMembershipsError,
    },
    profile::{
        create::CreateProfileError, get_selected::GetSelectedProfileError,
        list::ListProfilesError, select::SelectProfileError, update::UpdateProfileError,
    },
    resolve::destination::ResolveError,
};

pub mod auth;
pub mod http;
pub mod selection;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::BadRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        if let ServiceError::Internal(e) = &self {
            log::error!("Internal error reached the API boundary: {}", e);
        }
        let body = Json(json!({ "error": self.to_string() }));
        (self.status_code(), body).into_response()
    }
}

impl From<ResolveError> for ServiceError {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::RepositoryError => {
                ServiceError::Internal("destination resolution failed".to_string())
            }
        }
    }
}

impl From<CreateProfileError> for ServiceError {
    fn from(e: CreateProfileError) -> Self {
        match e {
            CreateProfileError::InvalidUsername(reason) => {
                ServiceError::BadRequest(reason.to_string())
            }
            CreateProfileError::UsernameTaken => {
                ServiceError::Conflict("username taken".to_string())
            }
            CreateProfileError::StorageError => {
                ServiceError::Internal("profile creation failed".to_string())
            }
        }
    }
}

impl From<ListProfilesError> for ServiceError {
    fn from(e: ListProfilesError) -> Self {
        match e {
            ListProfilesError::RepositoryError => {
                ServiceError::Internal("profile listing failed".to_string())
            }
        }
    }
}

impl From<SelectProfileError> for ServiceError {
    fn from(e: SelectProfileError) -> Self {
        match e {
            SelectProfileError::NotFound => ServiceError::NotFound("profile".to_string()),
            SelectProfileError::Forbidden => {
                ServiceError::Forbidden("profile belongs to another account".to_string())
            }
            SelectProfileError::StorageError => {
                ServiceError::Internal("profile selection failed".to_string())
            }
        }
    }
}

impl From<GetSelectedProfileError> for ServiceError {
    fn from(e: GetSelectedProfileError) -> Self {
        match e {
            GetSelectedProfileError::RepositoryError => {
                ServiceError::Internal("selection lookup failed".to_string())
            }
        }
    }
}

impl From<RequestAccessError> for ServiceError {
    fn from(e: RequestAccessError) -> Self {
        match e {
            RequestAccessError::ProfileNotFound => ServiceError::NotFound("profile".to_string()),
            RequestAccessError::Forbidden => {
                ServiceError::Forbidden("profile belongs to another account".to_string())
            }
            RequestAccessError::GroupNotFound => ServiceError::NotFound("group".to_string()),
            RequestAccessError::GroupClosed => {
                ServiceError::BadRequest("group not accepting requests".to_string())
            }
            RequestAccessError::AlreadyRequested => {
                ServiceError::Conflict("already requested".to_string())
            }
            RequestAccessError::StorageError => {
                ServiceError::Internal("access request failed".to_string())
            }
        }
    }
}

impl From<SuspendMembershipsError> for ServiceError {
    fn from(e: SuspendMembershipsError) -> Self {
        match e {
            SuspendMembershipsError::NotAdmin => {
                ServiceError::Forbidden("admin only".to_string())
            }
            SuspendMembershipsError::StorageError => {
                ServiceError::Internal("bulk suspension failed".to_string())
            }
        }
    }
}

impl From<SetGroupStateError> for ServiceError {
    fn from(e: SetGroupStateError) -> Self {
        match e {
            SetGroupStateError::NotAdmin => ServiceError::Forbidden("admin only".to_string()),
            SetGroupStateError::EmptyPatch => {
                ServiceError::BadRequest("nothing to update".to_string())
            }
            SetGroupStateError::StorageError => {
                ServiceError::Internal("bulk group update failed".to_string())
            }
        }
    }
}

impl From<UpdateProfileError> for ServiceError {
    fn from(e: UpdateProfileError) -> Self {
        match e {
            UpdateProfileError::NotFound => ServiceError::NotFound("profile".to_string()),
            UpdateProfileError::Forbidden => {
                ServiceError::Forbidden("profile belongs to another account".to_string())
            }
            UpdateProfileError::EmptyPatch => {
                ServiceError::BadRequest("nothing to update".to_string())
            }
            UpdateProfileError::InvalidUsername(reason) => {
                ServiceError::BadRequest(reason.to_string())
            }
            UpdateProfileError::UsernameTaken => {
                ServiceError::Conflict("username taken".to_string())
            }
            UpdateProfileError::StorageError => {
                ServiceError::Internal("profile update failed".to_string())
            }
        }
    }
}

impl From<GroupRosterError> for ServiceError {
    fn from(e: GroupRosterError) -> Self {
        match e {
            GroupRosterError::NotAdmin => ServiceError::Forbidden("admin only".to_string()),
            GroupRosterError::GroupNotFound => ServiceError::NotFound("group".to_string()),
            GroupRosterError::StorageError => {
                ServiceError::Internal("roster lookup failed".to_string())
            }
        }
    }
}
