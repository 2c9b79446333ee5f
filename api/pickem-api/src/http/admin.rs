use axum::{
    Json,
    extract::{Path, State},
};
use pickem_app::{
    domain::{
        GroupId, MembershipId, access_request::AccessRequest, group::GroupStatePatch,
        membership::Membership,
    },
    workflow::admin::{BulkOutcome, BulkReport, group_roster::GroupRoster},
};
use uuid::Uuid;

use crate::{ServiceError, auth::Auth, http::AppState};

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkResultView {
    id: String,
    outcome: &'static str,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkReportView {
    results: Vec<BulkResultView>,
    affected: usize,
}

impl<I: std::fmt::Display> From<BulkReport<I>> for BulkReportView {
    fn from(report: BulkReport<I>) -> Self {
        let affected = report.affected();
        let results = report
            .results
            .into_iter()
            .map(|(id, outcome)| BulkResultView {
                id: id.to_string(),
                outcome: match outcome {
                    BulkOutcome::Updated => "UPDATED",
                    BulkOutcome::NotFound => "NOT_FOUND",
                },
            })
            .collect();
        Self { results, affected }
    }
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuspendMembershipsRequest {
    membership_ids: Vec<Uuid>,
    suspended: bool,
}

pub async fn suspend_memberships(
    State(state): State<AppState>,
    Auth(account): Auth,
    Json(body): Json<SuspendMembershipsRequest>,
) -> Result<Json<BulkReportView>, ServiceError> {
    let ids: Vec<MembershipId> = body.membership_ids.into_iter().map(MembershipId).collect();
    let report = state
        .app
        .suspend_memberships_use_case
        .set_suspension(&account, &ids, body.suspended)
        .await?;
    Ok(Json(report.into()))
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetGroupStateRequest {
    group_ids: Vec<Uuid>,
    #[serde(default)]
    joinable: Option<bool>,
    #[serde(default)]
    finished: Option<bool>,
}

pub async fn set_group_state(
    State(state): State<AppState>,
    Auth(account): Auth,
    Json(body): Json<SetGroupStateRequest>,
) -> Result<Json<BulkReportView>, ServiceError> {
    let ids: Vec<GroupId> = body.group_ids.into_iter().map(GroupId).collect();
    let patch = GroupStatePatch {
        joinable: body.joinable,
        finished: body.finished,
    };
    let report = state
        .app
        .set_group_state_use_case
        .set_group_state(&account, &ids, patch)
        .await?;
    Ok(Json(report.into()))
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipView {
    membership_id: String,
    profile_id: String,
    suspended: bool,
    paid: bool,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Membership> for MembershipView {
    fn from(m: Membership) -> Self {
        Self {
            membership_id: m.membership_id.to_string(),
            profile_id: m.profile_id.to_string(),
            suspended: m.suspended,
            paid: m.paid,
            created_at: m.created_at,
        }
    }
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRequestView {
    request_id: String,
    profile_id: String,
    denied: bool,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<AccessRequest> for AccessRequestView {
    fn from(r: AccessRequest) -> Self {
        Self {
            request_id: r.request_id.to_string(),
            profile_id: r.profile_id.to_string(),
            denied: r.denied,
            created_at: r.created_at,
        }
    }
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRosterView {
    group_id: String,
    group_name: String,
    joinable: bool,
    finished: bool,
    memberships: Vec<MembershipView>,
    requests: Vec<AccessRequestView>,
}

impl From<GroupRoster> for GroupRosterView {
    fn from(roster: GroupRoster) -> Self {
        Self {
            group_id: roster.group.group_id.to_string(),
            group_name: roster.group.name,
            joinable: roster.group.joinable,
            finished: roster.group.finished,
            memberships: roster.memberships.into_iter().map(Into::into).collect(),
            requests: roster.requests.into_iter().map(Into::into).collect(),
        }
    }
}

pub async fn group_roster(
    State(state): State<AppState>,
    Auth(account): Auth,
    Path(group_id): Path<Uuid>,
) -> Result<Json<GroupRosterView>, ServiceError> {
    let roster = state
        .app
        .group_roster_use_case
        .group_roster(&account, GroupId(group_id))
        .await?;
    Ok(Json(roster.into()))
}
