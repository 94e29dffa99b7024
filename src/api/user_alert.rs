use std::collections::BTreeMap;

use axum::{ extract::State, http::StatusCode, Json };
use chrono::Utc;
use serde::Deserialize;

use crate::db::entity::user_alert;
use crate::enums::AlertStatus;
use crate::error::{ AppError, Result };
use crate::services::user_alert_service::{
    DEFAULT_RESOLVED_RETENTION_DAYS,
    NewUserAlert,
    UserAlertResolution,
    UserAlertDeletion,
    UserAlertFilter,
    UserAlertUpdate,
};

use super::extract::{ ApiJson, ApiQuery };
use super::params::{ non_empty, parse_optional_timestamp, Bound };
use super::responses::{ Count, Deleted, OneOrMany };
use super::AppState;

#[derive(Deserialize)]
pub struct UserAlertQueryParams {
    pub id: Option<i32>,
    pub user_id: Option<String>,
    pub alert_status: Option<AlertStatus>,
    pub alert_name: Option<String>,
    pub search: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub limit: Option<u64>,
}

#[derive(Deserialize)]
pub struct UserAlertDeleteParams {
    pub id: Option<i32>,
    pub alert_status: Option<AlertStatus>,
    pub before_date: Option<String>,
    pub alert_name: Option<String>,
}

#[derive(Deserialize)]
pub struct UserAlertCountParams {
    pub user_id: Option<String>,
    pub alert_status: Option<AlertStatus>,
}

#[derive(Deserialize)]
pub struct SummaryParams {
    pub user_id: Option<String>,
}

#[derive(Deserialize)]
pub struct PurgeResolvedParams {
    pub days: Option<i64>,
    pub user_id: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateUserAlertRequest {
    pub id: Option<i32>,
    #[serde(flatten)]
    pub update: UserAlertUpdate,
}

pub async fn create_user_alert(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<NewUserAlert>
) -> Result<(StatusCode, Json<user_alert::Model>)> {
    let alert = state.user_alert_service.create(request).await?;
    Ok((StatusCode::CREATED, Json(alert)))
}

pub async fn get_user_alerts(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<UserAlertQueryParams>
) -> Result<Json<OneOrMany<user_alert::Model>>> {
    if let Some(id) = params.id {
        let alert = state.user_alert_service.get(id).await?;
        return Ok(Json(OneOrMany::One(alert)));
    }

    let filter = UserAlertFilter {
        start: parse_optional_timestamp("start_date", params.start_date.as_deref(), Bound::Start)?,
        end: parse_optional_timestamp("end_date", params.end_date.as_deref(), Bound::End)?,
        user_id: non_empty(params.user_id),
        status: params.alert_status,
        name: non_empty(params.alert_name),
        search: non_empty(params.search),
        limit: params.limit,
    };

    let alerts = state.user_alert_service.list(&filter).await?;
    Ok(Json(OneOrMany::Many(alerts)))
}

pub async fn update_user_alert(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<UpdateUserAlertRequest>
) -> Result<Json<user_alert::Model>> {
    let id = request.id.ok_or_else(|| AppError::missing("ID"))?;
    let alert = state.user_alert_service.update(id, request.update).await?;
    Ok(Json(alert))
}

pub async fn delete_user_alerts(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<UserAlertDeleteParams>
) -> Result<Json<Deleted<user_alert::Model>>> {
    let selection = UserAlertDeletion {
        id: params.id,
        status: params.alert_status,
        before: parse_optional_timestamp("before_date", params.before_date.as_deref(), Bound::Start)?,
        name: non_empty(params.alert_name),
    };

    let deleted = state.user_alert_service.delete(&selection).await?;
    Ok(Json(Deleted::new("user alert", deleted)))
}

pub async fn count_user_alerts(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<UserAlertCountParams>
) -> Result<Json<Count>> {
    let user_id = non_empty(params.user_id);
    let count = state.user_alert_service.count(user_id.as_deref(), params.alert_status).await?;
    Ok(Json(Count { count }))
}

/// Alerts per status for one user, e.g. `{"ACTIVE": 3, "RESOLVED": 1}`.
pub async fn get_alert_status_summary(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SummaryParams>
) -> Result<Json<BTreeMap<String, u64>>> {
    let user_id = non_empty(params.user_id).ok_or_else(|| AppError::missing("user_id"))?;
    let summary = state.user_alert_service.status_summary(&user_id).await?;
    Ok(Json(summary))
}

pub async fn resolve_user_alerts(
    State(state): State<AppState>,
    ApiJson(selection): ApiJson<UserAlertResolution>
) -> Result<Json<Vec<user_alert::Model>>> {
    let resolved = state.user_alert_service.resolve(&selection).await?;
    Ok(Json(resolved))
}

/// Purge RESOLVED alerts older than `days` (default 30).
pub async fn delete_resolved_user_alerts(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PurgeResolvedParams>
) -> Result<Json<Deleted<user_alert::Model>>> {
    let days = params.days.unwrap_or(DEFAULT_RESOLVED_RETENTION_DAYS);
    let user_id = non_empty(params.user_id);

    let deleted = state.user_alert_service.delete_old_resolved(
        Utc::now(),
        days,
        user_id.as_deref()
    ).await?;
    Ok(Json(Deleted::new("user alert", deleted)))
}
