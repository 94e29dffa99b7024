use axum::{ extract::State, http::StatusCode, Json };
use serde::Deserialize;
use serde_json::Value;

use crate::db::entity::audit_log;
use crate::error::{ AppError, Result };
use crate::services::audit_log_service::{
    AuditLogDeletion,
    AuditLogFilter,
    AuditLogUpdate,
    NewAuditLog,
};

use super::extract::{ ApiJson, ApiQuery };
use super::params::{ non_empty, parse_optional_timestamp, Bound };
use super::responses::{ Count, Deleted, Inserted, OneOrMany };
use super::AppState;

#[derive(Deserialize)]
pub struct AuditLogQueryParams {
    pub id: Option<i32>,
    pub user_id: Option<String>,
    pub action: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub limit: Option<u64>,
}

impl AuditLogQueryParams {
    fn filter(self) -> Result<AuditLogFilter> {
        Ok(AuditLogFilter {
            start: parse_optional_timestamp("start_date", self.start_date.as_deref(), Bound::Start)?,
            end: parse_optional_timestamp("end_date", self.end_date.as_deref(), Bound::End)?,
            user_id: non_empty(self.user_id),
            action: non_empty(self.action),
            limit: self.limit,
        })
    }
}

#[derive(Deserialize)]
pub struct AuditLogDeleteParams {
    pub id: Option<i32>,
    pub user_id: Option<String>,
    pub before_date: Option<String>,
    pub action: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateAuditLogRequest {
    pub id: Option<i32>,
    #[serde(flatten)]
    pub update: AuditLogUpdate,
}

pub async fn create_audit_log(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<NewAuditLog>
) -> Result<(StatusCode, Json<audit_log::Model>)> {
    let log = state.audit_log_service.create(request).await?;
    Ok((StatusCode::CREATED, Json(log)))
}

/// Body is taken raw so a non-array payload gets a precise message.
pub async fn bulk_create_audit_logs(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Value>
) -> Result<(StatusCode, Json<Inserted<audit_log::Model>>)> {
    if !body.is_array() {
        return Err(AppError::InvalidInput("Request body must be an array of audit logs".to_string()));
    }

    let entries: Vec<NewAuditLog> = serde_json
        ::from_value(body)
        .map_err(|e| AppError::InvalidInput(format!("Invalid audit log entry: {}", e)))?;

    let inserted = state.audit_log_service.create_many(entries).await?;

    Ok((
        StatusCode::CREATED,
        Json(Inserted {
            message: format!("Successfully inserted {} audit logs", inserted.len()),
            data: inserted,
        }),
    ))
}

pub async fn get_audit_logs(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<AuditLogQueryParams>
) -> Result<Json<OneOrMany<audit_log::Model>>> {
    if let Some(id) = params.id {
        let log = state.audit_log_service.get(id).await?;
        return Ok(Json(OneOrMany::One(log)));
    }

    let logs = state.audit_log_service.list(&params.filter()?).await?;
    Ok(Json(OneOrMany::Many(logs)))
}

pub async fn count_audit_logs(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<AuditLogQueryParams>
) -> Result<Json<Count>> {
    let mut filter = params.filter()?;
    filter.limit = None;

    let count = state.audit_log_service.count(&filter).await?;
    Ok(Json(Count { count }))
}

pub async fn update_audit_log(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<UpdateAuditLogRequest>
) -> Result<Json<audit_log::Model>> {
    let id = request.id.ok_or_else(|| AppError::missing("ID"))?;
    let log = state.audit_log_service.update(id, request.update).await?;
    Ok(Json(log))
}

pub async fn delete_audit_logs(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<AuditLogDeleteParams>
) -> Result<Json<Deleted<audit_log::Model>>> {
    let selection = AuditLogDeletion {
        id: params.id,
        user_id: non_empty(params.user_id),
        before: parse_optional_timestamp("before_date", params.before_date.as_deref(), Bound::Start)?,
        action: non_empty(params.action),
    };

    let deleted = state.audit_log_service.delete(&selection).await?;
    Ok(Json(Deleted::new("audit log", deleted)))
}
