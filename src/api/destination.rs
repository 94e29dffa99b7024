use std::collections::BTreeMap;

use axum::{ extract::State, http::StatusCode, Json };
use chrono::Utc;
use serde::Deserialize;

use crate::db::entity::monitored_destination;
use crate::enums::RiskLevel;
use crate::error::{ AppError, Result };
use crate::services::destination_service::{
    DEFAULT_CLEANUP_DAYS,
    DestinationDeletion,
    DestinationFilter,
    DestinationUpdate,
    NewDestination,
};
use crate::services::risk_assessment_service::DestinationAssessment;

use super::extract::{ ApiJson, ApiPath, ApiQuery };
use super::params::{ non_empty, parse_optional_date };
use super::responses::{ Count, Deleted, OneOrMany };
use super::AppState;

#[derive(Deserialize)]
pub struct DestinationQueryParams {
    pub id: Option<i32>,
    pub user_id: Option<String>,
    pub location: Option<String>,
    pub risk_level: Option<RiskLevel>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Deserialize)]
pub struct StaleQueryParams {
    pub days: Option<i64>,
}

#[derive(Deserialize)]
pub struct UserQueryParams {
    pub user_id: Option<String>,
}

#[derive(Deserialize)]
pub struct DestinationCountParams {
    pub user_id: Option<String>,
    pub risk_level: Option<RiskLevel>,
}

#[derive(Deserialize)]
pub struct DestinationDeleteParams {
    pub id: Option<i32>,
    pub user_id: Option<String>,
    pub location: Option<String>,
    pub risk_level: Option<RiskLevel>,
}

#[derive(Deserialize)]
pub struct UpdateDestinationRequest {
    pub id: Option<i32>,
    #[serde(flatten)]
    pub update: DestinationUpdate,
}

pub async fn create_destination(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<NewDestination>
) -> Result<(StatusCode, Json<monitored_destination::Model>)> {
    let destination = state.destination_service.create(request).await?;
    Ok((StatusCode::CREATED, Json(destination)))
}

pub async fn get_destinations(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<DestinationQueryParams>
) -> Result<Json<OneOrMany<monitored_destination::Model>>> {
    if let Some(id) = params.id {
        let destination = state.destination_service.get(id).await?;
        return Ok(Json(OneOrMany::One(destination)));
    }

    let filter = DestinationFilter {
        checked_from: parse_optional_date("start_date", params.start_date.as_deref())?,
        checked_to: parse_optional_date("end_date", params.end_date.as_deref())?,
        user_id: non_empty(params.user_id),
        location: non_empty(params.location),
        risk_level: params.risk_level,
    };

    let destinations = state.destination_service.list(&filter).await?;
    Ok(Json(OneOrMany::Many(destinations)))
}

pub async fn get_stale_destinations(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<StaleQueryParams>
) -> Result<Json<Vec<monitored_destination::Model>>> {
    let days = params.days.unwrap_or(state.stale_after_days);
    let destinations = state.destination_service.stale(Utc::now().date_naive(), days).await?;
    Ok(Json(destinations))
}

pub async fn get_high_risk_destinations(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<UserQueryParams>
) -> Result<Json<Vec<monitored_destination::Model>>> {
    let user_id = non_empty(params.user_id);
    let destinations = state.destination_service.high_risk(user_id.as_deref()).await?;
    Ok(Json(destinations))
}

pub async fn count_destinations(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<DestinationCountParams>
) -> Result<Json<Count>> {
    let user_id = non_empty(params.user_id);
    let count = state.destination_service.count(user_id.as_deref(), params.risk_level).await?;
    Ok(Json(Count { count }))
}

/// Destinations per risk level, e.g. `{"HIGH": 2, "LOW": 5}`.
pub async fn get_risk_level_statistics(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<UserQueryParams>
) -> Result<Json<BTreeMap<String, u64>>> {
    let user_id = non_empty(params.user_id);
    let stats = state.destination_service.risk_level_statistics(user_id.as_deref()).await?;
    Ok(Json(stats))
}

/// Remove destinations not checked for `days` (default 90).
pub async fn delete_stale_destinations(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<StaleQueryParams>
) -> Result<Json<Deleted<monitored_destination::Model>>> {
    let days = params.days.unwrap_or(DEFAULT_CLEANUP_DAYS);
    let deleted = state.destination_service.delete_stale(Utc::now().date_naive(), days).await?;
    Ok(Json(Deleted::new("monitored destination", deleted)))
}

pub async fn update_destination(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<UpdateDestinationRequest>
) -> Result<Json<monitored_destination::Model>> {
    let id = request.id.ok_or_else(|| AppError::missing("ID"))?;
    let destination = state.destination_service.update(id, request.update).await?;
    Ok(Json(destination))
}

pub async fn delete_destinations(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<DestinationDeleteParams>
) -> Result<Json<Deleted<monitored_destination::Model>>> {
    let selection = DestinationDeletion {
        id: params.id,
        user_id: non_empty(params.user_id),
        location: non_empty(params.location),
        risk_level: params.risk_level,
    };

    let deleted = state.destination_service.delete(&selection).await?;
    Ok(Json(Deleted::new("monitored destination", deleted)))
}

/// Re-assess one destination against current weather.
pub async fn check_destination(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>
) -> Result<Json<DestinationAssessment>> {
    let assessment = state.risk_assessment_service.assess_destination(id).await?;
    Ok(Json(assessment))
}
