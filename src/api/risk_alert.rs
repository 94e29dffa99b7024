use axum::{ extract::State, http::StatusCode, Json };
use serde::Deserialize;
use uuid::Uuid;

use crate::db::entity::risk_alert;
use crate::error::{ AppError, Result };
use crate::services::risk_alert_service::{ NewRiskAlert, RiskAlertUpdate };

use super::extract::{ ApiJson, ApiQuery };
use super::params::non_empty;
use super::AppState;

#[derive(Deserialize)]
pub struct CreateRiskAlertRequest {
    #[serde(alias = "userID")]
    pub user_id: Option<String>,
    #[serde(flatten)]
    pub alert: NewRiskAlert,
}

#[derive(Deserialize)]
pub struct RiskAlertQueryParams {
    #[serde(alias = "userID")]
    pub user_id: Option<String>,
    pub acknowledged: Option<bool>,
}

#[derive(Deserialize)]
pub struct UpdateRiskAlertRequest {
    #[serde(alias = "userID")]
    pub user_id: Option<String>,
    pub alert_id: Option<Uuid>,
    #[serde(flatten)]
    pub update: RiskAlertUpdate,
}

#[derive(Deserialize)]
pub struct DeleteRiskAlertParams {
    #[serde(alias = "userID")]
    pub user_id: Option<String>,
    pub alert_id: Option<Uuid>,
}

fn require_user_and_alert(user_id: Option<String>, alert_id: Option<Uuid>) -> Result<(String, Uuid)> {
    match (non_empty(user_id), alert_id) {
        (Some(user_id), Some(alert_id)) => Ok((user_id, alert_id)),
        _ => Err(AppError::InvalidInput("User ID and Alert ID are required".to_string())),
    }
}

pub async fn create_risk_alert(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateRiskAlertRequest>
) -> Result<(StatusCode, Json<risk_alert::Model>)> {
    let user_id = non_empty(request.user_id).ok_or_else(|| AppError::missing("User ID"))?;
    let alert = state.risk_alert_service.create(&user_id, request.alert).await?;
    Ok((StatusCode::CREATED, Json(alert)))
}

pub async fn get_risk_alerts(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<RiskAlertQueryParams>
) -> Result<Json<Vec<risk_alert::Model>>> {
    let user_id = non_empty(params.user_id).ok_or_else(|| AppError::missing("User ID"))?;
    let alerts = state.risk_alert_service.list_for_user(&user_id, params.acknowledged).await?;
    Ok(Json(alerts))
}

pub async fn update_risk_alert(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<UpdateRiskAlertRequest>
) -> Result<Json<risk_alert::Model>> {
    let (user_id, alert_id) = require_user_and_alert(request.user_id, request.alert_id)?;
    let alert = state.risk_alert_service.update(&user_id, alert_id, request.update).await?;
    Ok(Json(alert))
}

pub async fn delete_risk_alert(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<DeleteRiskAlertParams>
) -> Result<Json<Vec<risk_alert::Model>>> {
    let (user_id, alert_id) = require_user_and_alert(params.user_id, params.alert_id)?;
    let deleted = state.risk_alert_service.delete(&user_id, alert_id).await?;
    Ok(Json(deleted))
}
