use axum::{ extract::State, http::StatusCode, Json };
use serde::Deserialize;
use uuid::Uuid;

use crate::db::entity::reward;
use crate::error::{ AppError, Result };
use crate::services::reward_service::{ NewReward, RewardSummary, RewardUpdate };

use super::extract::{ ApiJson, ApiQuery };
use super::params::non_empty;
use super::AppState;

#[derive(Deserialize)]
pub struct CreateRewardRequest {
    #[serde(alias = "userID")]
    pub user_id: Option<String>,
    #[serde(flatten)]
    pub reward: NewReward,
}

#[derive(Deserialize)]
pub struct RewardQueryParams {
    #[serde(alias = "userID")]
    pub user_id: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateRewardRequest {
    #[serde(alias = "userID")]
    pub user_id: Option<String>,
    pub reward_id: Option<Uuid>,
    #[serde(flatten)]
    pub update: RewardUpdate,
}

#[derive(Deserialize)]
pub struct DeleteRewardParams {
    #[serde(alias = "userID")]
    pub user_id: Option<String>,
    pub reward_id: Option<Uuid>,
}

fn require_user(user_id: Option<String>) -> Result<String> {
    non_empty(user_id).ok_or_else(|| AppError::missing("User ID"))
}

fn require_user_and_reward(user_id: Option<String>, reward_id: Option<Uuid>) -> Result<(String, Uuid)> {
    match (non_empty(user_id), reward_id) {
        (Some(user_id), Some(reward_id)) => Ok((user_id, reward_id)),
        _ => Err(AppError::InvalidInput("User ID and Reward ID are required".to_string())),
    }
}

pub async fn create_reward(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateRewardRequest>
) -> Result<(StatusCode, Json<reward::Model>)> {
    let user_id = require_user(request.user_id)?;
    let reward = state.reward_service.create(&user_id, request.reward).await?;
    Ok((StatusCode::CREATED, Json(reward)))
}

pub async fn get_rewards(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<RewardQueryParams>
) -> Result<Json<Vec<reward::Model>>> {
    let user_id = require_user(params.user_id)?;
    let rewards = state.reward_service.list_for_user(&user_id).await?;
    Ok(Json(rewards))
}

pub async fn get_reward_summary(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<RewardQueryParams>
) -> Result<Json<RewardSummary>> {
    let user_id = require_user(params.user_id)?;
    let summary = state.reward_service.summary(&user_id).await?;
    Ok(Json(summary))
}

pub async fn update_reward(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<UpdateRewardRequest>
) -> Result<Json<reward::Model>> {
    let (user_id, reward_id) = require_user_and_reward(request.user_id, request.reward_id)?;
    let reward = state.reward_service.update(&user_id, reward_id, request.update).await?;
    Ok(Json(reward))
}

pub async fn delete_reward(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<DeleteRewardParams>
) -> Result<Json<Vec<reward::Model>>> {
    let (user_id, reward_id) = require_user_and_reward(params.user_id, params.reward_id)?;
    let deleted = state.reward_service.delete(&user_id, reward_id).await?;
    Ok(Json(deleted))
}
