use axum::{ extract::State, http::{ header::AUTHORIZATION, HeaderMap, StatusCode }, Json };
use serde_json::Value;

use crate::error::{ AppError, Result };
use crate::services::auth_service::{
    Credentials,
    RecoverRequest,
    SignUpRequest,
    UserUpdateRequest,
};

use super::extract::ApiJson;
use super::AppState;

/// Token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| {
            value.strip_prefix("Bearer ").or_else(|| value.strip_prefix("bearer "))
        })
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AppError::Unauthorized)
}

pub async fn sign_up(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SignUpRequest>
) -> Result<Json<Value>> {
    Ok(Json(state.auth_service.sign_up(&request).await?))
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(credentials): ApiJson<Credentials>
) -> Result<Json<Value>> {
    Ok(Json(state.auth_service.sign_in(&credentials).await?))
}

pub async fn recover(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RecoverRequest>
) -> Result<Json<Value>> {
    Ok(Json(state.auth_service.recover(&request).await?))
}

pub async fn get_user(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<Value>> {
    let token = bearer_token(&headers)?;
    Ok(Json(state.auth_service.get_user(token).await?))
}

pub async fn update_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(update): ApiJson<UserUpdateRequest>
) -> Result<Json<Value>> {
    let token = bearer_token(&headers)?;
    Ok(Json(state.auth_service.update_user(token, &update).await?))
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<StatusCode> {
    let token = bearer_token(&headers)?;
    state.auth_service.sign_out(token).await?;
    Ok(StatusCode::NO_CONTENT)
}
