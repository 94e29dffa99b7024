use axum::{ extract::State, Json };
use serde::Deserialize;

use crate::error::Result;
use crate::providers::Route;
use crate::services::{ RoutePlan, RoutePreferences };

use super::extract::ApiJson;
use super::AppState;

#[derive(Deserialize)]
pub struct PlanRouteRequest {
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub preferences: RoutePreferences,
}

#[derive(Deserialize)]
pub struct ScoreRoutesRequest {
    #[serde(default)]
    pub routes: Vec<Route>,
    #[serde(default)]
    pub preferences: RoutePreferences,
}

pub async fn plan_route(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<PlanRouteRequest>
) -> Result<Json<RoutePlan>> {
    let plan = state.route_service.plan(
        &request.origin,
        &request.destination,
        &request.preferences
    ).await?;

    Ok(Json(plan))
}

/// Score routes the client already holds; the first is the primary.
pub async fn score_routes(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ScoreRoutesRequest>
) -> Result<Json<RoutePlan>> {
    let plan = state.route_service.score(&request.routes, &request.preferences)?;
    Ok(Json(plan))
}
