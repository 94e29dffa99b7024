use axum::{ extract::State, Json };
use serde::Deserialize;

use crate::error::Result;
use crate::services::{ RoutePoint, WeatherHazard, WeatherReport };

use super::extract::{ ApiJson, ApiQuery };
use super::AppState;

#[derive(Deserialize)]
pub struct WeatherQueryParams {
    #[serde(default)]
    pub location: String,
}

#[derive(Deserialize)]
pub struct HazardRequest {
    #[serde(default)]
    pub points: Vec<RoutePoint>,
}

pub async fn get_weather(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<WeatherQueryParams>
) -> Result<Json<WeatherReport>> {
    let report = state.weather_service.current_for_location(&params.location).await?;
    Ok(Json(report))
}

pub async fn get_route_hazards(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<HazardRequest>
) -> Result<Json<Vec<WeatherHazard>>> {
    let hazards = state.weather_service.hazards_for_points(&request.points).await;
    Ok(Json(hazards))
}
