use std::sync::Arc;

use serde::{ Deserialize, Serialize };

use crate::enums::RouteKind;
use crate::error::{ AppError, Result };
use crate::providers::{ DirectionsProvider, DirectionsRequest, Route };

const SHORT_TRIP_METERS: u64 = 100_000;
const SHORT_TRIP_SECONDS: u64 = 2 * 60 * 60;
const SHORT_DISTANCE_POINTS: u32 = 10;
const SHORT_DURATION_POINTS: u32 = 5;
const MAJOR_CITY_POINTS: u32 = 15;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutePreferences {
    pub prioritize_safety: bool,
    pub avoid_highways: bool,
    pub avoid_tolls: bool,
    pub avoid_ferries: bool,
}

impl Default for RoutePreferences {
    fn default() -> Self {
        Self {
            prioritize_safety: true,
            avoid_highways: false,
            avoid_tolls: false,
            avoid_ferries: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteOverlay {
    pub kind: RouteKind,
    pub color: &'static str,
    /// Position in the provider's route list (0 is the primary).
    pub index: usize,
    pub summary: String,
    pub distance_m: u64,
    pub duration_s: u64,
    pub step_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety_score: Option<u32>,
    pub route: Route,
}

impl RouteOverlay {
    fn new(kind: RouteKind, index: usize, route: &Route, safety_score: Option<u32>) -> Self {
        Self {
            kind,
            color: kind.color(),
            index,
            summary: route.summary.clone(),
            distance_m: route.distance_m(),
            duration_s: route.duration_s(),
            step_count: route.step_count(),
            safety_score,
            route: route.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePlan {
    pub primary: RouteOverlay,
    pub alternatives: Vec<RouteOverlay>,
}

/// Heuristic safety score: short trips and trips through major cities score higher.
pub fn safety_score(route: &Route, major_cities: &[String]) -> u32 {
    let mut score = 0;

    if route.distance_m() < SHORT_TRIP_METERS {
        score += SHORT_DISTANCE_POINTS;
    }
    if route.duration_s() < SHORT_TRIP_SECONDS {
        score += SHORT_DURATION_POINTS;
    }

    let through_city = route.steps().any(|step| {
        let text = step.instructions.to_lowercase();
        major_cities.iter().any(|city| text.contains(&city.to_lowercase()))
    });
    if through_city {
        score += MAJOR_CITY_POINTS;
    }

    score
}

/// Number of turn-by-turn steps.
pub fn complexity_score(route: &Route) -> usize {
    route.step_count()
}

/// Index of the highest scoring alternative; earliest wins ties.
fn pick_safest(alternatives: &[Route], major_cities: &[String]) -> Option<(usize, u32)> {
    let mut best: Option<(usize, u32)> = None;
    for (i, route) in alternatives.iter().enumerate() {
        let score = safety_score(route, major_cities);
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((i, score));
        }
    }
    best
}

/// Index of the alternative with the fewest steps; earliest wins ties.
fn pick_simplest(alternatives: &[Route]) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (i, route) in alternatives.iter().enumerate() {
        let steps = complexity_score(route);
        if best.map_or(true, |(_, fewest)| steps < fewest) {
            best = Some((i, steps));
        }
    }
    best.map(|(i, _)| i)
}

/// Split provider routes into the primary and the safety/simple overlays.
pub fn score_routes(
    routes: &[Route],
    preferences: &RoutePreferences,
    major_cities: &[String]
) -> Result<RoutePlan> {
    let (primary, alternatives) = routes
        .split_first()
        .ok_or_else(|| AppError::InvalidInput("At least one route is required".to_string()))?;

    let mut overlays = Vec::new();
    let mut safest_index = None;

    if preferences.prioritize_safety {
        if let Some((i, score)) = pick_safest(alternatives, major_cities) {
            safest_index = Some(i);
            overlays.push(RouteOverlay::new(RouteKind::Safety, i + 1, &alternatives[i], Some(score)));
        }
    }

    if let Some(i) = pick_simplest(alternatives) {
        if safest_index != Some(i) {
            overlays.push(RouteOverlay::new(RouteKind::Simple, i + 1, &alternatives[i], None));
        }
    }

    Ok(RoutePlan {
        primary: RouteOverlay::new(RouteKind::Primary, 0, primary, None),
        alternatives: overlays,
    })
}

pub struct RouteService {
    directions: Arc<dyn DirectionsProvider>,
    major_cities: Vec<String>,
}

impl RouteService {
    pub fn new(directions: Arc<dyn DirectionsProvider>, major_cities: Vec<String>) -> Self {
        Self {
            directions,
            major_cities,
        }
    }

    pub async fn plan(
        &self,
        origin: &str,
        destination: &str,
        preferences: &RoutePreferences
    ) -> Result<RoutePlan> {
        if origin.trim().is_empty() || destination.trim().is_empty() {
            return Err(AppError::InvalidInput("origin and destination are required".to_string()));
        }

        let request = DirectionsRequest {
            origin: origin.to_string(),
            destination: destination.to_string(),
            avoid_highways: preferences.avoid_highways,
            avoid_tolls: preferences.avoid_tolls,
            avoid_ferries: preferences.avoid_ferries,
        };

        let routes = self.directions.directions(&request).await?;
        if routes.is_empty() {
            return Err(
                AppError::NotFound(format!("No routes found from {} to {}", origin, destination))
            );
        }

        tracing::debug!("scoring {} route(s) from {} to {}", routes.len(), origin, destination);
        score_routes(&routes, preferences, &self.major_cities)
    }

    pub fn score(&self, routes: &[Route], preferences: &RoutePreferences) -> Result<RoutePlan> {
        score_routes(routes, preferences, &self.major_cities)
    }
}
