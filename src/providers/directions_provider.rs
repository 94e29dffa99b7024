use async_trait::async_trait;
use serde::{ Deserialize, Serialize };

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    /// Turn-by-turn instruction text, markup stripped.
    pub instructions: String,
    pub distance_m: u64,
    pub duration_s: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    pub start_address: String,
    pub end_address: String,
    pub distance_m: u64,
    pub duration_s: u64,
    #[serde(default)]
    pub steps: Vec<RouteStep>,
}

/// One candidate path between origin and destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    #[serde(default)]
    pub summary: String,
    pub legs: Vec<RouteLeg>,
    /// Encoded overview polyline for the client-side overlay.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polyline: Option<String>,
}

impl Route {
    pub fn distance_m(&self) -> u64 {
        self.legs
            .iter()
            .map(|l| l.distance_m)
            .sum()
    }

    pub fn duration_s(&self) -> u64 {
        self.legs
            .iter()
            .map(|l| l.duration_s)
            .sum()
    }

    pub fn steps(&self) -> impl Iterator<Item = &RouteStep> {
        self.legs.iter().flat_map(|l| l.steps.iter())
    }

    pub fn step_count(&self) -> usize {
        self.legs
            .iter()
            .map(|l| l.steps.len())
            .sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectionsRequest {
    pub origin: String,
    pub destination: String,
    #[serde(default)]
    pub avoid_highways: bool,
    #[serde(default)]
    pub avoid_tolls: bool,
    #[serde(default)]
    pub avoid_ferries: bool,
}

#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    /// Driving routes with alternatives. The first route is the provider's
    /// recommended one.
    async fn directions(&self, request: &DirectionsRequest) -> Result<Vec<Route>>;
}
