use async_trait::async_trait;
use serde::{ Deserialize, Serialize };

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Current conditions at a point, reduced to the fields the hazard rules read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Weather group, e.g. "Rain", "Thunderstorm", "Clear".
    pub condition: String,
    pub description: String,
    pub temp_c: f64,
    pub humidity: u8,
    /// Wind speed in m/s.
    pub wind_speed: f64,
    /// Rainfall over the last hour in mm, when reported.
    pub rain_1h: Option<f64>,
}

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Resolve a free-text place name. `None` when nothing matches.
    async fn geocode(&self, location: &str) -> Result<Option<Coordinates>>;

    /// Current conditions in metric units.
    async fn current(&self, coords: Coordinates) -> Result<CurrentConditions>;
}
