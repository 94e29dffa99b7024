use std::sync::Arc;

use serde::{ Deserialize, Serialize };

use crate::enums::{ HazardKind, HazardSeverity, RiskLevel };
use crate::error::{ AppError, Result };
use crate::providers::{ Coordinates, CurrentConditions, WeatherProvider };

const HEAVY_RAIN_MM: f64 = 10.0;
const SEVERE_RAIN_MM: f64 = 20.0;
const FLOOD_RAIN_MM: f64 = 15.0;
const HIGH_WIND_MS: f64 = 15.0;
const EXTREME_WIND_MS: f64 = 25.0;

/// Current conditions as shown on the weather panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub location: String,
    pub temp: i64,
    pub condition: String,
    pub humidity: u8,
    /// km/h
    pub wind_speed: i64,
}

impl WeatherReport {
    pub fn new(location: &str, conditions: &CurrentConditions) -> Self {
        Self {
            location: location.to_string(),
            temp: conditions.temp_c.round() as i64,
            condition: conditions.condition.clone(),
            humidity: conditions.humidity,
            wind_speed: ms_to_kmh(conditions.wind_speed),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherHazard {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: HazardKind,
    pub severity: HazardSeverity,
    pub location: String,
    pub message: String,
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RoutePoint {
    pub lat: f64,
    pub lng: f64,
    pub location: String,
}

/// Hazards and derived risk level for one place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationAssessment {
    pub location: String,
    pub risk_level: RiskLevel,
    pub report: WeatherReport,
    pub hazards: Vec<WeatherHazard>,
}

fn ms_to_kmh(speed: f64) -> i64 {
    (speed * 3.6).round() as i64
}

fn hazard(
    kind: HazardKind,
    severity: HazardSeverity,
    location: &str,
    message: String,
    action: &str
) -> WeatherHazard {
    WeatherHazard {
        id: format!("{}-{}", kind.id_prefix(), location),
        kind,
        severity,
        location: location.to_string(),
        message,
        action: action.to_string(),
    }
}

/// Apply the travel hazard rules to a set of current conditions.
pub fn analyze_hazards(conditions: &CurrentConditions, location: &str) -> Vec<WeatherHazard> {
    let mut hazards = Vec::new();
    let raining = conditions.condition == "Rain";
    let rain = conditions.rain_1h.unwrap_or(0.0);

    if raining && rain > HEAVY_RAIN_MM {
        let severity = if rain > SEVERE_RAIN_MM {
            HazardSeverity::Severe
        } else {
            HazardSeverity::Moderate
        };
        hazards.push(
            hazard(
                HazardKind::HeavyRain,
                severity,
                location,
                format!("Heavy rainfall detected ({}mm/h)", rain),
                "Consider delaying travel or taking alternative route"
            )
        );
    }

    if
        conditions.condition == "Thunderstorm" ||
        conditions.description.to_lowercase().contains("hail")
    {
        hazards.push(
            hazard(
                HazardKind::Hail,
                HazardSeverity::Severe,
                location,
                "Thunderstorm conditions - potential hail risk".to_string(),
                "Seek shelter immediately. Avoid travel if possible."
            )
        );
    }

    if conditions.wind_speed > HIGH_WIND_MS {
        let severity = if conditions.wind_speed > EXTREME_WIND_MS {
            HazardSeverity::Extreme
        } else {
            HazardSeverity::Severe
        };
        hazards.push(
            hazard(
                HazardKind::HighWinds,
                severity,
                location,
                format!("High winds detected ({} km/h)", ms_to_kmh(conditions.wind_speed)),
                "Exercise extreme caution. Avoid high-profile vehicles."
            )
        );
    }

    if raining && rain > FLOOD_RAIN_MM {
        hazards.push(
            hazard(
                HazardKind::Flood,
                HazardSeverity::Moderate,
                location,
                "Potential flooding risk due to heavy rainfall".to_string(),
                "Avoid low-lying areas and underpasses"
            )
        );
    }

    hazards
}

/// Worst hazard decides; no hazards is LOW.
pub fn risk_level_for(hazards: &[WeatherHazard]) -> RiskLevel {
    hazards
        .iter()
        .map(|h| h.severity.risk_level())
        .max()
        .unwrap_or(RiskLevel::Low)
}

pub struct WeatherService {
    provider: Arc<dyn WeatherProvider>,
}

impl WeatherService {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    async fn locate(&self, location: &str) -> Result<Coordinates> {
        if location.trim().is_empty() {
            return Err(AppError::missing("location"));
        }

        self.provider
            .geocode(location).await?
            .ok_or_else(|| AppError::NotFound(format!("Location not found: {}", location)))
    }

    pub async fn current_for_location(&self, location: &str) -> Result<WeatherReport> {
        let coords = self.locate(location).await?;
        let conditions = self.provider.current(coords).await?;
        Ok(WeatherReport::new(location, &conditions))
    }

    /// Hazards along a route. Points whose lookup fails are skipped.
    pub async fn hazards_for_points(&self, points: &[RoutePoint]) -> Vec<WeatherHazard> {
        let mut hazards = Vec::new();

        for point in points {
            let coords = Coordinates { lat: point.lat, lng: point.lng };
            match self.provider.current(coords).await {
                Ok(conditions) => hazards.extend(analyze_hazards(&conditions, &point.location)),
                Err(e) => {
                    tracing::warn!("Weather hazard check failed for {}: {}", point.location, e);
                }
            }
        }

        tracing::debug!("{} weather hazard(s) across {} point(s)", hazards.len(), points.len());
        hazards
    }

    pub async fn assess_location(&self, location: &str) -> Result<LocationAssessment> {
        let coords = self.locate(location).await?;
        let conditions = self.provider.current(coords).await?;
        let hazards = analyze_hazards(&conditions, location);

        Ok(LocationAssessment {
            location: location.to_string(),
            risk_level: risk_level_for(&hazards),
            report: WeatherReport::new(location, &conditions),
            hazards,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conditions(condition: &str, description: &str, wind: f64, rain: Option<f64>) -> CurrentConditions {
        CurrentConditions {
            condition: condition.to_string(),
            description: description.to_string(),
            temp_c: 21.6,
            humidity: 70,
            wind_speed: wind,
            rain_1h: rain,
        }
    }

    #[test]
    fn test_clear_weather_has_no_hazards() {
        let hazards = analyze_hazards(&conditions("Clear", "clear sky", 3.0, None), "Durban");
        assert!(hazards.is_empty());
        assert_eq!(risk_level_for(&hazards), RiskLevel::Low);
    }

    #[test]
    fn test_moderate_rain() {
        let hazards = analyze_hazards(&conditions("Rain", "moderate rain", 2.0, Some(12.0)), "Pretoria");
        assert_eq!(hazards.len(), 1);
        assert_eq!(hazards[0].kind, HazardKind::HeavyRain);
        assert_eq!(hazards[0].severity, HazardSeverity::Moderate);
        assert_eq!(hazards[0].id, "rain-Pretoria");
        assert_eq!(risk_level_for(&hazards), RiskLevel::Medium);
    }

    #[test]
    fn test_torrential_rain_also_flags_flooding() {
        let hazards = analyze_hazards(&conditions("Rain", "heavy intensity rain", 2.0, Some(25.0)), "Durban");
        let kinds: Vec<HazardKind> = hazards
            .iter()
            .map(|h| h.kind)
            .collect();
        assert_eq!(kinds, vec![HazardKind::HeavyRain, HazardKind::Flood]);
        assert_eq!(hazards[0].severity, HazardSeverity::Severe);
        assert_eq!(risk_level_for(&hazards), RiskLevel::High);
    }

    #[test]
    fn test_rain_amount_without_rain_group_is_ignored() {
        let hazards = analyze_hazards(&conditions("Drizzle", "light drizzle", 1.0, Some(30.0)), "George");
        assert!(hazards.is_empty());
    }

    #[test]
    fn test_hail_in_description() {
        let hazards = analyze_hazards(&conditions("Snow", "Light Hail", 1.0, None), "Bethlehem");
        assert_eq!(hazards.len(), 1);
        assert_eq!(hazards[0].kind, HazardKind::Hail);
        assert_eq!(hazards[0].id, "storm-Bethlehem");
    }

    #[test]
    fn test_extreme_wind() {
        let hazards = analyze_hazards(&conditions("Clear", "clear sky", 26.0, None), "Cape Town");
        assert_eq!(hazards.len(), 1);
        assert_eq!(hazards[0].kind, HazardKind::HighWinds);
        assert_eq!(hazards[0].severity, HazardSeverity::Extreme);
        assert_eq!(hazards[0].message, "High winds detected (94 km/h)");
        assert_eq!(risk_level_for(&hazards), RiskLevel::Critical);
    }

    #[test]
    fn test_wind_at_threshold_is_not_a_hazard() {
        let hazards = analyze_hazards(&conditions("Clouds", "overcast", 15.0, None), "Kimberley");
        assert!(hazards.is_empty());
    }

    #[test]
    fn test_report_rounds_units() {
        let report = WeatherReport::new("Johannesburg", &conditions("Clouds", "few clouds", 5.0, None));
        assert_eq!(report.temp, 22);
        assert_eq!(report.wind_speed, 18);
        assert_eq!(report.condition, "Clouds");
    }
}
