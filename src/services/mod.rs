pub mod audit_log_service;
pub mod destination_service;
pub mod user_alert_service;
pub mod reward_service;
pub mod risk_alert_service;
pub mod weather_service;
pub mod route_service;
pub mod auth_service;
pub mod risk_assessment_service;

pub use audit_log_service::AuditLogService;
pub use destination_service::DestinationService;
pub use user_alert_service::UserAlertService;
pub use reward_service::RewardService;
pub use risk_alert_service::RiskAlertService;
pub use weather_service::{ WeatherService, WeatherHazard, WeatherReport, RoutePoint };
pub use route_service::{ RouteService, RoutePreferences, RoutePlan };
pub use auth_service::AuthService;
pub use risk_assessment_service::RiskAssessmentService;

use std::collections::BTreeMap;

use chrono::TimeDelta;

use crate::error::{ AppError, Result };

/// Largest look-back window, in days, accepted from callers and configuration.
pub const MAX_WINDOW_DAYS: i64 = 36_500;

/// A look-back window of `days`, rejected outside `0..=MAX_WINDOW_DAYS`.
pub fn window_days(days: i64) -> Result<TimeDelta> {
    if !(0..=MAX_WINDOW_DAYS).contains(&days) {
        return Err(
            AppError::InvalidInput(format!("days must be between 0 and {}", MAX_WINDOW_DAYS))
        );
    }

    TimeDelta::try_days(days).ok_or_else(|| {
        AppError::InvalidInput(format!("days is out of range: {}", days))
    })
}

/// Occurrences of each label. Missing labels count as `UNKNOWN`.
pub(crate) fn tally<'a>(labels: impl IntoIterator<Item = Option<&'a str>>) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    for label in labels {
        *counts.entry(label.unwrap_or("UNKNOWN").to_string()).or_insert(0) += 1;
    }
    counts
}
