use std::sync::Arc;

use chrono::{ NaiveDate, Utc };
use sea_orm::{ DatabaseConnection, TransactionTrait };
use serde::Serialize;

use crate::db::entity::{ monitored_destination, risk_alert };
use crate::enums::RiskLevel;
use crate::error::{ AppError, Result };
use crate::services::{ DestinationService, RiskAlertService, WeatherService, WeatherHazard };

const WEATHER_ALERT_TYPE: &str = "weather";

#[derive(Debug, Clone, Serialize)]
pub struct DestinationAssessment {
    pub destination: monitored_destination::Model,
    pub risk_level: RiskLevel,
    pub hazards: Vec<WeatherHazard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<risk_alert::Model>,
}

/// Summary of one sweep over stale destinations.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepReport {
    pub checked: usize,
    pub failed: usize,
    pub alerts_raised: usize,
}

/// Alert text for an elevated destination.
pub fn alert_message(location: &str, level: RiskLevel, hazards: &[WeatherHazard]) -> String {
    let mut message = format!("{} risk at {}", level, location);
    if !hazards.is_empty() {
        let details: Vec<&str> = hazards
            .iter()
            .map(|h| h.message.as_str())
            .collect();
        message.push_str(": ");
        message.push_str(&details.join("; "));
    }
    message
}

/// Re-scores monitored destinations against current weather.
pub struct RiskAssessmentService {
    db: Arc<DatabaseConnection>,
    destinations: Arc<DestinationService>,
    weather: Arc<WeatherService>,
}

impl RiskAssessmentService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        destinations: Arc<DestinationService>,
        weather: Arc<WeatherService>
    ) -> Self {
        Self {
            db,
            destinations,
            weather,
        }
    }

    pub async fn assess_destination(&self, id: i32) -> Result<DestinationAssessment> {
        let destination = self.destinations.get(id).await?;
        self.assess(destination, Utc::now().date_naive()).await
    }

    async fn assess(
        &self,
        destination: monitored_destination::Model,
        today: NaiveDate
    ) -> Result<DestinationAssessment> {
        let location = destination.location
            .clone()
            .filter(|l| !l.trim().is_empty())
            .ok_or_else(|| {
                AppError::InvalidInput(
                    format!("Monitored destination {} has no location", destination.id)
                )
            })?;

        let assessment = self.weather.assess_location(&location).await?;
        let level = assessment.risk_level;
        let user_id = destination.user_id.clone();

        // The new level and its alert commit together, or the destination stays stale.
        let txn = self.db.begin().await?;
        let destination = DestinationService::record_assessment(&txn, destination, level, today).await?;

        let alert = match user_id {
            Some(user_id) if level.is_elevated() => {
                let message = alert_message(&location, level, &assessment.hazards);
                Some(
                    RiskAlertService::raise_on(&txn, &user_id, WEATHER_ALERT_TYPE, &message, level).await?
                )
            }
            _ => None,
        };

        txn.commit().await?;
        tracing::debug!("destination {} ({}) assessed as {}", destination.id, location, level);

        Ok(DestinationAssessment {
            destination,
            risk_level: level,
            hazards: assessment.hazards,
            alert,
        })
    }

    /// Assess every destination not checked within `days`. Failures are logged and skipped.
    pub async fn assess_stale(&self, days: i64) -> Result<SweepReport> {
        let today = Utc::now().date_naive();
        let stale = self.destinations.stale(today, days).await?;
        let mut report = SweepReport::default();

        for destination in stale {
            let id = destination.id;
            match self.assess(destination, today).await {
                Ok(assessment) => {
                    report.checked += 1;
                    if assessment.alert.is_some() {
                        report.alerts_raised += 1;
                    }
                }
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!("Risk assessment failed for destination {}: {}", id, e);
                }
            }
        }

        Ok(report)
    }
}
