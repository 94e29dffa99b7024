use std::fmt;
use std::str::FromStr;

use serde::{ Deserialize, Serialize };

use crate::error::AppError;

// ─── RiskLevel ───────────────────────────────────────────────────────

/// Severity label shared by monitored destinations and risk alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Canonical string stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }

    /// Levels that raise a risk alert for the destination owner.
    pub fn is_elevated(&self) -> bool {
        matches!(self, RiskLevel::High | RiskLevel::Critical)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "LOW" => Ok(RiskLevel::Low),
            "MEDIUM" => Ok(RiskLevel::Medium),
            "HIGH" => Ok(RiskLevel::High),
            "CRITICAL" => Ok(RiskLevel::Critical),
            _ => Err(AppError::InvalidInput(format!(
                "Invalid risk level: {}. Supported: LOW, MEDIUM, HIGH, CRITICAL",
                s
            ))),
        }
    }
}

impl TryFrom<String> for RiskLevel {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse().map_err(rejection_message)
    }
}

// ─── AlertStatus ─────────────────────────────────────────────────────

/// Lifecycle label of a user-defined alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum AlertStatus {
    Active,
    Inactive,
    Resolved,
    Pending,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Active => "ACTIVE",
            AlertStatus::Inactive => "INACTIVE",
            AlertStatus::Resolved => "RESOLVED",
            AlertStatus::Pending => "PENDING",
        }
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ACTIVE" => Ok(AlertStatus::Active),
            "INACTIVE" => Ok(AlertStatus::Inactive),
            "RESOLVED" => Ok(AlertStatus::Resolved),
            "PENDING" => Ok(AlertStatus::Pending),
            _ => Err(AppError::InvalidInput(format!(
                "Invalid alert status: {}. Supported: ACTIVE, INACTIVE, RESOLVED, PENDING",
                s
            ))),
        }
    }
}

impl TryFrom<String> for AlertStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse().map_err(rejection_message)
    }
}

/// Bare message for serde, without the error-kind prefix.
fn rejection_message(err: AppError) -> String {
    match err {
        AppError::InvalidInput(msg) => msg,
        other => other.to_string(),
    }
}

// ─── Weather hazards ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardKind {
    Hail,
    HeavyRain,
    Flood,
    HighWinds,
}

impl HazardKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HazardKind::Hail => "hail",
            HazardKind::HeavyRain => "heavy_rain",
            HazardKind::Flood => "flood",
            HazardKind::HighWinds => "high_winds",
        }
    }

    /// Prefix of the hazard id shown to clients, e.g. `storm-Pretoria`.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            HazardKind::Hail => "storm",
            HazardKind::HeavyRain => "rain",
            HazardKind::Flood => "flood",
            HazardKind::HighWinds => "wind",
        }
    }
}

impl fmt::Display for HazardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardSeverity {
    Moderate,
    Severe,
    Extreme,
}

impl HazardSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            HazardSeverity::Moderate => "moderate",
            HazardSeverity::Severe => "severe",
            HazardSeverity::Extreme => "extreme",
        }
    }

    pub fn risk_level(&self) -> RiskLevel {
        match self {
            HazardSeverity::Moderate => RiskLevel::Medium,
            HazardSeverity::Severe => RiskLevel::High,
            HazardSeverity::Extreme => RiskLevel::Critical,
        }
    }
}

impl fmt::Display for HazardSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── RouteKind ───────────────────────────────────────────────────────

/// Role of a route overlay in a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteKind {
    Primary,
    Safety,
    Simple,
}

impl RouteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteKind::Primary => "primary",
            RouteKind::Safety => "safety",
            RouteKind::Simple => "simple",
        }
    }

    /// Overlay stroke colour.
    pub fn color(&self) -> &'static str {
        match self {
            RouteKind::Primary => "#4285F4",
            RouteKind::Safety => "#10B981",
            RouteKind::Simple => "#F59E0B",
        }
    }
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_parse_is_case_insensitive() {
        assert_eq!("high".parse::<RiskLevel>().unwrap(), RiskLevel::High);
        assert_eq!(" Critical ".parse::<RiskLevel>().unwrap(), RiskLevel::Critical);
        assert!("SEVERE".parse::<RiskLevel>().is_err());
    }

    #[test]
    fn test_risk_level_ordering() {
        assert!(RiskLevel::Critical > RiskLevel::High);
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::High.is_elevated());
        assert!(!RiskLevel::Medium.is_elevated());
    }

    #[test]
    fn test_alert_status_round_trip_through_str() {
        for status in [
            AlertStatus::Active,
            AlertStatus::Inactive,
            AlertStatus::Resolved,
            AlertStatus::Pending,
        ] {
            assert_eq!(status.as_str().parse::<AlertStatus>().unwrap(), status);
        }
        assert!("closed".parse::<AlertStatus>().is_err());
    }

    #[test]
    fn test_deserialize_goes_through_from_str() {
        let level: RiskLevel = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(level, RiskLevel::High);

        let status: AlertStatus = serde_json::from_str("\"resolved\"").unwrap();
        assert_eq!(status, AlertStatus::Resolved);

        let err = serde_json::from_str::<AlertStatus>("\"CLOSED\"").unwrap_err();
        assert!(err.to_string().starts_with("Invalid alert status: CLOSED"));

        assert_eq!(serde_json::to_string(&RiskLevel::Critical).unwrap(), "\"CRITICAL\"");
    }

    #[test]
    fn test_hazard_severity_maps_to_risk_level() {
        assert_eq!(HazardSeverity::Moderate.risk_level(), RiskLevel::Medium);
        assert_eq!(HazardSeverity::Severe.risk_level(), RiskLevel::High);
        assert_eq!(HazardSeverity::Extreme.risk_level(), RiskLevel::Critical);
    }
}
