pub mod audit_log;
pub mod monitored_destination;
pub mod user_alert;
pub mod reward;
pub mod risk_alert;

pub use audit_log::Entity as AuditLog;
pub use monitored_destination::Entity as MonitoredDestination;
pub use user_alert::Entity as UserAlert;
pub use reward::Entity as Reward;
pub use risk_alert::Entity as RiskAlert;
