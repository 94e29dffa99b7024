pub mod config;
pub mod enums;
pub mod error;
pub mod db;
pub mod providers;
pub mod services;
pub mod api;
pub mod risk_monitor;

pub use config::Config;
pub use enums::{ AlertStatus, HazardKind, HazardSeverity, RiskLevel, RouteKind };
pub use error::{ AppError, Result };
