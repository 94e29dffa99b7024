use std::env;

use anyhow::{ anyhow, Context };

use crate::services::MAX_WINDOW_DAYS;

const DEFAULT_MAJOR_CITIES: &str = "Johannesburg,Pretoria,Cape Town";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub openweather_api_key: String,
    pub google_maps_api_key: String,
    pub server_host: String,
    pub server_port: u16,
    pub route_region: String,
    pub major_cities: Vec<String>,
    pub stale_after_days: i64,
    pub risk_monitor_interval_secs: u64,
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let database_url = required("DATABASE_URL")?;
        let supabase_url = required("SUPABASE_URL")?.trim_end_matches('/').to_string();
        let supabase_anon_key = required("SUPABASE_ANON_KEY")?;
        let openweather_api_key = required("OPENWEATHER_API_KEY")?;
        let google_maps_api_key = required("GOOGLE_MAPS_API_KEY")?;

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = parsed("SERVER_PORT", 8080)?;
        let route_region = env::var("ROUTE_REGION").unwrap_or_else(|_| "ZA".to_string());

        let major_cities = Self::parse_list(
            &env::var("MAJOR_CITIES").unwrap_or_else(|_| DEFAULT_MAJOR_CITIES.to_string())
        );

        let stale_after_days = parsed("STALE_AFTER_DAYS", 7)?;
        if !(0..=MAX_WINDOW_DAYS).contains(&stale_after_days) {
            return Err(anyhow!("STALE_AFTER_DAYS must be between 0 and {}", MAX_WINDOW_DAYS));
        }

        let risk_monitor_interval_secs = parsed("RISK_MONITOR_INTERVAL_SECS", 3600)?;
        let run_migrations = parsed("RUN_MIGRATIONS", true)?;

        Ok(Config {
            database_url,
            supabase_url,
            supabase_anon_key,
            openweather_api_key,
            google_maps_api_key,
            server_host,
            server_port,
            route_region,
            major_cities,
            stale_after_days,
            risk_monitor_interval_secs,
            run_migrations,
        })
    }

    /// Split a comma-separated list, dropping blanks.
    pub fn parse_list(value: &str) -> Vec<String> {
        value
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn risk_monitor_enabled(&self) -> bool {
        self.risk_monitor_interval_secs > 0
    }
}

fn required(key: &str) -> anyhow::Result<String> {
    env::var(key).with_context(|| format!("{} must be set", key))
}

fn parsed<T>(key: &str, default: T) -> anyhow::Result<T>
    where T: std::str::FromStr, T::Err: std::error::Error + Send + Sync + 'static
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().with_context(|| format!("{} has an invalid value: {}", key, raw)),
        Err(_) => Ok(default),
    }
}
