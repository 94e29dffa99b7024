use std::sync::Arc;

use migration::MigratorTrait;
use tracing_subscriber::{ layer::SubscriberExt, util::SubscriberInitExt };
use travel_guard::{
    api::{ self, AppState },
    providers::{ GoogleDirectionsClient, OpenWeatherClient },
    risk_monitor::RiskMonitor,
    services::AuthService,
    AppError,
    Config,
    Result,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber
        ::registry()
        .with(
            tracing_subscriber::EnvFilter
                ::try_from_default_env()
                .unwrap_or_else(|_| "travel_guard=debug,tower_http=debug".into())
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| AppError::Config(e.to_string()))?;

    tracing::info!("Starting travel-guard (route region {})", config.route_region);

    let db = travel_guard::db::connect(&config.database_url).await?;
    tracing::info!("Database connected successfully");

    if config.run_migrations {
        migration::Migrator::up(&db, None).await?;
        tracing::info!("Migrations completed successfully");
    }

    let weather_provider = Arc::new(OpenWeatherClient::new(config.openweather_api_key.clone())?);
    let directions_provider = Arc::new(
        GoogleDirectionsClient::new(config.google_maps_api_key.clone(), config.route_region.clone())?
    );
    let auth_service = AuthService::new(&config.supabase_url, &config.supabase_anon_key)?;

    let state = AppState::new(
        Arc::new(db),
        weather_provider,
        directions_provider,
        auth_service,
        config.major_cities.clone(),
        config.stale_after_days
    );

    if config.risk_monitor_enabled() {
        let monitor = RiskMonitor::new(
            state.risk_assessment_service.clone(),
            config.risk_monitor_interval_secs,
            config.stale_after_days
        );
        tokio::spawn(monitor.start());
    } else {
        tracing::info!("Risk monitor disabled");
    }

    let app = api::router(state);

    let addr = config.bind_addr();
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener
        ::bind(&addr).await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    axum::serve(listener, app).await.map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(())
}
