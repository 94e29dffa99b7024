use std::sync::Arc;

use axum::{ routing::{ delete, get, post }, Router };
use sea_orm::DatabaseConnection;
use tower_http::{ cors::CorsLayer, trace::TraceLayer };

pub mod extract;
pub mod params;
pub mod responses;
pub mod audit_log;
pub mod destination;
pub mod user_alert;
pub mod reward;
pub mod risk_alert;
pub mod route;
pub mod weather;
pub mod auth;
pub mod health;

use crate::providers::{ DirectionsProvider, WeatherProvider };
use crate::services::{
    AuditLogService,
    AuthService,
    DestinationService,
    RewardService,
    RiskAlertService,
    RiskAssessmentService,
    RouteService,
    UserAlertService,
    WeatherService,
};

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub audit_log_service: Arc<AuditLogService>,
    pub destination_service: Arc<DestinationService>,
    pub user_alert_service: Arc<UserAlertService>,
    pub reward_service: Arc<RewardService>,
    pub risk_alert_service: Arc<RiskAlertService>,
    pub weather_service: Arc<WeatherService>,
    pub route_service: Arc<RouteService>,
    pub auth_service: Arc<AuthService>,
    pub risk_assessment_service: Arc<RiskAssessmentService>,
    pub stale_after_days: i64,
}

impl AppState {
    pub fn new(
        db: Arc<DatabaseConnection>,
        weather_provider: Arc<dyn WeatherProvider>,
        directions_provider: Arc<dyn DirectionsProvider>,
        auth_service: AuthService,
        major_cities: Vec<String>,
        stale_after_days: i64
    ) -> Self {
        let destination_service = Arc::new(DestinationService::new(db.clone()));
        let weather_service = Arc::new(WeatherService::new(weather_provider));

        let risk_assessment_service = Arc::new(
            RiskAssessmentService::new(
                db.clone(),
                destination_service.clone(),
                weather_service.clone()
            )
        );

        Self {
            audit_log_service: Arc::new(AuditLogService::new(db.clone())),
            user_alert_service: Arc::new(UserAlertService::new(db.clone())),
            reward_service: Arc::new(RewardService::new(db.clone())),
            risk_alert_service: Arc::new(RiskAlertService::new(db.clone())),
            route_service: Arc::new(RouteService::new(directions_provider, major_cities)),
            auth_service: Arc::new(auth_service),
            destination_service,
            weather_service,
            risk_assessment_service,
            stale_after_days,
            db,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/healthcheck", get(health::database_health))
        .route(
            "/api/audit-logs",
            get(audit_log::get_audit_logs)
                .post(audit_log::create_audit_log)
                .put(audit_log::update_audit_log)
                .delete(audit_log::delete_audit_logs)
        )
        .route("/api/audit-logs/bulk", post(audit_log::bulk_create_audit_logs))
        .route("/api/audit-logs/count", get(audit_log::count_audit_logs))
        .route(
            "/api/monitored-destinations",
            get(destination::get_destinations)
                .post(destination::create_destination)
                .put(destination::update_destination)
                .delete(destination::delete_destinations)
        )
        .route(
            "/api/monitored-destinations/stale",
            get(destination::get_stale_destinations).delete(destination::delete_stale_destinations)
        )
        .route("/api/monitored-destinations/high-risk", get(destination::get_high_risk_destinations))
        .route("/api/monitored-destinations/count", get(destination::count_destinations))
        .route("/api/monitored-destinations/stats", get(destination::get_risk_level_statistics))
        .route("/api/monitored-destinations/{id}/check", post(destination::check_destination))
        .route(
            "/api/user-alerts",
            get(user_alert::get_user_alerts)
                .post(user_alert::create_user_alert)
                .put(user_alert::update_user_alert)
                .delete(user_alert::delete_user_alerts)
        )
        .route("/api/user-alerts/count", get(user_alert::count_user_alerts))
        .route("/api/user-alerts/summary", get(user_alert::get_alert_status_summary))
        .route("/api/user-alerts/resolve", post(user_alert::resolve_user_alerts))
        .route("/api/user-alerts/resolved", delete(user_alert::delete_resolved_user_alerts))
        .route(
            "/api/rewards",
            get(reward::get_rewards)
                .post(reward::create_reward)
                .put(reward::update_reward)
                .delete(reward::delete_reward)
        )
        .route("/api/rewards/summary", get(reward::get_reward_summary))
        .route(
            "/api/risk-alerts",
            get(risk_alert::get_risk_alerts)
                .post(risk_alert::create_risk_alert)
                .put(risk_alert::update_risk_alert)
                .delete(risk_alert::delete_risk_alert)
        )
        .route("/api/routes/plan", post(route::plan_route))
        .route("/api/routes/score", post(route::score_routes))
        .route("/api/weather", get(weather::get_weather))
        .route("/api/weather/hazards", post(weather::get_route_hazards))
        .route("/api/auth/sign-up", post(auth::sign_up))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/recover", post(auth::recover))
        .route("/api/auth/user", get(auth::get_user).put(auth::update_user))
        .route("/api/auth/logout", post(auth::logout))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
