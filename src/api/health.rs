use axum::{ extract::State, http::StatusCode };

use super::AppState;

pub async fn health_check() -> &'static str {
    "OK"
}

/// Round-trips the database pool.
pub async fn database_health(State(state): State<AppState>) -> (StatusCode, &'static str) {
    match state.db.ping().await {
        Ok(()) => (StatusCode::OK, "Database is healthy"),
        Err(e) => {
            tracing::error!("Database health check failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Database query failed")
        }
    }
}
