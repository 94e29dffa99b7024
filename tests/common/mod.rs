#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{ to_bytes, Body };
use axum::http::{ Request, StatusCode };
use chrono::{ DateTime, TimeZone, Utc };
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tower::util::ServiceExt;
use travel_guard::api::{ self, AppState };
use travel_guard::providers::{
    Coordinates,
    CurrentConditions,
    DirectionsProvider,
    DirectionsRequest,
    Route,
    RouteLeg,
    RouteStep,
    WeatherProvider,
};
use travel_guard::services::AuthService;
use travel_guard::{ AppError, Result };

/// Latitude that makes the fake weather lookup fail.
pub const FAILING_LAT: f64 = 99.0;

pub struct FakeWeather {
    pub conditions: CurrentConditions,
}

#[async_trait]
impl WeatherProvider for FakeWeather {
    async fn geocode(&self, location: &str) -> Result<Option<Coordinates>> {
        if location.eq_ignore_ascii_case("Atlantis") {
            return Ok(None);
        }
        Ok(Some(Coordinates { lat: -26.2, lng: 28.05 }))
    }

    async fn current(&self, coords: Coordinates) -> Result<CurrentConditions> {
        if coords.lat == FAILING_LAT {
            return Err(AppError::External("weather lookup failed".to_string()));
        }
        Ok(self.conditions.clone())
    }
}

pub struct FakeDirections {
    pub routes: Vec<Route>,
}

#[async_trait]
impl DirectionsProvider for FakeDirections {
    async fn directions(&self, _request: &DirectionsRequest) -> Result<Vec<Route>> {
        Ok(self.routes.clone())
    }
}

pub fn calm_weather() -> CurrentConditions {
    CurrentConditions {
        condition: "Clear".to_string(),
        description: "clear sky".to_string(),
        temp_c: 24.4,
        humidity: 40,
        wind_speed: 4.0,
        rain_1h: None,
    }
}

pub fn gale() -> CurrentConditions {
    CurrentConditions {
        condition: "Clear".to_string(),
        description: "clear sky".to_string(),
        temp_c: 18.0,
        humidity: 55,
        wind_speed: 27.0,
        rain_1h: None,
    }
}

pub fn route(summary: &str, distance_m: u64, duration_s: u64, steps: &[&str]) -> Route {
    Route {
        summary: summary.to_string(),
        polyline: None,
        legs: vec![RouteLeg {
            start_address: "Johannesburg, South Africa".to_string(),
            end_address: "Pretoria, South Africa".to_string(),
            distance_m,
            duration_s,
            steps: steps
                .iter()
                .map(|s| RouteStep {
                    instructions: s.to_string(),
                    distance_m: 1_000,
                    duration_s: 60,
                })
                .collect(),
        }],
    }
}

pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap()
}

pub fn cities() -> Vec<String> {
    vec!["Johannesburg".to_string(), "Pretoria".to_string(), "Cape Town".to_string()]
}

pub fn build_state(
    db: DatabaseConnection,
    conditions: CurrentConditions,
    routes: Vec<Route>,
    auth_url: &str
) -> AppState {
    let auth = AuthService::new(auth_url, "test-anon-key").expect("auth client should build");

    AppState::new(
        Arc::new(db),
        Arc::new(FakeWeather { conditions }),
        Arc::new(FakeDirections { routes }),
        auth,
        cities(),
        7
    )
}

pub fn build_app_with(db: DatabaseConnection, conditions: CurrentConditions, routes: Vec<Route>) -> axum::Router {
    api::router(build_state(db, conditions, routes, "http://127.0.0.1:9"))
}

/// Router whose auth client talks to `auth_url`.
pub fn build_app_with_auth(db: DatabaseConnection, auth_url: &str) -> axum::Router {
    api::router(build_state(db, calm_weather(), Vec::new(), auth_url))
}

pub fn build_app(db: DatabaseConnection) -> axum::Router {
    build_app_with(db, calm_weather(), Vec::new())
}

pub async fn request_json(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    let req_body = match body {
        Some(body) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };

    send(app, builder.body(req_body).expect("request should build")).await
}

pub async fn send(app: &axum::Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.expect("request should be handled");

    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.expect("body should read");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json
            ::from_slice::<Value>(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()))
    };

    (status, json)
}

/// Serve `app` on an ephemeral local port and return its base URL.
pub async fn serve_locally(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("port should bind");
    let addr = listener.local_addr().expect("listener should have an address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake server should run");
    });

    format!("http://{}", addr)
}
