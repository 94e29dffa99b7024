mod common;

use axum::http::StatusCode;
use common::{ build_app, build_app_with, calm_weather, gale, route, request_json, FAILING_LAT };
use sea_orm::{ DatabaseBackend, MockDatabase };
use serde_json::json;

fn app_with_routes(routes: Vec<travel_guard::providers::Route>) -> axum::Router {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    build_app_with(db, calm_weather(), routes)
}

#[tokio::test]
async fn plan_returns_primary_and_scored_alternatives() {
    let app = app_with_routes(
        vec![
            route("N1", 120_000, 8_000, &["Head north", "Merge onto N1", "Take exit"]),
            route("R21", 300_000, 12_000, &["Head east"]),
            route("M1", 60_000, 3_600, &["Head north", "Continue through Pretoria", "Turn left", "Arrive"])
        ]
    );

    let (status, body) = request_json(
        &app,
        "POST",
        "/api/routes/plan",
        Some(json!({ "origin": "Johannesburg", "destination": "Pretoria" }))
    ).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["primary"]["kind"], "primary");
    assert_eq!(body["primary"]["color"], "#4285F4");

    let alternatives = body["alternatives"].as_array().expect("alternatives should be a list");
    assert_eq!(alternatives.len(), 2);
    assert_eq!(alternatives[0]["kind"], "safety");
    assert_eq!(alternatives[0]["summary"], "M1");
    assert_eq!(alternatives[0]["safety_score"], 30);
    assert_eq!(alternatives[1]["kind"], "simple");
    assert_eq!(alternatives[1]["summary"], "R21");
}

#[tokio::test]
async fn plan_without_routes_is_404() {
    let app = app_with_routes(Vec::new());

    let (status, _) = request_json(
        &app,
        "POST",
        "/api/routes/plan",
        Some(json!({ "origin": "Johannesburg", "destination": "Maputo" }))
    ).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn plan_requires_both_endpoints() {
    let app = app_with_routes(vec![route("N1", 1_000, 60, &["Head north"])]);

    let (status, _) = request_json(
        &app,
        "POST",
        "/api/routes/plan",
        Some(json!({ "origin": "Johannesburg", "destination": "  " }))
    ).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn score_uses_client_routes_and_preferences() {
    let app = app_with_routes(Vec::new());

    let (status, body) = request_json(
        &app,
        "POST",
        "/api/routes/score",
        Some(
            json!({
                "routes": [
                    { "summary": "Primary", "legs": [{ "start_address": "A", "end_address": "B", "distance_m": 150000, "duration_s": 9000, "steps": [] }] },
                    { "summary": "Alt", "legs": [{ "start_address": "A", "end_address": "B", "distance_m": 50000, "duration_s": 3000,
                        "steps": [{ "instructions": "Continue", "distance_m": 50000, "duration_s": 3000 }] }] }
                ],
                "preferences": { "prioritize_safety": false }
            })
        )
    ).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["alternatives"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["alternatives"][0]["kind"], "simple");
    assert_eq!(body["alternatives"][0]["index"], 1);
}

#[tokio::test]
async fn score_rejects_an_empty_list() {
    let app = app_with_routes(Vec::new());

    let (status, _) = request_json(&app, "POST", "/api/routes/score", Some(json!({ "routes": [] }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn weather_reports_rounded_metric_values() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = build_app(db);

    let (status, body) = request_json(&app, "GET", "/api/weather?location=Johannesburg", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["location"], "Johannesburg");
    assert_eq!(body["temp"], 24);
    assert_eq!(body["wind_speed"], 14);
    assert_eq!(body["condition"], "Clear");
}

#[tokio::test]
async fn weather_for_unknown_place_is_404() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = build_app(db);

    let (status, body) = request_json(&app, "GET", "/api/weather?location=Atlantis", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Location not found: Atlantis");
}

#[tokio::test]
async fn weather_requires_a_location() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = build_app(db);

    let (status, body) = request_json(&app, "GET", "/api/weather", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "location");
}

#[tokio::test]
async fn hazards_skip_points_that_fail() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = build_app_with(db, gale(), Vec::new());

    let (status, body) = request_json(
        &app,
        "POST",
        "/api/weather/hazards",
        Some(
            json!({
                "points": [
                    { "lat": -33.92, "lng": 18.42, "location": "Cape Town" },
                    { "lat": FAILING_LAT, "lng": 0.0, "location": "Nowhere" }
                ]
            })
        )
    ).await;

    assert_eq!(status, StatusCode::OK);
    let hazards = body.as_array().expect("hazards should be a list");
    assert_eq!(hazards.len(), 1);
    assert_eq!(hazards[0]["id"], "wind-Cape Town");
    assert_eq!(hazards[0]["type"], "high_winds");
}

#[tokio::test]
async fn liveness_check_answers_ok() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = build_app(db);

    let (status, body) = request_json(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn auth_user_requires_a_bearer_token() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = build_app(db);

    let (status, body) = request_json(&app, "GET", "/api/auth/user", None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}
