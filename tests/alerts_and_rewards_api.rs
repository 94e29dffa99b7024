mod common;

use std::collections::BTreeMap;

use axum::http::StatusCode;
use common::{ build_app, fixed_time, request_json };
use sea_orm::{ DatabaseBackend, MockDatabase, MockExecResult };
use serde_json::json;
use travel_guard::db::entity::{ reward, user_alert };
use uuid::Uuid;

fn sample_alert(id: i32, name: &str) -> user_alert::Model {
    user_alert::Model {
        id,
        user_id: Some("user-1".to_string()),
        timestamp: fixed_time(),
        alert_name: name.to_string(),
        alert_description: "Flooding reported on the N3".to_string(),
        alert_status: "ACTIVE".to_string(),
    }
}

fn sample_reward(value: i32, avoided: i32, estimate: f64) -> reward::Model {
    reward::Model {
        reward_id: Uuid::new_v4(),
        user_id: "user-1".to_string(),
        route_id: "route-1".to_string(),
        reward_value: value,
        avoided_risks: avoided,
        claim_prevention_estimate: estimate,
        created_at: fixed_time(),
    }
}

#[tokio::test]
async fn user_alert_requires_name_description_and_status() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = build_app(db);

    let (status, body) = request_json(
        &app,
        "POST",
        "/api/user-alerts",
        Some(json!({ "user_id": "user-1", "alert_name": "N3 flooding", "alert_status": "ACTIVE" }))
    ).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"]["message"],
        "alert_name, alert_description, and alert_status are required"
    );
}

#[tokio::test]
async fn user_alert_create_returns_201() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![sample_alert(1, "N3 flooding")]])
        .into_connection();
    let app = build_app(db);

    let (status, body) = request_json(
        &app,
        "POST",
        "/api/user-alerts",
        Some(
            json!({
                "user_id": "user-1",
                "alert_name": "N3 flooding",
                "alert_description": "Flooding reported on the N3",
                "alert_status": "ACTIVE"
            })
        )
    ).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["alert_status"], "ACTIVE");
}

#[tokio::test]
async fn user_alert_search_returns_matches() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![sample_alert(1, "N3 flooding")]])
        .into_connection();
    let app = build_app(db);

    let (status, body) = request_json(&app, "GET", "/api/user-alerts?search=flood", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["alert_name"], "N3 flooding");
}

#[tokio::test]
async fn user_alert_missing_is_404() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<user_alert::Model>::new()])
        .into_connection();
    let app = build_app(db);

    let (status, body) = request_json(&app, "GET", "/api/user-alerts?id=3", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "User alert not found");
}

#[tokio::test]
async fn user_alert_unknown_status_is_a_json_400() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = build_app(db);

    let (status, body) = request_json(
        &app,
        "POST",
        "/api/user-alerts",
        Some(
            json!({
                "user_id": "user-1",
                "alert_name": "N3 flooding",
                "alert_description": "Flooding reported on the N3",
                "alert_status": "CLOSED"
            })
        )
    ).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
    assert!(
        body["error"]["message"].as_str().unwrap_or_default().contains("Invalid alert status: CLOSED")
    );
}

#[tokio::test]
async fn user_alert_count_filters_by_status() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([
            vec![BTreeMap::from([("num_items", sea_orm::Value::BigInt(Some(2)))])],
        ])
        .into_connection();
    let app = build_app(db);

    let (status, body) = request_json(
        &app,
        "GET",
        "/api/user-alerts/count?user_id=user-1&alert_status=active",
        None
    ).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
}

#[tokio::test]
async fn user_alert_summary_groups_by_status() {
    let resolved = user_alert::Model {
        alert_status: "RESOLVED".to_string(),
        ..sample_alert(3, "Hail")
    };
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([
            vec![sample_alert(1, "N3 flooding"), sample_alert(2, "Fog"), resolved],
        ])
        .into_connection();
    let app = build_app(db);

    let (status, body) = request_json(&app, "GET", "/api/user-alerts/summary?user_id=user-1", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ACTIVE": 2, "RESOLVED": 1 }));
}

#[tokio::test]
async fn user_alert_summary_requires_a_user() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = build_app(db);

    let (status, body) = request_json(&app, "GET", "/api/user-alerts/summary", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "user_id");
}

#[tokio::test]
async fn user_alert_resolve_returns_the_updated_rows() {
    let resolved = |id| user_alert::Model {
        alert_status: "RESOLVED".to_string(),
        ..sample_alert(id, "N3 flooding")
    };
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![resolved(1), resolved(2)]])
        .into_connection();
    let app = build_app(db);

    let (status, body) = request_json(
        &app,
        "POST",
        "/api/user-alerts/resolve",
        Some(json!({ "ids": [1, 2] }))
    ).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(2));
    assert_eq!(body[1]["alert_status"], "RESOLVED");
}

#[tokio::test]
async fn user_alert_resolve_needs_a_selector() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = build_app(db);

    let (status, body) = request_json(
        &app,
        "POST",
        "/api/user-alerts/resolve",
        Some(json!({ "ids": [] }))
    ).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "id, ids, or user_id is required");
}

#[tokio::test]
async fn user_alert_purge_removes_old_resolved_alerts() {
    let resolved = user_alert::Model {
        alert_status: "RESOLVED".to_string(),
        ..sample_alert(7, "Hail")
    };
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![resolved]])
        .append_exec_results([MockExecResult { last_insert_id: 0, rows_affected: 1 }])
        .into_connection();
    let app = build_app(db);

    let (status, body) = request_json(
        &app,
        "DELETE",
        "/api/user-alerts/resolved?days=30&user_id=user-1",
        None
    ).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted_records"][0]["id"], 7);
}

#[tokio::test]
async fn user_alert_purge_rejects_negative_retention() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = build_app(db);

    let (status, _) = request_json(&app, "DELETE", "/api/user-alerts/resolved?days=-5", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn reward_create_requires_a_user() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = build_app(db);

    let (status, body) = request_json(
        &app,
        "POST",
        "/api/rewards",
        Some(json!({ "route_id": "route-1", "reward_value": 50 }))
    ).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "User ID is required");
}

#[tokio::test]
async fn reward_create_accepts_the_camel_case_user_key() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![sample_reward(50, 2, 1200.0)]])
        .into_connection();
    let app = build_app(db);

    let (status, body) = request_json(
        &app,
        "POST",
        "/api/rewards",
        Some(
            json!({
                "userID": "user-1",
                "route_id": "route-1",
                "reward_value": 50,
                "avoided_risks": 2,
                "claim_prevention_estimate": 1200.0
            })
        )
    ).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["reward_value"], 50);
}

#[tokio::test]
async fn reward_summary_totals_the_rows() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![sample_reward(50, 2, 1200.0), sample_reward(25, 1, 300.0)]])
        .into_connection();
    let app = build_app(db);

    let (status, body) = request_json(&app, "GET", "/api/rewards/summary?user_id=user-1", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_points"], 75);
    assert_eq!(body["total_avoided_risks"], 3);
    assert_eq!(body["total_claim_prevention"], 1500.0);
    assert_eq!(body["reward_count"], 2);
}

#[tokio::test]
async fn reward_update_needs_both_ids() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = build_app(db);

    let (status, body) = request_json(
        &app,
        "PUT",
        "/api/rewards",
        Some(json!({ "user_id": "user-1", "reward_value": 10 }))
    ).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "User ID and Reward ID are required");
}

#[tokio::test]
async fn risk_alert_list_requires_a_user() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = build_app(db);

    let (status, body) = request_json(&app, "GET", "/api/risk-alerts?acknowledged=false", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "User ID is required");
}

#[tokio::test]
async fn risk_alert_create_validates_severity() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = build_app(db);

    let (status, body) = request_json(
        &app,
        "POST",
        "/api/risk-alerts",
        Some(json!({ "user_id": "user-1", "alert_type": "weather", "message": "Hail expected" }))
    ).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "severity");
}
