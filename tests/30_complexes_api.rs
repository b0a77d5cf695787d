mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;
use complex_api::types::{BuildingId, ComplexId};

#[tokio::test]
async fn complexes_are_publicly_readable() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/complexes", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = app.get(&format!("/api/complexes/{}", app.complex.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Green Park");
    assert_eq!(body["data"]["buildings"].as_array().unwrap().len(), 2);

    let (status, _) = app.get(&format!("/api/complexes/{}", ComplexId::generate()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn only_admins_create_complexes() {
    let app = TestApp::new().await;
    let payload = json!({
        "name": "Riverside",
        "address": "3 Quay Rd",
        "buildings": [{ "name": "North" }, { "name": "South", "address": "5 Quay Rd" }]
    });

    let (status, _) = app.post("/api/complexes", Some(&app.moderator), payload.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.post("/api/complexes", Some(&app.admin), payload).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["buildings"][1]["address"], "5 Quay Rd");

    let (_, body) = app.get("/api/complexes", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn blank_fields_fail_validation() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post("/api/complexes", Some(&app.admin), json!({"name": " ", "address": "1 Main St"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field_errors"].get("name").is_some());

    let (status, body) = app.post("/api/complexes", Some(&app.admin), json!({"name": "x"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_JSON");
}

#[tokio::test]
async fn moderator_updates_own_complex() {
    let app = TestApp::new().await;
    let uri = format!("/api/complexes/{}", app.complex.id);

    let (status, body) = app.put(&uri, Some(&app.moderator), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "At least one field must not be empty!");

    let (status, _) = app.put(&uri, Some(&app.resident), json!({"name": "x"})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .put(&uri, Some(&app.moderator), json!({"address": "14 Linden Ave"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Green Park");
    assert_eq!(body["data"]["address"], "14 Linden Ave");

    let missing = format!("/api/complexes/{}", ComplexId::generate());
    let (status, _) = app.put(&missing, Some(&app.moderator), json!({"name": "x"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_checks_existence_before_admin_rights() {
    let app = TestApp::new().await;

    let missing = format!("/api/complexes/{}", ComplexId::generate());
    let (status, _) = app.delete(&missing, Some(&app.moderator)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let uri = format!("/api/complexes/{}", app.complex.id);
    let (status, _) = app.delete(&uri, Some(&app.moderator)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.delete(&uri, Some(&app.admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], app.complex.id.to_string());

    let (status, _) = app.get(&uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn buildings_are_added_and_removed() {
    let app = TestApp::new().await;
    let uri = format!("/api/complexes/{}/buildings", app.complex.id);

    let (status, body) = app.post(&uri, Some(&app.moderator), json!({"name": "Block C"})).await;
    assert_eq!(status, StatusCode::CREATED);
    let building_id = body["data"]["id"].as_str().unwrap().to_string();

    let (_, body) = app.get(&format!("/api/complexes/{}", app.complex.id), None).await;
    assert_eq!(body["data"]["buildings"].as_array().unwrap().len(), 3);

    let (status, _) = app
        .post(&uri, Some(&app.outsider), json!({"name": "Block D"}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .delete(&format!("{}/{}", uri, building_id), Some(&app.moderator))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Block C");

    let (status, _) = app
        .delete(&format!("{}/{}", uri, BuildingId::generate()), Some(&app.moderator))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn whoami_reflects_stored_memberships() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/auth/whoami", Some(&app.moderator)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_admin"], false);
    assert_eq!(body["data"]["buildings"][0]["complex_id"], app.complex.id.to_string());
    assert_eq!(body["data"]["buildings"][0]["moderator"], true);
}

#[tokio::test]
async fn admin_creates_users_who_can_then_sign_in() {
    let app = TestApp::new().await;
    let payload = json!({
        "name": "Iryna",
        "buildings": [{ "complex_id": app.complex.id, "moderator": true }]
    });

    let (status, _) = app.post("/api/users", Some(&app.moderator), payload.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.post("/api/users", Some(&app.admin), payload).await;
    assert_eq!(status, StatusCode::CREATED);
    let user_id = body["data"]["id"].as_str().unwrap().parse().unwrap();

    let token = app.token_for(user_id);
    let (status, _) = app
        .put(
            &format!("/api/complexes/{}", app.complex.id),
            Some(&token),
            json!({"name": "Green Park II"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn unknown_routes_answer_with_json_404() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/api/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}
