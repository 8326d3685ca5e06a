//! Integration tests for the `/sessions/{id}/annotations` routes.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, post_json, put_json, upload_bout};
use serde_json::json;

const UNKNOWN_ID: &str = "0190a8c4-0000-7000-8000-000000000000";

async fn new_session(app: &axum::Router) -> String {
    upload_bout(app, Some("Marcus Chen")).await["id"]
        .as_str()
        .unwrap()
        .to_string()
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn annotation_at_current_position_lands_on_timeline() {
    let app = common::build_test_app();
    let id = new_session(&app).await;

    // Player reports the bout is 90 seconds in.
    let response = post_json(
        app.clone(),
        &format!("/api/v1/sessions/{id}/playback"),
        json!({ "event": "time_update", "time": 90.0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(
        app.clone(),
        &format!("/api/v1/sessions/{id}/annotations"),
        json!({ "category": "offense", "text": "good lunge" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let created = body_json(response).await["data"].clone();
    assert_eq!(created["time"], 90.0);
    assert_eq!(created["category"], "offense");
    assert_eq!(created["text"], "good lunge");

    let timeline = body_json(get(app, &format!("/api/v1/sessions/{id}/timeline")).await).await;
    let markers = timeline["data"]["markers"].as_array().unwrap();
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0]["kind"], "annotation");
    assert_eq!(markers[0]["position_percent"], 50.0);
    assert_eq!(markers[0]["label"], "1:30");
    assert_eq!(markers[0]["annotation_id"], created["id"]);
}

#[tokio::test]
async fn typed_timestamp_wins_over_numeric_time() {
    let app = common::build_test_app();
    let id = new_session(&app).await;

    let response = post_json(
        app,
        &format!("/api/v1/sessions/{id}/annotations"),
        json!({
            "time": 10.0,
            "time_input": "2:05",
            "category": "defense",
            "text": "  parry four  ",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let created = body_json(response).await["data"].clone();
    assert_eq!(created["time"], 125.0);
    assert_eq!(created["category"], "defense");
    assert_eq!(created["text"], "parry four");
}

#[tokio::test]
async fn malformed_timestamp_falls_back_to_numeric_time() {
    let app = common::build_test_app();
    let id = new_session(&app).await;

    let response = post_json(
        app,
        &format!("/api/v1/sessions/{id}/annotations"),
        json!({ "time": 42.0, "time_input": "1:75", "text": "late riposte" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let created = body_json(response).await["data"].clone();
    assert_eq!(created["time"], 42.0);
    assert_eq!(created["category"], "offense");
}

#[tokio::test]
async fn time_past_the_end_is_clamped_to_duration() {
    let app = common::build_test_app();
    let id = new_session(&app).await;

    let response = post_json(
        app,
        &format!("/api/v1/sessions/{id}/annotations"),
        json!({ "time_input": "9:00", "text": "after the bout" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["time"], 180.0);
}

#[tokio::test]
async fn blank_text_is_refused_and_nothing_is_stored() {
    let app = common::build_test_app();
    let id = new_session(&app).await;

    let response = post_json(
        app.clone(),
        &format!("/api/v1/sessions/{id}/annotations"),
        json!({ "category": "strategy", "text": "   " }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let list = body_json(get(app, &format!("/api/v1/sessions/{id}/annotations")).await).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn unknown_category_is_refused() {
    let app = common::build_test_app();
    let id = new_session(&app).await;

    let response = post_json(
        app,
        &format!("/api/v1/sessions/{id}/annotations"),
        json!({ "category": "flourish", "text": "nice" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn negative_time_is_refused() {
    let app = common::build_test_app();
    let id = new_session(&app).await;

    let response = post_json(
        app,
        &format!("/api/v1/sessions/{id}/annotations"),
        json!({ "time": -3.0, "text": "before the bout" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_on_unknown_session_is_404() {
    let app = common::build_test_app();

    let response = post_json(
        app,
        &format!("/api/v1/sessions/{UNKNOWN_ID}/annotations"),
        json!({ "text": "orphan" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_is_in_display_order() {
    let app = common::build_test_app();
    let id = new_session(&app).await;
    let uri = format!("/api/v1/sessions/{id}/annotations");

    for (ts, text) in [("2:00", "third"), ("0:10", "first"), ("1:00", "second")] {
        let response = post_json(
            app.clone(),
            &uri,
            json!({ "time_input": ts, "text": text }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let list = body_json(get(app.clone(), &uri).await).await;
    let texts: Vec<_> = list["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["text"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(texts, ["first", "second", "third"]);

    // The stored order is insertion order.
    let session = body_json(get(app, &format!("/api/v1/sessions/{id}")).await).await;
    assert_eq!(session["data"]["annotations"][0]["text"], "third");
}

// ---------------------------------------------------------------------------
// Update / delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_merges_only_supplied_fields() {
    let app = common::build_test_app();
    let id = new_session(&app).await;

    let created = body_json(
        post_json(
            app.clone(),
            &format!("/api/v1/sessions/{id}/annotations"),
            json!({ "time_input": "0:45", "category": "distance", "text": "too close" }),
        )
        .await,
    )
    .await["data"]
        .clone();
    let ann_id = created["id"].as_str().unwrap();

    let response = put_json(
        app,
        &format!("/api/v1/sessions/{id}/annotations/{ann_id}"),
        json!({ "text": "too close on the retreat" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let updated = body_json(response).await["data"].clone();
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["time"], 45.0);
    assert_eq!(updated["category"], "distance");
    assert_eq!(updated["text"], "too close on the retreat");
    assert_eq!(updated["created_at"], created["created_at"]);
}

#[tokio::test]
async fn update_can_move_annotation_in_time() {
    let app = common::build_test_app();
    let id = new_session(&app).await;

    let created = body_json(
        post_json(
            app.clone(),
            &format!("/api/v1/sessions/{id}/annotations"),
            json!({ "time_input": "0:45", "text": "attack" }),
        )
        .await,
    )
    .await["data"]
        .clone();
    let ann_id = created["id"].as_str().unwrap();

    let response = put_json(
        app,
        &format!("/api/v1/sessions/{id}/annotations/{ann_id}"),
        json!({ "time_input": "1:05", "category": "timing" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let updated = body_json(response).await["data"].clone();
    assert_eq!(updated["time"], 65.0);
    assert_eq!(updated["category"], "timing");
    assert_eq!(updated["text"], "attack");
}

#[tokio::test]
async fn update_to_blank_text_is_refused() {
    let app = common::build_test_app();
    let id = new_session(&app).await;

    let created = body_json(
        post_json(
            app.clone(),
            &format!("/api/v1/sessions/{id}/annotations"),
            json!({ "text": "keep me" }),
        )
        .await,
    )
    .await["data"]
        .clone();
    let ann_id = created["id"].as_str().unwrap();

    let response = put_json(
        app.clone(),
        &format!("/api/v1/sessions/{id}/annotations/{ann_id}"),
        json!({ "text": "" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let list = body_json(get(app, &format!("/api/v1/sessions/{id}/annotations")).await).await;
    assert_eq!(list["data"][0]["text"], "keep me");
}

#[tokio::test]
async fn update_with_no_fields_is_bad_request() {
    let app = common::build_test_app();
    let id = new_session(&app).await;

    let created = body_json(
        post_json(
            app.clone(),
            &format!("/api/v1/sessions/{id}/annotations"),
            json!({ "text": "unchanged" }),
        )
        .await,
    )
    .await["data"]
        .clone();
    let ann_id = created["id"].as_str().unwrap();

    let response = put_json(
        app,
        &format!("/api/v1/sessions/{id}/annotations/{ann_id}"),
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn update_unknown_annotation_is_404() {
    let app = common::build_test_app();
    let id = new_session(&app).await;

    let response = put_json(
        app,
        &format!("/api/v1/sessions/{id}/annotations/{UNKNOWN_ID}"),
        json!({ "text": "ghost" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], format!("Annotation with id {UNKNOWN_ID} not found"));
    assert!(json.get("redirect").is_none());
}

#[tokio::test]
async fn delete_removes_annotation() {
    let app = common::build_test_app();
    let id = new_session(&app).await;
    let uri = format!("/api/v1/sessions/{id}/annotations");

    let created = body_json(post_json(app.clone(), &uri, json!({ "text": "gone soon" })).await)
        .await["data"]
        .clone();
    let ann_id = created["id"].as_str().unwrap();

    let response = delete(app.clone(), &format!("{uri}/{ann_id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let list = body_json(get(app.clone(), &uri).await).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 0);

    let response = delete(app, &format!("{uri}/{ann_id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
