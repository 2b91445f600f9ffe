//! API integration tests
//!
//! Drive the router end-to-end with canned collaborators; no network.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use tubeinfo_api::test_support::{
    create_router_for_testing, router_with_collaborators, ScriptedLlm, StaticLookup,
};
use tubeinfo_core::Snippet;

/// Helper to create a test request
fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

// =============================================================================
// Health Check Tests
// =============================================================================

#[tokio::test]
async fn test_health_check() {
    let app = create_router_for_testing();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

// =============================================================================
// Classify Tests
// =============================================================================

#[tokio::test]
async fn test_classify_unknown_video() {
    let app = create_router_for_testing();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/classify",
            json!({"video_title": "雑談", "description": ""}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert_eq!(json["statusCode"], 200);
    assert_eq!(json["body"]["category"], "UNKNOWN");
    assert_eq!(json["body"]["type"], "VIDEO");
    assert!(json["body"].get("song_title").is_none());
}

#[tokio::test]
async fn test_classify_unwraps_envelope() {
    let app = create_router_for_testing();
    let inner = json!({"video_title": "雑談", "description": ""}).to_string();

    let response = app
        .oneshot(json_request("POST", "/api/v1/classify", json!({"body": inner})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert_eq!(json["body"]["category"], "UNKNOWN");
}

#[tokio::test]
async fn test_classify_missing_title_is_bad_request() {
    let app = create_router_for_testing();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/classify",
            json!({"description": "no title"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = response_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_classify_song_with_cover_resolution() {
    let llm = ScriptedLlm::new(&[
        r#"{"category": "SONG", "type": "VIDEO"}"#,
        r#"{"song_title": "X", "singers": ["Y"], "is_cover": true,
            "cover_artists": ["W"], "original_url": "https://youtu.be/abc12345678"}"#,
        r#"{"category": "SONG", "type": "VIDEO"}"#,
        r#"{"song_title": "Z", "singers": ["W"]}"#,
    ]);
    let lookup = StaticLookup(Some(Snippet {
        title: "original song".to_string(),
        description: "by W".to_string(),
    }));
    let app = router_with_collaborators(Arc::new(llm), Arc::new(lookup));

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/classify",
            json!({
                "video_title": "歌ってみた",
                "description": "original: https://youtu.be/abc12345678"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    let body = &json["body"];
    assert_eq!(body["category"], "SONG");
    assert_eq!(body["song_title"], "Z");
    assert_eq!(body["artists"], json!(["W"]));
    assert_eq!(body["is_cover"], true);
    assert_eq!(body["original_url"], "https://youtu.be/abc12345678");
}

#[tokio::test]
async fn test_classify_extraction_failure_is_internal_error() {
    // Classification answer is not JSON: a permanent extraction error
    let llm = ScriptedLlm::new(&["the video is a song"]);
    let app = router_with_collaborators(Arc::new(llm), Arc::new(StaticLookup(None)));

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/classify",
            json!({"video_title": "t", "description": ""}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = response_json(response).await;
    assert_eq!(json["code"], "INTERNAL_ERROR");
}
