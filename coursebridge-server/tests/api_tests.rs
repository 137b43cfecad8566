//! Integration tests for the coursebridge-server HTTP surface
//!
//! Tests cover:
//! - Health endpoint (public, reports module identity and version)
//! - Bearer authentication middleware (missing, malformed, unknown tokens)
//! - Admin role enforcement (valid token without the admin flag)
//! - Course catalog CRUD (public reads, admin writes, validation)

mod helpers;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::util::ServiceExt; // for `oneshot` method

use coursebridge_server::build_router;
use helpers::*;

// =============================================================================
// Health Endpoint
// =============================================================================

#[tokio::test]
async fn test_health_endpoint_no_auth_required() {
    let (state, _tmp) = setup_state().await;
    let app = build_router(state);

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "coursebridge-server");
    assert!(body["version"].is_string());
    assert!(body["uptime_seconds"].is_number());
}

// =============================================================================
// Authentication Middleware
// =============================================================================

#[tokio::test]
async fn test_missing_token_rejected() {
    let (state, _tmp) = setup_state().await;
    let app = build_router(state);

    let request = post_json("/api/enroll", &json!({"courseId": 1}));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    assert!(
        body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Missing bearer token"),
        "Expected missing-token message, got {}",
        body["error"]["message"]
    );
}

#[tokio::test]
async fn test_malformed_authorization_header_rejected() {
    let (state, _tmp) = setup_state().await;
    let app = build_router(state);

    let request = Request::builder()
        .method("POST")
        .uri("/api/enroll")
        .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"courseId": 1}).to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = extract_json(response.into_body()).await;
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Malformed authorization header"));
}

#[tokio::test]
async fn test_unknown_token_rejected() {
    let (state, _tmp) = setup_state().await;
    let app = build_router(state);

    let request = post_json_auth("/api/enroll", "not-a-real-token", &json!({"courseId": 1}));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = extract_json(response.into_body()).await;
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Invalid or expired token"));
}

#[tokio::test]
async fn test_admin_route_rejects_student_token() {
    let (state, _tmp) = setup_state().await;
    let app = build_router(state);

    let request = post_json_auth(
        "/api/courses",
        STUDENT_TOKEN,
        &json!({"title": "Pottery Basics", "max_students": 10}),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "FORBIDDEN");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Administrator access required"));
}

#[tokio::test]
async fn test_admin_route_rejects_anonymous() {
    let (state, _tmp) = setup_state().await;
    let app = build_router(state);

    let request = post_json(
        "/api/courses",
        &json!({"title": "Pottery Basics", "max_students": 10}),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Course Catalog
// =============================================================================

#[tokio::test]
async fn test_create_course_as_admin() {
    let (state, _tmp) = setup_state().await;
    let app = build_router(state);

    let request = post_json_auth(
        "/api/courses",
        ADMIN_TOKEN,
        &json!({
            "title": "Intro to Gardening",
            "category": "outdoors",
            "instructor": "R. Bloom",
            "max_students": 12,
            "start_date": "2024-10-01",
            "class_time": "10:00",
            "location": "Greenhouse"
        }),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert!(body["id"].is_number());
    assert_eq!(body["title"], "Intro to Gardening");
    assert_eq!(body["max_students"], 12);
    assert_eq!(body["enrolled_students"], 0, "New courses start empty");
    assert_eq!(body["instructor"], "R. Bloom");
}

#[tokio::test]
async fn test_create_course_requires_title() {
    let (state, _tmp) = setup_state().await;
    let app = build_router(state);

    let request = post_json_auth(
        "/api/courses",
        ADMIN_TOKEN,
        &json!({"title": "   ", "max_students": 10}),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("title is required"));
}

#[tokio::test]
async fn test_create_course_requires_positive_capacity() {
    let (state, _tmp) = setup_state().await;
    let app = build_router(state);

    let request = post_json_auth(
        "/api/courses",
        ADMIN_TOKEN,
        &json!({"title": "Pottery Basics", "max_students": 0}),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("max_students"));
}

#[tokio::test]
async fn test_course_update_and_delete_cycle() {
    let (state, _tmp) = setup_state().await;
    let app = build_router(state.clone());

    let course_id = seed_course(&state.db, "Beginner Spanish", 8).await;

    // Partial update leaves unmentioned fields alone
    let request = put_json_auth(
        &format!("/api/courses/{}", course_id),
        ADMIN_TOKEN,
        &json!({"title": "Conversational Spanish", "max_students": 15}),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["title"], "Conversational Spanish");
    assert_eq!(body["max_students"], 15);
    assert_eq!(
        body["location"], "Community Hall, Room 4",
        "Unmentioned fields should be preserved"
    );

    // Public read reflects the update
    let response = app
        .clone()
        .oneshot(get(&format!("/api/courses/{}", course_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["title"], "Conversational Spanish");

    // Delete, then the course is gone
    let response = app
        .clone()
        .oneshot(delete_auth(
            &format!("/api/courses/{}", course_id),
            ADMIN_TOKEN,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(get(&format!("/api/courses/{}", course_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_unknown_course_not_found() {
    let (state, _tmp) = setup_state().await;
    let app = build_router(state);

    let request = put_json_auth("/api/courses/9999", ADMIN_TOKEN, &json!({"title": "Ghost"}));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_course_rejects_zero_capacity() {
    let (state, _tmp) = setup_state().await;
    let app = build_router(state.clone());

    let course_id = seed_course(&state.db, "Beginner Spanish", 8).await;

    let request = put_json_auth(
        &format!("/api/courses/{}", course_id),
        ADMIN_TOKEN,
        &json!({"max_students": -3}),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_unknown_course_not_found() {
    let (state, _tmp) = setup_state().await;
    let app = build_router(state);

    let response = app
        .oneshot(delete_auth("/api/courses/424242", ADMIN_TOKEN))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_courses_is_public() {
    let (state, _tmp) = setup_state().await;
    let app = build_router(state.clone());

    seed_course(&state.db, "Pottery Basics", 10).await;
    seed_course(&state.db, "Watercolor Painting", 6).await;

    let response = app.oneshot(get("/api/courses")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let courses = body.as_array().expect("Should list courses");
    assert_eq!(courses.len(), 2);
    // Newest first
    assert_eq!(courses[0]["title"], "Watercolor Painting");
    assert_eq!(courses[1]["title"], "Pottery Basics");
}

#[tokio::test]
async fn test_get_course_not_found() {
    let (state, _tmp) = setup_state().await;
    let app = build_router(state);

    let response = app.oneshot(get("/api/courses/31337")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}
