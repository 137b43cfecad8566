//! Integration tests for partner institution applications
//!
//! Tests cover:
//! - Public submission with required-field validation
//! - Admin-only listing with status filter
//! - Approve/reject decisions recording the reviewer
//! - Deletion

mod helpers;

use axum::http::StatusCode;
use serde_json::json;
use tower::util::ServiceExt; // for `oneshot` method

use coursebridge_server::build_router;
use helpers::*;

fn application(org: &str) -> serde_json::Value {
    json!({
        "organization_name": org,
        "contact_name": "Dana Okafor",
        "contact_email": "dana@example.org",
        "contact_phone": "555-0199",
        "selected_courses": [1, 2],
        "notes": "Interested in evening classes for our staff"
    })
}

// =============================================================================
// Submission
// =============================================================================

#[tokio::test]
async fn test_submit_partnership_is_public() {
    let (state, _tmp) = setup_state().await;
    let app = build_router(state);

    let request = post_json("/api/partnerships", &application("Riverside Library"));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert!(body["id"].is_number());
    assert_eq!(body["organization_name"], "Riverside Library");
    assert_eq!(body["status"], "pending");
    assert_eq!(body["selected_courses"], json!([1, 2]));
    assert!(body["approved_by"].is_null());
    assert!(body["approved_at"].is_null());
}

#[tokio::test]
async fn test_submit_requires_contact_fields() {
    let (state, _tmp) = setup_state().await;
    let app = build_router(state);

    let mut body = application("Riverside Library");
    body["contact_email"] = json!("   ");

    let response = app
        .oneshot(post_json("/api/partnerships", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("contact_email is required"));
}

#[tokio::test]
async fn test_submit_with_absent_fields_rejected() {
    let (state, _tmp) = setup_state().await;
    let app = build_router(state);

    let response = app
        .oneshot(post_json(
            "/api/partnerships",
            &json!({"organization_name": "Riverside Library"}),
        ))
        .await
        .unwrap();

    assert!(
        response.status().is_client_error(),
        "Missing contact fields should not create an application"
    );
}

// =============================================================================
// Listing and Filtering
// =============================================================================

#[tokio::test]
async fn test_list_partnerships_requires_admin() {
    let (state, _tmp) = setup_state().await;
    let app = build_router(state);

    let response = app
        .clone()
        .oneshot(get_auth("/api/partnerships", STUDENT_TOKEN))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app.oneshot(get("/api/partnerships")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_partnerships_with_status_filter() {
    let (state, _tmp) = setup_state().await;
    let app = build_router(state);

    let response = app
        .clone()
        .oneshot(post_json("/api/partnerships", &application("Riverside Library")))
        .await
        .unwrap();
    let first = extract_json(response.into_body()).await;

    app.clone()
        .oneshot(post_json("/api/partnerships", &application("Hilltop Seniors Club")))
        .await
        .unwrap();

    // Approve the first application
    let response = app
        .clone()
        .oneshot(post_auth(
            &format!("/api/partnerships/{}/approve", first["id"]),
            ADMIN_TOKEN,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // No filter lists everything
    let response = app
        .clone()
        .oneshot(get_auth("/api/partnerships", ADMIN_TOKEN))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body.as_array().map(Vec::len), Some(2));

    // Pending filter excludes the approved one
    let response = app
        .clone()
        .oneshot(get_auth("/api/partnerships?status=pending", ADMIN_TOKEN))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    let pending = body.as_array().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["organization_name"], "Hilltop Seniors Club");

    // Approved filter finds the decided one
    let response = app
        .clone()
        .oneshot(get_auth("/api/partnerships?status=approved", ADMIN_TOKEN))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    let approved = body.as_array().unwrap();
    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0]["organization_name"], "Riverside Library");

    // Unknown status is a validation error
    let response = app
        .oneshot(get_auth("/api/partnerships?status=bogus", ADMIN_TOKEN))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Decisions
// =============================================================================

#[tokio::test]
async fn test_approve_records_reviewer() {
    let (state, _tmp) = setup_state().await;
    let app = build_router(state);

    let response = app
        .clone()
        .oneshot(post_json("/api/partnerships", &application("Riverside Library")))
        .await
        .unwrap();
    let submitted = extract_json(response.into_body()).await;

    let response = app
        .oneshot(post_auth(
            &format!("/api/partnerships/{}/approve", submitted["id"]),
            ADMIN_TOKEN,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "approved");
    assert_eq!(body["approved_by"], ADMIN_ID);
    assert!(body["approved_at"].is_string());
}

#[tokio::test]
async fn test_reject_partnership() {
    let (state, _tmp) = setup_state().await;
    let app = build_router(state);

    let response = app
        .clone()
        .oneshot(post_json("/api/partnerships", &application("Riverside Library")))
        .await
        .unwrap();
    let submitted = extract_json(response.into_body()).await;

    let response = app
        .oneshot(post_auth(
            &format!("/api/partnerships/{}/reject", submitted["id"]),
            ADMIN_TOKEN,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "rejected");
}

#[tokio::test]
async fn test_decide_unknown_partnership_not_found() {
    let (state, _tmp) = setup_state().await;
    let app = build_router(state);

    let response = app
        .oneshot(post_auth("/api/partnerships/9999/approve", ADMIN_TOKEN))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_decisions_require_admin() {
    let (state, _tmp) = setup_state().await;
    let app = build_router(state);

    let response = app
        .clone()
        .oneshot(post_json("/api/partnerships", &application("Riverside Library")))
        .await
        .unwrap();
    let submitted = extract_json(response.into_body()).await;

    let response = app
        .oneshot(post_auth(
            &format!("/api/partnerships/{}/approve", submitted["id"]),
            STUDENT_TOKEN,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// =============================================================================
// Deletion
// =============================================================================

#[tokio::test]
async fn test_delete_partnership() {
    let (state, _tmp) = setup_state().await;
    let app = build_router(state);

    let response = app
        .clone()
        .oneshot(post_json("/api/partnerships", &application("Riverside Library")))
        .await
        .unwrap();
    let submitted = extract_json(response.into_body()).await;
    let uri = format!("/api/partnerships/{}", submitted["id"]);

    let response = app
        .clone()
        .oneshot(delete_auth(&uri, ADMIN_TOKEN))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(get_auth("/api/partnerships", ADMIN_TOKEN))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body.as_array().map(Vec::len), Some(0));

    // Deleting again reports the application gone
    let response = app.oneshot(delete_auth(&uri, ADMIN_TOKEN)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
