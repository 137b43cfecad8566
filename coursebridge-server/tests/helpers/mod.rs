//! Test helper utilities
//!
//! Shared setup for the coursebridge-server integration tests: a fresh
//! temp-file database per test, a static token table in place of the
//! real auth service, the stub chat provisioner and request builders.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request};
use serde_json::Value;
use sqlx::SqlitePool;
use tempfile::TempDir;
use uuid::Uuid;

use coursebridge_common::db::init_database;
use coursebridge_common::db::models::DeliveryMethod;
use coursebridge_common::time::now_rfc3339;
use coursebridge_server::config::{NotificationConfig, VideoConfig, WhatsAppConfig};
use coursebridge_server::db::courses::{insert_course, NewCourse};
use coursebridge_server::db::sessions::{insert_session, NewSession};
use coursebridge_server::services::auth::{AuthError, AuthProvider, AuthUser};
use coursebridge_server::services::notify::Notifier;
use coursebridge_server::services::rooms::StubChatProvisioner;
use coursebridge_server::AppState;

/// Bearer token the static provider accepts for the regular learner
pub const STUDENT_TOKEN: &str = "student-test-token";
/// Bearer token the static provider accepts for the administrator
pub const ADMIN_TOKEN: &str = "admin-test-token";
/// User id behind STUDENT_TOKEN
pub const STUDENT_ID: &str = "11111111-2222-4333-8444-555555555555";
/// User id behind ADMIN_TOKEN
pub const ADMIN_ID: &str = "99999999-8888-4777-8666-555555555555";

/// Auth provider backed by a fixed token table, no network involved
pub struct StaticAuthProvider;

#[async_trait]
impl AuthProvider for StaticAuthProvider {
    async fn get_user(&self, token: &str) -> Result<AuthUser, AuthError> {
        match token {
            STUDENT_TOKEN => Ok(AuthUser {
                id: Uuid::parse_str(STUDENT_ID).unwrap(),
                email: Some("learner@example.com".to_string()),
                phone: Some("555-867-5309".to_string()),
            }),
            ADMIN_TOKEN => Ok(AuthUser {
                id: Uuid::parse_str(ADMIN_ID).unwrap(),
                email: Some("admin@example.com".to_string()),
                phone: None,
            }),
            _ => Err(AuthError::InvalidToken),
        }
    }
}

/// Fresh state: temp database, static auth, stub chat, console notifier
pub async fn setup_state() -> (AppState, TempDir) {
    setup_state_with_notifications(NotificationConfig::default()).await
}

/// Fresh state with specific notification channel settings
pub async fn setup_state_with_notifications(
    notifications: NotificationConfig,
) -> (AppState, TempDir) {
    let temp_dir = TempDir::new().expect("Should create temp dir");
    let db_path = temp_dir.path().join("coursebridge.db");
    let pool = init_database(&db_path)
        .await
        .expect("Should initialize test database");

    seed_admin_profile(&pool).await;

    let state = AppState::new(
        pool,
        Arc::new(StaticAuthProvider),
        Arc::new(StubChatProvisioner::default()),
        Arc::new(Notifier::new(notifications).expect("Should build notifier")),
        VideoConfig::default(),
    );
    (state, temp_dir)
}

/// The admin flag lives in the profiles table, keyed by the token's user id
async fn seed_admin_profile(pool: &SqlitePool) {
    let now = now_rfc3339();
    sqlx::query(
        r#"
        INSERT INTO profiles (user_id, full_name, is_admin, created_at, updated_at)
        VALUES (?, 'Test Admin', 1, ?, ?)
        "#,
    )
    .bind(ADMIN_ID)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await
    .expect("Should seed admin profile");
}

/// Channel settings that select WhatsApp pointed at an unreachable port
pub fn unreachable_whatsapp() -> NotificationConfig {
    NotificationConfig {
        whatsapp: WhatsAppConfig {
            api_key: Some("test-key".to_string()),
            api_url: "http://127.0.0.1:1".to_string(),
        },
        ..NotificationConfig::default()
    }
}

/// Insert a course directly, returning its id
pub async fn seed_course(pool: &SqlitePool, title: &str, max_students: i64) -> i64 {
    let course = insert_course(
        pool,
        &NewCourse {
            title: title.to_string(),
            description: None,
            category: None,
            instructor: None,
            max_students,
            start_date: Some("2024-09-02".to_string()),
            end_date: None,
            class_time: Some("18:00".to_string()),
            location: Some("Community Hall, Room 4".to_string()),
            duration: None,
        },
    )
    .await
    .expect("Should insert course");
    course.id
}

/// Insert a session directly, returning its id
pub async fn seed_session(
    pool: &SqlitePool,
    course_id: i64,
    session_date: &str,
    method: DeliveryMethod,
) -> i64 {
    let (video_room_id, chat_channel_id, chat_invite_link) = match method {
        DeliveryMethod::Video => (
            Some(format!("coursebridge-course-{}-{}", course_id, session_date)),
            None,
            None,
        ),
        DeliveryMethod::Chat => (
            None,
            Some("chan-test-1234".to_string()),
            Some("https://chat.coursebridge.local/join/chan-test-1234".to_string()),
        ),
        DeliveryMethod::InPerson => (None, None, None),
    };

    let session = insert_session(
        pool,
        &NewSession {
            course_id,
            session_date: session_date.to_string(),
            start_time: "18:00".to_string(),
            end_time: "20:00".to_string(),
            delivery_method: method,
            video_room_id,
            chat_channel_id,
            chat_invite_link,
        },
    )
    .await
    .expect("Should insert session");
    session.id
}

/// Notification rows as (channel, status, message), oldest first
pub async fn notification_rows(pool: &SqlitePool) -> Vec<(String, String, String)> {
    sqlx::query_as::<_, (String, String, String)>(
        "SELECT channel, status, message FROM notifications ORDER BY id",
    )
    .fetch_all(pool)
    .await
    .expect("Should query notifications")
}

/// Unauthenticated GET request
pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// GET with a bearer token
pub fn get_auth(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

/// Unauthenticated JSON POST
pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// JSON POST with a bearer token
pub fn post_json_auth(uri: &str, token: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Body-less POST with a bearer token (approve/reject endpoints)
pub fn post_auth(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

/// JSON PUT with a bearer token
pub fn put_json_auth(uri: &str, token: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// DELETE with a bearer token
pub fn delete_auth(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

/// Extract JSON body from a response
pub async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}
