//! coursebridge-server library
//!
//! Community course enrollment and attendance service: course catalog,
//! seat-gated enrollment, class session provisioning, attendance-mode
//! tracking and the notification dispatch cascade.

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod services;

pub use error::{ApiError, ApiResult};

use config::VideoConfig;
use services::auth::AuthProvider;
use services::notify::Notifier;
use services::rooms::ChatProvisioner;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Bearer-token validation seam
    pub auth: Arc<dyn AuthProvider>,
    /// Chat channel provisioning seam
    pub chat: Arc<dyn ChatProvisioner>,
    /// Notification dispatcher with its injected channel settings
    pub notifier: Arc<Notifier>,
    /// Video room derivation settings
    pub video: VideoConfig,
    /// Server start time, reported by the health endpoint
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        db: SqlitePool,
        auth: Arc<dyn AuthProvider>,
        chat: Arc<dyn ChatProvisioner>,
        notifier: Arc<Notifier>,
        video: VideoConfig,
    ) -> Self {
        Self {
            db,
            auth,
            chat,
            notifier,
            video,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
///
/// Three surfaces: admin routes (bearer token + admin profile flag),
/// authenticated routes (bearer token), and the public read/submit
/// surface including the health endpoint.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{delete, get, post, put};

    // Admin routes (valid token + admin flag)
    let admin = Router::new()
        .route("/api/sessions", post(api::create_session))
        .route("/api/courses", post(api::create_course))
        .route("/api/courses/:id", put(api::update_course))
        .route("/api/courses/:id", delete(api::delete_course))
        .route("/api/partnerships", get(api::list_partnerships))
        .route("/api/partnerships/:id/approve", post(api::approve_partnership))
        .route("/api/partnerships/:id/reject", post(api::reject_partnership))
        .route("/api/partnerships/:id", delete(api::delete_partnership))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::require_admin,
        ));

    // Authenticated routes (valid token)
    let protected = Router::new()
        .route("/api/enroll", post(api::enroll))
        .route(
            "/api/sessions/:id/attendance",
            post(api::select_attendance_mode).get(api::session_attendance_breakdown),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::require_user,
        ));

    // Public routes (no authentication)
    let public = Router::new()
        .route("/api/courses", get(api::list_courses))
        .route("/api/courses/:id", get(api::get_course))
        .route("/api/sessions", get(api::list_sessions))
        .route("/api/partnerships", post(api::submit_partnership))
        .merge(api::health_routes());

    // Combine routers
    Router::new()
        .merge(admin)
        .merge(protected)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
